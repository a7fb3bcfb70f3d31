//! Cross-module analysis (C8, spec §4.7): build order, global symbol
//! table, and specialisation-request collection over the whole IR bundle.
//!
//! Runs once, after every module has been built individually by phase 4,
//! and before the specialiser and emitter (phases 6 and the rest of the
//! pipeline) see the program as a whole.

mod order;
mod specialisations;
mod symbols;

pub use order::{check_acyclic, topological_build_order};
pub use specialisations::collect_specialisation_requests;
pub use symbols::{ExportLocation, SymbolTable, build_symbol_table};

use tsonic_common::Diagnostic;
use tsonic_common::ordered::OrderedMap;
use tsonic_ir::module::IrModule;
use tsonic_ir::specialisation::SpecialisationRequest;
use tsonic_resolver::ModuleGraph;

/// Everything phases 6+ need that only exists once the whole program has
/// been seen: immutable once returned (spec §4.7).
#[derive(Debug)]
pub struct AnalysedProgram {
    pub build_order: Vec<String>,
    pub symbol_table: SymbolTable,
    pub specialisation_requests: Vec<SpecialisationRequest>,
}

/// `specialisation_requests` is the flattened concatenation of every
/// module's collected requests (callers own combining them in build order;
/// doing so here would otherwise require this crate to depend on the
/// builder crate it logically follows).
pub fn analyse(
    graph: &ModuleGraph,
    modules: &OrderedMap<String, IrModule>,
    specialisation_requests: Vec<SpecialisationRequest>,
) -> Result<AnalysedProgram, Vec<Diagnostic>> {
    check_acyclic(graph).map_err(|d| vec![d])?;

    let build_order = topological_build_order(graph);
    let symbol_table = build_symbol_table(&build_order, modules);
    let specialisation_requests = collect_specialisation_requests(specialisation_requests);

    Ok(AnalysedProgram {
        build_order,
        symbol_table,
        specialisation_requests,
    })
}

//! In-memory `TypeChecker`/`Parser` stand-ins for tests.
//!
//! No real TS checker is available inside this workspace (spec §1: it is
//! consumed as an external service), so fixtures that need one build a
//! `StubChecker` by hand, keyed by `(file, node_id)`, mirroring the
//! `TypeChecker` trait's query shape exactly.

use std::collections::HashMap;

use crate::ast::{NodeId, TsSourceFile, TsType};
use crate::checker::{ResolvedCallSignature, SymbolRef, TypeChecker};

#[derive(Default)]
pub struct StubChecker {
    pub types: HashMap<(String, NodeId), TsType>,
    pub symbols: HashMap<(String, NodeId), SymbolRef>,
    pub call_signatures: HashMap<(String, NodeId), ResolvedCallSignature>,
    pub declared_types: HashMap<SymbolRef, TsType>,
    pub narrowed: HashMap<(String, NodeId), TsType>,
}

impl StubChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, file: &str, node: NodeId, ty: TsType) -> Self {
        self.types.insert((file.to_string(), node), ty);
        self
    }
}

impl TypeChecker for StubChecker {
    fn type_of(&self, file: &str, node: NodeId) -> TsType {
        self.types
            .get(&(file.to_string(), node))
            .cloned()
            .unwrap_or(TsType::Any)
    }

    fn symbol_of(&self, file: &str, node: NodeId) -> Option<SymbolRef> {
        self.symbols.get(&(file.to_string(), node)).cloned()
    }

    fn resolved_call_signature_of(&self, file: &str, node: NodeId) -> Option<ResolvedCallSignature> {
        self.call_signatures.get(&(file.to_string(), node)).cloned()
    }

    fn declared_type_of_symbol(&self, symbol: &SymbolRef) -> TsType {
        self.declared_types
            .get(symbol)
            .cloned()
            .unwrap_or(TsType::Any)
    }

    fn flow_narrowed_type_at(&self, file: &str, node: NodeId) -> Option<TsType> {
        self.narrowed.get(&(file.to_string(), node)).cloned()
    }
}

/// Builds a single-file `TsSourceFile` in-process for a fixture, skipping
/// the external parser entirely.
pub fn single_file(file_path: &str, source: TsSourceFile) -> (String, TsSourceFile) {
    (file_path.to_string(), source)
}

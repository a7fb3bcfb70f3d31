//! `BuildContext`: per-module accumulator threaded through type/expr/stmt
//! lowering (spec §4.6).

use tsonic_common::ordered::OrderedMap;
use tsonic_ir::specialisation::SpecialisationRequest;
use tsonic_ir::types::SynthesisedRecord;
use tsonic_program::Program;
use tsonic_registries::{BindingRegistry, MetadataRegistry};

pub struct BuildContext<'a> {
    pub program: &'a Program<'a>,
    pub file_path: String,
    generic_scope: Vec<Vec<String>>,
    /// Anonymous object-literal types hoisted so far, keyed by canonical
    /// shape key to keep mangled names stable within a module.
    synthesised: OrderedMap<String, SynthesisedRecord>,
    next_record_id: u32,
    specialisation_requests: Vec<SpecialisationRequest>,
}

impl<'a> BuildContext<'a> {
    pub fn new(program: &'a Program<'a>, file_path: String) -> Self {
        BuildContext {
            program,
            file_path,
            generic_scope: Vec::new(),
            synthesised: OrderedMap::new(),
            next_record_id: 0,
            specialisation_requests: Vec::new(),
        }
    }

    pub fn bindings(&self) -> &BindingRegistry {
        &self.program.bindings
    }

    pub fn metadata(&self) -> &MetadataRegistry {
        &self.program.metadata
    }

    pub fn push_generic_scope(&mut self, names: Vec<String>) {
        self.generic_scope.push(names);
    }

    pub fn push_generic_parameter(&mut self, name: String) {
        match self.generic_scope.last_mut() {
            Some(top) => top.push(name),
            None => self.generic_scope.push(vec![name]),
        }
    }

    pub fn pop_generic_scope(&mut self) {
        self.generic_scope.pop();
    }

    pub fn is_generic_parameter(&self, name: &str) -> bool {
        self.generic_scope.iter().any(|scope| scope.iter().any(|n| n == name))
    }

    /// Resolve a bare type name to its CLR-qualified form via the binding
    /// registry, if bound; `None` means it is a local declaration.
    pub fn resolve_clr_type(&self, name: &str) -> Option<String> {
        self.program
            .bindings
            .lookup_type(name)
            .map(|e| e.clr_qualified_type.clone())
    }

    /// Register a synthesised record for an anonymous object-literal type,
    /// returning its mangled name (spec §4.6 "Objects and interfaces").
    pub fn hoist_record(&mut self, canonical_key: String, members: Vec<tsonic_ir::types::ObjectTypeMember>) -> String {
        if let Some(existing) = self.synthesised.get(&canonical_key) {
            return existing.mangled_name.clone();
        }
        let mangled_name = format!("AnonymousRecord{}", self.next_record_id);
        self.next_record_id += 1;
        self.synthesised.insert(
            canonical_key,
            SynthesisedRecord {
                mangled_name: mangled_name.clone(),
                members,
            },
        );
        mangled_name
    }

    pub fn push_specialisation_request(&mut self, request: SpecialisationRequest) {
        self.specialisation_requests.push(request);
    }

    /// Consume the context, returning the module's hoisted synthesised
    /// records and collected specialisation requests.
    pub fn finish(self) -> (Vec<SynthesisedRecord>, Vec<SpecialisationRequest>) {
        (
            self.synthesised.into_values().collect(),
            self.specialisation_requests,
        )
    }
}

/// Builds an empty `Program` backed by the given checker, for tests that
/// need a `BuildContext` but have no real loaded project.
#[cfg(test)]
pub fn test_program(checker: &tsonic_program::testing::StubChecker) -> Program<'_> {
    Program {
        config: tsonic_config::ResolvedConfig {
            root_namespace: "R".to_string(),
            entry_point: None,
            source_root: std::path::PathBuf::from("/proj/src"),
            output_directory: std::path::PathBuf::from("/proj/out"),
            output_name: None,
            mode: tsonic_common::Mode::Dotnet,
            target_framework_moniker: "net9.0".to_string(),
            type_roots: vec![],
            package_references: vec![],
            library_references: vec![],
            framework_references: vec![],
        },
        sources: OrderedMap::new(),
        bindings: BindingRegistry::new(),
        metadata: MetadataRegistry::new(),
        checker,
    }
}

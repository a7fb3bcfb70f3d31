//! Global symbol-table construction (spec §4.7: "for each module, extract
//! exports; global index maps name -> list of owning modules").

use tsonic_common::ordered::OrderedMap;
use tsonic_ir::module::{ExportedSymbolKind, IrModule};

#[derive(Clone, Debug, PartialEq)]
pub struct ExportLocation {
    pub module: String,
    pub kind: ExportedSymbolKind,
}

/// Immutable once constructed (spec §4.7 "all structures are immutable
/// after construction").
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    exports_by_name: OrderedMap<String, Vec<ExportLocation>>,
}

impl SymbolTable {
    pub fn owners_of(&self, name: &str) -> &[ExportLocation] {
        self.exports_by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_ambiguous(&self, name: &str) -> bool {
        self.owners_of(name).len() > 1
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.exports_by_name.keys().map(String::as_str)
    }
}

/// Build the symbol table by walking modules in build order, so that the
/// per-name owner lists are themselves deterministic (spec §5 determinism).
pub fn build_symbol_table(build_order: &[String], modules: &OrderedMap<String, IrModule>) -> SymbolTable {
    let mut exports_by_name: OrderedMap<String, Vec<ExportLocation>> = OrderedMap::new();
    for file_path in build_order {
        let Some(module) = modules.get(file_path) else {
            continue;
        };
        for export in &module.exports {
            exports_by_name.entry(export.name.clone()).or_default().push(ExportLocation {
                module: file_path.clone(),
                kind: export.kind.clone(),
            });
        }
    }
    SymbolTable { exports_by_name }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsonic_ir::module::ExportedSymbol;

    fn module(file_path: &str, exports: Vec<(&str, ExportedSymbolKind)>) -> IrModule {
        IrModule {
            file_path: file_path.to_string(),
            namespace: "R".to_string(),
            container_class_name: "C".to_string(),
            is_static_container: true,
            imports: vec![],
            body: vec![],
            exports: exports
                .into_iter()
                .map(|(name, kind)| ExportedSymbol { name: name.to_string(), kind })
                .collect(),
        }
    }

    #[test]
    fn indexes_exports_by_name_across_modules() {
        let mut modules = OrderedMap::new();
        modules.insert("/a.ts".to_string(), module("/a.ts", vec![("widget", ExportedSymbolKind::Class)]));
        modules.insert("/b.ts".to_string(), module("/b.ts", vec![("widget", ExportedSymbolKind::Function)]));
        let build_order = vec!["/a.ts".to_string(), "/b.ts".to_string()];

        let table = build_symbol_table(&build_order, &modules);
        assert!(table.is_ambiguous("widget"));
        assert_eq!(table.owners_of("widget").len(), 2);
        assert_eq!(table.owners_of("widget")[0].module, "/a.ts");
        assert!(table.owners_of("missing").is_empty());
    }
}

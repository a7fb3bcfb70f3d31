//! `IrModule` — one per source file (spec §3 IR).

use crate::stmt::IrStmt;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExportedSymbolKind {
    Function,
    Class,
    Interface,
    Enum,
    TypeAlias,
    Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExportedSymbol {
    pub name: String,
    pub kind: ExportedSymbolKind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IrImport {
    /// The specifier as written, preserved for diagnostics.
    pub specifier: String,
    /// Resolved local module path, if the import targets a local module.
    pub resolved_local_path: Option<String>,
    pub named: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IrModule {
    pub file_path: String,
    pub namespace: String,
    pub container_class_name: String,
    pub is_static_container: bool,
    pub imports: Vec<IrImport>,
    pub body: Vec<IrStmt>,
    pub exports: Vec<ExportedSymbol>,
}

impl IrModule {
    pub fn entry_main_signature(&self) -> Option<EntryMainSignature> {
        for stmt in &self.body {
            if let crate::stmt::IrStatementKind::FunctionDeclaration(f) = &stmt.kind {
                if f.name == "main" && f.is_exported {
                    return Some(EntryMainSignature {
                        is_async: f.is_async,
                    });
                }
            }
        }
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryMainSignature {
    pub is_async: bool,
}

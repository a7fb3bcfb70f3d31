//! Finds every generic top-level declaration across the program (spec
//! §4.8: "the set of generic declarations").
//!
//! A declaration is identified by its bare name. Tsonic source modules
//! expose at most one top-level declaration per exported name within the
//! module that defines it, and specialisation requests are recorded by the
//! builder using that same bare name (spec §4.6 "Calls"), so a flat
//! `name -> declaration` index is sufficient without qualifying by module.

use tsonic_common::ordered::OrderedMap;
use tsonic_ir::module::IrModule;
use tsonic_ir::stmt::{ClassDecl, FunctionDecl, IrStatementKind};

#[derive(Clone, Debug)]
pub enum GenericDeclarationKind {
    Function(FunctionDecl),
    Class(ClassDecl),
}

impl GenericDeclarationKind {
    pub fn type_parameters(&self) -> &[tsonic_ir::types::TypeParameter] {
        match self {
            GenericDeclarationKind::Function(f) => &f.type_parameters,
            GenericDeclarationKind::Class(c) => &c.type_parameters,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GenericDeclaration {
    pub owning_module: String,
    pub kind: GenericDeclarationKind,
}

/// `name -> GenericDeclaration`, built by scanning every module's top-level
/// statements for a function or class carrying type parameters.
pub fn collect_generic_declarations(modules: &OrderedMap<String, IrModule>) -> OrderedMap<String, GenericDeclaration> {
    let mut out = OrderedMap::new();
    for (file_path, module) in modules {
        for stmt in &module.body {
            match &stmt.kind {
                IrStatementKind::FunctionDeclaration(f) if !f.type_parameters.is_empty() => {
                    out.insert(
                        f.name.clone(),
                        GenericDeclaration {
                            owning_module: file_path.clone(),
                            kind: GenericDeclarationKind::Function((**f).clone()),
                        },
                    );
                }
                IrStatementKind::ClassDeclaration(c) if !c.type_parameters.is_empty() => {
                    out.insert(
                        c.name.clone(),
                        GenericDeclaration {
                            owning_module: file_path.clone(),
                            kind: GenericDeclarationKind::Class((**c).clone()),
                        },
                    );
                }
                _ => {}
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsonic_common::Span;
    use tsonic_ir::types::{IrType, TypeParameter};

    #[test]
    fn finds_generic_function_but_not_plain_one() {
        let mut modules = OrderedMap::new();
        modules.insert(
            "/a.ts".to_string(),
            IrModule {
                file_path: "/a.ts".to_string(),
                namespace: "R".to_string(),
                container_class_name: "C".to_string(),
                is_static_container: true,
                imports: vec![],
                body: vec![
                    tsonic_ir::stmt::IrStmt {
                        span: Span::dummy(),
                        kind: IrStatementKind::FunctionDeclaration(Box::new(FunctionDecl {
                            name: "identity".to_string(),
                            type_parameters: vec![TypeParameter { name: "T".to_string(), constraint: None }],
                            parameters: vec![],
                            return_type: IrType::GenericParameter("T".to_string()),
                            body: vec![],
                            is_async: false,
                            generator: None,
                            is_exported: true,
                        })),
                    },
                    tsonic_ir::stmt::IrStmt {
                        span: Span::dummy(),
                        kind: IrStatementKind::FunctionDeclaration(Box::new(FunctionDecl {
                            name: "plain".to_string(),
                            type_parameters: vec![],
                            parameters: vec![],
                            return_type: IrType::Void,
                            body: vec![],
                            is_async: false,
                            generator: None,
                            is_exported: true,
                        })),
                    },
                ],
                exports: vec![],
            },
        );
        let found = collect_generic_declarations(&modules);
        assert!(found.contains_key("identity"));
        assert!(!found.contains_key("plain"));
        assert_eq!(found.get("identity").unwrap().owning_module, "/a.ts");
    }
}

//! Validator (C5): ESM rules, feature-subset enforcement, and
//! name-collision/duplicate checks over the validated graph and AST.
//!
//! All validation is pure; no AST is mutated (spec §4.5). Errors are
//! collected across every module before returning, so a single run surfaces
//! as much feedback as possible (spec §7).

mod marker;
mod rules;

pub use marker::VALUE_TYPE_MARKER;

use tsonic_common::Diagnostic;
use tsonic_program::Program;
use tsonic_resolver::ModuleGraph;

pub fn validate(program: &Program, graph: &ModuleGraph) -> Result<(), Vec<Diagnostic>> {
    let mut out = Vec::new();

    for path in graph.nodes.keys() {
        if let Some(source) = program.source(path) {
            rules::validate_source(source, &mut out);
            validate_imports(program, path, source, &mut out);
        }
    }

    if tsonic_common::has_errors(&out) {
        Err(out)
    } else {
        Ok(())
    }
}

fn validate_imports(
    program: &Program,
    file_path: &str,
    source: &tsonic_program::TsSourceFile,
    out: &mut Vec<Diagnostic>,
) {
    let file = std::path::Path::new(file_path);
    for import in &source.imports {
        if let Err(d) = tsonic_resolver::classify_import(&import.specifier, file, program) {
            out.push(d.at(file_path.to_string(), import.span));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsonic_common::{Span, diagnostics};
    use tsonic_program::ast::{TsStatement, TsStatementKind};

    #[test]
    fn export_star_is_rejected() {
        let source = tsonic_program::TsSourceFile {
            file_path: "a.ts".to_string(),
            imports: vec![],
            statements: vec![TsStatement {
                node_id: 0,
                span: Span::new(0, 1),
                kind: TsStatementKind::ExportStar,
            }],
        };
        let mut out = Vec::new();
        rules::validate_source(&source, &mut out);
        assert!(out.iter().any(|d| d.code == diagnostics::E3001_EXPORT_STAR));
    }

    #[test]
    fn marker_interface_is_exempt_from_7301() {
        use tsonic_program::ast::{ClassNode, TsType};
        let class = ClassNode {
            node_id: 0,
            name: "Point".to_string(),
            type_parameters: vec![],
            extends: None,
            implements: vec![TsType::TypeRef {
                name: VALUE_TYPE_MARKER.to_string(),
                type_arguments: vec![],
            }],
            members: vec![],
            decorators: vec![],
            is_exported: true,
        };
        let source = tsonic_program::TsSourceFile {
            file_path: "a.ts".to_string(),
            imports: vec![],
            statements: vec![TsStatement {
                node_id: 0,
                span: Span::new(0, 1),
                kind: TsStatementKind::ClassDeclaration(class),
            }],
        };
        let mut out = Vec::new();
        rules::validate_source(&source, &mut out);
        assert!(out.is_empty());
    }

    /// Spec §8 scenario S5: `function f<T>(x: T | null): T { ... }` — the
    /// offending `T | null` is the *parameter*, not the return type.
    #[test]
    fn unconstrained_generic_parameter_unioned_with_null_is_rejected() {
        use tsonic_program::ast::{FunctionNode, ParamNode, TsType, TypeParamNode};
        let f = FunctionNode {
            node_id: 0,
            name: "f".to_string(),
            type_parameters: vec![TypeParamNode { name: "T".to_string(), constraint: None }],
            parameters: vec![ParamNode {
                name: "x".to_string(),
                declared_type: Some(TsType::Union(vec![TsType::TypeRef { name: "T".to_string(), type_arguments: vec![] }, TsType::Null])),
                optional: false,
                default: None,
            }],
            return_type: Some(TsType::TypeRef { name: "T".to_string(), type_arguments: vec![] }),
            body: vec![],
            is_async: false,
            is_generator: false,
            decorators: vec![],
            is_exported: true,
        };
        let source = tsonic_program::TsSourceFile {
            file_path: "a.ts".to_string(),
            imports: vec![],
            statements: vec![TsStatement {
                node_id: 0,
                span: Span::new(0, 1),
                kind: TsStatementKind::FunctionDeclaration(f),
            }],
        };
        let mut out = Vec::new();
        rules::validate_source(&source, &mut out);
        assert!(out.iter().any(|d| d.code == diagnostics::E7415_NULLABLE_UNCONSTRAINED_GENERIC));
    }

    #[test]
    fn bare_string_literal_return_type_is_rejected() {
        use tsonic_program::ast::{FunctionNode, TsType};
        let f = FunctionNode {
            node_id: 0,
            name: "f".to_string(),
            type_parameters: vec![],
            parameters: vec![],
            return_type: Some(TsType::StringLiteral("green".to_string())),
            body: vec![],
            is_async: false,
            is_generator: false,
            decorators: vec![],
            is_exported: true,
        };
        let source = tsonic_program::TsSourceFile {
            file_path: "a.ts".to_string(),
            imports: vec![],
            statements: vec![TsStatement {
                node_id: 0,
                span: Span::new(0, 1),
                kind: TsStatementKind::FunctionDeclaration(f),
            }],
        };
        let mut out = Vec::new();
        rules::validate_source(&source, &mut out);
        assert!(out.iter().any(|d| d.code == diagnostics::E2001_UNSUPPORTED_LITERAL_TYPE));
    }
}

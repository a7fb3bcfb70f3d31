//! Per-module orchestration (spec §4.6: "walks each validated TS source
//! file in source order and produces an `IrModule`").

use std::path::Path;

use tsonic_common::Diagnostic;
use tsonic_ir::module::{ExportedSymbol, ExportedSymbolKind, IrImport, IrModule};
use tsonic_ir::types::SynthesisedRecord;
use tsonic_program::{Program, TsSourceFile};
use tsonic_resolver::{ModuleGraph, classify_import};

use crate::ctx::BuildContext;
use crate::lower_stmt::lower_statement;

pub struct BuiltModule {
    pub module: IrModule,
    pub synthesised_records: Vec<SynthesisedRecord>,
    pub specialisation_requests: Vec<tsonic_ir::specialisation::SpecialisationRequest>,
}

pub fn build_module(program: &Program, graph: &ModuleGraph, file_path: &str) -> Result<BuiltModule, Vec<Diagnostic>> {
    let source = program.source(file_path).ok_or_else(|| {
        vec![Diagnostic::error(
            tsonic_common::diagnostics::E1004_UNKNOWN_MODULE,
            format!("`{file_path}` is not a known source file"),
        )]
    })?;

    let resolved = graph.nodes.get(file_path).ok_or_else(|| {
        vec![Diagnostic::error(
            tsonic_common::diagnostics::E1004_UNKNOWN_MODULE,
            format!("`{file_path}` is not part of the module graph"),
        )]
    })?;
    let local = resolved.local.as_ref().expect("local modules always carry local info");

    let mut ctx = BuildContext::new(program, file_path.to_string());
    let mut errors = Vec::new();
    let mut body = Vec::with_capacity(source.statements.len());
    for stmt in &source.statements {
        match lower_statement(stmt, local.is_static_container, &mut ctx) {
            Ok(s) => body.push(s),
            Err(d) => errors.push(d.at(file_path.to_string(), stmt.span)),
        }
    }

    let imports = lower_imports(program, file_path, source, &mut errors);
    let exports = collect_exports(source);

    if tsonic_common::has_errors(&errors) {
        return Err(errors);
    }

    let (synthesised_records, specialisation_requests) = ctx.finish();

    Ok(BuiltModule {
        module: IrModule {
            file_path: file_path.to_string(),
            namespace: local.namespace.clone(),
            container_class_name: local.container_class_name.clone(),
            is_static_container: local.is_static_container,
            imports,
            body,
            exports,
        },
        synthesised_records,
        specialisation_requests,
    })
}

fn lower_imports(
    program: &Program,
    file_path: &str,
    source: &TsSourceFile,
    errors: &mut Vec<Diagnostic>,
) -> Vec<IrImport> {
    let file = Path::new(file_path);
    let mut out = Vec::with_capacity(source.imports.len());
    for import in &source.imports {
        match classify_import(&import.specifier, file, program) {
            Ok(resolved) => {
                let resolved_local_path = matches!(resolved.resolved_kind, tsonic_resolver::ResolvedKind::LocalSource)
                    .then(|| resolved.resolved_path_or_qname.clone());
                out.push(IrImport {
                    specifier: import.specifier.clone(),
                    resolved_local_path,
                    named: import.named.clone(),
                });
            }
            Err(d) => errors.push(d.at(file_path.to_string(), import.span)),
        }
    }
    out
}

fn collect_exports(source: &TsSourceFile) -> Vec<ExportedSymbol> {
    use tsonic_program::ast::TsStatementKind;
    let mut out = Vec::new();
    for stmt in &source.statements {
        let (name, kind) = match &stmt.kind {
            TsStatementKind::FunctionDeclaration(f) if f.is_exported => (f.name.clone(), ExportedSymbolKind::Function),
            TsStatementKind::ClassDeclaration(c) if c.is_exported => (c.name.clone(), ExportedSymbolKind::Class),
            TsStatementKind::InterfaceDeclaration(i) if i.is_exported => (i.name.clone(), ExportedSymbolKind::Interface),
            TsStatementKind::EnumDeclaration(e) if e.is_exported => (e.name.clone(), ExportedSymbolKind::Enum),
            TsStatementKind::TypeAliasDeclaration { name, is_exported: true, .. } => {
                (name.clone(), ExportedSymbolKind::TypeAlias)
            }
            TsStatementKind::VariableDeclaration { name, is_exported: true, .. } => (name.clone(), ExportedSymbolKind::Value),
            _ => continue,
        };
        out.push(ExportedSymbol { name, kind });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tsonic_common::Span;
    use tsonic_config::ResolvedConfig;
    use tsonic_program::ast::{FunctionNode, TsStatement, TsStatementKind};
    use tsonic_program::testing::StubChecker;
    use tsonic_registries::{BindingRegistry, MetadataRegistry};

    fn make_program<'a>(checker: &'a StubChecker, path: &str, source: TsSourceFile) -> Program<'a> {
        let mut sources = tsonic_common::ordered::OrderedMap::new();
        sources.insert(path.to_string(), source);
        Program {
            config: ResolvedConfig {
                root_namespace: "R".to_string(),
                entry_point: None,
                source_root: PathBuf::from("/proj/src"),
                output_directory: PathBuf::from("/proj/out"),
                output_name: None,
                mode: tsonic_common::Mode::Dotnet,
                target_framework_moniker: "net9.0".to_string(),
                type_roots: vec![],
                package_references: vec![],
                library_references: vec![],
                framework_references: vec![],
            },
            sources,
            bindings: BindingRegistry::new(),
            metadata: MetadataRegistry::new(),
            checker,
        }
    }

    #[test]
    fn builds_a_simple_exported_function_module() {
        let checker = StubChecker::new();
        let path = "/proj/src/main.ts";
        let source = TsSourceFile {
            file_path: path.to_string(),
            imports: vec![],
            statements: vec![TsStatement {
                node_id: 0,
                span: Span::new(0, 1),
                kind: TsStatementKind::FunctionDeclaration(FunctionNode {
                    node_id: 1,
                    name: "main".to_string(),
                    type_parameters: vec![],
                    parameters: vec![],
                    return_type: None,
                    body: vec![],
                    is_async: false,
                    is_generator: false,
                    decorators: vec![],
                    is_exported: true,
                }),
            }],
        };
        let program = make_program(&checker, path, source);
        let mut graph = ModuleGraph::default();
        graph.nodes.insert(
            path.to_string(),
            tsonic_resolver::ResolvedModule {
                specifier_as_written: path.to_string(),
                resolved_kind: tsonic_resolver::ResolvedKind::LocalSource,
                resolved_path_or_qname: path.to_string(),
                local: Some(tsonic_resolver::LocalModuleInfo {
                    namespace: "R".to_string(),
                    container_class_name: "main".to_string(),
                    is_static_container: true,
                }),
            },
        );
        let built = build_module(&program, &graph, path).unwrap();
        assert_eq!(built.module.exports.len(), 1);
        assert_eq!(built.module.exports[0].name, "main");
        assert!(built.module.entry_main_signature().is_some());
    }
}

//! Module graph construction: DFS from the entry point over local imports
//! only, with circular-dependency detection (spec §4.4, property P3).

use std::path::{Path, PathBuf};

use tsonic_common::ordered::{OrderedMap, OrderedSet};
use tsonic_common::{Diagnostic, diagnostics};
use tsonic_program::Program;

use crate::classify::{ResolvedKind, ResolvedModule, classify_import};
use crate::namespace::{classify_container, derive_container_class_name, derive_namespace};

#[derive(Debug, Default)]
pub struct ModuleGraph {
    /// Local modules keyed by resolved absolute path.
    pub nodes: OrderedMap<String, ResolvedModule>,
    pub edges: OrderedMap<String, Vec<String>>,
    pub reverse_edges: OrderedMap<String, Vec<String>>,
    pub entry_points: Vec<String>,
}

pub fn build_module_graph(
    program: &Program,
    entry_point: &Path,
) -> Result<ModuleGraph, Vec<Diagnostic>> {
    let mut graph = ModuleGraph::default();
    let entry_key = entry_point.display().to_string();
    graph.entry_points.push(entry_key.clone());

    let mut errors = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut visited: OrderedSet<String> = OrderedSet::new();

    dfs(
        program,
        entry_point,
        &mut graph,
        &mut stack,
        &mut visited,
        &mut errors,
    );

    if tsonic_common::has_errors(&errors) {
        Err(errors)
    } else {
        Ok(graph)
    }
}

fn dfs(
    program: &Program,
    file_path: &Path,
    graph: &mut ModuleGraph,
    stack: &mut Vec<String>,
    visited: &mut OrderedSet<String>,
    errors: &mut Vec<Diagnostic>,
) {
    let key = file_path.display().to_string();

    if stack.contains(&key) {
        let cycle_start = stack.iter().position(|p| p == &key).unwrap();
        let mut cycle: Vec<String> = stack[cycle_start..].to_vec();
        cycle.push(key.clone());
        errors.push(
            Diagnostic::error(
                diagnostics::E1006_CIRCULAR_DEPENDENCY,
                format!("circular dependency: {}", cycle.join(" -> ")),
            )
        );
        return;
    }

    if visited.contains(&key) {
        return;
    }
    visited.insert(key.clone());

    let Some(source) = program.source(&key) else {
        errors.push(Diagnostic::error(
            diagnostics::E1004_UNKNOWN_MODULE,
            format!("entry point `{key}` is not a known source file"),
        ));
        return;
    };

    let container_class_name = derive_container_class_name(file_path);
    let namespace = derive_namespace(&program.config.source_root, file_path, &program.config.root_namespace);
    let is_static_container = match classify_container(source, &container_class_name) {
        Ok(v) => v,
        Err(d) => {
            errors.push(d);
            false
        }
    };

    graph.nodes.insert(
        key.clone(),
        ResolvedModule {
            specifier_as_written: key.clone(),
            resolved_kind: ResolvedKind::LocalSource,
            resolved_path_or_qname: key.clone(),
            local: Some(crate::classify::LocalModuleInfo {
                namespace,
                container_class_name,
                is_static_container,
            }),
        },
    );

    stack.push(key.clone());
    let mut local_targets = Vec::new();
    for import in &source.imports {
        match classify_import(&import.specifier, file_path, program) {
            Ok(resolved) if resolved.resolved_kind == ResolvedKind::LocalSource => {
                let target_path = PathBuf::from(&resolved.resolved_path_or_qname);
                local_targets.push(resolved.resolved_path_or_qname.clone());
                dfs(program, &target_path, graph, stack, visited, errors);
            }
            Ok(_) => {}
            Err(d) => errors.push(d.at(key.clone(), import.span)),
        }
    }
    stack.pop();

    for target in &local_targets {
        graph
            .reverse_edges
            .entry(target.clone())
            .or_default()
            .push(key.clone());
    }
    graph.edges.insert(key, local_targets);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsonic_common::Span;
    use tsonic_config::ResolvedConfig;
    use tsonic_program::ast::ImportDecl;
    use tsonic_program::testing::StubChecker;

    fn make_program<'a>(
        checker: &'a StubChecker,
        files: Vec<(&str, Vec<(&str, &str)>)>,
    ) -> Program<'a> {
        let mut sources = tsonic_common::ordered::OrderedMap::new();
        for (path, imports) in files {
            let import_decls: Vec<ImportDecl> = imports
                .iter()
                .map(|(spec, _)| ImportDecl {
                    node_id: 0,
                    span: Span::dummy(),
                    specifier: spec.to_string(),
                    named: vec![],
                    is_type_only: false,
                })
                .collect();
            sources.insert(
                path.to_string(),
                tsonic_program::TsSourceFile {
                    file_path: path.to_string(),
                    imports: import_decls,
                    statements: vec![],
                },
            );
        }
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
            bindings: Default::default(),
            metadata: Default::default(),
            checker,
        }
    }

    #[test]
    fn detects_three_way_cycle() {
        let checker = StubChecker::new();
        let program = make_program(
            &checker,
            vec![
                ("/proj/src/A.ts", vec![("./B.ts", "")]),
                ("/proj/src/B.ts", vec![("./C.ts", "")]),
                ("/proj/src/C.ts", vec![("./A.ts", "")]),
            ],
        );
        let result = build_module_graph(&program, Path::new("/proj/src/A.ts"));
        let errs = result.unwrap_err();
        assert!(errs.iter().any(|d| d.code == diagnostics::E1006_CIRCULAR_DEPENDENCY));
    }

    #[test]
    fn acyclic_graph_builds() {
        let checker = StubChecker::new();
        let program = make_program(
            &checker,
            vec![
                ("/proj/src/A.ts", vec![("./B.ts", "")]),
                ("/proj/src/B.ts", vec![]),
            ],
        );
        let graph = build_module_graph(&program, Path::new("/proj/src/A.ts")).unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.get("/proj/src/A.ts").unwrap(), &vec!["/proj/src/B.ts".to_string()]);
    }
}

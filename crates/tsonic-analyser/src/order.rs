//! Build-order derivation (spec §4.7: "topological sort of the module
//! graph -> deterministic build order").

use tsonic_common::ordered::OrderedSet;
use tsonic_common::{Diagnostic, diagnostics};
use tsonic_resolver::ModuleGraph;

/// Dependency-first build order: a module's imports always precede it.
///
/// Walks a post-order DFS from the graph's entry points, following `edges`
/// in the order they were recorded (source import order), so the result is
/// fully determined by the already-deterministic module graph. Any module
/// not reachable from an entry point (shouldn't occur once phase 4 has
/// succeeded) is appended afterwards in sorted-path order so the result is
/// still total and deterministic.
pub fn topological_build_order(graph: &ModuleGraph) -> Vec<String> {
    let mut order = Vec::with_capacity(graph.nodes.len());
    let mut visited: OrderedSet<String> = OrderedSet::new();

    for entry in &graph.entry_points {
        visit(entry, graph, &mut visited, &mut order);
    }

    let mut stragglers: Vec<&String> = graph.nodes.keys().filter(|k| !visited.contains(k.as_str())).collect();
    stragglers.sort();
    for k in stragglers {
        visit(k, graph, &mut visited, &mut order);
    }

    order
}

fn visit(node: &str, graph: &ModuleGraph, visited: &mut OrderedSet<String>, order: &mut Vec<String>) {
    if visited.contains(node) {
        return;
    }
    visited.insert(node.to_string());
    if let Some(targets) = graph.edges.get(node) {
        for target in targets {
            visit(target, graph, visited, order);
        }
    }
    order.push(node.to_string());
}

/// Cheap redundant cycle check (spec §4.7): the resolver already refuses to
/// build a graph with a back-edge, but the analyser re-verifies via Kahn's
/// algorithm before trusting the graph for build-order purposes.
pub fn check_acyclic(graph: &ModuleGraph) -> Result<(), Diagnostic> {
    let mut in_degree: std::collections::HashMap<&str, usize> =
        graph.nodes.keys().map(|k| (k.as_str(), 0)).collect();
    for targets in graph.edges.values() {
        for target in targets {
            if let Some(d) = in_degree.get_mut(target.as_str()) {
                *d += 1;
            }
        }
    }

    let mut queue: Vec<&str> = graph
        .nodes
        .keys()
        .map(String::as_str)
        .filter(|k| in_degree[k] == 0)
        .collect();
    queue.sort_unstable();
    let mut visited_count = 0usize;
    let mut i = 0;
    while i < queue.len() {
        let node = queue[i];
        i += 1;
        visited_count += 1;
        if let Some(targets) = graph.edges.get(node) {
            let mut newly_ready = Vec::new();
            for target in targets {
                if let Some(d) = in_degree.get_mut(target.as_str()) {
                    *d -= 1;
                    if *d == 0 {
                        newly_ready.push(target.as_str());
                    }
                }
            }
            newly_ready.sort_unstable();
            queue.extend(newly_ready);
        }
    }

    if visited_count < graph.nodes.len() {
        return Err(Diagnostic::error(
            diagnostics::E1006_CIRCULAR_DEPENDENCY,
            "module graph contains a circular dependency that survived resolution",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsonic_resolver::{LocalModuleInfo, ResolvedKind, ResolvedModule};

    fn node(graph: &mut ModuleGraph, path: &str, deps: &[&str]) {
        graph.nodes.insert(
            path.to_string(),
            ResolvedModule {
                specifier_as_written: path.to_string(),
                resolved_kind: ResolvedKind::LocalSource,
                resolved_path_or_qname: path.to_string(),
                local: Some(LocalModuleInfo {
                    namespace: "R".to_string(),
                    container_class_name: "C".to_string(),
                    is_static_container: true,
                }),
            },
        );
        graph.edges.insert(path.to_string(), deps.iter().map(|d| d.to_string()).collect());
    }

    #[test]
    fn dependencies_precede_dependents() {
        let mut graph = ModuleGraph::default();
        node(&mut graph, "/a.ts", &["/b.ts"]);
        node(&mut graph, "/b.ts", &["/c.ts"]);
        node(&mut graph, "/c.ts", &[]);
        graph.entry_points.push("/a.ts".to_string());

        assert!(check_acyclic(&graph).is_ok());
        let order = topological_build_order(&graph);
        assert_eq!(order, vec!["/c.ts".to_string(), "/b.ts".to_string(), "/a.ts".to_string()]);
    }

    #[test]
    fn diamond_dependency_orders_each_module_once() {
        let mut graph = ModuleGraph::default();
        node(&mut graph, "/a.ts", &["/b.ts", "/c.ts"]);
        node(&mut graph, "/b.ts", &["/d.ts"]);
        node(&mut graph, "/c.ts", &["/d.ts"]);
        node(&mut graph, "/d.ts", &[]);
        graph.entry_points.push("/a.ts".to_string());

        let order = topological_build_order(&graph);
        assert_eq!(order.len(), 4);
        assert_eq!(order.last(), Some(&"/a.ts".to_string()));
        let pos = |p: &str| order.iter().position(|x| x == p).unwrap();
        assert!(pos("/d.ts") < pos("/b.ts"));
        assert!(pos("/d.ts") < pos("/c.ts"));
    }

    #[test]
    fn detects_residual_cycle() {
        let mut graph = ModuleGraph::default();
        node(&mut graph, "/a.ts", &["/b.ts"]);
        node(&mut graph, "/b.ts", &["/a.ts"]);
        graph.entry_points.push("/a.ts".to_string());

        let err = check_acyclic(&graph).unwrap_err();
        assert_eq!(err.code, diagnostics::E1006_CIRCULAR_DEPENDENCY);
    }
}

//! Namespace and container-class-name derivation (spec §4.4, property P2).

use std::path::Path;

use tsonic_common::{Diagnostic, diagnostics};
use tsonic_program::ast::TsStatementKind;
use tsonic_program::TsSourceFile;

fn strip_segment_hyphens(segment: &str) -> String {
    segment.chars().filter(|c| *c != '-').collect()
}

/// Derive the C# namespace for a local module at `file_path`, relative to
/// `source_root`, joined to `root_namespace` (spec §4.4 "Namespace
/// derivation", property P2).
pub fn derive_namespace(source_root: &Path, file_path: &Path, root_namespace: &str) -> String {
    let rel = file_path.strip_prefix(source_root).unwrap_or(file_path);
    let mut segments: Vec<String> = rel
        .parent()
        .map(|p| {
            p.components()
                .map(|c| strip_segment_hyphens(&c.as_os_str().to_string_lossy()))
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();
    segments.retain(|s| !s.is_empty());
    if segments.is_empty() {
        root_namespace.to_string()
    } else {
        format!("{root_namespace}.{}", segments.join("."))
    }
}

/// Derive the container-class name: the file's basename without extension,
/// hyphens removed (spec §4.4 "Container-class-name derivation").
pub fn derive_container_class_name(file_path: &Path) -> String {
    let stem = file_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    strip_segment_hyphens(&stem)
}

/// A module is a static container iff it has a top-level function/value
/// export and no class declaration with the container's name (spec §4.4).
/// A top-level exported declaration whose name equals the container name
/// that is *not* a class is a name collision (2003).
pub fn classify_container(
    source: &TsSourceFile,
    container_class_name: &str,
) -> Result<bool, Diagnostic> {
    let mut has_function_or_value_export = false;
    let mut has_matching_class = false;
    for stmt in &source.statements {
        match &stmt.kind {
            TsStatementKind::ClassDeclaration(class) => {
                if class.name == container_class_name {
                    has_matching_class = true;
                }
            }
            TsStatementKind::FunctionDeclaration(f) if f.is_exported => {
                if f.name == container_class_name {
                    return Err(Diagnostic::error(
                        diagnostics::E2003_CONTAINER_NAME_COLLISION,
                        format!(
                            "exported declaration `{}` collides with the container class name derived from this file",
                            f.name
                        ),
                    )
                    .at(source.file_path.clone(), stmt.span));
                }
                has_function_or_value_export = true;
            }
            TsStatementKind::VariableDeclaration { name, is_exported, .. } if *is_exported => {
                if name == container_class_name {
                    return Err(Diagnostic::error(
                        diagnostics::E2003_CONTAINER_NAME_COLLISION,
                        format!(
                            "exported declaration `{name}` collides with the container class name derived from this file"
                        ),
                    )
                    .at(source.file_path.clone(), stmt.span));
                }
                has_function_or_value_export = true;
            }
            _ => {}
        }
    }
    Ok(has_function_or_value_export && !has_matching_class)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn property_p2_namespace_derivation() {
        let root = PathBuf::from("/proj/src");
        let cases = [
            ("src/main.ts", "R", "main"),
            ("src/models/User.ts", "R.models", "User"),
            ("src/my-feature/x.ts", "R.myfeature", "x"),
            ("src/api/v1/handlers.ts", "R.api.v1", "handlers"),
        ];
        for (rel, expected_ns, expected_class) in cases {
            let full = PathBuf::from("/proj").join(rel);
            let ns = derive_namespace(&root, &full, "R");
            let class = derive_container_class_name(&full);
            assert_eq!(ns, expected_ns, "namespace for {rel}");
            assert_eq!(class, expected_class, "container class for {rel}");
        }
    }
}

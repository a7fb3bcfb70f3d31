//! Import classification (spec §4.4): the first rule that matches wins.

use std::path::{Path, PathBuf};

use tsonic_common::{Diagnostic, diagnostics};
use tsonic_program::Program;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedKind {
    LocalSource,
    DotnetNamespace,
    BoundExternal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalModuleInfo {
    pub namespace: String,
    pub container_class_name: String,
    pub is_static_container: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedModule {
    pub specifier_as_written: String,
    pub resolved_kind: ResolvedKind,
    /// The resolved absolute path for `LocalSource`, or the qualified
    /// namespace/type name otherwise.
    pub resolved_path_or_qname: String,
    pub local: Option<LocalModuleInfo>,
}

fn is_dotnet_namespace_specifier(specifier: &str) -> bool {
    let mut chars = specifier.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_uppercase() {
        return false;
    }
    let mut prev_dot = false;
    for c in specifier.chars() {
        if c == '.' {
            if prev_dot {
                return false;
            }
            prev_dot = true;
        } else if c.is_ascii_alphanumeric() {
            prev_dot = false;
        } else {
            return false;
        }
    }
    true
}

fn is_local_specifier(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/')
}

/// Resolve a single import specifier written in `containing_file` (spec
/// §4.4 rules 1-4).
pub fn classify_import(
    specifier: &str,
    containing_file: &Path,
    program: &Program,
) -> Result<ResolvedModule, Diagnostic> {
    if is_local_specifier(specifier) {
        return classify_local(specifier, containing_file, program);
    }
    if is_dotnet_namespace_specifier(specifier) {
        return Ok(ResolvedModule {
            specifier_as_written: specifier.to_string(),
            resolved_kind: ResolvedKind::DotnetNamespace,
            resolved_path_or_qname: specifier.to_string(),
            local: None,
        });
    }
    if let Some(entry) = program.bindings.lookup_bare(specifier) {
        return Ok(ResolvedModule {
            specifier_as_written: specifier.to_string(),
            resolved_kind: ResolvedKind::BoundExternal,
            resolved_path_or_qname: entry.clr_qualified_type.clone(),
            local: None,
        });
    }
    Err(Diagnostic::error(
        diagnostics::E1004_UNKNOWN_MODULE,
        format!("cannot resolve module `{specifier}`"),
    ))
}

fn classify_local(
    specifier: &str,
    containing_file: &Path,
    program: &Program,
) -> Result<ResolvedModule, Diagnostic> {
    if !specifier.ends_with(tsonic_common::common::TS_EXTENSION) {
        return Err(Diagnostic::error(
            diagnostics::E1001_MISSING_EXTENSION,
            format!("local import `{specifier}` must end in `.ts`"),
        ));
    }
    let containing_dir = containing_file.parent().unwrap_or_else(|| Path::new("."));
    let joined = containing_dir.join(specifier);
    let resolved = normalize(&joined);

    let source_root = normalize(&program.config.source_root);
    if !resolved.starts_with(&source_root) {
        return Err(Diagnostic::error(
            diagnostics::E1004_UNKNOWN_MODULE,
            format!("local import `{specifier}` resolves outside the source root"),
        ));
    }

    match case_exact_match(&resolved, program) {
        CaseMatch::Exact => Ok(ResolvedModule {
            specifier_as_written: specifier.to_string(),
            resolved_kind: ResolvedKind::LocalSource,
            resolved_path_or_qname: resolved.display().to_string(),
            local: None,
        }),
        CaseMatch::CaseMismatch => Err(Diagnostic::error(
            diagnostics::E1003_CASE_MISMATCH,
            format!("local import `{specifier}` does not match on-disk case exactly"),
        )),
        CaseMatch::NotFound => Err(Diagnostic::error(
            diagnostics::E1004_UNKNOWN_MODULE,
            format!("local import `{specifier}` does not resolve to a known source file"),
        )),
    }
}

enum CaseMatch {
    Exact,
    CaseMismatch,
    NotFound,
}

fn case_exact_match(resolved: &Path, program: &Program) -> CaseMatch {
    let resolved_str = resolved.display().to_string();
    if program.sources.contains_key(&resolved_str) {
        return CaseMatch::Exact;
    }
    let lower = resolved_str.to_lowercase();
    if program
        .sources
        .keys()
        .any(|k| k.to_lowercase() == lower)
    {
        return CaseMatch::CaseMismatch;
    }
    CaseMatch::NotFound
}

/// Lexical normalisation (no filesystem access): resolves `.` and `..`
/// segments. Stands in for `realpath` (spec §4.4) since fixtures construct
/// `Program`s without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            std::path::Component::ParentDir => {
                out.pop();
            }
            std::path::Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotnet_namespace_specifier_recognised() {
        assert!(is_dotnet_namespace_specifier("System.Collections"));
        assert!(!is_dotnet_namespace_specifier("system.Collections"));
        assert!(!is_dotnet_namespace_specifier("System..Collections"));
        assert!(!is_dotnet_namespace_specifier("System/Collections"));
    }

    #[test]
    fn local_specifier_detection() {
        assert!(is_local_specifier("./a"));
        assert!(is_local_specifier("../a"));
        assert!(is_local_specifier("/a"));
        assert!(!is_local_specifier("a"));
    }
}

//! Discovers and loads `bindings.json`/`metadata.json` manifests under the
//! configured type roots (spec §4.3, §6.1).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::binding::{BindingManifestV1, BindingManifestV2, BindingRegistry};
use crate::error::RegistryError;
use crate::metadata::{MetadataManifest, MetadataRegistry};

pub struct LoadedRegistries {
    pub bindings: BindingRegistry,
    pub metadata: MetadataRegistry,
}

/// Recursively scans `type_roots` for `bindings.json` and `metadata.json`
/// files and merges them into a single pair of registries.
///
/// Metadata is loaded first so binding-coverage verification (spec §3's
/// BindingEntry invariant) can run as each binding manifest is merged.
pub fn load_registries(type_roots: &[PathBuf]) -> Result<LoadedRegistries, RegistryError> {
    let mut metadata = MetadataRegistry::new();
    let mut metadata_paths = Vec::new();
    let mut binding_paths = Vec::new();
    for root in type_roots {
        discover(root, &mut metadata_paths, &mut binding_paths);
    }

    for path in &metadata_paths {
        debug!(path = %path.display(), "loading metadata manifest");
        let text = fs::read_to_string(path).map_err(|e| RegistryError::Malformed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let doc: MetadataManifest =
            serde_json::from_str(&text).map_err(|e| RegistryError::Malformed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        metadata.load(&doc)?;
    }

    let mut bindings = BindingRegistry::new();
    for path in &binding_paths {
        debug!(path = %path.display(), "loading binding manifest");
        let text = fs::read_to_string(path).map_err(|e| RegistryError::Malformed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let manifest_path = path.display().to_string();
        load_binding_manifest(&mut bindings, &text, &manifest_path)?;
    }

    verify_binding_coverage(&bindings, &metadata)?;

    Ok(LoadedRegistries { bindings, metadata })
}

/// Spec §3's `BindingEntry` invariant: "no entry points to a CLR name not
/// also declared in metadata." Checked once every manifest has been
/// merged, rather than per-manifest, since a binding can reference a
/// member declared in a metadata manifest loaded from a different file.
fn verify_binding_coverage(bindings: &BindingRegistry, metadata: &MetadataRegistry) -> Result<(), RegistryError> {
    for ((type_alias, member_alias), entry) in bindings.member_bindings() {
        if let Some(clr_member) = &entry.clr_member {
            let alias_path = format!("{type_alias}.{member_alias}");
            metadata.verify_binding_coverage(&alias_path, &entry.clr_qualified_type, clr_member)?;
        }
    }
    Ok(())
}

fn load_binding_manifest(
    bindings: &mut BindingRegistry,
    text: &str,
    manifest_path: &str,
) -> Result<(), RegistryError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| RegistryError::Malformed {
            path: manifest_path.to_string(),
            reason: e.to_string(),
        })?;
    if value.get("namespaces").is_some() {
        let doc: BindingManifestV2 =
            serde_json::from_value(value).map_err(|e| RegistryError::Malformed {
                path: manifest_path.to_string(),
                reason: e.to_string(),
            })?;
        bindings.load_v2(&doc, manifest_path)
    } else {
        let doc: BindingManifestV1 =
            serde_json::from_value(value).map_err(|e| RegistryError::Malformed {
                path: manifest_path.to_string(),
                reason: e.to_string(),
            })?;
        bindings.load_v1(&doc, manifest_path)
    }
}

fn discover(dir: &Path, metadata_paths: &mut Vec<PathBuf>, binding_paths: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    let mut entries: Vec<_> = entries.filter_map(Result::ok).collect();
    entries.sort_by_key(|e| e.file_name());
    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            discover(&path, metadata_paths, binding_paths);
        } else if path.file_name().and_then(|n| n.to_str()) == Some("metadata.json") {
            metadata_paths.push(path);
        } else if path.file_name().and_then(|n| n.to_str()) == Some("bindings.json") {
            binding_paths.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn discovers_and_merges_manifests() {
        let dir = tempfile_dir();
        fs::create_dir_all(dir.join("sub")).unwrap();
        write_file(
            &dir.join("metadata.json"),
            r#"{"types":{"System.Console":{"kind":"class","members":{"WriteLine(String)":{"kind":"method","isStatic":true}}}}}"#,
        );
        write_file(
            &dir.join("sub/bindings.json"),
            r#"{"namespaces":[{"alias":"System","assembly":"System.Runtime","clrNamespace":"System","types":[{"alias":"Console","clrType":"System.Console","members":[{"alias":"log","clrName":"WriteLine","kind":"method"}]}]}]}"#,
        );
        let loaded = load_registries(&[dir.clone()]).unwrap();
        assert!(loaded.bindings.lookup_type("System.Console").is_some());
        assert!(loaded.metadata.type_metadata("System.Console").is_some());
        let _ = fs::remove_dir_all(&dir);
    }

    /// A binding whose CLR member has no matching metadata entry fails the
    /// whole load with `E9003_UNBOUND_METADATA_REFERENCE` (spec §3's
    /// BindingEntry invariant).
    #[test]
    fn binding_to_an_undeclared_clr_member_is_rejected() {
        let dir = tempfile_dir();
        write_file(
            &dir.join("metadata.json"),
            r#"{"types":{"System.Console":{"kind":"class","members":{}}}}"#,
        );
        write_file(
            &dir.join("bindings.json"),
            r#"{"namespaces":[{"alias":"System","assembly":"System.Runtime","clrNamespace":"System","types":[{"alias":"Console","clrType":"System.Console","members":[{"alias":"log","clrName":"WriteLine","kind":"method"}]}]}]}"#,
        );
        let err = load_registries(&[dir.clone()]).unwrap_err();
        assert!(matches!(err, RegistryError::UnboundMetadataReference { .. }));
        assert_eq!(err.into_diagnostic().code, tsonic_common::diagnostics::E9003_UNBOUND_METADATA_REFERENCE);
        let _ = fs::remove_dir_all(&dir);
    }

    fn tempfile_dir() -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("tsonic-registries-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_file(path: &Path, contents: &str) {
        let mut f = fs::File::create(path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }
}

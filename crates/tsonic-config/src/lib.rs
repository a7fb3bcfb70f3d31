//! Workspace/project configuration (spec §6.1).
//!
//! Loading and shape validation only; CLI argument parsing and diagnostic
//! pretty-printing remain a host concern (out of scope, spec §1).

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use tsonic_common::Mode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file `{path}`: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file `{path}`: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("config `{path}` is missing required key `rootNamespace`")]
    MissingRootNamespace { path: String },
}

/// Recognised configuration keys (spec §6.1). `rootNamespace` is the only
/// required key; everything else has a pipeline-level default.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub root_namespace: Option<String>,
    pub entry_point: Option<String>,
    pub source_root: Option<String>,
    pub output_directory: Option<String>,
    /// Defaults to the entry module's container-class name; resolved by the
    /// pipeline once the entry module exists (spec §9 open question), never
    /// hard-coded here.
    pub output_name: Option<String>,
    #[serde(default)]
    pub mode: Option<Mode>,
    pub target_framework_moniker: Option<String>,
    #[serde(default)]
    pub type_roots: Vec<String>,
    #[serde(default)]
    pub package_references: Vec<PackageReference>,
    #[serde(default)]
    pub library_references: Vec<String>,
    #[serde(default)]
    pub framework_references: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackageReference {
    pub name: String,
    pub version: String,
}

/// A validated, fully-defaulted project configuration.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub root_namespace: String,
    pub entry_point: Option<PathBuf>,
    pub source_root: PathBuf,
    pub output_directory: PathBuf,
    pub output_name: Option<String>,
    pub mode: Mode,
    pub target_framework_moniker: String,
    pub type_roots: Vec<PathBuf>,
    pub package_references: Vec<PackageReference>,
    pub library_references: Vec<String>,
    pub framework_references: Vec<String>,
}

const DEFAULT_TFM: &str = "net9.0";

pub fn load_project_config(path: &std::path::Path) -> Result<ResolvedConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_project_config(&text, path)
}

pub fn parse_project_config(
    text: &str,
    path: &std::path::Path,
) -> Result<ResolvedConfig, ConfigError> {
    let raw: ProjectConfig = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    let Some(root_namespace) = raw.root_namespace else {
        return Err(ConfigError::MissingRootNamespace {
            path: path.display().to_string(),
        });
    };
    let base = path.parent().unwrap_or_else(|| std::path::Path::new("."));
    Ok(ResolvedConfig {
        root_namespace,
        entry_point: raw.entry_point.map(|p| base.join(p)),
        source_root: base.join(raw.source_root.unwrap_or_else(|| "src".to_string())),
        output_directory: base.join(raw.output_directory.unwrap_or_else(|| "out".to_string())),
        output_name: raw.output_name,
        mode: raw.mode.unwrap_or_default(),
        target_framework_moniker: raw
            .target_framework_moniker
            .unwrap_or_else(|| DEFAULT_TFM.to_string()),
        type_roots: raw.type_roots.into_iter().map(|t| base.join(t)).collect(),
        package_references: raw.package_references,
        library_references: raw.library_references,
        framework_references: raw.framework_references,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_root_namespace_is_an_error() {
        let err = parse_project_config("{}", std::path::Path::new("tsonic.json")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRootNamespace { .. }));
    }

    #[test]
    fn defaults_mode_to_dotnet() {
        let cfg = parse_project_config(
            r#"{"rootNamespace":"MyApp"}"#,
            std::path::Path::new("tsonic.json"),
        )
        .unwrap();
        assert_eq!(cfg.mode, Mode::Dotnet);
        assert_eq!(cfg.target_framework_moniker, "net9.0");
    }

    #[test]
    fn mode_js_is_recognised() {
        let cfg = parse_project_config(
            r#"{"rootNamespace":"MyApp","mode":"js"}"#,
            std::path::Path::new("tsonic.json"),
        )
        .unwrap();
        assert_eq!(cfg.mode, Mode::Js);
    }
}

//! Internal load-time errors, converted to 9xxx diagnostics at the loader
//! boundary (spec §7: manifest errors are phase-local and fatal).

use thiserror::Error;
use tsonic_common::diagnostics::{self, Diagnostic};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("malformed manifest at {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("duplicate binding for alias path `{alias_path}` (first seen in {first_path}, again in {second_path})")]
    DuplicateBinding {
        alias_path: String,
        first_path: String,
        second_path: String,
    },

    #[error("binding `{alias_path}` points to CLR member `{clr_member}` on `{clr_type}`, which is not declared in metadata")]
    UnboundMetadataReference {
        alias_path: String,
        clr_type: String,
        clr_member: String,
    },

    #[error("missing manifest: {path}")]
    MissingManifest { path: String },
}

impl RegistryError {
    pub fn into_diagnostic(self) -> Diagnostic {
        match self {
            RegistryError::Malformed { path, reason } => Diagnostic::error(
                diagnostics::E9001_MALFORMED_MANIFEST,
                format!("malformed manifest `{path}`: {reason}"),
            ),
            RegistryError::DuplicateBinding {
                alias_path,
                first_path,
                second_path,
            } => Diagnostic::error(
                diagnostics::E9002_DUPLICATE_BINDING,
                format!(
                    "duplicate binding for `{alias_path}` ({first_path} conflicts with {second_path})"
                ),
            ),
            RegistryError::UnboundMetadataReference {
                alias_path,
                clr_type,
                clr_member,
            } => Diagnostic::error(
                diagnostics::E9003_UNBOUND_METADATA_REFERENCE,
                format!(
                    "binding `{alias_path}` references `{clr_type}.{clr_member}`, which has no metadata entry"
                ),
            ),
            RegistryError::MissingManifest { path } => Diagnostic::error(
                diagnostics::E9004_MISSING_MANIFEST,
                format!("missing manifest: {path}"),
            ),
        }
    }
}

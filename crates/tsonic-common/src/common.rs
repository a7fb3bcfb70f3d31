//! Shared enums referenced by several crates, broken out here to avoid
//! circular workspace dependencies (mirrors the source repo's
//! `tsz_common::common` module).

use serde::{Deserialize, Serialize};

/// The compiler's global lowering-mode switch (spec §4.9, Glossary "Mode").
///
/// Affects exactly the built-in routing table and the project manifest's
/// package references; the IR itself is mode-agnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Dotnet,
    Js,
}

impl Default for Mode {
    /// Resolves the open question in spec §9: a single named default.
    fn default() -> Self {
        Mode::Dotnet
    }
}

/// The project's fixed TypeScript source extension (spec §4.4 rule 1).
pub const TS_EXTENSION: &str = ".ts";

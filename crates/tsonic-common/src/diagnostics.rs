//! The closed diagnostic taxonomy (C1).
//!
//! Every distinct error condition in the pipeline has exactly one stable
//! four-digit code, grouped by thousands per spec §6.4. `code_name` is the
//! public code-to-name mapping required by §4.1.

use serde::Serialize;

use crate::span::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: String,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: u32,
    pub severity: Severity,
    pub message: String,
    pub location: Option<Location>,
    pub hint: Option<String>,
}

impl Diagnostic {
    pub fn error(code: u32, message: impl Into<String>) -> Self {
        Diagnostic {
            code,
            severity: Severity::Error,
            message: message.into(),
            location: None,
            hint: None,
        }
    }

    pub fn warning(code: u32, message: impl Into<String>) -> Self {
        Diagnostic {
            code,
            severity: Severity::Warning,
            message: message.into(),
            location: None,
            hint: None,
        }
    }

    #[must_use]
    pub fn at(mut self, file: impl Into<String>, span: Span) -> Self {
        self.location = Some(Location {
            file: file.into(),
            span,
        });
        self
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

/// True iff any diagnostic in the slice is an error; a phase may succeed
/// with warnings only (spec §7).
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

macro_rules! diagnostic_codes {
    ($($name:ident = $code:expr),* $(,)?) => {
        /// Stable code -> human readable constant name, per spec §4.1.
        pub fn code_name(code: u32) -> Option<&'static str> {
            match code {
                $($code => Some(stringify!($name)),)*
                _ => None,
            }
        }

        $(pub const $name: u32 = $code;)*
    };
}

diagnostic_codes! {
    // 1xxx — resolution
    E1001_MISSING_EXTENSION = 1001,
    E1003_CASE_MISMATCH = 1003,
    E1004_UNKNOWN_MODULE = 1004,
    E1006_CIRCULAR_DEPENDENCY = 1006,

    // 2xxx — types
    E2001_UNSUPPORTED_LITERAL_TYPE = 2001,
    E2002_CONDITIONAL_TYPE = 2002,
    E2003_CONTAINER_NAME_COLLISION = 2003,

    // 3xxx — features
    E3001_EXPORT_STAR = 3001,
    E3002_DEFAULT_EXPORT = 3002,
    E3003_DYNAMIC_IMPORT = 3003,
    E3004_PROMISE_THEN_CATCH_FINALLY = 3004,
    E3005_DECORATOR = 3005,
    E3006_NAMESPACE_DECLARATION = 3006,

    // 4xxx — emission
    E4001_UNLOWERABLE_CONSTRUCT = 4001,
    E4002_THROW_NON_EXCEPTION = 4002,

    // 7xxx — language semantics
    E7203_SYMBOL_KEY = 7203,
    E7301_NON_MARKER_IMPLEMENTS = 7301,
    E7415_NULLABLE_UNCONSTRAINED_GENERIC = 7415,
    E7417_EMPTY_ARRAY_LITERAL = 7417,
    E7441_RESIDUAL_INTRINSIC = 7441,

    // 9xxx — manifests
    E9001_MALFORMED_MANIFEST = 9001,
    E9002_DUPLICATE_BINDING = 9002,
    E9003_UNBOUND_METADATA_REFERENCE = 9003,
    E9004_MISSING_MANIFEST = 9004,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_errors_detects_only_errors() {
        let warnings = vec![Diagnostic::warning(E1001_MISSING_EXTENSION, "w")];
        assert!(!has_errors(&warnings));
        let errors = vec![Diagnostic::error(E1001_MISSING_EXTENSION, "e")];
        assert!(has_errors(&errors));
    }

    #[test]
    fn every_documented_code_has_a_name() {
        for code in [1001, 1003, 1004, 1006, 2001, 2002, 2003, 3001, 3002, 3003, 3005, 3006,
                     4001, 4002, 7203, 7301, 7415, 7417, 7441, 9001, 9002, 9003, 9004] {
            assert!(code_name(code).is_some(), "missing name for {code}");
        }
    }

    #[test]
    fn unknown_code_has_no_name() {
        assert_eq!(code_name(6000), None);
    }
}

//! The external TS parser (spec §1 "out of scope"). `Parser` is the seam a
//! real `tsbindgen`/TS-compiler-services integration implements; the loader
//! only depends on this trait.

use tsonic_common::Diagnostic;

use crate::ast::TsSourceFile;

pub trait Parser {
    /// Parse one source file. A parse error is bubbled as a diagnostic
    /// carrying the original span (spec §4.3).
    fn parse(&self, file_path: &str, source_text: &str) -> Result<TsSourceFile, Diagnostic>;
}

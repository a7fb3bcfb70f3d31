//! `Program` snapshot (spec §2 data flow: "file paths -> Program snapshot").

use tsonic_common::ordered::OrderedMap;
use tsonic_config::ResolvedConfig;
use tsonic_registries::{BindingRegistry, MetadataRegistry};

use crate::ast::TsSourceFile;
use crate::checker::TypeChecker;

/// An immutable snapshot produced by phase 1. Every later phase borrows
/// from this rather than re-reading the filesystem or re-parsing (spec §5:
/// file-system I/O happens in phases 1-2 only).
pub struct Program<'a> {
    pub config: ResolvedConfig,
    pub sources: OrderedMap<String, TsSourceFile>,
    pub bindings: BindingRegistry,
    pub metadata: MetadataRegistry,
    pub checker: &'a dyn TypeChecker,
}

impl<'a> Program<'a> {
    pub fn source(&self, file_path: &str) -> Option<&TsSourceFile> {
        self.sources.get(file_path)
    }
}

//! Phase 1: assembles the `Program` snapshot (spec §4.3).
//!
//! Drives the external parser over every discovered TypeScript source file,
//! loads `.d.ts`-adjacent manifests via `tsonic_registries`, and fails fast
//! on the first parse error or malformed manifest (spec §7: the loader
//! fails fast because downstream phases would emit noise on a partial
//! program).

use std::path::Path;

use tracing::debug;
use tsonic_common::ordered::OrderedMap;
use tsonic_common::{Diagnostic, diagnostics};
use tsonic_config::ResolvedConfig;

use crate::ast::TsSourceFile;
use crate::checker::TypeChecker;
use crate::parser::Parser;
use crate::program::Program;

/// Recursively discover `*.ts` files under `source_root`, in deterministic
/// (sorted) order (spec §5 determinism).
pub fn discover_sources(source_root: &Path) -> Vec<std::path::PathBuf> {
    let mut out = Vec::new();
    discover_sources_into(source_root, &mut out);
    out.sort();
    out
}

fn discover_sources_into(dir: &Path, out: &mut Vec<std::path::PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        if path.is_dir() {
            discover_sources_into(&path, out);
        } else if path.extension().and_then(|e| e.to_str()) == Some("ts")
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| !n.ends_with(".d.ts"))
        {
            out.push(path);
        }
    }
}

pub fn load_program<'a>(
    config: ResolvedConfig,
    parser: &dyn Parser,
    checker: &'a dyn TypeChecker,
) -> Result<Program<'a>, Vec<Diagnostic>> {
    let mut diags = Vec::new();

    let registries = tsonic_registries::loader::load_registries(&config.type_roots)
        .map_err(|e| vec![e.into_diagnostic()])?;

    let paths = discover_sources(&config.source_root);
    let mut sources: OrderedMap<String, TsSourceFile> = OrderedMap::new();
    for path in paths {
        let file_path = path.display().to_string();
        debug!(file = %file_path, "parsing source file");
        let text = match std::fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) => {
                diags.push(
                    Diagnostic::error(
                        diagnostics::E9004_MISSING_MANIFEST,
                        format!("failed to read source `{file_path}`: {e}"),
                    ),
                );
                continue;
            }
        };
        match parser.parse(&file_path, &text) {
            Ok(source) => {
                sources.insert(file_path, source);
            }
            Err(d) => diags.push(d),
        }
    }

    if tsonic_common::has_errors(&diags) {
        return Err(diags);
    }

    Ok(Program {
        config,
        sources,
        bindings: registries.bindings,
        metadata: registries.metadata,
        checker,
    })
}

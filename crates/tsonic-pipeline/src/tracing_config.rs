//! `EnvFilter`-driven subscriber wiring for hosts embedding the pipeline.
//!
//! The pipeline itself never installs a global subscriber (library code
//! must not do that); `tracing_config` only builds the `fmt` subscriber a
//! host can `.init()` itself, mirroring the `RUST_LOG`-driven setup the
//! corpus's own CLI binaries use.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::fmt::format::{DefaultFields, Format};

const DEFAULT_FILTER: &str = "tsonic=info,warn";

/// Builds (but does not install) an `EnvFilter`-driven `fmt` subscriber,
/// reading `RUST_LOG` with [`DEFAULT_FILTER`] as the fallback. Callers
/// finish the wiring themselves, e.g. `tsonic_pipeline::tracing_config().init()`.
pub fn tracing_config() -> SubscriberBuilder<DefaultFields, Format, EnvFilter> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    tracing_subscriber::fmt().with_env_filter(EnvFilter::new(filter))
}

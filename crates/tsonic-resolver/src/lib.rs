//! Resolver (C4): import resolution, module graph construction, namespace
//! and container-class derivation, cycle detection.

pub mod classify;
pub mod graph;
pub mod namespace;

pub use classify::{LocalModuleInfo, ResolvedKind, ResolvedModule, classify_import};
pub use graph::{ModuleGraph, build_module_graph};
pub use namespace::{classify_container, derive_container_class_name, derive_namespace};

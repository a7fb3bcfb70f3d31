//! Centralised limits and thresholds for the compiler core.

/// Upper bound on DFS depth during module-graph construction (C4); guards
/// against stack overflow on pathological import chains rather than
/// reporting 1006 twice.
pub const MAX_MODULE_GRAPH_DEPTH: usize = 4_096;

/// Upper bound on fixpoint iterations during monomorphisation (C10) before
/// the specialiser gives up on a recursive generic and reports 4001.
pub const MAX_SPECIALISATION_FIXPOINT_ITERATIONS: usize = 256;

/// Upper bound on distinct specialisations of a single generic declaration.
pub const MAX_SPECIALISATIONS_PER_DECLARATION: usize = 4_096;

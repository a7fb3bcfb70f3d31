//! Deterministic-iteration collection aliases.
//!
//! Spec §5 requires byte-identical output given identical input (P1), which
//! rules out hash-order iteration anywhere the iteration order reaches the
//! emitted text. `indexmap` preserves insertion order, so every map/set that
//! is iterated during emission uses these aliases rather than `HashMap`.

pub type OrderedMap<K, V> = indexmap::IndexMap<K, V>;
pub type OrderedSet<T> = indexmap::IndexSet<T>;

//! The marker-interface exemption for spec §4.5's `implements` rule (7301).
//!
//! TypeScript `implements` clauses are rejected in general because
//! interfaces lower to classes (true implementation is spelled `extends`
//! against the lowered class). The one exception is a single reserved
//! marker interface used purely to tag a type as CLR value-type semantics,
//! which carries no members and so needs no class body to "implement".

/// Name of the reserved marker interface (spec §4.5, §9 design notes leave
/// this unnamed; fixed here as part of this implementation).
pub const VALUE_TYPE_MARKER: &str = "ValueTypeMarker";

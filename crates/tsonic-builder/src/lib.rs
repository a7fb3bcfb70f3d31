//! AST-to-IR lowering (C7): type/expression/statement lowering and
//! per-module orchestration, consulting the external type checker for
//! everything a standalone AST walk cannot determine (spec §4.6).

mod builder;
mod ctx;
mod intrinsics;
mod lower_expr;
mod lower_stmt;
mod types;

pub use builder::{BuiltModule, build_module};
pub use ctx::BuildContext;

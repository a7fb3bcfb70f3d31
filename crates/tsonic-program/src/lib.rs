//! Phase 1 (Program): the typed-AST stand-in, the external type-checker
//! query interface (C6.2), and the program loader (C3).

pub mod ast;
pub mod checker;
pub mod loader;
pub mod parser;
pub mod program;
pub mod testing;

pub use ast::{NodeId, TsSourceFile};
pub use checker::{ResolvedCallSignature, SymbolRef, TypeChecker};
pub use parser::Parser;
pub use program::Program;

//! Closed IR sum types (C6): the language-neutral intermediate
//! representation produced by phase 4 and consumed by phases 5-6.
//!
//! Every node is immutable after construction (spec §3 invariant).

pub mod expr;
pub mod generator;
pub mod module;
pub mod specialisation;
pub mod stmt;
pub mod types;

pub use expr::{ClrBinding, IrExpr, IrExpressionKind, ResolvedSignature};
pub use generator::{ExchangeSchema, GeneratorKind};
pub use module::{ExportedSymbol, ExportedSymbolKind, IrImport, IrModule};
pub use specialisation::SpecialisationRequest;
pub use stmt::{ClassDecl, ClassMember, ClassMemberKind, DynamicForward, EnumDecl, FunctionDecl, InterfaceDecl, IrStmt, IrStatementKind, ObjectMember, Param};
pub use types::{Constraint, IrType, PrimitiveType, TypeParameter};

//! The external type-checker query interface (spec §6.2).
//!
//! Query-only and read-only: the IR builder asks "what is the type of this
//! node", "which symbol does this identifier resolve to", "what does
//! overload resolution pick for this call" — it never mutates checker
//! state. The spec does not prescribe an implementation; this trait is the
//! seam a real TS checker integration plugs into.

use crate::ast::{NodeId, TsType};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SymbolRef {
    pub module_path: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedCallSignature {
    pub type_arguments: Vec<TsType>,
    pub parameter_types: Vec<TsType>,
    pub return_type: TsType,
}

pub trait TypeChecker {
    fn type_of(&self, file: &str, node: NodeId) -> TsType;
    fn symbol_of(&self, file: &str, node: NodeId) -> Option<SymbolRef>;
    fn resolved_call_signature_of(&self, file: &str, node: NodeId) -> Option<ResolvedCallSignature>;
    fn declared_type_of_symbol(&self, symbol: &SymbolRef) -> TsType;
    /// Flow-narrowed type at a use site (spec §4.6 "Null narrowing"), or
    /// `None` if the checker did not narrow this node.
    fn flow_narrowed_type_at(&self, file: &str, node: NodeId) -> Option<TsType>;
}

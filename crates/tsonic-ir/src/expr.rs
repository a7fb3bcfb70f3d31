//! `IrExpression` — the closed expression sum (spec §3 IR, ~20 variants).

use tsonic_common::Span;

use crate::types::{IrType, LiteralType};

/// A resolved CLR binding attached to an identifier or member-access node
/// that traces to a bound CLR symbol (spec §4.6 "Identifiers and member
/// access").
#[derive(Clone, Debug, PartialEq)]
pub struct ClrBinding {
    pub assembly: String,
    pub clr_qualified_type: String,
    pub clr_member: Option<String>,
}

/// The result of overload resolution for a call/new expression (spec §4.6
/// "Calls").
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedSignature {
    pub param_modifiers: Vec<crate::types::ParamModifier>,
    pub return_type: IrType,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IrExpr {
    pub span: Span,
    pub kind: IrExpressionKind,
    pub ty: IrType,
}

#[derive(Clone, Debug, PartialEq)]
pub enum IrExpressionKind {
    Literal(LiteralType),
    Identifier {
        name: String,
        clr_binding: Option<ClrBinding>,
    },
    ArrayLiteral(Vec<IrExpr>),
    ObjectLiteral(Vec<(String, IrExpr)>),
    Function(Box<crate::stmt::IrFunctionBody>),
    Arrow(Box<crate::stmt::IrFunctionBody>),
    MemberAccess {
        object: Box<IrExpr>,
        member: String,
        optional: bool,
        clr_binding: Option<ClrBinding>,
    },
    Call {
        callee: Box<IrExpr>,
        arguments: Vec<IrExpr>,
        type_arguments: Vec<IrType>,
        resolved_signature: Option<ResolvedSignature>,
        optional: bool,
    },
    New {
        callee: Box<IrExpr>,
        arguments: Vec<IrExpr>,
        type_arguments: Vec<IrType>,
    },
    This,
    Unary {
        op: UnaryOp,
        operand: Box<IrExpr>,
    },
    Update {
        op: UpdateOp,
        operand: Box<IrExpr>,
        prefix: bool,
    },
    Binary {
        op: BinaryOp,
        left: Box<IrExpr>,
        right: Box<IrExpr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<IrExpr>,
        right: Box<IrExpr>,
    },
    Ternary {
        condition: Box<IrExpr>,
        when_true: Box<IrExpr>,
        when_false: Box<IrExpr>,
    },
    Assignment {
        op: AssignOp,
        target: Box<IrExpr>,
        value: Box<IrExpr>,
    },
    TemplateLiteral {
        quasis: Vec<String>,
        expressions: Vec<IrExpr>,
    },
    Spread(Box<IrExpr>),
    Await(Box<IrExpr>),
    Yield {
        argument: Option<Box<IrExpr>>,
        delegate: bool,
    },
    /// A compile-time intrinsic (spec §4.6 "Intrinsics"), lowered to the
    /// corresponding CLR keyword or construct by the emitter.
    Intrinsic {
        kind: IntrinsicKind,
        type_argument: Option<IrType>,
        arguments: Vec<IrExpr>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntrinsicKind {
    StackAlloc,
    SizeOf,
    NameOf,
    DefaultOf,
    TryCast,
    AsInterface,
    IsType,
    ThisArg,
    Ptr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    BitNot,
    TypeOf,
    Void,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exponent,
    StrictEq,
    StrictNotEq,
    LooseEq,
    LooseNotEq,
    Lt,
    Lte,
    Gt,
    Gte,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
    InstanceOf,
    In,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    NullishCoalesce,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    NullishAssign,
    AndAssign,
    OrAssign,
}

impl IrExpr {
    pub const fn new(span: Span, kind: IrExpressionKind, ty: IrType) -> Self {
        IrExpr { span, kind, ty }
    }
}

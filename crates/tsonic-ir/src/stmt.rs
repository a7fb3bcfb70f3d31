//! `IrStatement` and declaration nodes (spec §3 IR, ~18 statement variants).

use tsonic_common::Span;

use crate::expr::IrExpr;
use crate::generator::GeneratorKind;
use crate::types::{IrType, TypeParameter};

#[derive(Clone, Debug, PartialEq)]
pub struct IrStmt {
    pub span: Span,
    pub kind: IrStatementKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum IrStatementKind {
    VariableDeclaration {
        name: String,
        ty: IrType,
        initializer: Option<IrExpr>,
        is_const: bool,
        /// Set when this is a top-level `const` inside a static container
        /// (spec §4.9 "Statement lowering": becomes `static readonly`).
        is_static_container_member: bool,
    },
    FunctionDeclaration(Box<FunctionDecl>),
    ClassDeclaration(Box<ClassDecl>),
    InterfaceDeclaration(Box<InterfaceDecl>),
    EnumDeclaration(Box<EnumDecl>),
    TypeAliasDeclaration {
        name: String,
        type_parameters: Vec<TypeParameter>,
        aliased: IrType,
    },
    ExpressionStatement(IrExpr),
    Return(Option<IrExpr>),
    If {
        condition: IrExpr,
        then_branch: Vec<IrStmt>,
        else_branch: Option<Vec<IrStmt>>,
    },
    While {
        condition: IrExpr,
        body: Vec<IrStmt>,
    },
    DoWhile {
        body: Vec<IrStmt>,
        condition: IrExpr,
    },
    For {
        initializer: Option<Box<IrStmt>>,
        condition: Option<IrExpr>,
        update: Option<IrExpr>,
        body: Vec<IrStmt>,
    },
    ForOf {
        variable: String,
        variable_ty: IrType,
        iterable: IrExpr,
        body: Vec<IrStmt>,
        is_await: bool,
    },
    Switch {
        discriminant: IrExpr,
        cases: Vec<SwitchCase>,
    },
    Throw(IrExpr),
    Try {
        block: Vec<IrStmt>,
        catch: Option<CatchClause>,
        finally: Option<Vec<IrStmt>>,
    },
    Block(Vec<IrStmt>),
    Break(Option<String>),
    Continue(Option<String>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SwitchCase {
    pub test: Option<IrExpr>,
    pub body: Vec<IrStmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CatchClause {
    pub param: Option<String>,
    pub body: Vec<IrStmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: IrType,
    pub optional: bool,
    pub default: Option<IrExpr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<Param>,
    pub return_type: IrType,
    pub body: Vec<IrStmt>,
    pub is_async: bool,
    pub generator: Option<GeneratorKind>,
    pub is_exported: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IrFunctionBody {
    pub parameters: Vec<Param>,
    pub return_type: IrType,
    pub body: Vec<IrStmt>,
    pub is_async: bool,
    pub generator: Option<GeneratorKind>,
    /// Arrow functions capture the enclosing `this`; ordinary function
    /// expressions do not (spec §4.9 mode-independent, but still tracked so
    /// the emitter knows whether to synthesise a `_this` capture).
    pub captures_this: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassMember {
    pub name: String,
    pub kind: ClassMemberKind,
    pub is_static: bool,
    pub is_override: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClassMemberKind {
    Field { ty: IrType, initializer: Option<IrExpr> },
    Method(FunctionDecl),
    Property {
        ty: IrType,
        getter: bool,
        setter: bool,
        /// Set when this accessor forwards to a field on `self` via dynamic
        /// member access rather than backing a plain auto-property (spec
        /// §4.8 "Structural-constraint adapters": the wrapper class forwards
        /// each member of the wrapped value).
        forward: Option<DynamicForward>,
    },
    Constructor(FunctionDecl),
}

/// Where a synthesised wrapper-class member forwards its access (spec §4.8
/// "Structural-constraint adapters").
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicForward {
    /// Name of the field on the wrapper holding the wrapped value.
    pub via_field: String,
    pub member: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub type_parameters: Vec<TypeParameter>,
    pub extends: Option<IrType>,
    pub members: Vec<ClassMember>,
    pub is_exported: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceDecl {
    pub name: String,
    pub type_parameters: Vec<TypeParameter>,
    pub members: Vec<ObjectMember>,
    pub is_exported: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectMember {
    pub name: String,
    pub ty: IrType,
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub members: Vec<(String, Option<i64>)>,
    pub is_exported: bool,
}

//! A minimal typed-AST stand-in for the external TypeScript parser/checker
//! (spec §1 "out of scope: The TypeScript parser and type checker (used as
//! an external service...)").
//!
//! In production this tree is produced by `tsbindgen`'s sibling front-end;
//! here it is the shape the IR builder (C7) consumes, and test fixtures
//! build it by hand (mirroring the source repo's practice of constructing
//! `NodeArena`s directly in binder/checker unit tests).

use tsonic_common::Span;

pub type NodeId = u32;

#[derive(Clone, Debug, PartialEq)]
pub struct TsSourceFile {
    pub file_path: String,
    pub imports: Vec<ImportDecl>,
    pub statements: Vec<TsStatement>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportDecl {
    pub node_id: NodeId,
    pub span: Span,
    pub specifier: String,
    pub named: Vec<String>,
    pub is_type_only: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TsStatement {
    pub node_id: NodeId,
    pub span: Span,
    pub kind: TsStatementKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TsStatementKind {
    VariableDeclaration {
        name: String,
        declared_type: Option<TsType>,
        initializer: Option<TsExpression>,
        is_const: bool,
        is_exported: bool,
    },
    FunctionDeclaration(FunctionNode),
    ClassDeclaration(ClassNode),
    InterfaceDeclaration(InterfaceNode),
    EnumDeclaration(EnumNode),
    TypeAliasDeclaration {
        name: String,
        type_parameters: Vec<TypeParamNode>,
        aliased: TsType,
        is_exported: bool,
    },
    ExpressionStatement(TsExpression),
    Return(Option<TsExpression>),
    If {
        condition: TsExpression,
        then_branch: Vec<TsStatement>,
        else_branch: Option<Vec<TsStatement>>,
    },
    While {
        condition: TsExpression,
        body: Vec<TsStatement>,
    },
    DoWhile {
        body: Vec<TsStatement>,
        condition: TsExpression,
    },
    For {
        initializer: Option<Box<TsStatement>>,
        condition: Option<TsExpression>,
        update: Option<TsExpression>,
        body: Vec<TsStatement>,
    },
    ForOf {
        variable: String,
        iterable: TsExpression,
        body: Vec<TsStatement>,
        is_await: bool,
    },
    Switch {
        discriminant: TsExpression,
        cases: Vec<TsSwitchCase>,
    },
    Throw(TsExpression),
    Try {
        block: Vec<TsStatement>,
        catch: Option<TsCatchClause>,
        finally: Option<Vec<TsStatement>>,
    },
    Block(Vec<TsStatement>),
    Break(Option<String>),
    Continue(Option<String>),
    /// A non-ambient namespace declaration; always a validator error (3006)
    /// but must still parse so the diagnostic can be reported.
    NamespaceDeclaration { name: String, ambient: bool },
    ExportStar,
    ExportDefault(Box<TsExpression>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TsSwitchCase {
    pub test: Option<TsExpression>,
    pub body: Vec<TsStatement>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TsCatchClause {
    pub param: Option<String>,
    pub body: Vec<TsStatement>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParamNode {
    pub name: String,
    pub declared_type: Option<TsType>,
    pub optional: bool,
    pub default: Option<TsExpression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeParamNode {
    pub name: String,
    pub constraint: Option<TsType>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionNode {
    pub node_id: NodeId,
    pub name: String,
    pub type_parameters: Vec<TypeParamNode>,
    pub parameters: Vec<ParamNode>,
    pub return_type: Option<TsType>,
    pub body: Vec<TsStatement>,
    pub is_async: bool,
    pub is_generator: bool,
    pub decorators: Vec<String>,
    pub is_exported: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassMemberNode {
    pub name: String,
    pub kind: ClassMemberKindNode,
    pub is_static: bool,
    pub decorators: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClassMemberKindNode {
    Field {
        declared_type: Option<TsType>,
        initializer: Option<TsExpression>,
    },
    Method(FunctionNode),
    Getter(FunctionNode),
    Setter(FunctionNode),
    Constructor(FunctionNode),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassNode {
    pub node_id: NodeId,
    pub name: String,
    pub type_parameters: Vec<TypeParamNode>,
    pub extends: Option<TsType>,
    /// `implements` clause entries; spec §4.5: only the marker interface is
    /// exempt from 7301.
    pub implements: Vec<TsType>,
    pub members: Vec<ClassMemberNode>,
    pub decorators: Vec<String>,
    pub is_exported: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceNode {
    pub node_id: NodeId,
    pub name: String,
    pub type_parameters: Vec<TypeParamNode>,
    pub members: Vec<(String, TsType, bool)>,
    pub is_exported: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumNode {
    pub node_id: NodeId,
    pub name: String,
    pub members: Vec<(String, Option<i64>)>,
    pub is_exported: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TsExpression {
    pub node_id: NodeId,
    pub span: Span,
    pub kind: Box<TsExpressionKind>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TsExpressionKind {
    StringLiteral(String),
    NumericLiteral(f64),
    BoolLiteral(bool),
    NullLiteral,
    Identifier(String),
    ArrayLiteral(Vec<TsExpression>),
    ObjectLiteral(Vec<(String, TsExpression)>),
    Function(Box<FunctionNode>),
    Arrow {
        parameters: Vec<ParamNode>,
        return_type: Option<TsType>,
        body: Vec<TsStatement>,
        is_async: bool,
    },
    MemberAccess {
        object: TsExpression,
        member: String,
        optional: bool,
    },
    Call {
        callee: TsExpression,
        arguments: Vec<TsExpression>,
        type_arguments: Vec<TsType>,
        optional: bool,
    },
    New {
        callee: TsExpression,
        arguments: Vec<TsExpression>,
        type_arguments: Vec<TsType>,
    },
    This,
    Unary {
        op: String,
        operand: TsExpression,
    },
    Update {
        op: String,
        operand: TsExpression,
        prefix: bool,
    },
    Binary {
        op: String,
        left: TsExpression,
        right: TsExpression,
    },
    Logical {
        op: String,
        left: TsExpression,
        right: TsExpression,
    },
    Ternary {
        condition: TsExpression,
        when_true: TsExpression,
        when_false: TsExpression,
    },
    Assignment {
        op: String,
        target: TsExpression,
        value: TsExpression,
    },
    TemplateLiteral {
        quasis: Vec<String>,
        expressions: Vec<TsExpression>,
    },
    Spread(TsExpression),
    Await(TsExpression),
    Yield {
        argument: Option<TsExpression>,
        delegate: bool,
    },
    /// `import(specifier)` (spec §4.5: always rejected, 3003).
    DynamicImport(TsExpression),
    /// A compile-time intrinsic call (spec §4.6 "Intrinsics"):
    /// `stackalloc<T>`, `sizeof<T>`, `nameof`, `defaultof<T>`, `trycast<T>`,
    /// `asinterface<T>`, `istype<T>`, `thisarg<T>`, `ptr<T>`.
    Intrinsic {
        name: String,
        type_arguments: Vec<TsType>,
        arguments: Vec<TsExpression>,
    },
}

impl TsExpression {
    pub fn new(node_id: NodeId, span: Span, kind: TsExpressionKind) -> Self {
        TsExpression {
            node_id,
            span,
            kind: Box::new(kind),
        }
    }
}

/// A TS type annotation as written, prior to lowering (spec §4.6 "Types").
#[derive(Clone, Debug, PartialEq)]
pub enum TsType {
    TypeRef {
        name: String,
        type_arguments: Vec<TsType>,
    },
    Array(Box<TsType>),
    Function {
        parameters: Vec<ParamNode>,
        return_type: Box<TsType>,
    },
    ObjectLiteral(Vec<(String, TsType, bool)>),
    Union(Vec<TsType>),
    Intersection(Vec<TsType>),
    StringLiteral(String),
    NumberLiteral(f64),
    BoolLiteral(bool),
    Any,
    Unknown,
    Void,
    Never,
    Null,
    Undefined,
    /// A symbol-keyed index signature (spec §4.5: always 7203).
    SymbolIndexed,
    /// A conditional type (spec §2xxx: 2002 unless specialisable — this
    /// implementation always rejects it, per spec §1 Non-goals).
    Conditional,
}

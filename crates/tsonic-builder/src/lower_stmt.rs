//! Statement, function, class, interface, and enum lowering (spec §4.6).

use tsonic_common::Diagnostic;
use tsonic_ir::expr::IrExpr;
use tsonic_ir::expr::IrExpressionKind;
use tsonic_ir::generator::{ExchangeSchema, GeneratorKind};
use tsonic_ir::stmt::{
    CatchClause, ClassDecl, ClassMember, ClassMemberKind, EnumDecl, FunctionDecl, InterfaceDecl, IrFunctionBody,
    IrStmt, IrStatementKind, ObjectMember, Param, SwitchCase,
};
use tsonic_ir::types::IrType;
use tsonic_program::ast::{
    ClassMemberKindNode, ClassNode, EnumNode, FunctionNode, InterfaceNode, ParamNode, TsExpression, TsStatement,
    TsStatementKind,
};

use crate::ctx::BuildContext;
use crate::lower_expr::lower_expr;
use crate::types::{lower_type, lower_type_parameters};

pub fn lower_statement(
    stmt: &TsStatement,
    is_static_container: bool,
    ctx: &mut BuildContext,
) -> Result<IrStmt, Diagnostic> {
    let span = stmt.span;
    let kind = match &stmt.kind {
        TsStatementKind::VariableDeclaration {
            name,
            declared_type,
            initializer,
            is_const,
            ..
        } => {
            let initializer_ir = match initializer {
                Some(init) => Some(lower_expr(init, ctx)?),
                None => None,
            };
            let ty = match declared_type {
                Some(t) => lower_type(t, ctx)?,
                None => initializer_ir.as_ref().map(|e| e.ty.clone()).unwrap_or(IrType::Any),
            };
            IrStatementKind::VariableDeclaration {
                name: name.clone(),
                ty,
                initializer: initializer_ir,
                is_const: *is_const,
                is_static_container_member: is_static_container,
            }
        }
        TsStatementKind::FunctionDeclaration(f) => {
            IrStatementKind::FunctionDeclaration(Box::new(lower_function(f, ctx)?))
        }
        TsStatementKind::ClassDeclaration(class) => IrStatementKind::ClassDeclaration(Box::new(lower_class(class, ctx)?)),
        TsStatementKind::InterfaceDeclaration(iface) => {
            IrStatementKind::InterfaceDeclaration(Box::new(lower_interface(iface, ctx)?))
        }
        TsStatementKind::EnumDeclaration(e) => IrStatementKind::EnumDeclaration(Box::new(lower_enum(e))),
        TsStatementKind::TypeAliasDeclaration {
            name,
            type_parameters,
            aliased,
            ..
        } => {
            ctx.push_generic_scope(Vec::new());
            let params = lower_type_parameters(type_parameters, ctx)?;
            let aliased_ty = lower_type(aliased, ctx)?;
            ctx.pop_generic_scope();
            IrStatementKind::TypeAliasDeclaration {
                name: name.clone(),
                type_parameters: params,
                aliased: aliased_ty,
            }
        }
        TsStatementKind::ExpressionStatement(expr) => IrStatementKind::ExpressionStatement(lower_expr(expr, ctx)?),
        TsStatementKind::Return(expr) => {
            let expr_ir = match expr {
                Some(e) => Some(lower_expr(e, ctx)?),
                None => None,
            };
            IrStatementKind::Return(expr_ir)
        }
        TsStatementKind::If {
            condition,
            then_branch,
            else_branch,
        } => IrStatementKind::If {
            condition: lower_expr(condition, ctx)?,
            then_branch: lower_block(then_branch, is_static_container, ctx)?,
            else_branch: match else_branch {
                Some(branch) => Some(lower_block(branch, is_static_container, ctx)?),
                None => None,
            },
        },
        TsStatementKind::While { condition, body } => IrStatementKind::While {
            condition: lower_expr(condition, ctx)?,
            body: lower_block(body, is_static_container, ctx)?,
        },
        TsStatementKind::DoWhile { body, condition } => IrStatementKind::DoWhile {
            body: lower_block(body, is_static_container, ctx)?,
            condition: lower_expr(condition, ctx)?,
        },
        TsStatementKind::For {
            initializer,
            condition,
            update,
            body,
        } => IrStatementKind::For {
            initializer: match initializer {
                Some(init) => Some(Box::new(lower_statement(init, is_static_container, ctx)?)),
                None => None,
            },
            condition: match condition {
                Some(c) => Some(lower_expr(c, ctx)?),
                None => None,
            },
            update: match update {
                Some(u) => Some(lower_expr(u, ctx)?),
                None => None,
            },
            body: lower_block(body, is_static_container, ctx)?,
        },
        TsStatementKind::ForOf {
            variable,
            iterable,
            body,
            is_await,
        } => {
            let iterable_ir = lower_expr(iterable, ctx)?;
            let variable_ty = element_type_of(&iterable_ir.ty);
            IrStatementKind::ForOf {
                variable: variable.clone(),
                variable_ty,
                iterable: iterable_ir,
                body: lower_block(body, is_static_container, ctx)?,
                is_await: *is_await,
            }
        }
        TsStatementKind::Switch { discriminant, cases } => {
            let discriminant_ir = lower_expr(discriminant, ctx)?;
            let mut lowered_cases = Vec::with_capacity(cases.len());
            for case in cases {
                lowered_cases.push(SwitchCase {
                    test: match &case.test {
                        Some(t) => Some(lower_expr(t, ctx)?),
                        None => None,
                    },
                    body: lower_block(&case.body, is_static_container, ctx)?,
                });
            }
            IrStatementKind::Switch {
                discriminant: discriminant_ir,
                cases: lowered_cases,
            }
        }
        TsStatementKind::Throw(expr) => {
            let expr_ir = lower_expr(expr, ctx)?;
            check_thrown_value_is_exception_like(&expr_ir)?;
            IrStatementKind::Throw(expr_ir)
        }
        TsStatementKind::Try { block, catch, finally } => IrStatementKind::Try {
            block: lower_block(block, is_static_container, ctx)?,
            catch: match catch {
                Some(c) => Some(CatchClause {
                    param: c.param.clone(),
                    body: lower_block(&c.body, is_static_container, ctx)?,
                }),
                None => None,
            },
            finally: match finally {
                Some(f) => Some(lower_block(f, is_static_container, ctx)?),
                None => None,
            },
        },
        TsStatementKind::Block(body) => IrStatementKind::Block(lower_block(body, is_static_container, ctx)?),
        TsStatementKind::Break(None) => IrStatementKind::Break(None),
        TsStatementKind::Continue(None) => IrStatementKind::Continue(None),
        TsStatementKind::Break(Some(label)) => {
            return Err(Diagnostic::error(
                tsonic_common::diagnostics::E4001_UNLOWERABLE_CONSTRUCT,
                format!("labeled `break {label}` is not supported; there is no way to bind the label to its target loop"),
            ));
        }
        TsStatementKind::Continue(Some(label)) => {
            return Err(Diagnostic::error(
                tsonic_common::diagnostics::E4001_UNLOWERABLE_CONSTRUCT,
                format!("labeled `continue {label}` is not supported; there is no way to bind the label to its target loop"),
            ));
        }
        TsStatementKind::NamespaceDeclaration { .. } | TsStatementKind::ExportStar | TsStatementKind::ExportDefault(_) => {
            return Err(Diagnostic::error(
                tsonic_common::diagnostics::E4001_UNLOWERABLE_CONSTRUCT,
                "construct rejected by the validator reached the builder",
            ));
        }
    };
    Ok(IrStmt { span, kind })
}

pub fn lower_block(
    stmts: &[TsStatement],
    is_static_container: bool,
    ctx: &mut BuildContext,
) -> Result<Vec<IrStmt>, Diagnostic> {
    let mut out = Vec::with_capacity(stmts.len());
    for s in stmts {
        out.push(lower_statement(s, is_static_container, ctx)?);
    }
    Ok(out)
}

/// `throw`ing a literal or an array/object literal can never be an
/// exception value (spec §4.9: "throwing non-exception values is a fatal
/// 4xxx"). Anything else (identifiers, `new` expressions, member access) is
/// assumed exception-like; full CLR type-hierarchy inference is out of
/// scope.
fn check_thrown_value_is_exception_like(expr: &IrExpr) -> Result<(), Diagnostic> {
    let obviously_not_an_exception = matches!(
        expr.kind,
        IrExpressionKind::Literal(_)
            | IrExpressionKind::ArrayLiteral(_)
            | IrExpressionKind::ObjectLiteral(_)
            | IrExpressionKind::TemplateLiteral { .. }
    );
    if obviously_not_an_exception {
        return Err(Diagnostic::error(
            tsonic_common::diagnostics::E4002_THROW_NON_EXCEPTION,
            "thrown value is a literal, not an exception",
        ));
    }
    Ok(())
}

fn element_type_of(iterable_ty: &IrType) -> IrType {
    match iterable_ty {
        IrType::Array(inner) => (**inner).clone(),
        IrType::Reference { type_arguments, .. } if !type_arguments.is_empty() => type_arguments[0].clone(),
        _ => IrType::Any,
    }
}

pub fn lower_function(f: &FunctionNode, ctx: &mut BuildContext) -> Result<FunctionDecl, Diagnostic> {
    ctx.push_generic_scope(Vec::new());
    let type_parameters = lower_type_parameters(&f.type_parameters, ctx)?;
    let parameters = lower_params(&f.parameters, ctx)?;
    let return_type = match &f.return_type {
        Some(t) => lower_type(t, ctx)?,
        None => IrType::Void,
    };
    let body = lower_block(&f.body, false, ctx)?;
    let generator = if f.is_generator {
        Some(detect_generator_kind(&body, &return_type, f.is_async))
    } else {
        None
    };
    ctx.pop_generic_scope();
    Ok(FunctionDecl {
        name: f.name.clone(),
        type_parameters,
        parameters,
        return_type,
        body,
        is_async: f.is_async,
        generator,
        is_exported: f.is_exported,
    })
}

pub fn lower_function_expression(expr: &TsExpression, ctx: &mut BuildContext) -> Result<IrExpr, Diagnostic> {
    let span = expr.span;
    match expr.kind.as_ref() {
        tsonic_program::ast::TsExpressionKind::Function(f) => {
            let decl = lower_function(f, ctx)?;
            let ty = function_type(&decl.parameters, &decl.return_type, decl.is_async);
            Ok(IrExpr::new(
                span,
                IrExpressionKind::Function(Box::new(IrFunctionBody {
                    parameters: decl.parameters,
                    return_type: decl.return_type,
                    body: decl.body,
                    is_async: decl.is_async,
                    generator: decl.generator,
                    captures_this: false,
                })),
                ty,
            ))
        }
        tsonic_program::ast::TsExpressionKind::Arrow {
            parameters,
            return_type,
            body,
            is_async,
        } => {
            ctx.push_generic_scope(Vec::new());
            let params = lower_params(parameters, ctx)?;
            let ret = match return_type {
                Some(t) => lower_type(t, ctx)?,
                None => IrType::Void,
            };
            let lowered_body = lower_block(body, false, ctx)?;
            ctx.pop_generic_scope();
            let ty = function_type(&params, &ret, *is_async);
            Ok(IrExpr::new(
                span,
                IrExpressionKind::Arrow(Box::new(IrFunctionBody {
                    parameters: params,
                    return_type: ret,
                    body: lowered_body,
                    is_async: *is_async,
                    generator: None,
                    captures_this: true,
                })),
                ty,
            ))
        }
        _ => unreachable!("lower_function_expression called on a non-function expression"),
    }
}

fn function_type(params: &[Param], return_type: &IrType, is_async: bool) -> IrType {
    IrType::Function {
        parameters: params
            .iter()
            .map(|p| tsonic_ir::types::FunctionParamType {
                name: p.name.clone(),
                ty: p.ty.clone(),
                modifier: tsonic_ir::types::ParamModifier::None,
                optional: p.optional,
            })
            .collect(),
        return_type: Box::new(return_type.clone()),
        is_async,
    }
}

fn lower_params(params: &[ParamNode], ctx: &mut BuildContext) -> Result<Vec<Param>, Diagnostic> {
    let mut out = Vec::with_capacity(params.len());
    for p in params {
        let ty = match &p.declared_type {
            Some(t) => lower_type(t, ctx)?,
            None => IrType::Any,
        };
        let default = match &p.default {
            Some(d) => Some(lower_expr(d, ctx)?),
            None => None,
        };
        out.push(Param {
            name: p.name.clone(),
            ty,
            optional: p.optional,
            default,
        });
    }
    Ok(out)
}

/// A generator is bidirectional iff its body's `yield` expressions are ever
/// used as a value (i.e. appear as something other than a bare expression
/// statement) — the textbook signal that the caller's `next(value)` payload
/// is read (spec §4.6 "Functions", §9 "Generator control flow").
fn detect_generator_kind(body: &[IrStmt], return_type: &IrType, is_async: bool) -> GeneratorKind {
    let yielded_type = yielded_type_of(return_type);
    if body_uses_yield_value(body) {
        GeneratorKind::Bidirectional(Box::new(ExchangeSchema {
            input_type: yielded_type.clone(),
            output_type: yielded_type,
            is_async,
        }))
    } else {
        GeneratorKind::Unidirectional { yielded_type }
    }
}

fn yielded_type_of(return_type: &IrType) -> IrType {
    match return_type {
        IrType::Reference { type_arguments, .. } => type_arguments.first().cloned().unwrap_or(IrType::Any),
        _ => IrType::Any,
    }
}

fn body_uses_yield_value(body: &[IrStmt]) -> bool {
    body.iter().any(stmt_uses_yield_value)
}

fn stmt_uses_yield_value(stmt: &IrStmt) -> bool {
    match &stmt.kind {
        IrStatementKind::ExpressionStatement(expr) => expr_uses_yield_as_value(expr, true),
        IrStatementKind::VariableDeclaration { initializer: Some(e), .. } => expr_uses_yield_as_value(e, false),
        IrStatementKind::Return(Some(e)) => expr_uses_yield_as_value(e, false),
        IrStatementKind::If { condition, then_branch, else_branch } => {
            expr_uses_yield_as_value(condition, false)
                || body_uses_yield_value(then_branch)
                || else_branch.as_ref().is_some_and(|b| body_uses_yield_value(b))
        }
        IrStatementKind::While { condition, body } | IrStatementKind::DoWhile { body, condition } => {
            expr_uses_yield_as_value(condition, false) || body_uses_yield_value(body)
        }
        IrStatementKind::For { body, condition, .. } => {
            condition.as_ref().is_some_and(|c| expr_uses_yield_as_value(c, false)) || body_uses_yield_value(body)
        }
        IrStatementKind::ForOf { body, .. } => body_uses_yield_value(body),
        IrStatementKind::Switch { cases, .. } => cases.iter().any(|c| body_uses_yield_value(&c.body)),
        IrStatementKind::Try { block, catch, finally } => {
            body_uses_yield_value(block)
                || catch.as_ref().is_some_and(|c| body_uses_yield_value(&c.body))
                || finally.as_ref().is_some_and(|f| body_uses_yield_value(f))
        }
        IrStatementKind::Block(body) => body_uses_yield_value(body),
        _ => false,
    }
}

/// `top_level` is true when `expr` is the whole of an expression statement:
/// a bare `yield x;` at that position does not consume a resumed value,
/// but `t += yield t;` (an assignment) does, and any `yield` found nested
/// inside a larger expression (e.g. as an operand) is necessarily being
/// consumed as a value rather than discarded.
fn expr_uses_yield_as_value(expr: &IrExpr, top_level: bool) -> bool {
    match &expr.kind {
        IrExpressionKind::Yield { .. } => !top_level,
        IrExpressionKind::Assignment { value, .. } => expr_uses_yield_as_value(value, false) || is_yield(value),
        IrExpressionKind::Binary { left, right, .. } | IrExpressionKind::Logical { left, right, .. } => {
            is_yield(left) || is_yield(right) || expr_uses_yield_as_value(left, false) || expr_uses_yield_as_value(right, false)
        }
        IrExpressionKind::Ternary { condition, when_true, when_false } => {
            is_yield(condition)
                || is_yield(when_true)
                || is_yield(when_false)
                || expr_uses_yield_as_value(condition, false)
                || expr_uses_yield_as_value(when_true, false)
                || expr_uses_yield_as_value(when_false, false)
        }
        IrExpressionKind::Call { arguments, .. } => arguments.iter().any(|a| is_yield(a) || expr_uses_yield_as_value(a, false)),
        _ => false,
    }
}

fn is_yield(expr: &IrExpr) -> bool {
    matches!(expr.kind, IrExpressionKind::Yield { .. })
}

pub fn lower_class(class: &ClassNode, ctx: &mut BuildContext) -> Result<ClassDecl, Diagnostic> {
    ctx.push_generic_scope(Vec::new());
    let type_parameters = lower_type_parameters(&class.type_parameters, ctx)?;
    let extends = match &class.extends {
        Some(t) => Some(lower_type(t, ctx)?),
        None => None,
    };
    let mut members = Vec::with_capacity(class.members.len());
    for m in &class.members {
        let kind = match &m.kind {
            ClassMemberKindNode::Field { declared_type, initializer } => {
                let initializer_ir = match initializer {
                    Some(init) => Some(lower_expr(init, ctx)?),
                    None => None,
                };
                let ty = match declared_type {
                    Some(t) => lower_type(t, ctx)?,
                    None => initializer_ir.as_ref().map(|e| e.ty.clone()).unwrap_or(IrType::Any),
                };
                ClassMemberKind::Field {
                    ty,
                    initializer: initializer_ir,
                }
            }
            ClassMemberKindNode::Method(f) => ClassMemberKind::Method(lower_function(f, ctx)?),
            ClassMemberKindNode::Getter(f) => ClassMemberKind::Property {
                ty: match &f.return_type {
                    Some(t) => lower_type(t, ctx)?,
                    None => IrType::Any,
                },
                getter: true,
                setter: false,
                forward: None,
            },
            ClassMemberKindNode::Setter(f) => ClassMemberKind::Property {
                ty: f
                    .parameters
                    .first()
                    .and_then(|p| p.declared_type.as_ref())
                    .map(|t| lower_type(t, ctx))
                    .transpose()?
                    .unwrap_or(IrType::Any),
                getter: false,
                setter: true,
                forward: None,
            },
            ClassMemberKindNode::Constructor(f) => ClassMemberKind::Constructor(lower_function(f, ctx)?),
        };
        members.push(ClassMember {
            name: m.name.clone(),
            kind,
            is_static: m.is_static,
            is_override: false,
        });
    }
    ctx.pop_generic_scope();
    Ok(ClassDecl {
        name: class.name.clone(),
        type_parameters,
        extends,
        members,
        is_exported: class.is_exported,
    })
}

fn lower_interface(iface: &InterfaceNode, ctx: &mut BuildContext) -> Result<InterfaceDecl, Diagnostic> {
    ctx.push_generic_scope(Vec::new());
    let type_parameters = lower_type_parameters(&iface.type_parameters, ctx)?;
    let mut members = Vec::with_capacity(iface.members.len());
    for (name, ty, optional) in &iface.members {
        members.push(ObjectMember {
            name: name.clone(),
            ty: lower_type(ty, ctx)?,
            optional: *optional,
        });
    }
    ctx.pop_generic_scope();
    Ok(InterfaceDecl {
        name: iface.name.clone(),
        type_parameters,
        members,
        is_exported: iface.is_exported,
    })
}

fn lower_enum(e: &EnumNode) -> EnumDecl {
    EnumDecl {
        name: e.name.clone(),
        members: e.members.clone(),
        is_exported: e.is_exported,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctx::test_program;
    use tsonic_common::Span;
    use tsonic_program::testing::StubChecker;

    #[test]
    fn unidirectional_generator_has_no_exchange_schema() {
        let body = vec![IrStmt {
            span: Span::dummy(),
            kind: IrStatementKind::ExpressionStatement(IrExpr::new(
                Span::dummy(),
                IrExpressionKind::Yield {
                    argument: Some(Box::new(IrExpr::new(
                        Span::dummy(),
                        IrExpressionKind::Literal(tsonic_ir::types::LiteralType::Number(1.0)),
                        IrType::Primitive(tsonic_ir::types::PrimitiveType::Double),
                    ))),
                    delegate: false,
                },
                IrType::Any,
            )),
        }];
        let kind = detect_generator_kind(&body, &IrType::Any, false);
        assert!(matches!(kind, GeneratorKind::Unidirectional { .. }));
    }

    #[test]
    fn bidirectional_generator_detected_via_assignment() {
        let yield_expr = IrExpr::new(
            Span::dummy(),
            IrExpressionKind::Yield { argument: None, delegate: false },
            IrType::Any,
        );
        let body = vec![IrStmt {
            span: Span::dummy(),
            kind: IrStatementKind::ExpressionStatement(IrExpr::new(
                Span::dummy(),
                IrExpressionKind::Assignment {
                    op: tsonic_ir::expr::AssignOp::AddAssign,
                    target: Box::new(IrExpr::new(
                        Span::dummy(),
                        IrExpressionKind::Identifier { name: "t".to_string(), clr_binding: None },
                        IrType::Any,
                    )),
                    value: Box::new(yield_expr),
                },
                IrType::Any,
            )),
        }];
        let kind = detect_generator_kind(&body, &IrType::Any, false);
        assert!(matches!(kind, GeneratorKind::Bidirectional(_)));
    }

    #[test]
    fn empty_function_body_lowers() {
        let checker = StubChecker::new();
        let program = test_program(&checker);
        let mut ctx = BuildContext::new(&program, "a.ts".to_string());
        let f = FunctionNode {
            node_id: 0,
            name: "f".to_string(),
            type_parameters: vec![],
            parameters: vec![],
            return_type: None,
            body: vec![],
            is_async: false,
            is_generator: false,
            decorators: vec![],
            is_exported: true,
        };
        let decl = lower_function(&f, &mut ctx).unwrap();
        assert_eq!(decl.return_type, IrType::Void);
        assert!(decl.generator.is_none());
    }

    #[test]
    fn throwing_a_string_literal_is_rejected() {
        let checker = StubChecker::new();
        let program = test_program(&checker);
        let mut ctx = BuildContext::new(&program, "a.ts".to_string());
        let stmt = TsStatement {
            node_id: 0,
            span: Span::dummy(),
            kind: TsStatementKind::Throw(TsExpression::new(
                0,
                Span::dummy(),
                tsonic_program::ast::TsExpressionKind::StringLiteral("oops".to_string()),
            )),
        };
        let err = lower_statement(&stmt, false, &mut ctx).unwrap_err();
        assert_eq!(err.code, tsonic_common::diagnostics::E4002_THROW_NON_EXCEPTION);
    }

    #[test]
    fn labeled_break_is_rejected_instead_of_emitting_an_undefined_goto_target() {
        let checker = StubChecker::new();
        let program = test_program(&checker);
        let mut ctx = BuildContext::new(&program, "a.ts".to_string());
        let stmt = TsStatement {
            node_id: 0,
            span: Span::dummy(),
            kind: TsStatementKind::Break(Some("outer".to_string())),
        };
        let err = lower_statement(&stmt, false, &mut ctx).unwrap_err();
        assert_eq!(err.code, tsonic_common::diagnostics::E4001_UNLOWERABLE_CONSTRUCT);
    }
}

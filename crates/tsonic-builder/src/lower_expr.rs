//! Expression lowering (spec §4.6 "Identifiers and member access", "Calls",
//! "Null narrowing", "Intrinsics").

use tsonic_common::{Diagnostic, Span};
use tsonic_ir::expr::{
    AssignOp, BinaryOp, ClrBinding, IrExpr, IrExpressionKind, LogicalOp, ResolvedSignature, UnaryOp, UpdateOp,
};
use tsonic_ir::specialisation::SpecialisationRequest;
use tsonic_ir::types::{IrType, LiteralType, ParamModifier as IrParamModifier, PrimitiveType};
use tsonic_program::ast::{NodeId, TsExpression, TsExpressionKind};
use tsonic_program::checker::SymbolRef;

use crate::ctx::BuildContext;
use crate::intrinsics;
use crate::types::lower_type;

pub fn lower_expr(expr: &TsExpression, ctx: &mut BuildContext) -> Result<IrExpr, Diagnostic> {
    let span = expr.span;
    match expr.kind.as_ref() {
        TsExpressionKind::StringLiteral(s) => Ok(IrExpr::new(
            span,
            IrExpressionKind::Literal(LiteralType::String(s.clone())),
            IrType::Primitive(PrimitiveType::String),
        )),
        TsExpressionKind::NumericLiteral(n) => {
            let ty = infer_numeric_literal_type(*n);
            Ok(IrExpr::new(span, IrExpressionKind::Literal(LiteralType::Number(*n)), ty))
        }
        TsExpressionKind::BoolLiteral(b) => Ok(IrExpr::new(
            span,
            IrExpressionKind::Literal(LiteralType::Bool(*b)),
            IrType::Primitive(PrimitiveType::Bool),
        )),
        TsExpressionKind::NullLiteral => Ok(IrExpr::new(
            span,
            IrExpressionKind::Literal(LiteralType::Bool(false)),
            IrType::Nullable(Box::new(IrType::Any)),
        )),
        TsExpressionKind::Identifier(name) => lower_identifier(name, expr.node_id, span, ctx),
        TsExpressionKind::ArrayLiteral(items) => {
            let mut lowered = Vec::with_capacity(items.len());
            for item in items {
                lowered.push(lower_expr(item, ctx)?);
            }
            let element_ty = infer_array_element_type(&lowered);
            Ok(IrExpr::new(
                span,
                IrExpressionKind::ArrayLiteral(lowered),
                IrType::Array(Box::new(element_ty)),
            ))
        }
        TsExpressionKind::ObjectLiteral(members) => {
            let mut lowered = Vec::with_capacity(members.len());
            let mut member_types = Vec::with_capacity(members.len());
            for (name, value) in members {
                let value_ir = lower_expr(value, ctx)?;
                member_types.push(tsonic_ir::types::ObjectTypeMember {
                    name: name.clone(),
                    ty: value_ir.ty.clone(),
                    optional: false,
                });
                lowered.push((name.clone(), value_ir));
            }
            let canonical_key = IrType::ObjectLiteral(member_types.clone()).canonical_key();
            let mangled = ctx.hoist_record(canonical_key, member_types.clone());
            Ok(IrExpr::new(
                span,
                IrExpressionKind::ObjectLiteral(lowered),
                IrType::Reference {
                    name: mangled,
                    type_arguments: vec![],
                    clr_qualified: None,
                },
            ))
        }
        TsExpressionKind::MemberAccess { object, member, optional } => {
            lower_member_access(object, member, *optional, expr.node_id, span, ctx)
        }
        TsExpressionKind::Call {
            callee,
            arguments,
            type_arguments,
            optional,
        } => lower_call(callee, arguments, type_arguments, *optional, expr.node_id, span, ctx, false),
        TsExpressionKind::New {
            callee,
            arguments,
            type_arguments,
        } => lower_call(callee, arguments, type_arguments, false, expr.node_id, span, ctx, true),
        TsExpressionKind::This => Ok(IrExpr::new(span, IrExpressionKind::This, IrType::Any)),
        TsExpressionKind::Unary { op, operand } => {
            let operand_ir = lower_expr(operand, ctx)?;
            let op = lower_unary_op(op);
            let ty = match op {
                UnaryOp::Not => IrType::Primitive(PrimitiveType::Bool),
                UnaryOp::TypeOf => IrType::Primitive(PrimitiveType::String),
                UnaryOp::Void => IrType::Void,
                _ => operand_ir.ty.clone(),
            };
            Ok(IrExpr::new(
                span,
                IrExpressionKind::Unary { op, operand: Box::new(operand_ir) },
                ty,
            ))
        }
        TsExpressionKind::Update { op, operand, prefix } => {
            let operand_ir = lower_expr(operand, ctx)?;
            let ty = operand_ir.ty.clone();
            Ok(IrExpr::new(
                span,
                IrExpressionKind::Update {
                    op: lower_update_op(op),
                    operand: Box::new(operand_ir),
                    prefix: *prefix,
                },
                ty,
            ))
        }
        TsExpressionKind::Binary { op, left, right } => {
            let left_ir = lower_expr(left, ctx)?;
            let right_ir = lower_expr(right, ctx)?;
            let binop = lower_binary_op(op);
            let ty = binary_result_type(binop, &left_ir.ty, &right_ir.ty);
            Ok(IrExpr::new(
                span,
                IrExpressionKind::Binary {
                    op: binop,
                    left: Box::new(left_ir),
                    right: Box::new(right_ir),
                },
                ty,
            ))
        }
        TsExpressionKind::Logical { op, left, right } => {
            let left_ir = lower_expr(left, ctx)?;
            let right_ir = lower_expr(right, ctx)?;
            let ty = right_ir.ty.clone();
            Ok(IrExpr::new(
                span,
                IrExpressionKind::Logical {
                    op: lower_logical_op(op),
                    left: Box::new(left_ir),
                    right: Box::new(right_ir),
                },
                ty,
            ))
        }
        TsExpressionKind::Ternary { condition, when_true, when_false } => {
            let condition_ir = lower_expr(condition, ctx)?;
            let when_true_ir = lower_expr(when_true, ctx)?;
            let when_false_ir = lower_expr(when_false, ctx)?;
            let ty = when_true_ir.ty.clone();
            Ok(IrExpr::new(
                span,
                IrExpressionKind::Ternary {
                    condition: Box::new(condition_ir),
                    when_true: Box::new(when_true_ir),
                    when_false: Box::new(when_false_ir),
                },
                ty,
            ))
        }
        TsExpressionKind::Assignment { op, target, value } => {
            let target_ir = lower_expr(target, ctx)?;
            let value_ir = lower_expr(value, ctx)?;
            let ty = target_ir.ty.clone();
            Ok(IrExpr::new(
                span,
                IrExpressionKind::Assignment {
                    op: lower_assign_op(op),
                    target: Box::new(target_ir),
                    value: Box::new(value_ir),
                },
                ty,
            ))
        }
        TsExpressionKind::TemplateLiteral { quasis, expressions } => {
            let mut lowered = Vec::with_capacity(expressions.len());
            for e in expressions {
                lowered.push(lower_expr(e, ctx)?);
            }
            Ok(IrExpr::new(
                span,
                IrExpressionKind::TemplateLiteral {
                    quasis: quasis.clone(),
                    expressions: lowered,
                },
                IrType::Primitive(PrimitiveType::String),
            ))
        }
        TsExpressionKind::Spread(operand) => {
            let operand_ir = lower_expr(operand, ctx)?;
            let ty = operand_ir.ty.clone();
            Ok(IrExpr::new(span, IrExpressionKind::Spread(Box::new(operand_ir)), ty))
        }
        TsExpressionKind::Await(operand) => {
            let operand_ir = lower_expr(operand, ctx)?;
            let ty = unwrap_task(&operand_ir.ty);
            Ok(IrExpr::new(span, IrExpressionKind::Await(Box::new(operand_ir)), ty))
        }
        TsExpressionKind::Yield { argument, delegate } => {
            let argument_ir = match argument {
                Some(a) => Some(Box::new(lower_expr(a, ctx)?)),
                None => None,
            };
            Ok(IrExpr::new(
                span,
                IrExpressionKind::Yield {
                    argument: argument_ir,
                    delegate: *delegate,
                },
                IrType::Any,
            ))
        }
        TsExpressionKind::Function(_) | TsExpressionKind::Arrow { .. } => {
            crate::lower_stmt::lower_function_expression(expr, ctx)
        }
        TsExpressionKind::DynamicImport(_) => Err(Diagnostic::error(
            tsonic_common::diagnostics::E3003_DYNAMIC_IMPORT,
            "dynamic `import()` is not supported",
        )),
        TsExpressionKind::Intrinsic { name, type_arguments, arguments } => {
            lower_intrinsic(name, type_arguments, arguments, span, ctx)
        }
    }
}

fn lower_identifier(name: &str, node_id: NodeId, span: Span, ctx: &mut BuildContext) -> Result<IrExpr, Diagnostic> {
    let narrowed = ctx.program.checker.flow_narrowed_type_at(&ctx.file_path, node_id);
    let declared = narrowed.unwrap_or_else(|| ctx.program.checker.type_of(&ctx.file_path, node_id));
    let ty = lower_type(&declared, ctx)?;

    let clr_binding = resolve_symbol_alias(ctx, node_id).and_then(|alias| {
        ctx.bindings()
            .lookup_type(&alias)
            .map(|entry| ClrBinding {
                assembly: entry.clr_assembly.clone(),
                clr_qualified_type: entry.clr_qualified_type.clone(),
                clr_member: None,
            })
            .or_else(|| {
                ctx.bindings().lookup_bare(&alias).map(|entry| ClrBinding {
                    assembly: entry.clr_assembly.clone(),
                    clr_qualified_type: entry.clr_qualified_type.clone(),
                    clr_member: None,
                })
            })
    });

    Ok(IrExpr::new(
        span,
        IrExpressionKind::Identifier {
            name: name.to_string(),
            clr_binding,
        },
        ty,
    ))
}

/// Reconstructs the TS alias path (`"Namespace.Name"`) a symbol is imported
/// under, which doubles as a binding-manifest lookup key (spec §4.2).
fn resolve_symbol_alias(ctx: &BuildContext, node_id: NodeId) -> Option<String> {
    let SymbolRef { module_path, name } = ctx.program.checker.symbol_of(&ctx.file_path, node_id)?;
    if module_path.is_empty() {
        Some(name)
    } else {
        Some(format!("{module_path}.{name}"))
    }
}

fn lower_member_access(
    object: &TsExpression,
    member: &str,
    optional: bool,
    node_id: NodeId,
    span: Span,
    ctx: &mut BuildContext,
) -> Result<IrExpr, Diagnostic> {
    let object_alias = resolve_symbol_alias(ctx, object.node_id);
    let object_ir = lower_expr(object, ctx)?;

    let clr_binding = object_alias.and_then(|alias| {
        ctx.bindings()
            .lookup_member(&alias, member)
            .map(|entry| ClrBinding {
                assembly: entry.clr_assembly.clone(),
                clr_qualified_type: entry.clr_qualified_type.clone(),
                clr_member: entry.clr_member.clone().or_else(|| Some(member.to_string())),
            })
            .or_else(|| {
                ctx.bindings().lookup_type(&format!("{alias}.{member}")).map(|entry| ClrBinding {
                    assembly: entry.clr_assembly.clone(),
                    clr_qualified_type: entry.clr_qualified_type.clone(),
                    clr_member: None,
                })
            })
    });

    let narrowed = ctx.program.checker.flow_narrowed_type_at(&ctx.file_path, node_id);
    let declared = narrowed.unwrap_or_else(|| ctx.program.checker.type_of(&ctx.file_path, node_id));
    let ty = lower_type(&declared, ctx)?;

    Ok(IrExpr::new(
        span,
        IrExpressionKind::MemberAccess {
            object: Box::new(object_ir),
            member: member.to_string(),
            optional,
            clr_binding,
        },
        ty,
    ))
}

#[allow(clippy::too_many_arguments)]
fn lower_call(
    callee: &TsExpression,
    arguments: &[TsExpression],
    type_arguments: &[tsonic_program::ast::TsType],
    optional: bool,
    node_id: NodeId,
    span: Span,
    ctx: &mut BuildContext,
    is_new: bool,
) -> Result<IrExpr, Diagnostic> {
    let callee_ir = lower_expr(callee, ctx)?;
    let mut argument_irs = Vec::with_capacity(arguments.len());
    for a in arguments {
        argument_irs.push(lower_expr(a, ctx)?);
    }

    let mut lowered_type_args = Vec::with_capacity(type_arguments.len());
    for t in type_arguments {
        lowered_type_args.push(lower_type(t, ctx)?);
    }

    let call_sig = ctx.program.checker.resolved_call_signature_of(&ctx.file_path, node_id);
    if let Some(sig) = &call_sig {
        if lowered_type_args.is_empty() {
            for t in &sig.type_arguments {
                lowered_type_args.push(lower_type(t, ctx)?);
            }
        }
    }

    let resolved_signature = resolve_signature(&callee_ir, ctx);

    if let IrExpressionKind::Identifier { clr_binding: None, .. } = &callee_ir.kind {
        if !lowered_type_args.is_empty() {
            ctx.push_specialisation_request(SpecialisationRequest {
                generic_decl_id: callee_name(&callee_ir).unwrap_or_default(),
                type_arguments: lowered_type_args.clone(),
            });
        }
    }

    let ty = call_sig
        .map(|sig| lower_type(&sig.return_type, ctx))
        .transpose()?
        .or_else(|| resolved_signature.as_ref().map(|s| s.return_type.clone()))
        .unwrap_or(IrType::Any);

    let kind = if is_new {
        IrExpressionKind::New {
            callee: Box::new(callee_ir),
            arguments: argument_irs,
            type_arguments: lowered_type_args,
        }
    } else {
        IrExpressionKind::Call {
            callee: Box::new(callee_ir),
            arguments: argument_irs,
            type_arguments: lowered_type_args,
            resolved_signature,
            optional,
        }
    };

    Ok(IrExpr::new(span, kind, ty))
}

fn callee_name(callee: &IrExpr) -> Option<String> {
    match &callee.kind {
        IrExpressionKind::Identifier { name, .. } => Some(name.clone()),
        IrExpressionKind::MemberAccess { member, .. } => Some(member.clone()),
        _ => None,
    }
}

/// Parameter modifiers (`in`/`out`/`ref`) come from metadata keyed by the
/// callee's resolved CLR type and member signature (spec §4.6 "Calls").
fn resolve_signature(callee: &IrExpr, ctx: &BuildContext) -> Option<ResolvedSignature> {
    let clr_binding = match &callee.kind {
        IrExpressionKind::Identifier { clr_binding, .. } => clr_binding.as_ref(),
        IrExpressionKind::MemberAccess { clr_binding, .. } => clr_binding.as_ref(),
        _ => None,
    }?;
    let member = clr_binding.clr_member.as_ref()?;
    let type_metadata = ctx.metadata().type_metadata(&clr_binding.clr_qualified_type)?;
    let signature_key = type_metadata
        .members
        .keys()
        .find(|sig| sig.split('(').next() == Some(member.as_str()))?;
    let member_metadata = type_metadata.members.get(signature_key)?;
    Some(ResolvedSignature {
        param_modifiers: member_metadata
            .param_modifiers
            .iter()
            .map(|m| match m {
                tsonic_registries::metadata::ParamModifier::In => IrParamModifier::In,
                tsonic_registries::metadata::ParamModifier::Out => IrParamModifier::Out,
                tsonic_registries::metadata::ParamModifier::Ref => IrParamModifier::Ref,
                tsonic_registries::metadata::ParamModifier::None => IrParamModifier::None,
            })
            .collect(),
        return_type: IrType::Any,
    })
}

fn lower_intrinsic(
    name: &str,
    type_arguments: &[tsonic_program::ast::TsType],
    arguments: &[TsExpression],
    span: Span,
    ctx: &mut BuildContext,
) -> Result<IrExpr, Diagnostic> {
    let Some(kind) = intrinsics::lookup(name) else {
        return Err(Diagnostic::error(
            tsonic_common::diagnostics::E4001_UNLOWERABLE_CONSTRUCT,
            format!("unknown intrinsic `{name}`"),
        ));
    };
    let type_argument = match type_arguments.first() {
        Some(t) => Some(lower_type(t, ctx)?),
        None => None,
    };
    let mut lowered_args = Vec::with_capacity(arguments.len());
    for a in arguments {
        lowered_args.push(lower_expr(a, ctx)?);
    }
    let ty = match kind {
        tsonic_ir::expr::IntrinsicKind::SizeOf => IrType::Primitive(PrimitiveType::Int),
        tsonic_ir::expr::IntrinsicKind::NameOf => IrType::Primitive(PrimitiveType::String),
        tsonic_ir::expr::IntrinsicKind::IsType => IrType::Primitive(PrimitiveType::Bool),
        tsonic_ir::expr::IntrinsicKind::DefaultOf | tsonic_ir::expr::IntrinsicKind::TryCast => {
            type_argument.clone().unwrap_or(IrType::Any)
        }
        _ => type_argument.clone().unwrap_or(IrType::Any),
    };
    Ok(IrExpr::new(
        span,
        IrExpressionKind::Intrinsic {
            kind,
            type_argument,
            arguments: lowered_args,
        },
        ty,
    ))
}

/// Integer-looking literals default to a 32-bit integer, overflowing to a
/// 64-bit integer; fractional literals default to `double` (spec §4.6
/// "Types").
fn infer_numeric_literal_type(n: f64) -> IrType {
    if n.fract() == 0.0 {
        if n >= i32::MIN as f64 && n <= i32::MAX as f64 {
            IrType::Primitive(PrimitiveType::Int)
        } else {
            IrType::Primitive(PrimitiveType::Long)
        }
    } else {
        IrType::Primitive(PrimitiveType::Double)
    }
}

/// Scans literal elements; escalates to `long` if any integer exceeds
/// 32-bit range, to `double` if any non-integer numeric is present (spec
/// §4.6 "Arrays").
fn infer_array_element_type(elements: &[IrExpr]) -> IrType {
    let mut result = IrType::Any;
    let mut seen_numeric = false;
    for el in elements {
        match &el.ty {
            IrType::Primitive(PrimitiveType::Double) => {
                seen_numeric = true;
                result = IrType::Primitive(PrimitiveType::Double);
            }
            IrType::Primitive(PrimitiveType::Long) if !matches!(result, IrType::Primitive(PrimitiveType::Double)) => {
                seen_numeric = true;
                result = IrType::Primitive(PrimitiveType::Long);
            }
            IrType::Primitive(PrimitiveType::Int) if !seen_numeric => {
                seen_numeric = true;
                result = IrType::Primitive(PrimitiveType::Int);
            }
            _ if !seen_numeric => {
                if matches!(result, IrType::Any) {
                    result = el.ty.clone();
                }
            }
            _ => {}
        }
    }
    result
}

fn unwrap_task(ty: &IrType) -> IrType {
    match ty {
        IrType::Reference { name, type_arguments, .. } if name == "Task" || name == "Promise" => type_arguments
            .first()
            .cloned()
            .unwrap_or(IrType::Void),
        other => other.clone(),
    }
}

fn lower_unary_op(op: &str) -> UnaryOp {
    match op {
        "+" => UnaryOp::Plus,
        "-" => UnaryOp::Minus,
        "!" => UnaryOp::Not,
        "~" => UnaryOp::BitNot,
        "typeof" => UnaryOp::TypeOf,
        "void" => UnaryOp::Void,
        _ => UnaryOp::Plus,
    }
}

fn lower_update_op(op: &str) -> UpdateOp {
    if op == "--" {
        UpdateOp::Decrement
    } else {
        UpdateOp::Increment
    }
}

fn lower_binary_op(op: &str) -> BinaryOp {
    match op {
        "+" => BinaryOp::Add,
        "-" => BinaryOp::Sub,
        "*" => BinaryOp::Mul,
        "/" => BinaryOp::Div,
        "%" => BinaryOp::Mod,
        "**" => BinaryOp::Exponent,
        "===" => BinaryOp::StrictEq,
        "!==" => BinaryOp::StrictNotEq,
        "==" => BinaryOp::LooseEq,
        "!=" => BinaryOp::LooseNotEq,
        "<" => BinaryOp::Lt,
        "<=" => BinaryOp::Lte,
        ">" => BinaryOp::Gt,
        ">=" => BinaryOp::Gte,
        "&" => BinaryOp::BitAnd,
        "|" => BinaryOp::BitOr,
        "^" => BinaryOp::BitXor,
        "<<" => BinaryOp::Shl,
        ">>" => BinaryOp::Shr,
        ">>>" => BinaryOp::UShr,
        "instanceof" => BinaryOp::InstanceOf,
        "in" => BinaryOp::In,
        _ => BinaryOp::Add,
    }
}

fn lower_logical_op(op: &str) -> LogicalOp {
    match op {
        "&&" => LogicalOp::And,
        "||" => LogicalOp::Or,
        "??" => LogicalOp::NullishCoalesce,
        _ => LogicalOp::And,
    }
}

fn lower_assign_op(op: &str) -> AssignOp {
    match op {
        "=" => AssignOp::Assign,
        "+=" => AssignOp::AddAssign,
        "-=" => AssignOp::SubAssign,
        "*=" => AssignOp::MulAssign,
        "/=" => AssignOp::DivAssign,
        "%=" => AssignOp::ModAssign,
        "??=" => AssignOp::NullishAssign,
        "&&=" => AssignOp::AndAssign,
        "||=" => AssignOp::OrAssign,
        _ => AssignOp::Assign,
    }
}

fn binary_result_type(op: BinaryOp, left: &IrType, right: &IrType) -> IrType {
    match op {
        BinaryOp::StrictEq
        | BinaryOp::StrictNotEq
        | BinaryOp::LooseEq
        | BinaryOp::LooseNotEq
        | BinaryOp::Lt
        | BinaryOp::Lte
        | BinaryOp::Gt
        | BinaryOp::Gte
        | BinaryOp::InstanceOf
        | BinaryOp::In => IrType::Primitive(PrimitiveType::Bool),
        BinaryOp::Add
            if matches!(left, IrType::Primitive(PrimitiveType::String))
                || matches!(right, IrType::Primitive(PrimitiveType::String)) =>
        {
            IrType::Primitive(PrimitiveType::String)
        }
        _ if matches!(left, IrType::Primitive(PrimitiveType::Double))
            || matches!(right, IrType::Primitive(PrimitiveType::Double)) =>
        {
            IrType::Primitive(PrimitiveType::Double)
        }
        _ => left.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctx::test_program;
    use tsonic_common::Span;
    use tsonic_program::testing::StubChecker;

    #[test]
    fn small_integer_literal_lowers_to_int() {
        let checker = StubChecker::new();
        let program = test_program(&checker);
        let mut ctx = BuildContext::new(&program, "a.ts".to_string());
        let expr = TsExpression::new(0, Span::new(0, 1), TsExpressionKind::NumericLiteral(42.0));
        let ir = lower_expr(&expr, &mut ctx).unwrap();
        assert_eq!(ir.ty, IrType::Primitive(PrimitiveType::Int));
    }

    #[test]
    fn fractional_literal_lowers_to_double() {
        let checker = StubChecker::new();
        let program = test_program(&checker);
        let mut ctx = BuildContext::new(&program, "a.ts".to_string());
        let expr = TsExpression::new(0, Span::new(0, 1), TsExpressionKind::NumericLiteral(3.5));
        let ir = lower_expr(&expr, &mut ctx).unwrap();
        assert_eq!(ir.ty, IrType::Primitive(PrimitiveType::Double));
    }

    #[test]
    fn array_with_fraction_escalates_to_double() {
        let checker = StubChecker::new();
        let program = test_program(&checker);
        let mut ctx = BuildContext::new(&program, "a.ts".to_string());
        let expr = TsExpression::new(
            0,
            Span::new(0, 1),
            TsExpressionKind::ArrayLiteral(vec![
                TsExpression::new(1, Span::new(0, 1), TsExpressionKind::NumericLiteral(1.0)),
                TsExpression::new(2, Span::new(0, 1), TsExpressionKind::NumericLiteral(2.5)),
            ]),
        );
        let ir = lower_expr(&expr, &mut ctx).unwrap();
        assert_eq!(ir.ty, IrType::Array(Box::new(IrType::Primitive(PrimitiveType::Double))));
    }

    #[test]
    fn istype_intrinsic_is_recognised() {
        let checker = StubChecker::new();
        let program = test_program(&checker);
        let mut ctx = BuildContext::new(&program, "a.ts".to_string());
        let expr = TsExpression::new(
            0,
            Span::new(0, 1),
            TsExpressionKind::Intrinsic {
                name: "istype".to_string(),
                type_arguments: vec![tsonic_program::ast::TsType::TypeRef {
                    name: "number".to_string(),
                    type_arguments: vec![],
                }],
                arguments: vec![TsExpression::new(1, Span::new(0, 1), TsExpressionKind::Identifier("x".to_string()))],
            },
        );
        let ir = lower_expr(&expr, &mut ctx).unwrap();
        assert!(matches!(ir.kind, IrExpressionKind::Intrinsic { kind: tsonic_ir::expr::IntrinsicKind::IsType, .. }));
        assert_eq!(ir.ty, IrType::Primitive(PrimitiveType::Bool));
    }
}

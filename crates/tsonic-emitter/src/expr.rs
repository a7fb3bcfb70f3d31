//! Expression-to-C# lowering (spec §4.9 "Operator lowering", "Mode-dependent
//! built-in routing").

use tsonic_common::Mode;
use tsonic_ir::expr::{AssignOp, BinaryOp, IrExpr, IrExpressionKind, IntrinsicKind, LogicalOp, ResolvedSignature, UnaryOp, UpdateOp};
use tsonic_ir::types::{IrType, LiteralType, ParamModifier, PrimitiveType};

use crate::builtins;
use crate::types::render_type;

pub fn emit_expr(expr: &IrExpr, mode: Mode) -> String {
    match &expr.kind {
        IrExpressionKind::Literal(lit) => emit_literal(lit),
        IrExpressionKind::Identifier { name, .. } => name.clone(),
        IrExpressionKind::This => "this".to_string(),
        IrExpressionKind::ArrayLiteral(items) => {
            let rendered: Vec<String> = items.iter().map(|i| emit_expr(i, mode)).collect();
            format!("new[] {{ {} }}", rendered.join(", "))
        }
        IrExpressionKind::ObjectLiteral(members) => {
            let rendered: Vec<String> = members.iter().map(|(name, value)| format!("{name} = {}", emit_expr(value, mode))).collect();
            format!("new {{ {} }}", rendered.join(", "))
        }
        IrExpressionKind::Function(body) | IrExpressionKind::Arrow(body) => emit_lambda(body, mode),
        IrExpressionKind::MemberAccess { object, member, optional, .. } => emit_member_access(object, member, *optional, mode),
        IrExpressionKind::Call { callee, arguments, optional, resolved_signature, .. } => {
            emit_call(callee, arguments, *optional, resolved_signature.as_ref(), mode)
        }
        IrExpressionKind::New { callee, arguments, .. } => {
            let args: Vec<String> = arguments.iter().map(|a| emit_expr(a, mode)).collect();
            format!("new {}({})", emit_expr(callee, mode), args.join(", "))
        }
        IrExpressionKind::Unary { op, operand } => emit_unary(*op, operand, mode),
        IrExpressionKind::Update { op, operand, prefix } => {
            let text = emit_expr(operand, mode);
            let sym = match op {
                UpdateOp::Increment => "++",
                UpdateOp::Decrement => "--",
            };
            if *prefix { format!("{sym}{text}") } else { format!("{text}{sym}") }
        }
        IrExpressionKind::Binary { op, left, right } => emit_binary(*op, left, right, mode),
        IrExpressionKind::Logical { op, left, right } => {
            let l = emit_expr(left, mode);
            let r = emit_expr(right, mode);
            let sym = match op {
                LogicalOp::And => "&&",
                LogicalOp::Or => "||",
                LogicalOp::NullishCoalesce => "??",
            };
            format!("({l} {sym} {r})")
        }
        IrExpressionKind::Ternary { condition, when_true, when_false } => {
            format!("({} ? {} : {})", emit_expr(condition, mode), emit_expr(when_true, mode), emit_expr(when_false, mode))
        }
        IrExpressionKind::Assignment { op, target, value } => {
            let sym = match op {
                AssignOp::Assign => "=",
                AssignOp::AddAssign => "+=",
                AssignOp::SubAssign => "-=",
                AssignOp::MulAssign => "*=",
                AssignOp::DivAssign => "/=",
                AssignOp::ModAssign => "%=",
                AssignOp::NullishAssign => "??=",
                AssignOp::AndAssign => "&&=",
                AssignOp::OrAssign => "||=",
            };
            format!("{} {sym} {}", emit_expr(target, mode), emit_expr(value, mode))
        }
        IrExpressionKind::TemplateLiteral { quasis, expressions } => emit_template_literal(quasis, expressions, mode),
        IrExpressionKind::Spread(inner) => emit_expr(inner, mode),
        IrExpressionKind::Await(inner) => format!("await {}", emit_expr(inner, mode)),
        IrExpressionKind::Yield { argument, delegate } => {
            let value = argument.as_ref().map(|a| emit_expr(a, mode)).unwrap_or_default();
            if *delegate { format!("yield* {value}") } else { format!("yield {value}") }
        }
        IrExpressionKind::Intrinsic { kind, type_argument, arguments } => emit_intrinsic(*kind, type_argument.as_ref(), arguments, mode),
    }
}

fn emit_literal(lit: &LiteralType) -> String {
    match lit {
        LiteralType::String(s) => format!("{s:?}"),
        LiteralType::Number(n) => {
            if n.fract() == 0.0 && n.is_finite() {
                format!("{n:.1}")
            } else {
                format!("{n}")
            }
        }
        LiteralType::Bool(b) => b.to_string(),
    }
}

fn emit_lambda(body: &tsonic_ir::stmt::IrFunctionBody, mode: Mode) -> String {
    let params: Vec<String> = body.parameters.iter().map(|p| p.name.clone()).collect();
    let prefix = if body.is_async { "async " } else { "" };
    if body.body.len() == 1 {
        if let tsonic_ir::stmt::IrStatementKind::Return(Some(e)) = &body.body[0].kind {
            return format!("{prefix}({}) => {}", params.join(", "), emit_expr(e, mode));
        }
    }
    let mut w = crate::writer::Writer::new();
    w.block(&format!("{prefix}({}) =>", params.join(", ")), |w| {
        for stmt in &body.body {
            crate::stmt::emit_stmt(stmt, w, mode, false);
        }
    });
    w.into_string()
}

fn emit_member_access(object: &IrExpr, member: &str, optional: bool, mode: Mode) -> String {
    let dot = if optional { "?." } else { "." };
    if let IrExpressionKind::Identifier { name, .. } = &object.kind {
        if name == "Math" || name == "console" {
            return format!("{name}{dot}{member}");
        }
    }
    format!("{}{dot}{member}", emit_expr(object, mode))
}

fn emit_call(callee: &IrExpr, arguments: &[IrExpr], optional: bool, resolved_signature: Option<&ResolvedSignature>, mode: Mode) -> String {
    let args: Vec<String> = arguments
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let modifier_prefix = resolved_signature
                .and_then(|sig| sig.param_modifiers.get(i))
                .map(modifier_keyword)
                .unwrap_or_default();
            format!("{modifier_prefix}{}", emit_expr(a, mode))
        })
        .collect();
    if let IrExpressionKind::MemberAccess { object, member, .. } = &callee.kind {
        if let IrExpressionKind::Identifier { name, .. } = &object.kind {
            match name.as_str() {
                "Math" => {
                    if let Some(routed) = builtins::render_math_call(mode, member, &args) {
                        return routed;
                    }
                }
                "console" => {
                    if let Some(routed) = builtins::render_console_call(mode, member, &args) {
                        return routed;
                    }
                }
                _ => {}
            }
        }
        let receiver = emit_expr(object, mode);
        if matches!(object.ty, IrType::Array(_)) {
            if let Some(routed) = builtins::render_array_call(mode, &receiver, member, &args) {
                return routed;
            }
        }
        if matches!(object.ty, IrType::Primitive(PrimitiveType::String)) {
            if let Some(routed) = builtins::render_string_call(mode, &receiver, member, &args) {
                return routed;
            }
        }
    }
    let dot = if optional { "?." } else { "" };
    let callee_text = emit_expr(callee, mode);
    if optional {
        format!("{callee_text}{dot}Invoke({})", args.join(", "))
    } else {
        format!("{callee_text}({})", args.join(", "))
    }
}

/// Spec §4.6 "Calls": a bound CLR member's `in`/`out`/`ref` parameters must
/// be qualified at the call site too, not just in the callee's own
/// signature (e.g. `dict.TryGetValue("k", out v)`).
fn modifier_keyword(modifier: &ParamModifier) -> &'static str {
    match modifier {
        ParamModifier::None => "",
        ParamModifier::In => "in ",
        ParamModifier::Out => "out ",
        ParamModifier::Ref => "ref ",
    }
}

fn emit_unary(op: UnaryOp, operand: &IrExpr, mode: Mode) -> String {
    let text = emit_expr(operand, mode);
    match op {
        UnaryOp::Plus => format!("+{text}"),
        UnaryOp::Minus => format!("-{text}"),
        UnaryOp::Not => format!("!{text}"),
        UnaryOp::BitNot => format!("~{text}"),
        // `void expr` isn't among the spec's named operator lowerings; the
        // target has no expression-level discard, so the operand is
        // evaluated for its side effects and the `void` itself is dropped.
        UnaryOp::Void => text,
        UnaryOp::TypeOf => format!("{text}.GetType().Name"),
    }
}

fn emit_binary(op: BinaryOp, left: &IrExpr, right: &IrExpr, mode: Mode) -> String {
    let l = emit_expr(left, mode);
    let r = emit_expr(right, mode);
    match op {
        BinaryOp::Add => format!("({l} + {r})"),
        BinaryOp::Sub => format!("({l} - {r})"),
        BinaryOp::Mul => format!("({l} * {r})"),
        BinaryOp::Div => format!("({l} / {r})"),
        BinaryOp::Mod => format!("({l} % {r})"),
        BinaryOp::Exponent => format!("Math.Pow({l}, {r})"),
        BinaryOp::StrictEq | BinaryOp::LooseEq => emit_equality(&l, &r, left, right, false),
        BinaryOp::StrictNotEq | BinaryOp::LooseNotEq => emit_equality(&l, &r, left, right, true),
        BinaryOp::Lt => format!("({l} < {r})"),
        BinaryOp::Lte => format!("({l} <= {r})"),
        BinaryOp::Gt => format!("({l} > {r})"),
        BinaryOp::Gte => format!("({l} >= {r})"),
        BinaryOp::BitAnd => format!("({l} & {r})"),
        BinaryOp::BitOr => format!("({l} | {r})"),
        BinaryOp::BitXor => format!("({l} ^ {r})"),
        BinaryOp::Shl => format!("({l} << {r})"),
        BinaryOp::Shr => format!("({l} >> {r})"),
        BinaryOp::UShr => format!("((int)((uint){l} >> {r}))"),
        BinaryOp::InstanceOf => format!("({l} is {r})"),
        BinaryOp::In => format!("{r}.ContainsKey({l})"),
    }
}

/// Value equality for primitives/reference types compares with `==`/`!=`
/// directly; other reference types (structural objects, generics) go
/// through `Equals` since the target's `==` may be identity-only (spec
/// §4.9 "Operator lowering").
fn emit_equality(l: &str, r: &str, left: &IrExpr, right: &IrExpr, negate: bool) -> String {
    let both_primitive = matches!(left.ty, IrType::Primitive(_)) && matches!(right.ty, IrType::Primitive(_));
    if both_primitive {
        let sym = if negate { "!=" } else { "==" };
        format!("({l} {sym} {r})")
    } else {
        let call = format!("Equals({l}, {r})");
        if negate { format!("!{call}") } else { call }
    }
}

fn emit_template_literal(quasis: &[String], expressions: &[IrExpr], mode: Mode) -> String {
    let mut out = String::from("$\"");
    for (i, quasi) in quasis.iter().enumerate() {
        out.push_str(&quasi.replace('"', "\\\"").replace('{', "{{").replace('}', "}}"));
        if let Some(expr) = expressions.get(i) {
            out.push('{');
            out.push_str(&emit_expr(expr, mode));
            out.push('}');
        }
    }
    out.push('"');
    out
}

fn emit_intrinsic(kind: IntrinsicKind, type_argument: Option<&IrType>, arguments: &[IrExpr], mode: Mode) -> String {
    let args: Vec<String> = arguments.iter().map(|a| emit_expr(a, mode)).collect();
    let ty = type_argument.map(render_type).unwrap_or_default();
    match kind {
        IntrinsicKind::StackAlloc => format!("stackalloc {ty}[{}]", args.first().cloned().unwrap_or_default()),
        IntrinsicKind::SizeOf => format!("sizeof({ty})"),
        IntrinsicKind::NameOf => format!("nameof({})", args.first().cloned().unwrap_or_default()),
        IntrinsicKind::DefaultOf => format!("default({ty})"),
        IntrinsicKind::TryCast => format!("({} as {ty})", args.first().cloned().unwrap_or_default()),
        IntrinsicKind::AsInterface => format!("(({ty}){})", args.first().cloned().unwrap_or_default()),
        IntrinsicKind::IsType => format!("({} is {ty})", args.first().cloned().unwrap_or_default()),
        IntrinsicKind::ThisArg => "this".to_string(),
        IntrinsicKind::Ptr => format!("&{}", args.first().cloned().unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsonic_common::Span;

    fn lit_num(n: f64) -> IrExpr {
        IrExpr::new(Span::dummy(), IrExpressionKind::Literal(LiteralType::Number(n)), IrType::Primitive(PrimitiveType::Double))
    }

    #[test]
    fn strict_eq_on_primitives_uses_value_equality() {
        let expr = IrExpr::new(
            Span::dummy(),
            IrExpressionKind::Binary { op: BinaryOp::StrictEq, left: Box::new(lit_num(1.0)), right: Box::new(lit_num(2.0)) },
            IrType::Primitive(PrimitiveType::Bool),
        );
        assert_eq!(emit_expr(&expr, Mode::Dotnet), "(1.0 == 2.0)");
    }

    #[test]
    fn strict_eq_on_reference_types_uses_equals_call() {
        let ref_ty = IrType::Reference { name: "Widget".to_string(), type_arguments: vec![], clr_qualified: None };
        let left = IrExpr::new(Span::dummy(), IrExpressionKind::Identifier { name: "a".to_string(), clr_binding: None }, ref_ty.clone());
        let right = IrExpr::new(Span::dummy(), IrExpressionKind::Identifier { name: "b".to_string(), clr_binding: None }, ref_ty);
        let expr = IrExpr::new(Span::dummy(), IrExpressionKind::Binary { op: BinaryOp::StrictEq, left: Box::new(left), right: Box::new(right) }, IrType::Primitive(PrimitiveType::Bool));
        assert_eq!(emit_expr(&expr, Mode::Dotnet), "Equals(a, b)");
    }

    #[test]
    fn template_literal_becomes_interpolated_string() {
        let expr = IrExpr::new(
            Span::dummy(),
            IrExpressionKind::TemplateLiteral {
                quasis: vec!["Hello, ".to_string(), "!".to_string()],
                expressions: vec![IrExpr::new(Span::dummy(), IrExpressionKind::Identifier { name: "name".to_string(), clr_binding: None }, IrType::Primitive(PrimitiveType::String))],
            },
            IrType::Primitive(PrimitiveType::String),
        );
        assert_eq!(emit_expr(&expr, Mode::Dotnet), "$\"Hello, {name}!\"");
    }

    #[test]
    fn console_log_routes_to_console_writeline_in_dotnet_mode() {
        let console_ident = IrExpr::new(Span::dummy(), IrExpressionKind::Identifier { name: "console".to_string(), clr_binding: None }, IrType::Any);
        let callee = IrExpr::new(Span::dummy(), IrExpressionKind::MemberAccess { object: Box::new(console_ident), member: "log".to_string(), optional: false, clr_binding: None }, IrType::Any);
        let arg = IrExpr::new(Span::dummy(), IrExpressionKind::Literal(LiteralType::String("Hello".to_string())), IrType::Primitive(PrimitiveType::String));
        let call = IrExpr::new(
            Span::dummy(),
            IrExpressionKind::Call { callee: Box::new(callee), arguments: vec![arg], type_arguments: vec![], resolved_signature: None, optional: false },
            IrType::Void,
        );
        assert_eq!(emit_expr(&call, Mode::Dotnet), "Console.WriteLine(\"Hello\")");
    }

    /// Spec §8 scenario S6: `dict.TryGetValue("k", v)` must emit the
    /// second argument qualified with `out`.
    #[test]
    fn resolved_out_parameter_is_rendered_at_the_call_site() {
        let dict_ident = IrExpr::new(Span::dummy(), IrExpressionKind::Identifier { name: "dict".to_string(), clr_binding: None }, IrType::Any);
        let callee = IrExpr::new(
            Span::dummy(),
            IrExpressionKind::MemberAccess { object: Box::new(dict_ident), member: "TryGetValue".to_string(), optional: false, clr_binding: None },
            IrType::Any,
        );
        let key_arg = IrExpr::new(Span::dummy(), IrExpressionKind::Literal(LiteralType::String("k".to_string())), IrType::Primitive(PrimitiveType::String));
        let value_arg = IrExpr::new(Span::dummy(), IrExpressionKind::Identifier { name: "v".to_string(), clr_binding: None }, IrType::Any);
        let call = IrExpr::new(
            Span::dummy(),
            IrExpressionKind::Call {
                callee: Box::new(callee),
                arguments: vec![key_arg, value_arg],
                type_arguments: vec![],
                resolved_signature: Some(ResolvedSignature {
                    param_modifiers: vec![ParamModifier::None, ParamModifier::Out],
                    return_type: IrType::Primitive(PrimitiveType::Bool),
                }),
                optional: false,
            },
            IrType::Primitive(PrimitiveType::Bool),
        );
        assert_eq!(emit_expr(&call, Mode::Dotnet), "dict.TryGetValue(\"k\", out v)");
    }
}

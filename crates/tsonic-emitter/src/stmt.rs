//! Statement-to-C# lowering (spec §4.9 "Statement lowering").

use tsonic_common::Mode;
use tsonic_ir::expr::{AssignOp, IrExpr, IrExpressionKind};
use tsonic_ir::stmt::{IrStatementKind, IrStmt};

use crate::expr::emit_expr;
use crate::types::render_type;
use crate::writer::Writer;

/// `gen_exchange` names the exchange-object field to read after a
/// suspension point, when this statement sits inside a bidirectional
/// generator body (spec §4.8/§4.9, §9 "Generator control flow"). `None`
/// everywhere else.
pub fn emit_stmt(stmt: &IrStmt, w: &mut Writer, mode: Mode, in_static_container: bool) {
    emit_stmt_inner(stmt, w, mode, in_static_container, None)
}

pub fn emit_stmt_in_generator(stmt: &IrStmt, w: &mut Writer, mode: Mode, exchange_field: &str) {
    emit_stmt_inner(stmt, w, mode, false, Some(exchange_field))
}

fn emit_stmt_inner(stmt: &IrStmt, w: &mut Writer, mode: Mode, in_static_container: bool, gen_exchange: Option<&str>) {
    match &stmt.kind {
        IrStatementKind::VariableDeclaration { name, ty, initializer, is_const, is_static_container_member } => {
            let keyword = if *is_static_container_member && in_static_container {
                "static readonly"
            } else if *is_const {
                "readonly"
            } else {
                "var"
            };
            let type_text = if keyword == "var" { String::new() } else { format!("{} ", render_type(ty)) };
            let init = initializer.as_ref().map(|e| format!(" = {}", emit_expr(e, mode))).unwrap_or_default();
            w.line(format!("{keyword} {type_text}{name}{init};"));
        }
        IrStatementKind::FunctionDeclaration(f) => {
            for line in crate::decl::render_function_lines(f, mode, false) {
                w.line(line);
            }
        }
        IrStatementKind::ClassDeclaration(c) => {
            for line in crate::decl::render_class(c, mode).lines() {
                w.line(line);
            }
        }
        IrStatementKind::InterfaceDeclaration(i) => {
            for line in crate::decl::render_interface(i).lines() {
                w.line(line);
            }
        }
        IrStatementKind::EnumDeclaration(e) => {
            for line in crate::decl::render_enum(e).lines() {
                w.line(line);
            }
        }
        IrStatementKind::TypeAliasDeclaration { .. } => {
            // Type aliases have no C# runtime representation; erased at emission.
        }
        IrStatementKind::ExpressionStatement(e) => emit_expression_statement(e, w, mode, gen_exchange),
        IrStatementKind::Return(value) => {
            let text = value.as_ref().map(|e| format!(" {}", emit_expr(e, mode))).unwrap_or_default();
            w.line(format!("return{text};"));
        }
        IrStatementKind::If { condition, then_branch, else_branch } => {
            w.block(format!("if ({})", emit_expr(condition, mode)), |w| {
                for s in then_branch {
                    emit_stmt_inner(s, w, mode, in_static_container, gen_exchange);
                }
            });
            if let Some(else_branch) = else_branch {
                w.block("else", |w| {
                    for s in else_branch {
                        emit_stmt_inner(s, w, mode, in_static_container, gen_exchange);
                    }
                });
            }
        }
        IrStatementKind::While { condition, body } => {
            w.block(format!("while ({})", emit_expr(condition, mode)), |w| {
                for s in body {
                    emit_stmt_inner(s, w, mode, in_static_container, gen_exchange);
                }
            });
        }
        IrStatementKind::DoWhile { body, condition } => {
            w.line("do");
            w.line("{");
            w.indent();
            for s in body {
                emit_stmt_inner(s, w, mode, in_static_container, gen_exchange);
            }
            w.dedent();
            w.line(format!("}} while ({});", emit_expr(condition, mode)));
        }
        IrStatementKind::For { initializer, condition, update, body } => {
            let init_text = initializer.as_ref().map(|s| render_for_clause(s, mode)).unwrap_or_default();
            let cond_text = condition.as_ref().map(|e| emit_expr(e, mode)).unwrap_or_default();
            let update_text = update.as_ref().map(|e| emit_expr(e, mode)).unwrap_or_default();
            w.block(format!("for ({init_text}; {cond_text}; {update_text})"), |w| {
                for s in body {
                    emit_stmt_inner(s, w, mode, in_static_container, gen_exchange);
                }
            });
        }
        IrStatementKind::ForOf { variable, variable_ty, iterable, body, is_await } => {
            let await_kw = if *is_await { "await " } else { "" };
            w.block(
                format!("{await_kw}foreach (var {variable} in {})", emit_expr(iterable, mode)),
                |w| {
                    let _ = variable_ty;
                    for s in body {
                        emit_stmt_inner(s, w, mode, in_static_container, gen_exchange);
                    }
                },
            );
        }
        IrStatementKind::Switch { discriminant, cases } => {
            w.block(format!("switch ({})", emit_expr(discriminant, mode)), |w| {
                for case in cases {
                    match &case.test {
                        Some(test) => w.line(format!("case {}:", emit_expr(test, mode))),
                        None => w.line("default:"),
                    }
                    w.indent();
                    for s in &case.body {
                        emit_stmt_inner(s, w, mode, in_static_container, gen_exchange);
                    }
                    w.dedent();
                }
            });
        }
        IrStatementKind::Throw(e) => {
            w.line(format!("throw {};", emit_expr(e, mode)));
        }
        IrStatementKind::Try { block, catch, finally } => {
            w.block("try", |w| {
                for s in block {
                    emit_stmt_inner(s, w, mode, in_static_container, gen_exchange);
                }
            });
            if let Some(catch) = catch {
                let header = match &catch.param {
                    Some(param) => format!("catch (Exception {param})"),
                    None => "catch".to_string(),
                };
                w.block(header, |w| {
                    for s in &catch.body {
                        emit_stmt_inner(s, w, mode, in_static_container, gen_exchange);
                    }
                });
            }
            if let Some(finally) = finally {
                w.block("finally", |w| {
                    for s in finally {
                        emit_stmt_inner(s, w, mode, in_static_container, gen_exchange);
                    }
                });
            }
        }
        IrStatementKind::Block(body) => {
            w.block("", |w| {
                for s in body {
                    emit_stmt_inner(s, w, mode, in_static_container, gen_exchange);
                }
            });
        }
        IrStatementKind::Break(label) => {
            // The builder rejects labeled `break`/`continue` (no source syntax binds a
            // label to its target loop), so `label` is always `None` by the time IR
            // reaches the emitter.
            debug_assert!(label.is_none());
            w.line("break;");
        }
        IrStatementKind::Continue(label) => {
            debug_assert!(label.is_none());
            w.line("continue;");
        }
    }
}

fn render_for_clause(stmt: &IrStmt, mode: Mode) -> String {
    if let IrStatementKind::VariableDeclaration { name, ty, initializer, .. } = &stmt.kind {
        let init = initializer.as_ref().map(|e| format!(" = {}", emit_expr(e, mode))).unwrap_or_default();
        format!("{} {name}{init}", render_type(ty))
    } else {
        String::new()
    }
}

/// An `ExpressionStatement` whose expression is (or assigns from) a `yield`
/// lowers specially inside a bidirectional generator body: `yield return`
/// is a statement in C#, and the exchange object's `Input` field is read
/// immediately after the suspension point instead of being the expression's
/// own value (spec §9 "Generator control flow").
fn emit_expression_statement(e: &IrExpr, w: &mut Writer, mode: Mode, gen_exchange: Option<&str>) {
    if let IrExpressionKind::Yield { argument, delegate } = &e.kind {
        let value = argument.as_ref().map(|a| emit_expr(a, mode)).unwrap_or_default();
        if *delegate {
            w.block(format!("foreach (var __item in {value})"), |w| {
                w.line("yield return __item;");
            });
        } else {
            w.line(format!("yield return {value};"));
        }
        return;
    }
    if let (Some(exchange_field), IrExpressionKind::Assignment { op, target, value }) = (gen_exchange, &e.kind) {
        if let IrExpressionKind::Yield { argument, delegate: false } = &value.kind {
            let yielded = argument.as_ref().map(|a| emit_expr(a, mode)).unwrap_or_default();
            w.line(format!("yield return {yielded};"));
            let sym = assign_op_symbol(*op);
            let target_text = emit_expr(target, mode);
            w.line(format!("{target_text} {sym} {exchange_field}.Input;"));
            return;
        }
    }
    w.line(format!("{};", emit_expr(e, mode)));
}

fn assign_op_symbol(op: AssignOp) -> &'static str {
    match op {
        AssignOp::Assign => "=",
        AssignOp::AddAssign => "+=",
        AssignOp::SubAssign => "-=",
        AssignOp::MulAssign => "*=",
        AssignOp::DivAssign => "/=",
        AssignOp::ModAssign => "%=",
        AssignOp::NullishAssign => "??=",
        AssignOp::AndAssign => "&&=",
        AssignOp::OrAssign => "||=",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsonic_common::Span;
    use tsonic_ir::types::{IrType, PrimitiveType};

    #[test]
    fn top_level_const_in_static_container_becomes_static_readonly() {
        let stmt = IrStmt {
            span: Span::dummy(),
            kind: IrStatementKind::VariableDeclaration {
                name: "Pi".to_string(),
                ty: IrType::Primitive(PrimitiveType::Double),
                initializer: Some(IrExpr::new(Span::dummy(), IrExpressionKind::Literal(tsonic_ir::types::LiteralType::Number(3.0)), IrType::Primitive(PrimitiveType::Double))),
                is_const: true,
                is_static_container_member: true,
            },
        };
        let mut w = Writer::new();
        emit_stmt(&stmt, &mut w, Mode::Dotnet, true);
        assert_eq!(w.into_string(), "static readonly double Pi = 3.0;\n");
    }

    #[test]
    fn bidirectional_yield_assignment_reads_input_after_suspension() {
        let yield_expr = IrExpr::new(
            Span::dummy(),
            IrExpressionKind::Yield { argument: Some(Box::new(IrExpr::new(Span::dummy(), IrExpressionKind::Identifier { name: "t".to_string(), clr_binding: None }, IrType::Primitive(PrimitiveType::Double)))), delegate: false },
            IrType::Primitive(PrimitiveType::Double),
        );
        let assign = IrExpr::new(
            Span::dummy(),
            IrExpressionKind::Assignment {
                op: AssignOp::AddAssign,
                target: Box::new(IrExpr::new(Span::dummy(), IrExpressionKind::Identifier { name: "t".to_string(), clr_binding: None }, IrType::Primitive(PrimitiveType::Double))),
                value: Box::new(yield_expr),
            },
            IrType::Primitive(PrimitiveType::Double),
        );
        let stmt = IrStmt { span: Span::dummy(), kind: IrStatementKind::ExpressionStatement(assign) };
        let mut w = Writer::new();
        emit_stmt_in_generator(&stmt, &mut w, Mode::Dotnet, "_exchange");
        assert_eq!(w.into_string(), "yield return t;\nt += _exchange.Input;\n");
    }
}

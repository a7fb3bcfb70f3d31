//! The rule walk itself (spec §4.5: "non-exhaustive" list of checks).

use tsonic_common::{Diagnostic, diagnostics};
use tsonic_program::ast::{
    ClassMemberKindNode, ClassNode, FunctionNode, TsExpression, TsExpressionKind, TsStatement,
    TsStatementKind, TsType,
};
use tsonic_program::TsSourceFile;

use crate::marker::VALUE_TYPE_MARKER;

pub fn validate_source(source: &TsSourceFile, out: &mut Vec<Diagnostic>) {
    for stmt in &source.statements {
        validate_statement(source, stmt, out);
    }
}

fn validate_statement(source: &TsSourceFile, stmt: &TsStatement, out: &mut Vec<Diagnostic>) {
    match &stmt.kind {
        TsStatementKind::ExportStar => out.push(
            Diagnostic::error(diagnostics::E3001_EXPORT_STAR, "`export *` is not supported")
                .at(source.file_path.clone(), stmt.span),
        ),
        TsStatementKind::ExportDefault(expr) => {
            out.push(
                Diagnostic::error(diagnostics::E3002_DEFAULT_EXPORT, "`export default` is not supported")
                    .at(source.file_path.clone(), stmt.span),
            );
            validate_expression(source, expr, out);
        }
        TsStatementKind::NamespaceDeclaration { ambient, name } => {
            if !*ambient {
                out.push(
                    Diagnostic::error(
                        diagnostics::E3006_NAMESPACE_DECLARATION,
                        format!("non-ambient namespace declaration `{name}` is not supported"),
                    )
                    .at(source.file_path.clone(), stmt.span),
                );
            }
        }
        TsStatementKind::FunctionDeclaration(f) => validate_function(source, f, stmt, out),
        TsStatementKind::ClassDeclaration(class) => validate_class(source, class, stmt, out),
        TsStatementKind::VariableDeclaration {
            declared_type,
            initializer,
            ..
        } => {
            if let Some(init) = initializer {
                check_empty_array_literal(source, init, declared_type.as_ref(), out);
                validate_expression(source, init, out);
            }
        }
        TsStatementKind::ExpressionStatement(expr) => validate_expression(source, expr, out),
        TsStatementKind::Return(Some(expr)) => validate_expression(source, expr, out),
        TsStatementKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            validate_expression(source, condition, out);
            for s in then_branch {
                validate_statement(source, s, out);
            }
            if let Some(else_branch) = else_branch {
                for s in else_branch {
                    validate_statement(source, s, out);
                }
            }
        }
        TsStatementKind::While { condition, body } | TsStatementKind::DoWhile { body, condition } => {
            validate_expression(source, condition, out);
            for s in body {
                validate_statement(source, s, out);
            }
        }
        TsStatementKind::For {
            condition, body, ..
        } => {
            if let Some(c) = condition {
                validate_expression(source, c, out);
            }
            for s in body {
                validate_statement(source, s, out);
            }
        }
        TsStatementKind::ForOf { iterable, body, .. } => {
            validate_expression(source, iterable, out);
            for s in body {
                validate_statement(source, s, out);
            }
        }
        TsStatementKind::Switch { discriminant, cases } => {
            validate_expression(source, discriminant, out);
            for case in cases {
                for s in &case.body {
                    validate_statement(source, s, out);
                }
            }
        }
        TsStatementKind::Throw(expr) => validate_expression(source, expr, out),
        TsStatementKind::Try { block, catch, finally } => {
            for s in block {
                validate_statement(source, s, out);
            }
            if let Some(c) = catch {
                for s in &c.body {
                    validate_statement(source, s, out);
                }
            }
            if let Some(f) = finally {
                for s in f {
                    validate_statement(source, s, out);
                }
            }
        }
        TsStatementKind::Block(body) => {
            for s in body {
                validate_statement(source, s, out);
            }
        }
        _ => {}
    }
}

fn validate_function(source: &TsSourceFile, f: &FunctionNode, stmt: &TsStatement, out: &mut Vec<Diagnostic>) {
    if !f.decorators.is_empty() {
        out.push(
            Diagnostic::error(diagnostics::E3005_DECORATOR, format!("decorators are not supported (on `{}`)", f.name))
                .at(source.file_path.clone(), stmt.span),
        );
    }
    for param in &f.parameters {
        if let Some(ty) = &param.declared_type {
            check_symbol_indexed(source, ty, stmt.span, out);
            check_nullable_unconstrained_generic(source, ty, &f.type_parameters, stmt.span, out);
            check_unsupported_literal_type(source, ty, stmt.span, out);
        }
    }
    if let Some(ty) = &f.return_type {
        check_symbol_indexed(source, ty, stmt.span, out);
        check_nullable_unconstrained_generic(source, ty, &f.type_parameters, stmt.span, out);
        check_unsupported_literal_type(source, ty, stmt.span, out);
    }
    for s in &f.body {
        validate_statement(source, s, out);
    }
}

fn validate_class(source: &TsSourceFile, class: &ClassNode, stmt: &TsStatement, out: &mut Vec<Diagnostic>) {
    if !class.decorators.is_empty() {
        out.push(
            Diagnostic::error(
                diagnostics::E3005_DECORATOR,
                format!("decorators are not supported (on class `{}`)", class.name),
            )
            .at(source.file_path.clone(), stmt.span),
        );
    }
    for implemented in &class.implements {
        if let TsType::TypeRef { name, .. } = implemented {
            if name != VALUE_TYPE_MARKER {
                out.push(
                    Diagnostic::error(
                        diagnostics::E7301_NON_MARKER_IMPLEMENTS,
                        format!(
                            "class `{}` implements `{name}`; interfaces lower to classes, so implementation must be spelled `extends`",
                            class.name
                        ),
                    )
                    .at(source.file_path.clone(), stmt.span),
                );
            }
        }
    }
    for member in &class.members {
        match &member.kind {
            ClassMemberKindNode::Method(f)
            | ClassMemberKindNode::Getter(f)
            | ClassMemberKindNode::Setter(f)
            | ClassMemberKindNode::Constructor(f) => {
                validate_function(source, f, stmt, out);
            }
            ClassMemberKindNode::Field { initializer, declared_type } => {
                if let Some(init) = initializer {
                    check_empty_array_literal(source, init, declared_type.as_ref(), out);
                    validate_expression(source, init, out);
                }
            }
        }
    }
}

fn validate_expression(source: &TsSourceFile, expr: &TsExpression, out: &mut Vec<Diagnostic>) {
    match expr.kind.as_ref() {
        TsExpressionKind::DynamicImport(_) => out.push(
            Diagnostic::error(diagnostics::E3003_DYNAMIC_IMPORT, "dynamic `import()` is not supported")
                .at(source.file_path.clone(), expr.span),
        ),
        TsExpressionKind::MemberAccess { object, member, .. } => {
            if matches!(member.as_str(), "then" | "catch" | "finally") {
                out.push(
                    Diagnostic::error(
                        diagnostics::E3004_PROMISE_THEN_CATCH_FINALLY,
                        "`Promise.then`/`.catch`/`.finally` are not supported; use `async`/`await`",
                    )
                    .at(source.file_path.clone(), expr.span),
                );
            }
            validate_expression(source, object, out);
        }
        TsExpressionKind::Call { callee, arguments, .. } | TsExpressionKind::New { callee, arguments, .. } => {
            validate_expression(source, callee, out);
            for a in arguments {
                validate_expression(source, a, out);
            }
        }
        TsExpressionKind::Binary { left, right, .. } | TsExpressionKind::Logical { left, right, .. } => {
            validate_expression(source, left, out);
            validate_expression(source, right, out);
        }
        TsExpressionKind::Assignment { target, value, .. } => {
            validate_expression(source, target, out);
            validate_expression(source, value, out);
        }
        TsExpressionKind::Ternary {
            condition,
            when_true,
            when_false,
        } => {
            validate_expression(source, condition, out);
            validate_expression(source, when_true, out);
            validate_expression(source, when_false, out);
        }
        TsExpressionKind::ArrayLiteral(items) => {
            for item in items {
                validate_expression(source, item, out);
            }
        }
        TsExpressionKind::ObjectLiteral(members) => {
            for (_, value) in members {
                validate_expression(source, value, out);
            }
        }
        TsExpressionKind::Unary { operand, .. }
        | TsExpressionKind::Update { operand, .. }
        | TsExpressionKind::Spread(operand)
        | TsExpressionKind::Await(operand) => validate_expression(source, operand, out),
        TsExpressionKind::TemplateLiteral { expressions, .. } => {
            for e in expressions {
                validate_expression(source, e, out);
            }
        }
        TsExpressionKind::Yield { argument: Some(a), .. } => validate_expression(source, a, out),
        _ => {}
    }
}

fn check_symbol_indexed(source: &TsSourceFile, ty: &TsType, span: tsonic_common::Span, out: &mut Vec<Diagnostic>) {
    match ty {
        TsType::SymbolIndexed => out.push(
            Diagnostic::error(diagnostics::E7203_SYMBOL_KEY, "symbol-keyed index signatures are not supported")
                .at(source.file_path.clone(), span),
        ),
        TsType::Array(inner) => check_symbol_indexed(source, inner, span, out),
        TsType::Union(members) | TsType::Intersection(members) => {
            for m in members {
                check_symbol_indexed(source, m, span, out);
            }
        }
        TsType::ObjectLiteral(members) => {
            for (_, m, _) in members {
                check_symbol_indexed(source, m, span, out);
            }
        }
        _ => {}
    }
}

fn check_nullable_unconstrained_generic(
    source: &TsSourceFile,
    ty: &TsType,
    type_parameters: &[tsonic_program::ast::TypeParamNode],
    span: tsonic_common::Span,
    out: &mut Vec<Diagnostic>,
) {
    let TsType::Union(members) = ty else {
        return;
    };
    let has_null = members
        .iter()
        .any(|m| matches!(m, TsType::Null | TsType::Undefined));
    if !has_null {
        return;
    }
    for member in members {
        if let TsType::TypeRef { name, type_arguments } = member {
            if type_arguments.is_empty() {
                if let Some(param) = type_parameters.iter().find(|p| &p.name == name) {
                    if param.constraint.is_none() {
                        out.push(
                            Diagnostic::error(
                                diagnostics::E7415_NULLABLE_UNCONSTRAINED_GENERIC,
                                format!(
                                    "unconstrained generic parameter `{name}` used as `{name} | null` cannot be represented in the target's nullable model"
                                ),
                            )
                            .at(source.file_path.clone(), span),
                        );
                    }
                }
            }
        }
    }
}

/// A bare literal type (`"green"`, `42`, `true`) only has meaning nested as
/// a discriminated union's tag field (spec §4.6 "Unions"); standalone — as
/// a parameter or return type — it has no representation in the target
/// type system and is rejected (spec §6.4: 2001).
fn check_unsupported_literal_type(source: &TsSourceFile, ty: &TsType, span: tsonic_common::Span, out: &mut Vec<Diagnostic>) {
    match ty {
        TsType::StringLiteral(_) | TsType::NumberLiteral(_) | TsType::BoolLiteral(_) => out.push(
            Diagnostic::error(
                diagnostics::E2001_UNSUPPORTED_LITERAL_TYPE,
                "a literal type cannot be used as a standalone parameter or return type",
            )
            .at(source.file_path.clone(), span),
        ),
        TsType::Array(inner) => check_unsupported_literal_type(source, inner, span, out),
        TsType::Union(members) | TsType::Intersection(members) => {
            for m in members {
                check_unsupported_literal_type(source, m, span, out);
            }
        }
        _ => {}
    }
}

fn check_empty_array_literal(
    source: &TsSourceFile,
    init: &TsExpression,
    declared_type: Option<&TsType>,
    out: &mut Vec<Diagnostic>,
) {
    if declared_type.is_some() {
        return;
    }
    if let TsExpressionKind::ArrayLiteral(items) = init.kind.as_ref() {
        if items.is_empty() {
            out.push(
                Diagnostic::error(
                    diagnostics::E7417_EMPTY_ARRAY_LITERAL,
                    "empty array literal requires a type annotation",
                )
                .at(source.file_path.clone(), init.span),
            );
        }
    }
}

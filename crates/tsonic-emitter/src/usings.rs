//! Collects the set of `using` directives a module needs: one per distinct
//! namespace reached by a local import, and one per distinct namespace a
//! bound CLR symbol resolves into (spec §4.9 step 2).

use tsonic_common::ordered::{OrderedMap, OrderedSet};
use tsonic_ir::expr::{ClrBinding, IrExpr, IrExpressionKind};
use tsonic_ir::module::IrModule;
use tsonic_ir::stmt::{ClassMemberKind, IrStatementKind, IrStmt};

pub fn collect_usings(module: &IrModule, modules: &OrderedMap<String, IrModule>) -> Vec<String> {
    let mut usings: OrderedSet<String> = OrderedSet::new();

    for import in &module.imports {
        if let Some(path) = &import.resolved_local_path {
            if let Some(target) = modules.get(path) {
                if target.namespace != module.namespace {
                    usings.insert(target.namespace.clone());
                }
            }
        }
    }

    for stmt in &module.body {
        collect_from_stmt(stmt, &mut usings);
    }

    let mut sorted: Vec<String> = usings.into_iter().collect();
    sorted.sort();
    sorted
}

fn push_clr_namespace(binding: &ClrBinding, usings: &mut OrderedSet<String>) {
    if let Some((namespace, _)) = binding.clr_qualified_type.rsplit_once('.') {
        usings.insert(namespace.to_string());
    }
}

fn collect_from_stmt(stmt: &IrStmt, usings: &mut OrderedSet<String>) {
    use IrStatementKind as K;
    match &stmt.kind {
        K::VariableDeclaration { initializer, .. } => {
            if let Some(e) = initializer {
                collect_from_expr(e, usings);
            }
        }
        K::FunctionDeclaration(f) => {
            for s in &f.body {
                collect_from_stmt(s, usings);
            }
        }
        K::ClassDeclaration(c) => {
            for member in &c.members {
                match &member.kind {
                    ClassMemberKind::Field { initializer: Some(e), .. } => collect_from_expr(e, usings),
                    ClassMemberKind::Method(f) | ClassMemberKind::Constructor(f) => {
                        for s in &f.body {
                            collect_from_stmt(s, usings);
                        }
                    }
                    _ => {}
                }
            }
        }
        K::InterfaceDeclaration(_) | K::EnumDeclaration(_) | K::TypeAliasDeclaration { .. } | K::Break(_) | K::Continue(_) => {}
        K::ExpressionStatement(e) | K::Throw(e) => collect_from_expr(e, usings),
        K::Return(e) => {
            if let Some(e) = e {
                collect_from_expr(e, usings);
            }
        }
        K::If { condition, then_branch, else_branch } => {
            collect_from_expr(condition, usings);
            for s in then_branch {
                collect_from_stmt(s, usings);
            }
            if let Some(b) = else_branch {
                for s in b {
                    collect_from_stmt(s, usings);
                }
            }
        }
        K::While { condition, body } | K::DoWhile { body, condition } => {
            collect_from_expr(condition, usings);
            for s in body {
                collect_from_stmt(s, usings);
            }
        }
        K::For { initializer, condition, update, body } => {
            if let Some(s) = initializer {
                collect_from_stmt(s, usings);
            }
            if let Some(e) = condition {
                collect_from_expr(e, usings);
            }
            if let Some(e) = update {
                collect_from_expr(e, usings);
            }
            for s in body {
                collect_from_stmt(s, usings);
            }
        }
        K::ForOf { iterable, body, .. } => {
            collect_from_expr(iterable, usings);
            for s in body {
                collect_from_stmt(s, usings);
            }
        }
        K::Switch { discriminant, cases } => {
            collect_from_expr(discriminant, usings);
            for c in cases {
                if let Some(t) = &c.test {
                    collect_from_expr(t, usings);
                }
                for s in &c.body {
                    collect_from_stmt(s, usings);
                }
            }
        }
        K::Try { block, catch, finally } => {
            for s in block {
                collect_from_stmt(s, usings);
            }
            if let Some(c) = catch {
                for s in &c.body {
                    collect_from_stmt(s, usings);
                }
            }
            if let Some(f) = finally {
                for s in f {
                    collect_from_stmt(s, usings);
                }
            }
        }
        K::Block(b) => {
            for s in b {
                collect_from_stmt(s, usings);
            }
        }
    }
}

fn collect_from_expr(expr: &IrExpr, usings: &mut OrderedSet<String>) {
    match &expr.kind {
        IrExpressionKind::Identifier { clr_binding: Some(binding), .. } => push_clr_namespace(binding, usings),
        IrExpressionKind::MemberAccess { object, clr_binding, .. } => {
            if let Some(binding) = clr_binding {
                push_clr_namespace(binding, usings);
            }
            collect_from_expr(object, usings);
        }
        IrExpressionKind::Call { callee, arguments, .. } => {
            collect_from_expr(callee, usings);
            for a in arguments {
                collect_from_expr(a, usings);
            }
        }
        IrExpressionKind::New { callee, arguments, .. } => {
            collect_from_expr(callee, usings);
            for a in arguments {
                collect_from_expr(a, usings);
            }
        }
        IrExpressionKind::ArrayLiteral(items) => {
            for i in items {
                collect_from_expr(i, usings);
            }
        }
        IrExpressionKind::ObjectLiteral(members) => {
            for (_, e) in members {
                collect_from_expr(e, usings);
            }
        }
        IrExpressionKind::Function(b) | IrExpressionKind::Arrow(b) => {
            for s in &b.body {
                collect_from_stmt(s, usings);
            }
        }
        IrExpressionKind::Unary { operand, .. } | IrExpressionKind::Update { operand, .. } | IrExpressionKind::Spread(operand) | IrExpressionKind::Await(operand) => {
            collect_from_expr(operand, usings)
        }
        IrExpressionKind::Binary { left, right, .. } | IrExpressionKind::Logical { left, right, .. } => {
            collect_from_expr(left, usings);
            collect_from_expr(right, usings);
        }
        IrExpressionKind::Ternary { condition, when_true, when_false } => {
            collect_from_expr(condition, usings);
            collect_from_expr(when_true, usings);
            collect_from_expr(when_false, usings);
        }
        IrExpressionKind::Assignment { target, value, .. } => {
            collect_from_expr(target, usings);
            collect_from_expr(value, usings);
        }
        IrExpressionKind::TemplateLiteral { expressions, .. } => {
            for e in expressions {
                collect_from_expr(e, usings);
            }
        }
        IrExpressionKind::Yield { argument, .. } => {
            if let Some(a) = argument {
                collect_from_expr(a, usings);
            }
        }
        IrExpressionKind::Intrinsic { arguments, .. } => {
            for a in arguments {
                collect_from_expr(a, usings);
            }
        }
        IrExpressionKind::Literal(_) | IrExpressionKind::Identifier { .. } | IrExpressionKind::This => {}
    }
}

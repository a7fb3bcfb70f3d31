//! Call-site rewriting (spec §4.8: "every call site in the IR that
//! referenced the generic call with these type arguments is rewritten to
//! call the specialisation").

use tsonic_common::ordered::OrderedMap;
use tsonic_ir::expr::{IrExpr, IrExpressionKind, ResolvedSignature};
use tsonic_ir::module::IrModule;
use tsonic_ir::specialisation::SpecialisationRequest;
use tsonic_ir::stmt::IrStmt;
use tsonic_ir::types::IrType;

use crate::discover::GenericDeclaration;
use crate::monomorphise::SpecialisedDeclaration;
use crate::substitute::{Substitution, substitute_type};

fn substitution_for(decl: &GenericDeclaration, type_arguments: &[IrType]) -> Substitution {
    let mut subst = Substitution::new();
    for (param, arg) in decl.kind.type_parameters().iter().zip(type_arguments.iter()) {
        subst.insert(param.name.clone(), arg.clone());
    }
    subst
}

/// Mutates every module's body in place, replacing a generic call/new
/// targeting a completed specialisation with a direct reference to it.
pub fn rewrite_call_sites(
    modules: &mut OrderedMap<String, IrModule>,
    declarations: &OrderedMap<String, GenericDeclaration>,
    done: &OrderedMap<String, SpecialisedDeclaration>,
) {
    for module in modules.values_mut() {
        for stmt in &mut module.body {
            rewrite_stmt(stmt, declarations, done);
        }
    }
}

fn rewrite_stmt(stmt: &mut IrStmt, declarations: &OrderedMap<String, GenericDeclaration>, done: &OrderedMap<String, SpecialisedDeclaration>) {
    use tsonic_ir::stmt::IrStatementKind as K;
    match &mut stmt.kind {
        K::VariableDeclaration { initializer, .. } => {
            if let Some(e) = initializer {
                rewrite_expr(e, declarations, done);
            }
        }
        K::ExpressionStatement(e) | K::Throw(e) => rewrite_expr(e, declarations, done),
        K::Return(e) => {
            if let Some(e) = e {
                rewrite_expr(e, declarations, done);
            }
        }
        K::If { condition, then_branch, else_branch } => {
            rewrite_expr(condition, declarations, done);
            for s in then_branch {
                rewrite_stmt(s, declarations, done);
            }
            if let Some(b) = else_branch {
                for s in b {
                    rewrite_stmt(s, declarations, done);
                }
            }
        }
        K::While { condition, body } | K::DoWhile { body, condition } => {
            rewrite_expr(condition, declarations, done);
            for s in body {
                rewrite_stmt(s, declarations, done);
            }
        }
        K::For { initializer, condition, update, body } => {
            if let Some(s) = initializer {
                rewrite_stmt(s, declarations, done);
            }
            if let Some(e) = condition {
                rewrite_expr(e, declarations, done);
            }
            if let Some(e) = update {
                rewrite_expr(e, declarations, done);
            }
            for s in body {
                rewrite_stmt(s, declarations, done);
            }
        }
        K::ForOf { iterable, body, .. } => {
            rewrite_expr(iterable, declarations, done);
            for s in body {
                rewrite_stmt(s, declarations, done);
            }
        }
        K::Switch { discriminant, cases } => {
            rewrite_expr(discriminant, declarations, done);
            for c in cases {
                if let Some(t) = &mut c.test {
                    rewrite_expr(t, declarations, done);
                }
                for s in &mut c.body {
                    rewrite_stmt(s, declarations, done);
                }
            }
        }
        K::Try { block, catch, finally } => {
            for s in block {
                rewrite_stmt(s, declarations, done);
            }
            if let Some(c) = catch {
                for s in &mut c.body {
                    rewrite_stmt(s, declarations, done);
                }
            }
            if let Some(f) = finally {
                for s in f {
                    rewrite_stmt(s, declarations, done);
                }
            }
        }
        K::Block(b) => {
            for s in b {
                rewrite_stmt(s, declarations, done);
            }
        }
        K::FunctionDeclaration(f) => {
            for s in &mut f.body {
                rewrite_stmt(s, declarations, done);
            }
        }
        K::ClassDeclaration(c) => {
            for m in &mut c.members {
                match &mut m.kind {
                    tsonic_ir::stmt::ClassMemberKind::Method(f) | tsonic_ir::stmt::ClassMemberKind::Constructor(f) => {
                        for s in &mut f.body {
                            rewrite_stmt(s, declarations, done);
                        }
                    }
                    tsonic_ir::stmt::ClassMemberKind::Field { initializer: Some(e), .. } => rewrite_expr(e, declarations, done),
                    _ => {}
                }
            }
        }
        K::InterfaceDeclaration(_) | K::EnumDeclaration(_) | K::TypeAliasDeclaration { .. } | K::Break(_) | K::Continue(_) => {}
    }
}

/// If `callee` is an identifier referencing a completed specialisation for
/// `type_arguments`, renames it in place and clears the type arguments
/// (the target is no longer generic), returning the declaration and the
/// substitution that produced the specialisation.
fn rewrite_callee<'a>(
    callee: &mut IrExpr,
    type_arguments: &mut Vec<IrType>,
    declarations: &'a OrderedMap<String, GenericDeclaration>,
    done: &OrderedMap<String, SpecialisedDeclaration>,
) -> Option<(&'a GenericDeclaration, Substitution)> {
    let IrExpressionKind::Identifier { name, .. } = &mut callee.kind else {
        return None;
    };
    if type_arguments.is_empty() {
        return None;
    }
    let decl = declarations.get(name.as_str())?;
    let key = SpecialisationRequest { generic_decl_id: name.clone(), type_arguments: type_arguments.clone() }.canonical_key();
    let specialised = done.get(&key)?;
    let subst = substitution_for(decl, type_arguments);
    *name = specialised.name.clone();
    type_arguments.clear();
    Some((decl, subst))
}

fn rewrite_expr(expr: &mut IrExpr, declarations: &OrderedMap<String, GenericDeclaration>, done: &OrderedMap<String, SpecialisedDeclaration>) {
    match &mut expr.kind {
        IrExpressionKind::Call { callee, arguments, type_arguments, resolved_signature, .. } => {
            if let Some((_, subst)) = rewrite_callee(callee, type_arguments, declarations, done) {
                if let Some(sig) = resolved_signature.as_mut() {
                    sig.return_type = substitute_type(&sig.return_type, &subst);
                }
            }
            rewrite_expr(callee, declarations, done);
            for a in arguments {
                rewrite_expr(a, declarations, done);
            }
        }
        IrExpressionKind::New { callee, arguments, type_arguments } => {
            rewrite_callee(callee, type_arguments, declarations, done);
            rewrite_expr(callee, declarations, done);
            for a in arguments {
                rewrite_expr(a, declarations, done);
            }
        }
        IrExpressionKind::ArrayLiteral(items) => {
            for i in items {
                rewrite_expr(i, declarations, done);
            }
        }
        IrExpressionKind::ObjectLiteral(members) => {
            for (_, e) in members {
                rewrite_expr(e, declarations, done);
            }
        }
        IrExpressionKind::Function(b) | IrExpressionKind::Arrow(b) => {
            for s in &mut b.body {
                rewrite_stmt(s, declarations, done);
            }
        }
        IrExpressionKind::MemberAccess { object, .. } => rewrite_expr(object, declarations, done),
        IrExpressionKind::Unary { operand, .. } | IrExpressionKind::Update { operand, .. } | IrExpressionKind::Spread(operand) | IrExpressionKind::Await(operand) => {
            rewrite_expr(operand, declarations, done)
        }
        IrExpressionKind::Binary { left, right, .. } | IrExpressionKind::Logical { left, right, .. } => {
            rewrite_expr(left, declarations, done);
            rewrite_expr(right, declarations, done);
        }
        IrExpressionKind::Ternary { condition, when_true, when_false } => {
            rewrite_expr(condition, declarations, done);
            rewrite_expr(when_true, declarations, done);
            rewrite_expr(when_false, declarations, done);
        }
        IrExpressionKind::Assignment { target, value, .. } => {
            rewrite_expr(target, declarations, done);
            rewrite_expr(value, declarations, done);
        }
        IrExpressionKind::TemplateLiteral { expressions, .. } => {
            for e in expressions {
                rewrite_expr(e, declarations, done);
            }
        }
        IrExpressionKind::Yield { argument, .. } => {
            if let Some(a) = argument {
                rewrite_expr(a, declarations, done);
            }
        }
        IrExpressionKind::Intrinsic { arguments, .. } => {
            for a in arguments {
                rewrite_expr(a, declarations, done);
            }
        }
        IrExpressionKind::Literal(_) | IrExpressionKind::Identifier { .. } | IrExpressionKind::This => {}
    }
}

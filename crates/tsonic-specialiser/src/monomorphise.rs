//! Monomorphisation (spec §4.8): produce a fresh specialised declaration
//! per `(decl, type_args)` and discover the further requests a
//! specialised body itself emits, so recursive generics converge via
//! fixpoint iteration.

use tsonic_common::ordered::OrderedMap;
use tsonic_ir::expr::{IrExpr, IrExpressionKind};
use tsonic_ir::specialisation::SpecialisationRequest;
use tsonic_ir::stmt::IrStmt;

use crate::discover::{GenericDeclaration, GenericDeclarationKind};
use crate::substitute::{Substitution, substitute_class, substitute_function};

#[derive(Clone, Debug)]
pub struct SpecialisedDeclaration {
    pub owning_module: String,
    /// Bare name of the generic declaration this was derived from, used to
    /// splice the specialisation adjacent to its base (spec §5).
    pub generic_decl_id: String,
    pub name: String,
    pub kind: GenericDeclarationKind,
}

/// Builds the `T -> concrete` map for a request from a declaration's
/// ordered type-parameter list. Arity mismatches (more/fewer type
/// arguments than parameters) are the caller's problem to have validated
/// earlier; here we zip to the shorter length.
fn substitution_for(decl: &GenericDeclaration, request: &SpecialisationRequest) -> Substitution {
    let mut subst = Substitution::new();
    for (param, arg) in decl.kind.type_parameters().iter().zip(request.type_arguments.iter()) {
        subst.insert(param.name.clone(), arg.clone());
    }
    subst
}

pub fn specialise_declaration(decl: &GenericDeclaration, request: &SpecialisationRequest) -> SpecialisedDeclaration {
    let subst = substitution_for(decl, request);
    let name = request.specialised_name();
    let kind = match &decl.kind {
        GenericDeclarationKind::Function(f) => {
            let mut specialised = substitute_function(f, &subst);
            specialised.name = name.clone();
            GenericDeclarationKind::Function(specialised)
        }
        GenericDeclarationKind::Class(c) => {
            let mut specialised = substitute_class(c, &subst);
            specialised.name = name.clone();
            GenericDeclarationKind::Class(specialised)
        }
    };
    SpecialisedDeclaration {
        owning_module: decl.owning_module.clone(),
        generic_decl_id: request.generic_decl_id.clone(),
        name,
        kind,
    }
}

/// Scans a freshly specialised body for further calls/constructions of
/// known generic declarations with concrete type arguments (spec §4.8
/// "Recursive specialisations ... are handled by fixpoint iteration until
/// no new requests are emitted").
pub fn discover_nested_requests(
    decl: &SpecialisedDeclaration,
    declarations: &OrderedMap<String, GenericDeclaration>,
) -> Vec<SpecialisationRequest> {
    let body: &[IrStmt] = match &decl.kind {
        GenericDeclarationKind::Function(f) => &f.body,
        GenericDeclarationKind::Class(_) => &[],
    };
    let mut found = Vec::new();
    for stmt in body {
        walk_stmt(stmt, declarations, &mut found);
    }
    found
}

fn walk_stmt(stmt: &IrStmt, declarations: &OrderedMap<String, GenericDeclaration>, out: &mut Vec<SpecialisationRequest>) {
    use tsonic_ir::stmt::IrStatementKind as K;
    match &stmt.kind {
        K::VariableDeclaration { initializer, .. } => {
            if let Some(e) = initializer {
                walk_expr(e, declarations, out);
            }
        }
        K::ExpressionStatement(e) | K::Throw(e) => walk_expr(e, declarations, out),
        K::Return(e) => {
            if let Some(e) = e {
                walk_expr(e, declarations, out);
            }
        }
        K::If { condition, then_branch, else_branch } => {
            walk_expr(condition, declarations, out);
            for s in then_branch {
                walk_stmt(s, declarations, out);
            }
            if let Some(b) = else_branch {
                for s in b {
                    walk_stmt(s, declarations, out);
                }
            }
        }
        K::While { condition, body } | K::DoWhile { body, condition } => {
            walk_expr(condition, declarations, out);
            for s in body {
                walk_stmt(s, declarations, out);
            }
        }
        K::For { initializer, condition, update, body } => {
            if let Some(s) = initializer {
                walk_stmt(s, declarations, out);
            }
            if let Some(e) = condition {
                walk_expr(e, declarations, out);
            }
            if let Some(e) = update {
                walk_expr(e, declarations, out);
            }
            for s in body {
                walk_stmt(s, declarations, out);
            }
        }
        K::ForOf { iterable, body, .. } => {
            walk_expr(iterable, declarations, out);
            for s in body {
                walk_stmt(s, declarations, out);
            }
        }
        K::Switch { discriminant, cases } => {
            walk_expr(discriminant, declarations, out);
            for c in cases {
                if let Some(t) = &c.test {
                    walk_expr(t, declarations, out);
                }
                for s in &c.body {
                    walk_stmt(s, declarations, out);
                }
            }
        }
        K::Try { block, catch, finally } => {
            for s in block {
                walk_stmt(s, declarations, out);
            }
            if let Some(c) = catch {
                for s in &c.body {
                    walk_stmt(s, declarations, out);
                }
            }
            if let Some(f) = finally {
                for s in f {
                    walk_stmt(s, declarations, out);
                }
            }
        }
        K::Block(b) => {
            for s in b {
                walk_stmt(s, declarations, out);
            }
        }
        K::FunctionDeclaration(f) => {
            for s in &f.body {
                walk_stmt(s, declarations, out);
            }
        }
        K::ClassDeclaration(_) | K::InterfaceDeclaration(_) | K::EnumDeclaration(_) | K::TypeAliasDeclaration { .. } | K::Break(_) | K::Continue(_) => {}
    }
}

fn walk_expr(expr: &IrExpr, declarations: &OrderedMap<String, GenericDeclaration>, out: &mut Vec<SpecialisationRequest>) {
    match &expr.kind {
        IrExpressionKind::Call { callee, arguments, type_arguments, .. } | IrExpressionKind::New { callee, arguments, type_arguments } => {
            if let IrExpressionKind::Identifier { name, .. } = &callee.kind {
                if !type_arguments.is_empty() && declarations.contains_key(name) && type_arguments.iter().all(is_concrete) {
                    out.push(SpecialisationRequest { generic_decl_id: name.clone(), type_arguments: type_arguments.clone() });
                }
            }
            walk_expr(callee, declarations, out);
            for a in arguments {
                walk_expr(a, declarations, out);
            }
        }
        IrExpressionKind::ArrayLiteral(items) => {
            for i in items {
                walk_expr(i, declarations, out);
            }
        }
        IrExpressionKind::ObjectLiteral(members) => {
            for (_, e) in members {
                walk_expr(e, declarations, out);
            }
        }
        IrExpressionKind::Function(b) | IrExpressionKind::Arrow(b) => {
            for s in &b.body {
                walk_stmt(s, declarations, out);
            }
        }
        IrExpressionKind::MemberAccess { object, .. } => walk_expr(object, declarations, out),
        IrExpressionKind::Unary { operand, .. } | IrExpressionKind::Update { operand, .. } | IrExpressionKind::Spread(operand) | IrExpressionKind::Await(operand) => {
            walk_expr(operand, declarations, out)
        }
        IrExpressionKind::Binary { left, right, .. } | IrExpressionKind::Logical { left, right, .. } => {
            walk_expr(left, declarations, out);
            walk_expr(right, declarations, out);
        }
        IrExpressionKind::Ternary { condition, when_true, when_false } => {
            walk_expr(condition, declarations, out);
            walk_expr(when_true, declarations, out);
            walk_expr(when_false, declarations, out);
        }
        IrExpressionKind::Assignment { target, value, .. } => {
            walk_expr(target, declarations, out);
            walk_expr(value, declarations, out);
        }
        IrExpressionKind::TemplateLiteral { expressions, .. } => {
            for e in expressions {
                walk_expr(e, declarations, out);
            }
        }
        IrExpressionKind::Yield { argument, .. } => {
            if let Some(a) = argument {
                walk_expr(a, declarations, out);
            }
        }
        IrExpressionKind::Intrinsic { arguments, .. } => {
            for a in arguments {
                walk_expr(a, declarations, out);
            }
        }
        IrExpressionKind::Literal(_) | IrExpressionKind::Identifier { .. } | IrExpressionKind::This => {}
    }
}

fn is_concrete(ty: &tsonic_ir::types::IrType) -> bool {
    use tsonic_ir::types::IrType;
    match ty {
        IrType::GenericParameter(_) => false,
        IrType::Primitive(_) | IrType::Any | IrType::Unknown | IrType::Void | IrType::Never | IrType::Literal(_) => true,
        IrType::Reference { type_arguments, .. } => type_arguments.iter().all(is_concrete),
        IrType::Array(inner) | IrType::Nullable(inner) => is_concrete(inner),
        IrType::Function { parameters, return_type, .. } => parameters.iter().all(|p| is_concrete(&p.ty)) && is_concrete(return_type),
        IrType::ObjectLiteral(members) => members.iter().all(|m| is_concrete(&m.ty)),
        IrType::Union(members) | IrType::Intersection(members) => members.iter().all(is_concrete),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discover::GenericDeclaration;
    use tsonic_ir::stmt::{FunctionDecl, Param};
    use tsonic_ir::types::{IrType, PrimitiveType, TypeParameter};

    fn identity_decl() -> GenericDeclaration {
        GenericDeclaration {
            owning_module: "/a.ts".to_string(),
            kind: GenericDeclarationKind::Function(FunctionDecl {
                name: "identity".to_string(),
                type_parameters: vec![TypeParameter { name: "T".to_string(), constraint: None }],
                parameters: vec![Param { name: "x".to_string(), ty: IrType::GenericParameter("T".to_string()), optional: false, default: None }],
                return_type: IrType::GenericParameter("T".to_string()),
                body: vec![],
                is_async: false,
                generator: None,
                is_exported: true,
            }),
        }
    }

    #[test]
    fn specialises_name_and_substitutes_body() {
        let decl = identity_decl();
        let request = SpecialisationRequest { generic_decl_id: "identity".to_string(), type_arguments: vec![IrType::Primitive(PrimitiveType::Double)] };
        let specialised = specialise_declaration(&decl, &request);
        assert_eq!(specialised.name, "identity_Double");
        assert_eq!(specialised.owning_module, "/a.ts");
        match specialised.kind {
            GenericDeclarationKind::Function(f) => {
                assert!(f.type_parameters.is_empty());
                assert_eq!(f.return_type, IrType::Primitive(PrimitiveType::Double));
            }
            GenericDeclarationKind::Class(_) => panic!("expected function"),
        }
    }
}

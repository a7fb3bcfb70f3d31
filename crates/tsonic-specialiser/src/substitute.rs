//! Type-parameter substitution (spec §4.8 "Monomorphisation": "substitute
//! type parameters in the body with concrete IR types").

use tsonic_common::ordered::OrderedMap;
use tsonic_ir::expr::{IrExpr, IrExpressionKind};
use tsonic_ir::stmt::{
    CatchClause, ClassDecl, ClassMember, ClassMemberKind, FunctionDecl, IrFunctionBody, IrStmt, IrStatementKind, Param, SwitchCase,
};
use tsonic_ir::types::{FunctionParamType, IrType, ObjectTypeMember};

pub type Substitution = OrderedMap<String, IrType>;

pub fn substitute_type(ty: &IrType, subst: &Substitution) -> IrType {
    match ty {
        IrType::GenericParameter(name) => subst.get(name).cloned().unwrap_or_else(|| ty.clone()),
        IrType::Primitive(_) | IrType::Any | IrType::Unknown | IrType::Void | IrType::Never => ty.clone(),
        IrType::Reference { name, type_arguments, clr_qualified } => IrType::Reference {
            name: name.clone(),
            type_arguments: type_arguments.iter().map(|t| substitute_type(t, subst)).collect(),
            clr_qualified: clr_qualified.clone(),
        },
        IrType::Array(inner) => IrType::Array(Box::new(substitute_type(inner, subst))),
        IrType::Function { parameters, return_type, is_async } => IrType::Function {
            parameters: parameters
                .iter()
                .map(|p| FunctionParamType {
                    name: p.name.clone(),
                    ty: substitute_type(&p.ty, subst),
                    modifier: p.modifier,
                    optional: p.optional,
                })
                .collect(),
            return_type: Box::new(substitute_type(return_type, subst)),
            is_async: *is_async,
        },
        IrType::ObjectLiteral(members) => IrType::ObjectLiteral(substitute_members(members, subst)),
        IrType::Union(members) => IrType::Union(members.iter().map(|t| substitute_type(t, subst)).collect()),
        IrType::Intersection(members) => IrType::Intersection(members.iter().map(|t| substitute_type(t, subst)).collect()),
        IrType::Literal(_) => ty.clone(),
        IrType::Nullable(inner) => IrType::Nullable(Box::new(substitute_type(inner, subst))),
    }
}

fn substitute_members(members: &[ObjectTypeMember], subst: &Substitution) -> Vec<ObjectTypeMember> {
    members
        .iter()
        .map(|m| ObjectTypeMember {
            name: m.name.clone(),
            ty: substitute_type(&m.ty, subst),
            optional: m.optional,
        })
        .collect()
}

pub fn substitute_function(decl: &FunctionDecl, subst: &Substitution) -> FunctionDecl {
    FunctionDecl {
        name: decl.name.clone(),
        type_parameters: vec![],
        parameters: decl.parameters.iter().map(|p| substitute_param(p, subst)).collect(),
        return_type: substitute_type(&decl.return_type, subst),
        body: substitute_block(&decl.body, subst),
        is_async: decl.is_async,
        generator: decl.generator.clone(),
        is_exported: decl.is_exported,
    }
}

pub fn substitute_class(decl: &ClassDecl, subst: &Substitution) -> ClassDecl {
    ClassDecl {
        name: decl.name.clone(),
        type_parameters: vec![],
        extends: decl.extends.as_ref().map(|t| substitute_type(t, subst)),
        members: decl.members.iter().map(|m| substitute_class_member(m, subst)).collect(),
        is_exported: decl.is_exported,
    }
}

fn substitute_class_member(member: &ClassMember, subst: &Substitution) -> ClassMember {
    ClassMember {
        name: member.name.clone(),
        is_static: member.is_static,
        is_override: member.is_override,
        kind: match &member.kind {
            ClassMemberKind::Field { ty, initializer } => ClassMemberKind::Field {
                ty: substitute_type(ty, subst),
                initializer: initializer.as_ref().map(|e| substitute_expr(e, subst)),
            },
            ClassMemberKind::Method(f) => ClassMemberKind::Method(substitute_function(f, subst)),
            ClassMemberKind::Constructor(f) => ClassMemberKind::Constructor(substitute_function(f, subst)),
            ClassMemberKind::Property { ty, getter, setter, forward } => ClassMemberKind::Property {
                ty: substitute_type(ty, subst),
                getter: *getter,
                setter: *setter,
                forward: forward.clone(),
            },
        },
    }
}

fn substitute_param(param: &Param, subst: &Substitution) -> Param {
    Param {
        name: param.name.clone(),
        ty: substitute_type(&param.ty, subst),
        optional: param.optional,
        default: param.default.as_ref().map(|e| substitute_expr(e, subst)),
    }
}

pub fn substitute_block(block: &[IrStmt], subst: &Substitution) -> Vec<IrStmt> {
    block.iter().map(|s| substitute_stmt(s, subst)).collect()
}

pub fn substitute_stmt(stmt: &IrStmt, subst: &Substitution) -> IrStmt {
    let kind = match &stmt.kind {
        IrStatementKind::VariableDeclaration { name, ty, initializer, is_const, is_static_container_member } => {
            IrStatementKind::VariableDeclaration {
                name: name.clone(),
                ty: substitute_type(ty, subst),
                initializer: initializer.as_ref().map(|e| substitute_expr(e, subst)),
                is_const: *is_const,
                is_static_container_member: *is_static_container_member,
            }
        }
        IrStatementKind::FunctionDeclaration(f) => IrStatementKind::FunctionDeclaration(Box::new(substitute_function(f, subst))),
        IrStatementKind::ClassDeclaration(c) => IrStatementKind::ClassDeclaration(Box::new(substitute_class(c, subst))),
        IrStatementKind::InterfaceDeclaration(i) => IrStatementKind::InterfaceDeclaration(Box::new(tsonic_ir::stmt::InterfaceDecl {
            name: i.name.clone(),
            type_parameters: i.type_parameters.clone(),
            members: i
                .members
                .iter()
                .map(|m| tsonic_ir::stmt::ObjectMember { name: m.name.clone(), ty: substitute_type(&m.ty, subst), optional: m.optional })
                .collect(),
            is_exported: i.is_exported,
        })),
        IrStatementKind::EnumDeclaration(e) => IrStatementKind::EnumDeclaration(e.clone()),
        IrStatementKind::TypeAliasDeclaration { name, type_parameters, aliased } => IrStatementKind::TypeAliasDeclaration {
            name: name.clone(),
            type_parameters: type_parameters.clone(),
            aliased: substitute_type(aliased, subst),
        },
        IrStatementKind::ExpressionStatement(e) => IrStatementKind::ExpressionStatement(substitute_expr(e, subst)),
        IrStatementKind::Return(e) => IrStatementKind::Return(e.as_ref().map(|e| substitute_expr(e, subst))),
        IrStatementKind::If { condition, then_branch, else_branch } => IrStatementKind::If {
            condition: substitute_expr(condition, subst),
            then_branch: substitute_block(then_branch, subst),
            else_branch: else_branch.as_ref().map(|b| substitute_block(b, subst)),
        },
        IrStatementKind::While { condition, body } => IrStatementKind::While {
            condition: substitute_expr(condition, subst),
            body: substitute_block(body, subst),
        },
        IrStatementKind::DoWhile { body, condition } => IrStatementKind::DoWhile {
            body: substitute_block(body, subst),
            condition: substitute_expr(condition, subst),
        },
        IrStatementKind::For { initializer, condition, update, body } => IrStatementKind::For {
            initializer: initializer.as_ref().map(|s| Box::new(substitute_stmt(s, subst))),
            condition: condition.as_ref().map(|e| substitute_expr(e, subst)),
            update: update.as_ref().map(|e| substitute_expr(e, subst)),
            body: substitute_block(body, subst),
        },
        IrStatementKind::ForOf { variable, variable_ty, iterable, body, is_await } => IrStatementKind::ForOf {
            variable: variable.clone(),
            variable_ty: substitute_type(variable_ty, subst),
            iterable: substitute_expr(iterable, subst),
            body: substitute_block(body, subst),
            is_await: *is_await,
        },
        IrStatementKind::Switch { discriminant, cases } => IrStatementKind::Switch {
            discriminant: substitute_expr(discriminant, subst),
            cases: cases
                .iter()
                .map(|c| SwitchCase { test: c.test.as_ref().map(|e| substitute_expr(e, subst)), body: substitute_block(&c.body, subst) })
                .collect(),
        },
        IrStatementKind::Throw(e) => IrStatementKind::Throw(substitute_expr(e, subst)),
        IrStatementKind::Try { block, catch, finally } => IrStatementKind::Try {
            block: substitute_block(block, subst),
            catch: catch.as_ref().map(|c| CatchClause { param: c.param.clone(), body: substitute_block(&c.body, subst) }),
            finally: finally.as_ref().map(|b| substitute_block(b, subst)),
        },
        IrStatementKind::Block(b) => IrStatementKind::Block(substitute_block(b, subst)),
        IrStatementKind::Break(l) => IrStatementKind::Break(l.clone()),
        IrStatementKind::Continue(l) => IrStatementKind::Continue(l.clone()),
    };
    IrStmt { span: stmt.span, kind }
}

pub fn substitute_expr(expr: &IrExpr, subst: &Substitution) -> IrExpr {
    let ty = substitute_type(&expr.ty, subst);
    let kind = match &expr.kind {
        IrExpressionKind::Literal(l) => IrExpressionKind::Literal(l.clone()),
        IrExpressionKind::Identifier { name, clr_binding } => IrExpressionKind::Identifier { name: name.clone(), clr_binding: clr_binding.clone() },
        IrExpressionKind::ArrayLiteral(items) => IrExpressionKind::ArrayLiteral(items.iter().map(|e| substitute_expr(e, subst)).collect()),
        IrExpressionKind::ObjectLiteral(members) => {
            IrExpressionKind::ObjectLiteral(members.iter().map(|(n, e)| (n.clone(), substitute_expr(e, subst))).collect())
        }
        IrExpressionKind::Function(body) => IrExpressionKind::Function(Box::new(substitute_function_body(body, subst))),
        IrExpressionKind::Arrow(body) => IrExpressionKind::Arrow(Box::new(substitute_function_body(body, subst))),
        IrExpressionKind::MemberAccess { object, member, optional, clr_binding } => IrExpressionKind::MemberAccess {
            object: Box::new(substitute_expr(object, subst)),
            member: member.clone(),
            optional: *optional,
            clr_binding: clr_binding.clone(),
        },
        IrExpressionKind::Call { callee, arguments, type_arguments, resolved_signature, optional } => IrExpressionKind::Call {
            callee: Box::new(substitute_expr(callee, subst)),
            arguments: arguments.iter().map(|e| substitute_expr(e, subst)).collect(),
            type_arguments: type_arguments.iter().map(|t| substitute_type(t, subst)).collect(),
            resolved_signature: resolved_signature.clone(),
            optional: *optional,
        },
        IrExpressionKind::New { callee, arguments, type_arguments } => IrExpressionKind::New {
            callee: Box::new(substitute_expr(callee, subst)),
            arguments: arguments.iter().map(|e| substitute_expr(e, subst)).collect(),
            type_arguments: type_arguments.iter().map(|t| substitute_type(t, subst)).collect(),
        },
        IrExpressionKind::This => IrExpressionKind::This,
        IrExpressionKind::Unary { op, operand } => IrExpressionKind::Unary { op: *op, operand: Box::new(substitute_expr(operand, subst)) },
        IrExpressionKind::Update { op, operand, prefix } => {
            IrExpressionKind::Update { op: *op, operand: Box::new(substitute_expr(operand, subst)), prefix: *prefix }
        }
        IrExpressionKind::Binary { op, left, right } => {
            IrExpressionKind::Binary { op: *op, left: Box::new(substitute_expr(left, subst)), right: Box::new(substitute_expr(right, subst)) }
        }
        IrExpressionKind::Logical { op, left, right } => {
            IrExpressionKind::Logical { op: *op, left: Box::new(substitute_expr(left, subst)), right: Box::new(substitute_expr(right, subst)) }
        }
        IrExpressionKind::Ternary { condition, when_true, when_false } => IrExpressionKind::Ternary {
            condition: Box::new(substitute_expr(condition, subst)),
            when_true: Box::new(substitute_expr(when_true, subst)),
            when_false: Box::new(substitute_expr(when_false, subst)),
        },
        IrExpressionKind::Assignment { op, target, value } => {
            IrExpressionKind::Assignment { op: *op, target: Box::new(substitute_expr(target, subst)), value: Box::new(substitute_expr(value, subst)) }
        }
        IrExpressionKind::TemplateLiteral { quasis, expressions } => IrExpressionKind::TemplateLiteral {
            quasis: quasis.clone(),
            expressions: expressions.iter().map(|e| substitute_expr(e, subst)).collect(),
        },
        IrExpressionKind::Spread(e) => IrExpressionKind::Spread(Box::new(substitute_expr(e, subst))),
        IrExpressionKind::Await(e) => IrExpressionKind::Await(Box::new(substitute_expr(e, subst))),
        IrExpressionKind::Yield { argument, delegate } => {
            IrExpressionKind::Yield { argument: argument.as_ref().map(|e| Box::new(substitute_expr(e, subst))), delegate: *delegate }
        }
        IrExpressionKind::Intrinsic { kind, type_argument, arguments } => IrExpressionKind::Intrinsic {
            kind: *kind,
            type_argument: type_argument.as_ref().map(|t| substitute_type(t, subst)),
            arguments: arguments.iter().map(|e| substitute_expr(e, subst)).collect(),
        },
    };
    IrExpr { span: expr.span, kind, ty }
}

fn substitute_function_body(body: &IrFunctionBody, subst: &Substitution) -> IrFunctionBody {
    IrFunctionBody {
        parameters: body.parameters.iter().map(|p| substitute_param(p, subst)).collect(),
        return_type: substitute_type(&body.return_type, subst),
        body: substitute_block(&body.body, subst),
        is_async: body.is_async,
        generator: body.generator.clone(),
        captures_this: body.captures_this,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsonic_ir::types::PrimitiveType;

    #[test]
    fn substitutes_generic_parameter_in_return_type() {
        let mut subst = Substitution::new();
        subst.insert("T".to_string(), IrType::Primitive(PrimitiveType::Double));
        let decl = FunctionDecl {
            name: "identity".to_string(),
            type_parameters: vec![tsonic_ir::types::TypeParameter { name: "T".to_string(), constraint: None }],
            parameters: vec![Param { name: "x".to_string(), ty: IrType::GenericParameter("T".to_string()), optional: false, default: None }],
            return_type: IrType::GenericParameter("T".to_string()),
            body: vec![],
            is_async: false,
            generator: None,
            is_exported: true,
        };
        let specialised = substitute_function(&decl, &subst);
        assert!(specialised.type_parameters.is_empty());
        assert_eq!(specialised.return_type, IrType::Primitive(PrimitiveType::Double));
        assert_eq!(specialised.parameters[0].ty, IrType::Primitive(PrimitiveType::Double));
    }

    #[test]
    fn leaves_unrelated_types_untouched() {
        let subst = Substitution::new();
        let ty = IrType::Array(Box::new(IrType::Primitive(PrimitiveType::String)));
        assert_eq!(substitute_type(&ty, &subst), ty);
    }
}

//! Structural-constraint adapter synthesis (spec §4.8
//! "Structural-constraint adapters"): preserves TypeScript's structural
//! typing within a nominal-generics target without runtime reflection.

use tsonic_common::ordered::OrderedMap;
use tsonic_ir::expr::{IrExpr, IrExpressionKind};
use tsonic_ir::module::IrModule;
use tsonic_ir::stmt::{
    ClassDecl, ClassMember, ClassMemberKind, DynamicForward, FunctionDecl, InterfaceDecl, IrStmt, ObjectMember, Param,
};
use tsonic_ir::types::{Constraint, FunctionParamType, IrType, ObjectTypeMember};

use crate::discover::{GenericDeclaration, GenericDeclarationKind};

#[derive(Clone, Debug)]
pub struct StructuralAdapter {
    pub owning_module: String,
    /// The generic declaration this adapter was synthesised for.
    pub generic_decl_id: String,
    pub type_parameter: String,
    pub interface: InterfaceDecl,
    pub wrapper: ClassDecl,
}

impl StructuralAdapter {
    pub fn interface_name(&self) -> &str {
        &self.interface.name
    }

    pub fn wrapper_name(&self) -> &str {
        &self.wrapper.name
    }
}

const WRAPPED_FIELD: &str = "inner";

/// Finds every structurally-constrained type parameter across the given
/// generic declarations and synthesises its interface/wrapper pair. Also
/// rewrites the declaration's own constraint from structural to nominal
/// (spec: "rewrite the generic signature ... with the constraint
/// `where T : I_T`").
pub fn synthesise_adapters(declarations: &mut OrderedMap<String, GenericDeclaration>) -> Vec<StructuralAdapter> {
    let mut adapters = Vec::new();
    for decl in declarations.values_mut() {
        let owning_module = decl.owning_module.clone();
        let decl_name = decl_name(&decl.kind);
        let type_parameters = match &mut decl.kind {
            GenericDeclarationKind::Function(f) => &mut f.type_parameters,
            GenericDeclarationKind::Class(c) => &mut c.type_parameters,
        };
        for tp in type_parameters.iter_mut() {
            let members = match &tp.constraint {
                Some(Constraint::Structural(members)) => members.clone(),
                _ => continue,
            };
            let adapter = build_adapter(&owning_module, &decl_name, &tp.name, &members);
            tp.constraint = Some(Constraint::Nominal(IrType::Reference {
                name: adapter.interface_name().to_string(),
                type_arguments: vec![],
                clr_qualified: None,
            }));
            adapters.push(adapter);
        }
    }
    adapters
}

fn decl_name(kind: &GenericDeclarationKind) -> String {
    match kind {
        GenericDeclarationKind::Function(f) => f.name.clone(),
        GenericDeclarationKind::Class(c) => c.name.clone(),
    }
}

fn build_adapter(owning_module: &str, decl_name: &str, type_parameter: &str, members: &[ObjectTypeMember]) -> StructuralAdapter {
    let interface_name = format!("I_{decl_name}_{type_parameter}");
    let wrapper_name = format!("W_{decl_name}_{type_parameter}");

    let interface = InterfaceDecl {
        name: interface_name.clone(),
        type_parameters: vec![],
        members: members
            .iter()
            .map(|m| ObjectMember { name: m.name.clone(), ty: m.ty.clone(), optional: m.optional })
            .collect(),
        is_exported: false,
    };

    let mut wrapper_members = vec![
        ClassMember {
            name: WRAPPED_FIELD.to_string(),
            kind: ClassMemberKind::Field { ty: IrType::Any, initializer: None },
            is_static: false,
            is_override: false,
        },
        ClassMember {
            name: wrapper_name.clone(),
            kind: ClassMemberKind::Constructor(FunctionDecl {
                name: wrapper_name.clone(),
                type_parameters: vec![],
                parameters: vec![Param { name: "value".to_string(), ty: IrType::Any, optional: false, default: None }],
                return_type: IrType::Void,
                body: vec![IrStmt {
                    span: tsonic_common::Span::dummy(),
                    kind: tsonic_ir::stmt::IrStatementKind::ExpressionStatement(assign_field(WRAPPED_FIELD, "value")),
                }],
                is_async: false,
                generator: None,
                is_exported: false,
            }),
            is_static: false,
            is_override: false,
        },
    ];

    for member in members {
        wrapper_members.push(forwarding_member(member));
    }

    let wrapper = ClassDecl {
        name: wrapper_name,
        type_parameters: vec![],
        extends: Some(IrType::Reference { name: interface_name.clone(), type_arguments: vec![], clr_qualified: None }),
        members: wrapper_members,
        is_exported: false,
    };

    StructuralAdapter {
        owning_module: owning_module.to_string(),
        generic_decl_id: decl_name.to_string(),
        type_parameter: type_parameter.to_string(),
        interface,
        wrapper,
    }
}

fn forwarding_member(member: &ObjectTypeMember) -> ClassMember {
    match &member.ty {
        IrType::Function { parameters, return_type, is_async } => ClassMember {
            name: member.name.clone(),
            is_static: false,
            is_override: false,
            kind: ClassMemberKind::Method(forwarding_method(&member.name, parameters, return_type, *is_async)),
        },
        _ => ClassMember {
            name: member.name.clone(),
            is_static: false,
            is_override: false,
            kind: ClassMemberKind::Property {
                ty: member.ty.clone(),
                getter: true,
                setter: false,
                forward: Some(DynamicForward { via_field: WRAPPED_FIELD.to_string(), member: member.name.clone() }),
            },
        },
    }
}

fn forwarding_method(name: &str, parameters: &[FunctionParamType], return_type: &IrType, is_async: bool) -> FunctionDecl {
    let params: Vec<Param> = parameters
        .iter()
        .enumerate()
        .map(|(i, p)| Param { name: if p.name.is_empty() { format!("arg{i}") } else { p.name.clone() }, ty: p.ty.clone(), optional: p.optional, default: None })
        .collect();

    let forward_call = IrExpr::new(
        tsonic_common::Span::dummy(),
        IrExpressionKind::Call {
            callee: Box::new(IrExpr::new(
                tsonic_common::Span::dummy(),
                IrExpressionKind::MemberAccess {
                    object: Box::new(field_access(WRAPPED_FIELD)),
                    member: name.to_string(),
                    optional: false,
                    clr_binding: None,
                },
                IrType::Any,
            )),
            arguments: params
                .iter()
                .map(|p| IrExpr::new(tsonic_common::Span::dummy(), IrExpressionKind::Identifier { name: p.name.clone(), clr_binding: None }, p.ty.clone()))
                .collect(),
            type_arguments: vec![],
            resolved_signature: None,
            optional: false,
        },
        return_type.clone(),
    );

    let body = if matches!(return_type, IrType::Void) {
        vec![IrStmt { span: tsonic_common::Span::dummy(), kind: tsonic_ir::stmt::IrStatementKind::ExpressionStatement(forward_call) }]
    } else {
        vec![IrStmt { span: tsonic_common::Span::dummy(), kind: tsonic_ir::stmt::IrStatementKind::Return(Some(forward_call)) }]
    };

    FunctionDecl {
        name: name.to_string(),
        type_parameters: vec![],
        parameters: params,
        return_type: return_type.clone(),
        body,
        is_async,
        generator: None,
        is_exported: false,
    }
}

fn field_access(field: &str) -> IrExpr {
    IrExpr::new(
        tsonic_common::Span::dummy(),
        IrExpressionKind::MemberAccess { object: Box::new(IrExpr::new(tsonic_common::Span::dummy(), IrExpressionKind::This, IrType::Any)), member: field.to_string(), optional: false, clr_binding: None },
        IrType::Any,
    )
}

fn assign_field(field: &str, from_param: &str) -> IrExpr {
    IrExpr::new(
        tsonic_common::Span::dummy(),
        IrExpressionKind::Assignment {
            op: tsonic_ir::expr::AssignOp::Assign,
            target: Box::new(field_access(field)),
            value: Box::new(IrExpr::new(tsonic_common::Span::dummy(), IrExpressionKind::Identifier { name: from_param.to_string(), clr_binding: None }, IrType::Any)),
        },
        IrType::Void,
    )
}

/// Wraps each call/new-site argument that targets a structurally-adapted
/// type parameter in `new W_T(arg)` (spec §4.8 step 4).
pub fn wrap_call_site_arguments(
    modules: &mut OrderedMap<String, IrModule>,
    declarations: &OrderedMap<String, GenericDeclaration>,
    adapters: &[StructuralAdapter],
) {
    if adapters.is_empty() {
        return;
    }
    for module in modules.values_mut() {
        for stmt in &mut module.body {
            wrap_stmt(stmt, declarations, adapters);
        }
    }
}

fn adapted_positions(decl: &GenericDeclaration, adapters: &[StructuralAdapter]) -> Vec<(usize, String)> {
    let GenericDeclarationKind::Function(f) = &decl.kind else {
        return vec![];
    };
    let mut positions = Vec::new();
    for (i, p) in f.parameters.iter().enumerate() {
        if let IrType::GenericParameter(name) = &p.ty {
            if let Some(adapter) = adapters.iter().find(|a| &a.type_parameter == name && a.generic_decl_id == f.name) {
                positions.push((i, adapter.wrapper_name().to_string()));
            }
        }
    }
    positions
}

fn wrap_call(expr: &mut IrExpr, declarations: &OrderedMap<String, GenericDeclaration>, adapters: &[StructuralAdapter]) {
    if let IrExpressionKind::Call { callee, arguments, .. } = &mut expr.kind {
        if let IrExpressionKind::Identifier { name, .. } = &callee.kind {
            if let Some(decl) = declarations.get(name.as_str()) {
                for (index, wrapper_name) in adapted_positions(decl, adapters) {
                    if let Some(arg) = arguments.get_mut(index) {
                        let original = std::mem::replace(arg, IrExpr::new(tsonic_common::Span::dummy(), IrExpressionKind::This, IrType::Any));
                        *arg = IrExpr::new(
                            original.span,
                            IrExpressionKind::New {
                                callee: Box::new(IrExpr::new(
                                    tsonic_common::Span::dummy(),
                                    IrExpressionKind::Identifier { name: wrapper_name.clone(), clr_binding: None },
                                    IrType::Reference { name: wrapper_name.clone(), type_arguments: vec![], clr_qualified: None },
                                )),
                                arguments: vec![original],
                                type_arguments: vec![],
                            },
                            IrType::Reference { name: wrapper_name, type_arguments: vec![], clr_qualified: None },
                        );
                    }
                }
            }
        }
    }
}

fn wrap_stmt(stmt: &mut IrStmt, declarations: &OrderedMap<String, GenericDeclaration>, adapters: &[StructuralAdapter]) {
    use tsonic_ir::stmt::IrStatementKind as K;
    match &mut stmt.kind {
        K::VariableDeclaration { initializer: Some(e), .. } | K::ExpressionStatement(e) | K::Throw(e) => wrap_expr_tree(e, declarations, adapters),
        K::Return(Some(e)) => wrap_expr_tree(e, declarations, adapters),
        K::If { condition, then_branch, else_branch } => {
            wrap_expr_tree(condition, declarations, adapters);
            for s in then_branch {
                wrap_stmt(s, declarations, adapters);
            }
            if let Some(b) = else_branch {
                for s in b {
                    wrap_stmt(s, declarations, adapters);
                }
            }
        }
        K::While { condition, body } | K::DoWhile { body, condition } => {
            wrap_expr_tree(condition, declarations, adapters);
            for s in body {
                wrap_stmt(s, declarations, adapters);
            }
        }
        K::For { initializer, condition, update, body } => {
            if let Some(s) = initializer {
                wrap_stmt(s, declarations, adapters);
            }
            if let Some(e) = condition {
                wrap_expr_tree(e, declarations, adapters);
            }
            if let Some(e) = update {
                wrap_expr_tree(e, declarations, adapters);
            }
            for s in body {
                wrap_stmt(s, declarations, adapters);
            }
        }
        K::ForOf { iterable, body, .. } => {
            wrap_expr_tree(iterable, declarations, adapters);
            for s in body {
                wrap_stmt(s, declarations, adapters);
            }
        }
        K::Switch { discriminant, cases } => {
            wrap_expr_tree(discriminant, declarations, adapters);
            for c in cases {
                if let Some(t) = &mut c.test {
                    wrap_expr_tree(t, declarations, adapters);
                }
                for s in &mut c.body {
                    wrap_stmt(s, declarations, adapters);
                }
            }
        }
        K::Try { block, catch, finally } => {
            for s in block {
                wrap_stmt(s, declarations, adapters);
            }
            if let Some(c) = catch {
                for s in &mut c.body {
                    wrap_stmt(s, declarations, adapters);
                }
            }
            if let Some(f) = finally {
                for s in f {
                    wrap_stmt(s, declarations, adapters);
                }
            }
        }
        K::Block(b) => {
            for s in b {
                wrap_stmt(s, declarations, adapters);
            }
        }
        K::FunctionDeclaration(f) => {
            for s in &mut f.body {
                wrap_stmt(s, declarations, adapters);
            }
        }
        K::ClassDeclaration(c) => {
            for m in &mut c.members {
                if let ClassMemberKind::Method(f) | ClassMemberKind::Constructor(f) = &mut m.kind {
                    for s in &mut f.body {
                        wrap_stmt(s, declarations, adapters);
                    }
                }
            }
        }
        _ => {}
    }
}

/// Recurses into an expression looking for call sites to wrap, without
/// needing the full generic walker in `monomorphise`/`rewrite` (this pass
/// only ever touches `Call` argument lists).
fn wrap_expr_tree(expr: &mut IrExpr, declarations: &OrderedMap<String, GenericDeclaration>, adapters: &[StructuralAdapter]) {
    wrap_call(expr, declarations, adapters);
    match &mut expr.kind {
        IrExpressionKind::Call { callee, arguments, .. } | IrExpressionKind::New { callee, arguments, .. } => {
            wrap_expr_tree(callee, declarations, adapters);
            for a in arguments {
                wrap_expr_tree(a, declarations, adapters);
            }
        }
        IrExpressionKind::ArrayLiteral(items) => {
            for i in items {
                wrap_expr_tree(i, declarations, adapters);
            }
        }
        IrExpressionKind::ObjectLiteral(members) => {
            for (_, e) in members {
                wrap_expr_tree(e, declarations, adapters);
            }
        }
        IrExpressionKind::MemberAccess { object, .. } => wrap_expr_tree(object, declarations, adapters),
        IrExpressionKind::Unary { operand, .. } | IrExpressionKind::Update { operand, .. } | IrExpressionKind::Spread(operand) | IrExpressionKind::Await(operand) => {
            wrap_expr_tree(operand, declarations, adapters)
        }
        IrExpressionKind::Binary { left, right, .. } | IrExpressionKind::Logical { left, right, .. } => {
            wrap_expr_tree(left, declarations, adapters);
            wrap_expr_tree(right, declarations, adapters);
        }
        IrExpressionKind::Ternary { condition, when_true, when_false } => {
            wrap_expr_tree(condition, declarations, adapters);
            wrap_expr_tree(when_true, declarations, adapters);
            wrap_expr_tree(when_false, declarations, adapters);
        }
        IrExpressionKind::Assignment { target, value, .. } => {
            wrap_expr_tree(target, declarations, adapters);
            wrap_expr_tree(value, declarations, adapters);
        }
        IrExpressionKind::TemplateLiteral { expressions, .. } => {
            for e in expressions {
                wrap_expr_tree(e, declarations, adapters);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsonic_ir::types::TypeParameter;

    #[test]
    fn synthesises_interface_and_wrapper_for_structural_constraint() {
        let mut declarations = OrderedMap::new();
        declarations.insert(
            "describe".to_string(),
            GenericDeclaration {
                owning_module: "/a.ts".to_string(),
                kind: GenericDeclarationKind::Function(FunctionDecl {
                    name: "describe".to_string(),
                    type_parameters: vec![TypeParameter {
                        name: "T".to_string(),
                        constraint: Some(Constraint::Structural(vec![ObjectTypeMember { name: "label".to_string(), ty: IrType::Primitive(tsonic_ir::types::PrimitiveType::String), optional: false }])),
                    }],
                    parameters: vec![Param { name: "value".to_string(), ty: IrType::GenericParameter("T".to_string()), optional: false, default: None }],
                    return_type: IrType::Void,
                    body: vec![],
                    is_async: false,
                    generator: None,
                    is_exported: true,
                }),
            },
        );

        let adapters = synthesise_adapters(&mut declarations);
        assert_eq!(adapters.len(), 1);
        assert_eq!(adapters[0].interface.members.len(), 1);
        assert_eq!(adapters[0].wrapper.members.len(), 3);

        let decl = declarations.get("describe").unwrap();
        let GenericDeclarationKind::Function(f) = &decl.kind else { panic!() };
        assert!(matches!(f.type_parameters[0].constraint, Some(Constraint::Nominal(_))));
    }
}

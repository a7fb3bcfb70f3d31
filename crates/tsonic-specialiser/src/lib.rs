//! Monomorphisation and structural-constraint adapters (C10, spec §4.8).
//!
//! Runs after the analyser has collected and deduplicated every
//! `SpecialisationRequest` across the program, and before the emitter sees
//! the IR bundle.

mod adapters;
mod discover;
mod monomorphise;
mod rewrite;
mod substitute;

pub use adapters::StructuralAdapter;
pub use discover::{GenericDeclaration, GenericDeclarationKind};
pub use monomorphise::SpecialisedDeclaration;

use tsonic_common::ordered::OrderedMap;
use tsonic_common::{Diagnostic, diagnostics, limits};
use tsonic_ir::module::IrModule;
use tsonic_ir::specialisation::SpecialisationRequest;
use tsonic_ir::stmt::{IrStatementKind, IrStmt};

pub struct SpecialiserOutput {
    pub specialised_declarations: Vec<SpecialisedDeclaration>,
    pub adapters: Vec<StructuralAdapter>,
}

/// Runs monomorphisation to a fixpoint and synthesises structural-constraint
/// adapters, mutating `modules` in place: call sites are rewritten to
/// target specialisations or wrapped for adapters, and the generated
/// declarations are spliced into their owning module's body immediately
/// after the base declaration (spec §5 ordering guarantee).
pub fn specialise(
    modules: &mut OrderedMap<String, IrModule>,
    initial_requests: Vec<SpecialisationRequest>,
) -> Result<SpecialiserOutput, Vec<Diagnostic>> {
    let mut declarations = discover::collect_generic_declarations(modules);

    let adapters = adapters::synthesise_adapters(&mut declarations);
    adapters::wrap_call_site_arguments(modules, &declarations, &adapters);

    let mut done: OrderedMap<String, SpecialisedDeclaration> = OrderedMap::new();
    let mut pending = initial_requests;
    let mut iterations = 0usize;

    loop {
        let fresh: Vec<SpecialisationRequest> = pending.into_iter().filter(|r| !done.contains_key(&r.canonical_key())).collect();
        if fresh.is_empty() {
            break;
        }
        iterations += 1;
        if iterations > limits::MAX_SPECIALISATION_FIXPOINT_ITERATIONS {
            return Err(vec![Diagnostic::error(
                diagnostics::E4001_UNLOWERABLE_CONSTRUCT,
                "specialisation did not converge: a recursive generic keeps emitting fresh specialisation requests",
            )]);
        }

        let mut next_pending = Vec::new();
        for request in fresh {
            let Some(decl) = declarations.get(request.generic_decl_id.as_str()) else {
                continue;
            };
            if done.len() >= limits::MAX_SPECIALISATIONS_PER_DECLARATION * declarations.len().max(1) {
                return Err(vec![Diagnostic::error(
                    diagnostics::E4001_UNLOWERABLE_CONSTRUCT,
                    "too many distinct specialisations requested for the program's generic declarations",
                )]);
            }
            let specialised = monomorphise::specialise_declaration(decl, &request);
            next_pending.extend(monomorphise::discover_nested_requests(&specialised, &declarations));
            done.insert(request.canonical_key(), specialised);
        }
        pending = next_pending;
    }

    rewrite::rewrite_call_sites(modules, &declarations, &done);
    attach_specialisations(modules, &done);

    Ok(SpecialiserOutput {
        specialised_declarations: done.into_values().collect(),
        adapters,
    })
}

/// Splices each specialised declaration into its owning module's body
/// immediately after the base declaration it was derived from (spec §5:
/// "specialisations are emitted immediately adjacent to their base
/// declaration").
fn attach_specialisations(modules: &mut OrderedMap<String, IrModule>, done: &OrderedMap<String, SpecialisedDeclaration>) {
    let mut by_module: OrderedMap<String, Vec<&SpecialisedDeclaration>> = OrderedMap::new();
    for specialised in done.values() {
        by_module.entry(specialised.owning_module.clone()).or_default().push(specialised);
    }

    for (module_path, specialisations) in by_module {
        let Some(module) = modules.get_mut(&module_path) else { continue };
        let mut new_body = Vec::with_capacity(module.body.len() + specialisations.len());
        for stmt in module.body.drain(..) {
            let base_name = match &stmt.kind {
                IrStatementKind::FunctionDeclaration(f) => Some(f.name.clone()),
                IrStatementKind::ClassDeclaration(c) => Some(c.name.clone()),
                _ => None,
            };
            let matching: Vec<&&SpecialisedDeclaration> = base_name
                .as_ref()
                .map(|name| specialisations.iter().filter(|s| &s.generic_decl_id == name).collect())
                .unwrap_or_default();
            new_body.push(stmt);
            for specialised in matching {
                new_body.push(to_stmt(specialised));
            }
        }
        module.body = new_body;
    }
}

fn to_stmt(specialised: &SpecialisedDeclaration) -> IrStmt {
    let kind = match &specialised.kind {
        GenericDeclarationKind::Function(f) => IrStatementKind::FunctionDeclaration(Box::new(f.clone())),
        GenericDeclarationKind::Class(c) => IrStatementKind::ClassDeclaration(Box::new(c.clone())),
    };
    IrStmt { span: tsonic_common::Span::dummy(), kind }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsonic_ir::module::ExportedSymbol;
    use tsonic_ir::module::ExportedSymbolKind;
    use tsonic_ir::stmt::{FunctionDecl, Param};
    use tsonic_ir::types::{IrType, PrimitiveType, TypeParameter};

    fn module_with_generic_fn_and_call() -> IrModule {
        let generic = IrStmt {
            span: tsonic_common::Span::dummy(),
            kind: IrStatementKind::FunctionDeclaration(Box::new(FunctionDecl {
                name: "identity".to_string(),
                type_parameters: vec![TypeParameter { name: "T".to_string(), constraint: None }],
                parameters: vec![Param { name: "x".to_string(), ty: IrType::GenericParameter("T".to_string()), optional: false, default: None }],
                return_type: IrType::GenericParameter("T".to_string()),
                body: vec![],
                is_async: false,
                generator: None,
                is_exported: true,
            })),
        };
        let call_site = IrStmt {
            span: tsonic_common::Span::dummy(),
            kind: IrStatementKind::ExpressionStatement(tsonic_ir::expr::IrExpr::new(
                tsonic_common::Span::dummy(),
                tsonic_ir::expr::IrExpressionKind::Call {
                    callee: Box::new(tsonic_ir::expr::IrExpr::new(
                        tsonic_common::Span::dummy(),
                        tsonic_ir::expr::IrExpressionKind::Identifier { name: "identity".to_string(), clr_binding: None },
                        IrType::Any,
                    )),
                    arguments: vec![tsonic_ir::expr::IrExpr::new(
                        tsonic_common::Span::dummy(),
                        tsonic_ir::expr::IrExpressionKind::Literal(tsonic_ir::types::LiteralType::Number(1.0)),
                        IrType::Primitive(PrimitiveType::Double),
                    )],
                    type_arguments: vec![IrType::Primitive(PrimitiveType::Double)],
                    resolved_signature: None,
                    optional: false,
                },
                IrType::Primitive(PrimitiveType::Double),
            )),
        };
        IrModule {
            file_path: "/a.ts".to_string(),
            namespace: "R".to_string(),
            container_class_name: "C".to_string(),
            is_static_container: true,
            imports: vec![],
            body: vec![generic, call_site],
            exports: vec![ExportedSymbol { name: "identity".to_string(), kind: ExportedSymbolKind::Function }],
        }
    }

    #[test]
    fn specialises_and_rewrites_call_site() {
        let mut modules = OrderedMap::new();
        modules.insert("/a.ts".to_string(), module_with_generic_fn_and_call());
        let requests = vec![SpecialisationRequest { generic_decl_id: "identity".to_string(), type_arguments: vec![IrType::Primitive(PrimitiveType::Double)] }];

        let output = specialise(&mut modules, requests).unwrap();
        assert_eq!(output.specialised_declarations.len(), 1);
        assert_eq!(output.specialised_declarations[0].name, "identity_Double");

        let module = modules.get("/a.ts").unwrap();
        assert_eq!(module.body.len(), 3);
        let IrStatementKind::FunctionDeclaration(specialised) = &module.body[1].kind else { panic!("expected specialised fn adjacent to base") };
        assert_eq!(specialised.name, "identity_Double");

        let IrStatementKind::ExpressionStatement(call_expr) = &module.body[2].kind else { panic!() };
        let tsonic_ir::expr::IrExpressionKind::Call { callee, type_arguments, .. } = &call_expr.kind else { panic!() };
        let tsonic_ir::expr::IrExpressionKind::Identifier { name, .. } = &callee.kind else { panic!() };
        assert_eq!(name, "identity_Double");
        assert!(type_arguments.is_empty());
    }
}

//! Type lowering (spec §4.6 "Types", "Arrays", "Objects and interfaces",
//! "Unions", "Generics").

use tsonic_common::{Diagnostic, diagnostics};
use tsonic_ir::types::{Constraint, FunctionParamType, IrType, ObjectTypeMember, PrimitiveType, TypeParameter};
use tsonic_program::ast::{TsType, TypeParamNode};

use crate::ctx::BuildContext;

/// Branded numeric aliases exported by the conventional `types` package
/// (spec §4.6 "Types").
fn branded_primitive(name: &str) -> Option<PrimitiveType> {
    match name {
        "int" => Some(PrimitiveType::Int),
        "uint" => Some(PrimitiveType::UInt),
        "long" => Some(PrimitiveType::Long),
        "byte" => Some(PrimitiveType::Byte),
        "short" => Some(PrimitiveType::Short),
        "float" => Some(PrimitiveType::Float),
        _ => None,
    }
}

pub fn lower_type(ty: &TsType, ctx: &mut BuildContext) -> Result<IrType, Diagnostic> {
    match ty {
        TsType::TypeRef { name, type_arguments } => lower_type_ref(name, type_arguments, ctx),
        TsType::Array(inner) => {
            if let TsType::Union(members) = inner.as_ref() {
                return Ok(IrType::Array(Box::new(lower_union(members, ctx)?)));
            }
            Ok(IrType::Array(Box::new(lower_type(inner, ctx)?)))
        }
        TsType::Function { parameters, return_type } => {
            let mut params = Vec::new();
            for p in parameters {
                let param_ty = match &p.declared_type {
                    Some(t) => lower_type(t, ctx)?,
                    None => IrType::Any,
                };
                params.push(FunctionParamType {
                    name: p.name.clone(),
                    ty: param_ty,
                    modifier: tsonic_ir::types::ParamModifier::None,
                    optional: p.optional,
                });
            }
            Ok(IrType::Function {
                parameters: params,
                return_type: Box::new(lower_type(return_type, ctx)?),
                is_async: false,
            })
        }
        TsType::ObjectLiteral(members) => {
            let mut out = Vec::new();
            for (name, member_ty, optional) in members {
                out.push(ObjectTypeMember {
                    name: name.clone(),
                    ty: lower_type(member_ty, ctx)?,
                    optional: *optional,
                });
            }
            Ok(IrType::ObjectLiteral(out))
        }
        TsType::Union(members) => lower_union(members, ctx),
        TsType::Intersection(members) => {
            let mut out = Vec::new();
            for m in members {
                out.push(lower_type(m, ctx)?);
            }
            Ok(IrType::Intersection(out))
        }
        TsType::StringLiteral(s) => Ok(IrType::Literal(tsonic_ir::types::LiteralType::String(s.clone()))),
        TsType::NumberLiteral(n) => Ok(IrType::Literal(tsonic_ir::types::LiteralType::Number(*n))),
        TsType::BoolLiteral(b) => Ok(IrType::Literal(tsonic_ir::types::LiteralType::Bool(*b))),
        TsType::Any => Ok(IrType::Any),
        TsType::Unknown => Ok(IrType::Any),
        TsType::Void => Ok(IrType::Void),
        TsType::Never => Ok(IrType::Never),
        TsType::Null | TsType::Undefined => Ok(IrType::Nullable(Box::new(IrType::Any))),
        TsType::SymbolIndexed => Err(Diagnostic::error(
            diagnostics::E7203_SYMBOL_KEY,
            "symbol-keyed index signatures cannot be lowered",
        )),
        TsType::Conditional => Err(Diagnostic::error(
            diagnostics::E2002_CONDITIONAL_TYPE,
            "conditional types are not supported",
        )),
    }
}

fn lower_type_ref(name: &str, type_arguments: &[TsType], ctx: &mut BuildContext) -> Result<IrType, Diagnostic> {
    match name {
        "number" => return Ok(IrType::Primitive(PrimitiveType::Double)),
        "string" => return Ok(IrType::Primitive(PrimitiveType::String)),
        "boolean" => return Ok(IrType::Primitive(PrimitiveType::Bool)),
        _ => {}
    }
    if let Some(prim) = branded_primitive(name) {
        return Ok(IrType::Primitive(prim));
    }
    if name == "Array" && type_arguments.len() == 1 {
        return Ok(IrType::Array(Box::new(lower_type(&type_arguments[0], ctx)?)));
    }
    if ctx.is_generic_parameter(name) {
        return Ok(IrType::GenericParameter(name.to_string()));
    }

    let clr_qualified = ctx.resolve_clr_type(name);
    let mut args = Vec::new();
    for a in type_arguments {
        args.push(lower_type(a, ctx)?);
    }
    Ok(IrType::Reference {
        name: name.to_string(),
        type_arguments: args,
        clr_qualified,
    })
}

/// `T | null` collapses to nullable `T` (spec §4.6 "Unions"). Other unions
/// lower to `object`; a two-member union where one side is an unconstrained
/// generic parameter and the other is null is caught earlier by the
/// validator (7415) so by the time the builder sees it, it either has a
/// concrete `T` or is a non-generic union.
fn lower_union(members: &[TsType], ctx: &mut BuildContext) -> Result<IrType, Diagnostic> {
    let has_null = members.iter().any(|m| matches!(m, TsType::Null | TsType::Undefined));
    let non_null: Vec<&TsType> = members
        .iter()
        .filter(|m| !matches!(m, TsType::Null | TsType::Undefined))
        .collect();

    if has_null && non_null.len() == 1 {
        let inner = lower_type(non_null[0], ctx)?;
        return Ok(IrType::Nullable(Box::new(inner)));
    }

    if is_discriminated_union(members) {
        let mut variants = Vec::new();
        for m in &non_null {
            variants.push(lower_type(m, ctx)?);
        }
        return Ok(IrType::Union(variants));
    }

    // Other unions lower to `object` with emitter-inserted type tests.
    let _ = non_null;
    Ok(IrType::Any)
}

/// A discriminated union: every variant is an object literal sharing a
/// common tag-literal field name (spec §4.6 "Unions").
fn is_discriminated_union(members: &[TsType]) -> bool {
    let object_variants: Vec<&Vec<(String, TsType, bool)>> = members
        .iter()
        .filter_map(|m| match m {
            TsType::ObjectLiteral(fields) => Some(fields),
            _ => None,
        })
        .collect();
    if object_variants.len() < 2 || object_variants.len() != members.len() {
        return false;
    }
    let Some(first) = object_variants.first() else {
        return false;
    };
    first.iter().any(|(name, ty, _)| {
        matches!(ty, TsType::StringLiteral(_))
            && object_variants
                .iter()
                .all(|fields| fields.iter().any(|(n, t, _)| n == name && matches!(t, TsType::StringLiteral(_))))
    })
}

pub fn lower_type_parameters(
    params: &[TypeParamNode],
    ctx: &mut BuildContext,
) -> Result<Vec<TypeParameter>, Diagnostic> {
    let mut out = Vec::new();
    for p in params {
        ctx.push_generic_parameter(p.name.clone());
        let constraint = match &p.constraint {
            None => None,
            Some(TsType::ObjectLiteral(members)) => {
                let mut out_members = Vec::new();
                for (name, ty, optional) in members {
                    out_members.push(ObjectTypeMember {
                        name: name.clone(),
                        ty: lower_type(ty, ctx)?,
                        optional: *optional,
                    });
                }
                Some(Constraint::Structural(out_members))
            }
            Some(other) => Some(Constraint::Nominal(lower_type(other, ctx)?)),
        };
        out.push(TypeParameter {
            name: p.name.clone(),
            constraint,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctx::test_program;
    use tsonic_program::testing::StubChecker;

    #[test]
    fn number_lowers_to_double() {
        let checker = StubChecker::new();
        let program = test_program(&checker);
        let mut ctx = BuildContext::new(&program, "a.ts".to_string());
        let ty = lower_type(&TsType::TypeRef { name: "number".into(), type_arguments: vec![] }, &mut ctx).unwrap();
        assert_eq!(ty, IrType::Primitive(PrimitiveType::Double));
    }

    #[test]
    fn branded_int_lowers_to_int() {
        let checker = StubChecker::new();
        let program = test_program(&checker);
        let mut ctx = BuildContext::new(&program, "a.ts".to_string());
        let ty = lower_type(&TsType::TypeRef { name: "int".into(), type_arguments: vec![] }, &mut ctx).unwrap();
        assert_eq!(ty, IrType::Primitive(PrimitiveType::Int));
    }

    #[test]
    fn simple_nullable_union_collapses() {
        let checker = StubChecker::new();
        let program = test_program(&checker);
        let mut ctx = BuildContext::new(&program, "a.ts".to_string());
        let ty = lower_type(
            &TsType::Union(vec![
                TsType::TypeRef { name: "string".into(), type_arguments: vec![] },
                TsType::Null,
            ]),
            &mut ctx,
        )
        .unwrap();
        assert_eq!(ty, IrType::Nullable(Box::new(IrType::Primitive(PrimitiveType::String))));
    }

    #[test]
    fn array_of_t_lowers_to_native_array() {
        let checker = StubChecker::new();
        let program = test_program(&checker);
        let mut ctx = BuildContext::new(&program, "a.ts".to_string());
        let ty = lower_type(
            &TsType::Array(Box::new(TsType::TypeRef { name: "number".into(), type_arguments: vec![] })),
            &mut ctx,
        )
        .unwrap();
        assert_eq!(ty, IrType::Array(Box::new(IrType::Primitive(PrimitiveType::Double))));
    }

    #[test]
    fn symbol_indexed_is_rejected() {
        let checker = StubChecker::new();
        let program = test_program(&checker);
        let mut ctx = BuildContext::new(&program, "a.ts".to_string());
        let err = lower_type(&TsType::SymbolIndexed, &mut ctx).unwrap_err();
        assert_eq!(err.code, diagnostics::E7203_SYMBOL_KEY);
    }
}

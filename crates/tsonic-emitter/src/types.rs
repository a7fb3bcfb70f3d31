//! `IrType` -> C# type-name rendering (spec §4.9).

use tsonic_ir::types::{IrType, PrimitiveType};

pub fn render_type(ty: &IrType) -> String {
    match ty {
        IrType::Primitive(p) => render_primitive(*p).to_string(),
        IrType::Reference { name, type_arguments, clr_qualified } => {
            let base = clr_qualified.as_deref().unwrap_or(name);
            if type_arguments.is_empty() {
                base.to_string()
            } else {
                let args: Vec<String> = type_arguments.iter().map(render_type).collect();
                format!("{base}<{}>", args.join(", "))
            }
        }
        IrType::Array(inner) => format!("{}[]", render_type(inner)),
        IrType::Function { parameters, return_type, .. } => {
            let params: Vec<String> = parameters.iter().map(|p| render_type(&p.ty)).collect();
            if matches!(return_type.as_ref(), IrType::Void) {
                if params.is_empty() {
                    "Action".to_string()
                } else {
                    format!("Action<{}>", params.join(", "))
                }
            } else {
                let mut all = params;
                all.push(render_type(return_type));
                format!("Func<{}>", all.join(", "))
            }
        }
        IrType::ObjectLiteral(_) => "object".to_string(),
        IrType::Union(_) | IrType::Intersection(_) => "object".to_string(),
        IrType::Literal(lit) => render_literal_type(lit),
        IrType::GenericParameter(name) => name.clone(),
        IrType::Any | IrType::Unknown => "object".to_string(),
        IrType::Void => "void".to_string(),
        IrType::Never => "object".to_string(),
        IrType::Nullable(inner) => {
            let rendered = render_type(inner);
            if is_value_type(inner) {
                format!("{rendered}?")
            } else {
                rendered
            }
        }
    }
}

fn render_literal_type(lit: &tsonic_ir::types::LiteralType) -> String {
    use tsonic_ir::types::LiteralType;
    match lit {
        LiteralType::String(_) => "string".to_string(),
        LiteralType::Number(_) => "double".to_string(),
        LiteralType::Bool(_) => "bool".to_string(),
    }
}

pub fn render_primitive(p: PrimitiveType) -> &'static str {
    match p {
        PrimitiveType::Double => "double",
        PrimitiveType::Int => "int",
        PrimitiveType::UInt => "uint",
        PrimitiveType::Long => "long",
        PrimitiveType::Byte => "byte",
        PrimitiveType::Short => "short",
        PrimitiveType::Float => "float",
        PrimitiveType::String => "string",
        PrimitiveType::Bool => "bool",
    }
}

/// Whether the rendered type is a CLR value type, for deciding whether a
/// nullable wrapper needs `?` (`Nullable<T>`) or is already reference-typed.
fn is_value_type(ty: &IrType) -> bool {
    match ty {
        IrType::Primitive(_) => true,
        IrType::GenericParameter(_) => false,
        IrType::Literal(lit) => !matches!(lit, tsonic_ir::types::LiteralType::String(_)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsonic_ir::types::PrimitiveType;

    #[test]
    fn renders_generic_reference() {
        let ty = IrType::Reference { name: "List".to_string(), type_arguments: vec![IrType::Primitive(PrimitiveType::Int)], clr_qualified: None };
        assert_eq!(render_type(&ty), "List<int>");
    }

    #[test]
    fn renders_nullable_value_type_with_question_mark() {
        let ty = IrType::Nullable(Box::new(IrType::Primitive(PrimitiveType::Int)));
        assert_eq!(render_type(&ty), "int?");
    }

    #[test]
    fn renders_nullable_reference_type_without_question_mark() {
        let ty = IrType::Nullable(Box::new(IrType::Reference { name: "Widget".to_string(), type_arguments: vec![], clr_qualified: None }));
        assert_eq!(render_type(&ty), "Widget");
    }

    #[test]
    fn renders_void_returning_function_as_action() {
        let ty = IrType::Function {
            parameters: vec![tsonic_ir::types::FunctionParamType { name: "x".to_string(), ty: IrType::Primitive(PrimitiveType::Int), modifier: tsonic_ir::types::ParamModifier::None, optional: false }],
            return_type: Box::new(IrType::Void),
            is_async: false,
        };
        assert_eq!(render_type(&ty), "Action<int>");
    }
}

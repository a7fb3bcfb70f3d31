//! `IrType` — the closed type-level sum (spec §3 IR, §4.6 "Types").

use tsonic_common::ordered::OrderedMap;

#[derive(Clone, Debug, PartialEq)]
pub enum IrType {
    Primitive(PrimitiveType),
    /// A named reference type, possibly generic (`List<T>`, a local class,
    /// or a CLR-bound type).
    Reference {
        name: String,
        type_arguments: Vec<IrType>,
        clr_qualified: Option<String>,
    },
    Array(Box<IrType>),
    Function {
        parameters: Vec<FunctionParamType>,
        return_type: Box<IrType>,
        is_async: bool,
    },
    /// An anonymous object-literal type; hoisted into a synthesised record
    /// class at the use site unless it is itself a structural constraint
    /// (spec §4.6 "Objects and interfaces").
    ObjectLiteral(Vec<ObjectTypeMember>),
    Union(Vec<IrType>),
    Intersection(Vec<IrType>),
    Literal(LiteralType),
    /// A reference to a declaration's own type parameter.
    GenericParameter(String),
    Any,
    Unknown,
    Void,
    Never,
    /// `T | null` collapsed to a nullable `T` (spec §4.6 "Unions"). Kept as
    /// a distinct variant (rather than folding into `Union`) so the emitter
    /// can special-case `.Value`/null-conditional access without re-deriving
    /// nullability from a two-element union every time.
    Nullable(Box<IrType>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveType {
    Double,
    Int,
    UInt,
    Long,
    Byte,
    Short,
    Float,
    String,
    Bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionParamType {
    pub name: String,
    pub ty: IrType,
    pub modifier: ParamModifier,
    pub optional: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ParamModifier {
    #[default]
    None,
    In,
    Out,
    Ref,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectTypeMember {
    pub name: String,
    pub ty: IrType,
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LiteralType {
    String(String),
    Number(f64),
    Bool(bool),
}

/// A type-parameter constraint (spec §4.6 "Generics").
#[derive(Clone, Debug, PartialEq)]
pub enum Constraint {
    /// `where T : SomeType` — a nominal constraint.
    Nominal(IrType),
    /// An object-literal constraint that triggers structural-adapter
    /// synthesis (C10, spec §4.8).
    Structural(Vec<ObjectTypeMember>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeParameter {
    pub name: String,
    pub constraint: Option<Constraint>,
}

impl IrType {
    pub const fn is_reference_like(&self) -> bool {
        matches!(self, IrType::Reference { .. } | IrType::Array(_) | IrType::ObjectLiteral(_))
    }

    /// Canonical string key used for specialisation-name derivation (spec
    /// §4.8) and specialisation-request deduplication (spec §3).
    pub fn canonical_key(&self) -> String {
        match self {
            IrType::Primitive(p) => format!("{p:?}"),
            IrType::Reference {
                name,
                type_arguments,
                ..
            } => {
                if type_arguments.is_empty() {
                    name.clone()
                } else {
                    let args: Vec<String> = type_arguments.iter().map(Self::canonical_key).collect();
                    format!("{name}<{}>", args.join(","))
                }
            }
            IrType::Array(inner) => format!("{}[]", inner.canonical_key()),
            IrType::Function {
                parameters,
                return_type,
                is_async,
            } => {
                let params: Vec<String> = parameters.iter().map(|p| p.ty.canonical_key()).collect();
                format!(
                    "{}fn({})->{}",
                    if *is_async { "async " } else { "" },
                    params.join(","),
                    return_type.canonical_key()
                )
            }
            IrType::ObjectLiteral(members) => {
                let parts: Vec<String> = members
                    .iter()
                    .map(|m| format!("{}:{}", m.name, m.ty.canonical_key()))
                    .collect();
                format!("{{{}}}", parts.join(";"))
            }
            IrType::Union(members) => {
                let parts: Vec<String> = members.iter().map(Self::canonical_key).collect();
                parts.join("|")
            }
            IrType::Intersection(members) => {
                let parts: Vec<String> = members.iter().map(Self::canonical_key).collect();
                parts.join("&")
            }
            IrType::Literal(lit) => format!("{lit:?}"),
            IrType::GenericParameter(name) => name.clone(),
            IrType::Any => "any".to_string(),
            IrType::Unknown => "unknown".to_string(),
            IrType::Void => "void".to_string(),
            IrType::Never => "never".to_string(),
            IrType::Nullable(inner) => format!("{}?", inner.canonical_key()),
        }
    }

    /// The specialisation-name suffix for this type argument (spec §4.8:
    /// "dots in qualified names replaced, `[]` expanded to `Array`").
    pub fn specialisation_suffix(&self) -> String {
        self.canonical_key()
            .replace('.', "_")
            .replace("[]", "Array")
            .replace(['<', '>', ',', '{', '}', ':', ';', '|', '&', '?'], "_")
    }
}

/// A record class synthesised for an anonymous object-literal type used as
/// a parameter/return type (spec §4.6 "Objects and interfaces").
#[derive(Clone, Debug, PartialEq)]
pub struct SynthesisedRecord {
    pub mangled_name: String,
    pub members: Vec<ObjectTypeMember>,
}

pub type TypeParameters = OrderedMap<String, TypeParameter>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_key_for_generic_reference() {
        let ty = IrType::Reference {
            name: "List".to_string(),
            type_arguments: vec![IrType::Primitive(PrimitiveType::Double)],
            clr_qualified: None,
        };
        assert_eq!(ty.canonical_key(), "List<Double>");
    }

    #[test]
    fn specialisation_suffix_replaces_dots_and_arrays() {
        let ty = IrType::Array(Box::new(IrType::Reference {
            name: "System.String".to_string(),
            type_arguments: vec![],
            clr_qualified: Some("System.String".to_string()),
        }));
        assert_eq!(ty.specialisation_suffix(), "System_StringArray");
    }
}

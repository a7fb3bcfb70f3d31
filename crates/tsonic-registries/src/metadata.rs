//! Metadata registry (C2): CLR type descriptions consulted by the emitter
//! (override/new modifiers) and the IR builder (overload resolution,
//! refusing overrides of non-virtual members).

use serde::Deserialize;
use tsonic_common::ordered::OrderedMap;

use crate::error::RegistryError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Interface,
    Struct,
    Enum,
    Delegate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Method,
    Property,
    Constructor,
    Field,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamModifier {
    In,
    Out,
    Ref,
    None,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberMetadata {
    pub kind: MemberKind,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub param_modifiers: Vec<ParamModifier>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMetadata {
    pub kind: TypeKind,
    #[serde(default)]
    pub is_sealed: bool,
    /// Keyed by normalised signature `Name(Type1,Type2,...)`.
    #[serde(default)]
    pub members: OrderedMap<String, MemberMetadata>,
}

#[derive(Debug, Default)]
pub struct MetadataRegistry {
    types: OrderedMap<String, TypeMetadata>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_metadata(&self, qualified: &str) -> Option<&TypeMetadata> {
        self.types.get(qualified)
    }

    pub fn member_metadata(&self, qualified_type: &str, signature: &str) -> Option<&MemberMetadata> {
        self.types.get(qualified_type)?.members.get(signature)
    }

    pub fn is_virtual(&self, qualified_type: &str, signature: &str) -> bool {
        self.member_metadata(qualified_type, signature)
            .is_some_and(|m| m.is_virtual)
    }

    pub fn is_sealed_type(&self, qualified: &str) -> bool {
        self.type_metadata(qualified).is_some_and(|t| t.is_sealed)
    }

    pub fn load(&mut self, doc: &MetadataManifest) -> Result<(), RegistryError> {
        for (qualified, metadata) in &doc.types {
            self.types.insert(qualified.clone(), metadata.clone());
        }
        Ok(())
    }

    /// Verify every binding-referenced member exists in loaded metadata
    /// (the registry cross-invariant in spec §3 BindingEntry).
    pub fn verify_binding_coverage(
        &self,
        alias_path: &str,
        clr_type: &str,
        clr_member: &str,
    ) -> Result<(), RegistryError> {
        let Some(ty) = self.type_metadata(clr_type) else {
            return Err(RegistryError::UnboundMetadataReference {
                alias_path: alias_path.to_string(),
                clr_type: clr_type.to_string(),
                clr_member: clr_member.to_string(),
            });
        };
        let found = ty
            .members
            .keys()
            .any(|sig| sig.split('(').next() == Some(clr_member));
        if found {
            Ok(())
        } else {
            Err(RegistryError::UnboundMetadataReference {
                alias_path: alias_path.to_string(),
                clr_type: clr_type.to_string(),
                clr_member: clr_member.to_string(),
            })
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MetadataManifest {
    pub types: OrderedMap<String, TypeMetadata>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MetadataManifest {
        serde_json::from_str(
            r#"{
              "types": {
                "System.Collections.Generic.Dictionary`2": {
                  "kind": "class",
                  "members": {
                    "TryGetValue(String,Int32)": {
                      "kind": "method",
                      "paramModifiers": ["none", "out"]
                    }
                  }
                }
              }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn lookup_roundtrip() {
        let mut reg = MetadataRegistry::new();
        reg.load(&sample()).unwrap();
        let m = reg
            .member_metadata(
                "System.Collections.Generic.Dictionary`2",
                "TryGetValue(String,Int32)",
            )
            .unwrap();
        assert_eq!(m.param_modifiers, vec![ParamModifier::None, ParamModifier::Out]);
    }

    #[test]
    fn verify_binding_coverage_rejects_unknown_member() {
        let mut reg = MetadataRegistry::new();
        reg.load(&sample()).unwrap();
        assert!(reg
            .verify_binding_coverage(
                "Dict.tryGet",
                "System.Collections.Generic.Dictionary`2",
                "TryGetValue"
            )
            .is_ok());
        assert!(reg
            .verify_binding_coverage(
                "Dict.nope",
                "System.Collections.Generic.Dictionary`2",
                "DoesNotExist"
            )
            .is_err());
    }
}

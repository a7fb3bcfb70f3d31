//! Binding registry (C2): TS alias path -> CLR qualified name.
//!
//! Bindings are keyed hierarchically (namespace -> type -> member), plus a
//! flat map for legacy bare-specifier bindings (`"fs"` -> a CLR container
//! type). Both a v2 hierarchical manifest and a v1 flat manifest are
//! accepted on load (spec §4.2).

use serde::Deserialize;
use tsonic_common::ordered::OrderedMap;

use crate::error::RegistryError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    Namespace,
    Type,
    Method,
    Property,
    Constructor,
    Field,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingEntry {
    pub clr_assembly: String,
    pub clr_qualified_type: String,
    pub clr_member: Option<String>,
    pub kind: BindingKind,
}

#[derive(Debug, Default)]
pub struct BindingRegistry {
    namespaces: OrderedMap<String, BindingEntry>,
    types: OrderedMap<String, BindingEntry>,
    /// `(type_alias, member_alias) -> entry`
    members: OrderedMap<(String, String), BindingEntry>,
    bare: OrderedMap<String, BindingEntry>,
    /// Tracks which manifest path first declared each alias, for duplicate
    /// detection across multiple loaded manifests.
    declared_at: OrderedMap<String, String>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup_namespace(&self, ts_path: &str) -> Option<&BindingEntry> {
        self.namespaces.get(ts_path)
    }

    pub fn lookup_type(&self, ts_path: &str) -> Option<&BindingEntry> {
        self.types.get(ts_path)
    }

    pub fn lookup_member(&self, type_alias: &str, member_alias: &str) -> Option<&BindingEntry> {
        self.members
            .get(&(type_alias.to_string(), member_alias.to_string()))
    }

    pub fn lookup_bare(&self, specifier: &str) -> Option<&BindingEntry> {
        self.bare.get(specifier)
    }

    /// Every `(type_alias, member_alias) -> entry` binding, for
    /// binding-coverage verification against loaded metadata (spec §3's
    /// `BindingEntry` invariant).
    pub fn member_bindings(&self) -> impl Iterator<Item = (&(String, String), &BindingEntry)> {
        self.members.iter()
    }

    fn record_alias(
        &mut self,
        alias_path: String,
        manifest_path: &str,
    ) -> Result<(), RegistryError> {
        if let Some(first) = self.declared_at.get(&alias_path) {
            if first != manifest_path {
                return Err(RegistryError::DuplicateBinding {
                    alias_path,
                    first_path: first.clone(),
                    second_path: manifest_path.to_string(),
                });
            }
        }
        self.declared_at
            .insert(alias_path, manifest_path.to_string());
        Ok(())
    }

    pub fn insert_namespace(
        &mut self,
        alias_path: String,
        entry: BindingEntry,
        manifest_path: &str,
    ) -> Result<(), RegistryError> {
        self.record_alias(alias_path.clone(), manifest_path)?;
        self.namespaces.insert(alias_path, entry);
        Ok(())
    }

    pub fn insert_type(
        &mut self,
        alias_path: String,
        entry: BindingEntry,
        manifest_path: &str,
    ) -> Result<(), RegistryError> {
        self.record_alias(alias_path.clone(), manifest_path)?;
        self.types.insert(alias_path, entry);
        Ok(())
    }

    pub fn insert_member(
        &mut self,
        type_alias: String,
        member_alias: String,
        entry: BindingEntry,
        manifest_path: &str,
    ) -> Result<(), RegistryError> {
        let key = format!("{type_alias}.{member_alias}");
        self.record_alias(key, manifest_path)?;
        self.members.insert((type_alias, member_alias), entry);
        Ok(())
    }

    pub fn insert_bare(
        &mut self,
        specifier: String,
        entry: BindingEntry,
        manifest_path: &str,
    ) -> Result<(), RegistryError> {
        self.record_alias(specifier.clone(), manifest_path)?;
        self.bare.insert(specifier, entry);
        Ok(())
    }

    /// Merge a v2 hierarchical manifest document.
    pub fn load_v2(
        &mut self,
        doc: &BindingManifestV2,
        manifest_path: &str,
    ) -> Result<(), RegistryError> {
        for ns in &doc.namespaces {
            self.insert_namespace(
                ns.alias.clone(),
                BindingEntry {
                    clr_assembly: ns.assembly.clone(),
                    clr_qualified_type: ns.clr_namespace.clone(),
                    clr_member: None,
                    kind: BindingKind::Namespace,
                },
                manifest_path,
            )?;
            for ty in &ns.types {
                let type_alias = format!("{}.{}", ns.alias, ty.alias);
                self.insert_type(
                    type_alias.clone(),
                    BindingEntry {
                        clr_assembly: ty.assembly.clone().unwrap_or_else(|| ns.assembly.clone()),
                        clr_qualified_type: ty.clr_type.clone(),
                        clr_member: None,
                        kind: BindingKind::Type,
                    },
                    manifest_path,
                )?;
                for member in &ty.members {
                    self.insert_member(
                        type_alias.clone(),
                        member.alias.clone(),
                        BindingEntry {
                            clr_assembly: ty
                                .assembly
                                .clone()
                                .unwrap_or_else(|| ns.assembly.clone()),
                            clr_qualified_type: ty.clr_type.clone(),
                            clr_member: Some(member.clr_name.clone()),
                            kind: member.kind,
                        },
                        manifest_path,
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Merge a v1 flat manifest document (legacy bare-specifier bindings).
    pub fn load_v1(
        &mut self,
        doc: &BindingManifestV1,
        manifest_path: &str,
    ) -> Result<(), RegistryError> {
        for (alias, binding) in &doc.bindings {
            self.insert_bare(
                alias.clone(),
                BindingEntry {
                    clr_assembly: binding.assembly.clone(),
                    clr_qualified_type: binding.r#type.clone(),
                    clr_member: None,
                    kind: BindingKind::Type,
                },
                manifest_path,
            )?;
        }
        Ok(())
    }
}

// ---- Manifest JSON schemas ----

#[derive(Debug, Deserialize)]
pub struct BindingManifestV2 {
    pub namespaces: Vec<NamespaceDecl>,
}

#[derive(Debug, Deserialize)]
pub struct NamespaceDecl {
    pub alias: String,
    pub assembly: String,
    #[serde(rename = "clrNamespace")]
    pub clr_namespace: String,
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

#[derive(Debug, Deserialize)]
pub struct TypeDecl {
    pub alias: String,
    #[serde(default)]
    pub assembly: Option<String>,
    #[serde(rename = "clrType")]
    pub clr_type: String,
    #[serde(default)]
    pub members: Vec<MemberDecl>,
}

#[derive(Debug, Deserialize)]
pub struct MemberDecl {
    pub alias: String,
    #[serde(rename = "clrName")]
    pub clr_name: String,
    pub kind: BindingKind,
}

#[derive(Debug, Deserialize)]
pub struct BindingManifestV1 {
    pub bindings: OrderedMap<String, LegacyBinding>,
}

#[derive(Debug, Deserialize)]
pub struct LegacyBinding {
    pub assembly: String,
    pub r#type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_v2() -> BindingManifestV2 {
        serde_json::from_str(
            r#"{
              "namespaces": [
                {
                  "alias": "System",
                  "assembly": "System.Runtime",
                  "clrNamespace": "System",
                  "types": [
                    {
                      "alias": "Console",
                      "clrType": "System.Console",
                      "members": [
                        { "alias": "log", "clrName": "WriteLine", "kind": "method" }
                      ]
                    }
                  ]
                }
              ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn v2_lookup_roundtrip() {
        let mut reg = BindingRegistry::new();
        reg.load_v2(&sample_v2(), "bindings.json").unwrap();
        assert!(reg.lookup_namespace("System").is_some());
        assert!(reg.lookup_type("System.Console").is_some());
        let member = reg.lookup_member("System.Console", "log").unwrap();
        assert_eq!(member.clr_member.as_deref(), Some("WriteLine"));
    }

    #[test]
    fn duplicate_alias_from_two_manifests_is_fatal() {
        let mut reg = BindingRegistry::new();
        reg.load_v2(&sample_v2(), "a/bindings.json").unwrap();
        let err = reg.load_v2(&sample_v2(), "b/bindings.json").unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateBinding { .. }));
    }

    #[test]
    fn v1_flat_schema_populates_bare_map() {
        let doc: BindingManifestV1 = serde_json::from_str(
            r#"{ "bindings": { "fs": { "assembly": "System.IO.FileSystem", "type": "System.IO.File" } } }"#,
        )
        .unwrap();
        let mut reg = BindingRegistry::new();
        reg.load_v1(&doc, "bindings.json").unwrap();
        let entry = reg.lookup_bare("fs").unwrap();
        assert_eq!(entry.clr_qualified_type, "System.IO.File");
    }
}

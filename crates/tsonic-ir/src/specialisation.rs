//! `SpecialisationRequest` (C10, spec §3).

use crate::types::IrType;

#[derive(Clone, Debug, PartialEq)]
pub struct SpecialisationRequest {
    pub generic_decl_id: String,
    pub type_arguments: Vec<IrType>,
}

impl SpecialisationRequest {
    /// Canonical string key for deduplication (spec §3).
    pub fn canonical_key(&self) -> String {
        let args: Vec<String> = self.type_arguments.iter().map(IrType::canonical_key).collect();
        format!("{}<{}>", self.generic_decl_id, args.join(","))
    }

    /// The deterministic specialised declaration name (spec §4.8
    /// "Monomorphisation").
    pub fn specialised_name(&self) -> String {
        let suffix: Vec<String> = self
            .type_arguments
            .iter()
            .map(IrType::specialisation_suffix)
            .collect();
        format!("{}_{}", self.generic_decl_id, suffix.join("_"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveType;

    #[test]
    fn specialised_name_is_deterministic() {
        let req = SpecialisationRequest {
            generic_decl_id: "id".to_string(),
            type_arguments: vec![IrType::Primitive(PrimitiveType::Double)],
        };
        assert_eq!(req.specialised_name(), "id_Double");
        assert_eq!(req.specialised_name(), req.clone().specialised_name());
    }

    #[test]
    fn distinct_type_arguments_produce_distinct_keys() {
        let a = SpecialisationRequest {
            generic_decl_id: "id".to_string(),
            type_arguments: vec![IrType::Primitive(PrimitiveType::Double)],
        };
        let b = SpecialisationRequest {
            generic_decl_id: "id".to_string(),
            type_arguments: vec![IrType::Primitive(PrimitiveType::String)],
        };
        assert_ne!(a.canonical_key(), b.canonical_key());
    }
}

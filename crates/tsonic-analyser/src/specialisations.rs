//! Specialisation-request collection and deduplication (spec §4.7:
//! "walk the IR, collect `SpecialisationRequest` values, deduplicate by
//! canonical key").

use tsonic_common::ordered::OrderedMap;
use tsonic_ir::specialisation::SpecialisationRequest;

/// Deduplicate by `canonical_key`, keeping the first occurrence in
/// build-order-walk order so the result stays deterministic.
pub fn collect_specialisation_requests(requests: Vec<SpecialisationRequest>) -> Vec<SpecialisationRequest> {
    let mut by_key: OrderedMap<String, SpecialisationRequest> = OrderedMap::new();
    for request in requests {
        by_key.entry(request.canonical_key()).or_insert(request);
    }
    by_key.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsonic_ir::types::{IrType, PrimitiveType};

    #[test]
    fn deduplicates_identical_requests() {
        let requests = vec![
            SpecialisationRequest { generic_decl_id: "Box".to_string(), type_arguments: vec![IrType::Primitive(PrimitiveType::Double)] },
            SpecialisationRequest { generic_decl_id: "Box".to_string(), type_arguments: vec![IrType::Primitive(PrimitiveType::Double)] },
            SpecialisationRequest { generic_decl_id: "Box".to_string(), type_arguments: vec![IrType::Primitive(PrimitiveType::String)] },
        ];
        let deduped = collect_specialisation_requests(requests);
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(collect_specialisation_requests(vec![]).is_empty());
    }
}

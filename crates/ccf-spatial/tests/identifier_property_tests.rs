use ccf_spatial::ids::{expand_anatomical_entity_id, expand_instance_id, snakecase, AnatomyRewrite};
use ccf_spatial::{OntologyConfig, SchemaVersion, SpatialOntology};
use proptest::prelude::*;
use serde_json::json;

fn local_id() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_-]{1,16}").unwrap()
}

/// Every upper/lower-case spelling of `prefix`.
fn any_case(prefix: &'static str) -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<bool>(), prefix.len()).prop_map(move |flags| {
        prefix
            .chars()
            .zip(flags)
            .map(|(c, upper)| if upper { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn instance_expansion_is_idempotent(id in local_id(), hashes in 0usize..3) {
        let raw = format!("{}{id}", "#".repeat(hashes));
        let once = expand_instance_id(&raw);
        prop_assert_eq!(expand_instance_id(&once), once.clone());
        prop_assert_eq!(once, format!("http://purl.org/ccf/latest/ccf.owl#{id}"));
    }

    #[test]
    fn obo_prefix_is_case_insensitive(prefix in any_case("obo:"), id in local_id()) {
        prop_assert_eq!(
            expand_anatomical_entity_id(&format!("{prefix}{id}"), AnatomyRewrite::Canonical),
            format!("http://purl.obolibrary.org/obo/{id}")
        );
    }

    #[test]
    fn uberon_prefix_is_case_insensitive(prefix in any_case("UBERON:"), id in "[0-9]{7}") {
        prop_assert_eq!(
            expand_anatomical_entity_id(&format!("{prefix}{id}"), AnatomyRewrite::Canonical),
            format!("http://purl.obolibrary.org/obo/UBERON_{id}")
        );
    }

    #[test]
    fn snakecase_never_keeps_separators_or_capitals(label in "[A-Za-z .-]{0,24}") {
        let snake = snakecase(&label);
        prop_assert!(!snake.chars().any(|c| c == ' ' || c == '-' || c == '.'));
        prop_assert!(!snake.chars().any(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn mutate_twice_adds_nothing(id in local_id(), rank in 0u32..100, version_index in 0usize..4) {
        let version = SchemaVersion::ALL[version_index];
        let record = json!({
            "@id": format!("#{id}"),
            "@type": "ExtractionSet",
            "label": format!("Set {id}"),
            "extraction_set_for": "#VHMKidney",
            "rui_rank": rank
        });
        let mut ontology = SpatialOntology::with_config(
            "http://purl.org/ccf/ccf-spatial.owl",
            OntologyConfig::for_version(version),
        ).unwrap();
        ontology.mutate(&record).unwrap();
        let first = ontology.to_turtle().unwrap();
        ontology.mutate(&record).unwrap();
        prop_assert_eq!(ontology.last_batch().triples_added, 0);
        prop_assert_eq!(ontology.to_turtle().unwrap(), first);
    }
}

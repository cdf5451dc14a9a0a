use proptest::prelude::*;
use urnwalk_core::{discover, lowercase_dataset_urns, transform_urns};
use urnwalk_record::{Record, Value};
use urnwalk_test_utils::{empty_lineage, item, schema_field_urn};
use urnwalk_urn::DatasetUrn;

fn dataset() -> impl Strategy<Value = String> {
    ("[a-z]{2,8}", "[A-Za-z][A-Za-z0-9_.]{0,10}", prop_oneof!["PROD", "DEV"])
        .prop_map(|(platform, name, env)| DatasetUrn::new(platform, name, env).unwrap().to_string())
}

prop_compose! {
    fn lineage()(
        upstreams in proptest::collection::vec(proptest::option::of(dataset()), 0..5),
        inputs in proptest::collection::vec(dataset(), 0..4),
        field_parent in proptest::option::of(dataset()),
        primary in proptest::option::of(dataset()),
    ) -> Record {
        let mut record = empty_lineage();
        let upstreams: Vec<Value> = upstreams
            .iter()
            .enumerate()
            .map(|(i, urn)| item(&format!("u{i}"), urn.as_deref()).into())
            .collect();
        record.set("upstreams", upstreams).unwrap();
        record.set("inputs", inputs).unwrap();
        record
            .set("fieldUrn", field_parent.map(|parent| schema_field_urn(&parent, "Col")))
            .unwrap();
        record
            .set("primary", primary.map(|urn| item("p", Some(&urn))))
            .unwrap();
        record
    }
}

proptest! {
    #[test]
    fn prop_discovered_paths_resolve(record in lineage()) {
        for occurrence in discover(&record) {
            prop_assert_eq!(
                record.resolve(&occurrence.path).unwrap().as_str(),
                Some(occurrence.urn.as_str())
            );
        }
    }

    #[test]
    fn prop_rewrite_keeps_paths_and_maps_values(record in lineage()) {
        let before = discover(&record);
        let mut rewritten = record.clone();
        let summary = transform_urns(&mut rewritten, &|urn: &str| format!("{urn}!")).unwrap();

        let after = discover(&rewritten);
        prop_assert_eq!(summary.rewritten, before.len());
        prop_assert_eq!(after.len(), before.len());
        for (old, new) in before.iter().zip(&after) {
            prop_assert_eq!(&old.path, &new.path);
            prop_assert_eq!(&new.urn, &format!("{}!", old.urn));
        }
    }

    #[test]
    fn prop_normalize_is_idempotent(record in lineage()) {
        let mut once = record;
        lowercase_dataset_urns(&mut once).unwrap();
        let mut twice = once.clone();
        let summary = lowercase_dataset_urns(&mut twice).unwrap();
        prop_assert_eq!(summary.rewritten, 0);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_identity_is_noop(record in lineage()) {
        let mut copy = record.clone();
        let summary = transform_urns(&mut copy, &|urn: &str| urn.to_string()).unwrap();
        prop_assert_eq!(summary.rewritten, 0);
        prop_assert_eq!(copy, record);
    }
}

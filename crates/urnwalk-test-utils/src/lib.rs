//! Testing utilities for urnwalk workspace
//!
//! Shared fixture schemas, records, and URNs.

#![allow(missing_docs)]

use urnwalk_record::{Record, SchemaRegistry, Value};
use urnwalk_urn::{Urn, SCHEMA_FIELD_ENTITY_TYPE};

pub const HIVE_DATASET: &str = "urn:li:dataset:(urn:li:dataPlatform:hive,My.Table,PROD)";
pub const HIVE_DATASET_LOWER: &str = "urn:li:dataset:(urn:li:dataPlatform:hive,my.table,PROD)";
pub const KAFKA_DATASET: &str = "urn:li:dataset:(urn:li:dataPlatform:kafka,Topic.Events,DEV)";
pub const S3_DATASET: &str = "urn:li:dataset:(urn:li:dataPlatform:s3,bucket/Key,PROD)";
pub const MYSQL_DATASET: &str = "urn:li:dataset:(urn:li:dataPlatform:mysql,Db.Users,PROD)";
pub const FLAGGED_DATASET: &str = "urn:li:dataset:(urn:li:dataPlatform:hive,Flagged.T,PROD)";
pub const OWNER: &str = "urn:li:corpuser:JDoe";

/// Avro schema for the `Lineage` fixture record
pub const LINEAGE_AVSC: &str = r#"{
    "type": "record",
    "name": "Lineage",
    "fields": [
        {"name": "description", "type": ["null", "string"], "default": null},
        {
            "name": "upstreams",
            "type": {
                "type": "array",
                "items": {
                    "type": "record",
                    "name": "Item",
                    "fields": [
                        {"name": "label", "type": "string"},
                        {"name": "dataset", "type": ["null", "string"], "default": null, "Urn": "DatasetUrn"}
                    ]
                }
            }
        },
        {"name": "owner", "type": ["null", "string"], "default": null, "Urn": "CorpuserUrn"},
        {
            "name": "inputs",
            "type": {"type": "array", "items": "string"},
            "Urn": "DatasetUrn",
            "urn_is_array": true
        },
        {"name": "fieldUrn", "type": ["null", "string"], "default": null, "Urn": "SchemaFieldUrn"},
        {"name": "primary", "type": ["null", "Item"], "default": null},
        {"name": "flaggedItems", "type": {"type": "array", "items": "Item"}, "Urn": "DatasetUrn"},
        {"name": "version", "type": "long", "Urn": "Urn"}
    ]
}"#;

/// Registry holding `Lineage` and `Item`
pub fn fixture_registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry.load_avro_json(LINEAGE_AVSC).unwrap();
    registry
}

/// `schemaField` URN embedding `dataset`
pub fn schema_field_urn(dataset: &str, field: &str) -> String {
    Urn::new(
        SCHEMA_FIELD_ENTITY_TYPE,
        vec![dataset.to_string(), field.to_string()],
    )
    .unwrap()
    .to_string()
}

pub fn item(label: &str, dataset: Option<&str>) -> Record {
    let registry = fixture_registry();
    Record::builder(registry.require("Item").unwrap())
        .field("label", label)
        .field("dataset", dataset)
        .build()
        .unwrap()
}

pub fn empty_lineage() -> Record {
    Record::new(fixture_registry().require("Lineage").unwrap())
}

/// Three upstreams; only the second carries a dataset URN
pub fn nested_scenario() -> Record {
    let upstreams = vec![
        item("first", None),
        item("second", Some(HIVE_DATASET)),
        item("third", None),
    ];
    let mut record = empty_lineage();
    record.set("upstreams", upstreams).unwrap();
    record
}

/// Lineage record touching every kind of field
///
/// Discovery order:
/// `upstreams[0].dataset`, `upstreams[1].dataset`, `owner`, `inputs[0]`,
/// `inputs[1]`, `fieldUrn`, `primary.dataset`, `flaggedItems[0].dataset`
pub fn full_lineage() -> Record {
    let mut record = empty_lineage();
    let fields: Vec<(&str, Value)> = vec![
        ("description", HIVE_DATASET.into()),
        (
            "upstreams",
            vec![
                item("a", Some(HIVE_DATASET)),
                item("b", Some(KAFKA_DATASET)),
                item("c", None),
            ]
            .into(),
        ),
        ("owner", OWNER.into()),
        ("inputs", vec![HIVE_DATASET, S3_DATASET].into()),
        ("fieldUrn", schema_field_urn(HIVE_DATASET, "User_Id").into()),
        ("primary", item("p", Some(MYSQL_DATASET)).into()),
        ("flaggedItems", vec![item("f", Some(FLAGGED_DATASET))].into()),
        ("version", Value::Int(3)),
    ];
    for (name, value) in fields {
        record.set(name, value).unwrap();
    }
    record
}

//! URN discovery
//!
//! Walks a record guided by its schema and reports every URN together with
//! the path that reaches it.

use urnwalk_record::{Record, RecordPath, Value};

/// URN found during traversal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UrnOccurrence {
    /// URN string as stored in the record
    pub urn: String,

    /// Path from the record root to the URN's slot
    pub path: RecordPath,
}

impl UrnOccurrence {
    /// Create occurrence
    #[inline]
    #[must_use]
    pub fn new(urn: impl Into<String>, path: RecordPath) -> Self {
        Self {
            urn: urn.into(),
            path,
        }
    }
}

/// List every URN in `record` with its path
///
/// A value is reported when its owning field is flagged as a URN field in the
/// schema. Results come in field declaration order, then list index order,
/// with nested records expanded depth-first before the next sibling field.
///
/// # Rules
/// - Empty field values (null, `""`, empty list) are skipped
/// - Every string element of a flagged list is reported, including `""`
/// - Nested records are always descended into, flagged or not
/// - List elements that are records are descended into; string elements are
///   reported only if the list field is flagged
/// - Non-string scalars and maps are never reported
#[must_use]
pub fn discover(record: &Record) -> Vec<UrnOccurrence> {
    let mut found = Vec::new();
    walk_record(record, &RecordPath::root(), &mut found);
    tracing::debug!(
        record_type = record.type_name(),
        count = found.len(),
        "discovered urns"
    );
    found
}

fn walk_record(record: &Record, prefix: &RecordPath, found: &mut Vec<UrnOccurrence>) {
    let schema = record.schema();
    for (name, value) in record.iter() {
        if value.is_empty() {
            continue;
        }

        let is_urn = schema.is_urn_field(name);
        let field_path = prefix.child(name);
        match value {
            Value::Record(nested) => walk_record(nested, &field_path, found),
            Value::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    match item {
                        Value::Record(nested) => walk_record(nested, &field_path.child(index), found),
                        Value::String(urn) if is_urn => {
                            found.push(UrnOccurrence::new(urn.as_str(), field_path.child(index)));
                        }
                        _ => {}
                    }
                }
            }
            Value::String(urn) if is_urn => {
                found.push(UrnOccurrence::new(urn.as_str(), field_path));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use urnwalk_record::{FieldMeta, FieldType, PathStep, RecordSchema};

    fn flat_schema() -> std::sync::Arc<RecordSchema> {
        RecordSchema::new("Flat")
            .with_field(FieldMeta::new("name", FieldType::String))
            .with_field(FieldMeta::new("urn", FieldType::String).with_urn("Urn"))
            .with_field(
                FieldMeta::new("urns", FieldType::Array(Box::new(FieldType::String)))
                    .with_urn("Urn"),
            )
            .with_field(FieldMeta::new("count", FieldType::Long).with_urn("Urn"))
            .into_shared()
    }

    #[test]
    fn discovers_scalar_and_list_fields_in_order() {
        let record = Record::builder(flat_schema())
            .field("name", "urn:li:tag:not-flagged")
            .field("urn", "urn:li:tag:a")
            .field("urns", vec!["urn:li:tag:b", "", "urn:li:tag:c"])
            .field("count", 7i64)
            .build()
            .unwrap();

        let found = discover(&record);
        assert_eq!(
            found,
            vec![
                UrnOccurrence::new("urn:li:tag:a", RecordPath::single("urn")),
                UrnOccurrence::new(
                    "urn:li:tag:b",
                    RecordPath::new(vec![PathStep::field("urns"), PathStep::index(0)])
                ),
                UrnOccurrence::new(
                    "",
                    RecordPath::new(vec![PathStep::field("urns"), PathStep::index(1)])
                ),
                UrnOccurrence::new(
                    "urn:li:tag:c",
                    RecordPath::new(vec![PathStep::field("urns"), PathStep::index(2)])
                ),
            ]
        );
    }

    #[test]
    fn empty_record_yields_nothing() {
        assert!(discover(&Record::new(flat_schema())).is_empty());
    }

    #[test]
    fn unflagged_schema_yields_nothing() {
        let schema = RecordSchema::new("Plain")
            .with_field(FieldMeta::new("a", FieldType::String))
            .with_field(FieldMeta::new("b", FieldType::Array(Box::new(FieldType::String))))
            .into_shared();
        let record = Record::builder(schema)
            .field("a", "urn:li:tag:x")
            .field("b", vec!["urn:li:tag:y"])
            .build()
            .unwrap();
        assert!(discover(&record).is_empty());
    }

    #[test]
    fn map_values_are_opaque() {
        let schema = RecordSchema::new("Properties")
            .with_field(FieldMeta::new(
                "customProperties",
                FieldType::Map(Box::new(FieldType::String)),
            ))
            .with_field(
                FieldMeta::new("tagMap", FieldType::Map(Box::new(FieldType::String)))
                    .with_urn("TagUrn"),
            )
            .with_field(FieldMeta::new("owner", FieldType::String).with_urn("CorpuserUrn"))
            .into_shared();
        let entries: IndexMap<String, &str> =
            [("k".to_string(), "urn:li:tag:x")].into_iter().collect();
        let record = Record::builder(schema)
            .field("customProperties", entries.clone())
            .field("tagMap", entries)
            .field("owner", "urn:li:corpuser:jdoe")
            .build()
            .unwrap();

        assert_eq!(
            discover(&record),
            vec![UrnOccurrence::new("urn:li:corpuser:jdoe", RecordPath::single("owner"))]
        );
    }
}

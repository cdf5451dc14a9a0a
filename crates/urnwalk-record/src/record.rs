//! Schema-described records
//!
//! Provides [`Record`], an ordered field map bound to a shared
//! [`RecordSchema`], and read-only path resolution.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::path::{PathError, PathStep, RecordPath};
use crate::schema::{RecordSchema, SchemaError};
use crate::value::Value;

/// Nested record whose shape is described by a schema
///
/// # Invariants
/// - Holds exactly the fields its schema declares, in declaration order
/// - Unset fields are [`Value::Null`]
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: Arc<RecordSchema>,
    fields: IndexMap<String, Value>,
}

impl Record {
    /// Create record with every declared field set to null
    #[must_use]
    pub fn new(schema: Arc<RecordSchema>) -> Self {
        let fields = schema
            .fields()
            .map(|field| (field.name().to_string(), Value::Null))
            .collect();
        Self { schema, fields }
    }

    /// Start building a record
    #[inline]
    #[must_use]
    pub fn builder(schema: Arc<RecordSchema>) -> RecordBuilder {
        RecordBuilder::new(schema)
    }

    /// Attached schema
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// Record type name
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.schema.name()
    }

    /// Field value
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Mutable field slot, for targeted overwrite
    #[inline]
    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.fields.get_mut(field)
    }

    /// Overwrite one field, returning the previous value
    ///
    /// # Errors
    /// Returns error if the schema does not declare the field
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<Value, RecordError> {
        match self.fields.get_mut(field) {
            Some(slot) => Ok(std::mem::replace(slot, value.into())),
            None => Err(RecordError::UnknownField {
                record_type: self.type_name().to_string(),
                field: field.to_string(),
            }),
        }
    }

    /// Fields in declaration order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Follow a path to the value it names
    ///
    /// # Errors
    /// Returns error if the path is empty or does not match the record's shape
    pub fn resolve(&self, path: &RecordPath) -> Result<&Value, PathError> {
        let (first, rest) = path.split_first().ok_or(PathError::EmptyPath)?;
        let mut current = match first {
            PathStep::Field(name) => self.get(name).ok_or_else(|| PathError::MissingField {
                path: path.clone(),
                field: name.clone(),
            })?,
            PathStep::Index(_) => {
                return Err(PathError::StepMismatch {
                    path: path.clone(),
                    position: 0,
                    found: "record",
                })
            }
        };

        for (offset, step) in rest.iter().enumerate() {
            let position = offset + 1;
            current = match (current, step) {
                (Value::Record(record), PathStep::Field(name)) => {
                    record.get(name).ok_or_else(|| PathError::MissingField {
                        path: path.clone(),
                        field: name.clone(),
                    })?
                }
                (Value::List(items), PathStep::Index(index)) => {
                    items.get(*index).ok_or_else(|| PathError::IndexOutOfBounds {
                        path: path.clone(),
                        index: *index,
                        len: items.len(),
                    })?
                }
                (container @ (Value::Record(_) | Value::List(_)), _) => {
                    return Err(PathError::StepMismatch {
                        path: path.clone(),
                        position,
                        found: container.kind(),
                    })
                }
                (scalar, _) => {
                    return Err(PathError::NotAContainer {
                        path: path.clone(),
                        position,
                        found: scalar.kind(),
                    })
                }
            };
        }

        Ok(current)
    }
}

/// Builder for constructing records
///
/// Collects the first error and reports it from [`build`](Self::build).
#[derive(Debug)]
pub struct RecordBuilder {
    record: Record,
    error: Option<RecordError>,
}

impl RecordBuilder {
    /// Create new builder
    #[inline]
    #[must_use]
    pub fn new(schema: Arc<RecordSchema>) -> Self {
        Self {
            record: Record::new(schema),
            error: None,
        }
    }

    /// Set a field
    #[must_use]
    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        if self.error.is_none() {
            if let Err(err) = self.record.set(name, value) {
                self.error = Some(err);
            }
        }
        self
    }

    /// Build record
    ///
    /// # Errors
    /// Returns the first error raised by [`field`](Self::field)
    pub fn build(self) -> Result<Record, RecordError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.record),
        }
    }
}

/// Errors raised while constructing or decoding records
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Field not declared by the schema
    #[error("record type '{record_type}' has no field '{field}'")]
    UnknownField { record_type: String, field: String },

    /// JSON value does not fit the declared field type
    #[error("field '{record_type}.{field}' expects {expected}, found {found}")]
    TypeMismatch {
        record_type: String,
        field: String,
        expected: String,
        found: &'static str,
    },

    /// String is not one of the enum's declared symbols
    #[error("field '{record_type}.{field}' has no enum symbol '{symbol}' in {enum_type}")]
    UnknownSymbol {
        record_type: String,
        field: String,
        enum_type: String,
        symbol: String,
    },

    /// Record JSON is not an object
    #[error("record '{0}' must be a json object")]
    ExpectedObject(String),

    /// Schema lookup failed
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldMeta, FieldType};

    fn owner_schema() -> Arc<RecordSchema> {
        RecordSchema::new("Owner")
            .with_field(FieldMeta::new("owner", FieldType::String).with_urn("Urn"))
            .with_field(FieldMeta::new("type", FieldType::String))
            .into_shared()
    }

    fn ownership_schema() -> Arc<RecordSchema> {
        RecordSchema::new("Ownership")
            .with_field(FieldMeta::new(
                "owners",
                FieldType::Array(Box::new(FieldType::Record("Owner".into()))),
            ))
            .into_shared()
    }

    fn ownership() -> Record {
        let owners: Vec<Value> = ["urn:li:corpuser:a", "urn:li:corpuser:b"]
            .into_iter()
            .map(|urn| {
                Record::builder(owner_schema())
                    .field("owner", urn)
                    .field("type", "DATAOWNER")
                    .build()
                    .unwrap()
                    .into()
            })
            .collect();
        Record::builder(ownership_schema())
            .field("owners", owners)
            .build()
            .unwrap()
    }

    #[test]
    fn new_record_has_null_fields_in_order() {
        let record = Record::new(owner_schema());
        let fields: Vec<_> = record.iter().collect();
        assert_eq!(fields, vec![("owner", &Value::Null), ("type", &Value::Null)]);
    }

    #[test]
    fn set_returns_previous_value() {
        let mut record = Record::new(owner_schema());
        let previous = record.set("owner", "urn:li:corpuser:x").unwrap();
        assert_eq!(previous, Value::Null);
        assert_eq!(record.get("owner").and_then(Value::as_str), Some("urn:li:corpuser:x"));
    }

    #[test]
    fn set_unknown_field_fails() {
        let mut record = Record::new(owner_schema());
        assert!(matches!(
            record.set("nope", "x"),
            Err(RecordError::UnknownField { .. })
        ));
    }

    #[test]
    fn builder_reports_first_error() {
        let result = Record::builder(owner_schema())
            .field("bad", "x")
            .field("owner", "urn:li:corpuser:x")
            .build();
        assert!(matches!(result, Err(RecordError::UnknownField { field, .. }) if field == "bad"));
    }

    #[test]
    fn resolve_nested_path() {
        let record = ownership();
        let path: RecordPath = "owners[1].owner".parse().unwrap();
        assert_eq!(
            record.resolve(&path).unwrap().as_str(),
            Some("urn:li:corpuser:b")
        );
    }

    #[test]
    fn resolve_errors() {
        let record = ownership();

        assert_eq!(record.resolve(&RecordPath::root()), Err(PathError::EmptyPath));

        let out_of_bounds: RecordPath = "owners[5].owner".parse().unwrap();
        assert!(matches!(
            record.resolve(&out_of_bounds),
            Err(PathError::IndexOutOfBounds { index: 5, len: 2, .. })
        ));

        let field_on_list: RecordPath = "owners.owner".parse().unwrap();
        assert!(matches!(
            record.resolve(&field_on_list),
            Err(PathError::StepMismatch { position: 1, found: "list", .. })
        ));

        let below_scalar: RecordPath = "owners[0].owner[0]".parse().unwrap();
        assert!(matches!(
            record.resolve(&below_scalar),
            Err(PathError::NotAContainer { position: 3, found: "string", .. })
        ));

        let missing: RecordPath = "owners[0].nope".parse().unwrap();
        assert!(matches!(
            record.resolve(&missing),
            Err(PathError::MissingField { .. })
        ));
    }
}

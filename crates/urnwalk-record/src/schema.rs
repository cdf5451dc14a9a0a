//! Record schemas and the schema registry
//!
//! A [`RecordSchema`] is the per-type field table consulted during traversal.
//! Schemas are built once, wrapped in [`Arc`], and shared read-only by every
//! record of that type through a [`SchemaRegistry`].

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use indexmap::IndexMap;

/// Declared type of a record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    String,
    Bytes,

    /// Named enum; values are held as strings
    Enum(String),

    /// Named record type, resolved through the registry
    Record(String),

    /// Homogeneous list
    Array(Box<FieldType>),

    /// String-keyed map of homogeneous values
    Map(Box<FieldType>),

    /// Union of `null` and one other branch
    Nullable(Box<FieldType>),
}

impl FieldType {
    /// Name used in error messages and union branch keys
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Enum(name) | Self::Record(name) => name,
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::Nullable(inner) => inner.label(),
        }
    }

    /// Type with any nullable wrapper removed
    #[must_use]
    pub fn non_null(&self) -> &Self {
        match self {
            Self::Nullable(inner) => inner.non_null(),
            other => other,
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array(items) => write!(f, "array<{items}>"),
            Self::Map(values) => write!(f, "map<{values}>"),
            Self::Nullable(inner) => write!(f, "{inner}?"),
            other => f.write_str(other.label()),
        }
    }
}

/// Metadata for one declared field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMeta {
    name: String,
    field_type: FieldType,

    /// URN class from the field's `Urn` annotation, e.g. `DatasetUrn`
    urn: Option<String>,

    /// Set when the annotation marks an array of URNs
    urn_is_array: bool,
}

impl FieldMeta {
    /// Create unannotated field metadata
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            urn: None,
            urn_is_array: false,
        }
    }

    /// Flag the field as holding URNs of the given class
    #[inline]
    #[must_use]
    pub fn with_urn(mut self, urn_class: impl Into<String>) -> Self {
        self.urn_is_array = matches!(self.field_type.non_null(), FieldType::Array(_));
        self.urn = Some(urn_class.into());
        self
    }

    /// Field name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type
    #[inline]
    #[must_use]
    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Whether the field carries a reference-identifier annotation
    #[inline]
    #[must_use]
    pub fn is_urn(&self) -> bool {
        self.urn.is_some()
    }

    /// Annotated URN class name
    #[inline]
    #[must_use]
    pub fn urn_class(&self) -> Option<&str> {
        self.urn.as_deref()
    }

    /// Whether the annotation marks an array of URNs
    #[inline]
    #[must_use]
    pub fn urn_is_array(&self) -> bool {
        self.urn_is_array
    }

    pub(crate) fn set_urn_is_array(&mut self, urn_is_array: bool) {
        self.urn_is_array = urn_is_array;
    }
}

/// Field table for one record type
///
/// Field order is declaration order and drives traversal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    name: String,
    fields: IndexMap<String, FieldMeta>,
}

impl RecordSchema {
    /// Create schema with no fields
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Add a field (replaces an earlier field of the same name in place)
    #[inline]
    #[must_use]
    pub fn with_field(mut self, field: FieldMeta) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    /// Record type name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up field metadata
    #[inline]
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldMeta> {
        self.fields.get(name)
    }

    /// Whether the named field is flagged as a URN field
    #[inline]
    #[must_use]
    pub fn is_urn_field(&self, name: &str) -> bool {
        self.field(name).is_some_and(FieldMeta::is_urn)
    }

    /// Fields in declaration order
    #[inline]
    pub fn fields(&self) -> impl Iterator<Item = &FieldMeta> {
        self.fields.values()
    }

    /// Number of declared fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no fields are declared
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Wrap for sharing across records
    #[inline]
    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

/// Table of known record and enum types
///
/// Built once (by hand or with [`load_avro_json`](Self::load_avro_json)) and
/// then only read. Cloning is cheap: schemas are shared.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    records: IndexMap<String, Arc<RecordSchema>>,
    enums: IndexMap<String, Vec<String>>,
}

impl SchemaRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record schema
    ///
    /// # Errors
    /// Returns error if a type of the same name is already registered
    pub fn register(&mut self, schema: RecordSchema) -> Result<Arc<RecordSchema>, SchemaError> {
        if self.contains(schema.name()) {
            return Err(SchemaError::Duplicate(schema.name().to_string()));
        }
        let shared = Arc::new(schema);
        self.records
            .insert(shared.name().to_string(), Arc::clone(&shared));
        Ok(shared)
    }

    /// Register an enum type
    ///
    /// # Errors
    /// Returns error if a type of the same name is already registered
    pub fn register_enum(
        &mut self,
        name: impl Into<String>,
        symbols: Vec<String>,
    ) -> Result<(), SchemaError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(SchemaError::Duplicate(name));
        }
        self.enums.insert(name, symbols);
        Ok(())
    }

    /// Look up a record schema
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<RecordSchema>> {
        self.records.get(name).cloned()
    }

    /// Look up a record schema, failing if unknown
    ///
    /// # Errors
    /// Returns error if no record of that name is registered
    pub fn require(&self, name: &str) -> Result<Arc<RecordSchema>, SchemaError> {
        self.get(name)
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))
    }

    /// Symbols of a registered enum
    #[inline]
    #[must_use]
    pub fn enum_symbols(&self, name: &str) -> Option<&[String]> {
        self.enums.get(name).map(Vec::as_slice)
    }

    /// Whether a record is registered under the name
    #[inline]
    #[must_use]
    pub fn is_record(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Whether an enum is registered under the name
    #[inline]
    #[must_use]
    pub fn is_enum(&self, name: &str) -> bool {
        self.enums.contains_key(name)
    }

    /// Whether any type is registered under the name
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.is_record(name) || self.is_enum(name)
    }

    /// Registered record names, in registration order
    #[inline]
    #[must_use]
    pub fn record_names(&self) -> Vec<&str> {
        self.records.keys().map(String::as_str).collect()
    }

    /// Number of registered record types
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no record types are registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Errors raised while building schemas
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Schema text is not JSON
    #[error("invalid schema json: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Type name registered twice
    #[error("type '{0}' is already registered")]
    Duplicate(String),

    /// Reference to a type that is not registered
    #[error("unknown type '{0}'")]
    UnknownType(String),

    /// Required attribute missing or of the wrong kind
    #[error("schema for '{context}' is missing '{attribute}'")]
    MissingAttribute {
        context: String,
        attribute: &'static str,
    },

    /// Top-level schema is not a record
    #[error("top-level schema must be a record, found {0}")]
    NotARecord(String),

    /// Union other than `null` plus one branch
    #[error("unsupported union in '{0}'")]
    UnsupportedUnion(String),

    /// Type kind the record model cannot hold
    #[error("unsupported type '{kind}' in '{context}'")]
    UnsupportedType { kind: String, context: String },
}

//! JSON codec for records
//!
//! Decoding is driven by each field's [`FieldType`]; nested records are
//! looked up in a [`SchemaRegistry`], and enum strings are checked against
//! the registered symbols. Nullable fields also accept the Avro
//! union wrapper form `{"<branch type>": value}`.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Number, Value as JsonValue};

use crate::record::{Record, RecordError};
use crate::schema::{FieldType, RecordSchema, SchemaError, SchemaRegistry};
use crate::value::Value;

impl Record {
    /// Decode a record from a JSON object
    ///
    /// Missing fields stay null. `null` is accepted for every field type.
    ///
    /// # Errors
    /// Returns error on unknown keys, type mismatches, or unregistered
    /// nested record types.
    pub fn from_json(
        schema: Arc<RecordSchema>,
        registry: &SchemaRegistry,
        json: &JsonValue,
    ) -> Result<Self, RecordError> {
        let obj = json
            .as_object()
            .ok_or_else(|| RecordError::ExpectedObject(schema.name().to_string()))?;

        let mut record = Self::new(Arc::clone(&schema));
        for (key, raw) in obj {
            let meta = schema.field(key).ok_or_else(|| RecordError::UnknownField {
                record_type: schema.name().to_string(),
                field: key.clone(),
            })?;
            let decoder = Decoder {
                registry,
                record_type: schema.name(),
                field: key,
            };
            let value = decoder.decode(meta.field_type(), raw)?;
            record.set(key, value)?;
        }
        Ok(record)
    }

    /// Encode as a JSON object in field declaration order
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        let obj: Map<String, JsonValue> = self
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_json()))
            .collect();
        JsonValue::Object(obj)
    }
}

impl Value {
    /// Encode as JSON; non-finite floats become `null`
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Int(n) => JsonValue::Number((*n).into()),
            Self::Float(n) => Number::from_f64(*n).map_or(JsonValue::Null, JsonValue::Number),
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Record(record) => record.to_json(),
            Self::List(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(entries) => JsonValue::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

struct Decoder<'a> {
    registry: &'a SchemaRegistry,
    record_type: &'a str,
    field: &'a str,
}

impl Decoder<'_> {
    fn decode(&self, field_type: &FieldType, raw: &JsonValue) -> Result<Value, RecordError> {
        if raw.is_null() {
            return Ok(Value::Null);
        }

        match (field_type, raw) {
            (FieldType::Nullable(inner), JsonValue::Object(obj)) if is_branch(inner, obj) => {
                let wrapped = obj.values().next().unwrap_or(&JsonValue::Null);
                self.decode(inner, wrapped)
            }
            (FieldType::Nullable(inner), _) => self.decode(inner, raw),
            (FieldType::Boolean, JsonValue::Bool(b)) => Ok(Value::Bool(*b)),
            (FieldType::Int | FieldType::Long, JsonValue::Number(n)) if n.is_i64() => {
                Ok(n.as_i64().map_or(Value::Null, Value::Int))
            }
            (FieldType::Float | FieldType::Double, JsonValue::Number(n)) => {
                Ok(n.as_f64().map_or(Value::Null, Value::Float))
            }
            (FieldType::String | FieldType::Bytes, JsonValue::String(s)) => {
                Ok(Value::String(s.clone()))
            }
            (FieldType::Enum(name), JsonValue::String(symbol)) => {
                let symbols = self
                    .registry
                    .enum_symbols(name)
                    .ok_or_else(|| SchemaError::UnknownType(name.clone()))?;
                if !symbols.contains(symbol) {
                    return Err(RecordError::UnknownSymbol {
                        record_type: self.record_type.to_string(),
                        field: self.field.to_string(),
                        enum_type: name.clone(),
                        symbol: symbol.clone(),
                    });
                }
                Ok(Value::String(symbol.clone()))
            }
            (FieldType::Record(name), JsonValue::Object(_)) => {
                let schema = self.registry.require(name)?;
                Ok(Value::Record(Record::from_json(schema, self.registry, raw)?))
            }
            (FieldType::Array(items), JsonValue::Array(elements)) => elements
                .iter()
                .map(|element| self.decode(items, element))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            (FieldType::Map(values), JsonValue::Object(entries)) => entries
                .iter()
                .map(|(key, entry)| self.decode(values, entry).map(|value| (key.clone(), value)))
                .collect::<Result<IndexMap<_, _>, _>>()
                .map(Value::Map),
            (expected, found) => Err(RecordError::TypeMismatch {
                record_type: self.record_type.to_string(),
                field: self.field.to_string(),
                expected: expected.to_string(),
                found: json_kind(found),
            }),
        }
    }
}

/// Whether `obj` is a single-key union wrapper naming `inner`
fn is_branch(inner: &FieldType, obj: &Map<String, JsonValue>) -> bool {
    obj.len() == 1 && obj.keys().next().is_some_and(|key| key == inner.label())
}

fn json_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

//! Avro schema loading
//!
//! Reads Avro record schemas (JSON form) into a [`SchemaRegistry`]. A field is
//! a URN field when it carries an `"Urn"` property, as in
//! `{"name": "dataset", "type": "string", "Urn": "DatasetUrn"}`.

use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};

use crate::schema::{FieldMeta, FieldType, RecordSchema, SchemaError, SchemaRegistry};

impl SchemaRegistry {
    /// Load an Avro record schema and every record or enum defined inline
    ///
    /// Named references resolve against types registered earlier, either by
    /// a previous call or earlier in the same document.
    ///
    /// # Errors
    /// Returns error if the text is not JSON, the top level is not a record,
    /// a type is unknown or duplicated, or a field uses an unsupported type.
    pub fn load_avro_json(&mut self, text: &str) -> Result<Arc<RecordSchema>, SchemaError> {
        let json: JsonValue = serde_json::from_str(text)?;
        self.load_avro(&json)
    }

    /// Load an already-parsed Avro record schema
    ///
    /// # Errors
    /// See [`load_avro_json`](Self::load_avro_json).
    pub fn load_avro(&mut self, json: &JsonValue) -> Result<Arc<RecordSchema>, SchemaError> {
        let obj = json
            .as_object()
            .filter(|obj| obj.get("type").and_then(JsonValue::as_str) == Some("record"))
            .ok_or_else(|| SchemaError::NotARecord(describe(json)))?;
        AvroLoader { registry: self }.record(obj, None)
    }
}

struct AvroLoader<'r> {
    registry: &'r mut SchemaRegistry,
}

impl AvroLoader<'_> {
    fn record(
        &mut self,
        obj: &Map<String, JsonValue>,
        enclosing: Option<&str>,
    ) -> Result<Arc<RecordSchema>, SchemaError> {
        let (full_name, namespace) = full_name(obj, enclosing, "record")?;
        let fields = obj
            .get("fields")
            .and_then(JsonValue::as_array)
            .ok_or_else(|| SchemaError::MissingAttribute {
                context: full_name.clone(),
                attribute: "fields",
            })?;

        let mut schema = RecordSchema::new(full_name.clone());
        for field in fields {
            let name = field
                .get("name")
                .and_then(JsonValue::as_str)
                .ok_or_else(|| SchemaError::MissingAttribute {
                    context: full_name.clone(),
                    attribute: "name",
                })?;
            let context = format!("{full_name}.{name}");
            let declared = field.get("type").ok_or_else(|| SchemaError::MissingAttribute {
                context: context.clone(),
                attribute: "type",
            })?;

            let field_type = self.field_type(declared, namespace.as_deref(), &context)?;
            let mut meta = FieldMeta::new(name, field_type);
            if let Some(urn) = field.get("Urn") {
                let class = urn
                    .as_str()
                    .map_or_else(|| urn.to_string(), str::to_string);
                meta = meta.with_urn(class);
            }
            if let Some(urn_is_array) = field.get("urn_is_array").and_then(JsonValue::as_bool) {
                meta.set_urn_is_array(urn_is_array);
            }
            schema = schema.with_field(meta);
        }

        self.registry.register(schema)
    }

    fn field_type(
        &mut self,
        declared: &JsonValue,
        namespace: Option<&str>,
        context: &str,
    ) -> Result<FieldType, SchemaError> {
        match declared {
            JsonValue::String(name) => self.named(name, namespace),
            JsonValue::Array(branches) => {
                let non_null: Vec<&JsonValue> = branches
                    .iter()
                    .filter(|branch| branch.as_str() != Some("null"))
                    .collect();
                let nullable = non_null.len() < branches.len();
                match (non_null.as_slice(), nullable) {
                    ([only], true) => Ok(FieldType::Nullable(Box::new(
                        self.field_type(only, namespace, context)?,
                    ))),
                    ([only], false) => self.field_type(only, namespace, context),
                    ([], true) => Ok(FieldType::Null),
                    _ => Err(SchemaError::UnsupportedUnion(context.to_string())),
                }
            }
            JsonValue::Object(obj) => {
                let kind = obj.get("type").and_then(JsonValue::as_str).ok_or_else(|| {
                    SchemaError::MissingAttribute {
                        context: context.to_string(),
                        attribute: "type",
                    }
                })?;
                match kind {
                    "record" => {
                        let schema = self.record(obj, namespace)?;
                        Ok(FieldType::Record(schema.name().to_string()))
                    }
                    "enum" => {
                        let (full, _) = full_name(obj, namespace, "enum")?;
                        let symbols = obj
                            .get("symbols")
                            .and_then(JsonValue::as_array)
                            .map(|symbols| {
                                symbols
                                    .iter()
                                    .filter_map(JsonValue::as_str)
                                    .map(str::to_string)
                                    .collect()
                            })
                            .unwrap_or_default();
                        self.registry.register_enum(full.clone(), symbols)?;
                        Ok(FieldType::Enum(full))
                    }
                    "array" => {
                        let items = obj.get("items").ok_or_else(|| SchemaError::MissingAttribute {
                            context: context.to_string(),
                            attribute: "items",
                        })?;
                        Ok(FieldType::Array(Box::new(
                            self.field_type(items, namespace, context)?,
                        )))
                    }
                    "fixed" => Ok(FieldType::Bytes),
                    "map" => {
                        let values = obj.get("values").ok_or_else(|| SchemaError::MissingAttribute {
                            context: context.to_string(),
                            attribute: "values",
                        })?;
                        Ok(FieldType::Map(Box::new(
                            self.field_type(values, namespace, context)?,
                        )))
                    }
                    // {"type": "long", "logicalType": "timestamp-millis"} and friends
                    primitive => self.named(primitive, namespace),
                }
            }
            other => Err(SchemaError::UnsupportedType {
                kind: describe(other),
                context: context.to_string(),
            }),
        }
    }

    fn named(&self, name: &str, namespace: Option<&str>) -> Result<FieldType, SchemaError> {
        let primitive = match name {
            "null" => Some(FieldType::Null),
            "boolean" => Some(FieldType::Boolean),
            "int" => Some(FieldType::Int),
            "long" => Some(FieldType::Long),
            "float" => Some(FieldType::Float),
            "double" => Some(FieldType::Double),
            "string" => Some(FieldType::String),
            "bytes" => Some(FieldType::Bytes),
            _ => None,
        };
        if let Some(primitive) = primitive {
            return Ok(primitive);
        }

        let qualified = qualify(name, namespace);
        for candidate in [qualified.as_str(), name] {
            if self.registry.is_record(candidate) {
                return Ok(FieldType::Record(candidate.to_string()));
            }
            if self.registry.is_enum(candidate) {
                return Ok(FieldType::Enum(candidate.to_string()));
            }
        }
        Err(SchemaError::UnknownType(qualified))
    }
}

/// Full name and effective namespace of a named type
fn full_name(
    obj: &Map<String, JsonValue>,
    enclosing: Option<&str>,
    kind: &str,
) -> Result<(String, Option<String>), SchemaError> {
    let name = obj
        .get("name")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| SchemaError::MissingAttribute {
            context: kind.to_string(),
            attribute: "name",
        })?;

    if let Some((namespace, _)) = name.rsplit_once('.') {
        return Ok((name.to_string(), Some(namespace.to_string())));
    }
    let namespace = obj
        .get("namespace")
        .and_then(JsonValue::as_str)
        .or(enclosing)
        .filter(|ns| !ns.is_empty())
        .map(str::to_string);
    Ok((qualify(name, namespace.as_deref()), namespace))
}

fn qualify(name: &str, namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) if !name.contains('.') => format!("{ns}.{name}"),
        _ => name.to_string(),
    }
}

fn describe(json: &JsonValue) -> String {
    match json {
        JsonValue::Null => "null".to_string(),
        JsonValue::Bool(_) => "boolean".to_string(),
        JsonValue::Number(_) => "number".to_string(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(_) => "union".to_string(),
        JsonValue::Object(obj) => obj
            .get("type")
            .and_then(JsonValue::as_str)
            .unwrap_or("object")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPSTREAM_LINEAGE: &str = r#"{
        "type": "record",
        "name": "UpstreamLineage",
        "namespace": "com.linkedin.dataset",
        "fields": [
            {
                "name": "upstreams",
                "type": {
                    "type": "array",
                    "items": {
                        "type": "record",
                        "name": "Upstream",
                        "fields": [
                            {"name": "dataset", "type": "string", "Urn": "DatasetUrn"},
                            {
                                "name": "type",
                                "type": {"type": "enum", "name": "DatasetLineageType", "symbols": ["COPY", "VIEW"]}
                            },
                            {"name": "createdAt", "type": {"type": "long", "logicalType": "timestamp-millis"}}
                        ]
                    }
                }
            },
            {
                "name": "fineGrainedLineages",
                "type": ["null", {"type": "array", "items": "string"}],
                "default": null,
                "Urn": "Urn",
                "urn_is_array": true
            },
            {"name": "primary", "type": ["null", "Upstream"], "default": null}
        ]
    }"#;

    #[test]
    fn loads_nested_records_and_enums() {
        let mut registry = SchemaRegistry::new();
        let root = registry.load_avro_json(UPSTREAM_LINEAGE).unwrap();

        assert_eq!(root.name(), "com.linkedin.dataset.UpstreamLineage");
        assert_eq!(
            registry.record_names(),
            vec![
                "com.linkedin.dataset.Upstream",
                "com.linkedin.dataset.UpstreamLineage"
            ]
        );
        assert!(registry.is_enum("com.linkedin.dataset.DatasetLineageType"));

        let upstream = registry.require("com.linkedin.dataset.Upstream").unwrap();
        assert!(upstream.is_urn_field("dataset"));
        assert!(!upstream.is_urn_field("type"));
        assert_eq!(upstream.field("createdAt").unwrap().field_type(), &FieldType::Long);
    }

    #[test]
    fn resolves_unions_and_named_references() {
        let mut registry = SchemaRegistry::new();
        let root = registry.load_avro_json(UPSTREAM_LINEAGE).unwrap();

        let fine = root.field("fineGrainedLineages").unwrap();
        assert!(fine.is_urn());
        assert!(fine.urn_is_array());
        assert_eq!(
            fine.field_type(),
            &FieldType::Nullable(Box::new(FieldType::Array(Box::new(FieldType::String))))
        );

        let primary = root.field("primary").unwrap();
        assert_eq!(
            primary.field_type().non_null(),
            &FieldType::Record("com.linkedin.dataset.Upstream".to_string())
        );
    }

    #[test]
    fn rejects_non_record_top_level() {
        let mut registry = SchemaRegistry::new();
        let err = registry.load_avro_json(r#"{"type": "array", "items": "string"}"#);
        assert!(matches!(err, Err(SchemaError::NotARecord(_))));
    }

    #[test]
    fn rejects_wide_unions() {
        let mut registry = SchemaRegistry::new();
        let union = r#"{"type": "record", "name": "A", "fields": [
            {"name": "x", "type": ["null", "string", "long"]}
        ]}"#;
        assert!(matches!(
            registry.load_avro_json(union),
            Err(SchemaError::UnsupportedUnion(_))
        ));
    }

    #[test]
    fn loads_map_fields() {
        let mut registry = SchemaRegistry::new();
        let text = r#"{"type": "record", "name": "DatasetProperties", "fields": [
            {"name": "customProperties", "type": {"type": "map", "values": "string"}, "default": {}},
            {"name": "tagUrns", "type": ["null", {"type": "map", "values": {"type": "array", "items": "string"}}]}
        ]}"#;
        let root = registry.load_avro_json(text).unwrap();

        assert_eq!(
            root.field("customProperties").unwrap().field_type(),
            &FieldType::Map(Box::new(FieldType::String))
        );
        assert_eq!(
            root.field("tagUrns").unwrap().field_type().to_string(),
            "map<array<string>>?"
        );

        let missing_values = r#"{"type": "record", "name": "B", "fields": [
            {"name": "x", "type": {"type": "map"}}
        ]}"#;
        assert!(matches!(
            registry.load_avro_json(missing_values),
            Err(SchemaError::MissingAttribute { attribute: "values", .. })
        ));
    }

    #[test]
    fn rejects_unknown_reference() {
        let mut registry = SchemaRegistry::new();
        let text = r#"{"type": "record", "name": "C", "fields": [{"name": "x", "type": "Missing"}]}"#;
        assert!(matches!(
            registry.load_avro_json(text),
            Err(SchemaError::UnknownType(name)) if name == "Missing"
        ));
    }
}

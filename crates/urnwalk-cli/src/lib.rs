//! urnwalk command line support
//!
//! Loading and reporting helpers behind the `urnwalk` binary. Kept out of
//! `main.rs` so they can be tested without spawning a process.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use urnwalk_core::{discover, transform_urns, NormalizerConfig, RewriteSummary, UrnNormalizer};
use urnwalk_record::{Record, RecordSchema, SchemaRegistry};

/// Schema file loaded into a registry, plus its root record type
#[derive(Debug, Clone)]
pub struct LoadedSchema {
    pub registry: SchemaRegistry,
    pub root: Arc<RecordSchema>,
}

impl LoadedSchema {
    /// Parse Avro schema text
    ///
    /// # Errors
    /// Returns error if the schema is not a supported Avro record schema
    pub fn from_avsc(text: &str) -> Result<Self> {
        let mut registry = SchemaRegistry::new();
        let root = registry
            .load_avro_json(text)
            .context("failed to load avro schema")?;
        Ok(Self { registry, root })
    }

    /// Read and parse an Avro schema file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read schema {}", path.display()))?;
        Self::from_avsc(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Record type to decode as: `type_name` when given, otherwise the root
    ///
    /// # Errors
    /// Returns error if `type_name` is not registered
    pub fn record_type(&self, type_name: Option<&str>) -> Result<Arc<RecordSchema>> {
        match type_name {
            Some(name) => Ok(self.registry.require(name)?),
            None => Ok(Arc::clone(&self.root)),
        }
    }

    /// Decode JSON text as a record of the selected type
    ///
    /// # Errors
    /// Returns error on invalid JSON or a record that does not fit the schema
    pub fn decode(&self, type_name: Option<&str>, json: &str) -> Result<Record> {
        let schema = self.record_type(type_name)?;
        let value: serde_json::Value = serde_json::from_str(json).context("invalid record json")?;
        let record = Record::from_json(schema, &self.registry, &value)?;
        Ok(record)
    }
}

/// Load normalizer settings from a YAML file, or defaults when no file is given
///
/// # Errors
/// Returns error if the file cannot be read or has unknown keys
pub fn load_config(path: Option<&Path>) -> Result<NormalizerConfig> {
    let Some(path) = path else {
        return Ok(NormalizerConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    NormalizerConfig::from_yaml(&text).with_context(|| format!("in {}", path.display()))
}

/// One `path<TAB>urn` line per discovered URN
#[must_use]
pub fn discover_report(record: &Record) -> String {
    let mut out = String::new();
    for occurrence in discover(record) {
        let _ = writeln!(out, "{}\t{}", occurrence.path, occurrence.urn);
    }
    out
}

/// Normalize `record` in place
///
/// # Errors
/// Returns error if a URN is malformed or a path cannot be replayed
pub fn normalize(record: &mut Record, config: NormalizerConfig) -> Result<RewriteSummary> {
    let summary = transform_urns(record, &UrnNormalizer::new(config))?;
    tracing::info!(
        record_type = record.type_name(),
        discovered = summary.discovered,
        rewritten = summary.rewritten,
        "normalized"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use urnwalk_test_utils::{HIVE_DATASET, HIVE_DATASET_LOWER, LINEAGE_AVSC};

    fn lineage_json() -> String {
        format!(
            r#"{{
                "upstreams": [{{"label": "a", "dataset": {{"string": "{HIVE_DATASET}"}}}}],
                "inputs": ["{HIVE_DATASET}"],
                "flaggedItems": [],
                "version": 1
            }}"#
        )
    }

    #[test]
    fn defaults_to_root_type() {
        let loaded = LoadedSchema::from_avsc(LINEAGE_AVSC).unwrap();
        assert_eq!(loaded.record_type(None).unwrap().name(), "Lineage");
        assert_eq!(loaded.record_type(Some("Item")).unwrap().name(), "Item");
        assert!(loaded.record_type(Some("Missing")).is_err());
    }

    #[test]
    fn reports_tab_separated_lines() {
        let loaded = LoadedSchema::from_avsc(LINEAGE_AVSC).unwrap();
        let record = loaded.decode(None, &lineage_json()).unwrap();
        assert_eq!(
            discover_report(&record),
            format!("upstreams[0].dataset\t{HIVE_DATASET}\ninputs[0]\t{HIVE_DATASET}\n")
        );
    }

    #[test]
    fn normalize_rewrites_in_place() {
        let loaded = LoadedSchema::from_avsc(LINEAGE_AVSC).unwrap();
        let mut record = loaded.decode(None, &lineage_json()).unwrap();
        let summary = normalize(&mut record, NormalizerConfig::default()).unwrap();
        assert_eq!(summary.rewritten, 2);
        assert_eq!(
            record.to_json()["inputs"],
            serde_json::json!([HIVE_DATASET_LOWER])
        );
    }

    #[test]
    fn missing_config_means_defaults() {
        assert_eq!(load_config(None).unwrap(), NormalizerConfig::default());
    }

    #[test]
    fn rejects_non_object_record() {
        let loaded = LoadedSchema::from_avsc(LINEAGE_AVSC).unwrap();
        assert!(loaded.decode(None, "[1, 2]").is_err());
        assert!(loaded.decode(None, "{").is_err());
    }
}

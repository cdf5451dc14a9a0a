//! Dataset URN normalization
//!
//! Provides [`UrnNormalizer`], the rewrite policy that lowercases the name
//! component of dataset URNs, including dataset URNs embedded as the parent
//! of schema field URNs.

use urnwalk_record::Record;
use urnwalk_urn::{DatasetUrn, Urn, UrnError, DATASET_ENTITY_TYPE, SCHEMA_FIELD_ENTITY_TYPE};

use crate::config::NormalizerConfig;
use crate::error::RewriteError;
use crate::rewrite::{transform_urns, RewriteSummary, UrnRewriter};

/// Canonicalizes dataset URNs
///
/// - `dataset`: name component lowercased
/// - `schemaField`: parent dataset (component 0) normalized, other
///   components kept
/// - anything else: unchanged
///
/// Idempotent: normalizing a normalized URN returns it unchanged.
#[derive(Debug, Clone, Default)]
pub struct UrnNormalizer {
    config: NormalizerConfig,
}

impl UrnNormalizer {
    /// Create normalizer with explicit configuration
    #[inline]
    #[must_use]
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize one URN
    ///
    /// # Errors
    /// Returns error if the URN, or an embedded dataset URN, is malformed
    pub fn normalize(&self, urn: &str) -> Result<String, UrnError> {
        match Urn::guess_entity_type(urn)? {
            DATASET_ENTITY_TYPE => self.normalize_dataset(urn),
            SCHEMA_FIELD_ENTITY_TYPE if self.config.normalize_schema_field_parents => {
                let mut field_urn: Urn = urn.parse()?;
                let parent = field_urn.part(0).unwrap_or_default();
                let normalized = self.normalize_dataset(parent)?;
                if normalized == parent {
                    return Ok(urn.to_string());
                }
                field_urn.replace_part(0, normalized)?;
                Ok(field_urn.to_string())
            }
            _ => Ok(urn.to_string()),
        }
    }

    fn normalize_dataset(&self, urn: &str) -> Result<String, UrnError> {
        if !self.config.lowercase_dataset_names {
            return Ok(urn.to_string());
        }
        let dataset: DatasetUrn = urn.parse()?;
        if self.config.skips_platform(dataset.platform_name()) {
            return Ok(urn.to_string());
        }
        Ok(dataset.with_lowercase_name().to_string())
    }
}

impl UrnRewriter for UrnNormalizer {
    #[inline]
    fn rewrite_urn(&self, urn: &str) -> Result<String, UrnError> {
        self.normalize(urn)
    }
}

/// Lowercase the name of one dataset URN
///
/// # Errors
/// Returns error if `urn` is not a well-formed dataset URN
pub fn lowercase_dataset_urn(urn: &str) -> Result<String, UrnError> {
    Ok(urn.parse::<DatasetUrn>()?.with_lowercase_name().to_string())
}

/// Normalize every dataset and schema field URN in `record` with defaults
///
/// # Errors
/// See [`transform_urns`].
pub fn lowercase_dataset_urns(record: &mut Record) -> Result<RewriteSummary, RewriteError> {
    transform_urns(record, &UrnNormalizer::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = "urn:li:dataset:(urn:li:dataPlatform:hive,My.Table,PROD)";
    const DATASET_LOWER: &str = "urn:li:dataset:(urn:li:dataPlatform:hive,my.table,PROD)";

    #[test]
    fn lowercases_dataset_name_only() {
        let normalizer = UrnNormalizer::default();
        assert_eq!(normalizer.normalize(DATASET).unwrap(), DATASET_LOWER);
        assert_eq!(lowercase_dataset_urn(DATASET).unwrap(), DATASET_LOWER);
    }

    #[test]
    fn normalizes_embedded_parent() {
        let normalizer = UrnNormalizer::default();
        let field = format!("urn:li:schemaField:({DATASET},User_Id)");
        assert_eq!(
            normalizer.normalize(&field).unwrap(),
            format!("urn:li:schemaField:({DATASET_LOWER},User_Id)")
        );
    }

    #[test]
    fn other_entity_types_unchanged() {
        let normalizer = UrnNormalizer::default();
        for urn in ["urn:li:corpuser:JDoe", "urn:li:tag:PII", "urn:li:dataPlatform:Hive"] {
            assert_eq!(normalizer.normalize(urn).unwrap(), urn);
        }
    }

    #[test]
    fn idempotent() {
        let normalizer = UrnNormalizer::default();
        let once = normalizer.normalize(DATASET).unwrap();
        assert_eq!(normalizer.normalize(&once).unwrap(), once);
    }

    #[test]
    fn config_switches() {
        let off = UrnNormalizer::new(NormalizerConfig::new().with_lowercase_dataset_names(false));
        assert_eq!(off.normalize(DATASET).unwrap(), DATASET);

        let skip_hive = UrnNormalizer::new(NormalizerConfig::new().with_skip_platform("hive"));
        assert_eq!(skip_hive.normalize(DATASET).unwrap(), DATASET);

        let no_parents = UrnNormalizer::new(NormalizerConfig::new().with_schema_field_parents(false));
        let field = format!("urn:li:schemaField:({DATASET},User_Id)");
        assert_eq!(no_parents.normalize(&field).unwrap(), field);
    }

    #[test]
    fn malformed_urns_fail() {
        let normalizer = UrnNormalizer::default();
        assert!(matches!(
            normalizer.normalize("not-a-urn"),
            Err(UrnError::Malformed { .. })
        ));
        assert!(matches!(
            normalizer.normalize("urn:li:dataset:(urn:li:dataPlatform:hive,t)"),
            Err(UrnError::InvalidPartCount { .. })
        ));
        assert!(matches!(
            normalizer.normalize("urn:li:schemaField:(urn:li:corpuser:x,f)"),
            Err(UrnError::WrongEntityType { .. })
        ));
    }
}

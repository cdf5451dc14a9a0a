//! Normalizer configuration

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings for [`UrnNormalizer`](crate::UrnNormalizer)
///
/// Every key is optional; missing keys take the defaults below.
///
/// ```yaml
/// lowercase_dataset_names: true
/// normalize_schema_field_parents: true
/// skip_platforms: [kafka]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizerConfig {
    /// Lowercase the name component of dataset URNs
    pub lowercase_dataset_names: bool,

    /// Apply the dataset rule to the parent dataset embedded in schema field URNs
    pub normalize_schema_field_parents: bool,

    /// Platform names whose dataset URNs are left as they are
    pub skip_platforms: Vec<String>,
}

impl NormalizerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With dataset name lowercasing on or off
    #[inline]
    #[must_use]
    pub fn with_lowercase_dataset_names(mut self, enabled: bool) -> Self {
        self.lowercase_dataset_names = enabled;
        self
    }

    /// With schema field parent normalization on or off
    #[inline]
    #[must_use]
    pub fn with_schema_field_parents(mut self, enabled: bool) -> Self {
        self.normalize_schema_field_parents = enabled;
        self
    }

    /// With one more skipped platform
    #[inline]
    #[must_use]
    pub fn with_skip_platform(mut self, platform: impl Into<String>) -> Self {
        self.skip_platforms.push(platform.into());
        self
    }

    /// Whether dataset URNs on `platform` are left alone
    #[must_use]
    pub fn skips_platform(&self, platform: &str) -> bool {
        self.skip_platforms
            .iter()
            .any(|skipped| skipped.eq_ignore_ascii_case(platform))
    }

    /// Parse from YAML
    ///
    /// # Errors
    /// Returns error if YAML is invalid or has unknown keys
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse from JSON
    ///
    /// # Errors
    /// Returns error if JSON is invalid or has unknown keys
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            lowercase_dataset_names: true,
            normalize_schema_field_parents: true,
            skip_platforms: Vec::new(),
        }
    }
}

//! Dataset URNs
//!
//! `urn:li:dataset:(<platform urn>,<name>,<env>)`

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::urn::{Urn, UrnError, URN_PREFIX};

/// Entity type of dataset URNs
pub const DATASET_ENTITY_TYPE: &str = "dataset";

/// Entity type of schema field URNs; component 0 is the parent dataset URN
pub const SCHEMA_FIELD_ENTITY_TYPE: &str = "schemaField";

/// Entity type of data platform URNs
pub const DATA_PLATFORM_ENTITY_TYPE: &str = "dataPlatform";

/// Typed view of a dataset URN
///
/// # Invariants
/// - No component is empty
/// - `platform` is a `urn:li:dataPlatform:<name>` URN when built with
///   [`DatasetUrn::new`]; parsed URNs keep the platform as written
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetUrn {
    platform: String,
    name: String,
    env: String,
}

impl DatasetUrn {
    /// Create dataset URN
    ///
    /// `platform` may be a bare platform name (`hive`) or a full platform URN.
    ///
    /// # Errors
    /// Returns error if any component is empty
    pub fn new(
        platform: impl Into<String>,
        name: impl Into<String>,
        env: impl Into<String>,
    ) -> Result<Self, UrnError> {
        let platform = platform_urn(platform.into());
        let name = name.into();
        let env = env.into();
        // Reuse generic validation for empty components
        Urn::new(
            DATASET_ENTITY_TYPE,
            vec![platform.clone(), name.clone(), env.clone()],
        )?;
        Ok(Self { platform, name, env })
    }

    /// Platform URN, e.g. `urn:li:dataPlatform:hive`
    #[inline]
    #[must_use]
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Bare platform name, e.g. `hive`
    #[inline]
    #[must_use]
    pub fn platform_name(&self) -> &str {
        self.platform
            .rsplit_once(':')
            .map_or(self.platform.as_str(), |(_, name)| name)
    }

    /// Dataset name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Environment (fabric), e.g. `PROD`
    #[inline]
    #[must_use]
    pub fn env(&self) -> &str {
        &self.env
    }

    /// Same dataset with the name lowercased
    #[inline]
    #[must_use]
    pub fn with_lowercase_name(mut self) -> Self {
        self.name = self.name.to_lowercase();
        self
    }

    /// Generic URN form
    #[must_use]
    pub fn to_urn(&self) -> Urn {
        Urn::from_validated(
            DATASET_ENTITY_TYPE,
            vec![self.platform.clone(), self.name.clone(), self.env.clone()],
        )
    }
}

impl TryFrom<Urn> for DatasetUrn {
    type Error = UrnError;

    fn try_from(urn: Urn) -> Result<Self, Self::Error> {
        if urn.entity_type() != DATASET_ENTITY_TYPE {
            return Err(UrnError::WrongEntityType {
                expected: DATASET_ENTITY_TYPE,
                actual: urn.entity_type().to_string(),
            });
        }
        match <[String; 3]>::try_from(urn.into_parts()) {
            // Components kept verbatim, no platform expansion
            Ok([platform, name, env]) => Ok(Self {
                platform,
                name,
                env,
            }),
            Err(parts) => Err(UrnError::InvalidPartCount {
                entity_type: DATASET_ENTITY_TYPE,
                expected: 3,
                actual: parts.len(),
            }),
        }
    }
}

impl FromStr for DatasetUrn {
    type Err = UrnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.parse::<Urn>()?)
    }
}

impl Display for DatasetUrn {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{URN_PREFIX}{DATASET_ENTITY_TYPE}:({},{},{})",
            self.platform, self.name, self.env
        )
    }
}

/// Expand a bare platform name to a platform URN
fn platform_urn(platform: String) -> String {
    if platform.is_empty() || platform.starts_with(URN_PREFIX) {
        platform
    } else {
        format!("{URN_PREFIX}{DATA_PLATFORM_ENTITY_TYPE}:{platform}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = "urn:li:dataset:(urn:li:dataPlatform:hive,My.Table,PROD)";

    #[test]
    fn dataset_from_str() {
        let dataset: DatasetUrn = DATASET.parse().unwrap();
        assert_eq!(dataset.platform(), "urn:li:dataPlatform:hive");
        assert_eq!(dataset.platform_name(), "hive");
        assert_eq!(dataset.name(), "My.Table");
        assert_eq!(dataset.env(), "PROD");
        assert_eq!(dataset.to_string(), DATASET);
    }

    #[test]
    fn dataset_new_expands_platform() {
        let dataset = DatasetUrn::new("snowflake", "Db.Schema.T", "DEV").unwrap();
        assert_eq!(
            dataset.to_string(),
            "urn:li:dataset:(urn:li:dataPlatform:snowflake,Db.Schema.T,DEV)"
        );
        assert_eq!(dataset.to_urn().to_string(), dataset.to_string());
    }

    #[test]
    fn dataset_lowercase_name_only() {
        let dataset: DatasetUrn = DATASET.parse().unwrap();
        assert_eq!(
            dataset.with_lowercase_name().to_string(),
            "urn:li:dataset:(urn:li:dataPlatform:hive,my.table,PROD)"
        );
    }

    #[test]
    fn dataset_parse_keeps_bare_platform() {
        let text = "urn:li:dataset:(hive,t,PROD)";
        let dataset: DatasetUrn = text.parse().unwrap();
        assert_eq!(dataset.platform_name(), "hive");
        assert_eq!(dataset.to_string(), text);
    }

    #[test]
    fn dataset_wrong_type() {
        let err = "urn:li:corpuser:jdoe".parse::<DatasetUrn>();
        assert_eq!(
            err,
            Err(UrnError::WrongEntityType {
                expected: "dataset",
                actual: "corpuser".to_string()
            })
        );
    }

    #[test]
    fn dataset_wrong_part_count() {
        let err = "urn:li:dataset:(urn:li:dataPlatform:hive,t)".parse::<DatasetUrn>();
        assert!(matches!(
            err,
            Err(UrnError::InvalidPartCount { expected: 3, actual: 2, .. })
        ));
    }
}

//! Error types for urnwalk core
//!
//! Provides error handling for:
//! - Rewriter failures on malformed URNs
//! - Paths that no longer match the record being mutated
//! - Configuration loading

use urnwalk_record::{PathError, RecordPath};
use urnwalk_urn::UrnError;

/// Errors raised by the rewrite driver
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    /// Rewriter rejected a URN; the record was not modified
    #[error("malformed identifier: {0}")]
    MalformedIdentifier(#[from] UrnError),

    /// Edit path does not resolve against the live record
    #[error("path mismatch: {0}")]
    PathMismatch(#[from] PathError),

    /// Value at an edit path is not the value the edit was planned against
    #[error("stale edit at '{path}': expected '{expected}', found {found}")]
    StaleEdit {
        path: RecordPath,
        expected: String,
        found: String,
    },
}

impl RewriteError {
    /// Check if error signals a record/path inconsistency rather than bad data
    #[inline]
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::PathMismatch(_) | Self::StaleEdit { .. })
    }
}

/// Errors loading normalizer configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// YAML is invalid or does not match the config shape
    #[error("invalid yaml config: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// JSON is invalid or does not match the config shape
    #[error("invalid json config: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_violations() {
        assert!(RewriteError::PathMismatch(PathError::EmptyPath).is_contract_violation());
        let malformed = RewriteError::from(UrnError::Malformed {
            urn: "x".into(),
            reason: "missing urn:li: prefix",
        });
        assert!(!malformed.is_contract_violation());
        assert_eq!(
            malformed.to_string(),
            "malformed identifier: malformed urn 'x': missing urn:li: prefix"
        );
    }
}

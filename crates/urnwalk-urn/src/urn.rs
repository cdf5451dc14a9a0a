//! Generic entity URNs
//!
//! Provides [`Urn`] for `urn:li:<entityType>:<entityId>` identifiers. The
//! entity id is either a single component or a parenthesised tuple whose
//! components may themselves be URNs:
//!
//! ```text
//! urn:li:corpuser:jdoe
//! urn:li:dataset:(urn:li:dataPlatform:hive,db.table,PROD)
//! urn:li:schemaField:(urn:li:dataset:(urn:li:dataPlatform:hive,db.table,PROD),user_id)
//! ```

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Prefix shared by every URN
pub const URN_PREFIX: &str = "urn:li:";

/// Parsed entity URN
///
/// # Invariants
/// - `entity_type` is non-empty and contains no `:`
/// - At least one component; no component is empty
/// - Components balance their parentheses; in a tuple no component has a
///   top-level `,`, and a lone component does not start with `(`
///
/// Together these make formatting and parsing exact inverses.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Urn {
    entity_type: String,
    parts: Vec<String>,
}

impl Urn {
    /// Create URN from entity type and components
    ///
    /// # Errors
    /// Returns error if the entity type is invalid or any component could not
    /// be parsed back as the same component
    pub fn new(entity_type: impl Into<String>, parts: Vec<String>) -> Result<Self, UrnError> {
        let entity_type = entity_type.into();
        if entity_type.is_empty() || entity_type.contains(':') {
            return Err(UrnError::Malformed {
                urn: format!("{URN_PREFIX}{entity_type}:"),
                reason: "invalid entity type",
            });
        }
        if let Some(reason) = invalid_parts(&parts) {
            return Err(UrnError::Malformed {
                urn: format!("{URN_PREFIX}{entity_type}:({})", parts.join(",")),
                reason,
            });
        }
        Ok(Self { entity_type, parts })
    }

    /// Create URN from components already known to be valid
    pub(crate) fn from_validated(entity_type: &str, parts: Vec<String>) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            parts,
        }
    }

    /// Entity type tag, e.g. `dataset`
    #[inline]
    #[must_use]
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Components of the entity id
    #[inline]
    #[must_use]
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Component at `index`
    #[inline]
    #[must_use]
    pub fn part(&self, index: usize) -> Option<&str> {
        self.parts.get(index).map(String::as_str)
    }

    /// Replace one component, returning the old value
    ///
    /// # Errors
    /// Returns error if `index` is out of range or `value` is not a valid
    /// component at that position
    pub fn replace_part(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<String, UrnError> {
        let value = value.into();
        if let Some(reason) = invalid_component(&value, self.parts.len() == 1) {
            return Err(UrnError::Malformed {
                urn: self.to_string(),
                reason,
            });
        }
        let len = self.parts.len();
        let slot = self
            .parts
            .get_mut(index)
            .ok_or(UrnError::PartOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, value))
    }

    /// Consume into components
    #[inline]
    #[must_use]
    pub fn into_parts(self) -> Vec<String> {
        self.parts
    }

    /// Read the entity type without parsing the entity id
    ///
    /// # Errors
    /// Returns error if the string has no `urn:li:<type>:` prefix
    pub fn guess_entity_type(urn: &str) -> Result<&str, UrnError> {
        let rest = urn.strip_prefix(URN_PREFIX).ok_or_else(|| UrnError::Malformed {
            urn: urn.to_string(),
            reason: "missing urn:li: prefix",
        })?;
        match rest.split_once(':') {
            Some((entity_type, _)) if !entity_type.is_empty() => Ok(entity_type),
            _ => Err(UrnError::Malformed {
                urn: urn.to_string(),
                reason: "missing entity type",
            }),
        }
    }
}

impl Display for Urn {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.parts.as_slice() {
            [single] => write!(f, "{URN_PREFIX}{}:{single}", self.entity_type),
            parts => write!(f, "{URN_PREFIX}{}:({})", self.entity_type, parts.join(",")),
        }
    }
}

impl FromStr for Urn {
    type Err = UrnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason| UrnError::Malformed {
            urn: s.to_string(),
            reason,
        };

        let entity_type = Self::guess_entity_type(s)?;
        let entity_id = &s[URN_PREFIX.len() + entity_type.len() + 1..];
        if entity_id.is_empty() {
            return Err(malformed("empty entity id"));
        }

        let parts = match entity_id.strip_prefix('(') {
            Some(open) => {
                let inner = open
                    .strip_suffix(')')
                    .ok_or_else(|| malformed("unbalanced parentheses"))?;
                split_components(inner).ok_or_else(|| malformed("unbalanced parentheses"))?
            }
            None => vec![entity_id.to_string()],
        };
        if let Some(reason) = invalid_parts(&parts) {
            return Err(malformed(reason));
        }

        Ok(Self {
            entity_type: entity_type.to_string(),
            parts,
        })
    }
}

fn invalid_parts(parts: &[String]) -> Option<&'static str> {
    if parts.is_empty() {
        return Some("empty component");
    }
    let lone = parts.len() == 1;
    parts.iter().find_map(|part| invalid_component(part, lone))
}

fn invalid_component(part: &str, lone: bool) -> Option<&'static str> {
    if part.is_empty() {
        return Some("empty component");
    }
    match split_components(part) {
        None => Some("unbalanced parentheses"),
        Some(pieces) if pieces.len() > 1 && !lone => Some("top-level comma in component"),
        Some(_) if lone && part.starts_with('(') => Some("lone component starts with '('"),
        Some(_) => None,
    }
}

/// Split on top-level commas; `None` if parentheses do not balance
fn split_components(inner: &str) -> Option<Vec<String>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                parts.push(inner[start..i].to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    parts.push(inner[start..].to_string());
    Some(parts)
}

/// Errors for URN operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrnError {
    /// String is not a structurally valid URN
    #[error("malformed urn '{urn}': {reason}")]
    Malformed { urn: String, reason: &'static str },

    /// Valid URN of an unexpected entity type
    #[error("expected a {expected} urn, found entity type '{actual}'")]
    WrongEntityType {
        expected: &'static str,
        actual: String,
    },

    /// Entity id has the wrong number of components
    #[error("{entity_type} urn needs {expected} components, found {actual}")]
    InvalidPartCount {
        entity_type: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Component index past the end
    #[error("component {index} out of range (urn has {len})")]
    PartOutOfRange { index: usize, len: usize },
}

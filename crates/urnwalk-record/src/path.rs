//! Record paths for addressing leaf values
//!
//! Provides [`RecordPath`] and [`PathStep`] for locating a single value inside
//! a nested [`Record`](crate::Record).

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One step of a [`RecordPath`]
///
/// Serialized untagged, so a path renders as `["owners", 1, "owner"]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathStep {
    /// Move into a record field by name
    Field(String),

    /// Move into a list element by position
    Index(usize),
}

impl PathStep {
    /// Field step
    #[inline]
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    /// Index step
    #[inline]
    #[must_use]
    pub fn index(index: usize) -> Self {
        Self::Index(index)
    }

    /// Field name, if this is a field step
    #[inline]
    #[must_use]
    pub fn as_field(&self) -> Option<&str> {
        match self {
            Self::Field(name) => Some(name),
            Self::Index(_) => None,
        }
    }

    /// List index, if this is an index step
    #[inline]
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Field(_) => None,
            Self::Index(index) => Some(*index),
        }
    }
}

impl Display for PathStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

impl From<&str> for PathStep {
    fn from(name: &str) -> Self {
        Self::Field(name.to_string())
    }
}

impl From<String> for PathStep {
    fn from(name: String) -> Self {
        Self::Field(name)
    }
}

impl From<usize> for PathStep {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Route from a record's root to one value
///
/// Immutable: [`child`](Self::child) and [`prefixed`](Self::prefixed) return
/// new paths. The root path is empty.
///
/// # Examples
/// - `[Field("owners"), Index(1), Field("owner")]` → `owners[1].owner`
/// - `[Field("upstreams"), Index(0), Field("dataset")]` → `upstreams[0].dataset`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordPath(Vec<PathStep>);

impl RecordPath {
    /// Create new path from steps
    #[inline]
    #[must_use]
    pub fn new(steps: Vec<PathStep>) -> Self {
        Self(steps)
    }

    /// Create path from a single step
    #[inline]
    #[must_use]
    pub fn single(step: impl Into<PathStep>) -> Self {
        Self(vec![step.into()])
    }

    /// Empty path (root)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Get path steps
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    /// Get number of steps
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get first step (if not root)
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&PathStep> {
        self.0.first()
    }

    /// Get last step (if not root)
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&PathStep> {
        self.0.last()
    }

    /// Split off the first step, leaving the remaining steps
    #[inline]
    #[must_use]
    pub fn split_first(&self) -> Option<(&PathStep, &[PathStep])> {
        self.0.split_first()
    }

    /// Append a step, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, step: impl Into<PathStep>) -> Self {
        let mut new = self.clone();
        new.0.push(step.into());
        new
    }

    /// Prepend a step, returning new path
    #[inline]
    #[must_use]
    pub fn prefixed(&self, step: impl Into<PathStep>) -> Self {
        let mut steps = Vec::with_capacity(self.0.len() + 1);
        steps.push(step.into());
        steps.extend(self.0.iter().cloned());
        Self(steps)
    }

    /// Iterator over steps from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &PathStep> {
        self.0.iter()
    }
}

impl Display for RecordPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (position, step) in self.0.iter().enumerate() {
            if position > 0 && matches!(step, PathStep::Field(_)) {
                f.write_str(".")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl FromStr for RecordPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }

        let mut steps = Vec::new();
        for (position, segment) in s.split('.').enumerate() {
            let (name, mut indices) = match segment.find('[') {
                Some(open) => segment.split_at(open),
                None => (segment, ""),
            };

            if name.is_empty() {
                // Only a leading segment may start with an index, e.g. `[0].name`
                if position != 0 || indices.is_empty() {
                    return Err(PathError::EmptySegment);
                }
            } else if name.contains(|c: char| !c.is_alphanumeric() && c != '_') {
                return Err(PathError::InvalidSegment(segment.to_string()));
            } else {
                steps.push(PathStep::Field(name.to_string()));
            }

            while !indices.is_empty() {
                let inner = indices
                    .strip_prefix('[')
                    .ok_or_else(|| PathError::InvalidSegment(segment.to_string()))?;
                let close = inner
                    .find(']')
                    .ok_or_else(|| PathError::InvalidSegment(segment.to_string()))?;
                let digits = &inner[..close];
                let index = digits
                    .parse::<usize>()
                    .map_err(|_| PathError::InvalidIndex(digits.to_string()))?;
                steps.push(PathStep::Index(index));
                indices = &inner[close + 1..];
            }
        }

        Ok(Self(steps))
    }
}

impl From<Vec<PathStep>> for RecordPath {
    fn from(steps: Vec<PathStep>) -> Self {
        Self(steps)
    }
}

impl From<&[PathStep]> for RecordPath {
    fn from(steps: &[PathStep]) -> Self {
        Self(steps.to_vec())
    }
}

impl<'a> IntoIterator for &'a RecordPath {
    type Item = &'a PathStep;
    type IntoIter = std::slice::Iter<'a, PathStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Errors related to record paths
///
/// Parse errors come from [`RecordPath::from_str`]. The remaining variants are
/// raised when a path does not resolve against a live record, which means the
/// path and the record disagree about the record's shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty segment in path string
    #[error("path contains empty segment")]
    EmptySegment,

    /// Invalid segment characters
    #[error("invalid segment: {0} (must be alphanumeric or underscore)")]
    InvalidSegment(String),

    /// Index is not a non-negative integer
    #[error("invalid index: {0}")]
    InvalidIndex(String),

    /// Root path where a leaf was required
    #[error("path is empty")]
    EmptyPath,

    /// Field step applied to a list, or index step applied to a record
    #[error("step {position} of '{path}' does not apply to a {found}")]
    StepMismatch {
        path: RecordPath,
        position: usize,
        found: &'static str,
    },

    /// Field step names a field the record does not have
    #[error("field '{field}' not found while resolving '{path}'")]
    MissingField { path: RecordPath, field: String },

    /// Index step past the end of a list
    #[error("index {index} out of bounds (len {len}) while resolving '{path}'")]
    IndexOutOfBounds {
        path: RecordPath,
        index: usize,
        len: usize,
    },

    /// Path continues below a scalar
    #[error("step {position} of '{path}' descends into a {found}")]
    NotAContainer {
        path: RecordPath,
        position: usize,
        found: &'static str,
    },
}

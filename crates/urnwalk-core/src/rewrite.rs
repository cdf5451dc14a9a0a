//! Path-addressed URN rewriting
//!
//! Provides [`transform_urns`], which discovers every URN in a record, asks a
//! [`UrnRewriter`] for replacements, and writes the changed values back by
//! re-walking each discovered path from the record root.

use urnwalk_record::{PathError, PathStep, Record, RecordPath, Value};
use urnwalk_urn::UrnError;

use crate::discover::{discover, UrnOccurrence};
use crate::error::RewriteError;

/// Rewrite policy applied to each discovered URN
///
/// Implemented for every `Fn(&str) -> String`, so plain closures work as
/// infallible policies.
pub trait UrnRewriter {
    /// Map a URN to its replacement
    ///
    /// Returning the input unchanged leaves the record untouched at that slot.
    ///
    /// # Errors
    /// Returns error if the URN cannot be interpreted
    fn rewrite_urn(&self, urn: &str) -> Result<String, UrnError>;
}

impl<F> UrnRewriter for F
where
    F: Fn(&str) -> String,
{
    #[inline]
    fn rewrite_urn(&self, urn: &str) -> Result<String, UrnError> {
        Ok(self(urn))
    }
}

/// Planned replacement of one URN slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrnEdit {
    /// Slot to overwrite
    pub path: RecordPath,

    /// Value discovered at the slot
    pub old: String,

    /// Replacement value
    pub new: String,
}

/// Counts from one rewrite pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    /// URN occurrences found
    pub discovered: usize,

    /// Slots overwritten
    pub rewritten: usize,
}

/// Rewrite every URN in `record` in place
///
/// All replacements are computed against the record as it was before the
/// call; a rewriter error aborts before anything is written. Slots whose
/// replacement equals the original are not touched.
///
/// # Errors
/// - [`RewriteError::MalformedIdentifier`] if the rewriter fails
/// - [`RewriteError::PathMismatch`] if a discovered path no longer resolves
pub fn transform_urns<R>(record: &mut Record, rewriter: &R) -> Result<RewriteSummary, RewriteError>
where
    R: UrnRewriter + ?Sized,
{
    let occurrences = discover(record);
    let discovered = occurrences.len();
    let edits = plan_edits(occurrences, rewriter)?;
    let rewritten = apply_edits(record, &edits)?;
    Ok(RewriteSummary {
        discovered,
        rewritten,
    })
}

/// Compute the edits [`transform_urns`] would apply, without mutating
///
/// # Errors
/// Returns error if the rewriter fails on any URN
pub fn plan_rewrite<R>(record: &Record, rewriter: &R) -> Result<Vec<UrnEdit>, RewriteError>
where
    R: UrnRewriter + ?Sized,
{
    plan_edits(discover(record), rewriter)
}

fn plan_edits<R>(
    occurrences: Vec<UrnOccurrence>,
    rewriter: &R,
) -> Result<Vec<UrnEdit>, RewriteError>
where
    R: UrnRewriter + ?Sized,
{
    let mut edits = Vec::new();
    for occurrence in occurrences {
        let new = rewriter.rewrite_urn(&occurrence.urn).map_err(|err| {
            tracing::warn!(path = %occurrence.path, urn = %occurrence.urn, "rewriter failed: {}", err);
            err
        })?;
        if new != occurrence.urn {
            edits.push(UrnEdit {
                path: occurrence.path,
                old: occurrence.urn,
                new,
            });
        }
    }
    Ok(edits)
}

/// Write planned edits into `record`
///
/// Each edit re-walks its path from the root and checks that the slot still
/// holds the planned-against value before overwriting it.
///
/// # Errors
/// - [`RewriteError::PathMismatch`] if a path does not resolve
/// - [`RewriteError::StaleEdit`] if a slot no longer holds `edit.old`
pub fn apply_edits(record: &mut Record, edits: &[UrnEdit]) -> Result<usize, RewriteError> {
    for edit in edits {
        let slot = locate_mut(record, &edit.path)?;
        if slot.as_str() != Some(edit.old.as_str()) {
            return Err(RewriteError::StaleEdit {
                path: edit.path.clone(),
                expected: edit.old.clone(),
                found: format!("{slot:?}"),
            });
        }
        tracing::debug!(path = %edit.path, old = %edit.old, new = %edit.new, "rewriting urn");
        *slot = Value::String(edit.new.clone());
    }
    Ok(edits.len())
}

/// Overwrite the value at `path`, returning the previous value
///
/// # Errors
/// Returns error if the path is empty or does not match the record's shape
pub fn modify_at_path(
    record: &mut Record,
    path: &RecordPath,
    new_value: Value,
) -> Result<Value, PathError> {
    let slot = locate_mut(record, path)?;
    Ok(std::mem::replace(slot, new_value))
}

/// Container reached while descending a path
enum Cursor<'a> {
    Record(&'a mut Record),
    List(&'a mut Vec<Value>),
}

impl Cursor<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Record(_) => "record",
            Self::List(_) => "list",
        }
    }
}

/// Walk `path` from the root to the terminal slot
fn locate_mut<'a>(record: &'a mut Record, path: &RecordPath) -> Result<&'a mut Value, PathError> {
    let (last, init) = path.steps().split_last().ok_or(PathError::EmptyPath)?;

    let mut cursor = Cursor::Record(record);
    for (position, step) in init.iter().enumerate() {
        tracing::trace!(%path, position, %step, "descending");
        cursor = match enter(cursor, step, path, position)? {
            Value::Record(nested) => Cursor::Record(nested),
            Value::List(items) => Cursor::List(items),
            scalar => {
                return Err(PathError::NotAContainer {
                    path: path.clone(),
                    position: position + 1,
                    found: scalar.kind(),
                })
            }
        };
    }

    enter(cursor, last, path, init.len())
}

/// Apply one step to a container
fn enter<'a>(
    cursor: Cursor<'a>,
    step: &PathStep,
    path: &RecordPath,
    position: usize,
) -> Result<&'a mut Value, PathError> {
    match (cursor, step) {
        (Cursor::Record(record), PathStep::Field(name)) => {
            record.get_mut(name).ok_or_else(|| PathError::MissingField {
                path: path.clone(),
                field: name.clone(),
            })
        }
        (Cursor::List(items), PathStep::Index(index)) => {
            let len = items.len();
            items.get_mut(*index).ok_or_else(|| PathError::IndexOutOfBounds {
                path: path.clone(),
                index: *index,
                len,
            })
        }
        (cursor, _) => Err(PathError::StepMismatch {
            path: path.clone(),
            position,
            found: cursor.kind(),
        }),
    }
}

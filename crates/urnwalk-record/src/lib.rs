//! urnwalk record model
//!
//! Schema-described nested records with path addressing.
//!
//! # Core Concepts
//!
//! - [`Record`]: Ordered field map bound to a shared [`RecordSchema`]
//! - [`Value`]: Tagged field value (scalar, nested record, or list)
//! - [`RecordSchema`] / [`FieldMeta`]: Per-type field table; `is_urn()` marks
//!   reference-identifier fields
//! - [`SchemaRegistry`]: Read-only table of record types, loadable from Avro
//! - [`RecordPath`]: Field/index steps from a record's root to one value
//!
//! # Example
//!
//! ```rust
//! use urnwalk_record::{FieldMeta, FieldType, Record, RecordPath, RecordSchema};
//!
//! let schema = RecordSchema::new("Upstream")
//!     .with_field(FieldMeta::new("dataset", FieldType::String).with_urn("DatasetUrn"))
//!     .into_shared();
//! let record = Record::builder(schema)
//!     .field("dataset", "urn:li:dataset:(urn:li:dataPlatform:hive,t,PROD)")
//!     .build()
//!     .unwrap();
//!
//! let path = RecordPath::single("dataset");
//! assert!(record.resolve(&path).unwrap().as_str().is_some());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod avro;
mod json;
mod path;
mod record;
mod schema;
mod value;

pub use path::{PathError, PathStep, RecordPath};
pub use record::{Record, RecordBuilder, RecordError};
pub use schema::{FieldMeta, FieldType, RecordSchema, SchemaError, SchemaRegistry};
pub use value::Value;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

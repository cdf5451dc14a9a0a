//! urnwalk core
//!
//! Schema-guided URN discovery and in-place rewrite for nested records.
//!
//! # Core Concepts
//!
//! - [`discover`]: Every URN in a record with the path that reaches it
//! - [`transform_urns`]: Discover, compute replacements, then overwrite each
//!   changed slot by re-walking its path from the root
//! - [`UrnRewriter`]: Pluggable rewrite policy (closures work too)
//! - [`UrnNormalizer`]: Policy lowercasing dataset names, including datasets
//!   embedded in schema field URNs
//!
//! # Example
//!
//! ```rust
//! use urnwalk_core::{discover, lowercase_dataset_urns};
//! use urnwalk_record::{FieldMeta, FieldType, Record, RecordSchema};
//!
//! let schema = RecordSchema::new("Upstream")
//!     .with_field(FieldMeta::new("dataset", FieldType::String).with_urn("DatasetUrn"))
//!     .into_shared();
//! let mut record = Record::builder(schema)
//!     .field("dataset", "urn:li:dataset:(urn:li:dataPlatform:hive,My.Table,PROD)")
//!     .build()
//!     .unwrap();
//!
//! let summary = lowercase_dataset_urns(&mut record).unwrap();
//! assert_eq!(summary.rewritten, 1);
//! assert_eq!(
//!     discover(&record)[0].urn,
//!     "urn:li:dataset:(urn:li:dataPlatform:hive,my.table,PROD)"
//! );
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod discover;
pub mod error;
pub mod normalize;
pub mod rewrite;

// Re-exports
pub use config::NormalizerConfig;
pub use discover::{discover, UrnOccurrence};
pub use error::{ConfigError, RewriteError};
pub use normalize::{lowercase_dataset_urn, lowercase_dataset_urns, UrnNormalizer};
pub use rewrite::{
    apply_edits, modify_at_path, plan_rewrite, transform_urns, RewriteSummary, UrnEdit,
    UrnRewriter,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

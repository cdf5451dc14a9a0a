//! urnwalk URNs
//!
//! Parse and format structured entity identifiers.
//!
//! # Overview
//!
//! - **Urn**: Generic `urn:li:<entityType>:<entityId>` with tuple components
//! - **DatasetUrn**: Typed `(platform, name, env)` view of dataset URNs
//!
//! # Example
//!
//! ```rust
//! use urnwalk_urn::{DatasetUrn, Urn};
//!
//! let urn: Urn = "urn:li:dataset:(urn:li:dataPlatform:hive,My.Table,PROD)".parse().unwrap();
//! assert_eq!(urn.entity_type(), "dataset");
//!
//! let dataset = DatasetUrn::try_from(urn).unwrap().with_lowercase_name();
//! assert_eq!(dataset.name(), "my.table");
//! ```

#![warn(missing_docs)]

pub mod dataset;
pub mod urn;

// Re-exports
pub use dataset::{
    DatasetUrn, DATASET_ENTITY_TYPE, DATA_PLATFORM_ENTITY_TYPE, SCHEMA_FIELD_ENTITY_TYPE,
};
pub use urn::{Urn, UrnError, URN_PREFIX};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # Docstore Client Development Kit (CDK)
//!
//! Client-side resource addressing and query partitioning for a
//! hierarchical document database.
//!
//! ## Features
//!
//! - **Resource Paths**: Relative, fully qualified, and field paths with
//!   canonical formatting, ordering, and containment checks
//! - **Query Partitioning**: Split a collection-group query into disjoint
//!   slices a fleet of workers can execute independently
//! - **Pluggable Transport**: Bring any datastore that can stream split
//!   cursors; a JSON-over-HTTP implementation is built in
//! - **Lazy Decoding**: Partition bounds stay raw until asked for, and the
//!   wire envelope decoder is swappable
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use docstore_cdk::transport::HttpDatastore;
//! use docstore_cdk::{Database, Result, Settings};
//! use futures::TryStreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let settings = Settings::new("my-project")
//!         .with_endpoint("https://docstore.example.com");
//!
//!     let datastore = Arc::new(HttpDatastore::new(
//!         settings.endpoint.clone().unwrap_or_default(),
//!     )?);
//!     let database = Database::from_settings(&settings, datastore)?;
//!
//!     // Split the "messages" collection group into up to 8 slices.
//!     let mut partitions = database.collection_group("messages")?.get_partitions(8).await?;
//!     while let Some(partition) = partitions.try_next().await? {
//!         // Hand partition.to_query() to a worker.
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Database Handle                         │
//! │  collection_group(id) → CollectionGroup                         │
//! │  get_partitions(n) → Stream<QueryPartition>                     │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴──────────┬──────────────────────┐
//! │    Paths     │        Partitioning      │      Transport       │
//! ├──────────────┼──────────────────────────┼──────────────────────┤
//! │ Resource     │ PartitionStream          │ Datastore trait      │
//! │ Qualified    │ QueryPartition           │ HttpDatastore        │
//! │ Field        │ Cursor pairing           │ Cursor paging        │
//! └──────────────┴──────────────────────────┴──────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the CDK
pub mod error;

/// Common types and type aliases
pub mod types;

/// Resource and field paths
pub mod path;

/// Wire value decoding
pub mod decode;

/// Query model and collection groups
pub mod query;

/// Query partitioning
pub mod partition;

/// Datastore transports
pub mod transport;

/// Client settings
pub mod config;

/// Database handle
pub mod database;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::Settings;
pub use database::Database;
pub use partition::{PartitionStream, QueryPartition};
pub use path::{FieldPath, QualifiedResourcePath, ResourcePath};
pub use query::CollectionGroup;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! Transport layer
//!
//! The [`Datastore`] trait is the seam between the partitioning flow and the
//! wire: anything that can open a partition call and stream back its split
//! cursors can sit behind it. [`HttpDatastore`] is the built-in JSON-over-
//! HTTP implementation.

mod http;
mod types;

pub use http::{HttpDatastore, HttpDatastoreConfig, HttpDatastoreConfigBuilder};
pub use types::{CursorStream, Datastore, PartitionQueryRequest, PartitionQueryResponse};

//! Query partitioning
//!
//! Splits a collection-group query into disjoint, contiguous slices so a
//! fleet of workers can execute them independently.
//!
//! The server is asked for ordered split points; [`PartitionStream`] pairs
//! them into [`QueryPartition`]s whose bounds carry the server's raw cursor
//! values. Each partition decodes its bounds lazily and can reconstruct the
//! bounded sub-query it describes.

mod stream;
mod types;

pub use stream::PartitionStream;
pub use types::QueryPartition;

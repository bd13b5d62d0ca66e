//! Collection groups
//!
//! A collection group spans every collection sharing one id, and is the
//! entry point of the partitioning protocol.

use std::fmt;
use std::sync::Arc;

use futures::stream;
use tracing::debug;

use super::types::{Query, StructuredQuery};
use crate::decode::ValueDecoder;
use crate::error::{Error, Result};
use crate::partition::PartitionStream;
use crate::path::QualifiedResourcePath;
use crate::transport::{CursorStream, Datastore, PartitionQueryRequest};
use crate::types::request_tag;

/// A query over every collection with one collection id, whatever its
/// ancestor document.
///
/// [`Self::get_partitions`] splits the group's result set into disjoint
/// slices that a fleet of workers can execute independently.
pub struct CollectionGroup {
    root: QualifiedResourcePath,
    collection_id: String,
    datastore: Arc<dyn Datastore>,
    decoder: Arc<dyn ValueDecoder>,
}

impl CollectionGroup {
    /// A collection group under the given database root.
    pub fn new(
        root: QualifiedResourcePath,
        collection_id: impl Into<String>,
        datastore: Arc<dyn Datastore>,
        decoder: Arc<dyn ValueDecoder>,
    ) -> Self {
        Self {
            root,
            collection_id: collection_id.into(),
            datastore,
            decoder,
        }
    }

    /// The shared collection id.
    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    /// The unbounded query over the whole group, ordered by document
    /// identity.
    pub fn to_query(&self) -> Query {
        Query::new(
            self.root.clone(),
            StructuredQuery::collection_group(&self.collection_id),
        )
    }

    /// Split the group's result set into at most `desired_partition_count`
    /// contiguous slices.
    ///
    /// Asks the datastore for `desired_partition_count - 1` split points and
    /// pairs the returned cursors into partitions, closing the final one at
    /// end of stream. The datastore may return fewer split points than asked
    /// for (a small group has fewer natural splits), so the stream yields
    /// between one and `desired_partition_count` partitions. Requesting a
    /// single partition skips the datastore call entirely and yields one
    /// unbounded partition.
    ///
    /// # Errors
    ///
    /// Fails with an invalid-argument error before any call is opened when
    /// `desired_partition_count` is zero. Transport failures surface through
    /// the returned stream.
    pub async fn get_partitions(&self, desired_partition_count: u32) -> Result<PartitionStream> {
        if desired_partition_count < 1 {
            return Err(Error::invalid_argument(
                "desired_partition_count",
                "must be at least 1",
            ));
        }

        let tag = request_tag();

        if desired_partition_count == 1 {
            debug!(
                "[{tag}] single partition requested for '{}', skipping the partition query",
                self.collection_id
            );
            return Ok(self.partition_stream(Box::pin(stream::empty()), tag));
        }

        let request = PartitionQueryRequest::new(
            self.root.formatted_name(),
            StructuredQuery::collection_group(&self.collection_id),
            desired_partition_count - 1,
        );
        debug!(
            "[{tag}] requesting up to {} split points for '{}'",
            request.partition_count, self.collection_id
        );
        let cursors = self.datastore.partition_query_stream(request).await?;
        Ok(self.partition_stream(cursors, tag))
    }

    fn partition_stream(&self, cursors: CursorStream, tag: String) -> PartitionStream {
        PartitionStream::new(
            self.root.clone(),
            self.collection_id.clone(),
            Arc::clone(&self.decoder),
            cursors,
            tag,
        )
    }
}

impl fmt::Debug for CollectionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionGroup")
            .field("root", &self.root)
            .field("collection_id", &self.collection_id)
            .finish_non_exhaustive()
    }
}

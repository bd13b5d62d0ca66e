//! The partition stream
//!
//! Pairs the ordered split cursors of one partition call into contiguous
//! partitions, closing the final unterminated one at end of stream.

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::stream::{FusedStream, Stream};
use tracing::{debug, warn};

use super::types::QueryPartition;
use crate::decode::ValueDecoder;
use crate::error::Result;
use crate::path::QualifiedResourcePath;
use crate::transport::CursorStream;
use crate::types::JsonValue;

/// A stream of contiguous [`QueryPartition`]s over one collection group.
///
/// Each incoming cursor closes the partition opened by the previous one, and
/// end of stream closes the final partition with an absent upper bound. The
/// yielded sequence is contiguous and exhaustive: the first partition starts
/// unbounded, the last ends unbounded, and adjacent partitions share their
/// boundary values.
///
/// A failure from the underlying call is yielded as an error, after which
/// the stream is terminated without the trailing partition; the sequence is
/// no longer known to be exhaustive. Dropping the stream releases the
/// underlying call, and partitions already yielded stay valid.
pub struct PartitionStream {
    root: QualifiedResourcePath,
    collection_id: String,
    decoder: Arc<dyn ValueDecoder>,
    cursors: Option<CursorStream>,
    last_values: Option<Vec<JsonValue>>,
    yielded: usize,
    tag: String,
}

impl PartitionStream {
    /// Wrap a cursor stream. An empty cursor stream still yields the one
    /// unbounded partition.
    pub fn new(
        root: QualifiedResourcePath,
        collection_id: impl Into<String>,
        decoder: Arc<dyn ValueDecoder>,
        cursors: CursorStream,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            root,
            collection_id: collection_id.into(),
            decoder,
            cursors: Some(cursors),
            last_values: None,
            yielded: 0,
            tag: tag.into(),
        }
    }

    /// The collection id the partitions select.
    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    fn partition(
        &mut self,
        start_at: Option<Vec<JsonValue>>,
        end_before: Option<Vec<JsonValue>>,
    ) -> QueryPartition {
        self.yielded += 1;
        QueryPartition::new(
            self.root.clone(),
            self.collection_id.clone(),
            Arc::clone(&self.decoder),
            start_at,
            end_before,
        )
    }
}

impl Stream for PartitionStream {
    type Item = Result<QueryPartition>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let Some(cursors) = this.cursors.as_mut() else {
            return Poll::Ready(None);
        };

        match cursors.as_mut().poll_next(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(Ok(cursor))) => {
                let start_at = this.last_values.replace(cursor.values.clone());
                Poll::Ready(Some(Ok(this.partition(start_at, Some(cursor.values)))))
            }
            Poll::Ready(Some(Err(e))) => {
                // Terminate without the trailing partition: with a cursor
                // lost, the slices yielded so far no longer cover the group.
                this.cursors = None;
                warn!(
                    "[{}] partition stream failed after {} partitions: {e}",
                    this.tag, this.yielded
                );
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.cursors = None;
                let start_at = this.last_values.take();
                let partition = this.partition(start_at, None);
                debug!(
                    "[{}] partition stream complete with {} partitions",
                    this.tag, this.yielded
                );
                Poll::Ready(Some(Ok(partition)))
            }
        }
    }
}

impl FusedStream for PartitionStream {
    fn is_terminated(&self) -> bool {
        self.cursors.is_none()
    }
}

impl fmt::Debug for PartitionStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionStream")
            .field("collection_id", &self.collection_id)
            .field("yielded", &self.yielded)
            .field("terminated", &self.cursors.is_none())
            .finish_non_exhaustive()
    }
}

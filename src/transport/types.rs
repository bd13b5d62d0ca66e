//! Datastore contract
//!
//! The trait the partitioning flow drives, plus the request and response
//! envelopes of the partition call.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::query::{Cursor, StructuredQuery};

/// An ordered stream of split cursors, delivered in query order.
pub type CursorStream = Pin<Box<dyn Stream<Item = Result<Cursor>> + Send>>;

/// The transport seam of the partitioning protocol.
///
/// Implementations own connection handling and any retry policy; the layers
/// above perform none. Dropping the returned stream must release the
/// underlying call.
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Open the partition call for `request` and stream back its split
    /// cursors.
    async fn partition_query_stream(&self, request: PartitionQueryRequest)
        -> Result<CursorStream>;
}

/// The body of a partition call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionQueryRequest {
    /// The resource to run the query under. Travels in the request path,
    /// not the body.
    #[serde(skip)]
    pub parent: String,

    /// The collection-group query to split.
    pub structured_query: StructuredQuery,

    /// Maximum number of split points to return, one less than the desired
    /// partition count.
    pub partition_count: u32,

    /// Page size for paginated transports; omitted to take the transport's
    /// default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    /// Continuation token for paginated transports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

impl PartitionQueryRequest {
    /// A request with no pagination overrides.
    pub fn new(
        parent: impl Into<String>,
        structured_query: StructuredQuery,
        partition_count: u32,
    ) -> Self {
        Self {
            parent: parent.into(),
            structured_query,
            partition_count,
            page_size: None,
            page_token: None,
        }
    }
}

/// One page of a partition call's response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartitionQueryResponse {
    /// The split cursors of this page, in query order.
    pub partitions: Vec<Cursor>,

    /// Continuation token, absent or empty on the last page.
    pub next_page_token: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================

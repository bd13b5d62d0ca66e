//! Query partitions
//!
//! A partition is an immutable pair of raw cursor boundaries plus the
//! decoded views and bounded sub-query derived from them.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::decode::{FieldValue, ValueDecoder};
use crate::error::Result;
use crate::path::QualifiedResourcePath;
use crate::query::{Cursor, Query, StructuredQuery};
use crate::types::JsonValue;

/// One disjoint slice of a collection-group query's result set.
///
/// Holds the boundary values exactly as the server issued them. Within a
/// generated sequence the first partition has no lower bound, the last has
/// no upper bound, and adjacent partitions share the boundary between them.
#[derive(Clone)]
pub struct QueryPartition {
    root: QualifiedResourcePath,
    collection_id: String,
    decoder: Arc<dyn ValueDecoder>,
    start_at_raw: Option<Vec<JsonValue>>,
    end_before_raw: Option<Vec<JsonValue>>,
    start_at: OnceCell<Vec<FieldValue>>,
    end_before: OnceCell<Vec<FieldValue>>,
}

impl QueryPartition {
    /// A partition of the collection group `collection_id` under `root`,
    /// bounded by the given raw cursor values.
    pub fn new(
        root: QualifiedResourcePath,
        collection_id: impl Into<String>,
        decoder: Arc<dyn ValueDecoder>,
        start_at_raw: Option<Vec<JsonValue>>,
        end_before_raw: Option<Vec<JsonValue>>,
    ) -> Self {
        Self {
            root,
            collection_id: collection_id.into(),
            decoder,
            start_at_raw,
            end_before_raw,
            start_at: OnceCell::new(),
            end_before: OnceCell::new(),
        }
    }

    /// The collection id the partitioned query selects.
    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    /// The decoded inclusive lower bound, `None` on the first partition.
    ///
    /// Decoding runs on first access and the result is cached; a decode
    /// failure is returned without being cached.
    pub fn start_at(&self) -> Result<Option<&[FieldValue]>> {
        Self::decoded(&self.start_at, self.start_at_raw.as_deref(), &*self.decoder)
    }

    /// The decoded exclusive upper bound, `None` on the last partition.
    ///
    /// Decoding runs on first access and the result is cached; a decode
    /// failure is returned without being cached.
    pub fn end_before(&self) -> Result<Option<&[FieldValue]>> {
        Self::decoded(
            &self.end_before,
            self.end_before_raw.as_deref(),
            &*self.decoder,
        )
    }

    /// The raw lower-bound values as issued by the server.
    pub fn start_at_raw(&self) -> Option<&[JsonValue]> {
        self.start_at_raw.as_deref()
    }

    /// The raw upper-bound values as issued by the server.
    pub fn end_before_raw(&self) -> Option<&[JsonValue]> {
        self.end_before_raw.as_deref()
    }

    /// Reconstruct a standalone query over this partition's slice.
    ///
    /// Bounds are rebuilt from the raw values, never the decoded ones, so no
    /// decode round trip can distort them: `start_at` becomes an inclusive
    /// lower bound and `end_before` an exclusive upper bound, each omitted
    /// when absent.
    pub fn to_query(&self) -> Query {
        let mut query = StructuredQuery::collection_group(&self.collection_id);
        if let Some(values) = &self.start_at_raw {
            query.start_at = Some(Cursor::before(values.clone()));
        }
        if let Some(values) = &self.end_before_raw {
            query.end_at = Some(Cursor::before(values.clone()));
        }
        Query::new(self.root.clone(), query)
    }

    fn decoded<'a>(
        cell: &'a OnceCell<Vec<FieldValue>>,
        raw: Option<&[JsonValue]>,
        decoder: &dyn ValueDecoder,
    ) -> Result<Option<&'a [FieldValue]>> {
        let Some(raw) = raw else {
            return Ok(None);
        };
        let values = cell.get_or_try_init(|| decoder.decode_values(raw))?;
        Ok(Some(values.as_slice()))
    }
}

impl fmt::Debug for QueryPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryPartition")
            .field("collection_id", &self.collection_id)
            .field("start_at_raw", &self.start_at_raw)
            .field("end_before_raw", &self.end_before_raw)
            .finish_non_exhaustive()
    }
}

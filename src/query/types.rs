//! Wire query model
//!
//! The camelCase JSON shapes queries and cursors take on the wire, plus the
//! [`Query`] artifact handed to query-execution collaborators.

use serde::{Deserialize, Serialize};

use crate::path::{FieldPath, QualifiedResourcePath};
use crate::types::JsonValue;

// ============================================================================
// Structured queries
// ============================================================================

/// The wire form of a query body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuredQuery {
    /// The collections the query selects from.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub from: Vec<CollectionSelector>,

    /// Ordering constraints, applied in sequence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<Order>,

    /// Lower bound cursor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<Cursor>,

    /// Upper bound cursor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<Cursor>,
}

impl StructuredQuery {
    /// A query over every collection with the given id, ordered solely by
    /// document identity.
    ///
    /// This is the only shape the partitioning protocol accepts: split
    /// cursors are document identities, so any other ordering is discarded
    /// by construction.
    pub fn collection_group(collection_id: impl Into<String>) -> Self {
        Self {
            from: vec![CollectionSelector::group(collection_id)],
            order_by: vec![Order::ascending(&FieldPath::document_id())],
            start_at: None,
            end_at: None,
        }
    }
}

/// Selects the collections a query reads from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSelector {
    /// The collection id to select.
    pub collection_id: String,

    /// When true, selects every collection with this id regardless of its
    /// ancestor document; when false, only direct children of the query's
    /// parent.
    #[serde(default)]
    pub all_descendants: bool,
}

impl CollectionSelector {
    /// The selector of a collection-group query.
    pub fn group(collection_id: impl Into<String>) -> Self {
        Self {
            collection_id: collection_id.into(),
            all_descendants: true,
        }
    }
}

/// One ordering constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// The field to order by.
    pub field: FieldReference,

    /// Sort direction.
    #[serde(default)]
    pub direction: Direction,
}

impl Order {
    /// Ascending order over the given field.
    pub fn ascending(field: &FieldPath) -> Self {
        Self {
            field: FieldReference {
                field_path: field.formatted_name(),
            },
            direction: Direction::Ascending,
        }
    }
}

/// A field named by its canonical dotted form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReference {
    /// The canonical dotted field path.
    pub field_path: String,
}

/// Sort direction, using the wire's names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Lowest values first.
    #[default]
    Ascending,
    /// Highest values first.
    Descending,
}

// ============================================================================
// Cursors
// ============================================================================

/// A position in a query's result order: one value per ordered field.
///
/// Consumers treat `values` positionally, aligned with the query's
/// `order_by` fields, never as a single composite value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cursor {
    /// The raw wire values, one per ordered field. May be empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<JsonValue>,

    /// True to position before the matching values, false to position after.
    #[serde(skip_serializing_if = "is_false")]
    pub before: bool,
}

impl Cursor {
    /// A cursor positioned after the matching values.
    pub fn new(values: Vec<JsonValue>) -> Self {
        Self {
            values,
            before: false,
        }
    }

    /// A cursor positioned before the matching values: an inclusive lower
    /// bound as `start_at`, an exclusive upper bound as `end_at`.
    pub fn before(values: Vec<JsonValue>) -> Self {
        Self {
            values,
            before: true,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

// ============================================================================
// Standalone queries
// ============================================================================

/// An executable query: a parent resource plus the query body to run under
/// it.
///
/// This crate constructs queries but never executes them; execution belongs
/// to the query-execution collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    parent: QualifiedResourcePath,
    structured_query: StructuredQuery,
}

impl Query {
    /// Pair a parent resource with a query body.
    pub fn new(parent: QualifiedResourcePath, structured_query: StructuredQuery) -> Self {
        Self {
            parent,
            structured_query,
        }
    }

    /// The resource the query runs under.
    pub fn parent(&self) -> &QualifiedResourcePath {
        &self.parent
    }

    /// The wire-form query body.
    pub fn structured_query(&self) -> &StructuredQuery {
        &self.structured_query
    }
}

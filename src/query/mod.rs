//! Query construction and partition generation
//!
//! This module owns the wire query model and [`CollectionGroup`], the entry
//! point for splitting a collection-group query into independently
//! executable slices. Query execution itself is out of scope; the types here
//! only describe queries.

mod collection_group;
mod types;

pub use collection_group::CollectionGroup;
pub use types::{
    CollectionSelector, Cursor, Direction, FieldReference, Order, Query, StructuredQuery,
};

#[cfg(test)]
mod tests;

//! Path model module
//!
//! Canonical, comparable, immutable addresses for collections, documents and
//! document fields.
//!
//! # Overview
//!
//! Three concrete path kinds share the [`Path`] capability trait:
//!
//! - [`ResourcePath`]: collection and document addresses relative to an
//!   unspecified database
//! - [`QualifiedResourcePath`]: the same addresses pinned to a project and
//!   database, with the canonical wire form
//! - [`FieldPath`]: dotted addresses of nested fields inside a document
//!
//! Paths never mutate. `append`, `join` and `parent` return new values, and
//! ordering is total within each kind.

mod field;
mod resource;
mod types;

pub use field::{validate_field_path, FieldPath, FieldPathArg};
pub use resource::{
    validate_resource_path, QualifiedResourcePath, ResourcePath, DEFAULT_DATABASE_ID,
};
pub use types::Path;

//! Resource paths addressing collections and documents
//!
//! A resource path alternates collection ids and document ids beneath a
//! database root. [`ResourcePath`] is relative to an unspecified database;
//! [`QualifiedResourcePath`] pins the owning project and database and
//! renders the canonical wire form.

use std::cmp::Ordering;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{compare_segments, Path};
use crate::error::{Error, Result};

/// The well-known id of a project's default database.
pub const DEFAULT_DATABASE_ID: &str = "(default)";

/// Matches an absolute resource name and captures the project id, the
/// database id and the optional relative path after `/documents/`.
static RESOURCE_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    // [\s\S] also matches newlines, which `.` would not.
    Regex::new(r"^projects/([^/]*)/databases/([^/]*)(?:/documents/)?([\s\S]*)$")
        .expect("resource name pattern is valid")
});

// ============================================================================
// Relative resource paths
// ============================================================================

/// A path addressing a collection or document relative to a database root.
///
/// An even, non-zero number of segments addresses a document, an odd number
/// a collection, and zero segments the database root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResourcePath {
    segments: Vec<String>,
}

impl ResourcePath {
    /// The path at the database root.
    pub const EMPTY: ResourcePath = ResourcePath {
        segments: Vec::new(),
    };

    /// Create a path from pre-split segments.
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Create a path from a relative slash-separated string.
    ///
    /// Empty components are discarded, so leading, trailing and repeated
    /// slashes are tolerated.
    pub fn from_relative(relative: impl AsRef<str>) -> Self {
        Self {
            segments: split_resource_name(relative.as_ref()),
        }
    }

    /// True when the path addresses a document.
    pub fn is_document(&self) -> bool {
        !self.segments.is_empty() && self.segments.len() % 2 == 0
    }

    /// True when the path addresses a collection.
    pub fn is_collection(&self) -> bool {
        self.segments.len() % 2 == 1
    }

    /// The relative slash-separated form.
    pub fn relative_name(&self) -> String {
        self.segments.join("/")
    }

    /// Returns a new path with the given relative string form appended.
    /// Empty components in `relative` are discarded.
    #[must_use]
    pub fn join(&self, relative: impl AsRef<str>) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(split_resource_name(relative.as_ref()));
        Self { segments }
    }

    /// Lift this path into a qualified path under the given project and the
    /// well-known default database.
    pub fn to_qualified(&self, default_project_id: impl Into<String>) -> QualifiedResourcePath {
        QualifiedResourcePath {
            project_id: default_project_id.into(),
            database_id: DEFAULT_DATABASE_ID.to_string(),
            segments: self.segments.clone(),
        }
    }
}

impl Path for ResourcePath {
    fn segments(&self) -> &[String] {
        &self.segments
    }

    fn append(&self, other: &Self) -> Self {
        let mut segments = self.segments.clone();
        segments.extend_from_slice(&other.segments);
        Self { segments }
    }

    fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }
}

impl Ord for ResourcePath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_to(other)
    }
}

impl PartialOrd for ResourcePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative_name())
    }
}

impl From<&str> for ResourcePath {
    fn from(relative: &str) -> Self {
        Self::from_relative(relative)
    }
}

// ============================================================================
// Qualified resource paths
// ============================================================================

/// A resource path qualified with the project and database that own it.
///
/// The qualification is fixed at construction and propagates unchanged
/// through every derived path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedResourcePath {
    project_id: String,
    database_id: String,
    segments: Vec<String>,
}

impl QualifiedResourcePath {
    /// The root path of the given database.
    pub fn new(project_id: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database_id: database_id.into(),
            segments: Vec::new(),
        }
    }

    /// Create a qualified path from pre-split relative segments.
    pub fn with_segments(
        project_id: impl Into<String>,
        database_id: impl Into<String>,
        segments: Vec<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            database_id: database_id.into(),
            segments,
        }
    }

    /// Parse an absolute resource name of the form
    /// `projects/<project>/databases/<database>[/documents/<path>]`.
    pub fn from_slash_separated(absolute_path: &str) -> Result<Self> {
        let captures = RESOURCE_PATH_RE.captures(absolute_path).ok_or_else(|| {
            Error::resource_path(
                "absolute_path",
                format!("'{absolute_path}' is not a valid resource name"),
            )
        })?;
        let root = Self::new(&captures[1], &captures[2]);
        Ok(root.join(&captures[3]))
    }

    /// Project id this path is qualified with.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Database id this path is qualified with.
    pub fn database_id(&self) -> &str {
        &self.database_id
    }

    /// True when the path addresses a document.
    pub fn is_document(&self) -> bool {
        !self.segments.is_empty() && self.segments.len() % 2 == 0
    }

    /// True when the path addresses a collection.
    pub fn is_collection(&self) -> bool {
        self.segments.len() % 2 == 1
    }

    /// The relative part of the path, stripped of its qualification.
    pub fn relative_name(&self) -> String {
        self.segments.join("/")
    }

    /// The canonical absolute form sent over the wire:
    /// `projects/<p>/databases/<d>/documents[/<segments>]`.
    pub fn formatted_name(&self) -> String {
        let mut components = vec![
            "projects",
            self.project_id.as_str(),
            "databases",
            self.database_id.as_str(),
            "documents",
        ];
        components.extend(self.segments.iter().map(String::as_str));
        components.join("/")
    }

    /// Returns a new path with the given relative string form appended.
    /// Empty components in `relative` are discarded.
    #[must_use]
    pub fn join(&self, relative: impl AsRef<str>) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(split_resource_name(relative.as_ref()));
        Self {
            project_id: self.project_id.clone(),
            database_id: self.database_id.clone(),
            segments,
        }
    }

    /// Already qualified; returns a copy of self and ignores the argument.
    pub fn to_qualified(&self, _default_project_id: impl Into<String>) -> QualifiedResourcePath {
        self.clone()
    }
}

impl Path for QualifiedResourcePath {
    fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The result keeps this path's qualification; `other`'s is ignored.
    fn append(&self, other: &Self) -> Self {
        let mut segments = self.segments.clone();
        segments.extend_from_slice(&other.segments);
        Self {
            project_id: self.project_id.clone(),
            database_id: self.database_id.clone(),
            segments,
        }
    }

    fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            project_id: self.project_id.clone(),
            database_id: self.database_id.clone(),
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Orders by project id, then database id, then segments.
    fn compare_to(&self, other: &Self) -> Ordering {
        self.project_id
            .cmp(&other.project_id)
            .then_with(|| self.database_id.cmp(&other.database_id))
            .then_with(|| compare_segments(&self.segments, &other.segments))
    }
}

impl Ord for QualifiedResourcePath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_to(other)
    }
}

impl PartialOrd for QualifiedResourcePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for QualifiedResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted_name())
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Validate a caller-supplied relative resource path argument.
///
/// The path must be non-empty and must not contain `//`.
pub fn validate_resource_path(arg_name: &str, resource_path: &str) -> Result<()> {
    if resource_path.is_empty() {
        return Err(Error::resource_path(
            arg_name,
            "path must be a non-empty string",
        ));
    }
    if resource_path.contains("//") {
        return Err(Error::resource_path(arg_name, "path must not contain //"));
    }
    Ok(())
}

/// Split a relative resource name on `/`, discarding empty components.
fn split_resource_name(relative: &str) -> Vec<String> {
    relative
        .split('/')
        .filter(|component| !component.is_empty())
        .map(String::from)
        .collect()
}

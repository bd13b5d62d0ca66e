//! Field paths addressing values inside a document
//!
//! Field paths name nested document fields with dot-separated components.
//! Components that are not bare identifiers are backtick-quoted in the
//! canonical form.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::Path;
use crate::error::{Error, Result};

/// The reserved field name that sorts and filters by document identity.
const DOCUMENT_ID_FIELD: &str = "__name__";

/// Matches components that may appear unquoted in a formatted field path.
static UNESCAPED_FIELD_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("field name pattern is valid"));

/// Matches strings usable as dotted field paths: non-empty and free of the
/// reserved characters.
static FIELD_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^*~/\[\]]+$").expect("field path pattern is valid"));

/// A path to a field inside a document.
///
/// Always holds at least one segment; every segment is non-empty. Segments
/// may contain any characters, including dots, which the canonical form
/// quotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Create a field path from pre-split segments.
    ///
    /// Requires at least one segment and rejects empty segments.
    pub fn new(segments: Vec<String>) -> Result<Self> {
        if segments.is_empty() {
            return Err(Error::field_path(
                "a field path requires at least one segment",
            ));
        }
        for (index, segment) in segments.iter().enumerate() {
            if segment.is_empty() {
                return Err(Error::field_path(format!(
                    "segment at index {index} must not be an empty string"
                )));
            }
        }
        Ok(Self { segments })
    }

    /// Create a field path from an iterator of segment strings.
    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(segments.into_iter().map(Into::into).collect())
    }

    /// The sentinel path addressing a document's own identifier.
    ///
    /// Accepted anywhere a field path is, to sort or filter by document id.
    pub fn document_id() -> Self {
        Self {
            segments: vec![DOCUMENT_ID_FIELD.to_string()],
        }
    }

    /// Interpret a caller-supplied argument as a field path.
    ///
    /// An existing [`FieldPath`] passes through unchanged. A string is split
    /// on `.` without filtering, so an empty component between two dots
    /// reaches the constructor and surfaces as its error.
    pub fn from_argument(argument: impl Into<FieldPathArg>) -> Result<Self> {
        match argument.into() {
            FieldPathArg::Path(path) => Ok(path),
            FieldPathArg::Dotted(dotted) => {
                Self::new(dotted.split('.').map(String::from).collect())
            }
        }
    }

    /// Parse the canonical dotted form produced by [`Self::formatted_name`],
    /// honoring backtick quoting and backslash escapes.
    pub fn from_formatted_name(formatted: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut quoted = false;
        let mut chars = formatted.chars();
        while let Some(c) = chars.next() {
            match c {
                '`' => quoted = !quoted,
                '\\' if quoted => match chars.next() {
                    Some(escaped) => current.push(escaped),
                    None => {
                        return Err(Error::field_path(format!(
                            "field path '{formatted}' ends with a dangling escape"
                        )));
                    }
                },
                '.' if !quoted => segments.push(std::mem::take(&mut current)),
                other => current.push(other),
            }
        }
        if quoted {
            return Err(Error::field_path(format!(
                "field path '{formatted}' has an unterminated quoted segment"
            )));
        }
        segments.push(current);
        Self::new(segments)
    }

    /// The canonical dotted form. Segments that are not bare identifiers are
    /// backtick-quoted, with backslashes and backticks backslash-escaped.
    pub fn formatted_name(&self) -> String {
        self.segments
            .iter()
            .map(|segment| {
                if UNESCAPED_FIELD_NAME_RE.is_match(segment) {
                    segment.clone()
                } else {
                    format!("`{}`", segment.replace('\\', r"\\").replace('`', r"\`"))
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Returns a new field path with the dotted string form appended.
    pub fn join(&self, relative: &str) -> Result<Self> {
        let mut segments = self.segments.clone();
        segments.extend(relative.split('.').map(String::from));
        Self::new(segments)
    }
}

impl Path for FieldPath {
    fn segments(&self) -> &[String] {
        &self.segments
    }

    fn append(&self, other: &Self) -> Self {
        let mut segments = self.segments.clone();
        segments.extend_from_slice(&other.segments);
        Self { segments }
    }

    /// `None` once only a single segment is left; a field path never has
    /// fewer than one.
    fn parent(&self) -> Option<Self> {
        if self.segments.len() <= 1 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }
}

impl Ord for FieldPath {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.compare_to(other)
    }
}

impl PartialOrd for FieldPath {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted_name())
    }
}

// ============================================================================
// Arguments and validation
// ============================================================================

/// A field path argument: an existing [`FieldPath`] or its dotted string
/// form.
#[derive(Debug, Clone)]
pub enum FieldPathArg {
    /// An already constructed field path.
    Path(FieldPath),
    /// A dot-separated string form.
    Dotted(String),
}

impl From<FieldPath> for FieldPathArg {
    fn from(path: FieldPath) -> Self {
        Self::Path(path)
    }
}

impl From<&FieldPath> for FieldPathArg {
    fn from(path: &FieldPath) -> Self {
        Self::Path(path.clone())
    }
}

impl From<&str> for FieldPathArg {
    fn from(dotted: &str) -> Self {
        Self::Dotted(dotted.to_string())
    }
}

impl From<String> for FieldPathArg {
    fn from(dotted: String) -> Self {
        Self::Dotted(dotted)
    }
}

/// Validate a caller-supplied field path argument.
///
/// An existing [`FieldPath`] always passes, whatever its segments hold. A
/// string must not contain `..`, must not start or end with `.` and must not
/// contain any of the reserved characters `*~/[]`.
pub fn validate_field_path(arg_name: &str, argument: &FieldPathArg) -> Result<()> {
    let dotted = match argument {
        FieldPathArg::Path(_) => return Ok(()),
        FieldPathArg::Dotted(dotted) => dotted,
    };
    if dotted.contains("..") {
        return Err(Error::field_path(format!(
            "value for argument '{arg_name}' must not contain \"..\""
        )));
    }
    if dotted.starts_with('.') || dotted.ends_with('.') {
        return Err(Error::field_path(format!(
            "value for argument '{arg_name}' must not start or end with \".\""
        )));
    }
    if !FIELD_PATH_RE.is_match(dotted) {
        return Err(Error::field_path(format!(
            "value for argument '{arg_name}' must be a non-empty string and must not contain '*~/[]'"
        )));
    }
    Ok(())
}

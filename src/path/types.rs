//! Path types and traits
//!
//! Defines the capability trait shared by every path kind and the
//! segment-level helpers the concrete kinds build on.

use std::cmp::Ordering;

/// Capabilities shared by every path kind.
///
/// A path is an immutable ordered sequence of string segments. Derivation
/// never mutates: `append` and `parent` return new values. Comparison and
/// prefix checks run over the shared segment representation, so any two
/// paths of the same kind order consistently. Appending is only defined
/// between paths of the same kind; the type system rules out merging a
/// resource path with a field path.
pub trait Path: Sized {
    /// Borrowed view of the ordered segments.
    fn segments(&self) -> &[String];

    /// Returns a new path with `other`'s segments appended to this one's.
    #[must_use]
    fn append(&self, other: &Self) -> Self;

    /// Returns the path with the last segment removed, or `None` when there
    /// is no parent to return. The root having no parent is a normal
    /// outcome, not an error.
    fn parent(&self) -> Option<Self>;

    /// Total order over paths of the same kind: segment-wise lexicographic,
    /// with the shorter path first on a full tie.
    fn compare_to(&self, other: &Self) -> Ordering {
        compare_segments(self.segments(), other.segments())
    }

    /// True when `other` starts with every segment of this path. A path is
    /// trivially a prefix of itself.
    fn is_prefix_of(&self, other: &Self) -> bool {
        is_prefix(self.segments(), other.segments())
    }

    /// Owned copy of the segments. Mutating the copy cannot affect the path.
    fn to_array(&self) -> Vec<String> {
        self.segments().to_vec()
    }

    /// The last segment, or `None` for the empty path.
    fn id(&self) -> Option<&str> {
        self.segments().last().map(String::as_str)
    }

    /// Number of segments.
    fn len(&self) -> usize {
        self.segments().len()
    }

    /// True when the path has no segments.
    fn is_empty(&self) -> bool {
        self.segments().is_empty()
    }
}

/// Segment-wise lexicographic comparison; the shorter path sorts first on a
/// full tie over the common prefix.
pub(crate) fn compare_segments(lhs: &[String], rhs: &[String]) -> Ordering {
    for (l, r) in lhs.iter().zip(rhs.iter()) {
        let cmp = l.cmp(r);
        if cmp != Ordering::Equal {
            return cmp;
        }
    }
    lhs.len().cmp(&rhs.len())
}

/// True when `other` has at least as many segments as `prefix` and matches
/// it segment for segment from index zero.
pub(crate) fn is_prefix(prefix: &[String], other: &[String]) -> bool {
    prefix.len() <= other.len() && prefix.iter().zip(other.iter()).all(|(a, b)| a == b)
}

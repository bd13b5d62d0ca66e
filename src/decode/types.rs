//! Decoded value types and the decoder trait

use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::path::QualifiedResourcePath;
use crate::types::JsonValue;

/// An application-side document field value.
///
/// Covers every value kind cursor positions can hold. Integers and doubles
/// stay distinct kinds, as they are on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// An explicit null.
    Null,
    /// A boolean.
    Boolean(bool),
    /// A 64-bit signed integer.
    Integer(i64),
    /// A 64-bit float.
    Double(f64),
    /// A point in time, UTC.
    Timestamp(DateTime<Utc>),
    /// A unicode string.
    String(String),
    /// An opaque byte string.
    Bytes(Bytes),
    /// A reference to another document.
    Reference(QualifiedResourcePath),
    /// A geographical point.
    GeoPoint {
        /// Degrees latitude, [-90, 90].
        latitude: f64,
        /// Degrees longitude, [-180, 180].
        longitude: f64,
    },
    /// An ordered list of values.
    Array(Vec<FieldValue>),
    /// A nested map of values, ordered by key.
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// True for the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// The string content, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(text) => Some(text),
            _ => None,
        }
    }

    /// The integer content, if this is an integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(number) => Some(*number),
            _ => None,
        }
    }

    /// The referenced document path, if this is a reference value.
    pub fn as_reference(&self) -> Option<&QualifiedResourcePath> {
        match self {
            FieldValue::Reference(path) => Some(path),
            _ => None,
        }
    }
}

/// Maps raw wire values to application values.
///
/// The seam between the partitioning flow and the value representation:
/// production code installs the wire decoder, tests install counting or
/// failing stand-ins.
pub trait ValueDecoder: Send + Sync {
    /// Decode one raw wire value.
    fn decode(&self, raw: &JsonValue) -> Result<FieldValue>;

    /// Decode a cursor's value list, failing on the first bad value.
    fn decode_values(&self, raw: &[JsonValue]) -> Result<Vec<FieldValue>> {
        raw.iter().map(|value| self.decode(value)).collect()
    }
}

//! Wire envelope decoding
//!
//! Raw values arrive as single-key JSON envelopes whose key names the kind,
//! e.g. `{"integerValue": "42"}` or `{"timestampValue": "2026-01-01T00:00:00Z"}`.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use super::types::{FieldValue, ValueDecoder};
use crate::error::{Error, Result};
use crate::path::QualifiedResourcePath;
use crate::types::{JsonObject, JsonValue};

/// Decoder for the tagged JSON envelopes of the wire protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct WireValueDecoder;

impl WireValueDecoder {
    /// Create a new wire decoder.
    pub fn new() -> Self {
        Self
    }
}

impl ValueDecoder for WireValueDecoder {
    fn decode(&self, raw: &JsonValue) -> Result<FieldValue> {
        decode_value(raw)
    }
}

fn decode_value(raw: &JsonValue) -> Result<FieldValue> {
    let object = raw
        .as_object()
        .ok_or_else(|| Error::decode(format!("value must be a JSON object, got {raw}")))?;
    let mut entries = object.iter();
    let (kind, inner) = entries
        .next()
        .ok_or_else(|| Error::decode("value envelope is empty"))?;
    if entries.next().is_some() {
        return Err(Error::decode(
            "value envelope must carry exactly one kind",
        ));
    }

    match kind.as_str() {
        "nullValue" => Ok(FieldValue::Null),
        "booleanValue" => inner
            .as_bool()
            .map(FieldValue::Boolean)
            .ok_or_else(|| malformed(kind, inner)),
        "integerValue" => decode_integer(inner),
        "doubleValue" => decode_double(inner),
        "timestampValue" => decode_timestamp(inner),
        "stringValue" => inner
            .as_str()
            .map(|text| FieldValue::String(text.to_string()))
            .ok_or_else(|| malformed(kind, inner)),
        "bytesValue" => decode_bytes(inner),
        "referenceValue" => decode_reference(inner),
        "geoPointValue" => decode_geo_point(inner),
        "arrayValue" => decode_array(inner),
        "mapValue" => decode_map(inner),
        other => Err(Error::decode(format!("unknown value kind '{other}'"))),
    }
}

/// Integers are string-encoded on the wire; plain numbers are tolerated.
fn decode_integer(inner: &JsonValue) -> Result<FieldValue> {
    match inner {
        JsonValue::String(text) => text.parse::<i64>().map(FieldValue::Integer).map_err(|e| {
            Error::decode(format!("integerValue '{text}' is not a 64-bit integer: {e}"))
        }),
        JsonValue::Number(number) => number
            .as_i64()
            .map(FieldValue::Integer)
            .ok_or_else(|| malformed("integerValue", inner)),
        _ => Err(malformed("integerValue", inner)),
    }
}

/// Doubles are numbers, except the non-finite values which arrive as the
/// strings `NaN`, `Infinity` and `-Infinity`.
fn decode_double(inner: &JsonValue) -> Result<FieldValue> {
    match inner {
        JsonValue::Number(number) => number
            .as_f64()
            .map(FieldValue::Double)
            .ok_or_else(|| malformed("doubleValue", inner)),
        JsonValue::String(text) => match text.as_str() {
            "NaN" => Ok(FieldValue::Double(f64::NAN)),
            "Infinity" => Ok(FieldValue::Double(f64::INFINITY)),
            "-Infinity" => Ok(FieldValue::Double(f64::NEG_INFINITY)),
            _ => Err(malformed("doubleValue", inner)),
        },
        _ => Err(malformed("doubleValue", inner)),
    }
}

fn decode_timestamp(inner: &JsonValue) -> Result<FieldValue> {
    let text = inner
        .as_str()
        .ok_or_else(|| malformed("timestampValue", inner))?;
    let parsed: DateTime<Utc> = DateTime::parse_from_rfc3339(text)
        .map_err(|e| Error::decode(format!("timestampValue '{text}' is not RFC 3339: {e}")))?
        .with_timezone(&Utc);
    Ok(FieldValue::Timestamp(parsed))
}

fn decode_bytes(inner: &JsonValue) -> Result<FieldValue> {
    let text = inner
        .as_str()
        .ok_or_else(|| malformed("bytesValue", inner))?;
    let decoded = BASE64
        .decode(text)
        .map_err(|e| Error::decode(format!("bytesValue is not base64: {e}")))?;
    Ok(FieldValue::Bytes(Bytes::from(decoded)))
}

fn decode_reference(inner: &JsonValue) -> Result<FieldValue> {
    let text = inner
        .as_str()
        .ok_or_else(|| malformed("referenceValue", inner))?;
    let path = QualifiedResourcePath::from_slash_separated(text)?;
    Ok(FieldValue::Reference(path))
}

fn decode_geo_point(inner: &JsonValue) -> Result<FieldValue> {
    let object = inner
        .as_object()
        .ok_or_else(|| malformed("geoPointValue", inner))?;
    Ok(FieldValue::GeoPoint {
        latitude: coordinate(object, "latitude")?,
        longitude: coordinate(object, "longitude")?,
    })
}

/// Zero coordinates may be omitted on the wire.
fn coordinate(object: &JsonObject, key: &str) -> Result<f64> {
    match object.get(key) {
        None => Ok(0.0),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| Error::decode(format!("geoPointValue {key} is not a number"))),
    }
}

/// Empty arrays may omit the `values` field entirely.
fn decode_array(inner: &JsonValue) -> Result<FieldValue> {
    let values = match inner.get("values") {
        None => Vec::new(),
        Some(JsonValue::Array(raw)) => raw.iter().map(decode_value).collect::<Result<_>>()?,
        Some(other) => return Err(malformed("arrayValue.values", other)),
    };
    Ok(FieldValue::Array(values))
}

/// Empty maps may omit the `fields` field entirely.
fn decode_map(inner: &JsonValue) -> Result<FieldValue> {
    let fields = match inner.get("fields") {
        None => BTreeMap::new(),
        Some(JsonValue::Object(raw)) => raw
            .iter()
            .map(|(key, value)| Ok((key.clone(), decode_value(value)?)))
            .collect::<Result<_>>()?,
        Some(other) => return Err(malformed("mapValue.fields", other)),
    };
    Ok(FieldValue::Map(fields))
}

fn malformed(kind: &str, inner: &JsonValue) -> Error {
    Error::decode(format!("malformed {kind}: {inner}"))
}

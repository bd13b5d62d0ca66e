//! Wire value decoding module
//!
//! Turns raw wire values from query responses into application values.
//!
//! # Overview
//!
//! Cursor positions arrive as tagged JSON envelopes (`stringValue`,
//! `integerValue`, ...). [`WireValueDecoder`] maps each envelope to a typed
//! [`FieldValue`]; the [`ValueDecoder`] trait is the seam that lets tests
//! and embedders substitute their own mapping.

mod decoders;
mod types;

pub use decoders::WireValueDecoder;
pub use types::{FieldValue, ValueDecoder};

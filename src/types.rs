//! Common types used throughout docstore-cdk
//!
//! This module contains shared type definitions, type aliases,
//! and utility helpers used across multiple modules.

use std::sync::atomic::{AtomicU64, Ordering};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Request Tags
// ============================================================================

static NEXT_TAG: AtomicU64 = AtomicU64::new(1);

/// Generate a short tag that correlates the log lines of one client request.
///
/// Tags are unique within the process and cheap to mint; they carry no
/// meaning beyond log correlation.
pub fn request_tag() -> String {
    format!("req#{}", NEXT_TAG.fetch_add(1, Ordering::Relaxed))
}

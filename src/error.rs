//! Error types for docstore-cdk
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Errors fall into three families: format errors (malformed paths and wire
//! values, raised synchronously before any network traffic), invalid-argument
//! errors (caller input that cannot be acted on), and transport errors
//! (failures surfaced through the partition cursor stream). Nothing is
//! retried at this layer.

use thiserror::Error;

/// The main error type for docstore-cdk
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Path Format Errors
    // ============================================================================
    /// A resource path string that does not name a document or collection.
    #[error("Invalid resource path for argument '{argument}': {message}")]
    InvalidResourcePath {
        /// Name of the argument that carried the path.
        argument: String,
        /// What was wrong with it.
        message: String,
    },

    /// A field path string or segment list that cannot be parsed.
    #[error("Invalid field path: {message}")]
    InvalidFieldPath {
        /// What was wrong with it.
        message: String,
    },

    // ============================================================================
    // Argument Errors
    // ============================================================================
    /// Caller input that is well-formed but cannot be acted on.
    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument {
        /// Name of the rejected argument.
        argument: String,
        /// Why it was rejected.
        message: String,
    },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// Settings that are missing or inconsistent.
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong with the settings.
        message: String,
    },

    /// JSON that could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Value Decoding Errors
    // ============================================================================
    /// A wire value that does not match any known kind.
    #[error("Failed to decode value: {message}")]
    Decode {
        /// What was wrong with the value.
        message: String,
    },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    /// A request that failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A response with a non-success status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code.
        status: u16,
        /// The response body, if any.
        body: String,
    },

    /// A cursor stream that failed mid-flight.
    #[error("Partition stream failed: {message}")]
    Stream {
        /// What broke the stream.
        message: String,
    },

    /// An endpoint URL that could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    /// A filesystem operation that failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    /// Any other error, preserved with its source chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create a resource path format error
    pub fn resource_path(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResourcePath {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Create a field path format error
    pub fn field_path(message: impl Into<String>) -> Self {
        Self::InvalidFieldPath {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a stream error
    pub fn stream(message: impl Into<String>) -> Self {
        Self::Stream {
            message: message.into(),
        }
    }

    /// Check if this error is a format error (malformed path or wire value)
    pub fn is_format(&self) -> bool {
        matches!(
            self,
            Error::InvalidResourcePath { .. }
                | Error::InvalidFieldPath { .. }
                | Error::Decode { .. }
        )
    }

    /// Check if this error is an invalid-argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument { .. })
    }

    /// Check if this error originated in the transport layer
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::HttpStatus { .. } | Error::Stream { .. }
        )
    }
}

/// Result type alias for docstore-cdk
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::resource_path("document_path", "Path must be a non-empty string.");
        assert_eq!(
            err.to_string(),
            "Invalid resource path for argument 'document_path': Path must be a non-empty string."
        );

        let err = Error::invalid_argument("desired_partition_count", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid argument 'desired_partition_count': must be at least 1"
        );

        let err = Error::http_status(503, "unavailable");
        assert_eq!(err.to_string(), "HTTP 503: unavailable");
    }

    #[test]
    fn test_error_families() {
        assert!(Error::field_path("bad").is_format());
        assert!(Error::resource_path("p", "bad").is_format());
        assert!(Error::decode("bad").is_format());
        assert!(!Error::field_path("bad").is_transport());

        assert!(Error::invalid_argument("n", "zero").is_invalid_argument());
        assert!(!Error::invalid_argument("n", "zero").is_format());

        assert!(Error::stream("broken pipe").is_transport());
        assert!(Error::http_status(500, "").is_transport());
        assert!(!Error::config("missing project").is_transport());
    }
}

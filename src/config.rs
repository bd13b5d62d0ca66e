//! Client settings
//!
//! Settings identify the target project and database and carry the transport
//! defaults the embedder wants applied. They can be built in code or loaded
//! from a JSON file.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::path::DEFAULT_DATABASE_ID;

/// Client settings.
///
/// `project_id` is the only required field; the database id falls back to
/// the well-known default database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// The project that owns the database.
    pub project_id: String,

    /// The database inside the project.
    #[serde(default = "default_database_id")]
    pub database_id: String,

    /// Base endpoint of the HTTP transport, e.g.
    /// `https://docstore.example.com`. `None` when the embedder wires its
    /// own datastore.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Headers added to every transport request. Credentials belong here.
    #[serde(default)]
    pub default_headers: HashMap<String, String>,
}

fn default_database_id() -> String {
    DEFAULT_DATABASE_ID.to_string()
}

impl Settings {
    /// Settings for the default database of a project.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database_id: default_database_id(),
            endpoint: None,
            default_headers: HashMap::new(),
        }
    }

    /// Set the database id.
    #[must_use]
    pub fn with_database_id(mut self, database_id: impl Into<String>) -> Self {
        self.database_id = database_id.into();
        self
    }

    /// Set the transport endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Add a header sent with every transport request.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Load settings from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "failed to read settings file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&content)
    }

    /// Parse settings from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("failed to parse settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check that the settings are usable.
    ///
    /// # Errors
    ///
    /// Fails when the project or database id is empty.
    pub fn validate(&self) -> Result<()> {
        if self.project_id.is_empty() {
            return Err(Error::config("project_id must not be empty"));
        }
        if self.database_id.is_empty() {
            return Err(Error::config("database_id must not be empty"));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

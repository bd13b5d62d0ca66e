//! Database handle
//!
//! Binds a project and database to the collaborator handles every derived
//! query shares.

use std::fmt;
use std::sync::Arc;

use crate::config::Settings;
use crate::decode::{ValueDecoder, WireValueDecoder};
use crate::error::{Error, Result};
use crate::path::QualifiedResourcePath;
use crate::query::CollectionGroup;
use crate::transport::Datastore;

/// A handle to one database, bound to a datastore and a value decoder.
///
/// Cheap to create and to clone from: the handle owns the qualified root
/// path plus shared collaborator handles, nothing else.
pub struct Database {
    root: QualifiedResourcePath,
    datastore: Arc<dyn Datastore>,
    decoder: Arc<dyn ValueDecoder>,
}

impl Database {
    /// A database handle using the standard wire decoder.
    pub fn new(
        project_id: impl Into<String>,
        database_id: impl Into<String>,
        datastore: Arc<dyn Datastore>,
    ) -> Self {
        Self {
            root: QualifiedResourcePath::new(project_id, database_id),
            datastore,
            decoder: Arc::new(WireValueDecoder::new()),
        }
    }

    /// A database handle from validated settings.
    ///
    /// # Errors
    ///
    /// Fails when the settings do not validate.
    pub fn from_settings(settings: &Settings, datastore: Arc<dyn Datastore>) -> Result<Self> {
        settings.validate()?;
        Ok(Self::new(
            settings.project_id.as_str(),
            settings.database_id.as_str(),
            datastore,
        ))
    }

    /// Replace the value decoder used for partition bounds.
    #[must_use]
    pub fn with_decoder(mut self, decoder: Arc<dyn ValueDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// The project id.
    pub fn project_id(&self) -> &str {
        self.root.project_id()
    }

    /// The database id.
    pub fn database_id(&self) -> &str {
        self.root.database_id()
    }

    /// The qualified root path of the database.
    pub fn root(&self) -> &QualifiedResourcePath {
        &self.root
    }

    /// The group of every collection with the given id.
    ///
    /// # Errors
    ///
    /// The id must be a single path segment: non-empty and free of `/`.
    pub fn collection_group(&self, collection_id: &str) -> Result<CollectionGroup> {
        if collection_id.is_empty() {
            return Err(Error::invalid_argument(
                "collection_id",
                "must not be empty",
            ));
        }
        if collection_id.contains('/') {
            return Err(Error::invalid_argument(
                "collection_id",
                format!("'{collection_id}' must not contain '/'"),
            ));
        }
        Ok(CollectionGroup::new(
            self.root.clone(),
            collection_id,
            Arc::clone(&self.datastore),
            Arc::clone(&self.decoder),
        ))
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

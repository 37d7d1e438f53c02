//! Client: the single entry point for callers
//!
//! ## Design: THIN FACADE
//!
//! Client owns the store, the notifier and the asset store, and adds exactly
//! one responsibility on top of them: single-document mutations emit their
//! event after the store accepts them. Batches go through [`Transaction`],
//! which does its own per-step emission.
//!
//! # Example
//!
//! ```
//! use docstore_client::{Client, ClientConfig, NewDocument};
//! use serde_json::json;
//!
//! let client = Client::new(ClientConfig::default()).unwrap();
//! client.create(NewDocument::new("doc1", "post").with_field("title", "Hello")).unwrap();
//!
//! let mut patch = client.patch("doc1", json!({"title": "Hi"}).as_object().unwrap().clone());
//! patch.commit().unwrap();
//!
//! let doc = client.get_document("doc1").unwrap();
//! assert_eq!(doc.get_str("title"), Some("Hi"));
//! ```

use crate::assets::{AssetFs, AssetStore, LocalFs};
use crate::config::ClientConfig;
use crate::listen::Listener;
use crate::logging;
use docstore_core::{
    Clock, Document, Fields, MutationEvent, MutationResult, NewDocument, Result, SystemClock,
};
use docstore_engine::{
    execute, DocumentStore, EventNotifier, QueryOutput, QueryParams, Transaction,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Store and notifier pair shared by the client and its asset store
#[derive(Debug, Clone)]
pub(crate) struct Backend {
    pub(crate) store: Arc<DocumentStore>,
    pub(crate) notifier: EventNotifier,
}

impl Backend {
    pub(crate) fn new(store: Arc<DocumentStore>, notifier: EventNotifier) -> Self {
        Self { store, notifier }
    }

    /// Create a document and announce it
    pub(crate) fn create(&self, doc: NewDocument) -> Result<Document> {
        let stored = self.store.create(doc)?;
        self.notifier.emit(&MutationEvent::created(stored.clone()));
        Ok(stored)
    }
}

/// Local document store client
#[derive(Debug)]
pub struct Client {
    config: ClientConfig,
    backend: Backend,
    assets: AssetStore,
}

impl Client {
    /// Create a client with the system clock and local filesystem
    ///
    /// Installs a global tracing subscriber at the configured level unless one
    /// is already installed. The subscriber is process-wide, so only the first
    /// client's level takes effect; later clients log that theirs was ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the assets directory
    /// cannot be resolved.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_collaborators(config, Arc::new(SystemClock::new()), Arc::new(LocalFs))
    }

    /// Create a client with an injected clock and filesystem
    pub fn with_collaborators(
        config: ClientConfig,
        clock: Arc<dyn Clock>,
        fs: Arc<dyn AssetFs>,
    ) -> Result<Self> {
        config.validate()?;
        if !logging::init_logging(config.log_level) {
            debug!(
                target: "docstore::client",
                level = %config.log_level,
                "Global subscriber already installed; configured log level not applied"
            );
        }

        let assets_dir = config.resolved_assets_directory()?;
        let backend = Backend::new(
            Arc::new(DocumentStore::with_clock(clock)),
            EventNotifier::new(),
        );
        let assets = AssetStore::new(backend.clone(), fs, assets_dir);

        info!(
            target: "docstore::client",
            dataset = %config.dataset,
            assets = %assets.directory().display(),
            "Client ready"
        );
        Ok(Self {
            config,
            backend,
            assets,
        })
    }

    /// The config this client was built from
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Dataset name
    pub fn dataset(&self) -> &str {
        &self.config.dataset
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Run a query
    ///
    /// By-id queries yield [`QueryOutput::Single`]; every other shape yields
    /// [`QueryOutput::Many`]. Unsupported queries and missing parameters
    /// yield an empty collection, never an error.
    pub fn fetch(&self, query: &str, params: Option<&QueryParams>) -> QueryOutput {
        execute(&self.backend.store, query, params)
    }

    /// Fetch one document by id
    pub fn get_document(&self, id: &str) -> Option<Document> {
        self.backend.store.get(id)
    }

    /// Fetch several documents by id, preserving order
    pub fn get_documents<S: AsRef<str>>(&self, ids: &[S]) -> Vec<Option<Document>> {
        ids.iter()
            .map(|id| self.backend.store.get(id.as_ref()))
            .collect()
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Create a document, filling in missing timestamps
    ///
    /// Fails with `DuplicateId` if the id is taken.
    pub fn create(&self, doc: NewDocument) -> Result<Document> {
        self.backend.create(doc)
    }

    /// Create a document unless one with the same id exists
    ///
    /// Returns the existing document untouched (and emits nothing) if the id
    /// is taken.
    pub fn create_if_not_exists(&self, doc: NewDocument) -> Result<Document> {
        if let Some(existing) = self.backend.store.get(&doc.id) {
            debug!(target: "docstore::client", id = %doc.id, "Document exists; create skipped");
            return Ok(existing);
        }
        self.backend.create(doc)
    }

    /// Create a document, or replace the body of an existing one
    ///
    /// A replacement keeps the original `createdAt` and emits `update`.
    pub fn create_or_replace(&self, doc: NewDocument) -> Result<Document> {
        if !self.backend.store.contains(&doc.id) {
            return self.backend.create(doc);
        }
        let stored = self.backend.store.replace(doc)?;
        self.backend
            .notifier
            .emit(&MutationEvent::updated(stored.clone()));
        Ok(stored)
    }

    /// Start a transaction holding a single patch
    ///
    /// Nothing changes until the returned transaction is committed.
    pub fn patch(&self, id: impl Into<String>, fields: Fields) -> Transaction {
        let mut txn = self.transaction();
        txn.patch(id, fields);
        txn
    }

    /// Delete a document immediately
    ///
    /// Emits `delete` only if a document was removed. Deleting a missing id is
    /// not an error.
    pub fn delete(&self, id: &str) -> MutationResult {
        if self.backend.store.delete(id).is_some() {
            self.backend.notifier.emit(&MutationEvent::deleted(id));
        } else {
            debug!(target: "docstore::client", id = %id, "Delete of missing document");
        }
        MutationResult::deleted(id)
    }

    /// Start an empty transaction
    pub fn transaction(&self) -> Transaction {
        Transaction::new(self.backend.store.clone(), self.backend.notifier.clone())
    }

    /// Remove every document without emitting events
    pub fn reset(&self) {
        self.backend.store.clear();
        info!(target: "docstore::client", dataset = %self.config.dataset, "Store reset");
    }

    // ========================================================================
    // Listening and assets
    // ========================================================================

    /// Watch documents matching `query`
    pub fn listen(&self, query: &str, params: Option<QueryParams>) -> Listener {
        Listener::new(self.backend.notifier.clone(), query, params)
    }

    /// Asset ingestion
    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }
}

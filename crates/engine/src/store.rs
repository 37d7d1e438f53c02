//! DocumentStore: in-memory document collection
//!
//! ## Design
//!
//! The store exclusively owns an insertion-ordered map from id to document.
//! No other component holds a reference into the map; all access goes through
//! the methods below and returns owned clones.
//!
//! The store knows nothing about events. Emitting change notifications is the
//! job of the caller (transaction or client), which keeps the store usable on
//! its own in tests and tools.
//!
//! ## Missing documents
//!
//! | Operation | Missing id |
//! |-----------|------------|
//! | `get` | `None` |
//! | `delete` | `None` |
//! | `update` | `Err(NotFound)` |
//! | `create` | n/a (existing id is `Err(DuplicateId)`) |

use docstore_core::{Clock, Document, Error, Fields, NewDocument, Result, SystemClock};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// In-memory document collection
pub struct DocumentStore {
    docs: RwLock<IndexMap<String, Document>>,
    clock: Arc<dyn Clock>,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    /// Create an empty store driven by the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()))
    }

    /// Create an empty store driven by `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            docs: RwLock::new(IndexMap::new()),
            clock,
        }
    }

    /// The clock this store stamps documents with
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Fetch a document by id
    pub fn get(&self, id: &str) -> Option<Document> {
        self.docs.read().get(id).cloned()
    }

    /// Whether a document with this id exists
    pub fn contains(&self, id: &str) -> bool {
        self.docs.read().contains_key(id)
    }

    /// Insert a new document
    ///
    /// Missing timestamps are filled from the clock. Fails with
    /// `DuplicateId` if the id is taken.
    pub fn create(&self, doc: NewDocument) -> Result<Document> {
        let mut docs = self.docs.write();
        if docs.contains_key(&doc.id) {
            return Err(Error::duplicate_id(doc.id));
        }
        let stored = doc.into_document(self.clock.now());
        docs.insert(stored.id.clone(), stored.clone());
        debug!(target: "docstore::store", id = %stored.id, doc_type = %stored.doc_type, "Document created");
        Ok(stored)
    }

    /// Shallow-merge `updates` into an existing document
    ///
    /// `id`, `type` and `createdAt` are never changed; `updatedAt` is set to
    /// the current time. Fails with `NotFound` if the id is absent.
    pub fn update(&self, id: &str, updates: Fields) -> Result<Document> {
        let mut docs = self.docs.write();
        let doc = docs.get_mut(id).ok_or_else(|| Error::not_found(id))?;
        doc.merge_fields(updates);
        doc.updated_at = self.clock.now().max(doc.created_at);
        debug!(target: "docstore::store", id = %id, "Document updated");
        Ok(doc.clone())
    }

    /// Replace the body of an existing document, keeping its `createdAt`
    ///
    /// Fails with `NotFound` if the id is absent.
    pub fn replace(&self, doc: NewDocument) -> Result<Document> {
        let mut docs = self.docs.write();
        let existing = docs
            .get_mut(&doc.id)
            .ok_or_else(|| Error::not_found(doc.id.as_str()))?;
        let now = self.clock.now();
        let mut replacement = doc.into_document(now);
        replacement.created_at = existing.created_at;
        replacement.updated_at = now.max(existing.created_at);
        *existing = replacement.clone();
        debug!(target: "docstore::store", id = %replacement.id, "Document replaced");
        Ok(replacement)
    }

    /// Remove a document, returning it if it was present
    pub fn delete(&self, id: &str) -> Option<Document> {
        let removed = self.docs.write().shift_remove(id);
        if removed.is_some() {
            debug!(target: "docstore::store", id = %id, "Document deleted");
        }
        removed
    }

    /// All documents matching `predicate`, in insertion order
    pub fn query<P>(&self, predicate: P) -> Vec<Document>
    where
        P: Fn(&Document) -> bool,
    {
        self.docs
            .read()
            .values()
            .filter(|doc| predicate(doc))
            .cloned()
            .collect()
    }

    /// Remove every document
    pub fn clear(&self) {
        let mut docs = self.docs.write();
        let count = docs.len();
        docs.clear();
        debug!(target: "docstore::store", count, "Store cleared");
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    /// Whether the store holds no documents
    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("documents", &self.len())
            .finish()
    }
}

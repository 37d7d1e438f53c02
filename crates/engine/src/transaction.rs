//! Transaction: an ordered batch of mutations applied in sequence
//!
//! ## Commit semantics
//!
//! `commit` applies mutations strictly in append order and emits one event
//! per applied step immediately, so listeners can observe a partially applied
//! batch before `commit` returns.
//!
//! Commit is NOT atomic. On the first failing step the error is returned and
//! earlier steps stay applied. The pending sequence is left exactly as it was,
//! applied prefix included. Callers that need all-or-nothing behaviour must
//! compensate themselves.
//!
//! # Example
//!
//! ```
//! use docstore_core::NewDocument;
//! use docstore_engine::{DocumentStore, EventNotifier, Transaction};
//! use std::sync::Arc;
//!
//! let store = Arc::new(DocumentStore::new());
//! let notifier = EventNotifier::new();
//!
//! let mut txn = Transaction::new(store.clone(), notifier);
//! txn.create(NewDocument::new("a", "post"))
//!     .create(NewDocument::new("b", "post"))
//!     .delete("a");
//! let results = txn.commit().unwrap();
//! assert_eq!(results.len(), 3);
//! assert!(store.get("a").is_none());
//! ```

use crate::notifier::EventNotifier;
use crate::store::DocumentStore;
use docstore_core::{
    strip_reserved, Error, Fields, Mutation, MutationEvent, MutationResult, NewDocument, Result,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Pending batch of mutations against one store
#[derive(Debug)]
pub struct Transaction {
    store: Arc<DocumentStore>,
    notifier: EventNotifier,
    pending: Vec<Mutation>,
}

impl Transaction {
    /// Create an empty transaction
    pub fn new(store: Arc<DocumentStore>, notifier: EventNotifier) -> Self {
        Self {
            store,
            notifier,
            pending: Vec::new(),
        }
    }

    /// Queue a create
    pub fn create(&mut self, doc: NewDocument) -> &mut Self {
        self.pending.push(Mutation::Create(doc));
        self
    }

    /// Queue a shallow field merge
    ///
    /// Reserved fields are dropped. If nothing remains the patch is recorded
    /// as a no-op: on commit it leaves the document untouched but still yields
    /// an update result and event.
    pub fn patch(&mut self, id: impl Into<String>, fields: Fields) -> &mut Self {
        let id = id.into();
        let fields = strip_reserved(fields);
        if fields.is_empty() {
            warn!(
                target: "docstore::txn",
                id = %id,
                "Patch has no non-reserved fields; recorded as no-op"
            );
        }
        self.pending.push(Mutation::Patch { id, fields });
        self
    }

    /// Queue a delete
    pub fn delete(&mut self, id: impl Into<String>) -> &mut Self {
        self.pending.push(Mutation::Delete { id: id.into() });
        self
    }

    /// Pending mutations in append order
    pub fn mutations(&self) -> &[Mutation] {
        &self.pending
    }

    /// Number of pending mutations
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Apply all pending mutations in order
    ///
    /// Returns one result per mutation, emits one event per mutation, and
    /// clears the batch. On failure the applied prefix stays applied in the
    /// store and the pending sequence is not cleared.
    pub fn commit(&mut self) -> Result<Vec<MutationResult>> {
        let total = self.pending.len();
        debug!(target: "docstore::txn", mutations = total, "Committing transaction");

        let mut results = Vec::with_capacity(total);
        for mutation in &self.pending {
            match self.apply(mutation) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(
                        target: "docstore::txn",
                        applied = results.len(),
                        pending = total,
                        error = %e,
                        "Transaction aborted; applied mutations are not rolled back"
                    );
                    return Err(e);
                }
            }
        }

        self.pending.clear();
        debug!(target: "docstore::txn", mutations = total, "Transaction committed");
        Ok(results)
    }

    fn apply(&self, mutation: &Mutation) -> Result<MutationResult> {
        match mutation {
            Mutation::Create(doc) => {
                let stored = self.store.create(doc.clone())?;
                self.notifier.emit(&MutationEvent::created(stored.clone()));
                Ok(MutationResult::created(stored))
            }
            Mutation::Patch { id, fields } if fields.is_empty() => {
                let current = self
                    .store
                    .get(id)
                    .ok_or_else(|| Error::not_found(id.as_str()))?;
                self.notifier.emit(&MutationEvent::updated(current.clone()));
                Ok(MutationResult::updated(current))
            }
            Mutation::Patch { id, fields } => {
                let stored = self.store.update(id, fields.clone())?;
                self.notifier.emit(&MutationEvent::updated(stored.clone()));
                Ok(MutationResult::updated(stored))
            }
            Mutation::Delete { id } => {
                if self.store.delete(id).is_none() {
                    debug!(target: "docstore::txn", id = %id, "Delete of missing document");
                }
                self.notifier.emit(&MutationEvent::deleted(id.as_str()));
                Ok(MutationResult::deleted(id.as_str()))
            }
        }
    }
}

//! Mutations and their results

use crate::document::{Document, Fields, NewDocument};
use crate::event::EventKind;
use serde::{Deserialize, Serialize};

/// A pending change to the store
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Insert a new document
    Create(NewDocument),
    /// Shallow-merge fields into an existing document
    Patch {
        /// Target document
        id: String,
        /// Fields to merge (reserved names already removed)
        fields: Fields,
    },
    /// Remove a document
    Delete {
        /// Target document
        id: String,
    },
}

impl Mutation {
    /// Id of the document this mutation targets
    pub fn document_id(&self) -> &str {
        match self {
            Mutation::Create(doc) => &doc.id,
            Mutation::Patch { id, .. } | Mutation::Delete { id } => id,
        }
    }

    /// Kind of event this mutation produces
    pub fn kind(&self) -> EventKind {
        match self {
            Mutation::Create(_) => EventKind::Create,
            Mutation::Patch { .. } => EventKind::Update,
            Mutation::Delete { .. } => EventKind::Delete,
        }
    }
}

/// Outcome of one applied mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationResult {
    /// Affected document id
    pub id: String,
    /// What was done
    pub operation: EventKind,
    /// Resulting document (create/patch only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
}

impl MutationResult {
    /// Result of a create
    pub fn created(document: Document) -> Self {
        Self {
            id: document.id.clone(),
            operation: EventKind::Create,
            document: Some(document),
        }
    }

    /// Result of a patch or replace
    pub fn updated(document: Document) -> Self {
        Self {
            id: document.id.clone(),
            operation: EventKind::Update,
            document: Some(document),
        }
    }

    /// Result of a delete
    pub fn deleted(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            operation: EventKind::Delete,
            document: None,
        }
    }
}

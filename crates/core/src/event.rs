//! Mutation events broadcast to listeners

use crate::document::Document;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of change an event or mutation describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A document was created
    Create,
    /// A document was updated or patched
    Update,
    /// A document was deleted
    Delete,
}

impl EventKind {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Create => "create",
            EventKind::Update => "update",
            EventKind::Delete => "delete",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change notification
///
/// Delete events carry only the id; the removed body is not re-broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationEvent {
    /// What happened
    pub kind: EventKind,
    /// Id of the affected document
    pub document_id: String,
    /// Document after the change (create/update only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
}

impl MutationEvent {
    /// Event for a newly created document
    pub fn created(document: Document) -> Self {
        Self {
            kind: EventKind::Create,
            document_id: document.id.clone(),
            document: Some(document),
        }
    }

    /// Event for an updated document
    pub fn updated(document: Document) -> Self {
        Self {
            kind: EventKind::Update,
            document_id: document.id.clone(),
            document: Some(document),
        }
    }

    /// Event for a deleted document
    pub fn deleted(document_id: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Delete,
            document_id: document_id.into(),
            document: None,
        }
    }
}

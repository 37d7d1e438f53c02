//! Document types
//!
//! A document is a flat JSON object with four reserved fields:
//!
//! | Field | Wire name | Rules |
//! |-------|-----------|-------|
//! | `id` | `id` | unique across the store, immutable |
//! | `doc_type` | `type` | immutable discriminator |
//! | `created_at` | `createdAt` | set once at creation |
//! | `updated_at` | `updatedAt` | advanced on every mutation, never below `createdAt` |
//!
//! Everything else lives in `fields` and is neither validated nor interpreted.

use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Wire name of the id field
pub const ID_FIELD: &str = "id";
/// Wire name of the type field
pub const TYPE_FIELD: &str = "type";
/// Wire name of the creation timestamp
pub const CREATED_AT_FIELD: &str = "createdAt";
/// Wire name of the last-modified timestamp
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// All reserved field names
pub const RESERVED_FIELDS: [&str; 4] = [ID_FIELD, TYPE_FIELD, CREATED_AT_FIELD, UPDATED_AT_FIELD];

/// Field map carried by documents and patches
pub type Fields = Map<String, Value>;

/// Check whether `name` is one of the reserved fields
pub fn is_reserved_field(name: &str) -> bool {
    RESERVED_FIELDS.contains(&name)
}

/// Remove reserved fields from a field map
pub fn strip_reserved(mut fields: Fields) -> Fields {
    for name in RESERVED_FIELDS {
        fields.remove(name);
    }
    fields
}

/// A stored document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique document id
    pub id: String,
    /// Type discriminator
    #[serde(rename = "type")]
    pub doc_type: String,
    /// Creation time
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    /// Last modification time
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
    /// Non-reserved fields
    #[serde(flatten)]
    pub fields: Fields,
}

impl Document {
    /// Look up a non-reserved field
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Look up a non-reserved field as a string
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Whether this document has the given type
    pub fn is_type(&self, doc_type: &str) -> bool {
        self.doc_type == doc_type
    }

    /// Shallow-merge `updates` into the document's fields
    ///
    /// Reserved keys in `updates` are ignored.
    pub fn merge_fields(&mut self, updates: Fields) {
        for (key, value) in updates {
            if !is_reserved_field(&key) {
                self.fields.insert(key, value);
            }
        }
    }

    /// Render the document as a single JSON object
    pub fn to_json(&self) -> Value {
        let mut obj = Map::with_capacity(self.fields.len() + RESERVED_FIELDS.len());
        obj.insert(ID_FIELD.to_string(), Value::String(self.id.clone()));
        obj.insert(TYPE_FIELD.to_string(), Value::String(self.doc_type.clone()));
        obj.insert(
            CREATED_AT_FIELD.to_string(),
            Value::String(self.created_at.to_rfc3339()),
        );
        obj.insert(
            UPDATED_AT_FIELD.to_string(),
            Value::String(self.updated_at.to_rfc3339()),
        );
        for (key, value) in &self.fields {
            obj.insert(key.clone(), value.clone());
        }
        Value::Object(obj)
    }
}

/// A document about to be created
///
/// Timestamps are optional; the store fills in whatever is missing.
///
/// # Example
///
/// ```
/// use docstore_core::NewDocument;
/// use serde_json::json;
///
/// let doc = NewDocument::new("doc1", "test")
///     .with_field("title", json!("Initial"));
/// assert_eq!(doc.fields["title"], json!("Initial"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDocument {
    /// Unique document id
    pub id: String,
    /// Type discriminator
    #[serde(rename = "type")]
    pub doc_type: String,
    /// Explicit creation time
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Explicit modification time
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    /// Non-reserved fields
    #[serde(flatten)]
    pub fields: Fields,
}

impl NewDocument {
    /// Create a document with no fields
    pub fn new(id: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            doc_type: doc_type.into(),
            created_at: None,
            updated_at: None,
            fields: Fields::new(),
        }
    }

    /// Add a field; reserved names are ignored
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        if !is_reserved_field(&name) {
            self.fields.insert(name, value.into());
        }
        self
    }

    /// Replace all non-reserved fields
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = strip_reserved(fields);
        self
    }

    /// Set an explicit creation time
    pub fn created_at(mut self, ts: Timestamp) -> Self {
        self.created_at = Some(ts);
        self
    }

    /// Set an explicit modification time
    pub fn updated_at(mut self, ts: Timestamp) -> Self {
        self.updated_at = Some(ts);
        self
    }

    /// Resolve missing timestamps and produce a stored document
    ///
    /// Missing `createdAt` defaults to `now`. Missing `updatedAt` defaults to
    /// `createdAt`'s resolved value when only that was supplied, else `now`.
    /// An explicit `updatedAt` earlier than `createdAt` is raised to it.
    pub fn into_document(self, now: Timestamp) -> Document {
        let created_at = self.created_at.unwrap_or(now);
        let updated_at = match (self.created_at, self.updated_at) {
            (_, Some(updated)) => updated.max(created_at),
            (Some(created), None) => created,
            (None, None) => now,
        };
        Document {
            id: self.id,
            doc_type: self.doc_type,
            created_at,
            updated_at,
            fields: strip_reserved(self.fields),
        }
    }
}

impl From<Document> for NewDocument {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            doc_type: doc.doc_type,
            created_at: Some(doc.created_at),
            updated_at: Some(doc.updated_at),
            fields: doc.fields,
        }
    }
}

//! Asset metadata documents

use docstore_core::{Document, NewDocument, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field holding the original filename
pub const ORIGINAL_FILENAME_FIELD: &str = "originalFilename";
/// Field holding the blob size in bytes
pub const SIZE_FIELD: &str = "size";
/// Field holding the MIME type
pub const MIME_TYPE_FIELD: &str = "mimeType";
/// Field holding the blob url
pub const URL_FIELD: &str = "url";

/// Metadata describing a stored asset blob
///
/// Mirrors the document registered in the store for the asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetadata {
    /// Asset id (also the document id)
    pub id: String,
    /// Document type (`asset.file`, `asset.image` or custom)
    #[serde(rename = "type")]
    pub asset_type: String,
    /// Filename the asset was uploaded with
    pub original_filename: String,
    /// Blob size in bytes
    pub size: u64,
    /// MIME type
    pub mime_type: String,
    /// Url of the blob relative to the assets root, e.g. `/assets/file-1-ab.txt`
    pub url: String,
    /// Optional title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// When the metadata document was created
    pub created_at: Timestamp,
    /// When the metadata document was last changed
    pub updated_at: Timestamp,
}

impl AssetMetadata {
    /// Read asset metadata back out of a stored document
    ///
    /// Returns `None` if a required field is missing or has the wrong type.
    pub fn from_document(doc: &Document) -> Option<Self> {
        let text = |name: &str| doc.get_str(name).map(str::to_string);
        Some(Self {
            id: doc.id.clone(),
            asset_type: doc.doc_type.clone(),
            original_filename: text(ORIGINAL_FILENAME_FIELD)?,
            size: doc.get(SIZE_FIELD).and_then(Value::as_u64)?,
            mime_type: text(MIME_TYPE_FIELD)?,
            url: text(URL_FIELD)?,
            title: text("title"),
            description: text("description"),
            label: text("label"),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}

/// Everything needed to build a metadata document before it is stored
#[derive(Debug, Clone)]
pub(crate) struct MetadataDraft {
    pub id: String,
    pub asset_type: String,
    pub original_filename: String,
    pub size: u64,
    pub mime_type: String,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub label: Option<String>,
}

impl MetadataDraft {
    pub(crate) fn to_new_document(&self) -> NewDocument {
        let mut doc = NewDocument::new(self.id.clone(), self.asset_type.clone())
            .with_field(ORIGINAL_FILENAME_FIELD, self.original_filename.clone())
            .with_field(SIZE_FIELD, self.size)
            .with_field(MIME_TYPE_FIELD, self.mime_type.clone())
            .with_field(URL_FIELD, self.url.clone());
        for (name, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("label", &self.label),
        ] {
            if let Some(value) = value {
                doc = doc.with_field(name, value.clone());
            }
        }
        doc
    }

    pub(crate) fn into_metadata(self, stored: &Document) -> AssetMetadata {
        AssetMetadata {
            id: self.id,
            asset_type: self.asset_type,
            original_filename: self.original_filename,
            size: self.size,
            mime_type: self.mime_type,
            url: self.url,
            title: self.title,
            description: self.description,
            label: self.label,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }
}

//! Upload inputs: asset kinds, payloads and options

use std::fmt;
use std::path::{Path, PathBuf};

/// Document type of file assets
pub const FILE_ASSET_TYPE: &str = "asset.file";
/// Document type of image assets
pub const IMAGE_ASSET_TYPE: &str = "asset.image";

/// What kind of asset is being uploaded
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Generic file
    File,
    /// Image
    Image,
    /// Caller-defined document type
    Custom(String),
}

impl AssetKind {
    /// Document type of the metadata document
    pub fn document_type(&self) -> &str {
        match self {
            AssetKind::File => FILE_ASSET_TYPE,
            AssetKind::Image => IMAGE_ASSET_TYPE,
            AssetKind::Custom(name) => name,
        }
    }

    /// Prefix used when generating asset ids
    pub fn id_prefix(&self) -> String {
        match self {
            AssetKind::File => "file".to_string(),
            AssetKind::Image => "image".to_string(),
            AssetKind::Custom(name) => {
                let prefix: String = name
                    .chars()
                    .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
                    .collect();
                if prefix.is_empty() {
                    "asset".to_string()
                } else {
                    prefix
                }
            }
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.document_type())
    }
}

/// The bytes being uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetPayload {
    /// A file on disk; copied into the assets directory
    Path(PathBuf),
    /// In-memory bytes; a filename must come from the options
    Bytes(Vec<u8>),
    /// In-memory bytes that carry their own name and optional MIME type
    Blob {
        /// Original file name
        name: String,
        /// MIME type reported by the source, if any
        mime_type: Option<String>,
        /// Contents
        bytes: Vec<u8>,
    },
}

impl AssetPayload {
    /// Payload referring to a file on disk
    pub fn path(path: impl Into<PathBuf>) -> Self {
        AssetPayload::Path(path.into())
    }

    /// Payload from raw bytes
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        AssetPayload::Bytes(bytes.into())
    }

    /// Named blob
    pub fn blob(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        AssetPayload::Blob {
            name: name.into(),
            mime_type: None,
            bytes: bytes.into(),
        }
    }

    /// Filename the payload itself carries, if any
    pub(crate) fn own_filename(&self) -> Option<String> {
        let name = match self {
            AssetPayload::Path(path) => path
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string),
            AssetPayload::Bytes(_) => None,
            AssetPayload::Blob { name, .. } => Some(name.clone()),
        };
        name.filter(|name| !name.trim().is_empty())
    }

    /// MIME type the payload itself carries, if any
    pub(crate) fn own_mime_type(&self) -> Option<&str> {
        match self {
            AssetPayload::Blob {
                mime_type: Some(mime),
                ..
            } if !mime.trim().is_empty() => Some(mime),
            _ => None,
        }
    }
}

/// Optional overrides and extra metadata for an upload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Filename to record instead of the payload's own
    pub filename: Option<String>,
    /// MIME type to record instead of the derived one
    pub mime_type: Option<String>,
    /// Use this asset id instead of generating one
    pub asset_id: Option<String>,
    /// Stored as `title` on the metadata document
    pub title: Option<String>,
    /// Stored as `description` on the metadata document
    pub description: Option<String>,
    /// Stored as `label` on the metadata document
    pub label: Option<String>,
}

impl UploadOptions {
    /// Empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this filename
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Record this MIME type
    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Use a fixed asset id
    pub fn asset_id(mut self, asset_id: impl Into<String>) -> Self {
        self.asset_id = Some(asset_id.into());
        self
    }

    /// Attach a title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attach a description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Extension of `filename` including the leading dot, or empty
pub(crate) fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

/// MIME type conventionally associated with a file extension
pub fn mime_type_for(filename: &str) -> Option<&'static str> {
    let ext = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "txt" => "text/plain",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "csv" => "text/csv",
        "js" | "mjs" => "text/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "ico" => "image/x-icon",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        _ => return None,
    };
    Some(mime)
}

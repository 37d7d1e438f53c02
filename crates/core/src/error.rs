//! Error types for docstore
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Reads and deletes of missing documents are NOT errors: they report absence
//! through `Option`. Only mutating a document that does not exist (or creating
//! one that already does) fails.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for docstore
///
/// # Categories
///
/// | Category | Variants |
/// |----------|----------|
/// | Documents | `DuplicateId`, `NotFound` |
/// | Assets | `UnsupportedPayload`, `MetadataUnavailable`, `StorageWrite`, `MetadataPersist` |
/// | System | `Config`, `Io` |
#[derive(Debug, Error)]
pub enum Error {
    /// A document with this id already exists
    #[error("document already exists: {id}")]
    DuplicateId {
        /// The conflicting document id
        id: String,
    },

    /// No document with this id exists
    #[error("document not found: {id}")]
    NotFound {
        /// The missing document id
        id: String,
    },

    /// Asset payload cannot be ingested
    #[error("unsupported asset payload: {reason}")]
    UnsupportedPayload {
        /// Why the payload was rejected
        reason: String,
    },

    /// Asset metadata (such as the original filename) cannot be determined
    #[error("asset metadata unavailable: {reason}")]
    MetadataUnavailable {
        /// Which piece of metadata is missing
        reason: String,
    },

    /// Writing an asset blob to disk failed
    #[error("failed to write asset to {}: {source}", path.display())]
    StorageWrite {
        /// Target path of the failed write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The blob was written but its metadata document could not be stored
    #[error("failed to persist metadata for asset {asset_id}: {source}")]
    MetadataPersist {
        /// Id of the asset whose metadata failed
        asset_id: String,
        /// Underlying store error
        #[source]
        source: Box<Error>,
    },

    /// Invalid or unreadable configuration
    #[error("configuration error: {reason}")]
    Config {
        /// Description of the problem
        reason: String,
    },

    /// I/O error outside of asset writes
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a DuplicateId error
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Error::DuplicateId { id: id.into() }
    }

    /// Create a NotFound error
    pub fn not_found(id: impl Into<String>) -> Self {
        Error::NotFound { id: id.into() }
    }

    /// Create an UnsupportedPayload error
    pub fn unsupported_payload(reason: impl Into<String>) -> Self {
        Error::UnsupportedPayload {
            reason: reason.into(),
        }
    }

    /// Create a MetadataUnavailable error
    pub fn metadata_unavailable(reason: impl Into<String>) -> Self {
        Error::MetadataUnavailable {
            reason: reason.into(),
        }
    }

    /// Create a Config error
    pub fn config(reason: impl Into<String>) -> Self {
        Error::Config {
            reason: reason.into(),
        }
    }

    /// Check if this is a DuplicateId error
    pub fn is_duplicate_id(&self) -> bool {
        matches!(self, Error::DuplicateId { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

//! Asset ingestion
//!
//! An upload writes the payload to `{assets_directory}/{asset_id}{ext}` and
//! registers an [`AssetMetadata`] document in the store through the normal
//! create path, so listeners see a `create` event for every asset.
//!
//! ## Failure handling
//!
//! | Step | Error |
//! |------|-------|
//! | payload is not a regular file | `UnsupportedPayload` |
//! | no filename from options or payload | `MetadataUnavailable` |
//! | directory creation or blob write fails | `StorageWrite` |
//! | metadata document cannot be stored | `MetadataPersist` |
//!
//! When the metadata step fails the freshly written blob is deleted on a
//! best-effort basis. A failed cleanup is logged and may leave an orphaned
//! blob behind.

mod fs;
mod metadata;
mod payload;

pub use fs::{AssetFs, LocalFs};
pub use metadata::{
    AssetMetadata, MIME_TYPE_FIELD, ORIGINAL_FILENAME_FIELD, SIZE_FIELD, URL_FIELD,
};
pub use payload::{
    mime_type_for, AssetKind, AssetPayload, UploadOptions, FILE_ASSET_TYPE, IMAGE_ASSET_TYPE,
};

use crate::client::Backend;
use docstore_core::{Error, Result, Timestamp};
use metadata::MetadataDraft;
use payload::extension_of;
use rand::RngCore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Url prefix recorded in asset metadata
pub const ASSETS_URL_ROOT: &str = "/assets";

/// MIME type used when none can be determined
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Generate a unique asset id from the kind, a timestamp and random bytes
///
/// Format: `{kind}-{unix millis}-{12 hex chars}`.
pub fn generate_asset_id(kind: &AssetKind, now: Timestamp) -> String {
    let mut random = [0u8; 6];
    rand::thread_rng().fill_bytes(&mut random);
    let hex: String = random.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{}-{}-{}", kind.id_prefix(), now.as_millis(), hex)
}

/// Whether `name` names a file directly inside the assets directory
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
}

/// Where the bytes of a resolved payload come from
enum BlobSource<'a> {
    File(&'a Path),
    Memory(&'a [u8]),
}

/// Payload with its metadata resolved
struct ResolvedPayload<'a> {
    filename: String,
    mime_type: String,
    size: u64,
    source: BlobSource<'a>,
}

/// Uploads asset blobs and registers their metadata
#[derive(Clone)]
pub struct AssetStore {
    backend: Backend,
    fs: Arc<dyn AssetFs>,
    directory: PathBuf,
}

impl AssetStore {
    pub(crate) fn new(backend: Backend, fs: Arc<dyn AssetFs>, directory: PathBuf) -> Self {
        Self {
            backend,
            fs,
            directory,
        }
    }

    /// Directory blobs are written to
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// On-disk path for a metadata `url`
    ///
    /// Returns `None` if the url is not under the assets root or tries to
    /// escape it.
    pub fn resolve_url(&self, url: &str) -> Option<PathBuf> {
        let name = url
            .strip_prefix(ASSETS_URL_ROOT)?
            .strip_prefix('/')?;
        is_plain_file_name(name).then(|| self.directory.join(name))
    }

    /// Store a blob and register its metadata document
    pub fn upload(
        &self,
        kind: AssetKind,
        payload: AssetPayload,
        options: UploadOptions,
    ) -> Result<AssetMetadata> {
        let now = self.backend.store.clock().now();
        let asset_id = options
            .asset_id
            .clone()
            .unwrap_or_else(|| generate_asset_id(&kind, now));
        if !is_plain_file_name(&asset_id) {
            return Err(Error::metadata_unavailable(format!(
                "asset id '{}' is not a plain file name",
                asset_id
            )));
        }
        // Writing under a taken id would clobber that asset's blob
        if self.backend.store.contains(&asset_id) {
            return Err(Error::MetadataPersist {
                source: Box::new(Error::duplicate_id(asset_id.as_str())),
                asset_id,
            });
        }

        let resolved = self.resolve_payload(&payload, &options)?;

        if !self.fs.exists(&self.directory) {
            self.fs
                .create_dir_all(&self.directory)
                .map_err(|source| Error::StorageWrite {
                    path: self.directory.clone(),
                    source,
                })?;
            debug!(target: "docstore::assets", dir = %self.directory.display(), "Created assets directory");
        }

        let file_name = format!("{}{}", asset_id, extension_of(&resolved.filename));
        let target = self.directory.join(&file_name);
        let written = match resolved.source {
            BlobSource::File(from) => self.fs.copy(from, &target).map(|_| ()),
            BlobSource::Memory(bytes) => self.fs.write(&target, bytes),
        };
        written.map_err(|source| Error::StorageWrite {
            path: target.clone(),
            source,
        })?;

        let draft = MetadataDraft {
            id: asset_id.clone(),
            asset_type: kind.document_type().to_string(),
            original_filename: resolved.filename,
            size: resolved.size,
            mime_type: resolved.mime_type,
            url: format!("{}/{}", ASSETS_URL_ROOT, file_name),
            title: options.title,
            description: options.description,
            label: options.label,
        };

        match self.backend.create(draft.to_new_document()) {
            Ok(stored) => {
                info!(
                    target: "docstore::assets",
                    id = %asset_id,
                    size = draft.size,
                    mime = %draft.mime_type,
                    "Asset uploaded"
                );
                Ok(draft.into_metadata(&stored))
            }
            Err(e) => {
                if let Err(cleanup) = self.fs.remove_file(&target) {
                    warn!(
                        target: "docstore::assets",
                        path = %target.display(),
                        error = %cleanup,
                        "Failed to remove blob after metadata error"
                    );
                }
                Err(Error::MetadataPersist {
                    asset_id,
                    source: Box::new(e),
                })
            }
        }
    }

    fn resolve_payload<'a>(
        &self,
        payload: &'a AssetPayload,
        options: &UploadOptions,
    ) -> Result<ResolvedPayload<'a>> {
        let (size, source) = match payload {
            AssetPayload::Path(path) => {
                let size = self.fs.regular_file_len(path).ok_or_else(|| {
                    Error::unsupported_payload(format!(
                        "'{}' is not a readable regular file",
                        path.display()
                    ))
                })?;
                (size, BlobSource::File(path.as_path()))
            }
            AssetPayload::Bytes(bytes) | AssetPayload::Blob { bytes, .. } => {
                (bytes.len() as u64, BlobSource::Memory(bytes.as_slice()))
            }
        };

        let filename = options
            .filename
            .clone()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| payload.own_filename())
            .ok_or_else(|| {
                Error::metadata_unavailable(
                    "no filename given in upload options and the payload carries none",
                )
            })?;

        let mime_type = options
            .mime_type
            .clone()
            .filter(|mime| !mime.trim().is_empty())
            .or_else(|| payload.own_mime_type().map(str::to_string))
            .or_else(|| mime_type_for(&filename).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

        Ok(ResolvedPayload {
            filename,
            mime_type,
            size,
            source,
        })
    }
}

impl std::fmt::Debug for AssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetStore")
            .field("directory", &self.directory)
            .finish()
    }
}

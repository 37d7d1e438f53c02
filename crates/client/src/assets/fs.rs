//! Filesystem capability used by asset ingestion
//!
//! Asset code never calls `std::fs` directly; it goes through [`AssetFs`] so
//! tests can inject failures.

use std::fs;
use std::io;
use std::path::Path;

/// Byte-oriented file operations needed to persist asset blobs
pub trait AssetFs: Send + Sync {
    /// Whether `path` exists
    fn exists(&self, path: &Path) -> bool;

    /// Create `path` and all missing parents
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Write `bytes` to `path`, replacing any existing file
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;

    /// Copy the file at `from` to `to`, returning the number of bytes copied
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;

    /// Delete the file at `path`
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Size of `path` if it is a regular file
    fn regular_file_len(&self, path: &Path) -> Option<u64>;
}

/// [`AssetFs`] backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl AssetFs for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        fs::write(path, bytes)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        fs::copy(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn regular_file_len(&self, path: &Path) -> Option<u64> {
        fs::metadata(path)
            .ok()
            .filter(|meta| meta.is_file())
            .map(|meta| meta.len())
    }
}

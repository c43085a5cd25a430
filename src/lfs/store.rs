//! lfs::store
//!
//! Backing store for large-file payloads.
//!
//! The store is keyed by the payload's sha256 and is append-only: putting
//! content that is already present is a no-op. The engine treats any store
//! failure as fatal to the whole change-set.
//!
//! # Storage
//!
//! [`FsLfsStore`] uses the conventional fan-out layout:
//! `<root>/<oid[0..2]>/<oid[2..4]>/<oid>`.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::TreePath;

/// Errors from the large-file backing store.
#[derive(Debug, Error)]
pub enum LfsStoreError {
    /// Payload not present in the store.
    #[error("large file payload not found [oid: {oid}]")]
    NotFound {
        /// The sha256 that was requested
        oid: String,
    },

    /// I/O failure talking to the store.
    #[error("large file store i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Contract for the large-file backing store.
///
/// `put` must be idempotent: storing identical content under the same oid
/// twice is a no-op. Implementations are keyed by {sha256, size}.
pub trait LfsStore {
    /// Register a payload under its sha256.
    fn put(&self, oid: &str, size: u64, content: &[u8]) -> Result<(), LfsStoreError>;

    /// Fetch a payload by sha256.
    fn get(&self, oid: &str) -> Result<Vec<u8>, LfsStoreError>;

    /// Check whether a payload is present.
    fn contains(&self, oid: &str) -> Result<bool, LfsStoreError>;
}

/// Filesystem-backed large-file store.
///
/// # Example
///
/// ```
/// use graftwork::lfs::{FsLfsStore, LfsStore, LfsPointer};
///
/// let dir = tempfile::tempdir().unwrap();
/// let store = FsLfsStore::new(dir.path());
///
/// let ptr = LfsPointer::from_content(b"payload bytes");
/// store.put(&ptr.oid, ptr.size, b"payload bytes").unwrap();
/// assert!(store.contains(&ptr.oid).unwrap());
/// assert_eq!(store.get(&ptr.oid).unwrap(), b"payload bytes");
/// ```
#[derive(Debug)]
pub struct FsLfsStore {
    root: PathBuf,
}

impl FsLfsStore {
    /// Create a store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn payload_path(&self, oid: &str) -> PathBuf {
        if oid.len() >= 4 {
            self.root.join(&oid[0..2]).join(&oid[2..4]).join(oid)
        } else {
            self.root.join(oid)
        }
    }
}

impl LfsStore for FsLfsStore {
    fn put(&self, oid: &str, _size: u64, content: &[u8]) -> Result<(), LfsStoreError> {
        let path = self.payload_path(oid);
        if path.exists() {
            // Content-addressed: identical oid means identical content.
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write-then-rename so a crashed put never leaves a partial payload
        // under the final name.
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn get(&self, oid: &str) -> Result<Vec<u8>, LfsStoreError> {
        let path = self.payload_path(oid);
        match fs::read(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(LfsStoreError::NotFound {
                oid: oid.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn contains(&self, oid: &str) -> Result<bool, LfsStoreError> {
        Ok(self.payload_path(oid).exists())
    }
}

/// Hook notified when a path's large-file tracking status is observed.
///
/// Repository-level bookkeeping lives outside the engine; this hook lets a
/// collaborator record "this path is now tracked/untracked" per change-set.
pub trait TrackingHook {
    /// Called once per created/updated/renamed-to path.
    fn path_resolved(&self, path: &TreePath, tracked: bool);
}

/// A hook that records nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTrackingHook;

impl TrackingHook for NoopTrackingHook {
    fn path_resolved(&self, _path: &TreePath, _tracked: bool) {}
}

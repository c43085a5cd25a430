//! engine::lock
//!
//! Exclusive per-branch lock for change-sets.
//!
//! # Architecture
//!
//! Mutual exclusion is scoped per {repository, branch}: two change-sets
//! targeting different branches of the same repository proceed fully in
//! parallel; two targeting the same branch serialize here. The lock uses
//! OS-level file locking via `fs2`, so it works across processes, and is
//! held only across the snapshot-through-ref-advance window.
//!
//! # Storage
//!
//! - `<git_dir>/graftwork/locks/<branch>.lock` - one lock file per branch
//!   (slashes in branch names are escaped)
//!
//! # Invariants
//!
//! - Lock acquisition is subject to a bounded wait; contention past the
//!   deadline surfaces as [`LockError::Timeout`]
//! - The lock is automatically released on drop (RAII pattern)

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;
use thiserror::Error;

use crate::core::types::BranchName;

/// Poll interval while waiting for a contended lock.
const RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Errors from branch locking.
#[derive(Debug, Error)]
pub enum LockError {
    /// The lock stayed contended past the bounded wait.
    #[error("timed out waiting for branch lock [branch: {branch}]")]
    Timeout {
        /// The contended branch
        branch: BranchName,
    },

    /// Failed to create the lock file or its directory.
    #[error("failed to create lock: {0}")]
    CreateFailed(String),

    /// Failed to acquire the OS lock for a reason other than contention.
    #[error("failed to acquire lock: {0}")]
    AcquireFailed(String),

    /// I/O error during lock operations.
    #[error("lock i/o error: {0}")]
    IoError(#[from] io::Error),
}

/// An exclusive lock on one branch of one repository.
///
/// The lock is released when this guard is dropped (RAII pattern), so it is
/// always released even if the change-set panics.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use graftwork::core::types::BranchName;
/// use graftwork::engine::BranchLock;
///
/// let dir = tempfile::tempdir().unwrap();
/// let branch = BranchName::new("master").unwrap();
///
/// let lock = BranchLock::acquire(dir.path(), &branch, Duration::from_millis(100)).unwrap();
/// assert!(lock.is_held());
/// // released when `lock` goes out of scope
/// ```
#[derive(Debug)]
pub struct BranchLock {
    /// Path to the lock file.
    path: PathBuf,
    /// The open file handle with the lock held. `Some` means held.
    file: Option<File>,
}

impl BranchLock {
    /// Acquire the lock for `branch`, waiting at most `timeout`.
    ///
    /// Lock files live under `locks_dir`, one per branch. The wait polls
    /// the OS lock until the deadline; a clean timeout failure lets the
    /// caller retry the whole change-set.
    ///
    /// # Errors
    ///
    /// - [`LockError::Timeout`] if the lock stays contended past `timeout`
    /// - [`LockError::CreateFailed`] if the lock file cannot be created
    /// - [`LockError::AcquireFailed`] for other OS-level failures
    pub fn acquire(
        locks_dir: &Path,
        branch: &BranchName,
        timeout: Duration,
    ) -> Result<Self, LockError> {
        fs::create_dir_all(locks_dir).map_err(|e| {
            LockError::CreateFailed(format!("cannot create {}: {}", locks_dir.display(), e))
        })?;

        let path = locks_dir.join(Self::lock_file_name(branch));
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                LockError::CreateFailed(format!("cannot open {}: {}", path.display(), e))
            })?;

        let deadline = Instant::now() + timeout;
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    return Ok(Self {
                        path,
                        file: Some(file),
                    })
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    if Instant::now() >= deadline {
                        return Err(LockError::Timeout {
                            branch: branch.clone(),
                        });
                    }
                    thread::sleep(RETRY_INTERVAL);
                }
                Err(e) => return Err(LockError::AcquireFailed(e.to_string())),
            }
        }
    }

    /// Escape a branch name into a flat lock file name.
    fn lock_file_name(branch: &BranchName) -> String {
        format!("{}.lock", branch.as_str().replace('/', "%2F"))
    }

    /// Check if the lock is currently held by this guard.
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    /// Get the path to the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock explicitly.
    ///
    /// Called automatically on drop; use this to release before the guard
    /// goes out of scope.
    pub fn release(&mut self) -> Result<(), LockError> {
        if let Some(file) = self.file.take() {
            file.unlock()
                .map_err(|e| LockError::AcquireFailed(e.to_string()))?;
        }
        Ok(())
    }
}

impl Drop for BranchLock {
    fn drop(&mut self) {
        // Best-effort release on drop
        if let Some(file) = self.file.take() {
            let _ = file.unlock();
        }
    }
}

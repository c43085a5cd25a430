//! engine::error
//!
//! The change-set error taxonomy.
//!
//! Every failure is detected synchronously within the orchestrator and
//! aborts the change-set immediately; nothing is retried internally. Each
//! variant carries enough structured context (path, hashes, branch name)
//! for the caller to build an actionable message. `LockTimeout` and
//! `BranchConcurrentUpdate` are safely retryable by re-running the whole
//! change-set against fresh state.

use thiserror::Error;

use crate::core::types::{BranchName, TreePath};
use crate::git::StoreError;
use crate::lfs::LfsStoreError;

use super::lock::LockError;

/// Errors from applying a change-set.
#[derive(Debug, Error)]
pub enum ChangeError {
    /// A path is empty, escapes the tree root, uses the reserved control
    /// directory, or collides with a directory/file of the other type.
    #[error("path contains a malformed path component [path: {path}]")]
    MalformedPath {
        /// The offending path, as given by the caller
        path: String,
    },

    /// Create target (or rename destination) already exists.
    #[error("repository file already exists [path: {path}]")]
    PathAlreadyExists {
        /// The path that already exists
        path: TreePath,
    },

    /// Update/delete target (or rename source) does not exist.
    #[error("repository file does not exist [path: {path}]")]
    PathNotFound {
        /// The missing path
        path: TreePath,
    },

    /// The caller's expected content hash is stale.
    ///
    /// The caller observed an older version of the file; it must re-read
    /// and resubmit.
    #[error("sha does not match [given: {given}, expected: {expected}]")]
    ContentHashMismatch {
        /// The path being changed
        path: TreePath,
        /// The hash the caller supplied
        given: String,
        /// The hash currently at that path
        expected: String,
    },

    /// Source branch does not exist.
    #[error("branch does not exist [name: {name}]")]
    BranchNotFound {
        /// The missing branch
        name: BranchName,
    },

    /// Target branch already exists but the caller intended to create it.
    #[error("branch already exists [name: {name}]")]
    BranchAlreadyExists {
        /// The conflicting branch
        name: BranchName,
    },

    /// The branch moved between snapshot and ref advance.
    ///
    /// Retryable: re-run the change-set against fresh state.
    #[error("branch moved concurrently [name: {name}, expected: {expected}, actual: {actual}]")]
    BranchConcurrentUpdate {
        /// The branch that moved
        name: BranchName,
        /// The head the change-set was built against
        expected: String,
        /// The head found at advance time
        actual: String,
    },

    /// The resulting tree is identical to the base tree and policy rejects
    /// no-change commits.
    #[error("change-set produced no changes [branch: {branch}]")]
    EmptyCommit {
        /// The target branch
        branch: BranchName,
    },

    /// The large-file backing store rejected a payload. Fatal to the whole
    /// change-set.
    #[error("large file store failure [oid: {oid}]: {source}")]
    LargeFileStoreFailure {
        /// sha256 of the payload
        oid: String,
        /// The underlying store error
        source: LfsStoreError,
    },

    /// The change-set contains no file operations.
    #[error("change-set contains no file operations")]
    NoOperations,

    /// Could not acquire the per-branch lock within the bounded wait.
    ///
    /// Retryable: re-run the change-set.
    #[error("timed out waiting for branch lock [branch: {branch}]")]
    LockTimeout {
        /// The branch whose lock was contended
        branch: BranchName,
    },

    /// The caller's cancellation token fired before the ref advanced.
    #[error("change-set cancelled before completion")]
    Cancelled,

    /// Object store failure (includes `ObjectNotFound`).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Lock infrastructure failure other than timeout.
    #[error("lock error: {0}")]
    Lock(LockError),
}

impl ChangeError {
    /// Whether re-running the change-set against fresh state may succeed
    /// without the caller changing anything.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ChangeError::LockTimeout { .. } | ChangeError::BranchConcurrentUpdate { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TreePath;

    #[test]
    fn message_shapes() {
        let err = ChangeError::PathNotFound {
            path: TreePath::new("README.md").unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "repository file does not exist [path: README.md]"
        );

        let err = ChangeError::PathAlreadyExists {
            path: TreePath::new("README.md").unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "repository file already exists [path: README.md]"
        );

        let err = ChangeError::ContentHashMismatch {
            path: TreePath::new("README.md").unwrap(),
            given: "bad_sha".into(),
            expected: "4b4851ad51df6a7d9f25c979345979eaeb5b349f".into(),
        };
        assert_eq!(
            err.to_string(),
            "sha does not match [given: bad_sha, expected: 4b4851ad51df6a7d9f25c979345979eaeb5b349f]"
        );

        let err = ChangeError::MalformedPath { path: ".git".into() };
        assert_eq!(
            err.to_string(),
            "path contains a malformed path component [path: .git]"
        );

        let err = ChangeError::BranchAlreadyExists {
            name: BranchName::new("develop").unwrap(),
        };
        assert_eq!(err.to_string(), "branch already exists [name: develop]");
    }

    #[test]
    fn retryability() {
        assert!(ChangeError::LockTimeout {
            branch: BranchName::new("master").unwrap()
        }
        .is_retryable());
        assert!(ChangeError::BranchConcurrentUpdate {
            name: BranchName::new("master").unwrap(),
            expected: "a".into(),
            actual: "b".into(),
        }
        .is_retryable());
        assert!(!ChangeError::NoOperations.is_retryable());
        assert!(!ChangeError::Cancelled.is_retryable());
    }
}

//! git::store
//!
//! Object store adapter implemented over git2.
//!
//! The [`ObjectStore`] struct is the only way to interact with the object
//! database. It provides structured results and normalizes errors into typed
//! failure categories.
//!
//! # CAS Semantics
//!
//! The only ref mutation primitive is [`ObjectStore::update_branch_cas`].
//! Updates succeed only if the ref's current value matches an expected value
//! read at the start of the operation. This prevents advancing a branch that
//! has been modified concurrently.
//!
//! # Tree Assembly
//!
//! [`ObjectStore::write_tree`] folds a set of path edits into a base tree.
//! Unaffected subtrees are carried over by hash, never copied; subtrees that
//! become empty are pruned, matching git's no-empty-directories model.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::core::types::{BranchName, FileMode, Identity, Oid, TreePath, TypeError};

/// Errors from object store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No repository at the given path.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Object not found in the store.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The OID that was not found
        oid: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Compare-and-swap precondition failed.
    ///
    /// The ref's current value did not match the expected value. The caller
    /// observed a stale head; nothing was written.
    #[error("CAS failed for {refname}: expected {expected}, found {actual}")]
    CasFailed {
        /// The ref being updated
        refname: String,
        /// The expected old value (`<none>` for create)
        expected: String,
        /// The actual current value (`<none>` if absent)
        actual: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl StoreError {
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => StoreError::ObjectNotFound {
                oid: context.to_string(),
            },
            git2::ErrorCode::InvalidSpec => StoreError::InvalidOid {
                oid: context.to_string(),
            },
            _ => StoreError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<git2::Error> for StoreError {
    fn from(err: git2::Error) -> Self {
        StoreError::Internal {
            message: err.message().to_string(),
        }
    }
}

impl From<TypeError> for StoreError {
    fn from(err: TypeError) -> Self {
        StoreError::InvalidOid {
            oid: err.to_string(),
        }
    }
}

/// Kind of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A file (blob) entry.
    Blob,
    /// A directory (subtree) entry.
    Tree,
}

/// A resolved tree entry.
#[derive(Debug, Clone)]
pub struct TreeEntryInfo {
    /// Content hash of the entry.
    pub id: Oid,
    /// Entry mode (meaningful for blobs).
    pub mode: FileMode,
    /// Blob or subtree.
    pub kind: EntryKind,
}

/// A blob reference staged for inclusion in a tree.
///
/// This is the value side of a tree edit: the content hash plus the mode the
/// entry should carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRef {
    /// Content hash of the blob.
    pub id: Oid,
    /// Mode for the tree entry.
    pub mode: FileMode,
}

/// An author or committer signature with its timestamp.
#[derive(Debug, Clone)]
pub struct CommitSignature {
    /// Who.
    pub identity: Identity,
    /// When, in UTC.
    pub when: DateTime<Utc>,
}

impl CommitSignature {
    /// Create a signature stamped with the current time.
    pub fn now(identity: Identity) -> Self {
        Self {
            identity,
            when: Utc::now(),
        }
    }
}

/// Metadata of a commit object.
#[derive(Debug, Clone)]
pub struct CommitInfo {
    /// The commit OID.
    pub oid: Oid,
    /// Full commit message.
    pub message: String,
    /// Author identity.
    pub author: Identity,
    /// Author timestamp.
    pub author_time: DateTime<Utc>,
    /// Committer identity.
    pub committer: Identity,
    /// Committer timestamp.
    pub committer_time: DateTime<Utc>,
    /// Parent commit OIDs (empty for root commits).
    pub parents: Vec<Oid>,
    /// The tree the commit points at.
    pub tree: Oid,
}

/// The object store interface.
///
/// This is the **single point of interaction** with the object database.
/// All reads and writes flow through this interface.
///
/// # Example
///
/// ```ignore
/// use graftwork::git::ObjectStore;
/// use std::path::Path;
///
/// let store = ObjectStore::open(Path::new("/srv/repos/demo.git"))?;
/// let head = store.branch_head(&branch)?;
/// ```
pub struct ObjectStore {
    /// The underlying git2 repository.
    repo: git2::Repository,
}

impl std::fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStore")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl ObjectStore {
    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Open the object store of the repository at `path`.
    ///
    /// Works for both bare and non-bare repositories; the engine never
    /// touches a working directory or index.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotARepo`] if no repository is found
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let repo = git2::Repository::discover(path).map_err(|_| StoreError::NotARepo {
            path: path.to_path_buf(),
        })?;

        Ok(Self { repo })
    }

    /// Path to the repository's git directory.
    ///
    /// Used by the engine to place its lock files.
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    /// Check whether the repository has no commits at all (unborn HEAD).
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.repo.is_empty().map_err(StoreError::from)
    }

    /// The branch HEAD points at, even when unborn.
    ///
    /// Returns `None` for detached HEAD.
    pub fn default_branch(&self) -> Result<Option<BranchName>, StoreError> {
        let head = self
            .repo
            .find_reference("HEAD")
            .map_err(|e| StoreError::from_git2(e, "HEAD"))?;

        match head.symbolic_target() {
            Some(target) => match target.strip_prefix("refs/heads/") {
                Some(name) => Ok(BranchName::new(name).ok()),
                None => Ok(None),
            },
            None => Ok(None),
        }
    }

    // =========================================================================
    // Branch Head Resolution
    // =========================================================================

    /// Resolve a branch to its head commit OID.
    ///
    /// Returns `None` if the branch does not exist.
    pub fn branch_head(&self, branch: &BranchName) -> Result<Option<Oid>, StoreError> {
        let refname = branch.to_refname();
        match self.repo.find_reference(&refname) {
            Ok(reference) => {
                let commit = reference
                    .peel_to_commit()
                    .map_err(|e| StoreError::from_git2(e, &refname))?;
                Ok(Some(Oid::new(commit.id().to_string())?))
            }
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(StoreError::from_git2(e, &refname)),
        }
    }

    /// Check whether a branch exists.
    pub fn branch_exists(&self, branch: &BranchName) -> Result<bool, StoreError> {
        Ok(self.branch_head(branch)?.is_some())
    }

    // =========================================================================
    // Object Reads
    // =========================================================================

    /// The tree OID a commit points at.
    pub fn commit_tree(&self, commit: &Oid) -> Result<Oid, StoreError> {
        let commit = self.find_commit(commit)?;
        Ok(Oid::new(commit.tree_id().to_string())?)
    }

    /// Look up the entry at `path` within the tree `tree`.
    ///
    /// Returns `None` if no entry exists at that path.
    pub fn tree_entry(
        &self,
        tree: &Oid,
        path: &TreePath,
    ) -> Result<Option<TreeEntryInfo>, StoreError> {
        let git_tree = self.find_tree(tree)?;
        match git_tree.get_path(Path::new(path.as_str())) {
            Ok(entry) => {
                let kind = match entry.kind() {
                    Some(git2::ObjectType::Tree) => EntryKind::Tree,
                    _ => EntryKind::Blob,
                };
                Ok(Some(TreeEntryInfo {
                    id: Oid::new(entry.id().to_string())?,
                    mode: FileMode::from_raw(entry.filemode()),
                    kind,
                }))
            }
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(StoreError::from_git2(e, path.as_str())),
        }
    }

    /// All blob paths under the directory `dir` within `tree`.
    ///
    /// Returns full paths relative to the tree root. Empty when `dir` does
    /// not name a subtree.
    pub fn tree_files_under(
        &self,
        tree: &Oid,
        dir: &TreePath,
    ) -> Result<Vec<String>, StoreError> {
        let git_tree = self.find_tree(tree)?;
        let sub = match git_tree.get_path(Path::new(dir.as_str())) {
            Ok(entry) if entry.kind() == Some(git2::ObjectType::Tree) => self
                .repo
                .find_tree(entry.id())
                .map_err(|e| StoreError::Internal {
                    message: e.message().to_string(),
                })?,
            Ok(_) => return Ok(Vec::new()),
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::from_git2(e, dir.as_str())),
        };

        let mut files = Vec::new();
        sub.walk(git2::TreeWalkMode::PreOrder, |parent, entry| {
            if entry.kind() == Some(git2::ObjectType::Blob) {
                if let Some(name) = entry.name() {
                    // `parent` is "" at the subtree root, otherwise ends
                    // with a slash.
                    files.push(format!("{}/{}{}", dir.as_str(), parent, name));
                }
            }
            git2::TreeWalkResult::Ok
        })
        .map_err(|e| StoreError::Internal {
            message: e.message().to_string(),
        })?;

        Ok(files)
    }

    /// Read a blob's content by OID.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ObjectNotFound`] if the blob doesn't exist
    pub fn read_blob(&self, oid: &Oid) -> Result<Vec<u8>, StoreError> {
        let git_oid = self.parse_oid(oid)?;
        let blob = self
            .repo
            .find_blob(git_oid)
            .map_err(|e| StoreError::from_git2(e, oid.as_str()))?;
        Ok(blob.content().to_vec())
    }

    /// Size of a blob in bytes.
    pub fn blob_size(&self, oid: &Oid) -> Result<u64, StoreError> {
        let git_oid = self.parse_oid(oid)?;
        let blob = self
            .repo
            .find_blob(git_oid)
            .map_err(|e| StoreError::from_git2(e, oid.as_str()))?;
        Ok(blob.size() as u64)
    }

    // =========================================================================
    // Object Writes (append-only)
    // =========================================================================

    /// Write content as a blob and return its OID.
    ///
    /// Idempotent: identical bytes always yield the identical hash, and
    /// writing existing content is a no-op at the storage level.
    pub fn write_blob(&self, content: &[u8]) -> Result<Oid, StoreError> {
        let oid = self.repo.blob(content).map_err(|e| StoreError::Internal {
            message: e.message().to_string(),
        })?;
        Ok(Oid::new(oid.to_string())?)
    }

    /// Fold a set of path edits into `base`, returning the new tree OID.
    ///
    /// `edits` maps each touched path to either a staged blob (`Some`) or a
    /// tombstone (`None`, delete). `base` of `None` starts from an empty
    /// tree. Unaffected subtrees are reused by hash; subtrees left empty by
    /// deletions are pruned.
    pub fn write_tree(
        &self,
        base: Option<&Oid>,
        edits: &BTreeMap<TreePath, Option<BlobRef>>,
    ) -> Result<Oid, StoreError> {
        let base_tree = match base {
            Some(oid) => Some(self.find_tree(oid)?),
            None => None,
        };

        let edit_list: Vec<(Vec<&str>, Option<&BlobRef>)> = edits
            .iter()
            .map(|(path, entry)| (path.components().collect(), entry.as_ref()))
            .collect();
        let edit_refs: Vec<(&[&str], Option<&BlobRef>)> = edit_list
            .iter()
            .map(|(comps, entry)| (comps.as_slice(), *entry))
            .collect();

        let oid = self.build_tree(base_tree.as_ref(), &edit_refs)?;
        Ok(Oid::new(oid.to_string())?)
    }

    /// Recursive tree assembly: apply the edits at one directory level,
    /// recursing into subdirectories that have pending edits.
    fn build_tree(
        &self,
        base: Option<&git2::Tree<'_>>,
        edits: &[(&[&str], Option<&BlobRef>)],
    ) -> Result<git2::Oid, StoreError> {
        let mut builder = self.repo.treebuilder(base).map_err(|e| StoreError::Internal {
            message: e.message().to_string(),
        })?;

        // Edits addressing a subdirectory, grouped by the leading component.
        let mut subdirs: BTreeMap<&str, Vec<(&[&str], Option<&BlobRef>)>> = BTreeMap::new();

        for &(components, entry) in edits {
            match components {
                [leaf] => match entry {
                    Some(blob) => {
                        let oid = self.parse_oid(&blob.id)?;
                        builder
                            .insert(*leaf, oid, blob.mode.as_raw())
                            .map_err(|e| StoreError::from_git2(e, leaf))?;
                    }
                    None => {
                        let present = builder
                            .get(*leaf)
                            .map_err(|e| StoreError::from_git2(e, leaf))?
                            .is_some();
                        if present {
                            builder
                                .remove(*leaf)
                                .map_err(|e| StoreError::from_git2(e, leaf))?;
                        }
                    }
                },
                [dir, rest @ ..] => {
                    subdirs.entry(*dir).or_default().push((rest, entry));
                }
                [] => {}
            }
        }

        for (name, sub_edits) in subdirs {
            let sub_base_id = {
                let existing = builder
                    .get(name)
                    .map_err(|e| StoreError::from_git2(e, name))?;
                match existing {
                    Some(entry) if entry.kind() == Some(git2::ObjectType::Tree) => {
                        Some(entry.id())
                    }
                    _ => None,
                }
            };
            let sub_base = match sub_base_id {
                Some(id) => Some(self.repo.find_tree(id).map_err(|e| StoreError::Internal {
                    message: e.message().to_string(),
                })?),
                None => None,
            };

            let sub_id = self.build_tree(sub_base.as_ref(), &sub_edits)?;
            let sub_tree = self.repo.find_tree(sub_id).map_err(|e| StoreError::Internal {
                message: e.message().to_string(),
            })?;

            if sub_tree.is_empty() {
                // Prune only an actual subtree entry: a leaf edit in this
                // same batch may have put a blob at the emptied name.
                let present_tree = builder
                    .get(name)
                    .map_err(|e| StoreError::from_git2(e, name))?
                    .map(|entry| entry.kind() == Some(git2::ObjectType::Tree))
                    .unwrap_or(false);
                if present_tree {
                    builder
                        .remove(name)
                        .map_err(|e| StoreError::from_git2(e, name))?;
                }
            } else {
                builder
                    .insert(name, sub_id, 0o040000)
                    .map_err(|e| StoreError::from_git2(e, name))?;
            }
        }

        builder.write().map_err(|e| StoreError::Internal {
            message: e.message().to_string(),
        })
    }

    /// Create a commit object and return its OID.
    ///
    /// The commit is written to the object database only; no ref moves. Use
    /// [`ObjectStore::update_branch_cas`] to advance a branch afterwards.
    pub fn write_commit(
        &self,
        tree: &Oid,
        parents: &[Oid],
        author: &CommitSignature,
        committer: &CommitSignature,
        message: &str,
    ) -> Result<Oid, StoreError> {
        let git_tree = self.find_tree(tree)?;

        let mut parent_commits = Vec::with_capacity(parents.len());
        for parent in parents {
            parent_commits.push(self.find_commit(parent)?);
        }
        let parent_refs: Vec<&git2::Commit<'_>> = parent_commits.iter().collect();

        let author_sig = Self::signature(author)?;
        let committer_sig = Self::signature(committer)?;

        let oid = self
            .repo
            .commit(None, &author_sig, &committer_sig, message, &git_tree, &parent_refs)
            .map_err(|e| StoreError::Internal {
                message: e.message().to_string(),
            })?;

        Ok(Oid::new(oid.to_string())?)
    }

    // =========================================================================
    // CAS Ref Operations
    // =========================================================================

    /// Advance a branch ref with compare-and-swap semantics.
    ///
    /// The update only succeeds if the ref's current value matches
    /// `expected_old`. If `expected_old` is `None`, the ref must not exist
    /// (branch creation case).
    ///
    /// # Errors
    ///
    /// - [`StoreError::CasFailed`] if the current value doesn't match
    pub fn update_branch_cas(
        &self,
        branch: &BranchName,
        new_oid: &Oid,
        expected_old: Option<&Oid>,
    ) -> Result<(), StoreError> {
        let refname = branch.to_refname();
        let current = self.try_resolve_ref_raw(&refname)?;

        match (expected_old, current.as_ref()) {
            (Some(expected), Some(actual)) if expected.as_str() != actual => {
                return Err(StoreError::CasFailed {
                    refname,
                    expected: expected.to_string(),
                    actual: actual.clone(),
                });
            }
            (Some(expected), None) => {
                return Err(StoreError::CasFailed {
                    refname,
                    expected: expected.to_string(),
                    actual: "<none>".to_string(),
                });
            }
            (None, Some(actual)) => {
                return Err(StoreError::CasFailed {
                    refname,
                    expected: "<none>".to_string(),
                    actual: actual.clone(),
                });
            }
            _ => {} // Precondition satisfied
        }

        let oid = self.parse_oid(new_oid)?;
        self.repo
            .reference(&refname, oid, true, "graftwork: change-set commit")
            .map_err(|e| StoreError::from_git2(e, &refname))?;

        Ok(())
    }

    /// Resolve a ref to its raw OID string, `None` if absent.
    fn try_resolve_ref_raw(&self, refname: &str) -> Result<Option<String>, StoreError> {
        match self.repo.find_reference(refname) {
            Ok(reference) => {
                let resolved = reference.resolve().unwrap_or(reference);
                let oid = resolved.target().ok_or_else(|| StoreError::Internal {
                    message: format!("ref {} has no target", refname),
                })?;
                Ok(Some(oid.to_string()))
            }
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(StoreError::from_git2(e, refname)),
        }
    }

    // =========================================================================
    // Commit Metadata
    // =========================================================================

    /// Read back the metadata of a commit object.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ObjectNotFound`] if the commit doesn't exist
    pub fn commit_info(&self, oid: &Oid) -> Result<CommitInfo, StoreError> {
        let commit = self.find_commit(oid)?;

        let author = commit.author();
        let committer = commit.committer();

        let mut parents = Vec::new();
        for parent in commit.parents() {
            parents.push(Oid::new(parent.id().to_string())?);
        }

        Ok(CommitInfo {
            oid: oid.clone(),
            message: commit.message().unwrap_or("").to_string(),
            author: Identity::new(author.name().unwrap_or(""), author.email().unwrap_or("")),
            author_time: Self::signature_time(&author),
            committer: Identity::new(
                committer.name().unwrap_or(""),
                committer.email().unwrap_or(""),
            ),
            committer_time: Self::signature_time(&committer),
            parents,
            tree: Oid::new(commit.tree_id().to_string())?,
        })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn parse_oid(&self, oid: &Oid) -> Result<git2::Oid, StoreError> {
        git2::Oid::from_str(oid.as_str()).map_err(|e| StoreError::from_git2(e, oid.as_str()))
    }

    fn find_commit(&self, oid: &Oid) -> Result<git2::Commit<'_>, StoreError> {
        let git_oid = self.parse_oid(oid)?;
        self.repo
            .find_commit(git_oid)
            .map_err(|e| StoreError::from_git2(e, oid.as_str()))
    }

    fn find_tree(&self, oid: &Oid) -> Result<git2::Tree<'_>, StoreError> {
        let git_oid = self.parse_oid(oid)?;
        self.repo
            .find_tree(git_oid)
            .map_err(|e| StoreError::from_git2(e, oid.as_str()))
    }

    fn signature(sig: &CommitSignature) -> Result<git2::Signature<'static>, StoreError> {
        let time = git2::Time::new(sig.when.timestamp(), 0);
        git2::Signature::new(&sig.identity.name, &sig.identity.email, &time).map_err(|e| {
            StoreError::Internal {
                message: e.message().to_string(),
            }
        })
    }

    fn signature_time(sig: &git2::Signature<'_>) -> DateTime<Utc> {
        DateTime::from_timestamp(sig.when().seconds(), 0)
            .unwrap_or(DateTime::UNIX_EPOCH)
            .with_timezone(&Utc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_test_store(dir: &Path) -> ObjectStore {
        let status = std::process::Command::new("git")
            .args(["init", "-q"])
            .current_dir(dir)
            .status()
            .expect("git init");
        assert!(status.success());
        ObjectStore::open(dir).unwrap()
    }

    #[test]
    fn identical_blob_writes_yield_identical_oid() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_test_store(dir.path());

        let first = store.write_blob(b"same bytes").unwrap();
        let second = store.write_blob(b"same bytes").unwrap();
        assert_eq!(first, second);

        let other = store.write_blob(b"different bytes").unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn emptied_subtree_does_not_clobber_leaf_edit_at_same_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_test_store(dir.path());

        let blob_id = store.write_blob(b"content").unwrap();
        let mut seed = BTreeMap::new();
        seed.insert(
            TreePath::new("a/b.txt").unwrap(),
            Some(BlobRef {
                id: blob_id.clone(),
                mode: FileMode::Blob,
            }),
        );
        let base = store.write_tree(None, &seed).unwrap();

        // Tombstone the subtree's only file and put a blob at its name.
        let mut edits = BTreeMap::new();
        edits.insert(TreePath::new("a/b.txt").unwrap(), None);
        edits.insert(
            TreePath::new("a").unwrap(),
            Some(BlobRef {
                id: blob_id.clone(),
                mode: FileMode::Blob,
            }),
        );
        let tree = store.write_tree(Some(&base), &edits).unwrap();

        let entry = store
            .tree_entry(&tree, &TreePath::new("a").unwrap())
            .unwrap()
            .expect("blob survives the pruned subtree");
        assert_eq!(entry.kind, EntryKind::Blob);
        assert_eq!(entry.id, blob_id);
    }

    #[test]
    fn tree_files_under_lists_nested_blobs() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_test_store(dir.path());

        let blob_id = store.write_blob(b"content").unwrap();
        let mut seed = BTreeMap::new();
        for p in ["a/b.txt", "a/sub/c.txt", "top.txt"] {
            seed.insert(
                TreePath::new(p).unwrap(),
                Some(BlobRef {
                    id: blob_id.clone(),
                    mode: FileMode::Blob,
                }),
            );
        }
        let tree = store.write_tree(None, &seed).unwrap();

        let mut files = store
            .tree_files_under(&tree, &TreePath::new("a").unwrap())
            .unwrap();
        files.sort();
        assert_eq!(files, vec!["a/b.txt", "a/sub/c.txt"]);

        assert!(store
            .tree_files_under(&tree, &TreePath::new("top.txt").unwrap())
            .unwrap()
            .is_empty());
        assert!(store
            .tree_files_under(&tree, &TreePath::new("missing").unwrap())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn error_display_formatting() {
        let err = StoreError::CasFailed {
            refname: "refs/heads/master".to_string(),
            expected: "abc".to_string(),
            actual: "def".to_string(),
        };
        assert!(err.to_string().contains("CAS failed"));
        assert!(err.to_string().contains("refs/heads/master"));

        let err = StoreError::ObjectNotFound {
            oid: "abc123".to_string(),
        };
        assert!(err.to_string().contains("abc123"));
    }

    #[test]
    fn blob_ref_equality() {
        let a = BlobRef {
            id: Oid::new("a".repeat(40)).unwrap(),
            mode: FileMode::Blob,
        };
        let b = a.clone();
        assert_eq!(a, b);
    }
}

//! engine::changeset
//!
//! The change-set orchestrator.
//!
//! # Architecture
//!
//! [`ChangeEngine::change_files`] is the single entry point for mutating a
//! branch. It validates the request, serializes on the per-branch lock,
//! snapshots the base tree, folds every file operation through the staged
//! index (resolving large-file pointers on the way), writes the commit, and
//! advances the branch ref with compare-and-swap.
//!
//! # Error Handling
//!
//! The first failing operation aborts the whole change-set. Failures after
//! lock acquisition release the lock on the way out (RAII guard); no branch
//! ref is ever advanced on failure. Objects written before an abort stay in
//! the store as unreachable garbage, which is harmless because the store is
//! content-addressed and append-only.

use crate::core::config::{EmptyCommitPolicy, EngineConfig};
use crate::core::types::{FileMode, Identity, TreePath};
use crate::git::{BlobRef, CommitSignature, ObjectStore, StoreError};
use crate::lfs::{AttributeRules, LfsPointer, LfsStore, TrackingHook};
use crate::response::{self, ChangeSetResult};

use super::error::ChangeError;
use super::index::StagedIndex;
use super::lock::{BranchLock, LockError};
use super::options::{ChangeSetOptions, FileOperation, OperationKind};

/// The change-set engine for one repository.
///
/// Borrows its collaborators: the object store, the large-file backing
/// store, the tracking rules, and the tracking-status hook. One engine
/// value can serve many change-sets; concurrency is handled per branch by
/// the lock inside [`ChangeEngine::change_files`].
pub struct ChangeEngine<'a> {
    store: &'a ObjectStore,
    lfs: &'a dyn LfsStore,
    rules: &'a AttributeRules,
    hook: &'a dyn TrackingHook,
    config: EngineConfig,
}

impl<'a> ChangeEngine<'a> {
    /// Create an engine over the given collaborators.
    pub fn new(
        store: &'a ObjectStore,
        lfs: &'a dyn LfsStore,
        rules: &'a AttributeRules,
        hook: &'a dyn TrackingHook,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            lfs,
            rules,
            hook,
            config,
        }
    }

    /// Apply a change-set on behalf of `doer` and return the result.
    ///
    /// See the module documentation for the state machine. On success the
    /// target branch points at the new commit; on any error the repository
    /// is observably unchanged.
    pub fn change_files(
        &self,
        doer: &Identity,
        opts: &ChangeSetOptions,
    ) -> Result<ChangeSetResult, ChangeError> {
        // --- Step 1: validate -------------------------------------------------
        if opts.files.is_empty() {
            return Err(ChangeError::NoOperations);
        }

        let default_branch = self.store.default_branch()?;
        let old_branch = match opts.old_branch.clone().or_else(|| default_branch.clone()) {
            Some(branch) => branch,
            None => {
                return Err(ChangeError::Store(StoreError::Internal {
                    message: "repository has no default branch".to_string(),
                }))
            }
        };
        let new_branch = opts.new_branch.clone().unwrap_or_else(|| old_branch.clone());
        let creating_branch = new_branch != old_branch;

        let author = opts.author.clone().unwrap_or_else(|| doer.clone());
        let committer = opts.committer.clone().unwrap_or_else(|| doer.clone());

        // --- Step 2: acquire per-{repository, branch} serialization ----------
        let locks_dir = self.store.git_dir().join("graftwork").join("locks");
        let _lock = BranchLock::acquire(&locks_dir, &new_branch, self.config.lock_timeout)
            .map_err(|e| match e {
                LockError::Timeout { branch } => ChangeError::LockTimeout { branch },
                other => ChangeError::Lock(other),
            })?;

        // --- Step 3: snapshot base (under lock) -------------------------------
        let base_head = match self.store.branch_head(&old_branch)? {
            Some(head) => Some(head),
            None => {
                // An unborn default branch is a valid empty base; anything
                // else is a missing source branch.
                let unborn_default =
                    self.store.is_empty()? && default_branch.as_ref() == Some(&old_branch);
                if unborn_default {
                    None
                } else {
                    return Err(ChangeError::BranchNotFound { name: old_branch });
                }
            }
        };

        if creating_branch && self.store.branch_exists(&new_branch)? {
            return Err(ChangeError::BranchAlreadyExists { name: new_branch });
        }

        if let Some(expected) = &opts.last_known_commit {
            if base_head.as_ref() != Some(expected) {
                return Err(ChangeError::BranchConcurrentUpdate {
                    name: old_branch,
                    expected: expected.to_string(),
                    actual: base_head
                        .as_ref()
                        .map(|oid| oid.to_string())
                        .unwrap_or_else(|| "<none>".to_string()),
                });
            }
        }

        let base_tree = match &base_head {
            Some(head) => Some(self.store.commit_tree(head)?),
            None => None,
        };

        // --- Step 4: apply operations in order --------------------------------
        let mut index = StagedIndex::new(base_tree.clone());
        let mut touched: Vec<Option<TreePath>> = Vec::with_capacity(opts.files.len());
        for op in &opts.files {
            check_cancelled(opts)?;
            touched.push(self.apply_operation(&mut index, op)?);
        }

        // --- Step 5: commit ----------------------------------------------------
        let new_tree = index.write_tree(self.store)?;
        if base_tree.as_ref() == Some(&new_tree)
            && self.config.empty_commit == EmptyCommitPolicy::Reject
        {
            return Err(ChangeError::EmptyCommit { branch: new_branch });
        }

        let message = normalize_message(&opts.message);
        let author_sig = CommitSignature::now(author);
        let committer_sig = CommitSignature::now(committer);
        let parents: Vec<_> = base_head.iter().cloned().collect();
        let new_commit =
            self.store
                .write_commit(&new_tree, &parents, &author_sig, &committer_sig, &message)?;

        // --- Step 6: advance ref (CAS) -----------------------------------------
        check_cancelled(opts)?;
        let expected_old = if creating_branch {
            None
        } else {
            base_head.as_ref()
        };
        self.store
            .update_branch_cas(&new_branch, &new_commit, expected_old)
            .map_err(|e| match e {
                StoreError::CasFailed {
                    expected, actual, ..
                } => ChangeError::BranchConcurrentUpdate {
                    name: new_branch.clone(),
                    expected,
                    actual,
                },
                other => ChangeError::Store(other),
            })?;

        // --- Step 7: release lock (drop), assemble response --------------------
        drop(_lock);
        let info = self.store.commit_info(&new_commit)?;
        let result =
            response::assemble(self.store, &self.config, &new_branch, &info, &touched, self.rules)?;
        Ok(result)
    }

    /// Apply one file operation to the staged index.
    ///
    /// Returns the surviving path for the response slot (`None` for
    /// deletes).
    fn apply_operation(
        &self,
        index: &mut StagedIndex,
        op: &FileOperation,
    ) -> Result<Option<TreePath>, ChangeError> {
        match op.kind {
            OperationKind::Create => self.apply_create(index, op).map(Some),
            OperationKind::Update => self.apply_update(index, op).map(Some),
            OperationKind::Delete => self.apply_delete(index, op).map(|_| None),
            OperationKind::Rename => self.apply_rename(index, op).map(Some),
        }
    }

    fn apply_create(
        &self,
        index: &mut StagedIndex,
        op: &FileOperation,
    ) -> Result<TreePath, ChangeError> {
        let path = sanitize(&op.path)?;

        if index.lookup(self.store, &path)?.is_some() {
            return Err(ChangeError::PathAlreadyExists { path });
        }
        self.check_type_collisions(index, &path)?;

        let content = op.content.as_deref().unwrap_or_default();
        let blob = self.resolve_content(&path, content, FileMode::Blob)?;
        index.stage(path.clone(), blob);
        Ok(path)
    }

    fn apply_update(
        &self,
        index: &mut StagedIndex,
        op: &FileOperation,
    ) -> Result<TreePath, ChangeError> {
        let path = sanitize(&op.path)?;

        let current = index
            .lookup(self.store, &path)?
            .ok_or_else(|| ChangeError::PathNotFound { path: path.clone() })?;
        check_expected_sha(&path, op.expected_sha.as_deref(), &current)?;

        let content = op.content.as_deref().unwrap_or_default();
        let blob = self.resolve_content(&path, content, current.mode)?;
        index.stage(path.clone(), blob);
        Ok(path)
    }

    fn apply_delete(
        &self,
        index: &mut StagedIndex,
        op: &FileOperation,
    ) -> Result<(), ChangeError> {
        let path = sanitize(&op.path)?;

        let current = index
            .lookup(self.store, &path)?
            .ok_or_else(|| ChangeError::PathNotFound { path: path.clone() })?;
        check_expected_sha(&path, op.expected_sha.as_deref(), &current)?;

        index.remove(path);
        Ok(())
    }

    fn apply_rename(
        &self,
        index: &mut StagedIndex,
        op: &FileOperation,
    ) -> Result<TreePath, ChangeError> {
        let to = sanitize(&op.path)?;
        let from = match &op.from_path {
            Some(raw) => sanitize(raw)?,
            None => {
                return Err(ChangeError::MalformedPath {
                    path: String::new(),
                })
            }
        };

        let source = index
            .lookup(self.store, &from)?
            .ok_or_else(|| ChangeError::PathNotFound { path: from.clone() })?;
        check_expected_sha(&from, op.expected_sha.as_deref(), &source)?;

        // A destination equal to the source, exactly or up to letter case,
        // is a pure case rename; the "already exists" check would only be
        // seeing the source itself. An exact-equal rename without new
        // content nets out to no change, subject to the empty-commit policy.
        let case_rename = from.eq_ignore_case(&to);
        if !case_rename {
            if index.lookup(self.store, &to)?.is_some() {
                return Err(ChangeError::PathAlreadyExists { path: to });
            }
            self.check_type_collisions(index, &to)?;
        }

        let staged = match &op.content {
            // Rename with new content behaves like an update at the
            // destination.
            Some(content) => self.resolve_content(&to, content, source.mode)?,
            None => self.carry_content(&from, &to, &source)?,
        };

        index.remove(from);
        index.stage(to.clone(), staged);
        Ok(to)
    }

    /// Resolve raw content for a created/updated path: plain blob, or LFS
    /// pointer substitution when the path is tracked.
    fn resolve_content(
        &self,
        path: &TreePath,
        content: &[u8],
        mode: FileMode,
    ) -> Result<BlobRef, ChangeError> {
        let tracked = self.rules.is_tracked(path);
        self.hook.path_resolved(path, tracked);

        let id = if tracked {
            let pointer = LfsPointer::from_content(content);
            self.lfs
                .put(&pointer.oid, pointer.size, content)
                .map_err(|e| ChangeError::LargeFileStoreFailure {
                    oid: pointer.oid.clone(),
                    source: e,
                })?;
            self.store.write_blob(pointer.render().as_bytes())?
        } else {
            self.store.write_blob(content)?
        };

        Ok(BlobRef { id, mode })
    }

    /// Carry a renamed file's content to its destination, re-resolving when
    /// the rename crosses the tracked/untracked boundary.
    fn carry_content(
        &self,
        from: &TreePath,
        to: &TreePath,
        source: &BlobRef,
    ) -> Result<BlobRef, ChangeError> {
        let from_tracked = self.rules.is_tracked(from);
        let to_tracked = self.rules.is_tracked(to);

        if from_tracked == to_tracked {
            // Same side of the boundary: carry the hash forward verbatim.
            // For tracked paths this moves the pointer without re-hashing.
            self.hook.path_resolved(to, to_tracked);
            return Ok(source.clone());
        }

        if from_tracked {
            // Pointer -> raw: decode the pointer and inline the payload.
            let pointer_blob = self.store.read_blob(&source.id)?;
            match LfsPointer::parse(&pointer_blob) {
                Some(pointer) => {
                    let payload = self.lfs.get(&pointer.oid).map_err(|e| {
                        ChangeError::LargeFileStoreFailure {
                            oid: pointer.oid.clone(),
                            source: e,
                        }
                    })?;
                    self.hook.path_resolved(to, false);
                    let id = self.store.write_blob(&payload)?;
                    Ok(BlobRef {
                        id,
                        mode: source.mode,
                    })
                }
                // Tracked path holding a non-pointer blob: nothing to
                // decode, carry it as-is.
                None => {
                    self.hook.path_resolved(to, false);
                    Ok(source.clone())
                }
            }
        } else {
            // Raw -> pointer: wrap the existing payload.
            let payload = self.store.read_blob(&source.id)?;
            self.resolve_content(to, &payload, source.mode)
        }
    }

    /// Reject directory/file type collisions at `path` in the merged view.
    fn check_type_collisions(
        &self,
        index: &StagedIndex,
        path: &TreePath,
    ) -> Result<(), ChangeError> {
        // A directory already occupies the path itself.
        if index.is_dir(self.store, path)? {
            return Err(ChangeError::MalformedPath {
                path: path.to_string(),
            });
        }
        // A file occupies one of the ancestor directories.
        for ancestor in path.ancestors() {
            if index.lookup(self.store, &ancestor)?.is_some() {
                return Err(ChangeError::MalformedPath {
                    path: path.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Validate a raw path into a `TreePath`.
fn sanitize(raw: &str) -> Result<TreePath, ChangeError> {
    TreePath::new(raw).map_err(|_| ChangeError::MalformedPath {
        path: raw.to_string(),
    })
}

/// Compare the caller's expected hash against the current entry.
fn check_expected_sha(
    path: &TreePath,
    expected: Option<&str>,
    current: &BlobRef,
) -> Result<(), ChangeError> {
    if let Some(given) = expected {
        if !given.eq_ignore_ascii_case(current.id.as_str()) {
            return Err(ChangeError::ContentHashMismatch {
                path: path.clone(),
                given: given.to_string(),
                expected: current.id.to_string(),
            });
        }
    }
    Ok(())
}

/// Commit messages always end with a newline.
fn normalize_message(message: &str) -> String {
    if message.ends_with('\n') {
        message.to_string()
    } else {
        format!("{message}\n")
    }
}

fn check_cancelled(opts: &ChangeSetOptions) -> Result<(), ChangeError> {
    match &opts.cancel {
        Some(token) if token.is_cancelled() => Err(ChangeError::Cancelled),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_message_appends_newline() {
        assert_eq!(normalize_message("Creates file"), "Creates file\n");
        assert_eq!(normalize_message("Already has one\n"), "Already has one\n");
        assert_eq!(normalize_message(""), "\n");
    }

    #[test]
    fn sanitize_rejects_reserved_paths() {
        assert!(matches!(
            sanitize(".git"),
            Err(ChangeError::MalformedPath { .. })
        ));
        assert!(matches!(
            sanitize(""),
            Err(ChangeError::MalformedPath { .. })
        ));
        assert!(sanitize("a/b.txt").is_ok());
    }

    #[test]
    fn expected_sha_comparison_ignores_case() {
        let path = TreePath::new("README.md").unwrap();
        let current = BlobRef {
            id: crate::core::types::Oid::new("a".repeat(40)).unwrap(),
            mode: FileMode::Blob,
        };
        assert!(check_expected_sha(&path, Some(&"A".repeat(40)), &current).is_ok());
        assert!(check_expected_sha(&path, None, &current).is_ok());
        assert!(matches!(
            check_expected_sha(&path, Some("bad_sha"), &current),
            Err(ChangeError::ContentHashMismatch { .. })
        ));
    }
}

//! engine::options
//!
//! The change-set request structures.
//!
//! A [`ChangeSetOptions`] describes one batch of file operations against a
//! branch: the ordered operations themselves, the source/target branches,
//! the commit message, and optional author/committer identities. Paths are
//! carried as raw strings and validated by the orchestrator so that
//! malformed input surfaces as a typed `MalformedPath` error rather than a
//! construction panic at the call site.

use serde::{Deserialize, Serialize};

use crate::core::types::{BranchName, Identity, Oid};

use super::cancel::CancelToken;

/// The kind of a single file operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Create,
    Update,
    Delete,
    Rename,
}

/// One file operation within a change-set.
///
/// Operations are applied in order against a single evolving tree snapshot;
/// later operations see the effects of earlier ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOperation {
    /// What to do.
    pub kind: OperationKind,
    /// Target path (destination path for renames).
    pub path: String,
    /// Source path, for renames only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_path: Option<String>,
    /// Optimistic-concurrency token: the content hash the caller last
    /// observed at `path`. Checked for update/delete/rename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_sha: Option<String>,
    /// New content for create/update (and optionally rename). Creates and
    /// updates without content produce an empty file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<u8>>,
}

impl FileOperation {
    /// Create a file at `path` with the given content.
    pub fn create(path: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            kind: OperationKind::Create,
            path: path.into(),
            from_path: None,
            expected_sha: None,
            content: Some(content),
        }
    }

    /// Replace the content at `path`.
    pub fn update(path: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            kind: OperationKind::Update,
            path: path.into(),
            from_path: None,
            expected_sha: None,
            content: Some(content),
        }
    }

    /// Remove the file at `path`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            kind: OperationKind::Delete,
            path: path.into(),
            from_path: None,
            expected_sha: None,
            content: None,
        }
    }

    /// Move `from` to `to`, carrying the content hash forward.
    ///
    /// A destination that equals the source (exactly or up to letter case)
    /// is a pure case rename: the destination-exists check is skipped. When
    /// the paths are identical and no new content is attached, the rename
    /// nets out to no change and falls under the engine's empty-commit
    /// policy.
    pub fn rename(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            kind: OperationKind::Rename,
            path: to.into(),
            from_path: Some(from.into()),
            expected_sha: None,
            content: None,
        }
    }

    /// Attach the content hash the caller last observed (stale-read guard).
    pub fn with_expected_sha(mut self, sha: impl Into<String>) -> Self {
        self.expected_sha = Some(sha.into());
        self
    }

    /// Attach new content (e.g. rename-with-edit).
    pub fn with_content(mut self, content: Vec<u8>) -> Self {
        self.content = Some(content);
        self
    }
}

/// A change-set request: ordered operations plus commit parameters.
#[derive(Debug, Clone, Default)]
pub struct ChangeSetOptions {
    /// Ordered file operations.
    pub files: Vec<FileOperation>,
    /// Source branch. Defaults to the repository's default branch.
    pub old_branch: Option<BranchName>,
    /// Target branch. Defaults to the source branch; when different, the
    /// target must not yet exist and is created by the change-set.
    pub new_branch: Option<BranchName>,
    /// Commit message. A trailing newline is added if missing.
    pub message: String,
    /// Author identity. Defaults to the acting user.
    pub author: Option<Identity>,
    /// Committer identity. Defaults to the acting user.
    pub committer: Option<Identity>,
    /// Head commit the caller last observed on the source branch. When
    /// supplied and stale, the change-set fails as a concurrent update.
    pub last_known_commit: Option<Oid>,
    /// Cooperative cancellation token.
    pub cancel: Option<CancelToken>,
}

impl ChangeSetOptions {
    /// Create options with a commit message and no operations yet.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Append an operation.
    pub fn with_operation(mut self, op: FileOperation) -> Self {
        self.files.push(op);
        self
    }

    /// Set the source branch.
    pub fn on_branch(mut self, branch: BranchName) -> Self {
        self.old_branch = Some(branch);
        self
    }

    /// Set a different target branch (branch creation).
    pub fn to_branch(mut self, branch: BranchName) -> Self {
        self.new_branch = Some(branch);
        self
    }

    /// Set the author identity.
    pub fn with_author(mut self, author: Identity) -> Self {
        self.author = Some(author);
        self
    }

    /// Set the committer identity.
    pub fn with_committer(mut self, committer: Identity) -> Self {
        self.committer = Some(committer);
        self
    }

    /// Set the optimistic last-known head commit.
    pub fn with_last_known_commit(mut self, oid: Oid) -> Self {
        self.last_known_commit = Some(oid);
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_compose() {
        let opts = ChangeSetOptions::new("Creates new/file.txt")
            .on_branch(BranchName::new("master").unwrap())
            .with_operation(FileOperation::create("new/file.txt", b"hi".to_vec()))
            .with_operation(
                FileOperation::update("README.md", b"updated".to_vec())
                    .with_expected_sha("4b4851ad51df6a7d9f25c979345979eaeb5b349f"),
            );

        assert_eq!(opts.files.len(), 2);
        assert_eq!(opts.files[0].kind, OperationKind::Create);
        assert_eq!(
            opts.files[1].expected_sha.as_deref(),
            Some("4b4851ad51df6a7d9f25c979345979eaeb5b349f")
        );
        assert!(opts.new_branch.is_none());
    }

    #[test]
    fn rename_carries_source() {
        let op = FileOperation::rename("README.md", "README.txt");
        assert_eq!(op.kind, OperationKind::Rename);
        assert_eq!(op.from_path.as_deref(), Some("README.md"));
        assert_eq!(op.path, "README.txt");
        assert!(op.content.is_none());
    }

    #[test]
    fn operation_serialization_shape() {
        let op = FileOperation::delete("old.txt").with_expected_sha("abc");
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["kind"], "delete");
        assert_eq!(json["path"], "old.txt");
        assert_eq!(json["expected_sha"], "abc");
        assert!(json.get("from_path").is_none());
    }
}

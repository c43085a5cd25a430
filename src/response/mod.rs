//! response
//!
//! Change-set result assembly.
//!
//! After a change-set lands, the caller gets back one payload per surviving
//! operation (deletes yield `None`), plus the commit metadata and a
//! verification stanza. Payloads are read back from the committed tree, not
//! echoed from the request, so they reflect exactly what the store recorded,
//! including pointer substitution for tracked paths.
//!
//! URL shapes are derived from [`EngineConfig`]; the engine itself never
//! performs network I/O.

use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::core::config::EngineConfig;
use crate::core::types::{BranchName, TreePath};
use crate::git::{CommitInfo, EntryKind, ObjectStore, StoreError};
use crate::lfs::{AttributeRules, LfsPointer};

/// Hyperlinks attached to a file payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileLinks {
    /// API contents URL for the file.
    #[serde(rename = "self")]
    pub self_url: String,
    /// API blob URL.
    pub git_url: String,
    /// Web view URL.
    pub html_url: String,
}

/// One file of the committed change-set, read back from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentsPayload {
    /// File name (last path component).
    pub name: String,
    /// Full path within the tree.
    pub path: String,
    /// Blob content hash as recorded in the tree.
    pub sha: String,
    /// The commit this payload was read from.
    pub last_commit_sha: String,
    /// Author timestamp of that commit, RFC 3339.
    pub last_author_date: String,
    /// Committer timestamp of that commit, RFC 3339.
    pub last_committer_date: String,
    /// Entry type, always `"file"` here.
    #[serde(rename = "type")]
    pub entry_type: String,
    /// Blob size in bytes. For tracked paths this is the pointer size, not
    /// the payload size.
    pub size: u64,
    /// Content transfer encoding, always `"base64"`.
    pub encoding: String,
    /// Base64 of the blob content as stored.
    pub content: String,
    /// API contents URL.
    pub url: String,
    /// Web view URL.
    pub html_url: String,
    /// API blob URL.
    pub git_url: String,
    /// Raw download URL.
    pub download_url: String,
    /// Structured links.
    #[serde(rename = "_links")]
    pub links: FileLinks,
    /// sha256 of the real payload, when the blob is a large-file pointer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lfs_oid: Option<String>,
    /// Real payload size in bytes, when the blob is a large-file pointer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lfs_size: Option<u64>,
}

/// A commit or tree referenced by URL and hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitMeta {
    /// API URL of the object.
    pub url: String,
    /// The object's hash.
    pub sha: String,
}

/// An author or committer stanza on the commit payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitUser {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Timestamp, RFC 3339.
    pub date: String,
}

/// The commit produced by the change-set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitPayload {
    /// API commit URL.
    pub url: String,
    /// Commit hash.
    pub sha: String,
    /// Web view URL.
    pub html_url: String,
    /// Author stanza.
    pub author: CommitUser,
    /// Committer stanza.
    pub committer: CommitUser,
    /// Parent commits (empty for a root commit).
    pub parents: Vec<CommitMeta>,
    /// Full commit message, including the trailing newline.
    pub message: String,
    /// The tree the commit points at.
    pub tree: CommitMeta,
}

/// Signature verification stanza.
///
/// The engine writes unsigned commits, so this is always the unsigned shape;
/// the field structure matches what verified commits would carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationPayload {
    /// Whether the commit carries a valid signature.
    pub verified: bool,
    /// Machine-readable reason.
    pub reason: String,
    /// The signature, empty when unsigned.
    pub signature: String,
    /// The signed payload, empty when unsigned.
    pub payload: String,
}

impl VerificationPayload {
    /// The stanza for an unsigned commit.
    pub fn unsigned() -> Self {
        Self {
            verified: false,
            reason: "gpg.error.not_signed_commit".to_string(),
            signature: String::new(),
            payload: String::new(),
        }
    }
}

/// The full result of a change-set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeSetResult {
    /// One entry per operation, in request order. `None` for deletes.
    pub files: Vec<Option<ContentsPayload>>,
    /// The commit that was created.
    pub commit: CommitPayload,
    /// Signature verification of that commit.
    pub verification: VerificationPayload,
}

/// Read the committed state back and build the result.
///
/// `touched` carries the surviving path per operation, in request order,
/// with `None` for deletes.
pub fn assemble(
    store: &ObjectStore,
    config: &EngineConfig,
    branch: &BranchName,
    info: &CommitInfo,
    touched: &[Option<TreePath>],
    rules: &AttributeRules,
) -> Result<ChangeSetResult, StoreError> {
    let mut files = Vec::with_capacity(touched.len());
    for slot in touched {
        match slot {
            Some(path) => files.push(Some(contents_payload(
                store, config, branch, info, path, rules,
            )?)),
            None => files.push(None),
        }
    }

    Ok(ChangeSetResult {
        files,
        commit: commit_payload(config, info),
        verification: VerificationPayload::unsigned(),
    })
}

fn contents_payload(
    store: &ObjectStore,
    config: &EngineConfig,
    branch: &BranchName,
    info: &CommitInfo,
    path: &TreePath,
    rules: &AttributeRules,
) -> Result<ContentsPayload, StoreError> {
    let entry = store
        .tree_entry(&info.tree, path)?
        .filter(|e| e.kind == EntryKind::Blob)
        .ok_or_else(|| StoreError::ObjectNotFound {
            oid: path.to_string(),
        })?;

    let blob = store.read_blob(&entry.id)?;

    // Tracked paths whose blob parses as a pointer get the real payload's
    // hash and size alongside the stored pointer.
    let pointer = if rules.is_tracked(path) {
        LfsPointer::parse(&blob)
    } else {
        None
    };

    let sha = entry.id.to_string();
    Ok(ContentsPayload {
        name: path.file_name().to_string(),
        path: path.to_string(),
        sha: sha.clone(),
        last_commit_sha: info.oid.to_string(),
        last_author_date: rfc3339(&info.author_time),
        last_committer_date: rfc3339(&info.committer_time),
        entry_type: "file".to_string(),
        size: blob.len() as u64,
        encoding: "base64".to_string(),
        content: base64::engine::general_purpose::STANDARD.encode(&blob),
        url: contents_url(config, branch, path),
        html_url: format!(
            "{}{}/{}/src/branch/{}/{}",
            config.base_url,
            config.owner,
            config.repo,
            branch,
            path.as_str()
        ),
        git_url: blob_url(config, &sha),
        download_url: format!(
            "{}{}/{}/raw/branch/{}/{}",
            config.base_url,
            config.owner,
            config.repo,
            branch,
            path.as_str()
        ),
        links: FileLinks {
            self_url: contents_url(config, branch, path),
            git_url: blob_url(config, &sha),
            html_url: format!(
                "{}{}/{}/src/branch/{}/{}",
                config.base_url,
                config.owner,
                config.repo,
                branch,
                path.as_str()
            ),
        },
        lfs_oid: pointer.as_ref().map(|p| p.oid.clone()),
        lfs_size: pointer.as_ref().map(|p| p.size),
    })
}

fn commit_payload(config: &EngineConfig, info: &CommitInfo) -> CommitPayload {
    let api_root = api_repo_root(config);
    CommitPayload {
        url: format!("{}/git/commits/{}", api_root, info.oid),
        sha: info.oid.to_string(),
        html_url: format!(
            "{}{}/{}/commit/{}",
            config.base_url, config.owner, config.repo, info.oid
        ),
        author: CommitUser {
            name: info.author.name.clone(),
            email: info.author.email.clone(),
            date: rfc3339(&info.author_time),
        },
        committer: CommitUser {
            name: info.committer.name.clone(),
            email: info.committer.email.clone(),
            date: rfc3339(&info.committer_time),
        },
        parents: info
            .parents
            .iter()
            .map(|parent| CommitMeta {
                url: format!("{}/git/commits/{}", api_root, parent),
                sha: parent.to_string(),
            })
            .collect(),
        message: info.message.clone(),
        tree: CommitMeta {
            url: format!("{}/git/trees/{}", api_root, info.tree),
            sha: info.tree.to_string(),
        },
    }
}

fn api_repo_root(config: &EngineConfig) -> String {
    format!(
        "{}api/v1/repos/{}/{}",
        config.base_url, config.owner, config.repo
    )
}

fn contents_url(config: &EngineConfig, branch: &BranchName, path: &TreePath) -> String {
    format!(
        "{}/contents/{}?ref={}",
        api_repo_root(config),
        path.as_str(),
        branch
    )
}

fn blob_url(config: &EngineConfig, sha: &str) -> String {
    format!("{}/git/blobs/{}", api_repo_root(config), sha)
}

fn rfc3339(when: &DateTime<Utc>) -> String {
    when.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Identity, Oid};

    fn config() -> EngineConfig {
        EngineConfig::new("http://localhost:3000/", "user2", "repo1")
    }

    fn sample_info() -> CommitInfo {
        CommitInfo {
            oid: Oid::new("c".repeat(40)).unwrap(),
            message: "Updates README.md\n".to_string(),
            author: Identity::new("User Two", "user2@example.com"),
            author_time: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            committer: Identity::new("User Two", "user2@example.com"),
            committer_time: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            parents: vec![Oid::new("b".repeat(40)).unwrap()],
            tree: Oid::new("d".repeat(40)).unwrap(),
        }
    }

    #[test]
    fn unsigned_verification_shape() {
        let v = VerificationPayload::unsigned();
        assert!(!v.verified);
        assert_eq!(v.reason, "gpg.error.not_signed_commit");
        assert!(v.signature.is_empty());
        assert!(v.payload.is_empty());
    }

    #[test]
    fn commit_urls() {
        let payload = commit_payload(&config(), &sample_info());
        assert_eq!(
            payload.url,
            format!(
                "http://localhost:3000/api/v1/repos/user2/repo1/git/commits/{}",
                "c".repeat(40)
            )
        );
        assert_eq!(
            payload.html_url,
            format!("http://localhost:3000/user2/repo1/commit/{}", "c".repeat(40))
        );
        assert_eq!(payload.parents.len(), 1);
        assert_eq!(payload.parents[0].sha, "b".repeat(40));
        assert_eq!(payload.tree.sha, "d".repeat(40));
        assert_eq!(payload.message, "Updates README.md\n");
    }

    #[test]
    fn contents_url_carries_ref() {
        let branch = BranchName::new("master").unwrap();
        let path = TreePath::new("new/file.txt").unwrap();
        assert_eq!(
            contents_url(&config(), &branch, &path),
            "http://localhost:3000/api/v1/repos/user2/repo1/contents/new/file.txt?ref=master"
        );
    }

    #[test]
    fn serialized_field_names() {
        let payload = commit_payload(&config(), &sample_info());
        let result = ChangeSetResult {
            files: vec![None],
            commit: payload,
            verification: VerificationPayload::unsigned(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["files"][0].is_null());
        assert_eq!(json["verification"]["reason"], "gpg.error.not_signed_commit");
        assert_eq!(json["commit"]["sha"], "c".repeat(40));
    }
}

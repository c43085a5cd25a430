//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`TreePath`] - Validated repository-relative file path
//! - [`Oid`] - Git object identifier (SHA)
//! - [`BranchName`] - Validated Git branch name
//! - [`FileMode`] - Tree entry mode (blob, executable, symlink)
//! - [`Identity`] - Author/committer name and email
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use graftwork::core::types::{BranchName, Oid, TreePath};
//!
//! // Valid constructions
//! let path = TreePath::new("docs/README.md").unwrap();
//! let branch = BranchName::new("feature/my-branch").unwrap();
//! let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
//!
//! // Invalid constructions fail at creation time
//! assert!(TreePath::new(".git/config").is_err());
//! assert!(BranchName::new("invalid..name").is_err());
//! assert!(Oid::new("not-a-sha").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("path contains a malformed path component [path: {0}]")]
    MalformedPath(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid object id: {0}")]
    InvalidOid(String),
}

/// A validated repository-relative tree path.
///
/// Paths are normalized (leading/trailing slashes stripped) and validated:
/// - Cannot be empty after normalization
/// - No empty components (`//`)
/// - No `.` or `..` components (cannot escape the tree root)
/// - No component equal to `.git` (case-insensitive, reserved control directory)
/// - No backslashes or ASCII control characters
///
/// # Example
///
/// ```
/// use graftwork::core::types::TreePath;
///
/// let path = TreePath::new("/docs/guide.md").unwrap();
/// assert_eq!(path.as_str(), "docs/guide.md");
/// assert_eq!(path.file_name(), "guide.md");
///
/// assert!(TreePath::new("").is_err());
/// assert!(TreePath::new("a/../b").is_err());
/// assert!(TreePath::new(".git").is_err());
/// assert!(TreePath::new("sub/.GIT/hooks").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TreePath(String);

impl TreePath {
    /// Create a new validated tree path.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::MalformedPath` if the path is empty, escapes the
    /// tree root, or contains a reserved component.
    pub fn new(path: impl Into<String>) -> Result<Self, TypeError> {
        let raw = path.into();
        let normalized = raw.trim_matches('/').to_string();

        if normalized.is_empty() {
            return Err(TypeError::MalformedPath(raw));
        }
        if normalized.contains('\\') {
            return Err(TypeError::MalformedPath(raw));
        }
        if normalized.chars().any(|c| c.is_ascii_control()) {
            return Err(TypeError::MalformedPath(raw));
        }

        for component in normalized.split('/') {
            if component.is_empty() || component == "." || component == ".." {
                return Err(TypeError::MalformedPath(raw));
            }
            if component.eq_ignore_ascii_case(".git") {
                return Err(TypeError::MalformedPath(raw));
            }
        }

        Ok(Self(normalized))
    }

    /// Get the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The final path component.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Iterate over the path components in order.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Iterate over all proper ancestor prefixes, shortest first.
    ///
    /// # Example
    ///
    /// ```
    /// use graftwork::core::types::TreePath;
    ///
    /// let path = TreePath::new("a/b/c.txt").unwrap();
    /// let ancestors: Vec<_> = path.ancestors().map(|p| p.as_str().to_string()).collect();
    /// assert_eq!(ancestors, vec!["a", "a/b"]);
    /// ```
    pub fn ancestors(&self) -> impl Iterator<Item = TreePath> + '_ {
        let full = &self.0;
        full.match_indices('/')
            .map(move |(idx, _)| TreePath(full[..idx].to_string()))
    }

    /// Check whether this path lies strictly under `dir`.
    pub fn is_under(&self, dir: &TreePath) -> bool {
        self.0.len() > dir.0.len() + 1
            && self.0.starts_with(dir.as_str())
            && self.0.as_bytes()[dir.0.len()] == b'/'
    }

    /// Case-insensitive path equality, used to detect pure case renames.
    pub fn eq_ignore_case(&self, other: &TreePath) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl TryFrom<String> for TreePath {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<TreePath> for String {
    fn from(path: TreePath) -> Self {
        path.0
    }
}

impl AsRef<str> for TreePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TreePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated Git branch name.
///
/// Branch names must conform to Git's refname rules (see `git check-ref-format`):
/// - Cannot be empty
/// - Cannot start with `.` or `-`
/// - Cannot end with `.lock` or `/`
/// - Cannot contain `..`, `@{`, `//`, or ASCII control characters
/// - Cannot contain spaces, `~`, `^`, `:`, `\`, `?`, `*`, `[`
/// - Cannot be exactly `@`
///
/// # Example
///
/// ```
/// use graftwork::core::types::BranchName;
///
/// let name = BranchName::new("feature/my-branch").unwrap();
/// assert_eq!(name.as_str(), "feature/my-branch");
///
/// assert!(BranchName::new("").is_err());
/// assert!(BranchName::new(".hidden").is_err());
/// assert!(BranchName::new("has space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name violates Git's
    /// refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// Validate a branch name against Git's refname rules.
    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot be empty".into(),
            ));
        }
        if name == "@" {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot be '@' (reserved)".into(),
            ));
        }
        if name.starts_with('.') || name.starts_with('-') {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot start with '.' or '-'".into(),
            ));
        }
        if name.ends_with(".lock") || name.ends_with('/') {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot end with '.lock' or '/'".into(),
            ));
        }
        if name.contains("..") || name.contains("@{") || name.contains("//") {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot contain '..', '@{' or '//'".into(),
            ));
        }

        const INVALID_CHARS: [char; 8] = [' ', '~', '^', ':', '\\', '?', '*', '['];
        for c in INVALID_CHARS {
            if name.contains(c) {
                return Err(TypeError::InvalidBranchName(format!(
                    "branch name cannot contain '{c}'"
                )));
            }
        }
        if name.chars().any(|c| c.is_ascii_control()) {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot contain control characters".into(),
            ));
        }

        for component in name.split('/') {
            if component.starts_with('.') {
                return Err(TypeError::InvalidBranchName(
                    "path component cannot start with '.'".into(),
                ));
            }
            if component.ends_with(".lock") {
                return Err(TypeError::InvalidBranchName(
                    "path component cannot end with '.lock'".into(),
                ));
            }
        }

        Ok(())
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The full ref name for this branch (`refs/heads/<name>`).
    pub fn to_refname(&self) -> String {
        format!("refs/heads/{}", self.0)
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A Git object identifier (SHA-1 or SHA-256).
///
/// OIDs are normalized to lowercase for consistency.
///
/// # Example
///
/// ```
/// use graftwork::core::types::Oid;
///
/// let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
/// assert_eq!(oid.short(7), "abc123d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid(String);

impl Oid {
    /// Create a new validated object id.
    ///
    /// The OID is normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if the string is not a valid hex OID.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        Self::validate(&oid)?;
        Ok(Self(oid))
    }

    /// Get an abbreviated form of the OID.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    /// Validate an object id.
    fn validate(oid: &str) -> Result<(), TypeError> {
        // SHA-1 is 40 hex chars, SHA-256 is 64
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid(
                "object id must be hexadecimal".into(),
            ));
        }
        Ok(())
    }

    /// Get the object id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Oid {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Oid> for String {
    fn from(oid: Oid) -> Self {
        oid.0
    }
}

impl AsRef<str> for Oid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mode of a tree entry.
///
/// Directories never appear here; they are an implementation detail of tree
/// assembly. Entries staged through the engine are always one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileMode {
    /// Regular file (0o100644).
    Blob,
    /// Executable file (0o100755).
    BlobExecutable,
    /// Symbolic link (0o120000).
    Link,
}

impl FileMode {
    /// The raw git filemode value.
    pub fn as_raw(self) -> i32 {
        match self {
            FileMode::Blob => 0o100644,
            FileMode::BlobExecutable => 0o100755,
            FileMode::Link => 0o120000,
        }
    }

    /// Interpret a raw git filemode, defaulting unknown values to `Blob`.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0o100755 => FileMode::BlobExecutable,
            0o120000 => FileMode::Link,
            _ => FileMode::Blob,
        }
    }
}

/// An author or committer identity.
///
/// # Example
///
/// ```
/// use graftwork::core::types::Identity;
///
/// let id = Identity::new("Bob Smith", "bob@smith.com");
/// assert_eq!(id.name, "Bob Smith");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

impl Identity {
    /// Create a new identity.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod tree_path {
        use super::*;

        #[test]
        fn valid_paths() {
            assert!(TreePath::new("README.md").is_ok());
            assert!(TreePath::new("a/b/c.txt").is_ok());
            assert!(TreePath::new("with space/file").is_ok());
        }

        #[test]
        fn normalizes_slashes() {
            let path = TreePath::new("/a/b/").unwrap();
            assert_eq!(path.as_str(), "a/b");
        }

        #[test]
        fn empty_is_malformed() {
            assert!(matches!(
                TreePath::new(""),
                Err(TypeError::MalformedPath(_))
            ));
            assert!(matches!(
                TreePath::new("/"),
                Err(TypeError::MalformedPath(_))
            ));
        }

        #[test]
        fn traversal_is_malformed() {
            assert!(TreePath::new("..").is_err());
            assert!(TreePath::new("a/../b").is_err());
            assert!(TreePath::new("./a").is_err());
        }

        #[test]
        fn git_directory_is_reserved() {
            assert!(TreePath::new(".git").is_err());
            assert!(TreePath::new(".git/config").is_err());
            assert!(TreePath::new("sub/.Git/hooks").is_err());
        }

        #[test]
        fn double_slash_is_malformed() {
            assert!(TreePath::new("a//b").is_err());
        }

        #[test]
        fn backslash_is_malformed() {
            assert!(TreePath::new("a\\b").is_err());
        }

        #[test]
        fn file_name_and_components() {
            let path = TreePath::new("a/b/c.txt").unwrap();
            assert_eq!(path.file_name(), "c.txt");
            assert_eq!(path.components().collect::<Vec<_>>(), vec!["a", "b", "c.txt"]);

            let flat = TreePath::new("top.txt").unwrap();
            assert_eq!(flat.file_name(), "top.txt");
            assert_eq!(flat.ancestors().count(), 0);
        }

        #[test]
        fn is_under() {
            let dir = TreePath::new("a/b").unwrap();
            assert!(TreePath::new("a/b/c.txt").unwrap().is_under(&dir));
            assert!(!TreePath::new("a/bc.txt").unwrap().is_under(&dir));
            assert!(!TreePath::new("a/b").unwrap().is_under(&dir));
        }

        #[test]
        fn case_insensitive_equality() {
            let lower = TreePath::new("readme.md").unwrap();
            let upper = TreePath::new("README.md").unwrap();
            assert!(lower.eq_ignore_case(&upper));
            assert_ne!(lower, upper);
        }

        #[test]
        fn error_message_names_path() {
            let err = TreePath::new(".git").unwrap_err();
            assert_eq!(
                err.to_string(),
                "path contains a malformed path component [path: .git]"
            );
        }
    }

    mod branch_name {
        use super::*;

        #[test]
        fn valid_names() {
            assert!(BranchName::new("master").is_ok());
            assert!(BranchName::new("feature/my-branch").is_ok());
            assert!(BranchName::new("user@feature").is_ok());
        }

        #[test]
        fn invalid_names() {
            assert!(BranchName::new("").is_err());
            assert!(BranchName::new("@").is_err());
            assert!(BranchName::new(".hidden").is_err());
            assert!(BranchName::new("-flag").is_err());
            assert!(BranchName::new("branch.lock").is_err());
            assert!(BranchName::new("a..b").is_err());
            assert!(BranchName::new("has space").is_err());
            assert!(BranchName::new("tr/ailing/").is_err());
        }

        #[test]
        fn refname_formatting() {
            let branch = BranchName::new("feature/x").unwrap();
            assert_eq!(branch.to_refname(), "refs/heads/feature/x");
        }
    }

    mod oid {
        use super::*;

        #[test]
        fn normalizes_to_lowercase() {
            let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
            assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
        }

        #[test]
        fn accepts_sha256_length() {
            let hex64 = "a".repeat(64);
            assert!(Oid::new(hex64).is_ok());
        }

        #[test]
        fn rejects_bad_input() {
            assert!(Oid::new("short").is_err());
            assert!(Oid::new("z".repeat(40)).is_err());
        }

        #[test]
        fn short_form() {
            let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
            assert_eq!(oid.short(7), "abc123d");
            assert_eq!(oid.short(100), oid.as_str());
        }
    }

    mod file_mode {
        use super::*;

        #[test]
        fn raw_round_trip() {
            for mode in [FileMode::Blob, FileMode::BlobExecutable, FileMode::Link] {
                assert_eq!(FileMode::from_raw(mode.as_raw()), mode);
            }
        }

        #[test]
        fn unknown_raw_defaults_to_blob() {
            assert_eq!(FileMode::from_raw(0), FileMode::Blob);
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn tree_path_never_contains_traversal(s in "[a-zA-Z0-9./_-]{0,32}") {
                if let Ok(path) = TreePath::new(s) {
                    for component in path.components() {
                        prop_assert!(!component.is_empty());
                        prop_assert_ne!(component, ".");
                        prop_assert_ne!(component, "..");
                        prop_assert!(!component.eq_ignore_ascii_case(".git"));
                    }
                }
            }

            #[test]
            fn oid_accepts_all_40_char_hex(s in "[0-9a-fA-F]{40}") {
                let oid = Oid::new(s.clone()).unwrap();
                prop_assert_eq!(oid.as_str(), s.to_ascii_lowercase());
            }
        }
    }
}

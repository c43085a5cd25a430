//! core::config
//!
//! Engine configuration.
//!
//! Policy that varies per deployment lives here rather than being inferred:
//! the URL roots the response assembler derives links from, the bounded wait
//! for the per-branch lock, and whether an all-no-op change-set is an error.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Policy for a change-set whose resulting tree is identical to the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyCommitPolicy {
    /// Fail the change-set with an `EmptyCommit` error.
    #[default]
    Reject,
    /// Create a no-change commit anyway.
    Allow,
}

/// Configuration for a [`ChangeEngine`](crate::engine::ChangeEngine).
///
/// # Example
///
/// ```
/// use graftwork::core::config::EngineConfig;
///
/// let config = EngineConfig::new("http://localhost:3000/", "user2", "repo1");
/// assert_eq!(config.base_url, "http://localhost:3000/");
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Application root URL, always with a trailing slash.
    pub base_url: String,
    /// Repository owner name, used in derived URLs.
    pub owner: String,
    /// Repository name, used in derived URLs.
    pub repo: String,
    /// Bounded wait for the per-branch lock.
    pub lock_timeout: Duration,
    /// What to do when a change-set produces no tree change.
    pub empty_commit: EmptyCommitPolicy,
}

impl EngineConfig {
    /// Default bounded wait for lock acquisition.
    pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a configuration with default lock timeout and commit policy.
    pub fn new(
        base_url: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            owner: owner.into(),
            repo: repo.into(),
            lock_timeout: Self::DEFAULT_LOCK_TIMEOUT,
            empty_commit: EmptyCommitPolicy::Reject,
        }
    }

    /// Override the lock timeout.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Override the empty-commit policy.
    pub fn with_empty_commit(mut self, policy: EmptyCommitPolicy) -> Self {
        self.empty_commit = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let config = EngineConfig::new("https://git.example.com", "owner", "repo");
        assert_eq!(config.base_url, "https://git.example.com/");
    }

    #[test]
    fn trailing_slash_not_doubled() {
        let config = EngineConfig::new("https://git.example.com/", "owner", "repo");
        assert_eq!(config.base_url, "https://git.example.com/");
    }

    #[test]
    fn builder_overrides() {
        let config = EngineConfig::new("http://x/", "o", "r")
            .with_lock_timeout(Duration::from_millis(50))
            .with_empty_commit(EmptyCommitPolicy::Allow);
        assert_eq!(config.lock_timeout, Duration::from_millis(50));
        assert_eq!(config.empty_commit, EmptyCommitPolicy::Allow);
    }

    #[test]
    fn default_policy_rejects_empty_commits() {
        let config = EngineConfig::new("http://x/", "o", "r");
        assert_eq!(config.empty_commit, EmptyCommitPolicy::Reject);
    }
}

//! lfs::track
//!
//! Attribute pattern evaluation for large-file tracking.
//!
//! Patterns follow the common gitattributes shape:
//!
//! - A pattern without `/` matches against the file name of any path
//!   (`*.bin` matches `a/b/c.bin`)
//! - A pattern containing `/` is anchored and matches against the full path
//!   (`assets/*.png` matches `assets/logo.png` but not `x/assets/logo.png`)
//! - `*` matches any run of characters except `/`; `?` matches one such
//!   character
//!
//! The rules are externally supplied; the engine only evaluates them.

use crate::core::types::TreePath;

/// A set of large-file tracking patterns.
///
/// # Example
///
/// ```
/// use graftwork::core::types::TreePath;
/// use graftwork::lfs::AttributeRules;
///
/// let rules = AttributeRules::new(vec!["*.bin".into(), "media/*.iso".into()]);
/// assert!(rules.is_tracked(&TreePath::new("deep/dir/crypt.bin").unwrap()));
/// assert!(rules.is_tracked(&TreePath::new("media/disk.iso").unwrap()));
/// assert!(!rules.is_tracked(&TreePath::new("other/disk.iso").unwrap()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AttributeRules {
    patterns: Vec<String>,
}

impl AttributeRules {
    /// Create a rule set from raw patterns.
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    /// A rule set that tracks nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decide whether a path is large-file tracked.
    pub fn is_tracked(&self, path: &TreePath) -> bool {
        self.patterns.iter().any(|pattern| {
            if pattern.contains('/') {
                let anchored = pattern.trim_start_matches('/');
                wildcard_match(anchored, path.as_str())
            } else {
                wildcard_match(pattern, path.file_name())
            }
        })
    }
}

/// Wildcard match where `*` and `?` never cross a `/` boundary.
fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pat: Vec<char> = pattern.chars().collect();
    let txt: Vec<char> = text.chars().collect();
    match_at(&pat, &txt)
}

fn match_at(pat: &[char], txt: &[char]) -> bool {
    match (pat.first(), txt.first()) {
        (None, None) => true,
        (None, Some(_)) => false,
        (Some('*'), _) => {
            // Try consuming zero characters, then one-at-a-time (never '/')
            if match_at(&pat[1..], txt) {
                return true;
            }
            match txt.first() {
                Some(&c) if c != '/' => match_at(pat, &txt[1..]),
                _ => false,
            }
        }
        (Some('?'), Some(&c)) if c != '/' => match_at(&pat[1..], &txt[1..]),
        (Some('?'), _) => false,
        (Some(&p), Some(&c)) if p == c => match_at(&pat[1..], &txt[1..]),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> TreePath {
        TreePath::new(s).unwrap()
    }

    #[test]
    fn basename_pattern_matches_any_directory() {
        let rules = AttributeRules::new(vec!["*.bin".into()]);
        assert!(rules.is_tracked(&path("crypt.bin")));
        assert!(rules.is_tracked(&path("a/b/crypt.bin")));
        assert!(!rules.is_tracked(&path("crypt.bin.txt")));
    }

    #[test]
    fn anchored_pattern_matches_full_path() {
        let rules = AttributeRules::new(vec!["assets/*.png".into()]);
        assert!(rules.is_tracked(&path("assets/logo.png")));
        assert!(!rules.is_tracked(&path("x/assets/logo.png")));
        assert!(!rules.is_tracked(&path("assets/sub/logo.png")));
    }

    #[test]
    fn star_does_not_cross_slash() {
        let rules = AttributeRules::new(vec!["media/*".into()]);
        assert!(rules.is_tracked(&path("media/disk.iso")));
        assert!(!rules.is_tracked(&path("media/sub/disk.iso")));
    }

    #[test]
    fn question_mark_matches_single_char() {
        let rules = AttributeRules::new(vec!["file?.dat".into()]);
        assert!(rules.is_tracked(&path("file1.dat")));
        assert!(!rules.is_tracked(&path("file12.dat")));
    }

    #[test]
    fn exact_name_pattern() {
        let rules = AttributeRules::new(vec!["CONTRIBUTING.md.bin".into()]);
        assert!(rules.is_tracked(&path("CONTRIBUTING.md.bin")));
        assert!(!rules.is_tracked(&path("CONTRIBUTING.md")));
    }

    #[test]
    fn empty_rules_track_nothing() {
        let rules = AttributeRules::empty();
        assert!(!rules.is_tracked(&path("anything.bin")));
    }
}

//! lfs::pointer
//!
//! The large-file pointer blob format.
//!
//! A pointer is a small fixed-format text blob stored in the tree in place
//! of the real payload:
//!
//! ```text
//! version https://git-lfs.github.com/spec/v1
//! oid sha256:<64 hex chars>
//! size <bytes>
//! ```

use sha2::{Digest, Sha256};

/// The spec line every pointer blob starts with.
const VERSION_LINE: &str = "version https://git-lfs.github.com/spec/v1";

/// A parsed large-file pointer: the payload's content hash and byte size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LfsPointer {
    /// sha256 of the real payload, lowercase hex.
    pub oid: String,
    /// Byte size of the real payload.
    pub size: u64,
}

impl LfsPointer {
    /// Build a pointer for a payload, hashing its content.
    ///
    /// # Example
    ///
    /// ```
    /// use graftwork::lfs::LfsPointer;
    ///
    /// let ptr = LfsPointer::from_content(b"hello");
    /// assert_eq!(ptr.size, 5);
    /// assert_eq!(ptr.oid.len(), 64);
    /// ```
    pub fn from_content(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        Self {
            oid: hex::encode(hasher.finalize()),
            size: content.len() as u64,
        }
    }

    /// Render the pointer in its fixed text format.
    ///
    /// # Example
    ///
    /// ```
    /// use graftwork::lfs::LfsPointer;
    ///
    /// let ptr = LfsPointer::from_content(b"payload");
    /// let text = ptr.render();
    /// assert!(text.starts_with("version https://git-lfs.github.com/spec/v1\n"));
    /// assert!(text.ends_with("size 7\n"));
    /// ```
    pub fn render(&self) -> String {
        format!("{}\noid sha256:{}\nsize {}\n", VERSION_LINE, self.oid, self.size)
    }

    /// Parse a blob as a pointer, returning `None` if it is not one.
    ///
    /// Non-pointer blobs (raw content) are a normal case, not an error.
    pub fn parse(content: &[u8]) -> Option<Self> {
        // Pointers are tiny; anything large is raw content.
        if content.len() > 1024 {
            return None;
        }
        let text = std::str::from_utf8(content).ok()?;
        let mut lines = text.lines();

        if lines.next()? != VERSION_LINE {
            return None;
        }

        let oid_line = lines.next()?;
        let oid = oid_line.strip_prefix("oid sha256:")?;
        if oid.len() != 64 || !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let size_line = lines.next()?;
        let size: u64 = size_line.strip_prefix("size ")?.trim().parse().ok()?;

        Some(Self {
            oid: oid.to_ascii_lowercase(),
            size,
        })
    }
}

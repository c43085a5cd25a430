//! git
//!
//! Single interface for the content-addressed object store.
//!
//! # Architecture
//!
//! This module is the **only doorway** to the object database. All blob,
//! tree, commit, and ref operations flow through [`ObjectStore`]. No other
//! module imports `git2`.
//!
//! # Responsibilities
//!
//! - Repository opening and branch head resolution
//! - Object operations (read/write blob, assemble trees, create commits)
//! - Ref operations with CAS (compare-and-swap) semantics
//! - Commit metadata read-back
//!
//! # Invariants
//!
//! - All writes are append-only; no object is ever overwritten or deleted
//! - All ref updates use CAS semantics
//! - Tree assembly reuses unaffected subtrees by hash (structural sharing)

mod store;

pub use store::{
    BlobRef, CommitInfo, CommitSignature, EntryKind, ObjectStore, StoreError, TreeEntryInfo,
};

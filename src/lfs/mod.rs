//! lfs
//!
//! Large-file pointer resolution.
//!
//! # Architecture
//!
//! Paths matching externally supplied attribute rules are large-file
//! tracked: instead of the raw payload, the tree carries a small pointer
//! blob naming the payload's sha256 and byte size, and the payload itself
//! is registered in a backing store keyed by that hash.
//!
//! # Modules
//!
//! - [`pointer`] - The fixed-text pointer format (parse and render)
//! - [`track`] - Attribute pattern evaluation
//! - [`store`] - Backing store abstraction and filesystem implementation
//!
//! # Invariants
//!
//! - Pointer substitution is transparent: callers hand the engine raw
//!   content and the engine decides what lands in the tree
//! - A failure to register a payload aborts the whole change-set
//! - Renames of tracked paths carry the pointer verbatim without re-hashing

pub mod pointer;
pub mod store;
pub mod track;

pub use pointer::LfsPointer;
pub use store::{FsLfsStore, LfsStore, LfsStoreError, NoopTrackingHook, TrackingHook};
pub use track::AttributeRules;

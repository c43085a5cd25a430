//! Graftwork - a change-set engine for version-controlled file trees.
//!
//! Graftwork applies a batch of create/update/delete/rename file operations
//! to a git tree and atomically produces a new commit: content-addressed
//! blob/tree assembly, large-file (LFS) pointer substitution, optimistic
//! conflict detection, and compare-and-swap branch-head advancement.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`core`] - Domain types: validated paths, object ids, identities
//! - [`git`] - Single interface to the content-addressed object store
//! - [`lfs`] - Large-file pointer codec, tracking rules, backing store
//! - [`engine`] - Staged index, branch lock, and the change-set orchestrator
//! - [`response`] - Externally visible result structures
//!
//! # Correctness Invariants
//!
//! Graftwork maintains the following invariants:
//!
//! 1. Object writes are append-only and content-addressed; nothing is ever
//!    overwritten or deleted
//! 2. A branch ref advances only through compare-and-swap, and only after a
//!    complete change-set succeeded
//! 3. A rejected change-set leaves the prior commit and branch ref untouched;
//!    no partial branch state is ever observable
//! 4. Change-sets targeting the same branch serialize through an exclusive
//!    per-branch lock; different branches proceed in parallel

pub mod core;
pub mod engine;
pub mod git;
pub mod lfs;
pub mod response;

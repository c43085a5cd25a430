//! core
//!
//! Core domain types for Graftwork.
//!
//! # Modules
//!
//! - [`types`] - Strong types: TreePath, Oid, BranchName, FileMode, Identity
//! - [`config`] - Engine configuration: URLs, lock timeout, commit policy
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Validation happens at construction; invalid values are unrepresentable

pub mod config;
pub mod types;

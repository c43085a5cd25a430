//! engine
//!
//! The change-set engine: staged index, branch lock, and orchestrator.
//!
//! # Architecture
//!
//! A change-set executes as one logical unit of work:
//!
//! 1. **Validate**: operation list, branch names, defaulted identities
//! 2. **Acquire**: exclusive per-{repository, branch} lock (bounded wait)
//! 3. **Snapshot**: read the source branch head and its tree
//! 4. **Apply**: fold each file operation through the staged index,
//!    short-circuiting on the first error
//! 5. **Commit**: write the new tree and commit object
//! 6. **Advance**: compare-and-swap the branch ref
//! 7. **Release** the lock and assemble the response
//!
//! # Invariants
//!
//! - No partial application: any operation's failure aborts the whole
//!   change-set before anything reaches the branch ref
//! - The lock is held only across snapshot-through-ref-advance
//! - Every failure path releases the lock before returning
//! - A failed change-set leaves at most orphaned objects behind, which are
//!   harmless in a content-addressed append-only store
//!
//! # Example
//!
//! ```ignore
//! use graftwork::core::config::EngineConfig;
//! use graftwork::core::types::Identity;
//! use graftwork::engine::{ChangeEngine, ChangeSetOptions, FileOperation};
//!
//! let engine = ChangeEngine::new(&store, &lfs, &rules, &hook, config);
//! let opts = ChangeSetOptions::new("Creates new/file.txt")
//!     .with_operation(FileOperation::create("new/file.txt", b"This is a NEW file".to_vec()));
//! let result = engine.change_files(&Identity::new("User Two", "user2@example.org"), &opts)?;
//! ```

pub mod cancel;
pub mod changeset;
pub mod error;
pub mod index;
pub mod lock;
pub mod options;

// Re-exports for convenience
pub use cancel::CancelToken;
pub use changeset::ChangeEngine;
pub use error::ChangeError;
pub use index::StagedIndex;
pub use lock::{BranchLock, LockError};
pub use options::{ChangeSetOptions, FileOperation, OperationKind};

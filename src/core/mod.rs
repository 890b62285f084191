//! core
//!
//! Domain types and the unlocked store model.
//!
//! # Modules
//!
//! - [`types`] - Strong types: RevisionHash, Timestamp
//! - [`hash`] - Deterministic content hashing of revisions
//! - [`revision`] - Immutable commit nodes and their snapshots
//! - [`identifier`] - Identifier grammar and classification
//! - [`repository`] - Revision arena plus branch, tag, and change-request refs
//! - [`error`] - Store error taxonomy
//!
//! # Design Principles
//!
//! - Revisions reference parents by hash, never by pointer
//! - Identifiers are classified once per call, then matched exhaustively
//! - Hashing is deterministic across runs

pub mod error;
pub mod hash;
pub mod identifier;
pub mod repository;
pub mod revision;
pub mod types;

pub use error::ScmError;
pub use identifier::{Identifier, RefTarget};
pub use repository::{ChangeRequest, Repository, DEFAULT_BRANCH};
pub use revision::{FileChange, LogEntry, PathKind, Revision};
pub use types::{RevisionHash, Timestamp, TypeError};

//! mockscm - An in-memory, content-addressed revision store for SCM tests
//!
//! mockscm models, at fixture scale, the mechanics a source-control backend
//! exposes to branch, tag, and change-request discovery: immutable commits
//! chained by parent hash, mutable branch refs, tags, change requests that
//! remember the branch they target, deterministic content hashing, and
//! checkout of a snapshot into a file tree.
//!
//! # Architecture
//!
//! - [`core`] - Revisions, hashing, repositories, identifier resolution (no locking)
//! - [`controller`] - Locked public handle, registry of live controllers, checkout
//! - [`fixture`] - Declarative TOML fixtures replayed against a controller
//! - [`cli`] - The `mockscm` binary's command-line layer
//!
//! # Correctness Invariants
//!
//! 1. Revisions are immutable and never removed from their repository
//! 2. Every ref points at a revision stored in the same repository
//! 3. Failed mutations change nothing
//! 4. The same inputs always hash to the same revision identity
//! 5. One lock per controller; the registry lock is never held with it

pub mod cli;
pub mod controller;
pub mod core;
pub mod fixture;

pub use controller::registry::{Registry, ScopedController};
pub use controller::{Controller, ControllerId};
pub use self::core::{PathKind, RevisionHash, ScmError, Timestamp};

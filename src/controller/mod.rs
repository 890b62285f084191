//! controller
//!
//! The public handle over a set of named repositories.
//!
//! # Concurrency
//!
//! Each [`Controller`] owns one mutex that guards all of its repositories.
//! Every operation, read or write, takes that lock for its whole duration;
//! there is no per-repository or per-ref locking. Operations never block
//! on anything but this lock and never call back into the [`registry`], so
//! the registry lock and a controller lock are never held together.
//!
//! `Controller` is a cheap, cloneable handle: clones share state.
//!
//! # Example
//!
//! ```
//! use mockscm::controller::{checkout::MemoryDestination, registry::Registry};
//! use mockscm::core::PathKind;
//!
//! let registry = Registry::new();
//! let scm = registry.scoped();
//!
//! scm.create_repository("foo").unwrap();
//! let root = scm.get_revision("foo", "master").unwrap();
//! let head = scm.add_file("foo", "master", "m1", "a.txt", vec![1u8, 2, 3]).unwrap();
//! assert_ne!(root, head);
//!
//! let mut dest = MemoryDestination::new();
//! assert_eq!(scm.checkout(&mut dest, "foo", "master").unwrap(), head);
//! assert_eq!(dest.get("a.txt"), Some(&[1u8, 2, 3][..]));
//!
//! assert_eq!(scm.stat("foo", "master", "a.txt").unwrap(), PathKind::File);
//! assert_eq!(scm.log("foo", "master").unwrap().len(), 2);
//! ```

pub mod checkout;
pub mod clock;
pub mod registry;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::core::error::ScmError;
use crate::core::repository::Repository;
use crate::core::revision::{FileChange, LogEntry, PathKind};
use crate::core::types::{RevisionHash, Timestamp};

use checkout::Destination;
use clock::{Clock, SystemClock};

/// Opaque controller identifier, stable for the controller's lifetime.
///
/// Suitable for persisting and later reviving through
/// [`registry::Registry::lookup`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControllerId(String);

impl ControllerId {
    /// Allocate a fresh, never-reused identifier.
    pub fn generate() -> Self {
        Self(format!("mockscm-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ControllerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ControllerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mutable state behind the controller lock.
#[derive(Debug, Default)]
struct ControllerState {
    repositories: HashMap<String, Repository>,
}

/// A set of named repositories behind one lock.
#[derive(Debug, Clone)]
pub struct Controller {
    id: ControllerId,
    inner: Arc<Mutex<ControllerState>>,
    clock: Arc<dyn Clock>,
}

impl Controller {
    /// Create an unregistered controller using wall-clock timestamps.
    ///
    /// Most callers want [`registry::Registry::create`] instead, which also
    /// makes the controller reachable by id.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an unregistered controller with a custom time source.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            id: ControllerId::generate(),
            inner: Arc::new(Mutex::new(ControllerState::default())),
            clock,
        }
    }

    pub fn id(&self) -> &ControllerId {
        &self.id
    }

    /// Discard all repositories. Called by the registry on close.
    fn release(&self) {
        let mut state = self.inner.lock();
        state.repositories.clear();
    }

    fn with_repo<T>(
        &self,
        repository: &str,
        f: impl FnOnce(&Repository) -> Result<T, ScmError>,
    ) -> Result<T, ScmError> {
        let state = self.inner.lock();
        let repo = state
            .repositories
            .get(repository)
            .ok_or_else(|| ScmError::UnknownRepository(repository.to_string()))?;
        f(repo)
    }

    fn with_repo_mut<T>(
        &self,
        repository: &str,
        f: impl FnOnce(&mut Repository) -> Result<T, ScmError>,
    ) -> Result<T, ScmError> {
        let mut state = self.inner.lock();
        let repo = state
            .repositories
            .get_mut(repository)
            .ok_or_else(|| ScmError::UnknownRepository(repository.to_string()))?;
        f(repo)
    }

    // --- repositories ---

    /// Create a repository whose `master` branch points at an empty root.
    pub fn create_repository(&self, name: &str) -> Result<(), ScmError> {
        let mut state = self.inner.lock();
        if state.repositories.contains_key(name) {
            return Err(ScmError::RepositoryExists(name.to_string()));
        }
        let repo = Repository::new(name, self.clock.now());
        state.repositories.insert(name.to_string(), repo);
        info!(controller = %self.id, repository = name, "created repository");
        Ok(())
    }

    /// Remove a repository with all its revisions and refs.
    pub fn delete_repository(&self, name: &str) -> Result<(), ScmError> {
        let mut state = self.inner.lock();
        state
            .repositories
            .remove(name)
            .ok_or_else(|| ScmError::UnknownRepository(name.to_string()))?;
        info!(controller = %self.id, repository = name, "deleted repository");
        Ok(())
    }

    /// Repository names in ascending order.
    pub fn list_repositories(&self) -> Vec<String> {
        let state = self.inner.lock();
        let mut names: Vec<String> = state.repositories.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn description(&self, repository: &str) -> Result<String, ScmError> {
        self.with_repo(repository, |repo| Ok(repo.description().to_string()))
    }

    pub fn set_description(&self, repository: &str, description: &str) -> Result<(), ScmError> {
        self.with_repo_mut(repository, |repo| {
            repo.set_description(description);
            Ok(())
        })
    }

    /// The primary branch, or `None` once it has been deleted.
    pub fn primary_branch(&self, repository: &str) -> Result<Option<String>, ScmError> {
        self.with_repo(repository, |repo| Ok(repo.primary_branch().map(str::to_string)))
    }

    pub fn set_primary_branch(&self, repository: &str, branch: &str) -> Result<(), ScmError> {
        self.with_repo_mut(repository, |repo| repo.set_primary_branch(branch))
    }

    // --- branches ---

    /// Point `branch` at a brand-new empty root revision.
    pub fn create_branch(&self, repository: &str, branch: &str) -> Result<RevisionHash, ScmError> {
        self.with_repo_mut(repository, |repo| {
            Ok(repo.create_branch(branch, self.clock.now()))
        })
    }

    /// Point `dst` at `src`'s current head.
    ///
    /// # Errors
    ///
    /// [`ScmError::UnknownBranch`] if `src` does not exist.
    pub fn clone_branch(
        &self,
        repository: &str,
        src: &str,
        dst: &str,
    ) -> Result<RevisionHash, ScmError> {
        self.with_repo_mut(repository, |repo| repo.clone_branch(src, dst))
    }

    /// Remove a branch ref. Removing an absent branch is a no-op.
    ///
    /// Deleting the primary branch leaves the repository without one.
    pub fn delete_branch(&self, repository: &str, branch: &str) -> Result<(), ScmError> {
        self.with_repo_mut(repository, |repo| {
            repo.delete_branch(branch);
            Ok(())
        })
    }

    pub fn list_branches(&self, repository: &str) -> Result<Vec<String>, ScmError> {
        self.with_repo(repository, |repo| Ok(repo.branches()))
    }

    /// Current head hash of `branch`.
    pub fn get_revision(&self, repository: &str, branch: &str) -> Result<RevisionHash, ScmError> {
        self.with_repo(repository, |repo| repo.branch_head(branch))
    }

    // --- tags ---

    /// Tag whatever `identifier` resolves to now.
    pub fn create_tag(
        &self,
        repository: &str,
        identifier: &str,
        tag: &str,
    ) -> Result<RevisionHash, ScmError> {
        self.with_repo_mut(repository, |repo| repo.create_tag(identifier, tag))
    }

    /// Remove a tag. Removing an absent tag is a no-op.
    pub fn delete_tag(&self, repository: &str, tag: &str) -> Result<(), ScmError> {
        self.with_repo_mut(repository, |repo| {
            repo.delete_tag(tag);
            Ok(())
        })
    }

    pub fn list_tags(&self, repository: &str) -> Result<Vec<String>, ScmError> {
        self.with_repo(repository, |repo| Ok(repo.tags()))
    }

    // --- change requests ---

    /// Open a change request from `branch`, targeting `branch`.
    pub fn open_change_request(&self, repository: &str, branch: &str) -> Result<u64, ScmError> {
        self.with_repo_mut(repository, |repo| repo.open_change_request(branch, None))
    }

    /// Open a change request with an explicit title.
    pub fn open_change_request_titled(
        &self,
        repository: &str,
        branch: &str,
        title: &str,
    ) -> Result<u64, ScmError> {
        self.with_repo_mut(repository, |repo| {
            repo.open_change_request(branch, Some(title.to_string()))
        })
    }

    /// Close a change request. Closing one that is not open is a no-op.
    pub fn close_change_request(&self, repository: &str, number: u64) -> Result<(), ScmError> {
        self.with_repo_mut(repository, |repo| {
            repo.close_change_request(number);
            Ok(())
        })
    }

    /// The branch a change request targets, if it is open.
    pub fn get_target(&self, repository: &str, number: u64) -> Result<Option<String>, ScmError> {
        self.with_repo(repository, |repo| {
            Ok(repo.change_request(number).map(|cr| cr.baseline.clone()))
        })
    }

    pub fn title(&self, repository: &str, number: u64) -> Result<Option<String>, ScmError> {
        self.with_repo(repository, |repo| {
            Ok(repo.change_request(number).map(|cr| cr.title.clone()))
        })
    }

    /// Current head hash of an open change request.
    pub fn get_change_request_revision(
        &self,
        repository: &str,
        number: u64,
    ) -> Result<RevisionHash, ScmError> {
        self.with_repo(repository, |repo| repo.change_request_head(number))
    }

    /// Open change-request numbers, ascending.
    pub fn list_change_requests(&self, repository: &str) -> Result<Vec<u64>, ScmError> {
        self.with_repo(repository, |repo| Ok(repo.change_requests()))
    }

    /// Open change requests targeting `branch`, ascending.
    pub fn change_requests_targeting(
        &self,
        repository: &str,
        branch: &str,
    ) -> Result<Vec<u64>, ScmError> {
        self.with_repo(repository, |repo| Ok(repo.change_requests_targeting(branch)))
    }

    // --- commits ---

    /// Commit `content` at `path` onto a branch or `change-request/<n>`.
    ///
    /// Returns the new head hash.
    pub fn add_file(
        &self,
        repository: &str,
        target: &str,
        message: &str,
        path: &str,
        content: impl Into<Vec<u8>>,
    ) -> Result<RevisionHash, ScmError> {
        let change = FileChange::Add {
            path: path.to_string(),
            content: content.into(),
        };
        self.with_repo_mut(repository, |repo| {
            repo.commit(target, message, change, || self.clock.now())
        })
    }

    /// Commit the removal of `path` onto a branch or `change-request/<n>`.
    ///
    /// Removing a path the snapshot lacks still creates a revision.
    pub fn rm_file(
        &self,
        repository: &str,
        target: &str,
        message: &str,
        path: &str,
    ) -> Result<RevisionHash, ScmError> {
        let change = FileChange::Remove {
            path: path.to_string(),
        };
        self.with_repo_mut(repository, |repo| {
            repo.commit(target, message, change, || self.clock.now())
        })
    }

    // --- reads ---

    /// Resolve `identifier` to a revision hash.
    pub fn resolve(&self, repository: &str, identifier: &str) -> Result<RevisionHash, ScmError> {
        self.with_repo(repository, |repo| Ok(repo.resolve(identifier)?.hash()))
    }

    /// Write every file of the resolved revision into `destination`.
    ///
    /// The snapshot is copied out under the lock and written after the lock
    /// is released. Returns the resolved hash.
    ///
    /// Writes are not transactional: if the destination rejects a file
    /// (for example `a` and `a/b` both present on a filesystem), files
    /// written before it stay in place and the error is returned.
    pub fn checkout(
        &self,
        destination: &mut dyn Destination,
        repository: &str,
        identifier: &str,
    ) -> Result<RevisionHash, ScmError> {
        let (hash, files) = self.with_repo(repository, |repo| {
            let revision = repo.resolve(identifier)?;
            Ok((revision.hash(), revision.files().clone()))
        })?;
        for (path, content) in &files {
            destination.write_file(path, content)?;
        }
        tracing::debug!(repository, identifier, %hash, files = files.len(), "checked out");
        Ok(hash)
    }

    /// History from the resolved revision to its root, newest first.
    pub fn log(&self, repository: &str, identifier: &str) -> Result<Vec<LogEntry>, ScmError> {
        self.with_repo(repository, |repo| repo.log(identifier))
    }

    /// Whether `path` is a file, a (virtual) directory, or absent.
    pub fn stat(
        &self,
        repository: &str,
        identifier: &str,
        path: &str,
    ) -> Result<PathKind, ScmError> {
        self.with_repo(repository, |repo| Ok(repo.resolve(identifier)?.stat(path)))
    }

    /// Timestamp of the resolved revision, or `None` if anything fails to
    /// resolve.
    pub fn last_modified(&self, repository: &str, identifier: &str) -> Option<Timestamp> {
        self.with_repo(repository, |repo| Ok(repo.resolve(identifier)?.timestamp()))
            .ok()
    }

    /// Content of `path` in the resolved revision.
    pub fn read_file(
        &self,
        repository: &str,
        identifier: &str,
        path: &str,
    ) -> Result<Option<Vec<u8>>, ScmError> {
        self.with_repo(repository, |repo| {
            Ok(repo.resolve(identifier)?.files().get(path).cloned())
        })
    }

    /// All file paths in the resolved revision, ascending.
    pub fn list_files(&self, repository: &str, identifier: &str) -> Result<Vec<String>, ScmError> {
        self.with_repo(repository, |repo| {
            Ok(repo.resolve(identifier)?.files().keys().cloned().collect())
        })
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

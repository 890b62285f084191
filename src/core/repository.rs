//! core::repository
//!
//! A single named repository: a revision arena plus three ref namespaces.
//!
//! # Invariants
//!
//! - `revisions` is append-only.
//! - Every branch, tag, and change-request head keys into `revisions`.
//! - A new repository has exactly one branch, `master`, at an empty root.
//! - Change-request numbers are allocated from a per-repository counter
//!   that never goes backwards, even when requests are closed.
//!
//! This type does no locking; the controller serializes access.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::error::ScmError;
use super::identifier::{parse_change_request, Identifier, RefTarget};
use super::revision::{FileChange, LogEntry, Revision};
use super::types::{RevisionHash, Timestamp};

/// Name of the branch every repository starts with.
pub const DEFAULT_BRANCH: &str = "master";

/// An open change request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRequest {
    /// Current head revision; advances as the request is amended.
    pub head: RevisionHash,
    /// Branch the request targets, fixed when opened.
    pub baseline: String,
    /// Human-readable title.
    pub title: String,
}

/// A named collection of revisions and refs.
#[derive(Debug)]
pub struct Repository {
    name: String,
    description: String,
    primary_branch: Option<String>,
    revisions: HashMap<RevisionHash, Revision>,
    branches: BTreeMap<String, RevisionHash>,
    tags: BTreeMap<String, RevisionHash>,
    change_requests: BTreeMap<u64, ChangeRequest>,
    last_change_request: u64,
}

impl Repository {
    /// Create a repository with a `master` branch at a fresh root.
    pub fn new(name: impl Into<String>, timestamp: Timestamp) -> Self {
        let mut repo = Self {
            name: name.into(),
            description: String::new(),
            primary_branch: Some(DEFAULT_BRANCH.to_string()),
            revisions: HashMap::new(),
            branches: BTreeMap::new(),
            tags: BTreeMap::new(),
            change_requests: BTreeMap::new(),
            last_change_request: 0,
        };
        repo.create_branch(DEFAULT_BRANCH, timestamp);
        repo
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// The primary branch, cleared when that branch is deleted.
    pub fn primary_branch(&self) -> Option<&str> {
        self.primary_branch.as_deref()
    }

    /// Set the primary branch. The branch must exist.
    pub fn set_primary_branch(&mut self, branch: &str) -> Result<(), ScmError> {
        if !self.branches.contains_key(branch) {
            return Err(self.unknown_branch(branch));
        }
        self.primary_branch = Some(branch.to_string());
        Ok(())
    }

    /// Number of revisions stored, reachable or not.
    pub fn revision_count(&self) -> usize {
        self.revisions.len()
    }

    /// Look up a revision by hash.
    pub fn revision(&self, hash: &RevisionHash) -> Option<&Revision> {
        self.revisions.get(hash)
    }

    fn insert(&mut self, revision: Revision) -> RevisionHash {
        let hash = revision.hash();
        self.revisions.insert(hash, revision);
        hash
    }

    // --- branches ---

    /// Point `branch` at a brand-new root revision, replacing any existing ref.
    pub fn create_branch(&mut self, branch: &str, timestamp: Timestamp) -> RevisionHash {
        let hash = self.insert(Revision::root(timestamp));
        self.branches.insert(branch.to_string(), hash);
        debug!(repository = %self.name, branch, %hash, "created branch");
        hash
    }

    /// Point `dst` at the revision `src` currently points at.
    ///
    /// # Errors
    ///
    /// [`ScmError::UnknownBranch`] if `src` does not exist; `dst` is left
    /// untouched.
    pub fn clone_branch(&mut self, src: &str, dst: &str) -> Result<RevisionHash, ScmError> {
        let hash = self.branch_head(src)?;
        self.branches.insert(dst.to_string(), hash);
        debug!(repository = %self.name, src, dst, %hash, "cloned branch");
        Ok(hash)
    }

    /// Remove a branch ref. Returns whether it existed.
    ///
    /// Deleting the primary branch clears it.
    pub fn delete_branch(&mut self, branch: &str) -> bool {
        let removed = self.branches.remove(branch).is_some();
        if removed {
            if self.primary_branch.as_deref() == Some(branch) {
                self.primary_branch = None;
            }
            debug!(repository = %self.name, branch, "deleted branch");
        }
        removed
    }

    /// Branch names in ascending order.
    pub fn branches(&self) -> Vec<String> {
        self.branches.keys().cloned().collect()
    }

    /// Current head of `branch`.
    pub fn branch_head(&self, branch: &str) -> Result<RevisionHash, ScmError> {
        self.branches
            .get(branch)
            .copied()
            .ok_or_else(|| self.unknown_branch(branch))
    }

    // --- tags ---

    /// Record `tag` at whatever `identifier` resolves to now.
    pub fn create_tag(&mut self, identifier: &str, tag: &str) -> Result<RevisionHash, ScmError> {
        let hash = self.resolve(identifier)?.hash();
        self.tags.insert(tag.to_string(), hash);
        debug!(repository = %self.name, tag, %hash, "created tag");
        Ok(hash)
    }

    /// Remove a tag. Returns whether it existed.
    pub fn delete_tag(&mut self, tag: &str) -> bool {
        let removed = self.tags.remove(tag).is_some();
        if removed {
            debug!(repository = %self.name, tag, "deleted tag");
        }
        removed
    }

    /// Tag names in ascending order.
    pub fn tags(&self) -> Vec<String> {
        self.tags.keys().cloned().collect()
    }

    // --- change requests ---

    /// Open a change request from `branch`'s current head, targeting `branch`.
    ///
    /// A `None` title defaults to `"Change request #<n>"`.
    pub fn open_change_request(
        &mut self,
        branch: &str,
        title: Option<String>,
    ) -> Result<u64, ScmError> {
        let head = self.branch_head(branch)?;
        self.last_change_request += 1;
        let number = self.last_change_request;
        let title = title.unwrap_or_else(|| format!("Change request #{number}"));
        self.change_requests.insert(
            number,
            ChangeRequest {
                head,
                baseline: branch.to_string(),
                title,
            },
        );
        debug!(repository = %self.name, number, baseline = branch, %head, "opened change request");
        Ok(number)
    }

    /// Close a change request, discarding its head and baseline. Returns
    /// whether it was open.
    pub fn close_change_request(&mut self, number: u64) -> bool {
        let removed = self.change_requests.remove(&number).is_some();
        if removed {
            debug!(repository = %self.name, number, "closed change request");
        }
        removed
    }

    /// Open change-request numbers in ascending order.
    pub fn change_requests(&self) -> Vec<u64> {
        self.change_requests.keys().copied().collect()
    }

    /// Open change requests whose baseline is `branch`, ascending.
    pub fn change_requests_targeting(&self, branch: &str) -> Vec<u64> {
        self.change_requests
            .iter()
            .filter(|(_, cr)| cr.baseline == branch)
            .map(|(n, _)| *n)
            .collect()
    }

    pub fn change_request(&self, number: u64) -> Option<&ChangeRequest> {
        self.change_requests.get(&number)
    }

    /// Current head of change request `number`.
    pub fn change_request_head(&self, number: u64) -> Result<RevisionHash, ScmError> {
        self.change_requests
            .get(&number)
            .map(|cr| cr.head)
            .ok_or_else(|| self.unknown_change_request(number))
    }

    // --- resolution ---

    /// Classify `identifier` against this repository.
    ///
    /// Priority: revision hash, branch, tag, change-request pattern.
    pub fn classify(&self, identifier: &str) -> Identifier {
        if let Ok(hash) = identifier.parse::<RevisionHash>() {
            if self.revisions.contains_key(&hash) {
                return Identifier::Hash(hash);
            }
        }
        if self.branches.contains_key(identifier) {
            return Identifier::Branch(identifier.to_string());
        }
        if self.tags.contains_key(identifier) {
            return Identifier::Tag(identifier.to_string());
        }
        match parse_change_request(identifier) {
            Some(number) => Identifier::ChangeRequest(number),
            None => Identifier::Unrecognized(identifier.to_string()),
        }
    }

    /// Resolve `identifier` to a revision.
    ///
    /// # Errors
    ///
    /// - [`ScmError::UnknownChangeRequest`] if it names a change request that is not open
    /// - [`ScmError::UnknownIdentifier`] if nothing matches
    pub fn resolve(&self, identifier: &str) -> Result<&Revision, ScmError> {
        let hash = match self.classify(identifier) {
            Identifier::Hash(hash) => hash,
            Identifier::Branch(name) => self.branch_head(&name)?,
            Identifier::Tag(name) => self
                .tags
                .get(&name)
                .copied()
                .ok_or_else(|| ScmError::UnknownIdentifier {
                    repository: self.name.clone(),
                    identifier: name.clone(),
                })?,
            Identifier::ChangeRequest(number) => self.change_request_head(number)?,
            Identifier::Unrecognized(identifier) => {
                return Err(ScmError::UnknownIdentifier {
                    repository: self.name.clone(),
                    identifier,
                })
            }
        };
        self.revisions
            .get(&hash)
            .ok_or_else(|| ScmError::UnknownIdentifier {
                repository: self.name.clone(),
                identifier: identifier.to_string(),
            })
    }

    /// Revision history from `identifier` back to its root, newest first.
    pub fn log(&self, identifier: &str) -> Result<Vec<LogEntry>, ScmError> {
        let mut entries = Vec::new();
        let mut current = Some(self.resolve(identifier)?);
        while let Some(revision) = current {
            entries.push(revision.log_entry());
            current = revision.parent().and_then(|p| self.revisions.get(p));
        }
        Ok(entries)
    }

    // --- commits ---

    /// Classify a commit target: exact branch name first, then the
    /// change-request pattern.
    pub fn ref_target(&self, target: &str) -> Result<RefTarget, ScmError> {
        if self.branches.contains_key(target) {
            return Ok(RefTarget::Branch(target.to_string()));
        }
        match parse_change_request(target) {
            Some(number) if self.change_requests.contains_key(&number) => {
                Ok(RefTarget::ChangeRequest(number))
            }
            Some(number) => Err(self.unknown_change_request(number)),
            None => Err(ScmError::UnknownTarget {
                repository: self.name.clone(),
                target: target.to_string(),
            }),
        }
    }

    /// Append a child of `target`'s head with `change` applied and advance
    /// `target` to it.
    ///
    /// Nothing is inserted unless the target resolves, and `timestamp` is
    /// only called once it has.
    pub fn commit(
        &mut self,
        target: &str,
        message: &str,
        change: FileChange,
        timestamp: impl FnOnce() -> Timestamp,
    ) -> Result<RevisionHash, ScmError> {
        let target = self.ref_target(target)?;
        let parent_hash = match &target {
            RefTarget::Branch(name) => self.branch_head(name)?,
            RefTarget::ChangeRequest(number) => self.change_request_head(*number)?,
        };
        let parent = self
            .revisions
            .get(&parent_hash)
            .ok_or_else(|| ScmError::UnknownIdentifier {
                repository: self.name.clone(),
                identifier: parent_hash.to_hex(),
            })?;

        let path = change.path().to_string();
        let child = Revision::child(parent, message, timestamp(), change);
        let hash = self.insert(child);

        match &target {
            RefTarget::Branch(name) => {
                self.branches.insert(name.clone(), hash);
            }
            RefTarget::ChangeRequest(number) => {
                if let Some(cr) = self.change_requests.get_mut(number) {
                    cr.head = hash;
                }
            }
        }
        debug!(repository = %self.name, %target, path = %path, %hash, "committed");
        Ok(hash)
    }

    fn unknown_branch(&self, branch: &str) -> ScmError {
        ScmError::UnknownBranch {
            repository: self.name.clone(),
            branch: branch.to_string(),
        }
    }

    fn unknown_change_request(&self, number: u64) -> ScmError {
        ScmError::UnknownChangeRequest {
            repository: self.name.clone(),
            number,
        }
    }
}

//! core::revision
//!
//! Immutable revision (commit) nodes.
//!
//! # Design
//!
//! A revision records its parent by hash, never by reference, so revisions
//! live in a flat per-repository arena keyed by [`RevisionHash`]. Each
//! revision owns a full copy of its file snapshot; building a child clones
//! the parent's snapshot and applies one [`FileChange`] to the copy.
//!
//! The hash is computed on first request and cached.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Serialize;

use super::hash::compute_hash;
use super::types::{RevisionHash, Timestamp};

/// A single-path edit applied when deriving a child revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    /// Add or overwrite `path` with `content`.
    Add { path: String, content: Vec<u8> },
    /// Remove `path`; a no-op on the snapshot if it is not present.
    Remove { path: String },
}

impl FileChange {
    /// The path this change touches.
    pub fn path(&self) -> &str {
        match self {
            FileChange::Add { path, .. } | FileChange::Remove { path } => path,
        }
    }
}

/// An immutable commit node.
#[derive(Debug)]
pub struct Revision {
    parent: Option<RevisionHash>,
    message: Option<String>,
    timestamp: Timestamp,
    files: BTreeMap<String, Vec<u8>>,
    hash: OnceLock<RevisionHash>,
}

impl Revision {
    /// Create a root revision: no parent, no message, empty snapshot.
    pub fn root(timestamp: Timestamp) -> Self {
        Self {
            parent: None,
            message: None,
            timestamp,
            files: BTreeMap::new(),
            hash: OnceLock::new(),
        }
    }

    /// Derive a child of `parent` with one file change applied.
    ///
    /// The parent's snapshot is copied, never modified.
    pub fn child(
        parent: &Revision,
        message: impl Into<String>,
        timestamp: Timestamp,
        change: FileChange,
    ) -> Self {
        let mut files = parent.files.clone();
        match change {
            FileChange::Add { path, content } => {
                files.insert(path, content);
            }
            FileChange::Remove { path } => {
                files.remove(&path);
            }
        }

        Self {
            parent: Some(parent.hash()),
            message: Some(message.into()),
            timestamp,
            files,
            hash: OnceLock::new(),
        }
    }

    /// The content hash identifying this revision.
    pub fn hash(&self) -> RevisionHash {
        *self.hash.get_or_init(|| {
            compute_hash(
                self.parent.as_ref(),
                self.message.as_deref(),
                self.timestamp,
                &self.files,
            )
        })
    }

    /// The parent revision's hash, or `None` for a root.
    pub fn parent(&self) -> Option<&RevisionHash> {
        self.parent.as_ref()
    }

    /// The commit message, or `None` for a root.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// When this revision was created.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// The full file snapshot, ordered by path.
    pub fn files(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.files
    }

    /// Whether this revision has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Summarize this revision as a log entry.
    pub fn log_entry(&self) -> LogEntry {
        LogEntry {
            hash: self.hash(),
            timestamp: self.timestamp,
            message: self.message.clone(),
        }
    }
}

/// One line of revision history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub hash: RevisionHash,
    pub timestamp: Timestamp,
    pub message: Option<String>,
}

/// What a path denotes in a snapshot.
///
/// Directories are virtual: a path is a directory when some file lives
/// beneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    File,
    Directory,
    Absent,
}

impl Revision {
    /// Classify `path` against this revision's snapshot.
    pub fn stat(&self, path: &str) -> PathKind {
        if self.files.contains_key(path) {
            return PathKind::File;
        }
        let prefix = format!("{path}/");
        if self.files.keys().any(|k| k.starts_with(&prefix)) {
            PathKind::Directory
        } else {
            PathKind::Absent
        }
    }
}

impl std::fmt::Display for PathKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PathKind::File => "file",
            PathKind::Directory => "directory",
            PathKind::Absent => "absent",
        };
        f.write_str(s)
    }
}

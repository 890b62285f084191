//! controller::checkout
//!
//! Destinations that a revision snapshot can be materialized into.
//!
//! # Design
//!
//! Checkout writes every file of a snapshot, every time. There is no
//! incremental update and nothing is deleted from the destination.
//! Encoding of characters the underlying filesystem cannot represent is
//! the caller's concern; [`FsDestination`] only refuses paths that would
//! escape its root.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::core::error::ScmError;

/// A writable file tree.
pub trait Destination {
    /// Write `content` at the relative `path`, creating parents as needed.
    fn write_file(&mut self, path: &str, content: &[u8]) -> Result<(), ScmError>;
}

/// A directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsDestination {
    root: PathBuf,
}

impl FsDestination {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a snapshot path to a location under the root.
    ///
    /// Rejects empty, absolute, and parent-relative paths.
    fn target(&self, path: &str) -> Result<PathBuf, ScmError> {
        let relative = Path::new(path);
        let safe = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !safe {
            return Err(ScmError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl Destination for FsDestination {
    fn write_file(&mut self, path: &str, content: &[u8]) -> Result<(), ScmError> {
        let target = self.target(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| ScmError::Checkout {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&target, content).map_err(|source| ScmError::Checkout {
            path: target,
            source,
        })
    }
}

/// An in-memory file tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDestination {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryDestination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.files
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn into_files(self) -> BTreeMap<String, Vec<u8>> {
        self.files
    }
}

impl Destination for MemoryDestination {
    fn write_file(&mut self, path: &str, content: &[u8]) -> Result<(), ScmError> {
        self.files.insert(path.to_string(), content.to_vec());
        Ok(())
    }
}

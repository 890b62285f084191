//! fixture
//!
//! Declarative fixture files.
//!
//! # Overview
//!
//! A fixture is a TOML file describing repositories and an ordered list of
//! mutations for each. Applying it to a controller replays the mutations
//! through the public controller API, so a fixture can produce nothing a
//! test could not produce by hand.
//!
//! With a `[clock]` section the resulting hashes are reproducible; without
//! one, revisions are stamped with the wall clock.
//!
//! # Example
//!
//! ```
//! use mockscm::controller::registry::Registry;
//! use mockscm::fixture::Fixture;
//!
//! let fixture = Fixture::from_toml_str(r#"
//!     [clock]
//!     fixed = 0
//!
//!     [[repository]]
//!     name = "foo"
//!
//!     [[repository.step]]
//!     op = "add-file"
//!     target = "master"
//!     message = "m1"
//!     path = "a.txt"
//!     content_hex = "010203"
//! "#).unwrap();
//!
//! let registry = Registry::new();
//! let scm = registry.scoped_with_clock(fixture.clock());
//! fixture.apply(&scm).unwrap();
//!
//! assert_eq!(
//!     scm.get_revision("foo", "master").unwrap().to_hex(),
//!     "01e903b4953a82d599fe685aeb8eb000a373db1c"
//! );
//! ```

pub mod schema;

pub use schema::{ClockConfig, FixtureFile, RepositoryFixture, Step};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::controller::clock::{Clock, FixedClock, ManualClock, SystemClock};
use crate::controller::Controller;
use crate::core::error::ScmError;
use crate::core::types::Timestamp;

/// Errors from fixture operations.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse fixture '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid fixture value: {0}")]
    InvalidValue(String),

    #[error("repository '{repository}' step {index} ({op}) failed: {source}")]
    ApplyError {
        repository: String,
        index: usize,
        op: &'static str,
        source: ScmError,
    },

    #[error("repository '{repository}' failed: {source}")]
    RepositoryError {
        repository: String,
        source: ScmError,
    },
}

/// A parsed and validated fixture.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    file: FixtureFile,
    path: Option<PathBuf>,
}

impl Fixture {
    /// Load and validate a fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds an
    /// invalid value.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let content = fs::read_to_string(path).map_err(|e| FixtureError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut fixture = Self::parse(&content, path)?;
        fixture.path = Some(path.to_path_buf());
        Ok(fixture)
    }

    /// Parse and validate fixture TOML held in memory.
    pub fn from_toml_str(content: &str) -> Result<Self, FixtureError> {
        Self::parse(content, Path::new("<inline>"))
    }

    fn parse(content: &str, path: &Path) -> Result<Self, FixtureError> {
        let file: FixtureFile = toml::from_str(content).map_err(|e| FixtureError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;
        Ok(Self { file, path: None })
    }

    /// The parsed contents.
    pub fn file(&self) -> &FixtureFile {
        &self.file
    }

    /// Where the fixture was loaded from, if from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The time source the fixture asks for.
    pub fn clock(&self) -> Arc<dyn Clock> {
        match &self.file.clock {
            Some(ClockConfig {
                fixed: Some(fixed), ..
            }) => Arc::new(FixedClock(Timestamp::from_millis(*fixed))),
            Some(ClockConfig {
                start: Some(start),
                step,
                ..
            }) => Arc::new(ManualClock::new(
                Timestamp::from_millis(*start),
                step.unwrap_or(1),
            )),
            _ => Arc::new(SystemClock),
        }
    }

    /// Create every repository and replay its steps against `controller`.
    ///
    /// Stops at the first failing step; earlier steps stay applied.
    pub fn apply(&self, controller: &Controller) -> Result<(), FixtureError> {
        for repo in &self.file.repositories {
            let name = repo.name.as_str();
            let wrap = |source| FixtureError::RepositoryError {
                repository: name.to_string(),
                source,
            };

            controller.create_repository(name).map_err(wrap)?;
            if let Some(description) = &repo.description {
                controller.set_description(name, description).map_err(wrap)?;
            }

            for (index, step) in repo.steps.iter().enumerate() {
                apply_step(controller, name, step).map_err(|source| FixtureError::ApplyError {
                    repository: name.to_string(),
                    index,
                    op: step.op(),
                    source,
                })?;
            }

            if let Some(primary) = &repo.primary_branch {
                controller.set_primary_branch(name, primary).map_err(wrap)?;
            }
            debug!(repository = name, steps = repo.steps.len(), "applied fixture");
        }
        Ok(())
    }
}

fn apply_step(controller: &Controller, repository: &str, step: &Step) -> Result<(), ScmError> {
    match step {
        Step::CreateBranch { name } => {
            controller.create_branch(repository, name)?;
        }
        Step::CloneBranch { from, to } => {
            controller.clone_branch(repository, from, to)?;
        }
        Step::DeleteBranch { name } => controller.delete_branch(repository, name)?,
        Step::AddFile {
            target,
            message,
            path,
            ..
        } => {
            // Content was checked during validation.
            let content = step.content_bytes().unwrap_or_default();
            controller.add_file(repository, target, message, path, content)?;
        }
        Step::RmFile {
            target,
            message,
            path,
        } => {
            controller.rm_file(repository, target, message, path)?;
        }
        Step::Tag { at, name } => {
            controller.create_tag(repository, at, name)?;
        }
        Step::DeleteTag { name } => controller.delete_tag(repository, name)?,
        Step::OpenChangeRequest { branch, title } => {
            match title {
                Some(title) => controller.open_change_request_titled(repository, branch, title)?,
                None => controller.open_change_request(repository, branch)?,
            };
        }
        Step::CloseChangeRequest { number } => {
            controller.close_change_request(repository, *number)?
        }
    }
    Ok(())
}

//! fixture::schema
//!
//! Fixture file schema types.
//!
//! # Example
//!
//! ```toml
//! [clock]
//! start = 1700000000000
//! step = 1000
//!
//! [[repository]]
//! name = "foo"
//! description = "Discovery fixture"
//!
//! [[repository.step]]
//! op = "add-file"
//! target = "master"
//! message = "initial"
//! path = "Jenkinsfile"
//! content = "node {}"
//!
//! [[repository.step]]
//! op = "clone-branch"
//! from = "master"
//! to = "feature"
//!
//! [[repository.step]]
//! op = "open-change-request"
//! branch = "master"
//! ```
//!
//! # Validation
//!
//! Values are validated after parsing, before any step runs.

use serde::{Deserialize, Serialize};

use super::FixtureError;

/// A complete fixture file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureFile {
    /// Timestamp source for every revision the fixture creates.
    pub clock: Option<ClockConfig>,

    /// Repositories, created in file order.
    #[serde(rename = "repository")]
    pub repositories: Vec<RepositoryFixture>,
}

impl FixtureFile {
    /// Validate the fixture values.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), FixtureError> {
        if let Some(clock) = &self.clock {
            clock.validate()?;
        }

        let mut seen = std::collections::HashSet::new();
        for repo in &self.repositories {
            if repo.name.is_empty() {
                return Err(FixtureError::InvalidValue(
                    "repository name cannot be empty".into(),
                ));
            }
            if !seen.insert(repo.name.as_str()) {
                return Err(FixtureError::InvalidValue(format!(
                    "repository '{}' is declared more than once",
                    repo.name
                )));
            }
            for step in &repo.steps {
                step.validate()?;
            }
        }

        Ok(())
    }
}

/// Clock settings.
///
/// Either `fixed`, or `start` with an optional `step` (default 1ms).
/// Omitting the section uses the wall clock.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ClockConfig {
    /// Every revision gets this timestamp (ms since epoch).
    pub fixed: Option<i64>,

    /// First timestamp handed out (ms since epoch).
    pub start: Option<i64>,

    /// Increment after each timestamp.
    pub step: Option<i64>,
}

impl ClockConfig {
    fn validate(&self) -> Result<(), FixtureError> {
        if self.fixed.is_some() && (self.start.is_some() || self.step.is_some()) {
            return Err(FixtureError::InvalidValue(
                "clock.fixed cannot be combined with clock.start or clock.step".into(),
            ));
        }
        if self.step.is_some() && self.start.is_none() {
            return Err(FixtureError::InvalidValue(
                "clock.step requires clock.start".into(),
            ));
        }
        Ok(())
    }
}

/// One repository and the steps that populate it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RepositoryFixture {
    /// Repository name
    pub name: String,

    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,

    /// Primary branch, applied after all steps (default: master)
    #[serde(default)]
    pub primary_branch: Option<String>,

    /// Mutations, applied in order
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

/// A single mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "kebab-case", deny_unknown_fields)]
pub enum Step {
    CreateBranch {
        name: String,
    },
    CloneBranch {
        from: String,
        to: String,
    },
    DeleteBranch {
        name: String,
    },
    AddFile {
        target: String,
        message: String,
        path: String,
        #[serde(default)]
        content: Option<String>,
        #[serde(default)]
        content_hex: Option<String>,
    },
    RmFile {
        target: String,
        message: String,
        path: String,
    },
    Tag {
        at: String,
        name: String,
    },
    DeleteTag {
        name: String,
    },
    OpenChangeRequest {
        branch: String,
        #[serde(default)]
        title: Option<String>,
    },
    CloseChangeRequest {
        number: u64,
    },
}

impl Step {
    /// Short name of the operation, as written in the file.
    pub fn op(&self) -> &'static str {
        match self {
            Step::CreateBranch { .. } => "create-branch",
            Step::CloneBranch { .. } => "clone-branch",
            Step::DeleteBranch { .. } => "delete-branch",
            Step::AddFile { .. } => "add-file",
            Step::RmFile { .. } => "rm-file",
            Step::Tag { .. } => "tag",
            Step::DeleteTag { .. } => "delete-tag",
            Step::OpenChangeRequest { .. } => "open-change-request",
            Step::CloseChangeRequest { .. } => "close-change-request",
        }
    }

    fn validate(&self) -> Result<(), FixtureError> {
        if let Step::AddFile { .. } = self {
            self.content_bytes()?;
        }
        Ok(())
    }

    /// Decoded content of an `add-file` step; empty for other steps.
    ///
    /// # Errors
    ///
    /// `FixtureError::InvalidValue` if both or neither of `content` and
    /// `content_hex` are set, or the hex does not decode.
    pub fn content_bytes(&self) -> Result<Vec<u8>, FixtureError> {
        match self {
            Step::AddFile {
                path,
                content,
                content_hex,
                ..
            } => match (content, content_hex) {
                (Some(text), None) => Ok(text.as_bytes().to_vec()),
                (None, Some(encoded)) => hex::decode(encoded).map_err(|e| {
                    FixtureError::InvalidValue(format!("content_hex for '{path}': {e}"))
                }),
                _ => Err(FixtureError::InvalidValue(format!(
                    "add-file '{path}' needs exactly one of content or content_hex"
                ))),
            },
            _ => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> FixtureFile {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(parse(""), FixtureFile::default());
    }

    #[test]
    fn parses_steps_in_order() {
        let file = parse(
            r#"
            [[repository]]
            name = "foo"

            [[repository.step]]
            op = "create-branch"
            name = "dev"

            [[repository.step]]
            op = "add-file"
            target = "dev"
            message = "m"
            path = "a"
            content = "x"

            [[repository.step]]
            op = "close-change-request"
            number = 3
            "#,
        );
        let ops: Vec<_> = file.repositories[0].steps.iter().map(Step::op).collect();
        assert_eq!(ops, vec!["create-branch", "add-file", "close-change-request"]);
        file.validate().unwrap();
    }

    #[test]
    fn rejects_unknown_top_level_fields() {
        let result: Result<FixtureFile, _> = toml::from_str("bogus = 1");
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_op() {
        let result: Result<FixtureFile, _> = toml::from_str(
            r#"
            [[repository]]
            name = "foo"
            [[repository.step]]
            op = "rebase"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn content_hex_decodes() {
        let step = Step::AddFile {
            target: "master".into(),
            message: "m".into(),
            path: "bin".into(),
            content: None,
            content_hex: Some("010203".into()),
        };
        assert_eq!(step.content_bytes().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn content_requires_exactly_one_source() {
        let both = Step::AddFile {
            target: "master".into(),
            message: "m".into(),
            path: "a".into(),
            content: Some("x".into()),
            content_hex: Some("00".into()),
        };
        assert!(both.content_bytes().is_err());

        let neither = Step::AddFile {
            target: "master".into(),
            message: "m".into(),
            path: "a".into(),
            content: None,
            content_hex: None,
        };
        assert!(neither.content_bytes().is_err());
    }

    #[test]
    fn clock_conflicts_rejected() {
        let clock = ClockConfig {
            fixed: Some(0),
            start: Some(0),
            step: None,
        };
        assert!(clock.validate().is_err());

        let step_only = ClockConfig {
            fixed: None,
            start: None,
            step: Some(5),
        };
        assert!(step_only.validate().is_err());
    }

    #[test]
    fn duplicate_repository_rejected() {
        let file = parse(
            r#"
            [[repository]]
            name = "foo"
            [[repository]]
            name = "foo"
            "#,
        );
        assert!(matches!(
            file.validate(),
            Err(FixtureError::InvalidValue(_))
        ));
    }
}

//! core::error
//!
//! Error taxonomy for store operations.
//!
//! Every lookup failure is reported synchronously to the caller. Mutations
//! that fail leave the store unchanged.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum ScmError {
    /// The named repository does not exist.
    #[error("unknown repository: {0}")]
    UnknownRepository(String),

    /// A repository with this name already exists.
    #[error("repository already exists: {0}")]
    RepositoryExists(String),

    /// The named branch does not exist.
    #[error("unknown branch: {branch} in repository {repository}")]
    UnknownBranch { repository: String, branch: String },

    /// The identifier matched the change-request pattern but the number is not open.
    #[error("unknown change request: {number} in repository {repository}")]
    UnknownChangeRequest { repository: String, number: u64 },

    /// A commit target is neither a branch nor a change-request identifier.
    #[error("unknown branch/change-request: {target} in repository {repository}")]
    UnknownTarget { repository: String, target: String },

    /// No hash, branch, tag, or change request matches the identifier.
    #[error("unknown identifier: {identifier} in repository {repository}")]
    UnknownIdentifier {
        repository: String,
        identifier: String,
    },

    /// A snapshot path cannot be written into the checkout destination.
    #[error("invalid path for checkout: '{0}'")]
    InvalidPath(String),

    /// Writing into the checkout destination failed.
    #[error("checkout failed writing '{path}': {source}")]
    Checkout {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ScmError {
    /// Whether this is a lookup failure (repository, ref, or identifier).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ScmError::UnknownRepository(_)
                | ScmError::UnknownBranch { .. }
                | ScmError::UnknownChangeRequest { .. }
                | ScmError::UnknownTarget { .. }
                | ScmError::UnknownIdentifier { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_covers_lookup_failures() {
        assert!(ScmError::UnknownRepository("x".into()).is_not_found());
        assert!(ScmError::UnknownIdentifier {
            repository: "r".into(),
            identifier: "x".into()
        }
        .is_not_found());
        assert!(!ScmError::RepositoryExists("x".into()).is_not_found());
        assert!(!ScmError::InvalidPath("../x".into()).is_not_found());
    }

    #[test]
    fn messages_name_repository() {
        let err = ScmError::UnknownBranch {
            repository: "foo".into(),
            branch: "dev".into(),
        };
        assert_eq!(err.to_string(), "unknown branch: dev in repository foo");
    }
}

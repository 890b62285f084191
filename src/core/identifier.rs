//! core::identifier
//!
//! Identifier classification.
//!
//! An identifier string is classified once per call into an [`Identifier`]
//! against a specific repository, then matched exhaustively. The priority
//! order is fixed: revision hash, branch, tag, change request.
//!
//! Mutations (`add_file`/`rm_file`) accept a narrower grammar, a
//! [`RefTarget`]: a branch name, or `change-request/<number>`.

use super::types::RevisionHash;

/// Literal prefix of change-request identifiers.
pub const CHANGE_REQUEST_PREFIX: &str = "change-request/";

/// Parse the `change-request/<digits>` form.
///
/// Returns `None` if `identifier` does not match the pattern, or if the
/// number does not fit in a `u64`.
///
/// # Example
///
/// ```
/// use mockscm::core::identifier::parse_change_request;
///
/// assert_eq!(parse_change_request("change-request/12"), Some(12));
/// assert_eq!(parse_change_request("change-request/"), None);
/// assert_eq!(parse_change_request("change-request/+1"), None);
/// assert_eq!(parse_change_request("master"), None);
/// ```
pub fn parse_change_request(identifier: &str) -> Option<u64> {
    let digits = identifier.strip_prefix(CHANGE_REQUEST_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Format a change-request number as an identifier.
pub fn change_request_identifier(number: u64) -> String {
    format!("{CHANGE_REQUEST_PREFIX}{number}")
}

/// A resolved classification of an identifier within one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// A key in the revision arena.
    Hash(RevisionHash),
    /// A branch name.
    Branch(String),
    /// A tag name.
    Tag(String),
    /// Matches the change-request pattern. The number may or may not be live.
    ChangeRequest(u64),
    /// None of the above.
    Unrecognized(String),
}

/// The ref a commit advances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefTarget {
    Branch(String),
    ChangeRequest(u64),
}

impl std::fmt::Display for RefTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefTarget::Branch(name) => f.write_str(name),
            RefTarget::ChangeRequest(n) => f.write_str(&change_request_identifier(*n)),
        }
    }
}

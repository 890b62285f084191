//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`RevisionHash`] - Content hash identifying a revision (SHA-1, 40 hex digits)
//! - [`Timestamp`] - Wall-clock instant in milliseconds since the Unix epoch
//!
//! # Validation
//!
//! These types enforce validity at construction time. A `RevisionHash`
//! always holds exactly 20 bytes, so its hex form is always canonical.
//!
//! # Examples
//!
//! ```
//! use mockscm::core::types::{RevisionHash, Timestamp};
//!
//! let hash: RevisionHash = "05fe405753166f125559e7c9ac558654f107c7e9".parse().unwrap();
//! assert_eq!(hash.short(7), "05fe405");
//!
//! // Only canonical lowercase hex is accepted
//! assert!("05FE405753166F125559E7C9AC558654F107C7E9".parse::<RevisionHash>().is_err());
//! assert!("not-a-hash".parse::<RevisionHash>().is_err());
//!
//! let ts = Timestamp::from_millis(1_700_000_000_000);
//! assert_eq!(ts.to_le_bytes()[0], 0x00);
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid revision hash: {0}")]
    InvalidHash(String),
}

/// The identity of a revision: a 160-bit content digest.
///
/// Rendered and parsed as 40 lowercase hexadecimal digits. Parsing is
/// strict: uppercase or abbreviated forms are rejected, because revision
/// lookup is an exact string match on the rendered form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RevisionHash([u8; 20]);

impl RevisionHash {
    /// Length of the rendered hash in hex digits.
    pub const HEX_LEN: usize = 40;

    /// Wrap a raw 20-byte digest.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// The raw digest bytes, big-endian as produced by the digest.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Render as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get an abbreviated form of the hash.
    ///
    /// Returns the first `len` hex digits, or the full hash if `len`
    /// exceeds its length.
    pub fn short(&self, len: usize) -> String {
        let mut hex = self.to_hex();
        hex.truncate(len.min(Self::HEX_LEN));
        hex
    }
}

impl FromStr for RevisionHash {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != Self::HEX_LEN {
            return Err(TypeError::InvalidHash(format!(
                "expected {} hex characters, got {}",
                Self::HEX_LEN,
                s.len()
            )));
        }
        if !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(TypeError::InvalidHash(
                "revision hash must be lowercase hexadecimal".into(),
            ));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| TypeError::InvalidHash(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for RevisionHash {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RevisionHash> for String {
    fn from(hash: RevisionHash) -> Self {
        hash.to_hex()
    }
}

impl fmt::Display for RevisionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for RevisionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RevisionHash({})", self.to_hex())
    }
}

/// A wall-clock instant, in milliseconds since the Unix epoch.
///
/// Timestamps carry no ordering guarantee across revisions; they only
/// contribute to the content hash and to log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The Unix epoch.
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Create a timestamp from milliseconds since the epoch.
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    /// Milliseconds since the epoch.
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// The 8 bytes of the timestamp, low byte first.
    pub const fn to_le_bytes(&self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    /// Convert to a chrono datetime, if representable.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.0).single()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "{}ms", self.0),
        }
    }
}

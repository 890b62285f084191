//! core::hash
//!
//! Deterministic content hashing of revisions.
//!
//! # Digest input
//!
//! The digest is SHA-1 over, in order:
//!
//! 1. the parent's hash (if any), read as a non-negative big integer and
//!    encoded as its minimal two's-complement big-endian bytes (see
//!    [`signed_magnitude_bytes`]);
//! 2. the UTF-8 message (nothing if absent);
//! 3. the 8 timestamp bytes, low byte first;
//! 4. for each file in ascending path order, the UTF-8 path followed by the
//!    raw content.
//!
//! There are no separators between fields. Identical inputs always produce
//! the same hash, across runs and across processes.

use std::collections::BTreeMap;

use sha1::{Digest, Sha1};

use super::types::{RevisionHash, Timestamp};

/// Encode a big-endian unsigned magnitude as the minimal two's-complement
/// byte string of the same (non-negative) value.
///
/// Leading zero bytes are stripped. If the most significant remaining byte
/// has its top bit set, a single `0x00` is prepended so the value does not
/// read as negative. Zero encodes as `[0x00]`.
///
/// # Example
///
/// ```
/// use mockscm::core::hash::signed_magnitude_bytes;
///
/// assert_eq!(signed_magnitude_bytes(&[0x00, 0x7f]), vec![0x7f]);
/// assert_eq!(signed_magnitude_bytes(&[0x00, 0xff]), vec![0x00, 0xff]);
/// assert_eq!(signed_magnitude_bytes(&[0x00, 0x00]), vec![0x00]);
/// ```
pub fn signed_magnitude_bytes(magnitude: &[u8]) -> Vec<u8> {
    let significant = match magnitude.iter().position(|&b| b != 0) {
        Some(start) => &magnitude[start..],
        None => return vec![0],
    };

    let mut out = Vec::with_capacity(significant.len() + 1);
    if significant[0] & 0x80 != 0 {
        out.push(0);
    }
    out.extend_from_slice(significant);
    out
}

/// Compute the content hash for a revision's fields.
///
/// `files` is the revision's full resulting snapshot; `BTreeMap` iteration
/// supplies the ascending path order.
pub fn compute_hash(
    parent: Option<&RevisionHash>,
    message: Option<&str>,
    timestamp: Timestamp,
    files: &BTreeMap<String, Vec<u8>>,
) -> RevisionHash {
    let mut hasher = Sha1::new();
    if let Some(parent) = parent {
        hasher.update(signed_magnitude_bytes(parent.as_bytes()));
    }
    if let Some(message) = message {
        hasher.update(message.as_bytes());
    }
    hasher.update(timestamp.to_le_bytes());
    for (path, content) in files {
        hasher.update(path.as_bytes());
        hasher.update(content);
    }
    RevisionHash::from_bytes(hasher.finalize().into())
}

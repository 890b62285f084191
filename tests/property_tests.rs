//! Property-based tests for the store.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated commit sequences.

use std::collections::BTreeMap;
use std::sync::Arc;

use proptest::prelude::*;

use mockscm::controller::checkout::MemoryDestination;
use mockscm::controller::clock::ManualClock;
use mockscm::core::hash::signed_magnitude_bytes;
use mockscm::{Controller, PathKind, RevisionHash, Timestamp};

/// A single generated edit.
#[derive(Debug, Clone)]
enum Edit {
    Add {
        path: String,
        content: Vec<u8>,
        message: String,
    },
    Remove {
        path: String,
        message: String,
    },
}

/// Strategy for generating snapshot paths with up to three components.
fn path() -> impl Strategy<Value = String> {
    "[a-z]{1,6}(/[a-z]{1,6}){0,2}"
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        3 => (path(), prop::collection::vec(any::<u8>(), 0..32), "[ -~]{0,20}")
            .prop_map(|(path, content, message)| Edit::Add { path, content, message }),
        1 => (path(), "[ -~]{0,20}")
            .prop_map(|(path, message)| Edit::Remove { path, message }),
    ]
}

fn controller(start: i64) -> Controller {
    let scm = Controller::with_clock(Arc::new(ManualClock::new(
        Timestamp::from_millis(start),
        1,
    )));
    scm.create_repository("repo").unwrap();
    scm
}

/// Apply edits to master, returning the expected final snapshot.
fn apply(scm: &Controller, edits: &[Edit]) -> BTreeMap<String, Vec<u8>> {
    let mut expected = BTreeMap::new();
    for edit in edits {
        match edit {
            Edit::Add {
                path,
                content,
                message,
            } => {
                scm.add_file("repo", "master", message, path, content.clone())
                    .unwrap();
                expected.insert(path.clone(), content.clone());
            }
            Edit::Remove { path, message } => {
                scm.rm_file("repo", "master", message, path).unwrap();
                expected.remove(path);
            }
        }
    }
    expected
}

proptest! {
    /// Replaying the same edits with the same clock yields the same history.
    #[test]
    fn hashes_are_deterministic(
        start in -1_000_000_000_000i64..4_000_000_000_000i64,
        edits in prop::collection::vec(edit(), 0..12),
    ) {
        let a = controller(start);
        let b = controller(start);
        apply(&a, &edits);
        apply(&b, &edits);
        prop_assert_eq!(a.log("repo", "master").unwrap(), b.log("repo", "master").unwrap());
    }

    /// Checkout reproduces exactly the tracked snapshot.
    #[test]
    fn checkout_round_trip(edits in prop::collection::vec(edit(), 0..16)) {
        let scm = controller(0);
        let expected = apply(&scm, &edits);

        let mut dest = MemoryDestination::new();
        let hash = scm.checkout(&mut dest, "repo", "master").unwrap();

        prop_assert_eq!(hash, scm.get_revision("repo", "master").unwrap());
        prop_assert_eq!(dest.into_files(), expected);
    }

    /// Every commit adds exactly one log entry, newest first.
    #[test]
    fn log_length_tracks_commits(edits in prop::collection::vec(edit(), 0..16)) {
        let scm = controller(0);
        apply(&scm, &edits);
        let log = scm.log("repo", "master").unwrap();

        prop_assert_eq!(log.len(), edits.len() + 1);
        prop_assert!(log.last().unwrap().message.is_none());
        for (entry, edit) in log.iter().zip(edits.iter().rev()) {
            let message = match edit {
                Edit::Add { message, .. } | Edit::Remove { message, .. } => message,
            };
            prop_assert_eq!(entry.message.as_deref(), Some(message.as_str()));
        }
    }

    /// Every stored file stats as a file and each of its ancestors as a directory.
    #[test]
    fn stat_agrees_with_snapshot(edits in prop::collection::vec(edit(), 1..12)) {
        let scm = controller(0);
        let expected = apply(&scm, &edits);

        for path in expected.keys() {
            prop_assert_eq!(scm.stat("repo", "master", path).unwrap(), PathKind::File);
            let mut prefix = path.as_str();
            while let Some(idx) = prefix.rfind('/') {
                prefix = &prefix[..idx];
                if !expected.contains_key(prefix) {
                    prop_assert_eq!(
                        scm.stat("repo", "master", prefix).unwrap(),
                        PathKind::Directory
                    );
                }
            }
        }
    }

    /// The parent encoding never reads as negative and drops only leading zeros.
    #[test]
    fn signed_magnitude_is_minimal_and_non_negative(bytes in prop::array::uniform20(any::<u8>())) {
        let encoded = signed_magnitude_bytes(&bytes);
        prop_assert!(encoded[0] & 0x80 == 0);
        if encoded.len() > 1 {
            prop_assert!(encoded[0] != 0 || encoded[1] & 0x80 != 0);
        }
        let significant: Vec<u8> = bytes.iter().copied().skip_while(|&b| b == 0).collect();
        let stripped: Vec<u8> = encoded.iter().copied().skip_while(|&b| b == 0).collect();
        prop_assert_eq!(stripped, significant);
    }

    /// Any rendered hash parses back to itself.
    #[test]
    fn revision_hash_text_round_trip(bytes in prop::array::uniform20(any::<u8>())) {
        let hash = RevisionHash::from_bytes(bytes);
        let parsed: RevisionHash = hash.to_hex().parse().unwrap();
        prop_assert_eq!(parsed, hash);
    }
}

//! Integration tests for the `mockscm` binary.
//!
//! Each test writes a fixture into a temp directory and runs the binary
//! against it.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const FIXTURE: &str = r#"
[clock]
fixed = 0

[[repository]]
name = "foo"

[[repository.step]]
op = "add-file"
target = "master"
message = "m1"
path = "a.txt"
content_hex = "010203"

[[repository.step]]
op = "add-file"
target = "master"
message = "m2"
path = "dir/file.txt"
content = "hello"

[[repository.step]]
op = "tag"
at = "master"
name = "v1"

[[repository.step]]
op = "open-change-request"
branch = "master"
title = "Tweak"

[[repository]]
name = "bar"
"#;

fn mockscm(dir: &TempDir) -> Command {
    let fixture = dir.child("fixture.toml");
    fixture.write_str(FIXTURE).unwrap();
    let mut cmd = Command::cargo_bin("mockscm").unwrap();
    cmd.env_remove("RUST_LOG")
        .arg("--fixture")
        .arg(fixture.path());
    cmd
}

#[test]
fn repos_are_sorted() {
    let dir = TempDir::new().unwrap();
    mockscm(&dir)
        .arg("repos")
        .assert()
        .success()
        .stdout("bar\nfoo\n");
}

#[test]
fn log_lists_newest_first() {
    let dir = TempDir::new().unwrap();
    mockscm(&dir)
        .args(["log", "foo", "master"])
        .assert()
        .success()
        .stdout(predicate::str::contains("m2"))
        .stdout(predicate::str::contains(
            "01e903b4953a82d599fe685aeb8eb000a373db1c 1970-01-01T00:00:00+00:00 m1",
        ))
        .stdout(
            predicate::str::is_match("(?s)m2.*m1.*05fe405753166f125559e7c9ac558654f107c7e9")
                .unwrap(),
        );
}

#[test]
fn log_json() {
    let dir = TempDir::new().unwrap();
    let output = mockscm(&dir)
        .args(["log", "foo", "v1", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[1]["hash"], "01e903b4953a82d599fe685aeb8eb000a373db1c");
    assert_eq!(entries[1]["message"], "m1");
    assert_eq!(entries[2]["message"], serde_json::Value::Null);
    assert_eq!(entries[2]["timestamp"], 0);
}

#[test]
fn stat_reports_kinds() {
    let dir = TempDir::new().unwrap();
    mockscm(&dir)
        .args(["stat", "foo", "master", "dir"])
        .assert()
        .success()
        .stdout("directory\n");
    mockscm(&dir)
        .args(["stat", "foo", "master", "dir/file.txt"])
        .assert()
        .success()
        .stdout("file\n");
    mockscm(&dir)
        .args(["stat", "foo", "master", "nope"])
        .assert()
        .success()
        .stdout("absent\n");
}

#[test]
fn cat_writes_raw_bytes() {
    let dir = TempDir::new().unwrap();
    mockscm(&dir)
        .args(["cat", "foo", "master", "a.txt"])
        .assert()
        .success()
        .stdout(vec![1u8, 2, 3]);
}

#[test]
fn checkout_materializes_files() {
    let dir = TempDir::new().unwrap();
    let dest = dir.child("ws");
    mockscm(&dir)
        .args(["checkout", "foo", "change-request/1"])
        .arg(dest.path())
        .assert()
        .success();

    dest.child("a.txt").assert(predicate::path::is_file());
    dest.child("dir/file.txt").assert("hello");
}

#[test]
fn change_requests_show_target_and_title() {
    let dir = TempDir::new().unwrap();
    mockscm(&dir)
        .args(["change-requests", "foo"])
        .assert()
        .success()
        .stdout("#1 -> master: Tweak\n");
}

#[test]
fn branches_mark_primary() {
    let dir = TempDir::new().unwrap();
    mockscm(&dir)
        .args(["branches", "bar"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("* ").and(predicate::str::ends_with(" master\n")));
}

#[test]
fn unknown_repository_fails() {
    let dir = TempDir::new().unwrap();
    mockscm(&dir)
        .args(["resolve", "nope", "master"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown repository: nope"));
}

#[test]
fn unknown_identifier_fails() {
    let dir = TempDir::new().unwrap();
    mockscm(&dir)
        .args(["resolve", "foo", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown identifier: ghost in repository foo"));
}

#[test]
fn bad_fixture_fails() {
    let dir = TempDir::new().unwrap();
    let fixture = dir.child("bad.toml");
    fixture.write_str("[[repository]]\nname = \"foo\"\nbogus = 1\n").unwrap();
    Command::cargo_bin("mockscm")
        .unwrap()
        .arg("--fixture")
        .arg(fixture.path())
        .arg("repos")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load fixture"));
}

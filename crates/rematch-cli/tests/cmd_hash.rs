//! Integration tests for `rematch hash`.
#![allow(clippy::expect_used)]

use std::io::Write as _;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Path to the compiled `rematch` binary.
fn rematch_bin() -> PathBuf {
    let mut path = std::env::current_exe().expect("current exe");
    // current_exe is something like .../deps/cmd_hash-<hash>
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("rematch");
    path
}

/// Path to a shared fixture file.
fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("../../tests/fixtures");
    path.push(name);
    path
}

fn hash_json(name: &str) -> serde_json::Value {
    let out = Command::new(rematch_bin())
        .args(["hash", "-f", "json", fixture(name).to_str().expect("path")])
        .output()
        .expect("run rematch hash");
    assert!(out.status.success(), "exit code: {:?}", out.status.code());
    serde_json::from_slice(&out.stdout).expect("stdout is JSON")
}

// ---------------------------------------------------------------------------
// hash: output
// ---------------------------------------------------------------------------

#[test]
fn hash_human_lists_digests_and_counts() {
    let out = Command::new(rematch_bin())
        .args(["hash", fixture("add_two.xml").to_str().expect("path")])
        .output()
        .expect("run rematch hash");
    assert!(out.status.success(), "exit code: {:?}", out.status.code());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("full:"), "stdout: {stdout}");
    assert!(stdout.contains("structural:"), "stdout: {stdout}");
    assert!(stdout.contains("groups:      1"), "stdout: {stdout}");
    assert!(stdout.contains("inputs:      2"), "stdout: {stdout}");
}

#[test]
fn hash_json_counts_groups_and_inputs() {
    let v = hash_json("add_two_appended_group.xml");
    assert_eq!(v["groups"], 2);
    assert_eq!(v["inputs"], 3);
    let full = v["full"].as_str().expect("full digest is a string");
    assert_eq!(full.len(), 64, "sha-256 hex digest: {full}");
}

#[test]
fn attribute_edit_changes_full_digest_only() {
    let before = hash_json("add_two.xml");
    let after = hash_json("add_two_extra_attr.xml");
    assert_ne!(before["full"], after["full"]);
    assert_eq!(before["structural"], after["structural"]);
}

#[test]
fn added_input_changes_both_digests() {
    let before = hash_json("add_two.xml");
    let after = hash_json("add_two_three_inputs.xml");
    assert_ne!(before["full"], after["full"]);
    assert_ne!(before["structural"], after["structural"]);
}

#[test]
fn formatting_and_text_do_not_affect_digest() {
    let record: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(fixture("record_add_two.json")).expect("read record"),
    )
    .expect("record JSON");
    let markup = record["markup"].as_str().expect("markup");

    let mut child = Command::new(rematch_bin())
        .args(["hash", "-f", "json", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn rematch hash");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(markup.as_bytes())
        .expect("write stdin");
    let out = child.wait_with_output().expect("wait");
    assert!(out.status.success(), "exit code: {:?}", out.status.code());
    let from_stdin: serde_json::Value = serde_json::from_slice(&out.stdout).expect("JSON");

    assert_eq!(from_stdin["full"], hash_json("add_two.xml")["full"]);
}

// ---------------------------------------------------------------------------
// hash: errors
// ---------------------------------------------------------------------------

#[test]
fn hash_malformed_exits_2() {
    let out = Command::new(rematch_bin())
        .args(["hash", fixture("malformed.xml").to_str().expect("path")])
        .output()
        .expect("run rematch hash");
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("malformed.xml"), "stderr: {stderr}");
}

#[test]
fn hash_missing_file_exits_2() {
    let out = Command::new(rematch_bin())
        .args(["hash", "/nonexistent/problem.xml"])
        .output()
        .expect("run rematch hash");
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("file not found"), "stderr: {stderr}");
}

#[test]
fn hash_respects_max_file_size() {
    let out = Command::new(rematch_bin())
        .args([
            "hash",
            "--max-file-size",
            "16",
            fixture("add_two.xml").to_str().expect("path"),
        ])
        .output()
        .expect("run rematch hash");
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("file too large"), "stderr: {stderr}");
}

#[test]
fn hash_max_file_size_from_env() {
    let out = Command::new(rematch_bin())
        .env("REMATCH_MAX_FILE_SIZE", "16")
        .args(["hash", fixture("add_two.xml").to_str().expect("path")])
        .output()
        .expect("run rematch hash");
    assert_eq!(out.status.code(), Some(2));
}

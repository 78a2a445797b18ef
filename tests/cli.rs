use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::tempdir;

fn parse_jsonl(stdout: &[u8]) -> Vec<Value> {
    let s = String::from_utf8_lossy(stdout);
    s.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str::<Value>(l).expect("valid jsonl line"))
        .collect()
}

fn shardcache(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("shardcache"));
    cmd.env_remove("RUST_LOG").arg("--root").arg(root);
    cmd
}

#[test]
fn put_then_get_prints_raw_value() {
    let temp = tempdir().unwrap();

    let assert = shardcache(temp.path())
        .args(["put", "greeting", "hello world", "--ttl", "5m"])
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["kind"], "entry");
    assert_eq!(items[0]["key"], "greeting");
    assert_eq!(items[0]["status"], "stored");
    assert_eq!(items[0]["meta"]["size"], 11);
    assert_eq!(items[0]["meta"]["ttl_secs"], 300);

    shardcache(temp.path())
        .args(["get", "greeting"])
        .assert()
        .success()
        .stdout("hello world");
}

#[test]
fn put_reads_value_from_stdin() {
    let temp = tempdir().unwrap();

    shardcache(temp.path())
        .args(["put", "blob"])
        .write_stdin("from stdin\n")
        .assert()
        .success();

    shardcache(temp.path())
        .args(["get", "blob"])
        .assert()
        .success()
        .stdout("from stdin\n");
}

#[test]
fn get_missing_key_fails() {
    let temp = tempdir().unwrap();

    shardcache(temp.path())
        .args(["get", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("item not in cache"));
}

#[test]
fn failed_get_prints_error_item() {
    let temp = tempdir().unwrap();

    let assert = shardcache(temp.path())
        .args(["get", "nope"])
        .assert()
        .failure();
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["kind"], "error");
    assert_eq!(items[0]["errors"][0]["code"], "NOT_FOUND");
    assert!(items[0]["errors"][0]["message"]
        .as_str()
        .unwrap()
        .contains("item not in cache"));
}

#[test]
fn failed_delete_prints_markdown_error_section() {
    let temp = tempdir().unwrap();

    shardcache(temp.path())
        .args(["--format", "md", "delete", "nope"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("## Errors"))
        .stdout(predicate::str::contains("**NOT_FOUND**"))
        .stderr(predicate::str::contains("Failed to delete"));
}

#[test]
fn delete_twice_fails_the_second_time() {
    let temp = tempdir().unwrap();

    shardcache(temp.path())
        .args(["put", "k", "v"])
        .assert()
        .success();

    let assert = shardcache(temp.path())
        .args(["delete", "k"])
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items[0]["status"], "deleted");

    shardcache(temp.path())
        .args(["delete", "k"])
        .assert()
        .failure();
}

#[test]
fn path_matches_sharded_layout() {
    let temp = tempdir().unwrap();

    // md5("abc") = 900150983cd24fb0d6963f7d28e17f72
    let assert = shardcache(temp.path())
        .args(["path", "abc"])
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items[0]["kind"], "path");
    assert_eq!(items[0]["path"], "cache/90/01/50/983cd24fb0d6963f7d28e17f72.db");
}

#[test]
fn remember_runs_command_only_on_miss() {
    let temp = tempdir().unwrap();

    shardcache(temp.path())
        .args(["remember", "k", "--ttl", "1h", "--", "echo", "-n", "computed"])
        .assert()
        .success()
        .stdout("computed");

    // A failing producer would error out; a hit never runs it
    shardcache(temp.path())
        .args(["remember", "k", "--", "false"])
        .assert()
        .success()
        .stdout("computed");
}

#[test]
fn remember_failing_producer_stores_nothing() {
    let temp = tempdir().unwrap();

    shardcache(temp.path())
        .args(["remember", "k", "--", "false"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to remember"))
        .stderr(predicate::str::contains("exited with"));

    shardcache(temp.path())
        .args(["get", "k"])
        .assert()
        .failure();
}

#[test]
fn stats_sweep_and_clear_report() {
    let temp = tempdir().unwrap();

    for key in ["a", "b", "c"] {
        shardcache(temp.path())
            .args(["put", key, "value"])
            .assert()
            .success();
    }

    let assert = shardcache(temp.path()).arg("stats").assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items[0]["kind"], "report");
    assert_eq!(items[0]["data"]["entries"], 3);

    let assert = shardcache(temp.path()).arg("sweep").assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items[0]["data"]["scanned"], 3);
    assert_eq!(items[0]["data"]["removed"], 0);

    shardcache(temp.path()).arg("clear").assert().success();
    assert!(!temp.path().join("cache").exists());
}

#[test]
fn inspect_markdown_output() {
    let temp = tempdir().unwrap();

    shardcache(temp.path())
        .args(["put", "k", "abc"])
        .assert()
        .success();

    shardcache(temp.path())
        .args(["--format", "md", "inspect", "k"])
        .assert()
        .success()
        .stdout(predicate::str::contains("### `k`"))
        .stdout(predicate::str::contains("- size: 3 bytes"))
        .stdout(predicate::str::contains("- expires: never"));
}

#[test]
fn root_can_come_from_environment() {
    let temp = tempdir().unwrap();

    Command::new(assert_cmd::cargo::cargo_bin!("shardcache"))
        .env("SHARDCACHE_ROOT", temp.path())
        .args(["put", "k", "v"])
        .assert()
        .success();

    assert!(temp.path().join("cache").is_dir());
}

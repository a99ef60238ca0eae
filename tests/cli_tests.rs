//! Batch runner exit codes and output

use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

fn runner() -> Command {
    Command::new(env!("CARGO_BIN_EXE_voxfall-replay"))
}

fn golden_line() -> String {
    fs::read_to_string(demo("basin.expected.txt"))
        .unwrap()
        .trim()
        .to_string()
}

#[test]
fn test_success_prints_hash_line() {
    let output = runner()
        .arg("--replay")
        .arg(demo("basin.replay.json"))
        .arg("--level")
        .arg(demo("basin.level.json"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.trim(), golden_line());
}

#[test]
fn test_out_file_gets_same_line() {
    let out = std::env::temp_dir().join(format!("voxfall-cli-{}.txt", std::process::id()));
    let status = runner()
        .arg("--replay")
        .arg(demo("basin.replay.json"))
        .arg("--level")
        .arg(demo("basin.level.json"))
        .arg("--out")
        .arg(&out)
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(0));
    let written = fs::read_to_string(&out).unwrap();
    fs::remove_file(&out).ok();
    assert_eq!(written.trim(), golden_line());
}

#[test]
fn test_missing_arguments_exit_2() {
    let status = runner()
        .arg("--replay")
        .arg(demo("basin.replay.json"))
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(2));

    let status = runner().arg("--bogus").status().unwrap();
    assert_eq!(status.code(), Some(2));
}

#[test]
fn test_runtime_failures_exit_1() {
    // Unreadable level
    let output = runner()
        .arg("--replay")
        .arg(demo("basin.replay.json"))
        .arg("--level")
        .arg(demo("missing.level.json"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    // Level swapped for the replay file: parse failure
    let status = runner()
        .arg("--replay")
        .arg(demo("basin.replay.json"))
        .arg("--level")
        .arg(demo("basin.replay.json"))
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(1));
}

#[test]
fn test_expect_mismatch_exit_1() {
    let status = runner()
        .arg("--replay")
        .arg(demo("basin.replay.json"))
        .arg("--level")
        .arg(demo("basin.level.json"))
        .arg("--expect")
        .arg("voxfall-dh-2:deadbeef")
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(1));

    let expected = golden_line();
    let hash = expected.trim_start_matches("DeterminismHash: ");
    let status = runner()
        .arg("--replay")
        .arg(demo("basin.replay.json"))
        .arg("--level")
        .arg(demo("basin.level.json"))
        .arg("--expect")
        .arg(hash)
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(0));
}

//! Replay validation and golden-hash tests over the demo fixtures

use std::fs;
use std::path::PathBuf;

use voxfall::core::Level;
use voxfall::replay::{level_content_hash, Replay, ReplayError, ReplayRunner};
use voxfall::types::Status;

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

fn load() -> (Level, String, Replay) {
    let level_bytes = fs::read(demo("basin.level.json")).unwrap();
    let level: Level = serde_json::from_slice(&level_bytes).unwrap();
    let replay_text = fs::read_to_string(demo("basin.replay.json")).unwrap();
    let replay = Replay::from_json(&replay_text).unwrap();
    (level, level_content_hash(&level_bytes), replay)
}

fn golden_line() -> String {
    fs::read_to_string(demo("basin.expected.txt"))
        .unwrap()
        .trim()
        .to_string()
}

#[test]
fn test_demo_level_hash_matches_replay_meta() {
    let (_, hash, replay) = load();
    assert_eq!(replay.meta.level_hash, hash);
}

#[test]
fn test_golden_replay_hash() {
    let (level, hash, replay) = load();
    let runner = ReplayRunner::new(&level, hash);

    let first = runner.run(&replay).unwrap();
    let second = runner.run(&replay).unwrap();
    assert_eq!(first.hash, second.hash);
    assert_eq!(first.hash_line(), golden_line());

    assert_eq!(first.ticks_run, 6);
    assert_eq!(first.state.status, Status::Playing);
    assert_eq!(first.state.pieces_locked, 2);
    assert_eq!(first.state.score, 94);
    assert_eq!(first.state.rotations_executed, 1);
}

#[test]
fn test_each_meta_field_is_checked() {
    let (level, hash, replay) = load();
    let runner = ReplayRunner::new(&level, hash);

    let mut r = replay.clone();
    r.meta.replay_version = 2;
    assert!(matches!(runner.run(&r), Err(ReplayError::ReplayVersion { expected: 1, actual: 2 })));

    let mut r = replay.clone();
    r.meta.rules_version = 0;
    assert!(matches!(runner.run(&r), Err(ReplayError::RulesVersion { .. })));

    let mut r = replay.clone();
    r.meta.input_encoding = "command-index-v1".into();
    assert!(matches!(runner.run(&r), Err(ReplayError::InputEncoding { .. })));

    let mut r = replay.clone();
    r.meta.tick_rate = 120;
    assert!(matches!(runner.run(&r), Err(ReplayError::TickRate { .. })));

    let mut r = replay.clone();
    r.meta.level_id = "demo-other".into();
    assert!(matches!(runner.run(&r), Err(ReplayError::LevelId { .. })));

    let mut r = replay;
    r.meta.level_hash = "0".repeat(64);
    assert!(matches!(runner.run(&r), Err(ReplayError::LevelHash { .. })));
}

#[test]
fn test_edited_level_file_fails_hash_check() {
    let (level, _, replay) = load();
    let mut bytes = fs::read(demo("basin.level.json")).unwrap();
    bytes.push(b'\n');
    let runner = ReplayRunner::new(&level, level_content_hash(&bytes));
    assert!(matches!(runner.run(&replay), Err(ReplayError::LevelHash { .. })));
}

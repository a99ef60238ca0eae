//! Replay document: metadata block plus one command per tick.
//!
//! ```json
//! {
//!   "meta": {
//!     "ReplayVersion": 1,
//!     "RulesVersion": 1,
//!     "InputEncoding": "command-name-v1",
//!     "TickRate": 60,
//!     "LevelId": "tutorial-01",
//!     "LevelHash": "<sha-256 hex of the level file>"
//!   },
//!   "commands": ["MoveLeft", "HardDrop", "Noop"]
//! }
//! ```

use serde::{Deserialize, Serialize};

use voxfall_core::{sha256_hex, Level};
use voxfall_types::{InputCommand, TICK_RATE};

use crate::error::ReplayError;

/// Replay document version this runner reads and writes
pub const REPLAY_VERSION: u32 = 1;

/// Version of the gameplay rules the recorded commands were played under
pub const RULES_VERSION: u32 = 1;

/// Commands are stored as their variant names
pub const INPUT_ENCODING: &str = "command-name-v1";

/// Canonical tick rate a replay must be recorded at
pub const CANONICAL_TICK_RATE: u32 = TICK_RATE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct ReplayMeta {
    pub replay_version: u32,
    pub rules_version: u32,
    pub input_encoding: String,
    pub tick_rate: u32,
    pub level_id: String,
    pub level_hash: String,
}

impl ReplayMeta {
    /// Metadata with the canonical versions for `level_id`
    pub fn for_level(level_id: impl Into<String>, level_hash: impl Into<String>) -> Self {
        Self {
            replay_version: REPLAY_VERSION,
            rules_version: RULES_VERSION,
            input_encoding: INPUT_ENCODING.to_string(),
            tick_rate: CANONICAL_TICK_RATE,
            level_id: level_id.into(),
            level_hash: level_hash.into(),
        }
    }

    /// Fail fast on the first field that does not match, in field order.
    pub fn validate(&self, level: &Level, level_hash: &str) -> Result<(), ReplayError> {
        if self.replay_version != REPLAY_VERSION {
            return Err(ReplayError::ReplayVersion {
                expected: REPLAY_VERSION,
                actual: self.replay_version,
            });
        }
        if self.rules_version != RULES_VERSION {
            return Err(ReplayError::RulesVersion {
                expected: RULES_VERSION,
                actual: self.rules_version,
            });
        }
        if self.input_encoding != INPUT_ENCODING {
            return Err(ReplayError::InputEncoding {
                expected: INPUT_ENCODING.to_string(),
                actual: self.input_encoding.clone(),
            });
        }
        if self.tick_rate != CANONICAL_TICK_RATE {
            return Err(ReplayError::TickRate {
                expected: CANONICAL_TICK_RATE,
                actual: self.tick_rate,
            });
        }
        if self.level_id != level.id {
            return Err(ReplayError::LevelId {
                expected: level.id.clone(),
                actual: self.level_id.clone(),
            });
        }
        if !self.level_hash.eq_ignore_ascii_case(level_hash) {
            return Err(ReplayError::LevelHash {
                expected: level_hash.to_string(),
                actual: self.level_hash.clone(),
            });
        }
        Ok(())
    }
}

/// A recorded session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Replay {
    pub meta: ReplayMeta,
    pub commands: Vec<InputCommand>,
}

impl Replay {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Content hash of a level file: lowercase SHA-256 hex of its raw bytes
pub fn level_content_hash(level_bytes: &[u8]) -> String {
    sha256_hex(level_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxfall_core::BagEntry;
    use voxfall_types::{Int3, MaterialId, PieceKind};

    fn level() -> Level {
        Level::new(
            "meta",
            Int3::new(4, 6, 4),
            vec![BagEntry::new(PieceKind::M1, MaterialId::default())],
        )
    }

    #[test]
    fn test_meta_uses_pascal_case_keys() {
        let replay = Replay {
            meta: ReplayMeta::for_level("meta", "00"),
            commands: vec![InputCommand::HardDrop, InputCommand::Noop],
        };
        let json = replay.to_json_pretty().unwrap();
        assert!(json.contains("\"ReplayVersion\": 1"));
        assert!(json.contains("\"InputEncoding\": \"command-name-v1\""));
        assert!(json.contains("\"HardDrop\""));
        assert_eq!(Replay::from_json(&json).unwrap(), replay);
    }

    #[test]
    fn test_unknown_command_is_a_parse_error() {
        let json = r#"{"meta": {"ReplayVersion": 1, "RulesVersion": 1,
            "InputEncoding": "command-name-v1", "TickRate": 60,
            "LevelId": "meta", "LevelHash": "00"}, "commands": ["Jump"]}"#;
        assert!(matches!(Replay::from_json(json), Err(ReplayError::Parse(_))));
    }

    #[test]
    fn test_validation_is_fail_fast_in_field_order() {
        let lvl = level();
        let mut meta = ReplayMeta::for_level("other", "bad");
        meta.tick_rate = 30;
        assert!(matches!(
            meta.validate(&lvl, "00"),
            Err(ReplayError::TickRate {
                expected: 60,
                actual: 30
            })
        ));

        meta.tick_rate = 60;
        assert!(matches!(meta.validate(&lvl, "00"), Err(ReplayError::LevelId { .. })));

        meta.level_id = "meta".into();
        assert!(matches!(meta.validate(&lvl, "00"), Err(ReplayError::LevelHash { .. })));

        meta.level_hash = "00".into();
        assert!(meta.validate(&lvl, "00").is_ok());

        meta.rules_version = 2;
        meta.replay_version = 9;
        assert!(matches!(
            meta.validate(&lvl, "00"),
            Err(ReplayError::ReplayVersion { actual: 9, .. })
        ));
    }

    #[test]
    fn test_level_content_hash_is_lowercase_hex() {
        let hash = level_content_hash(b"{}");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash.to_lowercase());
    }
}

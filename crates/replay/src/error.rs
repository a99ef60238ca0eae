use voxfall_core::SimError;

/// Errors raised while loading, validating or running a replay.
///
/// Validation errors name the one metadata field that did not match.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("malformed replay document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("ReplayVersion mismatch: expected {expected}, got {actual}")]
    ReplayVersion { expected: u32, actual: u32 },

    #[error("RulesVersion mismatch: expected {expected}, got {actual}")]
    RulesVersion { expected: u32, actual: u32 },

    #[error("InputEncoding mismatch: expected {expected:?}, got {actual:?}")]
    InputEncoding { expected: String, actual: String },

    #[error("TickRate mismatch: expected {expected}, got {actual}")]
    TickRate { expected: u32, actual: u32 },

    #[error("LevelId mismatch: expected {expected:?}, got {actual:?}")]
    LevelId { expected: String, actual: String },

    #[error("LevelHash mismatch: expected {expected}, got {actual}")]
    LevelHash { expected: String, actual: String },

    #[error("simulation failed: {0}")]
    Simulation(#[from] SimError),

    #[error("determinism hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },
}

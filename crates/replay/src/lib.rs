//! Replay format, validation and runner.
//!
//! A replay pins a level (by id and content hash) and lists one input
//! command per tick. Running it on a fresh [`Simulation`](voxfall_core::Simulation)
//! yields a determinism hash that any other conforming runtime must match.
//!
//! # Example
//!
//! ```
//! use voxfall_core::{BagEntry, Level};
//! use voxfall_replay::{Replay, ReplayMeta, ReplayRunner};
//! use voxfall_types::{InputCommand, Int3, MaterialId, PieceKind};
//!
//! let level = Level::new(
//!     "doc",
//!     Int3::new(4, 8, 4),
//!     vec![BagEntry::new(PieceKind::O4, MaterialId::default())],
//! );
//! let replay = Replay {
//!     meta: ReplayMeta::for_level("doc", "cafe"),
//!     commands: vec![InputCommand::HardDrop],
//! };
//!
//! let outcome = ReplayRunner::new(&level, "cafe").run(&replay).unwrap();
//! assert_eq!(outcome.ticks_run, 1);
//! ```

pub mod error;
pub mod format;
pub mod recorder;
pub mod runner;

pub use error::ReplayError;
pub use format::{
    level_content_hash, Replay, ReplayMeta, CANONICAL_TICK_RATE, INPUT_ENCODING, REPLAY_VERSION,
    RULES_VERSION,
};
pub use recorder::ReplayRecorder;
pub use runner::{ReplayOutcome, ReplayRunner};

//! Core simulation module - pure, deterministic, and testable
//!
//! This crate contains every gameplay rule of the voxel puzzle. It has **no
//! dependencies** on rendering, input devices, or I/O, which makes it:
//!
//! - **Deterministic**: Same level and commands produce the same state hash
//! - **Testable**: Every rule is a small function with unit tests
//! - **Portable**: A terminal tool, a batch runner and a graphical client can
//!   all drive the same core and agree bit for bit
//!
//! # Module Structure
//!
//! - [`grid`]: fixed-size 3D voxel store with bounds-checked access
//! - [`rng`]: PCG generator and the piece bag
//! - [`pieces`]: piece shapes, orientations and kicked rotation
//! - [`movement`]: stateless resolution of one input command
//! - [`fluids`]: water flow, ice, drains and settling of loose voxels
//! - [`rules`]: constraint and objective evaluators
//! - [`scoring`]: point values
//! - [`level`]: the level description consumed at construction
//! - [`simulation`]: the tick state machine
//! - [`hash`]: canonical determinism hash
//!
//! # Example
//!
//! ```
//! use voxfall_core::{determinism_hash, BagEntry, Level, Simulation};
//! use voxfall_core::types::{InputCommand, Int3, MaterialId, PieceKind, Status};
//!
//! let level = Level::new(
//!     "demo",
//!     Int3::new(6, 10, 6),
//!     vec![BagEntry::new(PieceKind::T4, MaterialId::default())],
//! );
//! let mut sim = Simulation::new(&level).unwrap();
//!
//! sim.tick(InputCommand::MoveLeft).unwrap();
//! sim.tick(InputCommand::HardDrop).unwrap();
//!
//! assert_eq!(sim.status(), Status::Playing);
//! assert_eq!(sim.state().pieces_locked, 1);
//! assert!(determinism_hash(&sim).starts_with("voxfall-dh-2:"));
//! ```
//!
//! # Timing
//!
//! The core has no clock. One call to
//! [`Simulation::tick`](simulation::Simulation::tick) is one tick; the host
//! decides when to call it (60 times per second in real time, or once per
//! recorded command in a replay).

pub mod error;
pub mod fluids;
pub mod grid;
pub mod hash;
pub mod level;
pub mod movement;
pub mod pieces;
pub mod rng;
pub mod rules;
pub mod scoring;
pub mod simulation;

pub use voxfall_types as types;

// Re-export commonly used types for convenience
pub use error::{GridError, LevelError, SimError};
pub use grid::Grid;
pub use hash::{determinism_hash, encode_state, sha256_hex, DETERMINISM_HASH_VERSION};
pub use level::{
    AbilityConfig, ConstraintConfig, IceConfig, Level, ObjectiveKind, ObjectiveSpec,
    SequenceConfig, ThawInto, TimingConfig, VoxelPlacement,
};
pub use movement::{resolve, MoveOutcome};
pub use pieces::{get_shape, try_rotate, ActivePiece};
pub use rng::{BagEntry, PieceBag, Pcg32};
pub use rules::{evaluate_constraints, evaluate_objectives, total_mass, ObjectiveProgress};
pub use simulation::{Simulation, SimulationState, StabilizeAnchorTimer, TickReport};

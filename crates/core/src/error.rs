//! Error types for the simulation core.
//!
//! Everything here is a *structural* error: a caller handed the core an
//! invalid level or addressed a cell outside the grid. Gameplay outcomes
//! (won/lost) are never errors and are surfaced through `Status` instead.

use crate::types::Int3;

/// Errors raised by bounds-checked grid access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("grid size {0} must be positive on every axis")]
    InvalidSize(Int3),

    #[error("position {pos} is outside grid of size {size}")]
    OutOfRange { pos: Int3, size: Int3 },
}

/// Errors found while validating a level at simulation construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    #[error("level id must not be empty")]
    EmptyId,

    #[error("invalid grid: {0}")]
    Grid(#[from] GridError),

    #[error("voxel placement #{index} at {pos} is outside the grid")]
    PlacementOutOfRange { index: usize, pos: Int3 },

    #[error("spawn position {0} is outside the grid")]
    SpawnOutOfRange(Int3),

    #[error("piece sequence has no entries")]
    EmptySequence,

    #[error("timing.gravity_interval_ticks must be at least 1")]
    ZeroGravityInterval,
}

/// Errors returned by [`Simulation`](crate::Simulation) construction and ticks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("invalid level: {0}")]
    Level(#[from] LevelError),
}

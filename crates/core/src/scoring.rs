//! Scoring module - point values for locks, drops and drained water
//!
//! Points are collected during a tick and added to the score in the
//! bookkeeping phase, so a tick that fails leaves the score untouched.

use crate::types::{
    DRAIN_SCORE_PER_WATER, HARD_DROP_SCORE_PER_CELL, LOCK_SCORE_PER_VOXEL,
    SOFT_DROP_SCORE_PER_CELL,
};

/// Calculate drop score
/// soft_drop: +1 per cell
/// hard_drop: +2 per cell
pub fn calculate_drop_score(cells: u32, is_hard_drop: bool) -> u64 {
    let per_cell = if is_hard_drop {
        HARD_DROP_SCORE_PER_CELL
    } else {
        SOFT_DROP_SCORE_PER_CELL
    };
    u64::from(cells) * per_cell
}

/// Points for committing a piece of `voxels` voxels to the grid
pub fn calculate_lock_score(voxels: usize) -> u64 {
    voxels as u64 * LOCK_SCORE_PER_VOXEL
}

/// Points for water removed by drains
pub fn calculate_drain_score(units: u32) -> u64 {
    u64::from(units) * DRAIN_SCORE_PER_WATER
}

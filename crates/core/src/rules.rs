//! Rules module - constraint and objective evaluation
//!
//! Pure functions of the grid and the counters. They never mutate and are
//! cheap enough to run every tick.

use crate::grid::Grid;
use crate::level::{ConstraintConfig, ObjectiveKind, ObjectiveSpec};
use crate::simulation::SimulationState;
use crate::types::{GravityDir, LossReason, OccupancyType};

/// Progress of one objective, recomputed from scratch each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectiveProgress {
    pub kind: ObjectiveKind,
    pub current: u32,
    pub target: u32,
    pub completed: bool,
}

/// Sum of material masses over every Solid voxel
pub fn total_mass(grid: &Grid) -> u32 {
    grid.voxels()
        .iter()
        .filter(|v| v.kind == OccupancyType::Solid)
        .map(|v| v.material.mass())
        .sum()
}

/// Check the configured loss rules in fixed order: mass, water height,
/// resting on water. Returns the first violation.
pub fn evaluate_constraints(
    grid: &Grid,
    gravity: GravityDir,
    config: &ConstraintConfig,
) -> Option<LossReason> {
    if let Some(max_mass) = config.max_mass {
        if total_mass(grid) > max_mass {
            return Some(LossReason::MassExceeded);
        }
    }

    if let Some(min_height) = config.water_forbidden_world_height_min {
        let too_high = grid
            .iter()
            .any(|(pos, v)| v.kind == OccupancyType::Water && pos.y >= min_height);
        if too_high {
            return Some(LossReason::WaterTooHigh);
        }
    }

    if config.no_resting_on_water {
        let down = gravity.vector();
        let resting = grid.iter().any(|(pos, v)| {
            v.kind == OccupancyType::Solid
                && grid.kind_at(pos + down) == Some(OccupancyType::Water)
        });
        if resting {
            return Some(LossReason::RestingOnWater);
        }
    }

    None
}

fn current_value(kind: ObjectiveKind, grid: &Grid, state: &SimulationState) -> u32 {
    match kind {
        ObjectiveKind::LockPieces => state.pieces_locked,
        ObjectiveKind::DrainWater => state.water_removed_total,
        ObjectiveKind::SurviveTicks => u32::try_from(state.ticks_elapsed).unwrap_or(u32::MAX),
        ObjectiveKind::ExecuteRotations => state.rotations_executed,
        ObjectiveKind::PlaceSolids => grid.count(OccupancyType::Solid) as u32,
    }
}

/// Recompute every objective from the grid and counters
pub fn evaluate_objectives(
    grid: &Grid,
    state: &SimulationState,
    objectives: &[ObjectiveSpec],
) -> Vec<ObjectiveProgress> {
    objectives
        .iter()
        .map(|spec| {
            let current = current_value(spec.kind, grid, state);
            ObjectiveProgress {
                kind: spec.kind,
                current,
                target: spec.target,
                completed: current >= spec.target,
            }
        })
        .collect()
}

/// Won when there is at least one objective and all are completed
pub fn all_completed(progress: &[ObjectiveProgress]) -> bool {
    !progress.is_empty() && progress.iter().all(|p| p.completed)
}

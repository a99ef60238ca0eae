//! Fluids module - water flow, ice timers, drains and loose-voxel settling
//!
//! All passes walk cells in a fixed order so two runs over the same grid
//! always produce the same result:
//!
//! - Deepest cells along gravity go first, ties broken by canonical index.
//! - Drains and ice timers go in canonical `x -> y -> z` order.
//! - Neighbour checks use the fixed order `+u, -u, +v, -v` (lateral) or
//!   `+x, -x, +y, -y, +z, -z` (all six faces).

use std::collections::{BTreeMap, BTreeSet};

use crate::error::GridError;
use crate::grid::Grid;
use crate::level::ThawInto;
use crate::types::{GravityDir, Int3, MaterialId, OccupancyType, Voxel, DRAIN_REACH};

/// Material tag of frozen cells
pub const ICE_MATERIAL: &str = "ICE";

/// The six face neighbours in hashing order
pub const FACE_OFFSETS: [Int3; 6] = [
    Int3::new(1, 0, 0),
    Int3::new(-1, 0, 0),
    Int3::new(0, 1, 0),
    Int3::new(0, -1, 0),
    Int3::new(0, 0, 1),
    Int3::new(0, 0, -1),
];

/// Countdown until a frozen cell thaws, in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IceTimer {
    pub remaining: u32,
}

/// Canonical index as the sparse-map key
pub fn cell_key(grid: &Grid, pos: Int3) -> Result<u64, GridError> {
    grid.index_of(pos)
        .map(|idx| idx as u64)
        .ok_or(GridError::OutOfRange {
            pos,
            size: grid.size(),
        })
}

/// Positions of `kind`, deepest along gravity first
fn deepest_first(grid: &Grid, kind: OccupancyType, gravity: GravityDir) -> Vec<Int3> {
    let down = gravity.vector();
    let mut cells = grid.positions_of(kind);
    // positions_of is canonical, and the sort is stable
    cells.sort_by_key(|pos| -pos.dot(down));
    cells
}

fn admits_water(grid: &Grid, pos: Int3) -> bool {
    matches!(grid.kind_at(pos), Some(kind) if kind.admits_water())
}

/// Move one water unit from `from` into `to` (Empty or Porous).
fn move_water(grid: &mut Grid, from: Int3, to: Int3) -> Result<(), GridError> {
    if grid.kind_at(to) == Some(OccupancyType::Porous) {
        return grid.swap(from, to);
    }
    let water = grid.get_voxel(from)?.clone();
    grid.set_voxel(to, water)?;
    grid.set_voxel(from, Voxel::empty())
}

/// One step of water flow. Returns how many units moved.
///
/// Each unit moves at most once per call: downhill if that cell is open,
/// otherwise to the first lateral neighbour that is open and has an open
/// cell below it.
pub fn flow_water(grid: &mut Grid, gravity: GravityDir) -> Result<u32, GridError> {
    let down = gravity.vector();
    let (u, v) = gravity.lateral_axes();
    let lateral = [u, -u, v, -v];

    let mut arrived: BTreeSet<u64> = BTreeSet::new();
    let mut moved = 0;

    for pos in deepest_first(grid, OccupancyType::Water, gravity) {
        if arrived.contains(&cell_key(grid, pos)?) {
            continue;
        }
        if grid.kind_at(pos) != Some(OccupancyType::Water) {
            continue;
        }

        let below = pos + down;
        let target = if admits_water(grid, below) {
            Some(below)
        } else {
            lateral
                .iter()
                .map(|&step| pos + step)
                .find(|&side| admits_water(grid, side) && admits_water(grid, side + down))
        };

        if let Some(target) = target {
            move_water(grid, pos, target)?;
            arrived.insert(cell_key(grid, target)?);
            moved += 1;
        }
    }
    Ok(moved)
}

/// Count down every ice timer; thaw the cells that reach zero.
///
/// Returns how many cells thawed. Timers whose cell is no longer ice are
/// dropped.
pub fn tick_ice(
    grid: &mut Grid,
    timers: &mut BTreeMap<u64, IceTimer>,
    thaw_into: ThawInto,
) -> Result<u32, GridError> {
    let mut thawed = 0;
    let mut expired = Vec::new();

    for (&key, timer) in timers.iter_mut() {
        let pos = grid.position_of(key as usize);
        if grid.kind_at(pos) != Some(OccupancyType::Ice) {
            expired.push(key);
            continue;
        }
        timer.remaining = timer.remaining.saturating_sub(1);
        if timer.remaining > 0 {
            continue;
        }
        let voxel = match thaw_into {
            ThawInto::Water => Voxel::water(),
            ThawInto::Solid => Voxel::solid(grid.get_voxel(pos)?.material.clone(), false),
        };
        grid.set_voxel(pos, voxel)?;
        expired.push(key);
        thawed += 1;
    }

    for key in expired {
        timers.remove(&key);
    }
    Ok(thawed)
}

/// Turn water next to any of `cells` into ice.
///
/// `thaw_ticks == 0` freezes permanently (no timer). Returns how many cells
/// froze.
pub fn freeze_adjacent(
    grid: &mut Grid,
    cells: &[Int3],
    timers: &mut BTreeMap<u64, IceTimer>,
    thaw_ticks: u32,
) -> Result<u32, GridError> {
    let mut frozen = 0;
    for &cell in cells {
        for offset in FACE_OFFSETS {
            let pos = cell + offset;
            if grid.kind_at(pos) != Some(OccupancyType::Water) {
                continue;
            }
            grid.set_voxel(
                pos,
                Voxel::new(OccupancyType::Ice, MaterialId::new(ICE_MATERIAL), false),
            )?;
            if thaw_ticks > 0 {
                timers.insert(
                    cell_key(grid, pos)?,
                    IceTimer {
                        remaining: thaw_ticks,
                    },
                );
            }
            frozen += 1;
        }
    }
    Ok(frozen)
}

/// Every drain removes the water along its six face directions, up to
/// `DRAIN_REACH` cells away.
///
/// Returns the number of water units removed.
pub fn drain_water(grid: &mut Grid) -> Result<u32, GridError> {
    drain_within(grid, DRAIN_REACH)
}

fn drain_within(grid: &mut Grid, reach: i32) -> Result<u32, GridError> {
    let mut removed = 0;
    for drain in grid.positions_of(OccupancyType::Drain) {
        for offset in FACE_OFFSETS {
            for distance in 1..=reach {
                let pos = drain + offset.scaled(distance);
                if grid.kind_at(pos) == Some(OccupancyType::Water) {
                    grid.set_voxel(pos, Voxel::empty())?;
                    removed += 1;
                }
            }
        }
    }
    Ok(removed)
}

/// Let every non-anchored Solid fall along gravity as far as it can.
///
/// Solids pass through Empty and Water (water is pushed up by swapping);
/// `obstacles` (the active piece) block like solid ground. Lowest voxels
/// go first so stacks come down intact. Returns how many voxels moved.
pub fn settle_loose_voxels(
    grid: &mut Grid,
    gravity: GravityDir,
    obstacles: &[Int3],
) -> Result<u32, GridError> {
    let down = gravity.vector();
    let passable = |grid: &Grid, pos: Int3| {
        !obstacles.contains(&pos)
            && matches!(
                grid.kind_at(pos),
                Some(OccupancyType::Empty | OccupancyType::Water)
            )
    };

    let mut moved = 0;
    for start in deepest_first(grid, OccupancyType::Solid, gravity) {
        if grid.get_voxel(start)?.anchored {
            continue;
        }
        let mut pos = start;
        while passable(grid, pos + down) {
            grid.swap(pos, pos + down)?;
            pos = pos + down;
        }
        if pos != start {
            moved += 1;
        }
    }
    Ok(moved)
}

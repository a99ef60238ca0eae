//! Pieces module - voxel piece shapes and kicked rotation
//!
//! Every piece has four orientations. Orientation `n` is the base shape
//! turned `n` quarter turns about the world Y axis through the piece origin.
//! When a rotated placement collides, a fixed list of kick offsets is tried
//! in priority order and the first free candidate wins.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::rng::BagEntry;
use crate::types::{GravityDir, Int3, MaterialId, PieceKind, MAX_PIECE_VOXELS};

/// Voxel offsets of one orientation, relative to the piece origin
pub type PieceShape = ArrayVec<Int3, MAX_PIECE_VOXELS>;

/// Number of entries in each piece's rotation table
pub const ORIENTATION_COUNT: u8 = 4;

/// Maximum number of kick candidates (including the unkicked placement)
pub const MAX_KICKS: usize = 8;

const fn p(x: i32, y: i32, z: i32) -> Int3 {
    Int3::new(x, y, z)
}

const M1_BASE: [Int3; 1] = [p(0, 0, 0)];
const D2_BASE: [Int3; 2] = [p(0, 0, 0), p(1, 0, 0)];
const I3_BASE: [Int3; 3] = [p(-1, 0, 0), p(0, 0, 0), p(1, 0, 0)];
const L3_BASE: [Int3; 3] = [p(0, 0, 0), p(1, 0, 0), p(0, 0, 1)];
const I4_BASE: [Int3; 4] = [p(-1, 0, 0), p(0, 0, 0), p(1, 0, 0), p(2, 0, 0)];
const O4_BASE: [Int3; 4] = [p(0, 0, 0), p(1, 0, 0), p(0, 0, 1), p(1, 0, 1)];
const T4_BASE: [Int3; 4] = [p(-1, 0, 0), p(0, 0, 0), p(1, 0, 0), p(0, 0, 1)];
const L4_BASE: [Int3; 4] = [p(-1, 0, 0), p(0, 0, 0), p(1, 0, 0), p(1, 0, 1)];
const S4_BASE: [Int3; 4] = [p(-1, 0, 0), p(0, 0, 0), p(0, 0, 1), p(1, 0, 1)];
const C4_BASE: [Int3; 4] = [p(0, 0, 0), p(1, 0, 0), p(0, 1, 0), p(0, 0, 1)];

/// Base (orientation 0) offsets
fn base_offsets(kind: PieceKind) -> &'static [Int3] {
    match kind {
        PieceKind::M1 => &M1_BASE,
        PieceKind::D2 => &D2_BASE,
        PieceKind::I3 => &I3_BASE,
        PieceKind::L3 => &L3_BASE,
        PieceKind::I4 => &I4_BASE,
        PieceKind::O4 => &O4_BASE,
        PieceKind::T4 => &T4_BASE,
        PieceKind::L4 => &L4_BASE,
        PieceKind::S4 => &S4_BASE,
        PieceKind::C4 => &C4_BASE,
    }
}

/// Get the voxel offsets for a piece kind and orientation index
pub fn get_shape(kind: PieceKind, orientation: u8) -> PieceShape {
    let turns = orientation % ORIENTATION_COUNT;
    base_offsets(kind)
        .iter()
        .map(|&offset| (0..turns).fold(offset, |o, _| o.rotated_about_y()))
        .collect()
}

/// Number of voxels in a piece
pub fn voxel_count(kind: PieceKind) -> usize {
    base_offsets(kind).len()
}

/// Orientation index after one rotation step
pub fn next_orientation(orientation: u8, clockwise: bool) -> u8 {
    if clockwise {
        (orientation + 1) % ORIENTATION_COUNT
    } else {
        (orientation + ORIENTATION_COUNT - 1) % ORIENTATION_COUNT
    }
}

/// Kick candidates in priority order for the current gravity.
///
/// `0, +u, -u, +v, -v, up, +2u, -2u` where `u`, `v` are the lateral axes and
/// `up` points against gravity.
pub fn kick_offsets(gravity: GravityDir) -> ArrayVec<Int3, MAX_KICKS> {
    let (u, v) = gravity.lateral_axes();
    let up = -gravity.vector();
    [
        Int3::ZERO,
        u,
        -u,
        v,
        -v,
        up,
        u.scaled(2),
        u.scaled(-2),
    ]
    .into_iter()
    .collect()
}

/// Try to rotate a piece with kicks
/// Returns Some(new_orientation, new_origin) if successful, None if all kicks fail
pub fn try_rotate(
    kind: PieceKind,
    orientation: u8,
    origin: Int3,
    clockwise: bool,
    gravity: GravityDir,
    is_free: impl Fn(Int3) -> bool,
) -> Option<(u8, Int3)> {
    let new_orientation = next_orientation(orientation, clockwise);
    let new_shape = get_shape(kind, new_orientation);

    kick_offsets(gravity).into_iter().find_map(|kick| {
        let candidate = origin + kick;
        new_shape
            .iter()
            .all(|&offset| is_free(candidate + offset))
            .then_some((new_orientation, candidate))
    })
}

/// Active falling piece
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub material: MaterialId,
    pub orientation: u8,
    pub origin: Int3,
}

impl ActivePiece {
    /// Create a piece at `origin` in orientation 0
    pub fn spawn(entry: &BagEntry, origin: Int3) -> Self {
        Self {
            kind: entry.piece,
            material: entry.material.clone(),
            orientation: 0,
            origin,
        }
    }

    /// The bag entry this piece came from (used by hold)
    pub fn entry(&self) -> BagEntry {
        BagEntry::new(self.kind, self.material.clone())
    }

    /// Get the offsets for the current orientation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.orientation)
    }

    /// World positions of every voxel
    pub fn cells(&self) -> PieceShape {
        self.shape()
            .into_iter()
            .map(|offset| self.origin + offset)
            .collect()
    }

    /// Check if every voxel is inside the grid on a non-blocking cell
    pub fn fits(&self, grid: &Grid) -> bool {
        self.shape()
            .iter()
            .all(|&offset| grid.is_free(self.origin + offset))
    }

    /// Same piece shifted by `delta`
    pub fn translated(&self, delta: Int3) -> Self {
        Self {
            origin: self.origin + delta,
            ..self.clone()
        }
    }

    /// Check if the piece can not take a step along gravity
    pub fn is_grounded(&self, grid: &Grid, gravity: GravityDir) -> bool {
        !self.translated(gravity.vector()).fits(grid)
    }
}

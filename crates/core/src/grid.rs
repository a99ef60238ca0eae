//! Grid module - fixed-size 3D voxel store
//!
//! Uses a flat `Vec` in canonical `x -> y -> z` order, so a linear index is
//! also the packed key used by the sparse timer maps and the scan order used
//! by the determinism hash.
//! Pure storage: no physics lives here.

use crate::error::GridError;
use crate::types::{Int3, OccupancyType, Voxel};

/// Returned by [`Grid::try_get_voxel`] for positions outside the grid.
static EMPTY_VOXEL: Voxel = Voxel::empty();

/// The playfield - `size.x * size.y * size.z` voxels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: Int3,
    /// Flat array of voxels, index = (x * sy + y) * sz + z
    cells: Vec<Voxel>,
}

impl Grid {
    /// Create an empty grid. Every axis must be positive.
    pub fn new(size: Int3) -> Result<Self, GridError> {
        if size.x <= 0 || size.y <= 0 || size.z <= 0 {
            return Err(GridError::InvalidSize(size));
        }
        let len = size.x as usize * size.y as usize * size.z as usize;
        Ok(Self {
            size,
            cells: vec![Voxel::empty(); len],
        })
    }

    pub fn size(&self) -> Int3 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check if position is inside `[0, size)` on every axis
    #[inline(always)]
    pub fn contains(&self, pos: Int3) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.z >= 0
            && pos.x < self.size.x
            && pos.y < self.size.y
            && pos.z < self.size.z
    }

    /// Canonical linear index of an in-bounds position
    #[inline(always)]
    pub fn index_of(&self, pos: Int3) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let (sy, sz) = (self.size.y as usize, self.size.z as usize);
        Some((pos.x as usize * sy + pos.y as usize) * sz + pos.z as usize)
    }

    /// Inverse of [`Grid::index_of`]
    pub fn position_of(&self, index: usize) -> Int3 {
        let (sy, sz) = (self.size.y as usize, self.size.z as usize);
        let z = index % sz;
        let y = (index / sz) % sy;
        let x = index / (sz * sy);
        Int3::new(x as i32, y as i32, z as i32)
    }

    fn checked_index(&self, pos: Int3) -> Result<usize, GridError> {
        self.index_of(pos).ok_or(GridError::OutOfRange {
            pos,
            size: self.size,
        })
    }

    /// Get the voxel at `pos`, failing if out of range
    pub fn get_voxel(&self, pos: Int3) -> Result<&Voxel, GridError> {
        let idx = self.checked_index(pos)?;
        Ok(&self.cells[idx])
    }

    /// Replace the voxel at `pos`, failing if out of range
    pub fn set_voxel(&mut self, pos: Int3, voxel: Voxel) -> Result<(), GridError> {
        let idx = self.checked_index(pos)?;
        self.cells[idx] = voxel;
        Ok(())
    }

    /// Get the voxel at `pos`, or `(false, Empty)` when out of range
    pub fn try_get_voxel(&self, pos: Int3) -> (bool, &Voxel) {
        match self.index_of(pos) {
            Some(idx) => (true, &self.cells[idx]),
            None => (false, &EMPTY_VOXEL),
        }
    }

    /// Get the voxel at `pos`, `None` when out of range
    pub fn get(&self, pos: Int3) -> Option<&Voxel> {
        self.index_of(pos).map(|idx| &self.cells[idx])
    }

    /// Occupancy at `pos`, `None` when out of range
    pub fn kind_at(&self, pos: Int3) -> Option<OccupancyType> {
        self.get(pos).map(|v| v.kind)
    }

    /// Swap the contents of two cells
    pub fn swap(&mut self, a: Int3, b: Int3) -> Result<(), GridError> {
        let ia = self.checked_index(a)?;
        let ib = self.checked_index(b)?;
        self.cells.swap(ia, ib);
        Ok(())
    }

    /// Check if a piece voxel may occupy `pos` (within bounds and not blocking)
    pub fn is_free(&self, pos: Int3) -> bool {
        matches!(self.kind_at(pos), Some(kind) if !kind.blocks_movement())
    }

    /// All voxels in canonical order
    pub fn voxels(&self) -> &[Voxel] {
        &self.cells
    }

    /// `(position, voxel)` pairs in canonical `x -> y -> z` order
    pub fn iter(&self) -> impl Iterator<Item = (Int3, &Voxel)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, v)| (self.position_of(idx), v))
    }

    /// Positions holding `kind`, in canonical order
    pub fn positions_of(&self, kind: OccupancyType) -> Vec<Int3> {
        self.iter()
            .filter(|(_, v)| v.kind == kind)
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn count(&self, kind: OccupancyType) -> usize {
        self.cells.iter().filter(|v| v.kind == kind).count()
    }

    pub fn anchored_count(&self) -> usize {
        self.cells.iter().filter(|v| v.anchored).count()
    }
}

//! Level module - immutable level description consumed at construction
//!
//! A [`Level`] is produced by an external loader (the batch binary reads it
//! from JSON). Every recognised option has an explicit default in a
//! `Default` impl, and unknown keys are rejected, so a missing key never
//! carries hidden meaning.

use serde::{Deserialize, Serialize};

use crate::error::LevelError;
use crate::grid::Grid;
use crate::rng::{BagEntry, PieceBag};
use crate::types::{
    Int3, MaterialId, OccupancyType, Voxel, DEFAULT_GRAVITY_INTERVAL_TICKS, DEFAULT_THAW_TICKS,
    LOCK_DELAY_TICKS, LOCK_RESET_LIMIT,
};

/// Full level description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Level {
    pub id: String,
    pub size: Int3,
    /// Seed of the piece bag generator
    #[serde(default)]
    pub seed: u64,
    /// Origin of freshly spawned pieces; `(sx/2, sy-2, sz/2)` when unset
    #[serde(default)]
    pub spawn: Option<Int3>,
    #[serde(default)]
    pub voxels: Vec<VoxelPlacement>,
    pub sequence: SequenceConfig,
    #[serde(default)]
    pub abilities: AbilityConfig,
    #[serde(default)]
    pub constraints: ConstraintConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub ice: IceConfig,
    #[serde(default)]
    pub objectives: Vec<ObjectiveSpec>,
}

/// One initial voxel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoxelPlacement {
    pub pos: Int3,
    pub kind: OccupancyType,
    #[serde(default)]
    pub material: MaterialId,
    #[serde(default)]
    pub anchored: bool,
}

impl VoxelPlacement {
    pub fn new(pos: Int3, kind: OccupancyType) -> Self {
        Self {
            pos,
            kind,
            material: MaterialId::default(),
            anchored: false,
        }
    }

    pub fn voxel(&self) -> Voxel {
        Voxel::new(self.kind, self.material.clone(), self.anchored)
    }
}

/// Piece sequencing descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SequenceConfig {
    /// Scripted order, cycling when exhausted
    Fixed { entries: Vec<BagEntry> },
    /// Shuffled copies of `pool`, drawn through the level's PRNG
    Random { pool: Vec<BagEntry> },
}

impl SequenceConfig {
    pub fn entries(&self) -> &[BagEntry] {
        match self {
            SequenceConfig::Fixed { entries } => entries,
            SequenceConfig::Random { pool } => pool,
        }
    }

    pub fn build_bag(&self, seed: u64) -> PieceBag {
        match self {
            SequenceConfig::Fixed { entries } => PieceBag::fixed(entries.clone(), seed),
            SequenceConfig::Random { pool } => PieceBag::shuffled(pool.clone(), seed),
        }
    }
}

/// Player abilities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AbilityConfig {
    /// Number of pieces that get a rotation-scoped anchor when they lock
    pub stabilize_charges: u32,
}

impl Default for AbilityConfig {
    fn default() -> Self {
        Self {
            stabilize_charges: 0,
        }
    }
}

/// Loss rules. Each rule is off unless configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConstraintConfig {
    /// Maximum total mass of Solid voxels
    pub max_mass: Option<u32>,
    /// Water at or above this world height (y) loses the level
    pub water_forbidden_world_height_min: Option<i32>,
    /// A Solid voxel directly "above" Water along gravity loses the level
    pub no_resting_on_water: bool,
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            max_mass: None,
            water_forbidden_world_height_min: None,
            no_resting_on_water: false,
        }
    }
}

/// Drop pacing, in ticks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    pub gravity_interval_ticks: u32,
    pub lock_delay_ticks: u32,
    pub lock_reset_limit: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            gravity_interval_ticks: DEFAULT_GRAVITY_INTERVAL_TICKS,
            lock_delay_ticks: LOCK_DELAY_TICKS,
            lock_reset_limit: LOCK_RESET_LIMIT,
        }
    }
}

/// What a thawing ice cell turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThawInto {
    Water,
    Solid,
}

/// Ice phase transition rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IceConfig {
    /// Ticks a frozen cell stays ice; 0 means ice never thaws
    pub thaw_ticks: u32,
    pub thaw_into: ThawInto,
}

impl Default for IceConfig {
    fn default() -> Self {
        Self {
            thaw_ticks: DEFAULT_THAW_TICKS,
            thaw_into: ThawInto::Water,
        }
    }
}

/// Objective kinds. Wire codes feed the determinism hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectiveKind {
    LockPieces,
    DrainWater,
    SurviveTicks,
    ExecuteRotations,
    PlaceSolids,
}

impl ObjectiveKind {
    pub fn code(self) -> u8 {
        match self {
            ObjectiveKind::LockPieces => 0,
            ObjectiveKind::DrainWater => 1,
            ObjectiveKind::SurviveTicks => 2,
            ObjectiveKind::ExecuteRotations => 3,
            ObjectiveKind::PlaceSolids => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectiveSpec {
    pub kind: ObjectiveKind,
    pub target: u32,
}

impl Level {
    /// Minimal level: empty grid, scripted sequence, every option defaulted.
    pub fn new(id: impl Into<String>, size: Int3, entries: Vec<BagEntry>) -> Self {
        Self {
            id: id.into(),
            size,
            seed: 0,
            spawn: None,
            voxels: Vec::new(),
            sequence: SequenceConfig::Fixed { entries },
            abilities: AbilityConfig::default(),
            constraints: ConstraintConfig::default(),
            timing: TimingConfig::default(),
            ice: IceConfig::default(),
            objectives: Vec::new(),
        }
    }

    pub fn spawn_origin(&self) -> Int3 {
        self.spawn
            .unwrap_or(Int3::new(self.size.x / 2, self.size.y - 2, self.size.z / 2))
    }

    /// Check every structural requirement and build the initial grid.
    pub fn build_grid(&self) -> Result<Grid, LevelError> {
        if self.id.is_empty() {
            return Err(LevelError::EmptyId);
        }
        if self.sequence.entries().is_empty() {
            return Err(LevelError::EmptySequence);
        }
        if self.timing.gravity_interval_ticks == 0 {
            return Err(LevelError::ZeroGravityInterval);
        }

        let mut grid = Grid::new(self.size)?;
        let spawn = self.spawn_origin();
        if !grid.contains(spawn) {
            return Err(LevelError::SpawnOutOfRange(spawn));
        }
        for (index, placement) in self.voxels.iter().enumerate() {
            grid.set_voxel(placement.pos, placement.voxel())
                .map_err(|_| LevelError::PlacementOutOfRange {
                    index,
                    pos: placement.pos,
                })?;
        }
        Ok(grid)
    }
}

//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data (plus `serde` derives so levels and replays
//! can carry it), usable by the simulation core, the replay runner, and any
//! presentation layer a host wants to bolt on.
//!
//! # Coordinates
//!
//! The playfield is a 3D voxel grid addressed by [`Int3`]. World "up" is `+y`;
//! gravity starts pointing along `-y` and can be snapped to any of the six
//! axis directions by world-rotation commands.
//!
//! # Timing Constants
//!
//! Timing values are in ticks at the canonical rate of 60 ticks per second:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_RATE` | 60 | Canonical ticks per second |
//! | `DEFAULT_GRAVITY_INTERVAL_TICKS` | 60 | One gravity step per second |
//! | `SOFT_DROP_INTERVAL_TICKS` | 1 | Gravity interval while soft dropping |
//! | `LOCK_DELAY_TICKS` | 27 | Grounded ticks before a piece locks (450ms) |
//! | `LOCK_RESET_LIMIT` | 15 | Max lock delay resets per piece |
//! | `STABILIZE_ROTATION_EVENTS` | 2 | Rotation events a stabilize anchor survives |
//! | `DEFAULT_THAW_TICKS` | 180 | Ticks before ice thaws |
//!
//! # Examples
//!
//! ```
//! use voxfall_types::{GravityDir, InputCommand, Int3, PieceKind, WorldRotation};
//!
//! let piece = PieceKind::from_str("i4").unwrap();
//! assert_eq!(piece, PieceKind::I4);
//!
//! let down = GravityDir::default();
//! assert_eq!(down.vector(), Int3::new(0, -1, 0));
//! assert_eq!(down.rotated(WorldRotation::Forward), GravityDir::PosZ);
//!
//! let cmd = InputCommand::from_str("hardDrop").unwrap();
//! assert_eq!(cmd, InputCommand::HardDrop);
//! ```

use std::fmt;
use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Canonical real-time tick rate (ticks per second).
pub const TICK_RATE: u32 = 60;

/// Gravity interval when the level does not configure one (1000ms).
pub const DEFAULT_GRAVITY_INTERVAL_TICKS: u32 = 60;

/// Gravity interval for the remainder of a drop once soft drop is requested.
pub const SOFT_DROP_INTERVAL_TICKS: u32 = 1;

/// Grounded ticks before a piece locks (450ms at 60Hz).
pub const LOCK_DELAY_TICKS: u32 = 27;

/// Maximum number of lock delay resets per piece.
pub const LOCK_RESET_LIMIT: u32 = 15;

/// Rotation events a stabilize anchor survives before it expires.
pub const STABILIZE_ROTATION_EVENTS: u32 = 2;

/// Ticks before a frozen cell thaws when the level does not configure it.
pub const DEFAULT_THAW_TICKS: u32 = 180;

/// Manhattan reach of a drain cell.
pub const DRAIN_REACH: i32 = 1;

/// Largest voxel count of any piece shape.
pub const MAX_PIECE_VOXELS: usize = 4;

/// Score awarded per voxel committed on lock.
pub const LOCK_SCORE_PER_VOXEL: u64 = 10;

/// Score awarded per cell travelled by a hard drop.
pub const HARD_DROP_SCORE_PER_CELL: u64 = 2;

/// Score awarded per gravity step taken while soft dropping.
pub const SOFT_DROP_SCORE_PER_CELL: u64 = 1;

/// Score awarded per water voxel removed by a drain.
pub const DRAIN_SCORE_PER_WATER: u64 = 25;


/// Integer triple used for grid coordinates and offsets.
///
/// No validation happens at this level; bounds are the grid's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "[i32; 3]", into = "[i32; 3]")]
pub struct Int3 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Int3 {
    pub const ZERO: Int3 = Int3::new(0, 0, 0);

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Int3) -> i32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Scale every component by `k`.
    pub fn scaled(self, k: i32) -> Int3 {
        Int3::new(self.x * k, self.y * k, self.z * k)
    }

    /// Quarter turn about the world Y axis: `(x, y, z) -> (-z, y, x)`.
    pub fn rotated_about_y(self) -> Int3 {
        Int3::new(-self.z, self.y, self.x)
    }
}

impl From<[i32; 3]> for Int3 {
    fn from(v: [i32; 3]) -> Self {
        Int3::new(v[0], v[1], v[2])
    }
}

impl From<Int3> for [i32; 3] {
    fn from(v: Int3) -> Self {
        [v.x, v.y, v.z]
    }
}

impl Add for Int3 {
    type Output = Int3;

    fn add(self, rhs: Int3) -> Int3 {
        Int3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Int3 {
    type Output = Int3;

    fn sub(self, rhs: Int3) -> Int3 {
        Int3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Int3 {
    type Output = Int3;

    fn neg(self) -> Int3 {
        Int3::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Int3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// What occupies a grid cell.
///
/// The wire codes returned by [`OccupancyType::code`] are part of the
/// determinism hash and must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OccupancyType {
    #[default]
    Empty,
    Solid,
    Bedrock,
    Porous,
    Water,
    Ice,
    Drain,
    Wall,
}

impl OccupancyType {
    pub fn code(self) -> u8 {
        match self {
            OccupancyType::Empty => 0,
            OccupancyType::Solid => 1,
            OccupancyType::Bedrock => 2,
            OccupancyType::Porous => 3,
            OccupancyType::Water => 4,
            OccupancyType::Ice => 5,
            OccupancyType::Drain => 6,
            OccupancyType::Wall => 7,
        }
    }

    /// Whether an active piece may not enter a cell of this kind.
    ///
    /// Water is passable for pieces but still takes part in physics.
    pub fn blocks_movement(self) -> bool {
        match self {
            OccupancyType::Empty | OccupancyType::Water => false,
            OccupancyType::Solid
            | OccupancyType::Bedrock
            | OccupancyType::Porous
            | OccupancyType::Ice
            | OccupancyType::Drain
            | OccupancyType::Wall => true,
        }
    }

    /// Whether flowing water may enter a cell of this kind.
    pub fn admits_water(self) -> bool {
        match self {
            OccupancyType::Empty | OccupancyType::Porous => true,
            OccupancyType::Solid
            | OccupancyType::Bedrock
            | OccupancyType::Water
            | OccupancyType::Ice
            | OccupancyType::Drain
            | OccupancyType::Wall => false,
        }
    }
}

/// Material identifier attached to a voxel.
///
/// A few ids carry gameplay meaning (see the associated constants); any other
/// id is accepted and treated as an ordinary material of mass 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(String);

impl MaterialId {
    pub const DEFAULT: &'static str = "DEFAULT";
    /// Permanently anchored on lock; never expires through rotation events.
    pub const REINFORCED: &'static str = "REINFORCED";
    pub const HEAVY: &'static str = "HEAVY";
    /// Freezes 6-adjacent water on lock.
    pub const FROST: &'static str = "FROST";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Material of cells that carry none (empty space).
    pub const fn none() -> Self {
        Self(String::new())
    }

    pub fn default_material() -> Self {
        Self::new(Self::DEFAULT)
    }

    pub fn reinforced() -> Self {
        Self::new(Self::REINFORCED)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_reinforced(&self) -> bool {
        self.0 == Self::REINFORCED
    }

    pub fn is_frost(&self) -> bool {
        self.0 == Self::FROST
    }

    /// Mass contributed by one solid voxel of this material.
    pub fn mass(&self) -> u32 {
        match self.0.as_str() {
            Self::REINFORCED => 2,
            Self::HEAVY => 3,
            _ => 1,
        }
    }
}

impl Default for MaterialId {
    fn default() -> Self {
        Self::default_material()
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One grid cell. Replaced wholesale on mutation, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Voxel {
    pub kind: OccupancyType,
    pub material: MaterialId,
    pub anchored: bool,
}

impl Voxel {
    pub const EMPTY: Voxel = Voxel::empty();

    pub const fn empty() -> Self {
        Self {
            kind: OccupancyType::Empty,
            material: MaterialId::none(),
            anchored: false,
        }
    }

    pub fn new(kind: OccupancyType, material: MaterialId, anchored: bool) -> Self {
        Self {
            kind,
            material,
            anchored,
        }
    }

    pub fn solid(material: MaterialId, anchored: bool) -> Self {
        Self::new(OccupancyType::Solid, material, anchored)
    }

    pub fn water() -> Self {
        Self::new(OccupancyType::Water, MaterialId::new("WATER"), false)
    }

    pub fn is_empty(&self) -> bool {
        self.kind == OccupancyType::Empty
    }

    /// Same voxel with a different anchored flag.
    pub fn with_anchored(&self, anchored: bool) -> Self {
        Self {
            anchored,
            ..self.clone()
        }
    }
}

impl Default for Voxel {
    fn default() -> Self {
        Self::empty()
    }
}

/// One of the six axis-aligned gravity directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GravityDir {
    NegX,
    PosX,
    #[default]
    NegY,
    PosY,
    NegZ,
    PosZ,
}

impl GravityDir {
    pub const ALL: [GravityDir; 6] = [
        GravityDir::NegX,
        GravityDir::PosX,
        GravityDir::NegY,
        GravityDir::PosY,
        GravityDir::NegZ,
        GravityDir::PosZ,
    ];

    pub fn code(self) -> u8 {
        match self {
            GravityDir::NegX => 0,
            GravityDir::PosX => 1,
            GravityDir::NegY => 2,
            GravityDir::PosY => 3,
            GravityDir::NegZ => 4,
            GravityDir::PosZ => 5,
        }
    }

    /// Unit step in the "down" direction.
    pub fn vector(self) -> Int3 {
        match self {
            GravityDir::NegX => Int3::new(-1, 0, 0),
            GravityDir::PosX => Int3::new(1, 0, 0),
            GravityDir::NegY => Int3::new(0, -1, 0),
            GravityDir::PosY => Int3::new(0, 1, 0),
            GravityDir::NegZ => Int3::new(0, 0, -1),
            GravityDir::PosZ => Int3::new(0, 0, 1),
        }
    }

    /// The two lateral axes `(u, v)` used for translation and kicks.
    ///
    /// Y gravity moves along (X, Z), X gravity along (Z, Y), Z gravity along (X, Y).
    pub fn lateral_axes(self) -> (Int3, Int3) {
        match self {
            GravityDir::NegY | GravityDir::PosY => (Int3::new(1, 0, 0), Int3::new(0, 0, 1)),
            GravityDir::NegX | GravityDir::PosX => (Int3::new(0, 0, 1), Int3::new(0, 1, 0)),
            GravityDir::NegZ | GravityDir::PosZ => (Int3::new(1, 0, 0), Int3::new(0, 1, 0)),
        }
    }

    /// Gravity after one quarter-turn world rotation.
    ///
    /// Forward/Back turn about the X axis, Left/Right about the Z axis. A
    /// direction parallel to the rotation axis is unchanged.
    pub fn rotated(self, rotation: WorldRotation) -> GravityDir {
        use GravityDir::*;
        match rotation {
            WorldRotation::Forward => match self {
                NegY => PosZ,
                PosZ => PosY,
                PosY => NegZ,
                NegZ => NegY,
                NegX | PosX => self,
            },
            WorldRotation::Back => match self {
                NegY => NegZ,
                NegZ => PosY,
                PosY => PosZ,
                PosZ => NegY,
                NegX | PosX => self,
            },
            WorldRotation::Left => match self {
                NegY => PosX,
                PosX => PosY,
                PosY => NegX,
                NegX => NegY,
                NegZ | PosZ => self,
            },
            WorldRotation::Right => match self {
                NegY => NegX,
                NegX => PosY,
                PosY => PosX,
                PosX => NegY,
                NegZ | PosZ => self,
            },
        }
    }
}

/// Quarter-turn world rotations that re-aim gravity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorldRotation {
    Forward,
    Back,
    Left,
    Right,
}

/// Piece shapes known to the simulation.
///
/// The variant name doubles as the wire id (`"I4"`, `"C4"`, ...). The digit
/// is the voxel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    /// Single voxel
    M1,
    /// Two-voxel bar
    D2,
    /// Three-voxel bar
    I3,
    /// Three-voxel corner
    L3,
    /// Four-voxel bar
    I4,
    /// 2x2 square
    O4,
    T4,
    L4,
    S4,
    /// 3D corner tripod
    C4,
}

impl PieceKind {
    pub const ALL: [PieceKind; 10] = [
        PieceKind::M1,
        PieceKind::D2,
        PieceKind::I3,
        PieceKind::L3,
        PieceKind::I4,
        PieceKind::O4,
        PieceKind::T4,
        PieceKind::L4,
        PieceKind::S4,
        PieceKind::C4,
    ];

    /// Parse piece kind from its id (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use voxfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("I4"), Some(PieceKind::I4));
    /// assert_eq!(PieceKind::from_str("c4"), Some(PieceKind::C4));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::M1 => "M1",
            PieceKind::D2 => "D2",
            PieceKind::I3 => "I3",
            PieceKind::L3 => "L3",
            PieceKind::I4 => "I4",
            PieceKind::O4 => "O4",
            PieceKind::T4 => "T4",
            PieceKind::L4 => "L4",
            PieceKind::S4 => "S4",
            PieceKind::C4 => "C4",
        }
    }
}

/// One per-tick input command.
///
/// Used by live hosts and replay files alike; the serialised form is the
/// variant name (`"HardDrop"`), which is what the replay input encoding
/// `command-name-v1` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InputCommand {
    /// No input this tick
    #[default]
    Noop,
    /// Move one cell along the negative first lateral axis
    MoveLeft,
    /// Move one cell along the positive first lateral axis
    MoveRight,
    /// Move one cell along the positive second lateral axis
    MoveForward,
    /// Move one cell along the negative second lateral axis
    MoveBack,
    /// Advance the orientation index
    RotateCw,
    /// Step the orientation index back
    RotateCcw,
    /// Gravity interval drops to one tick for the rest of the drop
    SoftDrop,
    /// Drop to the furthest free cell and lock
    HardDrop,
    /// Swap the active piece with the hold slot
    Hold,
    RotateWorldForward,
    RotateWorldBack,
    RotateWorldLeft,
    RotateWorldRight,
}

impl InputCommand {
    pub const ALL: [InputCommand; 14] = [
        InputCommand::Noop,
        InputCommand::MoveLeft,
        InputCommand::MoveRight,
        InputCommand::MoveForward,
        InputCommand::MoveBack,
        InputCommand::RotateCw,
        InputCommand::RotateCcw,
        InputCommand::SoftDrop,
        InputCommand::HardDrop,
        InputCommand::Hold,
        InputCommand::RotateWorldForward,
        InputCommand::RotateWorldBack,
        InputCommand::RotateWorldLeft,
        InputCommand::RotateWorldRight,
    ];

    /// Parse a command name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use voxfall_types::InputCommand;
    ///
    /// assert_eq!(InputCommand::from_str("moveLeft"), Some(InputCommand::MoveLeft));
    /// assert_eq!(InputCommand::from_str("RotateWorldBack"), Some(InputCommand::RotateWorldBack));
    /// assert_eq!(InputCommand::from_str("jump"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.as_str().eq_ignore_ascii_case(s))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputCommand::Noop => "Noop",
            InputCommand::MoveLeft => "MoveLeft",
            InputCommand::MoveRight => "MoveRight",
            InputCommand::MoveForward => "MoveForward",
            InputCommand::MoveBack => "MoveBack",
            InputCommand::RotateCw => "RotateCw",
            InputCommand::RotateCcw => "RotateCcw",
            InputCommand::SoftDrop => "SoftDrop",
            InputCommand::HardDrop => "HardDrop",
            InputCommand::Hold => "Hold",
            InputCommand::RotateWorldForward => "RotateWorldForward",
            InputCommand::RotateWorldBack => "RotateWorldBack",
            InputCommand::RotateWorldLeft => "RotateWorldLeft",
            InputCommand::RotateWorldRight => "RotateWorldRight",
        }
    }

    /// The world rotation this command performs, if any.
    pub fn world_rotation(&self) -> Option<WorldRotation> {
        match self {
            InputCommand::RotateWorldForward => Some(WorldRotation::Forward),
            InputCommand::RotateWorldBack => Some(WorldRotation::Back),
            InputCommand::RotateWorldLeft => Some(WorldRotation::Left),
            InputCommand::RotateWorldRight => Some(WorldRotation::Right),
            _ => None,
        }
    }
}

/// Terminal-or-not simulation status. Moves from `Playing` at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Playing,
    Won,
    Lost,
}

impl Status {
    pub fn code(self) -> u8 {
        match self {
            Status::Playing => 0,
            Status::Won => 1,
            Status::Lost => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        self != Status::Playing
    }
}

/// Why a simulation ended in [`Status::Lost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LossReason {
    SpawnBlocked,
    MassExceeded,
    WaterTooHigh,
    RestingOnWater,
}

impl LossReason {
    pub fn code(self) -> u8 {
        match self {
            LossReason::SpawnBlocked => 0,
            LossReason::MassExceeded => 1,
            LossReason::WaterTooHigh => 2,
            LossReason::RestingOnWater => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LossReason::SpawnBlocked => "spawn blocked",
            LossReason::MassExceeded => "max mass exceeded",
            LossReason::WaterTooHigh => "water above forbidden height",
            LossReason::RestingOnWater => "solid resting on water",
        }
    }
}

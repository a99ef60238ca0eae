//! Movement module - stateless per-tick input resolution
//!
//! [`resolve`] looks at the grid, the active piece and the current gravity
//! and decides what one [`InputCommand`] does. It never mutates anything: the
//! engine applies the returned [`MoveOutcome`] (new piece pose, lock request,
//! hold request, world rotation) in its own phase order.

use crate::grid::Grid;
use crate::pieces::{try_rotate, ActivePiece};
use crate::types::{GravityDir, InputCommand, Int3};

/// Result of resolving one command against the active piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Command was legal in the current situation
    pub accepted: bool,
    /// The piece pose changed
    pub moved: bool,
    /// The piece must lock this tick (hard drop)
    pub lock_requested: bool,
    /// Switch the drop to the soft-drop interval
    pub soft_drop: bool,
    /// Swap with the hold slot (the engine decides if that is allowed)
    pub hold_requested: bool,
    /// New gravity after a world rotation event
    pub world_rotation: Option<GravityDir>,
    /// Cells travelled by a hard drop
    pub drop_distance: u32,
    /// Piece pose after the command
    pub piece: ActivePiece,
}

impl MoveOutcome {
    fn unchanged(piece: &ActivePiece, accepted: bool) -> Self {
        Self {
            accepted,
            moved: false,
            lock_requested: false,
            soft_drop: false,
            hold_requested: false,
            world_rotation: None,
            drop_distance: 0,
            piece: piece.clone(),
        }
    }

    fn moved_to(piece: ActivePiece) -> Self {
        Self {
            moved: true,
            ..Self::unchanged(&piece, true)
        }
    }
}

/// Lateral step for a translation command, `None` for anything else
pub fn translation(command: InputCommand, gravity: GravityDir) -> Option<Int3> {
    let (u, v) = gravity.lateral_axes();
    match command {
        InputCommand::MoveLeft => Some(-u),
        InputCommand::MoveRight => Some(u),
        InputCommand::MoveForward => Some(v),
        InputCommand::MoveBack => Some(-v),
        _ => None,
    }
}

/// How many free cells the piece can fall along gravity
pub fn drop_distance(grid: &Grid, piece: &ActivePiece, gravity: GravityDir) -> u32 {
    let down = gravity.vector();
    let mut distance: u32 = 0;
    let mut probe = piece.translated(down);
    while probe.fits(grid) {
        distance += 1;
        probe = probe.translated(down);
    }
    distance
}

/// Resolve one command. Pure: the grid and piece are only read.
pub fn resolve(
    grid: &Grid,
    piece: &ActivePiece,
    gravity: GravityDir,
    command: InputCommand,
) -> MoveOutcome {
    match command {
        InputCommand::Noop => MoveOutcome::unchanged(piece, true),

        InputCommand::MoveLeft
        | InputCommand::MoveRight
        | InputCommand::MoveForward
        | InputCommand::MoveBack => {
            let Some(delta) = translation(command, gravity) else {
                return MoveOutcome::unchanged(piece, false);
            };
            let shifted = piece.translated(delta);
            if shifted.fits(grid) {
                MoveOutcome::moved_to(shifted)
            } else {
                MoveOutcome::unchanged(piece, false)
            }
        }

        InputCommand::RotateCw | InputCommand::RotateCcw => {
            let clockwise = command == InputCommand::RotateCw;
            let result = try_rotate(
                piece.kind,
                piece.orientation,
                piece.origin,
                clockwise,
                gravity,
                |pos| grid.is_free(pos),
            );
            match result {
                Some((orientation, origin)) => MoveOutcome::moved_to(ActivePiece {
                    orientation,
                    origin,
                    ..piece.clone()
                }),
                None => MoveOutcome::unchanged(piece, false),
            }
        }

        InputCommand::SoftDrop => MoveOutcome {
            soft_drop: true,
            ..MoveOutcome::unchanged(piece, true)
        },

        InputCommand::HardDrop => {
            let distance = drop_distance(grid, piece, gravity);
            let landed = piece.translated(gravity.vector().scaled(distance as i32));
            MoveOutcome {
                moved: distance > 0,
                lock_requested: true,
                drop_distance: distance,
                ..MoveOutcome::unchanged(&landed, true)
            }
        }

        InputCommand::Hold => MoveOutcome {
            hold_requested: true,
            ..MoveOutcome::unchanged(piece, true)
        },

        InputCommand::RotateWorldForward
        | InputCommand::RotateWorldBack
        | InputCommand::RotateWorldLeft
        | InputCommand::RotateWorldRight => {
            let Some(rotation) = command.world_rotation() else {
                return MoveOutcome::unchanged(piece, false);
            };
            MoveOutcome {
                world_rotation: Some(gravity.rotated(rotation)),
                ..MoveOutcome::unchanged(piece, true)
            }
        }
    }
}

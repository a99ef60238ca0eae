//! Simulation module - the tick state machine
//!
//! [`Simulation`] owns the grid, the piece bag and every counter. The only
//! way to change it is [`Simulation::tick`], which runs the phases below in
//! a fixed order. The order is part of the determinism contract.
//!
//! 1. Input: resolve the command through [`movement::resolve`], apply hold
//!    and world rotation events.
//! 2. Lock: commit the piece on a hard drop or an expired lock delay, then
//!    spawn the next one.
//! 3. Gravity: step the piece one cell when the countdown runs out.
//! 4. Fluids: water flow, ice timers, drains.
//! 5. Constraints: the first violated rule loses the level.
//! 6. Objectives: all completed wins the level.
//! 7. Bookkeeping: counters and score.
//!
//! A tick either applies completely or returns an error and leaves the
//! simulation exactly as it was.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::error::{LevelError, SimError};
use crate::fluids::{self, cell_key, IceTimer};
use crate::grid::Grid;
use crate::level::Level;
use crate::movement;
use crate::pieces::ActivePiece;
use crate::rng::{BagEntry, PieceBag};
use crate::rules::{self, ObjectiveProgress};
use crate::scoring::{calculate_drain_score, calculate_drop_score, calculate_lock_score};
use crate::types::{
    GravityDir, InputCommand, Int3, LossReason, OccupancyType, Status, Voxel,
    SOFT_DROP_INTERVAL_TICKS, STABILIZE_ROTATION_EVENTS,
};

/// Countdown until a stabilized voxel loses its anchor, in rotation events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilizeAnchorTimer {
    pub remaining: u32,
}

/// Status and counters
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimulationState {
    pub status: Status,
    pub loss_reason: Option<LossReason>,
    pub ticks_elapsed: u64,
    pub pieces_locked: u32,
    pub score: u64,
    pub water_removed_total: u32,
    pub rotations_executed: u32,
    pub stabilize_charges: u32,
    pub gravity: GravityDir,
    /// Ticks until the next gravity step
    pub gravity_countdown: u32,
    /// Soft drop stays on until the piece locks
    pub soft_drop: bool,
    /// Consecutive blocked gravity steps of the active piece
    pub lock_delay_ticks: u32,
    /// Lock delay resets spent by the active piece
    pub lock_resets: u32,
    /// Lock delay expired; the piece locks on the next tick it is grounded
    pub lock_pending: bool,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// The command was applied (false for rejected input and terminal ticks)
    pub accepted: bool,
    /// The active piece changed pose because of the command
    pub moved: bool,
    pub held: bool,
    pub locked: bool,
    pub rotation_event: bool,
    pub water_moved: u32,
    pub water_drained: u32,
    pub status: Status,
}

/// Deterministic simulation of one level
#[derive(Debug, Clone)]
pub struct Simulation {
    level: Arc<Level>,
    grid: Grid,
    bag: PieceBag,
    active: Option<ActivePiece>,
    hold: Option<BagEntry>,
    hold_used: bool,
    ice_timers: BTreeMap<u64, IceTimer>,
    anchor_timers: BTreeMap<u64, StabilizeAnchorTimer>,
    state: SimulationState,
    objectives: Vec<ObjectiveProgress>,
}

impl Simulation {
    /// Validate the level, build the grid and spawn the first piece.
    ///
    /// A first spawn that is already blocked yields a simulation that is
    /// `Lost` from the start, not an error.
    pub fn new(level: &Level) -> Result<Self, SimError> {
        let grid = level.build_grid().map_err(|err| {
            warn!("rejecting level {:?}: {err}", level.id);
            err
        })?;

        let mut ice_timers = BTreeMap::new();
        if level.ice.thaw_ticks > 0 {
            for pos in grid.positions_of(OccupancyType::Ice) {
                ice_timers.insert(
                    cell_key(&grid, pos)?,
                    IceTimer {
                        remaining: level.ice.thaw_ticks,
                    },
                );
            }
        }

        let state = SimulationState {
            stabilize_charges: level.abilities.stabilize_charges,
            gravity_countdown: level.timing.gravity_interval_ticks,
            ..SimulationState::default()
        };

        let mut sim = Self {
            bag: level.sequence.build_bag(level.seed),
            level: Arc::new(level.clone()),
            grid,
            active: None,
            hold: None,
            hold_used: false,
            ice_timers,
            anchor_timers: BTreeMap::new(),
            state,
            objectives: Vec::new(),
        };

        let first = sim.draw_entry()?;
        sim.spawn_entry(first);
        sim.objectives = rules::evaluate_objectives(&sim.grid, &sim.state, &sim.level.objectives);
        debug!("simulation ready for level {:?}", sim.level.id);
        Ok(sim)
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn status(&self) -> Status {
        self.state.status
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn hold_piece(&self) -> Option<&BagEntry> {
        self.hold.as_ref()
    }

    pub fn hold_used(&self) -> bool {
        self.hold_used
    }

    pub fn can_hold(&self) -> bool {
        !self.hold_used
    }

    pub fn bag(&self) -> &PieceBag {
        &self.bag
    }

    /// Upcoming pieces, without consuming them
    pub fn preview(&self, count: usize) -> Vec<BagEntry> {
        self.bag.peek(count)
    }

    pub fn ice_timers(&self) -> &BTreeMap<u64, IceTimer> {
        &self.ice_timers
    }

    pub fn anchor_timers(&self) -> &BTreeMap<u64, StabilizeAnchorTimer> {
        &self.anchor_timers
    }

    pub fn objectives(&self) -> &[ObjectiveProgress] {
        &self.objectives
    }

    /// Where the active piece would land (for rendering)
    pub fn ghost(&self) -> Option<ActivePiece> {
        let piece = self.active.as_ref()?;
        let gravity = self.state.gravity;
        let distance = movement::drop_distance(&self.grid, piece, gravity);
        Some(piece.translated(gravity.vector().scaled(distance as i32)))
    }

    /// Advance one tick with one input command.
    ///
    /// Terminal simulations ignore the call. On error the simulation is
    /// restored to its state before the call.
    pub fn tick(&mut self, command: InputCommand) -> Result<TickReport, SimError> {
        if self.state.status.is_terminal() {
            return Ok(TickReport {
                status: self.state.status,
                ..TickReport::default()
            });
        }

        let snapshot = self.clone();
        match self.run_phases(command) {
            Ok(report) => Ok(report),
            Err(err) => {
                warn!(
                    "tick {} failed, state restored: {err}",
                    snapshot.state.ticks_elapsed
                );
                *self = snapshot;
                Err(err)
            }
        }
    }

    fn run_phases(&mut self, command: InputCommand) -> Result<TickReport, SimError> {
        let mut report = TickReport::default();
        let mut pending_score: u64 = 0;
        let mut lock_requested = false;

        // Phase 1: input
        if let Some(piece) = self.active.clone() {
            let outcome = movement::resolve(&self.grid, &piece, self.state.gravity, command);
            report.accepted = outcome.accepted;

            if outcome.hold_requested {
                report.accepted = self.hold()?;
                report.held = report.accepted;
            } else {
                if outcome.moved {
                    self.active = Some(outcome.piece);
                    report.moved = true;
                    if !outcome.lock_requested && self.state.lock_delay_ticks > 0 {
                        self.reset_lock_delay();
                    }
                }
                if outcome.soft_drop && !self.state.soft_drop {
                    self.state.soft_drop = true;
                    self.state.gravity_countdown = self
                        .state
                        .gravity_countdown
                        .min(SOFT_DROP_INTERVAL_TICKS);
                }
                if outcome.lock_requested {
                    lock_requested = true;
                    pending_score += calculate_drop_score(outcome.drop_distance, true);
                }
                if let Some(gravity) = outcome.world_rotation {
                    self.apply_rotation_event(gravity)?;
                    report.rotation_event = true;
                }
            }
        }

        // Phase 2: lock
        if self.state.lock_pending {
            let grounded = self
                .active
                .as_ref()
                .is_some_and(|p| p.is_grounded(&self.grid, self.state.gravity));
            if grounded {
                lock_requested = true;
            } else {
                self.state.lock_pending = false;
            }
        }
        if lock_requested && !self.state.status.is_terminal() {
            pending_score += self.lock_active()?;
            report.locked = true;
        }

        if !self.state.status.is_terminal() {
            // Phase 3: gravity
            if !report.locked {
                pending_score += self.gravity_step();
            }

            // Phase 4: water, ice, drains
            report.water_moved = fluids::flow_water(&mut self.grid, self.state.gravity)?;
            fluids::tick_ice(&mut self.grid, &mut self.ice_timers, self.level.ice.thaw_into)?;
            report.water_drained = fluids::drain_water(&mut self.grid)?;
            self.state.water_removed_total += report.water_drained;
            pending_score += calculate_drain_score(report.water_drained);

            // Phase 5: constraints
            let violation = rules::evaluate_constraints(
                &self.grid,
                self.state.gravity,
                &self.level.constraints,
            );
            if let Some(reason) = violation {
                self.finish(Status::Lost, Some(reason));
            } else {
                // Phase 6: objectives
                self.objectives =
                    rules::evaluate_objectives(&self.grid, &self.state, &self.level.objectives);
                if rules::all_completed(&self.objectives) {
                    self.finish(Status::Won, None);
                }
            }
        }

        // Phase 7: bookkeeping
        self.state.ticks_elapsed += 1;
        if report.rotation_event {
            self.state.rotations_executed += 1;
        }
        self.state.score += pending_score;

        report.status = self.state.status;
        Ok(report)
    }

    /// Swap the active piece with the hold slot. Once per drop.
    fn hold(&mut self) -> Result<bool, SimError> {
        if self.hold_used {
            return Ok(false);
        }
        let Some(active) = self.active.take() else {
            return Ok(false);
        };

        let incoming = match self.hold.replace(active.entry()) {
            Some(entry) => entry,
            None => self.draw_entry()?,
        };
        self.hold_used = true;
        debug!("hold {} -> {}", active.kind.as_str(), incoming.piece.as_str());
        self.spawn_entry(incoming);
        Ok(true)
    }

    /// Commit the active piece to the grid and spawn the next one.
    ///
    /// Returns the points earned by the lock.
    fn lock_active(&mut self) -> Result<u64, SimError> {
        let Some(piece) = self.active.take() else {
            return Ok(0);
        };
        let cells = piece.cells();

        let reinforced = piece.material.is_reinforced();
        let stabilized = !reinforced && self.state.stabilize_charges > 0;
        if stabilized {
            self.state.stabilize_charges -= 1;
        }

        for &cell in &cells {
            self.grid.set_voxel(
                cell,
                Voxel::solid(piece.material.clone(), reinforced || stabilized),
            )?;
            if stabilized {
                self.anchor_timers.insert(
                    cell_key(&self.grid, cell)?,
                    StabilizeAnchorTimer {
                        remaining: STABILIZE_ROTATION_EVENTS,
                    },
                );
            }
        }

        if piece.material.is_frost() {
            fluids::freeze_adjacent(
                &mut self.grid,
                &cells,
                &mut self.ice_timers,
                self.level.ice.thaw_ticks,
            )?;
        }

        self.state.pieces_locked += 1;
        self.hold_used = false;
        debug!(
            "locked {} ({}) at {}, anchored: {}",
            piece.kind.as_str(),
            piece.material,
            piece.origin,
            reinforced || stabilized
        );

        let next = self.draw_entry()?;
        self.spawn_entry(next);
        Ok(calculate_lock_score(cells.len()))
    }

    /// Place a new active piece at the spawn pose; a blocked spawn loses.
    fn spawn_entry(&mut self, entry: BagEntry) {
        let piece = ActivePiece::spawn(&entry, self.level.spawn_origin());

        self.state.lock_delay_ticks = 0;
        self.state.lock_resets = 0;
        self.state.lock_pending = false;
        self.state.soft_drop = false;
        self.state.gravity_countdown = self.level.timing.gravity_interval_ticks;

        if piece.fits(&self.grid) {
            debug!("spawned {} at {}", piece.kind.as_str(), piece.origin);
            self.active = Some(piece);
        } else {
            self.active = None;
            self.finish(Status::Lost, Some(LossReason::SpawnBlocked));
        }
    }

    fn draw_entry(&mut self) -> Result<BagEntry, SimError> {
        self.bag
            .draw()
            .ok_or(SimError::Level(LevelError::EmptySequence))
    }

    /// Reset the lock delay (with reset limit)
    fn reset_lock_delay(&mut self) {
        if self.state.lock_resets < self.level.timing.lock_reset_limit {
            self.state.lock_delay_ticks = 0;
            self.state.lock_pending = false;
            self.state.lock_resets += 1;
        }
    }

    /// Count down and, when due, move the piece one cell along gravity.
    ///
    /// Returns soft drop points.
    fn gravity_step(&mut self) -> u64 {
        let Some(piece) = self.active.as_ref() else {
            return 0;
        };

        self.state.gravity_countdown = self.state.gravity_countdown.saturating_sub(1);
        if self.state.gravity_countdown > 0 {
            return 0;
        }

        let fallen = piece.translated(self.state.gravity.vector());
        if fallen.fits(&self.grid) {
            self.active = Some(fallen);
            self.state.lock_delay_ticks = 0;
            self.state.lock_pending = false;
            if self.state.soft_drop {
                self.state.gravity_countdown = SOFT_DROP_INTERVAL_TICKS;
                calculate_drop_score(1, false)
            } else {
                self.state.gravity_countdown = self.level.timing.gravity_interval_ticks;
                0
            }
        } else {
            self.state.gravity_countdown = 1;
            self.state.lock_delay_ticks += 1;
            if self.state.lock_delay_ticks >= self.level.timing.lock_delay_ticks {
                self.state.lock_pending = true;
            }
            0
        }
    }

    /// One world rotation event: re-aim gravity, age the stabilize anchors
    /// and let loose voxels settle.
    fn apply_rotation_event(&mut self, gravity: GravityDir) -> Result<(), SimError> {
        let previous = self.state.gravity;
        self.state.gravity = gravity;

        let mut expired = Vec::new();
        for (&key, timer) in self.anchor_timers.iter_mut() {
            timer.remaining = timer.remaining.saturating_sub(1);
            if timer.remaining == 0 {
                expired.push(key);
            }
        }
        for key in &expired {
            self.anchor_timers.remove(key);
            let pos = self.grid.position_of(*key as usize);
            let released = self.grid.get_voxel(pos)?.with_anchored(false);
            self.grid.set_voxel(pos, released)?;
        }

        let obstacles: Vec<Int3> = self
            .active
            .as_ref()
            .map(|p| p.cells().to_vec())
            .unwrap_or_default();
        let settled = fluids::settle_loose_voxels(&mut self.grid, gravity, &obstacles)?;

        debug!(
            "world rotation {:?} -> {:?}: {} anchors released, {} voxels settled",
            previous,
            gravity,
            expired.len(),
            settled
        );
        Ok(())
    }

    fn finish(&mut self, status: Status, reason: Option<LossReason>) {
        if self.state.status.is_terminal() {
            return;
        }
        self.state.status = status;
        self.state.loss_reason = reason;
        match reason {
            Some(reason) => info!(
                "level {:?} lost at tick {}: {}",
                self.level.id,
                self.state.ticks_elapsed,
                reason.as_str()
            ),
            None => info!(
                "level {:?} won at tick {}",
                self.level.id, self.state.ticks_elapsed
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{ObjectiveKind, ObjectiveSpec, VoxelPlacement};
    use crate::types::{MaterialId, PieceKind};

    fn entry(kind: PieceKind) -> BagEntry {
        BagEntry::new(kind, MaterialId::default())
    }

    fn level(entries: Vec<BagEntry>) -> Level {
        Level::new("unit", Int3::new(6, 8, 6), entries)
    }

    #[test]
    fn test_new_spawns_first_piece() {
        let sim = Simulation::new(&level(vec![entry(PieceKind::T4)])).unwrap();
        let active = sim.active().unwrap();
        assert_eq!(active.kind, PieceKind::T4);
        assert_eq!(active.origin, Int3::new(3, 6, 3));
        assert_eq!(sim.status(), Status::Playing);
        assert_eq!(sim.state().gravity, GravityDir::NegY);
    }

    #[test]
    fn test_new_rejects_invalid_level() {
        let bad = Level::new("bad", Int3::new(0, 4, 4), vec![entry(PieceKind::M1)]);
        assert!(matches!(
            Simulation::new(&bad),
            Err(SimError::Level(LevelError::Grid(_)))
        ));
    }

    #[test]
    fn test_blocked_first_spawn_is_lost() {
        let mut lvl = level(vec![entry(PieceKind::M1)]);
        lvl.voxels.push(VoxelPlacement::new(
            lvl.spawn_origin(),
            OccupancyType::Bedrock,
        ));
        let sim = Simulation::new(&lvl).unwrap();
        assert_eq!(sim.status(), Status::Lost);
        assert_eq!(sim.state().loss_reason, Some(LossReason::SpawnBlocked));
        assert!(sim.active().is_none());
    }

    #[test]
    fn test_hard_drop_locks_and_scores() {
        let mut sim = Simulation::new(&level(vec![entry(PieceKind::I4)])).unwrap();
        let report = sim.tick(InputCommand::HardDrop).unwrap();
        assert!(report.accepted && report.locked);
        assert_eq!(sim.state().pieces_locked, 1);
        assert_eq!(sim.grid().count(OccupancyType::Solid), 4);
        // 6 cells * 2 + 4 voxels * 10
        assert_eq!(sim.state().score, 12 + 40);
        assert_eq!(sim.state().ticks_elapsed, 1);
        assert!(sim.active().is_some());
    }

    #[test]
    fn test_gravity_steps_on_interval() {
        let mut lvl = level(vec![entry(PieceKind::M1)]);
        lvl.timing.gravity_interval_ticks = 3;
        let mut sim = Simulation::new(&lvl).unwrap();
        let start = sim.active().unwrap().origin;
        sim.tick(InputCommand::Noop).unwrap();
        sim.tick(InputCommand::Noop).unwrap();
        assert_eq!(sim.active().unwrap().origin, start);
        sim.tick(InputCommand::Noop).unwrap();
        assert_eq!(sim.active().unwrap().origin, start + Int3::new(0, -1, 0));
    }

    #[test]
    fn test_soft_drop_falls_every_tick_and_scores() {
        let mut sim = Simulation::new(&level(vec![entry(PieceKind::M1)])).unwrap();
        let start = sim.active().unwrap().origin;
        sim.tick(InputCommand::SoftDrop).unwrap();
        sim.tick(InputCommand::Noop).unwrap();
        assert_eq!(sim.active().unwrap().origin, start + Int3::new(0, -2, 0));
        assert_eq!(sim.state().score, 2);
    }

    #[test]
    fn test_lock_delay_expires_into_lock() {
        let mut lvl = level(vec![entry(PieceKind::M1)]);
        lvl.timing.gravity_interval_ticks = 1;
        lvl.timing.lock_delay_ticks = 2;
        let mut sim = Simulation::new(&lvl).unwrap();
        // Falls from y=6 to y=0 in 6 ticks
        for _ in 0..6 {
            sim.tick(InputCommand::Noop).unwrap();
        }
        assert_eq!(sim.active().unwrap().origin.y, 0);
        sim.tick(InputCommand::Noop).unwrap();
        assert_eq!(sim.state().lock_delay_ticks, 1);
        sim.tick(InputCommand::Noop).unwrap();
        assert!(sim.state().lock_pending);
        let report = sim.tick(InputCommand::Noop).unwrap();
        assert!(report.locked);
        assert_eq!(sim.state().pieces_locked, 1);
    }

    #[test]
    fn test_move_while_grounded_resets_lock_delay_up_to_limit() {
        let mut lvl = level(vec![entry(PieceKind::M1)]);
        lvl.timing.gravity_interval_ticks = 1;
        lvl.timing.lock_delay_ticks = 100;
        lvl.timing.lock_reset_limit = 1;
        let mut sim = Simulation::new(&lvl).unwrap();
        for _ in 0..8 {
            sim.tick(InputCommand::Noop).unwrap();
        }
        assert!(sim.state().lock_delay_ticks > 0);

        sim.tick(InputCommand::MoveLeft).unwrap();
        assert_eq!(sim.state().lock_resets, 1);
        // Reset then one more blocked gravity step
        assert_eq!(sim.state().lock_delay_ticks, 1);

        sim.tick(InputCommand::MoveRight).unwrap();
        assert_eq!(sim.state().lock_resets, 1);
        assert_eq!(sim.state().lock_delay_ticks, 2);
    }

    #[test]
    fn test_hold_once_per_drop() {
        let mut sim = Simulation::new(&level(vec![
            entry(PieceKind::I4),
            entry(PieceKind::O4),
            entry(PieceKind::T4),
        ]))
        .unwrap();

        let report = sim.tick(InputCommand::Hold).unwrap();
        assert!(report.accepted && report.held);
        assert_eq!(sim.hold_piece().unwrap().piece, PieceKind::I4);
        assert_eq!(sim.active().unwrap().kind, PieceKind::O4);

        let report = sim.tick(InputCommand::Hold).unwrap();
        assert!(!report.accepted);
        assert_eq!(sim.active().unwrap().kind, PieceKind::O4);

        sim.tick(InputCommand::HardDrop).unwrap();
        assert!(sim.can_hold());
        assert_eq!(sim.active().unwrap().kind, PieceKind::T4);

        sim.tick(InputCommand::Hold).unwrap();
        assert_eq!(sim.active().unwrap().kind, PieceKind::I4);
        assert_eq!(sim.hold_piece().unwrap().piece, PieceKind::T4);
    }

    #[test]
    fn test_terminal_tick_is_noop() {
        let mut lvl = level(vec![entry(PieceKind::I4)]);
        lvl.constraints.max_mass = Some(1);
        let mut sim = Simulation::new(&lvl).unwrap();
        sim.tick(InputCommand::HardDrop).unwrap();
        assert_eq!(sim.status(), Status::Lost);

        let before = sim.state().clone();
        let report = sim.tick(InputCommand::MoveLeft).unwrap();
        assert!(!report.accepted);
        assert_eq!(report.status, Status::Lost);
        assert_eq!(sim.state(), &before);
    }

    #[test]
    fn test_failed_tick_restores_state() {
        let mut sim = Simulation::new(&level(vec![entry(PieceKind::T4)])).unwrap();
        sim.tick(InputCommand::MoveLeft).unwrap();

        // Timer pointing outside the grid: the rotation event fails halfway
        let bad_key = (sim.grid().voxels().len() * 2) as u64;
        sim.anchor_timers
            .insert(bad_key, StabilizeAnchorTimer { remaining: 1 });

        let state = sim.state().clone();
        let grid = sim.grid().clone();
        let active = sim.active().cloned();
        let hash = crate::hash::determinism_hash(&sim);

        let err = sim.tick(InputCommand::RotateWorldForward).unwrap_err();
        assert!(matches!(err, SimError::Grid(_)));
        assert_eq!(sim.state(), &state);
        assert_eq!(sim.state().gravity, GravityDir::NegY);
        assert_eq!(sim.grid(), &grid);
        assert_eq!(sim.active().cloned(), active);
        assert_eq!(sim.anchor_timers()[&bad_key].remaining, 1);
        assert_eq!(crate::hash::determinism_hash(&sim), hash);

        sim.anchor_timers.remove(&bad_key);
        sim.tick(InputCommand::RotateWorldForward).unwrap();
        assert_eq!(sim.state().gravity, GravityDir::PosZ);
        assert_eq!(sim.state().ticks_elapsed, 2);
    }

    #[test]
    fn test_objectives_win() {
        let mut lvl = level(vec![entry(PieceKind::M1)]);
        lvl.objectives.push(ObjectiveSpec {
            kind: ObjectiveKind::LockPieces,
            target: 2,
        });
        let mut sim = Simulation::new(&lvl).unwrap();
        sim.tick(InputCommand::HardDrop).unwrap();
        assert_eq!(sim.status(), Status::Playing);
        assert_eq!(sim.objectives()[0].current, 1);
        sim.tick(InputCommand::HardDrop).unwrap();
        assert_eq!(sim.status(), Status::Won);
        assert!(sim.objectives()[0].completed);
    }

    #[test]
    fn test_rotation_event_counts_and_turns_gravity() {
        let mut sim = Simulation::new(&level(vec![entry(PieceKind::M1)])).unwrap();
        let report = sim.tick(InputCommand::RotateWorldLeft).unwrap();
        assert!(report.rotation_event);
        assert_eq!(sim.state().gravity, GravityDir::PosX);
        assert_eq!(sim.state().rotations_executed, 1);
    }

    #[test]
    fn test_rotation_event_settles_loose_voxels() {
        let mut lvl = level(vec![entry(PieceKind::M1)]);
        lvl.voxels.push(VoxelPlacement::new(Int3::new(0, 0, 0), OccupancyType::Solid));
        let mut sim = Simulation::new(&lvl).unwrap();
        sim.tick(InputCommand::RotateWorldLeft).unwrap();
        // Gravity now +x: the loose voxel slides to the far wall
        assert_eq!(sim.grid().kind_at(Int3::new(5, 0, 0)), Some(OccupancyType::Solid));
        assert_eq!(sim.grid().kind_at(Int3::new(0, 0, 0)), Some(OccupancyType::Empty));
    }

    #[test]
    fn test_frost_freezes_adjacent_water() {
        let mut lvl = level(vec![BagEntry::new(PieceKind::M1, MaterialId::new("FROST"))]);
        lvl.spawn = Some(Int3::new(1, 1, 1));
        lvl.voxels.push(VoxelPlacement::new(Int3::new(1, 0, 1), OccupancyType::Bedrock));
        lvl.voxels.push(VoxelPlacement::new(Int3::new(2, 1, 1), OccupancyType::Water));
        lvl.voxels.push(VoxelPlacement::new(Int3::new(2, 0, 1), OccupancyType::Bedrock));
        lvl.voxels.push(VoxelPlacement::new(Int3::new(3, 1, 1), OccupancyType::Bedrock));
        lvl.voxels.push(VoxelPlacement::new(Int3::new(2, 1, 0), OccupancyType::Bedrock));
        lvl.voxels.push(VoxelPlacement::new(Int3::new(2, 1, 2), OccupancyType::Bedrock));
        let mut sim = Simulation::new(&lvl).unwrap();
        sim.tick(InputCommand::HardDrop).unwrap();
        assert_eq!(sim.grid().kind_at(Int3::new(2, 1, 1)), Some(OccupancyType::Ice));
        assert_eq!(sim.ice_timers().len(), 1);
    }

    #[test]
    fn test_drain_counts_and_scores() {
        let mut lvl = level(vec![entry(PieceKind::M1)]);
        lvl.voxels.push(VoxelPlacement::new(Int3::new(0, 0, 0), OccupancyType::Drain));
        lvl.voxels.push(VoxelPlacement::new(Int3::new(1, 0, 0), OccupancyType::Water));
        let mut sim = Simulation::new(&lvl).unwrap();
        let report = sim.tick(InputCommand::Noop).unwrap();
        assert_eq!(report.water_drained, 1);
        assert_eq!(sim.state().water_removed_total, 1);
        assert_eq!(sim.state().score, 25);
    }
}

//! Replay recording from a live session.

use voxfall_core::{Level, SimError, Simulation, TickReport};
use voxfall_types::InputCommand;

use crate::format::{Replay, ReplayMeta};

/// Collects the commands of a live session into a [`Replay`].
///
/// Every command handed to [`ReplayRecorder::tick`] is recorded, including
/// rejected ones, because the replay must reproduce every tick.
#[derive(Debug, Clone)]
pub struct ReplayRecorder {
    meta: ReplayMeta,
    commands: Vec<InputCommand>,
}

impl ReplayRecorder {
    pub fn new(level: &Level, level_hash: impl Into<String>) -> Self {
        Self {
            meta: ReplayMeta::for_level(level.id.clone(), level_hash),
            commands: Vec::new(),
        }
    }

    /// Record a command without ticking anything
    pub fn record(&mut self, command: InputCommand) {
        self.commands.push(command);
    }

    /// Tick `sim` and record the command if the tick went through
    pub fn tick(
        &mut self,
        sim: &mut Simulation,
        command: InputCommand,
    ) -> Result<TickReport, SimError> {
        let report = sim.tick(command)?;
        self.commands.push(command);
        Ok(report)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn finish(self) -> Replay {
        Replay {
            meta: self.meta,
            commands: self.commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ReplayRunner;
    use voxfall_core::{determinism_hash, BagEntry};
    use voxfall_types::{Int3, MaterialId, PieceKind};

    #[test]
    fn test_recorded_session_replays_to_same_hash() {
        let level = Level::new(
            "rec",
            Int3::new(6, 10, 6),
            vec![
                BagEntry::new(PieceKind::T4, MaterialId::default()),
                BagEntry::new(PieceKind::L4, MaterialId::new("HEAVY")),
            ],
        );
        let mut sim = Simulation::new(&level).unwrap();
        let mut recorder = ReplayRecorder::new(&level, "feed");
        for command in [
            InputCommand::MoveRight,
            InputCommand::RotateCw,
            InputCommand::SoftDrop,
            InputCommand::Noop,
            InputCommand::HardDrop,
            InputCommand::Hold,
            InputCommand::RotateWorldLeft,
            InputCommand::Noop,
        ] {
            recorder.tick(&mut sim, command).unwrap();
        }
        assert_eq!(recorder.len(), 8);

        let replay = recorder.finish();
        assert_eq!(replay.meta.level_id, "rec");
        let outcome = ReplayRunner::new(&level, "feed").run(&replay).unwrap();
        assert_eq!(outcome.hash, determinism_hash(&sim));
    }
}

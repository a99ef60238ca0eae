//! Replay execution: validate, then feed every command exactly once.

use log::{debug, info, warn};

use voxfall_core::{determinism_hash, Level, Simulation, SimulationState};

use crate::error::ReplayError;
use crate::format::Replay;

/// Result of running a replay to the end
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    /// `"{version}:{hex}"` determinism hash of the final state
    pub hash: String,
    pub state: SimulationState,
    /// Number of commands fed to the simulation
    pub ticks_run: usize,
}

impl ReplayOutcome {
    /// Compare against an expected hash (case-insensitive hex)
    pub fn verify(&self, expected: &str) -> Result<(), ReplayError> {
        if self.hash.eq_ignore_ascii_case(expected.trim()) {
            info!("determinism hash verified: {}", self.hash);
            Ok(())
        } else {
            Err(ReplayError::HashMismatch {
                expected: expected.trim().to_string(),
                actual: self.hash.clone(),
            })
        }
    }

    /// Line printed by the batch runner
    pub fn hash_line(&self) -> String {
        format!("DeterminismHash: {}", self.hash)
    }
}

/// Runs replays against one level
#[derive(Debug, Clone)]
pub struct ReplayRunner<'a> {
    level: &'a Level,
    level_hash: String,
}

impl<'a> ReplayRunner<'a> {
    /// `level_hash` is the content hash of the level file the level was
    /// loaded from (see [`level_content_hash`](crate::level_content_hash)).
    pub fn new(level: &'a Level, level_hash: impl Into<String>) -> Self {
        Self {
            level,
            level_hash: level_hash.into(),
        }
    }

    pub fn validate(&self, replay: &Replay) -> Result<(), ReplayError> {
        replay
            .meta
            .validate(self.level, &self.level_hash)
            .inspect_err(|err| warn!("replay rejected: {err}"))
    }

    /// Validate, then tick a fresh simulation once per recorded command.
    pub fn run(&self, replay: &Replay) -> Result<ReplayOutcome, ReplayError> {
        self.validate(replay)?;

        let mut sim = Simulation::new(self.level)?;
        for &command in &replay.commands {
            sim.tick(command)?;
        }

        let outcome = ReplayOutcome {
            hash: determinism_hash(&sim),
            state: sim.state().clone(),
            ticks_run: replay.commands.len(),
        };
        debug!(
            "replay of {:?} finished: {} ticks, status {:?}",
            self.level.id, outcome.ticks_run, outcome.state.status
        );
        Ok(outcome)
    }
}

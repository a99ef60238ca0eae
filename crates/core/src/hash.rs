//! Hash module - canonical determinism hash of a simulation
//!
//! The full logical state is written into a byte stream with a fixed
//! encoding and digested with SHA-256:
//!
//! | Value | Encoding |
//! |-------|----------|
//! | integers | little-endian, fixed width |
//! | `bool` | one byte, `0` or `1` |
//! | strings | `u32` byte length, then UTF-8 bytes |
//! | enums | their `code()` as `u8` |
//!
//! Field order:
//!
//! 1. version tag
//! 2. status, loss reason, ticks, pieces locked, score, water removed, rotations,
//!    stabilize charges, gravity, gravity countdown, soft drop
//! 3. PRNG state, pending bag entries
//! 4. grid size
//! 5. every voxel in `x -> y -> z` order: kind, material, anchored
//! 6. ice timers
//! 7. active piece
//! 8. hold slot, hold used
//! 9. stabilize anchor timers
//! 10. lock delay ticks, lock resets, lock pending
//! 11. objectives
//!
//! Bump [`DETERMINISM_HASH_VERSION`] whenever the encoding or the set of
//! fields changes.

use sha2::{Digest, Sha256};

use crate::grid::Grid;
use crate::rng::BagEntry;
use crate::simulation::Simulation;
use crate::types::Int3;

/// Version tag; prefix of every hash string
pub const DETERMINISM_HASH_VERSION: &str = "voxfall-dh-2";

/// Little-endian byte sink
#[derive(Debug, Default)]
pub struct StateWriter {
    buf: Vec<u8>,
}

impl StateWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buf.push(u8::from(v));
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_str(&mut self, s: &str) {
        self.write_len(s.len());
        self.buf.extend_from_slice(s.as_bytes());
    }

    /// Collection length as `u32`
    pub fn write_len(&mut self, len: usize) {
        self.write_u32(len as u32);
    }

    pub fn write_int3(&mut self, v: Int3) {
        self.write_i32(v.x);
        self.write_i32(v.y);
        self.write_i32(v.z);
    }

    fn write_entry(&mut self, entry: &BagEntry) {
        self.write_str(entry.piece.as_str());
        self.write_str(entry.material.as_str());
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Sparse timer maps are keyed by canonical index; write `(x, y, z, remaining)`
fn write_timers(
    out: &mut StateWriter,
    grid: &Grid,
    timers: impl ExactSizeIterator<Item = (u64, u32)>,
) {
    out.write_len(timers.len());
    for (key, remaining) in timers {
        out.write_int3(grid.position_of(key as usize));
        out.write_u32(remaining);
    }
}

/// Serialize the whole logical state in canonical order
pub fn encode_state(sim: &Simulation) -> Vec<u8> {
    let mut out = StateWriter::new();
    let state = sim.state();
    let grid = sim.grid();

    out.write_str(DETERMINISM_HASH_VERSION);

    out.write_u8(state.status.code());
    match state.loss_reason {
        Some(reason) => {
            out.write_bool(true);
            out.write_u8(reason.code());
        }
        None => out.write_bool(false),
    }
    out.write_u64(state.ticks_elapsed);
    out.write_u32(state.pieces_locked);
    out.write_u64(state.score);
    out.write_u32(state.water_removed_total);
    out.write_u32(state.rotations_executed);
    out.write_u32(state.stabilize_charges);
    out.write_u8(state.gravity.code());
    out.write_u32(state.gravity_countdown);
    out.write_bool(state.soft_drop);

    out.write_u64(sim.bag().rng().state());
    let pending = sim.bag().pending();
    out.write_len(pending.len());
    for entry in pending {
        out.write_entry(entry);
    }

    out.write_int3(grid.size());
    for voxel in grid.voxels() {
        out.write_u8(voxel.kind.code());
        out.write_str(voxel.material.as_str());
        out.write_bool(voxel.anchored);
    }

    write_timers(
        &mut out,
        grid,
        sim.ice_timers().iter().map(|(&k, t)| (k, t.remaining)),
    );

    match sim.active() {
        Some(piece) => {
            out.write_bool(true);
            out.write_str(piece.kind.as_str());
            out.write_str(piece.material.as_str());
            out.write_u8(piece.orientation);
            out.write_int3(piece.origin);
        }
        None => out.write_bool(false),
    }

    match sim.hold_piece() {
        Some(entry) => {
            out.write_bool(true);
            out.write_entry(entry);
        }
        None => out.write_bool(false),
    }
    out.write_bool(sim.hold_used());

    write_timers(
        &mut out,
        grid,
        sim.anchor_timers().iter().map(|(&k, t)| (k, t.remaining)),
    );

    out.write_u32(state.lock_delay_ticks);
    out.write_u32(state.lock_resets);
    out.write_bool(state.lock_pending);

    let objectives = sim.objectives();
    out.write_len(objectives.len());
    for progress in objectives {
        out.write_u8(progress.kind.code());
        out.write_u32(progress.current);
        out.write_u32(progress.target);
        out.write_bool(progress.completed);
    }

    out.into_bytes()
}

/// Lowercase hex SHA-256 of `bytes`
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// `"{version}:{hex digest}"` of the simulation state
pub fn determinism_hash(sim: &Simulation) -> String {
    format!(
        "{DETERMINISM_HASH_VERSION}:{}",
        sha256_hex(&encode_state(sim))
    )
}

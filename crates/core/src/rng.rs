//! RNG module - deterministic PCG generator and piece bag
//!
//! [`Pcg32`] is a 64-bit LCG with a permuted 32-bit output (PCG XSH-RR).
//! Every step is exact integer arithmetic so independent implementations
//! reproduce the same stream bit for bit.
//!
//! [`PieceBag`] sequences upcoming pieces either from a fixed script (which
//! cycles) or by shuffling a pool of entries through the generator, one
//! shuffled copy per refill.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::types::{MaterialId, PieceKind};

/// LCG multiplier (Knuth's MMIX constant).
pub const PCG_MULTIPLIER: u64 = 6364136223846793005;

/// LCG increment. Must be odd.
pub const PCG_INCREMENT: u64 = 1442695040888963407;

/// Output space of [`Pcg32::next_u32`].
const OUTPUT_SPAN: u64 = 1 << 32;

/// PCG-style generator with exposed, cloneable state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pcg32 {
    state: u64,
}

impl Pcg32 {
    /// Create a new generator from `seed`.
    ///
    /// Starts at zero, advances, mixes the seed in and advances again so that
    /// small seeds do not produce weak early output.
    pub fn new(seed: u64) -> Self {
        let mut rng = Self { state: 0 };
        rng.step();
        rng.state = rng.state.wrapping_add(seed);
        rng.step();
        rng
    }

    /// Rebuild a generator from a previously exposed state.
    pub fn from_state(state: u64) -> Self {
        Self { state }
    }

    #[inline(always)]
    fn step(&mut self) {
        self.state = self
            .state
            .wrapping_mul(PCG_MULTIPLIER)
            .wrapping_add(PCG_INCREMENT);
    }

    /// Current 64-bit state (hashed by the determinism hasher)
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.step();
        let xorshifted = (((old >> 18) ^ old) >> 27) as u32;
        let rot = (old >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Generate a value in `[0, max)` without modulo bias.
    ///
    /// Panics if `max <= 0`.
    pub fn next_int(&mut self, max: i32) -> i32 {
        assert!(max > 0, "next_int: max must be positive");
        self.next_below(max as u64) as i32
    }

    /// Generate a value in `[min, max)` without modulo bias.
    ///
    /// The range may span the whole `i32` domain; all range math is unsigned.
    /// Panics if `min >= max`.
    pub fn next_int_range(&mut self, min: i32, max: i32) -> i32 {
        assert!(min < max, "next_int_range: min must be less than max");
        let range = (max as i64 - min as i64) as u64;
        let offset = self.next_below(range);
        (min as i64 + offset as i64) as i32
    }

    /// Rejection sampling over the 2^32 output space, `range` in `1..2^32`.
    fn next_below(&mut self, range: u64) -> u64 {
        let threshold = (OUTPUT_SPAN - range) % range;
        loop {
            let r = self.next_u32() as u64;
            if r >= threshold {
                return r % range;
            }
        }
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_int((i + 1) as i32) as usize;
            slice.swap(i, j);
        }
    }
}

/// One upcoming piece: which shape, in which material.
///
/// Also the content of the hold slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BagEntry {
    pub piece: PieceKind,
    #[serde(default)]
    pub material: MaterialId,
}

impl BagEntry {
    pub fn new(piece: PieceKind, material: MaterialId) -> Self {
        Self { piece, material }
    }
}

/// How the bag refills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BagMode {
    /// Entries in scripted order, cycling when exhausted
    Fixed,
    /// One shuffled copy of the pool per refill
    Shuffled,
}

/// Piece sequencer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceBag {
    mode: BagMode,
    /// Script or pool the bag refills from
    source: Vec<BagEntry>,
    /// Entries of the current refill not yet drawn
    pending: VecDeque<BagEntry>,
    /// RNG for shuffling
    rng: Pcg32,
}

impl PieceBag {
    /// Scripted sequence. `entries` must be non-empty.
    pub fn fixed(entries: Vec<BagEntry>, seed: u64) -> Self {
        Self::with_mode(BagMode::Fixed, entries, seed)
    }

    /// Randomized bag over `pool`. `pool` must be non-empty.
    pub fn shuffled(pool: Vec<BagEntry>, seed: u64) -> Self {
        Self::with_mode(BagMode::Shuffled, pool, seed)
    }

    fn with_mode(mode: BagMode, source: Vec<BagEntry>, seed: u64) -> Self {
        Self {
            mode,
            pending: VecDeque::with_capacity(source.len()),
            source,
            rng: Pcg32::new(seed),
        }
    }

    pub fn mode(&self) -> BagMode {
        self.mode
    }

    fn refill(&mut self) {
        let mut batch = self.source.clone();
        if self.mode == BagMode::Shuffled {
            self.rng.shuffle(&mut batch);
        }
        self.pending.extend(batch);
    }

    /// Draw the next entry, refilling when the current batch is exhausted.
    ///
    /// Returns `None` only for a bag built from an empty source.
    pub fn draw(&mut self) -> Option<BagEntry> {
        if self.pending.is_empty() {
            self.refill();
        }
        self.pending.pop_front()
    }

    /// Preview the next `count` entries without consuming them.
    ///
    /// Draws from a clone, so the real stream is untouched.
    pub fn peek(&self, count: usize) -> Vec<BagEntry> {
        let mut preview = self.clone();
        (0..count).map_while(|_| preview.draw()).collect()
    }

    /// Entries of the current batch not yet drawn
    pub fn pending(&self) -> impl ExactSizeIterator<Item = &BagEntry> + '_ {
        self.pending.iter()
    }

    pub fn rng(&self) -> &Pcg32 {
        &self.rng
    }
}

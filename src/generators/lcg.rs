//! Linear congruential generator driving direction choices.
//!
//! Not suitable for anything but visual variety.

/// Seed used when nothing else is configured.
pub const DEFAULT_SEED: u32 = 2;

const MULTIPLIER: u32 = 1_103_515_245;
const INCREMENT: u32 = 12_345;

/// Largest value [`Lcg::next_u32`] returns. Raw results above it are clamped
/// so that the index computed in [`Lcg::choose_index`] stays in range.
pub const MAX_OUTPUT: u32 = 0xffff_fffb;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg {
    seed: u32,
}

impl Default for Lcg {
    fn default() -> Self {
        Lcg::new(DEFAULT_SEED)
    }
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Lcg { seed }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Advances the state by one step: `seed = 1103515245 * seed + 12345 (mod 2^32)`.
    ///
    /// The stored state is never clamped, only the returned value.
    pub fn next_u32(&mut self) -> u32 {
        self.seed = self.seed.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        self.seed.min(MAX_OUTPUT)
    }

    /// Bumps the seed by one. Called once per idle poll while waiting for a
    /// start signal, which is the only entropy source.
    pub fn tick(&mut self) {
        self.seed = self.seed.wrapping_add(1);
    }

    /// Draws a uniform index in `0..count`.
    ///
    /// The draw is `next_u32() / (u32::MAX / count)`, clamped to `count - 1`.
    ///
    /// # Panics
    /// If `count` is zero.
    pub fn choose_index(&mut self, count: usize) -> usize {
        assert!(count > 0, "cannot choose from an empty set");
        let divisor = u32::MAX / count as u32;
        ((self.next_u32() / divisor) as usize).min(count - 1)
    }
}

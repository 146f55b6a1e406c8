//! RNG module - 7-bag random piece generation
//!
//! Implements the "7-bag" randomization algorithm: each bag holds one of each
//! piece (I, O, T, S, Z, J, L), shuffled, and is drawn in order until empty,
//! then refilled with a fresh shuffle. Every 7 consecutive draws from a bag
//! boundary therefore contain each kind exactly once.
//!
//! Also provides a simple seedable LCG so games can be replayed in tests.

use crate::pieces::{create_piece, Piece};
use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Scales by the high bits: the low bits of a power-of-two LCG have
    /// short periods and would bias small ranges.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// 7-bag piece generator with one piece of prepared lookahead
#[derive(Debug, Clone)]
pub struct PieceQueue {
    /// Remaining kinds of the current bag, front = next to draw
    bag: Vec<PieceKind>,
    /// Piece shown in the preview, built from `bag[0]`
    next: Piece,
    rng: SimpleRng,
    seed: u32,
}

impl PieceQueue {
    /// Create a new piece queue with the given seed
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let bag = Self::fresh_bag(&mut rng);
        let next = create_piece(bag[0]);
        Self {
            bag,
            next,
            rng,
            seed,
        }
    }

    fn fresh_bag(rng: &mut SimpleRng) -> Vec<PieceKind> {
        let mut bag = PieceKind::ALL.to_vec();
        rng.shuffle(&mut bag);
        bag
    }

    fn refill_if_empty(&mut self) {
        if self.bag.is_empty() {
            self.bag = Self::fresh_bag(&mut self.rng);
        }
    }

    /// Prepare the preview from the front of the bag
    fn prepare_next(&mut self) {
        self.refill_if_empty();
        self.next = create_piece(self.bag[0]);
    }

    /// Take the prepared piece and prepare the one after it
    pub fn get_next(&mut self) -> Piece {
        self.refill_if_empty();
        self.bag.remove(0);
        let piece = self.next;
        self.prepare_next();
        piece
    }

    /// The prepared next piece; does not consume it
    pub fn peek(&self) -> &Piece {
        &self.next
    }

    /// Discard the current bag and preview, starting a fresh shuffle
    pub fn reset(&mut self) {
        self.bag = Self::fresh_bag(&mut self.rng);
        self.prepare_next();
    }

    /// Restart the sequence from a new seed
    pub fn reseed(&mut self, seed: u32) {
        *self = Self::new(seed);
    }

    /// Kinds still in the current bag (including the previewed one)
    pub fn bag(&self) -> &[PieceKind] {
        &self.bag
    }

    /// Seed this queue was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);
        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_next_range_stays_in_bounds() {
        let mut rng = SimpleRng::new(7);
        for max in 1..10 {
            for _ in 0..200 {
                assert!(rng.next_range(max) < max);
            }
        }
    }

    #[test]
    fn test_fresh_queue_has_full_bag() {
        let queue = PieceQueue::new(1);
        assert_eq!(queue.bag().len(), 7);
        assert_eq!(queue.peek().kind, queue.bag()[0]);
    }

    #[test]
    fn test_bag_refills_after_seven_draws() {
        let mut queue = PieceQueue::new(3);
        for _ in 0..7 {
            queue.get_next();
        }
        // The eighth draw's bag was already refilled to prepare the preview.
        assert_eq!(queue.bag().len(), 7);
    }

    #[test]
    fn test_bag_never_holds_duplicates() {
        let mut queue = PieceQueue::new(99);
        for _ in 0..50 {
            let mut seen = queue.bag().to_vec();
            seen.sort_by_key(|k| k.as_str());
            seen.dedup();
            assert_eq!(seen.len(), queue.bag().len());
            queue.get_next();
        }
    }

    #[test]
    fn test_reseed_replays_sequence() {
        let mut a = PieceQueue::new(42);
        let first: Vec<_> = (0..14).map(|_| a.get_next().kind).collect();
        a.reseed(42);
        let second: Vec<_> = (0..14).map(|_| a.get_next().kind).collect();
        assert_eq!(first, second);
    }
}

//! 7-bag piece queue tests

use std::collections::HashMap;

use blockdrop::core::PieceQueue;
use blockdrop::types::PieceKind;

#[test]
fn test_first_seven_draws_are_a_permutation() {
    for seed in [1, 2, 42, 12345, u32::MAX] {
        let mut queue = PieceQueue::new(seed);
        let mut kinds: Vec<_> = (0..7).map(|_| queue.get_next().kind).collect();
        kinds.sort_by_key(|k| k.as_str());
        let mut all = PieceKind::ALL.to_vec();
        all.sort_by_key(|k| k.as_str());
        assert_eq!(kinds, all, "seed {seed}");
    }
}

#[test]
fn test_every_bag_boundary_is_a_permutation() {
    let mut queue = PieceQueue::new(777);
    for _ in 0..20 {
        let mut seen: Vec<_> = (0..7).map(|_| queue.get_next().kind).collect();
        seen.sort_by_key(|k| k.as_str());
        seen.dedup();
        assert_eq!(seen.len(), 7);
    }
}

#[test]
fn test_seven_hundred_draws_are_balanced() {
    let mut queue = PieceQueue::new(2024);
    let mut counts: HashMap<PieceKind, u32> = HashMap::new();
    for _ in 0..700 {
        *counts.entry(queue.get_next().kind).or_default() += 1;
    }
    for kind in PieceKind::ALL {
        let n = counts.get(&kind).copied().unwrap_or(0);
        assert!((80..=120).contains(&n), "{kind:?} drawn {n} times");
    }
}

#[test]
fn test_peek_is_idempotent_and_matches_next_draw() {
    let mut queue = PieceQueue::new(5);
    for _ in 0..30 {
        let peeked = *queue.peek();
        assert_eq!(*queue.peek(), peeked);
        assert_eq!(queue.get_next(), peeked);
    }
}

#[test]
fn test_reset_starts_a_fresh_bag() {
    let mut queue = PieceQueue::new(9);
    queue.get_next();
    queue.get_next();
    queue.reset();
    assert_eq!(queue.bag().len(), 7);
    assert_eq!(queue.peek().kind, queue.bag()[0]);
}

#[test]
fn test_same_seed_same_sequence() {
    let mut a = PieceQueue::new(31337);
    let mut b = PieceQueue::new(31337);
    for _ in 0..50 {
        assert_eq!(a.get_next().kind, b.get_next().kind);
    }
}

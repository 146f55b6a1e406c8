//! Score, level and status tests

use blockdrop::core::GameState;
use blockdrop::types::{DropBonus, Status};

#[test]
fn test_line_scores_at_level_one() {
    let mut state = GameState::new();
    state.add_score(1, DropBonus::None);
    assert_eq!(state.score(), 40);

    let mut state = GameState::new();
    state.add_score(4, DropBonus::None);
    assert_eq!(state.score(), 1200);

    let mut state = GameState::new();
    state.add_score(0, DropBonus::Hard);
    assert_eq!(state.score(), 2);
}

#[test]
fn test_level_follows_lines_and_never_drops() {
    let mut state = GameState::new();
    for _ in 0..3 {
        state.add_score(4, DropBonus::None);
    }
    assert_eq!(state.lines(), 12);
    assert_eq!(state.level(), 2);

    state.add_score(0, DropBonus::None);
    assert_eq!(state.level(), 2);

    // Score for later clears uses the new level.
    let before = state.score();
    state.add_score(1, DropBonus::Soft);
    assert_eq!(state.score(), before + 40 * 2 + 1);
}

#[test]
fn test_fall_interval_by_level() {
    let mut state = GameState::new();
    assert_eq!(state.fall_interval_ms(), 1000);

    // 90 lines -> level 10
    for _ in 0..90 {
        state.add_score(1, DropBonus::None);
    }
    assert_eq!(state.level(), 10);
    assert_eq!(state.fall_interval_ms(), 550);

    for _ in 0..90 {
        state.add_score(1, DropBonus::None);
    }
    assert_eq!(state.level(), 19);
    assert_eq!(state.fall_interval_ms(), 100);

    for _ in 0..810 {
        state.add_score(1, DropBonus::None);
    }
    assert_eq!(state.level(), 100);
    assert_eq!(state.fall_interval_ms(), 100);
}

#[test]
fn test_status_transitions() {
    let mut state = GameState::new();
    assert_eq!(state.status(), Status::Ready);
    state.start();
    assert!(state.is_playing());
    assert_eq!(state.toggle_pause(), Status::Paused);
    assert_eq!(state.toggle_pause(), Status::Playing);

    state.set_status_named("GAME_OVER");
    assert_eq!(state.status(), Status::GameOver);
    state.set_status_named("WON");
    assert_eq!(state.status(), Status::GameOver);

    state.add_score(2, DropBonus::None);
    state.reset();
    assert_eq!(state, GameState::new());
}

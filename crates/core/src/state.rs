//! Game state module - score, level, lines and play status
//!
//! Scoring follows the classic table (40/100/300/1200 per 1-4 lines) scaled
//! by the current level, with flat soft/hard drop bonuses. Level starts at 1
//! and is recomputed as `1 + lines / 10` on every clear, never decreasing.

use serde::Serialize;

use crate::types::{
    DropBonus, Status, BASE_FALL_MS, FALL_STEP_MS, LINES_PER_LEVEL, LINE_SCORES, MIN_FALL_MS,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    score: u32,
    level: u32,
    lines: u32,
    status: Status,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            lines: 0,
            status: Status::Ready,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status == Status::Playing
    }

    /// Apply the score for one lock (or one drop step).
    ///
    /// `lines_cleared` above 4 scores nothing but still counts toward lines.
    pub fn add_score(&mut self, lines_cleared: u32, bonus: DropBonus) {
        let base = LINE_SCORES
            .get(lines_cleared as usize)
            .copied()
            .unwrap_or(0);
        self.score = self
            .score
            .saturating_add(base.saturating_mul(self.level))
            .saturating_add(bonus.points());

        if lines_cleared > 0 {
            self.lines = self.lines.saturating_add(lines_cleared);
            self.level = self.level.max(1 + self.lines / LINES_PER_LEVEL);
        }
    }

    /// Gravity period for the current level in milliseconds
    pub fn fall_interval_ms(&self) -> u32 {
        let reduction = (self.level.saturating_sub(1)).saturating_mul(FALL_STEP_MS);
        BASE_FALL_MS.saturating_sub(reduction).max(MIN_FALL_MS)
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Set the status by name; unknown names leave the status unchanged.
    pub fn set_status_named(&mut self, name: &str) {
        if let Some(status) = Status::from_str(name) {
            self.status = status;
        }
    }

    /// Ready -> Playing. Any other status is left alone.
    pub fn start(&mut self) {
        if self.status == Status::Ready {
            self.status = Status::Playing;
        }
    }

    /// Playing <-> Paused. Returns the status after the call.
    pub fn toggle_pause(&mut self) -> Status {
        self.status = match self.status {
            Status::Playing => Status::Paused,
            Status::Paused => Status::Playing,
            other => other,
        };
        self.status
    }

    /// Back to a fresh Ready session
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new();
        assert_eq!(state.score(), 0);
        assert_eq!(state.level(), 1);
        assert_eq!(state.lines(), 0);
        assert_eq!(state.status(), Status::Ready);
    }

    #[test]
    fn test_line_scores_scale_with_level() {
        let mut state = GameState::new();
        state.level = 3;
        state.add_score(2, DropBonus::None);
        assert_eq!(state.score(), 300);
    }

    #[test]
    fn test_drop_bonus_is_not_level_scaled() {
        let mut state = GameState::new();
        state.level = 7;
        state.add_score(0, DropBonus::Soft);
        state.add_score(0, DropBonus::Hard);
        assert_eq!(state.score(), 3);
        assert_eq!(state.lines(), 0);
    }

    #[test]
    fn test_toggle_pause_only_between_playing_and_paused() {
        let mut state = GameState::new();
        assert_eq!(state.toggle_pause(), Status::Ready);
        state.start();
        assert_eq!(state.toggle_pause(), Status::Paused);
        assert_eq!(state.toggle_pause(), Status::Playing);
        state.set_status(Status::GameOver);
        assert_eq!(state.toggle_pause(), Status::GameOver);
    }

    #[test]
    fn test_unknown_status_name_is_ignored() {
        let mut state = GameState::new();
        state.set_status_named("PLAYING");
        assert_eq!(state.status(), Status::Playing);
        state.set_status_named("EXPLODED");
        assert_eq!(state.status(), Status::Playing);
    }
}

//! DAS/ARR input timer.
//!
//! Turns raw key edges into discrete actions. A press emits its action at
//! once; holding a movement or soft-drop key repeats it after the DAS delay
//! at a fixed ARR cadence. Repeat times are scheduled from the press
//! timestamp rather than from whenever `update` happens to be polled, so
//! uneven frame times never accumulate drift. A key fires at most once per
//! `update`; slots missed while the caller was not polling are skipped.
//!
//! All timestamps are caller-supplied milliseconds; the timer never reads a
//! clock itself.

use arrayvec::ArrayVec;

use crate::types::{GameAction, Key, ARR_MS, DAS_MS};

/// Upper bound on actions emitted by a single `update`
pub const MAX_ACTIONS_PER_UPDATE: usize = 32;

const KEY_COUNT: usize = Key::ALL.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeldKey {
    key: Key,
    pressed_at: u64,
    next_repeat_at: u64,
}

/// Tracks held keys for DAS/ARR handling.
#[derive(Debug, Clone)]
pub struct InputTimer {
    held: ArrayVec<HeldKey, KEY_COUNT>,
    das_ms: u64,
    arr_ms: u64,
}

impl InputTimer {
    pub fn new() -> Self {
        Self::with_config(DAS_MS, ARR_MS)
    }

    pub fn with_config(das_ms: u64, arr_ms: u64) -> Self {
        Self {
            held: ArrayVec::new(),
            das_ms,
            arr_ms: arr_ms.max(1),
        }
    }

    pub fn das_ms(&self) -> u64 {
        self.das_ms
    }

    pub fn arr_ms(&self) -> u64 {
        self.arr_ms
    }

    /// Handle a key-down edge at `now_ms`.
    ///
    /// Returns the action to run immediately, or `None` if the key is already
    /// held (OS auto-repeat keydowns are swallowed).
    pub fn key_down(&mut self, key: Key, now_ms: u64) -> Option<GameAction> {
        if self.is_held(key) {
            return None;
        }
        self.held.push(HeldKey {
            key,
            pressed_at: now_ms,
            next_repeat_at: now_ms + self.das_ms + self.arr_ms,
        });
        Some(key.action())
    }

    /// Handle a key-up edge. The next press starts the delay from zero.
    pub fn key_up(&mut self, key: Key) {
        self.held.retain(|h| h.key != key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.iter().any(|h| h.key == key)
    }

    /// Press timestamp of a held key
    pub fn pressed_at(&self, key: Key) -> Option<u64> {
        self.held.iter().find(|h| h.key == key).map(|h| h.pressed_at)
    }

    /// Emit one repeat for every held key whose next slot has come due.
    ///
    /// Keys are reported in press order. After firing, a key's next slot is
    /// the first `press + DAS + k * ARR` strictly after `now_ms`.
    pub fn update(&mut self, now_ms: u64) -> ArrayVec<GameAction, MAX_ACTIONS_PER_UPDATE> {
        let mut actions = ArrayVec::new();
        let (das, arr) = (self.das_ms, self.arr_ms);

        for held in self.held.iter_mut() {
            let action = held.key.action();
            if !action.is_repeatable() || now_ms < held.next_repeat_at {
                continue;
            }
            let _ = actions.try_push(action);
            let base = held.pressed_at + das;
            held.next_repeat_at = base + ((now_ms - base) / arr + 1) * arr;
        }

        actions
    }

    /// Forget every held key
    pub fn reset(&mut self) {
        self.held.clear();
    }
}

impl Default for InputTimer {
    fn default() -> Self {
        Self::new()
    }
}

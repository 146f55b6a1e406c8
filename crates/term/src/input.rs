//! Terminal key events as an engine `InputSource`.
//!
//! Supports terminals that do not emit key release events by releasing a
//! held key once it has gone quiet for a short timeout. As soon as a real
//! release event is seen the timeout is switched off.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use anyhow::Result;
use blockdrop_input::{is_restart, map_key_code, should_quit};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

use crate::engine::InputSource;
use crate::types::{Key, KeyEdge};

// Short enough that a single tap never reaches DAS.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u64 = 150;

const KEY_COUNT: usize = Key::ALL.len();

pub struct TermInput {
    edges: VecDeque<KeyEdge>,
    /// Last press/repeat time of each held key, indexed like `Key::ALL`
    held: [Option<Instant>; KEY_COUNT],
    release_timeout: Duration,
    saw_release: bool,
    quit: bool,
    restart: bool,
}

impl TermInput {
    pub fn new() -> Self {
        Self {
            edges: VecDeque::new(),
            held: [None; KEY_COUNT],
            release_timeout: Duration::from_millis(DEFAULT_KEY_RELEASE_TIMEOUT_MS),
            saw_release: false,
            quit: false,
            restart: false,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.release_timeout = Duration::from_millis(timeout_ms);
        self
    }

    /// Read every event already waiting, without blocking.
    pub fn pump(&mut self) -> Result<()> {
        while event::poll(Duration::ZERO)? {
            let ev = event::read()?;
            self.handle_event(ev, Instant::now());
        }
        self.expire_stale(Instant::now());
        Ok(())
    }

    /// Block until an event arrives or `timeout` passes.
    pub fn wait(&mut self, timeout: Duration) -> Result<()> {
        event::poll(timeout)?;
        Ok(())
    }

    pub fn handle_event(&mut self, ev: Event, now: Instant) {
        if let Event::Key(key) = ev {
            self.handle_key(key, now);
        }
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        match key.kind {
            KeyEventKind::Press => {
                if should_quit(key) {
                    self.quit = true;
                    return;
                }
                if is_restart(key) {
                    self.restart = true;
                    return;
                }
                if let Some(k) = map_key_code(key.code) {
                    let slot = &mut self.held[key_index(k)];
                    if slot.is_none() {
                        self.edges.push_back(KeyEdge::Down(k));
                    }
                    *slot = Some(now);
                }
            }
            KeyEventKind::Repeat => {
                if let Some(k) = map_key_code(key.code) {
                    if let Some(seen) = self.held[key_index(k)].as_mut() {
                        *seen = now;
                    }
                }
            }
            KeyEventKind::Release => {
                self.saw_release = true;
                if let Some(k) = map_key_code(key.code) {
                    if self.held[key_index(k)].take().is_some() {
                        self.edges.push_back(KeyEdge::Up(k));
                    }
                }
            }
        }
    }

    /// Release keys that went quiet, on terminals without release events.
    pub fn expire_stale(&mut self, now: Instant) {
        if self.saw_release {
            return;
        }
        for (i, slot) in self.held.iter_mut().enumerate() {
            if let Some(seen) = *slot {
                if now.saturating_duration_since(seen) > self.release_timeout {
                    *slot = None;
                    self.edges.push_back(KeyEdge::Up(Key::ALL[i]));
                }
            }
        }
    }

    pub fn take_quit(&mut self) -> bool {
        std::mem::take(&mut self.quit)
    }

    pub fn take_restart(&mut self) -> bool {
        std::mem::take(&mut self.restart)
    }
}

impl Default for TermInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for TermInput {
    fn poll_edge(&mut self) -> Option<KeyEdge> {
        self.edges.pop_front()
    }
}

fn key_index(key: Key) -> usize {
    Key::ALL.iter().position(|k| *k == key).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn drain(input: &mut TermInput) -> Vec<KeyEdge> {
        std::iter::from_fn(|| input.poll_edge()).collect()
    }

    #[test]
    fn press_and_release_produce_edges() {
        let mut input = TermInput::new();
        let t0 = Instant::now();
        input.handle_event(key(KeyCode::Left, KeyEventKind::Press), t0);
        input.handle_event(key(KeyCode::Left, KeyEventKind::Release), t0);
        assert_eq!(
            drain(&mut input),
            vec![KeyEdge::Down(Key::Left), KeyEdge::Up(Key::Left)]
        );
    }

    #[test]
    fn terminal_autorepeat_does_not_repress() {
        let mut input = TermInput::new();
        let t0 = Instant::now();
        input.handle_event(key(KeyCode::Right, KeyEventKind::Press), t0);
        input.handle_event(key(KeyCode::Right, KeyEventKind::Press), t0);
        input.handle_event(key(KeyCode::Right, KeyEventKind::Repeat), t0);
        assert_eq!(drain(&mut input), vec![KeyEdge::Down(Key::Right)]);
    }

    #[test]
    fn auto_release_after_timeout_without_release_events() {
        let mut input = TermInput::new().with_key_release_timeout_ms(50);
        let t0 = Instant::now();
        input.handle_event(key(KeyCode::Down, KeyEventKind::Press), t0);
        input.expire_stale(t0 + Duration::from_millis(40));
        assert_eq!(drain(&mut input), vec![KeyEdge::Down(Key::Down)]);

        input.expire_stale(t0 + Duration::from_millis(60));
        assert_eq!(drain(&mut input), vec![KeyEdge::Up(Key::Down)]);
    }

    #[test]
    fn release_events_disable_timeout() {
        let mut input = TermInput::new().with_key_release_timeout_ms(50);
        let t0 = Instant::now();
        input.handle_event(key(KeyCode::Up, KeyEventKind::Press), t0);
        input.handle_event(key(KeyCode::Up, KeyEventKind::Release), t0);
        input.handle_event(key(KeyCode::Left, KeyEventKind::Press), t0);
        drain(&mut input);

        input.expire_stale(t0 + Duration::from_secs(5));
        assert!(drain(&mut input).is_empty());
    }

    #[test]
    fn quit_and_restart_are_flags() {
        let mut input = TermInput::new();
        let t0 = Instant::now();
        input.handle_event(key(KeyCode::Char('r'), KeyEventKind::Press), t0);
        input.handle_event(key(KeyCode::Char('q'), KeyEventKind::Press), t0);
        assert!(input.take_restart());
        assert!(!input.take_restart());
        assert!(input.take_quit());
        assert!(drain(&mut input).is_empty());
    }
}

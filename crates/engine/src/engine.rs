//! Game engine - owns the simulation and drives the collaborators.
//!
//! One call to [`GameEngine::tick`] per frame does everything: drain key
//! edges, advance the DAS/ARR timer, apply gravity, sequence lock / line
//! clear / spawn, and redraw. Time is always supplied by the caller in
//! milliseconds, so a test can step the engine through any schedule.
//!
//! Line clears suspend the active-piece simulation (there is no active piece
//! while one is pending) without blocking the frame loop: the engine keeps
//! rendering and reading input until the renderer's [`LineClearHandle`]
//! completes, then scores and spawns.

use std::time::{SystemTime, UNIX_EPOCH};

use blockdrop_input::InputTimer;

use crate::config::Settings;
use crate::core::{move_piece, rotate, Board, GameSnapshot, GameState, Piece, PieceQueue};
use crate::input::InputSource;
use crate::renderer::{LineClearHandle, LineClearRequest, Renderer};
use crate::types::{DropBonus, GameAction, KeyEdge, Status};

/// A line clear waiting for its animation.
#[derive(Debug)]
struct PendingClear {
    lines: u32,
    episode: u64,
    handle: LineClearHandle,
}

pub struct GameEngine<R: Renderer, I: InputSource> {
    board: Board,
    queue: PieceQueue,
    state: GameState,
    timer: InputTimer,
    active: Option<Piece>,
    pending: Option<PendingClear>,
    renderer: R,
    input: I,
    settings: Settings,
    /// Incarnation counter, bumped on restart
    episode: u64,
    last_time_ms: Option<u64>,
    fall_acc_ms: u64,
}

impl<R: Renderer, I: InputSource> GameEngine<R, I> {
    pub fn new(renderer: R, input: I, settings: Settings) -> Self {
        let settings = settings.sanitized();
        let seed = settings.seed.unwrap_or_else(clock_seed);
        Self {
            board: Board::new(),
            queue: PieceQueue::new(seed),
            state: GameState::new(),
            timer: InputTimer::with_config(settings.das_ms, settings.arr_ms),
            active: None,
            pending: None,
            renderer,
            input,
            settings,
            episode: 0,
            last_time_ms: None,
            fall_acc_ms: 0,
        }
    }

    /// Begin a fresh session: clear everything, spawn, draw.
    pub fn start(&mut self, now_ms: u64) {
        let seed = self.settings.seed.unwrap_or_else(clock_seed);
        self.board.reset();
        self.queue.reseed(seed);
        self.state.reset();
        self.timer.reset();
        self.active = None;
        self.pending = None;
        self.last_time_ms = Some(now_ms);
        self.fall_acc_ms = 0;

        self.renderer.hide_game_over();
        self.renderer.hide_pause();

        self.state.start();
        self.spawn_piece();
        self.render();
    }

    /// Abandon the current session and start a new one.
    ///
    /// Any outstanding line-clear handle is dropped, so a completion signal
    /// issued for the old session is never applied to the new one.
    pub fn restart(&mut self, now_ms: u64) {
        self.episode += 1;
        self.start(now_ms);
    }

    /// Advance the simulation to `now_ms` and render a frame.
    pub fn tick(&mut self, now_ms: u64) {
        let elapsed = self
            .last_time_ms
            .map_or(0, |last| now_ms.saturating_sub(last));
        self.last_time_ms = Some(now_ms);

        self.drain_input(now_ms);

        if self.state.is_playing() {
            self.poll_line_clear();
        }
        if self.state.is_playing() && self.pending.is_none() {
            for action in self.timer.update(now_ms) {
                self.handle_input(action);
            }
            self.apply_gravity(elapsed);
        }

        self.render();
    }

    fn drain_input(&mut self, now_ms: u64) {
        while let Some(edge) = self.input.poll_edge() {
            match edge {
                KeyEdge::Down(key) => {
                    if let Some(action) = self.timer.key_down(key, now_ms) {
                        self.handle_input(action);
                    }
                }
                KeyEdge::Up(key) => self.timer.key_up(key),
            }
        }
    }

    fn apply_gravity(&mut self, elapsed_ms: u64) {
        if self.active.is_none() || !self.state.is_playing() {
            return;
        }
        self.fall_acc_ms += elapsed_ms;
        if self.fall_acc_ms >= u64::from(self.state.fall_interval_ms()) {
            if !self.shift(0, 1) {
                self.lock_active();
            }
            self.fall_acc_ms = 0;
        }
    }

    /// Apply one action. Returns whether it changed anything.
    ///
    /// Everything except `Pause` is ignored unless the game is playing.
    pub fn handle_input(&mut self, action: GameAction) -> bool {
        if action == GameAction::Pause {
            return self.toggle_pause();
        }
        if !self.state.is_playing() {
            return false;
        }
        match action {
            GameAction::MoveLeft => self.shift(-1, 0),
            GameAction::MoveRight => self.shift(1, 0),
            GameAction::SoftDrop => {
                let moved = self.shift(0, 1);
                if moved {
                    self.state.add_score(0, DropBonus::Soft);
                }
                moved
            }
            GameAction::HardDrop => self.hard_drop(),
            GameAction::Rotate => self.rotate_active(),
            GameAction::Pause => false,
        }
    }

    /// Apply an action by name; unknown names are ignored.
    pub fn handle_input_named(&mut self, name: &str) -> bool {
        match GameAction::from_str(name) {
            Some(action) => self.handle_input(action),
            None => false,
        }
    }

    fn toggle_pause(&mut self) -> bool {
        match self.state.status() {
            Status::Playing => {
                self.state.set_status(Status::Paused);
                self.renderer.show_pause();
                true
            }
            Status::Paused => {
                self.state.set_status(Status::Playing);
                self.renderer.hide_pause();
                self.fall_acc_ms = 0;
                true
            }
            Status::Ready | Status::GameOver => false,
        }
    }

    fn shift(&mut self, dx: i8, dy: i8) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        let board = &self.board;
        match move_piece(&piece, dx, dy, |s, x, y| board.check_collision(s, x, y)) {
            Ok(moved) => {
                self.active = Some(moved);
                true
            }
            Err(_) => false,
        }
    }

    fn rotate_active(&mut self) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        let board = &self.board;
        match rotate(&piece, |s, x, y| board.check_collision(s, x, y)) {
            Ok(rotated) => {
                self.active = Some(rotated);
                true
            }
            Err(_) => false,
        }
    }

    fn hard_drop(&mut self) -> bool {
        if self.active.is_none() {
            return false;
        }
        while self.shift(0, 1) {
            self.state.add_score(0, DropBonus::Hard);
        }
        self.lock_active();
        self.fall_acc_ms = 0;
        true
    }

    /// Write the active piece into the board and clear any full rows.
    fn lock_active(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };
        self.board
            .lock_piece(&piece.shape(), piece.x, piece.y, piece.color);

        let cleared = self.board.clear_lines();
        if cleared.is_empty() {
            self.spawn_piece();
            return;
        }

        let request = LineClearRequest {
            episode: self.episode,
            count: cleared.count(),
            rows: cleared.rows,
        };
        let handle = self.renderer.animate_line_clear(&request);
        self.pending = Some(PendingClear {
            lines: request.count as u32,
            episode: self.episode,
            handle,
        });
        self.poll_line_clear();
    }

    fn poll_line_clear(&mut self) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        if pending.episode != self.episode {
            self.pending = None;
            return;
        }
        if !pending.handle.poll_done() {
            return;
        }
        let lines = pending.lines;
        self.pending = None;
        self.state.add_score(lines, DropBonus::None);
        self.spawn_piece();
    }

    /// Draw the next piece; a blocked spawn ends the game.
    fn spawn_piece(&mut self) -> bool {
        let piece = self.queue.get_next();
        if self.board.check_collision(&piece.shape(), piece.x, piece.y) {
            self.active = None;
            self.state.set_status(Status::GameOver);
            self.timer.reset();
            self.renderer.show_game_over(self.state.score());
            return false;
        }
        self.active = Some(piece);
        self.fall_acc_ms = 0;
        true
    }

    fn render(&mut self) {
        self.renderer.draw_board(&self.board, self.active.as_ref());
        self.renderer.draw_ui(&self.state);
        self.renderer.draw_next_piece(Some(self.queue.peek()));
        self.renderer.present();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> Status {
        self.state.status()
    }

    pub fn next_piece(&self) -> &Piece {
        self.queue.peek()
    }

    /// True while a line-clear animation holds up the next spawn
    pub fn is_clearing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn episode(&self) -> u64 {
        self.episode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Self-contained copy of the current frame
    pub fn snapshot(&self) -> GameSnapshot {
        let mut snap = GameSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.clear();
        out.capture_board(&self.board, self.active.as_ref());
        out.capture_state(&self.state);
        out.next = Some(self.queue.peek().kind);
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn input_source_mut(&mut self) -> &mut I {
        &mut self.input
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub(crate) fn set_active(&mut self, piece: Option<Piece>) {
        self.active = piece;
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

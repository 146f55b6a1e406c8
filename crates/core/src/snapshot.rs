//! Read-only, self-contained copy of everything a frame needs.
//!
//! Renderers fill one of these from the engine's draw calls and lay it out
//! afterwards, so layout never reads live engine state mid-tick.

use serde::Serialize;

use crate::board::Board;
use crate::pieces::Piece;
use crate::state::GameState;
use crate::types::{Cell, PieceKind, Status, BOARD_HEIGHT, BOARD_WIDTH};

pub type Grid = [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: u8,
    pub x: i8,
    pub y: i8,
}

impl From<Piece> for ActiveSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub board: Grid,
    pub active: Option<ActiveSnapshot>,
    /// Landing row of the active piece's origin
    pub ghost_y: Option<i8>,
    pub next: Option<PieceKind>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub status: Status,
    /// Pre-removal rows of an in-flight line-clear animation
    pub clearing_rows: Vec<u8>,
    /// Blink phase for `clearing_rows`
    pub clear_flash_on: bool,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.board = [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        self.active = None;
        self.ghost_y = None;
        self.next = None;
        self.score = 0;
        self.level = 1;
        self.lines = 0;
        self.status = Status::Ready;
        self.clearing_rows.clear();
        self.clear_flash_on = false;
    }

    /// Copy the grid and active piece, computing the ghost landing row.
    pub fn capture_board(&mut self, board: &Board, active: Option<&Piece>) {
        for (y, row) in self.board.iter_mut().enumerate() {
            if let Some(src) = board.row(y) {
                row.copy_from_slice(src);
            }
        }
        self.active = active.copied().map(ActiveSnapshot::from);
        self.ghost_y = active.map(|piece| ghost_y(board, piece));
    }

    pub fn capture_state(&mut self, state: &GameState) {
        self.score = state.score();
        self.level = state.level();
        self.lines = state.lines();
        self.status = state.status();
    }

    pub fn playable(&self) -> bool {
        self.status == Status::Playing
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            board: [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost_y: None,
            next: None,
            score: 0,
            level: 1,
            lines: 0,
            status: Status::Ready,
            clearing_rows: Vec::new(),
            clear_flash_on: false,
        };
        s.clear();
        s
    }
}

/// Lowest origin row the piece can fall to from where it is
pub fn ghost_y(board: &Board, piece: &Piece) -> i8 {
    let shape = piece.shape();
    let mut y = piece.y;
    while !board.check_collision(&shape, piece.x, y + 1) {
        y += 1;
    }
    y
}

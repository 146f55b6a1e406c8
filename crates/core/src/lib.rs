//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the simulation rules with **zero dependencies** on
//! rendering, terminals or wall-clock time:
//!
//! - [`board`]: 10x20 grid with collision detection, locking and line clearing
//! - [`pieces`]: constant rotation tables, piece creation, move/rotate proposals
//! - [`rng`]: seedable LCG and the 7-bag [`PieceQueue`] with one-piece lookahead
//! - [`state`]: score, level, lines and the Ready/Playing/Paused/GameOver machine
//! - [`snapshot`]: self-contained frame data for renderers
//!
//! # Example
//!
//! ```
//! use blockdrop_core::{create_piece, move_piece, Board, GameState};
//! use blockdrop_core::types::{DropBonus, PieceKind};
//!
//! let board = Board::new();
//! let piece = create_piece(PieceKind::T);
//! let moved = move_piece(&piece, 0, 1, |s, x, y| board.check_collision(s, x, y)).unwrap();
//! assert_eq!(moved.y, 1);
//!
//! let mut state = GameState::new();
//! state.add_score(1, DropBonus::None);
//! assert_eq!(state.score(), 40);
//! ```

pub mod board;
pub mod pieces;
pub mod rng;
pub mod snapshot;
pub mod state;

pub use blockdrop_types as types;

pub use board::{Board, ClearedLines, ClearedRow};
pub use pieces::{
    create_piece, get_shape, move_piece, rotate, rotation_states, shape_coords, Offset, Piece,
    Rejected, Shape,
};
pub use rng::{PieceQueue, SimpleRng};
pub use snapshot::{ghost_y, ActiveSnapshot, GameSnapshot, Grid};
pub use state::GameState;

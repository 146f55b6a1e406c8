//! Pieces module - tetromino shapes, spawning, movement and rotation
//!
//! Rotation geometry is constant data: each kind owns an ordered list of
//! rotation states and rotating simply advances to the next state. There is
//! no wall-kick search; a rotation whose target state collides is rejected.
//!
//! Movement and rotation are proposals: they take a piece by reference and
//! return either the committed new piece or [`Rejected`], so a caller never
//! observes a half-applied move.

use crate::types::{ColorId, PieceKind, SPAWN_X, SPAWN_Y};

/// Offset of a single mino relative to piece origin (dx, dy)
pub type Offset = (i8, i8);

/// Shape of one rotation state - 4 mino offsets from piece origin
pub type Shape = [Offset; 4];

const I_STATES: [Shape; 2] = [
    [(0, 1), (1, 1), (2, 1), (3, 1)],
    [(2, 0), (2, 1), (2, 2), (2, 3)],
];

const O_STATES: [Shape; 1] = [[(0, 0), (1, 0), (0, 1), (1, 1)]];

const T_STATES: [Shape; 4] = [
    [(1, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (1, 1), (2, 1), (1, 2)],
    [(0, 1), (1, 1), (2, 1), (1, 2)],
    [(1, 0), (0, 1), (1, 1), (1, 2)],
];

const S_STATES: [Shape; 2] = [
    [(1, 0), (2, 0), (0, 1), (1, 1)],
    [(1, 0), (1, 1), (2, 1), (2, 2)],
];

const Z_STATES: [Shape; 2] = [
    [(0, 0), (1, 0), (1, 1), (2, 1)],
    [(2, 0), (1, 1), (2, 1), (1, 2)],
];

const J_STATES: [Shape; 4] = [
    [(0, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (2, 0), (1, 1), (1, 2)],
    [(0, 1), (1, 1), (2, 1), (2, 2)],
    [(1, 0), (1, 1), (0, 2), (1, 2)],
];

const L_STATES: [Shape; 4] = [
    [(2, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (1, 1), (1, 2), (2, 2)],
    [(0, 1), (1, 1), (2, 1), (0, 2)],
    [(0, 0), (1, 0), (1, 1), (1, 2)],
];

/// Ordered rotation states for a piece kind
pub fn rotation_states(kind: PieceKind) -> &'static [Shape] {
    match kind {
        PieceKind::I => &I_STATES,
        PieceKind::O => &O_STATES,
        PieceKind::T => &T_STATES,
        PieceKind::S => &S_STATES,
        PieceKind::Z => &Z_STATES,
        PieceKind::J => &J_STATES,
        PieceKind::L => &L_STATES,
    }
}

/// Get the shape for a piece kind and rotation index (wrapped into range)
pub fn get_shape(kind: PieceKind, rotation: u8) -> Shape {
    let states = rotation_states(kind);
    states[rotation as usize % states.len()]
}

/// A move or rotation proposal that would collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejected;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    /// Index into [`rotation_states`]; always `< state_count()`
    pub rotation: u8,
    pub x: i8,
    pub y: i8,
    pub color: ColorId,
}

/// Create a new piece at the spawn position in its first rotation state
pub fn create_piece(kind: PieceKind) -> Piece {
    Piece {
        kind,
        rotation: 0,
        x: SPAWN_X,
        y: SPAWN_Y,
        color: kind.color(),
    }
}

/// Relative offsets of the filled cells of the piece's current state
pub fn shape_coords(piece: &Piece) -> Shape {
    get_shape(piece.kind, piece.rotation)
}

/// Propose advancing to the next rotation state at the same origin.
pub fn rotate(
    piece: &Piece,
    collides: impl Fn(&[Offset], i8, i8) -> bool,
) -> Result<Piece, Rejected> {
    let candidate = Piece {
        rotation: (piece.rotation + 1) % piece.state_count(),
        ..*piece
    };
    if collides(&candidate.shape(), candidate.x, candidate.y) {
        return Err(Rejected);
    }
    Ok(candidate)
}

/// Propose shifting the origin by (dx, dy).
pub fn move_piece(
    piece: &Piece,
    dx: i8,
    dy: i8,
    collides: impl Fn(&[Offset], i8, i8) -> bool,
) -> Result<Piece, Rejected> {
    let candidate = Piece {
        x: piece.x.saturating_add(dx),
        y: piece.y.saturating_add(dy),
        ..*piece
    };
    if collides(&candidate.shape(), candidate.x, candidate.y) {
        return Err(Rejected);
    }
    Ok(candidate)
}

impl Piece {
    pub fn new(kind: PieceKind) -> Self {
        create_piece(kind)
    }

    /// Number of distinct rotation states for this kind
    pub fn state_count(&self) -> u8 {
        rotation_states(self.kind).len() as u8
    }

    pub fn shape(&self) -> Shape {
        shape_coords(self)
    }

    /// Absolute board coordinates of the filled cells
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Rotate in place; returns false (and leaves the piece untouched) on collision
    pub fn try_rotate(&mut self, collides: impl Fn(&[Offset], i8, i8) -> bool) -> bool {
        match rotate(self, collides) {
            Ok(next) => {
                *self = next;
                true
            }
            Err(Rejected) => false,
        }
    }

    /// Move in place; returns false (and leaves the piece untouched) on collision
    pub fn try_move(
        &mut self,
        dx: i8,
        dy: i8,
        collides: impl Fn(&[Offset], i8, i8) -> bool,
    ) -> bool {
        match move_piece(self, dx, dy, collides) {
            Ok(next) => {
                *self = next;
                true
            }
            Err(Rejected) => false,
        }
    }
}

//! Tetromino model tests - shapes, spawn and move/rotate proposals

use blockdrop::core::{create_piece, move_piece, rotate, shape_coords, Board, Piece, Rejected};
use blockdrop::types::{ColorId, PieceKind, SPAWN_X, SPAWN_Y};

fn collides(board: &Board) -> impl Fn(&[(i8, i8)], i8, i8) -> bool + '_ {
    move |s: &[(i8, i8)], x: i8, y: i8| board.check_collision(s, x, y)
}

#[test]
fn test_create_piece_spawn_and_color() {
    for kind in PieceKind::ALL {
        let piece = create_piece(kind);
        assert_eq!((piece.x, piece.y), (SPAWN_X, SPAWN_Y));
        assert_eq!(piece.rotation, 0);
        assert_eq!(piece.color, kind.color());
        assert_eq!(shape_coords(&piece).len(), 4);
    }
}

#[test]
fn test_shape_coords_follow_rotation() {
    let mut piece = create_piece(PieceKind::I);
    assert_eq!(shape_coords(&piece), [(0, 1), (1, 1), (2, 1), (3, 1)]);
    piece.rotation = 1;
    assert_eq!(shape_coords(&piece), [(2, 0), (2, 1), (2, 2), (2, 3)]);
}

#[test]
fn test_rotation_cycles_through_every_state() {
    let board = Board::new();
    for kind in PieceKind::ALL {
        let start = Piece {
            y: 8,
            ..create_piece(kind)
        };
        let mut piece = start;
        for _ in 0..start.state_count() {
            piece = rotate(&piece, collides(&board)).unwrap();
            assert!(piece.rotation < piece.state_count());
        }
        assert_eq!(piece, start, "{kind:?} returns to its first state");
    }
}

#[test]
fn test_rejected_rotation_leaves_piece_unchanged() {
    let mut board = Board::new();
    // Horizontal I on row 11; the vertical state would cover (5, 10..=13).
    let piece = Piece {
        y: 10,
        ..create_piece(PieceKind::I)
    };
    board.set(5, 12, Some(ColorId::GARBAGE));

    assert_eq!(rotate(&piece, collides(&board)), Err(Rejected));

    let mut in_place = piece;
    assert!(!in_place.try_rotate(collides(&board)));
    assert_eq!(in_place, piece);
}

#[test]
fn test_rotation_near_wall_is_not_kicked() {
    let board = Board::new();
    // Vertical I in column 9 (origin x = 7); the horizontal state would
    // need columns 7..=10.
    let piece = Piece {
        rotation: 1,
        x: 7,
        y: 5,
        ..create_piece(PieceKind::I)
    };
    assert_eq!(rotate(&piece, collides(&board)), Err(Rejected));
}

#[test]
fn test_move_proposals() {
    let board = Board::new();
    let piece = create_piece(PieceKind::O);

    let moved = move_piece(&piece, 1, 2, collides(&board)).unwrap();
    assert_eq!((moved.x, moved.y), (piece.x + 1, piece.y + 2));
    // The input is never touched.
    assert_eq!(piece.x, SPAWN_X);

    let at_floor = Piece { y: 18, ..piece };
    assert_eq!(move_piece(&at_floor, 0, 1, collides(&board)), Err(Rejected));
}

#[test]
fn test_o_piece_rotation_is_identity() {
    let board = Board::new();
    let piece = create_piece(PieceKind::O);
    assert_eq!(rotate(&piece, collides(&board)), Ok(piece));
}

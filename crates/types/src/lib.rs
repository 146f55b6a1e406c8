//! Shared types and constants for the blockdrop simulation.
//!
//! Everything in here is plain data with no game logic attached, so it can be
//! used by the core, the input timer, the engine and any renderer alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//! - **Spawn position**: (3, 0) for every piece
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DAS_MS` | 170 | Delay before a held key starts repeating |
//! | `ARR_MS` | 50 | Interval between repeats once DAS has elapsed |
//! | `BASE_FALL_MS` | 1000 | Gravity period at level 1 |
//! | `FALL_STEP_MS` | 50 | Gravity speed-up per level |
//! | `MIN_FALL_MS` | 100 | Gravity floor (reached at level 19) |
//! | `LINE_CLEAR_MS` | 600 | Line-clear animation length (900 for four lines) |
//!
//! # Examples
//!
//! ```
//! use blockdrop_types::{GameAction, Key, PieceKind, Status, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(GameAction::from_str("MOVE_LEFT"), Some(GameAction::MoveLeft));
//! assert_eq!(Key::Up.action(), GameAction::Rotate);
//! assert_eq!(Status::from_str("GAME_OVER"), Some(Status::GameOver));
//! assert_eq!((BOARD_WIDTH, BOARD_HEIGHT), (10, 20));
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Spawn column of a freshly created piece's origin
pub const SPAWN_X: i8 = 3;

/// Spawn row of a freshly created piece's origin
pub const SPAWN_Y: i8 = 0;

/// Delayed Auto Shift: how long a key must be held before it repeats
pub const DAS_MS: u64 = 170;

/// Auto Repeat Rate: cadence of repeats after DAS
pub const ARR_MS: u64 = 50;

/// Gravity period at level 1 (one row per second)
pub const BASE_FALL_MS: u32 = 1000;

/// Gravity period reduction per level above 1
pub const FALL_STEP_MS: u32 = 50;

/// Gravity period floor
pub const MIN_FALL_MS: u32 = 100;

/// Lines needed per level step
pub const LINES_PER_LEVEL: u32 = 10;

/// Terminal frame period (~60 FPS)
pub const FRAME_MS: u32 = 16;

/// Line-clear animation length for one to three lines
pub const LINE_CLEAR_MS: u32 = 600;

/// Line-clear animation length for a four-line clear
pub const TETRIS_CLEAR_MS: u32 = 900;

/// Line clear scoring table, indexed by lines cleared at once.
///
/// Points are multiplied by the current level (level starts at 1).
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_defaults() {
        assert_eq!(DAS_MS, 170);
        assert_eq!(ARR_MS, 50);
        assert_eq!(BASE_FALL_MS, 1000);
        assert_eq!(FALL_STEP_MS, 50);
        assert_eq!(MIN_FALL_MS, 100);
    }

    #[test]
    fn action_names_accept_every_spelling() {
        for name in ["MOVE_LEFT", "moveLeft", "move_left", "MoveLeft"] {
            assert_eq!(GameAction::from_str(name), Some(GameAction::MoveLeft), "{name}");
        }
        assert_eq!(GameAction::from_str("HARD_DROP"), Some(GameAction::HardDrop));
        assert_eq!(GameAction::from_str("hold"), None);
    }

    #[test]
    fn only_movement_and_soft_drop_repeat() {
        assert!(GameAction::MoveLeft.is_repeatable());
        assert!(GameAction::MoveRight.is_repeatable());
        assert!(GameAction::SoftDrop.is_repeatable());
        assert!(!GameAction::Rotate.is_repeatable());
        assert!(!GameAction::HardDrop.is_repeatable());
        assert!(!GameAction::Pause.is_repeatable());
    }

    #[test]
    fn color_hex_formatting() {
        assert_eq!(PieceKind::I.color().to_hex(), "#00f0f0");
        assert_eq!(PieceKind::L.color().to_hex(), "#f0a000");
        assert_eq!(ColorId::from_hex("#A000F0"), Some(PieceKind::T.color()));
        assert_eq!(ColorId::from_hex("a000f0"), None);
    }
}

/// The seven tetromino piece kinds
///
/// Each kind has a canonical color:
/// - **I**: Cyan
/// - **O**: Yellow
/// - **T**: Purple
/// - **S**: Green
/// - **Z**: Red
/// - **J**: Blue
/// - **L**: Orange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in canonical bag order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// ```
    /// use blockdrop_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Uppercase single-letter name
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }

    /// Canonical color of this kind
    pub fn color(&self) -> ColorId {
        match self {
            PieceKind::I => ColorId(0x00f0f0),
            PieceKind::O => ColorId(0xf0f000),
            PieceKind::T => ColorId(0xa000f0),
            PieceKind::S => ColorId(0x00f000),
            PieceKind::Z => ColorId(0xf00000),
            PieceKind::J => ColorId(0x0000f0),
            PieceKind::L => ColorId(0xf0a000),
        }
    }
}

/// A 24-bit RGB color identifier stored in occupied board cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorId(pub u32);

impl ColorId {
    /// Neutral gray, handy for filling rows in tests and demos
    pub const GARBAGE: ColorId = ColorId(0x808080);

    pub const fn rgb(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        )
    }

    /// `#rrggbb`, lowercase
    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.0 & 0x00ff_ffff)
    }

    /// Parse `#rrggbb` (case-insensitive).
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(ColorId)
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(ColorId)`: Cell filled with a locked block of that color
pub type Cell = Option<ColorId>;

/// Discrete actions the engine understands.
///
/// These come either from the input timer (key presses and repeats) or from
/// a direct call to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down (+1 point)
    SoftDrop,
    /// Drop to the lowest legal row and lock (+2 points per row)
    HardDrop,
    /// Advance to the next rotation state (clockwise)
    Rotate,
    /// Toggle between playing and paused
    Pause,
}

impl GameAction {
    /// Parse an action name.
    ///
    /// Case and underscores are ignored, so `MOVE_LEFT`, `moveLeft` and
    /// `move_left` all name the same action.
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotate" => Some(GameAction::Rotate),
            "pause" => Some(GameAction::Pause),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "MOVE_LEFT",
            GameAction::MoveRight => "MOVE_RIGHT",
            GameAction::SoftDrop => "SOFT_DROP",
            GameAction::HardDrop => "HARD_DROP",
            GameAction::Rotate => "ROTATE",
            GameAction::Pause => "PAUSE",
        }
    }

    /// Whether holding the key for this action auto-repeats.
    ///
    /// Rotation, hard drop and pause are edge-triggered.
    pub fn is_repeatable(&self) -> bool {
        matches!(
            self,
            GameAction::MoveLeft | GameAction::MoveRight | GameAction::SoftDrop
        )
    }
}

/// Play status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Ready,
    Playing,
    Paused,
    GameOver,
}

impl Status {
    /// Parse `READY`, `PLAYING`, `PAUSED` or `GAME_OVER` (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "READY" => Some(Status::Ready),
            "PLAYING" => Some(Status::Playing),
            "PAUSED" => Some(Status::Paused),
            "GAME_OVER" => Some(Status::GameOver),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ready => "READY",
            Status::Playing => "PLAYING",
            Status::Paused => "PAUSED",
            Status::GameOver => "GAME_OVER",
        }
    }
}

/// Flat bonus attached to a scoring call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DropBonus {
    #[default]
    None,
    Soft,
    Hard,
}

impl DropBonus {
    /// Points added on top of the line score (never level-multiplied)
    pub fn points(&self) -> u32 {
        match self {
            DropBonus::None => 0,
            DropBonus::Soft => 1,
            DropBonus::Hard => 2,
        }
    }
}

/// Abstract key identifiers delivered by an input source.
///
/// The physical binding (arrow keys, space, `p`) is the input source's
/// business; the mapping from key to action is fixed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Down,
    Up,
    Space,
    P,
}

impl Key {
    pub const ALL: [Key; 6] = [Key::Left, Key::Right, Key::Down, Key::Up, Key::Space, Key::P];

    /// The action bound to this key
    pub fn action(&self) -> GameAction {
        match self {
            Key::Left => GameAction::MoveLeft,
            Key::Right => GameAction::MoveRight,
            Key::Down => GameAction::SoftDrop,
            Key::Up => GameAction::Rotate,
            Key::Space => GameAction::HardDrop,
            Key::P => GameAction::Pause,
        }
    }
}

/// A raw key edge from an input source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEdge {
    Down(Key),
    Up(Key),
}

//! Input module (engine-facing).
//!
//! [`InputTimer`] converts key edges into timed actions (DAS/ARR) and is
//! independent of any terminal library. [`map`] translates `crossterm` key
//! codes into the abstract [`types::Key`] identifiers the timer understands.

pub mod map;
pub mod timer;

pub use blockdrop_types as types;

pub use map::{is_restart, map_key_code, should_quit};
pub use timer::{InputTimer, MAX_ACTIONS_PER_UPDATE};

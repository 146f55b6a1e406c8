//! Terminal front-end.
//!
//! A small, game-oriented rendering layer: frames are laid out into a plain
//! framebuffer by a pure [`GameView`] and flushed as diffs through crossterm,
//! with no widget toolkit in between. [`TerminalRenderer`] and [`TermInput`]
//! plug the terminal into the engine's `Renderer` and `InputSource` seams.

pub mod fb;
pub mod game_view;
pub mod input;
pub mod renderer;

pub use blockdrop_core as core;
pub use blockdrop_engine as engine;
pub use blockdrop_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Overlay, Viewport};
pub use input::TermInput;
pub use renderer::{encode_diff_into, encode_full_into, TerminalOutput, TerminalRenderer};

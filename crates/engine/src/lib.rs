//! Game engine - the orchestration loop and its collaborators.
//!
//! - [`engine`]: [`GameEngine`], which owns board, queue, state and input timer
//! - [`renderer`]: the [`Renderer`] trait, the cancellable line-clear handle
//!   and a recording [`HeadlessRenderer`]
//! - [`input`]: the [`InputSource`] trait and scripted sources
//! - [`config`]: [`Settings`] loaded from JSON and the environment
//!
//! # Example
//!
//! ```
//! use blockdrop_engine::{GameEngine, HeadlessRenderer, NoInput, Settings};
//! use blockdrop_engine::types::{GameAction, Status};
//!
//! let settings = Settings { seed: Some(7), ..Settings::default() };
//! let mut engine = GameEngine::new(HeadlessRenderer::new(), NoInput, settings);
//! engine.start(0);
//! engine.handle_input(GameAction::HardDrop);
//! engine.tick(16);
//! assert_eq!(engine.status(), Status::Playing);
//! ```

pub mod config;
pub mod engine;
pub mod input;
pub mod renderer;

pub use blockdrop_core as core;
pub use blockdrop_types as types;

pub use config::Settings;
pub use engine::GameEngine;
pub use input::{InputSource, NoInput, ScriptedInput};
pub use renderer::{
    line_clear_channel, HeadlessRenderer, LineClearDone, LineClearHandle, LineClearRequest,
    Renderer,
};

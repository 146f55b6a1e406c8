//! Blockdrop (workspace facade crate).
//!
//! Re-exports the member crates under short names so binaries, tests and
//! benches can write `blockdrop::core::Board` or `blockdrop::engine::GameEngine`
//! while the implementation lives in dedicated crates under `crates/`.

pub use blockdrop_core as core;
pub use blockdrop_engine as engine;
pub use blockdrop_input as input;
pub use blockdrop_term as term;
pub use blockdrop_types as types;

//! Terminal blockdrop runner (default binary).
//!
//! Raw-mode terminal, fixed frame period. `r` restarts, `q` or Ctrl-C quits.

use std::time::{Duration, Instant};

use anyhow::Result;

use blockdrop::engine::{GameEngine, Settings};
use blockdrop::term::{TermInput, TerminalRenderer};

fn main() -> Result<()> {
    let settings = Settings::from_env();
    if let Some(seed) = settings.seed {
        eprintln!("[blockdrop] fixed seed {seed}");
    }

    let mut term = TerminalRenderer::new(settings.line_clear_ms);
    term.enter()?;

    let result = run(&mut term, settings);

    // Always try to restore terminal state.
    let _ = term.exit();
    let score = result?;
    eprintln!("[blockdrop] final score {score}");
    Ok(())
}

fn run(term: &mut TerminalRenderer, settings: Settings) -> Result<u32> {
    let frame = Duration::from_millis(u64::from(settings.frame_ms));
    let clock = Instant::now();
    let now_ms = || clock.elapsed().as_millis() as u64;

    let mut engine = GameEngine::new(term, TermInput::new(), settings);
    engine.start(now_ms());

    loop {
        let frame_start = Instant::now();

        engine.input_source_mut().pump()?;
        if engine.input_source_mut().take_quit() {
            return Ok(engine.state().score());
        }
        if engine.input_source_mut().take_restart() {
            engine.restart(now_ms());
        }

        engine.tick(now_ms());
        engine.renderer_mut().take_error()?;

        let remaining = frame.saturating_sub(frame_start.elapsed());
        engine.input_source_mut().wait(remaining)?;
    }
}

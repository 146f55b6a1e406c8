//! TerminalRenderer: the engine's `Renderer` on a real terminal.
//!
//! Draw calls fill a `GameSnapshot`; `present` lays it out with
//! [`GameView`] and flushes only the cells that changed since the last frame.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};

use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::core::{Board, GameSnapshot, GameState, Piece};
use crate::engine::{line_clear_channel, LineClearDone, LineClearHandle, LineClearRequest, Renderer};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::game_view::{GameView, Overlay, Viewport};
use crate::types::{LINE_CLEAR_MS, TETRIS_CLEAR_MS};

/// Blink period of rows being cleared
const FLASH_MS: u128 = 100;

struct ClearAnimation {
    started: Instant,
    duration: Duration,
    rows: Vec<u8>,
    done: LineClearDone,
}

pub struct TerminalRenderer {
    out: TerminalOutput,
    frame: FrameBuffer,
    view: GameView,
    snapshot: GameSnapshot,
    overlay: Option<Overlay>,
    animation: Option<ClearAnimation>,
    line_clear_ms: u32,
    error: Option<anyhow::Error>,
}

impl TerminalRenderer {
    pub fn new(line_clear_ms: u32) -> Self {
        Self {
            out: TerminalOutput::new(),
            frame: FrameBuffer::new(0, 0),
            view: GameView::default(),
            snapshot: GameSnapshot::default(),
            overlay: None,
            animation: None,
            line_clear_ms,
            error: None,
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        self.out.enter()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.out.exit()
    }

    /// Surface the first I/O error hit while presenting, if any.
    pub fn take_error(&mut self) -> Result<()> {
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.overlay
    }

    pub fn snapshot(&self) -> &GameSnapshot {
        &self.snapshot
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    fn clear_duration(&self, count: usize) -> Duration {
        let ms = if count >= 4 {
            u64::from(self.line_clear_ms) * u64::from(TETRIS_CLEAR_MS) / u64::from(LINE_CLEAR_MS)
        } else {
            u64::from(self.line_clear_ms)
        };
        Duration::from_millis(ms)
    }

    /// Step the line-clear animation, completing it once its time is up.
    fn advance_animation(&mut self, now: Instant) {
        self.snapshot.clearing_rows.clear();
        self.snapshot.clear_flash_on = false;

        let Some(anim) = &self.animation else {
            return;
        };
        let elapsed = now.saturating_duration_since(anim.started);
        if elapsed >= anim.duration || !anim.done.is_wanted() {
            if let Some(anim) = self.animation.take() {
                anim.done.complete();
            }
            return;
        }
        self.snapshot.clearing_rows.extend_from_slice(&anim.rows);
        self.snapshot.clear_flash_on = (elapsed.as_millis() / FLASH_MS) % 2 == 0;
    }
}

impl Renderer for TerminalRenderer {
    fn draw_board(&mut self, board: &Board, active: Option<&Piece>) {
        self.snapshot.capture_board(board, active);
    }

    fn draw_ui(&mut self, state: &GameState) {
        self.snapshot.capture_state(state);
    }

    fn draw_next_piece(&mut self, next: Option<&Piece>) {
        self.snapshot.next = next.map(|p| p.kind);
    }

    fn show_game_over(&mut self, score: u32) {
        self.overlay = Some(Overlay::GameOver { score });
    }

    fn hide_game_over(&mut self) {
        if matches!(self.overlay, Some(Overlay::GameOver { .. })) {
            self.overlay = None;
        }
    }

    fn show_pause(&mut self) {
        if self.overlay.is_none() {
            self.overlay = Some(Overlay::Paused);
        }
    }

    fn hide_pause(&mut self) {
        if self.overlay == Some(Overlay::Paused) {
            self.overlay = None;
        }
    }

    fn animate_line_clear(&mut self, request: &LineClearRequest) -> LineClearHandle {
        if let Some(previous) = self.animation.take() {
            previous.done.complete();
        }
        let (done, handle) = line_clear_channel();
        self.animation = Some(ClearAnimation {
            started: Instant::now(),
            duration: self.clear_duration(request.count),
            rows: request.row_indices().map(|y| y as u8).collect(),
            done,
        });
        handle
    }

    fn present(&mut self) {
        self.advance_animation(Instant::now());
        let (w, h) = terminal::size().unwrap_or((80, 24));
        self.view
            .render_into(&self.snapshot, self.overlay, Viewport::new(w, h), &mut self.frame);
        if let Err(err) = self.out.draw_swap(&mut self.frame) {
            self.error.get_or_insert(err);
        }
    }
}

/// Raw terminal output with frame diffing.
pub struct TerminalOutput {
    stdout: io::Stdout,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
    keyboard_enhanced: bool,
}

impl TerminalOutput {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(64 * 1024),
            keyboard_enhanced: false,
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        // Key release events make held-key timing exact where supported.
        self.keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.keyboard_enhanced {
            self.buf.queue(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
        }
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        if self.keyboard_enhanced {
            self.buf.queue(PopKeyboardEnhancementFlags)?;
        }
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw a framebuffer, swapping it into internal state.
    ///
    /// The previous frame comes back in `fb` so the caller can reuse it
    /// without cloning.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        let mut prev = match self.last.take() {
            Some(prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                self.buf.clear();
                encode_diff_into(&prev, fb, &mut self.buf)?;
                prev
            }
            other => {
                self.buf.clear();
                encode_full_into(fb, &mut self.buf)?;
                let mut prev = other.unwrap_or_else(|| FrameBuffer::new(0, 0));
                prev.resize(fb.width(), fb.height());
                prev
            }
        };
        self.flush_buf()?;

        std::mem::swap(&mut prev, fb);
        self.last = Some(prev);
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout
            .write_all(&self.buf)
            .and_then(|()| self.stdout.flush())
            .map_err(|err| anyhow!("terminal write failed: {err}"))
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;

    let mut current_style: Option<CellStyle> = None;
    for y in 0..fb.height() {
        for x in 0..fb.width() {
            let cell = fb.get(x, y).unwrap_or_default();
            if current_style != Some(cell.style) {
                apply_style_into(out, cell.style)?;
                current_style = Some(cell.style);
            }
            out.queue(Print(cell.ch))?;
        }
        if y + 1 < fb.height() {
            out.queue(Print("\r\n"))?;
        }
    }

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Encode only the changed runs of `next` relative to `prev` into `out`.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut current_style: Option<CellStyle> = None;

    for_each_changed_run(prev, next, |x, y, len| {
        out.queue(cursor::MoveTo(x, y))?;
        for dx in 0..len {
            let cell = next.get(x + dx, y).unwrap_or_default();
            if current_style != Some(cell.style) {
                apply_style_into(out, cell.style)?;
                current_style = Some(cell.style);
            }
            out.queue(Print(cell.ch))?;
        }
        Ok(())
    })?;

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn apply_style_into(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
    out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
    out.queue(SetAttribute(Attribute::Reset))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

fn for_each_changed_run(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    mut f: impl FnMut(u16, u16, u16) -> Result<()>,
) -> Result<()> {
    if prev.width() != next.width() || prev.height() != next.height() {
        for y in 0..next.height() {
            f(0, y, next.width())?;
        }
        return Ok(());
    }

    let w = next.width();
    for y in 0..next.height() {
        let mut x = 0;
        while x < w {
            if prev.get(x, y) == next.get(x, y) {
                x += 1;
                continue;
            }
            let start = x;
            x += 1;
            while x < w && prev.get(x, y) != next.get(x, y) {
                x += 1;
            }
            f(start, y, x - start)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClearedRow;
    use crate::fb::Cell;
    use crate::types::Status;

    fn request(count: usize) -> LineClearRequest {
        LineClearRequest {
            episode: 0,
            rows: (0..count)
                .map(|i| ClearedRow {
                    y: 19 - i,
                    cells: [None; 10],
                })
                .collect(),
            count,
        }
    }

    #[test]
    fn changed_run_iterator_coalesces_adjacent_cells() {
        let style = CellStyle::default();
        let a = FrameBuffer::new(5, 1);
        let mut b = FrameBuffer::new(5, 1);
        for x in 1..=3 {
            b.set(x, 0, Cell { ch: 'X', style });
        }

        let mut runs = Vec::new();
        for_each_changed_run(&a, &b, |x, y, len| {
            runs.push((x, y, len));
            Ok(())
        })
        .unwrap();
        assert_eq!(runs, vec![(1, 0, 3)]);
    }

    #[test]
    fn identical_frames_encode_no_cells() {
        let fb = FrameBuffer::new(4, 2);
        let mut out = Vec::new();
        encode_diff_into(&fb, &fb, &mut out).unwrap();

        let mut reset_only = Vec::new();
        reset_only.queue(ResetColor).unwrap();
        reset_only.queue(SetAttribute(Attribute::Reset)).unwrap();
        assert_eq!(out, reset_only);
    }

    #[test]
    fn full_encode_prints_every_cell() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.put_str(0, 0, "ab", CellStyle::default());
        let mut out = Vec::new();
        encode_full_into(&fb, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains('a') && text.contains('b'));
    }

    #[test]
    fn overlays_follow_show_and_hide() {
        let mut r = TerminalRenderer::new(LINE_CLEAR_MS);
        r.show_pause();
        assert_eq!(r.overlay(), Some(Overlay::Paused));
        r.hide_pause();
        assert_eq!(r.overlay(), None);

        r.show_game_over(80);
        // Pause never hides a game over.
        r.show_pause();
        r.hide_pause();
        assert_eq!(r.overlay(), Some(Overlay::GameOver { score: 80 }));
        r.hide_game_over();
        assert_eq!(r.overlay(), None);
    }

    #[test]
    fn animation_flashes_then_completes() {
        let mut r = TerminalRenderer::new(LINE_CLEAR_MS);
        let mut handle = r.animate_line_clear(&request(2));
        let started = r.animation.as_ref().unwrap().started;

        r.advance_animation(started + Duration::from_millis(50));
        assert_eq!(r.snapshot().clearing_rows, vec![19, 18]);
        assert!(r.snapshot().clear_flash_on);
        r.advance_animation(started + Duration::from_millis(150));
        assert!(!r.snapshot().clear_flash_on);
        assert!(!handle.poll_done());

        r.advance_animation(started + Duration::from_millis(600));
        assert!(r.snapshot().clearing_rows.is_empty());
        assert!(!r.is_animating());
        assert!(handle.poll_done());
    }

    #[test]
    fn four_line_clear_runs_longer() {
        let mut r = TerminalRenderer::new(LINE_CLEAR_MS);
        let mut handle = r.animate_line_clear(&request(4));
        let started = r.animation.as_ref().unwrap().started;
        r.advance_animation(started + Duration::from_millis(700));
        assert!(!handle.poll_done());
        r.advance_animation(started + Duration::from_millis(900));
        assert!(handle.poll_done());
    }

    #[test]
    fn dropped_handle_cancels_animation() {
        let mut r = TerminalRenderer::new(LINE_CLEAR_MS);
        drop(r.animate_line_clear(&request(1)));
        r.advance_animation(Instant::now());
        assert!(!r.is_animating());
    }

    #[test]
    fn draw_calls_fill_snapshot() {
        let mut r = TerminalRenderer::new(LINE_CLEAR_MS);
        let mut state = GameState::new();
        state.start();
        state.add_score(1, crate::types::DropBonus::None);
        r.draw_ui(&state);
        assert_eq!(r.snapshot().score, 40);
        assert_eq!(r.snapshot().status, Status::Playing);
    }
}

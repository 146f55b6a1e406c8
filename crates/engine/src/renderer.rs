//! Renderer collaborator and the line-clear completion handle.
//!
//! The engine never waits on a renderer. When rows clear it hands the
//! renderer a [`LineClearRequest`] and gets back a [`LineClearHandle`], then
//! keeps ticking and polls the handle until the renderer (or whoever holds
//! the matching [`LineClearDone`]) signals completion. Dropping a handle is
//! how a superseded request is cancelled: a late `complete()` on the other
//! end goes nowhere.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::core::{Board, ClearedRow, GameSnapshot, GameState, Piece};

/// Rows removed by one lock, as they looked before removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClearRequest {
    /// Engine incarnation that issued the request
    pub episode: u64,
    pub rows: Vec<ClearedRow>,
    pub count: usize,
}

impl LineClearRequest {
    /// Pre-removal row indices, bottom-most first
    pub fn row_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().map(|r| r.y)
    }
}

/// Sending half: completes the animation it was created for.
#[derive(Debug)]
pub struct LineClearDone {
    tx: oneshot::Sender<()>,
}

impl LineClearDone {
    pub fn complete(self) {
        // The engine may have restarted and dropped the handle.
        let _ = self.tx.send(());
    }

    /// Whether the engine side still waits on this signal
    pub fn is_wanted(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// Receiving half held by the engine while an animation runs.
#[derive(Debug)]
pub struct LineClearHandle {
    rx: oneshot::Receiver<()>,
    done: bool,
}

impl LineClearHandle {
    /// A handle that is already complete (renderers without animation).
    pub fn completed() -> Self {
        let (done, handle) = line_clear_channel();
        done.complete();
        handle
    }

    /// Non-blocking check. A dropped sender counts as completion.
    pub fn poll_done(&mut self) -> bool {
        if !self.done {
            match self.rx.try_recv() {
                Ok(()) | Err(TryRecvError::Closed) => self.done = true,
                Err(TryRecvError::Empty) => {}
            }
        }
        self.done
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

impl Future for LineClearHandle {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(());
        }
        match Pin::new(&mut this.rx).poll(cx) {
            Poll::Ready(_) => {
                this.done = true;
                Poll::Ready(())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

pub fn line_clear_channel() -> (LineClearDone, LineClearHandle) {
    let (tx, rx) = oneshot::channel();
    (LineClearDone { tx }, LineClearHandle { rx, done: false })
}

/// Output surface driven by the engine once per tick.
///
/// `draw_board` receives the live board; the board's own
/// [`Board::check_collision`] is the collision predicate for ghost
/// placement. Optional surfaces have no-op defaults.
pub trait Renderer {
    fn draw_board(&mut self, board: &Board, active: Option<&Piece>);

    fn draw_ui(&mut self, state: &GameState);

    fn draw_next_piece(&mut self, _next: Option<&Piece>) {}

    fn show_game_over(&mut self, score: u32);

    fn hide_game_over(&mut self);

    fn show_pause(&mut self);

    fn hide_pause(&mut self);

    /// Start a line-clear animation; the engine resumes once the handle completes.
    fn animate_line_clear(&mut self, _request: &LineClearRequest) -> LineClearHandle {
        LineClearHandle::completed()
    }

    /// End of frame
    fn present(&mut self) {}
}

impl<T: Renderer + ?Sized> Renderer for &mut T {
    fn draw_board(&mut self, board: &Board, active: Option<&Piece>) {
        (**self).draw_board(board, active)
    }

    fn draw_ui(&mut self, state: &GameState) {
        (**self).draw_ui(state)
    }

    fn draw_next_piece(&mut self, next: Option<&Piece>) {
        (**self).draw_next_piece(next)
    }

    fn show_game_over(&mut self, score: u32) {
        (**self).show_game_over(score)
    }

    fn hide_game_over(&mut self) {
        (**self).hide_game_over()
    }

    fn show_pause(&mut self) {
        (**self).show_pause()
    }

    fn hide_pause(&mut self) {
        (**self).hide_pause()
    }

    fn animate_line_clear(&mut self, request: &LineClearRequest) -> LineClearHandle {
        (**self).animate_line_clear(request)
    }

    fn present(&mut self) {
        (**self).present()
    }
}

/// Renderer that draws nothing and remembers what it was asked to do.
///
/// Line clears are held open until [`HeadlessRenderer::finish_line_clear`]
/// unless `auto_complete` is set.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    pub snapshot: GameSnapshot,
    pub frames: u64,
    pub game_over: Option<u32>,
    pub paused: bool,
    pub auto_complete: bool,
    pub clear_requests: Vec<LineClearRequest>,
    pending_done: Option<LineClearDone>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Complete every line clear immediately
    pub fn auto_completing() -> Self {
        Self {
            auto_complete: true,
            ..Self::default()
        }
    }

    /// Signal completion of the last requested animation.
    ///
    /// Returns false when nothing was outstanding.
    pub fn finish_line_clear(&mut self) -> bool {
        match self.pending_done.take() {
            Some(done) => {
                done.complete();
                true
            }
            None => false,
        }
    }

    /// Take the sender of the outstanding animation without completing it
    pub fn take_line_clear_done(&mut self) -> Option<LineClearDone> {
        self.pending_done.take()
    }

    pub fn has_pending_clear(&self) -> bool {
        self.pending_done.is_some()
    }
}

impl Renderer for HeadlessRenderer {
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
        self.game_over = Some(score);
    }

    fn hide_game_over(&mut self) {
        self.game_over = None;
    }

    fn show_pause(&mut self) {
        self.paused = true;
    }

    fn hide_pause(&mut self) {
        self.paused = false;
    }

    fn animate_line_clear(&mut self, request: &LineClearRequest) -> LineClearHandle {
        self.clear_requests.push(request.clone());
        if self.auto_complete {
            return LineClearHandle::completed();
        }
        let (done, handle) = line_clear_channel();
        self.pending_done = Some(done);
        handle
    }

    fn present(&mut self) {
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready, task};

    #[test]
    fn handle_completes_on_signal() {
        let (done, mut handle) = line_clear_channel();
        assert!(!handle.poll_done());
        assert!(!handle.is_done());
        assert!(done.is_wanted());
        done.complete();
        // `is_done` only reports what a poll has observed.
        assert!(!handle.is_done());
        assert!(handle.poll_done());
        assert!(handle.is_done());
        // Stays complete after the value was consumed.
        assert!(handle.poll_done());
    }

    #[test]
    fn dropped_sender_counts_as_done() {
        let (done, mut handle) = line_clear_channel();
        drop(done);
        assert!(handle.poll_done());
    }

    #[test]
    fn completing_after_handle_dropped_is_harmless() {
        let (done, handle) = line_clear_channel();
        drop(handle);
        assert!(!done.is_wanted());
        done.complete();
    }

    #[test]
    fn handle_is_a_future() {
        let (done, handle) = line_clear_channel();
        let mut fut = task::spawn(handle);
        assert_pending!(fut.poll());
        done.complete();
        assert!(fut.is_woken());
        assert_ready!(fut.poll());
    }

    #[test]
    fn headless_renderer_holds_sender_until_finished() {
        let mut renderer = HeadlessRenderer::new();
        let request = LineClearRequest {
            episode: 0,
            rows: Vec::new(),
            count: 1,
        };
        let mut handle = renderer.animate_line_clear(&request);
        assert!(renderer.has_pending_clear());
        assert!(!handle.poll_done());

        assert!(renderer.finish_line_clear());
        assert!(!renderer.has_pending_clear());
        assert!(handle.poll_done());
        assert!(!renderer.finish_line_clear());
    }

    #[test]
    fn completed_handle_is_ready_immediately() {
        let mut fut = task::spawn(LineClearHandle::completed());
        assert_ready!(fut.poll());
    }
}

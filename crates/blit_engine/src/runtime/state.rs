//! Cross-thread execution state
//!
//! One instance is shared by every thread a run loop starts. The running
//! flag is the only cancellation primitive in the engine; the viewport is
//! published as a single snapshot so no reader can see a half-updated
//! width/height pair.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Published viewport dimensions.
///
/// `width`/`height` are the logical size game code works in;
/// `true_width`/`true_height` are the physical framebuffer size. They
/// differ only in the scaled-1080p window modes, where inputs arriving in
/// physical pixels must be scaled by `width / true_width`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Logical width
    pub width: f32,
    /// Logical height
    pub height: f32,
    /// Physical framebuffer width
    pub true_width: f32,
    /// Physical framebuffer height
    pub true_height: f32,
}

impl Viewport {
    pub(crate) fn new(logical: (f32, f32), physical: (u32, u32)) -> Self {
        Self {
            width: logical.0,
            height: logical.1,
            true_width: physical.0 as f32,
            true_height: physical.1 as f32,
        }
    }
}

/// State shared between the threads of a run loop.
///
/// The viewport lives behind one mutex so logically-related fields always
/// change together; a reader gets a consistent snapshot, never a torn
/// pair. Game state of your own that crosses threads needs the same
/// treatment: one atomic per independent value, or one lock per group of
/// values that must change together.
#[derive(Debug)]
pub struct SharedState {
    running: AtomicBool,
    viewport: Mutex<Viewport>,
}

impl SharedState {
    pub(crate) fn new() -> Self {
        Self {
            running: AtomicBool::new(true),
            viewport: Mutex::new(Viewport::new((0.0, 0.0), (0, 0))),
        }
    }

    /// Whether the run loop should keep iterating.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Request shutdown.
    ///
    /// Level-triggered: callable from any thread or callback, any number
    /// of times, before or during the run. The next loop check observes
    /// it and begins shutdown.
    pub fn quit(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Consistent snapshot of the current viewport.
    pub fn viewport(&self) -> Viewport {
        *self.viewport.lock().unwrap()
    }

    pub(crate) fn set_viewport(&self, viewport: Viewport) {
        *self.viewport.lock().unwrap() = viewport;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_quit_is_level_triggered_and_idempotent() {
        let state = SharedState::new();
        assert!(state.is_running());
        state.quit();
        state.quit();
        state.quit();
        assert!(!state.is_running());
    }

    #[test]
    fn test_viewport_snapshots_are_never_torn() {
        let state = Arc::new(SharedState::new());
        state.set_viewport(Viewport::new((100.0, 50.0), (100, 50)));

        let writer = {
            let state = Arc::clone(&state);
            thread::spawn(move || {
                for i in 0..1000 {
                    if i % 2 == 0 {
                        state.set_viewport(Viewport::new((100.0, 50.0), (100, 50)));
                    } else {
                        state.set_viewport(Viewport::new((200.0, 100.0), (200, 100)));
                    }
                }
            })
        };

        for _ in 0..1000 {
            let snapshot = state.viewport();
            let consistent = (snapshot.width, snapshot.height) == (100.0, 50.0)
                || (snapshot.width, snapshot.height) == (200.0, 100.0);
            assert!(consistent, "torn viewport: {snapshot:?}");
        }
        writer.join().unwrap();
    }
}

//! Backend-agnostic window traits
//!
//! The execution controller drives whichever backend it is given through
//! these traits; nothing else in the engine touches a windowing library.

use crate::core::config::WindowConfig;
use crate::input::JoystickSource;

use super::{WindowError, WindowEvent};

/// Creates windows for a particular windowing backend.
pub trait WindowSystem {
    /// Open a window (and its context) per `config`.
    ///
    /// Called once, by [`Engine::run`](crate::Engine::run). Failure here
    /// is fatal to startup.
    fn open(&mut self, config: &WindowConfig) -> Result<Box<dyn WindowBackend>, WindowError>;
}

/// A live window plus its input and presentation facilities.
///
/// [`JoystickSource`] is a supertrait so joystick polling goes through the
/// same object that owns the platform connection.
pub trait WindowBackend: JoystickSource {
    /// Pump the platform event queue and drain the mapped events.
    fn poll_events(&mut self) -> Vec<WindowEvent>;

    /// Current framebuffer size in physical pixels.
    fn framebuffer_size(&self) -> (u32, u32);

    /// Present the frame. Blocks on vertical sync when enabled.
    fn swap_buffers(&mut self);

    /// Whether the platform has asked the window to close.
    fn should_close(&self) -> bool;

    /// Show or hide the cursor while it is over the window.
    fn show_cursor(&mut self, show: bool);
}

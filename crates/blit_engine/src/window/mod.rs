//! Windowing layer: events, the backend traits, and the GLFW
//! implementation.

pub mod backend;

#[cfg(feature = "backend_glfw")]
mod glfw_backend;
#[cfg(feature = "backend_glfw")]
pub use glfw_backend::GlfwWindowSystem;

use thiserror::Error;

use crate::input::{KeyEvent, MouseEvent};

/// Window management errors.
#[derive(Debug, Error)]
pub enum WindowError {
    /// The window system failed to initialize.
    #[error("window system initialization failed: {0}")]
    InitFailed(String),

    /// The window or its context could not be created.
    #[error("window creation failed: {0}")]
    CreationFailed(String),
}

/// Events drained from the window backend each frame.
#[derive(Debug, Clone, Copy)]
pub enum WindowEvent {
    /// Keyboard input.
    Key(KeyEvent),

    /// Cursor moved to the given position, in physical pixels from the
    /// top-left corner.
    CursorMoved {
        /// Cursor x position
        x: f64,
        /// Cursor y position
        y: f64,
    },

    /// Mouse button input.
    MouseButton(MouseEvent),

    /// Scroll wheel movement.
    Scroll {
        /// Horizontal scroll offset
        dx: f64,
        /// Vertical scroll offset
        dy: f64,
    },

    /// The framebuffer changed size (resize or fullscreen toggle).
    FramebufferResized {
        /// New width in physical pixels
        width: u32,
        /// New height in physical pixels
        height: u32,
    },

    /// The platform asked the window to close.
    CloseRequested,
}

//! # Blit Engine
//!
//! A thin 2D/3D sprite-rendering shim over a graphics device, a windowing
//! layer, and an image decoder. Game programs register lifecycle callbacks
//! (init, update, draw, input, sync), pick a threading model, and issue
//! texture binds without managing GPU state directly.
//!
//! ## Features
//!
//! - **Texture cache**: reference-counted, with a per-unit bind-state
//!   cache that skips redundant GPU rebinds
//! - **Three threading models**: single-threaded, a concurrent sync
//!   worker, or a dedicated fixed-timestep update thread
//! - **Swappable backends**: windowing, decoding, and the GPU are traits;
//!   a GLFW window system and a recording headless device ship in-crate
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use blit_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = Engine::new(
//!         EngineConfig::default(),
//!         Box::new(GlfwWindowSystem),
//!         Box::new(HeadlessDevice::new()),
//!     );
//!
//!     engine.set_update(|_ctx, _seconds| {
//!         // game logic
//!     });
//!     engine.set_draw(|ctx| {
//!         let _ = ctx.textures.bind("logo.png", 0);
//!         // submit quads through your renderer
//!     });
//!     engine.set_key_handler(|control, event| {
//!         if event.key == Key::Escape {
//!             control.quit();
//!         }
//!     });
//!
//!     // Blocks until shutdown.
//!     engine.run(ThreadModel::SingleThreaded)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod core;
pub mod foundation;
pub mod input;
pub mod render;
pub mod runtime;
pub mod window;

pub use runtime::controller::{Engine, Phase, RunError, ThreadModel};

/// Common imports for engine users.
pub mod prelude {
    pub use crate::core::config::{
        EngineConfig, TextureConfig, TimingConfig, WindowConfig, WindowMode,
    };
    pub use crate::input::{
        Action, JoystickId, JoystickState, Key, KeyEvent, Modifiers, MouseButton, MouseEvent,
    };
    pub use crate::render::device::{TextureDevice, TextureHandle, WrapMode};
    pub use crate::render::headless::HeadlessDevice;
    pub use crate::render::sprite::{Sprite, SpriteKey};
    pub use crate::render::texture_cache::{LoadParams, TextureCache, TextureError};
    pub use crate::runtime::callbacks::{Control, DrawContext, UpdateContext};
    pub use crate::runtime::state::{SharedState, Viewport};
    pub use crate::{Engine, Phase, RunError, ThreadModel};

    #[cfg(feature = "backend_glfw")]
    pub use crate::window::GlfwWindowSystem;
}

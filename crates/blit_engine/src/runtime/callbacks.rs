//! Lifecycle callbacks and the contexts they receive
//!
//! User code plugs into the run loop through a closed set of hooks, each
//! registered once before [`Engine::run`](crate::Engine::run) starts.
//! Update and Draw are required; everything else defaults to a no-op.
//!
//! The context types partition capabilities by thread. `DrawContext` is
//! the only path to the texture cache, the sprite factories, and the
//! window, which keeps all of them on the thread that owns the graphics
//! context. `UpdateContext` carries only the shared state, because in the
//! fully multithreaded model Update runs somewhere else entirely.

use crate::input::{JoystickId, JoystickSource, JoystickState, KeyEvent, MouseEvent};
use crate::render::sprite::{Sprite, SpriteKey, SpriteRegistry};
use crate::render::texture_cache::{LoadParams, TextureCache, TextureError};
use crate::window::backend::WindowBackend;

use super::state::{SharedState, Viewport};

pub(crate) type InitFn = Box<dyn FnMut(&mut DrawContext<'_>)>;
pub(crate) type UpdateFn = Box<dyn FnMut(&mut UpdateContext<'_>, f64) + Send>;
pub(crate) type DrawFn = Box<dyn FnMut(&mut DrawContext<'_>)>;
pub(crate) type DeinitFn = Box<dyn FnMut(&mut DrawContext<'_>)>;
pub(crate) type SyncFn = Box<dyn FnMut() + Send>;
pub(crate) type KeyFn = Box<dyn FnMut(&Control<'_>, KeyEvent)>;
pub(crate) type CursorFn = Box<dyn FnMut(&Control<'_>, f64, f64)>;
pub(crate) type MouseFn = Box<dyn FnMut(&Control<'_>, MouseEvent)>;
pub(crate) type ScrollFn = Box<dyn FnMut(&Control<'_>, f64, f64)>;
pub(crate) type JoystickFn = Box<dyn FnMut(&Control<'_>, &mut dyn JoystickSource)>;

/// The registered lifecycle hooks.
#[derive(Default)]
pub(crate) struct Callbacks {
    pub init: Option<InitFn>,
    pub update: Option<UpdateFn>,
    pub draw: Option<DrawFn>,
    pub deinit: Option<DeinitFn>,
    pub sync: Option<SyncFn>,
    pub key: Option<KeyFn>,
    pub cursor: Option<CursorFn>,
    pub mouse_button: Option<MouseFn>,
    pub scroll: Option<ScrollFn>,
    pub joystick: Option<JoystickFn>,
}

/// Handle given to input callbacks: read shared state, request shutdown.
pub struct Control<'a> {
    pub(crate) shared: &'a SharedState,
}

impl Control<'_> {
    /// Current viewport snapshot.
    pub fn viewport(&self) -> Viewport {
        self.shared.viewport()
    }

    /// Request shutdown.
    pub fn quit(&self) {
        self.shared.quit();
    }
}

/// Render-thread context handed to Init, Draw, and DeInit.
pub struct DrawContext<'a> {
    /// The texture cache.
    pub textures: &'a mut TextureCache,
    pub(crate) sprites: &'a SpriteRegistry,
    pub(crate) shared: &'a SharedState,
    pub(crate) window: &'a mut dyn WindowBackend,
}

impl DrawContext<'_> {
    /// Current viewport snapshot.
    pub fn viewport(&self) -> Viewport {
        self.shared.viewport()
    }

    /// Request shutdown.
    pub fn quit(&self) {
        self.shared.quit();
    }

    /// The sprite registry.
    pub fn sprites(&self) -> &SpriteRegistry {
        self.sprites
    }

    /// Create a sprite over a region of `texture`, loading (or taking a
    /// reference to) the texture.
    pub fn make_sprite(
        &mut self,
        sheet_x: f32,
        sheet_y: f32,
        width: f32,
        height: f32,
        texture: &str,
    ) -> Result<SpriteKey, TextureError> {
        self.textures.load_or_get(texture, &LoadParams::default())?;
        Ok(self.sprites.insert(Sprite {
            texture: texture.to_owned(),
            sheet_x,
            sheet_y,
            width,
            height,
            angle: 0.0,
        }))
    }

    /// Free a sprite and release its texture reference.
    ///
    /// Freeing a key twice is a no-op.
    pub fn delete_sprite(&mut self, key: SpriteKey) {
        if let Some(sprite) = self.sprites.remove(key) {
            // The cache logs a warning itself if the texture vanished
            // before the sprite did.
            let _ = self.textures.release(&sprite.texture);
        }
    }

    /// Clone of a registered sprite.
    pub fn sprite(&self, key: SpriteKey) -> Option<Sprite> {
        self.sprites.get(key)
    }

    /// Show or hide the cursor.
    pub fn show_cursor(&mut self, show: bool) {
        self.window.show_cursor(show);
    }

    /// Whether a joystick is plugged into `id`.
    ///
    /// Safe to call here in the single-threaded model; other models should
    /// poll from the joystick callback instead.
    pub fn joystick_present(&mut self, id: JoystickId) -> bool {
        self.window.joystick_present(id)
    }

    /// Snapshot of a joystick's axes and buttons.
    pub fn poll_joystick(&mut self, id: JoystickId) -> Option<JoystickState> {
        self.window.poll_joystick(id)
    }
}

/// Update context: shared state only.
///
/// Deliberately carries no texture, sprite, or window access — in the
/// fully multithreaded model Update runs off the render thread, and the
/// texture cache is single-writer by contract.
pub struct UpdateContext<'a> {
    pub(crate) shared: &'a SharedState,
}

impl UpdateContext<'_> {
    /// Current viewport snapshot.
    pub fn viewport(&self) -> Viewport {
        self.shared.viewport()
    }

    /// Request shutdown.
    pub fn quit(&self) {
        self.shared.quit();
    }
}

//! Sprite demo exercising the engine end to end.
//!
//! A sprite tracks the cursor, the mouse buttons and scroll wheel change
//! how it would be blitted, a joystick steers a second position, and
//! escape quits. Rendering runs against the headless device, so this also
//! works on machines without a usable GPU; swap in a real device
//! implementation to see pixels.

use std::sync::atomic::{AtomicI32, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use blit_engine::prelude::*;

/// Cross-thread f32, stored as bits.
///
/// Each value lives in its own atomic. Two related values updated through
/// two atomics are NOT updated atomically as a pair; draw-side readers may
/// see one new and one old. That is fine here, where every field is
/// independently meaningful — values that must change together belong
/// behind one mutex instead.
struct SharedF32(AtomicU32);

impl SharedF32 {
    fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn set(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    blit_engine::foundation::logging::init();

    let mut config = EngineConfig::default();
    config.window = WindowConfig {
        title: "Sprite Demo".to_string(),
        width: 1280,
        height: 720,
        mode: WindowMode::Decorated,
        vsync: true,
    };
    config.textures.search_path = "assets".into();

    let mut engine = Engine::new(
        config,
        Box::new(GlfwWindowSystem),
        Box::new(HeadlessDevice::new()),
    );

    let angle = Arc::new(SharedF32::new(0.0));
    let cursor_x = Arc::new(SharedF32::new(640.0));
    let cursor_y = Arc::new(SharedF32::new(360.0));
    let scale_left = Arc::new(SharedF32::new(2.0));
    let scale_right = Arc::new(SharedF32::new(2.0));
    let locator = Arc::new(AtomicI32::new(0));
    let pad_x = Arc::new(SharedF32::new(0.0));
    let sprite_key: Arc<Mutex<Option<SpriteKey>>> = Arc::new(Mutex::new(None));

    {
        let sprite_key = Arc::clone(&sprite_key);
        engine.set_init(move |ctx| {
            ctx.show_cursor(false);
            match ctx.make_sprite(324.0, 140.0, 46.0, 46.0, "spritesheet.png") {
                Ok(key) => *sprite_key.lock().unwrap() = Some(key),
                // A missing sheet is not fatal; the demo just runs bare.
                Err(err) => log::warn!("no sprite this run: {err}"),
            }
        });
    }

    {
        let angle = Arc::clone(&angle);
        engine.set_update(move |_ctx, seconds| {
            let mut next = angle.get() + (seconds as f32) * 60.0f32.to_radians();
            while next > std::f32::consts::TAU {
                next -= std::f32::consts::TAU;
            }
            angle.set(next);
        });
    }

    {
        let angle = Arc::clone(&angle);
        let cursor_x = Arc::clone(&cursor_x);
        let cursor_y = Arc::clone(&cursor_y);
        let scale_left = Arc::clone(&scale_left);
        let scale_right = Arc::clone(&scale_right);
        let locator = Arc::clone(&locator);
        let pad_x = Arc::clone(&pad_x);
        let sprite_key = Arc::clone(&sprite_key);
        engine.set_draw(move |ctx| {
            let Some(key) = *sprite_key.lock().unwrap() else {
                return;
            };
            let _ = ctx.sprites().with_sprite(key, |sprite| sprite.angle = angle.get());
            let Some(sprite) = ctx.sprite(key) else {
                return;
            };

            // Bind for the quad submissions a real renderer would do here.
            let _ = ctx.textures.bind(&sprite.texture, 0);

            let viewport = ctx.viewport();
            let wheel_y = viewport.height / 2.0 + 20.0 * locator.load(Ordering::Relaxed) as f32;
            let pad_pos = viewport.width / 4.0 + pad_x.get();
            log::trace!(
                "blit {} at cursor ({}, {}) scale ({}, {}) wheel y {} pad x {}",
                sprite.texture,
                cursor_x.get(),
                cursor_y.get(),
                scale_left.get(),
                scale_right.get(),
                wheel_y,
                pad_pos,
            );
        });
    }

    {
        let cursor_x = Arc::clone(&cursor_x);
        let cursor_y = Arc::clone(&cursor_y);
        engine.set_cursor_handler(move |control, x, y| {
            let viewport = control.viewport();
            // Scale physical cursor coordinates into logical space, and
            // flip y so the origin sits at the bottom-left.
            cursor_x.set(x as f32 * viewport.width / viewport.true_width);
            cursor_y.set(
                (viewport.true_height - y as f32) * viewport.height / viewport.true_height,
            );
        });
    }

    {
        let scale_left = Arc::clone(&scale_left);
        let scale_right = Arc::clone(&scale_right);
        engine.set_mouse_button_handler(move |_control, event| {
            let scale = match event.button {
                MouseButton::Left => &scale_left,
                MouseButton::Right => &scale_right,
                _ => return,
            };
            match event.action {
                Action::Press => scale.set(0.5),
                Action::Release => scale.set(2.0),
                Action::Repeat => {}
            }
        });
    }

    {
        let locator = Arc::clone(&locator);
        engine.set_scroll_handler(move |_control, _dx, dy| {
            if dy > 0.0 {
                let _ = locator.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
                    Some((v + 1).min(10))
                });
            } else if dy < 0.0 {
                let _ = locator.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
                    Some((v - 1).max(-10))
                });
            }
        });
    }

    {
        let pad_x = Arc::clone(&pad_x);
        engine.set_joystick_handler(move |control, pads| {
            if let Some(state) = pads.poll_joystick(JoystickId(0)) {
                if let Some(axis) = state.axes.first() {
                    pad_x.set(axis * 100.0);
                }
                // Back button quits.
                if state.buttons.get(6).copied().unwrap_or(false) {
                    control.quit();
                }
            }
        });
    }

    engine.set_key_handler(|control, event| {
        if event.key == Key::Escape && event.action == Action::Press {
            control.quit();
        }
    });

    engine.set_deinit(|_ctx| {
        log::info!("demo shutting down");
    });

    engine.run(ThreadModel::FullyMultithreaded)?;
    Ok(())
}

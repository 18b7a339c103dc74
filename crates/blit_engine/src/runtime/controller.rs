//! The execution controller
//!
//! [`Engine`] owns the window, the texture cache, the sprite registry, the
//! registered callbacks, and the published cross-thread state, and runs
//! them under one of three threading models. `run` is the program's event
//! loop: it blocks the caller until shutdown completes.

use std::sync::{mpsc, Arc};
use std::thread;

use thiserror::Error;

use crate::assets::image_loader::{FileDecoder, ImageDecoder};
use crate::core::config::EngineConfig;
use crate::foundation::time::{FixedStep, FrameClock};
use crate::input::{JoystickSource, KeyEvent, MouseEvent};
use crate::render::device::TextureDevice;
use crate::render::sprite::SpriteRegistry;
use crate::render::texture_cache::TextureCache;
use crate::window::backend::{WindowBackend, WindowSystem};
use crate::window::{WindowError, WindowEvent};

use super::callbacks::{Callbacks, Control, DrawContext, UpdateContext};
use super::state::{SharedState, Viewport};

/// Threading models for [`Engine::run`].
///
/// Selected once at run time; the model cannot change while the loop is
/// alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadModel {
    /// Everything — event polling, Update, Draw, the buffer swap — happens
    /// on the calling thread in strict sequence. The only model in which
    /// joystick polling may be issued from inside Update or Draw.
    SingleThreaded,

    /// Update and Draw run on the calling thread as in the single-threaded
    /// model, while one long-lived worker runs the Sync callback
    /// concurrently with them each frame. The worker is spawned once and
    /// joined once at shutdown, not per frame.
    SimpleMultithreaded,

    /// Update runs on a dedicated thread at the configured fixed timestep;
    /// Draw and the buffer swap run on the calling thread at display rate.
    /// State crossing between them goes through [`SharedState`] or the
    /// caller's own atomics/locks.
    FullyMultithreaded,
}

/// Lifecycle phases of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed; `run` has not been called.
    Created,
    /// Window and context exist; Init has run.
    Initialized,
    /// The main loop is iterating.
    Running,
    /// The running flag dropped; DeInit and teardown are in progress.
    ShuttingDown,
    /// `run` has returned.
    Terminated,
}

/// Errors that abort [`Engine::run`].
#[derive(Debug, Error)]
pub enum RunError {
    /// Window or context creation failed; startup was aborted.
    #[error("window creation failed: {0}")]
    Window(#[from] WindowError),

    /// A required lifecycle hook was never registered.
    #[error("the {0} callback is required but was not set")]
    MissingCallback(&'static str),

    /// `run` was called on an engine that already ran.
    #[error("run may only be called once per engine")]
    AlreadyRan,
}

/// The engine.
///
/// Construct it, register callbacks, then call [`run`](Self::run), which
/// blocks until a quit request (or window close) completes shutdown.
///
/// Callbacks cannot be replaced after `run` starts: `run` borrows the
/// engine mutably for its whole blocking duration, so the setters are
/// simply unreachable while the loop is alive.
pub struct Engine {
    config: EngineConfig,
    window_system: Box<dyn WindowSystem>,
    textures: TextureCache,
    sprites: SpriteRegistry,
    callbacks: Callbacks,
    shared: Arc<SharedState>,
    phase: Phase,
}

impl Engine {
    /// Build an engine over the given window system and texture device,
    /// decoding images from disk.
    pub fn new(
        config: EngineConfig,
        window_system: Box<dyn WindowSystem>,
        device: Box<dyn TextureDevice>,
    ) -> Self {
        Self::with_decoder(config, window_system, device, Box::new(FileDecoder))
    }

    /// Build an engine with a custom image decoder.
    pub fn with_decoder(
        config: EngineConfig,
        window_system: Box<dyn WindowSystem>,
        device: Box<dyn TextureDevice>,
        decoder: Box<dyn ImageDecoder>,
    ) -> Self {
        log::info!(
            "creating engine ({}x{} {:?})",
            config.window.width,
            config.window.height,
            config.window.mode
        );
        let textures = TextureCache::new(device, decoder, &config.textures);
        Self {
            config,
            window_system,
            textures,
            sprites: SpriteRegistry::new(),
            callbacks: Callbacks::default(),
            shared: Arc::new(SharedState::new()),
            phase: Phase::Created,
        }
    }

    /// Set the Init hook, run once after the window opens.
    pub fn set_init(&mut self, f: impl FnMut(&mut DrawContext<'_>) + 'static) {
        self.callbacks.init = Some(Box::new(f));
    }

    /// Set the Update hook (required), called with the elapsed seconds.
    ///
    /// `Send` because the fully multithreaded model runs it on its own
    /// thread.
    pub fn set_update(&mut self, f: impl FnMut(&mut UpdateContext<'_>, f64) + Send + 'static) {
        self.callbacks.update = Some(Box::new(f));
    }

    /// Set the Draw hook (required), always run on the calling thread.
    pub fn set_draw(&mut self, f: impl FnMut(&mut DrawContext<'_>) + 'static) {
        self.callbacks.draw = Some(Box::new(f));
    }

    /// Set the DeInit hook, run once during shutdown while the window is
    /// still alive.
    pub fn set_deinit(&mut self, f: impl FnMut(&mut DrawContext<'_>) + 'static) {
        self.callbacks.deinit = Some(Box::new(f));
    }

    /// Set the Sync hook. In the simple multithreaded model it runs on the
    /// worker thread, hence `Send`.
    pub fn set_sync(&mut self, f: impl FnMut() + Send + 'static) {
        self.callbacks.sync = Some(Box::new(f));
    }

    /// Set the keyboard hook.
    pub fn set_key_handler(&mut self, f: impl FnMut(&Control<'_>, KeyEvent) + 'static) {
        self.callbacks.key = Some(Box::new(f));
    }

    /// Set the cursor-motion hook; coordinates are physical pixels.
    pub fn set_cursor_handler(&mut self, f: impl FnMut(&Control<'_>, f64, f64) + 'static) {
        self.callbacks.cursor = Some(Box::new(f));
    }

    /// Set the mouse-button hook.
    pub fn set_mouse_button_handler(
        &mut self,
        f: impl FnMut(&Control<'_>, MouseEvent) + 'static,
    ) {
        self.callbacks.mouse_button = Some(Box::new(f));
    }

    /// Set the scroll-wheel hook.
    pub fn set_scroll_handler(&mut self, f: impl FnMut(&Control<'_>, f64, f64) + 'static) {
        self.callbacks.scroll = Some(Box::new(f));
    }

    /// Set the joystick hook, run once per frame on the calling thread.
    /// The safe place to poll pads outside the single-threaded model.
    pub fn set_joystick_handler(
        &mut self,
        f: impl FnMut(&Control<'_>, &mut dyn JoystickSource) + 'static,
    ) {
        self.callbacks.joystick = Some(Box::new(f));
    }

    /// Shared handle for quitting (or reading the viewport) from other
    /// threads.
    pub fn shared(&self) -> Arc<SharedState> {
        Arc::clone(&self.shared)
    }

    /// Request shutdown. Level-triggered and idempotent; callable before
    /// `run`, in which case the loop terminates on its first check.
    pub fn quit(&self) {
        self.shared.quit();
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The texture cache, e.g. for preloading before `run`.
    pub fn textures_mut(&mut self) -> &mut TextureCache {
        &mut self.textures
    }

    /// The sprite registry.
    pub fn sprites(&self) -> &SpriteRegistry {
        &self.sprites
    }

    /// Run the blocking main loop under `model`.
    ///
    /// Creates the window, runs Init, iterates until a quit request, then
    /// runs DeInit and tears down sprites, textures, and the window, in
    /// that order. Returns once shutdown completes. Calling `run` a second
    /// time is an error.
    pub fn run(&mut self, model: ThreadModel) -> Result<(), RunError> {
        if self.phase != Phase::Created {
            return Err(RunError::AlreadyRan);
        }
        if self.callbacks.update.is_none() {
            return Err(RunError::MissingCallback("update"));
        }
        if self.callbacks.draw.is_none() {
            return Err(RunError::MissingCallback("draw"));
        }

        log::info!("starting run loop ({model:?})");
        let mut window = self.window_system.open(&self.config.window)?;
        self.publish_viewport(window.framebuffer_size());
        self.phase = Phase::Initialized;

        if let Some(init) = self.callbacks.init.as_mut() {
            init(&mut DrawContext {
                textures: &mut self.textures,
                sprites: &self.sprites,
                shared: &*self.shared,
                window: &mut *window,
            });
        }

        self.phase = Phase::Running;
        match model {
            ThreadModel::SingleThreaded => self.run_single(&mut *window),
            ThreadModel::SimpleMultithreaded => self.run_with_sync_worker(&mut *window),
            ThreadModel::FullyMultithreaded => self.run_threaded_update(&mut *window),
        }

        self.phase = Phase::ShuttingDown;
        log::info!("shutting down");
        if let Some(deinit) = self.callbacks.deinit.as_mut() {
            deinit(&mut DrawContext {
                textures: &mut self.textures,
                sprites: &self.sprites,
                shared: &*self.shared,
                window: &mut *window,
            });
        }
        self.teardown_resources();
        drop(window);
        self.phase = Phase::Terminated;
        log::info!("run loop terminated");
        Ok(())
    }

    /// Model 1: strict per-frame sequence on the calling thread.
    fn run_single(&mut self, window: &mut dyn WindowBackend) {
        let mut clock = FrameClock::start();
        while self.shared.is_running() {
            self.pump_events(window);
            let delta = clock.tick();
            if let Some(update) = self.callbacks.update.as_mut() {
                update(&mut UpdateContext { shared: &*self.shared }, delta);
            }
            self.draw_frame(window);
            if let Some(sync) = self.callbacks.sync.as_mut() {
                sync();
            }
            window.swap_buffers();
        }
    }

    /// Model 2: a long-lived worker runs Sync concurrently with
    /// Update + Draw, handshaking once per frame.
    fn run_with_sync_worker(&mut self, window: &mut dyn WindowBackend) {
        let Some(mut sync) = self.callbacks.sync.take() else {
            log::warn!("simple multithreaded model without a sync callback; running sequentially");
            self.run_single(window);
            return;
        };

        let (tick_tx, tick_rx) = mpsc::channel::<()>();
        let (done_tx, done_rx) = mpsc::channel::<()>();

        thread::scope(|scope| {
            let worker = scope.spawn(move || {
                while tick_rx.recv().is_ok() {
                    sync();
                    if done_tx.send(()).is_err() {
                        break;
                    }
                }
                sync
            });

            let mut clock = FrameClock::start();
            while self.shared.is_running() {
                self.pump_events(window);
                let delta = clock.tick();
                if tick_tx.send(()).is_err() {
                    // Worker died (sync panicked); stop cleanly.
                    self.shared.quit();
                    break;
                }
                if let Some(update) = self.callbacks.update.as_mut() {
                    update(&mut UpdateContext { shared: &*self.shared }, delta);
                }
                self.draw_frame(window);
                // The frame is not complete until the worker reports in.
                if done_rx.recv().is_err() {
                    self.shared.quit();
                    break;
                }
                window.swap_buffers();
            }

            drop(tick_tx);
            match worker.join() {
                Ok(sync) => self.callbacks.sync = Some(sync),
                Err(_) => log::error!("sync worker panicked; its callback is lost"),
            }
        });
    }

    /// Model 3: Update on a dedicated fixed-step thread, Draw at display
    /// rate on the calling thread.
    fn run_threaded_update(&mut self, window: &mut dyn WindowBackend) {
        // Checked in run().
        let Some(mut update) = self.callbacks.update.take() else {
            return;
        };
        let shared = Arc::clone(&self.shared);
        let step = self.config.timing.fixed_timestep;

        thread::scope(|scope| {
            let updater = scope.spawn(move || {
                let mut pacer = FixedStep::new(step);
                let delta = pacer.step_seconds();
                let mut context = UpdateContext { shared: &*shared };
                while shared.is_running() {
                    update(&mut context, delta);
                    pacer.wait();
                }
                update
            });

            while self.shared.is_running() {
                self.pump_events(window);
                self.draw_frame(window);
                if let Some(sync) = self.callbacks.sync.as_mut() {
                    sync();
                }
                window.swap_buffers();
            }

            match updater.join() {
                Ok(update) => self.callbacks.update = Some(update),
                Err(_) => log::error!("update thread panicked; its callback is lost"),
            }
        });
    }

    /// Drain window events into the input callbacks and the published
    /// state.
    fn pump_events(&mut self, window: &mut dyn WindowBackend) {
        for event in window.poll_events() {
            match event {
                WindowEvent::Key(event) => {
                    if let Some(handler) = self.callbacks.key.as_mut() {
                        handler(&Control { shared: &*self.shared }, event);
                    }
                }
                WindowEvent::CursorMoved { x, y } => {
                    if let Some(handler) = self.callbacks.cursor.as_mut() {
                        handler(&Control { shared: &*self.shared }, x, y);
                    }
                }
                WindowEvent::MouseButton(event) => {
                    if let Some(handler) = self.callbacks.mouse_button.as_mut() {
                        handler(&Control { shared: &*self.shared }, event);
                    }
                }
                WindowEvent::Scroll { dx, dy } => {
                    if let Some(handler) = self.callbacks.scroll.as_mut() {
                        handler(&Control { shared: &*self.shared }, dx, dy);
                    }
                }
                WindowEvent::FramebufferResized { width, height } => {
                    self.publish_viewport((width, height));
                }
                WindowEvent::CloseRequested => self.shared.quit(),
            }
        }
        if window.should_close() {
            self.shared.quit();
        }
    }

    /// Invoke Draw, then the joystick hook, on the calling thread.
    fn draw_frame(&mut self, window: &mut dyn WindowBackend) {
        if let Some(draw) = self.callbacks.draw.as_mut() {
            draw(&mut DrawContext {
                textures: &mut self.textures,
                sprites: &self.sprites,
                shared: &*self.shared,
                window: &mut *window,
            });
        }
        if let Some(joystick) = self.callbacks.joystick.as_mut() {
            let control = Control { shared: &*self.shared };
            joystick(&control, &mut *window);
        }
    }

    fn publish_viewport(&self, physical: (u32, u32)) {
        let logical = self.config.window.mode.logical_size(physical);
        self.shared.set_viewport(Viewport::new(logical, physical));
        log::debug!(
            "viewport now {}x{} logical, {}x{} physical",
            logical.0,
            logical.1,
            physical.0,
            physical.1
        );
    }

    /// Sprites release their texture references, then the cache destroys
    /// whatever is left.
    fn teardown_resources(&mut self) {
        for sprite in self.sprites.drain() {
            let _ = self.textures.release(&sprite.texture);
        }
        self.textures.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::path::Path;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::assets::image_loader::{ImageData, ImageError};
    use crate::core::config::{TimingConfig, WindowConfig, WindowMode};
    use crate::input::{Action, JoystickId, JoystickState, Key, Modifiers};
    use crate::render::headless::HeadlessDevice;

    /// Shared script/recording for a fake window.
    #[derive(Default)]
    struct WindowLog {
        /// Batches handed out by successive poll_events calls.
        events: VecDeque<Vec<WindowEvent>>,
        swaps: usize,
        joystick: Option<JoystickState>,
    }

    struct FakeWindow {
        log: Rc<RefCell<WindowLog>>,
    }

    impl JoystickSource for FakeWindow {
        fn joystick_present(&mut self, id: JoystickId) -> bool {
            id.0 == 0 && self.log.borrow().joystick.is_some()
        }

        fn poll_joystick(&mut self, id: JoystickId) -> Option<JoystickState> {
            if id.0 == 0 {
                self.log.borrow().joystick.clone()
            } else {
                None
            }
        }
    }

    impl WindowBackend for FakeWindow {
        fn poll_events(&mut self) -> Vec<WindowEvent> {
            self.log.borrow_mut().events.pop_front().unwrap_or_default()
        }

        fn framebuffer_size(&self) -> (u32, u32) {
            (800, 600)
        }

        fn swap_buffers(&mut self) {
            self.log.borrow_mut().swaps += 1;
        }

        fn should_close(&self) -> bool {
            false
        }

        fn show_cursor(&mut self, _show: bool) {}
    }

    struct FakeWindowSystem {
        log: Rc<RefCell<WindowLog>>,
    }

    impl FakeWindowSystem {
        fn new() -> (Self, Rc<RefCell<WindowLog>>) {
            let log = Rc::new(RefCell::new(WindowLog::default()));
            (Self { log: Rc::clone(&log) }, log)
        }
    }

    impl WindowSystem for FakeWindowSystem {
        fn open(&mut self, _config: &WindowConfig) -> Result<Box<dyn WindowBackend>, WindowError> {
            Ok(Box::new(FakeWindow {
                log: Rc::clone(&self.log),
            }))
        }
    }

    struct StubDecoder;

    impl ImageDecoder for StubDecoder {
        fn decode(&self, _path: &Path) -> Result<ImageData, ImageError> {
            Ok(ImageData::solid_color(4, 4, [255, 255, 255, 255]))
        }
    }

    fn test_engine() -> (Engine, Rc<RefCell<WindowLog>>) {
        let (system, log) = FakeWindowSystem::new();
        let mut config = EngineConfig::default();
        // Keep the fully-multithreaded tests fast.
        config.timing = TimingConfig {
            fixed_timestep: Duration::from_millis(1),
        };
        let engine = Engine::with_decoder(
            config,
            Box::new(system),
            Box::new(HeadlessDevice::new()),
            Box::new(StubDecoder),
        );
        (engine, log)
    }

    #[test]
    fn test_update_and_draw_are_required() {
        let (mut engine, _log) = test_engine();
        assert!(matches!(
            engine.run(ThreadModel::SingleThreaded),
            Err(RunError::MissingCallback("update"))
        ));

        engine.set_update(|_, _| {});
        assert!(matches!(
            engine.run(ThreadModel::SingleThreaded),
            Err(RunError::MissingCallback("draw"))
        ));
    }

    #[test]
    fn test_single_threaded_order_is_update_draw_sync() {
        let (mut engine, log) = test_engine();
        let order = Arc::new(Mutex::new(Vec::new()));

        {
            let order = Arc::clone(&order);
            engine.set_update(move |_, _| order.lock().unwrap().push("update"));
        }
        {
            let order = Arc::clone(&order);
            engine.set_draw(move |ctx| {
                order.lock().unwrap().push("draw");
                // Two full frames, then stop.
                if ctx.viewport().true_width > 0.0 && order.lock().unwrap().len() >= 5 {
                    ctx.quit();
                }
            });
        }
        {
            let order = Arc::clone(&order);
            engine.set_sync(move || order.lock().unwrap().push("sync"));
        }

        engine.run(ThreadModel::SingleThreaded).unwrap();

        assert_eq!(
            *order.lock().unwrap(),
            vec!["update", "draw", "sync", "update", "draw", "sync"]
        );
        assert_eq!(log.borrow().swaps, 2);
        assert_eq!(engine.phase(), Phase::Terminated);
    }

    #[test]
    fn test_quit_before_run_terminates_on_the_first_check() {
        let (mut engine, log) = test_engine();
        let updates = Arc::new(AtomicUsize::new(0));
        let lifecycle = Arc::new(Mutex::new(Vec::new()));

        {
            let lifecycle = Arc::clone(&lifecycle);
            engine.set_init(move |_| lifecycle.lock().unwrap().push("init"));
        }
        {
            let updates = Arc::clone(&updates);
            engine.set_update(move |_, _| {
                updates.fetch_add(1, Ordering::SeqCst);
            });
        }
        engine.set_draw(|_| {});
        {
            let lifecycle = Arc::clone(&lifecycle);
            engine.set_deinit(move |_| lifecycle.lock().unwrap().push("deinit"));
        }

        // Redundant quits are harmless.
        engine.quit();
        engine.quit();
        engine.run(ThreadModel::SingleThreaded).unwrap();

        assert_eq!(updates.load(Ordering::SeqCst), 0);
        assert_eq!(log.borrow().swaps, 0);
        assert_eq!(*lifecycle.lock().unwrap(), vec!["init", "deinit"]);
        assert_eq!(engine.phase(), Phase::Terminated);
    }

    #[test]
    fn test_run_is_not_reentrant() {
        let (mut engine, _log) = test_engine();
        engine.set_update(|_, _| {});
        engine.set_draw(|ctx| ctx.quit());

        engine.run(ThreadModel::SingleThreaded).unwrap();
        assert!(matches!(
            engine.run(ThreadModel::SingleThreaded),
            Err(RunError::AlreadyRan)
        ));
    }

    #[test]
    fn test_resize_events_update_the_viewport_snapshot() {
        let (mut engine, log) = test_engine();
        log.borrow_mut().events.push_back(vec![WindowEvent::FramebufferResized {
            width: 1024,
            height: 768,
        }]);

        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let seen = Arc::clone(&seen);
            engine.set_update(move |ctx, _| {
                let viewport = ctx.viewport();
                seen.lock().unwrap().push((viewport.true_width, viewport.true_height));
            });
        }
        engine.set_draw(|ctx| ctx.quit());

        engine.run(ThreadModel::SingleThreaded).unwrap();

        // The resize arrived before the frame's update.
        assert_eq!(seen.lock().unwrap()[0], (1024.0, 768.0));
    }

    #[test]
    fn test_scaled_mode_pins_the_logical_viewport() {
        let (system, log) = FakeWindowSystem::new();
        log.borrow_mut().events.push_back(vec![WindowEvent::FramebufferResized {
            width: 2560,
            height: 1440,
        }]);

        let mut config = EngineConfig::default();
        config.window.mode = WindowMode::BorderlessScaled1080;
        let mut engine = Engine::with_decoder(
            config,
            Box::new(system),
            Box::new(HeadlessDevice::new()),
            Box::new(StubDecoder),
        );

        let seen = Arc::new(Mutex::new(None));
        {
            let seen = Arc::clone(&seen);
            engine.set_update(move |ctx, _| {
                *seen.lock().unwrap() = Some(ctx.viewport());
            });
        }
        engine.set_draw(|ctx| ctx.quit());
        engine.run(ThreadModel::SingleThreaded).unwrap();

        let viewport = seen.lock().unwrap().unwrap();
        assert_eq!((viewport.width, viewport.height), (1920.0, 1080.0));
        assert_eq!((viewport.true_width, viewport.true_height), (2560.0, 1440.0));
    }

    #[test]
    fn test_close_request_quits_after_the_current_frame() {
        let (mut engine, log) = test_engine();
        log.borrow_mut().events.push_back(vec![WindowEvent::CloseRequested]);

        engine.set_update(|_, _| {});
        engine.set_draw(|_| {});
        engine.run(ThreadModel::SingleThreaded).unwrap();

        // The iteration that observed the close still completed.
        assert_eq!(log.borrow().swaps, 1);
    }

    #[test]
    fn test_key_events_reach_the_key_handler() {
        let (mut engine, log) = test_engine();
        log.borrow_mut().events.push_back(vec![WindowEvent::Key(KeyEvent {
            key: Key::Escape,
            scancode: 9,
            action: Action::Press,
            mods: Modifiers::empty(),
        })]);

        let pressed = Arc::new(Mutex::new(None));
        {
            let pressed = Arc::clone(&pressed);
            engine.set_key_handler(move |control, event| {
                *pressed.lock().unwrap() = Some(event.key);
                if event.key == Key::Escape && event.action == Action::Press {
                    control.quit();
                }
            });
        }
        engine.set_update(|_, _| {});
        engine.set_draw(|_| {});

        engine.run(ThreadModel::SingleThreaded).unwrap();
        assert_eq!(*pressed.lock().unwrap(), Some(Key::Escape));
        assert_eq!(log.borrow().swaps, 1);
    }

    #[test]
    fn test_joystick_handler_polls_through_the_window() {
        let (mut engine, log) = test_engine();
        log.borrow_mut().joystick = Some(JoystickState {
            axes: vec![0.5, -0.25],
            buttons: vec![true, false],
        });

        let axes = Arc::new(Mutex::new(Vec::new()));
        {
            let axes = Arc::clone(&axes);
            engine.set_joystick_handler(move |control, pads| {
                if let Some(state) = pads.poll_joystick(JoystickId(0)) {
                    *axes.lock().unwrap() = state.axes;
                }
                control.quit();
            });
        }
        engine.set_update(|_, _| {});
        engine.set_draw(|_| {});

        engine.run(ThreadModel::SingleThreaded).unwrap();
        assert_eq!(*axes.lock().unwrap(), vec![0.5, -0.25]);
    }

    #[test]
    fn test_sync_worker_runs_once_per_frame() {
        let (mut engine, log) = test_engine();
        let syncs = Arc::new(AtomicUsize::new(0));
        let frames = Arc::new(AtomicUsize::new(0));

        engine.set_update(|_, _| {});
        {
            let frames = Arc::clone(&frames);
            engine.set_draw(move |ctx| {
                if frames.fetch_add(1, Ordering::SeqCst) + 1 >= 3 {
                    ctx.quit();
                }
            });
        }
        {
            let syncs = Arc::clone(&syncs);
            engine.set_sync(move || {
                syncs.fetch_add(1, Ordering::SeqCst);
            });
        }

        engine.run(ThreadModel::SimpleMultithreaded).unwrap();

        assert_eq!(syncs.load(Ordering::SeqCst), 3);
        assert_eq!(log.borrow().swaps, 3);
    }

    #[test]
    fn test_fully_multithreaded_exchanges_state_through_atomics() {
        let (mut engine, log) = test_engine();
        let ticks = Arc::new(AtomicUsize::new(0));

        {
            let ticks = Arc::clone(&ticks);
            engine.set_update(move |_, _| {
                ticks.fetch_add(1, Ordering::SeqCst);
            });
        }
        {
            let ticks = Arc::clone(&ticks);
            engine.set_draw(move |ctx| {
                // Draw keeps pace with whatever Update has published.
                if ticks.load(Ordering::SeqCst) >= 3 {
                    ctx.quit();
                }
            });
        }

        engine.run(ThreadModel::FullyMultithreaded).unwrap();

        assert!(ticks.load(Ordering::SeqCst) >= 3);
        assert!(log.borrow().swaps > 0);
        assert_eq!(engine.phase(), Phase::Terminated);
    }

    #[test]
    fn test_quit_from_another_thread() {
        let (mut engine, _log) = test_engine();
        engine.set_update(|_, _| {});
        engine.set_draw(|_| {});

        let shared = engine.shared();
        let quitter = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            shared.quit();
        });

        engine.run(ThreadModel::FullyMultithreaded).unwrap();
        quitter.join().unwrap();
        assert_eq!(engine.phase(), Phase::Terminated);
    }

    #[test]
    fn test_teardown_releases_sprites_and_textures() {
        let (mut engine, _log) = test_engine();

        engine.set_init(|ctx| {
            ctx.make_sprite(0.0, 0.0, 16.0, 16.0, "sheet.png").unwrap();
            ctx.make_sprite(16.0, 0.0, 16.0, 16.0, "sheet.png").unwrap();
        });
        engine.set_update(|_, _| {});
        engine.set_draw(|ctx| ctx.quit());

        engine.run(ThreadModel::SingleThreaded).unwrap();

        assert!(engine.sprites().is_empty());
        assert!(engine.textures_mut().is_empty());
    }

    #[test]
    fn test_delete_sprite_is_idempotent_and_releases_the_texture() {
        let (mut engine, _log) = test_engine();
        let key_slot = Arc::new(Mutex::new(None));

        {
            let key_slot = Arc::clone(&key_slot);
            engine.set_init(move |ctx| {
                let key = ctx.make_sprite(0.0, 0.0, 8.0, 8.0, "sheet.png").unwrap();
                *key_slot.lock().unwrap() = Some(key);
            });
        }
        engine.set_update(|_, _| {});
        {
            let key_slot = Arc::clone(&key_slot);
            engine.set_draw(move |ctx| {
                let key = key_slot.lock().unwrap().unwrap();
                ctx.delete_sprite(key);
                ctx.delete_sprite(key);
                assert!(ctx.sprite(key).is_none());
                ctx.quit();
            });
        }

        engine.run(ThreadModel::SingleThreaded).unwrap();
        assert!(engine.textures_mut().is_empty());
    }
}

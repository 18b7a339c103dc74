//! Input types delivered to the user callbacks.
//!
//! The engine maps whatever the window backend reports into these types so
//! callback signatures never depend on a particular windowing library.

use bitflags::bitflags;

/// Key codes.
///
/// Keys without a dedicated variant arrive as [`Key::Other`] carrying the
/// backend's raw code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Any other key, identified by the backend's raw key code
    Other(i32),
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
    /// Any other button, by index
    Other(u8),
}

/// Press state carried by key and mouse events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The key or button went down.
    Press,
    /// The key or button came up.
    Release,
    /// A held key auto-repeated.
    Repeat,
}

bitflags! {
    /// Modifier keys held during an input event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Modifiers: u32 {
        /// Either shift key.
        const SHIFT = 1;
        /// Either control key.
        const CONTROL = 1 << 1;
        /// Either alt key.
        const ALT = 1 << 2;
        /// Either super/logo key.
        const SUPER = 1 << 3;
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy)]
pub struct KeyEvent {
    /// The key
    pub key: Key,
    /// Platform scancode
    pub scancode: i32,
    /// Press, release, or repeat
    pub action: Action,
    /// Modifiers held at the time
    pub mods: Modifiers,
}

/// A mouse button event.
#[derive(Debug, Clone, Copy)]
pub struct MouseEvent {
    /// The button
    pub button: MouseButton,
    /// Press or release
    pub action: Action,
    /// Modifiers held at the time
    pub mods: Modifiers,
}

/// Index of a joystick slot. Backends support slots 0 through 15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JoystickId(pub u8);

/// Snapshot of a joystick's axes and buttons.
///
/// The buffers are owned copies taken at poll time, safe to keep across
/// frames or hand to another thread.
#[derive(Debug, Clone, Default)]
pub struct JoystickState {
    /// Axis positions, each in -1.0..=1.0
    pub axes: Vec<f32>,
    /// Button states, true while pressed
    pub buttons: Vec<bool>,
}

/// Joystick polling, implemented by the window backend.
///
/// Outside the single-threaded model, poll only from the dedicated
/// joystick callback or other main-thread code.
pub trait JoystickSource {
    /// Whether a joystick is plugged into `id`.
    fn joystick_present(&mut self, id: JoystickId) -> bool;

    /// Snapshot of the joystick's axes and buttons, or `None` when it is
    /// not plugged in.
    fn poll_joystick(&mut self, id: JoystickId) -> Option<JoystickState>;
}

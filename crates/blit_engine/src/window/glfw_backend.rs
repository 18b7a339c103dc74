//! Window management using GLFW

use glfw::Context;

use crate::core::config::{WindowConfig, WindowMode};
use crate::input::{
    Action, JoystickId, JoystickSource, JoystickState, Key, KeyEvent, Modifiers, MouseButton,
    MouseEvent,
};

use super::backend::{WindowBackend, WindowSystem};
use super::{WindowError, WindowEvent};

/// Window system backed by the `glfw` crate.
#[derive(Debug, Default)]
pub struct GlfwWindowSystem;

impl WindowSystem for GlfwWindowSystem {
    fn open(&mut self, config: &WindowConfig) -> Result<Box<dyn WindowBackend>, WindowError> {
        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|e| WindowError::InitFailed(e.to_string()))?;

        glfw.window_hint(glfw::WindowHint::Resizable(true));
        let decorated = matches!(
            config.mode,
            WindowMode::Decorated | WindowMode::DecoratedScaled1080
        );
        glfw.window_hint(glfw::WindowHint::Decorated(decorated));

        let created = if decorated {
            glfw.create_window(
                config.width,
                config.height,
                &config.title,
                glfw::WindowMode::Windowed,
            )
        } else {
            // Fullscreen variants take over the primary monitor at its
            // current video mode.
            glfw.with_primary_monitor(|glfw, monitor| {
                monitor.and_then(|monitor| {
                    let (width, height) = monitor
                        .get_video_mode()
                        .map_or((config.width, config.height), |mode| {
                            (mode.width, mode.height)
                        });
                    glfw.create_window(
                        width,
                        height,
                        &config.title,
                        glfw::WindowMode::FullScreen(monitor),
                    )
                })
            })
        };
        let (mut window, events) = created
            .ok_or_else(|| WindowError::CreationFailed("glfw returned no window".to_string()))?;

        window.set_key_polling(true);
        window.set_cursor_pos_polling(true);
        window.set_mouse_button_polling(true);
        window.set_scroll_polling(true);
        window.set_framebuffer_size_polling(true);
        window.set_close_polling(true);

        window.make_current();
        glfw.set_swap_interval(if config.vsync {
            glfw::SwapInterval::Sync(1)
        } else {
            glfw::SwapInterval::None
        });

        log::info!(
            "opened {}x{} window ({:?})",
            window.get_framebuffer_size().0,
            window.get_framebuffer_size().1,
            config.mode
        );
        Ok(Box::new(GlfwWindow {
            glfw,
            window,
            events,
        }))
    }
}

struct GlfwWindow {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

impl WindowBackend for GlfwWindow {
    fn poll_events(&mut self) -> Vec<WindowEvent> {
        self.glfw.poll_events();
        glfw::flush_messages(&self.events)
            .filter_map(|(_, event)| map_event(event))
            .collect()
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_framebuffer_size();
        (width as u32, height as u32)
    }

    fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    fn should_close(&self) -> bool {
        self.window.should_close()
    }

    fn show_cursor(&mut self, show: bool) {
        self.window.set_cursor_mode(if show {
            glfw::CursorMode::Normal
        } else {
            glfw::CursorMode::Hidden
        });
    }
}

impl JoystickSource for GlfwWindow {
    fn joystick_present(&mut self, id: JoystickId) -> bool {
        joystick_slot(id).is_some_and(|slot| self.glfw.get_joystick(slot).is_present())
    }

    fn poll_joystick(&mut self, id: JoystickId) -> Option<JoystickState> {
        let joystick = self.glfw.get_joystick(joystick_slot(id)?);
        if !joystick.is_present() {
            return None;
        }
        let axes = joystick.get_axes();
        let buttons = joystick
            .get_buttons()
            .into_iter()
            .map(|state| state == glfw::Action::Press as i32)
            .collect();
        Some(JoystickState { axes, buttons })
    }
}

fn joystick_slot(id: JoystickId) -> Option<glfw::JoystickId> {
    use glfw::JoystickId as Slot;
    const SLOTS: [Slot; 16] = [
        Slot::Joystick1,
        Slot::Joystick2,
        Slot::Joystick3,
        Slot::Joystick4,
        Slot::Joystick5,
        Slot::Joystick6,
        Slot::Joystick7,
        Slot::Joystick8,
        Slot::Joystick9,
        Slot::Joystick10,
        Slot::Joystick11,
        Slot::Joystick12,
        Slot::Joystick13,
        Slot::Joystick14,
        Slot::Joystick15,
        Slot::Joystick16,
    ];
    SLOTS.get(id.0 as usize).copied()
}

fn map_event(event: glfw::WindowEvent) -> Option<WindowEvent> {
    match event {
        glfw::WindowEvent::Key(key, scancode, action, mods) => {
            Some(WindowEvent::Key(KeyEvent {
                key: map_key(key),
                scancode,
                action: map_action(action),
                mods: map_mods(mods),
            }))
        }
        glfw::WindowEvent::CursorPos(x, y) => Some(WindowEvent::CursorMoved { x, y }),
        glfw::WindowEvent::MouseButton(button, action, mods) => {
            Some(WindowEvent::MouseButton(MouseEvent {
                button: map_button(button),
                action: map_action(action),
                mods: map_mods(mods),
            }))
        }
        glfw::WindowEvent::Scroll(dx, dy) => Some(WindowEvent::Scroll { dx, dy }),
        glfw::WindowEvent::FramebufferSize(width, height) => {
            Some(WindowEvent::FramebufferResized {
                width: width as u32,
                height: height as u32,
            })
        }
        glfw::WindowEvent::Close => Some(WindowEvent::CloseRequested),
        _ => None,
    }
}

fn map_action(action: glfw::Action) -> Action {
    match action {
        glfw::Action::Press => Action::Press,
        glfw::Action::Release => Action::Release,
        glfw::Action::Repeat => Action::Repeat,
    }
}

fn map_mods(mods: glfw::Modifiers) -> Modifiers {
    let mut out = Modifiers::empty();
    if mods.contains(glfw::Modifiers::Shift) {
        out |= Modifiers::SHIFT;
    }
    if mods.contains(glfw::Modifiers::Control) {
        out |= Modifiers::CONTROL;
    }
    if mods.contains(glfw::Modifiers::Alt) {
        out |= Modifiers::ALT;
    }
    if mods.contains(glfw::Modifiers::Super) {
        out |= Modifiers::SUPER;
    }
    out
}

fn map_button(button: glfw::MouseButton) -> MouseButton {
    match button {
        glfw::MouseButton::Button1 => MouseButton::Left,
        glfw::MouseButton::Button2 => MouseButton::Right,
        glfw::MouseButton::Button3 => MouseButton::Middle,
        other => MouseButton::Other(other as u8),
    }
}

fn map_key(key: glfw::Key) -> Key {
    match key {
        glfw::Key::A => Key::A,
        glfw::Key::B => Key::B,
        glfw::Key::C => Key::C,
        glfw::Key::D => Key::D,
        glfw::Key::E => Key::E,
        glfw::Key::F => Key::F,
        glfw::Key::G => Key::G,
        glfw::Key::H => Key::H,
        glfw::Key::I => Key::I,
        glfw::Key::J => Key::J,
        glfw::Key::K => Key::K,
        glfw::Key::L => Key::L,
        glfw::Key::M => Key::M,
        glfw::Key::N => Key::N,
        glfw::Key::O => Key::O,
        glfw::Key::P => Key::P,
        glfw::Key::Q => Key::Q,
        glfw::Key::R => Key::R,
        glfw::Key::S => Key::S,
        glfw::Key::T => Key::T,
        glfw::Key::U => Key::U,
        glfw::Key::V => Key::V,
        glfw::Key::W => Key::W,
        glfw::Key::X => Key::X,
        glfw::Key::Y => Key::Y,
        glfw::Key::Z => Key::Z,
        glfw::Key::Space => Key::Space,
        glfw::Key::Enter => Key::Enter,
        glfw::Key::Escape => Key::Escape,
        glfw::Key::Up => Key::Up,
        glfw::Key::Down => Key::Down,
        glfw::Key::Left => Key::Left,
        glfw::Key::Right => Key::Right,
        other => Key::Other(other as i32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_mapping_covers_the_core_events() {
        let mapped = map_event(glfw::WindowEvent::Key(
            glfw::Key::Escape,
            9,
            glfw::Action::Press,
            glfw::Modifiers::Shift,
        ));
        match mapped {
            Some(WindowEvent::Key(event)) => {
                assert_eq!(event.key, Key::Escape);
                assert_eq!(event.action, Action::Press);
                assert!(event.mods.contains(Modifiers::SHIFT));
            }
            other => panic!("unexpected mapping: {other:?}"),
        }

        assert!(matches!(
            map_event(glfw::WindowEvent::Close),
            Some(WindowEvent::CloseRequested)
        ));
        assert!(matches!(
            map_event(glfw::WindowEvent::FramebufferSize(640, 480)),
            Some(WindowEvent::FramebufferResized { width: 640, height: 480 })
        ));
        // Events the engine does not route are dropped.
        assert!(map_event(glfw::WindowEvent::Refresh).is_none());
    }

    #[test]
    fn test_unmapped_keys_keep_their_raw_code() {
        let key = map_key(glfw::Key::F1);
        assert_eq!(key, Key::Other(glfw::Key::F1 as i32));
    }

    #[test]
    fn test_joystick_slots_stop_at_sixteen() {
        assert!(joystick_slot(JoystickId(0)).is_some());
        assert!(joystick_slot(JoystickId(15)).is_some());
        assert!(joystick_slot(JoystickId(16)).is_none());
    }
}

use ::winit::dpi::{PhysicalPosition, PhysicalSize};
use ::winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use ::winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use ::winit::window::Window;

use crate::input::{ButtonState, Event, Key, KeyState, Modifiers, MouseButton, MouseWheelDelta};

/// Translates winit `WindowEvent`s into engine [`Event`]s.
///
/// Tracks modifier state and the last pointer position so button and wheel
/// events can carry them.
#[derive(Debug, Default)]
pub struct EventTranslator {
    modifiers: Modifiers,
    pointer: (f32, f32),
}

impl EventTranslator {
    /// Returns `None` for events the engine does not represent.
    pub fn translate(&mut self, window: &Window, event: &WindowEvent) -> Option<Event> {
        match event {
            WindowEvent::CloseRequested => Some(Event::Quit),

            WindowEvent::Resized(size) => {
                let (width, height) = to_logical_size(window, *size);
                Some(Event::Resized { width, height })
            }

            WindowEvent::ModifiersChanged(m) => {
                let ms: ModifiersState = m.state();
                self.modifiers = map_modifiers(ms);
                None
            }

            WindowEvent::Focused(f) => Some(Event::Focused(*f)),

            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = to_logical_f32(window, *position);
                self.pointer = (x, y);
                Some(Event::PointerMoved { x, y })
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let (x, y) = self.pointer;
                Some(Event::PointerButton {
                    button: map_mouse_button(*button),
                    state: match state {
                        ElementState::Pressed => ButtonState::Pressed,
                        ElementState::Released => ButtonState::Released,
                    },
                    x,
                    y,
                    modifiers: self.modifiers,
                })
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(x, y) => MouseWheelDelta::Line { x: *x, y: *y },
                    MouseScrollDelta::PixelDelta(p) => {
                        let (x, y) = to_logical_f32(window, *p);
                        MouseWheelDelta::Pixel { x, y }
                    }
                };
                Some(Event::MouseWheel { delta, modifiers: self.modifiers })
            }

            WindowEvent::KeyboardInput { event, .. } => Some(Event::Key {
                key: map_key(event.physical_key),
                state: match event.state {
                    ElementState::Pressed => KeyState::Pressed,
                    ElementState::Released => KeyState::Released,
                },
                modifiers: self.modifiers,
                repeat: event.repeat,
            }),

            _ => None,
        }
    }
}

/// Logical size of a physical drawable size, rounded to whole pixels.
pub fn to_logical_size(window: &Window, size: PhysicalSize<u32>) -> (u32, u32) {
    let logical = size.to_logical::<f64>(window.scale_factor());
    (logical.width.round() as u32, logical.height.round() as u32)
}

fn to_logical_f32(window: &Window, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let logical = pos.to_logical::<f64>(window.scale_factor());
    (logical.x as f32, logical.y as f32)
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

fn map_key(pk: PhysicalKey) -> Key {
    let PhysicalKey::Code(code) = pk else {
        return Key::Unknown(0);
    };

    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Space => Key::Space,

        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,

        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
        KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
        KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,

        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,

        KeyCode::Digit0 => Key::Digit0,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Digit4 => Key::Digit4,
        KeyCode::Digit5 => Key::Digit5,
        KeyCode::Digit6 => Key::Digit6,
        KeyCode::Digit7 => Key::Digit7,
        KeyCode::Digit8 => Key::Digit8,
        KeyCode::Digit9 => Key::Digit9,

        other => Key::Unknown(other as u32),
    }
}

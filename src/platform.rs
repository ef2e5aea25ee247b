//! winit glue: turns window events into the editor's own [`Event`]s.

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

use crate::event::{Event, Key, Modifiers, MouseButton, WheelAxis};
use crate::geometry::{Vec2i, Vec2u};

/// Pixel-precise wheels (touchpads) report pixels; this many make one notch.
const PIXELS_PER_LINE: f64 = 20.0;

const LETTERS: [KeyCode; 26] = [
    KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE,
    KeyCode::KeyF, KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ,
    KeyCode::KeyK, KeyCode::KeyL, KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO,
    KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR, KeyCode::KeyS, KeyCode::KeyT,
    KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX, KeyCode::KeyY,
    KeyCode::KeyZ,
];

const DIGITS: [KeyCode; 10] = [
    KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
    KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
];

pub fn map_key(code: KeyCode) -> Key {
    if let Some(i) = LETTERS.iter().position(|k| *k == code) {
        return Key::Char((b'a' + i as u8) as char);
    }
    if let Some(i) = DIGITS.iter().position(|k| *k == code) {
        return Key::Char((b'0' + i as u8) as char);
    }
    match code {
        KeyCode::Minus | KeyCode::NumpadSubtract => Key::Char('-'),
        KeyCode::Equal | KeyCode::NumpadAdd => Key::Char('='),
        KeyCode::BracketLeft => Key::Char('['),
        KeyCode::BracketRight => Key::Char(']'),
        KeyCode::Delete | KeyCode::Backspace => Key::Delete,
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        _ => Key::Other,
    }
}

pub fn map_button(button: winit::event::MouseButton) -> MouseButton {
    match button {
        winit::event::MouseButton::Left => MouseButton::Left,
        winit::event::MouseButton::Right => MouseButton::Right,
        winit::event::MouseButton::Middle => MouseButton::Middle,
        _ => MouseButton::Other,
    }
}

pub fn map_modifiers(state: ModifiersState) -> Modifiers {
    Modifiers {
        ctrl: state.control_key() || state.super_key(),
        shift: state.shift_key(),
        alt: state.alt_key(),
    }
}

/// Wheel notches along the dominant axis. Shift turns vertical scrolling
/// into horizontal.
pub fn map_wheel(delta: MouseScrollDelta, shift: bool) -> Option<(WheelAxis, f32)> {
    let (x, y) = match delta {
        MouseScrollDelta::LineDelta(x, y) => (x, y),
        MouseScrollDelta::PixelDelta(p) => ((p.x / PIXELS_PER_LINE) as f32, (p.y / PIXELS_PER_LINE) as f32),
    };
    if y != 0.0 && y.abs() >= x.abs() {
        let axis = if shift { WheelAxis::Horizontal } else { WheelAxis::Vertical };
        Some((axis, y))
    } else if x != 0.0 {
        Some((WheelAxis::Horizontal, x))
    } else {
        None
    }
}

/// Stateful translator: winit reports the cursor and modifiers separately
/// from the events that need them.
#[derive(Debug, Default)]
pub struct EventTranslator {
    cursor: Vec2i,
    modifiers: Modifiers,
}

impl EventTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Vec2i {
        self.cursor
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Option<Event> {
        match event {
            WindowEvent::CloseRequested => Some(Event::Closed),
            WindowEvent::Resized(size) => Some(Event::Resized {
                size: Vec2u::new(size.width, size.height),
            }),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = to_vec2i(*position);
                Some(Event::MouseMoved { pos: self.cursor })
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = map_button(*button);
                let pos = self.cursor;
                Some(match state {
                    ElementState::Pressed => Event::MouseButtonPressed { button, pos },
                    ElementState::Released => Event::MouseButtonReleased { button, pos },
                })
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (axis, delta) = map_wheel(*delta, self.modifiers.shift)?;
                Some(Event::MouseWheelScrolled { axis, delta, pos: self.cursor })
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = map_modifiers(modifiers.state());
                None
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return None;
                };
                let key = map_key(code);
                let modifiers = self.modifiers;
                Some(match event.state {
                    ElementState::Pressed => Event::KeyPressed { key, modifiers },
                    ElementState::Released => Event::KeyReleased { key, modifiers },
                })
            }
            _ => None,
        }
    }
}

fn to_vec2i(position: PhysicalPosition<f64>) -> Vec2i {
    Vec2i::new(position.x.floor() as i32, position.y.floor() as i32)
}

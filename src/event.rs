//! Backend-independent input events.

use crate::geometry::{Vec2i, Vec2u};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelAxis {
    Vertical,
    Horizontal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Letters are lowercase, digits as-is.
    Char(char),
    Delete,
    Escape,
    Enter,
    Other,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { ctrl: false, shift: false, alt: false };
    pub const CTRL: Modifiers = Modifiers { ctrl: true, shift: false, alt: false };
}

/// One input event drained from the platform per frame. Positions are in
/// window pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    None,
    Closed,
    MouseButtonPressed { button: MouseButton, pos: Vec2i },
    MouseButtonReleased { button: MouseButton, pos: Vec2i },
    MouseMoved { pos: Vec2i },
    MouseWheelScrolled { axis: WheelAxis, delta: f32, pos: Vec2i },
    KeyPressed { key: Key, modifiers: Modifiers },
    KeyReleased { key: Key, modifiers: Modifiers },
    Resized { size: Vec2u },
}

impl Event {
    pub fn mouse_position(&self) -> Option<Vec2i> {
        match *self {
            Event::MouseButtonPressed { pos, .. }
            | Event::MouseButtonReleased { pos, .. }
            | Event::MouseMoved { pos }
            | Event::MouseWheelScrolled { pos, .. } => Some(pos),
            _ => None,
        }
    }

    pub fn is_press(&self, button: MouseButton) -> bool {
        matches!(*self, Event::MouseButtonPressed { button: b, .. } if b == button)
    }

    pub fn is_release(&self, button: MouseButton) -> bool {
        matches!(*self, Event::MouseButtonReleased { button: b, .. } if b == button)
    }
}

/// Snapshot of the draw surface the tree is updated against: its size and the
/// pointer position relative to it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub size: Vec2u,
    pub mouse: Vec2i,
}

impl Viewport {
    pub fn new(size: Vec2u) -> Self {
        Self { size, mouse: Vec2i::new(-1, -1) }
    }

    /// Tracks pointer position and surface size from an incoming event.
    pub fn observe(&mut self, event: &Event) {
        if let Some(pos) = event.mouse_position() {
            self.mouse = pos;
        }
        if let Event::Resized { size } = *event {
            self.size = size;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_tracks_events() {
        let mut viewport = Viewport::new(Vec2u::new(100, 100));
        viewport.observe(&Event::MouseMoved { pos: Vec2i::new(4, 5) });
        assert_eq!(viewport.mouse, Vec2i::new(4, 5));

        viewport.observe(&Event::KeyPressed { key: Key::Escape, modifiers: Modifiers::NONE });
        assert_eq!(viewport.mouse, Vec2i::new(4, 5));

        viewport.observe(&Event::Resized { size: Vec2u::new(30, 40) });
        assert_eq!(viewport.size, Vec2u::new(30, 40));
    }

    #[test]
    fn test_button_predicates() {
        let press = Event::MouseButtonPressed { button: MouseButton::Left, pos: Vec2i::default() };
        assert!(press.is_press(MouseButton::Left));
        assert!(!press.is_press(MouseButton::Right));
        assert!(!press.is_release(MouseButton::Left));
    }
}

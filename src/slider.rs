use std::any::Any;

use crate::action::Action;
use crate::event::{Event, MouseButton};
use crate::geometry::{Color, Rect, Vec2u};
use crate::icons::Glyph;
use crate::render::RenderTarget;
use crate::window::{UpdateContext, Window, WindowBase, WindowId};

const LABEL_W: u32 = 12;
const ICON_W: u32 = 10;
const KNOB_W: u32 = 12;

pub type ChangeHandler = Box<dyn FnMut(f32) -> Option<Box<dyn Action>>>;

/// Horizontal value slider: `[label][-][ track ][+]`.
///
/// Dragging the knob or clicking the track sets the value; the `-`/`+`
/// icons step it by `step`.
pub struct Slider {
    base: WindowBase,
    min: f32,
    max: f32,
    step: f32,
    value: f32,
    dragging: bool,
    label: Option<Glyph>,
    on_change: Option<ChangeHandler>,
}

struct Geometry {
    minus: Rect,
    track: Rect,
    plus: Rect,
}

impl Slider {
    pub fn new(id: WindowId, rect: Rect, min: f32, max: f32, value: f32) -> Self {
        Self {
            base: WindowBase::new(id, rect),
            min,
            max,
            step: 1.0,
            value: value.clamp(min, max),
            dragging: false,
            label: None,
            on_change: None,
        }
    }

    pub fn with_label(mut self, ch: char) -> Self {
        self.label = Glyph::for_char(ch);
        self
    }

    pub fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    pub fn on_change(mut self, handler: impl FnMut(f32) -> Option<Box<dyn Action>> + 'static) -> Self {
        self.on_change = Some(Box::new(handler));
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Sets the value without firing the change handler.
    pub fn set_value(&mut self, value: f32) {
        self.value = value.clamp(self.min, self.max);
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn geometry(&self) -> Geometry {
        let Rect { pos, size } = self.base.rect;
        let minus = Rect::from_xywh(pos.x + LABEL_W as i32, pos.y, ICON_W, size.y);
        let track_x = minus.right();
        let track_w = size.x.saturating_sub(LABEL_W + ICON_W * 2).max(1);
        let track = Rect::from_xywh(track_x, pos.y, track_w, size.y);
        let plus = Rect::from_xywh(track.right(), pos.y, ICON_W, size.y);
        Geometry { minus, track, plus }
    }

    fn value_from_x(&self, x: i32, track: Rect) -> f32 {
        let travel = (track.size.x as f32 - KNOB_W as f32).max(1.0);
        let t = ((x - track.pos.x) as f32 / travel).clamp(0.0, 1.0);
        self.min + t * (self.max - self.min)
    }

    fn change(&mut self, ctx: &mut UpdateContext<'_>, value: f32) {
        let value = value.clamp(self.min, self.max);
        if (value - self.value).abs() < f32::EPSILON {
            return;
        }
        self.value = value;
        if let Some(handler) = self.on_change.as_mut() {
            if let Some(action) = handler(value) {
                ctx.emit(action);
            }
        }
    }
}

impl Window for Slider {
    fn base(&self) -> &WindowBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WindowBase {
        &mut self.base
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>, event: &Event) -> bool {
        let mouse = ctx.viewport.mouse;
        let geom = self.geometry();

        if event.is_press(MouseButton::Left) {
            if geom.minus.contains(mouse) {
                self.change(ctx, self.value - self.step);
                return true;
            }
            if geom.plus.contains(mouse) {
                self.change(ctx, self.value + self.step);
                return true;
            }
            if geom.track.contains(mouse) {
                self.dragging = true;
                self.change(ctx, self.value_from_x(mouse.x, geom.track));
                return true;
            }
            return false;
        }

        if event.is_release(MouseButton::Left) && self.dragging {
            self.dragging = false;
            return true;
        }

        if let Event::MouseMoved { .. } = event {
            if self.dragging {
                self.change(ctx, self.value_from_x(mouse.x, geom.track));
                return true;
            }
        }
        self.dragging || ctx.is_hovered(self.base.rect)
    }

    fn draw(&self, target: &mut dyn RenderTarget) {
        let icon_color = Color::rgb(30, 30, 30);
        let geom = self.geometry();
        let rect = self.base.rect;

        if let Some(glyph) = self.label {
            glyph.draw_centered(target, Rect::new(rect.pos, Vec2u::new(LABEL_W, rect.size.y)), 1, icon_color);
        }
        if let Some(minus) = Glyph::for_char('-') {
            minus.draw_centered(target, geom.minus, 1, icon_color);
        }
        if let Some(plus) = Glyph::for_char('+') {
            plus.draw_centered(target, geom.plus, 1, icon_color);
        }

        target.fill_rect(geom.track, Color::rgb(200, 200, 200));
        let t = ((self.value - self.min) / (self.max - self.min)).clamp(0.0, 1.0);
        let travel = geom.track.size.x.saturating_sub(KNOB_W);
        let knob_x = geom.track.pos.x + (t * travel as f32).round() as i32;
        target.fill_rect(
            Rect::from_xywh(knob_x, geom.track.pos.y, KNOB_W.min(geom.track.size.x), geom.track.size.y),
            Color::rgb(60, 60, 60),
        );
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionContext;
    use crate::event::Viewport;
    use crate::geometry::{Vec2i, Vec2u};
    use std::cell::Cell;
    use std::rc::Rc;

    struct Noop;

    impl Action for Noop {
        fn execute(&mut self, _ctx: &mut ActionContext<'_>) -> bool {
            false
        }

        fn description(&self) -> String {
            "noop".to_string()
        }
    }

    // Track spans x = 22..98 (76 px), knob travel 64 px.
    fn slider(seen: Rc<Cell<f32>>) -> Slider {
        Slider::new(WindowId(1), Rect::from_xywh(0, 0, 108, 8), 0.0, 64.0, 10.0).on_change(move |v| {
            seen.set(v);
            Some(Box::new(Noop) as Box<dyn Action>)
        })
    }

    fn send(s: &mut Slider, viewport: &mut Viewport, event: Event, pending: &mut Vec<Box<dyn Action>>) -> bool {
        viewport.observe(&event);
        s.update(&mut UpdateContext::new(viewport, pending), &event)
    }

    #[test]
    fn test_drag_sets_value() {
        let seen = Rc::new(Cell::new(-1.0));
        let mut s = slider(seen.clone());
        let mut viewport = Viewport::new(Vec2u::new(200, 50));
        let mut pending = Vec::new();

        let press = Event::MouseButtonPressed { button: MouseButton::Left, pos: Vec2i::new(22, 4) };
        assert!(send(&mut s, &mut viewport, press, &mut pending));
        assert_eq!(s.value(), 0.0);
        assert!(s.is_dragging());

        send(&mut s, &mut viewport, Event::MouseMoved { pos: Vec2i::new(54, 40) }, &mut pending);
        assert_eq!(s.value(), 32.0);
        assert_eq!(seen.get(), 32.0);

        send(&mut s, &mut viewport, Event::MouseMoved { pos: Vec2i::new(500, 4) }, &mut pending);
        assert_eq!(s.value(), 64.0);

        let release = Event::MouseButtonReleased { button: MouseButton::Left, pos: Vec2i::new(500, 4) };
        send(&mut s, &mut viewport, release, &mut pending);
        assert!(!s.is_dragging());
        send(&mut s, &mut viewport, Event::MouseMoved { pos: Vec2i::new(30, 4) }, &mut pending);
        assert_eq!(s.value(), 64.0);
        assert_eq!(pending.len(), 3);
    }

    #[test]
    fn test_icons_step_value() {
        let seen = Rc::new(Cell::new(-1.0));
        let mut s = slider(seen.clone()).with_step(2.0);
        let mut viewport = Viewport::new(Vec2u::new(200, 50));
        let mut pending = Vec::new();

        let plus = Event::MouseButtonPressed { button: MouseButton::Left, pos: Vec2i::new(100, 4) };
        send(&mut s, &mut viewport, plus, &mut pending);
        assert_eq!(s.value(), 12.0);
        let minus = Event::MouseButtonPressed { button: MouseButton::Left, pos: Vec2i::new(15, 4) };
        send(&mut s, &mut viewport, minus, &mut pending);
        send(&mut s, &mut viewport, minus, &mut pending);
        assert_eq!(s.value(), 8.0);
        assert!(!s.is_dragging());
        assert_eq!(pending.len(), 3);
    }

    #[test]
    fn test_set_value_is_silent_and_clamped() {
        let seen = Rc::new(Cell::new(-1.0));
        let mut s = slider(seen.clone());
        s.set_value(100.0);
        assert_eq!(s.value(), 64.0);
        assert_eq!(seen.get(), -1.0);
    }
}

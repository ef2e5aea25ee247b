use std::any::Any;

use crate::action::Action;
use crate::canvas::CanvasLayout;
use crate::commands::ScrollAction;
use crate::event::{Event, MouseButton};
use crate::geometry::{Color, Rect, Vec2f, Vec2i, Vec2u};
use crate::render::RenderTarget;
use crate::window::{UpdateContext, Window, WindowBase, WindowId};

const MIN_THUMB: u32 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn along_i(self, v: Vec2i) -> i32 {
        match self {
            Axis::Horizontal => v.x,
            Axis::Vertical => v.y,
        }
    }

    fn along_u(self, v: Vec2u) -> u32 {
        match self {
            Axis::Horizontal => v.x,
            Axis::Vertical => v.y,
        }
    }

    fn vector(self, amount: f32) -> Vec2f {
        match self {
            Axis::Horizontal => Vec2f::new(amount, 0.0),
            Axis::Vertical => Vec2f::new(0.0, amount),
        }
    }
}

/// Converts a thumb drag of `px` pixels into a scroll-fraction delta. The
/// thumb travels over `bar_len - thumb_len` pixels.
pub fn drag_delta(px: i32, bar_len: u32, thumb_len: u32) -> f32 {
    let track = bar_len.saturating_sub(thumb_len);
    if track == 0 {
        return 0.0;
    }
    px as f32 / track as f32
}

/// Length of a proportional thumb for a bar showing `ratio` of the content.
pub fn thumb_length(bar_len: u32, ratio: f32) -> u32 {
    let len = (bar_len as f32 * ratio.clamp(0.0, 1.0)).round() as u32;
    len.max(MIN_THUMB).min(bar_len)
}

struct Grab {
    start_mouse: i32,
    start_scroll: f32,
}

/// Proportional scrollbar along one edge of a canvas. It mirrors the canvas
/// scroll through [`ScrollBar::sync`] and requests changes with
/// [`ScrollAction`]s.
pub struct ScrollBar {
    base: WindowBase,
    axis: Axis,
    canvas: WindowId,
    layout: CanvasLayout,
    thickness: u32,
    ratio: f32,
    scroll: f32,
    step: f32,
    grab: Option<Grab>,
}

impl ScrollBar {
    pub fn new(id: WindowId, axis: Axis, canvas: WindowId, layout: CanvasLayout, viewport: Vec2u) -> Self {
        let mut bar = Self {
            base: WindowBase::new(id, Rect::default()),
            axis,
            canvas,
            layout,
            thickness: 12,
            ratio: 0.5,
            scroll: 0.0,
            step: 0.05,
            grab: None,
        };
        bar.relayout(viewport);
        bar
    }

    pub fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// Mirrors the canvas: its scroll fraction and visible/full ratio on
    /// this bar's axis.
    pub fn sync(&mut self, scroll: f32, ratio: f32) {
        self.scroll = scroll.clamp(0.0, 1.0);
        self.ratio = ratio.clamp(0.0, 1.0);
    }

    fn relayout(&mut self, viewport: Vec2u) {
        let canvas = self.layout.place(viewport);
        self.base.rect = match self.axis {
            Axis::Horizontal => Rect::from_xywh(canvas.pos.x, canvas.bottom(), canvas.size.x, self.thickness),
            Axis::Vertical => Rect::from_xywh(canvas.right(), canvas.pos.y, self.thickness, canvas.size.y),
        };
    }

    fn bar_len(&self) -> u32 {
        self.axis.along_u(self.base.rect.size)
    }

    fn thumb_len(&self) -> u32 {
        thumb_length(self.bar_len(), self.ratio)
    }

    /// Thumb rectangle in window coordinates.
    pub fn thumb_rect(&self) -> Rect {
        let Rect { pos, size } = self.base.rect;
        let thumb = self.thumb_len();
        let offset = (self.scroll * self.bar_len().saturating_sub(thumb) as f32).round() as i32;
        match self.axis {
            Axis::Horizontal => Rect::from_xywh(pos.x + offset, pos.y, thumb, size.y),
            Axis::Vertical => Rect::from_xywh(pos.x, pos.y + offset, size.x, thumb),
        }
    }

    fn request(&mut self, ctx: &mut UpdateContext<'_>, target: f32) {
        let target = target.clamp(0.0, 1.0);
        let delta = target - self.scroll;
        if delta.abs() < f32::EPSILON {
            return;
        }
        self.scroll = target;
        ctx.emit(Box::new(ScrollAction::new(self.canvas, self.axis.vector(delta))) as Box<dyn Action>);
    }
}

impl Window for ScrollBar {
    fn base(&self) -> &WindowBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WindowBase {
        &mut self.base
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>, event: &Event) -> bool {
        self.relayout(ctx.viewport.size);
        let mouse = ctx.viewport.mouse;
        let hovered = ctx.is_hovered(self.base.rect);
        let along = self.axis.along_i(mouse);

        match *event {
            Event::MouseButtonPressed { button: MouseButton::Left, .. } if hovered => {
                let thumb = self.thumb_rect();
                if thumb.contains(mouse) {
                    self.grab = Some(Grab { start_mouse: along, start_scroll: self.scroll });
                } else {
                    let page = drag_delta(self.thumb_len() as i32, self.bar_len(), self.thumb_len());
                    let page = if along < self.axis.along_i(thumb.pos) { -page } else { page };
                    self.request(ctx, self.scroll + page);
                }
                true
            }
            Event::MouseButtonReleased { button: MouseButton::Left, .. } if self.grab.is_some() => {
                self.grab = None;
                true
            }
            Event::MouseMoved { .. } => match &self.grab {
                Some(grab) => {
                    let target = grab.start_scroll
                        + drag_delta(along - grab.start_mouse, self.bar_len(), self.thumb_len());
                    self.request(ctx, target);
                    true
                }
                None => hovered,
            },
            Event::MouseWheelScrolled { delta, .. } if hovered => {
                self.request(ctx, self.scroll - delta * self.step);
                true
            }
            _ => hovered || self.grab.is_some(),
        }
    }

    fn draw(&self, target: &mut dyn RenderTarget) {
        target.fill_rect(self.base.rect, Color::rgb(225, 225, 225));
        let thumb = if self.grab.is_some() { Color::rgb(90, 90, 90) } else { Color::rgb(140, 140, 140) };
        target.fill_rect(self.thumb_rect(), thumb);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

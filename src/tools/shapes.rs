use std::f32::consts::TAU;

use crate::action::Action;
use crate::canvas::Canvas;
use crate::commands::PaintAction;
use crate::event::{Event, MouseButton};
use crate::geometry::{Color, Vec2f, Vec2i};
use crate::layer::Layer;
use crate::tools::brush::{PaintMode, stroke};
use crate::tools::{Tool, ToolKind};
use crate::window::Window;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Line,
    Rectangle,
    Ellipse,
}

impl ShapeKind {
    /// Outlines the shape spanned by the drag from `start` to `end`.
    pub fn draw(self, layer: &mut Layer, start: Vec2i, end: Vec2i, radius: f32, color: Color) {
        let a = Vec2f::new(start.x as f32 + 0.5, start.y as f32 + 0.5);
        let b = Vec2f::new(end.x as f32 + 0.5, end.y as f32 + 0.5);
        match self {
            ShapeKind::Line => stroke(layer, a, b, radius, color, PaintMode::Blend),
            ShapeKind::Rectangle => {
                let corners = [a, Vec2f::new(b.x, a.y), b, Vec2f::new(a.x, b.y)];
                for i in 0..4 {
                    stroke(layer, corners[i], corners[(i + 1) % 4], radius, color, PaintMode::Blend);
                }
            }
            ShapeKind::Ellipse => {
                let center = Vec2f::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5);
                let rx = (b.x - a.x).abs() * 0.5;
                let ry = (b.y - a.y).abs() * 0.5;
                // Ramanujan's approximation of the perimeter.
                let h = 3.0 * (rx + ry) - ((3.0 * rx + ry) * (rx + 3.0 * ry)).sqrt();
                let segments = (std::f32::consts::PI * h).ceil().max(8.0) as usize;
                let point = |i: usize| {
                    let angle = TAU * i as f32 / segments as f32;
                    Vec2f::new(center.x + rx * angle.cos(), center.y + ry * angle.sin())
                };
                for i in 0..segments {
                    stroke(layer, point(i), point(i + 1), radius, color, PaintMode::Blend);
                }
            }
        }
    }
}

/// Drag-to-draw shape. While dragging, the outline is previewed in the
/// canvas temp layer; on release it is committed to the active layer.
pub struct ShapeTool {
    shape: ShapeKind,
    start: Option<Vec2i>,
}

impl ShapeTool {
    pub fn new(shape: ShapeKind) -> Self {
        Self { shape, start: None }
    }

    fn label(&self) -> &'static str {
        match self.shape {
            ShapeKind::Line => "Line",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Ellipse => "Ellipse",
        }
    }
}

impl Tool for ShapeTool {
    fn kind(&self) -> ToolKind {
        match self.shape {
            ShapeKind::Line => ToolKind::Line,
            ShapeKind::Rectangle => ToolKind::Rectangle,
            ShapeKind::Ellipse => ToolKind::Ellipse,
        }
    }

    fn apply(&mut self, canvas: &mut Canvas, event: &Event) -> Option<Box<dyn Action>> {
        let Some(start) = self.start else {
            if event.is_press(MouseButton::Left) && canvas.is_pressed() {
                self.start = Some(canvas.mouse_position());
            }
            return None;
        };

        let end = canvas.mouse_position();
        let settings = canvas.settings();
        canvas.clean_temp_layer();

        if canvas.is_pressed() {
            self.shape.draw(canvas.temp_layer_mut(), start, end, settings.radius, settings.color);
            return None;
        }

        self.start = None;
        let index = canvas.active_layer_index();
        let before = canvas.active_layer()?.clone();
        self.shape.draw(canvas.layer_mut(index), start, end, settings.radius, settings.color);
        let action = PaintAction::from_snapshot(canvas.id(), index, &before, canvas.layer(index), self.label())?;
        Some(Box::new(action))
    }

    fn cancel(&mut self, canvas: &mut Canvas) {
        if self.start.take().is_some() {
            canvas.clean_temp_layer();
        }
    }
}

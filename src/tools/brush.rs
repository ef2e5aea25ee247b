use crate::action::Action;
use crate::canvas::Canvas;
use crate::commands::PaintAction;
use crate::event::{Event, MouseButton};
use crate::geometry::{Color, Vec2f, Vec2i};
use crate::interpolation::CatmullRom;
use crate::layer::Layer;
use crate::tools::{Tool, ToolKind};
use crate::window::Window;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintMode {
    /// Source-over blend of the paint color.
    Blend,
    /// Clears to transparent.
    Erase,
}

/// Paints a filled circle centered at `center` (screen-relative, pixel
/// centers at `x + 0.5`).
pub fn stamp(layer: &mut Layer, center: Vec2f, radius: f32, color: Color, mode: PaintMode) {
    if radius <= 0.0 {
        return;
    }
    let r2 = radius * radius;
    let min_x = (center.x - radius).floor() as i32;
    let max_x = (center.x + radius).ceil() as i32;
    let min_y = (center.y - radius).floor() as i32;
    let max_y = (center.y + radius).ceil() as i32;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f32 + 0.5 - center.x;
            let dy = y as f32 + 0.5 - center.y;
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let pos = Vec2i::new(x, y);
            let out = match mode {
                PaintMode::Blend => color.blend_over(layer.get_pixel(pos)),
                PaintMode::Erase => Color::TRANSPARENT,
            };
            layer.set_pixel(pos, out);
        }
    }
}

/// Stamps along the straight segment `from..=to`, one stamp per pixel of length.
pub fn stroke(layer: &mut Layer, from: Vec2f, to: Vec2f, radius: f32, color: Color, mode: PaintMode) {
    let delta = to - from;
    let steps = from.distance(to).max(1.0).ceil();
    let step = delta * (1.0 / steps);
    let mut pos = from;
    for _ in 0..=steps as i32 {
        stamp(layer, pos, radius, color, mode);
        pos += step;
    }
}

/// Freehand brush and eraser. Pointer samples are smoothed through a
/// Catmull-Rom spline once four of them are known.
pub struct BrushTool {
    mode: PaintMode,
    spline: CatmullRom,
    snapshot: Option<(usize, Layer)>,
}

impl BrushTool {
    pub fn new(mode: PaintMode) -> Self {
        Self { mode, spline: CatmullRom::new(), snapshot: None }
    }

    fn label(&self) -> &'static str {
        match self.mode {
            PaintMode::Blend => "Brush",
            PaintMode::Erase => "Eraser",
        }
    }

    fn sample(&mut self, canvas: &mut Canvas, index: usize) {
        let mouse = canvas.mouse_position();
        let point = Vec2f::new(mouse.x as f32 + 0.5, mouse.y as f32 + 0.5);
        if self.spline.last() == Some(point) {
            return;
        }
        self.spline.push(point);

        let settings = canvas.settings();
        let (radius, color, mode) = (settings.radius, settings.color, self.mode);
        let layer = canvas.layer_mut(index);
        match self.spline.len() {
            1 => stamp(layer, point, radius, color, mode),
            2 => {
                if let Some(from) = self.spline.point(0) {
                    stroke(layer, from, point, radius, color, mode);
                }
            }
            3 => {}
            _ => {
                let points = self.spline.samples((radius * 0.5).max(0.5));
                for pair in points.windows(2) {
                    stroke(layer, pair[0], pair[1], radius, color, mode);
                }
            }
        }
    }

    fn finish(&mut self, canvas: &mut Canvas) -> Option<Box<dyn Action>> {
        let (index, before) = self.snapshot.take()?;
        if index >= canvas.num_layers() {
            self.spline.clear();
            return None;
        }
        let len = self.spline.len();
        if len >= 3 {
            if let (Some(from), Some(to)) = (self.spline.point(len - 2), self.spline.point(len - 1)) {
                let settings = canvas.settings();
                stroke(canvas.layer_mut(index), from, to, settings.radius, settings.color, self.mode);
            }
        }
        self.spline.clear();
        let action = PaintAction::from_snapshot(canvas.id(), index, &before, canvas.layer(index), self.label())?;
        Some(Box::new(action))
    }
}

impl Tool for BrushTool {
    fn kind(&self) -> ToolKind {
        match self.mode {
            PaintMode::Blend => ToolKind::Brush,
            PaintMode::Erase => ToolKind::Eraser,
        }
    }

    fn apply(&mut self, canvas: &mut Canvas, event: &Event) -> Option<Box<dyn Action>> {
        if self.snapshot.is_none() {
            if event.is_press(MouseButton::Left) && canvas.is_pressed() {
                let index = canvas.active_layer_index();
                let before = canvas.active_layer()?.clone();
                self.snapshot = Some((index, before));
                self.spline.clear();
                self.sample(canvas, index);
            }
            return None;
        }

        if !canvas.is_pressed() {
            return self.finish(canvas);
        }
        if let (Event::MouseMoved { .. }, Some((index, _))) = (event, &self.snapshot) {
            let index = *index;
            if index < canvas.num_layers() {
                self.sample(canvas, index);
            }
        }
        None
    }

    fn cancel(&mut self, canvas: &mut Canvas) {
        if let Some((index, before)) = self.snapshot.take() {
            if index < canvas.num_layers() {
                canvas.layer_mut(index).copy_from(&before);
            }
        }
        self.spline.clear();
    }

    fn commit(&mut self, canvas: &mut Canvas) -> Option<Box<dyn Action>> {
        self.finish(canvas)
    }
}

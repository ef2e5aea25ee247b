use std::any::Any;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::event::{Event, MouseButton, WheelAxis};
use crate::geometry::{Color, Rect, Vec2f, Vec2i, Vec2u};
use crate::layer::{CutRect, Layer};
use crate::render::RenderTarget;
use crate::tools::{Tool, ToolKind, ToolSettings};
use crate::window::{UpdateContext, Window, WindowBase, WindowId};

/// Placement of the canvas inside the window, as fractions of the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasLayout {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CanvasLayout {
    /// The whole viewport.
    pub const FULL: CanvasLayout = CanvasLayout { x: 0.0, y: 0.0, width: 1.0, height: 1.0 };

    pub fn place(&self, viewport: Vec2u) -> Rect {
        let vw = viewport.x as f32;
        let vh = viewport.y as f32;
        Rect::from_xywh(
            (self.x * vw).round() as i32,
            (self.y * vh).round() as i32,
            (self.width * vw).round().max(0.0) as u32,
            (self.height * vh).round().max(0.0) as u32,
        )
    }
}

impl Default for CanvasLayout {
    fn default() -> Self {
        Self { x: 0.14, y: 0.04, width: 0.8, height: 0.88 }
    }
}

/// The layered drawing surface.
///
/// Every layer stores a virtual surface twice the visible size; the visible
/// part is selected by `scroll` (a fraction per axis) with
/// `offset = scroll * (full_size - visible_size)`.
pub struct Canvas {
    base: WindowBase,
    layout: CanvasLayout,
    background: Color,
    layers: Vec<Layer>,
    temp_layer: Layer,
    active_layer: usize,
    visible_size: Vec2u,
    full_size: Vec2u,
    scroll: Vec2f,
    scroll_step: f32,
    mouse: Vec2i,
    pressed: bool,
    tool: Option<Box<dyn Tool>>,
    settings: ToolSettings,
    created_layers: u32,
}

impl Canvas {
    pub fn new(id: WindowId, layout: CanvasLayout, viewport: Vec2u) -> Self {
        let rect = layout.place(viewport);
        let visible_size = rect.size;
        let full_size = visible_size * 2;
        let area = CutRect::new(Vec2u::default(), visible_size);
        Self {
            base: WindowBase::new(id, rect),
            layout,
            background: Color::WHITE,
            layers: vec![Layer::new("Background", full_size, area)],
            temp_layer: Layer::new("temp", full_size, area),
            active_layer: 0,
            visible_size,
            full_size,
            scroll: Vec2f::default(),
            scroll_step: 0.05,
            mouse: Vec2i::new(-1, -1),
            pressed: false,
            tool: None,
            settings: ToolSettings::default(),
            created_layers: 1,
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn with_scroll_step(mut self, step: f32) -> Self {
        self.scroll_step = step;
        self
    }

    pub fn with_settings(mut self, settings: ToolSettings) -> Self {
        self.settings = settings;
        self
    }

    /// # Panics
    /// If `index >= num_layers()`.
    pub fn layer(&self, index: usize) -> &Layer {
        &self.layers[index]
    }

    /// # Panics
    /// If `index >= num_layers()`.
    pub fn layer_mut(&mut self, index: usize) -> &mut Layer {
        &mut self.layers[index]
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn active_layer_index(&self) -> usize {
        self.active_layer
    }

    pub fn active_layer(&self) -> Option<&Layer> {
        self.layers.get(self.active_layer)
    }

    pub fn active_layer_mut(&mut self) -> Option<&mut Layer> {
        self.layers.get_mut(self.active_layer)
    }

    /// Ignored when `index` is out of range.
    pub fn set_active_layer_index(&mut self, index: usize) -> bool {
        if index >= self.layers.len() {
            return false;
        }
        self.active_layer = index;
        true
    }

    pub fn temp_layer(&self) -> &Layer {
        &self.temp_layer
    }

    pub fn temp_layer_mut(&mut self) -> &mut Layer {
        &mut self.temp_layer
    }

    pub fn clean_temp_layer(&mut self) {
        self.temp_layer.clear(Color::TRANSPARENT);
    }

    fn visible_area(&self) -> CutRect {
        let range = self.full_size.saturating_sub(self.visible_size).to_f32();
        let offset = Vec2u::new(
            (self.scroll.x * range.x).round() as u32,
            (self.scroll.y * range.y).round() as u32,
        );
        CutRect::new(offset, self.visible_size)
    }

    fn fit_layer(&self, layer: &mut Layer) {
        layer.change_full_size(self.full_size);
        layer.change_area(self.visible_area());
    }

    fn fit_all(&mut self) {
        let (full, area) = (self.full_size, self.visible_area());
        for layer in self.layers.iter_mut().chain(std::iter::once(&mut self.temp_layer)) {
            layer.change_full_size(full);
            layer.change_area(area);
        }
    }

    /// Inserts a full-size copy of `source` at `index`. The active index is
    /// left alone.
    pub fn insert_layer(&mut self, index: usize, source: &Layer) -> bool {
        if index > self.layers.len() {
            return false;
        }
        let mut layer = Layer::new(source.name.clone(), self.full_size, self.visible_area());
        layer.visible = source.visible;
        layer.copy_from(source);
        self.layers.insert(index, layer);
        self.created_layers += 1;
        debug!("canvas: inserted copy of '{}' at {}", source.name, index);
        true
    }

    pub fn insert_empty_layer(&mut self, index: usize) -> bool {
        if index > self.layers.len() {
            return false;
        }
        self.created_layers += 1;
        let name = format!("Layer {}", self.created_layers);
        debug!("canvas: inserted '{}' at {}", name, index);
        self.layers
            .insert(index, Layer::new(name, self.full_size, self.visible_area()));
        true
    }

    /// Removes and returns the layer at `index`. The active index is left alone.
    pub fn remove_layer(&mut self, index: usize) -> Option<Layer> {
        if index >= self.layers.len() {
            return None;
        }
        let layer = self.layers.remove(index);
        debug!("canvas: removed '{}' from {}", layer.name, index);
        Some(layer)
    }

    /// Puts back a layer previously taken out with [`Canvas::remove_layer`],
    /// keeping its pixels and name. The layer is refitted to the current size.
    pub fn restore_layer(&mut self, index: usize, mut layer: Layer) -> bool {
        if index > self.layers.len() {
            return false;
        }
        self.fit_layer(&mut layer);
        self.layers.insert(index, layer);
        true
    }

    pub fn move_layer(&mut self, from: usize, to: usize) -> bool {
        if from >= self.layers.len() || to >= self.layers.len() {
            return false;
        }
        if from != to {
            let layer = self.layers.remove(from);
            self.layers.insert(to, layer);
        }
        true
    }

    /// Replaces the whole stack, fitting every layer to the canvas.
    pub fn replace_layers(&mut self, layers: Vec<Layer>) {
        if layers.is_empty() {
            return;
        }
        let mut layers = layers;
        for layer in &mut layers {
            self.fit_layer(layer);
        }
        self.layers = layers;
        self.active_layer = self.layers.len() - 1;
        info!("canvas: loaded {} layers", self.layers.len());
    }

    pub fn scroll(&self) -> Vec2f {
        self.scroll
    }

    /// Clamps `scroll` to `[0, 1]` per axis and moves every layer's visible
    /// area. Pixel storage is untouched.
    pub fn set_scroll(&mut self, scroll: Vec2f) {
        self.scroll = scroll.clamp(0.0, 1.0);
        let area = self.visible_area();
        for layer in &mut self.layers {
            layer.change_area(area);
        }
        self.temp_layer.change_area(area);
    }

    pub fn scroll_by(&mut self, delta: Vec2f) {
        self.set_scroll(self.scroll + delta);
    }

    pub fn scroll_step(&self) -> f32 {
        self.scroll_step
    }

    /// Visible fraction of the full surface per axis.
    pub fn view_ratio(&self) -> Vec2f {
        let full = self.full_size.to_f32();
        let visible = self.visible_size.to_f32();
        let ratio = |v: f32, f: f32| if f > 0.0 { (v / f).min(1.0) } else { 1.0 };
        Vec2f::new(ratio(visible.x, full.x), ratio(visible.y, full.y))
    }

    /// Sets the on-screen size. The full surface becomes twice as large.
    /// Sizes with a zero component (a minimized window) are ignored.
    pub fn set_size(&mut self, size: Vec2u) {
        if size == self.visible_size || size.x == 0 || size.y == 0 {
            return;
        }
        debug!("canvas: resize {:?} -> {:?}", self.visible_size, size);
        self.visible_size = size;
        self.full_size = size * 2;
        self.fit_all();
    }

    pub fn full_size(&self) -> Vec2u {
        self.full_size
    }

    pub fn visible_size(&self) -> Vec2u {
        self.visible_size
    }

    pub fn pos(&self) -> Vec2i {
        self.base.rect.pos
    }

    pub fn size(&self) -> Vec2u {
        self.base.rect.size
    }

    /// Last pointer position relative to the canvas's top-left corner.
    pub fn mouse_position(&self) -> Vec2i {
        self.mouse
    }

    /// Whether the primary button went down over the canvas and is still held.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn settings(&self) -> ToolSettings {
        self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ToolSettings {
        &mut self.settings
    }

    pub fn tool_kind(&self) -> Option<ToolKind> {
        self.tool.as_ref().map(|t| t.kind())
    }

    /// Switches tools, cancelling any gesture of the previous one.
    pub fn set_tool(&mut self, tool: Option<Box<dyn Tool>>) {
        if let Some(mut old) = self.tool.take() {
            old.cancel(self);
        }
        info!("canvas: tool {}", tool.as_ref().map_or("none", |t| t.name()));
        self.tool = tool;
    }

    /// Places the canvas in `viewport`. A gesture in progress is committed
    /// first when the layers are about to be reallocated.
    fn relayout(&mut self, viewport: Vec2u) -> Option<Box<dyn Action>> {
        let rect = self.layout.place(viewport);
        if rect.size.x == 0 || rect.size.y == 0 {
            return None;
        }
        let mut committed = None;
        if rect.size != self.visible_size {
            if let Some(mut tool) = self.tool.take() {
                committed = tool.commit(self);
                self.tool = Some(tool);
            }
        }
        self.base.rect = rect;
        self.set_size(rect.size);
        committed
    }
}

impl Window for Canvas {
    fn base(&self) -> &WindowBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WindowBase {
        &mut self.base
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>, event: &Event) -> bool {
        if let Some(action) = self.relayout(ctx.viewport.size) {
            ctx.emit(action);
        }
        let hovered = ctx.is_hovered(self.base.rect);
        self.mouse = ctx.viewport.mouse - self.base.rect.pos;

        if event.is_press(MouseButton::Left) && hovered {
            self.pressed = true;
        } else if event.is_release(MouseButton::Left) {
            self.pressed = false;
        }

        if let Event::MouseWheelScrolled { axis, delta, .. } = *event {
            if hovered {
                let step = -delta * self.scroll_step;
                match axis {
                    WheelAxis::Vertical => self.scroll_by(Vec2f::new(0.0, step)),
                    WheelAxis::Horizontal => self.scroll_by(Vec2f::new(step, 0.0)),
                }
            }
        }

        let mut used = hovered || self.pressed;
        if let Some(mut tool) = self.tool.take() {
            if let Some(action) = tool.apply(self, event) {
                ctx.emit(action);
                used = true;
            }
            if self.tool.is_none() {
                self.tool = Some(tool);
            }
        }
        used
    }

    fn draw(&self, target: &mut dyn RenderTarget) {
        let rect = self.base.rect;
        target.fill_rect(rect, self.background);
        for layer in self.layers.iter().filter(|l| l.visible) {
            target.draw_layer(rect.pos, layer);
        }
        target.draw_layer(rect.pos, &self.temp_layer);
        target.outline_rect(
            Rect::from_xywh(rect.pos.x - 1, rect.pos.y - 1, rect.size.x + 2, rect.size.y + 2),
            Color::rgb(60, 60, 60),
            1,
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
    use crate::event::Viewport;
    use crate::render::Frame;

    const RED: Color = Color::rgba(255, 0, 0, 255);

    fn canvas(w: u32, h: u32) -> Canvas {
        Canvas::new(WindowId(1), CanvasLayout::FULL, Vec2u::new(w, h))
    }

    fn send(canvas: &mut Canvas, viewport: &mut Viewport, event: Event) -> Vec<Box<dyn Action>> {
        let mut pending = Vec::new();
        viewport.observe(&event);
        canvas.update(&mut UpdateContext::new(viewport, &mut pending), &event);
        pending
    }

    #[test]
    fn test_new_canvas_has_background_layer() {
        let c = canvas(64, 48);
        assert_eq!(c.num_layers(), 1);
        assert_eq!(c.layer(0).name, "Background");
        assert!(c.layer(0).is_empty());
        assert_eq!(c.visible_size(), Vec2u::new(64, 48));
        assert_eq!(c.full_size(), Vec2u::new(128, 96));
        assert_eq!(c.active_layer_index(), 0);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut c = canvas(10, 10);
        c.set_scroll(Vec2f::new(1.5, -0.3));
        assert_eq!(c.scroll(), Vec2f::new(1.0, 0.0));
        assert_eq!(c.layer(0).area().offset, Vec2u::new(10, 0));
        assert_eq!(c.temp_layer().area().offset, Vec2u::new(10, 0));
    }

    #[test]
    fn test_scroll_maps_offset() {
        let mut c = canvas(20, 10);
        c.set_scroll(Vec2f::new(0.5, 0.25));
        let area = c.layer(0).area();
        assert_eq!(area.offset, Vec2u::new(10, 3));
        assert_eq!(area.size, Vec2u::new(20, 10));

        c.scroll_by(Vec2f::new(0.25, 0.75));
        assert_eq!(c.layer(0).area().offset, Vec2u::new(15, 10));
    }

    #[test]
    fn test_scrolling_keeps_data() {
        let mut c = canvas(64, 64);
        c.layer_mut(0).set_pixel(Vec2i::new(10, 10), RED);
        assert_eq!(c.layer(0).get_pixel(Vec2i::new(10, 10)), RED);

        c.set_scroll(Vec2f::new(1.0, 1.0));
        assert_eq!(c.layer(0).get_pixel(Vec2i::new(10, 10)), Color::TRANSPARENT);
        assert_eq!(c.layer(0).get_pixel(Vec2i::new(10 - 64, 10 - 64)), Color::TRANSPARENT);
        assert_eq!(c.layer(0).get_full_pixel(Vec2u::new(10, 10)), RED);

        c.set_scroll(Vec2f::new(0.0, 0.0));
        assert_eq!(c.layer(0).get_pixel(Vec2i::new(10, 10)), RED);
    }

    #[test]
    fn test_insert_layer_bounds() {
        let mut c = canvas(8, 8);
        let mut source = Layer::new("src", Vec2u::new(4, 4), CutRect::new(Vec2u::default(), Vec2u::new(4, 4)));
        source.set_full_pixel(Vec2u::new(3, 3), RED);

        assert!(!c.insert_layer(2, &source));
        assert_eq!(c.num_layers(), 1);
        assert!(c.insert_layer(1, &source));
        assert_eq!(c.num_layers(), 2);
        assert_eq!(c.layer(1).full_size(), c.full_size());
        assert_eq!(c.layer(1).get_full_pixel(Vec2u::new(3, 3)), RED);

        // Deep copy: later edits to the source do not leak.
        source.set_full_pixel(Vec2u::new(0, 0), RED);
        assert_eq!(c.layer(1).get_full_pixel(Vec2u::new(0, 0)), Color::TRANSPARENT);
    }

    #[test]
    fn test_layer_stack_edits_leave_active_index() {
        let mut c = canvas(8, 8);
        assert!(c.insert_empty_layer(1));
        assert!(c.insert_empty_layer(2));
        assert!(c.set_active_layer_index(2));
        assert!(!c.set_active_layer_index(3));
        assert_eq!(c.active_layer_index(), 2);

        let removed = c.remove_layer(0).unwrap();
        assert_eq!(removed.name, "Background");
        assert_eq!(c.active_layer_index(), 2);
        assert!(c.active_layer().is_none());
        assert!(c.remove_layer(5).is_none());

        assert!(c.move_layer(0, 1));
        assert_eq!(c.layer(0).name, "Layer 3");
        assert!(!c.move_layer(0, 2));
    }

    #[test]
    #[should_panic]
    fn test_layer_out_of_range_panics() {
        let c = canvas(8, 8);
        c.layer(1);
    }

    #[test]
    fn test_set_size_resizes_layers() {
        let mut c = canvas(10, 10);
        c.layer_mut(0).set_full_pixel(Vec2u::new(5, 5), RED);
        c.temp_layer_mut().set_full_pixel(Vec2u::new(1, 1), RED);
        c.set_size(Vec2u::new(20, 15));
        assert_eq!(c.full_size(), Vec2u::new(40, 30));
        assert_eq!(c.layer(0).full_size(), Vec2u::new(40, 30));
        assert_eq!(c.temp_layer().full_size(), Vec2u::new(40, 30));
        assert_eq!(c.layer(0).area().size, Vec2u::new(20, 15));
        assert_eq!(c.layer(0).get_full_pixel(Vec2u::new(5, 5)), RED);
        assert_eq!(c.temp_layer().get_full_pixel(Vec2u::new(1, 1)), RED);
    }

    #[test]
    fn test_zero_size_is_ignored() {
        let mut c = canvas(10, 10);
        c.layer_mut(0).set_full_pixel(Vec2u::new(5, 5), RED);
        c.set_size(Vec2u::new(0, 0));
        c.set_size(Vec2u::new(12, 0));
        assert_eq!(c.visible_size(), Vec2u::new(10, 10));
        assert_eq!(c.layer(0).full_size(), Vec2u::new(20, 20));

        let mut viewport = Viewport::new(Vec2u::new(10, 10));
        send(&mut c, &mut viewport, Event::Resized { size: Vec2u::new(0, 0) });
        assert_eq!(c.size(), Vec2u::new(10, 10));
        assert_eq!(c.layer(0).get_full_pixel(Vec2u::new(5, 5)), RED);
    }

    #[test]
    fn test_clean_temp_layer() {
        let mut c = canvas(8, 8);
        c.temp_layer_mut().set_pixel(Vec2i::new(2, 2), RED);
        c.clean_temp_layer();
        assert!(c.temp_layer().is_empty());
    }

    #[test]
    fn test_press_state_and_mouse_tracking() {
        let layout = CanvasLayout { x: 0.5, y: 0.5, width: 0.5, height: 0.5 };
        let mut c = Canvas::new(WindowId(1), layout, Vec2u::new(100, 100));
        let mut viewport = Viewport::new(Vec2u::new(100, 100));

        send(&mut c, &mut viewport, Event::MouseMoved { pos: Vec2i::new(60, 70) });
        assert_eq!(c.mouse_position(), Vec2i::new(10, 20));
        assert!(!c.is_pressed());

        send(&mut c, &mut viewport, Event::MouseButtonPressed { button: MouseButton::Left, pos: Vec2i::new(10, 10) });
        assert!(!c.is_pressed());

        send(&mut c, &mut viewport, Event::MouseButtonPressed { button: MouseButton::Left, pos: Vec2i::new(60, 60) });
        assert!(c.is_pressed());
        send(&mut c, &mut viewport, Event::MouseMoved { pos: Vec2i::new(5, 5) });
        assert!(c.is_pressed());
        send(&mut c, &mut viewport, Event::MouseButtonReleased { button: MouseButton::Left, pos: Vec2i::new(5, 5) });
        assert!(!c.is_pressed());
    }

    #[test]
    fn test_update_follows_viewport() {
        let mut c = Canvas::new(WindowId(1), CanvasLayout::default(), Vec2u::new(100, 100));
        let mut viewport = Viewport::new(Vec2u::new(100, 100));
        send(&mut c, &mut viewport, Event::Resized { size: Vec2u::new(200, 100) });
        assert_eq!(c.pos(), Vec2i::new(28, 4));
        assert_eq!(c.size(), Vec2u::new(160, 88));
        assert_eq!(c.full_size(), Vec2u::new(320, 176));
    }

    #[test]
    fn test_wheel_scrolls_only_when_hovered() {
        let mut c = canvas(50, 50).with_scroll_step(0.1);
        let mut viewport = Viewport::new(Vec2u::new(50, 50));
        c.set_scroll(Vec2f::new(0.5, 0.5));

        send(&mut c, &mut viewport, Event::MouseWheelScrolled { axis: WheelAxis::Vertical, delta: 1.0, pos: Vec2i::new(10, 10) });
        assert!((c.scroll().y - 0.4).abs() < 1e-6);
        send(&mut c, &mut viewport, Event::MouseWheelScrolled { axis: WheelAxis::Horizontal, delta: -2.0, pos: Vec2i::new(10, 10) });
        assert!((c.scroll().x - 0.7).abs() < 1e-6);

        send(&mut c, &mut viewport, Event::MouseWheelScrolled { axis: WheelAxis::Vertical, delta: 1.0, pos: Vec2i::new(80, 10) });
        assert!((c.scroll().y - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_draw_order() {
        let mut c = canvas(4, 4).with_background(Color::WHITE);
        c.layer_mut(0).set_pixel(Vec2i::new(1, 1), RED);
        c.temp_layer_mut().set_pixel(Vec2i::new(1, 1), Color::BLACK);
        c.layer_mut(0).set_pixel(Vec2i::new(2, 2), RED);

        let mut frame = Frame::new(4, 4);
        c.draw(&mut frame);
        assert_eq!(frame.pixel(1, 1), Some(Color::BLACK));
        assert_eq!(frame.pixel(2, 2), Some(RED));
        assert_eq!(frame.pixel(3, 3), Some(Color::WHITE));

        c.layer_mut(0).visible = false;
        c.draw(&mut frame);
        assert_eq!(frame.pixel(2, 2), Some(Color::WHITE));
    }
}

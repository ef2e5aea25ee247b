//! Concrete actions against a [`Canvas`] found by id in the window tree.

use log::{debug, warn};

use crate::action::{Action, ActionContext};
use crate::canvas::Canvas;
use crate::geometry::{Color, Vec2f, Vec2u};
use crate::layer::Layer;
use crate::tools::ToolKind;
use crate::window::WindowId;

/// Rectangle of full-surface pixels copied out of a layer.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelPatch {
    origin: Vec2u,
    size: Vec2u,
    pixels: Vec<Color>,
}

impl PixelPatch {
    pub fn capture(layer: &Layer, origin: Vec2u, size: Vec2u) -> Self {
        let mut pixels = Vec::with_capacity(size.area());
        for y in 0..size.y {
            for x in 0..size.x {
                pixels.push(layer.get_full_pixel(Vec2u::new(origin.x + x, origin.y + y)));
            }
        }
        Self { origin, size, pixels }
    }

    pub fn apply(&self, layer: &mut Layer) {
        let width = self.size.x as usize;
        if width == 0 {
            return;
        }
        for (i, &color) in self.pixels.iter().enumerate() {
            let pos = Vec2u::new(self.origin.x + (i % width) as u32, self.origin.y + (i / width) as u32);
            layer.set_full_pixel(pos, color);
        }
    }

    pub fn origin(&self) -> Vec2u {
        self.origin
    }

    pub fn size(&self) -> Vec2u {
        self.size
    }
}

/// Smallest full-surface box holding every pixel that differs between the two
/// layers, or `None` when they are equal. Both must have the same size.
pub fn changed_bounds(before: &Layer, after: &Layer) -> Option<(Vec2u, Vec2u)> {
    if before.full_size() != after.full_size() {
        return None;
    }
    let width = before.full_size().x as usize;
    if width == 0 {
        return None;
    }
    let mut min = Vec2u::new(u32::MAX, u32::MAX);
    let mut max = Vec2u::new(0, 0);
    let mut any = false;
    for (i, (a, b)) in before.pixels().iter().zip(after.pixels()).enumerate() {
        if a != b {
            let (x, y) = ((i % width) as u32, (i / width) as u32);
            min = Vec2u::new(min.x.min(x), min.y.min(y));
            max = Vec2u::new(max.x.max(x), max.y.max(y));
            any = true;
        }
    }
    any.then(|| (min, Vec2u::new(max.x - min.x + 1, max.y - min.y + 1)))
}

/// A finished edit of one layer, stored as before/after patches of the
/// region that changed.
pub struct PaintAction {
    canvas: WindowId,
    layer: usize,
    before: PixelPatch,
    after: PixelPatch,
    label: &'static str,
}

impl PaintAction {
    /// Diffs a snapshot taken before the edit against the edited layer.
    pub fn from_snapshot(
        canvas: WindowId,
        layer: usize,
        before: &Layer,
        after: &Layer,
        label: &'static str,
    ) -> Option<Self> {
        let (origin, size) = changed_bounds(before, after)?;
        Some(Self {
            canvas,
            layer,
            before: PixelPatch::capture(before, origin, size),
            after: PixelPatch::capture(after, origin, size),
            label,
        })
    }

    pub fn layer_index(&self) -> usize {
        self.layer
    }

    fn put(&self, ctx: &mut ActionContext<'_>, patch: &PixelPatch) -> bool {
        let Some(canvas) = ctx.canvas_mut(self.canvas) else {
            return false;
        };
        if self.layer >= canvas.num_layers() {
            warn!("{}: layer {} no longer exists", self.label, self.layer);
            return false;
        }
        patch.apply(canvas.layer_mut(self.layer));
        true
    }
}

impl Action for PaintAction {
    fn execute(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        self.put(ctx, &self.after)
    }

    fn is_undoable(&self) -> bool {
        true
    }

    fn undo(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        self.put(ctx, &self.before)
    }

    fn description(&self) -> String {
        let size = self.after.size();
        format!("{} on layer {} ({}x{})", self.label, self.layer, size.x, size.y)
    }
}

/// Inserts a new layer above the active one and makes it active.
pub struct InsertLayerAction {
    canvas: WindowId,
    index: Option<usize>,
    source: LayerSource,
    previous_active: usize,
}

enum LayerSource {
    Empty,
    Copy(usize),
    Import(Layer),
}

impl InsertLayerAction {
    pub fn empty(canvas: WindowId) -> Self {
        Self::with_source(canvas, LayerSource::Empty)
    }

    pub fn duplicate(canvas: WindowId, source: usize) -> Self {
        Self::with_source(canvas, LayerSource::Copy(source))
    }

    /// Inserts a copy of a layer built outside the canvas, e.g. a decoded image.
    pub fn import(canvas: WindowId, layer: Layer) -> Self {
        Self::with_source(canvas, LayerSource::Import(layer))
    }

    fn with_source(canvas: WindowId, source: LayerSource) -> Self {
        Self { canvas, index: None, source, previous_active: 0 }
    }

    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

impl Action for InsertLayerAction {
    fn execute(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        let Some(canvas) = ctx.canvas_mut(self.canvas) else {
            return false;
        };
        let index = *self.index.get_or_insert(canvas.active_layer_index() + 1);
        let inserted = match &self.source {
            LayerSource::Copy(source) if *source < canvas.num_layers() => {
                let copy = canvas.layer(*source).clone();
                canvas.insert_layer(index, &copy)
            }
            LayerSource::Copy(_) => false,
            LayerSource::Import(layer) => canvas.insert_layer(index, layer),
            LayerSource::Empty => canvas.insert_empty_layer(index),
        };
        if !inserted {
            return false;
        }
        self.previous_active = canvas.active_layer_index();
        canvas.set_active_layer_index(index);
        true
    }

    fn is_undoable(&self) -> bool {
        true
    }

    fn undo(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        let (Some(canvas), Some(index)) = (ctx.canvas_mut(self.canvas), self.index) else {
            return false;
        };
        if canvas.remove_layer(index).is_none() {
            return false;
        }
        canvas.set_active_layer_index(self.previous_active);
        true
    }

    fn description(&self) -> String {
        match &self.source {
            LayerSource::Empty => "New layer".to_string(),
            LayerSource::Copy(source) => format!("Duplicate layer {}", source),
            LayerSource::Import(layer) => format!("Import '{}'", layer.name),
        }
    }
}

/// Removes a layer, keeping at least one on the canvas.
pub struct RemoveLayerAction {
    canvas: WindowId,
    index: Option<usize>,
    removed: Option<Layer>,
    previous_active: usize,
}

impl RemoveLayerAction {
    /// Removes the layer that is active when the action runs.
    pub fn active(canvas: WindowId) -> Self {
        Self { canvas, index: None, removed: None, previous_active: 0 }
    }

    pub fn at(canvas: WindowId, index: usize) -> Self {
        Self { canvas, index: Some(index), removed: None, previous_active: 0 }
    }
}

impl Action for RemoveLayerAction {
    fn execute(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        let Some(canvas) = ctx.canvas_mut(self.canvas) else {
            return false;
        };
        if canvas.num_layers() <= 1 {
            debug!("remove layer: refusing to remove the last layer");
            return false;
        }
        let index = *self.index.get_or_insert(canvas.active_layer_index());
        let Some(layer) = canvas.remove_layer(index) else {
            return false;
        };
        self.removed = Some(layer);
        self.previous_active = canvas.active_layer_index();
        let active = if self.previous_active > index {
            self.previous_active - 1
        } else {
            self.previous_active.min(canvas.num_layers() - 1)
        };
        canvas.set_active_layer_index(active);
        true
    }

    fn is_undoable(&self) -> bool {
        true
    }

    fn undo(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        let Some(index) = self.index else {
            return false;
        };
        let Some(layer) = self.removed.take() else {
            return false;
        };
        let Some(canvas) = ctx.canvas_mut(self.canvas) else {
            self.removed = Some(layer);
            return false;
        };
        if !canvas.restore_layer(index, layer) {
            return false;
        }
        canvas.set_active_layer_index(self.previous_active);
        true
    }

    fn description(&self) -> String {
        match &self.removed {
            Some(layer) => format!("Remove layer '{}'", layer.name),
            None => "Remove layer".to_string(),
        }
    }
}

/// Moves a layer within the stack; the moved layer stays active if it was.
pub struct MoveLayerAction {
    canvas: WindowId,
    from: usize,
    to: usize,
    offset: Option<isize>,
}

impl MoveLayerAction {
    pub fn new(canvas: WindowId, from: usize, to: usize) -> Self {
        Self { canvas, from, to, offset: None }
    }

    /// Moves whichever layer is active when the action runs by `offset`
    /// places (positive is up the stack).
    pub fn active_by(canvas: WindowId, offset: isize) -> Self {
        Self { canvas, from: 0, to: 0, offset: Some(offset) }
    }

    fn shift(ctx: &mut ActionContext<'_>, canvas: WindowId, from: usize, to: usize) -> bool {
        let Some(canvas) = ctx.canvas_mut(canvas) else {
            return false;
        };
        if from == to || !canvas.move_layer(from, to) {
            return false;
        }
        let active = canvas.active_layer_index();
        let active = if active == from {
            to
        } else if from < active && active <= to {
            active - 1
        } else if to <= active && active < from {
            active + 1
        } else {
            active
        };
        canvas.set_active_layer_index(active);
        true
    }
}

impl Action for MoveLayerAction {
    fn execute(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        if let Some(offset) = self.offset.take() {
            let Some(canvas) = ctx.canvas(self.canvas) else {
                return false;
            };
            self.from = canvas.active_layer_index();
            let Some(to) = self.from.checked_add_signed(offset) else {
                return false;
            };
            self.to = to;
        }
        Self::shift(ctx, self.canvas, self.from, self.to)
    }

    fn is_undoable(&self) -> bool {
        true
    }

    fn undo(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        Self::shift(ctx, self.canvas, self.to, self.from)
    }

    fn description(&self) -> String {
        format!("Move layer {} to {}", self.from, self.to)
    }
}

/// Selects a layer relative to the active one, e.g. `-1` for the one below.
pub struct SetActiveLayerAction {
    canvas: WindowId,
    target: LayerTarget,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerTarget {
    Index(usize),
    Offset(isize),
}

impl SetActiveLayerAction {
    pub fn new(canvas: WindowId, target: LayerTarget) -> Self {
        Self { canvas, target }
    }
}

impl Action for SetActiveLayerAction {
    fn execute(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        let Some(canvas) = ctx.canvas_mut(self.canvas) else {
            return false;
        };
        let current = canvas.active_layer_index();
        let index = match self.target {
            LayerTarget::Index(i) => i,
            LayerTarget::Offset(delta) => match current.checked_add_signed(delta) {
                Some(i) => i,
                None => return false,
            },
        };
        index != current && canvas.set_active_layer_index(index)
    }

    fn description(&self) -> String {
        format!("Select layer {:?}", self.target)
    }
}

/// Scrolls a canvas by a fraction of its scrollable range.
pub struct ScrollAction {
    canvas: WindowId,
    delta: Vec2f,
}

impl ScrollAction {
    pub fn new(canvas: WindowId, delta: Vec2f) -> Self {
        Self { canvas, delta }
    }
}

impl Action for ScrollAction {
    fn execute(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        let Some(canvas) = ctx.canvas_mut(self.canvas) else {
            return false;
        };
        let before = canvas.scroll();
        canvas.scroll_by(self.delta);
        canvas.scroll() != before
    }

    fn description(&self) -> String {
        format!("Scroll by ({:.3}, {:.3})", self.delta.x, self.delta.y)
    }
}

/// Switches the canvas tool; `None` disables drawing.
pub struct SelectToolAction {
    canvas: WindowId,
    tool: Option<ToolKind>,
}

impl SelectToolAction {
    pub fn new(canvas: WindowId, tool: Option<ToolKind>) -> Self {
        Self { canvas, tool }
    }
}

impl Action for SelectToolAction {
    fn execute(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        let Some(canvas) = ctx.canvas_mut(self.canvas) else {
            return false;
        };
        if canvas.tool_kind() == self.tool {
            return false;
        }
        canvas.set_tool(self.tool.map(ToolKind::create));
        true
    }

    fn description(&self) -> String {
        match self.tool {
            Some(kind) => format!("Select tool {}", kind.name()),
            None => "Deselect tool".to_string(),
        }
    }
}

pub struct SetColorAction {
    canvas: WindowId,
    color: Color,
}

impl SetColorAction {
    pub fn new(canvas: WindowId, color: Color) -> Self {
        Self { canvas, color }
    }
}

impl Action for SetColorAction {
    fn execute(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        let Some(canvas) = ctx.canvas_mut(self.canvas) else {
            return false;
        };
        let settings = canvas.settings_mut();
        if settings.color == self.color {
            return false;
        }
        settings.color = self.color;
        true
    }

    fn description(&self) -> String {
        format!("Set color {:?}", self.color.to_array())
    }
}

pub struct SetRadiusAction {
    canvas: WindowId,
    radius: f32,
}

impl SetRadiusAction {
    pub fn new(canvas: WindowId, radius: f32) -> Self {
        Self { canvas, radius }
    }
}

impl Action for SetRadiusAction {
    fn execute(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        let Some(canvas) = ctx.canvas_mut(self.canvas) else {
            return false;
        };
        let settings = canvas.settings_mut();
        if (settings.radius - self.radius).abs() < f32::EPSILON {
            return false;
        }
        settings.radius = self.radius.max(0.5);
        true
    }

    fn description(&self) -> String {
        format!("Set radius {:.1}", self.radius)
    }
}

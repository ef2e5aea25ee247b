use log::debug;
use rayon::prelude::*;

use crate::action::{Action, ActionContext};
use crate::commands::{PixelPatch, changed_bounds};
use crate::geometry::Color;
use crate::window::WindowId;

/// Whole-layer pixel filters. Only pixels that have been drawn on
/// (alpha > 0) are touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    Invert,
    Grayscale,
}

impl Filter {
    pub fn apply(self, pixels: &mut [Color]) {
        pixels
            .par_iter_mut()
            .filter(|c| c.a > 0)
            .for_each(|c| *c = self.map(*c));
    }

    fn map(self, c: Color) -> Color {
        match self {
            Filter::Invert => Color::rgba(255 - c.r, 255 - c.g, 255 - c.b, c.a),
            Filter::Grayscale => {
                // Luminosity method
                let gray = (0.299 * c.r as f32 + 0.587 * c.g as f32 + 0.114 * c.b as f32) as u8;
                Color::rgba(gray, gray, gray, c.a)
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Filter::Invert => "Invert",
            Filter::Grayscale => "Grayscale",
        }
    }

    pub fn label(self) -> char {
        match self {
            Filter::Invert => 'I',
            Filter::Grayscale => 'G',
        }
    }
}

/// Runs a filter over the active layer of a canvas.
pub struct FilterAction {
    canvas: WindowId,
    filter: Filter,
    applied: Option<(usize, PixelPatch, PixelPatch)>,
}

impl FilterAction {
    pub fn new(canvas: WindowId, filter: Filter) -> Self {
        Self { canvas, filter, applied: None }
    }
}

impl Action for FilterAction {
    fn execute(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        let Some(canvas) = ctx.canvas_mut(self.canvas) else {
            return false;
        };
        let index = canvas.active_layer_index();
        let Some(layer) = canvas.active_layer_mut() else {
            return false;
        };
        let before = layer.clone();
        self.filter.apply(layer.pixels_mut());
        let Some((origin, size)) = changed_bounds(&before, layer) else {
            debug!("{}: nothing to change", self.filter.name());
            return false;
        };
        self.applied = Some((
            index,
            PixelPatch::capture(&before, origin, size),
            PixelPatch::capture(layer, origin, size),
        ));
        true
    }

    fn is_undoable(&self) -> bool {
        true
    }

    fn undo(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        let (Some(canvas), Some((index, before, _))) = (ctx.canvas_mut(self.canvas), &self.applied) else {
            return false;
        };
        if *index >= canvas.num_layers() {
            return false;
        }
        before.apply(canvas.layer_mut(*index));
        true
    }

    fn redo(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        let (Some(canvas), Some((index, _, after))) = (ctx.canvas_mut(self.canvas), &self.applied) else {
            return false;
        };
        if *index >= canvas.num_layers() {
            return false;
        }
        after.apply(canvas.layer_mut(*index));
        true
    }

    fn description(&self) -> String {
        format!("Filter: {}", self.filter.name())
    }
}

//! Drawing tools. Tools only talk to the canvas through its public API and
//! hand their edits back as actions so they can be undone.

mod brush;
mod filters;
mod shapes;

pub use brush::{BrushTool, PaintMode, stamp, stroke};
pub use filters::{Filter, FilterAction};
pub use shapes::{ShapeKind, ShapeTool};

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::canvas::Canvas;
use crate::event::Event;
use crate::geometry::Color;

pub trait Tool {
    fn kind(&self) -> ToolKind;

    /// Reacts to one event already seen by the canvas. The canvas has updated
    /// its mouse position and pressed state before calling.
    fn apply(&mut self, canvas: &mut Canvas, event: &Event) -> Option<Box<dyn Action>>;

    /// Drops any gesture in progress. Called when the tool is replaced.
    fn cancel(&mut self, _canvas: &mut Canvas) {}

    /// Ends any gesture in progress, keeping its edits as an action when the
    /// tool can. Called before the canvas reallocates its layers.
    fn commit(&mut self, canvas: &mut Canvas) -> Option<Box<dyn Action>> {
        self.cancel(canvas);
        None
    }

    fn name(&self) -> &'static str {
        self.kind().name()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    Brush,
    Eraser,
    Line,
    Rectangle,
    Ellipse,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Brush,
        ToolKind::Eraser,
        ToolKind::Line,
        ToolKind::Rectangle,
        ToolKind::Ellipse,
    ];

    pub fn create(self) -> Box<dyn Tool> {
        match self {
            ToolKind::Brush => Box::new(BrushTool::new(PaintMode::Blend)),
            ToolKind::Eraser => Box::new(BrushTool::new(PaintMode::Erase)),
            ToolKind::Line => Box::new(ShapeTool::new(ShapeKind::Line)),
            ToolKind::Rectangle => Box::new(ShapeTool::new(ShapeKind::Rectangle)),
            ToolKind::Ellipse => Box::new(ShapeTool::new(ShapeKind::Ellipse)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Brush => "brush",
            ToolKind::Eraser => "eraser",
            ToolKind::Line => "line",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Ellipse => "ellipse",
        }
    }

    /// Glyph shown on the tool's palette button.
    pub fn label(self) -> char {
        match self {
            ToolKind::Brush => 'B',
            ToolKind::Eraser => 'E',
            ToolKind::Line => 'L',
            ToolKind::Rectangle => 'R',
            ToolKind::Ellipse => 'O',
        }
    }
}

/// Paint parameters shared by every tool of a canvas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    pub color: Color,
    pub radius: f32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self { color: Color::BLACK, radius: 3.0 }
    }
}

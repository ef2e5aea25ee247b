//! The editor: one window tree plus the history that runs every action the
//! tree produces. Nothing here is global; `main` owns a single [`Editor`].

use log::{debug, info};

use crate::action::{Action, ActionContext, UpdateAction};
use crate::button::{Button, ButtonKind, ButtonState};
use crate::canvas::Canvas;
use crate::commands::{
    InsertLayerAction, LayerTarget, MoveLayerAction, RemoveLayerAction, SelectToolAction,
    SetActiveLayerAction, SetColorAction, SetRadiusAction,
};
use crate::config::EditorConfig;
use crate::event::{Event, Key, Viewport};
use crate::geometry::{Color, Rect, Vec2u};
use crate::history::ActionController;
use crate::layer::Layer;
use crate::render::RenderTarget;
use crate::scrollbar::{Axis, ScrollBar};
use crate::slider::Slider;
use crate::tools::{Filter, FilterAction, ToolKind, ToolSettings};
use crate::window::{Container, Window, WindowId};

pub const ROOT: WindowId = WindowId(1);
pub const CANVAS: WindowId = WindowId(2);
pub const H_SCROLL: WindowId = WindowId(3);
pub const V_SCROLL: WindowId = WindowId(4);
pub const PANEL: WindowId = WindowId(10);
pub const TOOLS: WindowId = WindowId(11);
pub const RADIUS: WindowId = WindowId(12);

const TOOL_BUTTONS: u32 = 100;
const COLOR_BUTTONS: u32 = 200;
const LAYER_BUTTONS: u32 = 300;
const FILTER_BUTTONS: u32 = 400;

const PANEL_WIDTH: u32 = 88;
const UI_MARGIN: u32 = 6;
const UI_BUTTON_H: u32 = 20;
const UI_GAP: u32 = 6;
const SLIDER_H: u32 = 8;
const PANEL_COLOR: Color = Color::rgb(230, 230, 230);

pub fn tool_button(kind: ToolKind) -> WindowId {
    WindowId(TOOL_BUTTONS + kind as u32)
}

pub fn color_button(index: usize) -> WindowId {
    WindowId(COLOR_BUTTONS + index as u32)
}

pub fn filter_button(filter: Filter) -> WindowId {
    WindowId(FILTER_BUTTONS + filter as u32)
}

/// Layer panel buttons, in panel order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerButton {
    Add,
    Remove,
    SelectUp,
    SelectDown,
    MoveDown,
    MoveUp,
}

impl LayerButton {
    pub const ALL: [LayerButton; 6] = [
        LayerButton::Add,
        LayerButton::Remove,
        LayerButton::SelectUp,
        LayerButton::SelectDown,
        LayerButton::MoveDown,
        LayerButton::MoveUp,
    ];

    pub fn id(self) -> WindowId {
        WindowId(LAYER_BUTTONS + self as u32)
    }

    fn label(self) -> char {
        match self {
            LayerButton::Add => '+',
            LayerButton::Remove => '-',
            LayerButton::SelectUp => '^',
            LayerButton::SelectDown => 'v',
            LayerButton::MoveDown => '<',
            LayerButton::MoveUp => '>',
        }
    }

    fn action(self) -> Box<dyn Action> {
        match self {
            LayerButton::Add => Box::new(InsertLayerAction::empty(CANVAS)),
            LayerButton::Remove => Box::new(RemoveLayerAction::active(CANVAS)),
            LayerButton::SelectUp => Box::new(SetActiveLayerAction::new(CANVAS, LayerTarget::Offset(1))),
            LayerButton::SelectDown => Box::new(SetActiveLayerAction::new(CANVAS, LayerTarget::Offset(-1))),
            LayerButton::MoveDown => Box::new(MoveLayerAction::active_by(CANVAS, -1)),
            LayerButton::MoveUp => Box::new(MoveLayerAction::active_by(CANVAS, 1)),
        }
    }
}

/// Stacks panel rows top to bottom.
struct PanelRows {
    y: u32,
}

impl PanelRows {
    fn new() -> Self {
        Self { y: UI_MARGIN }
    }

    fn next(&mut self, height: u32) -> Rect {
        let rect = Rect::from_xywh(UI_MARGIN as i32, self.y as i32, PANEL_WIDTH - UI_MARGIN * 2, height);
        self.y += height + UI_GAP;
        rect
    }

    /// `count` button cells laid out `cols` per row.
    fn grid(&mut self, count: usize, cols: u32) -> Vec<Rect> {
        let width = PANEL_WIDTH - UI_MARGIN * 2;
        let cell_w = (width - UI_GAP * (cols - 1)) / cols;
        let mut cells = Vec::with_capacity(count);
        let mut row = Rect::default();
        for i in 0..count as u32 {
            let col = i % cols;
            if col == 0 {
                row = self.next(UI_BUTTON_H);
            }
            let x = row.pos.x + (col * (cell_w + UI_GAP)) as i32;
            cells.push(Rect::from_xywh(x, row.pos.y, cell_w, UI_BUTTON_H));
        }
        cells
    }
}

enum Shortcut {
    Undo,
    Redo,
    Run(Box<dyn Action>),
}

pub struct Editor {
    root: Container,
    viewport: Viewport,
    history: ActionController,
    config: EditorConfig,
}

impl Editor {
    pub fn new(config: EditorConfig, size: Vec2u) -> Self {
        let mut root = Container::new(ROOT, Rect::new(Default::default(), size))
            .with_background(config.workspace_color);

        let settings = ToolSettings { color: config.brush_color, radius: config.initial_radius() };
        let mut canvas = Canvas::new(CANVAS, config.canvas_layout, size)
            .with_background(config.canvas_background)
            .with_scroll_step(config.scroll_step)
            .with_settings(settings);
        canvas.set_tool(Some(ToolKind::Brush.create()));
        root.add_window(Box::new(canvas));

        for (id, axis) in [(H_SCROLL, Axis::Horizontal), (V_SCROLL, Axis::Vertical)] {
            let bar = ScrollBar::new(id, axis, CANVAS, config.canvas_layout, size).with_step(config.scroll_step);
            root.add_window(Box::new(bar));
        }

        root.add_window(Box::new(Self::build_panel(&config, size)));
        info!(
            "editor: {}x{} viewport, history capacity {}",
            size.x, size.y, config.history_capacity
        );

        let mut editor = Self {
            root,
            viewport: Viewport::new(size),
            history: ActionController::new(config.history_capacity),
            config,
        };
        editor.sync_widgets();
        editor
    }

    fn build_panel(config: &EditorConfig, size: Vec2u) -> Container {
        let mut panel = Container::new(PANEL, Rect::from_xywh(0, 0, PANEL_WIDTH, size.y))
            .with_background(PANEL_COLOR);
        let mut rows = PanelRows::new();

        let mut tools = Container::new(TOOLS, Rect::default());
        for (kind, rect) in ToolKind::ALL.into_iter().zip(rows.grid(ToolKind::ALL.len(), 2)) {
            let mut button = Button::new(tool_button(kind), rect, ButtonKind::Toggle)
                .with_label(kind.label())
                .on_click(move |state| {
                    let tool = (state == ButtonState::Released).then_some(kind);
                    Some(Box::new(SelectToolAction::new(CANVAS, tool)) as Box<dyn Action>)
                });
            if kind == ToolKind::Brush {
                button = button.toggled();
            }
            tools.add_window(Box::new(button));
        }
        panel.add_window(Box::new(tools));

        for (i, (color, rect)) in config
            .palette
            .iter()
            .copied()
            .zip(rows.grid(config.palette.len(), 2))
            .enumerate()
        {
            let button = Button::new(color_button(i), rect, ButtonKind::Momentary)
                .with_fill(color)
                .on_click(move |_| Some(Box::new(SetColorAction::new(CANVAS, color)) as Box<dyn Action>));
            panel.add_window(Box::new(button));
        }

        let slider = Slider::new(
            RADIUS,
            rows.next(SLIDER_H),
            config.brush_radius_min,
            config.brush_radius_max,
            config.initial_radius(),
        )
        .with_label('S')
        .on_change(|radius| Some(Box::new(SetRadiusAction::new(CANVAS, radius)) as Box<dyn Action>));
        panel.add_window(Box::new(slider));

        for (which, rect) in LayerButton::ALL.into_iter().zip(rows.grid(LayerButton::ALL.len(), 2)) {
            let button = Button::new(which.id(), rect, ButtonKind::Momentary)
                .with_label(which.label())
                .on_click(move |_| Some(which.action()));
            panel.add_window(Box::new(button));
        }

        let filters = [Filter::Invert, Filter::Grayscale];
        for (filter, rect) in filters.into_iter().zip(rows.grid(filters.len(), 2)) {
            let button = Button::new(filter_button(filter), rect, ButtonKind::Momentary)
                .with_label(filter.label())
                .on_click(move |_| Some(Box::new(FilterAction::new(CANVAS, filter)) as Box<dyn Action>));
            panel.add_window(Box::new(button));
        }
        panel
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn root(&self) -> &Container {
        &self.root
    }

    pub fn history(&self) -> &ActionController {
        &self.history
    }

    pub fn canvas(&self) -> Option<&Canvas> {
        self.root.find::<Canvas>(CANVAS)
    }

    pub fn canvas_mut(&mut self) -> Option<&mut Canvas> {
        self.root.find_mut::<Canvas>(CANVAS)
    }

    /// Feeds one platform event through shortcuts and the window tree.
    /// Returns whether anything reacted, i.e. whether a redraw is due.
    pub fn handle_event(&mut self, event: Event) -> bool {
        // Minimizing reports a zero size; keep the last layout.
        if let Event::Resized { size } = event {
            if size.x == 0 || size.y == 0 {
                debug!("editor: ignoring resize to {size:?}");
                return false;
            }
        }
        self.viewport.observe(&event);
        if let Event::Resized { size } = event {
            self.relayout(size);
        }

        let changed = match self.shortcut(&event) {
            Some(Shortcut::Undo) => self.undo(),
            Some(Shortcut::Redo) => self.redo(),
            Some(Shortcut::Run(action)) => self.execute(action),
            None => self.execute(Box::new(UpdateAction::new(event))),
        };
        self.sync_widgets();
        changed || matches!(event, Event::Resized { .. })
    }

    pub fn execute(&mut self, action: Box<dyn Action>) -> bool {
        let mut ctx = ActionContext::new(&mut self.root, &self.viewport);
        self.history.execute(action, &mut ctx)
    }

    pub fn undo(&mut self) -> bool {
        let mut ctx = ActionContext::new(&mut self.root, &self.viewport);
        self.history.undo(&mut ctx)
    }

    pub fn redo(&mut self) -> bool {
        let mut ctx = ActionContext::new(&mut self.root, &self.viewport);
        self.history.redo(&mut ctx)
    }

    /// Adds `layer` above the active layer as an undoable step.
    pub fn import_layer(&mut self, layer: Layer) -> bool {
        let changed = self.execute(Box::new(InsertLayerAction::import(CANVAS, layer)));
        self.sync_widgets();
        changed
    }

    /// Swaps in a loaded layer stack. The history refers to the old stack and
    /// is dropped.
    pub fn replace_layers(&mut self, layers: Vec<Layer>) {
        if let Some(canvas) = self.canvas_mut() {
            canvas.replace_layers(layers);
        }
        self.history.clear();
        self.sync_widgets();
    }

    pub fn draw(&self, target: &mut dyn RenderTarget) {
        self.root.draw(target);
    }

    fn relayout(&mut self, size: Vec2u) {
        self.root.set_rect(Rect::new(Default::default(), size));
        if let Some(panel) = self.root.find_mut::<Container>(PANEL) {
            panel.set_rect(Rect::from_xywh(0, 0, PANEL_WIDTH, size.y));
        }
    }

    fn shortcut(&self, event: &Event) -> Option<Shortcut> {
        let Event::KeyPressed { key, modifiers } = *event else {
            return None;
        };
        let settings = self.canvas()?.settings();
        let radius = |delta: f32| {
            let r = (settings.radius + delta).clamp(self.config.brush_radius_min, self.config.brush_radius_max);
            Shortcut::Run(Box::new(SetRadiusAction::new(CANVAS, r)))
        };

        let shortcut = if modifiers.ctrl {
            match key {
                Key::Char('z') if modifiers.shift => Shortcut::Redo,
                Key::Char('z') => Shortcut::Undo,
                Key::Char('y') => Shortcut::Redo,
                Key::Char('n') => Shortcut::Run(Box::new(InsertLayerAction::empty(CANVAS))),
                Key::Char('d') => {
                    let active = self.canvas()?.active_layer_index();
                    Shortcut::Run(Box::new(InsertLayerAction::duplicate(CANVAS, active)))
                }
                Key::Char('[') => Shortcut::Run(Box::new(MoveLayerAction::active_by(CANVAS, -1))),
                Key::Char(']') => Shortcut::Run(Box::new(MoveLayerAction::active_by(CANVAS, 1))),
                _ => return None,
            }
        } else {
            match key {
                Key::Delete => Shortcut::Run(Box::new(RemoveLayerAction::active(CANVAS))),
                Key::Char('-') => radius(-1.0),
                Key::Char('=') => radius(1.0),
                Key::Char('[') => radius(-2.0),
                Key::Char(']') => radius(2.0),
                Key::Char(c @ '1'..='9') => {
                    let index = c as usize - '1' as usize;
                    let color = *self.config.palette.get(index)?;
                    Shortcut::Run(Box::new(SetColorAction::new(CANVAS, color)))
                }
                _ => return None,
            }
        };
        debug!("editor: shortcut {:?} {:?}", key, modifiers);
        Some(shortcut)
    }

    /// Mirrors canvas state into the widgets that display it.
    fn sync_widgets(&mut self) {
        let Some(canvas) = self.canvas() else {
            return;
        };
        let (scroll, ratio, radius) = (canvas.scroll(), canvas.view_ratio(), canvas.settings().radius);
        if let Some(bar) = self.root.find_mut::<ScrollBar>(H_SCROLL) {
            bar.sync(scroll.x, ratio.x);
        }
        if let Some(bar) = self.root.find_mut::<ScrollBar>(V_SCROLL) {
            bar.sync(scroll.y, ratio.y);
        }
        if let Some(slider) = self.root.find_mut::<Slider>(RADIUS) {
            slider.set_value(radius);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Modifiers, MouseButton, WheelAxis};
    use crate::geometry::{Vec2f, Vec2i};
    use crate::render::Frame;

    const SIZE: Vec2u = Vec2u::new(800, 600);

    fn editor() -> Editor {
        Editor::new(EditorConfig::default(), SIZE)
    }

    fn center(editor: &Editor, id: WindowId) -> Vec2i {
        let root: &dyn Window = editor.root();
        let rect = root.get_window_by_id(id).unwrap().rect();
        Vec2i::new(rect.pos.x + rect.size.x as i32 / 2, rect.pos.y + rect.size.y as i32 / 2)
    }

    fn click(editor: &mut Editor, pos: Vec2i) {
        editor.handle_event(Event::MouseMoved { pos });
        editor.handle_event(Event::MouseButtonPressed { button: MouseButton::Left, pos });
        editor.handle_event(Event::MouseButtonReleased { button: MouseButton::Left, pos });
    }

    fn key(editor: &mut Editor, key: Key, modifiers: Modifiers) -> bool {
        editor.handle_event(Event::KeyPressed { key, modifiers })
    }

    fn canvas_point(editor: &Editor, x: i32, y: i32) -> Vec2i {
        editor.canvas().unwrap().pos() + Vec2i::new(x, y)
    }

    fn drag(editor: &mut Editor, from: Vec2i, to: Vec2i) {
        editor.handle_event(Event::MouseMoved { pos: from });
        editor.handle_event(Event::MouseButtonPressed { button: MouseButton::Left, pos: from });
        editor.handle_event(Event::MouseMoved { pos: to });
        editor.handle_event(Event::MouseButtonReleased { button: MouseButton::Left, pos: to });
    }

    fn tool_state(editor: &Editor, kind: ToolKind) -> ButtonState {
        editor.root().find::<Button>(tool_button(kind)).unwrap().state()
    }

    #[test]
    fn test_starts_with_brush_and_one_layer() {
        let editor = editor();
        let canvas = editor.canvas().unwrap();
        assert_eq!(canvas.num_layers(), 1);
        assert_eq!(canvas.tool_kind(), Some(ToolKind::Brush));
        assert_eq!(canvas.settings().radius, 6.0);
        assert_eq!(tool_state(&editor, ToolKind::Brush), ButtonState::Released);
        assert!(!editor.history().can_undo());
    }

    #[test]
    fn test_tool_buttons_are_exclusive() {
        let mut editor = editor();
        let line = center(&editor, tool_button(ToolKind::Line));
        click(&mut editor, line);
        assert_eq!(editor.canvas().unwrap().tool_kind(), Some(ToolKind::Line));
        assert_eq!(tool_state(&editor, ToolKind::Line), ButtonState::Released);
        assert_eq!(tool_state(&editor, ToolKind::Brush), ButtonState::Normal);

        // Clicking the active tool again leaves no tool selected.
        click(&mut editor, line);
        assert_eq!(editor.canvas().unwrap().tool_kind(), None);
        assert_eq!(tool_state(&editor, ToolKind::Line), ButtonState::Normal);
    }

    #[test]
    fn test_stroke_undo_redo_via_shortcuts() {
        let mut editor = editor();
        let from = canvas_point(&editor, 10, 10);
        let to = canvas_point(&editor, 40, 10);
        drag(&mut editor, from, to);

        let painted = |e: &Editor| e.canvas().unwrap().layer(0).get_pixel(Vec2i::new(25, 10));
        assert_eq!(painted(&editor), Color::BLACK);
        assert_eq!(editor.history().len(), 1);

        assert!(key(&mut editor, Key::Char('z'), Modifiers::CTRL));
        assert_eq!(painted(&editor), Color::TRANSPARENT);
        assert!(!key(&mut editor, Key::Char('z'), Modifiers::CTRL));

        let ctrl_shift = Modifiers { ctrl: true, shift: true, alt: false };
        assert!(key(&mut editor, Key::Char('z'), ctrl_shift));
        assert_eq!(painted(&editor), Color::BLACK);
        assert!(!key(&mut editor, Key::Char('y'), Modifiers::CTRL));
    }

    #[test]
    fn test_palette_and_radius_controls() {
        let mut editor = editor();
        let red = center(&editor, color_button(1));
        click(&mut editor, red);
        assert_eq!(editor.canvas().unwrap().settings().color, Color::rgb(255, 0, 0));

        key(&mut editor, Key::Char('3'), Modifiers::NONE);
        assert_eq!(editor.canvas().unwrap().settings().color, Color::rgb(0, 128, 255));

        key(&mut editor, Key::Char(']'), Modifiers::NONE);
        assert_eq!(editor.canvas().unwrap().settings().radius, 8.0);
        assert_eq!(editor.root().find::<Slider>(RADIUS).unwrap().value(), 8.0);

        for _ in 0..100 {
            key(&mut editor, Key::Char('-'), Modifiers::NONE);
        }
        assert_eq!(editor.canvas().unwrap().settings().radius, 1.0);
        // None of these are undoable.
        assert!(editor.history().is_empty());
    }

    #[test]
    fn test_layer_buttons_and_shortcuts() {
        let mut editor = editor();
        let add = center(&editor, LayerButton::Add.id());
        click(&mut editor, add);
        key(&mut editor, Key::Char('n'), Modifiers::CTRL);
        let canvas = editor.canvas().unwrap();
        assert_eq!(canvas.num_layers(), 3);
        assert_eq!(canvas.active_layer_index(), 2);

        let down = center(&editor, LayerButton::SelectDown.id());
        click(&mut editor, down);
        assert_eq!(editor.canvas().unwrap().active_layer_index(), 1);

        key(&mut editor, Key::Delete, Modifiers::NONE);
        assert_eq!(editor.canvas().unwrap().num_layers(), 2);
        assert_eq!(editor.history().len(), 3);

        assert!(editor.undo());
        assert_eq!(editor.canvas().unwrap().num_layers(), 3);
        assert_eq!(editor.canvas().unwrap().active_layer_index(), 1);
    }

    #[test]
    fn test_filter_button_inverts_active_layer() {
        let mut editor = editor();
        let (from, to) = (canvas_point(&editor, 20, 20), canvas_point(&editor, 21, 20));
        drag(&mut editor, from, to);
        let invert = center(&editor, filter_button(Filter::Invert));
        click(&mut editor, invert);
        let pixel = editor.canvas().unwrap().layer(0).get_pixel(Vec2i::new(20, 20));
        assert_eq!(pixel, Color::WHITE);
        assert_eq!(editor.history().len(), 2);
    }

    #[test]
    fn test_wheel_scroll_syncs_scrollbars() {
        let mut editor = editor();
        let pos = canvas_point(&editor, 50, 50);
        editor.handle_event(Event::MouseMoved { pos });
        editor.handle_event(Event::MouseWheelScrolled { axis: WheelAxis::Vertical, delta: -4.0, pos });

        let scroll = editor.canvas().unwrap().scroll();
        assert!((scroll.y - 0.2).abs() < 1e-5);
        let bar = editor.root().find::<ScrollBar>(V_SCROLL).unwrap();
        assert!((bar.scroll() - scroll.y).abs() < 1e-6);
        assert_eq!(editor.root().find::<ScrollBar>(H_SCROLL).unwrap().scroll(), 0.0);
        assert!(editor.history().is_empty());
    }

    #[test]
    fn test_import_and_replace_layers() {
        let mut editor = editor();
        let image = Layer::from_rgba("photo", 1, 1, &[0, 255, 0, 255]).unwrap();
        assert!(editor.import_layer(image));
        assert_eq!(editor.canvas().unwrap().layer(1).name, "photo");
        assert!(editor.history().can_undo());

        let full = editor.canvas().unwrap().full_size();
        let replacement = vec![Layer::new("a", full, Default::default()), Layer::new("b", full, Default::default())];
        editor.replace_layers(replacement);
        let canvas = editor.canvas().unwrap();
        assert_eq!(canvas.num_layers(), 2);
        assert_eq!(canvas.active_layer_index(), 1);
        assert_eq!(canvas.layer(1).area().size, canvas.visible_size());
        assert!(!editor.history().can_undo());
    }

    #[test]
    fn test_resize_relayouts_and_draws() {
        let mut editor = editor();
        assert!(editor.handle_event(Event::Resized { size: Vec2u::new(400, 300) }));
        let canvas = editor.canvas().unwrap();
        assert_eq!(canvas.visible_size(), Vec2u::new(320, 264));
        assert_eq!(canvas.full_size(), Vec2u::new(640, 528));
        assert_eq!(editor.root().rect().size, Vec2u::new(400, 300));
        assert_eq!(editor.canvas().unwrap().view_ratio(), Vec2f::new(0.5, 0.5));

        let mut frame = Frame::new(400, 300);
        editor.draw(&mut frame);
        // Panel, then the white canvas background.
        assert_eq!(frame.pixel(2, 299), Some(PANEL_COLOR));
        let inside = editor.canvas().unwrap().pos() + Vec2i::new(100, 100);
        assert_eq!(frame.pixel(inside.x as u32, inside.y as u32), Some(Color::WHITE));
    }

    #[test]
    fn test_minimize_keeps_pixels() {
        let mut editor = editor();
        let pos = canvas_point(&editor, 20, 20);
        click(&mut editor, pos);
        let pixel = |e: &Editor| e.canvas().unwrap().layer(0).get_pixel(Vec2i::new(20, 20));
        assert_eq!(pixel(&editor), Color::BLACK);
        let visible = editor.canvas().unwrap().visible_size();

        assert!(!editor.handle_event(Event::Resized { size: Vec2u::new(0, 0) }));
        assert_eq!(editor.viewport().size, SIZE);
        assert_eq!(editor.canvas().unwrap().visible_size(), visible);

        editor.handle_event(Event::Resized { size: SIZE });
        assert_eq!(pixel(&editor), Color::BLACK);
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn test_resize_mid_stroke_records_paint() {
        let mut editor = editor();
        let (from, to) = (canvas_point(&editor, 10, 10), canvas_point(&editor, 30, 10));
        editor.handle_event(Event::MouseMoved { pos: from });
        editor.handle_event(Event::MouseButtonPressed { button: MouseButton::Left, pos: from });
        editor.handle_event(Event::MouseMoved { pos: to });
        editor.handle_event(Event::Resized { size: Vec2u::new(900, 700) });
        assert_eq!(editor.history().len(), 1);

        editor.handle_event(Event::MouseButtonReleased { button: MouseButton::Left, pos: to });
        assert_eq!(editor.history().len(), 1);

        let painted = |e: &Editor| e.canvas().unwrap().layer(0).get_pixel(Vec2i::new(20, 10));
        assert_eq!(painted(&editor), Color::BLACK);
        assert!(editor.undo());
        assert_eq!(painted(&editor), Color::TRANSPARENT);
    }
}

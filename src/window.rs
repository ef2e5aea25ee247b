//! The window tree: every UI element is a [`Window`], and [`Container`] nodes
//! own ordered children that they update and draw in insertion order.

use std::any::Any;

use crate::action::Action;
use crate::event::{Event, Viewport};
use crate::geometry::{Color, Rect};
use crate::render::RenderTarget;

/// Identity of a node. Unique within a tree; [`WindowId::INVALID`] marks
/// anonymous nodes that can never be looked up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowId(pub u32);

impl WindowId {
    pub const INVALID: WindowId = WindowId(u32::MAX);

    pub fn is_valid(self) -> bool {
        self != WindowId::INVALID
    }
}

/// State shared by every node.
#[derive(Clone, Debug)]
pub struct WindowBase {
    pub id: WindowId,
    /// Non-owning link to the containing node, set by [`Container::add_window`].
    pub parent: Option<WindowId>,
    pub rect: Rect,
    pub active: bool,
}

impl WindowBase {
    pub fn new(id: WindowId, rect: Rect) -> Self {
        Self { id, parent: None, rect, active: true }
    }
}

/// What a node sees while handling one event.
pub struct UpdateContext<'a> {
    pub viewport: &'a Viewport,
    pending: &'a mut Vec<Box<dyn Action>>,
}

impl<'a> UpdateContext<'a> {
    pub fn new(viewport: &'a Viewport, pending: &'a mut Vec<Box<dyn Action>>) -> Self {
        Self { viewport, pending }
    }

    /// Queues an action for the controller to run once the dispatch finishes.
    pub fn emit(&mut self, action: Box<dyn Action>) {
        self.pending.push(action);
    }

    pub fn is_hovered(&self, rect: Rect) -> bool {
        rect.contains(self.viewport.mouse)
    }
}

pub trait Window: Any {
    fn base(&self) -> &WindowBase;
    fn base_mut(&mut self) -> &mut WindowBase;

    /// Consumes input. Returns whether the event was used by this node
    /// (hover, press, release and drag all count).
    fn update(&mut self, ctx: &mut UpdateContext<'_>, event: &Event) -> bool;

    fn draw(&self, target: &mut dyn RenderTarget);

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn as_container(&self) -> Option<&Container> {
        None
    }

    fn as_container_mut(&mut self) -> Option<&mut Container> {
        None
    }

    /// Whether the node is a toggle currently switched on.
    fn is_released(&self) -> bool {
        false
    }

    /// Switches a toggled node back off without firing it.
    fn reset_state(&mut self) {}

    fn id(&self) -> WindowId {
        self.base().id
    }

    fn rect(&self) -> Rect {
        self.base().rect
    }

    fn set_rect(&mut self, rect: Rect) {
        self.base_mut().rect = rect;
    }

    fn is_active(&self) -> bool {
        self.base().active
    }

    fn set_active(&mut self, active: bool) {
        self.base_mut().active = active;
    }

    fn parent(&self) -> Option<WindowId> {
        self.base().parent
    }
}

impl<'w> dyn Window + 'w {
    /// Depth-first search rooted at this node (this node is checked first).
    pub fn get_window_by_id(&self, id: WindowId) -> Option<&dyn Window> {
        if !id.is_valid() {
            return None;
        }
        if self.id() == id {
            return Some(self);
        }
        self.as_container()?
            .children
            .iter()
            .find_map(|child| child.as_ref().get_window_by_id(id))
    }

    pub fn get_window_by_id_mut(&mut self, id: WindowId) -> Option<&mut dyn Window> {
        if !id.is_valid() {
            return None;
        }
        if self.id() == id {
            let this: &mut dyn Window = self;
            return Some(this);
        }
        self.as_container_mut()?
            .children
            .iter_mut()
            .find_map(|child| child.as_mut().get_window_by_id_mut(id))
    }

    /// Every valid id in this subtree, depth-first.
    pub fn subtree_ids(&self) -> Vec<WindowId> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, ids: &mut Vec<WindowId>) {
        if self.id().is_valid() {
            ids.push(self.id());
        }
        if let Some(container) = self.as_container() {
            for child in &container.children {
                child.as_ref().collect_ids(ids);
            }
        }
    }

    pub fn downcast_ref<T: Window>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Window>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Looks up a node by id and checks that it has type `T`.
    pub fn find<T: Window>(&self, id: WindowId) -> Option<&T> {
        self.get_window_by_id(id)?.downcast_ref::<T>()
    }

    pub fn find_mut<T: Window>(&mut self, id: WindowId) -> Option<&mut T> {
        self.get_window_by_id_mut(id)?.downcast_mut::<T>()
    }
}

/// Node that owns an ordered list of children.
///
/// Among its children at most one toggle is switched on at a time: when a
/// child turns on during a dispatch, the previously selected child is reset.
pub struct Container {
    base: WindowBase,
    children: Vec<Box<dyn Window>>,
    selected: Option<usize>,
    background: Option<Color>,
}

impl Container {
    pub fn new(id: WindowId, rect: Rect) -> Self {
        Self {
            base: WindowBase::new(id, rect),
            children: Vec::new(),
            selected: None,
            background: None,
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn children(&self) -> &[Box<dyn Window>] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Id of the child that is currently toggled on, if any.
    pub fn selected(&self) -> Option<WindowId> {
        self.selected.map(|i| self.children[i].id())
    }

    /// Appends a child.
    ///
    /// # Panics
    /// If any id of the child's subtree is already used in this subtree.
    pub fn add_window(&mut self, mut child: Box<dyn Window>) {
        let this: &dyn Window = self;
        for id in child.as_ref().subtree_ids() {
            assert!(
                this.get_window_by_id(id).is_none(),
                "duplicate window id {:?}",
                id
            );
        }
        child.base_mut().parent = Some(self.base.id);
        let released = child.is_released();
        self.children.push(child);
        if released {
            self.select(self.children.len() - 1);
        }
    }

    /// Detaches the node with `id` from anywhere in this subtree.
    pub fn remove_window(&mut self, id: WindowId) -> Option<Box<dyn Window>> {
        if !id.is_valid() {
            return None;
        }
        if let Some(index) = self.children.iter().position(|c| c.id() == id) {
            let mut child = self.children.remove(index);
            self.selected = match self.selected {
                Some(s) if s == index => None,
                Some(s) if s > index => Some(s - 1),
                other => other,
            };
            child.base_mut().parent = None;
            return Some(child);
        }
        self.children
            .iter_mut()
            .filter_map(|c| c.as_container_mut())
            .find_map(|c| c.remove_window(id))
    }

    pub fn find<T: Window>(&self, id: WindowId) -> Option<&T> {
        let this: &dyn Window = self;
        this.find::<T>(id)
    }

    pub fn find_mut<T: Window>(&mut self, id: WindowId) -> Option<&mut T> {
        let this: &mut dyn Window = self;
        this.find_mut::<T>(id)
    }

    fn select(&mut self, index: usize) {
        if let Some(previous) = self.selected.replace(index) {
            if previous != index {
                if let Some(child) = self.children.get_mut(previous) {
                    child.reset_state();
                }
            }
        }
    }
}

impl Window for Container {
    fn base(&self) -> &WindowBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WindowBase {
        &mut self.base
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>, event: &Event) -> bool {
        let mut consumed = false;
        for index in 0..self.children.len() {
            let child = &mut self.children[index];
            if !child.is_active() {
                continue;
            }
            let was_released = child.is_released();
            consumed |= child.update(ctx, event);
            let now_released = child.is_released();

            if now_released && !was_released {
                self.select(index);
            } else if was_released && !now_released && self.selected == Some(index) {
                self.selected = None;
            }
        }
        consumed
    }

    fn draw(&self, target: &mut dyn RenderTarget) {
        if let Some(color) = self.background {
            target.fill_rect(self.base.rect, color);
        }
        for child in self.children.iter().filter(|c| c.is_active()) {
            child.draw(target);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_container(&self) -> Option<&Container> {
        Some(self)
    }

    fn as_container_mut(&mut self) -> Option<&mut Container> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::{Button, ButtonKind, ButtonState};
    use crate::event::MouseButton;
    use crate::geometry::{Vec2i, Vec2u};

    fn click(root: &mut Container, viewport: &mut Viewport, pos: Vec2i) -> Vec<Box<dyn Action>> {
        let mut pending = Vec::new();
        for event in [
            Event::MouseMoved { pos },
            Event::MouseButtonPressed { button: MouseButton::Left, pos },
            Event::MouseButtonReleased { button: MouseButton::Left, pos },
        ] {
            viewport.observe(&event);
            let mut ctx = UpdateContext::new(viewport, &mut pending);
            root.update(&mut ctx, &event);
        }
        pending
    }

    fn toggle(id: u32, x: i32) -> Box<dyn Window> {
        Box::new(Button::new(WindowId(id), Rect::from_xywh(x, 0, 10, 10), ButtonKind::Toggle))
    }

    fn state(root: &Container, id: u32) -> ButtonState {
        root.find::<Button>(WindowId(id)).unwrap().state()
    }

    #[test]
    fn test_lookup_is_depth_first_and_nullable() {
        let mut root = Container::new(WindowId(1), Rect::default());
        let mut bar = Container::new(WindowId(2), Rect::default());
        bar.add_window(toggle(3, 0));
        root.add_window(Box::new(bar));

        let root_dyn: &dyn Window = &root;
        assert_eq!(root_dyn.get_window_by_id(WindowId(1)).map(|w| w.id()), Some(WindowId(1)));
        let nested = root_dyn.get_window_by_id(WindowId(3)).unwrap();
        assert_eq!(nested.parent(), Some(WindowId(2)));
        assert!(root_dyn.get_window_by_id(WindowId(99)).is_none());
        assert!(root_dyn.get_window_by_id(WindowId::INVALID).is_none());
        assert!(root.find::<Container>(WindowId(3)).is_none());
        assert!(root.find::<Button>(WindowId(3)).is_some());
    }

    #[test]
    #[should_panic(expected = "duplicate window id")]
    fn test_duplicate_id_is_fatal() {
        let mut root = Container::new(WindowId(1), Rect::default());
        root.add_window(toggle(5, 0));
        root.add_window(toggle(5, 20));
    }

    #[test]
    #[should_panic(expected = "duplicate window id")]
    fn test_duplicate_id_in_attached_subtree_is_fatal() {
        let mut root = Container::new(WindowId(1), Rect::default());
        root.add_window(toggle(2, 0));

        let mut panel = Container::new(WindowId(10), Rect::default());
        let mut group = Container::new(WindowId(11), Rect::default());
        group.add_window(toggle(2, 20));
        panel.add_window(Box::new(group));
        root.add_window(Box::new(panel));
    }

    #[test]
    fn test_subtree_ids_skip_anonymous_nodes() {
        let mut bar = Container::new(WindowId(2), Rect::default());
        bar.add_window(toggle(3, 0));
        bar.add_window(Box::new(Container::new(WindowId::INVALID, Rect::default())));
        bar.add_window(toggle(4, 20));
        let bar_dyn: &dyn Window = &bar;
        assert_eq!(bar_dyn.subtree_ids(), vec![WindowId(2), WindowId(3), WindowId(4)]);
    }

    #[test]
    fn test_anonymous_nodes_may_repeat() {
        let mut root = Container::new(WindowId(1), Rect::default());
        root.add_window(Box::new(Container::new(WindowId::INVALID, Rect::default())));
        root.add_window(Box::new(Container::new(WindowId::INVALID, Rect::default())));
        assert_eq!(root.len(), 2);
    }

    #[test]
    fn test_single_selection_among_siblings() {
        let mut root = Container::new(WindowId(1), Rect::new(Vec2i::default(), Vec2u::new(100, 20)));
        root.add_window(toggle(10, 0));
        root.add_window(toggle(11, 20));
        let mut viewport = Viewport::new(Vec2u::new(100, 20));

        click(&mut root, &mut viewport, Vec2i::new(5, 5));
        assert_eq!(state(&root, 10), ButtonState::Released);
        assert_eq!(root.selected(), Some(WindowId(10)));

        // The release event that turns B on resets A within the same pass.
        let pos = Vec2i::new(25, 5);
        let mut pending = Vec::new();
        for event in [
            Event::MouseMoved { pos },
            Event::MouseButtonPressed { button: MouseButton::Left, pos },
        ] {
            viewport.observe(&event);
            root.update(&mut UpdateContext::new(&viewport, &mut pending), &event);
        }
        assert_eq!(state(&root, 10), ButtonState::Released);
        let release = Event::MouseButtonReleased { button: MouseButton::Left, pos };
        viewport.observe(&release);
        root.update(&mut UpdateContext::new(&viewport, &mut pending), &release);
        assert_eq!(state(&root, 11), ButtonState::Released);
        assert_eq!(state(&root, 10), ButtonState::Normal);
        assert_eq!(root.selected(), Some(WindowId(11)));

        // Clicking the selected toggle again switches it off.
        click(&mut root, &mut viewport, pos);
        assert_eq!(state(&root, 11), ButtonState::Normal);
        assert_eq!(root.selected(), None);
    }

    #[test]
    fn test_remove_window_detaches() {
        let mut root = Container::new(WindowId(1), Rect::default());
        let mut bar = Container::new(WindowId(2), Rect::default());
        bar.add_window(toggle(3, 0));
        root.add_window(Box::new(bar));

        let removed = root.remove_window(WindowId(3)).unwrap();
        assert_eq!(removed.parent(), None);
        let root_dyn: &dyn Window = &root;
        assert!(root_dyn.get_window_by_id(WindowId(3)).is_none());
        assert!(root.remove_window(WindowId(3)).is_none());
    }

    #[test]
    fn test_inactive_children_are_skipped() {
        let mut root = Container::new(WindowId(1), Rect::default());
        root.add_window(toggle(10, 0));
        root.find_mut::<Button>(WindowId(10)).unwrap().set_active(false);

        let mut viewport = Viewport::new(Vec2u::new(50, 50));
        click(&mut root, &mut viewport, Vec2i::new(5, 5));
        assert_eq!(state(&root, 10), ButtonState::Normal);
    }
}

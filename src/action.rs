//! Commands produced by the window tree and run by the
//! [`ActionController`](crate::history::ActionController).

use crate::canvas::Canvas;
use crate::event::{Event, Viewport};
use crate::window::{UpdateContext, Window, WindowId};

/// A unit of work. Undoable actions keep enough state to reverse themselves.
pub trait Action {
    /// Applies the action. Returns `false` when nothing changed; such actions
    /// are never recorded in the history.
    fn execute(&mut self, ctx: &mut ActionContext<'_>) -> bool;

    fn is_undoable(&self) -> bool {
        false
    }

    fn undo(&mut self, _ctx: &mut ActionContext<'_>) -> bool {
        false
    }

    fn redo(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        self.execute(ctx)
    }

    fn description(&self) -> String;
}

/// Everything an action may touch: the window tree it runs against, the
/// current viewport, and a queue for follow-up actions.
pub struct ActionContext<'a> {
    root: &'a mut dyn Window,
    viewport: &'a Viewport,
    pending: Vec<Box<dyn Action>>,
}

impl<'a> ActionContext<'a> {
    pub fn new(root: &'a mut dyn Window, viewport: &'a Viewport) -> Self {
        Self { root, viewport, pending: Vec::new() }
    }

    pub fn root(&self) -> &dyn Window {
        &*self.root
    }

    pub fn root_mut(&mut self) -> &mut dyn Window {
        &mut *self.root
    }

    pub fn viewport(&self) -> &Viewport {
        self.viewport
    }

    pub fn canvas(&self, id: WindowId) -> Option<&Canvas> {
        self.root.find::<Canvas>(id)
    }

    pub fn canvas_mut(&mut self, id: WindowId) -> Option<&mut Canvas> {
        self.root.find_mut::<Canvas>(id)
    }

    pub fn window_mut<T: Window>(&mut self, id: WindowId) -> Option<&mut T> {
        self.root.find_mut::<T>(id)
    }

    pub fn emit(&mut self, action: Box<dyn Action>) {
        self.pending.push(action);
    }

    pub(crate) fn take_pending(&mut self) -> Vec<Box<dyn Action>> {
        std::mem::take(&mut self.pending)
    }

    /// Runs one update pass of the whole tree; actions emitted by nodes are queued.
    pub fn dispatch(&mut self, event: &Event) -> bool {
        let mut ctx = UpdateContext::new(self.viewport, &mut self.pending);
        self.root.update(&mut ctx, event)
    }
}

/// The per-frame action: feeds one event through the window tree.
pub struct UpdateAction {
    event: Event,
}

impl UpdateAction {
    pub fn new(event: Event) -> Self {
        Self { event }
    }
}

impl Action for UpdateAction {
    fn execute(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        ctx.dispatch(&self.event)
    }

    fn description(&self) -> String {
        format!("Update: {:?}", self.event)
    }
}

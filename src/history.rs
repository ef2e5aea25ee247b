use std::collections::VecDeque;

use log::{debug, warn};

use crate::action::{Action, ActionContext};

pub const DEFAULT_CAPACITY: usize = 50;

/// Runs actions and keeps a bounded linear undo history.
///
/// `cursor` counts the applied entries: entries `[0, cursor)` can be undone,
/// entries `[cursor, len)` redone. Recording a new action drops the redo part.
pub struct ActionController {
    history: VecDeque<Box<dyn Action>>,
    cursor: usize,
    capacity: usize,
}

impl ActionController {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: VecDeque::new(),
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    /// Executes `action`, records it when it changed state and can be undone,
    /// then runs every action emitted along the way. Returns whether anything
    /// changed.
    pub fn execute(&mut self, action: Box<dyn Action>, ctx: &mut ActionContext<'_>) -> bool {
        let mut changed = self.run(action, ctx);
        loop {
            let pending = ctx.take_pending();
            if pending.is_empty() {
                break;
            }
            for next in pending {
                changed |= self.run(next, ctx);
            }
        }
        changed
    }

    fn run(&mut self, mut action: Box<dyn Action>, ctx: &mut ActionContext<'_>) -> bool {
        if !action.execute(ctx) {
            return false;
        }
        if action.is_undoable() {
            self.record(action);
        }
        true
    }

    fn record(&mut self, action: Box<dyn Action>) {
        debug!("history: push {}", action.description());
        self.history.truncate(self.cursor);
        self.history.push_back(action);
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
        self.cursor = self.history.len();
    }

    pub fn undo(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let action = &mut self.history[self.cursor - 1];
        if !action.undo(ctx) {
            warn!("history: undo of '{}' failed", action.description());
            return false;
        }
        debug!("history: undo {}", action.description());
        self.cursor -= 1;
        true
    }

    pub fn redo(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        if self.cursor >= self.history.len() {
            return false;
        }
        let action = &mut self.history[self.cursor];
        if !action.redo(ctx) {
            warn!("history: redo of '{}' failed", action.description());
            return false;
        }
        debug!("history: redo {}", action.description());
        self.cursor += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.history.len()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Descriptions of all recorded actions, oldest first.
    pub fn descriptions(&self) -> Vec<String> {
        self.history.iter().map(|a| a.description()).collect()
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.cursor = 0;
    }
}

impl Default for ActionController {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

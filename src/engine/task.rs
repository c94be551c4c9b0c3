//! Ordered main and deferred steps with forward-only cursors.

use std::fmt;

use super::step::{BindFunc, Step};

/// The steps of one reconcile invocation.
///
/// A task is consumed as it runs: the cursors only move forward, so once
/// [`has_next_step`](Self::has_next_step) returns `false` it stays `false`.
/// Build a fresh task for every invocation.
pub struct Task<C> {
    steps: Vec<Step<C>>,
    deferred_steps: Vec<Step<C>>,
    cursor: usize,
    deferred_cursor: usize,
}

impl<C> Task<C> {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            deferred_steps: Vec::new(),
            cursor: 0,
            deferred_cursor: 0,
        }
    }

    /// Build a task by applying `binders` in order.
    pub fn from_binders(binders: impl IntoIterator<Item = BindFunc<C>>) -> Self {
        let mut task = Self::new();
        for bind in binders {
            bind(&mut task);
        }
        task
    }

    /// Apply one more binder.
    pub fn bind(&mut self, bind: BindFunc<C>) -> &mut Self {
        bind(self);
        self
    }

    pub fn add_step(&mut self, step: Step<C>) {
        self.steps.push(step);
    }

    pub fn add_deferred_step(&mut self, step: Step<C>) {
        self.deferred_steps.push(step);
    }

    /// Number of main steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.deferred_steps.is_empty()
    }

    pub fn deferred_len(&self) -> usize {
        self.deferred_steps.len()
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    pub fn deferred_step_names(&self) -> Vec<&str> {
        self.deferred_steps.iter().map(|s| s.name()).collect()
    }

    pub fn has_next_step(&self) -> bool {
        self.cursor < self.steps.len()
    }

    /// Take the next main step, advancing the cursor.
    pub fn next_step(&mut self) -> Option<Step<C>> {
        let step = self.steps.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(step)
    }

    pub fn has_next_deferred_step(&self) -> bool {
        self.deferred_cursor < self.deferred_steps.len()
    }

    /// Take the next deferred step, advancing the deferred cursor.
    pub fn next_deferred_step(&mut self) -> Option<Step<C>> {
        let step = self.deferred_steps.get(self.deferred_cursor).cloned()?;
        self.deferred_cursor += 1;
        Some(step)
    }
}

impl<C> Default for Task<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Task<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("steps", &self.step_names())
            .field("deferred_steps", &self.deferred_step_names())
            .field("cursor", &self.cursor)
            .field("deferred_cursor", &self.deferred_cursor)
            .finish()
    }
}

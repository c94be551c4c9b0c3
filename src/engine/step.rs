//! Steps and the binders that assemble them into tasks.

use std::fmt;
use std::rc::Rc;

use super::flow::{Flow, Requeue};
use super::task::Task;
use crate::error::Result;

/// The work a step performs.
pub type Action<C> = dyn Fn(&mut C, &Flow) -> Result<Requeue>;

/// A named unit of reconcile work.
///
/// Names are used for logging only; two steps may share a name.
pub struct Step<C> {
    name: String,
    action: Rc<Action<C>>,
}

impl<C> Step<C> {
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut C, &Flow) -> Result<Requeue> + 'static,
    {
        Self {
            name: name.into(),
            action: Rc::new(action),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the action against `rc`.
    pub fn execute(&self, rc: &mut C, flow: &Flow) -> Result<Requeue> {
        (self.action)(rc, flow)
    }
}

impl<C> Clone for Step<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            action: Rc::clone(&self.action),
        }
    }
}

impl<C> fmt::Debug for Step<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step").field("name", &self.name).finish()
    }
}

/// Appends zero or more steps to a task under construction.
///
/// Binders are evaluated once, when the task is built, so any condition a
/// binder checks is decided at build time rather than while the task runs.
pub type BindFunc<C> = Box<dyn FnOnce(&mut Task<C>)>;

/// Bind a single main step.
pub fn bind_step<C: 'static>(step: Step<C>) -> BindFunc<C> {
    Box::new(move |task| task.add_step(step))
}

/// Bind several main steps in order.
pub fn bind_steps<C: 'static>(steps: Vec<Step<C>>) -> BindFunc<C> {
    Box::new(move |task| {
        for step in steps {
            task.add_step(step);
        }
    })
}

/// Bind a step that runs in the deferred phase.
pub fn bind_deferred_step<C: 'static>(step: Step<C>) -> BindFunc<C> {
    Box::new(move |task| task.add_deferred_step(step))
}

/// Apply `bind` only when `cond` holds at build time.
pub fn when<C: 'static>(cond: bool, bind: BindFunc<C>) -> BindFunc<C> {
    if cond {
        bind
    } else {
        Box::new(|_| {})
    }
}

/// Apply `binds` in order as one binder.
pub fn combine<C: 'static>(binds: Vec<BindFunc<C>>) -> BindFunc<C> {
    Box::new(move |task| {
        for bind in binds {
            bind(task);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Logger;
    use std::time::Duration;

    fn flow() -> Flow {
        Flow::new(Logger::new(), Duration::from_secs(1))
    }

    fn noop(name: &str) -> Step<u32> {
        Step::new(name, |_: &mut u32, flow: &Flow| flow.pass())
    }

    #[test]
    fn step_runs_action_against_context() {
        let step = Step::new("bump", |n: &mut u32, flow: &Flow| {
            *n += 1;
            flow.pass()
        });
        let mut n = 0;
        step.execute(&mut n, &flow()).unwrap();
        step.execute(&mut n, &flow()).unwrap();
        assert_eq!(n, 2);
    }

    #[test]
    fn cloned_step_shares_action() {
        let step = noop("a");
        let clone = step.clone();
        assert_eq!(clone.name(), "a");
        assert!(format!("{:?}", clone).contains("\"a\""));
    }

    #[test]
    fn when_false_binds_nothing() {
        let task = Task::from_binders(vec![when(false, bind_step(noop("skipped")))]);
        assert_eq!(task.len(), 0);
    }

    #[test]
    fn when_true_binds_step() {
        let task = Task::from_binders(vec![when(true, bind_step(noop("kept")))]);
        assert_eq!(task.step_names(), vec!["kept"]);
    }

    #[test]
    fn combine_keeps_order_and_phases() {
        let task = Task::from_binders(vec![combine(vec![
            bind_step(noop("a")),
            bind_deferred_step(noop("cleanup")),
            bind_steps(vec![noop("b"), noop("a")]),
        ])]);
        assert_eq!(task.step_names(), vec!["a", "b", "a"]);
        assert_eq!(task.deferred_step_names(), vec!["cleanup"]);
    }
}

//! Ready-made steps for common outcomes.

use std::time::Duration;

use super::flow::Flow;
use super::step::{bind_step, when, BindFunc, Step};
use crate::context::ReconcileContext;

/// Stop the chain and wait for the next event.
pub fn wait<C: 'static>(msg: impl Into<String>) -> BindFunc<C> {
    let msg = msg.into();
    bind_step(Step::new("Wait", move |_: &mut C, flow: &Flow| {
        flow.wait(&msg, &[])
    }))
}

/// Stop the chain; behaves exactly like [`wait`] but reads better at the
/// call site when something is wrong.
pub fn abort<C: 'static>(msg: impl Into<String>) -> BindFunc<C> {
    let msg = msg.into();
    bind_step(Step::new("Abort", move |_: &mut C, flow: &Flow| {
        flow.wait(&msg, &[])
    }))
}

/// [`abort`] when `cond` holds at build time.
pub fn abort_when<C: 'static>(cond: bool, msg: impl Into<String>) -> BindFunc<C> {
    when(cond, abort(msg))
}

/// Stop the chain and run again right away.
pub fn retry<C: 'static>(msg: impl Into<String>) -> BindFunc<C> {
    let msg = msg.into();
    bind_step(Step::new("Retry", move |_: &mut C, flow: &Flow| {
        flow.retry(&msg, &[])
    }))
}

/// Stop the chain and run again after `duration`.
pub fn retry_after<C: 'static>(duration: Duration, msg: impl Into<String>) -> BindFunc<C> {
    let msg = msg.into();
    bind_step(Step::new(
        format!("RetryAfter{:?}", duration),
        move |_: &mut C, flow: &Flow| flow.retry_after(duration, &msg, &[]),
    ))
}

pub fn requeue<C: 'static>(msg: impl Into<String>) -> BindFunc<C> {
    retry(msg)
}

pub fn requeue_after<C: 'static>(duration: Duration, msg: impl Into<String>) -> BindFunc<C> {
    retry_after(duration, msg)
}

/// Set the context's force-requeue delay and carry on.
///
/// The executor applies the delay to the final outcome after the deferred
/// steps have run.
pub fn schedule_after<C: ReconcileContext + 'static>(duration: Duration) -> BindFunc<C> {
    bind_step(Step::new(
        format!("ScheduleAfter{:?}", duration),
        move |rc: &mut C, flow: &Flow| {
            rc.reset_force_requeue_after(duration);
            flow.pass()
        },
    ))
}

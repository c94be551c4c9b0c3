//! Step chain execution.
//!
//! A reconcile invocation is expressed as a [`Task`]: an ordered list of
//! main [`Step`]s followed by deferred steps that always run. The
//! [`Executor`] drives the task, and each step steers it through the
//! [`Flow`] it receives.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use opkit::context::{BaseReconcileContext, ObjectKey, WorkContext};
//! use opkit::engine::{bind_deferred_step, bind_step, Executor, Flow, Requeue, Step, Task};
//! use opkit::logging::Logger;
//!
//! let mut rc = BaseReconcileContext::new(
//!     ObjectKey::new("db", "mysql"),
//!     WorkContext::background(),
//!     "mysql-operator",
//! );
//! let task = Task::from_binders(vec![
//!     bind_step(Step::new("CheckReady", |_: &mut BaseReconcileContext, flow: &Flow| {
//!         flow.retry_after(Duration::from_secs(5), "pods not ready", &[])
//!     })),
//!     bind_deferred_step(Step::new("SyncStatus", |_: &mut BaseReconcileContext, flow: &Flow| {
//!         flow.pass()
//!     })),
//! ]);
//!
//! let outcome = Executor::new(Logger::named("mysql")).execute(&mut rc, task).unwrap();
//! assert_eq!(outcome, Requeue::After(Duration::from_secs(5)));
//! ```

pub mod common;
pub mod executor;
pub mod flow;
pub mod step;
pub mod task;
pub mod tracer;

pub use common::{abort, abort_when, requeue, requeue_after, retry, retry_after, schedule_after, wait};
pub use executor::Executor;
pub use flow::{Flow, Requeue, DEFAULT_RETRY_ERR_DELAY};
pub use step::{bind_deferred_step, bind_step, bind_steps, combine, when, Action, BindFunc, Step};
pub use task::Task;
pub use tracer::{RunId, Tracer};

//! opkit - Step chain execution for reconcile loops.
//!
//! A controller expresses one reconcile invocation as an ordered chain of
//! named steps plus deferred steps that always run. Each step ends with a
//! flow verb (continue, wait, retry, error and so on) and the executor turns
//! the chain into a single outcome for the control loop: no requeue, requeue
//! now, requeue after a delay, or an error.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Settings loading, layering and validation
//! - [`context`] - Reconcile context, cancellation and the pod exec boundary
//! - [`engine`] - Steps, tasks, flow verbs and the executor
//! - [`error`] - Error types and result aliases
//! - [`logging`] - Named loggers and subscriber setup
//! - [`password`] - Random password generation
//! - [`plan`] - Scripted plans driving `opkit run`
//!
//! # Example
//!
//! ```
//! use opkit::context::{BaseReconcileContext, ObjectKey, WorkContext};
//! use opkit::engine::{abort_when, bind_step, Executor, Flow, Requeue, Step, Task};
//! use opkit::logging::Logger;
//!
//! let mut rc = BaseReconcileContext::new(
//!     ObjectKey::new("db", "mysql"),
//!     WorkContext::background(),
//!     "mysql-operator",
//! );
//! let paused = false;
//! let task = Task::from_binders(vec![
//!     abort_when(paused, "reconcile paused"),
//!     bind_step(Step::new("EnsureService", |_: &mut BaseReconcileContext, flow: &Flow| {
//!         flow.proceed("service ready", &[])
//!     })),
//! ]);
//!
//! let outcome = Executor::new(Logger::new()).execute(&mut rc, task).unwrap();
//! assert_eq!(outcome, Requeue::No);
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod logging;
pub mod password;
pub mod plan;

pub use context::{BaseReconcileContext, ObjectKey, ReconcileContext, WorkContext};
pub use engine::{Executor, Flow, Requeue, Step, Task};
pub use error::{OpkitError, Result};

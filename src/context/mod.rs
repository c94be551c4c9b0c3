//! Reconcile context and the collaborator capabilities steps may use.
//!
//! - [`ReconcileContext`] - identity, cancellation, debug flag and the
//!   force-requeue delay shared by a step chain
//! - [`BaseReconcileContext`] - the default implementation
//! - [`WorkContext`] - cooperative cancellation handle
//! - [`exec`] - the exec-in-pod boundary

pub mod exec;
pub mod reconcile;
pub mod work;

pub use exec::{ensure_container, prepare_exec, ExecOptions, ExecOutput, PodExec, PodRef};
pub use reconcile::{BaseReconcileContext, ObjectKey, ReconcileContext};
pub use work::WorkContext;

//! The per-invocation reconcile context.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::work::WorkContext;

/// Identity of the object being reconciled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectKey {
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

/// What every step chain can rely on from its context.
///
/// Controllers usually define their own context type carrying API clients
/// and other capabilities, embed a [`BaseReconcileContext`] in it and
/// forward these methods.
pub trait ReconcileContext {
    /// The object this invocation reconciles.
    fn key(&self) -> &ObjectKey;

    fn name(&self) -> &str {
        &self.key().name
    }

    fn namespace(&self) -> &str {
        &self.key().namespace
    }

    /// Cancellation handle for the work done by step actions.
    fn work(&self) -> &WorkContext;

    /// Field manager used when writing objects.
    fn field_owner(&self) -> &str;

    /// Turns on step tracing for this invocation only.
    fn debug(&self) -> bool {
        false
    }

    /// Minimum re-run delay imposed on the final outcome; zero when unset.
    fn force_requeue_after(&self) -> Duration;

    /// Replace the force-requeue delay. Last write wins.
    fn reset_force_requeue_after(&mut self, d: Duration);
}

/// Plain [`ReconcileContext`] implementation.
#[derive(Debug, Clone)]
pub struct BaseReconcileContext {
    key: ObjectKey,
    work: WorkContext,
    owner: String,
    debug: bool,
    force_requeue_after: Duration,
}

impl BaseReconcileContext {
    pub fn new(key: ObjectKey, work: WorkContext, owner: impl Into<String>) -> Self {
        Self {
            key,
            work,
            owner: owner.into(),
            debug: false,
            force_requeue_after: Duration::ZERO,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

impl ReconcileContext for BaseReconcileContext {
    fn key(&self) -> &ObjectKey {
        &self.key
    }

    fn work(&self) -> &WorkContext {
        &self.work
    }

    fn field_owner(&self) -> &str {
        &self.owner
    }

    fn debug(&self) -> bool {
        self.debug
    }

    fn force_requeue_after(&self) -> Duration {
        self.force_requeue_after
    }

    fn reset_force_requeue_after(&mut self, d: Duration) {
        self.force_requeue_after = d;
    }
}

//! Cooperative cancellation for step actions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{OpkitError, Result};

/// A cancellable work context shared between a reconcile invocation and
/// whoever may want to stop it.
///
/// The executor never polls this; long-running step actions call
/// [`check`](Self::check) between units of work.
///
/// ```
/// use opkit::context::WorkContext;
///
/// let ctx = WorkContext::background();
/// let handle = ctx.clone();
/// assert!(ctx.check().is_ok());
/// handle.cancel();
/// assert!(ctx.check().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct WorkContext {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl WorkContext {
    /// A context that is never cancelled unless [`cancel`](Self::cancel) is called.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Derive a context sharing this one's cancellation with a tighter deadline.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        Self {
            cancelled: Arc::clone(&self.cancelled),
            deadline: Some(match self.deadline {
                Some(parent) if parent < deadline => parent,
                _ => deadline,
            }),
        }
    }

    /// Cancel this context and every clone of it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// `Err` once the context is cancelled or past its deadline.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(OpkitError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(OpkitError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_is_live() {
        let ctx = WorkContext::background();
        assert!(!ctx.is_cancelled());
        assert!(ctx.deadline().is_none());
        assert!(ctx.check().is_ok());
    }

    #[test]
    fn cancel_is_visible_through_clones() {
        let ctx = WorkContext::background();
        let clone = ctx.clone();
        clone.cancel();
        assert!(matches!(ctx.check(), Err(OpkitError::Cancelled)));
    }

    #[test]
    fn zero_timeout_is_already_expired() {
        let ctx = WorkContext::with_timeout(Duration::ZERO);
        assert!(matches!(ctx.check(), Err(OpkitError::DeadlineExceeded)));
    }

    #[test]
    fn child_keeps_earlier_parent_deadline() {
        let parent = WorkContext::with_timeout(Duration::from_secs(1));
        let child = parent.child_with_timeout(Duration::from_secs(60));
        assert_eq!(child.deadline(), parent.deadline());
    }

    #[test]
    fn child_shares_cancellation() {
        let parent = WorkContext::background();
        let child = parent.child_with_timeout(Duration::from_secs(60));
        parent.cancel();
        assert!(child.is_cancelled());
    }
}

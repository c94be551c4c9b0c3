//! Outcome vocabulary for step actions.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::error::{OpkitError, Result};
use crate::logging::{KeyValues, Logger};

/// Delay requested by [`Flow::retry_err`] unless the executor is configured otherwise.
pub const DEFAULT_RETRY_ERR_DELAY: Duration = Duration::from_secs(1);

/// What the governing control loop should do after this invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Requeue {
    /// Wait for the next externally triggered event.
    #[default]
    No,
    /// Run again right away.
    Immediately,
    /// Run again after the given delay.
    After(Duration),
}

impl Requeue {
    /// Requeue after `delay`; a zero delay means no requeue.
    pub fn after(delay: Duration) -> Self {
        if delay.is_zero() {
            Requeue::No
        } else {
            Requeue::After(delay)
        }
    }

    /// Whether any re-run was requested.
    pub fn is_requeue(&self) -> bool {
        !matches!(self, Requeue::No)
    }

    /// The requested delay, zero unless this is [`Requeue::After`].
    pub fn requeue_after(&self) -> Duration {
        match self {
            Requeue::After(d) => *d,
            _ => Duration::ZERO,
        }
    }

    /// Never let the re-run happen later than `limit`.
    ///
    /// A positive delay at or under `limit` is kept; anything else, including
    /// `No` and `Immediately`, becomes `After(limit)`.
    pub fn clamp_to(self, limit: Duration) -> Self {
        match self {
            Requeue::After(d) if !d.is_zero() && d <= limit => self,
            _ => Requeue::After(limit),
        }
    }
}

impl fmt::Display for Requeue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requeue::No => write!(f, "no requeue"),
            Requeue::Immediately => write!(f, "requeue immediately"),
            Requeue::After(d) => write!(f, "requeue after {:?}", d),
        }
    }
}

/// The handle a step uses to decide what happens next.
///
/// Every verb except [`proceed`](Self::proceed) and [`pass`](Self::pass)
/// sets the break flag, which stops the executor from starting further
/// main steps. The flag is shared by every view derived with
/// [`with_logger`](Self::with_logger) or
/// [`with_logger_values`](Self::with_logger_values) and is never cleared
/// within one execution.
#[derive(Debug, Clone)]
pub struct Flow {
    retry_err_delay: Duration,
    break_loop: Rc<Cell<bool>>,
    logger: Logger,
}

impl Flow {
    pub(crate) fn new(logger: Logger, retry_err_delay: Duration) -> Self {
        Self {
            retry_err_delay,
            break_loop: Rc::new(Cell::new(false)),
            logger,
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Whether some step asked to stop the main loop.
    pub fn is_broken(&self) -> bool {
        self.break_loop.get()
    }

    pub(crate) fn set_logger(&mut self, logger: Logger) {
        self.logger = logger;
    }

    fn mark_break(&self) {
        self.break_loop.set(true);
    }

    /// A view bound to the same execution that logs through `logger`.
    pub fn with_logger(&self, logger: Logger) -> Flow {
        Flow {
            retry_err_delay: self.retry_err_delay,
            break_loop: Rc::clone(&self.break_loop),
            logger,
        }
    }

    /// A view bound to the same execution whose logger carries extra values.
    pub fn with_logger_values(&self, kvs: KeyValues<'_>) -> Flow {
        self.with_logger(self.logger.with_values(kvs))
    }

    /// Continue with the next step.
    pub fn proceed(&self, msg: &str, kvs: KeyValues<'_>) -> Result<Requeue> {
        self.logger.info(msg, kvs);
        Ok(Requeue::No)
    }

    /// Continue with the next step without logging.
    pub fn pass(&self) -> Result<Requeue> {
        Ok(Requeue::No)
    }

    /// Stop and run again right away.
    pub fn retry(&self, msg: &str, kvs: KeyValues<'_>) -> Result<Requeue> {
        self.logger.info(msg, kvs);
        self.mark_break();
        Ok(Requeue::Immediately)
    }

    /// Stop and run again after `duration`; a zero duration asks for no requeue.
    pub fn retry_after(&self, duration: Duration, msg: &str, kvs: KeyValues<'_>) -> Result<Requeue> {
        self.logger.info(msg, kvs);
        self.mark_break();
        Ok(Requeue::after(duration))
    }

    /// Stop and wait for the next externally triggered event.
    pub fn wait(&self, msg: &str, kvs: KeyValues<'_>) -> Result<Requeue> {
        self.logger.info(msg, kvs);
        self.mark_break();
        Ok(Requeue::No)
    }

    /// Same as [`wait`](Self::wait).
    pub fn halt(&self, msg: &str, kvs: KeyValues<'_>) -> Result<Requeue> {
        self.wait(msg, kvs)
    }

    /// Stop with an error reported to the control loop, which then applies
    /// its own backoff.
    pub fn error(
        &self,
        err: impl Into<anyhow::Error>,
        msg: &str,
        kvs: KeyValues<'_>,
    ) -> Result<Requeue> {
        let err = err.into();
        self.logger.error(&err, msg, kvs);
        self.mark_break();
        Err(OpkitError::Step {
            message: msg.to_string(),
            source: err,
        })
    }

    /// Log `err` and stop, but hide it from the control loop and ask for a
    /// re-run after the executor's retry delay instead.
    pub fn retry_err(
        &self,
        err: impl Into<anyhow::Error>,
        msg: &str,
        kvs: KeyValues<'_>,
    ) -> Result<Requeue> {
        let err = err.into();
        self.logger.error(&err, msg, kvs);
        self.mark_break();
        Ok(Requeue::after(self.retry_err_delay))
    }
}

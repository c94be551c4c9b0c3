//! Drives a task's steps through a flow.
//!
//! One call to [`Executor::execute`] runs in three phases:
//!
//! 1. Main steps, in order, until one breaks the loop or fails
//! 2. Every deferred step, in order, whatever happened in phase 1
//! 3. The context's force-requeue delay is merged into the outcome
//!
//! A panic inside any step is caught, logged and reported as
//! [`OpkitError::Recovered`]; it never unwinds into the caller.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use super::flow::{Flow, Requeue, DEFAULT_RETRY_ERR_DELAY};
use super::step::Step;
use super::task::Task;
use super::tracer::{RunId, Tracer};
use crate::config::Settings;
use crate::context::ReconcileContext;
use crate::error::{OpkitError, Result};
use crate::logging::Logger;

/// Runs tasks and reports a single outcome to the control loop.
///
/// An executor is normally built once per reconcile invocation. Its step
/// index keeps counting across calls to [`execute`](Self::execute).
#[derive(Debug)]
pub struct Executor {
    logger: Logger,
    tracer: Tracer,
    debug: bool,
    retry_err_delay: Duration,
}

/// How a step's transition is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Error,
    Complete,
    ContinueDeferred,
    Break,
    Continue,
}

impl Transition {
    fn as_str(self) -> &'static str {
        match self {
            Transition::Error => "ERROR",
            Transition::Complete => "COMPLETE",
            Transition::ContinueDeferred => "CONTINUE [DEFER]",
            Transition::Break => "BREAK",
            Transition::Continue => "CONTINUE",
        }
    }
}

impl Executor {
    pub fn new(logger: Logger) -> Self {
        let tracer = Tracer::new();
        let logger = logger.with_values(&[("trace", tracer.id())]);
        Self {
            logger,
            tracer,
            debug: false,
            retry_err_delay: DEFAULT_RETRY_ERR_DELAY,
        }
    }

    /// Build an executor from loaded settings.
    pub fn from_settings(logger: Logger, settings: &Settings) -> Self {
        Self::new(logger)
            .with_debug(settings.executor.debug || settings.is_debug())
            .with_retry_err_delay(settings.executor.retry_err_delay())
    }

    /// Trace every step transition at INFO.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Delay used by [`Flow::retry_err`].
    pub fn with_retry_err_delay(mut self, delay: Duration) -> Self {
        self.retry_err_delay = delay;
        self
    }

    pub fn run_id(&self) -> &RunId {
        self.tracer.id()
    }

    /// Number of steps executed so far by this executor.
    pub fn steps_executed(&self) -> usize {
        self.tracer.current_step_index()
    }

    /// Run `task` against `rc` and return what the control loop should do.
    pub fn execute<C: ReconcileContext>(&mut self, rc: &mut C, mut task: Task<C>) -> Result<Requeue> {
        let mut flow = Flow::new(self.logger.clone(), self.retry_err_delay);

        match panic::catch_unwind(AssertUnwindSafe(|| self.drive(rc, &mut task, &mut flow))) {
            Ok(outcome) => outcome,
            Err(payload) => Err(self.recover(payload)),
        }
    }

    fn drive<C: ReconcileContext>(
        &mut self,
        rc: &mut C,
        task: &mut Task<C>,
        flow: &mut Flow,
    ) -> Result<Requeue> {
        let mut fault = None;
        let mut outcome = Ok(Requeue::No);

        let log = self.logger.clone();
        while let Some(step) = task.next_step() {
            let last = !task.has_next_step() && !task.has_next_deferred_step();
            outcome = self.run_step(rc, &step, flow, &log, false, last);

            if matches!(&outcome, Err(err) if err.is_recovered()) {
                fault = outcome.err();
                outcome = Ok(Requeue::No);
                break;
            }
            if outcome.is_err() || flow.is_broken() {
                break;
            }
        }

        if let Err(err) = self.drain_deferred(rc, task, flow, &mut fault) {
            outcome = Err(err);
        }

        let outcome = self.merge_force_requeue(rc.force_requeue_after(), outcome);

        match fault {
            Some(err) => Err(err),
            None => outcome,
        }
    }

    /// Run every deferred step; failures are collected, never short-circuit.
    fn drain_deferred<C: ReconcileContext>(
        &mut self,
        rc: &mut C,
        task: &mut Task<C>,
        flow: &mut Flow,
        fault: &mut Option<OpkitError>,
    ) -> Result<()> {
        let log = self.logger.with_values(&[("defer_exec", &true)]);

        let mut errors = Vec::new();
        while let Some(step) = task.next_deferred_step() {
            let last = !task.has_next_deferred_step();
            match self.run_step(rc, &step, flow, &log, true, last) {
                Ok(_) => {}
                Err(err) if err.is_recovered() && fault.is_none() => *fault = Some(err),
                Err(err) => errors.push(err.to_string()),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(OpkitError::DeferredSteps { errors })
        }
    }

    fn run_step<C: ReconcileContext>(
        &mut self,
        rc: &mut C,
        step: &Step<C>,
        flow: &mut Flow,
        log: &Logger,
        deferred: bool,
        last: bool,
    ) -> Result<Requeue> {
        let debug = self.debug || rc.debug();
        let log = log.with_values(&[
            ("action", &step.name()),
            ("step", &self.tracer.current_step_index()),
        ]);
        flow.set_logger(log.clone());

        let trace = log.with_name("trace");
        if debug {
            trace.info("BEGIN", &[]);
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| step.execute(rc, flow)))
            .unwrap_or_else(|payload| Err(self.recover(payload)));

        self.tracer.mark_step_done();

        let transition = match &outcome {
            Err(_) => Transition::Error,
            Ok(_) if last => Transition::Complete,
            Ok(_) if deferred => Transition::ContinueDeferred,
            Ok(_) if flow.is_broken() => Transition::Break,
            Ok(_) => Transition::Continue,
        };
        match (&outcome, debug) {
            (Err(err), true) => trace.info(transition.as_str(), &[("err", err)]),
            (Err(err), false) => trace.debug(transition.as_str(), &[("err", err)]),
            (Ok(_), true) => trace.info(transition.as_str(), &[]),
            (Ok(_), false) => trace.debug(transition.as_str(), &[]),
        }

        outcome
    }

    /// Apply the context's minimum re-run delay, if one was set.
    ///
    /// A pending error is dropped in favour of the delay; a requested delay
    /// is only ever shortened.
    fn merge_force_requeue(&self, force: Duration, outcome: Result<Requeue>) -> Result<Requeue> {
        if force.is_zero() {
            return outcome;
        }

        match outcome {
            Err(err) => {
                self.logger.debug(
                    "Force requeue replaces error",
                    &[("err", &err), ("requeue_after", &format!("{:?}", force))],
                );
                Ok(Requeue::After(force))
            }
            Ok(requeue) => Ok(requeue.clamp_to(force)),
        }
    }

    fn recover(&self, payload: Box<dyn Any + Send>) -> OpkitError {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else if let Some(err) = payload.downcast_ref::<OpkitError>() {
            err.to_string()
        } else if let Some(err) = payload.downcast_ref::<anyhow::Error>() {
            err.to_string()
        } else {
            format!("{:?}", payload)
        };

        let err = OpkitError::Recovered { message };
        self.logger
            .error(&err, "Panic detected, recovered and return error", &[]);
        err
    }
}

//! Scripted reconcile plans.
//!
//! A plan describes one reconcile invocation in YAML: the object key and a
//! list of main and deferred steps, each naming the flow verb it ends with.
//! Plans drive the `opkit run` command and make executor behaviour easy to
//! reproduce without a cluster.
//!
//! ```yaml
//! name: mysql
//! namespace: db
//! steps:
//!   - action: continue
//!     message: pods created
//!   - name: CheckReady
//!     action: retry_after
//!     after_ms: 5000
//! deferred:
//!   - name: SyncStatus
//!     action: pass
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::context::{BaseReconcileContext, ObjectKey, ReconcileContext, WorkContext};
use crate::engine::{
    abort, bind_deferred_step, bind_step, retry, retry_after, schedule_after, wait, when,
    BindFunc, Flow, Requeue, RunId, Step, Task,
};
use crate::error::{OpkitError, Result};

/// Field owner used for contexts built from plans.
pub const PLAN_FIELD_OWNER: &str = "opkit";

/// The verb a scripted step ends with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    Continue,
    Pass,
    Wait,
    Break,
    Abort,
    Retry,
    RetryAfter,
    Error,
    RetryErr,
    ScheduleAfter,
    Panic,
}

impl PlanAction {
    fn needs_delay(&self) -> bool {
        matches!(self, PlanAction::RetryAfter | PlanAction::ScheduleAfter)
    }
}

/// One scripted step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Step name used in logs; a name derived from the action when unset.
    #[serde(default)]
    pub name: Option<String>,

    pub action: PlanAction,

    #[serde(default)]
    pub message: Option<String>,

    /// Delay for `retry_after` and `schedule_after`.
    #[serde(default)]
    pub after_ms: Option<u64>,

    /// Build-time condition; the step is left out when false.
    #[serde(default = "default_when")]
    pub when: bool,
}

fn default_when() -> bool {
    true
}

impl PlanStep {
    fn message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| format!("{:?}", self.action).to_lowercase())
    }

    fn delay(&self) -> Duration {
        Duration::from_millis(self.after_ms.unwrap_or_default())
    }

    fn default_name(&self) -> String {
        match self.action {
            PlanAction::RetryAfter => format!("RetryAfter{:?}", self.delay()),
            PlanAction::ScheduleAfter => format!("ScheduleAfter{:?}", self.delay()),
            action => format!("{:?}", action),
        }
    }

    /// Bind this step as a main step.
    ///
    /// Unnamed `wait`, `abort`, `retry`, `retry_after` and `schedule_after`
    /// steps use the stock helpers.
    fn main_binder(&self) -> BindFunc<BaseReconcileContext> {
        let bind = match (&self.name, self.action) {
            (None, PlanAction::Wait) => wait(self.message()),
            (None, PlanAction::Abort) => abort(self.message()),
            (None, PlanAction::Retry) => retry(self.message()),
            (None, PlanAction::RetryAfter) => retry_after(self.delay(), self.message()),
            (None, PlanAction::ScheduleAfter) => schedule_after(self.delay()),
            _ => bind_step(self.to_step()),
        };
        when(self.when, bind)
    }

    fn deferred_binder(&self) -> BindFunc<BaseReconcileContext> {
        when(self.when, bind_deferred_step(self.to_step()))
    }

    fn to_step(&self) -> Step<BaseReconcileContext> {
        let name = self.name.clone().unwrap_or_else(|| self.default_name());
        let action = self.action;
        let message = self.message();
        let delay = self.delay();

        Step::new(name, move |rc: &mut BaseReconcileContext, flow: &Flow| {
            scripted(action, &message, delay, rc, flow)
        })
    }
}

fn scripted(
    action: PlanAction,
    message: &str,
    delay: Duration,
    rc: &mut BaseReconcileContext,
    flow: &Flow,
) -> Result<Requeue> {
    match action {
        PlanAction::Continue => flow.proceed(message, &[]),
        PlanAction::Pass => flow.pass(),
        PlanAction::Wait | PlanAction::Abort => flow.wait(message, &[]),
        PlanAction::Break => flow.halt(message, &[]),
        PlanAction::Retry => flow.retry(message, &[]),
        PlanAction::RetryAfter => flow.retry_after(delay, message, &[]),
        PlanAction::Error => flow.error(anyhow::anyhow!("{}", message), message, &[]),
        PlanAction::RetryErr => flow.retry_err(anyhow::anyhow!("{}", message), message, &[]),
        PlanAction::ScheduleAfter => {
            rc.reset_force_requeue_after(delay);
            flow.pass()
        }
        PlanAction::Panic => panic!("{}", message),
    }
}

/// A scripted reconcile invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,

    #[serde(default)]
    pub namespace: String,

    /// Trace every step transition for this invocation.
    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub steps: Vec<PlanStep>,

    #[serde(default)]
    pub deferred: Vec<PlanStep>,
}

impl Plan {
    /// Reject unnamed plans and delayed steps without a positive delay.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(OpkitError::ConfigValidationError {
                message: "plan name must not be empty".to_string(),
            });
        }

        for (phase, steps) in [("steps", &self.steps), ("deferred", &self.deferred)] {
            for (i, step) in steps.iter().enumerate() {
                if step.action.needs_delay() && step.after_ms.unwrap_or_default() == 0 {
                    return Err(OpkitError::ConfigValidationError {
                        message: format!("{}[{}]: {:?} requires a positive after_ms", phase, i, step.action),
                    });
                }
            }
        }

        Ok(())
    }

    /// The context a plan runs against.
    pub fn context(&self) -> BaseReconcileContext {
        BaseReconcileContext::new(
            ObjectKey::new(&self.namespace, &self.name),
            WorkContext::background(),
            PLAN_FIELD_OWNER,
        )
        .with_debug(self.debug)
    }

    /// Build the task for one invocation.
    pub fn build_task(&self) -> Task<BaseReconcileContext> {
        let main = self.steps.iter().map(PlanStep::main_binder);
        let deferred = self.deferred.iter().map(PlanStep::deferred_binder);
        Task::from_binders(main.chain(deferred))
    }
}

/// Load and validate a plan file.
pub fn load_plan(path: &Path) -> Result<Plan> {
    if !path.exists() {
        return Err(OpkitError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    let plan: Plan =
        serde_yaml::from_str(&content).map_err(|e| OpkitError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    plan.validate()?;
    Ok(plan)
}

/// Machine-readable outcome of one plan run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub requeue: bool,
    pub requeue_after_ms: u64,
    pub error: Option<String>,
    pub steps_executed: usize,
}

impl RunReport {
    pub fn new(run_id: RunId, steps_executed: usize, outcome: &Result<Requeue>) -> Self {
        let (requeue, requeue_after_ms, error) = match outcome {
            Ok(r) => (r.is_requeue(), r.requeue_after().as_millis() as u64, None),
            Err(e) => (false, 0, Some(e.to_string())),
        };
        Self {
            run_id,
            requeue,
            requeue_after_ms,
            error,
            steps_executed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

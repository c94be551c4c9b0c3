//! Run command implementation.
//!
//! The `opkit run` command executes a scripted plan once and prints a JSON
//! report of the outcome.

use std::io::Write;

use crate::cli::args::RunArgs;
use crate::config::Settings;
use crate::context::ReconcileContext;
use crate::engine::Executor;
use crate::error::Result;
use crate::logging::Logger;
use crate::plan::{load_plan, RunReport};

use super::dispatcher::{Command, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    settings: Settings,
    args: RunArgs,
    debug: bool,
}

impl RunCommand {
    pub fn new(settings: &Settings, args: RunArgs, debug: bool) -> Self {
        Self {
            settings: settings.clone(),
            args,
            debug,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }
}

impl Command for RunCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let plan = load_plan(&self.args.plan)?;
        tracing::debug!(
            plan = %self.args.plan.display(),
            steps = plan.steps.len(),
            deferred = plan.deferred.len(),
            "Loaded plan"
        );

        let mut rc = plan.context();
        let logger = Logger::named("opkit").with_values(&[("object", rc.key())]);
        let mut executor = Executor::from_settings(logger, &self.settings);
        if self.debug {
            executor = executor.with_debug(true);
        }

        let outcome = executor.execute(&mut rc, plan.build_task());
        let report = RunReport::new(executor.run_id().clone(), executor.steps_executed(), &outcome);

        let json = if self.args.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        }
        .map_err(anyhow::Error::from)?;
        writeln!(out, "{}", json)?;

        if report.is_success() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}

// src/engine/runner.rs

use tracing::{error, info, warn};

use crate::config::{PipelineStep, StepOptions};
use crate::engine::context::ExecutionContext;
use crate::engine::dispatch::{TaskKind, UNKNOWN_TASK_MESSAGE, dispatch};
use crate::engine::env::HostEnv;
use crate::errors::{Result, SitepipeError};
use crate::policy::fast_mode::apply_fast_mode;
use crate::report::{PipelineResult, StepResult};
use crate::services::Services;
use crate::tasks::{TaskInput, allow_failure};

/// Options that let a failed step be recorded without aborting the run.
pub const CONTINUE_ON_ERROR: &[&str] = &["continueOnError", "continueOnFailure"];

/// Result of a run plus the final context (useful for inspecting carryover).
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub result: PipelineResult,
    pub context: ExecutionContext,
}

/// Sequential pipeline executor.
///
/// Steps run strictly in document order. A failed step aborts the run unless
/// it sets `continueOnError`; the result then only lists steps that ran.
#[derive(Clone)]
pub struct Pipeline {
    services: Services,
    env: HostEnv,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("env_vars", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    pub fn new(services: Services, env: HostEnv) -> Self {
        Self { services, env }
    }

    pub async fn run(&self, steps: &[PipelineStep], mut ctx: ExecutionContext) -> PipelineRun {
        info!(
            steps = steps.len(),
            fast = ctx.fast,
            mode = %ctx.mode,
            base_dir = %ctx.base_dir.display(),
            "pipeline started"
        );

        let mut results = Vec::with_capacity(steps.len());

        for (index, step) in steps.iter().enumerate() {
            let result = self.run_step(index, step, &mut ctx).await;
            let failed = !result.success;
            results.push(result);

            if failed {
                // A malformed flag already failed the step in `run_step`.
                if continue_on_error(&step.options).unwrap_or(false) {
                    warn!(
                        step = %step.label,
                        task = %step.task,
                        "step failed; continuing (continueOnError)"
                    );
                    continue;
                }
                error!(
                    step = %step.label,
                    task = %step.task,
                    index,
                    "step failed; aborting pipeline"
                );
                break;
            }
        }

        let result = PipelineResult::from_steps(results);
        info!(
            steps = result.step_count,
            success = result.success,
            "pipeline finished"
        );

        PipelineRun {
            result,
            context: ctx,
        }
    }

    /// Run one step, always producing a `StepResult`.
    pub async fn run_step(
        &self,
        index: usize,
        step: &PipelineStep,
        ctx: &mut ExecutionContext,
    ) -> StepResult {
        let kind = match step.task.parse::<TaskKind>() {
            Ok(kind) => kind,
            Err(_) => {
                warn!(step = %step.label, task = %step.task, "unknown task discriminator");
                return StepResult::failed(&step.label, &step.task, UNKNOWN_TASK_MESSAGE);
            }
        };

        info!(step = %step.label, task = %kind, index, "running step");

        let mut options = step.options.clone();
        if ctx.fast {
            if let Err(e) = apply_fast_mode(kind, &mut options) {
                return StepResult::failed(&step.label, &step.task, e.to_string());
            }
        }

        if let Err(err) = continue_on_error(&options) {
            return self.rejected(step, err);
        }
        let allow_failure = match allow_failure(&options) {
            Ok(allow) => allow,
            Err(err) => return self.rejected(step, err),
        };

        let input = TaskInput {
            index,
            kind,
            label: &step.label,
            options: &options,
            env: &self.env,
        };

        let outcome = dispatch(&input, ctx, &self.services).await;
        match outcome {
            Ok(output) => {
                if let Some(carryover) = output.carryover {
                    ctx.apply_carryover(carryover);
                }
                info!(step = %step.label, task = %kind, message = %output.message, "step succeeded");
                StepResult::succeeded(&step.label, &step.task, output.message)
            }
            Err(err) => self.failure_result(step, allow_failure, err),
        }
    }

    /// A step whose runner flags are malformed never reaches its handler.
    fn rejected(&self, step: &PipelineStep, err: SitepipeError) -> StepResult {
        error!(step = %step.label, task = %step.task, error = %err, "invalid step flags");
        StepResult::failed(&step.label, &step.task, err.to_string())
    }

    fn failure_result(
        &self,
        step: &PipelineStep,
        allow_failure: bool,
        err: SitepipeError,
    ) -> StepResult {
        if allow_failure && err.is_tolerable() {
            warn!(step = %step.label, task = %step.task, error = %err, "step failed; allowed failure");
            return StepResult::succeeded(
                &step.label,
                &step.task,
                format!("allowed failure: {err}"),
            );
        }
        error!(step = %step.label, task = %step.task, error = %err, "step failed");
        StepResult::failed(&step.label, &step.task, err.to_string())
    }
}

fn continue_on_error(options: &StepOptions) -> Result<bool> {
    options.get_or(CONTINUE_ON_ERROR, false)
}

use super::error::InterpreterError;
use super::machine::BlockInterpreter;
use super::{CancelReason, GameContext, Interpreter, ProgramState, RunOutcome};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Pause between two steps.
    pub step_delay: Duration,
    /// Upper bound on calls to `step`, counting the final goal check.
    pub step_limit: Option<u64>,
}

impl RunConfig {
    pub fn with_step_delay(mut self, step_delay: Duration) -> Self {
        self.step_delay = step_delay;
        self
    }

    pub fn with_step_limit(mut self, step_limit: u64) -> Self {
        self.step_limit = Some(step_limit);
        self
    }
}

/// Shared flag asking a run to stop at its next step.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    requested: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn request_stop(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    pub(super) fn clear(&self) {
        self.requested.store(false, Ordering::SeqCst);
    }
}

impl<'a> BlockInterpreter<'a> {
    /// Starts a run and steps it to completion, pausing between steps.
    pub fn run<C: GameContext>(
        &mut self,
        context: &mut C,
        config: &RunConfig,
    ) -> Result<RunOutcome, InterpreterError> {
        self.start(context)?;
        let mut steps: u64 = 0;
        loop {
            if config.step_limit.is_some_and(|limit| steps >= limit) {
                return Ok(self.cancel(CancelReason::StepLimit(steps), context));
            }
            steps += 1;
            match self.step(context)? {
                ProgramState::Finished(outcome) => {
                    debug!(steps, "run finished");
                    return Ok(outcome);
                }
                ProgramState::Run => context.pause(config.step_delay),
            }
        }
    }
}

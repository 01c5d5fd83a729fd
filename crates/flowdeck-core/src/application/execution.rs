//! The run loop: executes a flow's steps in order against a [`StepExecutor`].

use crate::domain::flow::Flow;
use crate::domain::run::{RunOutcome, RunReport, RunSignal, StepState};
use crate::types::{emit_log, LogLevel, RunListener};
use crate::{StepExecutor, StepOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;
use uuid::Uuid;

const COMPLETION_LOG: &str = "Flow completed successfully";

/// Service that runs one flow at a time and narrates progress to a
/// [`RunListener`].
///
/// The service holds no run state of its own; everything about a run
/// lives in its [`RunReport`]. Cancellation is cooperative: the signal
/// is checked at the top of each step iteration, so a step already
/// executing always finishes before the run stops.
pub struct FlowExecutionService {
    /// Executes individual steps
    executor: Arc<dyn StepExecutor>,

    /// Receives log entries and step state changes
    listener: Arc<dyn RunListener>,
}

impl FlowExecutionService {
    /// Create a new flow execution service
    pub fn new(executor: Arc<dyn StepExecutor>, listener: Arc<dyn RunListener>) -> Self {
        Self { executor, listener }
    }

    fn log(&self, level: LogLevel, message: String) {
        emit_log(self.listener.as_ref(), level, message);
    }

    fn set_state(&self, states: &mut [StepState], index: usize, state: StepState) {
        states[index] = state;
        self.listener.on_step_state(index, state);
    }

    /// Run every step of `flow` in order and report how it went.
    ///
    /// Steps fail or succeed as the executor decides; the first failure
    /// ends the run. A flow with no steps completes immediately. The
    /// completion entry is logged only when every step succeeded and no
    /// cancellation arrived before the run wrapped up.
    pub async fn run(&self, flow: &Flow, signal: &RunSignal) -> RunReport {
        let run_id = Uuid::new_v4();
        let mut states = vec![StepState::Waiting; flow.steps.len()];
        let mut outcome = RunOutcome::Completed;

        info!(%run_id, flow = %flow.name, steps = flow.steps.len(), "run started");

        for (index, step) in flow.steps.iter().enumerate() {
            if signal.is_cancelled() {
                outcome = RunOutcome::Cancelled;
                break;
            }

            self.set_state(&mut states, index, StepState::Running);
            self.log(LogLevel::Info, format!("Running step: {}", step.name));
            self.log(LogLevel::Info, format!("Command: {}", step.payload()));

            match self.executor.execute(step).await {
                StepOutcome::Success => {
                    self.set_state(&mut states, index, StepState::Succeeded);
                    self.log(LogLevel::Success, format!("Step completed: {}", step.name));

                    if let Some(delay) = step.delay.filter(|&d| d > 0) {
                        self.log(LogLevel::Info, format!("Waiting {} seconds...", delay));
                        sleep(Duration::from_secs(delay)).await;
                    }
                }
                StepOutcome::Failure => {
                    self.set_state(&mut states, index, StepState::Failed);
                    self.log(LogLevel::Error, format!("Step failed: {}", step.name));
                    outcome = RunOutcome::Failed { step_index: index };
                    break;
                }
            }
        }

        // A cancellation that lands while the final step is executing
        // still suppresses the completion entry.
        if outcome == RunOutcome::Completed && signal.is_cancelled() {
            outcome = RunOutcome::Cancelled;
        }

        if outcome == RunOutcome::Completed {
            self.log(LogLevel::Success, COMPLETION_LOG.to_string());
        }

        info!(%run_id, flow = %flow.name, %outcome, "run finished");

        RunReport {
            run_id,
            flow_name: flow.name.clone(),
            step_states: states,
            outcome,
        }
    }
}

//! Run-level types: per-step states, outcomes, and the cancel signal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Lifecycle of a single step within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepState {
    /// Not reached yet.
    Waiting,
    /// Currently executing.
    Running,
    /// Finished successfully.
    Succeeded,
    /// Finished with a simulated failure.
    Failed,
}

impl fmt::Display for StepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepState::Waiting => write!(f, "waiting"),
            StepState::Running => write!(f, "running"),
            StepState::Succeeded => write!(f, "succeeded"),
            StepState::Failed => write!(f, "failed"),
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    /// Every step succeeded.
    Completed,
    /// A step failed and the run stopped there.
    Failed {
        /// Index of the failing step.
        step_index: usize,
    },
    /// The run was stopped before reaching the end.
    Cancelled,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Completed => write!(f, "completed"),
            RunOutcome::Failed { step_index } => write!(f, "failed at step {}", step_index),
            RunOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Shared cancellation flag for a run.
///
/// Cloning yields a handle to the same flag. The run loop checks it at
/// the top of every step iteration; a step already under way is never
/// interrupted mid-flight.
#[derive(Debug, Clone, Default)]
pub struct RunSignal {
    cancelled: Arc<AtomicBool>,
}

impl RunSignal {
    /// Fresh, uncancelled signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique id assigned when the run started.
    pub run_id: Uuid,
    /// Name of the flow that ran.
    pub flow_name: String,
    /// Final state of each step, in flow order.
    pub step_states: Vec<StepState>,
    /// How the run ended.
    pub outcome: RunOutcome,
}

impl RunReport {
    /// True when every step ran to success.
    pub fn is_complete(&self) -> bool {
        self.outcome == RunOutcome::Completed
    }
}

//!
//! Flowdeck Core - domain model and execution simulator for the Flowdeck launcher
//!
//! This crate defines the flow catalog, the editor session state, and the
//! simulated step execution engine behind the Flowdeck launcher. It is the
//! foundation the server and CLI crates build on.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use async_trait::async_trait;

/// Domain layer - flows, catalog, editor and run state
pub mod domain;

/// Application services - flow execution and the launcher facade
pub mod application;

/// Core types and traits
pub mod types;

/// Error types
pub mod error;

/// Simulated step executor and system probe
pub mod simulator;

// Re-export key types
pub use error::CoreError;
pub use types::{LogBuffer, LogEntry, LogLevel, RunListener};

// Application services
pub use application::execution::FlowExecutionService;
pub use application::launcher::{LauncherService, RunHandle};

// Re-export main API types for easy use
pub use domain::catalog::{FlowCatalog, MemoryFlowCatalog, DUPLICATE_SUFFIX};
pub use domain::editor::{EditorSession, FlowConfig, StepEdit};
pub use domain::flow::{Flow, FlowMode, HealthCheck, SecurityContext, Step, StepKind};
pub use domain::run::{RunOutcome, RunReport, RunSignal, StepState};
pub use domain::system::{SystemReport, ToolStatus};
pub use simulator::{SimulatedStepExecutor, SimulatedSystemProbe};

/// Result of executing one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step finished successfully.
    Success,
    /// The step failed.
    Failure,
}

/// Executes individual steps on behalf of a run.
///
/// The stock implementation simulates execution with randomized latency
/// and outcomes; tests substitute deterministic ones. Every random draw
/// in the engine lives behind this trait.
#[async_trait]
pub trait StepExecutor: Send + Sync {
    /// Execute one step and report how it went.
    async fn execute(&self, step: &Step) -> StepOutcome;

    /// Quick pass/fail check of a whole flow without running its steps.
    async fn preflight(&self, flow: &Flow) -> StepOutcome {
        let _ = flow;
        StepOutcome::Success
    }
}

/// Detects the host environment.
#[async_trait]
pub trait SystemProbe: Send + Sync {
    /// Probe the system and report what was found.
    async fn detect(&self) -> SystemReport;
}

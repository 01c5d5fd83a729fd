//! The launcher facade: catalog, editor, runs and system detection
//! behind one service.

use super::execution::FlowExecutionService;
use crate::domain::catalog::FlowCatalog;
use crate::domain::editor::{EditorSession, FlowConfig, StepEdit};
use crate::domain::flow::{Flow, Step, StepKind};
use crate::domain::run::{RunReport, RunSignal};
use crate::domain::system::SystemReport;
use crate::error::CoreError;
use crate::types::{emit_log, LogLevel, RunListener};
use crate::{StepExecutor, StepOutcome, SystemProbe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Handle to a spawned run.
///
/// Dropping the handle does not stop the run; it keeps going and frees
/// the launcher's run slot on its own when it ends.
#[derive(Debug)]
pub struct RunHandle {
    signal: RunSignal,
    join: JoinHandle<RunReport>,
}

impl RunHandle {
    /// Request cancellation of this run.
    pub fn cancel(&self) {
        self.signal.cancel();
    }

    /// Wait for the run to end and take its report.
    pub async fn wait(self) -> Result<RunReport, CoreError> {
        self.join
            .await
            .map_err(|e| CoreError::Internal(format!("Run task failed: {}", e)))
    }
}

/// Application service backing every launcher operation.
///
/// One instance owns the whole launcher state: the flow catalog, the
/// editor session, the cached system report, and the single run slot.
/// At most one run is active at a time; starting a second one while the
/// first is still going is rejected.
pub struct LauncherService {
    /// Repository of flows
    catalog: Arc<dyn FlowCatalog>,

    /// Executes steps and preflight checks
    executor: Arc<dyn StepExecutor>,

    /// Detects the host environment
    probe: Arc<dyn SystemProbe>,

    /// Receives log entries and step state changes
    listener: Arc<dyn RunListener>,

    /// Flow currently open for editing, if any
    editor: Mutex<Option<EditorSession>>,

    /// Last system detection result, if any
    system: RwLock<Option<SystemReport>>,

    /// Whether a run is active
    run_gate: Arc<AtomicBool>,

    /// Cancel signal of the active run
    current_run: Arc<Mutex<Option<RunSignal>>>,
}

impl LauncherService {
    /// Create a new launcher service
    pub fn new(
        catalog: Arc<dyn FlowCatalog>,
        executor: Arc<dyn StepExecutor>,
        probe: Arc<dyn SystemProbe>,
        listener: Arc<dyn RunListener>,
    ) -> Self {
        Self {
            catalog,
            executor,
            probe,
            listener,
            editor: Mutex::new(None),
            system: RwLock::new(None),
            run_gate: Arc::new(AtomicBool::new(false)),
            current_run: Arc::new(Mutex::new(None)),
        }
    }

    fn log(&self, level: LogLevel, message: impl Into<String>) {
        emit_log(self.listener.as_ref(), level, message);
    }

    fn editor_guard(&self) -> Result<MutexGuard<'_, Option<EditorSession>>, CoreError> {
        self.editor
            .lock()
            .map_err(|e| CoreError::Internal(format!("Failed to acquire editor lock: {}", e)))
    }

    // The run slot only ever sees whole assignments, so a poisoned lock
    // is safe to recover.
    fn run_slot(&self) -> MutexGuard<'_, Option<RunSignal>> {
        self.current_run
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// All flows in the catalog, in display order.
    pub async fn list_flows(&self) -> Result<Vec<Flow>, CoreError> {
        self.catalog.list().await
    }

    /// Look a flow up by name.
    pub async fn find_flow(&self, name: &str) -> Result<Option<Flow>, CoreError> {
        self.catalog.find(name).await
    }

    /// Copy a catalog flow under a derived name and store the copy.
    pub async fn duplicate_flow(&self, name: &str) -> Result<Flow, CoreError> {
        let copy = self.catalog.duplicate(name).await?;
        self.log(
            LogLevel::Success,
            format!("Flow \"{}\" duplicated successfully", name),
        );
        Ok(copy)
    }

    /// Start executing a catalog flow in the background.
    ///
    /// Rejects the request when the flow is unknown or another run is
    /// still active. The returned handle can cancel the run or wait for
    /// its report; the launcher's run slot frees itself either way.
    pub async fn execute_flow(&self, name: &str) -> Result<RunHandle, CoreError> {
        let flow = self
            .catalog
            .find(name)
            .await?
            .ok_or_else(|| CoreError::FlowNotFound(name.to_string()))?;

        if self
            .run_gate
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            self.log(
                LogLevel::Warning,
                format!("A run is already in progress; refusing to start: {}", name),
            );
            return Err(CoreError::RunInProgress);
        }

        self.log(
            LogLevel::Info,
            format!("Starting flow execution: {}", flow.name),
        );
        self.warn_missing_dependencies(&flow);

        let signal = RunSignal::new();
        *self.run_slot() = Some(signal.clone());

        let service = FlowExecutionService::new(self.executor.clone(), self.listener.clone());
        let run_signal = signal.clone();
        let run_slot = Arc::clone(&self.current_run);
        let run_gate = Arc::clone(&self.run_gate);

        let join = tokio::spawn(async move {
            let report = service.run(&flow, &run_signal).await;
            *run_slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
            run_gate.store(false, Ordering::SeqCst);
            report
        });

        Ok(RunHandle { signal, join })
    }

    /// Request cancellation of the active run, if there is one.
    ///
    /// Returns whether a run was actually signalled. The run itself
    /// winds down at its next step boundary.
    pub fn stop_execution(&self) -> bool {
        let signal = self.run_slot().clone();
        match signal {
            Some(signal) => {
                signal.cancel();
                self.log(LogLevel::Warning, "Execution stopped by user");
                true
            }
            None => false,
        }
    }

    /// Whether a run is active right now.
    pub fn is_run_in_progress(&self) -> bool {
        self.run_gate.load(Ordering::SeqCst)
    }

    /// Open a catalog flow for editing, replacing any open session.
    pub async fn edit_flow(&self, name: &str) -> Result<(), CoreError> {
        let flow = self
            .catalog
            .find(name)
            .await?
            .ok_or_else(|| CoreError::FlowNotFound(name.to_string()))?;

        *self.editor_guard()? = Some(EditorSession::for_flow(&flow));
        self.log(LogLevel::Info, format!("Editing flow: {}", flow.name));
        Ok(())
    }

    /// Open an empty session for a brand-new flow.
    pub fn create_flow(&self) -> Result<(), CoreError> {
        *self.editor_guard()? = Some(EditorSession::blank());
        Ok(())
    }

    /// Discard the open session, if any, without saving.
    pub fn close_editor(&self) -> Result<(), CoreError> {
        *self.editor_guard()? = None;
        Ok(())
    }

    /// The open session's working step list, or `None` when no flow is
    /// being edited.
    pub fn editor_steps(&self) -> Result<Option<Vec<Step>>, CoreError> {
        let editor = self.editor_guard()?;
        Ok(editor.as_ref().map(|session| session.steps().to_vec()))
    }

    /// Apply flow-level settings to the open session, opening a blank
    /// one first when none exists.
    pub fn configure_flow(&self, config: FlowConfig) -> Result<(), CoreError> {
        if config.name.trim().is_empty() {
            self.log(LogLevel::Error, "Flow name is required");
            return Err(CoreError::Validation("flow name is required".to_string()));
        }

        let name = config.name.clone();
        self.editor_guard()?
            .get_or_insert_with(EditorSession::blank)
            .configure(config);
        self.log(
            LogLevel::Success,
            format!("Flow \"{}\" configuration saved", name),
        );
        Ok(())
    }

    /// Append a placeholder step to the open session, opening a blank
    /// one first when none exists. Returns the new step's index.
    ///
    /// The drop position is display-only and is recorded in the trace
    /// output, not in the step.
    pub fn add_component(&self, kind: StepKind, x: f64, y: f64) -> Result<usize, CoreError> {
        let index = self
            .editor_guard()?
            .get_or_insert_with(EditorSession::blank)
            .add_step(kind);
        debug!(%kind, x, y, index, "component dropped on canvas");
        self.log(LogLevel::Info, format!("Component {} added to flow", kind));
        Ok(index)
    }

    /// Overwrite the identity fields of a step in the open session.
    pub fn edit_step_config(&self, index: usize, edit: StepEdit) -> Result<(), CoreError> {
        if edit.name.trim().is_empty() {
            self.log(LogLevel::Error, "Component name is required");
            return Err(CoreError::Validation(
                "component name is required".to_string(),
            ));
        }

        let name = edit.name.clone();
        {
            let mut editor = self.editor_guard()?;
            let session = editor.as_mut().ok_or(CoreError::NoEditorSession)?;
            session.edit_step(index, edit)?;
        }
        self.log(LogLevel::Success, format!("Component \"{}\" updated", name));
        Ok(())
    }

    /// Remove and return a step from the open session.
    pub fn delete_step(&self, index: usize) -> Result<Step, CoreError> {
        let removed = {
            let mut editor = self.editor_guard()?;
            let session = editor.as_mut().ok_or(CoreError::NoEditorSession)?;
            session.delete_step(index)?
        };
        self.log(LogLevel::Info, "Step removed from flow");
        Ok(removed)
    }

    /// Save the open session's flow back to the catalog and return it.
    /// The session stays open for further edits.
    pub async fn save_flow(&self) -> Result<Flow, CoreError> {
        let flow = {
            let editor = self.editor_guard()?;
            let session = editor.as_ref().ok_or(CoreError::NoEditorSession)?;
            session.to_flow()
        };

        if flow.name.trim().is_empty() {
            self.log(LogLevel::Error, "Flow name is required");
            return Err(CoreError::Validation("flow name is required".to_string()));
        }

        self.catalog.save(flow.clone()).await?;
        self.log(
            LogLevel::Success,
            format!("Flow \"{}\" saved successfully", flow.name),
        );
        Ok(flow)
    }

    /// Preflight the open session's flow without running its steps.
    pub async fn test_flow(&self) -> Result<StepOutcome, CoreError> {
        let flow = {
            let editor = self.editor_guard()?;
            let session = editor.as_ref().ok_or(CoreError::NoEditorSession)?;
            session.to_flow()
        };

        if flow.steps.is_empty() {
            self.log(LogLevel::Warning, "No steps to test");
            return Err(CoreError::Validation("flow has no steps".to_string()));
        }

        self.log(LogLevel::Info, format!("Testing flow: {}", flow.name));
        let outcome = self.executor.preflight(&flow).await;
        match outcome {
            StepOutcome::Success => self.log(LogLevel::Success, "Flow test passed"),
            StepOutcome::Failure => self.log(LogLevel::Error, "Flow test failed"),
        }
        Ok(outcome)
    }

    /// Probe the host environment and cache the report.
    pub async fn refresh_system(&self) -> SystemReport {
        let report = self.probe.detect().await;
        info!(
            os = %report.os,
            docker = report.docker.available,
            podman = report.podman.available,
            node = report.node.available,
            "system detection finished"
        );

        *self
            .system
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(report.clone());

        self.log(LogLevel::Info, format!("System detected: {}", report.os));
        report
    }

    /// The cached system report from the last detection, if any.
    pub fn system_report(&self) -> Option<SystemReport> {
        self.system
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Warn about declared dependencies the last detection did not see.
    /// Quiet until a detection has happened.
    fn warn_missing_dependencies(&self, flow: &Flow) {
        if let Some(report) = self.system_report() {
            for tool in report.missing_tools(flow.dependencies.keys()) {
                self.log(
                    LogLevel::Warning,
                    format!("Declared dependency not detected: {}", tool),
                );
            }
        }
    }
}

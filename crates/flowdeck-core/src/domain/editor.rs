//! Editor session state: a detached working copy of a flow being edited.

use super::flow::{Flow, FlowMode, HealthCheck, Step, StepKind};
use crate::error::CoreError;
use std::collections::HashMap;

/// Identity fields written back to a step by the component form.
#[derive(Debug, Clone)]
pub struct StepEdit {
    /// New step name. Must be non-empty; callers validate before applying.
    pub name: String,
    /// New command payload.
    pub command: String,
    /// New declared timeout in seconds.
    pub timeout: u64,
}

/// Flow-level settings written by the configuration form.
#[derive(Debug, Clone, Default)]
pub struct FlowConfig {
    /// New flow name.
    pub name: String,
    /// New description.
    pub description: String,
    /// New execution mode.
    pub mode: FlowMode,
    /// Replacement environment variable set.
    pub env_vars: HashMap<String, String>,
}

/// A flow open for editing.
///
/// The session owns its own copies of the flow metadata and the step
/// list; nothing it does is visible in the catalog until the edited
/// flow is saved back. Discarding the session discards every change.
#[derive(Debug)]
pub struct EditorSession {
    flow: Flow,
    steps: Vec<Step>,
}

impl EditorSession {
    /// Session for a brand-new flow with no name or steps yet.
    pub fn blank() -> Self {
        Self {
            flow: Flow::new(""),
            steps: Vec::new(),
        }
    }

    /// Session seeded from an existing flow. The flow itself is left alone.
    pub fn for_flow(flow: &Flow) -> Self {
        Self {
            flow: flow.clone(),
            steps: flow.steps.clone(),
        }
    }

    /// Name of the flow under edit. Empty for an unconfigured new flow.
    pub fn flow_name(&self) -> &str {
        &self.flow.name
    }

    /// The working copy of the step list.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Append a placeholder step of the given kind. Returns its index.
    pub fn add_step(&mut self, kind: StepKind) -> usize {
        self.steps.push(Step::placeholder(kind));
        self.steps.len() - 1
    }

    /// Overwrite the identity fields of the step at `index`.
    ///
    /// The command is written regardless of the step's kind, matching
    /// the component form, which exposes a command field for every step.
    pub fn edit_step(&mut self, index: usize, edit: StepEdit) -> Result<(), CoreError> {
        let step = self
            .steps
            .get_mut(index)
            .ok_or(CoreError::StepIndexOutOfBounds(index))?;

        step.name = edit.name;
        step.command = Some(edit.command);
        step.timeout = Some(edit.timeout);
        Ok(())
    }

    /// Remove and return the step at `index`. Later steps shift down.
    pub fn delete_step(&mut self, index: usize) -> Result<Step, CoreError> {
        if index >= self.steps.len() {
            return Err(CoreError::StepIndexOutOfBounds(index));
        }
        Ok(self.steps.remove(index))
    }

    /// Apply flow-level settings.
    ///
    /// A session that has no healthcheck yet gets the stock one, so a
    /// flow built from scratch ends up with the same defaults the seed
    /// flows carry.
    pub fn configure(&mut self, config: FlowConfig) {
        self.flow.name = config.name;
        self.flow.description = config.description;
        self.flow.mode = config.mode;
        self.flow.env_vars = config.env_vars;
        if self.flow.healthcheck.is_none() {
            self.flow.healthcheck = Some(HealthCheck::default());
        }
    }

    /// The edited flow: session metadata plus the working step list.
    pub fn to_flow(&self) -> Flow {
        let mut flow = self.flow.clone();
        flow.steps = self.steps.clone();
        flow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flow::{DEFAULT_STEP_TIMEOUT, PLACEHOLDER_COMMAND, PLACEHOLDER_IMAGE};
    use pretty_assertions::assert_eq;

    fn three_step_flow() -> Flow {
        let mut flow = Flow::new("Editable");
        flow.steps = vec![
            Step::command("alpha", "echo a"),
            Step::command("beta", "echo b"),
            Step::command("gamma", "echo c"),
        ];
        flow
    }

    #[test]
    fn test_blank_session_starts_empty() {
        let session = EditorSession::blank();
        assert_eq!(session.flow_name(), "");
        assert!(session.steps().is_empty());
    }

    #[test]
    fn test_add_step_appends_placeholder_and_returns_index() {
        let mut session = EditorSession::blank();

        let first = session.add_step(StepKind::Command);
        let second = session.add_step(StepKind::Container);

        assert_eq!((first, second), (0, 1));
        assert_eq!(session.steps()[0].command.as_deref(), Some(PLACEHOLDER_COMMAND));
        assert_eq!(session.steps()[1].image.as_deref(), Some(PLACEHOLDER_IMAGE));
        assert_eq!(session.steps()[1].timeout, Some(DEFAULT_STEP_TIMEOUT));
    }

    #[test]
    fn test_edit_step_overwrites_identity_fields() {
        let mut session = EditorSession::for_flow(&three_step_flow());

        session
            .edit_step(
                0,
                StepEdit {
                    name: "renamed".to_string(),
                    command: "echo renamed".to_string(),
                    timeout: 90,
                },
            )
            .unwrap();

        let step = &session.steps()[0];
        assert_eq!(step.name, "renamed");
        assert_eq!(step.command.as_deref(), Some("echo renamed"));
        assert_eq!(step.timeout, Some(90));
    }

    #[test]
    fn test_edit_after_delete_hits_shifted_step() {
        // With steps [a, b, c], deleting index 1 then editing index 1
        // must change what was originally c.
        let mut session = EditorSession::for_flow(&three_step_flow());

        let removed = session.delete_step(1).unwrap();
        assert_eq!(removed.name, "beta");

        session
            .edit_step(
                1,
                StepEdit {
                    name: "gamma-edited".to_string(),
                    command: "echo c2".to_string(),
                    timeout: 10,
                },
            )
            .unwrap();

        let names: Vec<&str> = session.steps().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "gamma-edited"]);
    }

    #[test]
    fn test_edit_container_step_keeps_image() {
        let mut session = EditorSession::blank();
        session.add_step(StepKind::Container);

        session
            .edit_step(
                0,
                StepEdit {
                    name: "serve".to_string(),
                    command: "nginx -g 'daemon off;'".to_string(),
                    timeout: 60,
                },
            )
            .unwrap();

        let step = &session.steps()[0];
        assert_eq!(step.image.as_deref(), Some(PLACEHOLDER_IMAGE));
        assert_eq!(step.command.as_deref(), Some("nginx -g 'daemon off;'"));
        assert_eq!(step.kind(), StepKind::Container);
    }

    #[test]
    fn test_step_index_out_of_bounds_errors() {
        let mut session = EditorSession::for_flow(&three_step_flow());

        let edit = StepEdit {
            name: "x".to_string(),
            command: "echo x".to_string(),
            timeout: 1,
        };
        assert_eq!(
            session.edit_step(3, edit).unwrap_err(),
            CoreError::StepIndexOutOfBounds(3)
        );
        assert_eq!(
            session.delete_step(7).unwrap_err(),
            CoreError::StepIndexOutOfBounds(7)
        );
        assert_eq!(session.steps().len(), 3);
    }

    #[test]
    fn test_session_is_detached_from_source_flow() {
        let flow = three_step_flow();
        let mut session = EditorSession::for_flow(&flow);

        session.delete_step(0).unwrap();
        session.add_step(StepKind::Command);

        assert_eq!(flow.steps.len(), 3);
        assert_eq!(flow.steps[0].name, "alpha");
    }

    #[test]
    fn test_to_flow_merges_working_steps_into_metadata() {
        let mut session = EditorSession::for_flow(&three_step_flow());
        session.delete_step(2).unwrap();

        let edited = session.to_flow();
        assert_eq!(edited.name, "Editable");
        assert_eq!(edited.steps.len(), 2);
    }

    #[test]
    fn test_configure_updates_metadata_and_installs_healthcheck() {
        let mut session = EditorSession::blank();

        session.configure(FlowConfig {
            name: "Fresh".to_string(),
            description: "built from scratch".to_string(),
            mode: FlowMode::Container,
            env_vars: HashMap::from([("KEY".to_string(), "value".to_string())]),
        });

        let flow = session.to_flow();
        assert_eq!(flow.name, "Fresh");
        assert_eq!(flow.mode, FlowMode::Container);
        assert_eq!(flow.env_vars.len(), 1);
        assert_eq!(flow.healthcheck, Some(HealthCheck::default()));
    }

    #[test]
    fn test_configure_preserves_existing_healthcheck() {
        let mut flow = three_step_flow();
        flow.healthcheck = Some(HealthCheck {
            interval: "60s".to_string(),
            timeout: "15s".to_string(),
            retries: 2,
            test: None,
        });
        let mut session = EditorSession::for_flow(&flow);

        session.configure(FlowConfig {
            name: "Editable".to_string(),
            ..FlowConfig::default()
        });

        let check = session.to_flow().healthcheck.unwrap();
        assert_eq!(check.interval, "60s");
        assert_eq!(check.retries, 2);
    }
}

//! Flow and step definitions: the data model behind the catalog.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Version assigned to new flows and to duplicates.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Declared timeout given to steps dropped onto the canvas, in seconds.
pub const DEFAULT_STEP_TIMEOUT: u64 = 30;

/// Command payload of a freshly dropped command component.
pub const PLACEHOLDER_COMMAND: &str = "echo \"Hello World\"";

/// Image payload of a freshly dropped container component.
pub const PLACEHOLDER_IMAGE: &str = "nginx:latest";

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Execution mode hint. Advisory: the simulator treats both the same.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowMode {
    /// Commands would run directly on the host.
    #[default]
    Native,
    /// Steps would run inside containers.
    Container,
}

impl fmt::Display for FlowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowMode::Native => write!(f, "native"),
            FlowMode::Container => write!(f, "container"),
        }
    }
}

/// Classification of a step, derived from which payload field is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Shell command payload.
    Command,
    /// Container image payload.
    Container,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKind::Command => write!(f, "command"),
            StepKind::Container => write!(f, "container"),
        }
    }
}

impl FromStr for StepKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "command" => Ok(StepKind::Command),
            "container" => Ok(StepKind::Container),
            other => Err(CoreError::Validation(format!(
                "unknown step kind: {}",
                other
            ))),
        }
    }
}

/// One unit of work within a [`Flow`].
///
/// A step carries exactly one payload: `command` for command-typed steps,
/// `image` for container-typed ones. Everything else is descriptive
/// metadata the simulator echoes but never enforces, except `delay`, which
/// adds a pause after the step completes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Display label. Not required to be unique within a flow.
    pub name: String,
    /// Shell command payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Container image payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Declared timeout in seconds. Never compared against elapsed time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// Whether the step would keep running in the background.
    #[serde(default, skip_serializing_if = "is_false")]
    pub background: bool,
    /// Single advertised port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Port mappings, "host:container".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    /// Extra pause in seconds after the step completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
}

impl Step {
    /// New command-typed step.
    pub fn command(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: Some(command.into()),
            ..Self::default()
        }
    }

    /// New container-typed step.
    pub fn container(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: Some(image.into()),
            ..Self::default()
        }
    }

    /// The step a freshly dropped canvas component starts out as.
    pub fn placeholder(kind: StepKind) -> Self {
        let mut step = match kind {
            StepKind::Command => Self::command(format!("Nuevo {}", kind), PLACEHOLDER_COMMAND),
            StepKind::Container => Self::container(format!("Nuevo {}", kind), PLACEHOLDER_IMAGE),
        };
        step.timeout = Some(DEFAULT_STEP_TIMEOUT);
        step
    }

    /// Classification: container-typed iff an image is present.
    pub fn kind(&self) -> StepKind {
        if self.image.is_some() {
            StepKind::Container
        } else {
            StepKind::Command
        }
    }

    /// The displayable payload: the command, else the image, else "N/A".
    pub fn payload(&self) -> &str {
        self.command
            .as_deref()
            .or(self.image.as_deref())
            .unwrap_or("N/A")
    }
}

/// Descriptive healthcheck metadata. Never enforced by the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Poll interval, e.g. "30s".
    pub interval: String,
    /// Probe timeout, e.g. "10s".
    pub timeout: String,
    /// Retries before the check would report unhealthy.
    pub retries: u32,
    /// Optional probe command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,
}

impl Default for HealthCheck {
    fn default() -> Self {
        Self {
            interval: "30s".to_string(),
            timeout: "10s".to_string(),
            retries: 3,
            test: None,
        }
    }
}

/// Advisory security settings. Never enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityContext {
    /// User the flow would run as.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Whether the filesystem would be mounted read-only.
    #[serde(default)]
    pub read_only: bool,
}

/// A named automation recipe: ordered steps plus descriptive metadata.
///
/// `name` is the catalog key; everything else is advisory except `steps`,
/// whose order is the execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    /// Unique catalog key. Must be non-empty at save time.
    pub name: String,
    /// Free-form version string.
    #[serde(default = "default_version")]
    pub version: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Advisory execution mode.
    #[serde(default)]
    pub mode: FlowMode,
    /// Tool name to version constraint. Descriptive; never checked for real.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub dependencies: HashMap<String, String>,
    /// Descriptive healthcheck metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healthcheck: Option<HealthCheck>,
    /// Ordered steps; order is execution order.
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Environment variables the flow would export.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env_vars: HashMap<String, String>,
    /// Advisory security settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<SecurityContext>,
}

impl Flow {
    /// Empty flow with the given name and stock defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: default_version(),
            description: String::new(),
            mode: FlowMode::default(),
            dependencies: HashMap::new(),
            healthcheck: None,
            steps: Vec::new(),
            env_vars: HashMap::new(),
            security: None,
        }
    }
}

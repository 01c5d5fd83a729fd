//! System detection report: which tools the probe saw, and the OS label.

use serde::{Deserialize, Serialize};

/// Probe result for one tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolStatus {
    /// Whether the tool was detected.
    pub available: bool,
    /// Reported version, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ToolStatus {
    /// A detected tool with the given version string.
    pub fn available(version: impl Into<String>) -> Self {
        Self {
            available: true,
            version: Some(version.into()),
        }
    }

    /// A tool the probe did not find.
    pub fn missing() -> Self {
        Self {
            available: false,
            version: None,
        }
    }
}

/// Snapshot of the host environment as the probe saw it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemReport {
    /// Display label for the operating system, e.g. "Linux".
    pub os: String,
    /// Docker availability.
    pub docker: ToolStatus,
    /// Podman availability.
    pub podman: ToolStatus,
    /// Node.js availability.
    pub node: ToolStatus,
}

impl SystemReport {
    /// Status of a probed tool by name, when the probe covers that tool.
    pub fn tool(&self, name: &str) -> Option<&ToolStatus> {
        match name {
            "docker" => Some(&self.docker),
            "podman" => Some(&self.podman),
            "node" => Some(&self.node),
            _ => None,
        }
    }

    /// Declared dependencies the probe covered but did not detect.
    ///
    /// Dependencies the probe knows nothing about are skipped rather
    /// than flagged; the report only speaks for the tools it checked.
    pub fn missing_tools<'a>(&self, dependencies: impl IntoIterator<Item = &'a String>) -> Vec<String> {
        dependencies
            .into_iter()
            .filter(|name| {
                self.tool(name)
                    .is_some_and(|status| !status.available)
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn report(docker: ToolStatus, node: ToolStatus) -> SystemReport {
        SystemReport {
            os: "Linux".to_string(),
            docker,
            podman: ToolStatus::missing(),
            node,
        }
    }

    #[test]
    fn test_tool_lookup_by_name() {
        let report = report(ToolStatus::available("20.10.8"), ToolStatus::missing());
        assert_eq!(report.tool("docker").unwrap().available, true);
        assert_eq!(report.tool("node").unwrap().available, false);
        assert_eq!(report.tool("ffmpeg"), None);
    }

    #[test]
    fn test_missing_tools_skips_unknown_dependencies() {
        let report = report(ToolStatus::missing(), ToolStatus::available("18.17.0"));
        let dependencies = HashMap::from([
            ("docker".to_string(), ">=20.0.0".to_string()),
            ("node".to_string(), ">=16.0.0".to_string()),
            ("ffmpeg".to_string(), ">=4.0.0".to_string()),
        ]);

        let missing = report.missing_tools(dependencies.keys());
        assert_eq!(missing, vec!["docker".to_string()]);
    }

    #[test]
    fn test_missing_version_is_absent_from_json() {
        let json = serde_json::to_value(ToolStatus::missing()).unwrap();
        assert!(!json.as_object().unwrap().contains_key("version"));
    }
}

//! Stock implementations of [`StepExecutor`] and [`SystemProbe`].
//!
//! Nothing here touches the real host beyond reading the OS name. Step
//! execution is a randomized sleep, and tool detection is a weighted
//! coin toss, so the launcher behaves like a demo environment with no
//! external requirements.

use crate::domain::flow::{Flow, Step};
use crate::domain::system::{SystemReport, ToolStatus};
use crate::{StepExecutor, StepOutcome, SystemProbe};
use async_trait::async_trait;
use rand::Rng;
use std::ops::RangeInclusive;
use std::time::Duration;
use tokio::time::sleep;

/// Simulated per-step latency, in milliseconds.
const LATENCY_MS: RangeInclusive<u64> = 1000..=3000;

/// Probability that a simulated step succeeds.
const STEP_SUCCESS_RATE: f64 = 0.9;

/// Fixed latency of a flow preflight check, in milliseconds.
const PREFLIGHT_LATENCY_MS: u64 = 1000;

/// Probability that a flow preflight check passes.
const PREFLIGHT_PASS_RATE: f64 = 0.7;

const DOCKER_ODDS: f64 = 0.7;
const PODMAN_ODDS: f64 = 0.3;
const NODE_ODDS: f64 = 0.8;

/// Step executor that sleeps for a random interval and then succeeds
/// nine times out of ten.
#[derive(Debug, Default)]
pub struct SimulatedStepExecutor;

impl SimulatedStepExecutor {
    /// Create a new simulated executor.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StepExecutor for SimulatedStepExecutor {
    async fn execute(&self, step: &Step) -> StepOutcome {
        let latency_ms = rand::thread_rng().gen_range(LATENCY_MS);
        tracing::debug!(step = %step.name, latency_ms, "simulating step execution");
        sleep(Duration::from_millis(latency_ms)).await;

        if rand::thread_rng().gen_bool(STEP_SUCCESS_RATE) {
            StepOutcome::Success
        } else {
            StepOutcome::Failure
        }
    }

    async fn preflight(&self, flow: &Flow) -> StepOutcome {
        tracing::debug!(flow = %flow.name, "simulating flow preflight");
        sleep(Duration::from_millis(PREFLIGHT_LATENCY_MS)).await;

        if rand::thread_rng().gen_bool(PREFLIGHT_PASS_RATE) {
            StepOutcome::Success
        } else {
            StepOutcome::Failure
        }
    }
}

/// System probe that reports the real OS name and rolls weighted odds
/// for each tool instead of shelling out.
#[derive(Debug, Default)]
pub struct SimulatedSystemProbe;

impl SimulatedSystemProbe {
    /// Create a new simulated probe.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SystemProbe for SimulatedSystemProbe {
    async fn detect(&self) -> SystemReport {
        let mut rng = rand::thread_rng();
        SystemReport {
            os: os_label().to_string(),
            docker: roll(&mut rng, DOCKER_ODDS, "20.10.8"),
            podman: roll(&mut rng, PODMAN_ODDS, "3.4.2"),
            node: roll(&mut rng, NODE_ODDS, "18.17.0"),
        }
    }
}

fn roll(rng: &mut impl Rng, odds: f64, version: &str) -> ToolStatus {
    if rng.gen_bool(odds) {
        ToolStatus::available(version)
    } else {
        ToolStatus::missing()
    }
}

fn os_label() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "macOS",
        "windows" => "Windows",
        other => other,
    }
}

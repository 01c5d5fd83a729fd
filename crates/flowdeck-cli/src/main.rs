//! Command-line front end for the Flowdeck launcher core.
//!
//! Runs the same simulated engine the browser UI drives, printing the
//! run log to the console instead of a log panel.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use flowdeck_core::{
    Flow, FlowCatalog, LauncherService, LogEntry, LogLevel, MemoryFlowCatalog, RunListener,
    SimulatedStepExecutor, SimulatedSystemProbe, StepState,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "flowdeck")]
#[command(about = "Launch and inspect Flowdeck automation flows", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the flows in the catalog
    List,
    /// Show one flow in detail
    Show {
        /// Flow name
        name: String,
    },
    /// Run a flow, streaming its log to the console
    Run {
        /// Flow name from the catalog
        #[arg(required_unless_present = "file")]
        name: Option<String>,
        /// Run a flow loaded from a YAML file instead
        #[arg(short, long, conflicts_with = "name")]
        file: Option<PathBuf>,
    },
    /// Duplicate a flow under a derived name
    Duplicate {
        /// Source flow name
        name: String,
    },
    /// Probe the simulated host environment
    Detect,
}

/// Prints run output the way the launcher UI shows it: timestamped,
/// level-tagged lines, with step transitions indented underneath.
struct ConsoleListener;

impl RunListener for ConsoleListener {
    fn on_log(&self, entry: &LogEntry) {
        let tag = match entry.level {
            LogLevel::Info => "info".cyan(),
            LogLevel::Success => "success".green(),
            LogLevel::Warning => "warning".yellow(),
            LogLevel::Error => "error".red(),
        };
        println!(
            "[{}] [{}] {}",
            entry.timestamp.format("%H:%M:%S"),
            tag,
            entry.message
        );
    }

    fn on_step_state(&self, index: usize, state: StepState) {
        println!("           step {} -> {}", index + 1, state);
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // The console listener narrates runs; tracing stays quiet unless
    // asked for via RUST_LOG, so log lines are not printed twice.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let catalog = Arc::new(MemoryFlowCatalog::seeded());
    let launcher = LauncherService::new(
        catalog.clone(),
        Arc::new(SimulatedStepExecutor::new()),
        Arc::new(SimulatedSystemProbe::new()),
        Arc::new(ConsoleListener),
    );

    match cli.command {
        Commands::List => {
            for flow in launcher.list_flows().await? {
                println!(
                    "{:<28} v{:<8} {:>2} steps  {}",
                    flow.name,
                    flow.version,
                    flow.steps.len(),
                    flow.description
                );
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Show { name } => match launcher.find_flow(&name).await? {
            Some(flow) => {
                print_flow(&flow);
                Ok(ExitCode::SUCCESS)
            }
            None => {
                eprintln!("Flow not found: {}", name);
                Ok(ExitCode::FAILURE)
            }
        },

        Commands::Run { name, file } => {
            let target = match (name, file) {
                (_, Some(path)) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    let flow: Flow = serde_yaml::from_str(&text)
                        .with_context(|| format!("Failed to parse {}", path.display()))?;
                    let name = flow.name.clone();
                    catalog.save(flow).await?;
                    name
                }
                (Some(name), None) => name,
                (None, None) => bail!("A flow name or --file is required"),
            };

            run_flow(&launcher, &target).await
        }

        Commands::Duplicate { name } => {
            let copy = launcher.duplicate_flow(&name).await?;
            println!("Created {}", copy.name);
            Ok(ExitCode::SUCCESS)
        }

        Commands::Detect => {
            let report = launcher.refresh_system().await;
            println!("OS: {}", report.os);
            for (tool, status) in [
                ("docker", &report.docker),
                ("podman", &report.podman),
                ("node", &report.node),
            ] {
                match &status.version {
                    Some(version) => {
                        println!("{:<8} {} ({})", tool, "available".green(), version)
                    }
                    None => println!("{:<8} {}", tool, "not found".red()),
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Run a catalog flow to the end, stopping it on ctrl-c.
async fn run_flow(launcher: &LauncherService, name: &str) -> Result<ExitCode> {
    let handle = launcher.execute_flow(name).await?;
    let mut done = Box::pin(handle.wait());

    let report = loop {
        tokio::select! {
            report = &mut done => break report?,
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for ctrl-c")?;
                launcher.stop_execution();
            }
        }
    };

    println!();
    println!("Run {} {}", report.run_id, report.outcome);
    Ok(if report.is_complete() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_flow(flow: &Flow) {
    println!("{} v{}", flow.name, flow.version);
    if !flow.description.is_empty() {
        println!("  {}", flow.description);
    }
    println!("  mode: {}", flow.mode);

    if !flow.dependencies.is_empty() {
        let mut deps: Vec<String> = flow
            .dependencies
            .iter()
            .map(|(tool, constraint)| format!("{} {}", tool, constraint))
            .collect();
        deps.sort();
        println!("  dependencies: {}", deps.join(", "));
    }

    if !flow.env_vars.is_empty() {
        let mut vars: Vec<String> = flow
            .env_vars
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        vars.sort();
        println!("  env: {}", vars.join(" "));
    }

    println!("  steps:");
    for (index, step) in flow.steps.iter().enumerate() {
        let mut extras = Vec::new();
        if let Some(timeout) = step.timeout {
            extras.push(format!("timeout {}s", timeout));
        }
        if step.background {
            extras.push("background".to_string());
        }
        if let Some(delay) = step.delay {
            extras.push(format!("delay {}s", delay));
        }
        let extras = if extras.is_empty() {
            String::new()
        } else {
            format!("  ({})", extras.join(", "))
        };
        println!(
            "    {}. {} [{}] {}{}",
            index + 1,
            step.name,
            step.kind(),
            step.payload(),
            extras
        );
    }
}

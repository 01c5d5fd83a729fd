//! End-to-end scenarios against the public launcher API: catalog
//! browsing, duplication, the editor lifecycle, and full runs with a
//! deterministic executor.

use async_trait::async_trait;
use flowdeck_core::{
    Flow, FlowCatalog, LauncherService, LogBuffer, MemoryFlowCatalog, RunOutcome, Step, StepEdit,
    StepExecutor, StepKind, StepOutcome, StepState, SystemProbe, SystemReport, ToolStatus,
};
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("flowdeck_core=debug")
        .try_init();
}

/// Executor that succeeds instantly, keeping scenarios deterministic.
struct InstantExecutor;

#[async_trait]
impl StepExecutor for InstantExecutor {
    async fn execute(&self, _step: &Step) -> StepOutcome {
        StepOutcome::Success
    }
}

/// Probe with a fixed answer.
struct StaticProbe;

#[async_trait]
impl SystemProbe for StaticProbe {
    async fn detect(&self) -> SystemReport {
        SystemReport {
            os: "Linux".to_string(),
            docker: ToolStatus::available("20.10.8"),
            podman: ToolStatus::missing(),
            node: ToolStatus::available("18.17.0"),
        }
    }
}

fn seeded_launcher() -> (Arc<LauncherService>, Arc<MemoryFlowCatalog>, Arc<LogBuffer>) {
    let catalog = Arc::new(MemoryFlowCatalog::seeded());
    let buffer = Arc::new(LogBuffer::new());
    let launcher = Arc::new(LauncherService::new(
        catalog.clone(),
        Arc::new(InstantExecutor),
        Arc::new(StaticProbe),
        buffer.clone(),
    ));
    (launcher, catalog, buffer)
}

#[tokio::test]
async fn test_catalog_starts_with_stock_flows() {
    init_tracing();
    let (launcher, _catalog, _buffer) = seeded_launcher();

    let flows = launcher.list_flows().await.unwrap();
    let names: Vec<&str> = flows.iter().map(|f| f.name.as_str()).collect();

    assert_eq!(
        names,
        vec!["WebDev-Native", "WebDev-Container", "Suite-Creativa"]
    );
    assert!(flows.iter().all(|f| f.version == "1.0.0"));
}

#[tokio::test]
async fn test_duplicated_flow_is_a_detached_copy() {
    init_tracing();
    let (launcher, catalog, _buffer) = seeded_launcher();

    let copy = launcher.duplicate_flow("Suite-Creativa").await.unwrap();
    assert_eq!(copy.name, "Suite-Creativa (Copia)");
    assert_eq!(copy.version, "1.0.0");
    assert_eq!(catalog.count().await.unwrap(), 4);

    // Editing the copy must not leak into the original.
    launcher.edit_flow("Suite-Creativa (Copia)").await.unwrap();
    launcher.delete_step(0).unwrap();
    launcher.save_flow().await.unwrap();

    let original = launcher.find_flow("Suite-Creativa").await.unwrap().unwrap();
    let edited = launcher
        .find_flow("Suite-Creativa (Copia)")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(original.steps.len(), 5);
    assert_eq!(edited.steps.len(), 4);
}

#[tokio::test]
async fn test_editor_lifecycle_from_open_to_save() {
    init_tracing();
    let (launcher, _catalog, buffer) = seeded_launcher();

    launcher.edit_flow("WebDev-Native").await.unwrap();

    // Drop the middle install step; the dev-server step shifts into its
    // place and is the one a follow-up edit must touch.
    let removed = launcher.delete_step(1).unwrap();
    assert_eq!(removed.name, "instalar_dependencias");

    launcher
        .edit_step_config(
            1,
            StepEdit {
                name: "lanzar_dev_server_rapido".to_string(),
                command: "npm run dev -- --turbo".to_string(),
                timeout: 60,
            },
        )
        .unwrap();

    let index = launcher.add_component(StepKind::Container, 240.0, 160.0).unwrap();
    assert_eq!(index, 3);

    let saved = launcher.save_flow().await.unwrap();
    assert_eq!(saved.name, "WebDev-Native");
    assert_eq!(saved.steps.len(), 4);
    assert_eq!(saved.steps[1].name, "lanzar_dev_server_rapido");
    assert_eq!(saved.steps[3].image.as_deref(), Some("nginx:latest"));

    // The stored flow matches what the save returned.
    let stored = launcher.find_flow("WebDev-Native").await.unwrap().unwrap();
    assert_eq!(stored, saved);

    let messages = buffer.messages();
    assert!(messages.contains(&"Editing flow: WebDev-Native".to_string()));
    assert!(messages.contains(&"Step removed from flow".to_string()));
    assert!(messages.contains(&"Component \"lanzar_dev_server_rapido\" updated".to_string()));
    assert!(messages.contains(&"Flow \"WebDev-Native\" saved successfully".to_string()));
}

#[tokio::test]
async fn test_abandoned_edits_leave_the_catalog_alone() {
    init_tracing();
    let (launcher, _catalog, _buffer) = seeded_launcher();

    launcher.edit_flow("WebDev-Container").await.unwrap();
    launcher.delete_step(0).unwrap();
    launcher.delete_step(0).unwrap();
    launcher.close_editor().unwrap();

    let stored = launcher
        .find_flow("WebDev-Container")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.steps.len(), 4);
    assert_eq!(stored.steps[0].name, "verificar_docker");
}

#[tokio::test]
async fn test_full_run_narrates_every_step_in_order() {
    init_tracing();
    let (launcher, _catalog, buffer) = seeded_launcher();

    let handle = launcher.execute_flow("Suite-Creativa").await.unwrap();
    let report = handle.wait().await.unwrap();

    assert_eq!(report.flow_name, "Suite-Creativa");
    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.step_states, vec![StepState::Succeeded; 5]);

    // Transitions walk the steps strictly in order.
    let transitions = buffer.transitions();
    let expected: Vec<(usize, StepState)> = (0..5)
        .flat_map(|i| [(i, StepState::Running), (i, StepState::Succeeded)])
        .collect();
    assert_eq!(transitions, expected);

    let messages = buffer.messages();
    assert_eq!(messages[0], "Starting flow execution: Suite-Creativa");
    assert!(messages.contains(&"Running step: verificar_herramientas".to_string()));
    assert!(messages.contains(&"Command: python --version && ffmpeg -version".to_string()));
    assert_eq!(
        messages
            .iter()
            .filter(|m| *m == "Flow completed successfully")
            .count(),
        1
    );
}

// Paused clock: the final WebDev-Native step declares a delay that
// would otherwise cost three real seconds per run.
#[tokio::test(start_paused = true)]
async fn test_runs_can_follow_each_other() {
    init_tracing();
    let (launcher, _catalog, _buffer) = seeded_launcher();

    for _ in 0..3 {
        let handle = launcher.execute_flow("WebDev-Native").await.unwrap();
        assert!(handle.wait().await.unwrap().is_complete());
        assert!(!launcher.is_run_in_progress());
    }
}

#[tokio::test]
async fn test_detection_feeds_the_dependency_advisory() {
    init_tracing();
    let catalog = Arc::new(MemoryFlowCatalog::new());
    let mut flow = Flow::new("Media");
    flow.dependencies = std::collections::HashMap::from([
        ("podman".to_string(), ">=3.0.0".to_string()),
        ("node".to_string(), ">=16.0.0".to_string()),
    ]);
    flow.steps = vec![Step::command("render", "ffmpeg -i in.mp4 out.webm")];
    catalog.save(flow).await.unwrap();

    let buffer = Arc::new(LogBuffer::new());
    let launcher = LauncherService::new(
        catalog,
        Arc::new(InstantExecutor),
        Arc::new(StaticProbe),
        buffer.clone(),
    );

    let report = launcher.refresh_system().await;
    assert_eq!(report.os, "Linux");
    assert!(!report.podman.available);

    let handle = launcher.execute_flow("Media").await.unwrap();
    handle.wait().await.unwrap();

    let messages = buffer.messages();
    // podman is declared but absent; node is declared and present.
    assert!(messages.contains(&"Declared dependency not detected: podman".to_string()));
    assert!(!messages.contains(&"Declared dependency not detected: node".to_string()));
}

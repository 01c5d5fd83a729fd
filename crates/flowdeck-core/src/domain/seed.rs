//! Stock flows the catalog starts out with.

use crate::domain::flow::{Flow, FlowMode, HealthCheck, SecurityContext, Step};
use std::collections::HashMap;

/// The three flows every fresh catalog contains, in display order.
pub fn seed_flows() -> Vec<Flow> {
    vec![webdev_native(), webdev_container(), suite_creativa()]
}

fn webdev_native() -> Flow {
    let mut verify = Step::command("verificar_node", "node --version");
    verify.timeout = Some(5);

    let mut install = Step::command("instalar_dependencias", "npm install");
    install.timeout = Some(300);

    let mut serve = Step::command("lanzar_dev_server", "npm run dev");
    serve.background = true;
    serve.port = Some(3000);

    let mut open = Step::command("abrir_navegador", "http://localhost:3000");
    open.delay = Some(3);

    Flow {
        name: "WebDev-Native".to_string(),
        version: "1.0.0".to_string(),
        description: "Flujo de desarrollo web nativo para proyectos React/Vue/Angular".to_string(),
        mode: FlowMode::Native,
        dependencies: HashMap::from([
            ("node".to_string(), ">=16.0.0".to_string()),
            ("npm".to_string(), ">=8.0.0".to_string()),
            ("git".to_string(), ">=2.0.0".to_string()),
        ]),
        healthcheck: Some(HealthCheck::default()),
        steps: vec![verify, install, serve, open],
        env_vars: HashMap::from([
            ("NODE_ENV".to_string(), "development".to_string()),
            ("PORT".to_string(), "3000".to_string()),
        ]),
        security: None,
    }
}

fn webdev_container() -> Flow {
    let mut verify = Step::command("verificar_docker", "docker --version");
    verify.timeout = Some(5);

    let mut build = Step::container("construir_imagen", "node:18-alpine");
    build.timeout = Some(600);

    let mut run = Step::container("ejecutar_contenedor", "webdev-app:latest");
    run.ports = vec!["3000:3000".to_string()];

    let mut open = Step::command("abrir_navegador", "http://localhost:3000");
    open.delay = Some(5);

    Flow {
        name: "WebDev-Container".to_string(),
        version: "1.0.0".to_string(),
        description: "Flujo de desarrollo web containerizado con Docker".to_string(),
        mode: FlowMode::Container,
        dependencies: HashMap::from([
            ("docker".to_string(), ">=20.0.0".to_string()),
            ("docker-compose".to_string(), ">=1.29.0".to_string()),
        ]),
        healthcheck: Some(HealthCheck {
            test: Some("curl -f http://localhost:3000 || exit 1".to_string()),
            ..HealthCheck::default()
        }),
        steps: vec![verify, build, run, open],
        env_vars: HashMap::new(),
        security: Some(SecurityContext {
            user: Some("node".to_string()),
            read_only: false,
        }),
    }
}

fn suite_creativa() -> Flow {
    let mut verify = Step::command("verificar_herramientas", "python --version && ffmpeg -version");
    verify.timeout = Some(10);

    let mut photoshop = Step::command("abrir_photoshop", "photoshop");
    photoshop.background = true;

    let mut illustrator = Step::command("abrir_illustrator", "illustrator");
    illustrator.background = true;

    let workdir = Step::command(
        "configurar_directorio_trabajo",
        "mkdir -p $WORK_DIR/assets && mkdir -p $WORK_DIR/exports",
    );

    let mut automation = Step::command("script_automatizacion", "python automation_script.py");
    automation.timeout = Some(300);

    Flow {
        name: "Suite-Creativa".to_string(),
        version: "1.0.0".to_string(),
        description: "Flujo automatizado para herramientas creativas Adobe y alternativas"
            .to_string(),
        mode: FlowMode::Native,
        dependencies: HashMap::from([
            ("python".to_string(), ">=3.8.0".to_string()),
            ("ffmpeg".to_string(), ">=4.0.0".to_string()),
        ]),
        healthcheck: Some(HealthCheck {
            interval: "60s".to_string(),
            timeout: "15s".to_string(),
            retries: 2,
            test: None,
        }),
        steps: vec![verify, photoshop, illustrator, workdir, automation],
        env_vars: HashMap::from([
            ("WORK_DIR".to_string(), "$HOME/CreativeWork".to_string()),
            ("PYTHONPATH".to_string(), "$WORK_DIR/scripts".to_string()),
        ]),
        security: None,
    }
}

//! Shared handler context initialization
//!
//! Used by both `serve` and `status`, so the two commands see the same
//! projects, backends and capability answers.

use anyhow::Context;
use relay_config::AppConfig;
use relay_handler_api::{HandlerContext, IdeInfo, ProjectLocks};
use relay_plugin_api::{BackendDispatchTable, CapabilityRegistry};
use relay_workspaces::BuiltinEngine;
use std::sync::Arc;
use tracing::info;

/// Whether `create_context` waits for the initial indexing of each project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indexing {
    Background,
    Wait,
}

/// Open the configured projects and wire the handler context
pub async fn create_context(config: &AppConfig, indexing: Indexing) -> anyhow::Result<Arc<HandlerContext>> {
    let engine = BuiltinEngine::new();
    for project in &config.projects {
        let opened = match indexing {
            Indexing::Background => engine.workspace.open(&project.name, &project.path),
            Indexing::Wait => engine.workspace.open_indexed(&project.name, &project.path).await,
        };
        opened.with_context(|| format!("Failed to open project '{}'", project.name))?;
    }

    let backends = BackendDispatchTable::from_backends(relay_plugin_bundle::all_backends());
    info!(
        projects = config.projects.len(),
        routes = backends.len(),
        "Handler context ready"
    );

    Ok(Arc::new(HandlerContext {
        ide: IdeInfo {
            ide_type: config.ide.ide_type.clone(),
            ide_version: config.ide.ide_version.clone(),
            port: config.server.port,
        },
        projects: engine.workspace.clone(),
        documents: engine.documents.clone(),
        symbols: engine.symbols.clone(),
        diagnostics: engine.diagnostics.clone(),
        capabilities: CapabilityRegistry::global(),
        backends: Arc::new(backends),
        locks: Arc::new(ProjectLocks::new()),
        timeouts: config.timeouts.clone(),
    }))
}

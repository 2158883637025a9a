//! Handler contexts for tests

use crate::mocks::{MockDiagnosticsEngine, MockDocumentProvider, MockProjectIndex, MockSymbolEngine};
use relay_config::TimeoutConfig;
use relay_handler_api::{HandlerContext, IdeInfo, ProjectLocks};
use relay_plugin_api::{BackendDispatchTable, CapabilityProbe, CapabilityRegistry, ProbeError};
use std::sync::Arc;

pub fn test_ide() -> IdeInfo {
    IdeInfo {
        ide_type: "Relay".to_string(),
        ide_version: "test".to_string(),
        port: 3040,
    }
}

/// Probe answering from a fixed list of probe ids
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    available: Vec<String>,
}

impl StaticProbe {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(ids: &[&str]) -> Self {
        Self {
            available: ids.iter().map(|id| id.to_string()).collect(),
        }
    }
}

impl CapabilityProbe for StaticProbe {
    fn probe(&self, probe_id: &str) -> Result<bool, ProbeError> {
        if self.available.iter().any(|id| id == probe_id) {
            Ok(true)
        } else {
            Err(ProbeError::ClassNotFound(probe_id.to_string()))
        }
    }
}

/// The four collaborators as mocks, ready for expectations
pub struct MockCollaborators {
    pub projects: MockProjectIndex,
    pub documents: MockDocumentProvider,
    pub symbols: MockSymbolEngine,
    pub diagnostics: MockDiagnosticsEngine,
}

impl MockCollaborators {
    pub fn new() -> Self {
        Self {
            projects: MockProjectIndex::new(),
            documents: MockDocumentProvider::new(),
            symbols: MockSymbolEngine::new(),
            diagnostics: MockDiagnosticsEngine::new(),
        }
    }

    /// Context with no backend available and an empty dispatch table
    pub fn into_context(self) -> HandlerContext {
        self.into_context_with(
            CapabilityRegistry::with_probe(Arc::new(StaticProbe::none())),
            BackendDispatchTable::new(),
        )
    }

    pub fn into_context_with(
        self,
        capabilities: CapabilityRegistry,
        backends: BackendDispatchTable,
    ) -> HandlerContext {
        HandlerContext {
            ide: test_ide(),
            projects: Arc::new(self.projects),
            documents: Arc::new(self.documents),
            symbols: Arc::new(self.symbols),
            diagnostics: Arc::new(self.diagnostics),
            capabilities: Arc::new(capabilities),
            backends: Arc::new(backends),
            locks: Arc::new(ProjectLocks::new()),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl Default for MockCollaborators {
    fn default() -> Self {
        Self::new()
    }
}

//! Handler API for Relay
//!
//! This crate defines the narrow contracts the operation handlers consume
//! (project index, documents, symbol engine, diagnostics engine) and the
//! [`HandlerContext`] that bundles them for a running server.

pub mod locks;
pub mod model;

use async_trait::async_trait;
use relay_config::TimeoutConfig;
use relay_foundation::{CancellationFlag, RelayResult, ResolvedOffset, UsageRecord};
use relay_plugin_api::{BackendDispatchTable, CapabilityRegistry};
use std::path::Path;
use std::sync::Arc;

pub use locks::ProjectLocks;
pub use model::{
    apply_edits, Diagnostic, Document, ProjectHandle, QuickFix, Severity, SymbolElement,
    SymbolKind, TextEdit,
};

/// Open projects and their indexing state
pub trait ProjectIndex: Send + Sync {
    /// Every project the index knows, disposed ones included
    fn open_projects(&self) -> Vec<ProjectHandle>;

    /// The project containing `file`, narrowed by an optional name hint
    fn resolve_project(&self, file: &Path, hint: Option<&str>) -> RelayResult<ProjectHandle>;

    /// Whether the named project is being indexed
    fn is_indexing(&self, project: &str) -> bool;
}

/// Loads, stores and flushes text buffers
#[async_trait]
pub trait DocumentProvider: Send + Sync {
    /// Load a file. Fails with `File not found` or `Cannot parse file`.
    async fn load(&self, path: &Path) -> RelayResult<Document>;

    /// Replace a file's buffer with the document's text
    async fn save(&self, document: &Document) -> RelayResult<()>;

    /// Make every later read in the project observe the changes made so far,
    /// whoever wrote them
    async fn commit(&self, project: &ProjectHandle) -> RelayResult<()>;
}

/// Symbol resolution and reference search
#[async_trait]
pub trait SymbolEngine: Send + Sync {
    /// The element at an offset, if any
    async fn element_at(
        &self,
        project: &ProjectHandle,
        document: &Document,
        offset: ResolvedOffset,
    ) -> RelayResult<Option<SymbolElement>>;

    /// Every reference to the element in the project
    async fn find_usages(
        &self,
        project: &ProjectHandle,
        element: &SymbolElement,
    ) -> RelayResult<Vec<UsageRecord>>;

    /// Rename the element and its references; returns the affected files.
    ///
    /// Must call [`CancellationFlag::enter_commit`] before its first write and
    /// write nothing once it fails.
    async fn rename(
        &self,
        project: &ProjectHandle,
        element: &SymbolElement,
        new_name: &str,
        cancel: &CancellationFlag,
    ) -> RelayResult<Vec<String>>;
}

/// Inspections and quick fixes
#[async_trait]
pub trait DiagnosticsEngine: Send + Sync {
    /// Diagnostics computed for a file opened in an editor, if there is one
    fn cached_diagnostics(&self, path: &Path) -> Option<Vec<Diagnostic>>;

    /// Open an editor view for the document, computing its diagnostics
    async fn open_editor(&self, document: &Document) -> RelayResult<Vec<Diagnostic>>;

    /// Run every inspection on the document now
    async fn run_inspections(
        &self,
        project: &ProjectHandle,
        document: &Document,
    ) -> RelayResult<Vec<Diagnostic>>;
}

/// Host identity reported by `/status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeInfo {
    pub ide_type: String,
    pub ide_version: String,
    pub port: u16,
}

/// Everything a handler needs to serve a request
#[derive(Clone)]
pub struct HandlerContext {
    pub ide: IdeInfo,
    pub projects: Arc<dyn ProjectIndex>,
    pub documents: Arc<dyn DocumentProvider>,
    pub symbols: Arc<dyn SymbolEngine>,
    pub diagnostics: Arc<dyn DiagnosticsEngine>,
    pub capabilities: Arc<CapabilityRegistry>,
    pub backends: Arc<BackendDispatchTable>,
    pub locks: Arc<ProjectLocks>,
    pub timeouts: TimeoutConfig,
}

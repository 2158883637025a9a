use crate::context::test_ide;
use relay_config::TimeoutConfig;
use relay_handler_api::{HandlerContext, ProjectLocks};
use relay_plugin_api::{BackendDispatchTable, CapabilityRegistry};
use relay_workspaces::BuiltinEngine;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

/// Manages a temporary project directory for a test scenario.
/// Cleans up automatically when dropped.
pub struct TestWorkspace {
    pub temp_dir: TempDir,
    root: PathBuf,
}

impl TestWorkspace {
    /// Creates a new empty workspace.
    pub fn new() -> Self {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let root = temp_dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp dir");
        Self { temp_dir, root }
    }

    /// Returns the root path of the workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file with content within the workspace.
    /// Automatically creates parent directories.
    pub fn create_file(&self, rel_path: &str, content: &str) -> PathBuf {
        let file_path = self.path().join(rel_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent dirs for '{}': {}", rel_path, e)
            });
        }
        fs::write(&file_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", file_path.display(), e));
        file_path
    }

    /// Reads a file from the workspace.
    pub fn read_file(&self, rel_path: &str) -> String {
        let file_path = self.path().join(rel_path);
        fs::read_to_string(&file_path)
            .unwrap_or_else(|e| panic!("Failed to read file '{}': {}", file_path.display(), e))
    }

    /// Check if a file exists in the workspace.
    pub fn file_exists(&self, rel_path: &str) -> bool {
        self.path().join(rel_path).exists()
    }

    /// Open the workspace as project `name` in a built-in engine and wrap
    /// it in a handler context with every linked backend.
    pub async fn engine_context(&self, name: &str) -> (BuiltinEngine, HandlerContext) {
        let engine = BuiltinEngine::new();
        engine
            .workspace
            .open_indexed(name, self.path())
            .await
            .unwrap_or_else(|e| panic!("Failed to open project '{}': {}", name, e));

        let context = HandlerContext {
            ide: test_ide(),
            projects: engine.workspace.clone(),
            documents: engine.documents.clone(),
            symbols: engine.symbols.clone(),
            diagnostics: engine.diagnostics.clone(),
            capabilities: Arc::new(CapabilityRegistry::new()),
            backends: Arc::new(BackendDispatchTable::from_backends(
                relay_plugin_bundle::all_backends(),
            )),
            locks: Arc::new(ProjectLocks::new()),
            timeouts: TimeoutConfig::default(),
        };
        (engine, context)
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

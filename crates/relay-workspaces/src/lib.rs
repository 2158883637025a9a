//! Built-in engine for Relay
//!
//! A filesystem-backed implementation of the handler collaborator traits.
//! Analysis is lexical: identifier tokens, whole-word matching and regex
//! declaration patterns.

pub mod documents;
pub mod inspections;
pub mod manager;
pub mod symbols;

pub use documents::{grammar_id, FsDocumentProvider};
pub use inspections::TextInspections;
pub use manager::{collect_source_files, WorkspaceManager};
pub use symbols::LexicalSymbolEngine;

use std::sync::Arc;

/// The four collaborators wired together
#[derive(Debug, Clone)]
pub struct BuiltinEngine {
    pub workspace: Arc<WorkspaceManager>,
    pub documents: Arc<FsDocumentProvider>,
    pub symbols: Arc<LexicalSymbolEngine>,
    pub diagnostics: Arc<TextInspections>,
}

impl BuiltinEngine {
    pub fn new() -> Self {
        let diagnostics = Arc::new(TextInspections::new());
        Self {
            workspace: Arc::new(WorkspaceManager::new()),
            documents: Arc::new(FsDocumentProvider::with_inspections(diagnostics.clone())),
            symbols: Arc::new(LexicalSymbolEngine::new()),
            diagnostics,
        }
    }
}

impl Default for BuiltinEngine {
    fn default() -> Self {
        Self::new()
    }
}

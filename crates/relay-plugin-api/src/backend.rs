//! Backend traits
//!
//! A language backend crate implements [`LanguageBackend`] and hands out one
//! [`RefactoringBackend`] per operation it understands. Backends either
//! perform the mutation or identify the element and refuse; both paths report
//! through [`RefactoringOutcome`].

use crate::language::SupportedLanguage;
use async_trait::async_trait;
use relay_foundation::{CancellationFlag, RefactoringOutcome, ResolvedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Operations routed through the dispatch table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendOperation {
    Move,
    ExtractMethod,
}

impl BackendOperation {
    /// Lowercase name used in messages
    pub fn display_name(self) -> &'static str {
        match self {
            BackendOperation::Move => "move",
            BackendOperation::ExtractMethod => "extract method",
        }
    }
}

impl fmt::Display for BackendOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Complete statements selected for extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementRange {
    /// Offset of the first character of the first statement
    pub start: ResolvedOffset,
    /// Offset one past the last character of the last statement
    pub end: ResolvedOffset,
    /// 1-based line of the first statement
    pub first_line: usize,
    /// 1-based line of the last statement
    pub last_line: usize,
    pub statement_count: usize,
}

/// Operation-specific request data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendRequest {
    Move {
        offset: ResolvedOffset,
        line: usize,
        column: usize,
        target_package: String,
        search_in_comments: bool,
        search_in_non_code_files: bool,
    },
    ExtractMethod {
        range: StatementRange,
        method_name: String,
    },
}

impl BackendRequest {
    pub fn operation(&self) -> BackendOperation {
        match self {
            BackendRequest::Move { .. } => BackendOperation::Move,
            BackendRequest::ExtractMethod { .. } => BackendOperation::ExtractMethod,
        }
    }
}

/// Everything a backend gets to see about one request
#[derive(Debug, Clone)]
pub struct BackendContext {
    pub language: SupportedLanguage,
    pub project_name: String,
    pub project_root: PathBuf,
    pub file: PathBuf,
    /// Buffer contents at the time of the request
    pub text: String,
    pub request: BackendRequest,
    /// Set when the request's deadline passes; see [`CancellationFlag`]
    pub cancel: CancellationFlag,
}

impl BackendContext {
    /// File path relative to the project root, forward slashes
    pub fn relative_file(&self) -> String {
        let relative = self.file.strip_prefix(&self.project_root).unwrap_or(&self.file);
        relay_foundation::paths::display_path(relative)
    }
}

/// One operation implemented by a backend
#[async_trait]
pub trait RefactoringBackend: Send + Sync {
    async fn execute(&self, ctx: &BackendContext) -> RefactoringOutcome;
}

/// Static description of a backend crate
#[derive(Debug, Clone)]
pub struct BackendMetadata {
    /// Human-readable backend name
    pub name: &'static str,
    /// Identifier checked by the capability probe
    pub probe_id: &'static str,
    /// Languages the backend serves
    pub languages: &'static [SupportedLanguage],
}

/// Entry point of a language backend crate
pub trait LanguageBackend: Send + Sync {
    fn metadata(&self) -> &BackendMetadata;

    fn move_backend(&self) -> Option<Arc<dyn RefactoringBackend>> {
        None
    }

    fn extract_method_backend(&self) -> Option<Arc<dyn RefactoringBackend>> {
        None
    }

    /// Backend for an operation, if the crate provides one
    fn backend_for(&self, operation: BackendOperation) -> Option<Arc<dyn RefactoringBackend>> {
        match operation {
            BackendOperation::Move => self.move_backend(),
            BackendOperation::ExtractMethod => self.extract_method_backend(),
        }
    }
}

//! Validation pipeline shared by the handlers
//!
//! Mutating handlers locate the project, take its write lock and only then
//! load the document, so the buffer they rewrite is the one on disk.

use relay_foundation::paths::display_path;
use relay_foundation::{
    resolve, CancellationFlag, Location, RefactoringOutcome, RelayError, RelayResult,
    ResolvedOffset,
};
use relay_handler_api::{Document, HandlerContext, ProjectHandle};
use relay_plugin_api::{
    no_handler_registered, BackendContext, BackendOperation, SupportedLanguage,
};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// The project a request targets, before its document is loaded
#[derive(Debug, Clone)]
pub struct Located {
    pub project: ProjectHandle,
    path: PathBuf,
}

impl Located {
    /// Load the document
    pub async fn load(self, context: &HandlerContext) -> RelayResult<Target> {
        let document = context
            .documents
            .load(&self.project.absolute(&self.path))
            .await?;
        debug!(project = %self.project.name, file = %display_path(&self.path), "Target resolved");
        Ok(Target {
            project: self.project,
            document,
        })
    }
}

/// Project and document a request targets
#[derive(Debug, Clone)]
pub struct Target {
    pub project: ProjectHandle,
    pub document: Document,
}

impl Target {
    pub fn language(&self) -> SupportedLanguage {
        detect_language(&self.document)
    }

    /// Resolve the 1-based coordinate of a location in the document
    pub fn offset(&self, location: &Location) -> RelayResult<ResolvedOffset> {
        resolve(
            &self.document.text,
            &self.document.index,
            location.line,
            location.column,
        )
    }
}

/// Reject blank human-supplied names before any lookup
pub fn require_name(value: &str, field: &str, message: &str) -> RelayResult<()> {
    if value.trim().is_empty() {
        return Err(RelayError::invalid_field(field, message));
    }
    Ok(())
}

/// Steps 2-3 of the pipeline: project and indexing state. Take the
/// project lock before [`Located::load`].
pub fn locate(context: &HandlerContext, location: &Location) -> RelayResult<Located> {
    let path = PathBuf::from(&location.file);
    let hint = location
        .project
        .as_deref()
        .map(str::trim)
        .filter(|hint| !hint.is_empty());

    let project = context.projects.resolve_project(&path, hint)?;
    if context.projects.is_indexing(&project.name) {
        return Err(RelayError::indexing_in_progress(&project.name));
    }
    Ok(Located { project, path })
}

pub fn detect_language(document: &Document) -> SupportedLanguage {
    SupportedLanguage::detect(
        document.declared_language.as_deref(),
        document.extension().as_deref(),
    )
}

pub fn unsupported_language(document: &Document) -> RelayError {
    RelayError::unsupported_language(format!(
        "Unsupported language for file {}. Supported languages: {}",
        display_path(&document.path),
        SupportedLanguage::supported_names()
    ))
}

/// Refuse Unknown files and languages whose backend is not installed
pub fn ensure_available(
    context: &HandlerContext,
    language: SupportedLanguage,
    document: &Document,
) -> RelayResult<()> {
    if language == SupportedLanguage::Unknown {
        return Err(unsupported_language(document));
    }
    if !context.capabilities.is_available(language) {
        let probe_id = context.capabilities.probe_id(language).unwrap_or("none");
        return Err(RelayError::unsupported_language(format!(
            "{} support is not available (backend '{}' is not installed)",
            language.language_name(),
            probe_id
        )));
    }
    Ok(())
}

/// Route to the language backend
pub async fn dispatch(
    context: &HandlerContext,
    operation: BackendOperation,
    backend_context: &BackendContext,
) -> RefactoringOutcome {
    let language = backend_context.language;
    match context
        .backends
        .route(operation, language, backend_context)
        .await
    {
        Some(outcome) => outcome,
        None => no_handler_registered(operation, language).into(),
    }
}

/// Bound a mutation by its configured timeout
///
/// When the limit passes the mutation is cancelled and then awaited, so the
/// caller's project lock is held until it has stopped. A cancelled mutation
/// reports a timeout. One that already entered its commit completes and its
/// own result is returned.
pub async fn with_timeout<T, F>(
    operation: &str,
    limit: Duration,
    cancel: &CancellationFlag,
    mutation: F,
) -> RelayResult<T>
where
    F: Future<Output = RelayResult<T>>,
{
    tokio::pin!(mutation);
    if let Ok(result) = tokio::time::timeout(limit, &mut mutation).await {
        return result;
    }

    let limit_ms = limit.as_millis() as u64;
    if !cancel.cancel() {
        debug!(operation, limit_ms, "Mutation passed its deadline while committing");
        return mutation.await;
    }

    warn!(operation, limit_ms, "Mutation timed out; waiting for it to stop");
    if mutation.await.is_ok() {
        warn!(operation, "Mutation finished after cancellation");
    }
    Err(RelayError::timeout(operation, limit_ms))
}

/// Log an outcome and pass it through
pub fn log_outcome(operation: &str, outcome: &RefactoringOutcome) {
    if outcome.success {
        info!(operation, files = outcome.affected_files.len(), "Operation succeeded");
    } else {
        info!(operation, message = %outcome.message, "Operation refused");
    }
}

/// Log a pipeline failure with its category
pub fn log_failure(operation: &str, error: &RelayError) {
    info!(
        operation,
        category = error.category(),
        retryable = error.is_retryable(),
        error = %error,
        "Operation failed"
    );
}

/// Run a handler pipeline, logging how it ended
pub async fn run_logged<F>(operation: &str, pipeline: F) -> RefactoringOutcome
where
    F: Future<Output = RelayResult<RefactoringOutcome>>,
{
    match pipeline.await {
        Ok(outcome) => {
            log_outcome(operation, &outcome);
            outcome
        }
        Err(e) => {
            log_failure(operation, &e);
            e.into()
        }
    }
}

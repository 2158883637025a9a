//! Apply-fix handler
//!
//! Fixes come either from the diagnostics already computed for an open
//! editor (an editor is opened when there is none) or from a fresh
//! inspection run.

use super::common::{locate, log_failure, with_timeout};
use super::OperationHandler;
use async_trait::async_trait;
use relay_foundation::paths::display_path;
use relay_foundation::protocol::{ApplyFixRequest, ApplyFixResponse};
use relay_foundation::{CancellationFlag, RelayError, RelayResult};
use relay_handler_api::{apply_edits, Diagnostic, HandlerContext, QuickFix};
use tracing::{debug, info};

pub struct ApplyFixHandler;

/// Fixes of the diagnostics covering an offset, optionally filtered by a
/// case-insensitive substring of the diagnostic message
pub fn fixes_at(diagnostics: &[Diagnostic], offset: usize, message_filter: Option<&str>) -> Vec<QuickFix> {
    let filter = message_filter
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_lowercase);
    diagnostics
        .iter()
        .filter(|d| d.covers(offset))
        .filter(|d| {
            filter
                .as_ref()
                .map_or(true, |f| d.message.to_lowercase().contains(f.as_str()))
        })
        .flat_map(|d| d.fixes.iter().cloned())
        .collect()
}

impl ApplyFixHandler {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, context: &HandlerContext, request: &ApplyFixRequest) -> RelayResult<ApplyFixResponse> {
        let location = request.location();
        let located = locate(context, &location)?;
        let _guard = context.locks.write(&located.project.name).await;
        let target = located.load(context).await?;
        let offset = target.offset(&location)?;
        let document = &target.document;

        let diagnostics = if request.run_inspections {
            context.diagnostics.run_inspections(&target.project, document).await?
        } else {
            match context.diagnostics.cached_diagnostics(&document.path) {
                Some(cached) => cached,
                None => {
                    debug!(file = %display_path(&document.path), "Opening editor for diagnostics");
                    context.diagnostics.open_editor(document).await?
                }
            }
        };

        let fixes = fixes_at(&diagnostics, offset.value(), request.diagnostic_message.as_deref());
        if fixes.is_empty() {
            return Err(RelayError::not_found(format!(
                "No quick fixes available at line {}, column {}",
                request.line, request.column
            )));
        }
        let Some(fix) = fixes.get(request.fix_id) else {
            return Err(RelayError::invalid_field(
                "fixId",
                format!(
                    "Fix index {} is out of range (available fixes: 0-{})",
                    request.fix_id,
                    fixes.len() - 1
                ),
            ));
        };

        info!(fix = %fix.name, file = %display_path(&document.path), "Applying quick fix");
        let cancel = CancellationFlag::new();
        with_timeout("Apply fix", context.timeouts.apply_fix(), &cancel, async {
            let mut updated = document.clone();
            updated.set_text(apply_edits(&document.text, &fix.edits)?);
            cancel.enter_commit()?;
            context.documents.save(&updated).await?;
            context.documents.commit(&target.project).await?;
            Ok(())
        })
        .await?;

        Ok(ApplyFixResponse::applied(
            fix.name.clone(),
            vec![display_path(&document.path)],
        ))
    }
}

impl Default for ApplyFixHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OperationHandler for ApplyFixHandler {
    type Request = ApplyFixRequest;
    type Response = ApplyFixResponse;

    fn operation(&self) -> &'static str {
        "applyFix"
    }

    async fn handle(&self, context: &HandlerContext, request: ApplyFixRequest) -> ApplyFixResponse {
        match self.run(context, &request).await {
            Ok(response) => response,
            Err(e) => {
                log_failure(self.operation(), &e);
                ApplyFixResponse::failure(e.to_string())
            }
        }
    }
}

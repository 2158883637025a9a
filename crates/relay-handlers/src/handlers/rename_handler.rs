//! Rename handler

use super::common::{locate, require_name, run_logged, with_timeout};
use super::OperationHandler;
use async_trait::async_trait;
use relay_foundation::protocol::{RefactoringResponse, RenameRequest};
use relay_foundation::{CancellationFlag, RefactoringOutcome, RelayError, RelayResult};
use relay_handler_api::HandlerContext;
use tracing::info;

pub struct RenameHandler;

impl RenameHandler {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, context: &HandlerContext, request: &RenameRequest) -> RelayResult<RefactoringOutcome> {
        require_name(&request.new_name, "newName", "New name cannot be empty")?;
        let new_name = request.new_name.trim();

        let location = request.location();
        let located = locate(context, &location)?;
        let _guard = context.locks.write(&located.project.name).await;
        let target = located.load(context).await?;
        let offset = target.offset(&location)?;

        let element = context
            .symbols
            .element_at(&target.project, &target.document, offset)
            .await?
            .ok_or_else(|| {
                RelayError::not_found(format!(
                    "No element found at line {}, column {}",
                    request.line, request.column
                ))
            })?;

        if !element.renamable {
            return Err(RelayError::validation(format!(
                "Element at line {}, column {} is not renamable",
                request.line, request.column
            )));
        }

        info!(
            file = %location.file,
            kind = %element.kind,
            from = %element.name,
            to = %new_name,
            "Renaming element"
        );
        let cancel = CancellationFlag::new();
        let affected = with_timeout("Rename", context.timeouts.rename(), &cancel, async {
            let affected = context
                .symbols
                .rename(&target.project, &element, new_name, &cancel)
                .await?;
            context.documents.commit(&target.project).await?;
            Ok(affected)
        })
        .await?;

        Ok(RefactoringOutcome::success(
            format!(
                "Renamed {} '{}' to '{}'",
                element.kind, element.name, new_name
            ),
            affected,
        ))
    }
}

impl Default for RenameHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OperationHandler for RenameHandler {
    type Request = RenameRequest;
    type Response = RefactoringResponse;

    fn operation(&self) -> &'static str {
        "rename"
    }

    async fn handle(&self, context: &HandlerContext, request: RenameRequest) -> RefactoringResponse {
        run_logged(self.operation(), self.run(context, &request))
            .await
            .into()
    }
}

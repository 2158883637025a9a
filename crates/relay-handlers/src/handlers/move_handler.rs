//! Move handler
//!
//! Java types are moved natively; every other language is routed to its
//! backend. Moves never cross from main to test sources or back.

use super::common::{dispatch, ensure_available, locate, require_name, run_logged, with_timeout};
use super::OperationHandler;
use crate::native_java::{self, JavaMove};
use async_trait::async_trait;
use relay_foundation::protocol::{MoveRequest, RefactoringResponse};
use relay_foundation::{CancellationFlag, RefactoringOutcome, RelayResult};
use relay_handler_api::HandlerContext;
use relay_plugin_api::{BackendContext, BackendOperation, BackendRequest, SupportedLanguage};
use tracing::info;

pub struct MoveHandler;

impl MoveHandler {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, context: &HandlerContext, request: &MoveRequest) -> RelayResult<RefactoringOutcome> {
        require_name(&request.target_package, "targetPackage", "Target package cannot be empty")?;
        let target_package = request.target_package.trim();

        let location = request.location();
        let located = locate(context, &location)?;
        let _guard = context.locks.write(&located.project.name).await;
        let target = located.load(context).await?;
        let offset = target.offset(&location)?;
        let language = target.language();
        info!(
            file = %location.file,
            language = %language,
            target = %target_package,
            "Move requested"
        );

        let limit = context.timeouts.move_element();
        let cancel = CancellationFlag::new();
        if language == SupportedLanguage::Java {
            return with_timeout("Move", limit, &cancel, async {
                let outcome = native_java::move_type(JavaMove {
                    project: &target.project,
                    document: &target.document,
                    line: request.line,
                    column: request.column,
                    target_package,
                    search_in_comments: request.search_in_comments,
                    search_in_non_java_files: request.search_in_non_java_files,
                    cancel: &cancel,
                })
                .await?;
                context.documents.commit(&target.project).await?;
                Ok(outcome)
            })
            .await;
        }

        ensure_available(context, language, &target.document)?;
        let backend_context = BackendContext {
            language,
            project_name: target.project.name.clone(),
            project_root: target.project.root.clone(),
            file: target.document.path.clone(),
            text: target.document.text.clone(),
            request: BackendRequest::Move {
                offset,
                line: request.line,
                column: request.column,
                target_package: target_package.to_string(),
                search_in_comments: request.search_in_comments,
                search_in_non_code_files: request.search_in_non_java_files,
            },
            cancel: cancel.clone(),
        };

        with_timeout("Move", limit, &cancel, async {
            let outcome = dispatch(context, BackendOperation::Move, &backend_context).await;
            if outcome.success {
                context.documents.commit(&target.project).await?;
            }
            Ok(outcome)
        })
        .await
    }
}

impl Default for MoveHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OperationHandler for MoveHandler {
    type Request = MoveRequest;
    type Response = RefactoringResponse;

    fn operation(&self) -> &'static str {
        "move"
    }

    async fn handle(&self, context: &HandlerContext, request: MoveRequest) -> RefactoringResponse {
        run_logged(self.operation(), self.run(context, &request))
            .await
            .into()
    }
}

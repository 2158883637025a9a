//! Extract-method handler

use super::common::{dispatch, ensure_available, locate, require_name, run_logged, with_timeout};
use super::OperationHandler;
use crate::native_java;
use async_trait::async_trait;
use relay_foundation::paths::display_path;
use relay_foundation::protocol::{ExtractMethodRequest, RefactoringResponse};
use relay_foundation::{resolve_range, CancellationFlag, RefactoringOutcome, RelayResult};
use relay_handler_api::HandlerContext;
use relay_lang_common::statements_in_range;
use relay_plugin_api::{BackendContext, BackendOperation, BackendRequest, SupportedLanguage};
use tracing::info;

pub struct ExtractMethodHandler;

impl ExtractMethodHandler {
    pub fn new() -> Self {
        Self
    }

    async fn run(
        &self,
        context: &HandlerContext,
        request: &ExtractMethodRequest,
    ) -> RelayResult<RefactoringOutcome> {
        require_name(&request.method_name, "methodName", "Method name cannot be empty")?;
        let method_name = request.method_name.trim();

        let located = locate(context, &request.start_location())?;
        let _guard = context.locks.write(&located.project.name).await;
        let target = located.load(context).await?;
        let document = &target.document;
        let (start, end) = resolve_range(
            &document.text,
            &document.index,
            request.start_line,
            request.start_column,
            request.end_line,
            request.end_column,
        )?;

        let language = target.language();
        if language != SupportedLanguage::Java {
            ensure_available(context, language, document)?;
        }
        let range = statements_in_range(&document.text, &document.index, language, start, end)?;
        info!(
            file = %display_path(&document.path),
            language = %language,
            statements = range.statement_count,
            lines = %format!("{}-{}", range.first_line, range.last_line),
            "Extract method requested"
        );

        let limit = context.timeouts.extract_method();
        let cancel = CancellationFlag::new();

        if language == SupportedLanguage::Java {
            return with_timeout("Extract method", limit, &cancel, async {
                let extraction = native_java::extract_method(document, &range, method_name)?;
                let mut updated = document.clone();
                updated.set_text(extraction.text);
                cancel.enter_commit()?;
                context.documents.save(&updated).await?;
                context.documents.commit(&target.project).await?;
                Ok(RefactoringOutcome::success(
                    format!(
                        "Extracted method '{}' from {} statement(s)",
                        method_name, range.statement_count
                    ),
                    vec![display_path(&document.path)],
                ))
            })
            .await;
        }

        let backend_context = BackendContext {
            language,
            project_name: target.project.name.clone(),
            project_root: target.project.root.clone(),
            file: document.path.clone(),
            text: document.text.clone(),
            request: BackendRequest::ExtractMethod {
                range: range.clone(),
                method_name: method_name.to_string(),
            },
            cancel: cancel.clone(),
        };
        with_timeout("Extract method", limit, &cancel, async {
            let outcome = dispatch(context, BackendOperation::ExtractMethod, &backend_context).await;
            if outcome.success {
                context.documents.commit(&target.project).await?;
            }
            Ok(outcome)
        })
        .await
    }
}

impl Default for ExtractMethodHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OperationHandler for ExtractMethodHandler {
    type Request = ExtractMethodRequest;
    type Response = RefactoringResponse;

    fn operation(&self) -> &'static str {
        "extractMethod"
    }

    async fn handle(&self, context: &HandlerContext, request: ExtractMethodRequest) -> RefactoringResponse {
        run_logged(self.operation(), self.run(context, &request))
            .await
            .into()
    }
}

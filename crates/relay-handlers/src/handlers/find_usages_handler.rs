//! Find-usages handler

use super::common::{locate, log_failure};
use super::OperationHandler;
use async_trait::async_trait;
use relay_foundation::protocol::{FindUsagesRequest, FindUsagesResponse};
use relay_foundation::{RelayError, RelayResult, UsageRecord};
use relay_handler_api::HandlerContext;
use tracing::{debug, info};

pub struct FindUsagesHandler;

impl FindUsagesHandler {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, context: &HandlerContext, request: &FindUsagesRequest) -> RelayResult<Vec<UsageRecord>> {
        let location = request.location();
        let located = locate(context, &location)?;
        let _guard = context.locks.read(&located.project.name).await;
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

        debug!(name = %element.name, kind = %element.kind, "Searching usages");
        context.symbols.find_usages(&target.project, &element).await
    }
}

impl Default for FindUsagesHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OperationHandler for FindUsagesHandler {
    type Request = FindUsagesRequest;
    type Response = FindUsagesResponse;

    fn operation(&self) -> &'static str {
        "findUsages"
    }

    async fn handle(&self, context: &HandlerContext, request: FindUsagesRequest) -> FindUsagesResponse {
        match self.run(context, &request).await {
            Ok(usages) => {
                info!(usages = usages.len(), "Usages found");
                FindUsagesResponse::found(usages)
            }
            Err(e) => {
                log_failure(self.operation(), &e);
                FindUsagesResponse::failure(e.to_string())
            }
        }
    }
}

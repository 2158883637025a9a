//! HTTP operation handlers

pub mod apply_fix_handler;
pub mod common;
pub mod extract_method_handler;
pub mod find_usages_handler;
pub mod move_handler;
pub mod rename_handler;
pub mod status_handler;

pub use apply_fix_handler::ApplyFixHandler;
pub use extract_method_handler::ExtractMethodHandler;
pub use find_usages_handler::FindUsagesHandler;
pub use move_handler::MoveHandler;
pub use rename_handler::RenameHandler;
pub use status_handler::StatusHandler;

use async_trait::async_trait;
use relay_handler_api::HandlerContext;

/// One HTTP operation
#[async_trait]
pub trait OperationHandler: Send + Sync {
    type Request: Send + 'static;
    type Response: Send + 'static;

    /// Operation name used in logs and error codes (`rename`, `findUsages`, ...)
    fn operation(&self) -> &'static str;

    /// Serve a request. Failures are reported inside the response.
    async fn handle(&self, context: &HandlerContext, request: Self::Request) -> Self::Response;
}

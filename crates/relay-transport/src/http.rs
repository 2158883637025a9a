//! Routes, body extraction and the server loop

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use relay_config::logging::request_span;
use relay_config::ServerConfig;
use relay_foundation::protocol::{
    ApplyFixRequest, ErrorResponse, ExtractMethodRequest, FindUsagesRequest, MoveRequest,
    RenameRequest,
};
use relay_foundation::{RelayError, RelayResult};
use relay_handler_api::HandlerContext;
use relay_handlers::{
    ApplyFixHandler, ExtractMethodHandler, FindUsagesHandler, MoveHandler, OperationHandler,
    RenameHandler, StatusHandler,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

type SharedContext = Arc<HandlerContext>;

/// Build the router serving every operation
pub fn build_router(context: SharedContext) -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/rename", post(rename))
        .route("/findUsages", post(find_usages))
        .route("/move", post(move_element))
        .route("/extractMethod", post(extract_method))
        .route("/applyFix", post(apply_fix))
        .fallback(not_found)
        .layer(ServiceBuilder::new())
        .with_state(context)
}

/// Bind the configured address and serve until Ctrl-C
pub async fn start_http_server(config: &ServerConfig, context: SharedContext) -> RelayResult<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| RelayError::config(format!("Failed to bind {}: {}", addr, e)))?;

    info!("Relay listening on {}", addr);
    info!("Available endpoints:");
    info!("  GET  /status - Host, open projects and language availability");
    info!("  POST /rename - Rename the element at a position");
    info!("  POST /findUsages - List references to the element at a position");
    info!("  POST /move - Move a type to another package");
    info!("  POST /extractMethod - Extract statements into a new method");
    info!("  POST /applyFix - Apply a quick fix at a position");

    axum::serve(listener, build_router(context))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Error code reported for a malformed body, `findUsages` -> `FIND_USAGES_ERROR`
pub fn error_code(operation: &str) -> String {
    let mut code = String::with_capacity(operation.len() + 6);
    for ch in operation.chars() {
        if ch.is_ascii_uppercase() && !code.is_empty() {
            code.push('_');
        }
        code.push(ch.to_ascii_uppercase());
    }
    code.push_str("_ERROR");
    code
}

/// Run a handler inside a request span, or answer 400 for a bad body
async fn serve<H>(
    handler: H,
    context: SharedContext,
    body: Result<Json<H::Request>, JsonRejection>,
) -> Response
where
    H: OperationHandler,
    H::Response: Serialize,
{
    let request_id = Uuid::new_v4().to_string();
    let operation = handler.operation();
    let span = request_span(&request_id, operation);

    async move {
        match body {
            Ok(Json(request)) => {
                let response = handler.handle(&context, request).await;
                Json(response).into_response()
            }
            Err(rejection) => {
                let message = rejection.body_text();
                warn!(error = %message, "Rejected malformed request body");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new(message, error_code(operation))),
                )
                    .into_response()
            }
        }
    }
    .instrument(span)
    .await
}

async fn status(State(context): State<SharedContext>) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let handler = StatusHandler::new();
    let span = request_span(&request_id, handler.operation());
    let response = handler.handle(&context, ()).instrument(span).await;
    Json(response).into_response()
}

async fn rename(
    State(context): State<SharedContext>,
    body: Result<Json<RenameRequest>, JsonRejection>,
) -> Response {
    serve(RenameHandler::new(), context, body).await
}

async fn find_usages(
    State(context): State<SharedContext>,
    body: Result<Json<FindUsagesRequest>, JsonRejection>,
) -> Response {
    serve(FindUsagesHandler::new(), context, body).await
}

async fn move_element(
    State(context): State<SharedContext>,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> Response {
    serve(MoveHandler::new(), context, body).await
}

async fn extract_method(
    State(context): State<SharedContext>,
    body: Result<Json<ExtractMethodRequest>, JsonRejection>,
) -> Response {
    serve(ExtractMethodHandler::new(), context, body).await
}

async fn apply_fix(
    State(context): State<SharedContext>,
    body: Result<Json<ApplyFixRequest>, JsonRejection>,
) -> Response {
    serve(ApplyFixHandler::new(), context, body).await
}

async fn not_found(method: Method, uri: Uri) -> Response {
    debug!(method = %method, path = %uri.path(), "Unknown route");
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(
            format!("Unknown endpoint: {} {}", method, uri.path()),
            "NOT_FOUND",
        )),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(error_code("rename"), "RENAME_ERROR");
        assert_eq!(error_code("findUsages"), "FIND_USAGES_ERROR");
        assert_eq!(error_code("move"), "MOVE_ERROR");
        assert_eq!(error_code("extractMethod"), "EXTRACT_METHOD_ERROR");
        assert_eq!(error_code("applyFix"), "APPLY_FIX_ERROR");
    }
}

//! Logging initialization with environment variable support

use crate::{AppConfig, LogFormat};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber
///
/// Environment variables:
/// - `RUST_LOG`: standard filter directives, combined with the configured level
/// - `LOG_FORMAT`: `json` or `pretty`, overrides the configured format
///
/// Output always goes to stderr. Calling this more than once is harmless;
/// later calls leave the first subscriber in place.
///
/// ```bash
/// RUST_LOG=relay_handlers=debug relay serve --project demo=/work/demo
/// LOG_FORMAT=json relay serve
/// ```
pub fn initialize(config: &AppConfig) {
    let log_level = config
        .logging
        .level
        .parse()
        .unwrap_or(tracing::Level::INFO);

    let env_filter = EnvFilter::from_default_env().add_directive(log_level.into());

    let format = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|f| parse_format(&f))
        .unwrap_or_else(|| config.logging.format.clone());

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

fn parse_format(value: &str) -> Option<LogFormat> {
    match value.to_lowercase().as_str() {
        "json" => Some(LogFormat::Json),
        "pretty" | "human" => Some(LogFormat::Pretty),
        _ => None,
    }
}

/// Span wrapping one HTTP request
///
/// Every event logged while the span is entered carries the request id and
/// the operation name.
pub fn request_span(request_id: &str, operation: &str) -> tracing::Span {
    tracing::info_span!(
        "request",
        request_id = %request_id,
        operation = %operation
    )
}

//! HTTP transport for Relay
//!
//! A thin JSON façade over the operation handlers. Handlers report their own
//! failures inside `200 OK` responses; the transport only answers `400` for
//! bodies that cannot be deserialized and `404` for unknown routes.

pub mod http;

pub use http::{build_router, error_code, start_http_server};

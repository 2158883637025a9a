//! Operation handlers for Relay
//!
//! Each handler validates its request in a fixed order (names, project,
//! indexing, file, coordinates, language), then either runs the native Java
//! path or routes to a language backend. Handlers never fail: every error
//! becomes a `{success: false, message}` response.

pub mod handlers;
pub mod native_java;

pub use handlers::{
    ApplyFixHandler, ExtractMethodHandler, FindUsagesHandler, MoveHandler, OperationHandler,
    RenameHandler, StatusHandler,
};

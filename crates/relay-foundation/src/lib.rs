//! Foundation Layer - error taxonomy, value objects and wire protocol
//!
//! This crate provides the foundational building blocks for Relay:
//! - `RelayError`, the error taxonomy every handler failure is expressed in
//! - Request-scoped value objects (`Location`, `RefactoringOutcome`, `UsageRecord`, ...)
//! - The JSON request/response types of the HTTP surface
//! - The coordinate resolver turning 1-based positions into buffer offsets
//! - `CancellationFlag`, which bounds mutations without leaving partial writes

pub mod cancellation;
pub mod coordinates;
pub mod error;
pub mod model;
pub mod paths;
pub mod protocol;

// Re-export commonly used types for convenience
pub use cancellation::CancellationFlag;
pub use coordinates::{resolve, resolve_range, LineIndex, ResolvedOffset};
pub use error::{BoundsKind, RelayError, RelayResult};
pub use model::{Location, ProjectDescriptor, RefactoringOutcome, UsageRecord};

//! Test support utilities and fixtures for Relay tests

pub mod context;
pub mod mocks;
pub mod workspace;

pub use context::{test_ide, MockCollaborators, StaticProbe};
pub use mocks::{MockDiagnosticsEngine, MockDocumentProvider, MockProjectIndex, MockSymbolEngine};
pub use workspace::TestWorkspace;

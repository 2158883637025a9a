//! Plugin API for language backends
//!
//! This crate defines how language support is discovered and routed:
//! - [`SupportedLanguage`] and the language detector
//! - [`CapabilityRegistry`], the memoized "is this backend installed?" check
//! - [`LanguageBackend`] / [`RefactoringBackend`], implemented by backend crates
//! - [`BackendDispatchTable`], mapping `(language, operation)` to a backend
//! - link-time registration of backend crates through `inventory`

pub mod backend;
pub mod capabilities;
pub mod dispatch;
pub mod language;
pub mod plugin_registry;

pub use backend::{
    BackendContext, BackendMetadata, BackendOperation, BackendRequest, LanguageBackend,
    RefactoringBackend, StatementRange,
};
pub use capabilities::{probe_id, CapabilityProbe, CapabilityRegistry, InventoryProbe, ProbeError};
pub use dispatch::{no_handler_registered, BackendDispatchTable};
pub use language::SupportedLanguage;
// Note: relay_backend! macro is exported at crate root due to #[macro_export]
pub use plugin_registry::{inventory, iter_backends, BackendDescriptor};

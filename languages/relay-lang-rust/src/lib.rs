//! Rust backend for Relay
//!
//! Locates items (functions, types, traits, modules, constants) under the
//! caret; moves and extractions are refused with a description of what was
//! found.

pub mod constants;
pub mod refactoring;

use constants::{LANGUAGE, PROBE_ID};
use refactoring::{RustExtractMethodBackend, RustMoveBackend};
use relay_plugin_api::{
    relay_backend, BackendMetadata, LanguageBackend, RefactoringBackend, SupportedLanguage,
};
use std::sync::Arc;

pub const METADATA: BackendMetadata = BackendMetadata {
    name: LANGUAGE,
    probe_id: PROBE_ID,
    languages: &[SupportedLanguage::Rust],
};

#[derive(Default)]
pub struct RustBackend;

impl LanguageBackend for RustBackend {
    fn metadata(&self) -> &BackendMetadata {
        &METADATA
    }

    fn move_backend(&self) -> Option<Arc<dyn RefactoringBackend>> {
        Some(Arc::new(RustMoveBackend))
    }

    fn extract_method_backend(&self) -> Option<Arc<dyn RefactoringBackend>> {
        Some(Arc::new(RustExtractMethodBackend))
    }
}

relay_backend! {
    name: LANGUAGE,
    probe_id: PROBE_ID,
    factory: || Box::new(RustBackend)
}

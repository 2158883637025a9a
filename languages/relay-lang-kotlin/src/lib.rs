//! Kotlin backend for Relay
//!
//! Moves top-level types between packages and identifies the targets of
//! operations it cannot perform.

pub mod constants;
pub mod refactoring;

use constants::{LANGUAGE, PROBE_ID};
use refactoring::{KotlinExtractMethodBackend, KotlinMoveBackend};
use relay_plugin_api::{
    relay_backend, BackendMetadata, LanguageBackend, RefactoringBackend, SupportedLanguage,
};
use std::sync::Arc;

pub const METADATA: BackendMetadata = BackendMetadata {
    name: LANGUAGE,
    probe_id: PROBE_ID,
    languages: &[SupportedLanguage::Kotlin],
};

#[derive(Default)]
pub struct KotlinBackend;

impl LanguageBackend for KotlinBackend {
    fn metadata(&self) -> &BackendMetadata {
        &METADATA
    }

    fn move_backend(&self) -> Option<Arc<dyn RefactoringBackend>> {
        Some(Arc::new(KotlinMoveBackend))
    }

    fn extract_method_backend(&self) -> Option<Arc<dyn RefactoringBackend>> {
        Some(Arc::new(KotlinExtractMethodBackend))
    }
}

relay_backend! {
    name: LANGUAGE,
    probe_id: PROBE_ID,
    factory: || Box::new(KotlinBackend)
}

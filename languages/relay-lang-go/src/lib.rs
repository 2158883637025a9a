//! Go backend for Relay
//!
//! Locates package-level declarations (types, functions, methods, values);
//! moves and extractions are refused with a description of what was found.

pub mod constants;
pub mod refactoring;

use constants::{LANGUAGE, PROBE_ID};
use refactoring::{GoExtractMethodBackend, GoMoveBackend};
use relay_plugin_api::{
    relay_backend, BackendMetadata, LanguageBackend, RefactoringBackend, SupportedLanguage,
};
use std::sync::Arc;

pub const METADATA: BackendMetadata = BackendMetadata {
    name: LANGUAGE,
    probe_id: PROBE_ID,
    languages: &[SupportedLanguage::Go],
};

#[derive(Default)]
pub struct GoBackend;

impl LanguageBackend for GoBackend {
    fn metadata(&self) -> &BackendMetadata {
        &METADATA
    }

    fn move_backend(&self) -> Option<Arc<dyn RefactoringBackend>> {
        Some(Arc::new(GoMoveBackend))
    }

    fn extract_method_backend(&self) -> Option<Arc<dyn RefactoringBackend>> {
        Some(Arc::new(GoExtractMethodBackend))
    }
}

relay_backend! {
    name: LANGUAGE,
    probe_id: PROBE_ID,
    factory: || Box::new(GoBackend)
}

//! Python backend for Relay
//!
//! Locates classes, functions and module-level names; moves and extractions
//! are refused with a description of what was found.

pub mod constants;
pub mod refactoring;

use constants::{LANGUAGE, PROBE_ID};
use refactoring::{PythonExtractMethodBackend, PythonMoveBackend};
use relay_plugin_api::{
    relay_backend, BackendMetadata, LanguageBackend, RefactoringBackend, SupportedLanguage,
};
use std::sync::Arc;

pub const METADATA: BackendMetadata = BackendMetadata {
    name: LANGUAGE,
    probe_id: PROBE_ID,
    languages: &[SupportedLanguage::Python],
};

#[derive(Default)]
pub struct PythonBackend;

impl LanguageBackend for PythonBackend {
    fn metadata(&self) -> &BackendMetadata {
        &METADATA
    }

    fn move_backend(&self) -> Option<Arc<dyn RefactoringBackend>> {
        Some(Arc::new(PythonMoveBackend))
    }

    fn extract_method_backend(&self) -> Option<Arc<dyn RefactoringBackend>> {
        Some(Arc::new(PythonExtractMethodBackend))
    }
}

relay_backend! {
    name: LANGUAGE,
    probe_id: PROBE_ID,
    factory: || Box::new(PythonBackend)
}

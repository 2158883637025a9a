//! JavaScript and TypeScript backend for Relay
//!
//! One backend serves both languages. It locates functions, classes,
//! bindings and methods; moves and extractions are refused with a
//! description of what was found.

pub mod constants;
pub mod refactoring;

use constants::{BACKEND_NAME, PROBE_ID};
use refactoring::{JsExtractMethodBackend, JsMoveBackend};
use relay_plugin_api::{
    relay_backend, BackendMetadata, LanguageBackend, RefactoringBackend, SupportedLanguage,
};
use std::sync::Arc;

pub const METADATA: BackendMetadata = BackendMetadata {
    name: BACKEND_NAME,
    probe_id: PROBE_ID,
    languages: &[SupportedLanguage::JavaScript, SupportedLanguage::TypeScript],
};

#[derive(Default)]
pub struct JavaScriptBackend;

impl LanguageBackend for JavaScriptBackend {
    fn metadata(&self) -> &BackendMetadata {
        &METADATA
    }

    fn move_backend(&self) -> Option<Arc<dyn RefactoringBackend>> {
        Some(Arc::new(JsMoveBackend))
    }

    fn extract_method_backend(&self) -> Option<Arc<dyn RefactoringBackend>> {
        Some(Arc::new(JsExtractMethodBackend))
    }
}

relay_backend! {
    name: BACKEND_NAME,
    probe_id: PROBE_ID,
    factory: || Box::new(JavaScriptBackend)
}

//! Backend dispatch table
//!
//! Maps `(language, operation)` to at most one backend. Java is served
//! natively by the handlers and is never routed; Unknown is never routed
//! either. The table does not look at availability; callers check the
//! capability registry before routing.

use crate::backend::{BackendContext, BackendOperation, LanguageBackend, RefactoringBackend};
use crate::language::SupportedLanguage;
use relay_foundation::{RefactoringOutcome, RelayError};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Default)]
pub struct BackendDispatchTable {
    routes: HashMap<(SupportedLanguage, BackendOperation), Arc<dyn RefactoringBackend>>,
}

impl BackendDispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from backend instances
    pub fn from_backends<I>(backends: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn LanguageBackend>>,
    {
        let mut table = Self::new();
        for backend in backends {
            let metadata = backend.metadata().clone();
            for operation in [BackendOperation::Move, BackendOperation::ExtractMethod] {
                let Some(handler) = backend.backend_for(operation) else {
                    continue;
                };
                for language in metadata.languages {
                    table.register(*language, operation, Arc::clone(&handler));
                }
            }
            debug!(backend = metadata.name, "Registered backend routes");
        }
        table
    }

    /// Register a backend. Returns `false` when the registration is refused.
    pub fn register(
        &mut self,
        language: SupportedLanguage,
        operation: BackendOperation,
        backend: Arc<dyn RefactoringBackend>,
    ) -> bool {
        if matches!(language, SupportedLanguage::Java | SupportedLanguage::Unknown) {
            warn!(
                language = %language,
                operation = %operation,
                "Refusing backend registration for a language that is never dispatched"
            );
            return false;
        }

        if self.routes.insert((language, operation), backend).is_some() {
            warn!(language = %language, operation = %operation, "Replaced existing backend");
        }
        true
    }

    pub fn is_registered(&self, operation: BackendOperation, language: SupportedLanguage) -> bool {
        self.routes.contains_key(&(language, operation))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Run the backend registered for `(language, operation)`
    ///
    /// Returns `None` when nothing is registered.
    pub async fn route(
        &self,
        operation: BackendOperation,
        language: SupportedLanguage,
        ctx: &BackendContext,
    ) -> Option<RefactoringOutcome> {
        let backend = self.routes.get(&(language, operation))?;
        debug!(language = %language, operation = %operation, "Routing to backend");
        Some(backend.execute(ctx).await)
    }
}

/// Error reported when the table has no route
pub fn no_handler_registered(operation: BackendOperation, language: SupportedLanguage) -> RelayError {
    RelayError::unsupported_language(format!(
        "No {} handler registered for language {}",
        operation.display_name(),
        language.language_name()
    ))
}

//! Mock implementations of the handler collaborators

use async_trait::async_trait;
use mockall::mock;
use relay_foundation::{CancellationFlag, RelayResult, ResolvedOffset, UsageRecord};
use relay_handler_api::{
    Diagnostic, DiagnosticsEngine, Document, DocumentProvider, ProjectHandle, ProjectIndex,
    SymbolElement, SymbolEngine,
};
use std::path::Path;

mock! {
    pub ProjectIndex {}

    impl ProjectIndex for ProjectIndex {
        fn open_projects(&self) -> Vec<ProjectHandle>;
        fn resolve_project<'a>(&self, file: &Path, hint: Option<&'a str>) -> RelayResult<ProjectHandle>;
        fn is_indexing(&self, project: &str) -> bool;
    }
}

mock! {
    pub DocumentProvider {}

    #[async_trait]
    impl DocumentProvider for DocumentProvider {
        async fn load(&self, path: &Path) -> RelayResult<Document>;
        async fn save(&self, document: &Document) -> RelayResult<()>;
        async fn commit(&self, project: &ProjectHandle) -> RelayResult<()>;
    }
}

mock! {
    pub SymbolEngine {}

    #[async_trait]
    impl SymbolEngine for SymbolEngine {
        async fn element_at(
            &self,
            project: &ProjectHandle,
            document: &Document,
            offset: ResolvedOffset,
        ) -> RelayResult<Option<SymbolElement>>;
        async fn find_usages(
            &self,
            project: &ProjectHandle,
            element: &SymbolElement,
        ) -> RelayResult<Vec<UsageRecord>>;
        async fn rename(
            &self,
            project: &ProjectHandle,
            element: &SymbolElement,
            new_name: &str,
            cancel: &CancellationFlag,
        ) -> RelayResult<Vec<String>>;
    }
}

mock! {
    pub DiagnosticsEngine {}

    #[async_trait]
    impl DiagnosticsEngine for DiagnosticsEngine {
        fn cached_diagnostics(&self, path: &Path) -> Option<Vec<Diagnostic>>;
        async fn open_editor(&self, document: &Document) -> RelayResult<Vec<Diagnostic>>;
        async fn run_inspections(
            &self,
            project: &ProjectHandle,
            document: &Document,
        ) -> RelayResult<Vec<Diagnostic>>;
    }
}

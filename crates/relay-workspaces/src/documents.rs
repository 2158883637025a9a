//! Filesystem-backed documents

use crate::inspections::TextInspections;
use async_trait::async_trait;
use relay_foundation::paths::{display_path, file_extension};
use relay_foundation::{RelayError, RelayResult};
use relay_handler_api::{Document, DocumentProvider, ProjectHandle};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Grammar ids a host editor associates with file extensions
///
/// The ids are deliberately irregular in case, as host registries are.
const GRAMMAR_IDS: &[(&str, &str)] = &[
    ("java", "JAVA"),
    ("kt", "Kotlin"),
    ("kts", "Kotlin"),
    ("js", "JavaScript"),
    ("jsx", "JavaScript React"),
    ("mjs", "ECMAScript 6"),
    ("cjs", "JavaScript"),
    ("ts", "TypeScript"),
    ("tsx", "TypeScript JSX"),
    ("mts", "TypeScript"),
    ("cts", "TypeScript"),
    ("py", "Python"),
    ("pyi", "Python Stub"),
    ("go", "go"),
    ("rs", "Rust"),
];

/// Declared language id for a path, if the extension has a grammar
pub fn grammar_id(path: &Path) -> Option<&'static str> {
    let display = display_path(path);
    let ext = file_extension(&display)?.to_ascii_lowercase();
    GRAMMAR_IDS
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, id)| *id)
}

/// Reads and writes UTF-8 files through `tokio::fs`
///
/// Backends and the symbol engine write to disk directly, so a commit
/// re-reads every open editor in the project rather than only saved files.
#[derive(Debug, Default)]
pub struct FsDocumentProvider {
    inspections: Option<Arc<TextInspections>>,
}

impl FsDocumentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the open-editor cache of `inspections` current on commit
    pub fn with_inspections(inspections: Arc<TextInspections>) -> Self {
        Self {
            inspections: Some(inspections),
        }
    }
}

#[async_trait]
impl DocumentProvider for FsDocumentProvider {
    async fn load(&self, path: &Path) -> RelayResult<Document> {
        let shown = display_path(path);
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RelayError::file_not_found(&shown))
            }
            Err(e) => {
                debug!(file = %shown, error = %e, "File could not be read");
                return Err(RelayError::cannot_parse_file(&shown));
            }
        };
        let text = String::from_utf8(bytes).map_err(|_| RelayError::cannot_parse_file(&shown))?;
        Ok(Document::new(
            path,
            text,
            grammar_id(path).map(str::to_string),
        ))
    }

    async fn save(&self, document: &Document) -> RelayResult<()> {
        tokio::fs::write(&document.path, &document.text)
            .await
            .map_err(|e| {
                RelayError::engine(format!(
                    "Failed to write {}: {}",
                    display_path(&document.path),
                    e
                ))
            })?;
        Ok(())
    }

    async fn commit(&self, project: &ProjectHandle) -> RelayResult<()> {
        let Some(inspections) = &self.inspections else {
            return Ok(());
        };

        let open = inspections.open_under(&project.root);
        for path in &open {
            match tokio::fs::read_to_string(path).await {
                Ok(text) => inspections.refresh(path, &text),
                // Moved or renamed away; its editor is gone with it
                Err(_) => inspections.close_editor(path),
            }
        }
        debug!(project = %project.name, editors = open.len(), "Committed open editors");
        Ok(())
    }
}

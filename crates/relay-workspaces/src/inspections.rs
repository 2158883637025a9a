//! Text inspections and the open-editor cache

use async_trait::async_trait;
use dashmap::DashMap;
use relay_foundation::paths::display_path;
use relay_foundation::{LineIndex, RelayResult};
use relay_handler_api::{
    Diagnostic, DiagnosticsEngine, Document, ProjectHandle, QuickFix, Severity, TextEdit,
};
use relay_lang_common::jvm::{self, IMPORT_PATTERN};
use relay_lang_common::lexical::word_occurrences;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Lightweight inspections over raw text
///
/// Diagnostics of files opened in an editor are cached until the file is
/// committed again.
#[derive(Debug, Default)]
pub struct TextInspections {
    editors: DashMap<PathBuf, Vec<Diagnostic>>,
}

impl TextInspections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, path: &Path) -> bool {
        self.editors.contains_key(path)
    }

    /// Recompute the cached diagnostics of an open editor
    pub fn refresh(&self, path: &Path, text: &str) {
        if let Some(mut cached) = self.editors.get_mut(path) {
            *cached = inspect(path, text);
            debug!(file = %display_path(path), "Editor diagnostics refreshed");
        }
    }

    /// Files with an open editor under `root`
    pub fn open_under(&self, root: &Path) -> Vec<PathBuf> {
        self.editors
            .iter()
            .filter(|entry| entry.key().starts_with(root))
            .map(|entry| entry.key().clone())
            .collect()
    }

    pub fn close_editor(&self, path: &Path) {
        self.editors.remove(path);
    }
}

/// Run every inspection on a buffer
pub fn inspect(path: &Path, text: &str) -> Vec<Diagnostic> {
    let index = LineIndex::new(text);
    let mut diagnostics = trailing_whitespace(text, &index);
    diagnostics.extend(missing_final_newline(text, &index));
    if jvm::is_jvm_file(&display_path(path)) {
        diagnostics.extend(unused_imports(text, &index));
    }
    diagnostics.sort_by_key(|d| d.start_offset);
    diagnostics
}

fn trailing_whitespace(text: &str, index: &LineIndex) -> Vec<Diagnostic> {
    (1..=index.line_count())
        .filter_map(|line| {
            let content = index.line_text(text, line)?;
            let trimmed = content.trim_end();
            if trimmed.len() == content.len() {
                return None;
            }
            let start = index.line_start(line)? + trimmed.len();
            let end = index.line_end(line)?;
            Some(Diagnostic {
                message: "Trailing whitespace".to_string(),
                severity: Severity::Warning,
                start_offset: start,
                end_offset: end,
                fixes: vec![QuickFix {
                    name: "Remove trailing whitespace".to_string(),
                    edits: vec![TextEdit::new(start, end, "")],
                }],
            })
        })
        .collect()
}

fn missing_final_newline(text: &str, index: &LineIndex) -> Option<Diagnostic> {
    if text.is_empty() || text.ends_with('\n') {
        return None;
    }
    let last_line = index.line_start(index.line_count())?;
    Some(Diagnostic {
        message: "Missing newline at end of file".to_string(),
        severity: Severity::Info,
        start_offset: last_line,
        end_offset: text.len(),
        fixes: vec![QuickFix {
            name: "Add newline at end of file".to_string(),
            edits: vec![TextEdit::new(text.len(), text.len(), "\n")],
        }],
    })
}

fn unused_imports(text: &str, index: &LineIndex) -> Vec<Diagnostic> {
    // (fqn, line span incl. terminator, diagnostic range)
    let mut unused = Vec::new();
    for caps in IMPORT_PATTERN.captures_iter(text) {
        let (Some(whole), Some(fqn)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let fqn = fqn.as_str();
        if fqn.ends_with(".*") {
            continue;
        }
        let simple = fqn.rsplit('.').next().unwrap_or(fqn);
        let referenced = word_occurrences(text, simple)
            .into_iter()
            .any(|offset| offset < whole.start() || offset >= whole.end());
        if referenced {
            continue;
        }

        let (line, _) = index.position_of(text, whole.start());
        let (Some(line_start), Some(line_end)) = (index.line_start(line), index.line_end(line)) else {
            continue;
        };
        let removal_end = index.line_start(line + 1).unwrap_or(text.len());
        unused.push((fqn.to_string(), line_start, line_end, removal_end));
    }

    let optimize: Vec<TextEdit> = unused
        .iter()
        .map(|(_, start, _, removal_end)| TextEdit::new(*start, *removal_end, ""))
        .collect();

    unused
        .iter()
        .map(|(fqn, start, end, removal_end)| Diagnostic {
            message: format!("Unused import '{}'", fqn),
            severity: Severity::Warning,
            start_offset: *start,
            end_offset: *end,
            fixes: vec![
                QuickFix {
                    name: "Remove unused import".to_string(),
                    edits: vec![TextEdit::new(*start, *removal_end, "")],
                },
                QuickFix {
                    name: "Optimize imports".to_string(),
                    edits: optimize.clone(),
                },
            ],
        })
        .collect()
}

#[async_trait]
impl DiagnosticsEngine for TextInspections {
    fn cached_diagnostics(&self, path: &Path) -> Option<Vec<Diagnostic>> {
        self.editors.get(path).map(|entry| entry.value().clone())
    }

    async fn open_editor(&self, document: &Document) -> RelayResult<Vec<Diagnostic>> {
        let diagnostics = inspect(&document.path, &document.text);
        self.editors.insert(document.path.clone(), diagnostics.clone());
        debug!(
            file = %display_path(&document.path),
            diagnostics = diagnostics.len(),
            "Editor opened"
        );
        Ok(diagnostics)
    }

    async fn run_inspections(
        &self,
        _project: &ProjectHandle,
        document: &Document,
    ) -> RelayResult<Vec<Diagnostic>> {
        let diagnostics = inspect(&document.path, &document.text);
        if let Some(mut cached) = self.editors.get_mut(&document.path) {
            *cached = diagnostics.clone();
        }
        Ok(diagnostics)
    }
}

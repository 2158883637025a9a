//! Values exchanged with the analysis engine

use relay_foundation::paths::{display_path, file_extension};
use relay_foundation::{LineIndex, ProjectDescriptor, RelayError, RelayResult, ResolvedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// An open project as seen by the project index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectHandle {
    pub name: String,
    pub root: PathBuf,
    pub disposed: bool,
}

impl ProjectHandle {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            disposed: false,
        }
    }

    pub fn descriptor(&self) -> ProjectDescriptor {
        ProjectDescriptor::new(self.name.clone(), &display_path(&self.root))
    }

    /// Absolute path of a request file; relative paths are taken from the root
    pub fn absolute(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.root.join(file)
        }
    }
}

/// A loaded text buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
    /// Language id supplied by the host's file type registry
    pub declared_language: Option<String>,
    pub index: LineIndex,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>, declared_language: Option<String>) -> Self {
        let text = text.into();
        let index = LineIndex::new(&text);
        Self {
            path: path.into(),
            text,
            declared_language,
            index,
        }
    }

    pub fn extension(&self) -> Option<String> {
        let path = display_path(&self.path);
        file_extension(&path).map(str::to_string)
    }

    /// Replace the buffer contents, rebuilding the line index
    pub fn set_text(&mut self, text: String) {
        self.index = LineIndex::new(&text);
        self.text = text;
    }

    pub fn line_text(&self, line: usize) -> Option<&str> {
        self.index.line_text(&self.text, line)
    }
}

/// Kind of program element found under a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Class,
    Interface,
    Enum,
    Object,
    Function,
    Variable,
    Module,
    Keyword,
    Literal,
    Other,
}

impl SymbolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::Enum => "enum",
            SymbolKind::Object => "object",
            SymbolKind::Function => "function",
            SymbolKind::Variable => "variable",
            SymbolKind::Module => "module",
            SymbolKind::Keyword => "keyword",
            SymbolKind::Literal => "literal",
            SymbolKind::Other => "element",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The element under a coordinate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolElement {
    pub name: String,
    pub kind: SymbolKind,
    pub file: PathBuf,
    pub offset: ResolvedOffset,
    pub line: usize,
    pub column: usize,
    pub renamable: bool,
}

/// Replacement of `start..end` (byte offsets) with `new_text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub start: usize,
    pub end: usize,
    pub new_text: String,
}

impl TextEdit {
    pub fn new(start: usize, end: usize, new_text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            new_text: new_text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickFix {
    pub name: String,
    pub edits: Vec<TextEdit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A problem reported for a document, with the fixes that resolve it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub severity: Severity,
    pub start_offset: usize,
    pub end_offset: usize,
    pub fixes: Vec<QuickFix>,
}

impl Diagnostic {
    /// Whether the diagnostic covers an offset; the end is inclusive so a
    /// caret placed right after the range still selects it
    pub fn covers(&self, offset: usize) -> bool {
        self.start_offset <= offset && offset <= self.end_offset
    }
}

/// Apply non-overlapping edits to a buffer
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> RelayResult<String> {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by(|a, b| b.start.cmp(&a.start));

    let mut result = text.to_string();
    let mut previous_start = usize::MAX;
    for edit in sorted {
        if edit.start > edit.end || edit.end > result.len() || edit.end > previous_start {
            return Err(RelayError::engine(format!(
                "Invalid edit range {}..{}",
                edit.start, edit.end
            )));
        }
        if !result.is_char_boundary(edit.start) || !result.is_char_boundary(edit.end) {
            return Err(RelayError::engine(format!(
                "Edit range {}..{} splits a character",
                edit.start, edit.end
            )));
        }
        result.replace_range(edit.start..edit.end, &edit.new_text);
        previous_start = edit.start;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_apply_edits_back_to_front() {
        let text = "import a.B;\nclass C {}   \n";
        let edits = vec![TextEdit::new(0, 12, ""), TextEdit::new(22, 25, "")];
        assert_eq!(apply_edits(text, &edits).unwrap(), "class C {}\n");
    }

    #[test]
    fn test_apply_edits_rejects_overlap() {
        let edits = vec![TextEdit::new(0, 5, "x"), TextEdit::new(3, 6, "y")];
        assert!(apply_edits("abcdefgh", &edits).is_err());
    }

    #[test]
    fn test_relative_files_resolve_against_root() {
        let project = ProjectHandle::new("demo", "/work/demo");
        assert_eq!(
            project.absolute(Path::new("src/A.java")),
            PathBuf::from("/work/demo/src/A.java")
        );
        assert_eq!(project.descriptor().path, "/work/demo");
    }

    #[test]
    fn test_document_extension() {
        let document = Document::new("/work/demo/App.KT", "class App\n", None);
        assert_eq!(document.extension().as_deref(), Some("KT"));
        assert_eq!(document.line_text(1), Some("class App"));
    }
}

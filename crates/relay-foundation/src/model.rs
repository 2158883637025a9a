//! Request-scoped value objects shared by every layer

use crate::error::RelayError;
use crate::paths::normalize_path;
use serde::{Deserialize, Serialize};

/// A 1-based, human-facing position in a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub file: String,
    pub line: usize,
    pub column: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

impl Location {
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: normalize_path(&file.into()),
            line,
            column,
            project: None,
        }
    }

    pub fn with_project(mut self, project: Option<String>) -> Self {
        self.project = project;
        self
    }
}

/// Uniform result contract returned by every mutating handler and backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefactoringOutcome {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub affected_files: Vec<String>,
}

impl RefactoringOutcome {
    /// Successful mutation touching the given files
    pub fn success(message: impl Into<String>, affected_files: Vec<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            affected_files: affected_files.iter().map(|f| normalize_path(f)).collect(),
        }
    }

    /// Failed or refused operation
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            affected_files: Vec::new(),
        }
    }
}

impl From<RelayError> for RefactoringOutcome {
    fn from(err: RelayError) -> Self {
        Self::failure(err.to_string())
    }
}

/// One reference site found by a find-usages query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub preview: String,
}

impl UsageRecord {
    /// Build a record from a raw source line; the preview is the trimmed line
    pub fn new(file: &str, line: usize, column: usize, source_line: &str) -> Self {
        Self {
            file: normalize_path(file),
            line,
            column,
            preview: source_line.trim().to_string(),
        }
    }
}

/// One open project or workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    pub name: String,
    pub path: String,
}

impl ProjectDescriptor {
    pub fn new(name: impl Into<String>, path: &str) -> Self {
        Self {
            name: name.into(),
            path: normalize_path(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_outcome_serializes_camel_case() {
        let outcome = RefactoringOutcome::success("Renamed", vec![r"src\A.java".to_string()]);
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"success": true, "message": "Renamed", "affectedFiles": ["src/A.java"]})
        );
    }

    #[test]
    fn test_outcome_from_error_keeps_message() {
        let outcome: RefactoringOutcome = RelayError::validation("Method name cannot be empty").into();
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Method name cannot be empty");
        assert!(outcome.affected_files.is_empty());
    }

    #[test]
    fn test_usage_preview_is_trimmed() {
        let usage = UsageRecord::new(r"src\B.java", 4, 9, "        helper.run();   ");
        assert_eq!(usage.preview, "helper.run();");
        assert_eq!(usage.file, "src/B.java");
    }

    #[test]
    fn test_project_descriptor_normalizes_path() {
        let project = ProjectDescriptor::new("demo", r"C:\work\demo");
        assert_eq!(project.path, "C:/work/demo");
    }
}

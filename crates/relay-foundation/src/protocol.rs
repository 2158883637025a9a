//! Wire protocol for the HTTP surface
//!
//! Request bodies are camelCase JSON. Coordinates are 1-based. Failure
//! responses carry only `success` and `message` (plus an empty `usages` list
//! for find-usages), success responses always carry the list fields.

use crate::model::{Location, ProjectDescriptor, RefactoringOutcome, UsageRecord};
use crate::paths::normalize_path;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub new_name: String,
    #[serde(default)]
    pub project: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindUsagesRequest {
    pub file: String,
    pub line: usize,
    pub column: usize,
    #[serde(default)]
    pub project: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub target_package: String,
    #[serde(default)]
    pub search_in_comments: bool,
    #[serde(default)]
    pub search_in_non_java_files: bool,
    #[serde(default)]
    pub project: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractMethodRequest {
    pub file: String,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub method_name: String,
    #[serde(default)]
    pub project: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyFixRequest {
    pub file: String,
    pub line: usize,
    pub column: usize,
    /// Index into the fixes available at the position, 0-based
    pub fix_id: usize,
    #[serde(default)]
    pub diagnostic_message: Option<String>,
    #[serde(default)]
    pub run_inspections: bool,
    #[serde(default)]
    pub project: Option<String>,
}

impl RenameRequest {
    pub fn location(&self) -> Location {
        Location::new(&self.file, self.line, self.column).with_project(self.project.clone())
    }
}

impl FindUsagesRequest {
    pub fn location(&self) -> Location {
        Location::new(&self.file, self.line, self.column).with_project(self.project.clone())
    }
}

impl MoveRequest {
    pub fn location(&self) -> Location {
        Location::new(&self.file, self.line, self.column).with_project(self.project.clone())
    }
}

impl ExtractMethodRequest {
    /// Where the selection starts
    pub fn start_location(&self) -> Location {
        Location::new(&self.file, self.start_line, self.start_column)
            .with_project(self.project.clone())
    }
}

impl ApplyFixRequest {
    pub fn location(&self) -> Location {
        Location::new(&self.file, self.line, self.column).with_project(self.project.clone())
    }
}

/// Liveness probe payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub ok: bool,
    pub ide_type: String,
    pub ide_version: String,
    pub port: u16,
    pub open_projects: Vec<ProjectDescriptor>,
    pub indexing_in_progress: bool,
    pub language_plugins: BTreeMap<String, bool>,
}

/// Response for rename, move and extract-method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefactoringResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_files: Option<Vec<String>>,
}

impl From<RefactoringOutcome> for RefactoringResponse {
    fn from(outcome: RefactoringOutcome) -> Self {
        let affected_files = outcome.success.then(|| {
            outcome
                .affected_files
                .iter()
                .map(|f| normalize_path(f))
                .collect()
        });
        Self {
            success: outcome.success,
            message: outcome.message,
            affected_files,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindUsagesResponse {
    pub success: bool,
    pub message: String,
    pub usages: Vec<UsageRecord>,
}

impl FindUsagesResponse {
    pub fn found(usages: Vec<UsageRecord>) -> Self {
        Self {
            success: true,
            message: format!("Found {} usage(s)", usages.len()),
            usages,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            usages: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyFixResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_files: Option<Vec<String>>,
}

impl ApplyFixResponse {
    pub fn applied(fix_name: impl Into<String>, affected_files: Vec<String>) -> Self {
        let fix_name = fix_name.into();
        Self {
            success: true,
            message: format!("Applied fix '{}'", fix_name),
            fix_name: Some(fix_name),
            affected_files: Some(affected_files.iter().map(|f| normalize_path(f)).collect()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            fix_name: None,
            affected_files: None,
        }
    }
}

/// Body of HTTP 400/404 responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

//! Error handling for Relay
//!
//! `RelayError` is the single error type shared by the coordinate resolver,
//! the plugin layer and the operation handlers. Handlers never let it escape:
//! every variant is turned into a `{success: false, message}` response, so the
//! `Display` text of each variant is the user-facing message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which coordinate component was out of range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundsKind {
    Line,
    Column,
}

/// Core error type used throughout Relay
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RelayError {
    /// Blank or malformed human-supplied input, caught before any lookup
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Project, file or element does not exist
    #[error("{message}")]
    NotFound {
        message: String,
        resource_type: Option<String>,
    },

    /// Line or column outside the buffer
    #[error("{message}")]
    Bounds { kind: BoundsKind, message: String },

    /// Host state prevents the operation right now (background indexing)
    #[error("{message}")]
    State { message: String },

    /// Language is Unknown, unavailable, or has no backend for the operation
    #[error("{message}")]
    UnsupportedLanguage { message: String },

    /// Backend located the element but declined the mutation
    #[error("{message}")]
    Capability { message: String },

    /// The analysis or refactoring engine failed
    #[error("{message}")]
    Engine { message: String },

    /// A bounded mutation did not finish in time
    #[error("{operation} timed out after {elapsed_ms}ms")]
    Timeout { operation: String, elapsed_ms: u64 },

    /// A mutation stopped before writing because its deadline passed
    #[error("Operation cancelled before any change was written")]
    Cancelled,

    /// Startup configuration problem
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl RelayError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a validation error naming the offending request field
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            resource_type: None,
        }
    }

    /// Create a not found error for a typed resource (project, file, element)
    pub fn resource_not_found(resource_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            resource_type: Some(resource_type.into()),
        }
    }

    /// Project lookup failed; the hint is echoed back when one was supplied
    pub fn project_not_found(file: &str, hint: Option<&str>) -> Self {
        let message = match hint {
            Some(hint) => format!("No open project named '{}' contains file: {}", hint, file),
            None => format!("No open project contains file: {}", file),
        };
        Self::resource_not_found("project", message)
    }

    /// More than one open project contains the file and no hint narrowed it down
    pub fn ambiguous_project(file: &str, candidates: &[String]) -> Self {
        Self::resource_not_found(
            "project",
            format!(
                "File {} belongs to multiple open projects ({}). Pass 'project' to choose one.",
                file,
                candidates.join(", ")
            ),
        )
    }

    /// File does not exist
    pub fn file_not_found(path: &str) -> Self {
        Self::resource_not_found("file", format!("File not found: {}", path))
    }

    /// File exists but could not be turned into a document
    pub fn cannot_parse_file(path: &str) -> Self {
        Self::resource_not_found("file", format!("Cannot parse file: {}", path))
    }

    /// Line outside `[1, line_count]`
    pub fn line_out_of_bounds(line: usize, line_count: usize) -> Self {
        Self::Bounds {
            kind: BoundsKind::Line,
            message: format!(
                "Line {} is out of bounds (valid range: 1-{})",
                line, line_count
            ),
        }
    }

    /// Column outside `[1, line_length + 1]` for a specific line
    pub fn column_out_of_bounds(column: usize, line: usize, max_column: usize) -> Self {
        Self::Bounds {
            kind: BoundsKind::Column,
            message: format!(
                "Column {} is out of bounds for line {} (valid range: 1-{})",
                column, line, max_column
            ),
        }
    }

    /// Project is mid-indexing
    pub fn indexing_in_progress(project: &str) -> Self {
        Self::State {
            message: format!(
                "Project '{}' is currently indexing. Please retry after indexing completes.",
                project
            ),
        }
    }

    /// Create an unsupported language error
    pub fn unsupported_language(message: impl Into<String>) -> Self {
        Self::UnsupportedLanguage {
            message: message.into(),
        }
    }

    /// Create a capability (identify-but-refuse) error
    pub fn capability(message: impl Into<String>) -> Self {
        Self::Capability {
            message: message.into(),
        }
    }

    /// Create an engine error
    pub fn engine(message: impl Into<String>) -> Self {
        Self::Engine {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, elapsed_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_ms,
        }
    }

    pub fn cancelled() -> Self {
        Self::Cancelled
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the caller may succeed by retrying the same request later
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::State { .. } | Self::NotFound { .. })
    }

    /// Machine-readable category, used for structured logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::NotFound { .. } => "not_found",
            Self::Bounds { .. } => "bounds",
            Self::State { .. } => "state",
            Self::UnsupportedLanguage { .. } => "unsupported_language",
            Self::Capability { .. } => "capability",
            Self::Engine { .. } => "engine",
            Self::Timeout { .. } => "timeout",
            Self::Cancelled => "cancelled",
            Self::Config { .. } => "config",
        }
    }
}

impl From<std::io::Error> for RelayError {
    fn from(err: std::io::Error) -> Self {
        RelayError::engine(format!("I/O error: {}", err))
    }
}

/// Result type alias for convenience
pub type RelayResult<T> = Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_the_user_message() {
        let err = RelayError::validation("New name cannot be empty");
        assert_eq!(err.to_string(), "New name cannot be empty");
    }

    #[test]
    fn test_line_bounds_message_names_value_and_range() {
        let err = RelayError::line_out_of_bounds(999, 50);
        let message = err.to_string();
        assert!(message.contains("999"));
        assert!(message.contains("out of bounds"));
        assert!(message.contains("1-50"));
    }

    #[test]
    fn test_project_not_found_includes_hint() {
        let err = RelayError::project_not_found("/a/B.java", Some("backend"));
        assert!(err.to_string().contains("'backend'"));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_retryable_classification() {
        assert!(RelayError::indexing_in_progress("demo").is_retryable());
        assert!(!RelayError::line_out_of_bounds(3, 2).is_retryable());
        assert!(!RelayError::capability("refused").is_retryable());
    }

    #[test]
    fn test_timeout_message() {
        let err = RelayError::timeout("Move", 30000);
        assert_eq!(err.to_string(), "Move timed out after 30000ms");
        assert_eq!(err.category(), "timeout");
    }
}

//! Language detection
//!
//! A file's language is decided from the declared language id supplied by the
//! document provider first, and from the file extension only when the declared
//! id matches nothing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages the router knows how to dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SupportedLanguage {
    /// Always available, handled natively
    Java,
    Kotlin,
    JavaScript,
    TypeScript,
    Python,
    Go,
    Rust,
    /// Never available, never dispatched
    Unknown,
}

impl SupportedLanguage {
    /// Every language, `Unknown` last
    pub const ALL: [SupportedLanguage; 8] = [
        SupportedLanguage::Java,
        SupportedLanguage::Kotlin,
        SupportedLanguage::JavaScript,
        SupportedLanguage::TypeScript,
        SupportedLanguage::Python,
        SupportedLanguage::Go,
        SupportedLanguage::Rust,
        SupportedLanguage::Unknown,
    ];

    /// Languages a request can be served for
    pub fn supported() -> impl Iterator<Item = SupportedLanguage> {
        Self::ALL
            .into_iter()
            .filter(|language| *language != SupportedLanguage::Unknown)
    }

    /// Detect the language from a declared language id and a file extension
    pub fn detect(declared_id: Option<&str>, extension: Option<&str>) -> Self {
        declared_id
            .and_then(|id| Self::from_declared_id(id, extension))
            .or_else(|| extension.and_then(Self::from_extension))
            .unwrap_or(SupportedLanguage::Unknown)
    }

    fn from_declared_id(id: &str, extension: Option<&str>) -> Option<Self> {
        let id = id.trim().to_lowercase();
        if id.is_empty() {
            return None;
        }

        if id.contains("kotlin") {
            return Some(SupportedLanguage::Kotlin);
        }
        if id == "java" {
            return Some(SupportedLanguage::Java);
        }
        if ["javascript", "ecmascript", "typescript", "jsx"]
            .iter()
            .any(|family| id.contains(family))
        {
            // mts/cts fall through to JavaScript here
            let typed = extension
                .map(|ext| matches!(ext.to_lowercase().as_str(), "ts" | "tsx"))
                .unwrap_or(false);
            return Some(if typed {
                SupportedLanguage::TypeScript
            } else {
                SupportedLanguage::JavaScript
            });
        }
        if id.contains("python") {
            return Some(SupportedLanguage::Python);
        }
        // Exact match only, "go" is a substring of too many ids
        if id == "go" {
            return Some(SupportedLanguage::Go);
        }
        if id.contains("rust") {
            return Some(SupportedLanguage::Rust);
        }
        None
    }

    fn from_extension(extension: &str) -> Option<Self> {
        let language = match extension.to_lowercase().as_str() {
            "java" => SupportedLanguage::Java,
            "kt" | "kts" => SupportedLanguage::Kotlin,
            "js" | "jsx" | "mjs" | "cjs" => SupportedLanguage::JavaScript,
            "ts" | "tsx" | "mts" | "cts" => SupportedLanguage::TypeScript,
            "py" | "pyw" | "pyi" => SupportedLanguage::Python,
            "go" => SupportedLanguage::Go,
            "rs" => SupportedLanguage::Rust,
            _ => return None,
        };
        Some(language)
    }

    /// Display name used in user-facing messages
    pub fn language_name(self) -> &'static str {
        match self {
            SupportedLanguage::Java => "Java",
            SupportedLanguage::Kotlin => "Kotlin",
            SupportedLanguage::JavaScript => "JavaScript",
            SupportedLanguage::TypeScript => "TypeScript",
            SupportedLanguage::Python => "Python",
            SupportedLanguage::Go => "Go",
            SupportedLanguage::Rust => "Rust",
            SupportedLanguage::Unknown => "Unknown",
        }
    }

    /// Lowercase key used in the `/status` availability map
    pub fn as_key(self) -> &'static str {
        match self {
            SupportedLanguage::Java => "java",
            SupportedLanguage::Kotlin => "kotlin",
            SupportedLanguage::JavaScript => "javascript",
            SupportedLanguage::TypeScript => "typescript",
            SupportedLanguage::Python => "python",
            SupportedLanguage::Go => "go",
            SupportedLanguage::Rust => "rust",
            SupportedLanguage::Unknown => "unknown",
        }
    }

    /// Comma-separated display names of every supported language
    pub fn supported_names() -> String {
        Self::supported()
            .map(|language| language.language_name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether the language is served without a backend
    pub fn is_native(self) -> bool {
        self == SupportedLanguage::Java
    }

    /// Whether source files of both languages can reference each other
    ///
    /// JVM languages share a classpath; JavaScript and TypeScript share a
    /// module graph.
    pub fn same_family(self, other: SupportedLanguage) -> bool {
        use SupportedLanguage::*;
        match (self, other) {
            (Unknown, _) | (_, Unknown) => false,
            (Java | Kotlin, Java | Kotlin) => true,
            (JavaScript | TypeScript, JavaScript | TypeScript) => true,
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.language_name())
    }
}

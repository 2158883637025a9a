//! Regex patterns for the Python backend

use once_cell::sync::Lazy;
use regex::Regex;

pub const LANGUAGE: &str = "Python";

pub const PROBE_ID: &str = "relay.lang.python";

/// Pattern for function definitions
///
/// Matches:
/// - `def process(data):`
/// - `async def fetch():`
pub static FUNCTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*(?:async\s+)?def\s+(?P<name>[a-zA-Z_][a-zA-Z0-9_]*)\s*\(")
        .expect("Valid Python function regex")
});

/// Pattern for class definitions
pub static CLASS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*class\s+(?P<name>[a-zA-Z_][a-zA-Z0-9_]*)")
        .expect("Valid Python class regex")
});

/// Pattern for module-level assignments (`MAX_RETRIES = 3`)
pub static VARIABLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>[a-zA-Z_][a-zA-Z0-9_]*)\s*(?::[^=]+)?=[^=]")
        .expect("Valid Python variable regex")
});

/// Declaration table, most specific first
pub fn declaration_patterns() -> [(&'static str, &'static Regex); 3] {
    [
        ("class", &*CLASS_PATTERN),
        ("function", &*FUNCTION_PATTERN),
        ("variable", &*VARIABLE_PATTERN),
    ]
}

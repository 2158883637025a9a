//! Regex patterns for the JavaScript/TypeScript backend

use once_cell::sync::Lazy;
use regex::Regex;

pub const BACKEND_NAME: &str = "JavaScript/TypeScript";

/// Shared by both languages
pub const PROBE_ID: &str = "relay.lang.javascript";

/// Pattern for function declarations
///
/// Matches:
/// - `function parse(input) {`
/// - `export default async function main() {`
/// - `export function* ids() {`
pub static FUNCTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+(?:default\s+)?)?(?:async\s+)?function\s*\*?\s*(?P<name>[A-Za-z_$][\w$]*)")
        .expect("Valid JS function regex")
});

/// Pattern for classes, interfaces, enums and type aliases
pub static CLASS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+(?:default\s+)?)?(?:declare\s+)?(?:abstract\s+)?(?P<kind>class|interface|enum|type)\s+(?P<name>[A-Za-z_$][\w$]*)")
        .expect("Valid JS class regex")
});

/// Pattern for top-level bindings, including arrow functions
pub static BINDING_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:export\s+)?(?:const|let|var)\s+(?P<name>[A-Za-z_$][\w$]*)")
        .expect("Valid JS binding regex")
});

/// Pattern for class methods
pub static METHOD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s+(?:(?:public|private|protected|static|async|readonly)\s+)*(?P<name>[A-Za-z_$][\w$]*)\s*\([^)]*\)\s*(?::\s*[^{]+)?\{\s*$")
        .expect("Valid JS method regex")
});

/// Control-flow keywords that look like method headers to `METHOD_PATTERN`
pub const CONTROL_KEYWORDS: &[&str] = &["if", "for", "while", "switch", "catch", "with", "function"];

/// Declaration table in match priority order
pub fn declaration_patterns() -> [(&'static str, &'static Regex); 4] {
    [
        ("function", &*FUNCTION_PATTERN),
        ("class", &*CLASS_PATTERN),
        ("variable", &*BINDING_PATTERN),
        ("method", &*METHOD_PATTERN),
    ]
}

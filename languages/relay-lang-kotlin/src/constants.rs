//! Regex patterns for the Kotlin backend

use once_cell::sync::Lazy;
use regex::Regex;

/// Display name used in refusals
pub const LANGUAGE: &str = "Kotlin";

/// Probe id registered with the backend inventory
pub const PROBE_ID: &str = "relay.lang.kotlin";

/// Pattern for top-level and member functions
///
/// Matches:
/// - `fun main()`
/// - `private suspend fun load(id: Int)`
/// - `fun String.shout()` (extension functions, captures `shout`)
pub static FUNCTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:(?:public|private|internal|protected|override|open|suspend|inline|operator|infix|tailrec)\s+)*fun\s+(?:<[^>]*>\s*)?(?:[\w.]+\.)?(?P<name>[A-Za-z_]\w*)\s*\(",
    )
    .expect("Valid Kotlin function regex")
});

/// Pattern for top-level properties
pub static PROPERTY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:public|private|internal|const|lateinit)\s+)*(?:val|var)\s+(?P<name>[A-Za-z_]\w*)")
        .expect("Valid Kotlin property regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_pattern() {
        let caps = FUNCTION_PATTERN.captures("    private suspend fun load(id: Int) {").unwrap();
        assert_eq!(&caps["name"], "load");
        let caps = FUNCTION_PATTERN.captures("fun String.shout() = uppercase()").unwrap();
        assert_eq!(&caps["name"], "shout");
    }

    #[test]
    fn test_property_pattern() {
        let caps = PROPERTY_PATTERN.captures("const val MAX = 3").unwrap();
        assert_eq!(&caps["name"], "MAX");
        assert!(PROPERTY_PATTERN.captures("    val local = 1").is_none());
    }
}

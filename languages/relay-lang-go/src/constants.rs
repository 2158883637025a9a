//! Regex patterns for the Go backend

use once_cell::sync::Lazy;
use regex::Regex;

pub const LANGUAGE: &str = "Go";

pub const PROBE_ID: &str = "relay.lang.go";

/// Pattern for functions and methods
///
/// Matches:
/// - `func Parse(input string) error`
/// - `func (s *Server) Start() {` (captures `Start`)
pub static FUNC_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^func\s+(?:\([^)]*\)\s*)?(?P<name>[A-Za-z_]\w*)")
        .expect("Valid Go func regex")
});

/// Pattern for type declarations
pub static TYPE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^type\s+(?P<name>[A-Za-z_]\w*)").expect("Valid Go type regex")
});

/// Pattern for package-level `var` and `const` declarations
pub static VALUE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:var|const)\s+(?P<name>[A-Za-z_]\w*)").expect("Valid Go value regex")
});

/// Declaration table; Go declarations are always top-level
pub fn declaration_patterns() -> [(&'static str, &'static Regex); 3] {
    [
        ("type", &*TYPE_PATTERN),
        ("function", &*FUNC_PATTERN),
        ("variable", &*VALUE_PATTERN),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_receiver_is_skipped() {
        let caps = FUNC_PATTERN.captures("func (s *Server) Start() error {").unwrap();
        assert_eq!(&caps["name"], "Start");
        let caps = FUNC_PATTERN.captures("func main() {").unwrap();
        assert_eq!(&caps["name"], "main");
    }

    #[test]
    fn test_type_and_value_patterns() {
        assert_eq!(&TYPE_PATTERN.captures("type Server struct {").unwrap()["name"], "Server");
        assert_eq!(&VALUE_PATTERN.captures("const MaxConns = 10").unwrap()["name"], "MaxConns");
        assert!(VALUE_PATTERN.captures("var (").is_none());
    }
}

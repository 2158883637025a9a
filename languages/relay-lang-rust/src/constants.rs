//! Regex patterns for the Rust backend

use once_cell::sync::Lazy;
use regex::Regex;

pub const LANGUAGE: &str = "Rust";

pub const PROBE_ID: &str = "relay.lang.rust";

/// Optional visibility and qualifiers in front of an item keyword
const ITEM_PREFIX: &str = r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:(?:async|const|unsafe|extern\s+\x22[^\x22]*\x22)\s+)*";

/// Pattern for functions
///
/// Matches:
/// - `fn main() {`
/// - `pub(crate) async fn load(path: &Path)`
/// - `    pub unsafe fn raw(&self)`
pub static FN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{}fn\s+(?P<name>[A-Za-z_]\w*)", ITEM_PREFIX))
        .expect("Valid Rust fn regex")
});

/// Pattern for structs, enums, unions and type aliases
pub static TYPE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:struct|enum|union|type)\s+(?P<name>[A-Za-z_]\w*)")
        .expect("Valid Rust type regex")
});

/// Pattern for traits
pub static TRAIT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:unsafe\s+)?trait\s+(?P<name>[A-Za-z_]\w*)")
        .expect("Valid Rust trait regex")
});

/// Pattern for inline and file modules
pub static MOD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:pub(?:\([^)]*\))?\s+)?mod\s+(?P<name>[A-Za-z_]\w*)")
        .expect("Valid Rust mod regex")
});

/// Pattern for `const` and `static` items
pub static VALUE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:const|static(?:\s+mut)?)\s+(?P<name>[A-Za-z_]\w*)\s*:")
        .expect("Valid Rust const regex")
});

/// Declaration table in match priority order
pub fn declaration_patterns() -> [(&'static str, &'static Regex); 5] {
    [
        ("function", &*FN_PATTERN),
        ("type", &*TYPE_PATTERN),
        ("trait", &*TRAIT_PATTERN),
        ("module", &*MOD_PATTERN),
        ("constant", &*VALUE_PATTERN),
    ]
}

//! Identifier-level scanning shared by the lexical engine and the backends

use relay_plugin_api::SupportedLanguage;

pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Byte range of the identifier touching `offset`
///
/// A caret placed right after an identifier still selects it.
pub fn identifier_at(text: &str, offset: usize) -> Option<(usize, usize)> {
    if offset > text.len() || !text.is_char_boundary(offset) {
        return None;
    }

    let after = text[offset..].chars().next().filter(|c| is_identifier_char(*c));
    let before = text[..offset].chars().next_back().filter(|c| is_identifier_char(*c));
    if after.is_none() && before.is_none() {
        return None;
    }

    let start = text[..offset]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_identifier_char(*c))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(offset);
    let end = text[offset..]
        .char_indices()
        .find(|(_, c)| !is_identifier_char(*c))
        .map(|(i, _)| offset + i)
        .unwrap_or(text.len());

    Some((start, end))
}

/// Whether `name` is syntactically an identifier and not a reserved word
pub fn is_valid_identifier(name: &str, language: SupportedLanguage) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    is_identifier_start(first)
        && chars.all(is_identifier_char)
        && !keywords(language).contains(&name)
}

/// Whether the word is made only of digits, i.e. a numeric literal
pub fn is_numeric_literal(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Byte offsets of every whole-word occurrence of `word`
pub fn word_occurrences(text: &str, word: &str) -> Vec<usize> {
    if word.is_empty() {
        return Vec::new();
    }
    text.match_indices(word)
        .filter(|(start, _)| {
            let end = start + word.len();
            let before_ok = text[..*start]
                .chars()
                .next_back()
                .map_or(true, |c| !is_identifier_char(c));
            let after_ok = text[end..]
                .chars()
                .next()
                .map_or(true, |c| !is_identifier_char(c));
            before_ok && after_ok
        })
        .map(|(start, _)| start)
        .collect()
}

/// Replace every whole-word occurrence of `from` with `to`
pub fn replace_word(text: &str, from: &str, to: &str) -> (String, usize) {
    let occurrences = word_occurrences(text, from);
    if occurrences.is_empty() {
        return (text.to_string(), 0);
    }
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for start in &occurrences {
        result.push_str(&text[last..*start]);
        result.push_str(to);
        last = start + from.len();
    }
    result.push_str(&text[last..]);
    (result, occurrences.len())
}

/// The word right before `offset`, skipping whitespace
pub fn previous_word(text: &str, offset: usize) -> Option<&str> {
    let head = text.get(..offset)?.trim_end();
    let start = head
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_identifier_char(*c))
        .last()
        .map(|(i, _)| i)?;
    Some(&head[start..])
}

/// Keywords introducing a declaration, mapped to the declared kind
pub fn declaration_kind(keyword: &str) -> Option<&'static str> {
    let kind = match keyword {
        "class" | "record" | "struct" => "class",
        "interface" | "trait" => "interface",
        "enum" => "enum",
        "object" => "object",
        "fun" | "fn" | "def" | "func" | "function" => "function",
        "val" | "var" | "let" | "const" | "static" => "variable",
        "mod" | "package" | "module" | "namespace" => "module",
        "type" => "class",
        _ => return None,
    };
    Some(kind)
}

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while", "true", "false", "null", "var", "record",
];

const KOTLIN_KEYWORDS: &[&str] = &[
    "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in",
    "interface", "is", "null", "object", "package", "return", "super", "this", "throw", "true",
    "try", "typealias", "typeof", "val", "var", "when", "while", "import", "private", "public",
    "internal", "protected", "override", "open", "data", "sealed", "companion",
];

const JAVASCRIPT_KEYWORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "export", "extends", "false", "finally", "for", "function", "if",
    "import", "in", "instanceof", "let", "new", "null", "return", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield", "interface",
    "type", "enum", "implements", "private", "public", "protected", "readonly", "undefined",
];

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield", "self",
];

const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var", "nil", "true", "false",
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while",
];

/// Reserved words of a language
pub fn keywords(language: SupportedLanguage) -> &'static [&'static str] {
    match language {
        SupportedLanguage::Java => JAVA_KEYWORDS,
        SupportedLanguage::Kotlin => KOTLIN_KEYWORDS,
        SupportedLanguage::JavaScript | SupportedLanguage::TypeScript => JAVASCRIPT_KEYWORDS,
        SupportedLanguage::Python => PYTHON_KEYWORDS,
        SupportedLanguage::Go => GO_KEYWORDS,
        SupportedLanguage::Rust => RUST_KEYWORDS,
        SupportedLanguage::Unknown => &[],
    }
}

/// Whether a line is a comment line (`//`, `/*`, `*`, `#`)
pub fn is_comment_line(line: &str, language: SupportedLanguage) -> bool {
    let trimmed = line.trim_start();
    match language {
        SupportedLanguage::Python => trimmed.starts_with('#'),
        _ => {
            trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*')
        }
    }
}

//! Regex-driven declaration scanning
//!
//! Backends describe their languages with a table of `(kind, pattern)` pairs.
//! Each pattern must capture the declared name in a group called `name`.

use regex::Regex;

/// A declaration found by a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: &'static str,
    pub name: String,
    /// 1-based line
    pub line: usize,
    /// Leading whitespace width; zero for top-level declarations
    pub indent: usize,
}

/// Scan every line for declarations
pub fn scan_declarations(text: &str, patterns: &[(&'static str, &Regex)]) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        for (kind, pattern) in patterns {
            if let Some(name) = pattern.captures(line).and_then(|caps| caps.name("name")) {
                declarations.push(Declaration {
                    kind,
                    name: name.as_str().to_string(),
                    line: idx + 1,
                    indent: line.len() - line.trim_start().len(),
                });
                break;
            }
        }
    }
    declarations
}

/// The declaration a caret on `line` refers to
///
/// A declaration on the line itself wins; otherwise the closest top-level
/// declaration above the line is taken as the enclosing item.
pub fn declaration_at(declarations: &[Declaration], line: usize) -> Option<&Declaration> {
    declarations
        .iter()
        .find(|declaration| declaration.line == line)
        .or_else(|| {
            declarations
                .iter()
                .filter(|declaration| declaration.line < line && declaration.indent == 0)
                .last()
        })
}

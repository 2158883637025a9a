//! Native Java refactorings
//!
//! Java is always available and never routed through the dispatch table.
//! Moves relocate the file declaring a top-level type; extraction turns
//! complete statements into a private method of the enclosing class.

use once_cell::sync::Lazy;
use regex::Regex;
use relay_foundation::paths::display_path;
use relay_foundation::{CancellationFlag, LineIndex, RefactoringOutcome, RelayError, RelayResult};
use relay_handler_api::{apply_edits, Document, ProjectHandle, TextEdit};
use relay_lang_common::jvm::{self, TypeMove};
use relay_lang_common::lexical::{is_valid_identifier, word_occurrences};
use relay_plugin_api::{StatementRange, SupportedLanguage};
use tracing::{debug, info};

/// Pattern for method and constructor headers opening a body
///
/// Matches:
/// - `public static void main(String[] args) {`
/// - `private List<String> names(int limit) throws IOException {`
static METHOD_HEADER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<mods>(?:(?:public|protected|private|static|final|synchronized|abstract|native)\s+)*)(?:<[^>]+>\s+)?(?P<ret>[\w<>\[\],.? ]+?)\s+(?P<name>[A-Za-z_]\w*)\s*\((?P<params>[^)]*)\)\s*(?:throws\s+[\w.,\s]+)?\{$",
    )
    .expect("Valid method header regex")
});

/// Pattern for a local variable declaration statement
static LOCAL_DECLARATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:final\s+)?(?P<type>[A-Za-z_][\w.]*(?:<[^;=()]*>)?(?:\[\])*)\s+(?P<name>[A-Za-z_]\w*)\s*(?:=|;)",
    )
    .expect("Valid local declaration regex")
});

const NOT_A_TYPE: &[&str] = &["return", "new", "throw", "else", "case", "yield"];
const CONTROL_KEYWORDS: &[&str] = &["if", "for", "while", "switch", "catch", "synchronized"];

// ============================================================================
// Move
// ============================================================================

/// A Java move request after coordinate resolution
pub struct JavaMove<'a> {
    pub project: &'a ProjectHandle,
    pub document: &'a Document,
    pub line: usize,
    pub column: usize,
    pub target_package: &'a str,
    pub search_in_comments: bool,
    pub search_in_non_java_files: bool,
    pub cancel: &'a CancellationFlag,
}

/// Move the top-level type enclosing the coordinate to another package
pub async fn move_type(request: JavaMove<'_>) -> RelayResult<RefactoringOutcome> {
    let document = request.document;
    let Some(ty) = jvm::type_at_line(&document.text, request.line) else {
        let relative = document
            .path
            .strip_prefix(&request.project.root)
            .unwrap_or(&document.path);
        return Err(RelayError::not_found(format!(
            "No movable element found at line {}, column {} in {}",
            request.line,
            request.column,
            display_path(relative)
        )));
    };

    let project_root = request.project.root.clone();
    let file = document.path.clone();
    let text = document.text.clone();
    let name = ty.name.clone();
    let target = request.target_package.to_string();
    let (in_comments, in_non_java) = (request.search_in_comments, request.search_in_non_java_files);
    let cancel = request.cancel.clone();

    let result = tokio::task::spawn_blocking(move || {
        jvm::move_top_level_type(&TypeMove {
            project_root: &project_root,
            file: &file,
            text: &text,
            type_name: &name,
            type_kind: ty.kind,
            target_package: &target,
            search_in_comments: in_comments,
            search_in_non_code_files: in_non_java,
            cancel: &cancel,
        })
    })
    .await
    .map_err(|e| RelayError::engine(format!("Move failed: {}", e)))??;

    Ok(RefactoringOutcome::success(
        result.message(ty.kind, &ty.name, request.target_package),
        result.affected_files,
    ))
}

// ============================================================================
// Extract method
// ============================================================================

/// Result of extracting statements from a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    /// Parameters of the new method, `Type name`
    pub parameters: Vec<String>,
}

struct EnclosingMethod {
    header_line: usize,
    indent: String,
    is_static: bool,
    params: String,
    closing_line: usize,
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

fn enclosing_method(text: &str, index: &LineIndex, range: &StatementRange) -> RelayResult<EnclosingMethod> {
    let body_indent = index
        .line_text(text, range.first_line)
        .map(|line| leading_whitespace(line).len())
        .unwrap_or(0);

    let not_in_method = || RelayError::capability("Selected statements are not inside a method body");

    let (header_line, caps) = (1..range.first_line)
        .rev()
        .filter_map(|line| Some((line, index.line_text(text, line)?)))
        .filter(|(_, raw)| leading_whitespace(raw).len() < body_indent)
        .find_map(|(line, raw)| {
            let caps = METHOD_HEADER_PATTERN.captures(raw.trim())?;
            let ret = caps.name("ret")?.as_str().trim();
            let name = caps.name("name")?.as_str();
            if CONTROL_KEYWORDS.contains(&name) || NOT_A_TYPE.iter().any(|k| ret.starts_with(k)) {
                return None;
            }
            Some((line, caps))
        })
        .ok_or_else(not_in_method)?;

    let header = index.line_text(text, header_line).unwrap_or_default();
    let indent = leading_whitespace(header).to_string();
    let is_static = caps
        .name("mods")
        .is_some_and(|mods| mods.as_str().split_whitespace().any(|m| m == "static"));
    let params = caps.name("params").map(|p| p.as_str().to_string()).unwrap_or_default();

    let closing_line = (range.last_line + 1..=index.line_count())
        .find(|line| {
            index.line_text(text, *line).is_some_and(|raw| {
                leading_whitespace(raw) == indent && raw.trim_start().starts_with('}')
            })
        })
        .ok_or_else(not_in_method)?;

    Ok(EnclosingMethod {
        header_line,
        indent,
        is_static,
        params,
        closing_line,
    })
}

/// Split a parameter list on top-level commas
fn split_parameters(params: &str) -> Vec<(String, String)> {
    let mut parts = Vec::new();
    let mut depth = 0;
    let mut current = String::new();
    for c in params.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    parts.push(current);

    parts
        .iter()
        .filter_map(|part| {
            let part = part.trim().trim_start_matches("final ").trim();
            let (ty, name) = part.rsplit_once(char::is_whitespace)?;
            Some((ty.trim().to_string(), name.trim().to_string()))
        })
        .collect()
}

fn local_declarations(text: &str, index: &LineIndex, lines: std::ops::Range<usize>) -> Vec<(String, String)> {
    lines
        .filter_map(|line| index.line_text(text, line))
        .filter_map(|raw| {
            let caps = LOCAL_DECLARATION_PATTERN.captures(raw.trim())?;
            let ty = caps.name("type")?.as_str();
            if NOT_A_TYPE.contains(&ty) {
                return None;
            }
            Some((ty.to_string(), caps.name("name")?.as_str().to_string()))
        })
        .collect()
}

/// Extract the statements in `range` into `method_name`
///
/// Variables declared before the selection and read inside it become
/// parameters. Selections containing `return`, or declaring variables read
/// after the selection, are refused.
pub fn extract_method(
    document: &Document,
    range: &StatementRange,
    method_name: &str,
) -> RelayResult<Extraction> {
    if !is_valid_identifier(method_name, SupportedLanguage::Java) {
        return Err(RelayError::invalid_field(
            "methodName",
            format!("'{}' is not a valid method name", method_name),
        ));
    }

    let text = &document.text;
    let index = &document.index;
    let method = enclosing_method(text, index, range)?;
    let selected = &text[range.start.value()..range.end.value()];

    if !word_occurrences(selected, "return").is_empty() {
        return Err(RelayError::capability(
            "Cannot extract statements containing a return statement",
        ));
    }

    let method_end = index.line_start(method.closing_line).unwrap_or(text.len());
    let after = &text[range.end.value()..method_end];
    let selection_lines = range.first_line..range.last_line + 1;
    if let Some((_, name)) = local_declarations(text, index, selection_lines)
        .into_iter()
        .find(|(_, name)| !word_occurrences(after, name).is_empty())
    {
        return Err(RelayError::capability(format!(
            "Cannot extract: variable '{}' is used after the selected statements",
            name
        )));
    }

    let mut candidates = split_parameters(&method.params);
    candidates.extend(local_declarations(text, index, method.header_line + 1..range.first_line));
    let mut parameters: Vec<(String, String)> = Vec::new();
    for (ty, name) in candidates.into_iter().rev() {
        let used = !word_occurrences(selected, &name).is_empty();
        if used && !parameters.iter().any(|(_, seen)| *seen == name) {
            parameters.push((ty, name));
        }
    }
    parameters.reverse();

    let unit = if method.indent.contains('\t') { "\t" } else { "    " };
    let body_indent = index
        .line_text(text, range.first_line)
        .map(leading_whitespace)
        .unwrap_or_default();
    let new_indent = format!("{}{}", method.indent, unit);
    let body: Vec<String> = selected
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            let content = if i == 0 {
                line
            } else {
                line.strip_prefix(body_indent).unwrap_or_else(|| line.trim_start())
            };
            if content.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", new_indent, content)
            }
        })
        .collect();

    let declared: Vec<String> = parameters.iter().map(|(ty, name)| format!("{} {}", ty, name)).collect();
    let arguments: Vec<&str> = parameters.iter().map(|(_, name)| name.as_str()).collect();
    let new_method = format!(
        "\n\n{indent}private {modifier}void {name}({params}) {{\n{body}\n{indent}}}",
        indent = method.indent,
        modifier = if method.is_static { "static " } else { "" },
        name = method_name,
        params = declared.join(", "),
        body = body.join("\n"),
    );
    let call = format!("{}({});", method_name, arguments.join(", "));

    let insert_at = index.line_end(method.closing_line).unwrap_or(text.len());
    let edits = vec![
        TextEdit::new(range.start.value(), range.end.value(), call),
        TextEdit::new(insert_at, insert_at, new_method),
    ];
    let extracted = apply_edits(text, &edits)?;

    debug!(
        method = method_name,
        parameters = declared.len(),
        statements = range.statement_count,
        "Extracted statements"
    );
    info!(method = method_name, file = %display_path(&document.path), "Java method extracted");
    Ok(Extraction {
        text: extracted,
        parameters: declared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use relay_foundation::resolve_range;
    use relay_lang_common::statements_in_range;

    const SOURCE: &str = "class Demo {\n    void run(int limit) {\n        int a = 1;\n        int b = a + limit;\n        if (b > 2) {\n            log(\"}\");\n        }\n    }\n}\n";

    fn statements(document: &Document, sl: usize, sc: usize, el: usize, ec: usize) -> StatementRange {
        let (start, end) = resolve_range(&document.text, &document.index, sl, sc, el, ec).unwrap();
        statements_in_range(&document.text, &document.index, SupportedLanguage::Java, start, end).unwrap()
    }

    #[test]
    fn test_extract_with_parameters() {
        let document = Document::new("/w/Demo.java", SOURCE, None);
        let range = statements(&document, 4, 1, 7, 10);

        let extraction = extract_method(&document, &range, "check").unwrap();
        assert_eq!(extraction.parameters, vec!["int limit", "int a"]);
        assert_eq!(
            extraction.text,
            "class Demo {\n    void run(int limit) {\n        int a = 1;\n        check(limit, a);\n    }\n\n    private void check(int limit, int a) {\n        int b = a + limit;\n        if (b > 2) {\n            log(\"}\");\n        }\n    }\n}\n"
        );
    }

    #[test]
    fn test_static_context_is_preserved() {
        let source = "class App {\n    public static void main(String[] args) {\n        System.out.println(args.length);\n    }\n}\n";
        let document = Document::new("/w/App.java", source, None);
        let range = statements(&document, 3, 1, 3, 41);

        let extraction = extract_method(&document, &range, "report").unwrap();
        assert!(extraction
            .text
            .contains("    private static void report(String[] args) {\n        System.out.println(args.length);\n    }"));
        assert!(extraction.text.contains("        report(args);\n"));
    }

    #[test]
    fn test_variable_used_afterwards_is_refused() {
        let document = Document::new("/w/Demo.java", SOURCE, None);
        let range = statements(&document, 3, 1, 4, 27);

        let err = extract_method(&document, &range, "compute").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot extract: variable 'b' is used after the selected statements"
        );
    }

    #[test]
    fn test_invalid_method_name() {
        let document = Document::new("/w/Demo.java", SOURCE, None);
        let range = statements(&document, 3, 1, 3, 19);
        let err = extract_method(&document, &range, "int").unwrap_err();
        assert_eq!(err.to_string(), "'int' is not a valid method name");
    }
}

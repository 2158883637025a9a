//! Statement grouping for extract-method
//!
//! A statement is one or more complete lines whose brackets balance. A line
//! belongs to the selection only when its non-whitespace content lies
//! entirely inside `[start, end]`; partially selected lines are dropped.

use relay_foundation::{LineIndex, RelayError, RelayResult, ResolvedOffset};
use relay_plugin_api::{StatementRange, SupportedLanguage};

use crate::lexical::is_comment_line;

/// Complete statements inside a resolved range
pub fn statements_in_range(
    text: &str,
    index: &LineIndex,
    language: SupportedLanguage,
    start: ResolvedOffset,
    end: ResolvedOffset,
) -> RelayResult<StatementRange> {
    let (first_line, _) = index.position_of(text, start.value());
    let (last_line, _) = index.position_of(text, end.value());

    let mut depth: i64 = 0;
    let mut statement_count = 0;
    let mut span: Option<(usize, usize, usize, usize)> = None;

    for line in first_line..=last_line.max(first_line) {
        let (Some(line_start), Some(raw)) = (index.line_start(line), index.line_text(text, line))
        else {
            continue;
        };
        let content = raw.trim();
        if content.is_empty() || is_comment_line(content, language) {
            continue;
        }

        let content_start = line_start + (raw.len() - raw.trim_start().len());
        let content_end = line_start + raw.trim_end().len();
        if content_start < start.value() || content_end > end.value() {
            continue;
        }

        depth += bracket_delta(content, language);
        if depth < 0 {
            return Err(incomplete());
        }
        if depth == 0 {
            statement_count += 1;
        }

        span = Some(match span {
            None => (content_start, content_end, line, line),
            Some((s, _, first, _)) => (s, content_end, first, line),
        });
    }

    let Some((span_start, span_end, first, last)) = span else {
        return Err(RelayError::validation(
            "No statements found in the specified range",
        ));
    };
    if depth != 0 {
        return Err(incomplete());
    }

    Ok(StatementRange {
        start: ResolvedOffset::new(span_start),
        end: ResolvedOffset::new(span_end),
        first_line: first,
        last_line: last,
        statement_count,
    })
}

fn incomplete() -> RelayError {
    RelayError::validation("Selected range does not contain complete statements")
}

/// Net bracket depth change of one line, ignoring string literals and
/// trailing line comments
fn bracket_delta(line: &str, language: SupportedLanguage) -> i64 {
    let comment_marker = match language {
        SupportedLanguage::Python => "#",
        _ => "//",
    };

    let mut delta = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut rest = line;

    while let Some(c) = rest.chars().next() {
        if quote.is_none() && rest.starts_with(comment_marker) {
            break;
        }
        rest = &rest[c.len_utf8()..];

        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            // Rust lifetimes would open a char literal that never closes
            '\'' if language == SupportedLanguage::Rust => {}
            '"' | '\'' | '`' => quote = Some(c),
            '(' | '{' | '[' => delta += 1,
            ')' | '}' | ']' => delta -= 1,
            _ => {}
        }
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_foundation::resolve_range;

    const SOURCE: &str = "class Demo {\n    void run() {\n        int a = 1;\n        int b = a + 2;\n        if (b > 2) {\n            log(\"}\");\n        }\n    }\n}\n";

    fn range(text: &str, sl: usize, sc: usize, el: usize, ec: usize) -> RelayResult<StatementRange> {
        let index = LineIndex::new(text);
        let (start, end) = resolve_range(text, &index, sl, sc, el, ec)?;
        statements_in_range(text, &index, SupportedLanguage::Java, start, end)
    }

    #[test]
    fn test_groups_complete_lines() {
        let range = range(SOURCE, 3, 1, 4, 23).unwrap();
        assert_eq!(range.first_line, 3);
        assert_eq!(range.last_line, 4);
        assert_eq!(range.statement_count, 2);
        assert_eq!(&SOURCE[range.start.value()..range.end.value()], "int a = 1;\n        int b = a + 2;");
    }

    #[test]
    fn test_block_counts_as_one_statement() {
        let range = range(SOURCE, 5, 1, 7, 10).unwrap();
        assert_eq!(range.statement_count, 1);
        assert_eq!(range.last_line, 7);
    }

    #[test]
    fn test_partial_line_is_dropped() {
        // Selection starts in the middle of line 3
        let range = range(SOURCE, 3, 14, 4, 23).unwrap();
        assert_eq!(range.first_line, 4);
        assert_eq!(range.statement_count, 1);
    }

    #[test]
    fn test_empty_selection_has_no_statements() {
        let err = range(SOURCE, 3, 9, 3, 9).unwrap_err();
        assert_eq!(err.to_string(), "No statements found in the specified range");
    }

    #[test]
    fn test_reversed_columns_on_one_line_find_nothing() {
        let err = range(SOURCE, 3, 19, 3, 9).unwrap_err();
        assert_eq!(err.to_string(), "No statements found in the specified range");
    }

    #[test]
    fn test_unbalanced_selection_is_rejected() {
        let err = range(SOURCE, 5, 1, 6, 22).unwrap_err();
        assert_eq!(err.to_string(), "Selected range does not contain complete statements");
    }

    #[test]
    fn test_python_lines() {
        let text = "def run():\n    total = compute(1,\n                    2)\n    print(total)\n";
        let index = LineIndex::new(text);
        let (start, end) = resolve_range(text, &index, 2, 1, 4, 17).unwrap();
        let range = statements_in_range(text, &index, SupportedLanguage::Python, start, end).unwrap();
        assert_eq!(range.statement_count, 2);
    }
}

//! Identify-but-refuse outcomes
//!
//! Backends that cannot perform a mutation still locate the target and say
//! what they found, so the caller can finish the change by hand.

use crate::declarations::Declaration;
use relay_foundation::RefactoringOutcome;
use relay_plugin_api::{BackendContext, BackendRequest};
use tracing::debug;

/// Wording a backend uses in its refusals
#[derive(Debug, Clone, Copy)]
pub struct RefusalStyle {
    /// Display name of the backend's language
    pub language: &'static str,
    /// What a move target is called (`package`, `module`, ...)
    pub container_noun: &'static str,
    /// What an extracted body becomes (`function`, `method`)
    pub callable_noun: &'static str,
    pub move_hint: &'static str,
    pub extract_hint: &'static str,
}

/// Refuse a move after locating the element
pub fn refuse_move(
    style: &RefusalStyle,
    ctx: &BackendContext,
    declaration: Option<&Declaration>,
) -> RefactoringOutcome {
    let BackendRequest::Move {
        line,
        column,
        target_package,
        ..
    } = &ctx.request
    else {
        return RefactoringOutcome::failure("Backend received a request for another operation");
    };

    let Some(declaration) = declaration else {
        return RefactoringOutcome::failure(format!(
            "No movable element found at line {}, column {} in {}",
            line,
            column,
            ctx.relative_file()
        ));
    };

    debug!(
        language = style.language,
        kind = declaration.kind,
        name = %declaration.name,
        "Refusing move"
    );
    RefactoringOutcome::failure(format!(
        "Found {} '{}' at {}:{}. Moving it to {} '{}' is not supported by the {} backend; {}",
        declaration.kind,
        declaration.name,
        ctx.relative_file(),
        declaration.line,
        style.container_noun,
        target_package,
        style.language,
        style.move_hint
    ))
}

/// Refuse an extraction after locating the statements
pub fn refuse_extract(style: &RefusalStyle, ctx: &BackendContext) -> RefactoringOutcome {
    let BackendRequest::ExtractMethod { range, method_name } = &ctx.request else {
        return RefactoringOutcome::failure("Backend received a request for another operation");
    };

    debug!(language = style.language, statements = range.statement_count, "Refusing extraction");
    let lines = if range.first_line == range.last_line {
        range.first_line.to_string()
    } else {
        format!("{}-{}", range.first_line, range.last_line)
    };
    RefactoringOutcome::failure(format!(
        "Found {} statement(s) at {}:{}. Extracting them into {} '{}' is not supported by the {} backend; {}",
        range.statement_count,
        ctx.relative_file(),
        lines,
        style.callable_noun,
        method_name,
        style.language,
        style.extract_hint
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_foundation::ResolvedOffset;
    use relay_plugin_api::{StatementRange, SupportedLanguage};
    use std::path::PathBuf;

    const STYLE: RefusalStyle = RefusalStyle {
        language: "Python",
        container_noun: "module",
        callable_noun: "function",
        move_hint: "move it by hand and update its imports",
        extract_hint: "extract it by hand",
    };

    fn context(request: BackendRequest) -> BackendContext {
        BackendContext {
            cancel: Default::default(),
            language: SupportedLanguage::Python,
            project_name: "demo".to_string(),
            project_root: PathBuf::from("/work/demo"),
            file: PathBuf::from("/work/demo/pkg/util.py"),
            text: String::new(),
            request,
        }
    }

    #[test]
    fn test_move_refusal_names_kind_name_and_target() {
        let ctx = context(BackendRequest::Move {
            offset: ResolvedOffset::new(0),
            line: 3,
            column: 5,
            target_package: "app.core".to_string(),
            search_in_comments: false,
            search_in_non_code_files: false,
        });
        let declaration = Declaration {
            kind: "function",
            name: "parse".to_string(),
            line: 3,
            indent: 0,
        };

        let outcome = refuse_move(&STYLE, &ctx, Some(&declaration));
        assert!(!outcome.success);
        assert_eq!(
            outcome.message,
            "Found function 'parse' at pkg/util.py:3. Moving it to module 'app.core' is not supported by the Python backend; move it by hand and update its imports"
        );

        let missing = refuse_move(&STYLE, &ctx, None);
        assert_eq!(
            missing.message,
            "No movable element found at line 3, column 5 in pkg/util.py"
        );
    }

    #[test]
    fn test_extract_refusal_describes_statements() {
        let ctx = context(BackendRequest::ExtractMethod {
            range: StatementRange {
                start: ResolvedOffset::new(10),
                end: ResolvedOffset::new(40),
                first_line: 4,
                last_line: 6,
                statement_count: 2,
            },
            method_name: "helper".to_string(),
        });

        let outcome = refuse_extract(&STYLE, &ctx);
        assert!(!outcome.success);
        assert!(outcome.message.starts_with("Found 2 statement(s) at pkg/util.py:4-6."));
        assert!(outcome.message.contains("function 'helper'"));
    }
}

//! JavaScript and TypeScript refactorings: identify-but-refuse for both
//! operations

use crate::constants::{declaration_patterns, CONTROL_KEYWORDS, CLASS_PATTERN};
use async_trait::async_trait;
use relay_foundation::RefactoringOutcome;
use relay_lang_common::{
    declaration_at, refuse_extract, refuse_move, scan_declarations, Declaration, RefusalStyle,
};
use relay_plugin_api::{BackendContext, BackendRequest, RefactoringBackend};

const STYLE: RefusalStyle = RefusalStyle {
    language: "JavaScript",
    container_noun: "module",
    callable_noun: "function",
    move_hint: "move the declaration by hand and update its import statements",
    extract_hint: "extract the function by hand or with the TypeScript language service",
};

/// The style for the request's language, so refusals name TypeScript when
/// the file is TypeScript
fn style_for(ctx: &BackendContext) -> RefusalStyle {
    RefusalStyle {
        language: ctx.language.language_name(),
        ..STYLE
    }
}

/// Scan declarations, dropping control-flow false positives and refining
/// the kind of class-like declarations
fn declarations(text: &str) -> Vec<Declaration> {
    scan_declarations(text, &declaration_patterns())
        .into_iter()
        .filter(|declaration| !CONTROL_KEYWORDS.contains(&declaration.name.as_str()))
        .map(|mut declaration| {
            if declaration.kind == "class" {
                let line = text.lines().nth(declaration.line - 1).unwrap_or_default();
                declaration.kind = match CLASS_PATTERN.captures(line).map(|caps| caps["kind"].to_string()).as_deref() {
                    Some("interface") => "interface",
                    Some("enum") => "enum",
                    Some("type") => "type",
                    _ => "class",
                };
            }
            declaration
        })
        .collect()
}

pub struct JsMoveBackend;

#[async_trait]
impl RefactoringBackend for JsMoveBackend {
    async fn execute(&self, ctx: &BackendContext) -> RefactoringOutcome {
        let line = match &ctx.request {
            BackendRequest::Move { line, .. } => *line,
            _ => return RefactoringOutcome::failure("Backend received a request for another operation"),
        };
        let found = declarations(&ctx.text);
        refuse_move(&style_for(ctx), ctx, declaration_at(&found, line))
    }
}

pub struct JsExtractMethodBackend;

#[async_trait]
impl RefactoringBackend for JsExtractMethodBackend {
    async fn execute(&self, ctx: &BackendContext) -> RefactoringOutcome {
        refuse_extract(&style_for(ctx), ctx)
    }
}

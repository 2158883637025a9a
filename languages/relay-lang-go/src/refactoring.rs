//! Go refactorings: identify-but-refuse for both operations

use crate::constants::{declaration_patterns, LANGUAGE};
use async_trait::async_trait;
use relay_foundation::RefactoringOutcome;
use relay_lang_common::{declaration_at, refuse_extract, refuse_move, scan_declarations, RefusalStyle};
use relay_plugin_api::{BackendContext, BackendRequest, RefactoringBackend};

const STYLE: RefusalStyle = RefusalStyle {
    language: LANGUAGE,
    container_noun: "package",
    callable_noun: "function",
    move_hint: "move the declaration by hand, then fix the package clause and run goimports",
    extract_hint: "extract the function by hand or with gopls",
};

pub struct GoMoveBackend;

#[async_trait]
impl RefactoringBackend for GoMoveBackend {
    async fn execute(&self, ctx: &BackendContext) -> RefactoringOutcome {
        let line = match &ctx.request {
            BackendRequest::Move { line, .. } => *line,
            _ => return RefactoringOutcome::failure("Backend received a request for another operation"),
        };
        let declarations = scan_declarations(&ctx.text, &declaration_patterns());
        refuse_move(&STYLE, ctx, declaration_at(&declarations, line))
    }
}

pub struct GoExtractMethodBackend;

#[async_trait]
impl RefactoringBackend for GoExtractMethodBackend {
    async fn execute(&self, ctx: &BackendContext) -> RefactoringOutcome {
        refuse_extract(&STYLE, ctx)
    }
}

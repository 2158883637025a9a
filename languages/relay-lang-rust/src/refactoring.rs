//! Rust refactorings: identify-but-refuse for both operations

use crate::constants::{declaration_patterns, LANGUAGE};
use async_trait::async_trait;
use relay_foundation::RefactoringOutcome;
use relay_lang_common::{declaration_at, refuse_extract, refuse_move, scan_declarations, RefusalStyle};
use relay_plugin_api::{BackendContext, BackendRequest, RefactoringBackend};

const STYLE: RefusalStyle = RefusalStyle {
    language: LANGUAGE,
    container_noun: "module",
    callable_noun: "function",
    move_hint: "move the item by hand and update its `use` paths",
    extract_hint: "use rust-analyzer's Extract into function assist instead",
};

pub struct RustMoveBackend;

#[async_trait]
impl RefactoringBackend for RustMoveBackend {
    async fn execute(&self, ctx: &BackendContext) -> RefactoringOutcome {
        let line = match &ctx.request {
            BackendRequest::Move { line, .. } => *line,
            _ => return RefactoringOutcome::failure("Backend received a request for another operation"),
        };
        let declarations = scan_declarations(&ctx.text, &declaration_patterns());
        refuse_move(&STYLE, ctx, declaration_at(&declarations, line))
    }
}

pub struct RustExtractMethodBackend;

#[async_trait]
impl RefactoringBackend for RustExtractMethodBackend {
    async fn execute(&self, ctx: &BackendContext) -> RefactoringOutcome {
        refuse_extract(&STYLE, ctx)
    }
}

//! Kotlin refactorings
//!
//! Top-level classes, interfaces and objects are moved for real, the same way
//! the native Java path does it. Top-level functions and properties are
//! identified and refused; so is extract-method.

use crate::constants::{FUNCTION_PATTERN, LANGUAGE, PROPERTY_PATTERN};
use async_trait::async_trait;
use relay_foundation::RefactoringOutcome;
use relay_lang_common::jvm::{self, TypeMove};
use relay_lang_common::{declaration_at, refuse_extract, refuse_move, scan_declarations, RefusalStyle};
use relay_plugin_api::{BackendContext, BackendRequest, RefactoringBackend};
use tracing::{info, warn};

const STYLE: RefusalStyle = RefusalStyle {
    language: LANGUAGE,
    container_noun: "package",
    callable_noun: "function",
    move_hint: "only top-level classes, interfaces and objects can be moved; move the declaration by hand",
    extract_hint: "use the IDE's Extract Function refactoring instead",
};

/// Moves the file declaring a top-level type into another package
pub struct KotlinMoveBackend;

#[async_trait]
impl RefactoringBackend for KotlinMoveBackend {
    async fn execute(&self, ctx: &BackendContext) -> RefactoringOutcome {
        let BackendRequest::Move {
            line,
            target_package,
            search_in_comments,
            search_in_non_code_files,
            ..
        } = &ctx.request
        else {
            return RefactoringOutcome::failure("Backend received a request for another operation");
        };

        let Some(ty) = jvm::type_at_line(&ctx.text, *line) else {
            let declarations = scan_declarations(
                &ctx.text,
                &[("function", &*FUNCTION_PATTERN), ("property", &*PROPERTY_PATTERN)],
            );
            return refuse_move(&STYLE, ctx, declaration_at(&declarations, *line));
        };

        let project_root = ctx.project_root.clone();
        let file = ctx.file.clone();
        let text = ctx.text.clone();
        let name = ty.name.clone();
        let target = target_package.clone();
        let (in_comments, in_non_code) = (*search_in_comments, *search_in_non_code_files);
        let cancel = ctx.cancel.clone();

        let moved = tokio::task::spawn_blocking(move || {
            jvm::move_top_level_type(&TypeMove {
                project_root: &project_root,
                file: &file,
                text: &text,
                type_name: &name,
                type_kind: ty.kind,
                target_package: &target,
                search_in_comments: in_comments,
                search_in_non_code_files: in_non_code,
                cancel: &cancel,
            })
        })
        .await;

        match moved {
            Ok(Ok(result)) => {
                info!(name = %ty.name, target = %target_package, "Kotlin type moved");
                RefactoringOutcome::success(
                    result.message(ty.kind, &ty.name, target_package),
                    result.affected_files,
                )
            }
            Ok(Err(e)) => RefactoringOutcome::from(e),
            Err(e) => {
                warn!(error = %e, "Kotlin move task failed");
                RefactoringOutcome::failure(format!("Move failed: {}", e))
            }
        }
    }
}

/// Identifies the selected statements and refuses
pub struct KotlinExtractMethodBackend;

#[async_trait]
impl RefactoringBackend for KotlinExtractMethodBackend {
    async fn execute(&self, ctx: &BackendContext) -> RefactoringOutcome {
        refuse_extract(&STYLE, ctx)
    }
}

//! Validation pipeline tests
//!
//! These drive the handlers against mocked collaborators, so each test states
//! exactly which lookups a request may reach before it is answered.

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use relay_foundation::protocol::{
    ApplyFixRequest, ExtractMethodRequest, FindUsagesRequest, MoveRequest, RenameRequest,
};
use relay_foundation::{RefactoringOutcome, RelayError, ResolvedOffset, UsageRecord};
use relay_handler_api::{
    Diagnostic, Document, ProjectHandle, QuickFix, Severity, SymbolElement, SymbolKind, TextEdit,
};
use relay_handlers::{
    ApplyFixHandler, ExtractMethodHandler, FindUsagesHandler, MoveHandler, OperationHandler,
    RenameHandler, StatusHandler,
};
use relay_plugin_api::{
    BackendContext, BackendDispatchTable, BackendOperation, BackendRequest, CapabilityRegistry,
    RefactoringBackend, SupportedLanguage,
};
use relay_test_support::{MockCollaborators, StaticProbe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const ROOT: &str = "/work/demo";

fn project() -> ProjectHandle {
    ProjectHandle::new("demo", ROOT)
}

fn document(relative: &str, text: &str) -> Document {
    Document::new(PathBuf::from(ROOT).join(relative), text, None)
}

/// Project resolves, is idle, and `load` returns the given document
fn expect_target(mocks: &mut MockCollaborators, doc: Document) {
    mocks
        .projects
        .expect_resolve_project()
        .returning(|_, _| Ok(project()));
    mocks.projects.expect_is_indexing().returning(|_| false);
    mocks
        .documents
        .expect_load()
        .returning(move |_| Ok(doc.clone()));
}

fn fifty_lines() -> String {
    (1..=50).map(|i| format!("int v{} = {};\n", i, i)).collect()
}

fn rename_request(line: usize, column: usize, new_name: &str) -> RenameRequest {
    RenameRequest {
        file: "src/A.java".to_string(),
        line,
        column,
        new_name: new_name.to_string(),
        project: None,
    }
}

fn move_request(file: &str, line: usize, target: &str) -> MoveRequest {
    MoveRequest {
        file: file.to_string(),
        line,
        column: 1,
        target_package: target.to_string(),
        search_in_comments: false,
        search_in_non_java_files: false,
        project: None,
    }
}

fn greeter_element() -> SymbolElement {
    SymbolElement {
        name: "Greeter".to_string(),
        kind: SymbolKind::Class,
        file: PathBuf::from(ROOT).join("src/A.java"),
        offset: ResolvedOffset::new(13),
        line: 1,
        column: 14,
        renamable: true,
    }
}

/// Backend that records calls and answers with a fixed outcome
struct RecordingBackend {
    calls: Arc<AtomicUsize>,
    outcome: RefactoringOutcome,
    delay: Option<Duration>,
}

#[async_trait]
impl RefactoringBackend for RecordingBackend {
    async fn execute(&self, ctx: &BackendContext) -> RefactoringOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
            if let Err(e) = ctx.cancel.enter_commit() {
                return e.into();
            }
        }
        match &ctx.request {
            BackendRequest::Move { .. } | BackendRequest::ExtractMethod { .. } => {
                self.outcome.clone()
            }
        }
    }
}

fn table_with(
    language: SupportedLanguage,
    operation: BackendOperation,
    backend: RecordingBackend,
) -> BackendDispatchTable {
    let mut table = BackendDispatchTable::new();
    assert!(table.register(language, operation, Arc::new(backend)));
    table
}

// ============================================================================
// Status
// ============================================================================

#[tokio::test]
async fn test_status_with_no_projects() {
    let mut mocks = MockCollaborators::new();
    mocks.projects.expect_open_projects().returning(Vec::new);
    let context = mocks.into_context();

    let response = StatusHandler::new().handle(&context, ()).await;
    assert!(response.ok);
    assert_eq!(response.ide_type, "Relay");
    assert!(response.open_projects.is_empty());
    assert!(!response.indexing_in_progress);
    assert_eq!(response.language_plugins.get("java"), Some(&true));
    assert_eq!(response.language_plugins.get("kotlin"), Some(&false));
}

#[tokio::test]
async fn test_status_skips_disposed_projects() {
    let mut mocks = MockCollaborators::new();
    mocks.projects.expect_open_projects().returning(|| {
        let mut closed = ProjectHandle::new("old", "/work/old");
        closed.disposed = true;
        vec![project(), closed]
    });
    mocks
        .projects
        .expect_is_indexing()
        .withf(|name| name == "demo")
        .returning(|_| true);
    let context = mocks.into_context_with(
        CapabilityRegistry::with_probe(Arc::new(StaticProbe::with(&["relay.lang.go"]))),
        BackendDispatchTable::new(),
    );

    let response = StatusHandler::new().handle(&context, ()).await;
    assert_eq!(response.open_projects.len(), 1);
    assert_eq!(response.open_projects[0].name, "demo");
    assert_eq!(response.open_projects[0].path, "/work/demo");
    assert!(response.indexing_in_progress);
    assert_eq!(response.language_plugins.get("go"), Some(&true));
}

// ============================================================================
// Rename
// ============================================================================

#[tokio::test]
async fn test_rename_blank_name_fails_before_any_lookup() {
    let mut mocks = MockCollaborators::new();
    mocks.projects.expect_resolve_project().times(0);
    mocks.symbols.expect_element_at().times(0);
    let context = mocks.into_context();

    let response = RenameHandler::new()
        .handle(&context, rename_request(1, 1, "   "))
        .await;
    assert!(!response.success);
    assert_eq!(response.message, "New name cannot be empty");
    assert_eq!(response.affected_files, None);
}

#[tokio::test]
async fn test_rename_line_out_of_bounds() {
    let mut mocks = MockCollaborators::new();
    expect_target(&mut mocks, document("src/A.java", &fifty_lines()));
    mocks.symbols.expect_element_at().times(0);
    let context = mocks.into_context();

    let response = RenameHandler::new()
        .handle(&context, rename_request(999, 1, "fresh"))
        .await;
    assert!(!response.success);
    assert!(response.message.contains("999"));
    assert!(response.message.contains("out of bounds"));
    assert!(response.message.contains("1-50"));
}

#[tokio::test]
async fn test_rename_column_out_of_bounds() {
    let mut mocks = MockCollaborators::new();
    expect_target(&mut mocks, document("src/A.java", "int a = 1;\n"));
    let context = mocks.into_context();

    let response = RenameHandler::new()
        .handle(&context, rename_request(1, 12, "fresh"))
        .await;
    assert_eq!(
        response.message,
        "Column 12 is out of bounds for line 1 (valid range: 1-11)"
    );
}

#[tokio::test]
async fn test_rename_while_indexing_is_refused() {
    let mut mocks = MockCollaborators::new();
    mocks
        .projects
        .expect_resolve_project()
        .returning(|_, _| Ok(project()));
    mocks.projects.expect_is_indexing().returning(|_| true);
    mocks.documents.expect_load().times(0);
    let context = mocks.into_context();

    let response = RenameHandler::new()
        .handle(&context, rename_request(1, 1, "fresh"))
        .await;
    assert_eq!(
        response.message,
        "Project 'demo' is currently indexing. Please retry after indexing completes."
    );
}

#[tokio::test]
async fn test_rename_unknown_project_hint() {
    let mut mocks = MockCollaborators::new();
    mocks
        .projects
        .expect_resolve_project()
        .returning(|file, hint| {
            Err(RelayError::project_not_found(
                &file.to_string_lossy(),
                hint,
            ))
        });
    let context = mocks.into_context();

    let mut request = rename_request(1, 1, "fresh");
    request.project = Some("backend".to_string());
    let response = RenameHandler::new().handle(&context, request).await;
    assert_eq!(
        response.message,
        "No open project named 'backend' contains file: src/A.java"
    );
}

#[tokio::test]
async fn test_rename_keyword_is_not_renamable() {
    let mut mocks = MockCollaborators::new();
    expect_target(&mut mocks, document("src/A.java", "public class Greeter {}\n"));
    mocks.symbols.expect_element_at().returning(|_, _, offset| {
        Ok(Some(SymbolElement {
            name: "public".to_string(),
            kind: SymbolKind::Keyword,
            file: PathBuf::from(ROOT).join("src/A.java"),
            offset,
            line: 1,
            column: 1,
            renamable: false,
        }))
    });
    mocks.symbols.expect_rename().times(0);
    let context = mocks.into_context();

    let response = RenameHandler::new()
        .handle(&context, rename_request(1, 1, "fresh"))
        .await;
    assert_eq!(
        response.message,
        "Element at line 1, column 1 is not renamable"
    );
}

#[tokio::test]
async fn test_rename_success_commits_and_reports_files() {
    let mut mocks = MockCollaborators::new();
    expect_target(&mut mocks, document("src/A.java", "public class Greeter {}\n"));
    mocks
        .symbols
        .expect_element_at()
        .withf(|_, _, offset| offset.value() == 13)
        .returning(|_, _, _| Ok(Some(greeter_element())));
    mocks
        .symbols
        .expect_rename()
        .withf(|_, element, new_name, _| element.name == "Greeter" && new_name == "Welcomer")
        .times(1)
        .returning(|_, _, _, _| Ok(vec![r"C:\work\demo\src\A.java".to_string()]));
    mocks.documents.expect_commit().times(1).returning(|_| Ok(()));
    let context = mocks.into_context();

    let response = RenameHandler::new()
        .handle(&context, rename_request(1, 14, " Welcomer "))
        .await;
    assert!(response.success, "{}", response.message);
    assert_eq!(response.message, "Renamed class 'Greeter' to 'Welcomer'");
    assert_eq!(
        response.affected_files,
        Some(vec!["C:/work/demo/src/A.java".to_string()])
    );
}

#[tokio::test]
async fn test_rename_loads_document_only_after_taking_lock() {
    let loads = Arc::new(AtomicUsize::new(0));
    let mut mocks = MockCollaborators::new();
    mocks
        .projects
        .expect_resolve_project()
        .returning(|_, _| Ok(project()));
    mocks.projects.expect_is_indexing().returning(|_| false);
    let counted = Arc::clone(&loads);
    mocks.documents.expect_load().returning(move |_| {
        counted.fetch_add(1, Ordering::SeqCst);
        Ok(document("src/A.java", "int a = 1;\n"))
    });
    mocks.symbols.expect_element_at().returning(|_, _, _| Ok(None));
    let context = mocks.into_context();

    let held = context.locks.write("demo").await;
    let pending = {
        let context = context.clone();
        tokio::spawn(async move {
            RenameHandler::new()
                .handle(&context, rename_request(1, 1, "fresh"))
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(loads.load(Ordering::SeqCst), 0);

    drop(held);
    let response = pending.await.unwrap();
    assert_eq!(response.message, "No element found at line 1, column 1");
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Find usages
// ============================================================================

#[tokio::test]
async fn test_find_usages_returns_records() {
    let mut mocks = MockCollaborators::new();
    expect_target(&mut mocks, document("src/A.java", "public class Greeter {}\n"));
    mocks
        .symbols
        .expect_element_at()
        .returning(|_, _, _| Ok(Some(greeter_element())));
    mocks.symbols.expect_find_usages().returning(|_, _| {
        Ok(vec![
            UsageRecord::new("/work/demo/src/B.java", 4, 9, "    new Greeter();"),
            UsageRecord::new("/work/demo/src/C.java", 7, 21, "Greeter g = null;"),
        ])
    });
    let context = mocks.into_context();

    let response = FindUsagesHandler::new()
        .handle(
            &context,
            FindUsagesRequest {
                file: "src/A.java".to_string(),
                line: 1,
                column: 14,
                project: None,
            },
        )
        .await;
    assert!(response.success);
    assert_eq!(response.message, "Found 2 usage(s)");
    assert_eq!(response.usages.len(), 2);
    assert_eq!(response.usages[0].preview, "new Greeter();");
}

#[tokio::test]
async fn test_find_usages_missing_file() {
    let mut mocks = MockCollaborators::new();
    mocks
        .projects
        .expect_resolve_project()
        .returning(|_, _| Ok(project()));
    mocks.projects.expect_is_indexing().returning(|_| false);
    mocks
        .documents
        .expect_load()
        .returning(|_| Err(RelayError::file_not_found("/work/demo/src/Gone.java")));
    let context = mocks.into_context();

    let response = FindUsagesHandler::new()
        .handle(
            &context,
            FindUsagesRequest {
                file: "src/Gone.java".to_string(),
                line: 1,
                column: 1,
                project: None,
            },
        )
        .await;
    assert!(!response.success);
    assert_eq!(response.message, "File not found: /work/demo/src/Gone.java");
    assert!(response.usages.is_empty());
}

// ============================================================================
// Move
// ============================================================================

#[tokio::test]
async fn test_move_blank_target_package() {
    let mut mocks = MockCollaborators::new();
    mocks.projects.expect_resolve_project().times(0);
    let context = mocks.into_context();

    let response = MoveHandler::new()
        .handle(&context, move_request("src/A.kt", 1, ""))
        .await;
    assert_eq!(response.message, "Target package cannot be empty");
}

#[tokio::test]
async fn test_move_unknown_language() {
    let mut mocks = MockCollaborators::new();
    expect_target(&mut mocks, document("notes.txt", "hello\n"));
    let context = mocks.into_context();

    let response = MoveHandler::new()
        .handle(&context, move_request("notes.txt", 1, "com.b"))
        .await;
    assert!(!response.success);
    assert!(response
        .message
        .starts_with("Unsupported language for file /work/demo/notes.txt."));
}

#[tokio::test]
async fn test_move_unavailable_backend_is_not_dispatched() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut mocks = MockCollaborators::new();
    expect_target(&mut mocks, document("src/A.kt", "class A\n"));
    mocks.documents.expect_commit().times(0);
    let context = mocks.into_context_with(
        CapabilityRegistry::with_probe(Arc::new(StaticProbe::none())),
        table_with(
            SupportedLanguage::Kotlin,
            BackendOperation::Move,
            RecordingBackend {
                calls: calls.clone(),
                outcome: RefactoringOutcome::success("moved", vec![]),
                delay: None,
            },
        ),
    );

    let response = MoveHandler::new()
        .handle(&context, move_request("src/A.kt", 1, "com.b"))
        .await;
    assert_eq!(
        response.message,
        "Kotlin support is not available (backend 'relay.lang.kotlin' is not installed)"
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_move_without_registered_handler() {
    let mut mocks = MockCollaborators::new();
    expect_target(&mut mocks, document("src/a.py", "def a():\n    pass\n"));
    let context = mocks.into_context_with(
        CapabilityRegistry::with_probe(Arc::new(StaticProbe::with(&["relay.lang.python"]))),
        BackendDispatchTable::new(),
    );

    let response = MoveHandler::new()
        .handle(&context, move_request("src/a.py", 1, "pkg.util"))
        .await;
    assert_eq!(
        response.message,
        "No move handler registered for language Python"
    );
}

#[tokio::test]
async fn test_move_refusal_is_passed_through_without_commit() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut mocks = MockCollaborators::new();
    expect_target(&mut mocks, document("src/a.py", "def parse():\n    pass\n"));
    mocks.documents.expect_commit().times(0);
    let context = mocks.into_context_with(
        CapabilityRegistry::with_probe(Arc::new(StaticProbe::with(&["relay.lang.python"]))),
        table_with(
            SupportedLanguage::Python,
            BackendOperation::Move,
            RecordingBackend {
                calls: calls.clone(),
                outcome: RefactoringOutcome::failure("Found function 'parse' at src/a.py:1."),
                delay: None,
            },
        ),
    );

    let response = MoveHandler::new()
        .handle(&context, move_request("src/a.py", 1, "pkg.util"))
        .await;
    assert!(!response.success);
    assert_eq!(response.message, "Found function 'parse' at src/a.py:1.");
    assert_eq!(response.affected_files, None);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_move_backend_success_commits() {
    let mut mocks = MockCollaborators::new();
    expect_target(&mut mocks, document("src/a.ts", "export class A {}\n"));
    mocks.documents.expect_commit().times(1).returning(|_| Ok(()));
    let context = mocks.into_context_with(
        CapabilityRegistry::with_probe(Arc::new(StaticProbe::with(&["relay.lang.javascript"]))),
        table_with(
            SupportedLanguage::TypeScript,
            BackendOperation::Move,
            RecordingBackend {
                calls: Arc::new(AtomicUsize::new(0)),
                outcome: RefactoringOutcome::success("Moved", vec!["/work/demo/lib/a.ts".to_string()]),
                delay: None,
            },
        ),
    );

    let response = MoveHandler::new()
        .handle(&context, move_request("src/a.ts", 1, "lib"))
        .await;
    assert!(response.success);
    assert_eq!(
        response.affected_files,
        Some(vec!["/work/demo/lib/a.ts".to_string()])
    );
}

#[tokio::test]
async fn test_move_times_out() {
    let mut mocks = MockCollaborators::new();
    expect_target(&mut mocks, document("src/main.go", "package main\n\nfunc run() {}\n"));
    mocks.documents.expect_commit().times(0);
    let mut context = mocks.into_context_with(
        CapabilityRegistry::with_probe(Arc::new(StaticProbe::with(&["relay.lang.go"]))),
        table_with(
            SupportedLanguage::Go,
            BackendOperation::Move,
            RecordingBackend {
                calls: Arc::new(AtomicUsize::new(0)),
                outcome: RefactoringOutcome::success("Moved", vec![]),
                delay: Some(Duration::from_millis(300)),
            },
        ),
    );
    context.timeouts.move_ms = 50;

    let response = MoveHandler::new()
        .handle(&context, move_request("src/main.go", 3, "util"))
        .await;
    assert!(!response.success);
    assert_eq!(response.message, "Move timed out after 50ms");
}

#[tokio::test]
async fn test_move_line_out_of_bounds() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut mocks = MockCollaborators::new();
    expect_target(&mut mocks, document("src/A.kt", &fifty_lines()));
    mocks.documents.expect_commit().times(0);
    let context = mocks.into_context_with(
        CapabilityRegistry::with_probe(Arc::new(StaticProbe::with(&["relay.lang.kotlin"]))),
        table_with(
            SupportedLanguage::Kotlin,
            BackendOperation::Move,
            RecordingBackend {
                calls: calls.clone(),
                outcome: RefactoringOutcome::success("Moved", vec![]),
                delay: None,
            },
        ),
    );

    let response = MoveHandler::new()
        .handle(&context, move_request("src/A.kt", 999, "com.b"))
        .await;
    assert!(!response.success);
    assert_eq!(
        response.message,
        "Line 999 is out of bounds (valid range: 1-50)"
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

// ============================================================================
// Extract method
// ============================================================================

const JAVA_METHOD: &str =
    "public class A {\n    void run() {\n        // nothing here\n\n        int a = 1;\n    }\n}\n";

fn extract_request(file: &str, start: (usize, usize), end: (usize, usize), name: &str) -> ExtractMethodRequest {
    ExtractMethodRequest {
        file: file.to_string(),
        start_line: start.0,
        start_column: start.1,
        end_line: end.0,
        end_column: end.1,
        method_name: name.to_string(),
        project: None,
    }
}

#[tokio::test]
async fn test_extract_blank_method_name() {
    let mut mocks = MockCollaborators::new();
    mocks.projects.expect_resolve_project().times(0);
    let context = mocks.into_context();

    let response = ExtractMethodHandler::new()
        .handle(&context, extract_request("src/A.java", (3, 1), (4, 1), ""))
        .await;
    assert_eq!(response.message, "Method name cannot be empty");
}

#[tokio::test]
async fn test_extract_range_without_statements() {
    let mut mocks = MockCollaborators::new();
    expect_target(&mut mocks, document("src/A.java", JAVA_METHOD));
    mocks.documents.expect_save().times(0);
    let context = mocks.into_context();

    let response = ExtractMethodHandler::new()
        .handle(&context, extract_request("src/A.java", (3, 1), (4, 1), "helper"))
        .await;
    assert!(!response.success);
    assert_eq!(response.message, "No statements found in the specified range");
}

#[tokio::test]
async fn test_extract_java_saves_and_commits() {
    let mut mocks = MockCollaborators::new();
    expect_target(&mut mocks, document("src/A.java", JAVA_METHOD));
    mocks
        .documents
        .expect_save()
        .withf(|doc| doc.text.contains("private void helper() {") && doc.text.contains("        helper();\n"))
        .times(1)
        .returning(|_| Ok(()));
    mocks.documents.expect_commit().times(1).returning(|_| Ok(()));
    let context = mocks.into_context();

    let response = ExtractMethodHandler::new()
        .handle(&context, extract_request("src/A.java", (5, 1), (5, 19), "helper"))
        .await;
    assert!(response.success, "{}", response.message);
    assert_eq!(response.message, "Extracted method 'helper' from 1 statement(s)");
    assert_eq!(
        response.affected_files,
        Some(vec!["/work/demo/src/A.java".to_string()])
    );
}

#[tokio::test]
async fn test_extract_unavailable_language_checked_before_statements() {
    let mut mocks = MockCollaborators::new();
    // The selection holds no statement; availability is reported first
    expect_target(&mut mocks, document("src/app.js", "\n\n"));
    let context = mocks.into_context();

    let response = ExtractMethodHandler::new()
        .handle(&context, extract_request("src/app.js", (1, 1), (2, 1), "helper"))
        .await;
    assert_eq!(
        response.message,
        "JavaScript support is not available (backend 'relay.lang.javascript' is not installed)"
    );
}

// ============================================================================
// Apply fix
// ============================================================================

fn whitespace_diagnostic() -> Diagnostic {
    Diagnostic {
        message: "Trailing whitespace".to_string(),
        severity: Severity::Warning,
        start_offset: 10,
        end_offset: 13,
        fixes: vec![QuickFix {
            name: "Remove trailing whitespace".to_string(),
            edits: vec![TextEdit::new(10, 13, "")],
        }],
    }
}

fn fix_request(column: usize, fix_id: usize) -> ApplyFixRequest {
    ApplyFixRequest {
        file: "src/A.java".to_string(),
        line: 1,
        column,
        fix_id,
        diagnostic_message: None,
        run_inspections: false,
        project: None,
    }
}

#[tokio::test]
async fn test_apply_fix_from_cached_diagnostics() {
    let mut mocks = MockCollaborators::new();
    expect_target(&mut mocks, document("src/A.java", "int a = 1;   \n"));
    mocks
        .diagnostics
        .expect_cached_diagnostics()
        .returning(|_| Some(vec![whitespace_diagnostic()]));
    mocks.diagnostics.expect_open_editor().times(0);
    mocks
        .documents
        .expect_save()
        .withf(|doc| doc.text == "int a = 1;\n")
        .times(1)
        .returning(|_| Ok(()));
    mocks.documents.expect_commit().times(1).returning(|_| Ok(()));
    let context = mocks.into_context();

    let response = ApplyFixHandler::new().handle(&context, fix_request(12, 0)).await;
    assert!(response.success, "{}", response.message);
    assert_eq!(response.fix_name.as_deref(), Some("Remove trailing whitespace"));
    assert_eq!(response.message, "Applied fix 'Remove trailing whitespace'");
}

#[tokio::test]
async fn test_apply_fix_opens_editor_when_nothing_cached() {
    let mut mocks = MockCollaborators::new();
    expect_target(&mut mocks, document("src/A.java", "int a = 1;   \n"));
    mocks.diagnostics.expect_cached_diagnostics().returning(|_| None);
    mocks
        .diagnostics
        .expect_open_editor()
        .times(1)
        .returning(|_| Ok(vec![]));
    let context = mocks.into_context();

    let response = ApplyFixHandler::new().handle(&context, fix_request(12, 0)).await;
    assert!(!response.success);
    assert_eq!(response.message, "No quick fixes available at line 1, column 12");
}

#[tokio::test]
async fn test_apply_fix_index_out_of_range() {
    let mut mocks = MockCollaborators::new();
    expect_target(&mut mocks, document("src/A.java", "int a = 1;   \n"));
    mocks.diagnostics.expect_cached_diagnostics().times(0);
    mocks
        .diagnostics
        .expect_run_inspections()
        .returning(|_, _| Ok(vec![whitespace_diagnostic()]));
    mocks.documents.expect_save().times(0);
    let context = mocks.into_context();

    let mut request = fix_request(12, 3);
    request.run_inspections = true;
    let response = ApplyFixHandler::new().handle(&context, request).await;
    assert_eq!(
        response.message,
        "Fix index 3 is out of range (available fixes: 0-0)"
    );
    assert_eq!(response.fix_name, None);
}

#[tokio::test]
async fn test_apply_fix_message_filter() {
    let mut mocks = MockCollaborators::new();
    expect_target(&mut mocks, document("src/A.java", "int a = 1;   \n"));
    mocks
        .diagnostics
        .expect_cached_diagnostics()
        .returning(|_| Some(vec![whitespace_diagnostic()]));
    let context = mocks.into_context();

    let mut request = fix_request(12, 0);
    request.diagnostic_message = Some("unused import".to_string());
    let response = ApplyFixHandler::new().handle(&context, request).await;
    assert_eq!(response.message, "No quick fixes available at line 1, column 12");
}

//! Identifier-level symbol engine
//!
//! Elements are identifier tokens. Usages are whole-word occurrences in files
//! of the same language family; an occurrence preceded by a declaration
//! keyword is a declaration site, not a usage.

use crate::manager::collect_source_files;
use async_trait::async_trait;
use relay_foundation::paths::{display_path, file_extension, file_stem};
use relay_foundation::{
    CancellationFlag, LineIndex, RelayError, RelayResult, ResolvedOffset, UsageRecord,
};
use relay_handler_api::{Document, ProjectHandle, SymbolElement, SymbolEngine, SymbolKind};
use relay_lang_common::jvm;
use relay_lang_common::lexical::{
    declaration_kind, identifier_at, is_numeric_literal, is_valid_identifier, keywords,
    previous_word, replace_word, word_occurrences,
};
use relay_plugin_api::SupportedLanguage;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

fn language_of(path: &Path) -> SupportedLanguage {
    let display = display_path(path);
    SupportedLanguage::detect(None, file_extension(&display))
}

fn kind_from_keyword(keyword: &str) -> Option<SymbolKind> {
    let kind = match declaration_kind(keyword)? {
        "class" => SymbolKind::Class,
        "interface" => SymbolKind::Interface,
        "enum" => SymbolKind::Enum,
        "object" => SymbolKind::Object,
        "function" => SymbolKind::Function,
        "variable" => SymbolKind::Variable,
        "module" => SymbolKind::Module,
        _ => SymbolKind::Other,
    };
    Some(kind)
}

fn is_declaration_site(text: &str, offset: usize) -> bool {
    previous_word(text, offset).is_some_and(|word| declaration_kind(word).is_some())
}

/// Kind of the first declaration of `name` in a buffer
fn declared_kind(text: &str, name: &str) -> Option<SymbolKind> {
    word_occurrences(text, name)
        .into_iter()
        .find_map(|offset| previous_word(text, offset).and_then(kind_from_keyword))
}

#[derive(Debug, Default)]
pub struct LexicalSymbolEngine;

impl LexicalSymbolEngine {
    pub fn new() -> Self {
        Self
    }

    /// Project files sharing a language family with `file`
    async fn family_files(&self, project: &ProjectHandle, file: &Path) -> Vec<PathBuf> {
        let language = language_of(file);
        let root = project.root.clone();
        let files = tokio::task::spawn_blocking(move || collect_source_files(&root))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Source walk failed");
                Vec::new()
            });
        files
            .into_iter()
            .filter(|path| language.same_family(language_of(path)))
            .collect()
    }
}

#[async_trait]
impl SymbolEngine for LexicalSymbolEngine {
    async fn element_at(
        &self,
        _project: &ProjectHandle,
        document: &Document,
        offset: ResolvedOffset,
    ) -> RelayResult<Option<SymbolElement>> {
        let text = &document.text;
        let Some((start, end)) = identifier_at(text, offset.value()) else {
            return Ok(None);
        };
        let name = &text[start..end];
        let language = SupportedLanguage::detect(
            document.declared_language.as_deref(),
            document.extension().as_deref(),
        );

        let (kind, renamable) = if keywords(language).contains(&name) {
            (SymbolKind::Keyword, false)
        } else if is_numeric_literal(name) {
            (SymbolKind::Literal, false)
        } else {
            let kind = previous_word(text, start)
                .and_then(kind_from_keyword)
                .or_else(|| declared_kind(text, name))
                .unwrap_or(SymbolKind::Other);
            (kind, true)
        };

        let (line, column) = document.index.position_of(text, start);
        debug!(name = %name, kind = %kind, line, column, "Element resolved");
        Ok(Some(SymbolElement {
            name: name.to_string(),
            kind,
            file: document.path.clone(),
            offset: ResolvedOffset::new(start),
            line,
            column,
            renamable,
        }))
    }

    async fn find_usages(
        &self,
        project: &ProjectHandle,
        element: &SymbolElement,
    ) -> RelayResult<Vec<UsageRecord>> {
        let mut usages = Vec::new();
        for path in self.family_files(project, &element.file).await {
            let Ok(text) = tokio::fs::read_to_string(&path).await else {
                continue;
            };
            let index = LineIndex::new(&text);
            let shown = display_path(&path);
            for offset in word_occurrences(&text, &element.name) {
                if is_declaration_site(&text, offset) {
                    continue;
                }
                let (line, column) = index.position_of(&text, offset);
                let source = index.line_text(&text, line).unwrap_or_default();
                usages.push(UsageRecord::new(&shown, line, column, source));
            }
        }
        debug!(name = %element.name, usages = usages.len(), "Usages collected");
        Ok(usages)
    }

    async fn rename(
        &self,
        project: &ProjectHandle,
        element: &SymbolElement,
        new_name: &str,
        cancel: &CancellationFlag,
    ) -> RelayResult<Vec<String>> {
        let language = language_of(&element.file);
        if !is_valid_identifier(new_name, language) {
            return Err(RelayError::engine(format!(
                "'{}' is not a valid identifier",
                new_name
            )));
        }

        // Compute every rewrite before touching the tree
        let mut rewrites = Vec::new();
        for path in self.family_files(project, &element.file).await {
            cancel.check()?;
            let Ok(text) = tokio::fs::read_to_string(&path).await else {
                continue;
            };
            let (renamed, count) = replace_word(&text, &element.name, new_name);
            if count == 0 {
                continue;
            }

            let shown = display_path(&path);
            let declares_type = jvm::top_level_types(&renamed)
                .iter()
                .any(|ty| ty.name == new_name);
            let target = if jvm::is_jvm_file(&shown)
                && file_stem(&shown) == Some(element.name.as_str())
                && declares_type
            {
                let extension = file_extension(&shown).unwrap_or("java");
                Some(path.with_file_name(format!("{}.{}", new_name, extension)))
            } else {
                None
            };
            rewrites.push((path, renamed, target));
        }

        cancel.enter_commit()?;
        let mut affected = Vec::new();
        for (path, renamed, target) in rewrites {
            let write_err = |e: std::io::Error| {
                RelayError::engine(format!("Failed to write {}: {}", display_path(&path), e))
            };
            tokio::fs::write(&path, &renamed).await.map_err(write_err)?;
            let written = match target {
                Some(target) => {
                    tokio::fs::rename(&path, &target).await.map_err(write_err)?;
                    target
                }
                None => path.clone(),
            };
            affected.push(display_path(&written));
        }

        info!(
            from = %element.name,
            to = %new_name,
            files = affected.len(),
            "Renamed element"
        );
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn setup() -> (TempDir, ProjectHandle, Document) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let greeter = write(
            &root,
            "src/main/java/com/a/Greeter.java",
            "package com.a;\n\npublic class Greeter {\n    public String greet() { return \"hi\"; }\n}\n",
        );
        write(
            &root,
            "src/main/java/com/a/App.java",
            "package com.a;\n\nclass App {\n    void run() {\n        new Greeter().greet();\n        int count = 42;\n    }\n}\n",
        );
        write(&root, "web/greeter.js", "const Greeter = 1;\nGreeter + 1;\n");
        let text = fs::read_to_string(&greeter).unwrap();
        let document = Document::new(greeter, text, Some("JAVA".to_string()));
        (dir, ProjectHandle::new("demo", root), document)
    }

    #[tokio::test]
    async fn test_element_at_declaration() {
        let (_dir, project, document) = setup();
        let engine = LexicalSymbolEngine::new();

        // "Greeter" on line 3, column 14
        let offset = ResolvedOffset::new(document.index.line_start(3).unwrap() + 13);
        let element = engine.element_at(&project, &document, offset).await.unwrap().unwrap();
        assert_eq!(element.name, "Greeter");
        assert_eq!(element.kind, SymbolKind::Class);
        assert_eq!((element.line, element.column), (3, 14));
        assert!(element.renamable);
    }

    #[tokio::test]
    async fn test_keywords_are_not_renamable() {
        let (_dir, project, document) = setup();
        let engine = LexicalSymbolEngine::new();

        let offset = ResolvedOffset::new(document.index.line_start(3).unwrap());
        let element = engine.element_at(&project, &document, offset).await.unwrap().unwrap();
        assert_eq!(element.name, "public");
        assert_eq!(element.kind, SymbolKind::Keyword);
        assert!(!element.renamable);

        // Whitespace between tokens
        let offset = ResolvedOffset::new(document.index.line_start(2).unwrap());
        assert!(engine.element_at(&project, &document, offset).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_usages_stays_in_family() {
        let (_dir, project, document) = setup();
        let engine = LexicalSymbolEngine::new();
        let offset = ResolvedOffset::new(document.index.line_start(3).unwrap() + 13);
        let element = engine.element_at(&project, &document, offset).await.unwrap().unwrap();

        let usages = engine.find_usages(&project, &element).await.unwrap();
        assert_eq!(usages.len(), 1);
        assert!(usages[0].file.ends_with("com/a/App.java"));
        assert_eq!((usages[0].line, usages[0].column), (5, 13));
        assert_eq!(usages[0].preview, "new Greeter().greet();");
    }

    #[tokio::test]
    async fn test_rename_rewrites_and_moves_type_file() {
        let (_dir, project, document) = setup();
        let engine = LexicalSymbolEngine::new();
        let offset = ResolvedOffset::new(document.index.line_start(3).unwrap() + 13);
        let element = engine.element_at(&project, &document, offset).await.unwrap().unwrap();

        let affected = engine.rename(&project, &element, "Welcomer", &CancellationFlag::new()).await.unwrap();
        assert_eq!(affected.len(), 2);

        let root = &project.root;
        assert!(!root.join("src/main/java/com/a/Greeter.java").exists());
        let renamed = fs::read_to_string(root.join("src/main/java/com/a/Welcomer.java")).unwrap();
        assert!(renamed.contains("public class Welcomer {"));
        let app = fs::read_to_string(root.join("src/main/java/com/a/App.java")).unwrap();
        assert!(app.contains("new Welcomer().greet();"));
        // Other language families are untouched
        let js = fs::read_to_string(root.join("web/greeter.js")).unwrap();
        assert!(js.contains("const Greeter"));
    }

    #[tokio::test]
    async fn test_cancelled_rename_writes_nothing() {
        let (_dir, project, document) = setup();
        let engine = LexicalSymbolEngine::new();
        let offset = ResolvedOffset::new(document.index.line_start(3).unwrap() + 13);
        let element = engine.element_at(&project, &document, offset).await.unwrap().unwrap();
        let cancel = CancellationFlag::new();
        cancel.cancel();

        let err = engine.rename(&project, &element, "Welcomer", &cancel).await.unwrap_err();
        assert_eq!(err, RelayError::cancelled());
        assert!(project.root.join("src/main/java/com/a/Greeter.java").exists());
        let app = fs::read_to_string(project.root.join("src/main/java/com/a/App.java")).unwrap();
        assert!(app.contains("new Greeter().greet();"));
    }

    #[tokio::test]
    async fn test_rename_rejects_invalid_identifier() {
        let (_dir, project, document) = setup();
        let engine = LexicalSymbolEngine::new();
        let offset = ResolvedOffset::new(document.index.line_start(3).unwrap() + 13);
        let element = engine.element_at(&project, &document, offset).await.unwrap().unwrap();

        let err = engine.rename(&project, &element, "9lives", &CancellationFlag::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "'9lives' is not a valid identifier");
        let err = engine.rename(&project, &element, "class", &CancellationFlag::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "'class' is not a valid identifier");
    }
}

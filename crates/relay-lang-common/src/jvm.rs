//! JVM source layout and package moves
//!
//! Shared by the native Java handlers and the Kotlin backend. Source roots
//! follow the Maven/Gradle convention (`src/main/java`, `src/test/kotlin`,
//! ...); files outside a conventional root fall back to a root derived from
//! their package declaration.

use crate::lexical::{is_comment_line, replace_word, word_occurrences};
use ignore::WalkBuilder;
use once_cell::sync::Lazy;
use regex::Regex;
use relay_foundation::paths::{display_path, file_extension, file_stem};
use relay_foundation::{CancellationFlag, RelayError, RelayResult};
use relay_plugin_api::SupportedLanguage;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Pattern for package declarations
///
/// Matches:
/// - `package com.example;`
/// - `package com.example` (Kotlin)
pub static PACKAGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*package[ \t]+([\w.]+)[ \t]*;?[ \t]*\r?$")
        .expect("Valid package pattern regex")
});

/// Pattern for import statements
pub static IMPORT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*import[ \t]+(?:static[ \t]+)?([\w.]+(?:\.\*)?)[ \t]*;?")
        .expect("Valid import pattern regex")
});

/// Pattern for top-level type declarations (no indentation)
///
/// Matches:
/// - `public final class Foo`
/// - `enum class Color` (Kotlin)
/// - `object Registry`
pub static TOP_LEVEL_TYPE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^(?P<mods>(?:(?:public|protected|private|internal|abstract|final|open|sealed|data|static|strictfp|inner|value|annotation|enum)\s+)*)(?P<kind>class|interface|enum|object|record)\s+(?P<name>[A-Za-z_]\w*)",
    )
    .expect("Valid top-level type regex")
});

const SOURCE_ROOT_MARKERS: &[(&str, SourceRootKind)] = &[
    ("src/main/java", SourceRootKind::Main),
    ("src/main/kotlin", SourceRootKind::Main),
    ("src/test/java", SourceRootKind::Test),
    ("src/test/kotlin", SourceRootKind::Test),
];

const JVM_EXTENSIONS: &[&str] = &["java", "kt", "kts"];

const NON_CODE_EXTENSIONS: &[&str] = &[
    "xml", "properties", "gradle", "yaml", "yml", "json", "txt", "md", "conf", "html",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceRootKind {
    Main,
    Test,
}

impl SourceRootKind {
    pub fn label(self) -> &'static str {
        match self {
            SourceRootKind::Main => "main sources",
            SourceRootKind::Test => "test sources",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRoot {
    pub path: PathBuf,
    pub kind: SourceRootKind,
}

/// A type declared at the top level of a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopLevelType {
    pub kind: &'static str,
    pub name: String,
    /// 1-based line of the declaration
    pub line: usize,
}

pub fn is_jvm_file(path: &str) -> bool {
    file_extension(path)
        .map(|ext| JVM_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn uses_semicolons(path: &Path) -> bool {
    file_extension(&display_path(path))
        .map(|ext| ext.eq_ignore_ascii_case("java"))
        .unwrap_or(false)
}

pub fn read_package(text: &str) -> Option<String> {
    PACKAGE_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Replace the package declaration, inserting one when the file has none
pub fn set_package(text: &str, package: &str, semicolons: bool) -> String {
    let terminator = if semicolons { ";" } else { "" };
    match PACKAGE_PATTERN.find(text) {
        Some(m) => {
            let line_end = if m.as_str().ends_with('\r') { "\r" } else { "" };
            format!(
                "{}package {}{}{}{}",
                &text[..m.start()],
                package,
                terminator,
                line_end,
                &text[m.end()..]
            )
        }
        None => format!("package {}{}\n\n{}", package, terminator, text),
    }
}

/// Fully qualified names imported by a file
pub fn imports(text: &str) -> Vec<String> {
    IMPORT_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Add an import unless the name is already imported directly or by wildcard
pub fn add_import(text: &str, fqn: &str, semicolons: bool) -> String {
    let wildcard = fqn
        .rsplit_once('.')
        .map(|(package, _)| format!("{}.*", package));
    let existing = imports(text);
    if existing
        .iter()
        .any(|import| import == fqn || Some(import) == wildcard.as_ref())
    {
        return text.to_string();
    }

    let statement = format!("import {}{}", fqn, if semicolons { ";" } else { "" });
    if let Some(m) = IMPORT_PATTERN.find_iter(text).last() {
        let at = line_end(text, m.end());
        return format!("{}\n{}{}", &text[..at], statement, &text[at..]);
    }
    if let Some(m) = PACKAGE_PATTERN.find(text) {
        let at = line_end(text, m.end());
        return format!("{}\n\n{}{}", &text[..at], statement, &text[at..]);
    }
    format!("{}\n\n{}", statement, text)
}

fn line_end(text: &str, from: usize) -> usize {
    text[from..]
        .find('\n')
        .map(|i| from + i)
        .unwrap_or(text.len())
}

/// Top-level types declared in a file, in source order
pub fn top_level_types(text: &str) -> Vec<TopLevelType> {
    TOP_LEVEL_TYPE_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.name("name")?.as_str().to_string();
            let mods = caps.name("mods").map(|m| m.as_str()).unwrap_or("");
            let kind = match caps.name("kind")?.as_str() {
                "class" if mods.split_whitespace().any(|m| m == "enum") => "enum",
                "interface" => "interface",
                "enum" => "enum",
                "object" => "object",
                _ => "class",
            };
            let line = text[..whole.start()].matches('\n').count() + 1;
            Some(TopLevelType { kind, name, line })
        })
        .collect()
}

/// The top-level type enclosing a 1-based line
pub fn type_at_line(text: &str, line: usize) -> Option<TopLevelType> {
    top_level_types(text)
        .into_iter()
        .take_while(|ty| ty.line <= line)
        .last()
}

pub fn is_valid_package_name(package: &str) -> bool {
    !package.is_empty()
        && package.split('.').all(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

/// Conventional source roots found anywhere in the project
pub fn project_source_roots(project_root: &Path) -> Vec<SourceRoot> {
    let mut roots = Vec::new();
    for entry in WalkBuilder::new(project_root).build().flatten() {
        if !entry.file_type().is_some_and(|t| t.is_dir()) {
            continue;
        }
        let path = display_path(entry.path());
        for (marker, kind) in SOURCE_ROOT_MARKERS {
            if path.ends_with(&format!("/{}", marker)) {
                roots.push(SourceRoot {
                    path: entry.path().to_path_buf(),
                    kind: *kind,
                });
            }
        }
    }
    roots
}

/// Source root a file belongs to
pub fn source_root_of(project_root: &Path, file: &Path, package: &str) -> SourceRoot {
    let normalized = display_path(file);
    for (marker, kind) in SOURCE_ROOT_MARKERS {
        if let Some(idx) = normalized.find(&format!("/{}/", marker)) {
            return SourceRoot {
                path: PathBuf::from(&normalized[..idx + 1 + marker.len()]),
                kind: *kind,
            };
        }
    }

    let mut root = file.parent().unwrap_or(project_root).to_path_buf();
    if !package.is_empty() {
        for segment in package.split('.').rev() {
            if root.file_name().is_some_and(|name| name == segment) {
                root.pop();
            } else {
                break;
            }
        }
    }

    let relative = file.strip_prefix(project_root).unwrap_or(file);
    let kind = if relative
        .components()
        .any(|c| matches!(c.as_os_str().to_str(), Some("test") | Some("tests")))
    {
        SourceRootKind::Test
    } else {
        SourceRootKind::Main
    };

    SourceRoot { path: root, kind }
}

/// Request to move the file declaring a top-level type into another package
#[derive(Debug, Clone)]
pub struct TypeMove<'a> {
    pub project_root: &'a Path,
    pub file: &'a Path,
    pub text: &'a str,
    pub type_name: &'a str,
    pub type_kind: &'a str,
    pub target_package: &'a str,
    pub search_in_comments: bool,
    pub search_in_non_code_files: bool,
    pub cancel: &'a CancellationFlag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMoveResult {
    pub new_file: PathBuf,
    pub source_root: SourceRootKind,
    pub affected_files: Vec<String>,
}

impl TypeMoveResult {
    /// Success message naming the element, the target and the source root type
    pub fn message(&self, kind: &str, name: &str, target_package: &str) -> String {
        format!(
            "Moved {} '{}' to package '{}' ({})",
            kind,
            name,
            target_package,
            self.source_root.label()
        )
    }
}

/// Every write a move will make, computed without touching the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMovePlan {
    pub old_file: PathBuf,
    pub old_text: String,
    pub new_file: PathBuf,
    pub new_text: String,
    /// Other files whose references change, with their new contents
    pub updates: Vec<(PathBuf, String)>,
    pub source_root: SourceRootKind,
}

/// Move a top-level type to `target_package`, within its own source root kind
pub fn move_top_level_type(request: &TypeMove<'_>) -> RelayResult<TypeMoveResult> {
    let plan = plan_type_move(request)?;
    request.cancel.enter_commit()?;
    plan.apply()
}

/// Validate a move and compute its writes. Reads only.
pub fn plan_type_move(request: &TypeMove<'_>) -> RelayResult<TypeMovePlan> {
    let TypeMove {
        project_root,
        file,
        text,
        type_name,
        type_kind,
        target_package,
        cancel,
        ..
    } = *request;

    if !is_valid_package_name(target_package) {
        return Err(RelayError::invalid_field(
            "targetPackage",
            format!("'{}' is not a valid package name", target_package),
        ));
    }

    let declared = top_level_types(text);
    if declared.len() > 1 {
        return Err(RelayError::capability(format!(
            "{} declares {} top-level types; move {} '{}' into its own file first",
            display_path(file),
            declared.len(),
            type_kind,
            type_name
        )));
    }

    let old_package = read_package(text).unwrap_or_default();
    if old_package == target_package {
        return Err(RelayError::validation(format!(
            "{} '{}' is already in package '{}'",
            capitalize(type_kind),
            type_name,
            target_package
        )));
    }

    let source_root = source_root_of(project_root, file, &old_package);
    let package_dir = target_package.replace('.', "/");
    check_same_root_kind(project_root, &source_root, &package_dir, request)?;
    cancel.check()?;

    let file_name = file
        .file_name()
        .ok_or_else(|| RelayError::engine(format!("Invalid file path: {}", display_path(file))))?;
    let new_file = source_root.path.join(&package_dir).join(file_name);
    if new_file.exists() {
        return Err(RelayError::validation(format!(
            "File already exists: {}",
            display_path(&new_file)
        )));
    }

    let semicolons = uses_semicolons(file);
    let mut new_text = set_package(text, target_package, semicolons);
    if !old_package.is_empty() {
        for sibling in package_siblings(file, type_name) {
            if !word_occurrences(text, &sibling).is_empty() {
                new_text = add_import(&new_text, &format!("{}.{}", old_package, sibling), semicolons);
            }
        }
    }

    let updates = if old_package.is_empty() {
        Vec::new()
    } else {
        reference_updates(request, &old_package)?
    };

    Ok(TypeMovePlan {
        old_file: file.to_path_buf(),
        old_text: text.to_string(),
        new_file,
        new_text,
        updates,
        source_root: source_root.kind,
    })
}

impl TypeMovePlan {
    /// Perform the writes. On any failure the tree is restored.
    pub fn apply(self) -> RelayResult<TypeMoveResult> {
        let mut journal = Journal::default();
        if let Err(e) = self.write_all(&mut journal) {
            warn!(error = %e, "Move failed part-way; restoring files");
            journal.rollback();
            return Err(e);
        }

        let mut affected_files = vec![display_path(&self.new_file)];
        affected_files.extend(self.updates.iter().map(|(path, _)| display_path(path)));
        info!(
            file = %display_path(&self.new_file),
            files = affected_files.len(),
            "Moved top-level type"
        );

        Ok(TypeMoveResult {
            new_file: self.new_file,
            source_root: self.source_root,
            affected_files,
        })
    }

    fn write_all(&self, journal: &mut Journal) -> RelayResult<()> {
        if let Some(parent) = self.new_file.parent() {
            journal.create_dirs(parent)?;
        }
        journal.write(&self.new_file, &self.new_text)?;
        for (path, updated) in &self.updates {
            debug!(file = %display_path(path), "Updating references to moved type");
            journal.write(path, updated)?;
        }
        journal.remove(&self.old_file, &self.old_text)?;
        Ok(())
    }
}

/// Undo log for the writes of one move
#[derive(Debug, Default)]
struct Journal {
    // Previous contents, `None` for files the move created
    files: Vec<(PathBuf, Option<String>)>,
    created_dirs: Vec<PathBuf>,
}

impl Journal {
    fn create_dirs(&mut self, dir: &Path) -> RelayResult<()> {
        let missing: Vec<PathBuf> = dir
            .ancestors()
            .take_while(|ancestor| !ancestor.exists())
            .map(Path::to_path_buf)
            .collect();
        // Deepest first, the order they are removed in
        self.created_dirs.extend(missing);
        fs::create_dir_all(dir)?;
        Ok(())
    }

    fn write(&mut self, path: &Path, content: &str) -> RelayResult<()> {
        let previous = match fs::read_to_string(path) {
            Ok(previous) => Some(previous),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        self.files.push((path.to_path_buf(), previous));
        fs::write(path, content)?;
        Ok(())
    }

    fn remove(&mut self, path: &Path, previous: &str) -> RelayResult<()> {
        fs::remove_file(path)?;
        self.files.push((path.to_path_buf(), Some(previous.to_string())));
        Ok(())
    }

    fn rollback(self) {
        for (path, previous) in self.files.into_iter().rev() {
            let restored = match previous {
                Some(content) => fs::write(&path, content),
                None => fs::remove_file(&path),
            };
            if let Err(e) = restored {
                warn!(file = %display_path(&path), error = %e, "Could not restore file");
            }
        }
        for dir in self.created_dirs {
            let _ = fs::remove_dir(&dir);
        }
    }
}

fn check_same_root_kind(
    project_root: &Path,
    source_root: &SourceRoot,
    package_dir: &str,
    request: &TypeMove<'_>,
) -> RelayResult<()> {
    let roots = project_source_roots(project_root);
    let exists_in = |same: bool| {
        roots
            .iter()
            .filter(|root| (root.kind == source_root.kind) == same)
            .any(|root| root.path.join(package_dir).is_dir())
    };

    if !exists_in(true) && exists_in(false) {
        let other = match source_root.kind {
            SourceRootKind::Main => SourceRootKind::Test,
            SourceRootKind::Test => SourceRootKind::Main,
        };
        return Err(RelayError::validation(format!(
            "Cannot move {} '{}' from {} to package '{}': the package exists only in {}",
            request.type_kind,
            request.type_name,
            source_root.kind.label(),
            request.target_package,
            other.label()
        )));
    }
    Ok(())
}

/// Type names declared by the other JVM files of the moved file's directory
fn package_siblings(file: &Path, moved: &str) -> Vec<String> {
    let Some(dir) = file.parent() else {
        return Vec::new();
    };
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .flatten()
        .map(|entry| display_path(&entry.path()))
        .filter(|path| is_jvm_file(path))
        .filter_map(|path| file_stem(&path).map(str::to_string))
        .filter(|stem| stem != moved)
        .collect();
    names.sort();
    names
}

/// New contents of every project file referencing the moved type
fn reference_updates(request: &TypeMove<'_>, old_package: &str) -> RelayResult<Vec<(PathBuf, String)>> {
    let old_fqn = format!("{}.{}", old_package, request.type_name);
    let new_fqn = format!("{}.{}", request.target_package, request.type_name);

    let mut updates = Vec::new();
    for entry in WalkBuilder::new(request.project_root).build().flatten() {
        request.cancel.check()?;
        let path = entry.path();
        if path == request.file || !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let display = display_path(path);
        let ext = file_extension(&display).map(str::to_lowercase);
        let is_code = is_jvm_file(&display);
        let is_text = ext
            .as_deref()
            .is_some_and(|ext| NON_CODE_EXTENSIONS.contains(&ext));
        if !is_code && !(request.search_in_non_code_files && is_text) {
            continue;
        }
        let Ok(content) = fs::read_to_string(path) else {
            continue;
        };

        let mut updated = if is_code {
            rewrite_code_references(&content, &old_fqn, &new_fqn, request.search_in_comments)
        } else {
            replace_word(&content, &old_fqn, &new_fqn).0
        };

        if is_code
            && read_package(&content).as_deref() == Some(old_package)
            && uses_simple_name(&content, request.type_name)
        {
            updated = add_import(&updated, &new_fqn, uses_semicolons(path));
        }

        if updated != content {
            updates.push((path.to_path_buf(), updated));
        }
    }
    updates.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(updates)
}

fn rewrite_code_references(content: &str, old_fqn: &str, new_fqn: &str, in_comments: bool) -> String {
    content
        .split_inclusive('\n')
        .map(|line| {
            if !in_comments && is_comment_line(line, SupportedLanguage::Java) {
                line.to_string()
            } else {
                replace_word(line, old_fqn, new_fqn).0
            }
        })
        .collect()
}

/// Whether code outside import/package lines mentions the simple name
fn uses_simple_name(content: &str, name: &str) -> bool {
    content.lines().any(|line| {
        let trimmed = line.trim_start();
        !trimmed.starts_with("import ")
            && !trimmed.starts_with("package ")
            && !is_comment_line(line, SupportedLanguage::Java)
            && !word_occurrences(line, name).is_empty()
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

//! Path normalization shared by the wire protocol and the engines
//!
//! Paths cross the HTTP boundary with either separator. Internally and in every
//! response they use `/`.

use std::path::Path;

/// Replace every `\` with `/`
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Normalize a filesystem path for display in responses
pub fn display_path(path: &Path) -> String {
    normalize_path(&path.to_string_lossy())
}

/// Extension of the final path component, without the dot
///
/// Works on normalized and raw paths alike. Dotfiles such as `.gitignore`
/// have no extension.
pub fn file_extension(path: &str) -> Option<&str> {
    let name = path.rsplit(['/', '\\']).next()?;
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}

/// File name without its extension
pub fn file_stem(path: &str) -> Option<&str> {
    let name = path.rsplit(['/', '\\']).next()?;
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => Some(stem),
        _ if !name.is_empty() => Some(name),
        _ => None,
    }
}

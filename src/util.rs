//! Path helpers shared by the loader and configuration.

use std::path::{Path, PathBuf};

/// File extensions whose contents are segmented into chapters.
///
/// Files with any other extension still appear in the library, but load as
/// books with zero chapters.
pub const TEXT_EXTENSIONS: &[&str] = &["txt"];

/// Check whether a path has a recognized plain-text extension.
///
/// The comparison is ASCII case-insensitive, so `Novel.TXT` counts.
pub fn has_text_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            TEXT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Display title for a file or directory: its final path component.
///
/// Falls back to the whole path for paths without one (`/`, `..`).
pub fn display_title(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}

/// Expand a leading `~/` against `$HOME`.
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/"))
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(rest);
    }
    path.to_path_buf()
}

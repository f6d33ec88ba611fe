use std::path::{MAIN_SEPARATOR, Path};

/// Path relative to `root` with every separator turned into `/`.
///
/// Purely textual: paths outside `root` are kept whole, and the filesystem is
/// never consulted.
pub fn normalize_path(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let text = relative.to_string_lossy();
    let normalized = text.replace('\\', "/");
    if MAIN_SEPARATOR == '/' {
        normalized
    } else {
        normalized.replace(MAIN_SEPARATOR, "/")
    }
}

/// Lowercased extension including the dot, or an empty string.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Fence tag for a dotted extension; `text` when there is none.
pub fn language_tag(ext: &str) -> &str {
    match ext.strip_prefix('.').unwrap_or(ext) {
        "" => "text",
        tag => tag,
    }
}

pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

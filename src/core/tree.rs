use crate::core::paths::normalize_path;
use crate::domain::models::{EntryKind, ExclusionConfig};
use crate::infra::file_system::FileSystemProvider;
use log::{debug, warn};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// One-level listing of every directory that holds an original target.
///
/// Directories come in lexicographic order. Children list directories first,
/// then files, and an entry is marked ` (*)` only when it is itself a target.
pub fn generate_project_tree(
    targets: &[PathBuf],
    root: &Path,
    fs: &dyn FileSystemProvider,
) -> String {
    let mut dirs: BTreeMap<String, &Path> = BTreeMap::new();
    for target in targets {
        let parent = target.parent().unwrap_or(target.as_path());
        dirs.insert(parent.to_string_lossy().to_string(), parent);
    }
    debug!("Generating tree for {} directories", dirs.len());

    let selected: HashSet<&Path> = targets.iter().map(PathBuf::as_path).collect();
    let mut output = String::from("Project Tree Context:\n");

    for dir in dirs.values() {
        let display = match normalize_path(dir, root) {
            path if path.is_empty() => ".".to_string(),
            path => path,
        };
        output.push_str(&format!("\nDirectory: {}/\n", display));

        let mut entries = match fs.read_directory(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to list {}: {}", dir.display(), e);
                output.push_str("(Error reading directory)\n");
                continue;
            }
        };

        entries.retain(|entry| !ExclusionConfig::is_tree_ignored(&entry.name));
        entries.sort_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then_with(|| compare_names(&a.name, &b.name))
        });

        let last = entries.len().saturating_sub(1);
        for (i, entry) in entries.iter().enumerate() {
            let connector = if i == last { "└── " } else { "├── " };
            let suffix = if entry.kind == EntryKind::Directory { "/" } else { "" };
            let mark = if selected.contains(dir.join(&entry.name).as_path()) {
                " (*)"
            } else {
                ""
            };
            output.push_str(&format!("{}{}{}{}\n", connector, entry.name, suffix, mark));
        }
    }

    output
}

/// Case-insensitive, with byte order breaking ties.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

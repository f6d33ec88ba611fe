use crate::core::paths::file_name_of;
use crate::domain::models::{EntryKind, ExclusionConfig};
use crate::infra::file_system::FileSystemProvider;
use crate::infra::progress::ProgressSink;
use log::{debug, info, warn};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

/// Flattens targets into files, breadth first.
///
/// Each node is visited once, keyed by its canonical path, so duplicates and
/// link cycles terminate. Excluded directory names are never entered. A
/// cancelled run returns the files found so far.
pub fn expand_targets(
    targets: &[PathBuf],
    fs: &dyn FileSystemProvider,
    progress: &mut dyn ProgressSink,
) -> Vec<PathBuf> {
    info!("Expanding {} targets", targets.len());
    let mut files = Vec::new();
    let mut queue: VecDeque<PathBuf> = targets.iter().cloned().collect();
    let mut visited: HashSet<PathBuf> = HashSet::new();

    while let Some(current) = queue.pop_front() {
        if progress.is_cancelled() {
            info!("Expansion cancelled with {} files collected", files.len());
            break;
        }

        let canonical = match fs.canonicalize(&current) {
            Ok(path) => path,
            Err(e) => {
                warn!("Failed to access {}: {}", current.display(), e);
                continue;
            }
        };
        if !visited.insert(canonical) {
            debug!("Already visited: {}", current.display());
            continue;
        }

        let stat = match fs.stat(&current) {
            Ok(stat) => stat,
            Err(e) => {
                warn!("Failed to access {}: {}", current.display(), e);
                continue;
            }
        };

        match stat.kind {
            EntryKind::File => files.push(current),
            EntryKind::Directory => enqueue_children(&current, fs, progress, &mut queue),
        }
    }

    info!("Expanded to {} files", files.len());
    files
}

fn enqueue_children(
    dir: &Path,
    fs: &dyn FileSystemProvider,
    progress: &mut dyn ProgressSink,
    queue: &mut VecDeque<PathBuf>,
) {
    let dir_name = file_name_of(dir);
    if ExclusionConfig::is_excluded_dir(&dir_name) {
        debug!("Skipping excluded directory: {}", dir.display());
        return;
    }

    progress.report(&format!("Scanning dir {}...", dir_name));

    match fs.read_directory(dir) {
        Ok(entries) => {
            for entry in entries {
                queue.push_back(dir.join(entry.name));
            }
        }
        Err(e) => warn!("Failed to list {}: {}", dir.display(), e),
    }
}

use crate::core::content::{decode_text, is_binary};
use crate::core::paths::{extension_of, file_name_of, language_tag, normalize_path};
use crate::domain::models::{BLOCK_SEPARATOR, BuildResult, ExclusionConfig, RenderedBlock};
use crate::infra::file_system::FileSystemProvider;
use crate::infra::progress::ProgressSink;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

enum FileVerdict {
    Processed(String),
    Skipped(String),
}

/// Renders each file as one block, in order, with the extension, size and
/// content checks applied before anything is read.
pub fn render_files(
    files: &[PathBuf],
    root: &Path,
    config: &ExclusionConfig,
    fs: &dyn FileSystemProvider,
    progress: &mut dyn ProgressSink,
) -> BuildResult {
    debug!("Rendering {} files", files.len());
    let mut blocks: Vec<RenderedBlock> = Vec::with_capacity(files.len());
    let mut result = BuildResult::default();

    for path in files {
        if progress.is_cancelled() {
            info!("Rendering cancelled after {} blocks", blocks.len());
            result.cancelled = true;
            break;
        }

        progress.report(&format!("Reading {}...", file_name_of(path)));

        let header_line = format!("File: {}", normalize_path(path, root));
        let body = match render_file(path, config, fs) {
            FileVerdict::Processed(body) => {
                result.processed_count += 1;
                body
            }
            FileVerdict::Skipped(notice) => {
                debug!("Skipped {}: {}", path.display(), notice);
                result.skipped_count += 1;
                notice
            }
        };

        blocks.push(RenderedBlock { header_line, body });
    }

    result.content = blocks
        .iter()
        .map(RenderedBlock::render)
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR);

    info!(
        "Rendered {} files ({} skipped)",
        result.processed_count, result.skipped_count
    );
    result
}

fn render_file(path: &Path, config: &ExclusionConfig, fs: &dyn FileSystemProvider) -> FileVerdict {
    let ext = extension_of(path);
    if config.is_excluded_extension(&ext) {
        return FileVerdict::Skipped(format!("[Skipped: Binary/Asset file ({})]", ext));
    }

    let stat = match fs.stat(path) {
        Ok(stat) => stat,
        Err(e) => {
            warn!("Error reading {}: {}", path.display(), e);
            return FileVerdict::Skipped("[Skipped: Unreadable file]".to_string());
        }
    };

    let size_kb = stat.size_bytes as f64 / 1024.0;
    if size_kb > config.max_file_size_kb as f64 {
        return FileVerdict::Skipped(format!(
            "[Skipped: Size {:.1}KB > {}KB limit]",
            round_tenths(size_kb),
            config.max_file_size_kb
        ));
    }

    let bytes = match fs.read_file(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Error reading {}: {}", path.display(), e);
            return FileVerdict::Skipped("[Skipped: Unreadable file]".to_string());
        }
    };

    if is_binary(&bytes) {
        return FileVerdict::Skipped("[Skipped: Binary content detected]".to_string());
    }

    FileVerdict::Processed(format!(
        "```{}\n{}\n```",
        language_tag(&ext),
        decode_text(&bytes)
    ))
}

/// Ties round up, so 1.25 prints as 1.3 rather than 1.2.
fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

use crate::core::content::estimate_tokens;
use crate::core::expander::expand_targets;
use crate::core::paths::{extension_of, language_tag, normalize_path};
use crate::core::renderer::render_files;
use crate::core::selection::render_selection;
use crate::core::tree::generate_project_tree;
use crate::domain::models::{
    BLOCK_SEPARATOR, ContextOutcome, ContextOutput, ExclusionConfig, SelectionRange, TextDocument,
};
use crate::infra::file_system::FileSystemProvider;
use crate::infra::progress::ProgressSink;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// File mode: tree summary of the original targets, then one block per file
/// of the flattened, deduplicated target list.
pub fn build_context_output(
    targets: &[PathBuf],
    root: &Path,
    config: &ExclusionConfig,
    fs: &dyn FileSystemProvider,
    progress: &mut dyn ProgressSink,
) -> ContextOutcome {
    debug!("Building context output from {} targets", targets.len());

    let tree = if targets.is_empty() {
        None
    } else {
        progress.report("Generating project tree...");
        Some(generate_project_tree(targets, root, fs))
    };

    let files = expand_targets(targets, fs, progress);
    let result = render_files(&files, root, config, fs, progress);
    let cancelled = result.cancelled || progress.is_cancelled();

    if result.processed_count + result.skipped_count == 0 {
        if cancelled {
            info!("Cancelled before any file was collected");
            return ContextOutcome::Cancelled;
        }
        info!("No files matched");
        return ContextOutcome::NothingToDo;
    }

    let content = match tree {
        Some(tree) => format!("{}{}{}", tree.trim_end(), BLOCK_SEPARATOR, result.content),
        None => result.content,
    };
    let token_count = estimate_tokens(&content);
    info!(
        "Built context with {} files, {} skipped, ~{} tokens",
        result.processed_count, result.skipped_count, token_count
    );

    ContextOutcome::Ready(ContextOutput {
        content,
        processed_count: result.processed_count,
        skipped_count: result.skipped_count,
        token_count,
        cancelled,
    })
}

/// Selection mode; `None` when nothing is selected.
pub fn build_selection_output(
    document: &TextDocument,
    root: &Path,
    ranges: &[SelectionRange],
) -> Option<ContextOutput> {
    let display_path = normalize_path(&document.path, root);
    let ext = extension_of(&document.path);
    let content = render_selection(&display_path, language_tag(&ext), ranges)?;
    let token_count = estimate_tokens(&content);
    info!("Built selection context, ~{} tokens", token_count);

    Some(ContextOutput {
        content,
        processed_count: 0,
        skipped_count: 0,
        token_count,
        cancelled: false,
    })
}

pub fn format_summary(output: &ContextOutput) -> String {
    let mut message = format!("Copied {} files", output.processed_count);
    if output.skipped_count > 0 {
        message.push_str(&format!(" ({} skipped)", output.skipped_count));
    }
    message.push_str(&format!(" (~{} tokens).", output.token_count));
    message
}

use crate::domain::models::{Position, TextDocument};
use crate::infra::comment::CommentSynthesizer;
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderOutcome {
    Inserted,
    AlreadyPresent,
    /// The edit failed and the document was left as it was.
    Failed,
}

/// Stamps `normalized_path` as a comment on the first line.
///
/// A no-op when line 1 already mentions the path. The edit is applied to a
/// copy and committed only once commenting succeeded, so a failure never
/// leaves half an edit behind. The caret moves down one line with the text.
pub fn insert_path_header(
    document: &mut TextDocument,
    normalized_path: &str,
    commenter: &dyn CommentSynthesizer,
) -> HeaderOutcome {
    let first_line = document.line(0).unwrap_or_default();
    if first_line.contains(normalized_path) {
        info!("Path header already present in {}", document.path.display());
        return HeaderOutcome::AlreadyPresent;
    }

    let mut edited = document.clone();
    let inserted = format!("{}{}", normalized_path, document.line_ending());
    edited.text.insert_str(0, &inserted);

    if let Err(e) = commenter.comment_line(&mut edited, 0) {
        warn!(
            "Add path header failed for {}: {}",
            document.path.display(),
            e
        );
        return HeaderOutcome::Failed;
    }

    edited.caret = Position::new(document.caret.line + 1, document.caret.character);
    *document = edited;
    info!("Path header added to {}", document.path.display());
    HeaderOutcome::Inserted
}

use crate::domain::models::{Position, SelectionRange, TextDocument};
use log::debug;

pub const GAP_MARKER: &str = "\n\n... (Gap) ...\n\n";

/// Formats selections as one line-numbered fenced block, in document order.
///
/// Returns `None` when there is nothing selected.
pub fn render_selection(
    display_path: &str,
    language: &str,
    ranges: &[SelectionRange],
) -> Option<String> {
    if ranges.iter().all(|range| range.text.is_empty()) {
        debug!("Selection is empty");
        return None;
    }

    let mut ordered: Vec<&SelectionRange> = ranges.iter().collect();
    ordered.sort_by_key(|range| range.start);

    let body = ordered
        .iter()
        .map(|range| number_lines(range))
        .collect::<Vec<_>>()
        .join(GAP_MARKER);

    debug!("Rendered {} selection ranges", ordered.len());
    Some(format!(
        "File: {} (Selection)\n```{}\n{}\n```",
        display_path, language, body
    ))
}

/// Whole-line selection over 1-based inclusive lines, clamped to the document.
pub fn select_lines(document: &TextDocument, first: usize, last: usize) -> Option<SelectionRange> {
    let start = first.checked_sub(1)?;
    let lines: Vec<&str> = document.text.split('\n').collect();
    if start >= lines.len() {
        return None;
    }
    let end = last.min(lines.len()).max(first);

    Some(SelectionRange {
        start: Position::new(start, 0),
        text: lines[start..end].join("\n"),
    })
}

fn number_lines(range: &SelectionRange) -> String {
    let first_line = range.start.line + 1;
    range
        .text
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            format!("{:>4} | {}", first_line + i, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

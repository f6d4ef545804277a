//! Choosing a column inside the line or textblock segment a relocation
//! has settled on.

use markdown_twinview_config::SyncConfig;
use serde::Serialize;

use super::info::CursorInfo;
use crate::parsing::rope::floor_char_boundary;

/// Which strategy placed the caret inside the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnMatch {
    /// Resolved structurally by a block anchor.
    Anchor,
    EndOfLine,
    Context,
    Word,
    Percent,
    /// Nothing to resolve against (document start).
    None,
}

/// `round(percent × len)`, clamped to `len`.
pub fn percent_estimate(percent: f64, len: usize) -> usize {
    let estimate = (percent.clamp(0.0, 1.0) * len as f64).round();
    (estimate as usize).min(len)
}

/// Start of the occurrence of `needle` in `haystack` nearest to `target`.
fn nearest_occurrence(haystack: &str, needle: &str, target: usize) -> Option<usize> {
    haystack
        .match_indices(needle)
        .map(|(i, _)| i)
        .min_by_key(|i| i.abs_diff(target))
}

/// Resolves the caret column inside the markup-free `text` of the target
/// line: end-of-line snap, then context window, then word, then percent.
pub fn resolve_column(info: &CursorInfo, text: &str, config: &SyncConfig) -> (usize, ColumnMatch) {
    let len = text.len();
    if info.percent_in_line >= config.eol_snap_threshold {
        return (len, ColumnMatch::EndOfLine);
    }

    let estimate = percent_estimate(info.percent_in_line, len);

    if info.context_len() >= config.min_context_len {
        let window = format!("{}{}", info.context_before, info.context_after);
        let before = info.context_before.len();
        if let Some(start) = nearest_occurrence(text, &window, estimate.saturating_sub(before)) {
            return (start + before, ColumnMatch::Context);
        }
    }

    if !info.word_at_cursor.is_empty() {
        let word = &info.word_at_cursor;
        let target = estimate.saturating_sub(info.offset_in_word);
        if let Some(start) = nearest_occurrence(text, word, target) {
            let column = start + info.offset_in_word.min(word.len());
            return (floor_char_boundary(text, column), ColumnMatch::Word);
        }
    }

    (floor_char_boundary(text, estimate), ColumnMatch::Percent)
}

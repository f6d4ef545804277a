//! Relocating a [`CursorInfo`] in either representation.
//!
//! Strategies run in a fixed order and the first that succeeds wins:
//! block anchor, exact line, closest line, then column resolution inside
//! the chosen line. The locator never fails; the worst case is document
//! start, reported through [`Located`].

use log::debug;
use markdown_twinview_config::SyncConfig;
use serde::Serialize;
use xi_rope::Rope;

use super::anchor::{resolve_in_text, resolve_in_tree};
use super::column::{ColumnMatch, resolve_column};
use super::info::CursorInfo;
use crate::parsing::line_layout;
use crate::parsing::rope::TextLines;
use crate::tree::{Tree, Visit};

/// Which strategy chose the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineMatch {
    Anchor,
    Exact,
    Closest,
    DocumentStart,
}

/// Where a relocation landed and how it got there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Located {
    /// Byte offset for text, flat position for trees.
    pub position: usize,
    pub line_match: LineMatch,
    pub column_match: ColumnMatch,
}

impl Located {
    fn anchored(position: usize) -> Self {
        Self {
            position,
            line_match: LineMatch::Anchor,
            column_match: ColumnMatch::Anchor,
        }
    }

    fn document_start(position: usize) -> Self {
        Self {
            position,
            line_match: LineMatch::DocumentStart,
            column_match: ColumnMatch::None,
        }
    }
}

/// Relocates `info` in a raw markdown buffer.
pub fn locate_in_text(info: &CursorInfo, rope: &Rope, config: &SyncConfig) -> Located {
    if rope.len() == 0 {
        return Located::document_start(0);
    }

    let lines = TextLines::new(rope);
    let wanted = info.source_line.max(1) - 1;
    let (idx, line_match) = if wanted < lines.len() {
        (wanted, LineMatch::Exact)
    } else {
        (lines.len() - 1, LineMatch::Closest)
    };

    if let Some(anchor) = &info.block_anchor {
        if let Some(position) = resolve_in_text(anchor, &lines, idx) {
            return Located::anchored(position);
        }
        debug!("block anchor {anchor:?} has no match near line {}", idx + 1);
    }

    let content = lines.content(idx);
    let prefix = line_layout(&lines, idx).prefix_len.min(content.len());
    let (column, column_match) = resolve_column(info, &content[prefix..], config);
    let line_start = lines.get(idx).map_or(0, |l| l.span.start);

    Located {
        position: line_start + prefix + column,
        line_match,
        column_match,
    }
}

/// Picks the index of the candidate line closest to `target`.
///
/// An exact hit wins outright. Otherwise the nearest preceding candidate is
/// kept unless the nearest following one is strictly closer and the
/// preceding one is more than `forward_bias` lines away. Ties go to the
/// candidate seen first.
pub fn pick_closest(candidates: &[usize], target: usize, forward_bias: usize) -> Option<usize> {
    if let Some(i) = candidates.iter().position(|&l| l == target) {
        return Some(i);
    }

    let mut preceding: Option<usize> = None;
    let mut following: Option<usize> = None;
    for (i, &line) in candidates.iter().enumerate() {
        if line < target && preceding.is_none_or(|p| line > candidates[p]) {
            preceding = Some(i);
        }
        if line > target && following.is_none_or(|f| line < candidates[f]) {
            following = Some(i);
        }
    }

    match (preceding, following) {
        (Some(p), Some(f)) => {
            let back = target - candidates[p];
            let ahead = candidates[f] - target;
            if ahead < back && back > forward_bias {
                Some(f)
            } else {
                Some(p)
            }
        }
        (p, f) => p.or(f),
    }
}

/// A tagged place in the tree a closest-line match can land on.
struct Candidate<'a> {
    visit: Visit<'a>,
    /// Segment for textblocks; `None` for containers and atoms.
    segment: Option<usize>,
    line: usize,
}

fn candidates(tree: &Tree) -> Vec<Candidate<'_>> {
    let mut out = vec![];
    for visit in tree.walk() {
        if visit.node.source_line.is_none() {
            continue;
        }
        if visit.node.is_textblock() {
            for segment in 0..visit.node.segment_count() {
                if let Some(line) = visit.node.segment_line(segment) {
                    out.push(Candidate {
                        visit: visit.clone(),
                        segment: Some(segment),
                        line,
                    });
                }
            }
        } else if let Some(line) = visit.node.source_line {
            out.push(Candidate {
                visit,
                segment: None,
                line,
            });
        }
    }
    out
}

/// Relocates `info` in a tree.
pub fn locate_in_tree(info: &CursorInfo, tree: &Tree, config: &SyncConfig) -> Located {
    if tree.textblocks().is_empty() {
        return Located::document_start(0);
    }

    let target = info.source_line.max(1);
    if let Some(anchor) = &info.block_anchor {
        if let Some(position) = resolve_in_tree(anchor, tree, target) {
            return Located::anchored(position);
        }
        debug!("block anchor {anchor:?} has no match near line {target}");
    }

    let candidates = candidates(tree);
    let exact = candidates
        .iter()
        .find(|c| c.segment.is_some() && c.line == target);
    let (chosen, line_match) = match exact {
        Some(c) => (c, LineMatch::Exact),
        None => {
            let lines: Vec<usize> = candidates.iter().map(|c| c.line).collect();
            match pick_closest(&lines, target, config.closest_line_forward_bias) {
                Some(i) => (&candidates[i], LineMatch::Closest),
                None => return Located::document_start(tree.start_position()),
            }
        }
    };

    // Containers and atoms hand over to the first editable text they hold.
    let (block, segment) = match chosen.segment {
        Some(segment) => (chosen.visit.clone(), segment),
        None => match tree
            .first_textblock_under(&chosen.visit)
            .or_else(|| tree.nearest_textblock(chosen.visit.start))
        {
            Some(block) => (block, 0),
            None => return Located::document_start(tree.start_position()),
        },
    };

    let range = block.node.segment_range(segment).unwrap_or(0..0);
    let (column, column_match) = resolve_column(info, &block.node.text[range.clone()], config);

    Located {
        position: block.content_start() + range.start + column,
        line_match,
        column_match,
    }
}

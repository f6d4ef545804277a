use markdown_twinview_engine::parsing::blocks::{is_fence_delimiter, row_cells, table_at};
use markdown_twinview_engine::parsing::line_layout;
use markdown_twinview_engine::parsing::rope::TextLines;
use markdown_twinview_engine::{
    SyncConfig, Tree, extract_from_text, extract_from_tree, locate_in_text, locate_in_tree, parse,
};
use pretty_assertions::assert_eq;
use xi_rope::Rope;

/// Markup-free inline content, so tree text and stripped text lines agree.
const DOC: &str = "# Heading one

Some paragraph text, with punctuation.
Second line of it.

- item alpha
- [ ] task beta
  1. nested gamma

> quoted delta
> more quote

```rust
let x = 1;
    indented code
```

| Fruit | Count |
|:------|------:|
| apple | 3 |
| pear | 12 |

日本語のテキスト
";

fn char_boundaries(s: &str) -> impl Iterator<Item = usize> + '_ {
    s.char_indices().map(|(i, _)| i).chain(std::iter::once(s.len()))
}

/// Every caret position inside every textblock of `tree`.
fn tree_positions(tree: &Tree) -> Vec<usize> {
    tree.textblocks()
        .iter()
        .flat_map(|v| {
            let start = v.content_start();
            char_boundaries(&v.node.text)
                .map(move |i| start + i)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Text positions at or after each line's structural prefix. Table rows
/// contribute only positions inside cell content and separators none.
/// With `textblocks_only`, lines that have no tree counterpart (blank
/// lines, fence delimiters) are skipped too.
fn text_positions(text: &str, textblocks_only: bool) -> Vec<usize> {
    let lines = TextLines::from_text(text);
    let mut out = vec![];
    for idx in 0..lines.len() {
        let Some(line) = lines.get(idx) else { continue };
        let content = line.content();
        let start = line.span.start;

        if let Some(table) = table_at(&lines, idx) {
            if table.row_of_line(idx).is_some() {
                for cell in row_cells(&lines, idx) {
                    let cell_text = &content[cell.content.start..cell.content.end];
                    out.extend(char_boundaries(cell_text).map(|i| start + cell.content.start + i));
                }
            }
            continue;
        }

        if textblocks_only && (content.trim().is_empty() || is_fence_delimiter(&lines, idx)) {
            continue;
        }

        let prefix = line_layout(&lines, idx).prefix_len;
        out.extend(char_boundaries(&content[prefix..]).map(|i| start + prefix + i));
    }
    out
}

#[test]
fn text_to_text_is_identity() {
    let rope = Rope::from(DOC);
    let config = SyncConfig::default();
    for pos in text_positions(DOC, false) {
        let info = extract_from_text(&rope, pos, &config);
        let located = locate_in_text(&info, &rope, &config);
        assert_eq!(located.position, pos, "{info:?}");
    }
}

#[test]
fn tree_to_tree_is_identity() {
    let tree = parse(DOC);
    let config = SyncConfig::default();
    for pos in tree_positions(&tree) {
        let info = extract_from_tree(&tree, pos, &config);
        let located = locate_in_tree(&info, &tree, &config);
        assert_eq!(located.position, pos, "{info:?}");
    }
}

#[test]
fn tree_to_text_and_back_is_identity() {
    let tree = parse(DOC);
    let rope = Rope::from(DOC);
    let config = SyncConfig::default();

    for pos in tree_positions(&tree) {
        let info = extract_from_tree(&tree, pos, &config);
        let in_text = locate_in_text(&info, &rope, &config).position;

        let back = extract_from_text(&rope, in_text, &config);
        let located = locate_in_tree(&back, &tree, &config);
        assert_eq!(located.position, pos, "tree {info:?} -> text {back:?}");
    }
}

#[test]
fn text_to_tree_and_back_is_identity() {
    let tree = parse(DOC);
    let rope = Rope::from(DOC);
    let config = SyncConfig::default();

    for pos in text_positions(DOC, true) {
        let info = extract_from_text(&rope, pos, &config);
        let in_tree = locate_in_tree(&info, &tree, &config).position;

        let back = extract_from_tree(&tree, in_tree, &config);
        let located = locate_in_text(&back, &rope, &config);
        assert_eq!(located.position, pos, "text {info:?} -> tree {back:?}");
    }
}

#[test]
fn text_positions_cover_the_document() {
    let all = text_positions(DOC, false);
    assert!(all.contains(&DOC.find("beta").unwrap()));
    assert!(all.contains(&DOC.find("indented").unwrap()));
    assert!(all.contains(&DOC.find("12").unwrap()));
    assert!(!all.contains(&DOC.find("|:--").unwrap()));

    let fence = DOC.find("```rust").unwrap();
    assert!(all.contains(&fence));
    assert!(!text_positions(DOC, true).contains(&fence));
}

use markdown_twinview_engine::cursor::anchor::clamp_index;
use markdown_twinview_engine::cursor::{ColumnMatch, LineMatch};
use markdown_twinview_engine::parsing::blocks::kinds::TableRow;
use markdown_twinview_engine::{
    BlockAnchor, CursorInfo, Node, NodeKind, NodeType, SyncConfig, Tree, extract_from_text,
    extract_from_tree, locate_in_text, locate_in_tree, parse,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use xi_rope::Rope;

fn textblock_containing(tree: &Tree, needle: &str) -> usize {
    tree.textblocks()
        .iter()
        .find_map(|v| v.node.text.find(needle).map(|i| v.content_start() + i))
        .unwrap()
}

#[test]
fn code_fence_caret_crosses_both_ways() {
    let text = "a\n```\nline0\nline1\n```\nb";
    let tree = parse(text);
    let rope = Rope::from(text);
    let config = SyncConfig::default();

    let caret = textblock_containing(&tree, "line1") + 3;
    let info = extract_from_tree(&tree, caret, &config);
    assert_eq!(info.node_type, NodeType::CodeBlock);
    assert_eq!(info.source_line, 4);
    assert_eq!(
        info.block_anchor,
        Some(BlockAnchor::Code {
            line_in_block: 1,
            column_in_line: 3
        })
    );

    let located = locate_in_text(&info, &rope, &config);
    assert_eq!(located.position, text.find("line1").unwrap() + 3);
    assert_eq!(located.line_match, LineMatch::Anchor);

    let back = extract_from_text(&rope, located.position, &config);
    assert_eq!(back.block_anchor, info.block_anchor);
    assert_eq!(locate_in_tree(&back, &tree, &config).position, caret);
}

#[rstest]
#[case("0123456789", 10)]
#[case("abcdefg", 7)]
fn near_end_snaps_to_line_end(#[case] line: &str, #[case] expected: usize) {
    let config = SyncConfig::default();
    let info = CursorInfo {
        percent_in_line: 0.995,
        ..CursorInfo::default()
    };

    let located = locate_in_text(&info, &Rope::from(line), &config);
    assert_eq!(located.position, expected);
    assert_eq!(located.column_match, ColumnMatch::EndOfLine);

    let tree = parse(line);
    let located = locate_in_tree(&info, &tree, &config);
    assert_eq!(located.position, 1 + expected);
    assert_eq!(located.column_match, ColumnMatch::EndOfLine);
}

#[test]
fn pipe_inside_code_span_does_not_split() {
    let row = "| `a|b` | C |";
    let cells: Vec<&str> = TableRow::split(row)
        .iter()
        .map(|c| &row[c.content.start..c.content.end])
        .collect();
    assert_eq!(cells, vec!["`a|b`", "C"]);

    let text = format!("{row}\n|---|---|\n| 1 | 2 |");
    let info = extract_from_text(&Rope::from(text.as_str()), row.find('C').unwrap(), &SyncConfig::default());
    assert_eq!(
        info.block_anchor,
        Some(BlockAnchor::Table {
            row: 0,
            col: 1,
            offset_in_cell: 0
        })
    );
}

#[test]
fn table_anchor_clamps_to_smaller_table() {
    let wide = "| a | b | c | d |\n|---|---|---|---|\n| 1 | 2 | 3 | 4 |\n| 5 | 6 | 7 | 8 |";
    let narrow = "| a | b |\n|---|---|\n| 1 | 2 |\n| 5 | 6 |";
    let config = SyncConfig::default();

    let info = extract_from_text(&Rope::from(wide), wide.find('8').unwrap(), &config);
    assert_eq!(
        info.block_anchor,
        Some(BlockAnchor::Table {
            row: 2,
            col: 3,
            offset_in_cell: 0
        })
    );
    assert_eq!(clamp_index(3, 2), Some(1));

    let located = locate_in_text(&info, &Rope::from(narrow), &config);
    assert_eq!(located.position, narrow.find('6').unwrap());
    assert_eq!(located.line_match, LineMatch::Anchor);

    let tree = parse(narrow);
    let located = locate_in_tree(&info, &tree, &config);
    assert_eq!(located.position, textblock_containing(&tree, "6"));
}

#[test]
fn closest_line_prefers_first_preceding_candidate() {
    let tree = Tree::new(vec![
        Node::textblock(NodeKind::Paragraph, "first").with_line(3),
        Node::textblock(NodeKind::Paragraph, "second").with_line(3),
        Node::textblock(NodeKind::Paragraph, "third").with_line(9),
    ]);
    let info = CursorInfo {
        source_line: 6,
        ..CursorInfo::default()
    };

    let located = locate_in_tree(&info, &tree, &SyncConfig::default());
    assert_eq!(located.position, 1);
    assert_eq!(located.line_match, LineMatch::Closest);
}

#[test]
fn past_the_end_lands_on_last_line() {
    let text = "one\ntwo\nthree";
    let info = CursorInfo {
        source_line: 40,
        ..CursorInfo::default()
    };
    let located = locate_in_text(&info, &Rope::from(text), &SyncConfig::default());
    assert_eq!(located.position, text.find("three").unwrap());
    assert_eq!(located.line_match, LineMatch::Closest);
}

#[test]
fn escaped_pipe_in_cell_keeps_caret_on_its_char() {
    let text = "| a \\| b | c |\n|---|---|\n| 1 | 2 |\n";
    let tree = parse(text);
    let rope = Rope::from(text);
    let config = SyncConfig::default();
    let caret = text.find('b').unwrap();
    assert_eq!(caret, 7);

    let info = extract_from_text(&rope, caret, &config);
    assert_eq!(
        info.block_anchor,
        Some(BlockAnchor::Table {
            row: 0,
            col: 0,
            offset_in_cell: 4
        })
    );
    assert_eq!(info.word_at_cursor, "b");
    let located = locate_in_tree(&info, &tree, &config);
    assert_eq!(located.position, textblock_containing(&tree, "b"));
    assert_eq!(located.line_match, LineMatch::Anchor);

    let info = extract_from_tree(&tree, located.position, &config);
    let located = locate_in_text(&info, &rope, &config);
    assert_eq!(located.position, caret);
}

#[rstest]
#[case("the quick brown fox", "quick", " brown", ColumnMatch::Context)]
#[case("the quick red fox", "slow quick", "", ColumnMatch::Word)]
#[case("nothing in common", "", "", ColumnMatch::Percent)]
fn column_degrades_but_stays_on_line(
    #[case] line: &str,
    #[case] before: &str,
    #[case] after: &str,
    #[case] expected: ColumnMatch,
) {
    let text = format!("intro\n{line}\noutro");
    let info = CursorInfo {
        source_line: 2,
        word_at_cursor: "quick".into(),
        offset_in_word: 5,
        context_before: before.into(),
        context_after: after.into(),
        percent_in_line: 0.5,
        ..CursorInfo::default()
    };

    let located = locate_in_text(&info, &Rope::from(text.as_str()), &SyncConfig::default());
    assert_eq!(located.column_match, expected);
    assert_eq!(located.line_match, LineMatch::Exact);
    let line_start = "intro\n".len();
    assert!((line_start..=line_start + line.len()).contains(&located.position));
}

#[test]
fn empty_targets_go_to_document_start() {
    let info = CursorInfo {
        source_line: 5,
        ..CursorInfo::default()
    };
    let config = SyncConfig::default();

    let located = locate_in_text(&info, &Rope::from(""), &config);
    assert_eq!(located.position, 0);
    assert_eq!(located.line_match, LineMatch::DocumentStart);

    let located = locate_in_tree(&info, &Tree::default(), &config);
    assert_eq!(located.line_match, LineMatch::DocumentStart);
}

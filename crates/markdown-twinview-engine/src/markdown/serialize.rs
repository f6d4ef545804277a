use std::cmp::Reverse;
use std::sync::OnceLock;

use regex::Regex;

use crate::tree::{Alignment, Mark, MarkKind, Node, NodeKind, Tree};

/// Prints `tree` as normalized markdown: blocks separated by blank lines,
/// `-` bullets, fenced code and padded pipe tables.
pub fn serialize(tree: &Tree) -> String {
    let lines = blocks(&tree.root().children, true);
    if lines.is_empty() {
        return String::new();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn blocks(nodes: &[Node], loose: bool) -> Vec<String> {
    let mut out = vec![];
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 && loose {
            out.push(String::new());
        }
        out.extend(block(node));
    }
    out
}

fn block(node: &Node) -> Vec<String> {
    match &node.kind {
        NodeKind::Paragraph => inline(node, false)
            .split('\n')
            .map(escape_block_start)
            .collect(),
        NodeKind::Heading { level } => {
            let hashes = "#".repeat(usize::from(*level));
            let text = escape_block_start(&inline(node, false).replace('\n', " "));
            if text.is_empty() {
                vec![hashes]
            } else {
                vec![format!("{hashes} {text}")]
            }
        }
        NodeKind::CodeBlock { info, .. } => {
            let fence = "`".repeat(longest_run(&node.text, '`').max(2) + 1);
            let mut out = vec![format!("{fence}{}", info.as_deref().unwrap_or(""))];
            if !node.text.is_empty() {
                out.extend(node.text.split('\n').map(str::to_string));
            }
            out.push(fence);
            out
        }
        NodeKind::HtmlBlock => node.text.split('\n').map(str::to_string).collect(),
        NodeKind::ThematicBreak => vec!["***".to_string()],
        NodeKind::BlockQuote { alert } => {
            let mut inner = vec![];
            if let Some(alert) = alert {
                inner.push(format!("[!{alert}]"));
            }
            inner.extend(blocks(&node.children, true));
            inner
                .into_iter()
                .map(|l| if l.is_empty() { ">".to_string() } else { format!("> {l}") })
                .collect()
        }
        NodeKind::List {
            ordered,
            start,
            tight,
        } => list(&node.children, *ordered, start.unwrap_or(1), *tight),
        NodeKind::Table { alignments } => table(&node.children, alignments),
        NodeKind::TableCell => vec![cell(node)],
        NodeKind::Document | NodeKind::ListItem { .. } | NodeKind::TableRow { .. } => {
            blocks(&node.children, true)
        }
    }
}

fn list(items: &[Node], ordered: bool, start: u64, tight: bool) -> Vec<String> {
    let mut out = vec![];
    for (i, item) in items.iter().enumerate() {
        if i > 0 && !tight {
            out.push(String::new());
        }
        let marker = if ordered {
            format!("{}.", start + i as u64)
        } else {
            "-".to_string()
        };
        let task = match item.kind {
            NodeKind::ListItem { task: Some(true) } => "[x] ",
            NodeKind::ListItem { task: Some(false) } => "[ ] ",
            _ => "",
        };
        let indent = " ".repeat(marker.len() + 1);

        let body = blocks(&item.children, !tight);
        let mut lines = body.into_iter();
        match lines.next() {
            Some(first) => out.push(format!("{marker} {task}{first}").trim_end().to_string()),
            None => out.push(format!("{marker} {task}").trim_end().to_string()),
        }
        for line in lines {
            if line.is_empty() {
                out.push(line);
            } else {
                out.push(format!("{indent}{line}"));
            }
        }
    }
    out
}

fn table(rows: &[Node], alignments: &[Alignment]) -> Vec<String> {
    let mut out = vec![];
    for (i, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row.children.iter().map(cell).collect();
        out.push(format!("| {} |", cells.join(" | ")));
        if i == 0 {
            let columns = alignments.len().max(cells.len()).max(1);
            let seps: Vec<&str> = (0..columns)
                .map(|c| match alignments.get(c) {
                    Some(Alignment::Left) => ":--",
                    Some(Alignment::Center) => ":-:",
                    Some(Alignment::Right) => "--:",
                    _ => "---",
                })
                .collect();
            out.push(format!("| {} |", seps.join(" | ")));
        }
    }
    out
}

fn longest_run(s: &str, c: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for ch in s.chars() {
        if ch == c {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Renders a textblock's text with its marks as inline markdown. Inside
/// table cells pipes in code spans are escaped too.
fn inline(node: &Node, in_cell: bool) -> String {
    let text = &node.text;
    let mut marks: Vec<&Mark> = node
        .marks
        .iter()
        .filter(|m| {
            m.range.start <= m.range.end
                && text.is_char_boundary(m.range.start)
                && text.is_char_boundary(m.range.end)
        })
        .collect();
    marks.sort_by_key(|m| (m.range.start, Reverse(m.range.end)));
    let mut stops: Vec<usize> = marks
        .iter()
        .flat_map(|m| [m.range.start, m.range.end])
        .chain([0, text.len()])
        .collect();
    stops.sort_unstable();
    stops.dedup();

    let mut out = String::with_capacity(text.len());
    let mut open: Vec<&Mark> = vec![];
    let mut next = 0;
    for (i, &at) in stops.iter().enumerate() {
        while open.last().is_some_and(|m| m.range.end <= at) {
            if let Some(mark) = open.pop() {
                out.push_str(&closer(mark, text));
            }
        }
        while let Some(&mark) = marks.get(next).filter(|m| m.range.start == at) {
            next += 1;
            // A bang right before a link would turn it into an image.
            if matches!(mark.kind, MarkKind::Link { .. }) && out.ends_with('!') {
                out.pop();
                out.push_str("\\!");
            }
            out.push_str(&opener(mark, text));
            if mark.range.end == at {
                out.push_str(&closer(mark, text));
            } else {
                open.push(mark);
            }
        }
        let Some(&end) = stops.get(i + 1) else {
            continue;
        };
        let chunk = &text[at..end];
        if open.iter().any(|m| m.kind == MarkKind::Code) {
            if in_cell {
                out.push_str(&chunk.replace('|', "\\|"));
            } else {
                out.push_str(chunk);
            }
        } else {
            out.push_str(&escape_inline(chunk));
        }
    }
    while let Some(mark) = open.pop() {
        out.push_str(&closer(mark, text));
    }
    out
}

fn opener(mark: &Mark, text: &str) -> String {
    match &mark.kind {
        MarkKind::Emphasis => "*".to_string(),
        MarkKind::Strong => "**".to_string(),
        MarkKind::Strikethrough => "~~".to_string(),
        MarkKind::Code => {
            let (fence, pad) = code_fence(&text[mark.range.clone()]);
            if pad { format!("{fence} ") } else { fence }
        }
        MarkKind::Link { .. } => "[".to_string(),
        MarkKind::Image { .. } => "![".to_string(),
    }
}

fn closer(mark: &Mark, text: &str) -> String {
    match &mark.kind {
        MarkKind::Emphasis => "*".to_string(),
        MarkKind::Strong => "**".to_string(),
        MarkKind::Strikethrough => "~~".to_string(),
        MarkKind::Code => {
            let (fence, pad) = code_fence(&text[mark.range.clone()]);
            if pad { format!(" {fence}") } else { fence }
        }
        MarkKind::Link { dest, title } | MarkKind::Image { dest, title } => {
            format!("]({})", destination(dest, title))
        }
    }
}

/// Backtick fence for a code span around `content`, and whether the
/// content needs a space of padding on each side.
fn code_fence(content: &str) -> (String, bool) {
    let fence = "`".repeat(longest_run(content, '`') + 1);
    let pad = content.starts_with(['`', ' ']) || content.ends_with(['`', ' ']);
    (fence, pad)
}

fn destination(dest: &str, title: &str) -> String {
    let dest = if dest.is_empty() || dest.contains([' ', '(', ')', '<', '>']) {
        format!("<{}>", dest.replace('<', "\\<").replace('>', "\\>"))
    } else {
        dest.to_string()
    };
    if title.is_empty() {
        dest
    } else {
        format!("{dest} \"{}\"", title.replace('"', "\\\""))
    }
}

fn escape_inline(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(
            ch,
            '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '~' | '&' | '|'
        ) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Escapes characters that would start a block construct at the
/// beginning of an already inline-escaped line.
fn escape_block_start(escaped: &str) -> String {
    static BLOCK_START: OnceLock<Regex> = OnceLock::new();
    let block_start = BLOCK_START
        .get_or_init(|| Regex::new(r"^(?:[#+=-]|\d+[.)])").expect("Invalid block start regex"));

    match block_start.find(escaped) {
        Some(m) if m.len() == 1 => format!("\\{escaped}"),
        Some(m) => format!("{}\\{}", &escaped[..m.len() - 1], &escaped[m.len() - 1..]),
        None => escaped.to_string(),
    }
}

fn cell(node: &Node) -> String {
    inline(node, true).replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parse;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const SAMPLE: &str = "# Title\n\nSome *text*\nhere.\n\n- one\n- [x] two\n  - nested\n\n\
                          ```rust\nfn main() {}\n```\n\n| A | B |\n|---|:-:|\n| 1 | 2 |\n";

    #[test]
    fn prints_normalized_markdown() {
        assert_snapshot!(serialize(&parse(SAMPLE)), @r"
        # Title

        Some *text*
        here.

        - one
        - [x] two
          - nested

        ```rust
        fn main() {}
        ```

        | A | B |
        | --- | :-: |
        | 1 | 2 |
        ");
    }

    #[rstest]
    #[case(SAMPLE)]
    #[case("> quoted\n>\n> - item\n")]
    #[case("> [!WARNING]\n> Careful\n")]
    #[case("1. a\n\n2. b\n\n   more b\n")]
    #[case("3. three\n4. four\n")]
    #[case("````\n```\ninner\n```\n````\n")]
    #[case("a\n\n***\n\nb\n")]
    #[case("- [ ] open\n- [x] done\n")]
    fn reparse_keeps_shape(#[case] text: &str) {
        let tree = parse(text);
        let again = parse(&serialize(&tree));
        assert!(
            tree.root().same_shape(again.root()),
            "{}\n---\n{}",
            tree.dump(),
            again.dump()
        );
    }

    #[rstest]
    #[case("a*b*", r"a\*b\*")]
    #[case("# not heading", r"\# not heading")]
    #[case("- not list", r"\- not list")]
    #[case("12. not list", r"12\. not list")]
    #[case("x | y", r"x \| y")]
    #[case("plain", "plain")]
    fn escapes_prose(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_block_start(&escape_inline(input)), expected);
    }

    #[test]
    fn escaped_prose_parses_back() {
        let tree = crate::tree::Tree::new(vec![Node::textblock(
            NodeKind::Paragraph,
            "1. *odd* <text> | [link]",
        )]);
        let again = parse(&serialize(&tree));
        assert_eq!(again.root().children[0].text, "1. *odd* <text> | [link]");
    }

    #[rstest]
    #[case("Some **bold** and [a link](http://x.y) and `code`.\n")]
    #[case("# A *quiet* ~~loud~~ title\n")]
    #[case("![logo](<a b.png> \"The \\\"logo\\\"\") and ``tick ` inside``\n")]
    #[case("| *a* | `b` |\n| --- | --- |\n")]
    #[case("- [x] done *today*\n")]
    #[case("Wow\\![site](https://x.y)\n")]
    fn inline_markup_is_printed_back(#[case] text: &str) {
        assert_eq!(serialize(&parse(text)), text);
    }

    #[test]
    fn marks_follow_tree_edits() {
        let mut tree = parse("Some **bold** text.\n");
        let pos = tree.textblocks()[0].content_start() + "Some bold".len();
        assert_eq!(tree.insert_text(pos, "er"), Some(pos + 2));
        let start = tree.textblocks()[0].content_start();
        tree.insert_text(start, "X");
        assert_eq!(serialize(&tree), "XSome **bolder** text.\n");
    }

    #[test]
    fn empty_tree_is_empty_text() {
        assert_eq!(serialize(&crate::tree::Tree::default()), "");
    }
}

//! Human-readable tree dumps for debugging and snapshot tests.

use std::fmt::Write;

use super::{Node, NodeKind, Tree};
use crate::parsing::rope::preview;

const TEXT_PREVIEW: usize = 40;

impl Tree {
    /// One line per node, indented by depth, with line tags and a preview
    /// of textblock content.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for child in &self.root().children {
            dump_node(child, 0, &mut out);
        }
        out
    }
}

fn dump_node(node: &Node, depth: usize, out: &mut String) {
    let line = node
        .source_line
        .map_or_else(|| "-".to_string(), |l| l.to_string());
    let _ = write!(out, "{}{} @{}", "  ".repeat(depth), label(&node.kind), line);
    if node.is_textblock() {
        let _ = write!(out, " {:?}", preview(&node.text, TEXT_PREVIEW));
    }
    if !node.marks.is_empty() {
        let marks: Vec<String> = node
            .marks
            .iter()
            .map(|m| format!("{} {}..{}", m.kind.name(), m.range.start, m.range.end))
            .collect();
        let _ = write!(out, " [{}]", marks.join(", "));
    }
    out.push('\n');
    for child in &node.children {
        dump_node(child, depth + 1, out);
    }
}

fn label(kind: &NodeKind) -> String {
    match kind {
        NodeKind::Heading { level } => format!("Heading({level})"),
        NodeKind::CodeBlock { info, fenced } => match (info, fenced) {
            (Some(info), _) => format!("CodeBlock({info})"),
            (None, false) => "CodeBlock(indented)".to_string(),
            (None, true) => "CodeBlock".to_string(),
        },
        NodeKind::BlockQuote { alert: Some(alert) } => format!("BlockQuote({alert})"),
        NodeKind::List {
            ordered,
            start,
            tight,
        } => {
            let style = match (ordered, start) {
                (true, Some(n)) => format!("ordered from {n}"),
                (true, None) => "ordered".to_string(),
                (false, _) => "bullet".to_string(),
            };
            let spacing = if *tight { "tight" } else { "loose" };
            format!("List({style}, {spacing})")
        }
        NodeKind::ListItem { task: Some(done) } => {
            format!("ListItem([{}])", if *done { "x" } else { " " })
        }
        NodeKind::Table { alignments } => format!("Table({} cols)", alignments.len()),
        NodeKind::TableRow { header: true } => "TableRow(header)".to_string(),
        other => other.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn dumps_nested_structure() {
        let tree = Tree::new(vec![
            Node::textblock(NodeKind::Heading { level: 2 }, "Title").with_line(1),
            Node::container(
                NodeKind::List {
                    ordered: true,
                    start: Some(3),
                    tight: true,
                },
                vec![Node::container(
                    NodeKind::ListItem { task: Some(true) },
                    vec![Node::textblock(NodeKind::Paragraph, "done")],
                )
                .with_line(3)],
            )
            .with_line(3),
            Node::new(NodeKind::ThematicBreak),
        ]);

        assert_snapshot!(tree.dump(), @r#"
        Heading(2) @1 "Title"
        List(ordered from 3, tight) @3
          ListItem([x]) @3
            Paragraph @- "done"
        ThematicBreak @-
        "#);
    }

    #[test]
    fn long_text_is_previewed() {
        let long = "x".repeat(50);
        let tree = Tree::new(vec![Node::textblock(NodeKind::Paragraph, long).with_line(1)]);
        assert_eq!(
            tree.dump(),
            format!("Paragraph @1 \"{}...\"\n", "x".repeat(40))
        );
    }
}

use pulldown_cmark::{
    Alignment as CmarkAlignment, BlockQuoteKind, CodeBlockKind, Event, Options, Parser, Tag,
};

use crate::tree::{Alignment, Mark, MarkKind, Node, NodeKind, Tree};

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_GFM
}

/// Parses `text` into a tree whose blocks carry 1-indexed line tags.
pub fn parse(text: &str) -> Tree {
    let lines = LineStarts::new(text);
    let mut builder = TreeBuilder::new();
    for (event, range) in Parser::new_ext(text, options()).into_offset_iter() {
        builder.event(event, lines.line_of(range.start));
    }
    builder.finish()
}

/// Byte offsets where each line begins.
struct LineStarts(Vec<usize>);

impl LineStarts {
    fn new(text: &str) -> Self {
        Self(
            std::iter::once(0)
                .chain(text.match_indices('\n').map(|(i, _)| i + 1))
                .collect(),
        )
    }

    /// 1-indexed line containing byte `offset`.
    fn line_of(&self, offset: usize) -> usize {
        self.0.partition_point(|&start| start <= offset).max(1)
    }
}

enum Frame {
    Node { node: Node, implicit: bool },
    /// Inline markup opened at byte `start` of the enclosing textblock.
    Inline { kind: MarkKind, start: usize },
    /// Blocks the tree has no node for; their content flows into the
    /// enclosing node.
    Transparent,
}

struct TreeBuilder {
    stack: Vec<Frame>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame::Node {
                node: Node::new(NodeKind::Document),
                implicit: false,
            }],
        }
    }

    fn event(&mut self, event: Event<'_>, line: usize) {
        match event {
            Event::Start(tag) => self.start(tag, line),
            Event::End(_) => self.end(),
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                self.push_text(&text, line)
            }
            Event::Code(text) => {
                let start = self.open_inline(line);
                self.push_text(&text, line);
                self.close_inline(MarkKind::Code, start);
            }
            Event::SoftBreak | Event::HardBreak => self.push_text("\n", line),
            Event::Rule => {
                self.close_implicit();
                self.attach(Node::new(NodeKind::ThematicBreak).with_line(line));
            }
            Event::TaskListMarker(checked) => {
                if let Some(item) = self.nearest_mut(|n| matches!(n.kind, NodeKind::ListItem { .. }))
                {
                    item.kind = NodeKind::ListItem {
                        task: Some(checked),
                    };
                }
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>, line: usize) {
        let kind = match tag {
            Tag::Paragraph => NodeKind::Paragraph,
            Tag::Heading { level, .. } => NodeKind::Heading { level: level as u8 },
            Tag::BlockQuote(kind) => NodeKind::BlockQuote {
                alert: kind.map(|k| alert_name(k).to_string()),
            },
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => NodeKind::CodeBlock {
                info: Some(info.trim().to_string()).filter(|i| !i.is_empty()),
                fenced: true,
            },
            Tag::CodeBlock(CodeBlockKind::Indented) => NodeKind::CodeBlock {
                info: None,
                fenced: false,
            },
            Tag::HtmlBlock => NodeKind::HtmlBlock,
            Tag::List(start) => NodeKind::List {
                ordered: start.is_some(),
                start,
                tight: true,
            },
            Tag::Item => NodeKind::ListItem { task: None },
            Tag::Table(alignments) => NodeKind::Table {
                alignments: alignments.into_iter().map(alignment).collect(),
            },
            Tag::TableHead => NodeKind::TableRow { header: true },
            Tag::TableRow => NodeKind::TableRow { header: false },
            Tag::TableCell => NodeKind::TableCell,
            Tag::Emphasis => return self.push_inline(MarkKind::Emphasis, line),
            Tag::Strong => return self.push_inline(MarkKind::Strong, line),
            Tag::Strikethrough => return self.push_inline(MarkKind::Strikethrough, line),
            Tag::Link {
                dest_url, title, ..
            } => {
                let kind = MarkKind::Link {
                    dest: dest_url.to_string(),
                    title: title.to_string(),
                };
                return self.push_inline(kind, line);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let kind = MarkKind::Image {
                    dest: dest_url.to_string(),
                    title: title.to_string(),
                };
                return self.push_inline(kind, line);
            }
            _ => {
                self.stack.push(Frame::Transparent);
                return;
            }
        };

        self.close_implicit();
        if kind == NodeKind::Paragraph {
            self.mark_list_loose();
        }
        self.stack.push(Frame::Node {
            node: Node::new(kind).with_line(line),
            implicit: false,
        });
    }

    fn end(&mut self) {
        match self.stack.last() {
            Some(Frame::Transparent) => {
                self.stack.pop();
            }
            Some(Frame::Inline { .. }) => {
                if let Some(Frame::Inline { kind, start }) = self.stack.pop() {
                    self.close_inline(kind, start);
                }
            }
            _ => {
                self.close_implicit();
                self.pop_node();
            }
        }
    }

    fn push_inline(&mut self, kind: MarkKind, line: usize) {
        let start = self.open_inline(line);
        self.stack.push(Frame::Inline { kind, start });
    }

    /// Makes sure a textblock is open and returns its current length.
    fn open_inline(&mut self, line: usize) -> usize {
        self.ensure_textblock(line);
        self.nearest_mut(|_| true).map_or(0, |node| node.text.len())
    }

    fn close_inline(&mut self, kind: MarkKind, start: usize) {
        if let Some(node) = self.nearest_mut(|_| true) {
            let end = node.text.len();
            node.marks.push(Mark {
                kind,
                range: start..end,
            });
        }
    }

    fn push_text(&mut self, text: &str, line: usize) {
        self.ensure_textblock(line);
        if let Some(node) = self.nearest_mut(|_| true) {
            node.text.push_str(text);
        }
    }

    /// Opens an implicit paragraph when text arrives directly inside a
    /// container, as it does in tight list items.
    fn ensure_textblock(&mut self, line: usize) {
        let in_textblock = self
            .stack
            .iter()
            .rev()
            .find_map(|f| match f {
                Frame::Node { node, .. } => Some(node.is_textblock()),
                Frame::Inline { .. } | Frame::Transparent => None,
            })
            .unwrap_or(false);
        if !in_textblock {
            self.stack.push(Frame::Node {
                node: Node::new(NodeKind::Paragraph).with_line(line),
                implicit: true,
            });
        }
    }

    fn close_implicit(&mut self) {
        if matches!(self.stack.last(), Some(Frame::Node { implicit: true, .. })) {
            self.pop_node();
        }
    }

    /// An explicit paragraph directly inside a list item means the list
    /// is loose.
    fn mark_list_loose(&mut self) {
        let mut nodes = self.stack.iter_mut().rev().filter_map(|f| match f {
            Frame::Node { node, .. } => Some(node),
            Frame::Inline { .. } | Frame::Transparent => None,
        });
        if !nodes
            .next()
            .is_some_and(|n| matches!(n.kind, NodeKind::ListItem { .. }))
        {
            return;
        }
        if let Some(list) = nodes.next()
            && let NodeKind::List { tight, .. } = &mut list.kind
        {
            *tight = false;
        }
    }

    fn pop_node(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        if let Some(Frame::Node { mut node, .. }) = self.stack.pop() {
            if matches!(node.kind, NodeKind::CodeBlock { .. } | NodeKind::HtmlBlock)
                && node.text.ends_with('\n')
            {
                node.text.pop();
            }
            node.sort_marks();
            self.attach(node);
        }
    }

    fn attach(&mut self, node: Node) {
        if let Some(parent) = self.nearest_mut(|_| true) {
            parent.children.push(node);
        }
    }

    fn nearest_mut(&mut self, pred: impl Fn(&Node) -> bool) -> Option<&mut Node> {
        self.stack.iter_mut().rev().find_map(|f| match f {
            Frame::Node { node, .. } if pred(node) => Some(node),
            _ => None,
        })
    }

    fn finish(mut self) -> Tree {
        while self.stack.len() > 1 {
            self.end();
        }
        match self.stack.pop() {
            Some(Frame::Node { node, .. }) => Tree::new(node.children),
            _ => Tree::default(),
        }
    }
}

fn alert_name(kind: BlockQuoteKind) -> &'static str {
    match kind {
        BlockQuoteKind::Note => "NOTE",
        BlockQuoteKind::Tip => "TIP",
        BlockQuoteKind::Important => "IMPORTANT",
        BlockQuoteKind::Warning => "WARNING",
        BlockQuoteKind::Caution => "CAUTION",
    }
}

fn alignment(a: CmarkAlignment) -> Alignment {
    match a {
        CmarkAlignment::None => Alignment::None,
        CmarkAlignment::Left => Alignment::Left,
        CmarkAlignment::Center => Alignment::Center,
        CmarkAlignment::Right => Alignment::Right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_blocks_with_line_tags() {
        let text = "# Title\n\
                    \n\
                    Some *text* here\n\
                    and more.\n\
                    \n\
                    - one\n\
                    - [x] two\n  - nested\n\
                    \n\
                    ```rust\n\
                    fn main() {}\n\
                    ```\n\
                    \n\
                    | A | B |\n\
                    |---|:-:|\n\
                    | 1 | 2 |\n";

        assert_snapshot!(parse(text).dump(), @r#"
        Heading(1) @1 "Title"
        Paragraph @3 "Some text here\nand more." [em 5..9]
        List(bullet, tight) @6
          ListItem @6
            Paragraph @6 "one"
          ListItem([x]) @7
            Paragraph @7 "two"
            List(bullet, tight) @8
              ListItem @8
                Paragraph @8 "nested"
        CodeBlock(rust) @10 "fn main() {}"
        Table(2 cols) @14
          TableRow(header) @14
            TableCell @14 "A"
            TableCell @14 "B"
          TableRow @16
            TableCell @16 "1"
            TableCell @16 "2"
        "#);
    }

    #[test]
    fn parses_alerts_and_loose_lists() {
        let text = "> [!NOTE]\n> Be careful.\n\n1. first\n\n2. second\n";

        assert_snapshot!(parse(text).dump(), @r#"
        BlockQuote(NOTE) @1
          Paragraph @2 "Be careful."
        List(ordered from 1, loose) @4
          ListItem @4
            Paragraph @4 "first"
          ListItem @6
            Paragraph @6 "second"
        "#);
    }

    #[test]
    fn inline_markup_becomes_marks() {
        let text = "Some **bold** and [a link](http://x.y) and `code`.\n\n\
                    - ***both*** ~~gone~~ ![alt](i.png \"t\")\n";

        assert_snapshot!(parse(text).dump(), @r#"
        Paragraph @1 "Some bold and a link and code." [strong 5..9, link 14..20, code 25..29]
        List(bullet, tight) @3
          ListItem @3
            Paragraph @3 "both gone alt" [strong 0..4, em 0..4, strike 5..9, image 10..13]
        "#);
        let binding = parse(text);
        let link = &binding.root().children[0].marks[1];
        assert_eq!(
            link.kind,
            MarkKind::Link {
                dest: "http://x.y".to_string(),
                title: String::new()
            }
        );
    }

    #[test]
    fn code_text_drops_final_newline() {
        let tree = parse("```\nline0\nline1\n```\n");
        let code = &tree.root().children[0];
        assert_eq!(code.text, "line0\nline1");
        assert_eq!(code.segment_line(1), Some(3));
    }

    #[test]
    fn indented_code_is_tagged_at_first_line() {
        let tree = parse("para\n\n    code\n");
        let code = &tree.root().children[1];
        assert_eq!(
            code.kind,
            NodeKind::CodeBlock {
                info: None,
                fenced: false
            }
        );
        assert_eq!(code.source_line, Some(3));
        assert_eq!(code.text, "code");
    }

    #[test]
    fn thematic_break_is_an_atom() {
        let tree = parse("a\n\n***\n\nb\n");
        let kinds: Vec<&str> = tree.root().children.iter().map(|n| n.kind.name()).collect();
        assert_eq!(kinds, vec!["Paragraph", "ThematicBreak", "Paragraph"]);
        assert_eq!(tree.root().children[1].source_line, Some(3));
    }

    #[test]
    fn empty_text_is_empty_tree() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn line_starts_are_one_indexed() {
        let lines = LineStarts::new("ab\ncd\n");
        assert_eq!(lines.line_of(0), 1);
        assert_eq!(lines.line_of(2), 1);
        assert_eq!(lines.line_of(3), 2);
        assert_eq!(lines.line_of(6), 3);
    }
}

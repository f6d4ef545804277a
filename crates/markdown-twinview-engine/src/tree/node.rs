use std::ops::Range;

/// Column alignment of a table, as declared by its separator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    None,
    Left,
    Center,
    Right,
}

/// Every node type the rich view knows about.
///
/// The set is closed on purpose: walks `match` on it instead of comparing
/// type-name strings, so a new node type has to be handled everywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Paragraph,
    Heading {
        level: u8,
    },
    CodeBlock {
        info: Option<String>,
        /// Fenced blocks are tagged with their opening fence line; indented
        /// blocks with their first code line.
        fenced: bool,
    },
    HtmlBlock,
    ThematicBreak,
    /// A blockquote; `alert` carries GFM admonitions such as `NOTE`.
    BlockQuote {
        alert: Option<String>,
    },
    List {
        ordered: bool,
        start: Option<u64>,
        tight: bool,
    },
    ListItem {
        task: Option<bool>,
    },
    Table {
        alignments: Vec<Alignment>,
    },
    TableRow {
        header: bool,
    },
    TableCell,
}

/// How a node participates in positions and editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Holds editable plain text directly.
    Textblock,
    /// A leaf without text (occupies one position).
    Atom,
    /// Holds child nodes.
    Container,
}

impl NodeKind {
    pub fn role(&self) -> NodeRole {
        match self {
            NodeKind::Paragraph
            | NodeKind::Heading { .. }
            | NodeKind::CodeBlock { .. }
            | NodeKind::HtmlBlock
            | NodeKind::TableCell => NodeRole::Textblock,
            NodeKind::ThematicBreak => NodeRole::Atom,
            NodeKind::Document
            | NodeKind::BlockQuote { .. }
            | NodeKind::List { .. }
            | NodeKind::ListItem { .. }
            | NodeKind::Table { .. }
            | NodeKind::TableRow { .. } => NodeRole::Container,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Document => "Document",
            NodeKind::Paragraph => "Paragraph",
            NodeKind::Heading { .. } => "Heading",
            NodeKind::CodeBlock { .. } => "CodeBlock",
            NodeKind::HtmlBlock => "HtmlBlock",
            NodeKind::ThematicBreak => "ThematicBreak",
            NodeKind::BlockQuote { .. } => "BlockQuote",
            NodeKind::List { .. } => "List",
            NodeKind::ListItem { .. } => "ListItem",
            NodeKind::Table { .. } => "Table",
            NodeKind::TableRow { .. } => "TableRow",
            NodeKind::TableCell => "TableCell",
        }
    }
}

/// Inline formatting carried by a span of textblock text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkKind {
    Emphasis,
    Strong,
    Strikethrough,
    Code,
    Link { dest: String, title: String },
    Image { dest: String, title: String },
}

impl MarkKind {
    /// Whether text typed right at the end of the span joins it.
    pub fn is_inclusive(&self) -> bool {
        matches!(
            self,
            MarkKind::Emphasis | MarkKind::Strong | MarkKind::Strikethrough
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            MarkKind::Emphasis => "em",
            MarkKind::Strong => "strong",
            MarkKind::Strikethrough => "strike",
            MarkKind::Code => "code",
            MarkKind::Link { .. } => "link",
            MarkKind::Image { .. } => "image",
        }
    }
}

/// A mark over the byte range `range` of a textblock's `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mark {
    pub kind: MarkKind,
    pub range: Range<usize>,
}

/// A node of the tree representation.
///
/// Textblocks keep their markup-free content in `text` (lines separated by
/// `\n`) and inline formatting as `marks` over it; containers keep
/// `children`. `source_line` is the line-origin tag: the 1-indexed line of
/// the text version this node was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub source_line: Option<usize>,
    pub text: String,
    /// Ordered by start, outer marks first.
    pub marks: Vec<Mark>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            source_line: None,
            text: String::new(),
            marks: vec![],
            children: vec![],
        }
    }

    pub fn textblock(kind: NodeKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::new(kind)
        }
    }

    pub fn container(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::new(kind)
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.source_line = Some(line);
        self
    }

    #[must_use]
    pub fn with_mark(mut self, kind: MarkKind, range: Range<usize>) -> Self {
        self.marks.push(Mark { kind, range });
        self.sort_marks();
        self
    }

    pub fn sort_marks(&mut self) {
        self.marks
            .sort_by_key(|m| (m.range.start, std::cmp::Reverse(m.range.end)));
    }

    /// Moves marks to account for `len` bytes inserted at `at`. Insertions
    /// inside a mark, or at the end of an inclusive one, grow it.
    pub fn shift_marks(&mut self, at: usize, len: usize) {
        for mark in &mut self.marks {
            if mark.range.start >= at {
                mark.range.start += len;
                mark.range.end += len;
            } else if at < mark.range.end || (at == mark.range.end && mark.kind.is_inclusive()) {
                mark.range.end += len;
            }
        }
    }

    pub fn role(&self) -> NodeRole {
        self.kind.role()
    }

    pub fn is_textblock(&self) -> bool {
        self.role() == NodeRole::Textblock
    }

    /// Number of positions this node occupies: one for each boundary token
    /// plus its content.
    pub fn size(&self) -> usize {
        match self.role() {
            NodeRole::Textblock => self.text.len() + 2,
            NodeRole::Atom => 1,
            NodeRole::Container => 2 + self.content_size(),
        }
    }

    /// Size of the node's content, excluding its own boundary tokens.
    pub fn content_size(&self) -> usize {
        match self.role() {
            NodeRole::Textblock => self.text.len(),
            NodeRole::Atom => 0,
            NodeRole::Container => self.children.iter().map(Node::size).sum(),
        }
    }

    /// Source line of the `segment`th `\n`-separated line of this node's
    /// text. Fenced code content starts on the line after the fence.
    pub fn segment_line(&self, segment: usize) -> Option<usize> {
        let base = self.source_line?;
        match self.kind {
            NodeKind::CodeBlock { fenced: true, .. } => Some(base + 1 + segment),
            _ => Some(base + segment),
        }
    }

    /// Number of `\n`-separated lines in the text (at least one).
    pub fn segment_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// Byte range of segment `segment` within `text`.
    pub fn segment_range(&self, segment: usize) -> Option<Range<usize>> {
        let mut start = 0;
        for (i, part) in self.text.split('\n').enumerate() {
            if i == segment {
                return Some(start..start + part.len());
            }
            start += part.len() + 1;
        }
        None
    }

    /// Whether `self` and `other` have the same kinds, text, marks and
    /// child structure, ignoring line tags.
    pub fn same_shape(&self, other: &Node) -> bool {
        std::mem::discriminant(&self.kind) == std::mem::discriminant(&other.kind)
            && self.text == other.text
            && self.marks == other.marks
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.same_shape(b))
    }
}

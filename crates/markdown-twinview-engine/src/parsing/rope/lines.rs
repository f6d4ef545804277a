use xi_rope::Rope;

use super::span::Span;

/// A reference to a single line in the rope with its byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRef {
    /// Byte span of this line in the rope (includes newline if present).
    pub span: Span,
    /// The raw line text, newline included.
    pub text: String,
}

impl LineRef {
    /// The line text without its trailing `\n` or `\r\n`.
    pub fn content(&self) -> &str {
        self.text.trim_end_matches(['\r', '\n'])
    }
}

/// Returns an iterator over lines with their byte spans.
///
/// Uses `lines_raw` to preserve newline characters, which keeps the spans
/// contiguous across the whole rope.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).map(move |line| {
        let start = offset;
        let len = line.len();
        offset += len;
        LineRef {
            span: Span { start, end: offset },
            text: line.into_owned(),
        }
    })
}

/// All lines of a text buffer, addressable by 0-based index.
///
/// Unlike [`lines_with_spans`], an empty buffer or a buffer ending in a
/// newline gets a trailing empty line, because a caret can sit there.
#[derive(Debug, Clone)]
pub struct TextLines {
    lines: Vec<LineRef>,
}

impl TextLines {
    pub fn new(rope: &Rope) -> Self {
        let mut lines: Vec<LineRef> = lines_with_spans(rope).collect();
        let len = rope.len();
        if lines.last().is_none_or(|l| l.text.ends_with('\n')) {
            lines.push(LineRef {
                span: Span::new(len, len),
                text: String::new(),
            });
        }
        Self { lines }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(&Rope::from(text))
    }

    /// Number of lines; never zero.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&LineRef> {
        self.lines.get(idx)
    }

    /// Line content (no newline) at `idx`, or `""` past the end.
    pub fn content(&self, idx: usize) -> &str {
        self.lines.get(idx).map(LineRef::content).unwrap_or("")
    }

    /// 0-based index of the line containing byte `offset`. Offsets past the
    /// end map to the last line.
    pub fn index_of_offset(&self, offset: usize) -> usize {
        self.lines
            .partition_point(|l| l.span.start <= offset)
            .saturating_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineRef> {
        self.lines.iter()
    }
}

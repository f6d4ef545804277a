/// Which character a fence is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

impl FenceKind {
    pub fn marker(self) -> u8 {
        match self {
            FenceKind::Backticks => b'`',
            FenceKind::Tildes => b'~',
        }
    }
}

/// An opening fence: its character and run length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fence {
    pub kind: FenceKind,
    pub len: usize,
}

impl Fence {
    /// A closer is a run of the same character at least as long as the
    /// opener, with nothing after it but whitespace.
    pub fn is_closed_by(&self, remainder: &str) -> bool {
        let t = remainder.trim();
        let run = t.bytes().take_while(|&b| b == self.kind.marker()).count();
        run >= self.len && run == t.len()
    }
}

/// Fenced code block delimiters.
///
/// Callers pass the line remainder after blockquote prefixes; leading
/// indentation is tolerated so fences nested in list items are found.
pub struct CodeFence;

impl CodeFence {
    pub const MIN_LEN: usize = 3;

    /// The fence `remainder` opens, if any. A backtick fence's info string
    /// may not contain backticks (that line is inline code instead).
    pub fn open(remainder: &str) -> Option<Fence> {
        let t = remainder.trim_end_matches(['\r', '\n']).trim_start();
        let kind = match t.bytes().next()? {
            b'`' => FenceKind::Backticks,
            b'~' => FenceKind::Tildes,
            _ => return None,
        };
        let len = t.bytes().take_while(|&b| b == kind.marker()).count();
        if len < Self::MIN_LEN {
            return None;
        }
        if kind == FenceKind::Backticks && t[len..].contains('`') {
            return None;
        }
        Some(Fence { kind, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("```rust", Some((FenceKind::Backticks, 3)))]
    #[case("~~~~", Some((FenceKind::Tildes, 4)))]
    #[case("   ```", Some((FenceKind::Backticks, 3)))]
    #[case("~~~ `ok` here", Some((FenceKind::Tildes, 3)))]
    #[case("hello", None)]
    #[case("``inline``", None)]
    #[case("```a```", None)]
    #[case("", None)]
    fn opens(#[case] line: &str, #[case] expected: Option<(FenceKind, usize)>) {
        assert_eq!(CodeFence::open(line).map(|f| (f.kind, f.len)), expected);
    }

    #[test]
    fn closer_must_match_kind_and_length() {
        let fence = CodeFence::open("````").unwrap();
        assert!(fence.is_closed_by("````"));
        assert!(fence.is_closed_by("`````  "));
        assert!(!fence.is_closed_by("```"));
        assert!(!fence.is_closed_by("~~~~"));
    }

    #[test]
    fn info_string_does_not_close() {
        let fence = CodeFence::open("```").unwrap();
        assert!(!fence.is_closed_by("```rust"));
        assert!(fence.is_closed_by("```\n"));
    }
}

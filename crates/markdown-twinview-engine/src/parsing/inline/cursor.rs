/// Byte scanner over a single line.
///
/// Indices are local to the line. Scanning only ever stops on ASCII
/// delimiters, so an index handed back by [`Cursor::index`] at one of
/// those stops is a char boundary.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            bytes: line.as_bytes(),
            i: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.i
    }

    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.i).copied()
    }

    /// Advances `n` bytes, stopping at the end of the line.
    pub fn skip(&mut self, n: usize) {
        self.i = (self.i + n).min(self.bytes.len());
    }

    /// Length of the run of `b` starting here.
    pub fn run_len(&self, b: u8) -> usize {
        self.bytes[self.i..].iter().take_while(|&&c| c == b).count()
    }

    /// Skips the code span opening here. A span closes at the next run of
    /// exactly as many `tick`s; without one only the opening run is
    /// skipped and what follows is ordinary text.
    pub fn skip_code_span(&mut self, tick: u8) {
        let open = self.run_len(tick);
        self.skip(open);
        if open > 0
            && let Some(end) = self.closing_run(tick, open)
        {
            self.i = end;
        }
    }

    /// Index just past the next run of exactly `n` `b` bytes.
    fn closing_run(&self, b: u8, n: usize) -> Option<usize> {
        let mut j = self.i;
        while j < self.bytes.len() {
            let run = self.bytes[j..].iter().take_while(|&&c| c == b).count();
            if run == n {
                return Some(j + run);
            }
            j += run.max(1);
        }
        None
    }
}

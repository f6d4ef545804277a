/// Blockquote markers at the start of a line.
pub struct BlockQuote;

impl BlockQuote {
    pub const MARKER: u8 = b'>';

    /// Counts the leading `>` markers of `line` and returns
    /// `(depth, content_start)`.
    ///
    /// Spaces before a marker and a single space after it belong to the
    /// prefix, so `> > a`, `>> a` and `>a` all qualify.
    pub fn strip_prefixes(line: &str) -> (u8, usize) {
        let bytes = line.as_bytes();
        let mut depth = 0u8;
        let mut end = 0usize;
        loop {
            let marker = end + bytes[end..].iter().take_while(|&&b| b == b' ').count();
            if bytes.get(marker) != Some(&Self::MARKER) {
                return (depth, end);
            }
            depth = depth.saturating_add(1);
            end = marker + 1;
            if bytes.get(end) == Some(&b' ') {
                end += 1;
            }
        }
    }
}

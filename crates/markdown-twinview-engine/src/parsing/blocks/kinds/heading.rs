/// ATX heading marker (`#` through `######`).
pub struct Heading;

impl Heading {
    pub const MARKER: u8 = b'#';
    pub const MAX_LEVEL: usize = 6;

    /// Returns `(level, prefix_len)` when `remainder` opens an ATX heading.
    ///
    /// `prefix_len` covers the leading indentation, the hashes and the
    /// whitespace after them, i.e. everything before the heading text.
    pub fn strip_prefix(remainder: &str) -> Option<(u8, usize)> {
        let indent = remainder.len() - remainder.trim_start_matches(' ').len();
        if indent > 3 {
            return None;
        }
        let rest = &remainder[indent..];
        let level = rest.bytes().take_while(|&b| b == Self::MARKER).count();
        if level == 0 || level > Self::MAX_LEVEL {
            return None;
        }
        let after = &rest[level..];
        if !after.is_empty() && !after.starts_with([' ', '\t']) {
            return None;
        }
        let gap = after.len() - after.trim_start_matches([' ', '\t']).len();
        Some((level as u8, indent + level + gap))
    }
}

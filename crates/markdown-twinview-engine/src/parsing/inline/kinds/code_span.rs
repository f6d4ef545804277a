/// Code span inline type with owned delimiter constant.
///
/// Code spans are "raw zones": a table pipe inside matching backtick runs is
/// content, not a cell delimiter.
pub struct CodeSpan;

impl CodeSpan {
    /// The backtick character that delimits code spans.
    pub const TICK: u8 = b'`';
}

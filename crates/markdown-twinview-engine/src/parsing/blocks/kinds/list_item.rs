use std::sync::OnceLock;

use regex::Regex;

/// List item markers: bullets (`-`, `*`, `+`), ordered (`1.`, `1)`) and an
/// optional GFM task box.
pub struct ListItem;

impl ListItem {
    /// Returns the byte length of the list prefix (indentation, marker,
    /// spacing and task box) when `remainder` opens a list item.
    pub fn strip_prefix(remainder: &str) -> Option<usize> {
        static MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
        let re = MARKER_REGEX.get_or_init(|| {
            Regex::new(r"^[ \t]*(?:[-*+]|\d{1,9}[.)])(?:[ \t]+(?:\[[ xX]\][ \t]+)?|$)")
                .expect("Invalid list marker regex")
        });
        re.find(remainder).map(|m| m.end())
    }
}

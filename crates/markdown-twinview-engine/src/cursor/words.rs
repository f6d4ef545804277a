//! Word and context lookup around a caret, using UAX #29 word boundaries.

use unicode_segmentation::UnicodeSegmentation;

use crate::parsing::rope::floor_char_boundary;

/// The word under or next to a caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordAt {
    /// Byte offset of the word in the searched text.
    pub start: usize,
    pub word: String,
    /// Caret offset inside the word.
    pub offset: usize,
}

fn is_word(segment: &str) -> bool {
    segment.chars().any(char::is_alphanumeric)
}

/// Finds the word containing byte `offset` in `text`, else the word ending
/// there, else the word starting there.
pub fn word_at(text: &str, offset: usize) -> Option<WordAt> {
    let offset = floor_char_boundary(text, offset);
    let words: Vec<(usize, &str)> = text
        .split_word_bound_indices()
        .filter(|(_, w)| is_word(w))
        .collect();

    let containing = || {
        words
            .iter()
            .find(|(s, w)| *s < offset && offset < s + w.len())
    };
    let ending = || words.iter().find(|(s, w)| s + w.len() == offset);
    let starting = || words.iter().find(|(s, _)| *s == offset);

    let &(start, word) = containing().or_else(ending).or_else(starting)?;
    Some(WordAt {
        start,
        word: word.to_string(),
        offset: offset - start,
    })
}

/// Up to `window` characters on each side of byte `offset`.
pub fn context_around(text: &str, offset: usize, window: usize) -> (String, String) {
    let offset = floor_char_boundary(text, offset);
    let (head, tail) = text.split_at(offset);
    let before_start = head
        .char_indices()
        .rev()
        .take(window)
        .last()
        .map_or(offset, |(i, _)| i);
    let after: String = tail.chars().take(window).collect();
    (head[before_start..].to_string(), after)
}

//! Word-safe context windows around matches.

use crate::locate::Match;

/// Default window buffer in characters, split evenly before and after a match.
pub const DEFAULT_BUFFER_SIZE: usize = 256;

/// A trimmed excerpt of document text.
///
/// `start..end` are byte offsets into the source text and `text` is exactly
/// `&source[start..end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snippet<'a> {
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
}

/// Expand a match into a word-safe, whitespace-trimmed window.
///
/// The window first reaches `buffer / 2` characters past each side of the
/// match (clamped to the text), then keeps growing outward while the
/// neighbouring character is alphanumeric, so it never starts or ends inside
/// a word.
pub fn expand_window(text: &str, m: Match, buffer: usize) -> Snippet<'_> {
    let half = buffer / 2;

    let mut start = retreat_chars(text, m.start, half);
    let mut end = advance_chars(text, m.end, half);

    while let Some(c) = text[..start].chars().next_back() {
        if !c.is_alphanumeric() {
            break;
        }
        start -= c.len_utf8();
    }

    while let Some(c) = text[end..].chars().next() {
        if !c.is_alphanumeric() {
            break;
        }
        end += c.len_utf8();
    }

    let window = &text[start..end];
    let leading = window.len() - window.trim_start().len();
    let trimmed = window.trim();
    let start = start + leading;

    Snippet {
        start,
        end: start + trimmed.len(),
        text: trimmed,
    }
}

/// Byte offset `n` characters before `pos`, or 0.
fn retreat_chars(text: &str, pos: usize, n: usize) -> usize {
    if n == 0 {
        return pos;
    }
    text[..pos]
        .char_indices()
        .rev()
        .nth(n - 1)
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte offset `n` characters after `pos`, or the text length.
fn advance_chars(text: &str, pos: usize, n: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(n)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

//! Character-count helpers shared by the segmenters.

/// Byte offset just past the first `n` chars of `text` (or `text.len()`).
pub(crate) fn byte_index_after_n_chars(text: &str, n: usize) -> usize {
    if n == 0 {
        return 0;
    }

    text.char_indices()
        .nth(n)
        .map_or(text.len(), |(idx, _)| idx)
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the char boundary immediately before `index`.
pub(crate) fn previous_char_boundary(text: &str, index: usize) -> usize {
    text[..index]
        .char_indices()
        .next_back()
        .map_or(0, |(idx, _)| idx)
}

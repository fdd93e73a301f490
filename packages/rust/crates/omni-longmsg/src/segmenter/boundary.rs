use super::Segmenter;
use crate::dialect::Dialect;
use crate::escape::is_escaped;
use crate::text::{byte_index_after_n_chars, char_len, previous_char_boundary};

/// Longest HTML entity reference the escaper emits (`&quot;`).
const MAX_ENTITY_LEN: usize = 6;

/// Markers whose runs read differently once cut apart.
const DOUBLED_MARKERS: [char; 3] = ['`', '_', '|'];

/// Byte offset at which to cut an over-budget buffer.
///
/// Takes the longest head that still fits with its close suffix, prefers the
/// last whitespace in the second half of the body, and steps back off cuts
/// that would strand an escape marker, split a run of doubled markers, or
/// land inside an HTML tag or entity. Always consumes at least one body
/// character.
pub(super) fn choose_cut(segmenter: &Segmenter, buffer: &str, prefix_len: usize) -> usize {
    let min_cut = buffer[prefix_len..]
        .chars()
        .next()
        .map_or(buffer.len(), |ch| prefix_len + ch.len_utf8());

    let mut end = byte_index_after_n_chars(buffer, segmenter.max_len()).max(min_cut);
    while end > min_cut && !segmenter.fits(&buffer[..end]) {
        end = previous_char_boundary(buffer, end);
    }
    if end >= buffer.len() {
        return buffer.len();
    }

    let preferred = prefer_word_boundary(&buffer[..end], prefix_len).unwrap_or(end);
    retreat_to_safe_cut(buffer, preferred, min_cut, segmenter.dialect())
        .or_else(|| retreat_to_safe_cut(buffer, end, min_cut, segmenter.dialect()))
        .unwrap_or(end)
}

fn prefer_word_boundary(head: &str, prefix_len: usize) -> Option<usize> {
    let body = &head[prefix_len..];
    let (pos, ch) = body
        .char_indices()
        .rev()
        .find(|(_, ch)| ch.is_whitespace())?;
    let whitespace_char_pos = char_len(&body[..pos]);
    (whitespace_char_pos >= char_len(body) / 2).then_some(prefix_len + pos + ch.len_utf8())
}

fn retreat_to_safe_cut(buffer: &str, cut: usize, min_cut: usize, dialect: Dialect) -> Option<usize> {
    let mut cut = cut;
    loop {
        if is_safe_cut(buffer, cut, dialect) {
            return Some(cut);
        }
        if cut <= min_cut {
            return None;
        }
        cut = previous_char_boundary(buffer, cut);
    }
}

fn is_safe_cut(buffer: &str, cut: usize, dialect: Dialect) -> bool {
    let head = &buffer[..cut];
    let tail = &buffer[cut..];
    match dialect {
        Dialect::Html => !inside_html_tag(head) && !inside_html_entity(head),
        Dialect::PlainMarkdown | Dialect::MarkdownV2 => {
            !is_escaped(buffer, cut)
                && !DOUBLED_MARKERS
                    .iter()
                    .any(|&marker| head.ends_with(marker) && tail.starts_with(marker))
        }
    }
}

fn inside_html_tag(head: &str) -> bool {
    match (head.rfind('<'), head.rfind('>')) {
        (Some(open), Some(close)) => open > close,
        (Some(_), None) => true,
        _ => false,
    }
}

fn inside_html_entity(head: &str) -> bool {
    head.rfind('&').is_some_and(|amp| {
        let pending = &head[amp..];
        !pending.contains(';') && pending.len() < MAX_ENTITY_LEN
    })
}

//! Escaper: map raw text to a markup-safe form for a dialect.
//!
//! Escaping is applied once. `escape(escape(x))` differs from `escape(x)`
//! whenever `x` holds reserved characters; double escaping is a caller error.

use crate::dialect::Dialect;

/// Prefix marking the next character as literal in the Markdown dialects.
pub const ESCAPE_MARKER: char = '\\';

const PLAIN_MARKDOWN_RESERVED: &[char] = &[
    '\\', '_', '*', '[', ']', '(', ')', '#', '<', '>', '`', '+', '-', '|', '{', '}', '.', '!',
];

const MARKDOWN_V2_RESERVED: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '\\',
];

const HTML_RESERVED: &[char] = &['&', '<', '>', '"', '\''];

const HTML_ENTITIES: &[(&str, char)] = &[
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#39;", '\''),
];

/// Characters that must be escaped in regular text of `dialect`.
#[must_use]
pub fn reserved_chars(dialect: Dialect) -> &'static [char] {
    match dialect {
        Dialect::PlainMarkdown => PLAIN_MARKDOWN_RESERVED,
        Dialect::MarkdownV2 => MARKDOWN_V2_RESERVED,
        Dialect::Html => HTML_RESERVED,
    }
}

/// Escape every reserved character of `dialect` in `text`.
#[must_use]
pub fn escape(text: &str, dialect: Dialect) -> String {
    match dialect {
        Dialect::Html => escape_html(text, HTML_RESERVED),
        other => backslash_escape(text, reserved_chars(other)),
    }
}

/// Escape the content of a code span or code block.
///
/// Inside code only the escape marker and the backtick are special in the
/// Markdown dialects; HTML still needs `&`, `<` and `>` replaced.
#[must_use]
pub fn escape_code(text: &str, dialect: Dialect) -> String {
    match dialect {
        Dialect::Html => escape_html(text, &['&', '<', '>']),
        _ => backslash_escape(text, &['\\', '`']),
    }
}

/// Undo one level of escaping.
///
/// Markdown dialects drop one escape marker before any character (a trailing
/// lone marker is kept). HTML decodes the entity references `escape` emits.
#[must_use]
pub fn unescape(text: &str, dialect: Dialect) -> String {
    match dialect {
        Dialect::Html => unescape_html(text),
        _ => {
            let mut unescaped = String::with_capacity(text.len());
            let mut chars = text.chars();
            while let Some(ch) = chars.next() {
                if ch == ESCAPE_MARKER {
                    match chars.next() {
                        Some(next) => unescaped.push(next),
                        None => unescaped.push(ch),
                    }
                } else {
                    unescaped.push(ch);
                }
            }
            unescaped
        }
    }
}

/// Whether the character at byte `index` is preceded by an odd run of
/// escape markers.
#[must_use]
pub fn is_escaped(buffer: &str, index: usize) -> bool {
    let Some(head) = buffer.as_bytes().get(..index) else {
        return false;
    };
    let run = head.iter().rev().take_while(|&&byte| byte == b'\\').count();
    run % 2 == 1
}

fn backslash_escape(text: &str, reserved: &[char]) -> String {
    text.chars()
        .fold(String::with_capacity(text.len()), |mut escaped, ch| {
            if reserved.contains(&ch) {
                escaped.push(ESCAPE_MARKER);
            }
            escaped.push(ch);
            escaped
        })
}

fn escape_html(text: &str, reserved: &[char]) -> String {
    text.chars()
        .fold(String::with_capacity(text.len()), |mut escaped, ch| {
            if !reserved.contains(&ch) {
                escaped.push(ch);
                return escaped;
            }
            match HTML_ENTITIES.iter().find(|(_, literal)| *literal == ch) {
                Some((entity, _)) => escaped.push_str(entity),
                None => escaped.push(ch),
            }
            escaped
        })
}

fn unescape_html(text: &str) -> String {
    let mut unescaped = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        unescaped.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        match HTML_ENTITIES
            .iter()
            .find(|(entity, _)| candidate.starts_with(entity))
        {
            Some((entity, literal)) => {
                unescaped.push(*literal);
                rest = &candidate[entity.len()..];
            }
            None => {
                unescaped.push('&');
                rest = &candidate[1..];
            }
        }
    }
    unescaped.push_str(rest);
    unescaped
}

//! Style builders for each dialect.
//!
//! Content passed to the wrappers is inserted verbatim, so callers escape
//! plain text with [`crate::escape`] first. Code spans, code blocks and link
//! targets escape their own content. Styles a dialect lacks (legacy Markdown
//! has no strikethrough, underline or spoiler) return the content unwrapped.

use crate::dialect::Dialect;
use crate::escape::escape_code;

/// Bold text.
#[must_use]
pub fn bold(dialect: Dialect, content: &str) -> String {
    match dialect {
        Dialect::Html => format!("<b>{content}</b>"),
        _ => format!("*{content}*"),
    }
}

/// Italic text.
#[must_use]
pub fn italic(dialect: Dialect, content: &str) -> String {
    match dialect {
        Dialect::Html => format!("<i>{content}</i>"),
        _ => format!("_{content}_"),
    }
}

/// Strikethrough text.
#[must_use]
pub fn strikethrough(dialect: Dialect, content: &str) -> String {
    match dialect {
        Dialect::PlainMarkdown => content.to_string(),
        Dialect::MarkdownV2 => format!("~{content}~"),
        Dialect::Html => format!("<s>{content}</s>"),
    }
}

/// Underlined text.
#[must_use]
pub fn underline(dialect: Dialect, content: &str) -> String {
    match dialect {
        Dialect::PlainMarkdown => content.to_string(),
        Dialect::MarkdownV2 => format!("__{content}__"),
        Dialect::Html => format!("<u>{content}</u>"),
    }
}

/// Spoiler (hidden until tapped).
#[must_use]
pub fn spoiler(dialect: Dialect, content: &str) -> String {
    match dialect {
        Dialect::PlainMarkdown => content.to_string(),
        Dialect::MarkdownV2 => format!("||{content}||"),
        Dialect::Html => format!("<span class=\"tg-spoiler\">{content}</span>"),
    }
}

/// Inline code span; `content` is raw text.
#[must_use]
pub fn code(dialect: Dialect, content: &str) -> String {
    let escaped = escape_code(content, dialect);
    match dialect {
        Dialect::Html => format!("<code>{escaped}</code>"),
        _ => format!("`{escaped}`"),
    }
}

/// Fenced code block; `content` is raw text, `language` may be empty.
#[must_use]
pub fn pre(dialect: Dialect, content: &str, language: &str) -> String {
    let escaped = escape_code(content, dialect);
    match dialect {
        Dialect::Html if language.is_empty() => format!("<pre><code>{escaped}</code></pre>"),
        Dialect::Html => {
            format!("<pre><code class=\"language-{language}\">{escaped}</code></pre>")
        }
        _ => format!("```{language}\n{escaped}\n```"),
    }
}

/// Hyperlink with an already-rendered `label`.
#[must_use]
pub fn link(dialect: Dialect, label: &str, url: &str) -> String {
    match dialect {
        Dialect::PlainMarkdown => format!("[{label}]({url})"),
        Dialect::MarkdownV2 => format!("[{label}]({})", escape_link_target(url)),
        Dialect::Html => format!("<a href=\"{}\">{label}</a>", escape_html_attr(url)),
    }
}

/// Inline user mention.
#[must_use]
pub fn mention(dialect: Dialect, label: &str, user_id: i64) -> String {
    link(dialect, label, &format!("tg://user?id={user_id}"))
}

fn escape_link_target(url: &str) -> String {
    url.chars()
        .fold(String::with_capacity(url.len()), |mut escaped, ch| {
            if ch == '\\' || ch == ')' {
                escaped.push('\\');
            }
            escaped.push(ch);
            escaped
        })
}

fn escape_html_attr(text: &str) -> String {
    text.chars()
        .fold(String::with_capacity(text.len()), |mut escaped, ch| {
            match ch {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                _ => escaped.push(ch),
            }
            escaped
        })
}

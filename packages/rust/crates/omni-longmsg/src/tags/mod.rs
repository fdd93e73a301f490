//! TagTracker: which style spans are still open at the end of a buffer.
//!
//! Markdown dialects compose two passes into one [`TagStack`]:
//! - bracket pass for code spans and code fences (explicit stack, greedy
//!   longest marker match so a fence is never read as three code toggles)
//! - toggle pass for `*`, `_`, `~`, `__`, `||` (odd count outside code =
//!   open; doubled markers are matched before single ones)
//!
//! HTML uses a single tag-stack pass over explicit open/close tags.

mod html;
mod markdown;

use serde::Serialize;

use crate::dialect::Dialect;

/// Emphasis and code markers tracked across chunk boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StyleToken {
    /// `*bold*` / `<b>`
    Bold,
    /// `_italic_` / `<i>`
    Italic,
    /// `~strike~` / `<s>`
    Strikethrough,
    /// `__underline__` / `<u>`
    Underline,
    /// `||spoiler||` / `<tg-spoiler>`
    Spoiler,
    /// `` `code` `` / `<code>`
    InlineCode,
    /// ```` ```block``` ```` / `<pre>`
    CodeBlock,
}

/// How a token's open/closed state is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// Same single marker opens and closes; open when the count is odd.
    Toggle,
    /// Open/close tracked with an explicit stack.
    Bracket,
}

impl StyleToken {
    /// Pairing rule of this token in `dialect`.
    #[must_use]
    pub fn pairing(self, dialect: Dialect) -> Pairing {
        match (dialect, self) {
            (Dialect::Html, _) | (_, Self::InlineCode | Self::CodeBlock) => Pairing::Bracket,
            _ => Pairing::Toggle,
        }
    }

    /// Literal Markdown marker for this token.
    #[must_use]
    pub fn markdown_marker(self) -> &'static str {
        match self {
            Self::Bold => "*",
            Self::Italic => "_",
            Self::Strikethrough => "~",
            Self::Underline => "__",
            Self::Spoiler => "||",
            Self::InlineCode => "`",
            Self::CodeBlock => "```",
        }
    }
}

/// One style span left open in a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenSpan {
    /// Token kind.
    pub token: StyleToken,
    /// Literal text that reopens the span (keeps fence language / tag attributes).
    pub opener: String,
    /// Literal text that closes the span.
    pub closer: String,
    /// Byte offset of the unclosed occurrence in the scanned buffer.
    pub position: usize,
}

/// Open spans in open order (earliest first).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagStack {
    spans: Vec<OpenSpan>,
}

impl TagStack {
    pub(crate) fn from_spans(mut spans: Vec<OpenSpan>) -> Self {
        spans.sort_by_key(|span| span.position);
        Self { spans }
    }

    /// No span is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Number of open spans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Open spans, earliest first.
    #[must_use]
    pub fn spans(&self) -> &[OpenSpan] {
        &self.spans
    }

    /// Token kinds, earliest first.
    #[must_use]
    pub fn tokens(&self) -> Vec<StyleToken> {
        self.spans.iter().map(|span| span.token).collect()
    }
}

/// Spans left open at the end of `buffer`.
#[must_use]
pub fn open_spans(buffer: &str, dialect: Dialect) -> TagStack {
    let spans = match dialect {
        Dialect::Html => html::scan(buffer),
        Dialect::PlainMarkdown | Dialect::MarkdownV2 => markdown::scan(buffer, dialect),
    };
    TagStack::from_spans(spans)
}

/// Closing markers, innermost first.
#[must_use]
pub fn close_suffix(stack: &TagStack) -> String {
    stack
        .spans
        .iter()
        .rev()
        .map(|span| span.closer.as_str())
        .collect()
}

/// Opening markers in original open order.
#[must_use]
pub fn reopen_prefix(stack: &TagStack) -> String {
    stack
        .spans
        .iter()
        .map(|span| span.opener.as_str())
        .collect()
}

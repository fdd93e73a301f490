//! Markup dialects understood by the escaper, tag tracker and transports.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ChunkError;

/// Styled-text dialect a chunk is rendered in.
///
/// "No formatting" is expressed as `Option::<Dialect>::None` at the call
/// sites that accept it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Legacy Telegram `Markdown` (bold, italic, code, pre, links).
    PlainMarkdown,
    /// Telegram `MarkdownV2`.
    MarkdownV2,
    /// Telegram HTML subset.
    Html,
}

impl Dialect {
    /// Transport `parse_mode` value for this dialect.
    #[must_use]
    pub fn parse_mode(self) -> &'static str {
        match self {
            Self::PlainMarkdown => "Markdown",
            Self::MarkdownV2 => "MarkdownV2",
            Self::Html => "HTML",
        }
    }

    /// Whether literal characters are escaped with a backslash prefix.
    #[must_use]
    pub fn uses_backslash_escape(self) -> bool {
        !matches!(self, Self::Html)
    }

    /// Parse a dialect name where `none`/`plain`/empty mean "no formatting".
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::UnknownDialect`] for unrecognised names.
    pub fn parse_optional(raw: &str) -> Result<Option<Self>, ChunkError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "plain" | "text" => Ok(None),
            _ => raw.parse().map(Some),
        }
    }
}

impl FromStr for Dialect {
    type Err = ChunkError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', '_'], "");
        match normalized.as_str() {
            "markdown" | "plainmarkdown" | "md" => Ok(Self::PlainMarkdown),
            "markdownv2" | "mdv2" => Ok(Self::MarkdownV2),
            "html" => Ok(Self::Html),
            _ => Err(ChunkError::UnknownDialect(raw.to_string())),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.parse_mode())
    }
}

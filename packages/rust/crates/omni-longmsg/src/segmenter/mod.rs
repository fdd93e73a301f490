//! Markup-aware segmenter.
//!
//! Splits a styled document at line granularity (and at break markers when
//! one is configured) into chunks of at most `max_len` characters. A chunk
//! cut inside open spans ends with their closing markers and the next chunk
//! starts by reopening them, so every chunk parses on its own.
//!
//! The budget covers the whole payload: reopen prefix, body and close
//! suffix. A unit that cannot fit even alone is handled by the
//! [`OversizePolicy`].

mod boundary;
mod state;

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::dialect::Dialect;
use crate::error::ChunkError;
use crate::escape::escape;
use crate::marker::BreakMarker;
use crate::tags::{close_suffix, open_spans};
use crate::text::char_len;

use self::state::SplitState;

/// Message-length ceiling of the reference transport (Telegram).
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 4096;

/// What to do with a single unit that exceeds the budget on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OversizePolicy {
    /// Emit the unit whole as an oversized chunk.
    #[default]
    PassThrough,
    /// Cut the unit mid-line; every piece is closed and the next reopened.
    /// A cut code-fence line renders differently from the original.
    HardSplit,
}

impl FromStr for OversizePolicy {
    type Err = ChunkError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "passthrough" => Ok(Self::PassThrough),
            "hardsplit" => Ok(Self::HardSplit),
            _ => Err(ChunkError::UnknownOversizePolicy(raw.to_string())),
        }
    }
}

/// One self-contained piece of the output sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    text: String,
    prefix_len: usize,
    suffix_len: usize,
    oversized: bool,
}

impl Chunk {
    pub(crate) fn new(text: String, prefix_len: usize, suffix_len: usize, max_len: usize) -> Self {
        let oversized = char_len(&text) > max_len;
        Self {
            text,
            prefix_len,
            suffix_len,
            oversized,
        }
    }

    pub(crate) fn plain(text: String, max_len: usize) -> Self {
        Self::new(text, 0, 0, max_len)
    }

    /// Exact payload to hand to the transport.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the chunk, returning its payload.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }

    /// Document content of this chunk, without injected reopen/close markers.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.text[self.prefix_len..self.text.len() - self.suffix_len]
    }

    /// Injected reopening markers.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.text[..self.prefix_len]
    }

    /// Injected closing markers.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.text[self.text.len() - self.suffix_len..]
    }

    /// Payload length in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        char_len(&self.text)
    }

    /// Whether the payload exceeds the budget it was cut for.
    #[must_use]
    pub fn is_oversized(&self) -> bool {
        self.oversized
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Markup-aware splitter for one dialect and budget.
#[derive(Debug, Clone)]
pub struct Segmenter {
    max_len: usize,
    dialect: Dialect,
    oversize_policy: OversizePolicy,
    break_marker: Option<BreakMarker>,
}

impl Segmenter {
    /// Segmenter for `dialect` with a `max_len` character budget.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidArgument`] when `max_len` is zero.
    pub fn new(max_len: usize, dialect: Dialect) -> Result<Self, ChunkError> {
        if max_len == 0 {
            return Err(ChunkError::zero_max_len());
        }
        Ok(Self {
            max_len,
            dialect,
            oversize_policy: OversizePolicy::default(),
            break_marker: None,
        })
    }

    /// Set the policy for units that exceed the budget alone.
    #[must_use]
    pub fn with_oversize_policy(mut self, policy: OversizePolicy) -> Self {
        self.oversize_policy = policy;
        self
    }

    /// Also allow splits at `marker` (removed from the output).
    #[must_use]
    pub fn with_break_marker(mut self, marker: BreakMarker) -> Self {
        self.break_marker = (!marker.is_empty()).then_some(marker);
        self
    }

    /// Character budget per chunk.
    #[must_use]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Dialect the document is written in.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Split a document already written in the segmenter's dialect.
    #[must_use]
    pub fn split(&self, document: &str) -> Vec<Chunk> {
        self.run(self.units(document).into_iter().map(Cow::Borrowed))
    }

    /// Split raw text, escaping each unit exactly once as it is taken in.
    ///
    /// The buffer only ever holds escaped text, so nothing is escaped twice
    /// and the budget is measured on the escaped form.
    #[must_use]
    pub fn split_raw(&self, text: &str) -> Vec<Chunk> {
        self.run(
            self.units(text)
                .into_iter()
                .map(|unit| Cow::Owned(escape(unit, self.dialect))),
        )
    }

    fn units<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let segments = match &self.break_marker {
            Some(marker) => marker.segments(text),
            None => vec![text],
        };
        segments
            .into_iter()
            .flat_map(|segment| segment.split_inclusive('\n'))
            .collect()
    }

    fn run<'t>(&self, units: impl IntoIterator<Item = Cow<'t, str>>) -> Vec<Chunk> {
        let mut state = SplitState::new(self);
        for unit in units {
            state.push_unit(&unit);
        }
        let chunks = state.finish();
        tracing::debug!(
            chunks = chunks.len(),
            max_len = self.max_len,
            dialect = %self.dialect,
            oversized = chunks.iter().filter(|chunk| chunk.is_oversized()).count(),
            "split document into chunks"
        );
        chunks
    }

    /// Whether `candidate` plus the suffix closing its open spans fits.
    fn fits(&self, candidate: &str) -> bool {
        let chars = char_len(candidate);
        if chars > self.max_len {
            return false;
        }
        let stack = open_spans(candidate, self.dialect);
        chars + char_len(&close_suffix(&stack)) <= self.max_len
    }
}

/// Split `document` (written in `dialect`) into balanced chunks.
///
/// # Errors
///
/// Returns [`ChunkError::InvalidArgument`] when `max_len` is zero.
pub fn split(document: &str, max_len: usize, dialect: Dialect) -> Result<Vec<Chunk>, ChunkError> {
    Ok(Segmenter::new(max_len, dialect)?.split(document))
}

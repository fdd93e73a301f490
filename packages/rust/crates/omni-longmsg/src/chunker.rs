//! Facade selecting the markup-aware or the break-marker path.
//!
//! With a dialect, text is split by the [`Segmenter`]; without one, the
//! tag tracker and escaper are bypassed and text is packed on break markers.

use crate::dialect::Dialect;
use crate::error::ChunkError;
use crate::marker::{BreakMarker, pack_segments};
use crate::segmenter::{Chunk, OversizePolicy, Segmenter};

/// Configured splitter for one delivery target.
#[derive(Debug, Clone)]
pub struct Chunker {
    max_len: usize,
    dialect: Option<Dialect>,
    oversize_policy: OversizePolicy,
    break_marker: BreakMarker,
}

impl Chunker {
    /// Chunker with a `max_len` character budget; `None` disables markup handling.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidArgument`] when `max_len` is zero.
    pub fn new(max_len: usize, dialect: Option<Dialect>) -> Result<Self, ChunkError> {
        if max_len == 0 {
            return Err(ChunkError::zero_max_len());
        }
        Ok(Self {
            max_len,
            dialect,
            oversize_policy: OversizePolicy::default(),
            break_marker: BreakMarker::default(),
        })
    }

    /// Policy for units over budget on their own (markup path only).
    #[must_use]
    pub fn with_oversize_policy(mut self, policy: OversizePolicy) -> Self {
        self.oversize_policy = policy;
        self
    }

    /// Sentinel marking permitted split points.
    #[must_use]
    pub fn with_break_marker(mut self, marker: BreakMarker) -> Self {
        self.break_marker = marker;
        self
    }

    /// Markup dialect, if any.
    #[must_use]
    pub fn dialect(&self) -> Option<Dialect> {
        self.dialect
    }

    /// Character budget per chunk.
    #[must_use]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Split text already written in the configured dialect.
    #[must_use]
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        match self.segmenter() {
            Some(segmenter) => segmenter.split(text),
            None => self.pack(text),
        }
    }

    /// Split raw text, escaping it for the configured dialect.
    #[must_use]
    pub fn split_raw(&self, text: &str) -> Vec<Chunk> {
        match self.segmenter() {
            Some(segmenter) => segmenter.split_raw(text),
            None => self.pack(text),
        }
    }

    fn segmenter(&self) -> Option<Segmenter> {
        let dialect = self.dialect?;
        Segmenter::new(self.max_len, dialect).ok().map(|segmenter| {
            segmenter
                .with_oversize_policy(self.oversize_policy)
                .with_break_marker(self.break_marker.clone())
        })
    }

    fn pack(&self, text: &str) -> Vec<Chunk> {
        pack_segments(text, self.max_len, &self.break_marker)
            .into_iter()
            .map(|piece| Chunk::plain(piece, self.max_len))
            .collect()
    }
}

//! Break-marker packing: split plain text only at author-inserted sentinels.
//!
//! Markers are permitted split points, never required ones. Segments are
//! packed greedily; a segment longer than the budget is hard-split.

use std::fmt;

use crate::error::ChunkError;
use crate::text::{byte_index_after_n_chars, char_len};

/// Default break marker: three zero-width spaces.
pub const DEFAULT_BREAK_MARKER: &str = "\u{200b}\u{200b}\u{200b}";

/// Sentinel marking a permitted split point. Removed from every output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BreakMarker(String);

impl BreakMarker {
    /// Use `marker` as the sentinel. An empty marker disables marker splits.
    pub fn new(marker: impl Into<String>) -> Self {
        Self(marker.into())
    }

    /// Marker text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the marker is empty (no split points).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pieces of `text` between marker occurrences, markers removed.
    pub(crate) fn segments<'t>(&self, text: &'t str) -> Vec<&'t str> {
        if self.is_empty() {
            vec![text]
        } else {
            text.split(self.as_str()).collect()
        }
    }
}

impl Default for BreakMarker {
    fn default() -> Self {
        Self::new(DEFAULT_BREAK_MARKER)
    }
}

impl fmt::Display for BreakMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split `text` into chunks of at most `max_len` chars, preferring `marker`.
///
/// Concatenating the result yields `text` with every marker removed.
///
/// # Errors
///
/// Returns [`ChunkError::InvalidArgument`] when `max_len` is zero.
pub fn split_by_marker(
    text: &str,
    max_len: usize,
    marker: &str,
) -> Result<Vec<String>, ChunkError> {
    if max_len == 0 {
        return Err(ChunkError::zero_max_len());
    }
    Ok(pack_segments(text, max_len, &BreakMarker::new(marker)))
}

pub(crate) fn pack_segments(text: &str, max_len: usize, marker: &BreakMarker) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for segment in marker.segments(text) {
        let mut segment = segment;
        let mut segment_chars = char_len(segment);

        while segment_chars > max_len {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_chars = 0;
            }
            let cut = byte_index_after_n_chars(segment, max_len);
            chunks.push(segment[..cut].to_string());
            segment = &segment[cut..];
            segment_chars -= max_len;
        }

        if current.is_empty() {
            current.push_str(segment);
            current_chars = segment_chars;
        } else if current_chars + segment_chars <= max_len {
            current.push_str(segment);
            current_chars += segment_chars;
        } else {
            chunks.push(std::mem::replace(&mut current, segment.to_string()));
            current_chars = segment_chars;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    tracing::debug!(
        chunks = chunks.len(),
        max_len,
        "packed text on break markers"
    );
    chunks
}

//! Delivery mode, per-chunk outcomes and the aggregate result.

use std::time::Duration;

use serde::Serialize;

use super::transport::{MessageId, TransportError};
use crate::dialect::Dialect;

/// How chunks are delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryMode {
    /// Styled dialect for the first attempt; `None` sends unformatted.
    pub formatting: Option<Dialect>,
    /// Retry a markup-rejected chunk once unformatted.
    pub allow_fallback: bool,
    /// Edit `prior_message` with the first chunk instead of sending it.
    pub edit_first: bool,
    /// Message to edit when `edit_first` is set.
    pub prior_message: Option<MessageId>,
    /// Pause between consecutive chunks.
    pub inter_chunk_delay: Duration,
}

impl Default for DeliveryMode {
    fn default() -> Self {
        Self {
            formatting: None,
            allow_fallback: true,
            edit_first: false,
            prior_message: None,
            inter_chunk_delay: Duration::ZERO,
        }
    }
}

impl DeliveryMode {
    /// Styled delivery in `dialect` with unformatted fallback.
    #[must_use]
    pub fn styled(dialect: Dialect) -> Self {
        Self {
            formatting: Some(dialect),
            ..Self::default()
        }
    }

    /// Edit `message_id` with the first chunk.
    #[must_use]
    pub fn editing(mut self, message_id: MessageId) -> Self {
        self.edit_first = true;
        self.prior_message = Some(message_id);
        self
    }

    /// Let markup rejections propagate instead of retrying unformatted.
    #[must_use]
    pub fn without_fallback(mut self) -> Self {
        self.allow_fallback = false;
        self
    }

    /// Message the chunk at `index` should edit, if any.
    pub(crate) fn edit_target(&self, index: usize) -> Option<&MessageId> {
        if index == 0 && self.edit_first {
            self.prior_message.as_ref()
        } else {
            None
        }
    }
}

/// Result of one chunk attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome {
    /// Delivered as requested.
    Delivered(MessageId),
    /// Styled attempt rejected; delivered unformatted.
    RejectedFallback {
        /// Identifier of the unformatted message.
        id: MessageId,
        /// Rejection of the styled attempt.
        reason: TransportError,
    },
    /// Not delivered.
    Failed(TransportError),
}

/// Identifiers of one completed delivery, in chunk order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SendResult {
    /// One identifier per delivered chunk.
    pub ids: Vec<MessageId>,
    /// The last delivered identifier ("current" pointer for later edits).
    pub primary: Option<MessageId>,
    /// Chunk indices delivered through the unformatted fallback.
    pub fallback_indices: Vec<usize>,
}

use thiserror::Error;

use super::transport::{MessageId, TransportError};
use super::types::SendResult;

/// Delivery stopped before completing.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// Chunk `index` could not be delivered; earlier chunks stay delivered.
    #[error(
        "chunk {index} delivery failed ({delivered_count} delivered before it): {source}",
        delivered_count = .delivered.len()
    )]
    DeliveryFailed {
        /// Index of the failing chunk.
        index: usize,
        /// Identifiers delivered before the failure.
        delivered: Vec<MessageId>,
        /// Transport failure.
        source: TransportError,
    },
    /// All chunks delivered, but the conversation memory sink failed.
    #[error("conversation memory update failed: {reason}")]
    Memory {
        /// The completed delivery.
        delivered: SendResult,
        /// Sink failure.
        reason: String,
    },
}

impl DeliveryError {
    /// Identifiers delivered before delivery stopped.
    #[must_use]
    pub fn delivered_ids(&self) -> &[MessageId] {
        match self {
            Self::DeliveryFailed { delivered, .. } => delivered,
            Self::Memory { delivered, .. } => &delivered.ids,
        }
    }
}

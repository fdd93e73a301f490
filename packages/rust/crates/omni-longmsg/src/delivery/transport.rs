//! Transport contract consumed by the delivery adapter.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::dialect::Dialect;

/// Opaque identifier of a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MessageId(String);

impl MessageId {
    /// Wrap a transport identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for MessageId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Failure reported by a transport call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The transport could not parse the styled payload.
    #[error("markup rejected: {0}")]
    MarkupRejected(String),
    /// Too many requests; `retry_after_secs` when the transport says so.
    #[error("rate limited (retry after {retry_after_secs:?}s): {description}")]
    RateLimited {
        /// Server-advised wait.
        retry_after_secs: Option<u64>,
        /// Transport description.
        description: String,
    },
    /// Bot/user lacks permission for the target.
    #[error("permission denied: {0}")]
    Permission(String),
    /// Request never got a transport answer.
    #[error("network error: {0}")]
    Network(String),
    /// Any other transport-level rejection.
    #[error("transport API error (code {code:?}): {description}")]
    Api {
        /// Transport error code, if any.
        code: Option<i64>,
        /// Transport description.
        description: String,
    },
}

impl TransportError {
    /// Whether this is a markup-parse rejection (recoverable unformatted).
    #[must_use]
    pub fn is_markup_rejected(&self) -> bool {
        matches!(self, Self::MarkupRejected(_))
    }
}

/// Message transport (e.g. a chat bot API).
///
/// `formatting == None` sends the text unformatted.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `text` as a new message to `recipient`.
    async fn send(
        &self,
        recipient: &str,
        text: &str,
        formatting: Option<Dialect>,
    ) -> Result<MessageId, TransportError>;

    /// Replace the text of `message_id` in `recipient`.
    async fn edit(
        &self,
        recipient: &str,
        message_id: &MessageId,
        text: &str,
        formatting: Option<Dialect>,
    ) -> Result<MessageId, TransportError>;
}

/// Conversation bookkeeping sink fed after a delivery.
#[async_trait]
pub trait ConversationMemory: Send + Sync {
    /// `trash`: ids of all chunks but the last; `current`: the last id.
    async fn record(&self, trash: &[MessageId], current: &MessageId) -> anyhow::Result<()>;
}

use super::error::DeliveryError;
use super::transport::{ConversationMemory, MessageId, Transport, TransportError};
use super::types::{ChunkOutcome, DeliveryMode, SendResult};
use crate::dialect::Dialect;
use crate::segmenter::Chunk;

/// Deliver `chunks` to `recipient` strictly in order.
///
/// Chunk `n + 1` is never attempted before chunk `n` resolves. Dropping the
/// returned future leaves already delivered chunks in place.
///
/// # Errors
///
/// Returns [`DeliveryError::DeliveryFailed`] with the identifiers delivered
/// so far when a chunk cannot be delivered, and [`DeliveryError::Memory`]
/// when every chunk went out but `memory` failed to record them.
pub async fn deliver(
    chunks: &[Chunk],
    recipient: &str,
    transport: &dyn Transport,
    mode: &DeliveryMode,
    memory: Option<&dyn ConversationMemory>,
) -> Result<SendResult, DeliveryError> {
    let mut result = SendResult::default();

    for (index, chunk) in chunks.iter().enumerate() {
        if index > 0 && !mode.inter_chunk_delay.is_zero() {
            tokio::time::sleep(mode.inter_chunk_delay).await;
        }

        match attempt_chunk(chunk.text(), index, recipient, transport, mode).await {
            ChunkOutcome::Delivered(id) => result.ids.push(id),
            ChunkOutcome::RejectedFallback { id, reason } => {
                tracing::warn!(
                    index,
                    error = %reason,
                    "chunk markup rejected; delivered without formatting"
                );
                result.ids.push(id);
                result.fallback_indices.push(index);
            }
            ChunkOutcome::Failed(source) => {
                tracing::warn!(
                    index,
                    delivered = result.ids.len(),
                    error = %source,
                    "chunk delivery failed"
                );
                return Err(DeliveryError::DeliveryFailed {
                    index,
                    delivered: result.ids,
                    source,
                });
            }
        }
    }

    result.primary = result.ids.last().cloned();
    tracing::debug!(
        chunks = result.ids.len(),
        fallbacks = result.fallback_indices.len(),
        "delivered long message"
    );

    let recorded = match (memory, result.ids.split_last()) {
        (Some(memory), Some((current, trash))) => memory.record(trash, current).await,
        _ => Ok(()),
    };
    if let Err(error) = recorded {
        return Err(DeliveryError::Memory {
            delivered: result,
            reason: format!("{error:#}"),
        });
    }
    Ok(result)
}

async fn attempt_chunk(
    text: &str,
    index: usize,
    recipient: &str,
    transport: &dyn Transport,
    mode: &DeliveryMode,
) -> ChunkOutcome {
    let edit_target = mode.edit_target(index);
    let styled = send_or_edit(transport, recipient, edit_target, text, mode.formatting).await;

    match styled {
        Ok(id) => ChunkOutcome::Delivered(id),
        Err(reason)
            if reason.is_markup_rejected() && mode.allow_fallback && mode.formatting.is_some() =>
        {
            match send_or_edit(transport, recipient, edit_target, text, None).await {
                Ok(id) => ChunkOutcome::RejectedFallback { id, reason },
                Err(error) => ChunkOutcome::Failed(error),
            }
        }
        Err(error) => ChunkOutcome::Failed(error),
    }
}

async fn send_or_edit(
    transport: &dyn Transport,
    recipient: &str,
    edit_target: Option<&MessageId>,
    text: &str,
    formatting: Option<Dialect>,
) -> Result<MessageId, TransportError> {
    match edit_target {
        Some(message_id) => transport.edit(recipient, message_id, text, formatting).await,
        None => transport.send(recipient, text, formatting).await,
    }
}

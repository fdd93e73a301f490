//! Ordered delivery of chunks over a [`Transport`].
//!
//! Each chunk is attempted with the requested formatting; a markup
//! rejection is retried once without formatting when the mode allows it.

mod deliver;
mod error;
mod transport;
mod types;

pub use deliver::deliver;
pub use error::DeliveryError;
pub use transport::{ConversationMemory, MessageId, Transport, TransportError};
pub use types::{ChunkOutcome, DeliveryMode, SendResult};

//! omni-longmsg - Long message chunking and delivery for chat transports
//!
//! Features:
//! - Markup-aware splitting: every chunk closes the spans it leaves open and
//!   the next chunk reopens them, so each message parses on its own
//! - Break-marker packing for unformatted text (invisible split sentinels)
//! - Ordered delivery over any [`Transport`] with one unformatted retry when
//!   the transport rejects markup
//!
//! # Architecture (ODF-REP Compliant)
//!
//! ```text
//! omni-longmsg/src/
//! ├── lib.rs        # Re-exports (this file)
//! ├── error.rs      # ChunkError
//! ├── dialect.rs    # Dialect (Markdown, MarkdownV2, HTML)
//! ├── escape.rs     # escape / unescape / is_escaped
//! ├── markup.rs     # per-dialect style builders
//! ├── tags/         # TagTracker: open_spans, close_suffix, reopen_prefix
//! ├── segmenter/    # markup-aware line-granular splitting
//! ├── marker.rs     # break-marker packing
//! ├── chunker.rs    # facade choosing the markup or marker path
//! ├── delivery/     # Transport trait + ordered delivery
//! ├── telegram/     # Telegram Bot API transport
//! └── config/       # settings.yaml + env resolution
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use omni_longmsg::{Dialect, split};
//!
//! let chunks = split(&long_markdown, 4096, Dialect::MarkdownV2)?;
//! for chunk in &chunks {
//!     println!("{}", chunk.text());
//! }
//! ```

// ============================================================================
// Module Declarations (ODF-REP: Atomic Structure)
// ============================================================================

mod chunker;
mod config;
mod delivery;
mod dialect;
mod error;
mod escape;
mod marker;
pub mod markup;
mod segmenter;
mod tags;
mod telegram;
mod text;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use chunker::Chunker;
pub use config::{
    LongMessageConfig, LongMessageSettings, RuntimeSettings, TelegramSettings,
    load_runtime_settings, load_runtime_settings_from_paths, runtime_settings_paths,
};
pub use delivery::{
    ChunkOutcome, ConversationMemory, DeliveryError, DeliveryMode, MessageId, SendResult,
    Transport, TransportError, deliver,
};
pub use dialect::Dialect;
pub use error::ChunkError;
pub use escape::{ESCAPE_MARKER, escape, escape_code, is_escaped, reserved_chars, unescape};
pub use marker::{BreakMarker, DEFAULT_BREAK_MARKER, split_by_marker};
pub use segmenter::{Chunk, DEFAULT_MAX_MESSAGE_LENGTH, OversizePolicy, Segmenter, split};
pub use tags::{OpenSpan, Pairing, StyleToken, TagStack, close_suffix, open_spans, reopen_prefix};
pub use telegram::{TelegramTransport, parse_recipient_target};

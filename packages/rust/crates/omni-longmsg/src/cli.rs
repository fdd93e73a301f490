use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use omni_longmsg::{Dialect, OversizePolicy};

#[derive(Parser)]
#[command(name = "omni-longmsg")]
#[command(about = "Split long messages into markup-balanced chunks and deliver them in order.")]
pub(crate) struct Cli {
    /// Override config directory (user settings home).
    #[arg(long, global = true)]
    pub(crate) conf: Option<PathBuf>,

    /// Debug logging unless RUST_LOG is set.
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum DialectArg {
    None,
    Markdown,
    MarkdownV2,
    Html,
}

impl DialectArg {
    pub(crate) fn into_dialect(self) -> Option<Dialect> {
        match self {
            Self::None => None,
            Self::Markdown => Some(Dialect::PlainMarkdown),
            Self::MarkdownV2 => Some(Dialect::MarkdownV2),
            Self::Html => Some(Dialect::Html),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum OversizeArg {
    PassThrough,
    HardSplit,
}

impl From<OversizeArg> for OversizePolicy {
    fn from(arg: OversizeArg) -> Self {
        match arg {
            OversizeArg::PassThrough => Self::PassThrough,
            OversizeArg::HardSplit => Self::HardSplit,
        }
    }
}

/// Chunking options shared by `split` and `send`; unset values come from config.
#[derive(Debug, Args)]
pub(crate) struct ChunkArgs {
    /// Input file (stdin when omitted or `-`).
    pub(crate) file: Option<PathBuf>,

    /// Character budget per chunk.
    #[arg(long)]
    pub(crate) max_len: Option<usize>,

    /// Markup dialect of the input.
    #[arg(long, value_enum)]
    pub(crate) dialect: Option<DialectArg>,

    /// Handling of single lines longer than the budget.
    #[arg(long, value_enum)]
    pub(crate) oversize: Option<OversizeArg>,

    /// Break marker (permitted split point, removed from output).
    #[arg(long)]
    pub(crate) marker: Option<String>,

    /// Treat the input as raw text and escape it for the dialect.
    #[arg(long)]
    pub(crate) raw: bool,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print the chunks of a document.
    Split {
        #[command(flatten)]
        chunk: ChunkArgs,

        /// Emit chunks as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Deliver a document to a Telegram chat (token from TELEGRAM_BOT_TOKEN).
    Send {
        /// Recipient: `chat_id` or `chat_id:thread_id`.
        #[arg(long)]
        chat_id: String,

        /// Edit this message with the first chunk instead of sending it.
        #[arg(long)]
        edit: Option<String>,

        /// Fail instead of retrying rejected markup unformatted.
        #[arg(long)]
        no_fallback: bool,

        #[command(flatten)]
        chunk: ChunkArgs,
    },
}

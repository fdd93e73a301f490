//! omni-longmsg CLI: split a document into chunks, or deliver it to Telegram.
//!
//! Logging: set `RUST_LOG=omni_longmsg=debug` to see segmentation decisions on stderr.

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use omni_longmsg::load_runtime_settings;

use crate::cli::{Cli, Command};
use crate::commands::{run_send, run_split};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "omni_longmsg=debug"
        } else {
            "omni_longmsg=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let runtime_settings = load_runtime_settings(cli.conf.as_deref());

    match cli.command {
        Command::Split { chunk, json } => run_split(&chunk, json, &runtime_settings).await,
        Command::Send {
            chat_id,
            edit,
            no_fallback,
            chunk,
        } => {
            run_send(
                &chat_id,
                edit.as_deref(),
                no_fallback,
                &chunk,
                &runtime_settings,
            )
            .await
        }
    }
}

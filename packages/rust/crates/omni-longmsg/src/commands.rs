use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use tokio::io::AsyncReadExt;

use omni_longmsg::{
    BreakMarker, Chunk, LongMessageConfig, MessageId, RuntimeSettings, TelegramTransport, deliver,
};

use crate::cli::ChunkArgs;

const TELEGRAM_BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
const TELEGRAM_API_BASE_ENV: &str = "TELEGRAM_API_BASE";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub(crate) async fn run_split(
    args: &ChunkArgs,
    json: bool,
    settings: &RuntimeSettings,
) -> anyhow::Result<()> {
    let config = resolve_config(args, settings);
    let chunks = chunk_input(args, &config).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&chunks)?);
        return Ok(());
    }

    let total = chunks.len();
    for (index, chunk) in chunks.iter().enumerate() {
        let oversized = if chunk.is_oversized() { ", oversized" } else { "" };
        println!(
            "----- chunk {}/{total} ({} chars{oversized}) -----",
            index + 1,
            chunk.char_len()
        );
        println!("{chunk}");
    }
    Ok(())
}

pub(crate) async fn run_send(
    chat_id: &str,
    edit: Option<&str>,
    no_fallback: bool,
    args: &ChunkArgs,
    settings: &RuntimeSettings,
) -> anyhow::Result<()> {
    let token = std::env::var(TELEGRAM_BOT_TOKEN_ENV)
        .ok()
        .filter(|token| !token.trim().is_empty())
        .with_context(|| format!("{TELEGRAM_BOT_TOKEN_ENV} is not set"))?;

    let mut config = resolve_config(args, settings);
    if no_fallback {
        config.allow_fallback = false;
    }
    if edit.is_some() {
        config.edit_first = true;
    }
    let chunks = chunk_input(args, &config).await?;

    let mut transport = TelegramTransport::new(token);
    if let Some(api_base) = std::env::var(TELEGRAM_API_BASE_ENV)
        .ok()
        .filter(|base| !base.trim().is_empty())
        .or_else(|| settings.telegram.api_base_url.clone())
    {
        transport = transport.with_api_base(api_base);
    }
    let telegram = &settings.telegram;
    if telegram.connect_timeout_secs.is_some() || telegram.request_timeout_secs.is_some() {
        transport = transport.with_timeouts(
            Duration::from_secs(telegram.connect_timeout_secs.unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS)),
            Duration::from_secs(telegram.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)),
        );
    }

    let mode = config.delivery_mode(edit.map(MessageId::new));
    let result = deliver(&chunks, chat_id, &transport, &mode, None)
        .await
        .context("Telegram delivery failed")?;

    tracing::info!(
        chat_id = %chat_id,
        chunks = result.ids.len(),
        fallbacks = result.fallback_indices.len(),
        "long message delivered"
    );
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn resolve_config(args: &ChunkArgs, settings: &RuntimeSettings) -> LongMessageConfig {
    let mut config =
        LongMessageConfig::from_lookup(|name| std::env::var(name).ok(), Some(&settings.longmsg));
    if let Some(max_len) = args.max_len {
        config.max_len = max_len;
    }
    if let Some(dialect) = args.dialect {
        config.dialect = dialect.into_dialect();
    }
    if let Some(oversize) = args.oversize {
        config.oversize_policy = oversize.into();
    }
    if let Some(marker) = &args.marker {
        config.break_marker = BreakMarker::new(marker.as_str());
    }
    config
}

async fn chunk_input(args: &ChunkArgs, config: &LongMessageConfig) -> anyhow::Result<Vec<Chunk>> {
    let text = read_input(args.file.as_deref()).await?;
    let chunker = config.chunker()?;
    Ok(if args.raw {
        chunker.split_raw(&text)
    } else {
        chunker.split(&text)
    })
}

async fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file.filter(|path| path.as_os_str() != "-") {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

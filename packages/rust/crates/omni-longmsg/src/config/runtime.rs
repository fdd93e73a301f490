//! Resolved chunking/delivery configuration (env > settings > default).

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use super::settings::{LongMessageSettings, load_runtime_settings};
use crate::chunker::Chunker;
use crate::delivery::{DeliveryMode, MessageId};
use crate::dialect::Dialect;
use crate::error::ChunkError;
use crate::marker::BreakMarker;
use crate::segmenter::{DEFAULT_MAX_MESSAGE_LENGTH, OversizePolicy};

const DEFAULT_DIALECT: Option<Dialect> = Some(Dialect::MarkdownV2);
const DEFAULT_INTER_CHUNK_DELAY_MS: u64 = 100;

const ENV_MAX_LEN: &str = "OMNI_LONGMSG_MAX_LEN";
const ENV_DIALECT: &str = "OMNI_LONGMSG_DIALECT";
const ENV_OVERSIZE_POLICY: &str = "OMNI_LONGMSG_OVERSIZE_POLICY";
const ENV_BREAK_MARKER: &str = "OMNI_LONGMSG_BREAK_MARKER";
const ENV_ALLOW_FALLBACK: &str = "OMNI_LONGMSG_ALLOW_FALLBACK";
const ENV_EDIT_FIRST: &str = "OMNI_LONGMSG_EDIT_FIRST";
const ENV_INTER_CHUNK_DELAY_MS: &str = "OMNI_LONGMSG_INTER_CHUNK_DELAY_MS";

/// Effective long-message configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongMessageConfig {
    /// Character budget per chunk (always positive).
    pub max_len: usize,
    /// Markup dialect; `None` packs on break markers only.
    pub dialect: Option<Dialect>,
    /// Policy for units over budget on their own.
    pub oversize_policy: OversizePolicy,
    /// Split sentinel.
    pub break_marker: BreakMarker,
    /// Retry markup-rejected chunks unformatted.
    pub allow_fallback: bool,
    /// Edit the prior message with the first chunk.
    pub edit_first: bool,
    /// Pause between chunks.
    pub inter_chunk_delay: Duration,
}

impl Default for LongMessageConfig {
    fn default() -> Self {
        Self {
            max_len: DEFAULT_MAX_MESSAGE_LENGTH,
            dialect: DEFAULT_DIALECT,
            oversize_policy: OversizePolicy::default(),
            break_marker: BreakMarker::default(),
            allow_fallback: true,
            edit_first: false,
            inter_chunk_delay: Duration::from_millis(DEFAULT_INTER_CHUNK_DELAY_MS),
        }
    }
}

impl LongMessageConfig {
    /// Resolve from the process environment and the settings files.
    #[must_use]
    pub fn from_env(config_home: Option<&Path>) -> Self {
        let settings = load_runtime_settings(config_home);
        Self::from_lookup(|name| std::env::var(name).ok(), Some(&settings.longmsg))
    }

    /// Resolve with `lookup` standing in for the environment.
    ///
    /// Invalid values are logged and skipped in favour of the next source.
    pub fn from_lookup<F>(lookup: F, settings: Option<&LongMessageSettings>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            max_len: resolve_positive_usize(
                &lookup,
                ENV_MAX_LEN,
                settings.and_then(|s| s.max_len),
                defaults.max_len,
            ),
            dialect: resolve_parsed(
                &lookup,
                ENV_DIALECT,
                settings.and_then(|s| s.dialect.as_deref()),
                Dialect::parse_optional,
                defaults.dialect,
            ),
            oversize_policy: resolve_parsed(
                &lookup,
                ENV_OVERSIZE_POLICY,
                settings.and_then(|s| s.oversize_policy.as_deref()),
                OversizePolicy::from_str,
                defaults.oversize_policy,
            ),
            break_marker: lookup(ENV_BREAK_MARKER)
                .or_else(|| settings.and_then(|s| s.break_marker.clone()))
                .map_or(defaults.break_marker, BreakMarker::new),
            allow_fallback: resolve_bool(
                &lookup,
                ENV_ALLOW_FALLBACK,
                settings.and_then(|s| s.allow_fallback),
                defaults.allow_fallback,
            ),
            edit_first: resolve_bool(
                &lookup,
                ENV_EDIT_FIRST,
                settings.and_then(|s| s.edit_first),
                defaults.edit_first,
            ),
            inter_chunk_delay: Duration::from_millis(resolve_u64(
                &lookup,
                ENV_INTER_CHUNK_DELAY_MS,
                settings.and_then(|s| s.inter_chunk_delay_ms),
                DEFAULT_INTER_CHUNK_DELAY_MS,
            )),
        }
    }

    /// Chunker for this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidArgument`] when `max_len` is zero.
    pub fn chunker(&self) -> Result<Chunker, ChunkError> {
        Ok(Chunker::new(self.max_len, self.dialect)?
            .with_oversize_policy(self.oversize_policy)
            .with_break_marker(self.break_marker.clone()))
    }

    /// Delivery mode for this configuration; `prior` is edited when
    /// `edit_first` is set.
    #[must_use]
    pub fn delivery_mode(&self, prior: Option<MessageId>) -> DeliveryMode {
        DeliveryMode {
            formatting: self.dialect,
            allow_fallback: self.allow_fallback,
            edit_first: self.edit_first && prior.is_some(),
            prior_message: prior,
            inter_chunk_delay: self.inter_chunk_delay,
        }
    }
}

fn resolve_positive_usize<F>(
    lookup: &F,
    name: &str,
    setting_value: Option<usize>,
    default: usize,
) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(name) {
        match raw.trim().parse::<usize>() {
            Ok(value) if value > 0 => return value,
            _ => tracing::warn!(
                env_var = %name,
                value = %raw,
                "invalid longmsg config env value; using settings/default"
            ),
        }
    }
    match setting_value {
        Some(value) if value > 0 => value,
        Some(value) => {
            tracing::warn!(
                setting = %name,
                value,
                default,
                "invalid longmsg config settings value; using default"
            );
            default
        }
        None => default,
    }
}

fn resolve_u64<F>(lookup: &F, name: &str, setting_value: Option<u64>, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(name) {
        match raw.trim().parse::<u64>() {
            Ok(value) => return value,
            Err(_) => tracing::warn!(
                env_var = %name,
                value = %raw,
                "invalid longmsg config env value; using settings/default"
            ),
        }
    }
    setting_value.unwrap_or(default)
}

fn resolve_bool<F>(lookup: &F, name: &str, setting_value: Option<bool>, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(name) {
        match parse_bool(&raw) {
            Some(value) => return value,
            None => tracing::warn!(
                env_var = %name,
                value = %raw,
                "invalid boolean value; expected true/false"
            ),
        }
    }
    setting_value.unwrap_or(default)
}

fn resolve_parsed<F, T, E>(
    lookup: &F,
    name: &str,
    setting_value: Option<&str>,
    parse: impl Fn(&str) -> Result<T, E>,
    default: T,
) -> T
where
    F: Fn(&str) -> Option<String>,
    E: std::fmt::Display,
{
    if let Some(raw) = lookup(name) {
        match parse(&raw) {
            Ok(value) => return value,
            Err(error) => tracing::warn!(
                env_var = %name,
                value = %raw,
                error = %error,
                "invalid longmsg config env value; using settings/default"
            ),
        }
    }
    if let Some(raw) = setting_value {
        match parse(raw) {
            Ok(value) => return value,
            Err(error) => tracing::warn!(
                setting = %name,
                value = %raw,
                error = %error,
                "invalid longmsg config settings value; using default"
            ),
        }
    }
    default
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

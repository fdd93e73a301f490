//! Settings loader for omni-longmsg.
//!
//! Loads and merges:
//! - System defaults: `<PRJ_ROOT>/packages/conf/settings.yaml`
//! - User overrides:  `<PRJ_CONFIG_HOME>/omni-dev-fusion/settings.yaml`
//!
//! Merge precedence is user over system. Only the `longmsg` and `telegram`
//! sections are read; other sections of the shared file are ignored.

use std::path::{Path, PathBuf};

use serde::Deserialize;

const DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH: &str = "packages/conf/settings.yaml";
const DEFAULT_USER_SETTINGS_RELATIVE_PATH: &str = "omni-dev-fusion/settings.yaml";
const DEFAULT_CONFIG_HOME_RELATIVE_PATH: &str = ".config";

/// Merged settings file contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeSettings {
    /// `longmsg:` section.
    #[serde(default)]
    pub longmsg: LongMessageSettings,
    /// `telegram:` section.
    #[serde(default)]
    pub telegram: TelegramSettings,
}

/// `longmsg:` section; every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LongMessageSettings {
    /// Character budget per chunk.
    pub max_len: Option<usize>,
    /// `none`, `markdown`, `markdown_v2` or `html`.
    pub dialect: Option<String>,
    /// `pass_through` or `hard_split`.
    pub oversize_policy: Option<String>,
    /// Split sentinel; empty disables markers.
    pub break_marker: Option<String>,
    /// Retry markup-rejected chunks unformatted.
    pub allow_fallback: Option<bool>,
    /// Edit the prior message with the first chunk.
    pub edit_first: Option<bool>,
    /// Pause between chunks, in milliseconds.
    pub inter_chunk_delay_ms: Option<u64>,
}

/// `telegram:` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramSettings {
    /// Bot API base URL (defaults to the public API).
    pub api_base_url: Option<String>,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
}

impl RuntimeSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            longmsg: self.longmsg.merge(overlay.longmsg),
            telegram: self.telegram.merge(overlay.telegram),
        }
    }
}

impl LongMessageSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            max_len: overlay.max_len.or(self.max_len),
            dialect: overlay.dialect.or(self.dialect),
            oversize_policy: overlay.oversize_policy.or(self.oversize_policy),
            break_marker: overlay.break_marker.or(self.break_marker),
            allow_fallback: overlay.allow_fallback.or(self.allow_fallback),
            edit_first: overlay.edit_first.or(self.edit_first),
            inter_chunk_delay_ms: overlay.inter_chunk_delay_ms.or(self.inter_chunk_delay_ms),
        }
    }
}

impl TelegramSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            api_base_url: overlay.api_base_url.or(self.api_base_url),
            connect_timeout_secs: overlay.connect_timeout_secs.or(self.connect_timeout_secs),
            request_timeout_secs: overlay.request_timeout_secs.or(self.request_timeout_secs),
        }
    }
}

/// Load system and user settings; `config_home` overrides the user config home
/// (CLI `--conf`), absolute or relative to `PRJ_ROOT`/cwd.
#[must_use]
pub fn load_runtime_settings(config_home: Option<&Path>) -> RuntimeSettings {
    let (system_path, user_path) = runtime_settings_paths(config_home);
    load_runtime_settings_from_paths(&system_path, &user_path)
}

/// `(system, user)` settings file locations.
#[must_use]
pub fn runtime_settings_paths(config_home: Option<&Path>) -> (PathBuf, PathBuf) {
    let root = project_root();
    let system_path = root.join(DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH);
    let user_path = resolve_config_home(&root, config_home).join(DEFAULT_USER_SETTINGS_RELATIVE_PATH);
    (system_path, user_path)
}

/// Load `system` then overlay `user`; missing or invalid files count as empty.
#[must_use]
pub fn load_runtime_settings_from_paths(system: &Path, user: &Path) -> RuntimeSettings {
    load_one(system).merge(load_one(user))
}

fn load_one(path: &Path) -> RuntimeSettings {
    if !path.exists() {
        return RuntimeSettings::default();
    }
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to read settings file; ignoring"
            );
            return RuntimeSettings::default();
        }
    };
    if raw.trim().is_empty() {
        return RuntimeSettings::default();
    }
    match serde_yaml::from_str::<RuntimeSettings>(&raw) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to parse settings yaml; ignoring file"
            );
            RuntimeSettings::default()
        }
    }
}

fn project_root() -> PathBuf {
    std::env::var("PRJ_ROOT")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn resolve_config_home(project_root: &Path, config_home: Option<&Path>) -> PathBuf {
    if let Some(path) = config_home.filter(|path| !path.as_os_str().is_empty()) {
        return absolutize(project_root, path.to_path_buf());
    }

    let configured = std::env::var("PRJ_CONFIG_HOME")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_HOME_RELATIVE_PATH.to_string());
    absolutize(project_root, PathBuf::from(configured))
}

fn absolutize(project_root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        project_root.join(path)
    }
}

//! Configuration: settings files plus `OMNI_LONGMSG_*` environment overrides.

mod runtime;
mod settings;

pub use runtime::LongMessageConfig;
pub use settings::{
    LongMessageSettings, RuntimeSettings, TelegramSettings, load_runtime_settings,
    load_runtime_settings_from_paths, runtime_settings_paths,
};

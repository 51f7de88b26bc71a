//! Persistent settings: classifier endpoint and timing policy.

mod config_defaults;
mod config_io;
mod config_types;

pub use config_io::{CONFIG_FILE_NAME, config_path, load_from, load_or_default, save, save_to_path};
pub use config_types::{ClassifierSettings, CommanderConfig, ConfigError, TimingSettings};

//! Error types for configuration and static data loading

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[source] confy::ConfyError),

    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),

    #[error("invalid analysis setting `{field}`: {detail}")]
    InvalidSetting { field: &'static str, detail: String },

    #[error("failed to read hero table {path}")]
    ReadHeroTable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse hero table")]
    ParseHeroTable(#[from] toml::de::Error),
}

mod config;
mod error;
mod interner;

pub use config::{AnalysisConfigExt, AppConfigExt, default_replay_directory};
pub use error::ConfigError;
pub use interner::{IStr, empty_istr, intern, lookup, resolve};
pub use skirmish_types::{AnalysisConfig, AppConfig, MomentSources};

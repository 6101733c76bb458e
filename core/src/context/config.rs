//! Application configuration
//!
//! Re-exports the shared config types from skirmish-types and provides
//! persistence, platform defaults and validation for them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::ConfigError;
use crate::game_data::HeroTable;
use skirmish_types::{AnalysisConfig, AppConfig};

const APP_NAME: &str = "skirmish";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Default location for downloaded and converted replays.
pub fn default_replay_directory() -> String {
    dirs::data_dir()
        .map(|p| p.join(APP_NAME).join("replays"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "replays".to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// AppConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for AppConfig persistence and derived resources
pub trait AppConfigExt: Sized {
    fn load() -> Self;
    fn load_with_defaults() -> Self;
    fn save(self) -> Result<(), ConfigError>;
    fn replay_path(&self, match_id: u64) -> PathBuf;
    fn hero_table(&self) -> Result<Arc<HeroTable>, ConfigError>;
}

impl AppConfigExt for AppConfig {
    fn load() -> Self {
        match confy::load(APP_NAME, None).map_err(ConfigError::Load) {
            Ok(config) => config,
            Err(err) => {
                let cause = std::error::Error::source(&err).map(ToString::to_string);
                tracing::warn!(error = %err, cause = ?cause, "Falling back to default configuration");
                Self::load_with_defaults()
            }
        }
    }

    /// Load with platform-specific defaults (used when no config file exists)
    fn load_with_defaults() -> Self {
        AppConfig::with_replay_directory(default_replay_directory())
    }

    fn save(self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, None, self).map_err(ConfigError::Save)
    }

    /// Path of the event log for a match inside the replay directory.
    fn replay_path(&self, match_id: u64) -> PathBuf {
        Path::new(&self.replay_directory).join(format!("{match_id}.jsonlines"))
    }

    /// The configured hero table, or the bundled one when no override is set.
    fn hero_table(&self) -> Result<Arc<HeroTable>, ConfigError> {
        match &self.hero_table_path {
            Some(path) => Ok(Arc::new(HeroTable::load(Path::new(path))?)),
            None => Ok(HeroTable::bundled()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AnalysisConfig Validation
// ─────────────────────────────────────────────────────────────────────────────

pub trait AnalysisConfigExt {
    fn validate(&self) -> Result<(), ConfigError>;
}

impl AnalysisConfigExt for AnalysisConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_health_window == 0 {
            return Err(invalid("max_health_window", "window must be at least one sample"));
        }
        if self.smooth_window == 0 {
            return Err(invalid("smooth_window", "window must be at least one sample"));
        }
        if !self.health_rate_threshold.is_finite() {
            return Err(invalid("health_rate_threshold", "must be a finite number"));
        }
        if !(self.relative_health_threshold.is_finite()
            && (0.0..=1.0).contains(&self.relative_health_threshold))
        {
            return Err(invalid("relative_health_threshold", "must be between 0 and 1"));
        }
        if self.moment_merge_gap < 0 {
            return Err(invalid("moment_merge_gap", "gap can't be negative"));
        }
        if self.single_player_merge_gap < 0 {
            return Err(invalid("single_player_merge_gap", "gap can't be negative"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, detail: &str) -> ConfigError {
    ConfigError::InvalidSetting {
        field,
        detail: detail.to_string(),
    }
}

//! Shared configuration and output types for skirmish
//!
//! This crate contains serializable types that are shared between the
//! analysis engine (skirmish-core) and its front ends (the CLI, or any API
//! layer that reports highlight windows).

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Output Records
// ─────────────────────────────────────────────────────────────────────────────

/// A finalized highlight window, formatted for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentRecord {
    pub start: i64,
    pub end: i64,
    /// `MM:SS` rendering of `start`
    pub clock_start: String,
    /// `MM:SS` rendering of `end`
    pub clock_end: String,
}

/// A raw attack window with provenance, for callers that need to know who
/// attacked whom (plotting, debugging detections).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackWindowRecord {
    pub start: i64,
    pub end: i64,
    pub target_dead: bool,
    /// Hero names of the attackers, ordered by slot
    pub attackers: Vec<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Analysis Config
// ─────────────────────────────────────────────────────────────────────────────

/// Which per-player windows feed into action moments.
///
/// Both sources can be enabled at once; their windows are unioned before
/// merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentSources {
    /// Windows where the player attacked someone who died (kill participation)
    #[serde(default = "default_true")]
    pub kills: bool,
    /// Windows where the player was attacked by identified heroes and survived
    #[serde(default)]
    pub escapes: bool,
}

impl Default for MomentSources {
    fn default() -> Self {
        Self {
            kills: true,
            escapes: false,
        }
    }
}

impl MomentSources {
    pub fn kills_only() -> Self {
        Self::default()
    }

    pub fn escapes_only() -> Self {
        Self {
            kills: false,
            escapes: true,
        }
    }

    pub fn all() -> Self {
        Self {
            kills: true,
            escapes: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.kills && !self.escapes
    }
}

/// Thresholds and window sizes for signal derivation, attack detection and
/// moment aggregation. Window sizes and gaps are in ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Trailing window (samples) for the running maximum of health
    #[serde(default = "default_max_health_window")]
    pub max_health_window: usize,
    /// Trailing window (samples) for smoothing the health rate
    #[serde(default = "default_smooth_window")]
    pub smooth_window: usize,
    /// Smoothed health rate below which a player counts as under attack
    #[serde(default = "default_health_rate_threshold")]
    pub health_rate_threshold: f64,
    /// Health / running max health below which a player counts as under attack
    #[serde(default = "default_relative_health_threshold")]
    pub relative_health_threshold: f64,
    /// Gap bridged when merging per-player and per-match moments
    #[serde(default = "default_moment_merge_gap")]
    pub moment_merge_gap: i64,
    /// Gap bridged by the single-player highlight query.
    /// Kept separate from `moment_merge_gap` on purpose; the two have never
    /// been reconciled.
    #[serde(default = "default_single_player_merge_gap")]
    pub single_player_merge_gap: i64,
    #[serde(default)]
    pub moment_sources: MomentSources,
}

fn default_true() -> bool {
    true
}

fn default_max_health_window() -> usize {
    120
}

fn default_smooth_window() -> usize {
    3
}

fn default_health_rate_threshold() -> f64 {
    -20.0
}

fn default_relative_health_threshold() -> f64 {
    0.3
}

fn default_moment_merge_gap() -> i64 {
    210
}

fn default_single_player_merge_gap() -> i64 {
    10
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_health_window: default_max_health_window(),
            smooth_window: default_smooth_window(),
            health_rate_threshold: default_health_rate_threshold(),
            relative_health_threshold: default_relative_health_threshold(),
            moment_merge_gap: default_moment_merge_gap(),
            single_player_merge_gap: default_single_player_merge_gap(),
            moment_sources: MomentSources::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App Config
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding `<match_id>.jsonlines` event logs
    pub replay_directory: String,
    /// Optional TOML file replacing the bundled unit -> hero name table
    #[serde(default)]
    pub hero_table_path: Option<String>,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            replay_directory: "replays".to_string(),
            hero_table_path: None,
            analysis: AnalysisConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn with_replay_directory(replay_directory: String) -> Self {
        Self {
            replay_directory,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_analysis_table_uses_defaults() {
        let config: AnalysisConfig = toml::from_str("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.max_health_window, 120);
        assert_eq!(config.moment_merge_gap, 210);
        assert_eq!(config.single_player_merge_gap, 10);
        assert!(config.moment_sources.kills);
        assert!(!config.moment_sources.escapes);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
replay_directory = "/data/replays"

[analysis]
moment_merge_gap = 30

[analysis.moment_sources]
escapes = true
"#,
        )
        .unwrap();

        assert_eq!(config.replay_directory, "/data/replays");
        assert_eq!(config.analysis.moment_merge_gap, 30);
        assert_eq!(config.analysis.single_player_merge_gap, 10);
        assert_eq!(config.analysis.moment_sources, MomentSources::all());
        assert!(config.hero_table_path.is_none());
    }

    #[test]
    fn moment_sources_presets() {
        assert!(MomentSources::kills_only().kills);
        assert!(!MomentSources::kills_only().escapes);
        assert!(MomentSources::escapes_only().escapes);
        assert!(
            MomentSources {
                kills: false,
                escapes: false
            }
            .is_empty()
        );
    }
}

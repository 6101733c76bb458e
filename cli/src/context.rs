use std::path::Path;
use std::sync::Arc;

use skirmish_core::context::{AnalysisConfigExt, AppConfig, AppConfigExt};
use skirmish_core::{HeroTable, Match, MatchError};

/// Holds all state of the interactive session: the persisted configuration
/// and the match currently loaded, if any.
pub struct CliContext {
    pub config: AppConfig,
    active: Option<Match>,
}

impl Default for CliContext {
    fn default() -> Self {
        Self::new()
    }
}

impl CliContext {
    pub fn new() -> Self {
        Self::with_config(AppConfig::load())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    /// Replace the active match with the one at `path`, or the one in the
    /// configured replay directory when no path is given. A failed load
    /// leaves no match active.
    pub fn load_match(&mut self, match_id: u64, path: Option<&Path>) -> Result<&Match, String> {
        self.clear();
        self.config
            .analysis
            .validate()
            .map_err(|e| format!("invalid analysis settings: {e}"))?;
        let heroes: Arc<HeroTable> = self.config.hero_table().map_err(|e| e.to_string())?;

        let m = match path {
            Some(path) if !path.is_file() => {
                return Err(MatchError::ReplayNotFound {
                    match_id,
                    path: path.to_path_buf(),
                }
                .to_string());
            }
            Some(path) => Match::from_path(match_id, path).with_config(self.config.analysis.clone()),
            None => Match::from_app_config(match_id, &self.config).map_err(|e| e.to_string())?,
        };
        let m = m.with_hero_table(heroes);
        m.parse().map_err(|e| error_chain(&e))?;

        Ok(self.active.insert(m))
    }

    pub fn active(&self) -> Result<&Match, String> {
        self.active
            .as_ref()
            .ok_or_else(|| "no match loaded, use `load --match-id <id>`".to_string())
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

/// Error message followed by its sources, one per line.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = concat!(
        r#"{"time":0,"ticks":0,"type":"interval","unit":"CDOTA_Unit_Hero_Axe","slot":0,"hp":700}"#,
        "\n",
        r#"{"time":0,"ticks":0,"type":"interval","unit":"CDOTA_Unit_Hero_Lina","slot":1,"hp":500}"#,
        "\n",
        r#"{"time":1,"ticks":1,"type":"DOTA_COMBATLOG_MODIFIER_ADD"}"#,
        "\n",
        r#"{"time":2,"type":"epilogue","key":"{\"gameInfo_\":{\"dota_\":{\"playerInfo_\":[{\"steamid_\":11},{\"steamid_\":12}]}}}"}"#,
        "\n",
    );

    fn context_in(dir: &Path) -> CliContext {
        CliContext::with_config(AppConfig::with_replay_directory(
            dir.to_string_lossy().into_owned(),
        ))
    }

    #[test]
    fn loads_match_from_replay_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("77.jsonlines"), LOG).unwrap();
        let mut ctx = context_in(dir.path());

        let m = ctx.load_match(77, None).unwrap();
        assert!(m.is_parsed());
        assert_eq!(m.players().unwrap().len(), 2);
        assert_eq!(ctx.active().unwrap().match_id(), 77);
    }

    #[test]
    fn loads_match_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anything.jsonl");
        std::fs::write(&path, LOG).unwrap();
        let mut ctx = context_in(Path::new("/nonexistent"));

        let m = ctx.load_match(5, Some(path.as_path())).unwrap();
        assert_eq!(m.match_id(), 5);
    }

    #[test]
    fn missing_replay_leaves_no_active_match() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_in(dir.path());

        let err = ctx.load_match(1, None).unwrap_err();
        assert!(err.contains("no event log"), "{err}");
        assert!(ctx.active().is_err());
    }

    #[test]
    fn failed_reload_drops_the_previous_match() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("77.jsonlines"), LOG).unwrap();
        std::fs::write(dir.path().join("78.jsonlines"), "{\"type\":\"interval\"}\n").unwrap();
        let mut ctx = context_in(dir.path());

        ctx.load_match(77, None).unwrap();
        assert!(ctx.load_match(78, None).is_err());
        assert!(ctx.active().is_err());

        ctx.load_match(77, None).unwrap();
        assert!(ctx.load_match(79, None).is_err());
        assert!(ctx.active().is_err());
    }

    #[test]
    fn invalid_settings_are_rejected_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("77.jsonlines"), LOG).unwrap();
        let mut ctx = context_in(dir.path());
        ctx.config.analysis.smooth_window = 0;

        let err = ctx.load_match(77, None).unwrap_err();
        assert!(err.starts_with("invalid analysis settings"), "{err}");
    }

    #[test]
    fn error_chain_lists_causes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("8.jsonlines"), "{\"type\":\"interval\"}\n").unwrap();
        let mut ctx = context_in(dir.path());

        let err = ctx.load_match(8, None).unwrap_err();
        assert!(err.contains("caused by"), "{err}");
    }
}

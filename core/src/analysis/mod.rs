//! Match and player model.
//!
//! A [`Match`] owns the event stream and everything derived from it. The
//! stream is read and the roster resolved once, on first demand; players
//! are handed out as [`Player`] views that compute their signals, attack
//! windows and moments lazily and cache them on the match.

mod error;
mod player;


use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use once_cell::sync::OnceCell;
use skirmish_types::{AttackWindowRecord, MomentRecord};

use crate::combat_log::{ReplayEvent, Reader};
use crate::context::{AnalysisConfig, AppConfig, AppConfigExt, lookup};
use crate::game_data::HeroTable;
use crate::identity::{IdentityMap, OpenDotaRosterDecoder, RosterDecoder};
use crate::moments::{self, ActionMoment};

pub use error::{EventOrigin, MatchError};
pub use player::Player;
use player::PlayerState;

/// Identities plus per-player caches, available once the match is parsed.
#[derive(Debug)]
pub(crate) struct ResolvedMatch {
    identity: IdentityMap,
    players: Vec<PlayerState>,
}

pub struct Match {
    match_id: u64,
    origin: EventOrigin,
    config: AnalysisConfig,
    heroes: Arc<HeroTable>,
    roster_decoder: Box<dyn RosterDecoder>,
    events: OnceCell<Vec<ReplayEvent>>,
    resolved: OnceCell<ResolvedMatch>,
    moments: OnceLock<Vec<ActionMoment>>,
}

impl Match {
    fn with_origin(match_id: u64, origin: EventOrigin, events: OnceCell<Vec<ReplayEvent>>) -> Self {
        Self {
            match_id,
            origin,
            config: AnalysisConfig::default(),
            heroes: HeroTable::bundled(),
            roster_decoder: Box::new(OpenDotaRosterDecoder),
            events,
            resolved: OnceCell::new(),
            moments: OnceLock::new(),
        }
    }

    /// A match over events already in memory.
    pub fn from_events(match_id: u64, events: Vec<ReplayEvent>) -> Self {
        Self::with_origin(match_id, EventOrigin::Memory, OnceCell::with_value(events))
    }

    /// A match over the event log at `path`. Nothing is read until the
    /// match is first queried.
    pub fn from_path(match_id: u64, path: impl Into<PathBuf>) -> Self {
        Self::with_origin(match_id, EventOrigin::File(path.into()), OnceCell::new())
    }

    /// A match over `<replay_dir>/<match_id>.jsonlines`.
    pub fn from_id(match_id: u64, replay_dir: impl AsRef<Path>) -> Result<Self, MatchError> {
        let path = replay_dir.as_ref().join(format!("{match_id}.jsonlines"));
        if !path.is_file() {
            return Err(MatchError::ReplayNotFound { match_id, path });
        }
        Ok(Self::from_path(match_id, path))
    }

    /// A match from the configured replay directory, with the configured
    /// analysis settings.
    pub fn from_app_config(match_id: u64, config: &AppConfig) -> Result<Self, MatchError> {
        let path = config.replay_path(match_id);
        if !path.is_file() {
            return Err(MatchError::ReplayNotFound { match_id, path });
        }
        Ok(Self::from_path(match_id, path).with_config(config.analysis.clone()))
    }

    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_hero_table(mut self, heroes: Arc<HeroTable>) -> Self {
        self.heroes = heroes;
        self
    }

    pub fn with_roster_decoder(mut self, decoder: Box<dyn RosterDecoder>) -> Self {
        self.roster_decoder = decoder;
        self
    }

    pub fn match_id(&self) -> u64 {
        self.match_id
    }

    pub fn origin(&self) -> &EventOrigin {
        &self.origin
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn is_parsed(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// The full event stream, read on first access.
    pub fn events(&self) -> Result<&[ReplayEvent], MatchError> {
        self.events
            .get_or_try_init(|| match &self.origin {
                EventOrigin::File(path) => Reader::from(path.clone())
                    .read_events()
                    .map_err(|err| MatchError::from_reader(self.match_id, self.origin.clone(), err)),
                // in-memory events are set at construction
                EventOrigin::Memory => Ok(Vec::new()),
            })
            .map(Vec::as_slice)
    }

    fn resolved(&self) -> Result<&ResolvedMatch, MatchError> {
        self.resolved.get_or_try_init(|| {
            let events = self.events()?;
            let identity =
                IdentityMap::resolve(events, &self.heroes, self.roster_decoder.as_ref())
                    .map_err(|err| {
                        MatchError::from_identity(self.match_id, self.origin.clone(), err)
                    })?;
            let players: Vec<PlayerState> = identity.players().map(PlayerState::new).collect();

            tracing::info!(
                match_id = self.match_id,
                origin = %self.origin,
                events = events.len(),
                players = players.len(),
                "Parsed match"
            );
            Ok(ResolvedMatch { identity, players })
        })
    }

    /// Reads the stream and resolves player identities. Later calls are
    /// free; a failed parse is retried on the next call.
    pub fn parse(&self) -> Result<(), MatchError> {
        self.resolved().map(|_| ())
    }

    pub fn identity(&self) -> Result<&IdentityMap, MatchError> {
        Ok(&self.resolved()?.identity)
    }

    /// Players ordered by slot.
    pub fn players(&self) -> Result<Vec<Player<'_>>, MatchError> {
        let resolved = self.resolved()?;
        let events = self.events()?;
        Ok((0..resolved.players.len())
            .map(|index| Player::new(self, resolved, events, index))
            .collect())
    }

    /// The player on `hero_name` (combat-log name, e.g. `npc_dota_hero_axe`).
    pub fn player(&self, hero_name: &str) -> Result<Option<Player<'_>>, MatchError> {
        let resolved = self.resolved()?;
        let events = self.events()?;
        let Some(hero) = lookup(hero_name) else {
            return Ok(None);
        };
        Ok(resolved
            .players
            .iter()
            .position(|state| state.hero_name() == hero)
            .map(|index| Player::new(self, resolved, events, index)))
    }

    fn require_player(&self, hero_name: &str) -> Result<Player<'_>, MatchError> {
        self.player(hero_name)?
            .ok_or_else(|| MatchError::PlayerNotFound {
                match_id: self.match_id,
                hero_name: hero_name.to_string(),
            })
    }

    /// Every player's moments merged into one set for the match.
    pub fn action_moments(&self) -> Result<&[ActionMoment], MatchError> {
        let players = self.players()?;
        let moments = self.moments.get_or_init(|| {
            moments::combine_moments(
                players.iter().map(|p| p.action_moments()),
                self.config.moment_merge_gap,
            )
        });
        Ok(moments.as_slice())
    }

    pub fn get_action_moments(&self) -> Result<Vec<MomentRecord>, MatchError> {
        Ok(moments::to_records(self.action_moments()?))
    }

    /// One player's moments, merged with the single-player gap.
    pub fn single_player_action_moments(
        &self,
        hero_name: &str,
    ) -> Result<Vec<ActionMoment>, MatchError> {
        let player = self.require_player(hero_name)?;
        Ok(moments::combine_moments(
            [player.action_moments()],
            self.config.single_player_merge_gap,
        ))
    }

    pub fn get_single_player_action_moments(
        &self,
        hero_name: &str,
    ) -> Result<Vec<MomentRecord>, MatchError> {
        Ok(moments::to_records(
            &self.single_player_action_moments(hero_name)?,
        ))
    }

    /// Attack windows against one player, with attacker hero names.
    pub fn attack_windows(&self, hero_name: &str) -> Result<Vec<AttackWindowRecord>, MatchError> {
        Ok(self.require_player(hero_name)?.attack_window_records())
    }
}

impl std::fmt::Display for Match {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Match: {}, parsed: {}", self.match_id, self.is_parsed())
    }
}

impl std::fmt::Debug for Match {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Match")
            .field("match_id", &self.match_id)
            .field("origin", &self.origin)
            .field("parsed", &self.is_parsed())
            .finish_non_exhaustive()
    }
}

use std::sync::OnceLock;

use skirmish_types::{AttackWindowRecord, MomentRecord};

use super::{Match, ResolvedMatch};
use crate::attacks::{self, AttackWindow, CombatRow};
use crate::combat_log::{ReplayEvent, Slot};
use crate::context::{IStr, resolve};
use crate::identity::{PlayerIdentity, SteamId};
use crate::moments::{self, ActionMoment};
use crate::signals::HealthSignals;
use crate::timeline::TimeTable;

/// Per-player state owned by the match. Every derived table is computed on
/// first access and kept for the life of the match.
#[derive(Debug)]
pub(crate) struct PlayerState {
    identity: PlayerIdentity,
    signals: OnceLock<HealthSignals>,
    deaths: OnceLock<TimeTable<CombatRow>>,
    damage_in: OnceLock<TimeTable<CombatRow>>,
    damage_out: OnceLock<TimeTable<CombatRow>>,
    as_target: OnceLock<TimeTable<AttackWindow>>,
    as_attacker: OnceLock<TimeTable<AttackWindow>>,
    moments: OnceLock<Vec<ActionMoment>>,
}

impl PlayerState {
    pub(crate) fn new(identity: PlayerIdentity) -> Self {
        Self {
            identity,
            signals: OnceLock::new(),
            deaths: OnceLock::new(),
            damage_in: OnceLock::new(),
            damage_out: OnceLock::new(),
            as_target: OnceLock::new(),
            as_attacker: OnceLock::new(),
            moments: OnceLock::new(),
        }
    }

    pub(crate) fn hero_name(&self) -> IStr {
        self.identity.hero_name
    }
}

/// A participant of a parsed match.
///
/// Borrowed view into the match; cheap to copy.
#[derive(Clone, Copy)]
pub struct Player<'m> {
    owner: &'m Match,
    resolved: &'m ResolvedMatch,
    events: &'m [ReplayEvent],
    index: usize,
}

impl<'m> Player<'m> {
    pub(crate) fn new(
        owner: &'m Match,
        resolved: &'m ResolvedMatch,
        events: &'m [ReplayEvent],
        index: usize,
    ) -> Self {
        Self {
            owner,
            resolved,
            events,
            index,
        }
    }

    fn state(&self) -> &'m PlayerState {
        &self.resolved.players[self.index]
    }

    pub fn match_id(&self) -> u64 {
        self.owner.match_id()
    }

    pub fn slot(&self) -> Slot {
        self.state().identity.slot
    }

    pub fn hero_name(&self) -> &'static str {
        resolve(self.state().identity.hero_name)
    }

    pub fn steam_id(&self) -> SteamId {
        self.state().identity.steam_id
    }

    pub fn unit(&self) -> &'static str {
        resolve(self.state().identity.unit)
    }

    pub fn events(&self) -> &'m [ReplayEvent] {
        self.events
    }

    pub fn signals(&self) -> &'m HealthSignals {
        let state = self.state();
        state.signals.get_or_init(|| {
            HealthSignals::from_events(self.events, state.identity.unit, self.owner.config())
        })
    }

    pub fn deaths(&self) -> &'m TimeTable<CombatRow> {
        let state = self.state();
        state
            .deaths
            .get_or_init(|| attacks::deaths(self.events, state.identity.hero_name))
    }

    pub fn damage_in(&self) -> &'m TimeTable<CombatRow> {
        let state = self.state();
        state
            .damage_in
            .get_or_init(|| attacks::damage_in(self.events, state.identity.hero_name))
    }

    pub fn damage_out(&self) -> &'m TimeTable<CombatRow> {
        let state = self.state();
        state
            .damage_out
            .get_or_init(|| attacks::damage_out(self.events, state.identity.hero_name))
    }

    /// Windows in which this player was attacked.
    pub fn as_target(&self) -> &'m TimeTable<AttackWindow> {
        let state = self.state();
        state.as_target.get_or_init(|| {
            attacks::find_attacks(
                self.slot(),
                self.signals(),
                self.damage_in(),
                self.deaths(),
                &self.resolved.identity,
                self.owner.config(),
            )
        })
    }

    /// Windows in which this player attacked someone else.
    pub fn as_attacker(&self) -> &'m TimeTable<AttackWindow> {
        let state = self.state();
        state.as_attacker.get_or_init(|| {
            let others = self.others();
            moments::as_attacker(self.slot(), others.iter().map(|p| p.as_target()))
        })
    }

    pub fn action_moments(&self) -> &'m [ActionMoment] {
        let state = self.state();
        state.moments.get_or_init(|| {
            let config = self.owner.config();
            moments::player_moments(
                self.as_target(),
                self.as_attacker(),
                config.moment_sources,
                config.moment_merge_gap,
            )
        })
    }

    pub fn get_action_moments(&self) -> Vec<MomentRecord> {
        moments::to_records(self.action_moments())
    }

    /// Attack windows against this player with attacker hero names.
    pub fn attack_window_records(&self) -> Vec<AttackWindowRecord> {
        let identity = &self.resolved.identity;
        self.as_target()
            .iter()
            .map(|window| AttackWindowRecord {
                start: window.start,
                end: window.end,
                target_dead: window.target_dead,
                attackers: window
                    .attackers
                    .iter()
                    .filter_map(|&slot| identity.name_of_slot(slot))
                    .map(|name| resolve(name).to_string())
                    .collect(),
            })
            .collect()
    }

    fn others(&self) -> Vec<Player<'m>> {
        (0..self.resolved.players.len())
            .filter(|&index| index != self.index)
            .map(|index| Player::new(self.owner, self.resolved, self.events, index))
            .collect()
    }
}

impl PartialEq for Player<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.owner, other.owner) && self.index == other.index
    }
}

impl Eq for Player<'_> {}

impl std::fmt::Debug for Player<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("match_id", &self.match_id())
            .field("slot", &self.slot())
            .field("hero_name", &self.hero_name())
            .field("steam_id", &self.steam_id())
            .finish()
    }
}

impl std::fmt::Display for Player<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Player at match: {}, slot: {}, hero_name: {}, steam_id: {}",
            self.match_id(),
            self.slot(),
            self.hero_name(),
            self.steam_id()
        )
    }
}

//! Who is who in a match.
//!
//! Interval snapshots tie a unit to a slot; the hero table ties a unit to
//! its combat-log hero name; the epilogue roster ties slots to external
//! account ids. The resolver joins the three into one map.

mod roster;

use std::collections::BTreeMap;

use hashbrown::HashMap;
use thiserror::Error;

use crate::combat_log::{EventKind, ReplayEvent, Slot};
use crate::context::{IStr, resolve};
use crate::game_data::HeroTable;

pub use roster::{
    OpenDotaRosterDecoder, RosterDecoder, RosterError, SteamId, encode_opendota_roster,
};

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("event stream is empty")]
    EmptyStream,

    #[error("no interval snapshot names a unit")]
    NoUnits,

    #[error("unit {unit} is not in the hero table")]
    UnknownUnit { unit: String },

    #[error("no epilogue event, roster can't be resolved")]
    MissingRoster,

    #[error("failed to decode roster from epilogue at line {line_number}")]
    Roster {
        line_number: u64,
        #[source]
        source: RosterError,
    },

    #[error("roster lists {roster} players but {slots} slots were observed")]
    RosterMismatch { roster: usize, slots: usize },
}

/// Everything known about one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerIdentity {
    pub slot: Slot,
    pub unit: IStr,
    pub hero_name: IStr,
    pub steam_id: SteamId,
}

#[derive(Debug, Clone)]
pub struct IdentityMap {
    unit_to_slot: HashMap<IStr, Slot>,
    slot_to_unit: BTreeMap<Slot, IStr>,
    unit_to_name: HashMap<IStr, IStr>,
    name_to_slot: HashMap<IStr, Slot>,
    slot_to_name: BTreeMap<Slot, IStr>,
    slot_to_steam_id: BTreeMap<Slot, SteamId>,
}

impl IdentityMap {
    pub fn resolve(
        events: &[ReplayEvent],
        heroes: &HeroTable,
        roster: &dyn RosterDecoder,
    ) -> Result<Self, IdentityError> {
        if events.is_empty() {
            return Err(IdentityError::EmptyStream);
        }

        // Units in order of first appearance; a unit seen in several slots
        // keeps the last one.
        let mut units: Vec<IStr> = Vec::new();
        let mut unit_to_slot: HashMap<IStr, Slot> = HashMap::new();
        let mut epilogue = None;
        for event in events {
            match &event.kind {
                EventKind::Interval(snapshot) => {
                    if let (Some(unit), Some(slot)) = (snapshot.unit, snapshot.slot) {
                        if unit_to_slot.insert(unit, slot).is_none() {
                            units.push(unit);
                        }
                    }
                }
                EventKind::Epilogue(e) => epilogue = Some((event.line_number, e)),
                _ => {}
            }
        }

        if units.is_empty() {
            return Err(IdentityError::NoUnits);
        }

        // A slot observed with several units belongs to the most recently
        // introduced one; the units it displaced drop out of the map.
        let mut slot_to_unit: BTreeMap<Slot, IStr> = BTreeMap::new();
        let mut unit_to_name = HashMap::new();
        for &unit in &units {
            let name = heroes.get(unit).ok_or_else(|| IdentityError::UnknownUnit {
                unit: resolve(unit).to_string(),
            })?;
            slot_to_unit.insert(unit_to_slot[&unit], unit);
            unit_to_name.insert(unit, name);
        }
        unit_to_slot.retain(|unit, slot| slot_to_unit.get(&*slot) == Some(unit));
        unit_to_name.retain(|unit, _| unit_to_slot.contains_key(unit));
        let slot_to_name: BTreeMap<Slot, IStr> = slot_to_unit
            .iter()
            .map(|(&slot, unit)| (slot, unit_to_name[unit]))
            .collect();
        let name_to_slot: HashMap<IStr, Slot> = slot_to_name
            .iter()
            .map(|(&slot, &name)| (name, slot))
            .collect();

        let (line_number, epilogue) = epilogue.ok_or(IdentityError::MissingRoster)?;
        let steam_ids = roster
            .decode(epilogue)
            .map_err(|source| IdentityError::Roster {
                line_number,
                source,
            })?;
        if steam_ids.len() != slot_to_name.len() {
            return Err(IdentityError::RosterMismatch {
                roster: steam_ids.len(),
                slots: slot_to_name.len(),
            });
        }
        let slot_to_steam_id = slot_to_name.keys().copied().zip(steam_ids).collect();

        Ok(Self {
            unit_to_slot,
            slot_to_unit,
            unit_to_name,
            name_to_slot,
            slot_to_name,
            slot_to_steam_id,
        })
    }

    /// Participants ordered by slot.
    pub fn players(&self) -> impl Iterator<Item = PlayerIdentity> + '_ {
        self.slot_to_name.iter().filter_map(|(&slot, &hero_name)| {
            Some(PlayerIdentity {
                slot,
                unit: *self.slot_to_unit.get(&slot)?,
                hero_name,
                steam_id: *self.slot_to_steam_id.get(&slot)?,
            })
        })
    }

    pub fn slot_count(&self) -> usize {
        self.slot_to_name.len()
    }

    pub fn slot_of_unit(&self, unit: IStr) -> Option<Slot> {
        self.unit_to_slot.get(&unit).copied()
    }

    pub fn unit_of_slot(&self, slot: Slot) -> Option<IStr> {
        self.slot_to_unit.get(&slot).copied()
    }

    pub fn name_of_unit(&self, unit: IStr) -> Option<IStr> {
        self.unit_to_name.get(&unit).copied()
    }

    pub fn slot_of_name(&self, hero_name: IStr) -> Option<Slot> {
        self.name_to_slot.get(&hero_name).copied()
    }

    pub fn name_of_slot(&self, slot: Slot) -> Option<IStr> {
        self.slot_to_name.get(&slot).copied()
    }

    pub fn steam_id_of_slot(&self, slot: Slot) -> Option<SteamId> {
        self.slot_to_steam_id.get(&slot).copied()
    }
}

use std::borrow::Cow;

use serde::Deserialize;

use super::*;
use crate::context::intern;
use crate::game_data::event_type;

#[cfg(test)]
mod tests;

/// Field layout shared by every record type of the JSON-lines log.
/// Unknown fields are ignored; type-specific fields are all optional here.
#[derive(Deserialize)]
struct RawEvent<'a> {
    #[serde(rename = "type", borrow)]
    kind: Option<Cow<'a, str>>,
    time: Option<i64>,
    ticks: Option<i64>,

    // interval
    #[serde(borrow)]
    unit: Option<Cow<'a, str>>,
    slot: Option<Slot>,
    hp: Option<i64>,

    // epilogue
    key: Option<String>,

    // combat log
    #[serde(borrow)]
    attackername: Option<Cow<'a, str>>,
    #[serde(borrow)]
    sourcename: Option<Cow<'a, str>>,
    #[serde(borrow)]
    targetname: Option<Cow<'a, str>>,
    #[serde(borrow)]
    targetsourcename: Option<Cow<'a, str>>,
    #[serde(default)]
    attackerhero: bool,
    #[serde(default)]
    targethero: bool,
    #[serde(default)]
    attackerillusion: bool,
    #[serde(default)]
    targetillusion: bool,
    #[serde(default)]
    value: i64,
}

/// Decodes JSON-lines replay events. Stateless, so one instance can be
/// shared across rayon workers.
#[derive(Debug, Default, Clone, Copy)]
pub struct EventParser;

impl EventParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse one line. Blank lines yield `Ok(None)`.
    pub fn parse_line(
        &self,
        line_number: u64,
        line: &str,
    ) -> Result<Option<ReplayEvent>, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let raw: RawEvent<'_> = serde_json::from_str(line)
            .map_err(|source| ParseError::InvalidJson { line_number, source })?;

        let time = raw.time.ok_or(ParseError::MissingTime { line_number })?;
        let ticks = raw.ticks;
        let kind = Self::parse_kind(line_number, raw)?;

        Ok(Some(ReplayEvent {
            line_number,
            time,
            ticks,
            kind,
        }))
    }

    pub fn parse_bytes(
        &self,
        line_number: u64,
        bytes: &[u8],
    ) -> Result<Option<ReplayEvent>, ParseError> {
        let line =
            std::str::from_utf8(bytes).map_err(|_| ParseError::InvalidEncoding { line_number })?;
        self.parse_line(line_number, line)
    }

    /// Parse a whole in-memory log, line by line, in order.
    pub fn parse_str(&self, contents: &str) -> Result<Vec<ReplayEvent>, ParseError> {
        contents
            .lines()
            .enumerate()
            .filter_map(|(idx, line)| self.parse_line(idx as u64 + 1, line).transpose())
            .collect()
    }

    fn parse_kind(line_number: u64, raw: RawEvent<'_>) -> Result<EventKind, ParseError> {
        let Some(tag) = raw.kind.as_deref() else {
            return Err(ParseError::MissingType { line_number });
        };

        let kind = match tag {
            event_type::INTERVAL => EventKind::Interval(IntervalSnapshot {
                unit: raw.unit.as_deref().filter(|u| !u.is_empty()).map(intern),
                slot: raw.slot,
                hp: raw.hp,
            }),
            event_type::EPILOGUE => EventKind::Epilogue(Epilogue { key: raw.key }),
            event_type::COMBATLOG_DAMAGE | event_type::COMBAT_DAMAGE => {
                EventKind::Damage(Self::combat_record(&raw))
            }
            event_type::COMBATLOG_DEATH | event_type::COMBAT_DEATH => {
                EventKind::Death(Self::combat_record(&raw))
            }
            other => EventKind::Other(intern(other)),
        };
        Ok(kind)
    }

    fn combat_record(raw: &RawEvent<'_>) -> CombatRecord {
        let name = |field: &Option<Cow<'_, str>>| intern(field.as_deref().unwrap_or_default());
        CombatRecord {
            attacker_name: name(&raw.attackername),
            source_name: name(&raw.sourcename),
            target_name: name(&raw.targetname),
            target_source_name: name(&raw.targetsourcename),
            attacker_hero: raw.attackerhero,
            target_hero: raw.targethero,
            attacker_illusion: raw.attackerillusion,
            target_illusion: raw.targetillusion,
            value: raw.value,
        }
    }
}

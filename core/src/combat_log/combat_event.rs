use crate::context::{IStr, empty_istr, intern};
use crate::timeline::{Tick, Timed};

/// Player slot as reported by `interval` snapshots (0..=9 in a regular match).
pub type Slot = u8;

/// One decoded record of the replay event log.
#[derive(Debug, Clone)]
pub struct ReplayEvent {
    /// 1-based line in the source file, 0 for events built in memory
    pub line_number: u64,
    /// Game time carried by every record
    pub time: Tick,
    /// Index tick used by every time-indexed query. Records without it never
    /// fall inside a bounded tick range.
    pub ticks: Option<Tick>,
    pub kind: EventKind,
}

#[derive(Debug, Clone)]
pub enum EventKind {
    Interval(IntervalSnapshot),
    Epilogue(Epilogue),
    Damage(CombatRecord),
    Death(CombatRecord),
    /// Any record type the engine doesn't read, kept by its type tag
    Other(IStr),
}

/// Periodic per-unit state snapshot. Fields are optional because the shape
/// is only enforced when a health series is built from them.
#[derive(Debug, Clone, Default)]
pub struct IntervalSnapshot {
    pub unit: Option<IStr>,
    pub slot: Option<Slot>,
    pub hp: Option<i64>,
}

/// Terminal record; `key` embeds the encoded match summary with the roster.
#[derive(Debug, Clone, Default)]
pub struct Epilogue {
    pub key: Option<String>,
}

/// Damage or death entry of the combat log.
///
/// `source_name` / `target_source_name` resolve summons and illusions to the
/// owning unit, `attacker_name` / `target_name` are the units themselves.
#[derive(Debug, Clone)]
pub struct CombatRecord {
    pub attacker_name: IStr,
    pub source_name: IStr,
    pub target_name: IStr,
    pub target_source_name: IStr,
    pub attacker_hero: bool,
    pub target_hero: bool,
    pub attacker_illusion: bool,
    pub target_illusion: bool,
    pub value: i64,
}

impl Default for CombatRecord {
    fn default() -> Self {
        Self {
            attacker_name: empty_istr(),
            source_name: empty_istr(),
            target_name: empty_istr(),
            target_source_name: empty_istr(),
            attacker_hero: false,
            target_hero: false,
            attacker_illusion: false,
            target_illusion: false,
            value: 0,
        }
    }
}

impl CombatRecord {
    /// A record between two real (non-illusion) heroes.
    pub fn between_heroes(attacker: &str, target: &str, value: i64) -> Self {
        let attacker = intern(attacker);
        let target = intern(target);
        Self {
            attacker_name: attacker,
            source_name: attacker,
            target_name: target,
            target_source_name: target,
            attacker_hero: true,
            target_hero: true,
            attacker_illusion: false,
            target_illusion: false,
            value,
        }
    }

    /// True when the target is the real hero `hero`, not an illusion of it.
    pub fn targets_hero(&self, hero: IStr) -> bool {
        self.target_source_name == hero && self.target_hero && !self.target_illusion
    }
}

impl ReplayEvent {
    /// An event whose index tick equals its game time.
    pub fn new(time: Tick, kind: EventKind) -> Self {
        Self {
            line_number: 0,
            time,
            ticks: Some(time),
            kind,
        }
    }

    pub fn with_ticks(mut self, ticks: Option<Tick>) -> Self {
        self.ticks = ticks;
        self
    }

    pub fn interval(time: Tick, unit: &str, slot: Slot, hp: i64) -> Self {
        Self::new(
            time,
            EventKind::Interval(IntervalSnapshot {
                unit: Some(intern(unit)),
                slot: Some(slot),
                hp: Some(hp),
            }),
        )
    }

    pub fn epilogue(time: Tick, key: impl Into<String>) -> Self {
        Self::new(
            time,
            EventKind::Epilogue(Epilogue {
                key: Some(key.into()),
            }),
        )
    }

    pub fn damage(time: Tick, record: CombatRecord) -> Self {
        Self::new(time, EventKind::Damage(record))
    }

    pub fn death(time: Tick, record: CombatRecord) -> Self {
        Self::new(time, EventKind::Death(record))
    }
}

impl Timed for ReplayEvent {
    fn ticks(&self) -> Option<Tick> {
        self.ticks
    }
}

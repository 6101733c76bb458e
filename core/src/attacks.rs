//! Attack-window detection.
//!
//! A player is under pressure while their smoothed health rate is below the
//! rate threshold or their health is a small fraction of their running max.
//! Each pressure run becomes a window, annotated with the heroes that hit
//! the player inside it and whether the player died.

use std::collections::BTreeSet;

use crate::combat_log::{CombatRecord, EventKind, ReplayEvent, Slot};
use crate::context::{AnalysisConfig, IStr, resolve};
use crate::identity::IdentityMap;
use crate::signals::HealthSignals;
use crate::timeline::{
    Interval, Tick, TimeSeries, TimeTable, Timed, convert_binary_mask_to_intervals,
};

// ─────────────────────────────────────────────────────────────────────────────
// Table rows
// ─────────────────────────────────────────────────────────────────────────────

/// A damage or death entry placed on the tick axis.
#[derive(Debug, Clone)]
pub struct CombatRow {
    pub ticks: Option<Tick>,
    pub time: Tick,
    pub record: CombatRecord,
}

impl Timed for CombatRow {
    fn ticks(&self) -> Option<Tick> {
        self.ticks
    }
}

fn combat_rows<'e>(
    events: &'e [ReplayEvent],
    select: impl Fn(&'e EventKind) -> Option<&'e CombatRecord>,
) -> TimeTable<CombatRow> {
    events
        .iter()
        .filter_map(|event| {
            select(&event.kind).map(|record| CombatRow {
                ticks: event.ticks,
                time: event.time,
                record: record.clone(),
            })
        })
        .collect()
}

/// Deaths of the real hero `hero`.
pub fn deaths(events: &[ReplayEvent], hero: IStr) -> TimeTable<CombatRow> {
    combat_rows(events, |kind| match kind {
        EventKind::Death(record) if record.targets_hero(hero) => Some(record),
        _ => None,
    })
}

/// Damage taken by the real hero `hero` from heroes or their illusions.
pub fn damage_in(events: &[ReplayEvent], hero: IStr) -> TimeTable<CombatRow> {
    combat_rows(events, |kind| match kind {
        EventKind::Damage(record)
            if record.targets_hero(hero)
                && (record.attacker_hero || record.attacker_illusion) =>
        {
            Some(record)
        }
        _ => None,
    })
}

/// Damage dealt by `hero` (or anything it owns) to real heroes.
pub fn damage_out(events: &[ReplayEvent], hero: IStr) -> TimeTable<CombatRow> {
    combat_rows(events, |kind| match kind {
        EventKind::Damage(record)
            if record.source_name == hero && record.target_hero && !record.target_illusion =>
        {
            Some(record)
        }
        _ => None,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Attack windows
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackWindow {
    pub start: Tick,
    pub end: Tick,
    /// Slot of the attacked player
    pub target: Slot,
    pub target_dead: bool,
    pub attackers: BTreeSet<Slot>,
}

impl AttackWindow {
    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }

    pub fn is_attacked_by(&self, slot: Slot) -> bool {
        self.attackers.contains(&slot)
    }

    /// Target survived a window in which identified heroes hit it.
    pub fn is_escape(&self) -> bool {
        !self.target_dead && !self.attackers.is_empty()
    }
}

impl Timed for AttackWindow {
    fn ticks(&self) -> Option<Tick> {
        Some(self.start)
    }
}

/// Per-sample pressure flag. NaN signals never flag a sample.
pub fn pressure_mask(signals: &HealthSignals, config: &AnalysisConfig) -> TimeSeries<bool> {
    let rate_threshold = config.health_rate_threshold;
    let relative_threshold = config.relative_health_threshold;

    let values = signals
        .health
        .values()
        .iter()
        .zip(signals.max_health.values())
        .zip(signals.smoothed_d_health.values())
        .map(|((&hp, &max_hp), &sdhp)| {
            let falling = sdhp < rate_threshold;
            let low = max_hp > 0.0 && hp / max_hp < relative_threshold;
            falling || low
        })
        .collect();
    signals.health.with_values(values)
}

/// Attack windows of the player in `target` slot.
///
/// Attackers are resolved from the damage source name, so summons and
/// illusions count for their owner. The target never attacks itself.
/// Windows without identified attackers are kept.
pub fn find_attacks(
    target: Slot,
    signals: &HealthSignals,
    damage_in: &TimeTable<CombatRow>,
    deaths: &TimeTable<CombatRow>,
    identity: &IdentityMap,
    config: &AnalysisConfig,
) -> TimeTable<AttackWindow> {
    if signals.is_empty() {
        return TimeTable::default();
    }

    let candidates = convert_binary_mask_to_intervals(&pressure_mask(signals, config));

    let windows: TimeTable<AttackWindow> = candidates
        .into_iter()
        .map(|Interval { start, end }| {
            let mut attackers = BTreeSet::new();
            for row in damage_in.range(Some(start), Some(end)) {
                if !row.record.attacker_hero {
                    continue;
                }
                match identity.slot_of_name(row.record.source_name) {
                    Some(slot) if slot != target => {
                        attackers.insert(slot);
                    }
                    Some(_) => {}
                    None => tracing::warn!(
                        source = resolve(row.record.source_name),
                        tick = start,
                        "Damage source is not a player hero, skipping attacker"
                    ),
                }
            }
            let target_dead = deaths.range(Some(start), Some(end)).next().is_some();

            AttackWindow {
                start,
                end,
                target,
                target_dead,
                attackers,
            }
        })
        .collect();

    tracing::debug!(slot = target, windows = windows.len(), "Detected attack windows");
    windows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::intern;
    use crate::game_data::HeroTable;
    use crate::identity::{OpenDotaRosterDecoder, encode_opendota_roster};

    const AXE_UNIT: &str = "CDOTA_Unit_Hero_Axe";
    const LINA_UNIT: &str = "CDOTA_Unit_Hero_Lina";
    const AXE: &str = "npc_dota_hero_axe";
    const LINA: &str = "npc_dota_hero_lina";

    fn config() -> AnalysisConfig {
        AnalysisConfig {
            max_health_window: 10,
            smooth_window: 3,
            ..Default::default()
        }
    }

    /// Axe in slot 0 at full health, Lina in slot 1 with the given health
    /// per tick, plus extra combat events.
    fn stream(lina_hp: &[i64], extra: Vec<ReplayEvent>) -> Vec<ReplayEvent> {
        let mut events = Vec::new();
        for (tick, &hp) in lina_hp.iter().enumerate() {
            events.push(ReplayEvent::interval(tick as Tick, AXE_UNIT, 0, 700));
            events.push(ReplayEvent::interval(tick as Tick, LINA_UNIT, 1, hp));
        }
        events.extend(extra);
        events.push(ReplayEvent::epilogue(
            lina_hp.len() as Tick,
            encode_opendota_roster(&[1, 2]),
        ));
        events
    }

    fn lina_attacks(events: &[ReplayEvent]) -> TimeTable<AttackWindow> {
        let identity =
            IdentityMap::resolve(events, &HeroTable::bundled(), &OpenDotaRosterDecoder).unwrap();
        let lina = intern(LINA);
        let config = config();
        let signals = HealthSignals::from_events(events, intern(LINA_UNIT), &config);
        find_attacks(
            1,
            &signals,
            &damage_in(events, lina),
            &deaths(events, lina),
            &identity,
            &config,
        )
    }

    #[test]
    fn constant_health_has_no_windows() {
        let events = stream(&[600; 100], Vec::new());
        assert!(lina_attacks(&events).is_empty());
    }

    #[test]
    fn health_drop_with_hero_damage_is_one_window() {
        // 600 until tick 49, a steep drop to 100 over ticks 50..=54,
        // then recovery to full at tick 59
        let mut hp = vec![600; 50];
        hp.extend([500, 400, 300, 200, 100, 100, 100, 100, 100]);
        hp.extend([600; 40]);
        let damage = ReplayEvent::damage(52, CombatRecord::between_heroes(AXE, LINA, 100));
        let events = stream(&hp, vec![damage]);

        let windows = lina_attacks(&events);
        assert_eq!(windows.len(), 1);
        let window = &windows.rows()[0];
        assert_eq!(window.interval(), Interval::new(50, 59));
        assert_eq!(window.target, 1);
        assert!(!window.target_dead);
        assert_eq!(window.attackers, BTreeSet::from([0]));
        assert!(window.is_escape());
    }

    #[test]
    fn window_without_hero_damage_is_kept_with_no_attackers() {
        let mut hp = vec![600; 20];
        hp.extend([400, 200, 600]);
        hp.extend([600; 10]);
        let events = stream(&hp, Vec::new());

        let windows = lina_attacks(&events);
        assert_eq!(windows.len(), 1);
        assert!(windows.rows()[0].attackers.is_empty());
        assert!(!windows.rows()[0].is_escape());
    }

    #[test]
    fn death_inside_window_marks_target_dead() {
        let mut hp = vec![600; 20];
        hp.extend([300, 0, 0, 0]);
        hp.extend([600; 10]);
        let kill = ReplayEvent::death(21, CombatRecord::between_heroes(AXE, LINA, 0));
        let events = stream(&hp, vec![kill]);

        let windows = lina_attacks(&events);
        assert_eq!(windows.len(), 1);
        assert!(windows.rows()[0].target_dead);
    }

    #[test]
    fn self_and_illusion_damage_are_not_attackers() {
        let mut hp = vec![600; 20];
        hp.extend([400, 200, 600]);
        hp.extend([600; 10]);

        let self_hit = ReplayEvent::damage(20, CombatRecord::between_heroes(LINA, LINA, 50));
        let mut illusion_hit = CombatRecord::between_heroes(AXE, LINA, 50);
        illusion_hit.attacker_hero = false;
        illusion_hit.attacker_illusion = true;
        let illusion_hit = ReplayEvent::damage(21, illusion_hit);
        let events = stream(&hp, vec![self_hit, illusion_hit]);

        let windows = lina_attacks(&events);
        assert_eq!(windows.len(), 1);
        assert!(windows.rows()[0].attackers.is_empty());
    }

    #[test]
    fn damage_tables_select_by_role() {
        let mut to_illusion = CombatRecord::between_heroes(AXE, LINA, 10);
        to_illusion.target_illusion = true;
        let events = vec![
            ReplayEvent::damage(1, CombatRecord::between_heroes(AXE, LINA, 10)),
            ReplayEvent::damage(2, CombatRecord::between_heroes(LINA, AXE, 20)),
            ReplayEvent::damage(3, to_illusion),
            ReplayEvent::death(4, CombatRecord::between_heroes(AXE, LINA, 0)),
        ];
        let lina = intern(LINA);
        let axe = intern(AXE);

        assert_eq!(damage_in(&events, lina).len(), 1);
        assert_eq!(damage_out(&events, lina).len(), 1);
        assert_eq!(damage_out(&events, axe).len(), 1);
        assert_eq!(deaths(&events, lina).len(), 1);
        assert!(deaths(&events, axe).is_empty());
    }

    #[test]
    fn relative_health_alone_flags_pressure() {
        let health = TimeSeries::new(vec![0, 1, 2], vec![100.0, 20.0, 20.0]);
        let signals = HealthSignals {
            max_health: health.with_values(vec![100.0, 100.0, 100.0]),
            d_health: health.with_values(vec![0.0, 0.0, 0.0]),
            smoothed_d_health: health.with_values(vec![0.0, 0.0, 0.0]),
            health,
        };
        let mask = pressure_mask(&signals, &config());
        assert_eq!(mask.values(), &[false, true, true]);
    }

    #[test]
    fn undefined_signals_never_flag_pressure() {
        let health = TimeSeries::new(vec![0, 1], vec![10.0, 5.0]);
        let signals = HealthSignals {
            max_health: health.with_values(vec![f64::NAN, f64::NAN]),
            d_health: health.with_values(vec![-5.0, -5.0]),
            smoothed_d_health: health.with_values(vec![f64::NAN, f64::NAN]),
            health,
        };
        let mask = pressure_mask(&signals, &config());
        assert_eq!(mask.values(), &[false, false]);
    }
}

//! Action moments: merged highlight windows built from attack windows.

use crate::attacks::AttackWindow;
use crate::combat_log::Slot;
use crate::context::MomentSources;
use crate::timeline::{Interval, Tick, TimeTable, Timed, merge_close_intervals};
use skirmish_types::MomentRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionMoment {
    pub start: Tick,
    pub end: Tick,
    /// Representative tick of the moment, always its start
    pub time: Tick,
}

impl ActionMoment {
    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }

    pub fn to_record(&self) -> MomentRecord {
        MomentRecord {
            start: self.start,
            end: self.end,
            clock_start: format_clock(self.start),
            clock_end: format_clock(self.end),
        }
    }
}

impl From<Interval> for ActionMoment {
    fn from(interval: Interval) -> Self {
        Self {
            start: interval.start,
            end: interval.end,
            time: interval.start,
        }
    }
}

impl Timed for ActionMoment {
    fn ticks(&self) -> Option<Tick> {
        Some(self.time)
    }
}

/// In-game clock for a tick: floored minutes and seconds, each at least two
/// characters wide. Pre-game ticks keep the sign on the minutes.
pub fn format_clock(tick: Tick) -> String {
    format!("{:02}:{:02}", tick.div_euclid(60), tick.rem_euclid(60))
}

pub fn to_records(moments: &[ActionMoment]) -> Vec<MomentRecord> {
    moments.iter().map(ActionMoment::to_record).collect()
}

/// Windows, across every player's attack windows, in which `slot` was one
/// of the attackers. Sorted by start.
pub fn as_attacker<'a>(
    slot: Slot,
    as_target: impl IntoIterator<Item = &'a TimeTable<AttackWindow>>,
) -> TimeTable<AttackWindow> {
    let mut windows: Vec<AttackWindow> = as_target
        .into_iter()
        .flat_map(|table| table.iter())
        .filter(|window| window.target != slot && window.is_attacked_by(slot))
        .cloned()
        .collect();
    windows.sort_by_key(|window| window.start);
    TimeTable::new(windows)
}

/// Intervals a player's moments are built from, per enabled source.
pub fn source_intervals(
    as_target: &TimeTable<AttackWindow>,
    as_attacker: &TimeTable<AttackWindow>,
    sources: MomentSources,
) -> Vec<Interval> {
    let mut intervals = Vec::new();
    if sources.kills {
        intervals.extend(
            as_attacker
                .iter()
                .filter(|window| window.target_dead)
                .map(AttackWindow::interval),
        );
    }
    if sources.escapes {
        intervals.extend(
            as_target
                .iter()
                .filter(|window| window.is_escape())
                .map(AttackWindow::interval),
        );
    }
    intervals
}

/// Merges intervals into moments.
pub fn merge_into_moments(intervals: &[Interval], gap: Tick) -> Vec<ActionMoment> {
    merge_close_intervals(intervals, gap)
        .into_iter()
        .map(ActionMoment::from)
        .collect()
}

pub fn player_moments(
    as_target: &TimeTable<AttackWindow>,
    as_attacker: &TimeTable<AttackWindow>,
    sources: MomentSources,
    gap: Tick,
) -> Vec<ActionMoment> {
    merge_into_moments(&source_intervals(as_target, as_attacker, sources), gap)
}

/// Union of several players' moments, merged again.
pub fn combine_moments<'a>(
    moments: impl IntoIterator<Item = &'a [ActionMoment]>,
    gap: Tick,
) -> Vec<ActionMoment> {
    let intervals: Vec<Interval> = moments
        .into_iter()
        .flatten()
        .map(ActionMoment::interval)
        .collect();
    merge_into_moments(&intervals, gap)
}

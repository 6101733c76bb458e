//! Interval algebra over tick ranges.
//!
//! All intervals are closed: `{start: 0, end: 5}` and `{start: 5, end: 10}`
//! share tick 5, so they intersect in the zero-length interval `{5, 5}` and
//! merge with a gap of 0.

use serde::Serialize;

use super::{Tick, TimeSeries};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Interval {
    pub start: Tick,
    pub end: Tick,
}

impl Interval {
    pub fn new(start: Tick, end: Tick) -> Self {
        debug_assert!(start <= end, "interval start {start} after end {end}");
        Self { start, end }
    }

    pub fn duration(&self) -> Tick {
        self.end - self.start
    }

    pub fn contains(&self, tick: Tick) -> bool {
        self.start <= tick && tick <= self.end
    }
}

/// Merges intervals whose start is at most `gap` ticks after the running end.
///
/// The output is sorted by start and pairwise separated by more than `gap`.
/// Zero or one interval is returned as is.
pub fn merge_close_intervals(intervals: &[Interval], gap: Tick) -> Vec<Interval> {
    if intervals.len() < 2 {
        return intervals.to_vec();
    }

    let mut sorted = intervals.to_vec();
    sorted.sort_unstable();

    let mut merged = Vec::with_capacity(sorted.len());
    let mut running = sorted[0];
    for current in &sorted[1..] {
        if current.start <= running.end + gap {
            running.end = running.end.max(current.end);
        } else {
            merged.push(running);
            running = *current;
        }
    }
    merged.push(running);
    merged
}

/// True when the two intervals would merge under `gap`.
pub fn has_intersection(a: Interval, b: Interval, gap: Tick) -> bool {
    merge_close_intervals(&[a, b], gap).len() < 2
}

pub fn get_intersection(a: Interval, b: Interval) -> Option<Interval> {
    if a.start > b.end || b.start > a.end {
        return None;
    }
    Some(Interval {
        start: a.start.max(b.start),
        end: a.end.min(b.end),
    })
}

/// Pairwise intersections of two interval sets.
///
/// Both sets are sorted by start. The scan over `set2` begins at the first
/// element that can still overlap the current `set1` element and stops as
/// soon as `set2` starts past its end.
pub fn get_intersections(set1: &[Interval], set2: &[Interval]) -> Vec<Interval> {
    let mut set1 = set1.to_vec();
    let mut set2 = set2.to_vec();
    set1.sort_by_key(|i| i.start);
    set2.sort_by_key(|i| i.start);

    let mut intersections = Vec::new();
    let mut lower = 0;
    for a in &set1 {
        // set1 starts never decrease, so anything ending before this start
        // is behind every remaining element too
        while lower < set2.len() && set2[lower].end < a.start {
            lower += 1;
        }
        for b in &set2[lower..] {
            if b.start > a.end {
                break;
            }
            if let Some(intersection) = get_intersection(*a, *b) {
                intersections.push(intersection);
            }
        }
    }
    intersections
}

pub fn total_duration(intervals: &[Interval]) -> Tick {
    intervals.iter().map(Interval::duration).sum()
}

/// Intersection over union of two interval sets.
///
/// The union is the gap-0 merge of both sets. Callers must pass sets whose
/// union has a positive duration; the ratio is undefined otherwise (NaN in
/// release builds).
pub fn calculate_iou(set1: &[Interval], set2: &[Interval]) -> f64 {
    let intersections = get_intersections(set1, set2);
    let combined: Vec<Interval> = set1.iter().chain(set2).copied().collect();
    let union = merge_close_intervals(&combined, 0);

    let total_intersection = total_duration(&intersections);
    let total_union = total_duration(&union);
    debug_assert!(total_union > 0, "IOU over an empty union is undefined");

    total_intersection as f64 / total_union as f64
}

/// Runs of `true` in a boolean series, as intervals of ticks.
///
/// A run opens at its first `true` tick and closes at the tick of the next
/// `false`. A run still open at the end closes at the last tick, unless it
/// opened on the last tick, in which case it has no end and is dropped.
pub fn convert_binary_mask_to_intervals(mask: &TimeSeries<bool>) -> Vec<Interval> {
    let mut intervals = Vec::new();
    let mut open: Option<Tick> = None;

    for (tick, &flag) in mask.iter() {
        match (open, flag) {
            (None, true) => open = Some(tick),
            (Some(start), false) => {
                intervals.push(Interval::new(start, tick));
                open = None;
            }
            _ => {}
        }
    }

    if let (Some(start), Some(last)) = (open, mask.last_tick()) {
        if start != last {
            intervals.push(Interval::new(start, last));
        }
    }
    intervals
}

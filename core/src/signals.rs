//! Health signals derived from a player's interval snapshots.
//!
//! Rolling statistics use trailing windows that need a full window of
//! samples; the leading undefined values are back-filled from the first
//! defined one. A series shorter than the window stays undefined (NaN).

use std::collections::VecDeque;

use crate::combat_log::{EventKind, ReplayEvent};
use crate::context::{AnalysisConfig, IStr, resolve};
use crate::timeline::{Tick, TimeSeries};

#[derive(Debug, Clone, Default)]
pub struct HealthSignals {
    pub health: TimeSeries<f64>,
    pub max_health: TimeSeries<f64>,
    pub d_health: TimeSeries<f64>,
    pub smoothed_d_health: TimeSeries<f64>,
}

impl HealthSignals {
    pub fn derive(health: TimeSeries<f64>, config: &AnalysisConfig) -> Self {
        let max_health = health.with_values(backfill(rolling_max(
            health.values(),
            config.max_health_window,
        )));
        let d_health = health.with_values(backfill(diff(health.values())));
        let smoothed_d_health = health.with_values(backfill(rolling_mean(
            d_health.values(),
            config.smooth_window,
        )));

        Self {
            health,
            max_health,
            d_health,
            smoothed_d_health,
        }
    }

    pub fn from_events(events: &[ReplayEvent], unit: IStr, config: &AnalysisConfig) -> Self {
        Self::derive(health_series(events, unit), config)
    }

    pub fn len(&self) -> usize {
        self.health.len()
    }

    pub fn is_empty(&self) -> bool {
        self.health.is_empty()
    }

    /// Health over running max health, NaN where the max is undefined.
    pub fn relative_health(&self) -> TimeSeries<f64> {
        self.health.zip_with(&self.max_health, |hp, max| hp / max)
    }

    /// All four signals for ticks in `[start, end]`.
    pub fn slice(&self, start: Option<Tick>, end: Option<Tick>) -> Self {
        Self {
            health: self.health.slice(start, end),
            max_health: self.max_health.slice(start, end),
            d_health: self.d_health.slice(start, end),
            smoothed_d_health: self.smoothed_d_health.slice(start, end),
        }
    }
}

/// Health samples of `unit` in stream order.
///
/// A snapshot of the unit without a tick or an hp value ends the series
/// there; everything sampled before it is kept.
pub fn health_series(events: &[ReplayEvent], unit: IStr) -> TimeSeries<f64> {
    let mut samples = Vec::new();
    for event in events {
        let EventKind::Interval(snapshot) = &event.kind else {
            continue;
        };
        if snapshot.unit != Some(unit) {
            continue;
        }
        match (event.ticks, snapshot.hp) {
            (Some(tick), Some(hp)) => samples.push((tick, hp as f64)),
            _ => {
                tracing::warn!(
                    unit = resolve(unit),
                    line = event.line_number,
                    samples = samples.len(),
                    "Interval snapshot without ticks or hp, truncating health series"
                );
                break;
            }
        }
    }
    samples.into_iter().collect()
}

/// Maximum over the trailing `window` samples; NaN until a full window
/// has been seen.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 {
        return out;
    }

    // indices of a decreasing run of values inside the window
    let mut candidates: VecDeque<usize> = VecDeque::with_capacity(window);
    for (i, &value) in values.iter().enumerate() {
        while candidates.back().is_some_and(|&j| values[j] <= value) {
            candidates.pop_back();
        }
        candidates.push_back(i);
        if candidates.front().is_some_and(|&j| j + window <= i) {
            candidates.pop_front();
        }
        if i + 1 >= window {
            if let Some(&j) = candidates.front() {
                out[i] = values[j];
            }
        }
    }
    out
}

/// Mean over the trailing `window` samples; NaN until a full window has
/// been seen or while the window holds a NaN.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 {
        return out;
    }

    let mut sum = 0.0;
    let mut nans = 0usize;
    for (i, &value) in values.iter().enumerate() {
        if value.is_nan() {
            nans += 1;
        } else {
            sum += value;
        }
        if i >= window {
            let leaving = values[i - window];
            if leaving.is_nan() {
                nans -= 1;
            } else {
                sum -= leaving;
            }
        }
        if i + 1 >= window && nans == 0 {
            out[i] = sum / window as f64;
        }
    }
    out
}

/// First difference; the first element has no predecessor and is NaN.
pub fn diff(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if !values.is_empty() {
        out.push(f64::NAN);
    }
    out.extend(values.windows(2).map(|pair| pair[1] - pair[0]));
    out
}

/// Replaces each NaN by the next defined value. Trailing NaNs stay.
pub fn backfill(mut values: Vec<f64>) -> Vec<f64> {
    let mut next = f64::NAN;
    for value in values.iter_mut().rev() {
        if value.is_nan() {
            *value = next;
        } else {
            next = *value;
        }
    }
    values
}

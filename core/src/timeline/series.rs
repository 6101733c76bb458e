//! Tick-indexed series and record tables with inclusive range queries.

pub type Tick = i64;

/// Records that can be placed on the tick axis.
///
/// Records without a tick never match a bounded range query.
pub trait Timed {
    fn ticks(&self) -> Option<Tick>;
}

fn in_range(tick: Tick, start: Option<Tick>, end: Option<Tick>) -> bool {
    start.is_none_or(|s| tick >= s) && end.is_none_or(|e| tick <= e)
}

// ─────────────────────────────────────────────────────────────────────────────
// TimeSeries
// ─────────────────────────────────────────────────────────────────────────────

/// Values sampled at ticks, in sample order.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<T> {
    ticks: Vec<Tick>,
    values: Vec<T>,
}

impl<T> Default for TimeSeries<T> {
    fn default() -> Self {
        Self {
            ticks: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<T> TimeSeries<T> {
    pub fn new(ticks: Vec<Tick>, values: Vec<T>) -> Self {
        assert_eq!(
            ticks.len(),
            values.len(),
            "time series needs one value per tick"
        );
        Self { ticks, values }
    }

    /// Same index, new values.
    pub fn with_values<U>(&self, values: Vec<U>) -> TimeSeries<U> {
        TimeSeries::new(self.ticks.clone(), values)
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn first_tick(&self) -> Option<Tick> {
        self.ticks.first().copied()
    }

    pub fn last_tick(&self) -> Option<Tick> {
        self.ticks.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tick, &T)> + '_ {
        self.ticks.iter().copied().zip(self.values.iter())
    }

    /// Samples with `start <= tick <= end`; a missing bound is open.
    pub fn range(
        &self,
        start: Option<Tick>,
        end: Option<Tick>,
    ) -> impl Iterator<Item = (Tick, &T)> + '_ {
        self.iter().filter(move |(tick, _)| in_range(*tick, start, end))
    }

    /// Element-wise combination of two series sharing an index.
    pub fn zip_with<U, V>(&self, other: &TimeSeries<U>, f: impl Fn(&T, &U) -> V) -> TimeSeries<V> {
        debug_assert_eq!(self.ticks, other.ticks, "series index mismatch");
        let values = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| f(a, b))
            .collect();
        self.with_values(values)
    }
}

impl<T: Clone> TimeSeries<T> {
    /// Owned sub-series for `[start, end]`.
    pub fn slice(&self, start: Option<Tick>, end: Option<Tick>) -> Self {
        let (ticks, values) = self
            .range(start, end)
            .map(|(tick, value)| (tick, value.clone()))
            .unzip();
        Self { ticks, values }
    }
}

impl<T> FromIterator<(Tick, T)> for TimeSeries<T> {
    fn from_iter<I: IntoIterator<Item = (Tick, T)>>(iter: I) -> Self {
        let (ticks, values) = iter.into_iter().unzip();
        Self { ticks, values }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TimeTable
// ─────────────────────────────────────────────────────────────────────────────

/// Records in stream order, queryable by their tick.
#[derive(Debug, Clone)]
pub struct TimeTable<R> {
    rows: Vec<R>,
}

impl<R> Default for TimeTable<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<R: Timed> TimeTable<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    /// Rows whose tick lies in `[start, end]`. With both bounds open every
    /// row is returned, including rows without a tick.
    pub fn range(&self, start: Option<Tick>, end: Option<Tick>) -> impl Iterator<Item = &R> + '_ {
        let unbounded = start.is_none() && end.is_none();
        self.rows.iter().filter(move |row| {
            unbounded || row.ticks().is_some_and(|tick| in_range(tick, start, end))
        })
    }
}

impl<R: Timed> FromIterator<R> for TimeTable<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, R> IntoIterator for &'a TimeTable<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

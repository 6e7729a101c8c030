use std::fmt;

use serde::{Deserialize, Serialize};

use super::histogram::Histogram;
use crate::stats::SummaryStats;

// ---------------------------------------------------------------------------
// ColumnId – stable slot of a column inside every tuple
// ---------------------------------------------------------------------------

/// Position of a column's value inside each [`Tuple`].
///
/// Ids are assigned by the data model when a table is loaded and do not move
/// when columns are disabled or enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColumnId(pub usize);

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tuple – one row of the table
// ---------------------------------------------------------------------------

/// One observation: a value per column plus the query-membership flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuple {
    values: Vec<f64>,
    #[serde(default = "default_query_flag")]
    query_flag: bool,
}

fn default_query_flag() -> bool {
    true
}

impl Tuple {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            query_flag: true,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value in a column slot, `None` past the end.
    pub fn get(&self, column: ColumnId) -> Option<f64> {
        self.values.get(column.0).copied()
    }

    /// Value in a column slot.
    ///
    /// # Panics
    /// If `column` is not a slot of this tuple.
    pub fn value(&self, column: ColumnId) -> f64 {
        self.values[column.0]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the tuple is in the current queried subset.
    pub fn query_flag(&self) -> bool {
        self.query_flag
    }

    pub(crate) fn set_query_flag(&mut self, flag: bool) {
        self.query_flag = flag;
    }
}

impl From<Vec<f64>> for Tuple {
    fn from(values: Vec<f64>) -> Self {
        Tuple::new(values)
    }
}

// ---------------------------------------------------------------------------
// StatsSnapshot – one full recompute pass worth of statistics
// ---------------------------------------------------------------------------

/// Statistics of one column over a tuple set (all tuples, or the queried ones).
///
/// Snapshots are replaced wholesale by each recompute pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub summary: SummaryStats,
    /// Always binned over the full column range.
    pub histogram: Histogram,
    /// Pearson r against every column, indexed by [`ColumnId`].
    pub correlations: Vec<f64>,
}

impl StatsSnapshot {
    pub fn empty(bins: usize) -> Self {
        Self {
            summary: SummaryStats::empty(),
            histogram: Histogram::new(bins, 0.0, 0.0),
            correlations: Vec::new(),
        }
    }

    pub fn iqr(&self) -> f64 {
        self.summary.iqr()
    }

    /// Correlation with another column; `0` if the slot is unknown.
    pub fn correlation(&self, other: ColumnId) -> f64 {
        self.correlations.get(other.0).copied().unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Column – one variable with its two snapshots and brushing state
// ---------------------------------------------------------------------------

/// One variable of the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    id: ColumnId,
    name: String,
    enabled: bool,
    query_set: bool,
    min_query_value: f64,
    max_query_value: f64,
    full: StatsSnapshot,
    query: StatsSnapshot,
}

impl Column {
    /// A fresh column; the data model assigns its id when the table is loaded.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ColumnId(0),
            name: name.into(),
            enabled: true,
            query_set: false,
            min_query_value: f64::NAN,
            max_query_value: f64::NAN,
            full: StatsSnapshot::empty(1),
            query: StatsSnapshot::empty(1),
        }
    }

    pub fn id(&self) -> ColumnId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a range restriction is active on this column.
    pub fn is_query_set(&self) -> bool {
        self.query_set
    }

    /// Lower bound of the brushed range.
    pub fn min_query_value(&self) -> f64 {
        self.min_query_value
    }

    /// Upper bound of the brushed range.
    pub fn max_query_value(&self) -> f64 {
        self.max_query_value
    }

    /// Statistics over all tuples.
    pub fn full(&self) -> &StatsSnapshot {
        &self.full
    }

    /// Statistics over the queried tuples.
    pub fn query(&self) -> &StatsSnapshot {
        &self.query
    }

    /// Whether `value` lies inside the brushed range (bounds inclusive).
    pub fn query_contains(&self, value: f64) -> bool {
        value >= self.min_query_value && value <= self.max_query_value
    }

    pub(crate) fn set_id(&mut self, id: ColumnId) {
        self.id = id;
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn set_query_range(&mut self, min: f64, max: f64) {
        self.min_query_value = min;
        self.max_query_value = max;
        self.query_set = true;
    }

    /// Drop the range restriction and reset the bounds to the full range.
    pub(crate) fn clear_query(&mut self) {
        self.query_set = false;
        self.min_query_value = self.full.summary.min;
        self.max_query_value = self.full.summary.max;
    }

    pub(crate) fn set_full(&mut self, snapshot: StatsSnapshot) {
        self.full = snapshot;
        if !self.query_set {
            self.min_query_value = self.full.summary.min;
            self.max_query_value = self.full.summary.max;
        }
    }

    pub(crate) fn set_query(&mut self, snapshot: StatsSnapshot) {
        self.query = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(min: f64, max: f64) -> StatsSnapshot {
        let values = [min, (min + max) / 2.0, max];
        StatsSnapshot {
            summary: SummaryStats::from_values(&values, 1.5),
            histogram: Histogram::from_values(4, min, max, &values),
            correlations: vec![1.0, -0.25],
        }
    }

    #[test]
    fn tuple_accessors() {
        let t = Tuple::new(vec![1.0, 2.5, -3.0]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.value(ColumnId(1)), 2.5);
        assert_eq!(t.get(ColumnId(3)), None);
        assert!(t.query_flag());
    }

    #[test]
    fn full_snapshot_resets_unrestricted_range() {
        let mut c = Column::new("depth");
        c.set_full(snapshot(2.0, 8.0));
        assert!(!c.is_query_set());
        assert_eq!(c.min_query_value(), 2.0);
        assert_eq!(c.max_query_value(), 8.0);

        c.set_query_range(3.0, 4.0);
        c.set_full(snapshot(0.0, 10.0));
        assert!(c.is_query_set());
        assert_eq!((c.min_query_value(), c.max_query_value()), (3.0, 4.0));
        assert!(c.query_contains(3.0));
        assert!(c.query_contains(4.0));
        assert!(!c.query_contains(4.01));

        c.clear_query();
        assert!(!c.is_query_set());
        assert_eq!((c.min_query_value(), c.max_query_value()), (0.0, 10.0));
    }

    #[test]
    fn correlation_lookup_defaults_to_zero() {
        let s = snapshot(0.0, 1.0);
        assert_eq!(s.correlation(ColumnId(1)), -0.25);
        assert_eq!(s.correlation(ColumnId(9)), 0.0);
    }

    #[test]
    fn tuple_deserializes_with_default_flag() {
        let t: Tuple = serde_json::from_str(r#"{ "values": [1.0, 2.0] }"#).unwrap();
        assert!(t.query_flag());
        assert_eq!(t.values(), &[1.0, 2.0]);
    }
}

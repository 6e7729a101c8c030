//! Plain-text tables over a [`DataModel`], used by the command-line front end.

use std::fmt;

use crate::color::{correlation_color, to_hex};
use crate::data::model::{Column, StatsSnapshot};
use crate::state::{DataModel, Regression};

/// Which statistics snapshot a report reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Snapshot {
    Full,
    Query,
}

impl Snapshot {
    fn of(self, column: &Column) -> &StatsSnapshot {
        match self {
            Snapshot::Full => column.full(),
            Snapshot::Query => column.query(),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Snapshot::Full => "all tuples",
            Snapshot::Query => "queried tuples",
        }
    }
}

// ---------------------------------------------------------------------------
// Per-column summary
// ---------------------------------------------------------------------------

/// One row per enabled column with its descriptive statistics.
pub struct SummaryReport<'a> {
    pub model: &'a DataModel,
    pub snapshot: Snapshot,
}

impl fmt::Display for SummaryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = match self.snapshot {
            Snapshot::Full => self.model.tuple_count(),
            Snapshot::Query => self.model.queried_tuple_count(),
        };
        writeln!(f, "Statistics over {} ({count})", self.snapshot.label())?;
        writeln!(
            f,
            "{:<16} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>8} {:>8}  query range",
            "column", "mean", "std dev", "min", "q1", "median", "q3", "max", "iqr", "skew", "kurt"
        )?;
        for column in self.model.enabled_columns() {
            let snapshot = self.snapshot.of(column);
            let s = &snapshot.summary;
            write!(
                f,
                "{:<16} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>8.3} {:>8.3}",
                truncate(column.name(), 16),
                s.mean,
                s.std_dev,
                s.min,
                s.q1,
                s.median,
                s.q3,
                s.max,
                snapshot.iqr(),
                s.skewness,
                s.kurtosis,
            )?;
            if column.is_query_set() {
                writeln!(
                    f,
                    "  [{}, {}]",
                    column.min_query_value(),
                    column.max_query_value()
                )?;
            } else {
                writeln!(f, "  -")?;
            }
        }
        let disabled: Vec<&str> = self.model.disabled_columns().map(Column::name).collect();
        if !disabled.is_empty() {
            writeln!(f, "disabled: {}", disabled.join(", "))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Correlation matrix
// ---------------------------------------------------------------------------

/// Pearson matrix of the enabled columns.
///
/// With `threshold` set, each cell is followed by its colour on the
/// correlation scale.
pub struct CorrelationReport<'a> {
    pub model: &'a DataModel,
    pub snapshot: Snapshot,
    pub threshold: Option<f64>,
}

impl fmt::Display for CorrelationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<&Column> = self.model.enabled_columns().collect();
        writeln!(f, "Correlation over {}", self.snapshot.label())?;
        write!(f, "{:<16}", "")?;
        for column in &columns {
            write!(f, " {:>10}", truncate(column.name(), 10))?;
        }
        writeln!(f)?;

        for row in &columns {
            write!(f, "{:<16}", truncate(row.name(), 16))?;
            let snapshot = self.snapshot.of(row);
            for column in &columns {
                let r = snapshot.correlation(column.id());
                write!(f, " {r:>10.4}")?;
                if let Some(color) = self.threshold.and_then(|t| correlation_color(r, t)) {
                    write!(f, " {}", to_hex(color))?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Width of the longest bar.
const BAR_WIDTH: u64 = 40;

/// Text bars of one column's histogram: `#` for queried tuples, `.` for
/// the rest of the full count in that bin.
pub struct HistogramReport<'a> {
    pub column: &'a Column,
}

impl fmt::Display for HistogramReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full = &self.column.full().histogram;
        let query = &self.column.query().histogram;
        writeln!(
            f,
            "Histogram of {} ({} bins, # queried . other)",
            self.column.name(),
            full.bin_count()
        )?;

        let scale = full.max_count().max(1);
        for (bin, (&total, &queried)) in full.counts().iter().zip(query.counts()).enumerate() {
            let (lo, hi) = full.bin_range(bin);
            let hashes = queried * BAR_WIDTH / scale;
            let dots = (total * BAR_WIDTH / scale).saturating_sub(hashes);
            writeln!(
                f,
                "  [{lo:>12.4}, {hi:>12.4})  {:<width$}  {queried}/{total}",
                format!("{}{}", "#".repeat(hashes as usize), ".".repeat(dots as usize)),
                width = BAR_WIDTH as usize,
            )?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Regression
// ---------------------------------------------------------------------------

pub struct RegressionReport<'a> {
    pub model: &'a DataModel,
    pub regression: &'a Regression,
}

impl fmt::Display for RegressionReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |id| {
            self.model
                .column(id)
                .map(Column::name)
                .unwrap_or("?")
        };
        let fit = &self.regression.fit;
        writeln!(
            f,
            "OLS regression of {} on {} columns ({} observations)",
            name(self.regression.dependent),
            self.regression.independents.len(),
            fit.observations
        )?;
        writeln!(f, "  R\u{b2}            {:.6}", fit.r_squared)?;
        writeln!(f, "  adjusted R\u{b2}   {:.6}", fit.adjusted_r_squared)?;
        writeln!(f, "  SSR           {:.6}", fit.residual_sum_of_squares)?;
        writeln!(f, "  SST           {:.6}", fit.total_sum_of_squares)?;
        writeln!(f, "  {:<16} {:>14.6}", "(intercept)", fit.intercept())?;
        for (&id, slope) in self.regression.independents.iter().zip(fit.slopes()) {
            writeln!(f, "  {:<16} {:>14.6}", truncate(name(id), 16), slope)?;
        }
        Ok(())
    }
}

fn truncate(s: &str, width: usize) -> &str {
    match s.char_indices().nth(width) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{ColumnId, Tuple};

    fn model() -> DataModel {
        let mut model = DataModel::new();
        model
            .set_data(
                vec![
                    Tuple::new(vec![1.0, 10.0, 3.0]),
                    Tuple::new(vec![2.0, 20.0, 1.0]),
                    Tuple::new(vec![3.0, 30.0, 2.0]),
                    Tuple::new(vec![4.0, 41.0, 5.0]),
                ],
                vec![Column::new("alpha"), Column::new("beta"), Column::new("gamma")],
            )
            .unwrap();
        model
    }

    #[test]
    fn summary_lists_enabled_columns() {
        let mut model = model();
        model.disable_column(ColumnId(2)).unwrap();
        model.set_query_range(ColumnId(0), 2.0, 4.0).unwrap();
        model.set_queried_tuples();

        let text = SummaryReport {
            model: &model,
            snapshot: Snapshot::Query,
        }
        .to_string();
        assert!(text.starts_with("Statistics over queried tuples (3)"));
        assert!(text.contains("alpha"));
        assert!(text.contains("[2, 4]"));
        assert!(text.contains("disabled: gamma"));
        assert_eq!(text.lines().filter(|l| l.starts_with("beta")).count(), 1);
    }

    #[test]
    fn correlation_diagonal_and_colours() {
        let model = model();
        let text = CorrelationReport {
            model: &model,
            snapshot: Snapshot::Full,
            threshold: Some(0.8),
        }
        .to_string();
        assert!(text.contains("1.0000 #d32525"));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn histogram_bars_overlay_query_on_full() {
        let mut model = DataModel::with_config(crate::config::ModelConfig {
            histogram_bins: 2,
            ..Default::default()
        })
        .unwrap();
        model
            .set_data(
                (0..4).map(|i| Tuple::new(vec![i as f64])).collect(),
                vec![Column::new("x")],
            )
            .unwrap();
        model.set_query_range(ColumnId(0), 0.0, 0.5).unwrap();
        model.set_queried_tuples();

        let text = HistogramReport {
            column: model.column(ColumnId(0)).unwrap(),
        }
        .to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Histogram of x (2 bins"));
        // bins [0, 1.5) and [1.5, 3): two values each, one queried in the first
        assert!(lines[1].contains(&format!("{}{}", "#".repeat(20), ".".repeat(20))));
        assert!(lines[1].ends_with("1/2"));
        assert!(lines[2].contains(&".".repeat(40)));
        assert!(lines[2].ends_with("0/2"));
    }

    #[test]
    fn regression_names_columns() {
        let mut model = model();
        let regression = model.calculate_ols_regression(ColumnId(1)).unwrap();
        let text = RegressionReport {
            model: &model,
            regression: &regression,
        }
        .to_string();
        assert!(text.starts_with("OLS regression of beta on 2 columns (4 observations)"));
        assert!(text.contains("(intercept)"));
        assert!(text.contains("gamma"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("température", 4), "temp");
        assert_eq!(truncate("ab", 4), "ab");
    }
}

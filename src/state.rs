use std::collections::BTreeMap;
use std::rc::Rc;

use serde::Serialize;

use crate::config::ModelConfig;
use crate::data::filter::apply_query;
use crate::data::histogram::Histogram;
use crate::data::model::{Column, ColumnId, StatsSnapshot, Tuple};
use crate::error::{ModelError, ModelResult};
use crate::events::{DataModelListener, ListenerRegistry, ModelEvent};
use crate::stats::{correlation_matrix, redundant_columns, regression, OlsFit, SummaryStats};

// ---------------------------------------------------------------------------
// Regression – last OLS fit and the columns it used
// ---------------------------------------------------------------------------

/// A regression fitted by [`DataModel::calculate_ols_regression`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Regression {
    pub dependent: ColumnId,
    /// Columns behind `fit.slopes()`, in the same order.
    pub independents: Vec<ColumnId>,
    pub fit: OlsFit,
}

impl Regression {
    /// Predict the dependent value for a full tuple.
    pub fn predict(&self, tuple: &Tuple) -> f64 {
        let x: Vec<f64> = self.independents.iter().map(|&c| tuple.value(c)).collect();
        self.fit.predict(&x)
    }
}

// ---------------------------------------------------------------------------
// DataModel
// ---------------------------------------------------------------------------

/// Owns the table, both statistic snapshots of every column, the brushed
/// subset and the enabled/disabled column sets.
///
/// Every mutating method recomputes what it invalidates, then notifies
/// listeners. Columns keep their slot ([`ColumnId`]) for the lifetime of the
/// loaded table; disabling a column only changes its membership.
#[derive(Debug, Default)]
pub struct DataModel {
    config: ModelConfig,
    tuples: Vec<Tuple>,
    /// Indexed by `ColumnId`.
    columns: Vec<Column>,
    /// In the order the columns were disabled.
    disabled: Vec<ColumnId>,
    /// Indices into `tuples` of the queried subset.
    queried: Vec<usize>,
    highlighted: Option<ColumnId>,
    regression: Option<Regression>,
    listeners: ListenerRegistry,
}

impl DataModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an empty model with validated settings.
    pub fn with_config(config: ModelConfig) -> ModelResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    // -- listeners --

    /// Subscribe to change events. Registering the same listener twice is a no-op.
    pub fn add_listener(&mut self, listener: Rc<dyn DataModelListener>) -> bool {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, listener: &Rc<dyn DataModelListener>) -> bool {
        self.listeners.remove(listener)
    }

    fn fire(&self, event: ModelEvent) {
        self.listeners.notify(self, &event);
    }

    // -- loading --

    /// Replace the whole table.
    ///
    /// Resets the disabled set, the highlighted column, the regression and all
    /// range restrictions, then runs both statistics passes. An empty column
    /// list leaves the model untouched.
    pub fn set_data(&mut self, tuples: Vec<Tuple>, columns: Vec<Column>) -> ModelResult<()> {
        if columns.is_empty() {
            log::warn!("set_data called without columns; ignored");
            return Ok(());
        }
        check_lengths(&tuples, columns.len(), 0)?;

        self.tuples = tuples;
        self.columns = columns;
        for (slot, column) in self.columns.iter_mut().enumerate() {
            column.set_id(ColumnId(slot));
            column.set_enabled(true);
            column.clear_query();
        }
        self.disabled.clear();
        self.highlighted = None;
        self.regression = None;

        for name in self.duplicate_column_names() {
            log::warn!("column name '{name}' is used more than once; lookups by name are ambiguous");
        }
        log::info!(
            "data set: {} tuples x {} columns",
            self.tuples.len(),
            self.columns.len()
        );

        self.calculate_statistics();
        self.refresh_query();
        self.fire(ModelEvent::DataModelChanged);
        Ok(())
    }

    /// Append tuples, keeping columns and their range restrictions. An empty
    /// batch changes nothing and emits nothing.
    pub fn add_tuples(&mut self, new_tuples: Vec<Tuple>) -> ModelResult<()> {
        if self.columns.is_empty() {
            return Err(ModelError::EmptyColumns);
        }
        if new_tuples.is_empty() {
            return Ok(());
        }
        check_lengths(&new_tuples, self.columns.len(), self.tuples.len())?;

        self.tuples.extend(new_tuples.iter().cloned());
        log::debug!("appended {} tuples", new_tuples.len());

        self.calculate_statistics();
        self.refresh_query();
        self.fire(ModelEvent::TuplesAdded(new_tuples));
        Ok(())
    }

    /// Drop every tuple and column.
    pub fn clear(&mut self) {
        self.tuples.clear();
        self.columns.clear();
        self.disabled.clear();
        self.queried.clear();
        self.highlighted = None;
        self.regression = None;
        self.fire(ModelEvent::DataModelChanged);
    }

    pub fn set_column_name(&mut self, id: ColumnId, name: impl Into<String>) -> ModelResult<()> {
        self.check_column(id)?;
        self.columns[id.0].set_name(name.into());
        self.fire(ModelEvent::DataModelChanged);
        Ok(())
    }

    // -- statistics passes --

    /// Column-major values of the tuples at `rows` (all tuples for `None`).
    fn project(&self, rows: Option<&[usize]>) -> Vec<Vec<f64>> {
        let pick = |c: usize| -> Vec<f64> {
            match rows {
                Some(rows) => rows.iter().map(|&r| self.tuples[r].values()[c]).collect(),
                None => self.tuples.iter().map(|t| t.values()[c]).collect(),
            }
        };
        (0..self.columns.len()).map(pick).collect()
    }

    /// Full-table pass: summary, histogram and correlations of every column.
    fn calculate_statistics(&mut self) {
        let data = self.project(None);
        let matrix = correlation_matrix(&data);
        let bins = self.config.histogram_bins;
        let factor = self.config.whisker_iqr_factor;

        for ((column, values), correlations) in self.columns.iter_mut().zip(&data).zip(matrix) {
            let summary = SummaryStats::from_values(values, factor);
            let histogram = Histogram::from_values(bins, summary.min, summary.max, values);
            column.set_full(StatsSnapshot {
                summary,
                histogram,
                correlations,
            });
        }
        log::debug!("full statistics computed for {} columns", self.columns.len());
    }

    /// Query pass over the current `queried` subset.
    fn calculate_query_statistics(&mut self) {
        let data = self.project(Some(&self.queried));
        let matrix = correlation_matrix(&data);
        let bins = self.config.histogram_bins;
        let factor = self.config.whisker_iqr_factor;

        for ((column, values), correlations) in self.columns.iter_mut().zip(&data).zip(matrix) {
            let summary = SummaryStats::from_values(values, factor);
            // binned over the full range so it overlays the full histogram
            let full = &column.full().summary;
            let histogram = Histogram::from_values(bins, full.min, full.max, values);
            column.set_query(StatsSnapshot {
                summary,
                histogram,
                correlations,
            });
        }
    }

    /// Re-evaluate membership and the query snapshot without notifying.
    fn refresh_query(&mut self) {
        self.queried = apply_query(&mut self.tuples, &self.columns);
        log::debug!(
            "{} of {} tuples queried",
            self.queried.len(),
            self.tuples.len()
        );
        self.calculate_query_statistics();
    }

    // -- query control --

    /// Restrict a column to `[min, max]` (bounds inclusive, swapped if
    /// reversed). Takes effect at the next [`set_queried_tuples`](Self::set_queried_tuples).
    pub fn set_query_range(&mut self, id: ColumnId, min: f64, max: f64) -> ModelResult<()> {
        self.check_enabled(id)?;
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.columns[id.0].set_query_range(lo, hi);
        Ok(())
    }

    /// Remove a column's range restriction. Takes effect at the next commit.
    pub fn clear_query_range(&mut self, id: ColumnId) -> ModelResult<()> {
        self.check_column(id)?;
        self.columns[id.0].clear_query();
        Ok(())
    }

    /// Remove every range restriction. Takes effect at the next commit.
    pub fn clear_all_queries(&mut self) {
        for column in &mut self.columns {
            column.clear_query();
        }
    }

    /// Commit the range restrictions: recompute membership and the query
    /// statistics, then emit [`ModelEvent::QueryChanged`].
    pub fn set_queried_tuples(&mut self) {
        self.refresh_query();
        self.fire(ModelEvent::QueryChanged);
    }

    /// Whether any enabled column has an active range restriction.
    pub fn is_column_query_set(&self) -> bool {
        self.columns
            .iter()
            .any(|c| c.is_enabled() && c.is_query_set())
    }

    pub fn queried_tuple_count(&self) -> usize {
        self.queried.len()
    }

    /// Indices (into [`tuples`](Self::tuples)) of the queried subset.
    pub fn queried_indices(&self) -> &[usize] {
        &self.queried
    }

    pub fn queried_tuples(&self) -> impl Iterator<Item = &Tuple> + '_ {
        self.queried.iter().map(move |&i| &self.tuples[i])
    }

    // -- tuple pruning --

    /// Remove tuples outside the queried subset. Returns how many were removed.
    pub fn remove_unselected_tuples(&mut self) -> usize {
        self.remove_tuples_where(|t| !t.query_flag())
    }

    /// Remove tuples inside the queried subset. Returns how many were removed.
    pub fn remove_selected_tuples(&mut self) -> usize {
        self.remove_tuples_where(|t| t.query_flag())
    }

    fn remove_tuples_where(&mut self, remove: impl Fn(&Tuple) -> bool) -> usize {
        let before = self.tuples.len();
        self.tuples.retain(|t| !remove(t));
        let removed = before - self.tuples.len();
        if removed == 0 {
            return 0;
        }

        log::info!("removed {removed} tuples, {} remain", self.tuples.len());
        self.clear_all_queries();
        self.calculate_statistics();
        self.refresh_query();
        self.fire(ModelEvent::DataModelChanged);
        removed
    }

    // -- enable / disable --

    /// Disable a column: its range restriction is dropped and it stops taking
    /// part in queries, the multicollinearity filter and regression.
    ///
    /// Returns `false` (and emits nothing) if it was already disabled.
    pub fn disable_column(&mut self, id: ColumnId) -> ModelResult<bool> {
        self.check_column(id)?;
        if !self.mark_disabled(id) {
            return Ok(false);
        }
        self.fire(ModelEvent::ColumnDisabled(id));
        Ok(true)
    }

    /// Disable several columns with a single [`ModelEvent::ColumnsDisabled`].
    ///
    /// All ids are checked before anything changes. Returns the number of
    /// columns newly disabled; no event is emitted when that is zero.
    pub fn disable_columns(&mut self, ids: &[ColumnId]) -> ModelResult<usize> {
        for &id in ids {
            self.check_column(id)?;
        }
        Ok(self.disable_batch(ids))
    }

    fn disable_batch(&mut self, ids: &[ColumnId]) -> usize {
        let newly: Vec<ColumnId> = ids
            .iter()
            .copied()
            .filter(|&id| self.mark_disabled(id))
            .collect();
        let count = newly.len();
        if count > 0 {
            self.fire(ModelEvent::ColumnsDisabled(newly));
        }
        count
    }

    fn mark_disabled(&mut self, id: ColumnId) -> bool {
        if self.disabled.contains(&id) {
            return false;
        }
        let column = &mut self.columns[id.0];
        column.set_enabled(false);
        column.clear_query();
        if self.highlighted == Some(id) {
            self.highlighted = None;
        }
        self.disabled.push(id);
        true
    }

    /// Re-enable a column. Statistics are not recomputed.
    ///
    /// Returns `false` (and emits nothing) if it was not disabled.
    pub fn enable_column(&mut self, id: ColumnId) -> ModelResult<bool> {
        self.check_column(id)?;
        let Some(pos) = self.disabled.iter().position(|&d| d == id) else {
            return Ok(false);
        };
        self.disabled.remove(pos);
        self.columns[id.0].set_enabled(true);
        self.fire(ModelEvent::ColumnEnabled(id));
        Ok(true)
    }

    // -- highlight --

    /// Highlight an enabled column, or clear the highlight with `None`.
    pub fn set_highlighted_column(&mut self, id: Option<ColumnId>) -> ModelResult<()> {
        if let Some(id) = id {
            self.check_enabled(id)?;
        }
        self.highlighted = id;
        self.fire(ModelEvent::HighlightedColumnChanged);
        Ok(())
    }

    pub fn highlighted_column(&self) -> Option<&Column> {
        self.highlighted.map(|id| &self.columns[id.0])
    }

    // -- analysis --

    /// Disable independent columns that are redundant with a better predictor
    /// of `dependent`.
    ///
    /// Enabled columns are ranked by |r| with the dependent column; walking
    /// that ranking, each surviving column removes every other enabled
    /// independent column it correlates with above `threshold`. The removals
    /// go through the batch disable path.
    ///
    /// Returns the number of columns disabled, or `None` (changing nothing)
    /// if `dependent` is `None` or not an enabled column of this model.
    pub fn run_multicollinearity_filter(
        &mut self,
        dependent: Option<ColumnId>,
        use_query_correlations: bool,
        threshold: f64,
    ) -> Option<usize> {
        let dependent =
            dependent.filter(|d| self.columns.get(d.0).is_some_and(Column::is_enabled))?;

        let candidates: Vec<usize> = self
            .enabled_columns()
            .map(|c| c.id().0)
            .collect();
        let columns = &self.columns;
        let corr = |a: usize, b: usize| {
            let snapshot = if use_query_correlations {
                columns[a].query()
            } else {
                columns[a].full()
            };
            snapshot.correlation(ColumnId(b))
        };

        log::debug!(
            "multicollinearity filter: dependent '{}', threshold {threshold}",
            columns[dependent.0].name()
        );
        let removed: Vec<ColumnId> = redundant_columns(dependent.0, &candidates, threshold, corr)
            .into_iter()
            .map(ColumnId)
            .collect();

        Some(self.disable_batch(&removed))
    }

    /// Fit `dependent ~ 1 + (every other enabled column)` over all tuples.
    ///
    /// The fit replaces the stored regression and emits
    /// [`ModelEvent::DataModelChanged`]. On error the previous regression is
    /// kept.
    pub fn calculate_ols_regression(&mut self, dependent: ColumnId) -> ModelResult<Regression> {
        self.check_enabled(dependent)?;

        let independents: Vec<ColumnId> = self
            .enabled_columns()
            .map(Column::id)
            .filter(|&id| id != dependent)
            .collect();
        let data = self.project(None);
        let y = &data[dependent.0];
        let x: Vec<Vec<f64>> = independents.iter().map(|id| data[id.0].clone()).collect();

        let fit = regression::fit(y, &x)?;
        log::info!(
            "regression on '{}': R\u{b2} = {:.4}, adjusted R\u{b2} = {:.4}",
            self.columns[dependent.0].name(),
            fit.r_squared,
            fit.adjusted_r_squared
        );
        for (i, b) in fit.parameters.iter().enumerate() {
            log::debug!("b[{i}] = {b}");
        }

        let result = Regression {
            dependent,
            independents,
            fit,
        };
        self.regression = Some(result.clone());
        self.fire(ModelEvent::DataModelChanged);
        Ok(result)
    }

    /// Last successful regression.
    pub fn regression(&self) -> Option<&Regression> {
        self.regression.as_ref()
    }

    /// Dependent column of the last successful regression.
    pub fn regression_dependent_column(&self) -> Option<&Column> {
        self.regression
            .as_ref()
            .map(|r| &self.columns[r.dependent.0])
    }

    // -- read access --

    pub fn tuples(&self) -> &[Tuple] {
        &self.tuples
    }

    pub fn tuple(&self, index: usize) -> ModelResult<&Tuple> {
        self.tuples.get(index).ok_or(ModelError::TupleOutOfBounds {
            index,
            count: self.tuples.len(),
        })
    }

    pub fn tuple_count(&self) -> usize {
        self.tuples.len()
    }

    /// Every column, enabled or not, in slot order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: ColumnId) -> ModelResult<&Column> {
        self.check_column(id)?;
        Ok(&self.columns[id.0])
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Enabled columns in slot order.
    pub fn enabled_columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.columns.iter().filter(|c| c.is_enabled())
    }

    /// The `index`-th enabled column.
    pub fn enabled_column(&self, index: usize) -> ModelResult<&Column> {
        let count = self.enabled_column_count();
        self.enabled_columns()
            .nth(index)
            .ok_or(ModelError::ColumnOutOfBounds { index, count })
    }

    pub fn enabled_column_count(&self) -> usize {
        self.columns.len() - self.disabled.len()
    }

    /// Disabled columns in the order they were disabled.
    pub fn disabled_columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.disabled.iter().map(move |id| &self.columns[id.0])
    }

    pub fn disabled_column_count(&self) -> usize {
        self.disabled.len()
    }

    /// First column called `name`. Names are not required to be unique.
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Names carried by more than one column.
    pub fn duplicate_column_names(&self) -> Vec<String> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for column in &self.columns {
            *counts.entry(column.name()).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|&(_, n)| n > 1)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// A column's values across all tuples.
    pub fn column_values(&self, id: ColumnId) -> ModelResult<Vec<f64>> {
        self.check_column(id)?;
        Ok(self.tuples.iter().map(|t| t.value(id)).collect())
    }

    /// A column's values across the queried tuples.
    pub fn column_queried_values(&self, id: ColumnId) -> ModelResult<Vec<f64>> {
        self.check_column(id)?;
        Ok(self.queried_tuples().map(|t| t.value(id)).collect())
    }

    fn check_column(&self, id: ColumnId) -> ModelResult<()> {
        if id.0 < self.columns.len() {
            Ok(())
        } else {
            Err(ModelError::ColumnOutOfBounds {
                index: id.0,
                count: self.columns.len(),
            })
        }
    }

    fn check_enabled(&self, id: ColumnId) -> ModelResult<()> {
        self.check_column(id)?;
        if self.columns[id.0].is_enabled() {
            Ok(())
        } else {
            Err(ModelError::ColumnDisabled(id))
        }
    }
}

/// Every tuple must carry one value per column. `offset` numbers the tuples
/// as they will be stored.
fn check_lengths(tuples: &[Tuple], expected: usize, offset: usize) -> ModelResult<()> {
    match tuples.iter().position(|t| t.len() != expected) {
        Some(i) => Err(ModelError::TupleLength {
            index: offset + i,
            expected,
            found: tuples[i].len(),
        }),
        None => Ok(()),
    }
}

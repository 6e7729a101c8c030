use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Histogram – fixed equal-width bins over a value range
// ---------------------------------------------------------------------------

/// Frequency counts over `bins` equal-width bins spanning `[min, max]`.
///
/// The query histogram of a column is built over the *full* column range so
/// that it lines up with the full histogram when overlaid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    min: f64,
    max: f64,
    counts: Vec<u64>,
}

impl Histogram {
    /// Create an empty histogram. `bins` is raised to 1 if zero.
    pub fn new(bins: usize, min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            counts: vec![0; bins.max(1)],
        }
    }

    /// Build a histogram over `[min, max]` and fill it with `values`.
    pub fn from_values(bins: usize, min: f64, max: f64, values: &[f64]) -> Self {
        let mut histogram = Self::new(bins, min, max);
        for &v in values {
            histogram.fill(v);
        }
        histogram
    }

    /// Index of the bin `value` falls into.
    ///
    /// Values outside the range (floating error, or query values binned over a
    /// stale range) land in the edge bins. A degenerate range puts every value
    /// in bin 0.
    pub fn bin_index(&self, value: f64) -> usize {
        let last = self.counts.len() - 1;
        let width = self.max - self.min;
        if width.is_nan() || width <= 0.0 || value.is_nan() {
            return 0;
        }
        let pos = (value - self.min) / width * self.counts.len() as f64;
        if pos <= 0.0 {
            0
        } else {
            (pos.floor() as usize).min(last)
        }
    }

    /// Increment the bin containing `value`.
    pub fn fill(&mut self, value: f64) {
        let idx = self.bin_index(value);
        self.counts[idx] += 1;
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.counts.len() as f64
    }

    /// Lower and upper edge of bin `idx`.
    pub fn bin_range(&self, idx: usize) -> (f64, f64) {
        let w = self.bin_width();
        let lo = self.min + idx as f64 * w;
        (lo, lo + w)
    }

    /// Total number of values filled.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Largest single bin count, used to scale bar heights.
    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

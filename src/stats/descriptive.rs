//! Descriptive statistics for one column of values.
//!
//! Conventions:
//! - variance is the sample variance (n − 1 denominator), `0` for one value
//! - quartiles use R-7 linear interpolation between order statistics
//! - skewness and excess kurtosis are the bias-corrected sample estimators
//! - whiskers follow Tukey's rule, clamped to observed data

use serde::{Deserialize, Serialize};

/// Below this variance a column is treated as constant for shape statistics.
const ZERO_VARIANCE: f64 = 1e-19;

/// Summary statistics for a numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of values
    pub count: usize,
    pub mean: f64,
    /// 50th percentile
    pub median: f64,
    /// Sample variance
    pub variance: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// 25th percentile
    pub q1: f64,
    /// 75th percentile
    pub q3: f64,
    pub skewness: f64,
    /// Excess kurtosis (0 for a normal distribution)
    pub kurtosis: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
}

impl SummaryStats {
    /// Compute every statistic for `values`.
    ///
    /// `whisker_factor` is the IQR multiplier for the fences (1.5 for the
    /// classic box plot).
    pub fn from_values(values: &[f64], whisker_factor: f64) -> Self {
        if values.is_empty() {
            return Self::empty();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let (min, max) = (sorted[0], sorted[count - 1]);
        // rounding can push the mean of a constant column off its value
        let mean = (sorted.iter().sum::<f64>() / count as f64).max(min).min(max);
        let variance = if min == max {
            0.0
        } else {
            sample_variance(&sorted, mean)
        };
        let std_dev = variance.sqrt();

        let q1 = percentile_sorted(&sorted, 0.25);
        let median = percentile_sorted(&sorted, 0.5);
        let q3 = percentile_sorted(&sorted, 0.75);
        let (lower_whisker, upper_whisker) = whiskers(&sorted, q1, q3, whisker_factor);

        Self {
            count,
            mean,
            median,
            variance,
            std_dev,
            min,
            max,
            q1,
            q3,
            skewness: skewness(&sorted, mean, variance),
            kurtosis: kurtosis(&sorted, mean, variance),
            lower_whisker,
            upper_whisker,
        }
    }

    /// Statistics of an empty set: every value is NaN.
    pub fn empty() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            variance: f64::NAN,
            std_dev: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            q1: f64::NAN,
            q3: f64::NAN,
            skewness: f64::NAN,
            kurtosis: f64::NAN,
            lower_whisker: f64::NAN,
            upper_whisker: f64::NAN,
        }
    }

    /// Interquartile range.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Sample variance around `mean`; `0` for a single value.
pub fn sample_variance(values: &[f64], mean: f64) -> f64 {
    match values.len() {
        0 => f64::NAN,
        1 => 0.0,
        n => values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64,
    }
}

/// R-7 percentile of already sorted values, `p` in `[0, 1]`.
///
/// `h = (n - 1) p`; the result interpolates linearly between
/// `sorted[floor(h)]` and the next order statistic.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    if lo + 1 >= n {
        return sorted[n - 1];
    }
    sorted[lo] + (h - lo as f64) * (sorted[lo + 1] - sorted[lo])
}

/// Tukey whiskers for sorted values.
///
/// Each whisker is the most extreme observation inside its fence
/// (`q1 - factor * iqr`, `q3 + factor * iqr`). A fence looser than the data
/// clamps to the extremum.
pub fn whiskers(sorted: &[f64], q1: f64, q3: f64, factor: f64) -> (f64, f64) {
    let Some((&min, &max)) = sorted.first().zip(sorted.last()) else {
        return (f64::NAN, f64::NAN);
    };
    let reach = factor * (q3 - q1);
    let lower_fence = q1 - reach;
    let upper_fence = q3 + reach;

    let upper = if upper_fence >= max {
        max
    } else {
        sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= upper_fence)
            .unwrap_or(max)
    };

    let lower = if lower_fence <= min {
        min
    } else {
        sorted
            .iter()
            .copied()
            .find(|&v| v >= lower_fence)
            .unwrap_or(min)
    };

    (lower, upper)
}

/// Bias-corrected sample skewness. NaN below three values.
pub fn skewness(values: &[f64], mean: f64, variance: f64) -> f64 {
    let n = values.len();
    if n < 3 {
        return f64::NAN;
    }
    if variance < ZERO_VARIANCE {
        return 0.0;
    }
    let s = variance.sqrt();
    let cubed: f64 = values.iter().map(|x| ((x - mean) / s).powi(3)).sum();
    let n = n as f64;
    n / ((n - 1.0) * (n - 2.0)) * cubed
}

/// Bias-corrected sample excess kurtosis. NaN below four values.
pub fn kurtosis(values: &[f64], mean: f64, variance: f64) -> f64 {
    let n = values.len();
    if n < 4 {
        return f64::NAN;
    }
    if variance < ZERO_VARIANCE {
        return 0.0;
    }
    let s = variance.sqrt();
    let fourth: f64 = values.iter().map(|x| ((x - mean) / s).powi(4)).sum();
    let n = n as f64;
    let scale = n * (n + 1.0) / ((n - 1.0) * (n - 2.0) * (n - 3.0));
    let correction = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
    scale * fourth - correction
}

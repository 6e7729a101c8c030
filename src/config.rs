use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

// ---------------------------------------------------------------------------
// ModelConfig – tunables for the statistics passes
// ---------------------------------------------------------------------------

/// Number of histogram bins used when the config does not say otherwise.
pub const DEFAULT_HISTOGRAM_BINS: usize = 10;

/// Tukey fence multiplier applied to the IQR.
pub const DEFAULT_WHISKER_IQR_FACTOR: f64 = 1.5;

/// Knobs read by [`DataModel`](crate::state::DataModel) and the CLI.
///
/// Every field has a default so a partial JSON file is enough:
///
/// ```json
/// { "histogram_bins": 20, "collinearity_threshold": 0.9 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Equal-width bins per column histogram.
    pub histogram_bins: usize,
    /// Multiplier on the IQR for the whisker fences.
    pub whisker_iqr_factor: f64,
    /// |r| above which two independent columns count as redundant.
    pub collinearity_threshold: f64,
    /// Whether the multicollinearity filter reads the query correlations.
    pub use_query_correlations: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            whisker_iqr_factor: DEFAULT_WHISKER_IQR_FACTOR,
            collinearity_threshold: 0.8,
            use_query_correlations: false,
        }
    }
}

impl ModelConfig {
    /// Reject values the statistics passes cannot work with.
    pub fn validate(&self) -> ModelResult<()> {
        if self.histogram_bins == 0 {
            return Err(ModelError::InvalidConfig(
                "histogram_bins must be at least 1".into(),
            ));
        }
        if !self.whisker_iqr_factor.is_finite() || self.whisker_iqr_factor < 0.0 {
            return Err(ModelError::InvalidConfig(format!(
                "whisker_iqr_factor must be a non-negative number, got {}",
                self.whisker_iqr_factor
            )));
        }
        if !(0.0..=1.0).contains(&self.collinearity_threshold) {
            return Err(ModelError::InvalidConfig(format!(
                "collinearity_threshold must lie in [0, 1], got {}",
                self.collinearity_threshold
            )));
        }
        Ok(())
    }

    /// Load and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: ModelConfig = serde_json::from_str(&text).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }
}

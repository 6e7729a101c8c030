use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use rusty_eden::data::loader::{load_csv_sample, load_file};
use rusty_eden::report::{
    CorrelationReport, HistogramReport, RegressionReport, Snapshot, SummaryReport,
};
use rusty_eden::{DataModel, ModelConfig};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Explore a numeric table: brush column ranges, inspect statistics and
/// correlations, prune collinear columns and fit a regression.
#[derive(Parser, Debug)]
#[command(name = "rusty-eden")]
#[command(version, about)]
pub struct Cli {
    /// Table to load (.csv, .json or .parquet)
    pub file: PathBuf,

    /// JSON file with model settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Restrict a column to a range, e.g. `depth=2.5:10`; repeatable
    #[arg(long = "query", value_name = "NAME=MIN:MAX", value_parser = parse_query)]
    pub queries: Vec<QueryArg>,

    /// Run the multicollinearity filter against this column
    #[arg(long, value_name = "NAME")]
    pub dependent: Option<String>,

    /// |r| above which two columns are redundant (overrides the config)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Let the filter read correlations of the queried tuples
    #[arg(long)]
    pub use_query_correlations: bool,

    /// Fit an OLS regression of this column on the other enabled columns
    #[arg(long, value_name = "NAME")]
    pub regress: Option<String>,

    /// Load only this fraction of CSV rows, chosen at random
    #[arg(long, value_name = "FRACTION")]
    pub sample: Option<f64>,

    /// Seed for `--sample`
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Print the correlation matrix of the queried tuples
    #[arg(long)]
    pub correlations: bool,

    /// Print the histogram of this column; repeatable
    #[arg(long = "histogram", value_name = "NAME")]
    pub histograms: Vec<String>,

    /// Print the columns as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

/// A parsed `--query NAME=MIN:MAX`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryArg {
    pub column: String,
    pub min: f64,
    pub max: f64,
}

fn parse_query(s: &str) -> Result<QueryArg, String> {
    let (column, range) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=MIN:MAX, got '{s}'"))?;
    let (min, max) = range
        .split_once(':')
        .ok_or_else(|| format!("expected MIN:MAX after '=', got '{range}'"))?;
    let bound = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("bad bound '{v}': {e}"))
    };
    if column.is_empty() {
        return Err("column name is empty".to_string());
    }
    Ok(QueryArg {
        column: column.to_string(),
        min: bound(min)?,
        max: bound(max)?,
    })
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

pub fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => ModelConfig::from_json_file(path)?,
        None => ModelConfig::default(),
    };
    if let Some(threshold) = cli.threshold {
        config.collinearity_threshold = threshold;
    }
    config.use_query_correlations |= cli.use_query_correlations;

    let table = match cli.sample {
        Some(fraction) => load_csv_sample(&cli.file, fraction, cli.seed)?,
        None => load_file(&cli.file)?,
    };
    if table.columns.is_empty() {
        bail!("{} contains no numeric columns", cli.file.display());
    }

    let mut model = DataModel::with_config(config.clone()).context("Invalid model settings")?;
    model
        .set_data(table.tuples, table.columns)
        .with_context(|| format!("Failed to load {}", cli.file.display()))?;

    if !cli.queries.is_empty() {
        for query in &cli.queries {
            let id = column_id(&model, &query.column)?;
            model
                .set_query_range(id, query.min, query.max)
                .with_context(|| format!("Failed to restrict '{}'", query.column))?;
        }
        model.set_queried_tuples();
    }

    if let Some(name) = &cli.dependent {
        let id = column_id(&model, name)?;
        let removed = model.run_multicollinearity_filter(
            Some(id),
            config.use_query_correlations,
            config.collinearity_threshold,
        );
        if let Some(n) = removed {
            println!(
                "Multicollinearity filter (|r| > {}): {n} column(s) disabled",
                config.collinearity_threshold
            );
        }
    }

    let regression = match &cli.regress {
        Some(name) => {
            let id = column_id(&model, name)?;
            let regression = model
                .calculate_ols_regression(id)
                .with_context(|| format!("Regression on '{name}' failed"))?;
            Some(regression)
        }
        None => None,
    };

    if cli.json {
        let out = serde_json::to_string_pretty(model.columns())
            .context("Failed to serialize columns")?;
        println!("{out}");
        return Ok(());
    }

    println!("{}", SummaryReport { model: &model, snapshot: Snapshot::Full });
    if model.is_column_query_set() {
        println!("{}", SummaryReport { model: &model, snapshot: Snapshot::Query });
    }
    if cli.correlations {
        println!(
            "{}",
            CorrelationReport {
                model: &model,
                snapshot: Snapshot::Query,
                threshold: Some(config.collinearity_threshold),
            }
        );
    }
    for name in &cli.histograms {
        let column = model.column(column_id(&model, name)?)?;
        println!("{}", HistogramReport { column });
    }
    if let Some(regression) = &regression {
        println!("{}", RegressionReport { model: &model, regression });
    }
    Ok(())
}

fn column_id(model: &DataModel, name: &str) -> Result<rusty_eden::ColumnId> {
    model
        .column_by_name(name)
        .map(|c| c.id())
        .with_context(|| format!("No column named '{name}'"))
}

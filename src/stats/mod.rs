//! Pure numerical routines over column-major `f64` series.
//!
//! Nothing here knows about tuples, columns or the data model; the
//! [`DataModel`](crate::state::DataModel) projects its tables into plain
//! slices and stores the results.

pub mod correlation;
pub mod descriptive;
pub mod multicollinearity;
pub mod regression;

pub use correlation::{correlation_matrix, pearson, pearson_or_zero};
pub use descriptive::SummaryStats;
pub use multicollinearity::redundant_columns;
pub use regression::OlsFit;

//! Error types for the data model.
//!
//! Ingestion and the command line use `anyhow` with context; everything the
//! [`DataModel`](crate::state::DataModel) itself can reject is listed here.

use thiserror::Error;

use crate::data::model::ColumnId;

/// Errors raised by data-model operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Column index past the current column count
    #[error("column index {index} out of bounds ({count} columns)")]
    ColumnOutOfBounds { index: usize, count: usize },

    /// Tuple index past the current tuple count
    #[error("tuple index {index} out of bounds ({count} tuples)")]
    TupleOutOfBounds { index: usize, count: usize },

    /// A tuple whose length does not match the column count
    #[error("tuple {index} has {found} values but the table has {expected} columns")]
    TupleLength {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// Operation requires at least one column
    #[error("the table has no columns")]
    EmptyColumns,

    /// Operation requires an enabled column
    #[error("column {0} is disabled")]
    ColumnDisabled(ColumnId),

    /// Not enough tuples to fit the requested regression
    #[error("regression needs more than {parameters} observations, got {observations}")]
    InsufficientObservations {
        observations: usize,
        parameters: usize,
    },

    /// The design matrix is rank deficient
    #[error("regression design matrix is singular")]
    SingularDesign,

    /// The dependent variable has zero variance
    #[error("dependent column is constant; R\u{b2} is undefined")]
    ConstantDependent,

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type ModelResult<T> = Result<T, ModelError>;

//! Multivariate data model: per-column statistics over a full table and a
//! brushed subset, correlation, OLS regression and multicollinearity pruning.
//!
//! ```text
//!   loader ──► DataModel::set_data ──► full pass ──► query pass
//!                     ▲                                  │
//!   set_query_range ──┴── set_queried_tuples ◄───────────┘
//!                                   │
//!                                   ▼
//!                        DataModelListener::on_event
//! ```

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod report;
pub mod state;
pub mod stats;

pub use config::ModelConfig;
pub use data::histogram::Histogram;
pub use data::loader::{load_file, LoadedTable};
pub use data::model::{Column, ColumnId, StatsSnapshot, Tuple};
pub use error::{ModelError, ModelResult};
pub use events::{DataModelListener, ListenerRegistry, ModelEvent};
pub use state::{DataModel, Regression};
pub use stats::{OlsFit, SummaryStats};

/// Data layer: core types, loading, and query membership.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<Tuple> + Vec<Column>
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │   DataModel   │  two statistics passes per column
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply range restrictions → queried indices
///   └──────────┘
/// ```

pub mod filter;
pub mod histogram;
pub mod loader;
pub mod model;

/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ShowTable (once, at startup)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  ShowTable    │  Vec<ShowRecord>, value domains
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  six ANDed predicates → filtered rows
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  filtered rows → named Views
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod view;

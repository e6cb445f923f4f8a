/// Data layer: core types, loading, aggregation and filtering.
///
/// Architecture:
/// ```text
///  brand_share.csv   old.csv   New Feb 2025 Prices.csv
///        │              │                │
///        ▼              ▼                ▼
///   ┌──────────────────────────────────────┐
///   │  loader   parse files → Table<R>      │  missing file → DataUnavailable
///   └──────────────────────────────────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ DataContext  │  immutable tables + grouped listing counts
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐     ┌───────────┐
///   │  filter   │ ──▶ │ aggregate │  selection → rows → chart data
///   └──────────┘     └───────────┘
/// ```

pub mod aggregate;
pub mod context;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;

pub use context::DataContext;
pub use error::{DataError, EmptySelection};
pub use loader::DataSources;

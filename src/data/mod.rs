/// Data layer: core types, loading, cleaning, analysis and export.
///
/// Architecture:
/// ```text
///   uploaded .csv bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode (UTF-8 / Latin-1), parse, tag column types → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  schema   │  numeric column set
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  dedup → drop missing → fill missing  → cleaned Table
///   └──────────┘
///        │
///        ├──────────────┬──────────────┐
///        ▼              ▼              ▼
///   ┌─────────┐    ┌─────────┐    ┌─────────┐
///   │  stats   │    │  chart   │    │ export   │  describe / corr, plots, .xlsx
///   └─────────┘    └─────────┘    └─────────┘
/// ```

pub mod chart;
pub mod clean;
pub mod error;
pub mod export;
pub mod loader;
pub mod model;
pub mod schema;
pub mod stats;

/// Data layer: core types, loading, normalization, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / uploaded bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse input → raw Dataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize │  trim headers, fill text, derive length / keyword count
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  specialty predicate → DatasetView (row indices)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats   │  summary, distributions, keyword frequency
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod stats;

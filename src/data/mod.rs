//! Data layer: core types, loading, normalization and re-baselining.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Vec<RawRow>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ normalize  │  coerce fields, drop bad rows → Dataset
//!   └───────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ baseline  │  diff vs. baseline year → Rebaselined
//!   └──────────┘
//! ```
//!
//! `filter` narrows the country list shown next to the chart.

pub mod baseline;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;

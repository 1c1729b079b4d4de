//! Data layer: core types, statistics, loading and export.
//!
//! Architecture:
//! ```text
//!  .parquet / .json / .csv        samples (constant datasets)
//!        │                               │
//!        ▼                               │
//!   ┌──────────┐                         │
//!   │  loader   │  parse file → DataFrame │
//!   └──────────┘                         │
//!        │                               │
//!        ▼                               ▼
//!   ┌──────────────────────────────────────────┐
//!   │ Series / DataFrame   Value cells, dtypes │
//!   └──────────────────────────────────────────┘
//!        │                      │
//!        ▼                      ▼
//!   ┌──────────┐         ┌────────────┐
//!   │  stats    │ agg,    │  describe   │  summary tables
//!   │           │ cum     │             │
//!   └──────────┘         └────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ columnar  │  Value columns ⇄ Arrow arrays (writer, rendering)
//!   └──────────┘
//! ```

pub mod columnar;
pub mod describe;
pub mod filter;
pub mod frame;
pub mod loader;
pub mod model;
pub mod samples;
pub mod series;
pub mod stats;
pub mod writer;

//! Data layer: core types, loading, aggregation and selection.
//!
//! Architecture:
//! ```text
//!  revenue_forecast_scenarios.csv
//!  roi_simulation_results.csv
//!  segment_decision_summary.csv
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │ loader       │  parse files → Datasets (cached once per directory)
//!   └──────────────┘
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │ Datasets     │  ForecastTable, RoiTable, SegmentTable (read-only)
//!   └──────────────┘
//!        │
//!        ├──────────────┐
//!        ▼              ▼
//!   ┌──────────┐   ┌──────────┐
//!   │ aggregate│   │ filter   │  scenario validation, segment lookup
//!   └──────────┘   └──────────┘
//! ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;

pub use error::{DashboardError, Result};
pub use loader::DatasetCache;
pub use model::Datasets;

//! Decision intelligence dashboard.
//!
//! Loads three precomputed tables (revenue forecast scenarios, ROI simulation
//! results, customer segment summaries), derives KPI figures and declarative
//! chart specs from them, and shows them across four views in an egui window.

pub mod app;
pub mod charts;
pub mod color;
pub mod config;
pub mod data;
pub mod export;
pub mod state;
pub mod ui;
pub mod view;

pub use data::{DashboardError, DatasetCache, Datasets, Result};
pub use view::{render, RenderedView, UserSelections, ViewKey};

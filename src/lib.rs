//! Exploration of medical transcription datasets: load a table, normalize
//! it, filter by specialty, and compute the aggregates a dashboard shows.

pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod report;
pub mod state;

pub use config::DashboardConfig;
pub use data::filter::{DatasetView, SpecialtyFilter};
pub use data::model::{CellValue, Dataset, Record};
pub use data::stats::SummaryReport;
pub use error::{DashboardError, Result};
pub use state::Session;

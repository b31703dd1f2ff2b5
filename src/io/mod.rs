//! CSV bar loading and JSON/TOML report serialization.

pub mod csv_loader;
pub mod json_report;

pub use csv_loader::load_bars_csv;
pub use json_report::{ExperimentPlan, GridSearchReport, ParameterGrid};

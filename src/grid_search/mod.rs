//! Parameter-tuple enumeration, validity filtering, parallel
//! execution, and ranked reporting for the RSI+MACD+BB agent family.

mod driver;
mod progress;
mod types;
mod validity;

pub use driver::{run_cartesian, run_structural_plan};
pub use progress::ProgressReporter;
pub use types::{GridResult, GridSummary, ParameterAxes, RsiMacdBbTuple};
pub use validity::{lookback_for_cartesian, lookback_for_structural, ma_cross_axis_valid, macd_axis_valid};

//! Bar-replay simulators: single-timeframe and multi-timeframe.

mod alignment;
mod fill;
mod multi_timeframe_simulator;
mod simulator;

pub use alignment::{align, AlignedRow};
pub use fill::{apply_fill, FillMode};
pub use multi_timeframe_simulator::run_multi_timeframe;
pub use simulator::{run_single_timeframe, SimulationResult};

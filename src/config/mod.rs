//! Layered run configuration: compiled-in defaults, then an optional
//! TOML file, then environment variables (outermost wins).

mod simulation_env;

pub use simulation_env::{FillModeConfig, SimulationEnvConfig};

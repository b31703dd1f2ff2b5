use thiserror::Error;

/// Error taxonomy at the simulator/loader boundary. Agents and
/// indicator kernels never raise on bad inputs — they return sentinel
/// values (`None`, HOLD). These variants cover only the cases the
/// simulator or grid driver cannot route around.
#[derive(Debug, Error)]
pub enum BacktestError {
    #[error("insufficient data: have {have} bars, need at least {need}")]
    InsufficientData { have: usize, need: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("failed to write log file {path}: {source}")]
    IoFailure {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

use serde::{Deserialize, Serialize};

use crate::simulation::SimulationResult;

/// One point in the RSI+MACD+BB parameter space. This is the axis set
/// shared by both Cartesian and structural-plan (L18) search — the
/// structural plan is simply a precomputed list of these tuples plus
/// an experiment number instead of a Cartesian expansion of axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiMacdBbTuple {
    pub rsi_period: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bb_period: usize,
    pub bb_std_dev: f64,
    pub stop_loss: Option<f64>,
}

/// The axes of a Cartesian search: one vector of candidate values per
/// parameter. The driver enumerates their full product and filters by
/// [`crate::grid_search::validity`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterAxes {
    pub rsi_period: Vec<usize>,
    pub rsi_oversold: Vec<f64>,
    pub rsi_overbought: Vec<f64>,
    pub macd_fast: Vec<usize>,
    pub macd_slow: Vec<usize>,
    pub macd_signal: Vec<usize>,
    pub bb_period: Vec<usize>,
    pub bb_std_dev: Vec<f64>,
    pub stop_loss: Vec<Option<f64>>,
}

impl ParameterAxes {
    /// Full Cartesian product of every axis, in nested-loop order
    /// (rsi_period outermost, stop_loss innermost) so progress
    /// telemetry sees a stable, reproducible tuple ordering.
    pub fn product(&self) -> Vec<RsiMacdBbTuple> {
        let mut tuples = Vec::new();
        for &rsi_period in &self.rsi_period {
            for &rsi_oversold in &self.rsi_oversold {
                for &rsi_overbought in &self.rsi_overbought {
                    for &macd_fast in &self.macd_fast {
                        for &macd_slow in &self.macd_slow {
                            for &macd_signal in &self.macd_signal {
                                for &bb_period in &self.bb_period {
                                    for &bb_std_dev in &self.bb_std_dev {
                                        for &stop_loss in &self.stop_loss {
                                            tuples.push(RsiMacdBbTuple {
                                                rsi_period,
                                                rsi_oversold,
                                                rsi_overbought,
                                                macd_fast,
                                                macd_slow,
                                                macd_signal,
                                                bb_period,
                                                bb_std_dev,
                                                stop_loss,
                                            });
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
        tuples
    }
}

/// One evaluated parameter tuple, ranked by `result.profit_percentage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridResult {
    pub tuple: RsiMacdBbTuple,
    pub experiment_number: Option<u32>,
    pub result: SimulationResult,
}

/// Run totals surfaced alongside the ranked list.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GridSummary {
    pub total_tuples: usize,
    pub executed: usize,
    pub filtered_invalid: usize,
    pub failed: usize,
}

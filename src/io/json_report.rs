use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::grid_search::{GridResult, GridSummary, ParameterAxes, RsiMacdBbTuple};

/// One row of an experiment-plan JSON document (structural-plan mode,
/// e.g. an L18 orthogonal array): the same axis fields as
/// [`RsiMacdBbTuple`] plus the experiment's ordinal.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ExperimentRow {
    pub experiment: u32,
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

impl From<ExperimentRow> for (u32, RsiMacdBbTuple) {
    fn from(row: ExperimentRow) -> Self {
        (
            row.experiment,
            RsiMacdBbTuple {
                rsi_period: row.rsi_period,
                rsi_oversold: row.rsi_oversold,
                rsi_overbought: row.rsi_overbought,
                macd_fast: row.macd_fast,
                macd_slow: row.macd_slow,
                macd_signal: row.macd_signal,
                bb_period: row.bb_period,
                bb_std_dev: row.bb_std_dev,
                stop_loss: row.stop_loss,
            },
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExperimentPlan {
    pub experiments: Vec<ExperimentRow>,
}

impl ExperimentPlan {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("failed to read experiment plan {}: {e}", path.as_ref().display()))?;
        serde_json::from_str(&raw).map_err(|e| anyhow::anyhow!("malformed experiment plan {}: {e}", path.as_ref().display()))
    }

    pub fn into_tuples(self) -> Vec<(u32, RsiMacdBbTuple)> {
        self.experiments.into_iter().map(Into::into).collect()
    }
}

/// A Cartesian-mode axis document, read from TOML (mirroring the
/// teacher's parameter-grid file) or the equivalent JSON shape.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParameterGrid {
    #[serde(flatten)]
    pub axes: ParameterAxes,
}

impl ParameterGrid {
    pub fn load_toml(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("failed to read parameter grid {}: {e}", path.as_ref().display()))?;
        toml::from_str(&raw).map_err(|e| anyhow::anyhow!("malformed parameter grid {}: {e}", path.as_ref().display()))
    }

    pub fn load_json(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("failed to read parameter grid {}: {e}", path.as_ref().display()))?;
        serde_json::from_str(&raw).map_err(|e| anyhow::anyhow!("malformed parameter grid {}: {e}", path.as_ref().display()))
    }

    pub fn write_toml(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let rendered = toml::to_string_pretty(self)?;
        std::fs::write(path, rendered)?;
        Ok(())
    }
}

/// The final ranked grid-search output: every evaluated tuple
/// descending by profit percentage, the best one pulled out for
/// convenience, and run totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSearchReport {
    pub all_results: Vec<GridResult>,
    pub best_result: Option<GridResult>,
    pub summary: GridReportSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridReportSummary {
    pub total_tuples: usize,
    pub executed: usize,
    pub filtered_invalid: usize,
    pub failed: usize,
    pub best_tuple: Option<RsiMacdBbTuple>,
}

impl GridSearchReport {
    /// `results` must already be ranked descending by profit — callers
    /// get that ordering for free from [`crate::grid_search::run_cartesian`]
    /// and [`crate::grid_search::run_structural_plan`].
    pub fn new(results: Vec<GridResult>, summary: GridSummary) -> Self {
        let best_result = results.first().cloned();
        let best_tuple = best_result.as_ref().map(|r| r.tuple);
        Self {
            all_results: results,
            best_result,
            summary: GridReportSummary {
                total_tuples: summary.total_tuples,
                executed: summary.executed,
                filtered_invalid: summary.filtered_invalid,
                failed: summary.failed,
                best_tuple,
            },
        }
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let rendered = serde_json::to_string_pretty(self)?;
        std::fs::write(path, rendered)?;
        Ok(())
    }
}

use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::simulation::FillMode;

/// TOML-representable mirror of [`FillMode`] — the simulator's own
/// enum has no `Deserialize` impl since nothing but configuration
/// loading ever needs to parse one from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillModeConfig {
    Fractional,
    FullPosition,
}

impl From<FillModeConfig> for FillMode {
    fn from(value: FillModeConfig) -> Self {
        match value {
            FillModeConfig::Fractional => FillMode::Fractional,
            FillModeConfig::FullPosition => FillMode::FullPosition,
        }
    }
}

/// Run-wide defaults for both binaries. Resolved in three layers,
/// outermost wins: compiled-in defaults, an optional TOML file, then
/// environment variables — mirroring the layered `*_config::from_env()`
/// convention this lineage uses elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationEnvConfig {
    pub initial_balance: f64,
    pub fee_rate: f64,
    pub fill_mode: FillMode,
    pub lookback_margin_bars: usize,
    pub progress_interval_fraction: f64,
    pub progress_interval_seconds: u64,
    pub min_ratio: f64,
    pub log_file_path: Option<String>,
}

impl Default for SimulationEnvConfig {
    fn default() -> Self {
        Self {
            initial_balance: 1000.0,
            fee_rate: 0.001,
            fill_mode: FillMode::FullPosition,
            lookback_margin_bars: 50,
            progress_interval_fraction: 0.05,
            progress_interval_seconds: 300,
            min_ratio: 1.5,
            log_file_path: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct TomlOverrides {
    initial_balance: Option<f64>,
    fee_rate: Option<f64>,
    fill_mode: Option<FillModeConfig>,
    lookback_margin_bars: Option<usize>,
    progress_interval_fraction: Option<f64>,
    progress_interval_seconds: Option<u64>,
    min_ratio: Option<f64>,
    log_file_path: Option<String>,
}

impl SimulationEnvConfig {
    /// Loads compiled-in defaults, applies an optional TOML config
    /// file's overrides, then applies environment-variable overrides.
    /// A malformed environment variable names itself in the returned
    /// error via `anyhow::Context`.
    pub fn load(toml_path: Option<impl AsRef<Path>>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = toml_path {
            let raw = std::fs::read_to_string(path.as_ref())
                .with_context(|| format!("failed to read config file {}", path.as_ref().display()))?;
            let overrides: TomlOverrides = toml::from_str(&raw)
                .with_context(|| format!("malformed config file {}", path.as_ref().display()))?;
            config.apply_toml(overrides);
        }

        config.apply_env()?;
        Ok(config)
    }

    fn apply_toml(&mut self, overrides: TomlOverrides) {
        if let Some(v) = overrides.initial_balance {
            self.initial_balance = v;
        }
        if let Some(v) = overrides.fee_rate {
            self.fee_rate = v;
        }
        if let Some(v) = overrides.fill_mode {
            self.fill_mode = v.into();
        }
        if let Some(v) = overrides.lookback_margin_bars {
            self.lookback_margin_bars = v;
        }
        if let Some(v) = overrides.progress_interval_fraction {
            self.progress_interval_fraction = v;
        }
        if let Some(v) = overrides.progress_interval_seconds {
            self.progress_interval_seconds = v;
        }
        if let Some(v) = overrides.min_ratio {
            self.min_ratio = v;
        }
        if let Some(v) = overrides.log_file_path {
            self.log_file_path = Some(v);
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        self.initial_balance = parse_env_f64("INITIAL_BALANCE", self.initial_balance)?;
        self.fee_rate = parse_env_f64("FEE_RATE", self.fee_rate)?;
        self.lookback_margin_bars = parse_env_usize("LOOKBACK_MARGIN_BARS", self.lookback_margin_bars)?;
        self.progress_interval_fraction = parse_env_f64("PROGRESS_INTERVAL_FRACTION", self.progress_interval_fraction)?;
        self.progress_interval_seconds = parse_env_usize("PROGRESS_INTERVAL_SECONDS", self.progress_interval_seconds as usize)? as u64;
        self.min_ratio = parse_env_f64("MIN_RATIO", self.min_ratio)?;

        if let Ok(raw) = env::var("FILL_MODE") {
            self.fill_mode = match raw.to_lowercase().as_str() {
                "fractional" => FillMode::Fractional,
                "full_position" | "fullposition" => FillMode::FullPosition,
                other => anyhow::bail!("invalid FILL_MODE {other:?}: expected 'fractional' or 'full_position'"),
            };
        }
        if let Ok(path) = env::var("LOG_FILE_PATH") {
            self.log_file_path = Some(path);
        }
        Ok(())
    }
}

fn parse_env_usize(key: &str, default: usize) -> Result<usize> {
    match env::var(key) {
        Ok(raw) => raw.parse::<usize>().with_context(|| format!("failed to parse {key}={raw:?} as usize")),
        Err(_) => Ok(default),
    }
}

fn parse_env_f64(key: &str, default: f64) -> Result<f64> {
    match env::var(key) {
        Ok(raw) => raw.parse::<f64>().with_context(|| format!("failed to parse {key}={raw:?} as f64")),
        Err(_) => Ok(default),
    }
}

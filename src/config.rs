use crate::consts::{
    DEFAULT_COOLING_RATE, DEFAULT_INITIAL_TEMPERATURE, DEFAULT_LOG_INTERVAL,
    DEFAULT_MAX_ITERATIONS, DEFAULT_MIN_TEMPERATURE,
};
use crate::error::{MapperError, MfResult};
use clap::Args;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Cooling schedule shared by every annealing chain.
#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnealSchedule {
    #[arg(long, default_value_t = DEFAULT_INITIAL_TEMPERATURE)]
    pub initial_temperature: f64,
    #[arg(long, default_value_t = DEFAULT_COOLING_RATE)]
    pub cooling_rate: f64,
    #[arg(long, default_value_t = DEFAULT_MIN_TEMPERATURE)]
    pub min_temperature: f64,
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: usize,

    // Progress logging
    #[arg(long, default_value_t = DEFAULT_LOG_INTERVAL)]
    #[serde(default = "default_log_interval")]
    pub log_interval: usize,
}

fn default_log_interval() -> usize {
    DEFAULT_LOG_INTERVAL
}

impl Default for AnnealSchedule {
    fn default() -> Self {
        Self {
            initial_temperature: DEFAULT_INITIAL_TEMPERATURE,
            cooling_rate: DEFAULT_COOLING_RATE,
            min_temperature: DEFAULT_MIN_TEMPERATURE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            log_interval: DEFAULT_LOG_INTERVAL,
        }
    }
}

impl AnnealSchedule {
    pub fn validate(&self) -> MfResult<()> {
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(MapperError::Configuration(format!(
                "cooling_rate must lie in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return Err(MapperError::Configuration(format!(
                "initial_temperature must be positive, got {}",
                self.initial_temperature
            )));
        }
        if !(self.min_temperature.is_finite() && self.min_temperature >= 0.0) {
            return Err(MapperError::Configuration(format!(
                "min_temperature must be non-negative, got {}",
                self.min_temperature
            )));
        }
        if self.min_temperature >= self.initial_temperature {
            return Err(MapperError::Configuration(format!(
                "min_temperature {} must be below initial_temperature {}",
                self.min_temperature, self.initial_temperature
            )));
        }
        if self.max_iterations == 0 {
            return Err(MapperError::Configuration(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Proposals a chain will make before either bound stops it.
    pub fn planned_iterations(&self) -> usize {
        if self.initial_temperature < self.min_temperature {
            return 0;
        }
        if self.min_temperature <= 0.0 {
            return self.max_iterations;
        }
        let steps = (self.min_temperature / self.initial_temperature).ln() / self.cooling_rate.ln();
        (steps.floor() as usize + 1).min(self.max_iterations)
    }
}

/// Named search strategies.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    Display,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Baseline,
    #[strum(serialize = "connectivity")]
    #[serde(rename = "connectivity")]
    ConnectivityAware,
    #[strum(serialize = "subspace")]
    #[serde(rename = "subspace")]
    SubspaceOptimized,
    CliffordAssisted,
}

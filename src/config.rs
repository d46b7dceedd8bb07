//! Configuration System
//!
//! Loads the per-type rating parameters from params.toml so the empirical
//! figures can be adjusted without recompiling. The compiled-in defaults
//! are the values reported by the incentive study; every probability and
//! bound is validated at load time, before any simulation runs.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::agent::{AgentType, Condition};
use crate::error::SimError;

/// Default parameter file path
pub const DEFAULT_PARAMS_PATH: &str = "params.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub trial: TrialConfig,
    pub agents: AgentTable,
}

/// Bounds and fallbacks for a single estimation trial
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialConfig {
    /// Lower bound of the uniform ground-truth draw
    pub ground_truth_min: f64,
    /// Upper bound of the uniform ground-truth draw (exclusive)
    pub ground_truth_max: f64,
    /// Ratings are clipped to this range
    pub rating_min: f64,
    pub rating_max: f64,
    /// Collective estimate reported when nobody rates
    pub fallback_estimate: f64,
    /// Accuracy recorded for a no-participant trial
    pub fallback_accuracy: f64,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            ground_truth_min: 20.0,
            ground_truth_max: 80.0,
            rating_min: 0.0,
            rating_max: 100.0,
            fallback_estimate: 50.0,
            fallback_accuracy: 0.5,
        }
    }
}

impl TrialConfig {
    /// Width of the rating range; the denominator of the accuracy formula.
    pub fn rating_span(&self) -> f64 {
        self.rating_max - self.rating_min
    }
}

/// Per-type parameter table. The opt-out type carries no parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentTable {
    pub intrinsic: AgentParams,
    pub free_rider: AgentParams,
}

impl AgentTable {
    /// Parameters for a type, or `None` for the structural opt-out type.
    pub fn get(&self, agent_type: AgentType) -> Option<&AgentParams> {
        match agent_type {
            AgentType::Intrinsic => Some(&self.intrinsic),
            AgentType::FreeRider => Some(&self.free_rider),
            AgentType::OptOut => None,
        }
    }
}

/// Rating behavior for one agent type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentParams {
    /// Probability of rating in a given trial, no incentive offered
    pub participation_rate: f64,
    /// Probability of rating when an incentive is offered
    pub participation_rate_incentive: f64,
    /// Declared individual accuracy (the study's R-squared figure)
    pub accuracy: f64,
    /// Probability the rating error leans in the type's usual direction
    pub bias_probability: f64,
    /// Offset applied when the bias draw succeeds
    pub bias_lean: f64,
    /// Offset applied otherwise
    pub bias_counter: f64,
    /// Calibration constant mapping declared accuracy to noise variance
    pub noise_scale: f64,
}

impl Default for AgentParams {
    fn default() -> Self {
        // Intrinsic-rater figures; the free-rider column overrides these
        // in AgentTable::default.
        Self {
            participation_rate: 0.76,
            participation_rate_incentive: 0.86,
            accuracy: 0.29,
            bias_probability: 0.78,
            bias_lean: 8.0,
            bias_counter: -2.0,
            noise_scale: 400.0,
        }
    }
}

impl AgentParams {
    /// Participation probability under the given incentive condition.
    pub fn participation(&self, condition: Condition) -> f64 {
        match condition {
            Condition::Baseline => self.participation_rate,
            Condition::Incentivized => self.participation_rate_incentive,
        }
    }

    /// Noise standard deviation derived from the declared accuracy figure.
    pub fn noise_std(&self) -> f64 {
        ((1.0 - self.accuracy) * self.noise_scale).sqrt()
    }

    fn validate(&self, label: &str) -> Result<(), SimError> {
        check_unit_interval(label, "participation_rate", self.participation_rate)?;
        check_unit_interval(
            label,
            "participation_rate_incentive",
            self.participation_rate_incentive,
        )?;
        check_unit_interval(label, "accuracy", self.accuracy)?;
        check_unit_interval(label, "bias_probability", self.bias_probability)?;
        if !(self.noise_scale >= 0.0) {
            return Err(SimError::parameter(
                format!("{label}.noise_scale"),
                self.noise_scale,
                "must be non-negative",
            ));
        }
        Ok(())
    }
}

fn check_unit_interval(label: &str, field: &str, value: f64) -> Result<(), SimError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SimError::parameter(
            format!("{label}.{field}"),
            value,
            "must be within [0, 1]",
        ));
    }
    Ok(())
}

impl Default for AgentTable {
    fn default() -> Self {
        Self {
            intrinsic: AgentParams::default(),
            free_rider: AgentParams {
                participation_rate: 0.23,
                participation_rate_incentive: 0.63,
                accuracy: 0.46,
                bias_probability: 0.82,
                bias_lean: -6.0,
                bias_counter: 1.0,
                noise_scale: 300.0,
            },
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Load configuration from the default path, or use defaults if absent
    pub fn load_or_default() -> Self {
        Self::load(DEFAULT_PARAMS_PATH).unwrap_or_else(|e| {
            eprintln!("Warning: Could not load {}: {}. Using defaults.", DEFAULT_PARAMS_PATH, e);
            Self::default()
        })
    }

    /// Reject out-of-range probabilities and inverted bounds up front.
    pub fn validate(&self) -> Result<(), SimError> {
        self.agents.intrinsic.validate(AgentType::Intrinsic.label())?;
        self.agents.free_rider.validate(AgentType::FreeRider.label())?;

        if !(self.trial.ground_truth_min < self.trial.ground_truth_max) {
            return Err(SimError::parameter(
                "trial.ground_truth_max",
                self.trial.ground_truth_max,
                "ground-truth range must be non-empty",
            ));
        }
        if !(self.trial.rating_min < self.trial.rating_max) {
            return Err(SimError::parameter(
                "trial.rating_max",
                self.trial.rating_max,
                "rating range must be non-empty",
            ));
        }
        if self.trial.ground_truth_min < self.trial.rating_min
            || self.trial.ground_truth_max > self.trial.rating_max
        {
            return Err(SimError::parameter(
                "trial.ground_truth_min",
                self.trial.ground_truth_min,
                "ground-truth range must sit inside the rating range",
            ));
        }
        check_unit_interval("trial", "fallback_accuracy", self.trial.fallback_accuracy)?;
        Ok(())
    }
}

/// Configuration error type
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    Invalid(SimError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::Invalid(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

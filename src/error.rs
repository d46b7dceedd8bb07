//! Simulation Error Types
//!
//! Every failure in this crate is a deterministic input-validation failure,
//! surfaced synchronously before any trial runs. Nothing here is transient
//! or retryable. A trial in which no agent participates is *not* an error;
//! it is absorbed by the aggregation fallback policy.

use thiserror::Error;

/// Errors reported before a simulation is allowed to run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Composition cannot produce ratings (empty, or opt-out only)
    #[error("invalid composition: {0}")]
    InvalidComposition(String),

    /// Trial count must be a positive integer
    #[error("invalid trial count: {0} (must be at least 1)")]
    InvalidTrialCount(usize),

    /// A configured probability, accuracy, or bound is out of range
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: String,
        value: f64,
        reason: String,
    },
}

impl SimError {
    /// Shorthand used by configuration validation.
    pub(crate) fn parameter(name: impl Into<String>, value: f64, reason: impl Into<String>) -> Self {
        SimError::InvalidParameter {
            name: name.into(),
            value,
            reason: reason.into(),
        }
    }
}

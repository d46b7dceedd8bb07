//! Aggregator
//!
//! Collapses the participating ratings of one trial into a collective
//! estimate and scores it against ground truth.

use crate::config::TrialConfig;

/// Combine participating ratings into `(collective_estimate, accuracy)`.
///
/// A trial in which nobody rated is an expected outcome, not an error: it
/// falls back to the configured neutral estimate and accuracy. Otherwise
/// the estimate is the arithmetic mean of the ratings and accuracy is the
/// normalized distance to ground truth, clamped to [0, 1]. The aggregation
/// is order-independent.
pub fn aggregate(trial_cfg: &TrialConfig, ground_truth: f64, ratings: &[f64]) -> (f64, f64) {
    if ratings.is_empty() {
        return (trial_cfg.fallback_estimate, trial_cfg.fallback_accuracy);
    }

    let collective_estimate = ratings.iter().sum::<f64>() / ratings.len() as f64;
    let accuracy = 1.0 - (collective_estimate - ground_truth).abs() / trial_cfg.rating_span();

    (collective_estimate, accuracy.clamp(0.0, 1.0))
}

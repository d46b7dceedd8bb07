//! Simulation Driver
//!
//! Repeats independent trials for one composition and summarizes the
//! accuracy distribution. Two drivers are provided: a sequential one that
//! consumes a single continuing random stream, and a rayon-parallel one
//! that derives an independent stream per trial so results are
//! reproducible no matter how trials are scheduled across threads.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

use crate::agent::Condition;
use crate::config::Config;
use crate::error::SimError;
use crate::population::PopulationComposition;
use crate::trial::{run_trial, Trial};

/// Accuracy distribution over a fixed number of trials for one composition.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    pub n_trials: usize,
    pub mean_accuracy: f64,
    /// Sample standard deviation (n - 1 denominator); 0.0 for a single trial
    pub accuracy_std_dev: f64,
    /// Mean number of participating raters per trial
    pub mean_participants: f64,
    /// Per-trial accuracies, kept for downstream inspection
    pub accuracies: Vec<f64>,
}

/// Run `n_trials` independent trials off one continuing random stream.
///
/// Each trial draws a fresh ground truth and fresh participation, bias,
/// and noise decisions; the shared stream makes the whole run reproducible
/// from a single seed.
pub fn simulate<R: Rng>(
    cfg: &Config,
    composition: &PopulationComposition,
    n_trials: usize,
    condition: Condition,
    rng: &mut R,
) -> Result<SimulationResult, SimError> {
    validate_inputs(composition, n_trials)?;

    let trials: Vec<Trial> = (0..n_trials)
        .map(|_| run_trial(cfg, composition, condition, rng))
        .collect();

    Ok(summarize(&trials))
}

/// Parallel driver: trial `i` runs on its own stream seeded from `seed`
/// and `i`, so the result is bit-identical across runs and across thread
/// schedules, and statistically equivalent to the sequential driver.
pub fn simulate_parallel(
    cfg: &Config,
    composition: &PopulationComposition,
    n_trials: usize,
    condition: Condition,
    seed: u64,
) -> Result<SimulationResult, SimError> {
    validate_inputs(composition, n_trials)?;

    let trials: Vec<Trial> = (0..n_trials)
        .into_par_iter()
        .map(|index| {
            let mut rng = SmallRng::seed_from_u64(trial_seed(seed, index));
            run_trial(cfg, composition, condition, &mut rng)
        })
        .collect();

    Ok(summarize(&trials))
}

/// Derive a per-trial stream seed from the run seed and the trial index.
fn trial_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn validate_inputs(composition: &PopulationComposition, n_trials: usize) -> Result<(), SimError> {
    composition.validate()?;
    if n_trials == 0 {
        return Err(SimError::InvalidTrialCount(0));
    }
    Ok(())
}

fn summarize(trials: &[Trial]) -> SimulationResult {
    let n = trials.len();
    let accuracies: Vec<f64> = trials.iter().map(|t| t.accuracy).collect();

    let mean_accuracy = accuracies.iter().sum::<f64>() / n as f64;
    let accuracy_std_dev = if n > 1 {
        let variance = accuracies
            .iter()
            .map(|a| (a - mean_accuracy).powi(2))
            .sum::<f64>()
            / (n - 1) as f64;
        variance.sqrt()
    } else {
        0.0
    };
    let mean_participants =
        trials.iter().map(Trial::participant_count).sum::<usize>() as f64 / n as f64;

    tracing::debug!(
        "simulated {} trials: accuracy {:.3} ± {:.3}, {:.1} participants/trial",
        n,
        mean_accuracy,
        accuracy_std_dev,
        mean_participants
    );

    SimulationResult {
        n_trials: n,
        mean_accuracy,
        accuracy_std_dev,
        mean_participants,
        accuracies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentType;

    fn mixed() -> PopulationComposition {
        PopulationComposition::new()
            .with(AgentType::Intrinsic, 7)
            .with(AgentType::FreeRider, 7)
    }

    #[test]
    fn test_summary_statistics_are_well_formed() {
        let cfg = Config::default();
        let mut rng = SmallRng::seed_from_u64(42);

        let result = simulate(&cfg, &mixed(), 300, Condition::Baseline, &mut rng).unwrap();

        assert_eq!(result.n_trials, 300);
        assert_eq!(result.accuracies.len(), 300);
        assert!((0.0..=1.0).contains(&result.mean_accuracy));
        assert!(result.accuracy_std_dev >= 0.0);
        assert!(result.mean_participants >= 0.0);
        assert!(result.mean_participants <= 14.0);
    }

    #[test]
    fn test_zero_trials_rejected() {
        let cfg = Config::default();
        let mut rng = SmallRng::seed_from_u64(42);

        let result = simulate(&cfg, &mixed(), 0, Condition::Baseline, &mut rng);
        assert_eq!(result.unwrap_err(), SimError::InvalidTrialCount(0));
    }

    #[test]
    fn test_degenerate_composition_rejected_before_running() {
        let cfg = Config::default();
        let mut untouched = SmallRng::seed_from_u64(42);
        let mut rng = untouched.clone();

        let composition = PopulationComposition::new().with(AgentType::OptOut, 10);
        let result = simulate(&cfg, &composition, 100, Condition::Baseline, &mut rng);

        assert!(matches!(result, Err(SimError::InvalidComposition(_))));
        // Fail-fast: the stream was never consumed.
        assert_eq!(rng.gen::<u64>(), untouched.gen::<u64>());
    }

    #[test]
    fn test_single_trial_has_zero_std_dev() {
        let cfg = Config::default();
        let mut rng = SmallRng::seed_from_u64(1);

        let result = simulate(&cfg, &mixed(), 1, Condition::Baseline, &mut rng).unwrap();
        assert_eq!(result.accuracy_std_dev, 0.0);
    }

    #[test]
    fn test_all_abstention_runs_entirely_on_fallback() {
        let mut cfg = Config::default();
        cfg.agents.intrinsic.participation_rate = 0.0;
        cfg.agents.free_rider.participation_rate = 0.0;
        let mut rng = SmallRng::seed_from_u64(13);

        let result = simulate(&cfg, &mixed(), 250, Condition::Baseline, &mut rng).unwrap();

        assert_eq!(result.mean_accuracy, 0.5);
        assert_eq!(result.accuracy_std_dev, 0.0);
        assert_eq!(result.mean_participants, 0.0);
        assert!(result.accuracies.iter().all(|&a| a == 0.5));
    }

    #[test]
    fn test_parallel_driver_is_reproducible() {
        let cfg = Config::default();

        let first = simulate_parallel(&cfg, &mixed(), 400, Condition::Baseline, 42).unwrap();
        let second = simulate_parallel(&cfg, &mixed(), 400, Condition::Baseline, 42).unwrap();

        assert_eq!(first.accuracies, second.accuracies);
        assert_eq!(first.mean_accuracy, second.mean_accuracy);
        assert_eq!(first.accuracy_std_dev, second.accuracy_std_dev);
    }

    #[test]
    fn test_parallel_driver_validates_like_sequential() {
        let cfg = Config::default();
        assert!(simulate_parallel(&cfg, &mixed(), 0, Condition::Baseline, 1).is_err());

        let empty = PopulationComposition::new();
        assert!(simulate_parallel(&cfg, &empty, 10, Condition::Baseline, 1).is_err());
    }

    #[test]
    fn test_trial_seeds_differ_across_indices() {
        let seeds: Vec<u64> = (0..100).map(|i| trial_seed(42, i)).collect();
        let mut deduped = seeds.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), seeds.len());
    }
}

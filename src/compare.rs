//! Composition Comparator
//!
//! Runs the simulation driver across named population compositions so
//! their accuracy distributions can be compared side by side. The
//! comparator reports; it does not rank. Interpreting the numbers is the
//! caller's concern.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

use crate::agent::Condition;
use crate::config::Config;
use crate::error::SimError;
use crate::population::PopulationComposition;
use crate::simulate::{simulate, simulate_parallel, SimulationResult};

/// Run every named composition for the same trial count.
///
/// Each composition gets an independent random stream seeded from the run
/// seed and its own name, so a given `(seed, name)` pair always replays
/// identically and adding or removing a composition never perturbs the
/// others. All inputs are validated before any trial runs; on failure no
/// partial results are returned.
pub fn compare(
    cfg: &Config,
    compositions: &BTreeMap<String, PopulationComposition>,
    n_trials: usize,
    condition: Condition,
    seed: u64,
) -> Result<BTreeMap<String, SimulationResult>, SimError> {
    validate_all(compositions, n_trials)?;

    let mut results = BTreeMap::new();
    for (name, composition) in compositions {
        tracing::debug!("simulating composition `{}`", name);
        let mut rng = SmallRng::seed_from_u64(composition_seed(seed, name));
        let result = simulate(cfg, composition, n_trials, condition, &mut rng)?;
        results.insert(name.clone(), result);
    }
    Ok(results)
}

/// Parallel variant of [`compare`], running each composition through the
/// per-trial-stream driver.
pub fn compare_parallel(
    cfg: &Config,
    compositions: &BTreeMap<String, PopulationComposition>,
    n_trials: usize,
    condition: Condition,
    seed: u64,
) -> Result<BTreeMap<String, SimulationResult>, SimError> {
    validate_all(compositions, n_trials)?;

    let mut results = BTreeMap::new();
    for (name, composition) in compositions {
        tracing::debug!("simulating composition `{}` (parallel)", name);
        let result =
            simulate_parallel(cfg, composition, n_trials, condition, composition_seed(seed, name))?;
        results.insert(name.clone(), result);
    }
    Ok(results)
}

fn validate_all(
    compositions: &BTreeMap<String, PopulationComposition>,
    n_trials: usize,
) -> Result<(), SimError> {
    for (name, composition) in compositions {
        composition.validate().map_err(|e| match e {
            SimError::InvalidComposition(reason) => {
                SimError::InvalidComposition(format!("`{name}`: {reason}"))
            }
            other => other,
        })?;
    }
    if n_trials == 0 {
        return Err(SimError::InvalidTrialCount(0));
    }
    Ok(())
}

/// FNV-1a hash of the composition name folded into the run seed.
fn composition_seed(seed: u64, name: &str) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = FNV_OFFSET;
    for byte in name.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    seed ^ hash
}

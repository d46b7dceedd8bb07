//! Trial Engine
//!
//! Runs one estimation round: draw a ground truth, ask every agent in the
//! composition whether it rates, and aggregate whatever comes back.

use rand::Rng;

use crate::agent::{self, AgentType, Condition};
use crate::aggregate::aggregate;
use crate::config::Config;
use crate::population::PopulationComposition;

/// One simulated estimation round.
#[derive(Debug, Clone)]
pub struct Trial {
    /// The quantity the population is trying to estimate
    pub ground_truth: f64,
    /// Ratings from agents that chose to participate
    pub ratings: Vec<f64>,
    /// Mean of the participating ratings, or the fallback estimate
    pub collective_estimate: f64,
    /// Closeness of the collective estimate to ground truth, in [0, 1]
    pub accuracy: f64,
}

impl Trial {
    /// Number of agents that actually rated this round.
    pub fn participant_count(&self) -> usize {
        self.ratings.len()
    }
}

/// Run a single trial for one population composition.
///
/// Agent types are visited in [`AgentType::ALL`] order and each individual
/// agent draws independently, so a seeded run replays draw-for-draw.
/// Opt-out agents are skipped without touching the random stream.
pub fn run_trial<R: Rng>(
    cfg: &Config,
    composition: &PopulationComposition,
    condition: Condition,
    rng: &mut R,
) -> Trial {
    let ground_truth = rng.gen_range(cfg.trial.ground_truth_min..cfg.trial.ground_truth_max);

    let mut ratings = Vec::with_capacity(composition.rating_capable());
    for agent_type in AgentType::ALL {
        if agent_type == AgentType::OptOut {
            continue;
        }
        for _ in 0..composition.count(agent_type) {
            if let Some(rating) = agent::rate(cfg, agent_type, ground_truth, condition, rng) {
                ratings.push(rating);
            }
        }
    }

    let (collective_estimate, accuracy) = aggregate(&cfg.trial, ground_truth, &ratings);

    Trial {
        ground_truth,
        ratings,
        collective_estimate,
        accuracy,
    }
}

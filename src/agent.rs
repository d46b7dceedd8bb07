//! Agent Model
//!
//! Per-type rating behavior. Each agent type carries a participation rate,
//! a characteristic bias direction, and a noise level derived from its
//! declared individual accuracy. The draw order inside [`rate`] is fixed
//! (participation, then bias, then noise) so a seeded run is reproducible
//! draw-for-draw.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// The three rater types observed in the incentive study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    /// Rates often, leans positive, noisier individual estimates
    Intrinsic,
    /// Rates rarely, leans negative, tighter individual estimates
    FreeRider,
    /// Never rates; a structural placeholder in compositions
    OptOut,
}

impl AgentType {
    /// All types in a fixed order, used wherever iteration must be
    /// deterministic for a given seed.
    pub const ALL: [AgentType; 3] = [AgentType::Intrinsic, AgentType::FreeRider, AgentType::OptOut];

    /// Label used in reports and parameter tables.
    pub fn label(&self) -> &'static str {
        match self {
            AgentType::Intrinsic => "intrinsic",
            AgentType::FreeRider => "free_rider",
            AgentType::OptOut => "opt_out",
        }
    }
}

/// Whether raters are offered a participation incentive.
///
/// Incentives raise participation without changing bias or noise, so the
/// baseline condition is the default for accuracy comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[default]
    Baseline,
    Incentivized,
}

impl Condition {
    pub fn label(&self) -> &'static str {
        match self {
            Condition::Baseline => "baseline",
            Condition::Incentivized => "incentivized",
        }
    }
}

/// Produce one agent's rating for a trial, or `None` if the agent abstains.
///
/// Opt-out agents return `None` without consuming any randomness. Other
/// types first draw a participation Bernoulli; on success, a bias Bernoulli
/// selects between the type's characteristic lean and its small
/// counter-direction offset, then Gaussian noise is added and the rating is
/// clipped to the configured rating range.
pub fn rate<R: Rng>(
    cfg: &Config,
    agent_type: AgentType,
    ground_truth: f64,
    condition: Condition,
    rng: &mut R,
) -> Option<f64> {
    let params = cfg.agents.get(agent_type)?;

    if rng.gen::<f64>() >= params.participation(condition) {
        return None;
    }

    let bias = if rng.gen::<f64>() < params.bias_probability {
        params.bias_lean
    } else {
        params.bias_counter
    };

    let noise: f64 = rng.sample::<f64, _>(StandardNormal) * params.noise_std();

    let rating = ground_truth + bias + noise;
    Some(rating.clamp(cfg.trial.rating_min, cfg.trial.rating_max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentParams;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    /// Parameters with no noise so rating arithmetic is exact.
    fn noiseless(participation_rate: f64, bias_probability: f64) -> AgentParams {
        AgentParams {
            participation_rate,
            participation_rate_incentive: participation_rate,
            accuracy: 1.0,
            bias_probability,
            bias_lean: 8.0,
            bias_counter: -2.0,
            noise_scale: 400.0,
        }
    }

    #[test]
    fn test_opt_out_never_rates_and_consumes_no_randomness() {
        let cfg = Config::default();
        let mut rng = SmallRng::seed_from_u64(7);
        let mut untouched = rng.clone();

        for _ in 0..10 {
            assert_eq!(rate(&cfg, AgentType::OptOut, 50.0, Condition::Baseline, &mut rng), None);
        }

        // The stream must be exactly where it started.
        assert_eq!(rng.gen::<u64>(), untouched.gen::<u64>());
    }

    #[test]
    fn test_certain_participation_with_lean_bias() {
        let mut cfg = Config::default();
        cfg.agents.intrinsic = noiseless(1.0, 1.0);
        let mut rng = SmallRng::seed_from_u64(1);

        let rating = rate(&cfg, AgentType::Intrinsic, 50.0, Condition::Baseline, &mut rng);
        assert_eq!(rating, Some(58.0));
    }

    #[test]
    fn test_counter_bias_when_bias_draw_fails() {
        let mut cfg = Config::default();
        cfg.agents.intrinsic = noiseless(1.0, 0.0);
        let mut rng = SmallRng::seed_from_u64(1);

        let rating = rate(&cfg, AgentType::Intrinsic, 50.0, Condition::Baseline, &mut rng);
        assert_eq!(rating, Some(48.0));
    }

    #[test]
    fn test_zero_participation_always_abstains() {
        let mut cfg = Config::default();
        cfg.agents.free_rider = noiseless(0.0, 1.0);
        let mut rng = SmallRng::seed_from_u64(99);

        for _ in 0..100 {
            assert_eq!(rate(&cfg, AgentType::FreeRider, 50.0, Condition::Baseline, &mut rng), None);
        }
    }

    #[test]
    fn test_rating_clipped_to_range() {
        let mut cfg = Config::default();
        cfg.agents.intrinsic = noiseless(1.0, 1.0);
        let mut rng = SmallRng::seed_from_u64(1);

        // 99 + 8 overflows the rating range and must clip to its upper bound.
        let rating = rate(&cfg, AgentType::Intrinsic, 99.0, Condition::Baseline, &mut rng);
        assert_eq!(rating, Some(100.0));
    }

    #[test]
    fn test_incentive_condition_uses_incentive_rate() {
        let mut cfg = Config::default();
        cfg.agents.free_rider = AgentParams {
            participation_rate: 0.0,
            participation_rate_incentive: 1.0,
            ..noiseless(0.0, 1.0)
        };
        let mut rng = SmallRng::seed_from_u64(5);

        assert_eq!(rate(&cfg, AgentType::FreeRider, 50.0, Condition::Baseline, &mut rng), None);
        let rating = rate(&cfg, AgentType::FreeRider, 50.0, Condition::Incentivized, &mut rng);
        assert!(rating.is_some());
    }

    #[test]
    fn test_ratings_stay_in_bounds_under_heavy_noise() {
        let cfg = Config::default();
        let mut rng = SmallRng::seed_from_u64(2024);

        for _ in 0..2000 {
            for agent_type in [AgentType::Intrinsic, AgentType::FreeRider] {
                if let Some(rating) = rate(&cfg, agent_type, 75.0, Condition::Baseline, &mut rng) {
                    assert!((cfg.trial.rating_min..=cfg.trial.rating_max).contains(&rating));
                }
            }
        }
    }

    #[test]
    fn test_bias_leans_the_characteristic_way_at_population_level() {
        let cfg = Config::default();
        let mut rng = SmallRng::seed_from_u64(11);

        let mut intrinsic_sum = 0.0;
        let mut intrinsic_n = 0u32;
        let mut freerider_sum = 0.0;
        let mut freerider_n = 0u32;

        for _ in 0..20_000 {
            if let Some(r) = rate(&cfg, AgentType::Intrinsic, 50.0, Condition::Baseline, &mut rng) {
                intrinsic_sum += r - 50.0;
                intrinsic_n += 1;
            }
            if let Some(r) = rate(&cfg, AgentType::FreeRider, 50.0, Condition::Baseline, &mut rng) {
                freerider_sum += r - 50.0;
                freerider_n += 1;
            }
        }

        // Expected mean offsets: +5.8 for intrinsic, -4.74 for free riders.
        assert!(intrinsic_sum / f64::from(intrinsic_n) > 3.0);
        assert!(freerider_sum / f64::from(freerider_n) < -3.0);
    }
}

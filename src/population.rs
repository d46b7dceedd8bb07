//! Population Composition
//!
//! How many raters of each type are present in a simulated population,
//! plus the named compositions the study compares.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::agent::AgentType;
use crate::error::SimError;

/// Counts of each agent type in a simulated population.
///
/// Counts are unsigned, so negative counts are unrepresentable. A
/// composition must contain at least one agent capable of rating (any type
/// other than opt-out) before it can be simulated; [`validate`] enforces
/// this.
///
/// [`validate`]: PopulationComposition::validate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PopulationComposition {
    counts: BTreeMap<AgentType, usize>,
}

impl PopulationComposition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper for literal compositions.
    pub fn with(mut self, agent_type: AgentType, count: usize) -> Self {
        self.set(agent_type, count);
        self
    }

    pub fn set(&mut self, agent_type: AgentType, count: usize) {
        self.counts.insert(agent_type, count);
    }

    pub fn count(&self, agent_type: AgentType) -> usize {
        self.counts.get(&agent_type).copied().unwrap_or(0)
    }

    /// Total number of agents, opt-outs included.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of agents that can actually produce ratings.
    pub fn rating_capable(&self) -> usize {
        self.counts
            .iter()
            .filter(|(agent_type, _)| **agent_type != AgentType::OptOut)
            .map(|(_, count)| *count)
            .sum()
    }

    /// Rejects compositions that could never produce a rating.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.total() == 0 {
            return Err(SimError::InvalidComposition("no agents".to_string()));
        }
        if self.rating_capable() == 0 {
            return Err(SimError::InvalidComposition(
                "only opt-out agents present".to_string(),
            ));
        }
        Ok(())
    }
}

/// The four population compositions compared in the study.
pub fn study_compositions() -> BTreeMap<String, PopulationComposition> {
    let mut compositions = BTreeMap::new();
    compositions.insert(
        "homogeneous_intrinsic".to_string(),
        PopulationComposition::new().with(AgentType::Intrinsic, 15),
    );
    compositions.insert(
        "homogeneous_free_rider".to_string(),
        PopulationComposition::new().with(AgentType::FreeRider, 15),
    );
    compositions.insert(
        "mixed_60_40".to_string(),
        PopulationComposition::new()
            .with(AgentType::Intrinsic, 9)
            .with(AgentType::FreeRider, 6),
    );
    compositions.insert(
        "mixed_50_50".to_string(),
        PopulationComposition::new()
            .with(AgentType::Intrinsic, 7)
            .with(AgentType::FreeRider, 7),
    );
    compositions
}

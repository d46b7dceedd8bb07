//! Comparison Report Output
//!
//! Serializes comparison results to JSON for external analysis or
//! plotting. Raw per-trial accuracy sequences are included only on
//! request; the headline statistics are always present.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::agent::Condition;
use crate::population::PopulationComposition;
use crate::simulate::SimulationResult;

/// Report output path
pub const REPORT_OUTPUT_PATH: &str = "output/comparison.json";

/// Full record of one comparison run.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub seed: u64,
    pub n_trials: usize,
    pub condition: Condition,
    pub compositions: BTreeMap<String, PopulationComposition>,
    pub results: BTreeMap<String, CompositionSummary>,
}

/// Summary statistics for one composition.
#[derive(Debug, Clone, Serialize)]
pub struct CompositionSummary {
    pub mean_accuracy: f64,
    pub accuracy_std_dev: f64,
    pub mean_participants: f64,
    /// Raw per-trial accuracies, present only in full reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracies: Option<Vec<f64>>,
}

impl ComparisonReport {
    pub fn new(
        seed: u64,
        n_trials: usize,
        condition: Condition,
        compositions: &BTreeMap<String, PopulationComposition>,
        results: &BTreeMap<String, SimulationResult>,
        include_accuracies: bool,
    ) -> Self {
        let summaries = results
            .iter()
            .map(|(name, result)| {
                let summary = CompositionSummary {
                    mean_accuracy: result.mean_accuracy,
                    accuracy_std_dev: result.accuracy_std_dev,
                    mean_participants: result.mean_participants,
                    accuracies: include_accuracies.then(|| result.accuracies.clone()),
                };
                (name.clone(), summary)
            })
            .collect();

        Self {
            seed,
            n_trials,
            condition,
            compositions: compositions.clone(),
            results: summaries,
        }
    }
}

/// Write a report to the default output file.
pub fn write_report(report: &ComparisonReport) -> std::io::Result<()> {
    let output_dir = Path::new("output");
    if !output_dir.exists() {
        fs::create_dir_all(output_dir)?;
    }

    let json = serde_json::to_string_pretty(report)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    fs::write(REPORT_OUTPUT_PATH, json)
}

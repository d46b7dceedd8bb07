//! Collective Estimation Simulator
//!
//! Models how populations of heterogeneous raters jointly estimate an
//! unknown quantity. Intrinsic raters participate often but lean positive
//! with noisy estimates; free riders rate rarely, lean negative, and are
//! individually more accurate. Repeating many independent trials per
//! population composition quantifies when that diversity improves the
//! collective estimate over a homogeneous crowd.
//!
//! Randomness is injected everywhere (no global state): the sequential
//! driver consumes one continuing stream, the parallel driver derives one
//! stream per trial, and the comparator derives one stream per named
//! composition. A fixed seed replays any run draw-for-draw.

pub mod agent;
pub mod aggregate;
pub mod compare;
pub mod config;
pub mod error;
pub mod output;
pub mod population;
pub mod simulate;
pub mod trial;

pub use agent::{rate, AgentType, Condition};
pub use aggregate::aggregate;
pub use compare::{compare, compare_parallel};
pub use config::{AgentParams, AgentTable, Config, ConfigError, TrialConfig, DEFAULT_PARAMS_PATH};
pub use error::SimError;
pub use output::{write_report, ComparisonReport, CompositionSummary, REPORT_OUTPUT_PATH};
pub use population::{study_compositions, PopulationComposition};
pub use simulate::{simulate, simulate_parallel, SimulationResult};
pub use trial::{run_trial, Trial};

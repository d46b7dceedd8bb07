//! Collective Estimation Simulator
//!
//! Compares how accurately different population compositions of intrinsic
//! raters and free riders estimate an unknown quantity, then prints the
//! per-composition accuracy distributions and writes a JSON report.

use clap::Parser;
use std::path::Path;
use std::process::ExitCode;

use crowd_sim::{
    compare, compare_parallel, study_compositions, write_report, ComparisonReport, Condition,
    Config, DEFAULT_PARAMS_PATH,
};

/// Command line arguments for the simulator
#[derive(Parser, Debug)]
#[command(name = "crowd_sim")]
#[command(about = "Collective estimation across rater population compositions")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of trials per composition
    #[arg(long, default_value_t = 500)]
    trials: usize,

    /// Parameter file path
    #[arg(long, default_value = DEFAULT_PARAMS_PATH)]
    params: String,

    /// Offer participation incentives to all raters
    #[arg(long)]
    incentives: bool,

    /// Run trials in parallel with per-trial random streams
    #[arg(long)]
    parallel: bool,

    /// Include raw per-trial accuracies in the JSON report
    #[arg(long)]
    full_report: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // A missing parameter file falls back to the compiled-in study
    // figures; a present but invalid one aborts the run.
    let cfg = if Path::new(&args.params).exists() {
        match Config::load(&args.params) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Error: could not use {}: {}", args.params, e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        Config::default()
    };

    let condition = if args.incentives {
        Condition::Incentivized
    } else {
        Condition::Baseline
    };

    println!("Collective Estimation Simulator");
    println!("===============================");
    println!("Seed: {}", args.seed);
    println!("Trials per composition: {}", args.trials);
    println!("Condition: {}", condition.label());
    println!();

    let compositions = study_compositions();
    let outcome = if args.parallel {
        compare_parallel(&cfg, &compositions, args.trials, condition, args.seed)
    } else {
        compare(&cfg, &compositions, args.trials, condition, args.seed)
    };

    let results = match outcome {
        Ok(results) => results,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Collective accuracy by composition:");
    for (name, result) in &results {
        println!(
            "  {:<24} {:.3} ± {:.3}  ({:.1} participants/trial)",
            name, result.mean_accuracy, result.accuracy_std_dev, result.mean_participants
        );
    }

    let report = ComparisonReport::new(
        args.seed,
        args.trials,
        condition,
        &compositions,
        &results,
        args.full_report,
    );
    match write_report(&report) {
        Ok(()) => {
            println!();
            println!("Wrote {}", crowd_sim::REPORT_OUTPUT_PATH);
        }
        Err(e) => eprintln!("Warning: could not write report: {}", e),
    }

    ExitCode::SUCCESS
}

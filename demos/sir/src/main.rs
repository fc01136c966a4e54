//! sir-demo: SIR and SEIR outbreaks on the rust_epi simulation kernel.
//!
//! Runs the scenario once with CSV output and an agent snapshot every
//! `output_interval_ticks`, prints the headline results, then repeats the
//! run over several seeds to show replicate spread.
//!
//! ```text
//! sir-demo [--scenario scenario.json] [--output output/sir] [--seed N] [--replicates N]
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

mod scenario;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use epi_output::{Both, CsvWriter, OutputObserver, ResultsObserver};
use epi_sim::{RunStatus, run_replicates};

use scenario::Scenario;

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "sir-demo")]
#[command(about = "Run an SIR / SEIR scenario and write CSV results")]
struct Args {
    /// Scenario JSON file; the built-in scenario when omitted
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Directory for CSV output
    #[arg(short, long, default_value = "output/sir")]
    output: PathBuf,

    /// Override the scenario's master seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the scenario's replicate count
    #[arg(short, long)]
    replicates: Option<u64>,
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let output_dir = args.output;

    let mut scenario = Scenario::load(args.scenario.as_deref())?;
    if let Some(seed) = args.seed {
        scenario.sim.seed = seed;
    }
    if let Some(replicates) = args.replicates {
        scenario.replicates = replicates;
    }

    println!("=== sir-demo: rust_epi ===");
    println!(
        "Agents: {}  |  Steps: {}  |  Seed: {}  |  Diseases: {}",
        scenario.sim.n_agents,
        scenario.sim.n_steps,
        scenario.sim.seed,
        scenario.diseases.iter().map(|d| d.name.as_str()).collect::<Vec<_>>().join(", "),
    );
    println!();

    // 1. One run with full output.
    let mut sim = scenario.build(scenario.sim.seed)?;
    std::fs::create_dir_all(&output_dir)?;
    let writer = CsvWriter::new(&output_dir)?;
    let mut obs = Both(OutputObserver::new(writer), ResultsObserver::for_config(&sim.config));

    let t0 = Instant::now();
    let status = sim.run(&mut obs)?;
    let elapsed = t0.elapsed();
    if let Some(e) = obs.0.take_error() {
        warn!(error = %e, "output incomplete");
    }
    if let RunStatus::Aborted { at } = status {
        warn!(tick = at.0, "run aborted");
    }

    let results = obs.1.into_results();
    results.write_csv(&output_dir.join("results.csv"))?;
    // One tick is one day in the built-in scenario.
    results.resample(30.0)?.write_csv(&output_dir.join("results_monthly.csv"))?;
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("Output written to {}", output_dir.display());
    println!();

    // 2. Headline numbers.
    println!("{:<28} {:>12}", "Result", "Summary");
    println!("{}", "-".repeat(41));
    for (key, value) in results.summary() {
        if key.ends_with(".cum_infections") || key.ends_with(".cum_deaths") || key.ends_with(".prevalence") {
            println!("{key:<28} {value:>12.3}");
        }
    }
    if let Some(reached) = results.get("vx.cum_reached").and_then(|v| v.last()) {
        println!("{:<28} {:>12}", "vx.cum_reached", reached);
    }
    println!();

    // 3. Replicates.
    replicates(&scenario, &output_dir)?;

    Ok(())
}

// ── Replicates ────────────────────────────────────────────────────────────────

fn replicates(scenario: &Scenario, output_dir: &Path) -> Result<()> {
    if scenario.replicates < 2 {
        return Ok(());
    }
    let seeds: Vec<u64> = (0..scenario.replicates).map(|i| scenario.sim.seed + 1 + i).collect();
    let t0 = Instant::now();
    let runs = run_replicates(&seeds, |seed| {
        let sim = scenario.build(seed)?;
        let observer = ResultsObserver::for_config(&sim.config);
        Ok((sim, observer))
    })?;
    info!(replicates = runs.len(), secs = t0.elapsed().as_secs_f64(), "replicates finished");

    println!("{:<8} {}", "Seed", "Attack rate per disease");
    println!("{}", "-".repeat(41));
    for run in runs {
        let results = run.observer.into_results();
        let n0 = scenario.sim.n_agents as f64 * scenario.sim.pop_scale;
        let rates: Vec<String> = scenario
            .diseases
            .iter()
            .map(|d| {
                let total = results.summarize(&format!("{}.cum_infections", d.name)).unwrap_or(0.0);
                format!("{}={:.3}", d.name, total / n0)
            })
            .collect();
        println!("{:<8} {}", run.seed, rates.join("  "));
        results.write_csv(&output_dir.join(format!("results_seed{}.csv", run.seed)))?;
    }
    Ok(())
}

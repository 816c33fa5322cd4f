use octsim::{bench_solvers, export_trajectory, write_trajectory_yaml, Scenario, ScenarioConfig};
use octsim::benchmark::benchmark::bench_solvers_curve;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file (YAML)
    #[arg(default_value = "scenarios/sun_earth.yaml")]
    input: PathBuf,

    /// Where to write the trajectory
    #[arg(short, long, default_value = "results.yaml")]
    output: PathBuf,

    /// Time the solvers instead of running a scenario
    #[arg(long)]
    bench: bool,

    /// Like --bench, CSV over a finer range of N
    #[arg(long)]
    bench_csv: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.bench {
        bench_solvers()?;
        return Ok(());
    }
    if args.bench_csv {
        bench_solvers_curve()?;
        return Ok(());
    }

    info!("reading scenario from {}", args.input.display());
    let scenario_cfg = ScenarioConfig::from_path(&args.input)
        .with_context(|| format!("failed to load scenario {}", args.input.display()))?;

    let mut system = Scenario::build_scenario(scenario_cfg)?.into_system()?;
    system.solve()?;

    info!("writing trajectory to {}", args.output.display());
    write_trajectory_yaml(&export_trajectory(&system), &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    Ok(())
}

use std::error::Error;
use std::fs;
use std::path::Path;

use clap::Parser;

use trap_vmc::io::report;
use trap_vmc::{
    read_run_config, run_sweep, select_trial, BruteForce, FixedGridSweep, GradientDescent,
    ImportanceSampling, Propagator, RunConfig, SamplingConfig, SweepConfig, SweepResults,
    TrialWfn, VmcParams,
};

#[derive(Parser, Debug)]
#[command(version, about = "Variational Monte Carlo for trapped bosons", long_about = None)]
struct Args {
    /// Path to the YAML run configuration.
    #[arg(short, long, default_value = "config.yml")]
    config: String,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = read_run_config(&args.config)?;
    let trial = select_trial(
        config.dimensions,
        config.beta,
        config.interaction,
        config.hard_sphere_radius,
    )?;
    let params = VmcParams {
        n_particles: config.particles,
        n_cycles: config.cycles,
        n_workers: config.workers,
        seed: config.seed,
    };

    let results = match config.sampling {
        SamplingConfig::BruteForce { step_size } => {
            println!("Brute force metropolis");
            execute(trial.as_ref(), &BruteForce { step_size }, params, &config)
        }
        SamplingConfig::Importance { time_step, diffusion } => {
            println!("Importance sampling");
            execute(
                trial.as_ref(),
                &ImportanceSampling { time_step, diffusion },
                params,
                &config,
            )
        }
    };

    println!("VMC Results for the Trapped Boson Gas");
    println!("----------------------------------------");
    println!(
        "Dimensions: {}, particles: {}, cycles: {}, workers: {}",
        config.dimensions, config.particles, config.cycles, config.workers
    );
    for row in &results.rows {
        println!(
            "alpha = {:.4}   <E> = {:10.6}   sigma^2 = {:10.6}   acceptance = {:.3}",
            row.alpha, row.energy, row.variance, row.acceptance_rate
        );
    }

    // A failed write is fatal for that file only; the remaining outputs are
    // still attempted from the untouched in-memory statistics.
    let mut first_error: Option<std::io::Error> = None;
    let mut record = |result: std::io::Result<()>, path: &str| {
        if let Err(e) = result {
            eprintln!("warning: could not write {path}: {e}");
            if first_error.is_none() {
                first_error = Some(e);
            }
        }
    };

    record(
        ensure_parent_dir(&config.statistics_path)
            .and_then(|_| report::write_statistics(&config.statistics_path, &results.rows)),
        &config.statistics_path,
    );
    if let Some(path) = &config.statistics_per_particle_path {
        record(
            ensure_parent_dir(path).and_then(|_| {
                report::write_statistics_per_particle(path, &results.rows, config.particles)
            }),
            path,
        );
    }
    record(
        ensure_parent_dir(&config.energies_path).and_then(|_| {
            report::write_energies(&config.energies_path, &results.rows, &results.energies)
        }),
        &config.energies_path,
    );

    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn ensure_parent_dir(path: &str) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn execute<P: Propagator>(
    trial: &dyn TrialWfn,
    propagator: &P,
    params: VmcParams,
    config: &RunConfig,
) -> SweepResults {
    match config.sweep {
        SweepConfig::FixedGrid { start, stop, count } => {
            let mut schedule = FixedGridSweep::linspace(start, stop, count);
            run_sweep(trial, propagator, params, &mut schedule, config.verbose)
        }
        SweepConfig::GradientDescent {
            initial_alpha,
            learning_rate,
            iterations,
            tolerance,
        } => {
            let mut schedule = GradientDescent::new(initial_alpha, learning_rate, iterations, tolerance);
            run_sweep(trial, propagator, params, &mut schedule, config.verbose)
        }
    }
}

// Airport Checkpoint Simulator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/airport-checkpoint-sim --experiment steady-state
// ```
//
// Or with custom configuration:
//
// ```console
// $ ./target/release/airport-checkpoint-sim --config checkpoint.json --topology improved --verbose
// ```

use airport_checkpoint_sim::report::{write_finite_horizon, write_steady_state, write_verification, RunManifest};
use airport_checkpoint_sim::simulation::{
    FiniteHorizonRunner, LoggingConfig, ReplicationPlan, SteadyStateRunner, VerificationRunner,
};
use airport_checkpoint_sim::types::config::CliArgs;
use airport_checkpoint_sim::types::{ExperimentKind, SimulationConfig};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::Path;
use std::process;
use std::time::Instant;
use tracing::{error, info, warn};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    // Handle special CLI flags that don't require full initialization
    if args.print_config {
        match SimulationConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    // Initialize logging based on CLI flags
    let mut logging = if let Some(dir) = &args.log_dir {
        LoggingConfig::batch(dir.clone())
    } else if args.debug {
        LoggingConfig::debug()
    } else if args.verbose {
        LoggingConfig::verbose()
    } else {
        LoggingConfig::new().with_level(tracing::Level::WARN)
    };
    if args.trace_events {
        logging = logging.with_event_tracing();
    }
    let logging_result = logging.init();

    let _logging_guard = match logging_result {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    info!("Starting Airport Checkpoint Simulator");

    let dry_run = args.dry_run;
    let config = match load_config(args) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    };

    info!("Configuration loaded and validated successfully");

    if dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - simulation will not be executed.");
        print_configuration_summary(&config);
        return;
    }

    print_startup_banner(&config);

    if let Err(e) = run_experiment(&config) {
        error!("Simulation failed: {:#}", e);
        eprintln!("Simulation failed: {:#}", e);
        process::exit(1);
    }

    info!("Airport Checkpoint Simulator completed successfully");
}

/// Merge defaults, the optional config file and CLI flags, then validate
fn load_config(args: CliArgs) -> Result<SimulationConfig> {
    let config = SimulationConfig::from_cli_args(args).context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

/// Run the configured experiment and write its reports
fn run_experiment(config: &SimulationConfig) -> Result<()> {
    let start_time = Instant::now();
    let format = config.get_output_format().map_err(|e| anyhow!(e))?;
    let dir = Path::new(&config.output_dir);
    let mut manifest = RunManifest::new(config.experiment, config.seed);
    info!("Run {} writing {} reports to {}", manifest.run_id, format, dir.display());

    match config.experiment {
        ExperimentKind::FiniteHorizon | ExperimentKind::Transient => {
            let plan = if config.experiment == ExperimentKind::Transient {
                ReplicationPlan::transient(config)
            } else {
                ReplicationPlan::finite_horizon(config)
            };
            eprintln!("Running {} replications of {:.0}s...", plan.replications, plan.horizon);
            let report = FiniteHorizonRunner::new(config.clone(), plan)
                .run()
                .context("Finite-horizon experiment failed")?;
            print_skipped(&report.skipped);
            write_finite_horizon(dir, &report, format, &mut manifest).context("Failed to write reports")?;
            eprintln!(
                "Estimated {} population and {} time-weighted metrics",
                report.population.len(),
                report.time.len()
            );
        }
        ExperimentKind::SteadyState => {
            eprintln!("Collecting {} batches of {} observations...", config.batch_count, config.batch_size);
            let report = SteadyStateRunner::new(config.clone()).run().context("Steady-state experiment failed")?;
            print_skipped(&report.skipped);
            write_steady_state(dir, &report, format, &mut manifest).context("Failed to write reports")?;
            eprintln!(
                "Processed {} events for {} passengers, simulated clock {:.0}s",
                report.summary.events, report.summary.jobs, report.summary.end_time
            );
        }
        ExperimentKind::Verification => {
            eprintln!("Verifying centers against queueing models...");
            let report = VerificationRunner::new(config.clone()).run().context("Verification failed")?;
            write_verification(dir, &report, format, &mut manifest).context("Failed to write reports")?;
            for row in &report.rows {
                let verdict = if !row.stable {
                    "unstable"
                } else if row.within_interval {
                    "ok"
                } else {
                    "outside"
                };
                eprintln!(
                    "  {:<16} {:<9} sim {:>10.3} ± {:<8.3} theo {:>10.3}  {}",
                    row.center, row.model, row.sim_mean, row.sim_width, row.theo_value, verdict
                );
            }
        }
    }

    let manifest_path = manifest.write(dir).context("Failed to write manifest")?;
    eprintln!("Wrote {} report files, manifest at {}", manifest.files.len(), manifest_path.display());
    eprintln!("Total execution time: {:.2?}", start_time.elapsed());
    Ok(())
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &SimulationConfig) {
    eprintln!("Airport Checkpoint Simulator");
    eprintln!("============================");
    eprintln!("Discrete-event simulation of a security checkpoint queueing network");
    eprintln!();

    print_configuration_summary(config);
}

/// Print configuration summary
fn print_configuration_summary(config: &SimulationConfig) {
    eprintln!("Configuration:");
    eprintln!("  Experiment: {}", config.experiment);
    eprintln!("  Topology: {}", config.topology);
    eprintln!("  Seed: {}", config.seed);
    eprintln!("  Mean inter-arrival time: {}s", config.arrival_mean_time);
    eprintln!(
        "  Services: {}",
        if config.exponential_services { "exponential" } else { "truncated normal" }
    );
    eprintln!("  X-ray lanes: {} ({:?})", config.stations.x_ray.servers, config.x_ray_policy);
    eprintln!("  Output: {} ({})", config.output_dir, config.output_format);
    eprintln!();
}

/// Report metrics without enough observations for an interval
fn print_skipped(skipped: &[String]) {
    if !skipped.is_empty() {
        warn!("{} metrics had too few observations for an interval", skipped.len());
        eprintln!("Skipped (insufficient data): {}", skipped.join(", "));
    }
}

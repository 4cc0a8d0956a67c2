// Trajectory Loader - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/trajectory-loader
// ```
//
// Or against a specific cluster and window:
//
// ```console
// $ ./target/release/trajectory-loader --elastic search:9200 --clean --items 50 --start 1700000000000 --end 1700003600000
// ```

use anyhow::Context;
use clap::{CommandFactory, Parser};
use std::process;
use tracing::{error, info};
use trajectory_loader::simulation::{LoggingConfig, RunStatistics, SimulationOrchestrator};
use trajectory_loader::types::{CliArgs, SimulationConfig};

fn main() {
    let args = CliArgs::parse();

    // Usage is not a successful run
    if args.help {
        eprintln!("{}", CliArgs::command().render_help());
        process::exit(1);
    }

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

    let _logging = match LoggingConfig::from_cli_args(&args).init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    let dry_run = args.dry_run;
    let config = match load_config(args) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    };

    if dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - no requests will be sent.");
        print_configuration_summary(&config);
        return;
    }

    print_startup_banner(&config);

    match run_loader(config) {
        Ok(statistics) => {
            eprintln!("{}", statistics.generate_summary_output());
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            process::exit(1);
        }
    }
}

/// Build and validate the run configuration from the command line
fn load_config(args: CliArgs) -> anyhow::Result<SimulationConfig> {
    let config = SimulationConfig::from_cli_args(args).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    info!("Configuration loaded and validated successfully");
    Ok(config)
}

/// Drive one run on a single-threaded runtime
fn run_loader(config: SimulationConfig) -> anyhow::Result<RunStatistics> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let statistics = runtime.block_on(async move {
        let orchestrator = SimulationOrchestrator::new(config)?;
        orchestrator.run().await
    })?;
    Ok(statistics)
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &SimulationConfig) {
    eprintln!("Trajectory Loader");
    eprintln!("=================");
    eprintln!("Synthetic moving-object trajectories for a search index");
    eprintln!();

    print_configuration_summary(config);
}

/// Print configuration summary
fn print_configuration_summary(config: &SimulationConfig) {
    eprintln!("Configuration:");
    eprintln!("  Window: {} .. {} ({} time steps)", config.start_time, config.end_time, config.time_steps());
    eprintln!("  Concurrent Items: {}", config.items_concurrent);
    eprintln!("  Item Lifetime: {} - {} s", config.item_min_time, config.item_max_time);
    eprintln!("  Item Speed: {} - {} m/s", config.item_min_speed, config.item_max_speed);
    eprintln!("  Path Resolution: {} s", config.path_resolution);
    eprintln!("  Backend: {}", config.backend_url());
    eprintln!("  Index: {}{}", config.index, if config.clean { " (clean)" } else { "" });
    eprintln!("  Record Schema: {}", config.schema);
    eprintln!("  Request Timeout: {} ms", config.request_timeout_ms);
    if let Some(seed) = config.seed {
        eprintln!("  Random Seed: {}", seed);
    }
    eprintln!();
}

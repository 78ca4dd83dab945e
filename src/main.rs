// Paint Shop Simulator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/paint-shop-simulator
// ```
//
// Or with custom configuration:
//
// ```console
// $ ./target/release/paint-shop-simulator --painting-machines 2 --seed 42 --log-detail-level detailed
// ```

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use paint_shop_simulator::report;
use paint_shop_simulator::simulation::{LoggingConfig, LoggingGuard, PaintShopSimulation};
use paint_shop_simulator::types::config::CliArgs;
use paint_shop_simulator::types::{SimulationConfig, StationKind};
use std::process;
use tracing::{error, info, Level};

/// Shop events at INFO, everything else from the crate at WARN
const DEFAULT_FILTER: &str = "paint_shop_simulator=warn,paint_shop_simulator::events=info";

fn main() {
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

    let _logging = match init_logging(&args) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(args) {
        error!("Simulation failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn init_logging(args: &CliArgs) -> Result<LoggingGuard> {
    let mut logging = if args.debug {
        LoggingConfig::new().with_level(Level::DEBUG).with_span_events()
    } else if args.verbose {
        LoggingConfig::new().with_level(Level::INFO)
    } else if args.quiet {
        LoggingConfig::new().with_level(Level::WARN)
    } else {
        LoggingConfig::new().with_env_filter(DEFAULT_FILTER)
    };

    if let Some(directory) = &args.diagnostics_dir {
        logging = logging.with_diagnostics_file(directory.clone());
    }

    logging.init().map_err(|e| anyhow!(e))
}

fn run(args: CliArgs) -> Result<()> {
    let dry_run = args.dry_run;

    let config = SimulationConfig::from_cli_args(args).context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;
    info!("Configuration loaded and validated successfully");

    if dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - simulation will not be executed.");
        print_configuration_summary(&config);
        return Ok(());
    }

    print_startup_banner(&config);

    let simulation = PaintShopSimulation::with_log_file(config.clone())
        .with_context(|| format!("Failed to open event log {}", config.log_file_path))?;
    let run_id = simulation.run_id();
    info!("Starting simulation {}", run_id);

    let results = simulation.run().context("Simulation run failed")?;

    println!("{}", report::render_results(&results));
    println!("{}", report::render_recommendations(&results));

    report::write_results(&results, &config.results_file_path, config.results_format)
        .with_context(|| format!("Failed to write results to {}", config.results_file_path))?;

    eprintln!("Event log saved to: {}", config.log_file_path);
    eprintln!("Results saved to: {}", config.results_file_path);
    info!("Paint Shop Simulator completed successfully");
    Ok(())
}

/// Print startup banner and configuration
fn print_startup_banner(config: &SimulationConfig) {
    eprintln!("Paint Shop Simulator");
    eprintln!("====================");
    eprintln!("Cleaning, primer and painting conveyor simulation");
    eprintln!();

    print_configuration_summary(config);
    eprintln!();
}

/// Print configuration summary
fn print_configuration_summary(config: &SimulationConfig) {
    eprintln!("Configuration:");
    eprintln!("  Shift Duration: {} min", config.shift_duration);
    eprintln!("  Arrival Cutoff: {} min", config.arrival_cutoff);
    eprintln!(
        "  Arrival Interval: {} - {} min",
        config.arrival_interval.min, config.arrival_interval.max
    );
    for kind in StationKind::ALL {
        let station = config.station(kind);
        eprintln!(
            "  {}: {} machine(s), {} - {} min",
            kind, station.machines, station.service_time.min, station.service_time.max
        );
    }
    eprintln!("  Bottleneck Threshold: {} cars", config.bottleneck_threshold);
    eprintln!("  Horizon: {} min", config.horizon);
    eprintln!("  Log Detail Level: {}", config.log_detail_level);
    eprintln!("  Results Format: {}", config.results_format);
    if let Some(seed) = config.seed {
        eprintln!("  Random Seed: {}", seed);
    }

    eprintln!("\nEstimated Scale:");
    eprintln!("  Arrivals: ~{}", config.expected_arrivals());
}

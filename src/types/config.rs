//! Configuration structures for the paint shop simulator
//!
//! This module contains the simulation configuration structure and validation logic
//! used to control the timing, capacities and logging of a simulation run.

use super::{LogDetailLevel, OutputFormat, StationKind};
use clap::Parser;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default configuration constants (one 8-hour shift, minutes)
pub mod defaults {
    /// Length of the shift used as the utilization window
    pub const SHIFT_DURATION: f64 = 480.0;

    /// No new cars are admitted at or after this time
    pub const ARRIVAL_CUTOFF: f64 = 480.0;

    /// Scheduler stops advancing after this time
    pub const HORIZON: f64 = 2000.0;

    /// Alert when a station queue holds more than this many cars
    pub const BOTTLENECK_THRESHOLD: usize = 3;

    /// Event log written during the run
    pub const LOG_FILE_PATH: &str = "output/simulation_log.txt";

    /// Results summary written after the run
    pub const RESULTS_FILE_PATH: &str = "output/metrics_results.txt";
}

/// Closed interval `[min, max]` of simulated minutes sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Lower bound in minutes
    pub min: f64,
    /// Upper bound in minutes
    pub max: f64,
}

impl TimeRange {
    /// Create a new range
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range that always yields the same value
    pub const fn fixed(value: f64) -> Self {
        Self { min: value, max: value }
    }

    /// Draw a duration uniformly from the range
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.min >= self.max {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }

    /// Midpoint of the range
    pub fn mean(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    fn check(&self, field: &str) -> Result<(), ConfigValidationError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min < 0.0 || self.min > self.max {
            return Err(ConfigValidationError::InvalidTimeRange {
                field: field.to_string(),
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Capacity and service times of one station
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationConfig {
    /// Number of parallel machines
    pub machines: usize,
    /// Service time range in minutes
    pub service_time: TimeRange,
}

impl StationConfig {
    /// Create a new station configuration
    pub const fn new(machines: usize, service_time: TimeRange) -> Self {
        Self { machines, service_time }
    }

    /// Default configuration for a station
    pub const fn default_for(kind: StationKind) -> Self {
        match kind {
            StationKind::Cleaning => Self::new(1, TimeRange::new(15.0, 20.0)),
            StationKind::Primer => Self::new(2, TimeRange::new(25.0, 35.0)),
            StationKind::Painting => Self::new(1, TimeRange::new(30.0, 40.0)),
        }
    }
}

/// Command line arguments structure
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "paint-shop-simulator",
    version = "0.1.0",
    about = "Paint Shop Simulator - Discrete-event simulation of a cleaning, primer and painting conveyor",
    long_about = "Simulates cars flowing through a three-stage paint shop (cleaning, primer, painting) with parallel machines and stochastic service times, then reports throughput, utilization, waits and bottlenecks.

EXAMPLES:
    # Run one shift with default settings
    paint-shop-simulator

    # Use a configuration file
    paint-shop-simulator --config shop.json

    # Try a second painting machine with a fixed seed
    paint-shop-simulator --painting-machines 2 --seed 42

    # Generate configuration template
    paint-shop-simulator --print-config > shop.json

    # Validate configuration without running
    paint-shop-simulator --config shop.json --dry-run

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Shift length in minutes
    #[arg(long, help = "Shift length in minutes (utilization window)")]
    pub shift_duration: Option<f64>,

    /// Time after which no new cars are admitted
    #[arg(long, help = "Stop admitting cars at this minute")]
    pub arrival_cutoff: Option<f64>,

    /// Minimum minutes between arrivals
    #[arg(long, help = "Minimum minutes between arrivals")]
    pub arrival_interval_min: Option<f64>,

    /// Maximum minutes between arrivals
    #[arg(long, help = "Maximum minutes between arrivals")]
    pub arrival_interval_max: Option<f64>,

    /// Number of cleaning machines
    #[arg(long, help = "Number of cleaning machines")]
    pub cleaning_machines: Option<usize>,

    /// Number of primer machines
    #[arg(long, help = "Number of primer machines")]
    pub primer_machines: Option<usize>,

    /// Number of painting machines
    #[arg(long, help = "Number of painting machines")]
    pub painting_machines: Option<usize>,

    /// Queue length above which an alert is raised
    #[arg(
        long,
        help = "Queue length that triggers a bottleneck alert",
        long_help = "An alert is counted every time a station queue is observed above this length. Default: 3"
    )]
    pub bottleneck_threshold: Option<usize>,

    /// Time limit of the event loop
    #[arg(long, help = "Minute at which the scheduler stops advancing")]
    pub horizon: Option<f64>,

    /// Console detail level for simulation events
    #[arg(
        long,
        help = "Console event detail (detailed, summary, minimal)",
        long_help = "Which simulation events are echoed to the console. The log file always receives every event. Default: summary"
    )]
    pub log_detail_level: Option<LogDetailLevel>,

    /// Event log path
    #[arg(long, help = "Path of the simulation event log")]
    pub log_file: Option<String>,

    /// Results file path
    #[arg(long, help = "Path of the results summary file")]
    pub results_file: Option<String>,

    /// Results file format
    #[arg(long, help = "Results file format (text or json)")]
    pub output_format: Option<OutputFormat>,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Suppress console echo of simulation events
    #[arg(short, long, help = "Do not echo simulation events to the console")]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Directory for rolling diagnostics logs
    #[arg(long, help = "Also write JSON diagnostics logs to this directory")]
    pub diagnostics_dir: Option<String>,

    /// Dry run mode - validate configuration without running simulation
    #[arg(long, help = "Validate configuration without running simulation")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Shift length in minutes
    pub shift_duration: Option<f64>,

    /// Time after which no new cars are admitted
    pub arrival_cutoff: Option<f64>,

    /// Range of minutes between arrivals
    pub arrival_interval: Option<TimeRange>,

    /// Cleaning station settings
    pub cleaning: Option<StationConfig>,

    /// Primer station settings
    pub primer: Option<StationConfig>,

    /// Painting station settings
    pub painting: Option<StationConfig>,

    /// Queue length above which an alert is raised
    pub bottleneck_threshold: Option<usize>,

    /// Time limit of the event loop
    pub horizon: Option<f64>,

    /// Console detail level for simulation events
    pub log_detail_level: Option<LogDetailLevel>,

    /// Whether simulation events are echoed to the console at all
    pub verbose_logging: Option<bool>,

    /// Event log path
    pub log_file_path: Option<String>,

    /// Results file path
    pub results_file_path: Option<String>,

    /// Results file format
    pub results_format: Option<OutputFormat>,

    /// Random seed for reproducible results
    pub seed: Option<u64>,
}

/// Configuration for the paint shop simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Shift length in minutes; the utilization window
    pub shift_duration: f64,

    /// No new cars are admitted at or after this time
    pub arrival_cutoff: f64,

    /// Range of minutes between arrivals
    pub arrival_interval: TimeRange,

    /// Cleaning station settings
    pub cleaning: StationConfig,

    /// Primer station settings
    pub primer: StationConfig,

    /// Painting station settings
    pub painting: StationConfig,

    /// Alert when a queue holds more than this many cars
    pub bottleneck_threshold: usize,

    /// Scheduler stops advancing after this time
    pub horizon: f64,

    /// Console detail level for simulation events
    pub log_detail_level: LogDetailLevel,

    /// Whether simulation events are echoed to the console at all
    pub verbose_logging: bool,

    /// Event log path
    pub log_file_path: String,

    /// Results file path
    pub results_file_path: String,

    /// Results file format
    pub results_format: OutputFormat,

    /// Random seed for reproducible results
    pub seed: Option<u64>,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for simulation configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    /// A station has no machines
    #[error("{station} must have at least one machine, got {count}")]
    InvalidMachineCount {
        /// Station with the invalid capacity
        station: StationKind,
        /// The configured machine count
        count: usize,
    },

    /// A sampling range is negative, non-finite or inverted
    #[error("Invalid time range for {field}: min ({min}) must be >= 0 and <= max ({max})")]
    InvalidTimeRange {
        /// Name of the field with the invalid range
        field: String,
        /// Configured lower bound
        min: f64,
        /// Configured upper bound
        max: f64,
    },

    /// Service would take no time at all
    #[error("{station} service time maximum must be greater than 0, got {max}")]
    InvalidServiceTime {
        /// Station with the degenerate range
        station: StationKind,
        /// Configured upper bound
        max: f64,
    },

    /// Arrivals would never advance the clock
    #[error("Arrival interval maximum must be greater than 0, got {0}")]
    InvalidArrivalInterval(f64),

    /// Shift duration is not positive
    #[error("Shift duration must be greater than 0, got {0}")]
    InvalidShiftDuration(f64),

    /// Arrival cutoff is negative or non-finite
    #[error("Arrival cutoff must be a finite value >= 0, got {0}")]
    InvalidArrivalCutoff(f64),

    /// Horizon would cut the arrival window short
    #[error("Horizon ({horizon}) must be finite and not before the arrival cutoff ({cutoff})")]
    InvalidHorizon {
        /// Configured horizon
        horizon: f64,
        /// Configured arrival cutoff
        cutoff: f64,
    },
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            shift_duration: defaults::SHIFT_DURATION,
            arrival_cutoff: defaults::ARRIVAL_CUTOFF,
            arrival_interval: TimeRange::new(8.0, 12.0),
            cleaning: StationConfig::default_for(StationKind::Cleaning),
            primer: StationConfig::default_for(StationKind::Primer),
            painting: StationConfig::default_for(StationKind::Painting),
            bottleneck_threshold: defaults::BOTTLENECK_THRESHOLD,
            horizon: defaults::HORIZON,
            log_detail_level: LogDetailLevel::Summary,
            verbose_logging: true,
            log_file_path: defaults::LOG_FILE_PATH.to_string(),
            results_file_path: defaults::RESULTS_FILE_PATH.to_string(),
            results_format: OutputFormat::Text,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Create a new configuration from command line arguments and optional config file
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::from_cli_args(args)
    }

    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        // CLI takes precedence over the file
        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            shift_duration: config_file.shift_duration.unwrap_or(defaults.shift_duration),
            arrival_cutoff: config_file.arrival_cutoff.unwrap_or(defaults.arrival_cutoff),
            arrival_interval: config_file.arrival_interval.unwrap_or(defaults.arrival_interval),
            cleaning: config_file.cleaning.unwrap_or(defaults.cleaning),
            primer: config_file.primer.unwrap_or(defaults.primer),
            painting: config_file.painting.unwrap_or(defaults.painting),
            bottleneck_threshold: config_file
                .bottleneck_threshold
                .unwrap_or(defaults.bottleneck_threshold),
            horizon: config_file.horizon.unwrap_or(defaults.horizon),
            log_detail_level: config_file.log_detail_level.unwrap_or(defaults.log_detail_level),
            verbose_logging: config_file.verbose_logging.unwrap_or(defaults.verbose_logging),
            log_file_path: config_file.log_file_path.unwrap_or(defaults.log_file_path),
            results_file_path: config_file.results_file_path.unwrap_or(defaults.results_file_path),
            results_format: config_file.results_format.unwrap_or(defaults.results_format),
            seed: config_file.seed.or(defaults.seed),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.shift_duration {
            config.shift_duration = value;
        }
        if let Some(value) = args.arrival_cutoff {
            config.arrival_cutoff = value;
        }
        if let Some(value) = args.arrival_interval_min {
            config.arrival_interval.min = value;
        }
        if let Some(value) = args.arrival_interval_max {
            config.arrival_interval.max = value;
        }
        if let Some(value) = args.cleaning_machines {
            config.cleaning.machines = value;
        }
        if let Some(value) = args.primer_machines {
            config.primer.machines = value;
        }
        if let Some(value) = args.painting_machines {
            config.painting.machines = value;
        }
        if let Some(value) = args.bottleneck_threshold {
            config.bottleneck_threshold = value;
        }
        if let Some(value) = args.horizon {
            config.horizon = value;
        }
        if let Some(value) = args.log_detail_level {
            config.log_detail_level = value;
        }
        if let Some(value) = args.log_file {
            config.log_file_path = value;
        }
        if let Some(value) = args.results_file {
            config.results_file_path = value;
        }
        if let Some(value) = args.output_format {
            config.results_format = value;
        }
        if let Some(value) = args.seed {
            config.seed = Some(value);
        }
        if args.quiet {
            config.verbose_logging = false;
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.shift_duration.is_finite() || self.shift_duration <= 0.0 {
            return Err(ConfigValidationError::InvalidShiftDuration(self.shift_duration));
        }

        if !self.arrival_cutoff.is_finite() || self.arrival_cutoff < 0.0 {
            return Err(ConfigValidationError::InvalidArrivalCutoff(self.arrival_cutoff));
        }

        if !self.horizon.is_finite() || self.horizon < self.arrival_cutoff {
            return Err(ConfigValidationError::InvalidHorizon {
                horizon: self.horizon,
                cutoff: self.arrival_cutoff,
            });
        }

        self.arrival_interval.check("arrival_interval")?;
        if self.arrival_interval.max <= 0.0 {
            return Err(ConfigValidationError::InvalidArrivalInterval(self.arrival_interval.max));
        }

        for kind in StationKind::ALL {
            let station = self.station(kind);
            if station.machines == 0 {
                return Err(ConfigValidationError::InvalidMachineCount {
                    station: kind,
                    count: station.machines,
                });
            }
            station
                .service_time
                .check(&format!("{}.service_time", kind.to_string().to_lowercase()))?;
            if station.service_time.max <= 0.0 {
                return Err(ConfigValidationError::InvalidServiceTime {
                    station: kind,
                    max: station.service_time.max,
                });
            }
        }

        Ok(())
    }

    /// Settings of the given station
    pub fn station(&self, kind: StationKind) -> &StationConfig {
        match kind {
            StationKind::Cleaning => &self.cleaning,
            StationKind::Primer => &self.primer,
            StationKind::Painting => &self.painting,
        }
    }

    /// Mutable settings of the given station
    pub fn station_mut(&mut self, kind: StationKind) -> &mut StationConfig {
        match kind {
            StationKind::Cleaning => &mut self.cleaning,
            StationKind::Primer => &mut self.primer,
            StationKind::Painting => &mut self.painting,
        }
    }

    /// Expected number of arrivals before the cutoff, for sizing buffers and banners
    pub fn expected_arrivals(&self) -> usize {
        let mean = self.arrival_interval.mean();
        if mean <= 0.0 {
            return 0;
        }
        (self.arrival_cutoff / mean).floor() as usize
    }
}

//! Configuration structures for the checkpoint simulator
//!
//! This module contains the simulation configuration structure and validation logic
//! used to select an experiment, size the stations of the network and control the
//! replication and batch-means parameters.

use super::{ExperimentKind, FlowPolicyKind, OutputFormat, TopologyVariant};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default parameters of the checkpoint model
pub mod defaults {
    /// Seed of the random-number streams
    pub const SEED: u64 = 123_456_789;

    /// Mean inter-arrival time of passengers, in seconds
    pub const ARRIVAL_MEAN_TIME: f64 = 6.0;

    /// Probability that a passenger goes to a check-in desk first
    pub const P_DESK: f64 = 0.387181;

    /// Probability that X-ray sends a passenger to trace detection
    pub const P_CHECK: f64 = 0.1;

    /// Probability that trace detection fails a passenger
    pub const P_FAIL: f64 = 0.0001;

    /// Probability that a passenger takes the fast-track lane (improved network)
    pub const P_FAST_TRACK: f64 = 0.25;

    /// Length of one working day (06:00 to 24:00), in seconds
    pub const WORK_DAY: f64 = 64_800.0;

    /// Replications of the finite-horizon experiment
    pub const REPLICATIONS: usize = 64;

    /// Sampling interval of the finite-horizon experiment, in seconds
    pub const SAMPLING_INTERVAL: f64 = 300.0;

    /// Horizon of the transient experiment, in seconds
    pub const TRANSIENT_HORIZON: f64 = 28_800.0;

    /// Replications of the transient experiment
    pub const TRANSIENT_REPLICATIONS: usize = 16;

    /// Sampling interval of the transient experiment, in seconds
    pub const TRANSIENT_SAMPLING_INTERVAL: f64 = 60.0;

    /// Observations per batch
    pub const BATCH_SIZE: usize = 1024;

    /// Batches per tracked center
    pub const BATCH_COUNT: usize = 64;

    /// Time-based warmup cutoff, in seconds
    pub const WARMUP_TIME: f64 = 20_000.0;
}

/// Sizing and service-time parameters of one station
///
/// Service times follow a normal distribution truncated to `[lower, upper]`,
/// or an exponential with the same mean when exponential services are requested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationConfig {
    /// Number of servers (or sub-queues for multi-queue stations)
    pub servers: usize,
    /// Mean service time in seconds
    pub mean: f64,
    /// Standard deviation of the service time in seconds
    pub std_dev: f64,
    /// Lower truncation bound in seconds
    pub lower: f64,
    /// Upper truncation bound in seconds
    pub upper: f64,
}

impl StationConfig {
    /// Create a station description
    pub fn new(servers: usize, mean: f64, std_dev: f64, lower: f64, upper: f64) -> Self {
        Self { servers, mean, std_dev, lower, upper }
    }
}

/// Station parameters for every center of the checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationsConfig {
    /// Baggage drop desks (multi-server, single queue)
    pub check_in: StationConfig,
    /// Boarding-pass e-gates (multi-server, single queue)
    pub e_gates: StationConfig,
    /// X-ray lanes (one queue per lane)
    pub x_ray: StationConfig,
    /// Explosive trace detection (single server when `servers == 1`)
    pub trace_detection: StationConfig,
    /// Fast-track lanes, used only by the improved network
    pub fast_track: StationConfig,
    /// Item recovery area (infinite server, `servers` is ignored)
    pub recovery: StationConfig,
}

impl Default for StationsConfig {
    fn default() -> Self {
        Self {
            check_in: StationConfig::new(14, 150.0, 50.0, 50.0, 300.0),
            e_gates: StationConfig::new(4, 15.0, 4.0, 4.0, 30.0),
            x_ray: StationConfig::new(8, 30.0, 10.0, 10.0, 80.0),
            trace_detection: StationConfig::new(1, 45.0, 15.0, 15.0, 105.0),
            fast_track: StationConfig::new(2, 20.0, 6.0, 8.0, 45.0),
            recovery: StationConfig::new(0, 180.0, 60.0, 60.0, 420.0),
        }
    }
}

/// Branching probabilities of the routing points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutingProbabilities {
    /// Entry: check-in desk versus straight to the e-gates
    pub p_desk: f64,
    /// X-ray: trace detection versus recovery
    pub p_check: f64,
    /// Trace detection: failure (exit) versus recovery
    pub p_fail: f64,
    /// E-gates: fast-track versus standard X-ray (improved network only)
    pub p_fast_track: f64,
}

impl Default for RoutingProbabilities {
    fn default() -> Self {
        Self {
            p_desk: defaults::P_DESK,
            p_check: defaults::P_CHECK,
            p_fail: defaults::P_FAIL,
            p_fast_track: defaults::P_FAST_TRACK,
        }
    }
}

/// Warmup discard for steady-state runs; exactly one field must be set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarmupConfig {
    /// Observations discarded per center
    pub jobs: Option<u64>,
    /// Simulated time before which observations are discarded
    pub time: Option<f64>,
}

impl Default for WarmupConfig {
    fn default() -> Self {
        Self { jobs: None, time: Some(defaults::WARMUP_TIME) }
    }
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "checkpoint-sim",
    version = "0.1.0",
    about = "Airport Checkpoint Simulator - Queueing network simulation of a security checkpoint",
    long_about = "Simulates passenger flow through an airport security checkpoint (check-in desks, e-gates, X-ray lanes, trace detection and item recovery) and estimates response times, queue lengths and utilizations with finite-horizon replications or steady-state batch means.

EXAMPLES:
    # Run the default finite-horizon experiment
    checkpoint-sim

    # Steady-state batch means on the improved network
    checkpoint-sim --experiment steady-state --topology improved

    # Check the simulator against M/M/k formulas
    checkpoint-sim --experiment verification --batch-size 512 --batch-count 32

    # Generate configuration template
    checkpoint-sim --print-config > my-config.json

    # Validate configuration without running
    checkpoint-sim --config my-config.json --dry-run

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)

    Use --print-config to generate a template configuration file."
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

    /// Experiment to run
    #[arg(
        short,
        long,
        help = "Experiment (finite-horizon, steady-state, verification, transient)",
        long_help = "Experiment to run. finite-horizon replicates one working day, steady-state runs batch means, verification compares exponential-service runs with queueing formulas, transient samples short replications densely. Default: finite-horizon"
    )]
    pub experiment: Option<ExperimentKind>,

    /// Network layout
    #[arg(long, help = "Network layout (baseline or improved)")]
    pub topology: Option<TopologyVariant>,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Mean inter-arrival time in seconds
    #[arg(
        long,
        help = "Mean passenger inter-arrival time in seconds",
        long_help = "Mean of the exponential inter-arrival time of passengers, in seconds. Must be greater than 0. Default: 6.0"
    )]
    pub arrival_mean_time: Option<f64>,

    /// Use exponential service times everywhere
    #[arg(long, help = "Replace every service distribution with an exponential of the same mean")]
    pub exponential_services: bool,

    /// Sub-queue policy of the X-ray lanes
    #[arg(long, help = "X-ray lane policy (round-robin or shortest-queue)")]
    pub x_ray_policy: Option<FlowPolicyKind>,

    /// Number of replications
    #[arg(long, help = "Number of finite-horizon replications")]
    pub replications: Option<usize>,

    /// Finite-horizon length in seconds
    #[arg(long, help = "Finite-horizon length in seconds")]
    pub horizon: Option<f64>,

    /// Sampling interval in seconds
    #[arg(long, help = "Sampling interval in seconds")]
    pub sampling_interval: Option<f64>,

    /// Batch size
    #[arg(
        long,
        help = "Observations per batch",
        long_help = "Number of qualifying observations per batch in steady-state runs. Must be greater than 0. Default: 1024"
    )]
    pub batch_size: Option<usize>,

    /// Batch count
    #[arg(long, help = "Batches per center (at least 2)")]
    pub batch_count: Option<usize>,

    /// Job-based warmup
    #[arg(long, help = "Observations discarded per center before batching", conflicts_with = "warmup_time")]
    pub warmup_jobs: Option<u64>,

    /// Time-based warmup
    #[arg(long, help = "Simulated seconds discarded before batching")]
    pub warmup_time: Option<f64>,

    /// Output directory
    #[arg(long, help = "Directory for report files")]
    pub output_dir: Option<String>,

    /// Output format for report files
    #[arg(
        long,
        help = "Output format (json or csv)",
        long_help = "Output format for report files. Supported formats: json, csv. Default: csv"
    )]
    pub output_format: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Log every dispatched event
    #[arg(long, help = "Log every arrival, departure and exit at TRACE level")]
    pub trace_events: bool,

    /// Directory for JSON log files
    #[arg(
        long,
        help = "Write JSON logs to a daily file in this directory",
        long_help = "Switch to JSON console logging and also write JSON lines to a daily rolling file in this directory. Intended for long unattended runs."
    )]
    pub log_dir: Option<String>,

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
    /// Experiment to run
    pub experiment: Option<ExperimentKind>,

    /// Network layout
    pub topology: Option<TopologyVariant>,

    /// Random seed for reproducible results
    pub seed: Option<u64>,

    /// Mean inter-arrival time in seconds
    pub arrival_mean_time: Option<f64>,

    /// Use exponential service times everywhere
    pub exponential_services: Option<bool>,

    /// Station parameters
    pub stations: Option<StationsConfig>,

    /// Sub-queue policy of the X-ray lanes
    pub x_ray_policy: Option<FlowPolicyKind>,

    /// Routing probabilities
    pub routing: Option<RoutingProbabilities>,

    /// Finite-horizon length in seconds
    pub horizon: Option<f64>,

    /// Number of finite-horizon replications
    pub replications: Option<usize>,

    /// Finite-horizon sampling interval in seconds
    pub sampling_interval: Option<f64>,

    /// Transient horizon in seconds
    pub transient_horizon: Option<f64>,

    /// Transient replications
    pub transient_replications: Option<usize>,

    /// Transient sampling interval in seconds
    pub transient_sampling_interval: Option<f64>,

    /// Observations per batch
    pub batch_size: Option<usize>,

    /// Batches per center
    pub batch_count: Option<usize>,

    /// Warmup discard
    pub warmup: Option<WarmupConfig>,

    /// Directory for report files
    pub output_dir: Option<String>,

    /// Output format for report files
    pub output_format: Option<String>,
}

/// Configuration for the checkpoint simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Experiment to run
    pub experiment: ExperimentKind,

    /// Network layout
    pub topology: TopologyVariant,

    /// Random seed for reproducible results
    pub seed: u64,

    /// Mean inter-arrival time in seconds
    pub arrival_mean_time: f64,

    /// Use exponential service times everywhere
    pub exponential_services: bool,

    /// Station parameters
    pub stations: StationsConfig,

    /// Sub-queue policy of the X-ray lanes
    pub x_ray_policy: FlowPolicyKind,

    /// Routing probabilities
    pub routing: RoutingProbabilities,

    /// Finite-horizon length in seconds
    pub horizon: f64,

    /// Number of finite-horizon replications
    pub replications: usize,

    /// Finite-horizon sampling interval in seconds
    pub sampling_interval: f64,

    /// Transient horizon in seconds
    pub transient_horizon: f64,

    /// Transient replications
    pub transient_replications: usize,

    /// Transient sampling interval in seconds
    pub transient_sampling_interval: f64,

    /// Observations per batch
    pub batch_size: usize,

    /// Batches per center
    pub batch_count: usize,

    /// Warmup discard
    pub warmup: WarmupConfig,

    /// Directory for report files
    pub output_dir: String,

    /// Output format for report files
    pub output_format: String,
}

/// Configuration loading and validation errors
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
    /// A station has no servers
    #[error("Station {0} must have at least one server")]
    InvalidServerCount(String),

    /// A service distribution is malformed
    #[error("Invalid service distribution for {station}: {reason}")]
    InvalidServiceDistribution {
        /// Name of the station
        station: String,
        /// What is wrong with it
        reason: String,
    },

    /// Probability value is out of range
    #[error("Invalid probability for {field}: {value} (must be between 0.0 and 1.0)")]
    InvalidProbability {
        /// Name of the field with invalid probability
        field: String,
        /// The invalid probability value
        value: f64,
    },

    /// A duration or mean must be strictly positive
    #[error("{field} must be greater than 0, got {value}")]
    NonPositive {
        /// Name of the field
        field: String,
        /// The offending value
        value: f64,
    },

    /// Batch size is invalid
    #[error("Batch size must be greater than 0, got {0}")]
    InvalidBatchSize(usize),

    /// Batch count is invalid
    #[error("Batch count must be at least 2, got {0}")]
    InvalidBatchCount(usize),

    /// Replication count is invalid
    #[error("Replications must be at least 2, got {0}")]
    InvalidReplications(usize),

    /// Warmup must use exactly one mode
    #[error("Exactly one warmup mode (jobs or time) must be configured")]
    InvalidWarmup,

    /// Output format is unknown
    #[error("Unknown output format: {0}")]
    InvalidOutputFormat(String),
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            experiment: ExperimentKind::FiniteHorizon,
            topology: TopologyVariant::Baseline,
            seed: defaults::SEED,
            arrival_mean_time: defaults::ARRIVAL_MEAN_TIME,
            exponential_services: false,
            stations: StationsConfig::default(),
            x_ray_policy: FlowPolicyKind::RoundRobin,
            routing: RoutingProbabilities::default(),
            horizon: defaults::WORK_DAY,
            replications: defaults::REPLICATIONS,
            sampling_interval: defaults::SAMPLING_INTERVAL,
            transient_horizon: defaults::TRANSIENT_HORIZON,
            transient_replications: defaults::TRANSIENT_REPLICATIONS,
            transient_sampling_interval: defaults::TRANSIENT_SAMPLING_INTERVAL,
            batch_size: defaults::BATCH_SIZE,
            batch_count: defaults::BATCH_COUNT,
            warmup: WarmupConfig::default(),
            output_dir: "output".to_string(),
            output_format: "csv".to_string(),
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
            experiment: config_file.experiment.unwrap_or(defaults.experiment),
            topology: config_file.topology.unwrap_or(defaults.topology),
            seed: config_file.seed.unwrap_or(defaults.seed),
            arrival_mean_time: config_file
                .arrival_mean_time
                .unwrap_or(defaults.arrival_mean_time),
            exponential_services: config_file
                .exponential_services
                .unwrap_or(defaults.exponential_services),
            stations: config_file.stations.unwrap_or(defaults.stations),
            x_ray_policy: config_file.x_ray_policy.unwrap_or(defaults.x_ray_policy),
            routing: config_file.routing.unwrap_or(defaults.routing),
            horizon: config_file.horizon.unwrap_or(defaults.horizon),
            replications: config_file.replications.unwrap_or(defaults.replications),
            sampling_interval: config_file
                .sampling_interval
                .unwrap_or(defaults.sampling_interval),
            transient_horizon: config_file
                .transient_horizon
                .unwrap_or(defaults.transient_horizon),
            transient_replications: config_file
                .transient_replications
                .unwrap_or(defaults.transient_replications),
            transient_sampling_interval: config_file
                .transient_sampling_interval
                .unwrap_or(defaults.transient_sampling_interval),
            batch_size: config_file.batch_size.unwrap_or(defaults.batch_size),
            batch_count: config_file.batch_count.unwrap_or(defaults.batch_count),
            warmup: config_file.warmup.unwrap_or(defaults.warmup),
            output_dir: config_file.output_dir.unwrap_or(defaults.output_dir),
            output_format: config_file.output_format.unwrap_or(defaults.output_format),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.experiment {
            config.experiment = value;
        }
        if let Some(value) = args.topology {
            config.topology = value;
        }
        if let Some(value) = args.seed {
            config.seed = value;
        }
        if let Some(value) = args.arrival_mean_time {
            config.arrival_mean_time = value;
        }
        if args.exponential_services {
            config.exponential_services = true;
        }
        if let Some(value) = args.x_ray_policy {
            config.x_ray_policy = value;
        }
        if let Some(value) = args.replications {
            config.replications = value;
        }
        if let Some(value) = args.horizon {
            config.horizon = value;
        }
        if let Some(value) = args.sampling_interval {
            config.sampling_interval = value;
        }
        if let Some(value) = args.batch_size {
            config.batch_size = value;
        }
        if let Some(value) = args.batch_count {
            config.batch_count = value;
        }

        // A warmup flag replaces the whole warmup mode, never combines with it
        if let Some(value) = args.warmup_jobs {
            config.warmup = WarmupConfig { jobs: Some(value), time: None };
        }
        if let Some(value) = args.warmup_time {
            config.warmup = WarmupConfig { jobs: None, time: Some(value) };
        }

        if let Some(value) = args.output_dir {
            config.output_dir = value;
        }
        if let Some(value) = args.output_format {
            config.output_format = value;
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
        self.validate_positive("arrival_mean_time", self.arrival_mean_time)?;

        let stations = &self.stations;
        self.validate_station("check_in", &stations.check_in, true)?;
        self.validate_station("e_gates", &stations.e_gates, true)?;
        self.validate_station("x_ray", &stations.x_ray, true)?;
        self.validate_station("trace_detection", &stations.trace_detection, true)?;
        self.validate_station(
            "fast_track",
            &stations.fast_track,
            self.topology == TopologyVariant::Improved,
        )?;
        self.validate_station("recovery", &stations.recovery, false)?;

        self.validate_probability("p_desk", self.routing.p_desk)?;
        self.validate_probability("p_check", self.routing.p_check)?;
        self.validate_probability("p_fail", self.routing.p_fail)?;
        self.validate_probability("p_fast_track", self.routing.p_fast_track)?;

        self.validate_positive("horizon", self.horizon)?;
        self.validate_positive("sampling_interval", self.sampling_interval)?;
        self.validate_positive("transient_horizon", self.transient_horizon)?;
        self.validate_positive("transient_sampling_interval", self.transient_sampling_interval)?;

        if self.replications < 2 {
            return Err(ConfigValidationError::InvalidReplications(self.replications));
        }
        if self.transient_replications < 2 {
            return Err(ConfigValidationError::InvalidReplications(self.transient_replications));
        }
        if self.batch_size == 0 {
            return Err(ConfigValidationError::InvalidBatchSize(self.batch_size));
        }
        if self.batch_count < 2 {
            return Err(ConfigValidationError::InvalidBatchCount(self.batch_count));
        }

        match (self.warmup.jobs, self.warmup.time) {
            (Some(_), None) => {}
            (None, Some(time)) => self.validate_positive("warmup.time", time)?,
            _ => return Err(ConfigValidationError::InvalidWarmup),
        }

        self.get_output_format().map_err(|_| {
            ConfigValidationError::InvalidOutputFormat(self.output_format.clone())
        })?;

        Ok(())
    }

    /// Helper method to validate one station's parameters
    fn validate_station(
        &self,
        name: &str,
        station: &StationConfig,
        needs_servers: bool,
    ) -> Result<(), ConfigValidationError> {
        if needs_servers && station.servers == 0 {
            return Err(ConfigValidationError::InvalidServerCount(name.to_string()));
        }

        let invalid = |reason: String| ConfigValidationError::InvalidServiceDistribution {
            station: name.to_string(),
            reason,
        };

        if !(station.mean > 0.0) {
            return Err(invalid(format!("mean must be positive, got {}", station.mean)));
        }
        if !(station.std_dev > 0.0) {
            return Err(invalid(format!("std_dev must be positive, got {}", station.std_dev)));
        }
        if !(station.lower < station.upper) {
            return Err(invalid(format!(
                "lower bound ({}) must be below upper bound ({})",
                station.lower, station.upper
            )));
        }
        if station.mean < station.lower || station.mean > station.upper {
            return Err(invalid(format!(
                "mean {} lies outside [{}, {}]",
                station.mean, station.lower, station.upper
            )));
        }
        Ok(())
    }

    /// Helper method to validate probability values
    fn validate_probability(&self, field: &str, value: f64) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigValidationError::InvalidProbability {
                field: field.to_string(),
                value,
            });
        }
        Ok(())
    }

    /// Helper method to validate strictly positive values
    fn validate_positive(&self, field: &str, value: f64) -> Result<(), ConfigValidationError> {
        if !(value > 0.0) || !value.is_finite() {
            return Err(ConfigValidationError::NonPositive { field: field.to_string(), value });
        }
        Ok(())
    }

    /// Get the output format as an enum value
    pub fn get_output_format(&self) -> Result<OutputFormat, String> {
        self.output_format.parse()
    }

    /// Arrival rate of passengers in jobs per second
    pub fn arrival_rate(&self) -> f64 {
        1.0 / self.arrival_mean_time
    }
}

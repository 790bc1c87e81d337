//! Tests for configuration loading, precedence and validation
//!
//! These tests cover the defaults → file → CLI layering, the JSON file format
//! and the rules `validate` enforces before a run starts.

use airport_checkpoint_sim::network::{CenterKind, Topology};
use airport_checkpoint_sim::types::config::{CliArgs, ConfigError, ConfigValidationError};
use airport_checkpoint_sim::types::*;
use clap::Parser;
use std::fs;
use tempfile::TempDir;

fn parse(args: &[&str]) -> CliArgs {
    let mut full = vec!["checkpoint-sim"];
    full.extend_from_slice(args);
    CliArgs::try_parse_from(full).unwrap()
}

/// Defaults are valid as shipped
#[test]
fn test_default_config_is_valid() {
    let config = SimulationConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.get_output_format().unwrap(), OutputFormat::Csv);
    assert!((config.arrival_rate() - 1.0 / 6.0).abs() < 1e-12);
}

/// CLI flags override the defaults
#[test]
fn test_cli_overrides() {
    let args = parse(&[
        "--experiment",
        "steady-state",
        "--topology",
        "improved",
        "--seed",
        "99",
        "--batch-size",
        "256",
        "--batch-count",
        "16",
        "--warmup-jobs",
        "500",
        "--exponential-services",
        "--output-format",
        "json",
    ]);
    let config = SimulationConfig::from_cli_args(args).unwrap();

    assert_eq!(config.experiment, ExperimentKind::SteadyState);
    assert_eq!(config.topology, TopologyVariant::Improved);
    assert_eq!(config.seed, 99);
    assert_eq!(config.batch_size, 256);
    assert_eq!(config.batch_count, 16);
    assert_eq!(config.warmup, WarmupConfig { jobs: Some(500), time: None });
    assert!(config.exponential_services);
    assert_eq!(config.get_output_format().unwrap(), OutputFormat::Json);
    assert!(config.validate().is_ok());
}

/// Both warmup flags at once are refused by the parser
#[test]
fn test_conflicting_warmup_flags() {
    let result = CliArgs::try_parse_from(["checkpoint-sim", "--warmup-jobs", "10", "--warmup-time", "100"]);
    assert!(result.is_err());
}

/// Logging flags stay on the command line and never reach the configuration
#[test]
fn test_logging_flags() {
    let args = parse(&["--trace-events", "--log-dir", "logs/checkpoint", "--verbose"]);
    assert!(args.trace_events && args.verbose);
    assert_eq!(args.log_dir.as_deref(), Some("logs/checkpoint"));

    let printed = SimulationConfig::from_cli_args(args).unwrap().print_json().unwrap();
    assert!(!printed.contains("log_dir"));
}

/// The file fills in what it names; the CLI still wins
#[test]
fn test_file_then_cli_precedence() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("checkpoint.json");
    fs::write(
        &path,
        r#"{
            "experiment": "verification",
            "seed": 7,
            "replications": 10,
            "routing": { "p_desk": 0.5, "p_check": 0.2, "p_fail": 0.01, "p_fast_track": 0.3 }
        }"#,
    )
    .unwrap();

    let args = parse(&["--config", path.to_str().unwrap(), "--seed", "8"]);
    let config = SimulationConfig::from_cli_args(args).unwrap();

    assert_eq!(config.experiment, ExperimentKind::Verification);
    assert_eq!(config.seed, 8);
    assert_eq!(config.replications, 10);
    assert_eq!(config.routing.p_check, 0.2);
    // Untouched fields keep their defaults
    assert_eq!(config.batch_size, SimulationConfig::default().batch_size);
    assert!(config.validate().is_ok());
}

/// Saved configurations load back unchanged
#[test]
fn test_save_and_reload() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("saved.json");
    let config = SimulationConfig { seed: 4242, topology: TopologyVariant::Improved, ..Default::default() };

    config.save_to_file(&path).unwrap();
    let loaded = SimulationConfig::from_file(&path).unwrap();
    assert_eq!(loaded.seed, 4242);
    assert_eq!(loaded.topology, TopologyVariant::Improved);
    assert_eq!(loaded.stations, config.stations);

    let printed = config.print_json().unwrap();
    assert!(printed.contains("\"topology\": \"improved\""));
}

/// Missing files and unsupported extensions are reported distinctly
#[test]
fn test_file_errors() {
    let temp = TempDir::new().unwrap();
    let missing = SimulationConfig::from_file(temp.path().join("absent.json"));
    assert!(matches!(missing, Err(ConfigError::FileNotFound(_))));

    let yaml = temp.path().join("config.yaml");
    fs::write(&yaml, "seed: 1").unwrap();
    assert!(matches!(SimulationConfig::from_file(&yaml), Err(ConfigError::UnsupportedFormat(_))));

    let broken = temp.path().join("broken.json");
    fs::write(&broken, "{ not json").unwrap();
    assert!(matches!(SimulationConfig::from_file(&broken), Err(ConfigError::JsonError(_))));
}

/// Each validation rule rejects its own kind of mistake
#[test]
fn test_validation_rules() {
    let mut config = SimulationConfig::default();
    config.stations.e_gates.servers = 0;
    assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidServerCount(_))));

    let mut config = SimulationConfig::default();
    config.stations.x_ray.lower = 90.0;
    assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidServiceDistribution { .. })));

    let mut config = SimulationConfig::default();
    config.routing.p_fail = 1.5;
    assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidProbability { .. })));

    let config = SimulationConfig { batch_size: 0, ..Default::default() };
    assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidBatchSize(0))));

    let config = SimulationConfig { batch_count: 1, ..Default::default() };
    assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidBatchCount(1))));

    let config = SimulationConfig { replications: 1, ..Default::default() };
    assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidReplications(1))));

    let config = SimulationConfig { horizon: 0.0, ..Default::default() };
    assert!(matches!(config.validate(), Err(ConfigValidationError::NonPositive { .. })));

    let config = SimulationConfig { warmup: WarmupConfig { jobs: Some(10), time: Some(5.0) }, ..Default::default() };
    assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidWarmup)));

    let config = SimulationConfig { output_format: "xml".to_string(), ..Default::default() };
    assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidOutputFormat(_))));
}

/// The fast-track station only matters for the improved network
#[test]
fn test_fast_track_checked_only_when_used() {
    let mut config = SimulationConfig::default();
    config.stations.fast_track.servers = 0;
    assert!(config.validate().is_ok());

    config.topology = TopologyVariant::Improved;
    assert!(config.validate().is_err());
}

/// Trace detection switches discipline with its server count
#[test]
fn test_trace_detection_kind_follows_servers() {
    for topology in [TopologyVariant::Baseline, TopologyVariant::Improved] {
        let mut config = SimulationConfig { topology, ..Default::default() };
        let built = Topology::from_config(&config).unwrap();
        assert_eq!(built.centers()[3].name, "TraceDetection");
        assert_eq!(built.centers()[3].kind, CenterKind::SingleServerSingleQueue);

        config.stations.trace_detection.servers = 3;
        let built = Topology::from_config(&config).unwrap();
        assert_eq!(built.centers()[3].kind, CenterKind::MultiServerSingleQueue);
    }
}

/// Exponential services keep the configured means
#[test]
fn test_exponential_services_keep_means() {
    let config = SimulationConfig { exponential_services: true, ..Default::default() };
    let built = Topology::from_config(&config).unwrap();
    let x_ray = &built.centers()[2];
    assert_eq!(x_ray.service.mean(), config.stations.x_ray.mean);
    assert_eq!(x_ray.visit_ratio, 1.0);
}

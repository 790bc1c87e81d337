//! Logging and tracing configuration
//!
//! This module provides centralized logging configuration for the simulator.
//! Event-level tracing (one record per dispatched event) is emitted at TRACE,
//! so long steady-state runs stay quiet unless explicitly asked.

use std::io;
use tracing::{info, Level};
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for the application
    pub level: Level,
    /// Whether to enable JSON formatting on the console
    pub json_format: bool,
    /// Whether to also write JSON lines to a daily rolling file
    pub log_to_file: bool,
    /// Log file directory (if logging to file)
    pub log_directory: Option<String>,
    /// Log file prefix (if logging to file)
    pub log_file_prefix: String,
    /// Whether to report span closings (with busy/idle timings)
    pub enable_span_events: bool,
    /// Whether to enable ansi colors in console output
    pub enable_ansi: bool,
    /// Custom environment filter
    pub env_filter: Option<String>,
    /// Whether the center handlers and the event loop log every event
    pub trace_events: bool,
}

/// Modules whose TRACE output is one record per dispatched event
const EVENT_TRACE_TARGETS: [&str; 2] = ["airport_checkpoint_sim::center", "airport_checkpoint_sim::simulation::model"];

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_format: false,
            log_to_file: false,
            log_directory: None,
            log_file_prefix: "checkpoint-sim".to_string(),
            enable_span_events: false,
            enable_ansi: true,
            env_filter: None,
            trace_events: false,
        }
    }
}

/// Keeps the non-blocking file writer alive; buffered lines are flushed on drop
#[derive(Debug)]
pub struct LoggingGuard {
    _guards: Vec<WorkerGuard>,
}

impl LoggingConfig {
    /// Create a new logging configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Enable JSON formatting
    pub fn with_json_format(mut self) -> Self {
        self.json_format = true;
        self
    }

    /// Enable file logging
    pub fn with_file_logging(mut self, directory: impl Into<String>) -> Self {
        self.log_to_file = true;
        self.log_directory = Some(directory.into());
        self
    }

    /// Set log file prefix
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.log_file_prefix = prefix.into();
        self
    }

    /// Enable span events
    pub fn with_span_events(mut self) -> Self {
        self.enable_span_events = true;
        self
    }

    /// Disable ANSI colors
    pub fn without_ansi(mut self) -> Self {
        self.enable_ansi = false;
        self
    }

    /// Set custom environment filter
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Log arrivals, departures and exits one by one
    ///
    /// Only the event loop and the center handlers are raised to TRACE; the
    /// rest of the crate stays at the configured level.
    pub fn with_event_tracing(mut self) -> Self {
        self.trace_events = true;
        self
    }

    /// Build the filter: explicit filter, then `RUST_LOG`, then the crate at `level`
    fn build_filter(&self) -> Result<EnvFilter, Box<dyn std::error::Error + Send + Sync>> {
        let mut filter = match &self.env_filter {
            Some(directives) => EnvFilter::try_new(directives)?,
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME").replace('-', "_"), self.level))
            }),
        };
        if self.trace_events {
            for target in EVENT_TRACE_TARGETS {
                filter = filter.add_directive(format!("{}=trace", target).parse()?);
            }
        }
        Ok(filter)
    }

    /// Initialize the global tracing subscriber
    ///
    /// The returned guard must be held for as long as file logging is needed.
    pub fn init(self) -> Result<LoggingGuard, Box<dyn std::error::Error + Send + Sync>> {
        let env_filter = self.build_filter()?;
        let span_events = if self.enable_span_events { FmtSpan::CLOSE } else { FmtSpan::NONE };

        let mut layers: Vec<BoxedLayer> = Vec::new();
        let mut guards = Vec::new();

        if self.json_format {
            layers.push(
                fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_span_events(span_events.clone())
                    .boxed(),
            );
        } else {
            layers.push(
                fmt::layer()
                    .compact()
                    .with_writer(io::stderr)
                    .with_ansi(self.enable_ansi)
                    .with_span_events(span_events.clone())
                    .boxed(),
            );
        }

        if self.log_to_file {
            let log_dir = self.log_directory.as_deref().unwrap_or("logs");
            let (file_writer, guard) =
                non_blocking(rolling::daily(log_dir, &self.log_file_prefix));
            guards.push(guard);
            layers.push(
                fmt::layer()
                    .json()
                    .with_writer(file_writer)
                    .with_ansi(false)
                    .with_span_events(span_events)
                    .boxed(),
            );
        }

        Registry::default().with(layers).with(env_filter).try_init()?;

        info!(
            level = %self.level,
            json = self.json_format,
            file = self.log_to_file,
            trace_events = self.trace_events,
            "Logging initialized"
        );
        Ok(LoggingGuard { _guards: guards })
    }

    /// Preset for long unattended runs: JSON on the console and a daily file in `log_dir`
    pub fn batch(log_dir: impl Into<String>) -> Self {
        Self::new().with_json_format().with_file_logging(log_dir).without_ansi()
    }

    /// Preset for tests: warnings only, no colors
    pub fn test() -> Self {
        Self::new().with_level(Level::WARN).without_ansi()
    }

    /// Preset for `--verbose`: INFO with replication and runner spans
    pub fn verbose() -> Self {
        Self::new().with_level(Level::INFO).with_span_events()
    }

    /// Preset for `--debug`: DEBUG with spans, so batch closes and warmup ends show
    pub fn debug() -> Self {
        Self::new().with_level(Level::DEBUG).with_span_events()
    }

    /// Initialize the [`batch`](Self::batch) preset
    pub fn init_batch(log_dir: impl Into<String>) -> Result<LoggingGuard, Box<dyn std::error::Error + Send + Sync>> {
        Self::batch(log_dir).init()
    }

    /// Initialize the [`test`](Self::test) preset
    pub fn init_test() -> Result<LoggingGuard, Box<dyn std::error::Error + Send + Sync>> {
        Self::test().init()
    }

    /// Initialize the [`verbose`](Self::verbose) preset
    pub fn init_verbose() -> Result<LoggingGuard, Box<dyn std::error::Error + Send + Sync>> {
        Self::verbose().init()
    }

    /// Initialize the [`debug`](Self::debug) preset
    pub fn init_debug() -> Result<LoggingGuard, Box<dyn std::error::Error + Send + Sync>> {
        Self::debug().init()
    }
}

/// Macro for creating structured log events with simulation context
#[macro_export]
macro_rules! sim_event {
    ($level:ident, $message:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::$level!(
            message = $message,
            component = "simulation",
            $($key = $value,)*
        );
    };
    ($level:ident, $message:expr) => {
        tracing::$level!(
            message = $message,
            component = "simulation",
        );
    };
}

/// Macro for creating performance measurement spans
#[macro_export]
macro_rules! perf_span {
    ($name:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::info_span!(
            $name,
            component = "performance",
            $($key = $value,)*
        )
    };
    ($name:expr) => {
        tracing::info_span!(
            $name,
            component = "performance",
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_logging_config_creation() {
        let config = LoggingConfig::new();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.json_format);
        assert!(!config.log_to_file);
        assert!(config.log_directory.is_none());
        assert_eq!(config.log_file_prefix, "checkpoint-sim");
        assert!(!config.enable_span_events);
        assert!(config.enable_ansi);
        assert!(config.env_filter.is_none());
        assert!(!config.trace_events);
    }

    #[test]
    fn test_logging_config_builder_pattern() {
        let config = LoggingConfig::new()
            .with_level(Level::DEBUG)
            .with_json_format()
            .with_file_logging("test_logs")
            .with_file_prefix("test_prefix")
            .with_span_events()
            .without_ansi()
            .with_env_filter("debug");

        assert_eq!(config.level, Level::DEBUG);
        assert!(config.json_format);
        assert!(config.log_to_file);
        assert_eq!(config.log_directory, Some("test_logs".to_string()));
        assert_eq!(config.log_file_prefix, "test_prefix");
        assert!(config.enable_span_events);
        assert!(!config.enable_ansi);
        assert_eq!(config.env_filter, Some("debug".to_string()));
    }

    #[test]
    fn test_presets() {
        let batch = LoggingConfig::batch("run-logs");
        assert!(batch.json_format && batch.log_to_file && !batch.enable_ansi);
        assert_eq!(batch.log_directory.as_deref(), Some("run-logs"));

        assert_eq!(LoggingConfig::test().level, Level::WARN);
        assert_eq!(LoggingConfig::debug().level, Level::DEBUG);
        assert!(LoggingConfig::verbose().enable_span_events);
    }

    #[test]
    fn test_event_tracing_adds_kernel_directives() {
        let config = LoggingConfig::new().with_env_filter("warn").with_event_tracing();
        let filter = config.build_filter().unwrap().to_string().to_lowercase();
        assert!(filter.contains("airport_checkpoint_sim::center=trace"));
        assert!(filter.contains("airport_checkpoint_sim::simulation::model=trace"));
    }

    #[test]
    fn test_invalid_env_filter_is_reported() {
        let config = LoggingConfig::new().with_env_filter("airport_checkpoint_sim=loudest");
        assert!(config.build_filter().is_err());
    }

    #[test]
    fn test_sim_event_macro_expands() {
        // No subscriber is installed, the macros only have to expand and run
        crate::sim_event!(debug, "batch closed", center = 3usize, batch = 7usize);
        let span = crate::perf_span!("replication", index = 1usize);
        let _entered = span.enter();
    }
}

//! Logging and tracing configuration
//!
//! This module provides centralized diagnostics configuration for the simulator.
//! Shop events reach the console through the same subscriber, under the
//! `paint_shop_simulator::events` target.

use std::io;
use tracing::{debug, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Boxed error returned by subscriber setup
pub type LoggingError = Box<dyn std::error::Error + Send + Sync>;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for the application
    pub level: Level,
    /// Whether to enable JSON formatting on the console
    pub json_format: bool,
    /// Directory for a rolling diagnostics file, if any
    pub diagnostics_directory: Option<String>,
    /// Diagnostics file prefix
    pub log_file_prefix: String,
    /// Whether to enable span events
    pub enable_span_events: bool,
    /// Whether to enable ansi colors in console output
    pub enable_ansi: bool,
    /// Custom environment filter
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_format: false,
            diagnostics_directory: None,
            log_file_prefix: "paint-shop-simulator".to_string(),
            enable_span_events: false,
            enable_ansi: true,
            env_filter: None,
        }
    }
}

/// Keeps background log writers alive; drop it only when the program exits
#[derive(Debug, Default)]
#[must_use = "dropping the guard stops buffered log output"]
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

    /// Also write diagnostics to a daily rolling file in `directory`
    pub fn with_diagnostics_file(mut self, directory: impl Into<String>) -> Self {
        self.diagnostics_directory = Some(directory.into());
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

    /// Filter directive used when neither `with_env_filter` nor `RUST_LOG` is set
    pub fn default_directive(&self) -> String {
        format!("{}={}", env!("CARGO_PKG_NAME").replace('-', "_"), self.level)
    }

    fn span_events(&self) -> FmtSpan {
        if self.enable_span_events {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    /// Initialize the global tracing subscriber
    pub fn init(self) -> Result<LoggingGuard, LoggingError> {
        let env_filter = match &self.env_filter {
            Some(filter) => EnvFilter::try_new(filter)?,
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.default_directive())),
        };

        let mut guards = Vec::new();
        let (console_writer, console_guard) = non_blocking(io::stderr());
        guards.push(console_guard);

        let console_layer = if self.json_format {
            fmt::layer()
                .json()
                .with_writer(console_writer)
                .with_span_events(self.span_events())
                .boxed()
        } else {
            fmt::layer()
                .compact()
                .with_target(false)
                .without_time()
                .with_writer(console_writer)
                .with_ansi(self.enable_ansi)
                .with_span_events(self.span_events())
                .boxed()
        };

        let file_layer = match &self.diagnostics_directory {
            Some(directory) => {
                let file_appender = rolling::daily(directory, &self.log_file_prefix);
                let (file_writer, file_guard) = non_blocking(file_appender);
                guards.push(file_guard);
                Some(
                    fmt::layer()
                        .json()
                        .with_writer(file_writer)
                        .with_span_events(self.span_events())
                        .boxed(),
                )
            }
            None => None,
        };

        Registry::default().with(env_filter).with(console_layer).with(file_layer).try_init()?;

        debug!("Logging initialized with configuration: {:?}", self);
        Ok(LoggingGuard { _guards: guards })
    }

    /// Initialize verbose logging (INFO level)
    pub fn init_verbose() -> Result<LoggingGuard, LoggingError> {
        Self::new().with_level(Level::INFO).init()
    }

    /// Initialize debug logging (DEBUG level with span timings)
    pub fn init_debug() -> Result<LoggingGuard, LoggingError> {
        Self::new().with_level(Level::DEBUG).with_span_events().init()
    }

    /// Initialize quiet logging (warnings and errors only)
    pub fn init_quiet() -> Result<LoggingGuard, LoggingError> {
        Self::new().with_level(Level::WARN).without_ansi().init()
    }
}

//! Error types and handling
//!
//! This module contains error types for the simulation. Sampling, scheduling and
//! machine acquisition always succeed in the modelled domain, so the variants
//! cover bad configuration, programming errors in the event loop, and I/O.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::ConfigValidationError;

/// Errors that can occur during simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration could not be used
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ConfigValidationError),

    /// The event loop was asked to do something impossible
    #[error("Scheduling error: {0}")]
    SchedulingError(String),

    /// The event log could not be written
    #[error("Event log error at {path}: {source}")]
    LogSinkError {
        /// Path of the log file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl SimulationError {
    /// Create a configuration error
    pub fn configuration_error(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Create a scheduling error
    pub fn scheduling_error(msg: impl Into<String>) -> Self {
        Self::SchedulingError(msg.into())
    }

    /// Create a log sink error for the given path
    pub fn log_sink_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LogSinkError { path: path.into(), source }
    }

    /// Check if the run could reasonably be retried as-is
    ///
    /// Configuration and scheduling errors will fail the same way again.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SimulationError::ConfigurationError(_) => false,
            SimulationError::ValidationError(_) => false,
            SimulationError::SchedulingError(_) => false,
            SimulationError::LogSinkError { .. } => true,
            SimulationError::IoError(_) => true,
            SimulationError::SerializationError(_) => false,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::ConfigurationError(_) => "Configuration",
            SimulationError::ValidationError(_) => "Configuration",
            SimulationError::SchedulingError(_) => "Scheduling",
            SimulationError::LogSinkError { .. } => "Event Log",
            SimulationError::IoError(_) => "IO",
            SimulationError::SerializationError(_) => "Serialization",
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;

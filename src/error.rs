//! Error types shared across the harness

use std::time::Duration;
use thiserror::Error;

/// Failure to produce the report document
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("cannot generate report: test session not started")]
    NotStarted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why an interaction with the page did not produce a value
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InteractionError {
    #[error("timed out after {}s waiting for {locator}", .timeout.as_secs_f64())]
    Timeout { locator: String, timeout: Duration },

    #[error("driver error: {0}")]
    Driver(String),
}

impl From<anyhow::Error> for InteractionError {
    fn from(err: anyhow::Error) -> Self {
        InteractionError::Driver(format!("{:#}", err))
    }
}

/// Invalid values in the environment configuration
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a whole number of seconds, got {value:?}")]
    InvalidSeconds { name: &'static str, value: String },

    #[error("WINDOW_SIZE must look like 1920x1080 or 1920,1080, got {0:?}")]
    InvalidWindowSize(String),
}

// Error types for lapvis

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum LapVisError {
    // Input validation errors
    #[snafu(display("Invalid lap trace: {reason}"))]
    InvalidTrace { reason: String },

    // Resampler precondition errors
    #[snafu(display("Channel length mismatch: {x_len} x values for {y_len} y values"))]
    ChannelLengthMismatch { x_len: usize, y_len: usize },
    #[snafu(display("Cannot interpolate over an empty channel"))]
    EmptyChannel,
    #[snafu(display("Interpolation axis decreases at index {index}"))]
    NonMonotonicAxis { index: usize },
    #[snafu(display("Interpolation axis has a non-finite value at index {index}"))]
    NonFiniteAxis { index: usize },

    // Numerical errors
    #[snafu(display("Cannot normalize a series with zero range"))]
    DegenerateRange,

    // Config management errors
    #[snafu(display("Invalid configuration: {field} - {reason}"))]
    InvalidConfig { field: String, reason: String },
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error reading or writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },

    // Telemetry loader errors
    #[snafu(display("Invalid telemetry file: {path}"))]
    InvalidTelemetryFile { path: String },
    #[snafu(display("Error loading telemetry file"))]
    TelemetryLoaderError { source: io::Error },

    // Output errors
    #[snafu(display("Error serializing analysis report"))]
    ReportSerializeError { source: serde_json::Error },
}

impl LapVisError {
    pub(crate) fn invalid_trace(reason: impl Into<String>) -> Self {
        LapVisError::InvalidTrace {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(field: &str, reason: impl Into<String>) -> Self {
        LapVisError::InvalidConfig {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = LapVisError> = std::result::Result<T, E>;

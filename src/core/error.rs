use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParameterError {
    #[error("{0} must be a finite number")]
    NonFinite(&'static str),

    #[error("{name} must be greater than zero (got {value})")]
    NonPositive { name: &'static str, value: f64 },

    #[error("max_steps must be at least 1")]
    ZeroStepLimit,

    #[error("sweep range is inverted: min {min} deg > max {max} deg")]
    InvertedSweep { min: i32, max: i32 },

    #[error("gear angle step {0} deg must lie between 0.001 and 360")]
    InvalidAngleStep(f64),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read settings file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse settings file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid settings: {0}")]
    Invalid(#[from] ParameterError),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("chart rendering failed: {0}")]
    Chart(String),

    #[error("nothing to draw: {0}")]
    Empty(&'static str),
}

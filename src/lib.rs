//! Morsel: a resumable review harvester
//!
//! This crate implements a checkpointed scraping pipeline that collects user
//! reviews from a fixed list of restaurant pages, persisting records
//! incrementally so an interrupted run can resume where it left off.

pub mod checkpoint;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod review;

use thiserror::Error;

/// Main error type for Morsel operations
#[derive(Debug, Error)]
pub enum MorselError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Target list error: {0}")]
    Input(#[from] input::InputError),

    #[error("Output stream error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Checkpoint store error: {0}")]
    Checkpoint(#[from] checkpoint::CheckpointError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid selector query '{query}': {message}")]
    InvalidSelector { query: String, message: String },
}

/// Result type alias for Morsel operations
pub type Result<T> = std::result::Result<T, MorselError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use fetch::{FetchFailure, Fetcher};
pub use pipeline::{Controller, RunReport, Target, TargetStatus};
pub use review::{ReviewRecord, Validator};

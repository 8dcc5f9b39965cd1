//! Error types for Stress Flux

use thiserror::Error;

/// Errors that can occur while parsing input, or loading configuration.
///
/// Aggregation itself never fails; see [`crate::aggregator::Aggregator::aggregate`].
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Failed to parse log payload: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

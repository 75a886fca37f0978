//! Error types for the traffic_forecast crate

use thiserror::Error;

/// Custom error types for the traffic_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Scenario cannot be resolved to an improvement value
    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    /// Keyword record is missing required fields
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Error from invalid parameters or settings
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to loading or merging input data
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from curve or projection math
    #[error("Math error: {0}")]
    MathError(#[from] rank_math::MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from JSON export
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

//! Error types for the Cassandra populator.

use thiserror::Error;

/// Errors that can occur while setting up Cassandra sessions.
#[derive(Error, Debug)]
pub enum CassandraPopulatorError {
    /// Config file could not be read.
    #[error("Failed to read connection config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON or misses a field.
    #[error("Failed to parse connection config: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A generated value does not fit its column.
    #[error("Bind error: {0}")]
    Bind(String),

    /// Statement preparation error.
    #[error("Failed to prepare query: {0}")]
    Prepare(String),
}

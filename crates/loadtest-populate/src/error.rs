//! Error types for the load engine.

use crate::writer::ConnectError;
use loadtest_generator::{GeneratorError, SchemaError};
use thiserror::Error;

/// Errors that stop a run before any worker starts.
#[derive(Error, Debug)]
pub enum PopulateError {
    /// Invalid run configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Schema file error.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// Errors fatal to a single worker.
///
/// These end the worker's loop and are reported to the orchestrator; sibling
/// workers keep running. Per-row write failures are not part of this type.
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Could not open the worker's session to the store.
    #[error("Connection error: {0}")]
    Connect(#[from] ConnectError),

    /// Row generation failed (unsupported column type).
    #[error("Generator error: {0}")]
    Generation(#[from] GeneratorError),
}

//! Cassandra writer for load testing.
//!
//! Each client opens its own session from the JSON connection config,
//! prepares a single `INSERT` for the target table and executes it once per
//! generated row.

pub mod args;
pub mod config;
pub mod error;
pub mod insert;
pub mod writer;

pub use args::CassandraPopulateArgs;
pub use config::ConnectionConfig;
pub use error::CassandraPopulatorError;
pub use writer::{CassandraWriter, CassandraWriterFactory};

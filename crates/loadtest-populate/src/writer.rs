//! Store-facing traits.
//!
//! The engine treats a write as opaque: it either succeeds or fails, and the
//! failure reason is only ever logged and counted.

use crate::spec::WorkerId;
use async_trait::async_trait;
use loadtest_generator::Value;
use thiserror::Error;

/// A failed write of one row.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct WriteError(pub String);

/// Failure to open a worker session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ConnectError(pub String);

/// One worker's session to the store.
#[async_trait]
pub trait RowWriter: Send + Sync {
    /// Write one row into `table`, values in schema order.
    async fn write(&self, table: &str, values: &[Value]) -> Result<(), WriteError>;
}

/// Opens a private [`RowWriter`] per worker.
#[async_trait]
pub trait WriterFactory: Send + Sync {
    async fn connect(&self, worker_id: WorkerId) -> Result<Box<dyn RowWriter>, ConnectError>;
}

/// Writer used in dry-run mode: accepts every row.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullWriter;

#[async_trait]
impl RowWriter for NullWriter {
    async fn write(&self, _table: &str, _values: &[Value]) -> Result<(), WriteError> {
        // Unbounded dry runs must still reach an await point.
        tokio::task::yield_now().await;
        Ok(())
    }
}

/// Factory handing out [`NullWriter`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullWriterFactory;

#[async_trait]
impl WriterFactory for NullWriterFactory {
    async fn connect(&self, _worker_id: WorkerId) -> Result<Box<dyn RowWriter>, ConnectError> {
        Ok(Box::new(NullWriter))
    }
}

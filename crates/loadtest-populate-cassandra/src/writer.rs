//! Cassandra sessions behind the populate writer traits.

use crate::config::ConnectionConfig;
use crate::error::CassandraPopulatorError;
use crate::insert::{bind_values, insert_query, BindType};
use async_trait::async_trait;
use loadtest_generator::Value;
use loadtest_populate::{ConnectError, RowWriter, RunSpec, WorkerId, WriteError, WriterFactory};
use scylla::prepared_statement::PreparedStatement;
use scylla::{Session, SessionBuilder};
use tracing::{debug, info};

/// Opens one session per client.
pub struct CassandraWriterFactory {
    config: ConnectionConfig,
    keyspace: Option<String>,
    table: String,
    query: String,
}

impl CassandraWriterFactory {
    pub fn new(config: ConnectionConfig, spec: &RunSpec) -> Self {
        let query = insert_query(&spec.table, &spec.schema);
        info!("Preparing query:\n{}", query);
        Self {
            config,
            keyspace: spec.keyspace.clone(),
            table: spec.table.clone(),
            query,
        }
    }

    async fn open(&self) -> Result<CassandraWriter, CassandraPopulatorError> {
        let mut builder = SessionBuilder::new()
            .known_nodes(self.config.known_nodes())
            .user(&self.config.username, &self.config.password);
        if let Some(keyspace) = &self.keyspace {
            builder = builder.use_keyspace(keyspace, false);
        }

        let session = builder
            .build()
            .await
            .map_err(|e| CassandraPopulatorError::Connection(e.to_string()))?;

        let insert = session
            .prepare(self.query.clone())
            .await
            .map_err(|e| CassandraPopulatorError::Prepare(format!("{}: {e}", self.table)))?;
        let types = insert
            .get_variable_col_specs()
            .iter()
            .map(|spec| BindType::from_column_type(&spec.typ))
            .collect::<Vec<_>>();
        debug!("Prepared {} with bind types {:?}", self.query, types);

        Ok(CassandraWriter {
            session,
            insert,
            types,
        })
    }
}

#[async_trait]
impl WriterFactory for CassandraWriterFactory {
    async fn connect(&self, _worker_id: WorkerId) -> Result<Box<dyn RowWriter>, ConnectError> {
        let writer = self.open().await.map_err(|e| ConnectError(e.to_string()))?;
        Ok(Box::new(writer))
    }
}

/// A client session with its prepared INSERT.
pub struct CassandraWriter {
    session: Session,
    insert: PreparedStatement,
    /// Column types of the INSERT's bind markers, in order.
    types: Vec<BindType>,
}

#[async_trait]
impl RowWriter for CassandraWriter {
    async fn write(&self, _table: &str, values: &[Value]) -> Result<(), WriteError> {
        let values = bind_values(values, &self.types).map_err(|e| WriteError(e.to_string()))?;
        self.session
            .execute_unpaged(&self.insert, values)
            .await
            .map(|_| ())
            .map_err(|e| WriteError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadtest_generator::RowSchema;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn config() -> ConnectionConfig {
        ConnectionConfig {
            username: "u".into(),
            password: "p".into(),
            hosts: vec!["localhost".into()],
        }
    }

    #[test]
    fn test_factory_query_uses_bare_table() {
        let spec = RunSpec::new("users", RowSchema::legacy()).with_keyspace(Some("shop".into()));

        let factory = CassandraWriterFactory::new(config(), &spec);
        assert_eq!(factory.query, "INSERT INTO users(id, name) VALUES (?, ?)");
        assert_eq!(factory.keyspace.as_deref(), Some("shop"));
    }

    #[test]
    fn test_query_logged_at_info() {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            CassandraWriterFactory::new(config(), &RunSpec::new("users", RowSchema::legacy()));
        });

        let logs = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("INFO"));
        assert!(logs.contains("Preparing query:\nINSERT INTO users(id, name) VALUES (?, ?)"));
    }
}

//! Populate command runner.

use crate::cli::Cli;
use crate::logging::LogConfig;
use anyhow::Context;
use loadtest_populate::{NullWriterFactory, Orchestrator, RunSummary, WriterFactory};
use loadtest_populate_cassandra::{CassandraWriterFactory, ConnectionConfig};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::instrument::WithSubscriber;
use tracing::{info, warn, Dispatch};

/// Run a populate command from parsed arguments.
///
/// Configuration problems are returned as errors before any client starts.
/// Once clients are running the run always produces a summary.
pub async fn run_populate(cli: Cli) -> anyhow::Result<RunSummary> {
    let dispatch = LogConfig::new(&cli.log_dir).build()?;
    populate(cli, dispatch.clone()).with_subscriber(dispatch).await
}

async fn populate(cli: Cli, dispatch: Dispatch) -> anyhow::Result<RunSummary> {
    let spec = cli.run_spec()?;
    let args = &cli.populate;

    let factory: Arc<dyn WriterFactory> = if args.common.dry_run {
        info!(
            "[DRY-RUN] Would insert {} rows per client into {} from {} clients",
            spec.row_count
                .map(|n| n.to_string())
                .unwrap_or_else(|| "infinite".to_string()),
            spec.qualified_table(),
            spec.concurrency
        );
        match ConnectionConfig::from_file(&args.config) {
            Ok(config) => info!("[DRY-RUN] Connection: {:?}", config),
            Err(e) => warn!("[DRY-RUN] Connection config not usable: {}", e),
        }
        info!("[DRY-RUN] Columns: {:?}", spec.schema.column_names());
        Arc::new(NullWriterFactory)
    } else {
        let config = ConnectionConfig::from_file(&args.config)
            .with_context(|| format!("Failed to load connection config {:?}", args.config))?;
        info!("Connecting with {:?}", config);
        Arc::new(CassandraWriterFactory::new(config, &spec))
    };

    let orchestrator =
        Orchestrator::new(spec, factory, dispatch.clone()).context("Invalid run configuration")?;
    setup_shutdown_handler(orchestrator.cancellation_token(), dispatch);

    Ok(orchestrator.run().await)
}

/// Cancel the run on the first Ctrl+C.
fn setup_shutdown_handler(cancel: CancellationToken, dispatch: Dispatch) {
    tokio::spawn(
        async move {
            tokio::select! {
                signal = tokio::signal::ctrl_c() => {
                    if let Err(e) = signal {
                        warn!("Failed to install Ctrl+C handler: {}", e);
                        return;
                    }
                    warn!("Received interrupt signal (Ctrl+C), stopping clients");
                    cancel.cancel();
                }
                _ = cancel.cancelled() => {}
            }
        }
        .with_subscriber(dispatch),
    );
}

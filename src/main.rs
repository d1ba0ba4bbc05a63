//! Command-line interface for cassandra-loadtest
//!
//! # Usage Examples
//!
//! ```bash
//! # 2 clients, 25 rows each, ids in [0, 9]
//! cassandra-loadtest users -k shop -c 25 -p 2 --min-id 0 --max-id 9
//!
//! # Unbounded run with a schema file, stop with Ctrl+C
//! cassandra-loadtest events -k metrics --schema tables.yaml -p 8 --report-every 100
//! ```
//!
//! The connection config (`--config`, default `config.json`) holds the
//! credentials and contact points:
//!
//! ```json
//! {"username": "cassandra", "password": "cassandra", "hosts": ["127.0.0.1:9042"]}
//! ```

use cassandra_loadtest::{run_populate, Cli};
use clap::Parser;
use loadtest_populate::report;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let summary = run_populate(cli).await?;
    println!("{}", report::format_table(&summary));

    Ok(())
}

//! CLI argument definitions for the Cassandra populator.

use clap::Args;
use loadtest_populate::CommonPopulateArgs;
use std::path::PathBuf;

/// Cassandra-specific populate arguments.
#[derive(Args, Clone, Debug)]
pub struct CassandraPopulateArgs {
    /// Connection config file (JSON with username, password and hosts)
    #[arg(long, env = "CASSANDRA_CONFIG", default_value = "config.json")]
    pub config: PathBuf,

    #[command(flatten)]
    pub common: CommonPopulateArgs,
}

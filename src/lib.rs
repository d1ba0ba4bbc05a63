//! cassandra-loadtest library
//!
//! Fills a Cassandra table with random rows from parallel clients and
//! reports progress while they run.
//!
//! # Crates
//!
//! - `loadtest_generator` - row schemas and random value generation
//! - `loadtest_populate` - worker loop, shared counters and the orchestrator
//! - `loadtest_populate_cassandra` - CQL sessions behind the writer traits
//!
//! # CLI Usage
//!
//! ```bash
//! # 4 clients, 100k rows each, into shop.users
//! cassandra-loadtest users -k shop -c 100000 -p 4 --config config.json
//!
//! # Custom columns, insert until interrupted
//! cassandra-loadtest events -k metrics --schema tables.yaml -p 8
//!
//! # Exercise the whole pipeline without a cluster
//! cassandra-loadtest users -c 1000 --dry-run
//! ```

pub mod cli;
pub mod config;
pub mod logging;
pub mod run;

pub use cli::Cli;
pub use logging::LogConfig;
pub use run::run_populate;

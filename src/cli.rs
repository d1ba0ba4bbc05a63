//! Command-line interface.

use crate::config::duration::parse_duration;
use anyhow::Context;
use clap::Parser;
use loadtest_populate::RunSpec;
use loadtest_populate_cassandra::CassandraPopulateArgs;
use std::path::PathBuf;

#[derive(Parser, Clone, Debug)]
#[command(name = "cassandra-loadtest")]
#[command(about = "Insert random rows into a Cassandra table from parallel clients")]
#[command(long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub populate: CassandraPopulateArgs,

    /// Directory for daily log files
    #[arg(long, env = "LOADTEST_LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,
}

impl Cli {
    /// Build the run description from the parsed arguments.
    ///
    /// Loads the schema file when one is given; the spec itself is validated
    /// by the orchestrator.
    pub fn run_spec(&self) -> anyhow::Result<RunSpec> {
        let common = &self.populate.common;
        let schema = common.row_schema()?;
        let poll_interval = parse_duration(&common.poll_interval)
            .with_context(|| format!("Invalid --poll-interval '{}'", common.poll_interval))?;

        Ok(RunSpec::new(common.table_name.clone(), schema)
            .with_keyspace(common.keyspace.clone())
            .with_row_count(common.count)
            .with_concurrency(common.parallel)
            .with_id_range(common.min_id, common.max_id)
            .with_report_every(common.report_every)
            .with_poll_interval(poll_interval)
            .with_seed(common.seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["cassandra-loadtest", "users"]).unwrap();
        assert_eq!(cli.log_dir, PathBuf::from("logs"));
        assert_eq!(cli.populate.config, PathBuf::from("config.json"));

        let spec = cli.run_spec().unwrap();
        assert_eq!(spec.table, "users");
        assert_eq!(spec.keyspace, None);
        assert_eq!(spec.row_count, None);
        assert_eq!(spec.concurrency, 1);
        assert_eq!(spec.min_id, 0);
        assert_eq!(spec.max_id, 2_147_483_647);
        assert_eq!(spec.report_every, 10);
        assert_eq!(spec.poll_interval, Duration::from_secs(3));
        assert_eq!(spec.schema.column_names(), vec!["id", "name"]);
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "cassandra-loadtest",
            "users",
            "-k",
            "shop",
            "-c",
            "25",
            "-p",
            "4",
            "--min-int",
            "-10",
            "--max-int",
            "10",
            "--poll-interval",
            "500ms",
        ])
        .unwrap();

        let spec = cli.run_spec().unwrap();
        assert_eq!(spec.qualified_table(), "shop.users");
        assert_eq!(spec.row_count, Some(25));
        assert_eq!(spec.concurrency, 4);
        assert_eq!((spec.min_id, spec.max_id), (-10, 10));
        assert_eq!(spec.poll_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_bad_poll_interval() {
        let cli =
            Cli::try_parse_from(["cassandra-loadtest", "users", "--poll-interval", "soon"]).unwrap();
        let err = cli.run_spec().unwrap_err();
        assert!(format!("{err:#}").contains("--poll-interval"));
    }

    #[test]
    fn test_table_name_required() {
        assert!(Cli::try_parse_from(["cassandra-loadtest"]).is_err());
    }
}

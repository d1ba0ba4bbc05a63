//! Log sinks for a populate run.
//!
//! Every run logs to a daily file (`<dir>/log_<YYYY-MM-DD>`, appended) at
//! `INFO` and above, and to stderr at `WARN` and above. `RUST_LOG` overrides
//! the console level only.
//!
//! The sinks are returned as a [`Dispatch`] rather than installed globally;
//! the orchestrator attaches it to every client task.

use anyhow::Context;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Dispatch;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Where and how much to log.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub dir: PathBuf,
    pub file_level: LevelFilter,
    pub console_level: LevelFilter,
}

impl LogConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_level: LevelFilter::INFO,
            console_level: LevelFilter::WARN,
        }
    }

    /// Path of today's log file.
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(file_name(chrono::Local::now().date_naive()))
    }

    /// Create the log directory, open today's file and assemble both sinks.
    pub fn build(&self) -> anyhow::Result<Dispatch> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create log directory {}", self.dir.display()))?;

        let path = self.file_path();
        let file = open_append(&path)?;

        let console_filter = EnvFilter::builder()
            .with_default_directive(self.console_level.into())
            .from_env_lossy();

        let file_layer = fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_filter(self.file_level);
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(console_filter);

        let subscriber = tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer);
        Ok(Dispatch::new(subscriber))
    }
}

fn file_name(date: chrono::NaiveDate) -> String {
    format!("log_{}", date.format("%Y-%m-%d"))
}

fn open_append(path: &Path) -> anyhow::Result<std::fs::File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

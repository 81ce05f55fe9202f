use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::config::{data_dir, Config};

const LOG_ENV: &str = "TASKBOARD_LOG";
const DEFAULT_FILTER: &str = "taskboard=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// CLI mode: log to stderr so stdout stays clean for tables.
pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// TUI mode: log to a file, since the terminal is in the alternate screen.
pub fn init_file(config: &Config) -> Result<PathBuf> {
    let path = config.log_file.clone().unwrap_or_else(|| data_dir().join("taskboard.log"));
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_ansi(false)
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(path)
}

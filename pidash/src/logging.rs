//! tracing setup. The TUI owns the terminal, so it logs to a file; one-shot
//! modes log to stderr.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::profiles::config_dir;

pub const LOG_ENV: &str = "PIDASH_LOG";

pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
}

pub fn default_log_file() -> PathBuf {
    config_dir().join("pidash.log")
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init_logging(target: LogTarget<'_>) -> std::io::Result<()> {
    match target {
        LogTarget::Stderr => {
            // a second init (tests, embedding) is harmless
            let _ = tracing_subscriber::registry()
                .with(filter())
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init();
        }
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let _ = tracing_subscriber::registry()
                .with(filter())
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init();
        }
    }
    Ok(())
}

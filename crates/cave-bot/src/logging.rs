//! Tracing setup.
//!
//! stdout carries moves, so human-readable logs go to stderr. When a log
//! directory is configured, a second non-blocking layer mirrors them to
//! `<dir>/cave-bot.log`.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::BotConfig;

pub const LOG_FILE_NAME: &str = "cave-bot.log";

/// Keeps the file writer alive; drop it only at process exit.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Installs the global subscriber. `RUST_LOG` overrides the `info` default.
pub fn init(config: &BotConfig) -> Result<LogGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let dir = prepare_log_dir(dir)?;
            let appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("installing tracing subscriber")?;

    if let Some(dir) = &config.log_dir {
        tracing::info!(path = %dir.join(LOG_FILE_NAME).display(), "file logging enabled");
    }

    Ok(LogGuard { _file: guard })
}

/// Creates `dir` (and parents) if needed and returns it.
pub fn prepare_log_dir(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;
    Ok(dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_log_dir_creates_nested_directories() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("runs").join("today");
        let prepared = prepare_log_dir(&nested).unwrap();
        assert_eq!(prepared, nested);
        assert!(nested.is_dir());

        // Idempotent.
        assert!(prepare_log_dir(&nested).is_ok());
    }

    #[test]
    fn prepare_log_dir_fails_on_file_path() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("occupied");
        std::fs::write(&file, b"x").unwrap();
        assert!(prepare_log_dir(&file.join("logs")).is_err());
    }
}

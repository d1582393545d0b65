//! Structured logging setup
//!
//! Configures the `tracing` subscriber for either a log file (TUI mode, where
//! the terminal is taken) or stderr (headless commands).

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(env_filter);

    match (&config.file, config.format) {
        (Some(path), LogFormat::Json) => {
            let writer = Mutex::new(open_log_file(path)?);
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(writer))
                .init();
        }
        (Some(path), LogFormat::Pretty) => {
            let writer = Mutex::new(open_log_file(path)?);
            registry
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
        }
        (None, LogFormat::Json) => {
            registry
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        (None, LogFormat::Pretty) => {
            registry
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}

/// Opens `path` for appending, creating parent directories as needed
fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

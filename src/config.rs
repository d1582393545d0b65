//! Runtime configuration resolved from CLI flags and environment variables

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::ValueEnum;
use tracing::warn;

use crate::cache::{Cache, FileCache, MemoryCache};
use crate::cli::Cli;

/// File name for logs written while the TUI owns the terminal
pub const LOG_FILE_NAME: &str = "studyaid.log";

/// Output format for log records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// One JSON object per record
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. `info`, `studyaid=debug`)
    pub level: String,
    pub format: LogFormat,
    /// Write logs to this file instead of stderr
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

/// The root configuration for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the generation backend
    pub backend_url: String,
    /// Cache directory override; the XDG cache dir is used when unset
    pub cache_dir: Option<PathBuf>,
    /// Where exported files are written
    pub export_dir: PathBuf,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            backend_url: cli.backend_url.clone(),
            cache_dir: cli.cache_dir.clone(),
            export_dir: cli.export_dir.clone(),
            logging: LoggingConfig {
                level: cli.log_level.clone(),
                format: cli.log_format,
                file: cli.log_file.clone(),
            },
        }
    }

    /// The file cache for this configuration, if a directory can be determined
    pub fn file_cache(&self) -> Option<FileCache> {
        match &self.cache_dir {
            Some(dir) => Some(FileCache::with_dir(dir.clone())),
            None => FileCache::new(),
        }
    }

    /// Opens the artifact cache, falling back to memory when no directory is available
    pub fn open_cache(&self) -> Arc<dyn Cache> {
        match self.file_cache() {
            Some(cache) => Arc::new(cache),
            None => {
                warn!("No cache directory available; generated content will not persist");
                Arc::new(MemoryCache::new())
            }
        }
    }

    /// Logging settings for TUI mode, where logs must not reach the terminal
    pub fn tui_logging(&self) -> LoggingConfig {
        let mut logging = self.logging.clone();
        if logging.file.is_none() {
            let cache = self.file_cache();
            logging.file = Some(tui_log_path(cache.as_ref().map(FileCache::dir)));
        }
        logging
    }
}

/// The TUI log file inside `dir`, or in the working directory without one
fn tui_log_path(dir: Option<&Path>) -> PathBuf {
    match dir {
        Some(dir) => dir.join(LOG_FILE_NAME),
        None => PathBuf::from(LOG_FILE_NAME),
    }
}

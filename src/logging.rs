//! Logging setup
//!
//! Logs are only written in debug mode (`-d`). They go to a daily-rolling
//! file so the terminal UI is never drawn over.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_PREFIX: &str = "appforge.log";
const DEFAULT_LOG_DIR: &str = ".appforge/logs";
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Logging options assembled in `main`
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub debug_mode: bool,
    pub log_dir: PathBuf,
    pub level: Option<String>,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            debug_mode: false,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            level: None,
            json: false,
        }
    }

    pub fn with_debug_mode(mut self, debug: bool) -> Self {
        self.debug_mode = debug;
        self
    }

    pub fn with_log_dir(mut self, dir: PathBuf) -> Self {
        self.log_dir = dir;
        self
    }

    /// Level used when `RUST_LOG` is not set
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Write JSON lines instead of plain text
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    fn filter(&self) -> EnvFilter {
        let fallback = self.level.as_deref().unwrap_or("debug");
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(format!("appforge={},warn", fallback)))
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

/// Install the global subscriber.
///
/// Returns the writer guard in debug mode; keep it alive until exit or
/// buffered lines are lost. Outside debug mode nothing is installed.
pub fn init_logging(config: LogConfig) -> Result<Option<WorkerGuard>> {
    if !config.debug_mode {
        return Ok(None);
    }

    fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("Failed to create log directory: {:?}", config.log_dir))?;

    let appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    let registry = tracing_subscriber::registry().with(config.filter());
    let installed = if config.json {
        registry.with(file_layer.json()).try_init()
    } else {
        registry.with(file_layer).try_init()
    };
    installed.context("Failed to install tracing subscriber")?;

    tracing::info!(
        "AppForge {} logging to {:?}",
        env!("CARGO_PKG_VERSION"),
        config.log_dir
    );
    Ok(Some(guard))
}

/// Directory log files are written to
pub fn log_dir() -> PathBuf {
    std::env::var("DEBUG_LOGS_LOCATION")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_DIR))
}

/// Most recent log file, if any
pub fn get_log_path() -> Option<PathBuf> {
    newest_log_in(&log_dir())
}

/// Summary of the log directory for `appforge logs status`
#[derive(Debug, Clone, Default)]
pub struct LogStatus {
    pub file_count: usize,
    pub total_bytes: u64,
    pub newest: Option<(PathBuf, DateTime<Local>)>,
}

/// Inspect the log directory
pub fn log_status() -> LogStatus {
    status_of(&log_dir())
}

/// Delete log files older than `days`. Returns how many were removed.
pub fn cleanup_old_logs(days: u64) -> Result<usize> {
    cleanup_logs_in(&log_dir(), days)
}

fn log_files(dir: &Path) -> Vec<(PathBuf, SystemTime)> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(LOG_FILE_PREFIX))
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((entry.path(), modified))
        })
        .collect()
}

fn status_of(dir: &Path) -> LogStatus {
    let files = log_files(dir);
    let total_bytes = files
        .iter()
        .filter_map(|(path, _)| fs::metadata(path).ok())
        .map(|metadata| metadata.len())
        .sum();
    let newest = files
        .iter()
        .max_by_key(|(_, modified)| *modified)
        .map(|(path, modified)| (path.clone(), DateTime::<Local>::from(*modified)));

    LogStatus {
        file_count: files.len(),
        total_bytes,
        newest,
    }
}

fn newest_log_in(dir: &Path) -> Option<PathBuf> {
    log_files(dir)
        .into_iter()
        .max_by_key(|(_, modified)| *modified)
        .map(|(path, _)| path)
}

fn cleanup_logs_in(dir: &Path, days: u64) -> Result<usize> {
    let max_age = Duration::from_secs(days.saturating_mul(SECONDS_PER_DAY));
    let now = SystemTime::now();
    let mut removed = 0;

    for (path, modified) in log_files(dir) {
        let age = now.duration_since(modified).unwrap_or_default();
        if age > max_age {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove log file: {:?}", path))?;
            removed += 1;
        }
    }

    Ok(removed)
}

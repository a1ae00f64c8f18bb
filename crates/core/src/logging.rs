//! Structured logging with JSON output.
//!
//! Logs are written as JSON lines to one file per run, named after a run ID
//! (UUID v7) that is generated once per process: `zerolaunch-<run_id>.json`.
//! Because v7 UUIDs are time-ordered, sorting the file names sorts the runs
//! chronologically, which is what retention cleanup relies on.
//!
//! Configuration comes from [`LoggingSettings`]; the level can be overridden
//! with `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=debug ./zerolaunch-nav
//! RUST_LOG=zerolaunch_core::navigation=trace,info ./zerolaunch-nav
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use zerolaunch_core::settings::LoggingSettings;
//! use zerolaunch_core::logging::{init_logging, shutdown_logging};
//!
//! init_logging(&LoggingSettings::default())?;
//! tracing::info!("Application started");
//! shutdown_logging();
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::settings::LoggingSettings;
use anyhow::{Context, Error};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Mutex, OnceLock};
use std::thread;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const LOG_FILE_PREFIX: &str = "zerolaunch-";
const LOG_FILE_SUFFIX: &str = "json";
const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

static LOG_GUARD: OnceLock<Mutex<Option<WorkerGuard>>> = OnceLock::new();
static RUN_ID: OnceLock<String> = OnceLock::new();

/// Returns the run ID of this process.
///
/// Generated on first access and constant afterwards.
pub fn get_run_id() -> &'static str {
    RUN_ID.get_or_init(|| Uuid::now_v7().to_string()).as_str()
}

/// Deletes the oldest run logs so that at most `max_files` remain.
///
/// `max_files == 0` keeps everything. Run IDs are time-ordered, so the
/// lexicographically smallest names are the oldest runs.
fn cleanup_run_logs(log_dir: &Path, max_files: usize) -> Result<(), Error> {
    if max_files == 0 {
        return Ok(());
    }

    let mut paths = run_log_paths(log_dir)?;
    let excess = paths.len().saturating_sub(max_files);
    if excess == 0 {
        return Ok(());
    }

    paths.sort();
    for path in paths.drain(..excess) {
        fs::remove_file(&path)
            .with_context(|| format!("can't remove old log file {}", path.display()))?;
    }

    Ok(())
}

/// Paths of the run logs in `log_dir`, in directory order.
fn run_log_paths(log_dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let entries = fs::read_dir(log_dir)
        .with_context(|| format!("can't read log directory {}", log_dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.context("can't read log directory entry")?;
        if is_run_log_name(&entry.file_name().to_string_lossy()) {
            paths.push(entry.path());
        }
    }

    Ok(paths)
}

fn is_run_log_name(file_name: &str) -> bool {
    file_name.starts_with(LOG_FILE_PREFIX) && file_name.ends_with(LOG_FILE_SUFFIX)
}

/// Installs the global tracing subscriber.
///
/// Creates the log directory, applies the retention policy, and routes
/// JSON-formatted events through a non-blocking file appender. Does nothing
/// when logging is disabled. Call once, at startup, and pair with
/// [`shutdown_logging`].
///
/// # Errors
///
/// Fails if the log directory cannot be prepared, the level directive is
/// invalid, or a global subscriber is already installed.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), Error> {
    if !settings.enabled {
        return Ok(());
    }

    let current_working_dir =
        std::env::current_dir().context("can't get current working directory")?;
    let log_dir = current_working_dir.join(&settings.directory);
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("can't create log directory {}", &log_dir.display()))?;

    cleanup_run_logs(&log_dir, settings.max_files)?;

    let appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::NEVER)
        .filename_prefix(format!("{}{}", LOG_FILE_PREFIX, get_run_id()))
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(&log_dir)
        .context("can't initialize rolling log file appender")?;

    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(Mutex::new(Some(guard)));

    let filter = build_filter(settings)?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(non_blocking)
        .with_current_span(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("can't initialize tracing subscriber")?;

    tracing::info!(run_id = get_run_id(), version = VERSION, "Logging initialized");
    eprintln!(
        "ZeroLaunch run started with ID: {} (version {})",
        get_run_id(),
        VERSION
    );

    Ok(())
}

/// Flushes buffered log lines, waiting at most five seconds.
///
/// The subscriber may no longer be able to write by now, so a flush timeout
/// is reported on stderr.
pub fn shutdown_logging() {
    let Some(guard) = LOG_GUARD
        .get()
        .and_then(|mutex| mutex.lock().ok())
        .and_then(|mut guard| guard.take())
    else {
        return;
    };

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        drop(guard);
        let _ = tx.send(());
    });

    if rx.recv_timeout(FLUSH_TIMEOUT).is_err() {
        eprintln!(
            "Timed out after {}s flushing logs of run {}",
            FLUSH_TIMEOUT.as_secs(),
            get_run_id()
        );
    }
}

/// `RUST_LOG` wins over the configured level; an empty level means `info`.
fn build_filter(settings: &LoggingSettings) -> Result<EnvFilter, Error> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let level = settings.level.trim();
    let level = if level.is_empty() { "info" } else { level };

    EnvFilter::builder()
        .parse(level)
        .context("invalid logging level")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_log_file(dir: &Path, index: usize) -> Result<(), Error> {
        let file_name = format!("{}{:04}.{}", LOG_FILE_PREFIX, index, LOG_FILE_SUFFIX);
        fs::write(dir.join(file_name), b"{}")?;
        Ok(())
    }

    fn collect_log_file_names(dir: &Path) -> Result<Vec<String>, Error> {
        let mut names: Vec<String> = run_log_paths(dir)?
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }

    #[test]
    fn cleanup_run_logs_removes_oldest_entries() -> Result<(), Error> {
        let temp_dir = TempDir::new()?;
        for index in 1..=4 {
            create_log_file(temp_dir.path(), index)?;
        }

        cleanup_run_logs(temp_dir.path(), 2)?;

        assert_eq!(
            collect_log_file_names(temp_dir.path())?,
            vec![
                format!("{}0003.{}", LOG_FILE_PREFIX, LOG_FILE_SUFFIX),
                format!("{}0004.{}", LOG_FILE_PREFIX, LOG_FILE_SUFFIX),
            ]
        );

        Ok(())
    }

    #[test]
    fn cleanup_run_logs_ignores_foreign_files() -> Result<(), Error> {
        let temp_dir = TempDir::new()?;
        create_log_file(temp_dir.path(), 1)?;
        create_log_file(temp_dir.path(), 2)?;
        fs::write(temp_dir.path().join("Settings.toml"), b"")?;

        cleanup_run_logs(temp_dir.path(), 1)?;

        assert_eq!(collect_log_file_names(temp_dir.path())?.len(), 1);
        assert!(temp_dir.path().join("Settings.toml").exists());

        Ok(())
    }

    #[test]
    fn cleanup_run_logs_max_files_zero_keeps_all() -> Result<(), Error> {
        let temp_dir = TempDir::new()?;
        for index in 1..=3 {
            create_log_file(temp_dir.path(), index)?;
        }

        cleanup_run_logs(temp_dir.path(), 0)?;

        assert_eq!(collect_log_file_names(temp_dir.path())?.len(), 3);

        Ok(())
    }

    #[test]
    fn run_id_is_stable() {
        assert_eq!(get_run_id(), get_run_id());
        assert!(Uuid::parse_str(get_run_id()).is_ok());
    }

    #[test]
    fn run_log_names_need_prefix_and_suffix() {
        assert!(is_run_log_name("zerolaunch-0190.json"));
        assert!(!is_run_log_name("zerolaunch-0190.txt"));
        assert!(!is_run_log_name("cadence-0190.json"));
    }

    #[test]
    fn shutdown_without_init_returns() {
        shutdown_logging();
    }

    #[test]
    fn disabled_logging_is_a_no_op() {
        let settings = LoggingSettings {
            enabled: false,
            ..LoggingSettings::default()
        };

        assert!(init_logging(&settings).is_ok());
    }
}

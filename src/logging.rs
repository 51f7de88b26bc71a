//! Tracing setup for hosts that embed the recognition controller.
//!
//! Each launch gets its own file under `<app root>/logs`, mirrored to stdout.
//! Only the newest launches are kept on disk.

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::OnceLock,
    time::SystemTime,
};

use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs::{self, AppDirError};

const LAUNCH_LOGS_KEPT: usize = 10;
const LOG_FILE_PREFIX: &str = "gesture_commander";
const FILE_NAME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
const LINE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Keeps the file writer flushing until process exit.
static FILE_WRITER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Log directory unavailable: {0}")]
    LogDir(#[from] AppDirError),
    #[error("Failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to format log file timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
    #[error("A global tracing subscriber is already installed: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

impl LoggingError {
    fn io(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| Self::Io {
            action,
            path,
            source,
        }
    }
}

/// Install the global subscriber. Calling it again after success does nothing.
pub fn init() -> Result<(), LoggingError> {
    if FILE_WRITER_GUARD.get().is_some() {
        return Ok(());
    }
    let log_dir = app_dirs::logs_dir()?;
    let log_path = open_launch_log(&log_dir, now_local_or_utc())?;
    prune_old_logs(&log_dir, LAUNCH_LOGS_KEPT)?;

    let file = OpenOptions::new()
        .append(true)
        .open(&log_path)
        .map_err(LoggingError::io("open log file", &log_path))?;
    let (file_writer, guard) = tracing_appender::non_blocking(file);

    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let timer = fmt::time::OffsetTime::new(offset, LINE_TIME_FORMAT);
    let subscriber = Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_timer(timer.clone()).with_writer(std::io::stdout))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_timer(timer)
                .with_writer(file_writer),
        );
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = FILE_WRITER_GUARD.set(guard);

    tracing::info!(path = %log_path.display(), "Logging initialized");
    Ok(())
}

/// Current wall-clock time in the local offset, falling back to UTC.
pub(crate) fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Create this launch's log file so pruning counts it.
fn open_launch_log(dir: &Path, started: OffsetDateTime) -> Result<PathBuf, LoggingError> {
    let path = dir.join(launch_log_name(started)?);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(LoggingError::io("create log file", &path))?;
    Ok(path)
}

fn launch_log_name(started: OffsetDateTime) -> Result<String, LoggingError> {
    let stamp = started.format(FILE_NAME_FORMAT)?;
    Ok(format!("{LOG_FILE_PREFIX}_{stamp}.log"))
}

fn prune_old_logs(dir: &Path, keep: usize) -> Result<(), LoggingError> {
    let mut logs: Vec<(SystemTime, PathBuf)> = fs::read_dir(dir)
        .map_err(LoggingError::io("read log directory", dir))?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "log"))
        .map(|path| {
            let modified = fs::metadata(&path)
                .and_then(|meta| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, path)
        })
        .collect();
    if logs.len() <= keep {
        return Ok(());
    }
    logs.sort_by(|a, b| b.0.cmp(&a.0));
    for (_, path) in logs.drain(keep..) {
        fs::remove_file(&path).map_err(LoggingError::io("remove old log", &path))?;
    }
    Ok(())
}

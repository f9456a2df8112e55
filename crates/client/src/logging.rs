//! File logging for a client session.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_FILE: &str = "client.log";

/// Per-user cache directory for logs, or a temp directory when the platform
/// has no home.
pub fn default_log_directory() -> PathBuf {
    directories::ProjectDirs::from("", "", "sage")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("sage"))
        .join("logs")
}

/// `session_id`, or one derived from the current time.
pub fn session_id(configured: Option<&str>) -> String {
    configured.map(str::to_owned).unwrap_or_else(|| {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        format!("session_{timestamp}")
    })
}

/// Creates `<log_dir>/<session>` and returns it.
pub fn session_directory(log_dir: &Path, session: &str) -> Result<PathBuf> {
    let dir = log_dir.join(session);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    Ok(dir)
}

/// Installs the global subscriber writing to `<log_dir>/<session>/client.log`.
///
/// `RUST_LOG` narrows or widens the filter; `info` is always on.
pub fn setup_logging(log_dir: Option<&Path>, session: Option<&str>) -> Result<PathBuf> {
    let log_dir = log_dir.map_or_else(default_log_directory, Path::to_path_buf);
    let session = session_id(session);
    let session_dir = session_directory(&log_dir, &session)?;

    let file_appender = tracing_appender::rolling::never(&session_dir, LOG_FILE);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    // The writer flushes on drop; the process keeps it until exit.
    std::mem::forget(guard);

    let log_file = session_dir.join(LOG_FILE);
    tracing::info!(target: "client", session = %session, "logging initialized");
    tracing::info!(target: "client", path = %log_file.display(), "log file");
    Ok(log_file)
}

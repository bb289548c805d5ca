//! Optional logging setup using the tracing ecosystem.
//!
//! The client only emits `tracing` events; applications that already
//! install a subscriber can ignore this module. [`init`] is for those that
//! want file logs with no further setup:
//! - Daily rotating files under the local data directory
//! - Level configuration via `RUST_LOG`

use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default filter if RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "jira_rest=info,warn";

const LOG_FILE_PREFIX: &str = "jira-rest.log";

/// Initialize file logging in the platform data directory.
///
/// - Linux: `~/.local/share/jira-rest/logs/`
/// - macOS: `~/Library/Application Support/jira-rest/logs/`
/// - Windows: `C:\Users\<User>\AppData\Local\jira-rest\logs\`
///
/// `RUST_LOG=jira_rest=debug` logs every request and response status.
///
/// # Errors
///
/// Returns an error if the log directory cannot be determined or created,
/// or if a global subscriber is already installed.
pub fn init() -> anyhow::Result<()> {
    init_in(&get_log_directory()?)
}

/// Initialize file logging in `log_dir`.
pub fn init_in(log_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(env_filter());

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "jira-rest logging started");
    tracing::debug!(log_dir = %log_dir.display(), "Log directory");

    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn get_log_directory() -> anyhow::Result<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(base_dir.join("jira-rest").join("logs"))
}

/// Where [`init`] writes logs, for display to users.
pub fn log_directory() -> Option<PathBuf> {
    get_log_directory().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_has_expected_structure() {
        let dir = log_directory().unwrap();
        assert!(dir.ends_with("jira-rest/logs"));
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn test_init_in_creates_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let log_dir = dir.path().join("logs");
        // Another test may have installed the global subscriber first.
        let _ = init_in(&log_dir);
        assert!(log_dir.is_dir());
    }
}

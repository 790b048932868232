use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dashboard_core::settings::APP_DIR_NAME;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name used when the dashboard view logs to the default location.
pub const DEFAULT_LOG_FILE: &str = "dashboard.log";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the `~/.sales-dashboard/` directory hierarchy exists and return
/// its path.
///
/// Creates the following directories if absent (including any missing parents):
/// - `~/.sales-dashboard/`
/// - `~/.sales-dashboard/logs/`
/// - `~/.sales-dashboard/data/`
pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let app_dir = home.join(APP_DIR_NAME);
    std::fs::create_dir_all(app_dir.join("logs"))?;
    std::fs::create_dir_all(app_dir.join("data"))?;
    Ok(app_dir)
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` value to an `EnvFilter` directive.
fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" | "CRITICAL" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// With `log_file` set, records are appended to that file without ANSI
/// colours; otherwise they go to stderr. Falls back to `"info"` if the level
/// string is not recognised.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, stderr_layer) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(layer), None)
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            (None, Some(layer))
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Locate the directory holding the CSV exports.
///
/// Checks `./data` in the working directory first, then
/// `~/.sales-dashboard/data/`, and returns the first one that exists.
pub fn discover_data_path() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok();
    discover_data_path_in(cwd.as_deref(), dirs::home_dir().as_deref())
}

fn discover_data_path_in(cwd: Option<&Path>, home: Option<&Path>) -> Option<PathBuf> {
    let candidates = [
        cwd.map(|d| d.join("data")),
        home.map(|h| h.join(APP_DIR_NAME).join("data")),
    ];
    candidates.into_iter().flatten().find(|p| p.is_dir())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

//! Frontend access to the log file.

use tauri::{command, AppHandle, Manager};

use crate::error::{HudError, HudResult};
use crate::logging;

fn parse_level(level: &str) -> log::Level {
    match level.to_lowercase().as_str() {
        "debug" => log::Level::Debug,
        "warn" | "warning" => log::Level::Warn,
        "error" => log::Level::Error,
        _ => log::Level::Info,
    }
}

fn log_dir(app: &AppHandle) -> HudResult<std::path::PathBuf> {
    app.path()
        .app_log_dir()
        .map_err(|e| HudError::Other(format!("Failed to get log directory: {}", e)))
}

// ============================================================================
// Tauri Commands
// ============================================================================

/// Write a log message from the frontend
#[command]
pub fn write_log(level: String, source: String, message: String) {
    log::log!(target: source.as_str(), parse_level(&level), "{}", message);
}

/// Write multiple log messages from the frontend (batch)
#[command]
pub fn write_logs(logs: Vec<(String, String, String)>) {
    for (level, source, message) in logs {
        write_log(level, source, message);
    }
}

#[command]
pub fn get_log_dir(app: AppHandle) -> HudResult<String> {
    Ok(log_dir(&app)?.to_string_lossy().to_string())
}

/// Last `lines` lines of today's log (default 100).
#[command]
pub fn get_recent_logs(app: AppHandle, lines: Option<usize>) -> HudResult<String> {
    logging::read_recent(&log_dir(&app)?, lines.unwrap_or(100))
}

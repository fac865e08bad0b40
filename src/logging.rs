//! Persistent file logging.
//!
//! Backs the `log` facade with one file per day in the app log
//! directory, rotating by size and pruning old files. The frontend's
//! console messages are forwarded here through the `write_log` command.

use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{HudError, HudResult, ResultExt};

/// Maximum log file size before rotation (5MB)
pub const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum number of log files to keep
pub const MAX_LOG_FILES: usize = 5;

const LOG_PREFIX: &str = "cs2-hud";

/// Path of today's log file.
pub fn current_log_path(log_dir: &Path) -> PathBuf {
    let date = Local::now().format("%Y-%m-%d");
    log_dir.join(format!("{}_{}.log", LOG_PREFIX, date))
}

/// One log line, newline included.
pub fn format_line(level: log::Level, target: &str, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    format!("[{}] [{}] [{}] {}\n", timestamp, level, target, message)
}

/// Delete all but the `MAX_LOG_FILES` newest `.log` files.
fn cleanup_old_logs(log_dir: &Path) {
    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };
    let mut log_files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|ext| ext == "log").unwrap_or(false))
        .collect();

    // Newest first
    log_files.sort_by(|a, b| {
        let a_time = a.metadata().and_then(|m| m.modified()).ok();
        let b_time = b.metadata().and_then(|m| m.modified()).ok();
        b_time.cmp(&a_time)
    });

    for file in log_files.into_iter().skip(MAX_LOG_FILES) {
        let _ = fs::remove_file(file.path());
    }
}

fn open_append(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

struct OpenLog {
    path: PathBuf,
    file: File,
}

pub struct FileLogger {
    dir: PathBuf,
    level: LevelFilter,
    max_size: u64,
    current: Mutex<Option<OpenLog>>,
}

impl FileLogger {
    pub fn new(dir: impl Into<PathBuf>, level: LevelFilter) -> HudResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create log directory {:?}", dir))?;

        let path = current_log_path(&dir);
        let file = open_append(&path).with_context(|| format!("Failed to open {:?}", path))?;
        cleanup_old_logs(&dir);

        Ok(Self {
            dir,
            level,
            max_size: MAX_LOG_SIZE,
            current: Mutex::new(Some(OpenLog { path, file })),
        })
    }

    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_size = bytes;
        self
    }

    fn write_line(&self, line: &str) {
        let mut current = self.current.lock();

        // New day, new file.
        let today = current_log_path(&self.dir);
        if current.as_ref().map(|open| open.path != today).unwrap_or(true) {
            *current = open_append(&today).ok().map(|file| OpenLog { path: today, file });
        }

        let Some(open) = current.as_mut() else {
            return;
        };
        let _ = open.file.write_all(line.as_bytes());
        let _ = open.file.flush();

        let oversized = fs::metadata(&open.path)
            .map(|m| m.len() > self.max_size)
            .unwrap_or(false);
        if oversized {
            let timestamp = Local::now().format("%Y-%m-%d_%H%M%S%.3f");
            let rotated = self
                .dir
                .join(format!("{}_{}.log", LOG_PREFIX, timestamp));
            let _ = fs::rename(&open.path, &rotated);
            if let Ok(file) = open_append(&open.path) {
                open.file = file;
            }
            cleanup_old_logs(&self.dir);
        }
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record.level(), record.target(), &record.args().to_string());

        // Also print to console in debug builds
        #[cfg(debug_assertions)]
        eprint!("{}", line);

        self.write_line(&line);
    }

    fn flush(&self) {
        if let Some(open) = self.current.lock().as_mut() {
            let _ = open.file.flush();
        }
    }
}

/// Install a `FileLogger` as the global logger.
pub fn init(log_dir: &Path, level: LevelFilter) -> HudResult<()> {
    let logger = FileLogger::new(log_dir, level)?;
    log::set_boxed_logger(Box::new(logger))
        .map_err(|e| HudError::Other(format!("Logger already installed: {}", e)))?;
    log::set_max_level(level);
    log::info!("[LOG] Logging to {:?}", log_dir);
    Ok(())
}

/// Last `lines` lines of today's log.
pub fn read_recent(log_dir: &Path, lines: usize) -> HudResult<String> {
    let path = current_log_path(log_dir);
    if !path.exists() {
        return Ok(String::new());
    }
    let content = fs::read_to_string(&path).context("Failed to read log file")?;
    let recent: Vec<&str> = content.lines().rev().take(lines).collect();
    Ok(recent.into_iter().rev().collect::<Vec<_>>().join("\n"))
}

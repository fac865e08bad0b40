//! Central error types for CS2 HUD.
//!
//! Read-side failures (`StorageRead`) are absorbed by the config service and
//! replaced with the default document. Write-side failures (`StorageWrite`)
//! are surfaced to whoever asked for the save. Bus and window errors are
//! logged by their callers and never reach the user.
//! All errors implement `Serialize` for Tauri IPC compatibility.

use serde::Serialize;
use thiserror::Error;

/// Main error type for CS2 HUD operations.
#[derive(Error, Debug)]
pub enum HudError {
    /// Stored document is unreadable or malformed
    #[error("Failed to read stored configuration: {0}")]
    StorageRead(String),

    /// Flushing the store to disk failed
    #[error("Failed to write configuration: {0}")]
    StorageWrite(String),

    /// Registering a bus listener failed
    #[error("Failed to subscribe to '{topic}': {reason}")]
    EventSubscription { topic: String, reason: String },

    /// Broadcasting on the bus failed
    #[error("Failed to publish on '{topic}': {reason}")]
    EventPublish { topic: String, reason: String },

    /// Window creation or focus failed
    #[error("Window error: {0}")]
    WindowHost(String),

    /// Rejected at the edit boundary
    #[error("Invalid team configuration: {0}")]
    Validation(String),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// Implement Serialize for Tauri IPC compatibility.
/// Tauri requires errors to be serializable to send to the frontend.
impl Serialize for HudError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<String> for HudError {
    fn from(msg: String) -> Self {
        HudError::Other(msg)
    }
}

impl From<&str> for HudError {
    fn from(msg: &str) -> Self {
        HudError::Other(msg.to_string())
    }
}

/// Extension trait for adding context to Results.
///
/// # Example
/// ```ignore
/// use crate::error::{HudResult, ResultExt};
///
/// fn read_log(path: &Path) -> HudResult<String> {
///     std::fs::read_to_string(path).context("failed to read log file")
/// }
/// ```
pub trait ResultExt<T> {
    /// Add context to an error, converting it to HudError::Other.
    fn context(self, msg: &str) -> HudResult<T>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F: FnOnce() -> String>(self, f: F) -> HudResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn context(self, msg: &str) -> HudResult<T> {
        self.map_err(|e| HudError::Other(format!("{}: {}", msg, e)))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> HudResult<T> {
        self.map_err(|e| HudError::Other(format!("{}: {}", f(), e)))
    }
}

/// Type alias for Results using HudError.
pub type HudResult<T> = Result<T, HudError>;

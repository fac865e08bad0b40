//! Application-level configuration.
//!
//! Contains settings that affect app-wide behavior:
//! - Store file name for the team document
//! - Log level
//! - Overlay window geometry
//!
//! Team data never lives here; see `config::team` and the sync module.
//! Uses `parking_lot::RwLock` for thread-safe access.

use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::app::window_host::WindowSpec;

/// Environment override for the store file name.
pub const STORE_FILE_ENV: &str = "CS2_HUD_STORE_FILE";

/// Environment override for the log level.
pub const LOG_LEVEL_ENV: &str = "CS2_HUD_LOG";

lazy_static! {
    /// Global app configuration.
    pub static ref APP_CONFIG: RwLock<AppConfig> = RwLock::new(AppConfig::default());
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// File holding the team document, relative to the app data dir.
    pub store_file: String,
    /// `log` level filter name (`error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: String,
    pub overlay: WindowSpec,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_file: "team-config.json".to_string(),
            log_level: "info".to_string(),
            overlay: WindowSpec::overlay(),
        }
    }
}

impl AppConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(file) = lookup(STORE_FILE_ENV).filter(|f| !f.trim().is_empty()) {
            self.store_file = file;
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|l| !l.trim().is_empty()) {
            self.log_level = level;
        }
        self
    }

    /// Parsed log level, falling back to `Info` for unknown names.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level
            .parse()
            .unwrap_or(log::LevelFilter::Info)
    }
}

/// Current app configuration snapshot.
pub fn app_config() -> AppConfig {
    APP_CONFIG.read().clone()
}

/// Replace the app configuration.
pub fn set_app_config(config: AppConfig) {
    log::debug!("[APP_CONFIG] set_app_config({:?})", config);
    *APP_CONFIG.write() = config;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.store_file, "team-config.json");
        assert_eq!(config.level_filter(), log::LevelFilter::Info);
        assert_eq!(config.overlay.label, "overlay");
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::default().with_overrides(|name| match name {
            STORE_FILE_ENV => Some("scrim.json".to_string()),
            LOG_LEVEL_ENV => Some("debug".to_string()),
            _ => None,
        });
        assert_eq!(config.store_file, "scrim.json");
        assert_eq!(config.level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_blank_overrides_are_ignored() {
        let config = AppConfig::default().with_overrides(|_| Some("  ".to_string()));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let config = AppConfig {
            log_level: "chatty".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn test_set_app_config() {
        let custom = AppConfig {
            store_file: "custom.json".to_string(),
            ..AppConfig::default()
        };
        set_app_config(custom.clone());
        assert_eq!(app_config(), custom);
        set_app_config(AppConfig::default());
    }
}

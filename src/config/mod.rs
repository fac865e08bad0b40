//! Configuration types.
//!
//! ## Architecture
//!
//! - `TeamConfig`: the persisted team document shared by every window
//! - `AppConfig`: process settings (store file, log level, overlay window)
//!
//! `AppConfig` sits behind a global `parking_lot::RwLock` like other
//! process settings. `TeamConfig` never does: each window owns its own
//! cached copy (see `sync::cache`).

pub mod app;
pub mod team;

pub use app::{app_config, AppConfig, APP_CONFIG};
pub use team::{FieldUpdate, TeamConfig, TEAM_CONFIG_KEY};

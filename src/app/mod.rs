//! Application lifecycle and window integration.
//!
//! - `window_host`: create-or-focus over a pluggable window backend
//! - `state`: managed state with one config session per window
//! - `events`: window event handlers (`app` feature)
//! - `tauri_window`: Tauri implementation of the window backend (`app` feature)

pub mod state;
pub mod window_host;

#[cfg(feature = "app")]
pub mod events;
#[cfg(feature = "app")]
pub mod tauri_window;

pub use state::HudState;
pub use window_host::{WindowAction, WindowBackend, WindowHost, WindowSpec, OVERLAY_WINDOW_LABEL};

/// Control panel window label
pub const MAIN_WINDOW_LABEL: &str = "main";

use tauri::{command, State};

use crate::app::tauri_window::TauriWindowBackend;
use crate::app::WindowHost;
use crate::config::app_config;
use crate::error::HudResult;

pub type OverlayHost = WindowHost<TauriWindowBackend>;

/// Open the overlay, or focus it if it is already open. Failures are
/// logged, never returned.
#[command]
pub async fn create_overlay_window(host: State<'_, OverlayHost>) -> HudResult<()> {
    host.show(&app_config().overlay).await;
    Ok(())
}

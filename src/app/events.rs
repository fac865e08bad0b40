//! Window event handlers.

use tauri::{Emitter, EventTarget, Manager, Window, WindowEvent};

use super::state::HudState;
use super::{MAIN_WINDOW_LABEL, OVERLAY_WINDOW_LABEL};
use crate::sync::TEAM_CONFIG_UPDATED;

/// Called from the Tauri builder's `on_window_event` hook.
pub fn handle_window_event(window: &Window, event: &WindowEvent) {
    match event {
        // Fix Windows resize lag by adding small delay
        // See: https://github.com/tauri-apps/tauri/issues/6322#issuecomment-2495685888
        #[cfg(target_os = "windows")]
        WindowEvent::Resized(_) => {
            std::thread::sleep(std::time::Duration::from_millis(1));
        },

        // The overlay has no controls of its own; close it with the panel.
        WindowEvent::CloseRequested { .. } if window.label() == MAIN_WINDOW_LABEL => {
            if let Some(overlay) = window.app_handle().get_webview_window(OVERLAY_WINDOW_LABEL) {
                log::info!("[WINDOW] Control panel closing, closing overlay");
                let _ = overlay.destroy();
            }
        },

        // Refetch on focus: a window that missed bus updates catches up here.
        WindowEvent::Focused(true) => {
            let window = window.clone();
            tauri::async_runtime::spawn(async move {
                let Some(state) = window.try_state::<HudState>() else {
                    return;
                };
                let label = window.label().to_string();
                let config = state.refresh(&label).await;
                let target = EventTarget::webview_window(label.as_str());
                if let Err(e) = window.emit_to(target, TEAM_CONFIG_UPDATED.name(), &config) {
                    log::warn!("[WINDOW] Failed to refresh '{}': {}", label, e);
                }
            });
        },

        // Drop the window's session so its bus subscription goes with it.
        WindowEvent::Destroyed => {
            if let Some(state) = window.try_state::<HudState>() {
                state.close_session(window.label());
            }
        },

        _ => {},
    }
}

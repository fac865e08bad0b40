//! CS2 HUD: a team configuration panel and a scoreboard overlay kept in
//! sync across windows.
//!
//! ## Architecture
//!
//! ```text
//! config/    - TeamConfig document, app settings
//! sync/      - store, event bus, per-window cache, load/save service
//! overlay.rs - Expanded/Condensed mode derived from updates
//! app/       - managed state, window host, window events
//! logging.rs - daily rotating log files
//! commands/  - Tauri IPC handlers (`app` feature)
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod overlay;
pub mod sync;

#[cfg(feature = "app")]
mod commands;

#[cfg(feature = "app")]
use tauri::Manager;

#[cfg(feature = "app")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use std::sync::Arc;

    use crate::app::tauri_window::TauriWindowBackend;
    use crate::app::{HudState, WindowHost, MAIN_WINDOW_LABEL};
    use crate::sync::tauri_bus::TauriBus;

    let settings = config::AppConfig::from_env();
    config::app::set_app_config(settings.clone());

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            // Second launch: bring the existing control panel forward.
            if let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) {
                let _ = window.show();
                let _ = window.set_focus();
            }
        }))
        .plugin(tauri_plugin_store::Builder::default().build())
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_window_state::Builder::default().build())
        .on_window_event(crate::app::events::handle_window_event)
        .invoke_handler(tauri::generate_handler![
            // Team config commands
            commands::team_config::load_team_config,
            commands::team_config::get_cached_team_config,
            commands::team_config::save_team_config,
            commands::team_config::update_team_config_field,
            commands::team_config::toggle_condensed_mode,
            // Window commands
            commands::window::create_overlay_window,
            // Logging commands
            commands::logging::write_log,
            commands::logging::write_logs,
            commands::logging::get_log_dir,
            commands::logging::get_recent_logs,
        ])
        .setup(move |app| {
            match app.path().app_log_dir() {
                Ok(dir) => {
                    if let Err(e) = logging::init(&dir, settings.level_filter()) {
                        eprintln!("Failed to initialize logging: {}", e);
                    }
                },
                Err(e) => eprintln!("Failed to get log directory: {}", e),
            }

            let handle = app.handle().clone();
            let store = tauri::async_runtime::block_on(sync::plugin_store::open_store(
                &handle,
                &settings.store_file,
            ));
            let bus: Arc<dyn sync::EventBus> = Arc::new(TauriBus::new(handle.clone()));

            app.manage(HudState::new(store, bus));
            app.manage(WindowHost::new(TauriWindowBackend::new(handle)));

            log::info!("[APP] CS2 HUD started");
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

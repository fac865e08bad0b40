//! `WindowBackend` over Tauri webview windows.

use async_trait::async_trait;
use tauri::{AppHandle, Manager, Runtime, WebviewUrl, WebviewWindowBuilder, Wry};

use super::window_host::{WindowBackend, WindowSpec};
use crate::error::{HudError, HudResult};

pub struct TauriWindowBackend<R: Runtime = Wry> {
    app: AppHandle<R>,
}

impl<R: Runtime> TauriWindowBackend<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }
}

#[async_trait]
impl<R: Runtime> WindowBackend for TauriWindowBackend<R> {
    fn exists(&self, label: &str) -> bool {
        self.app.get_webview_window(label).is_some()
    }

    async fn create(&self, spec: &WindowSpec) -> HudResult<()> {
        WebviewWindowBuilder::new(
            &self.app,
            spec.label.as_str(),
            WebviewUrl::App(spec.url.clone().into()),
        )
        .title(spec.title.as_str())
        .inner_size(spec.width, spec.height)
        .resizable(spec.resizable)
        .always_on_top(spec.always_on_top)
        .build()
        .map_err(|e| HudError::WindowHost(format!("Failed to create '{}': {}", spec.label, e)))?;
        Ok(())
    }

    async fn focus(&self, label: &str) -> HudResult<()> {
        let window = self
            .app
            .get_webview_window(label)
            .ok_or_else(|| HudError::WindowHost(format!("Window '{}' not found", label)))?;
        window
            .show()
            .map_err(|e| HudError::WindowHost(format!("Failed to show '{}': {}", label, e)))?;
        window
            .set_focus()
            .map_err(|e| HudError::WindowHost(format!("Failed to focus '{}': {}", label, e)))?;
        Ok(())
    }
}

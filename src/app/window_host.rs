//! Create-or-focus for the overlay window.
//!
//! The actual window machinery is a `WindowBackend`; this module only
//! decides between creating and focusing, which is what makes repeated
//! "Show Overlay" requests idempotent. Callers log failures and carry on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::HudResult;

/// Overlay window label
pub const OVERLAY_WINDOW_LABEL: &str = "overlay";

/// Everything needed to build a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSpec {
    pub label: String,
    /// Page inside the bundled frontend.
    pub url: String,
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub resizable: bool,
    pub always_on_top: bool,
}

impl WindowSpec {
    /// 1080p scoreboard on an opaque chroma-key background, kept above
    /// the game so capture software can grab it.
    pub fn overlay() -> Self {
        Self {
            label: OVERLAY_WINDOW_LABEL.to_string(),
            url: "overlay.html".to_string(),
            title: "CS2 HUD Overlay".to_string(),
            width: 1920.0,
            height: 1080.0,
            resizable: true,
            always_on_top: true,
        }
    }
}

/// Primitive window operations supplied by the host toolkit.
#[async_trait]
pub trait WindowBackend: Send + Sync {
    fn exists(&self, label: &str) -> bool;

    async fn create(&self, spec: &WindowSpec) -> HudResult<()>;

    /// Show and focus an existing window.
    async fn focus(&self, label: &str) -> HudResult<()>;
}

/// What `create_or_focus` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAction {
    Created,
    Focused,
}

pub struct WindowHost<B> {
    backend: B,
    // Serializes create-or-focus so two quick clicks cannot both create.
    gate: Mutex<()>,
}

impl<B: WindowBackend> WindowHost<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            gate: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Focus the window if it exists, otherwise create it.
    pub async fn create_or_focus(&self, spec: &WindowSpec) -> HudResult<WindowAction> {
        let _guard = self.gate.lock().await;

        if self.backend.exists(&spec.label) {
            log::debug!("[WINDOW] Focusing existing '{}'", spec.label);
            self.backend.focus(&spec.label).await?;
            return Ok(WindowAction::Focused);
        }

        log::info!("[WINDOW] Creating '{}' ({})", spec.label, spec.url);
        self.backend.create(spec).await?;
        Ok(WindowAction::Created)
    }

    /// `create_or_focus` for fire-and-forget callers: failures are logged
    /// and swallowed.
    pub async fn show(&self, spec: &WindowSpec) {
        if let Err(e) = self.create_or_focus(spec).await {
            log::error!("[WINDOW] Failed to show '{}': {}", spec.label, e);
        }
    }
}

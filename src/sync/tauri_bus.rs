//! `EventBus` over Tauri's global event system.
//!
//! `emit` reaches every webview and every backend listener, so the
//! control panel, the overlay and the Rust-side sessions all share one
//! channel per topic.

use async_trait::async_trait;
use serde_json::Value;
use tauri::{AppHandle, Emitter, Listener, Runtime, Wry};

use super::bus::{EventBus, RawHandler, Subscription};
use crate::error::{HudError, HudResult};

pub struct TauriBus<R: Runtime = Wry> {
    app: AppHandle<R>,
}

impl<R: Runtime> TauriBus<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }
}

#[async_trait]
impl<R: Runtime> EventBus for TauriBus<R> {
    async fn publish_raw(&self, topic: &str, payload: Value) -> HudResult<()> {
        self.app.emit(topic, payload).map_err(|e| HudError::EventPublish {
            topic: topic.to_string(),
            reason: e.to_string(),
        })
    }

    async fn subscribe_raw(&self, topic: &str, handler: RawHandler) -> HudResult<Subscription> {
        let name = topic.to_string();
        let id = self.app.listen(topic, move |event| {
            match serde_json::from_str::<Value>(event.payload()) {
                Ok(payload) => handler(payload),
                Err(e) => log::warn!("[BUS] Unreadable payload on '{}': {}", name, e),
            }
        });
        log::debug!("[BUS] Listening on '{}' ({:?})", topic, id);

        let app = self.app.clone();
        Ok(Subscription::new(topic, move || app.unlisten(id)))
    }
}

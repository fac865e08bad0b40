//! `PersistentStore` over `tauri-plugin-store`.
//!
//! Autosave is disabled: nothing reaches disk until `flush`, which is
//! what lets `ConfigService::save` roll back a failed write.

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tauri::{AppHandle, Manager, Runtime, Wry};
use tauri_plugin_store::{Store, StoreBuilder};

use super::store::{JsonFileStore, PersistentStore};
use crate::error::{HudError, HudResult};

pub struct PluginStore<R: Runtime = Wry> {
    store: Arc<Store<R>>,
}

impl<R: Runtime> PluginStore<R> {
    /// Load `file` from the app data directory.
    pub fn open(app: &AppHandle<R>, file: &str) -> HudResult<Self> {
        let store = StoreBuilder::new(app, file)
            .disable_auto_save()
            .build()
            .map_err(|e| HudError::StorageRead(format!("Failed to load {}: {}", file, e)))?;
        Ok(Self { store })
    }
}

#[async_trait]
impl<R: Runtime> PersistentStore for PluginStore<R> {
    async fn get(&self, key: &str) -> HudResult<Option<Value>> {
        Ok(self.store.get(key))
    }

    async fn set(&self, key: &str, value: Value) {
        self.store.set(key, value);
    }

    async fn delete(&self, key: &str) {
        self.store.delete(key);
    }

    async fn flush(&self) -> HudResult<()> {
        self.store
            .save()
            .map_err(|e| HudError::StorageWrite(e.to_string()))
    }
}

/// Open the plugin store, falling back to a `JsonFileStore` on the same
/// file when the plugin refuses to load it (corrupt JSON). The fallback
/// reports the read error on `get`, so windows start from the default
/// and the next save overwrites the bad file.
pub async fn open_store<R: Runtime>(app: &AppHandle<R>, file: &str) -> Arc<dyn PersistentStore> {
    match PluginStore::open(app, file) {
        Ok(store) => {
            log::info!("[STORE] Opened {}", file);
            Arc::new(store)
        },
        Err(e) => {
            log::error!("[STORE] {}; falling back to direct file access", e);
            let path = app
                .path()
                .app_data_dir()
                .map(|dir| dir.join(file))
                .unwrap_or_else(|_| PathBuf::from(file));
            Arc::new(JsonFileStore::open(path).await)
        },
    }
}

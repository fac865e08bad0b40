//! Durable key/value document storage.
//!
//! Mutation and persistence are separate steps: `set` only touches the
//! in-memory map, `flush` writes it out. Nothing autosaves.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::error::{HudError, HudResult};

/// Key/value store with an explicit flush.
#[async_trait]
pub trait PersistentStore: Send + Sync {
    /// Value under `key`. A store whose file does not exist yet is empty,
    /// not an error. An unreadable store yields `StorageRead`.
    async fn get(&self, key: &str) -> HudResult<Option<Value>>;

    /// Replace the in-memory value under `key`.
    async fn set(&self, key: &str, value: Value);

    /// Drop an in-memory value. Only used to undo an unflushed `set`.
    async fn delete(&self, key: &str);

    /// Persist every pending `set`. Failures are `StorageWrite`.
    async fn flush(&self) -> HudResult<()>;
}

#[derive(Default)]
struct StoreState {
    entries: Map<String, Value>,
    /// Why the backing file could not be read at open, until the next `set`.
    read_error: Option<String>,
}

/// A JSON object in a single file.
pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl JsonFileStore {
    /// Open the store at `path`, reading the file if it exists.
    ///
    /// Never fails: a missing file is an empty store, and an unreadable one
    /// is remembered and reported by `get`.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Map<String, Value>>(&bytes) {
                Ok(entries) => {
                    log::debug!("[STORE] Loaded {} key(s) from {:?}", entries.len(), path);
                    StoreState {
                        entries,
                        read_error: None,
                    }
                },
                Err(e) => {
                    log::warn!("[STORE] {:?} is not a JSON object: {}", path, e);
                    StoreState {
                        entries: Map::new(),
                        read_error: Some(format!("{:?} is malformed: {}", path, e)),
                    }
                },
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("[STORE] {:?} does not exist yet", path);
                StoreState::default()
            },
            Err(e) => {
                log::warn!("[STORE] Failed to read {:?}: {}", path, e);
                StoreState {
                    entries: Map::new(),
                    read_error: Some(format!("Failed to read {:?}: {}", path, e)),
                }
            },
        };

        Self {
            path,
            state: Mutex::new(state),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl PersistentStore for JsonFileStore {
    async fn get(&self, key: &str) -> HudResult<Option<Value>> {
        let state = self.state.lock();
        if let Some(reason) = &state.read_error {
            return Err(HudError::StorageRead(reason.clone()));
        }
        Ok(state.entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) {
        let mut state = self.state.lock();
        state.entries.insert(key.to_string(), value);
        state.read_error = None;
    }

    async fn delete(&self, key: &str) {
        self.state.lock().entries.remove(key);
    }

    async fn flush(&self) -> HudResult<()> {
        let bytes = {
            let state = self.state.lock();
            serde_json::to_vec_pretty(&state.entries)
                .map_err(|e| HudError::StorageWrite(format!("Failed to encode store: {}", e)))?
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                HudError::StorageWrite(format!("Failed to create {:?}: {}", parent, e))
            })?;
        }

        // Write next to the target and swap it in so a failed write
        // leaves the last flushed file intact.
        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes)
            .await
            .map_err(|e| HudError::StorageWrite(format!("Failed to write {:?}: {}", temp, e)))?;
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(HudError::StorageWrite(format!(
                "Failed to replace {:?}: {}",
                self.path, e
            )));
        }

        log::debug!("[STORE] Flushed {} bytes to {:?}", bytes.len(), self.path);
        Ok(())
    }
}

//! Load and save orchestration for one window.
//!
//! `load` pulls from the store into the window's cache and never fails.
//! `save` writes, flushes, updates the local cache and only then
//! publishes, so the saving window never sees a stale copy of its own
//! write. The cache is told to expect the echo of that publish.
//! A failed flush surfaces as `StorageWrite` with nothing else
//! observable: no cache update, no publish, store entry rolled back.

use serde_json::Value;
use std::sync::Arc;

use super::bus::{EventBus, EventBusExt};
use super::cache::ConfigCache;
use super::store::PersistentStore;
use super::topic::TEAM_CONFIG_UPDATED;
use crate::config::{FieldUpdate, TeamConfig, TEAM_CONFIG_KEY};
use crate::error::{HudError, HudResult};

pub struct ConfigService {
    store: Arc<dyn PersistentStore>,
    bus: Arc<dyn EventBus>,
    cache: Arc<ConfigCache>,
}

impl ConfigService {
    pub fn new(
        store: Arc<dyn PersistentStore>,
        bus: Arc<dyn EventBus>,
        cache: Arc<ConfigCache>,
    ) -> Self {
        Self { store, bus, cache }
    }

    pub fn cache(&self) -> &Arc<ConfigCache> {
        &self.cache
    }

    /// Read the stored document into the cache. Missing, unreadable or
    /// undecodable documents resolve to `TeamConfig::default()`.
    pub async fn load(&self) -> TeamConfig {
        let config = match self.store.get(TEAM_CONFIG_KEY).await {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
                log::warn!("[CONFIG] Stored team config does not decode, using default: {}", e);
                TeamConfig::default()
            }),
            Ok(None) => {
                log::debug!("[CONFIG] No stored team config, using default");
                TeamConfig::default()
            },
            Err(e) => {
                log::warn!("[CONFIG] {}; using default", e);
                TeamConfig::default()
            },
        };

        log::debug!("[CONFIG] {} loaded {:?}", self.cache.window(), config);
        self.cache.replace(config.clone());
        config
    }

    /// Persist `config` as the whole document and announce it.
    ///
    /// No validation happens here; that belongs to the edit boundary.
    pub async fn save(&self, config: TeamConfig) -> HudResult<TeamConfig> {
        let value = serde_json::to_value(&config)
            .map_err(|e| HudError::StorageWrite(format!("Failed to encode team config: {}", e)))?;

        let previous = self.store.get(TEAM_CONFIG_KEY).await.ok().flatten();
        self.store.set(TEAM_CONFIG_KEY, value).await;

        if let Err(e) = self.store.flush().await {
            self.roll_back(previous).await;
            log::error!("[CONFIG] Save from {} failed: {}", self.cache.window(), e);
            return Err(match e {
                HudError::StorageWrite(_) => e,
                other => HudError::StorageWrite(other.to_string()),
            });
        }

        self.cache.replace(config.clone());

        self.cache.expect_echo(&config);
        if let Err(e) = self.bus.publish(TEAM_CONFIG_UPDATED, &config).await {
            // The save itself succeeded; other windows catch up on next load.
            self.cache.cancel_echo(&config);
            log::warn!("[CONFIG] Saved but could not announce update: {}", e);
        }

        log::info!(
            "[CONFIG] {} saved team config ({} vs {})",
            self.cache.window(),
            config.ct_name,
            config.t_name
        );
        Ok(config)
    }

    /// Save a copy of the cached document with one field overwritten.
    pub async fn toggle(&self, update: FieldUpdate) -> HudResult<TeamConfig> {
        log::debug!("[CONFIG] {} toggling {:?}", self.cache.window(), update);
        let next = self.cache.current().with_field(update);
        self.save(next).await
    }

    async fn roll_back(&self, previous: Option<Value>) {
        match previous {
            Some(value) => self.store.set(TEAM_CONFIG_KEY, value).await,
            None => self.store.delete(TEAM_CONFIG_KEY).await,
        }
    }
}

//! Window startup: subscribe, then pull.
//!
//! The bus never replays, and a subscription only becomes live once
//! `subscribe` resolves. A window therefore subscribes first and then does
//! an authoritative `load()`; bus events are incremental updates on top
//! of that pull. A publish that lands between the two is either already
//! in the store (saves flush before they publish) or delivered to the
//! now-live subscription.

use std::sync::Arc;

use super::bus::{EventBus, Subscription};
use super::cache::ConfigCache;
use super::service::ConfigService;
use super::store::PersistentStore;
use crate::config::TeamConfig;

/// Everything one window owns: its cache, its service and its
/// subscription. Dropping the session unsubscribes.
pub struct WindowSession {
    service: ConfigService,
    subscription: Option<Subscription>,
}

impl WindowSession {
    /// Bring a window's view of the team document up.
    ///
    /// A failed subscription is logged and the session carries on without
    /// live updates; explicit `reload()` calls still see fresh data.
    pub async fn open(
        window: impl Into<String>,
        store: Arc<dyn PersistentStore>,
        bus: Arc<dyn EventBus>,
    ) -> Self {
        let cache = Arc::new(ConfigCache::new(window));

        let subscription = match cache.attach(bus.as_ref()).await {
            Ok(sub) => Some(sub),
            Err(e) => {
                log::error!(
                    "[CONFIG] {} will not receive live updates: {}",
                    cache.window(),
                    e
                );
                None
            },
        };

        let service = ConfigService::new(store, bus, cache);
        service.load().await;

        Self {
            service,
            subscription,
        }
    }

    pub fn service(&self) -> &ConfigService {
        &self.service
    }

    pub fn cache(&self) -> &Arc<ConfigCache> {
        self.service.cache()
    }

    pub fn window(&self) -> &str {
        self.service.cache().window()
    }

    /// Whether bus updates reach this window.
    pub fn is_live(&self) -> bool {
        self.subscription.is_some()
    }

    /// Discard the cached snapshot and pull again.
    pub async fn reload(&self) -> TeamConfig {
        self.service.load().await
    }
}

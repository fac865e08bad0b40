//! Per-window cache of the team document.
//!
//! Each window constructs its own `ConfigCache`; nothing about it is
//! process-global. Updates are unconditional replaces (last writer wins).
//! There is no merge, no timestamp and no staleness check, so two windows
//! may briefly disagree until the bus catches the slower one up.
//!
//! A window also hears its own publishes. Each save registers the document
//! it is about to publish as an expected echo, and the bus handler drops
//! those echoes instead of replaying an older own write over a newer one.

use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use super::bus::{EventBus, EventBusExt, Subscription};
use super::topic::TEAM_CONFIG_UPDATED;
use crate::config::TeamConfig;
use crate::error::HudResult;

/// Callback run after the cached value changes.
pub type ChangeHandler = Arc<dyn Fn(&TeamConfig) + Send + Sync>;

/// Own publishes awaiting their echo. Oldest are dropped past this.
pub const MAX_PENDING_ECHOES: usize = 16;

pub struct ConfigCache {
    window: String,
    value: watch::Sender<TeamConfig>,
    handlers: RwLock<Vec<ChangeHandler>>,
    /// Set once `attach` succeeds; without it no echo will ever arrive.
    attached: AtomicBool,
    echoes: Mutex<VecDeque<TeamConfig>>,
}

impl ConfigCache {
    /// Empty cache for `window`, holding the default document until the
    /// first load or bus event.
    pub fn new(window: impl Into<String>) -> Self {
        Self::with_value(window, TeamConfig::default())
    }

    pub fn with_value(window: impl Into<String>, config: TeamConfig) -> Self {
        let (value, _) = watch::channel(config);
        Self {
            window: window.into(),
            value,
            handlers: RwLock::new(Vec::new()),
            attached: AtomicBool::new(false),
            echoes: Mutex::new(VecDeque::new()),
        }
    }

    /// Label of the owning window.
    pub fn window(&self) -> &str {
        &self.window
    }

    /// Last value observed from a load, a save or the bus.
    pub fn current(&self) -> TeamConfig {
        self.value.borrow().clone()
    }

    /// Replace the cached document. Returns whether the value changed;
    /// change handlers only run when it did.
    pub fn replace(&self, next: TeamConfig) -> bool {
        let changed = self.value.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });

        if changed {
            let snapshot = self.current();
            log::debug!("[CACHE] {} now holds {:?}", self.window, snapshot);
            let handlers = self.handlers.read().clone();
            for handler in handlers {
                handler(&snapshot);
            }
        }
        changed
    }

    /// Run `handler` with the new value after every change.
    pub fn on_change(&self, handler: impl Fn(&TeamConfig) + Send + Sync + 'static) {
        self.handlers.write().push(Arc::new(handler));
    }

    /// Receiver for async consumers (renderers, tests).
    pub fn watch(&self) -> watch::Receiver<TeamConfig> {
        self.value.subscribe()
    }

    /// Record `config` as about to be published by this window, so its
    /// echo is skipped. No-op while the cache is not attached.
    pub fn expect_echo(&self, config: &TeamConfig) {
        if !self.attached.load(Ordering::SeqCst) {
            return;
        }
        let mut echoes = self.echoes.lock();
        if echoes.len() == MAX_PENDING_ECHOES {
            echoes.pop_front();
        }
        echoes.push_back(config.clone());
    }

    /// Withdraw the newest expectation for `config` (its publish failed).
    pub fn cancel_echo(&self, config: &TeamConfig) {
        let mut echoes = self.echoes.lock();
        if let Some(index) = echoes.iter().rposition(|c| c == config) {
            echoes.remove(index);
        }
    }

    /// True if `config` is one of our own pending publishes. Echoes arrive
    /// in publish order, so anything queued before it was lost and is
    /// dropped too.
    fn take_echo(&self, config: &TeamConfig) -> bool {
        let mut echoes = self.echoes.lock();
        match echoes.iter().position(|c| c == config) {
            Some(index) => {
                echoes.drain(..=index);
                true
            },
            None => false,
        }
    }

    /// Follow `TEAM_CONFIG_UPDATED` on `bus`. Every foreign payload
    /// overwrites the whole cached document. Delivery stops when the
    /// returned subscription is dropped or the cache is gone.
    pub async fn attach(self: &Arc<Self>, bus: &dyn EventBus) -> HudResult<Subscription> {
        let cache = Arc::downgrade(self);
        let subscription = bus
            .subscribe(TEAM_CONFIG_UPDATED, move |config: TeamConfig| {
                let Some(cache) = cache.upgrade() else {
                    return;
                };
                if cache.take_echo(&config) {
                    log::trace!("[CACHE] {} skipped its own echo", cache.window);
                    return;
                }
                cache.replace(config);
            })
            .await?;
        self.attached.store(true, Ordering::SeqCst);
        Ok(subscription)
    }
}

impl std::fmt::Debug for ConfigCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigCache")
            .field("window", &self.window)
            .field("value", &*self.value.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::bus::LocalBus;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn alpha_beta() -> TeamConfig {
        TeamConfig {
            ct_name: "Alpha".to_string(),
            t_name: "Beta".to_string(),
            ..TeamConfig::default()
        }
    }

    #[test]
    fn test_new_cache_holds_default() {
        let cache = ConfigCache::new("main");
        assert_eq!(cache.window(), "main");
        assert_eq!(cache.current(), TeamConfig::default());
    }

    #[test]
    fn test_replace_is_unconditional_overwrite() {
        let cache = ConfigCache::with_value("main", alpha_beta());
        let sparse = TeamConfig {
            ct_name: "Gamma".to_string(),
            t_name: "Delta".to_string(),
            ct_logo_url: None,
            t_logo_url: None,
            is_condensed: None,
        };

        assert!(cache.replace(sparse.clone()));
        assert_eq!(cache.current(), sparse);
    }

    #[test]
    fn test_handlers_run_only_on_change() {
        let cache = ConfigCache::new("overlay");
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        cache.on_change(move |config| {
            assert_eq!(config.ct_name, "Alpha");
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert!(cache.replace(alpha_beta()));
        assert!(!cache.replace(alpha_beta()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_watch_sees_replacements() {
        let cache = ConfigCache::new("overlay");
        let mut rx = cache.watch();

        cache.replace(alpha_beta());
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), alpha_beta());
    }

    #[tokio::test]
    async fn test_attach_follows_bus_updates() {
        let bus = LocalBus::new();
        let cache = Arc::new(ConfigCache::new("overlay"));
        let _sub = cache.attach(&bus).await.unwrap();

        bus.publish(TEAM_CONFIG_UPDATED, &alpha_beta()).await.unwrap();

        let mut rx = cache.watch();
        tokio::time::timeout(Duration::from_secs(1), rx.wait_for(|c| *c == alpha_beta()))
            .await
            .expect("update not delivered")
            .unwrap();
        assert_eq!(cache.current(), alpha_beta());
    }

    fn navi_vitality() -> TeamConfig {
        TeamConfig {
            ct_name: "NAVI".to_string(),
            t_name: "Vitality".to_string(),
            ..TeamConfig::default()
        }
    }

    #[tokio::test]
    async fn test_own_echo_is_skipped() {
        let bus = LocalBus::new();
        let cache = Arc::new(ConfigCache::new("main"));
        let _sub = cache.attach(&bus).await.unwrap();

        // Two back-to-back own saves, echoes still in flight.
        for config in [alpha_beta(), navi_vitality()] {
            cache.replace(config.clone());
            cache.expect_echo(&config);
            bus.publish(TEAM_CONFIG_UPDATED, &config).await.unwrap();
        }

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(cache.current(), navi_vitality());
        assert!(cache.echoes.lock().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_update_between_own_echoes_applies() {
        let bus = LocalBus::new();
        let cache = Arc::new(ConfigCache::new("main"));
        let _sub = cache.attach(&bus).await.unwrap();

        cache.replace(alpha_beta());
        cache.expect_echo(&alpha_beta());
        bus.publish(TEAM_CONFIG_UPDATED, &alpha_beta()).await.unwrap();
        bus.publish(TEAM_CONFIG_UPDATED, &navi_vitality()).await.unwrap();

        let mut rx = cache.watch();
        tokio::time::timeout(Duration::from_secs(1), rx.wait_for(|c| *c == navi_vitality()))
            .await
            .expect("foreign update not applied")
            .unwrap();
    }

    #[test]
    fn test_detached_cache_expects_nothing() {
        let cache = ConfigCache::new("main");
        cache.expect_echo(&alpha_beta());
        assert!(cache.echoes.lock().is_empty());
    }

    #[tokio::test]
    async fn test_pending_echoes_are_bounded() {
        let bus = LocalBus::new();
        let cache = Arc::new(ConfigCache::new("main"));
        let _sub = cache.attach(&bus).await.unwrap();

        for n in 0..MAX_PENDING_ECHOES + 4 {
            cache.expect_echo(&TeamConfig {
                ct_name: format!("CT {}", n),
                ..TeamConfig::default()
            });
        }
        cache.cancel_echo(&TeamConfig {
            ct_name: format!("CT {}", MAX_PENDING_ECHOES + 3),
            ..TeamConfig::default()
        });
        assert_eq!(cache.echoes.lock().len(), MAX_PENDING_ECHOES - 1);
    }

    #[tokio::test]
    async fn test_dropped_cache_ignores_later_events() {
        let bus = LocalBus::new();
        let cache = Arc::new(ConfigCache::new("overlay"));
        let sub = cache.attach(&bus).await.unwrap();
        drop(cache);

        // The delivery task must not panic on a dead cache.
        bus.publish(TEAM_CONFIG_UPDATED, &alpha_beta()).await.unwrap();
        tokio::task::yield_now().await;
        sub.unsubscribe();
    }
}

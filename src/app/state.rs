//! Managed application state.
//!
//! Holds the shared store and bus, plus one `WindowSession` per window
//! label. Sessions are opened lazily on a window's first request and
//! dropped (unsubscribing them) when the window is destroyed.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use super::window_host::OVERLAY_WINDOW_LABEL;
use crate::config::TeamConfig;
use crate::overlay::{ModeTracker, OverlayMode};
use crate::sync::{EventBus, PersistentStore, WindowSession};

/// Called on every Expanded/Condensed transition of the overlay.
pub type ModeHook = Arc<dyn Fn(OverlayMode) + Send + Sync>;

pub struct HudState {
    store: Arc<dyn PersistentStore>,
    bus: Arc<dyn EventBus>,
    sessions: Mutex<HashMap<String, Arc<WindowSession>>>,
    on_mode: ModeHook,
}

impl HudState {
    pub fn new(store: Arc<dyn PersistentStore>, bus: Arc<dyn EventBus>) -> Self {
        Self::with_mode_hook(store, bus, |mode| {
            log::info!("[OVERLAY] Scoreboard is now {:?}", mode);
        })
    }

    pub fn with_mode_hook(
        store: Arc<dyn PersistentStore>,
        bus: Arc<dyn EventBus>,
        on_mode: impl Fn(OverlayMode) + Send + Sync + 'static,
    ) -> Self {
        Self {
            store,
            bus,
            sessions: Mutex::new(HashMap::new()),
            on_mode: Arc::new(on_mode),
        }
    }

    /// Session for `window`, opening it (subscribe, then load) on first use.
    pub async fn session(&self, window: &str) -> Arc<WindowSession> {
        let existing = self.sessions.lock().get(window).cloned();
        if let Some(session) = existing {
            return session;
        }

        let opened =
            Arc::new(WindowSession::open(window, self.store.clone(), self.bus.clone()).await);

        // Another request may have opened it while we were loading.
        let (session, inserted) = {
            let mut sessions = self.sessions.lock();
            match sessions.get(window) {
                Some(winner) => (winner.clone(), false),
                None => {
                    sessions.insert(window.to_string(), opened.clone());
                    (opened, true)
                },
            }
        };

        if inserted && window == OVERLAY_WINDOW_LABEL {
            let hook = self.on_mode.clone();
            ModeTracker::follow(session.cache(), move |mode| hook(mode));
        }
        session
    }

    /// Re-read the stored document for `window`, as when it regains focus.
    /// Catches up a window that missed bus updates.
    pub async fn refresh(&self, window: &str) -> TeamConfig {
        let session = self.session(window).await;
        log::debug!("[CONFIG] Refreshing {}", window);
        session.reload().await
    }

    /// Forget `window`'s session. Returns whether one existed.
    pub fn close_session(&self, window: &str) -> bool {
        let removed = self.sessions.lock().remove(window).is_some();
        if removed {
            log::debug!("[CONFIG] Closed session for {}", window);
        }
        removed
    }

    pub fn open_windows(&self) -> Vec<String> {
        let mut labels: Vec<_> = self.sessions.lock().keys().cloned().collect();
        labels.sort();
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldUpdate;
    use crate::error::{HudError, HudResult};
    use crate::sync::bus::{RawHandler, Subscription};
    use crate::sync::{JsonFileStore, LocalBus};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::time::Duration;
    use tempfile::TempDir;

    async fn open_store(dir: &TempDir) -> Arc<dyn PersistentStore> {
        Arc::new(JsonFileStore::open(dir.path().join("team-config.json")).await)
    }

    async fn state(dir: &TempDir) -> HudState {
        HudState::new(open_store(dir).await, Arc::new(LocalBus::new()))
    }

    fn alpha_beta() -> TeamConfig {
        TeamConfig {
            ct_name: "Alpha".to_string(),
            t_name: "Beta".to_string(),
            ..TeamConfig::default()
        }
    }

    /// Bus that accepts publishes but never delivers or subscribes.
    struct DeafBus;

    #[async_trait]
    impl EventBus for DeafBus {
        async fn publish_raw(&self, _topic: &str, _payload: Value) -> HudResult<()> {
            Ok(())
        }

        async fn subscribe_raw(
            &self,
            topic: &str,
            _handler: RawHandler,
        ) -> HudResult<Subscription> {
            Err(HudError::EventSubscription {
                topic: topic.to_string(),
                reason: "listener rejected".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_session_is_reused_per_window() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;

        let first = state.session("main").await;
        let second = state.session("main").await;
        assert!(Arc::ptr_eq(&first, &second));

        state.session("overlay").await;
        assert_eq!(state.open_windows(), vec!["main", "overlay"]);
    }

    #[tokio::test]
    async fn test_close_session() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;

        state.session("overlay").await;
        assert!(state.close_session("overlay"));
        assert!(!state.close_session("overlay"));
        assert!(state.open_windows().is_empty());
    }

    #[tokio::test]
    async fn test_condensed_toggle_reaches_overlay_session() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;
        let main = state.session("main").await;
        let overlay = state.session("overlay").await;

        main.service()
            .toggle(FieldUpdate::IsCondensed(true))
            .await
            .unwrap();

        let mut rx = overlay.cache().watch();
        tokio::time::timeout(Duration::from_secs(1), rx.wait_for(|c| c.condensed()))
            .await
            .expect("overlay never condensed")
            .unwrap();
        assert_eq!(
            overlay.cache().current(),
            TeamConfig::default().with_field(FieldUpdate::IsCondensed(true))
        );
    }

    #[tokio::test]
    async fn test_toggle_from_panel_condenses_overlay_once() {
        let dir = TempDir::new().unwrap();
        let transitions = Arc::new(Mutex::new(Vec::new()));
        let seen = transitions.clone();
        let state = HudState::with_mode_hook(
            open_store(&dir).await,
            Arc::new(LocalBus::new()),
            move |mode| seen.lock().push(mode),
        );
        let main = state.session("main").await;
        let overlay = state.session("overlay").await;

        main.service()
            .toggle(FieldUpdate::IsCondensed(true))
            .await
            .unwrap();

        let mut rx = overlay.cache().watch();
        tokio::time::timeout(Duration::from_secs(1), rx.wait_for(|c| c.condensed()))
            .await
            .expect("overlay never condensed")
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(*transitions.lock(), vec![OverlayMode::Condensed]);
    }

    #[tokio::test]
    async fn test_only_overlay_tracks_mode() {
        let dir = TempDir::new().unwrap();
        let transitions = Arc::new(Mutex::new(Vec::new()));
        let seen = transitions.clone();
        let state = HudState::with_mode_hook(
            open_store(&dir).await,
            Arc::new(LocalBus::new()),
            move |mode| seen.lock().push(mode),
        );
        let main = state.session("main").await;

        main.service()
            .toggle(FieldUpdate::IsCondensed(true))
            .await
            .unwrap();

        assert!(transitions.lock().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_catches_up_window_without_live_updates() {
        let dir = TempDir::new().unwrap();
        let state = HudState::new(open_store(&dir).await, Arc::new(DeafBus));
        let main = state.session("main").await;
        let overlay = state.session("overlay").await;
        assert!(!overlay.is_live());

        main.service().save(alpha_beta()).await.unwrap();
        assert_eq!(overlay.cache().current(), TeamConfig::default());

        assert_eq!(state.refresh("overlay").await, alpha_beta());
        assert_eq!(overlay.cache().current(), alpha_beta());
    }

    #[tokio::test]
    async fn test_refresh_opens_missing_session() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;

        assert_eq!(state.refresh("main").await, TeamConfig::default());
        assert_eq!(state.open_windows(), vec!["main"]);
    }
}

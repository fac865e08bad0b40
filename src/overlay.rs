//! Overlay rendering mode.
//!
//! The only state machine in the app: {Expanded, Condensed}. It moves when
//! a team document arrives whose `isCondensed` disagrees with the current
//! mode, immediately and with no pending state. The mode is derived from
//! full-document updates; no separate condensed-mode event exists.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::TeamConfig;
use crate::sync::cache::ConfigCache;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverlayMode {
    #[default]
    Expanded,
    Condensed,
}

impl OverlayMode {
    pub fn of(config: &TeamConfig) -> Self {
        if config.condensed() {
            OverlayMode::Condensed
        } else {
            OverlayMode::Expanded
        }
    }

    pub fn is_condensed(self) -> bool {
        self == OverlayMode::Condensed
    }
}

/// Tracks the mode across successive documents.
#[derive(Debug, Default)]
pub struct ModeTracker {
    mode: Mutex<OverlayMode>,
}

impl ModeTracker {
    pub fn new(initial: OverlayMode) -> Self {
        Self {
            mode: Mutex::new(initial),
        }
    }

    pub fn mode(&self) -> OverlayMode {
        *self.mode.lock()
    }

    /// Feed a document. Returns the new mode if this was a transition.
    pub fn observe(&self, config: &TeamConfig) -> Option<OverlayMode> {
        let next = OverlayMode::of(config);
        let mut mode = self.mode.lock();
        if *mode == next {
            return None;
        }
        log::debug!("[OVERLAY] {:?} -> {:?}", *mode, next);
        *mode = next;
        Some(next)
    }

    /// Track `cache` and call `on_transition` whenever the mode flips.
    pub fn follow(
        cache: &ConfigCache,
        on_transition: impl Fn(OverlayMode) + Send + Sync + 'static,
    ) -> Arc<Self> {
        let tracker = Arc::new(Self::new(OverlayMode::of(&cache.current())));
        let observer = tracker.clone();
        cache.on_change(move |config| {
            if let Some(mode) = observer.observe(config) {
                on_transition(mode);
            }
        });
        tracker
    }
}

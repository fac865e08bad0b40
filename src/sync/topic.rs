//! Typed bus topics.

use std::fmt;
use std::marker::PhantomData;

use crate::config::TeamConfig;

/// A bus topic name bound to its payload type.
pub struct Topic<T> {
    name: &'static str,
    _payload: PhantomData<fn() -> T>,
}

impl<T> Topic<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _payload: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for Topic<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Topic<T> {}

impl<T> fmt::Debug for Topic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Topic").field(&self.name).finish()
    }
}

/// Full team document after a successful save. Receivers replace their
/// whole cached copy with the payload.
pub const TEAM_CONFIG_UPDATED: Topic<TeamConfig> = Topic::new("team-config-updated");

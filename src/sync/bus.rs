//! Cross-window publish/subscribe.
//!
//! Delivery is at-most-once to the subscribers registered at publish time.
//! Nothing is buffered for later subscribers and nothing is acknowledged.
//! Publishes from one source arrive in order.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};

use super::topic::Topic;
use crate::error::{HudError, HudResult};

/// Per-subscriber channel depth for `LocalBus`.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Callback receiving raw JSON payloads.
pub type RawHandler = Arc<dyn Fn(Value) + Send + Sync>;

/// Live registration on a topic. Dropping it unsubscribes.
pub struct Subscription {
    topic: String,
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(topic: impl Into<String>, cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            topic: topic.into(),
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Stop delivery to this subscriber.
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            log::debug!("[BUS] Unsubscribed from '{}'", self.topic);
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Transport-level bus over JSON payloads.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Broadcast to every subscriber currently registered on `topic`.
    async fn publish_raw(&self, topic: &str, payload: Value) -> HudResult<()>;

    /// Register `handler`. The registration is live once this resolves.
    async fn subscribe_raw(&self, topic: &str, handler: RawHandler) -> HudResult<Subscription>;
}

/// Typed publish/subscribe on top of any `EventBus`.
#[async_trait]
pub trait EventBusExt: EventBus {
    async fn publish<T>(&self, topic: Topic<T>, payload: &T) -> HudResult<()>
    where
        T: Serialize + Sync,
    {
        let value = serde_json::to_value(payload).map_err(|e| HudError::EventPublish {
            topic: topic.name().to_string(),
            reason: e.to_string(),
        })?;
        self.publish_raw(topic.name(), value).await
    }

    /// Subscribe with a typed handler. Payloads that do not decode as `T`
    /// are logged and dropped.
    async fn subscribe<T, F>(&self, topic: Topic<T>, handler: F) -> HudResult<Subscription>
    where
        T: DeserializeOwned + 'static,
        F: Fn(T) + Send + Sync + 'static,
    {
        let name = topic.name();
        let raw: RawHandler = Arc::new(move |value| match serde_json::from_value::<T>(value) {
            Ok(payload) => handler(payload),
            Err(e) => log::warn!("[BUS] Dropping malformed '{}' payload: {}", name, e),
        });
        self.subscribe_raw(name, raw).await
    }
}

impl<B: EventBus + ?Sized> EventBusExt for B {}

/// In-process bus: one `tokio::sync::broadcast` channel per topic and one
/// delivery task per subscription.
pub struct LocalBus {
    channels: Mutex<HashMap<String, broadcast::Sender<Value>>>,
    capacity: usize,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Number of live receivers on `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.channels
            .lock()
            .get(topic)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}

impl Default for LocalBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventBus for LocalBus {
    async fn publish_raw(&self, topic: &str, payload: Value) -> HudResult<()> {
        let sender = self.channels.lock().get(topic).cloned();
        match sender.map(|s| s.send(payload)) {
            Some(Ok(receivers)) => {
                log::debug!("[BUS] '{}' sent to {} subscriber(s)", topic, receivers)
            },
            _ => log::debug!("[BUS] '{}' published with no subscribers", topic),
        }
        Ok(())
    }

    async fn subscribe_raw(&self, topic: &str, handler: RawHandler) -> HudResult<Subscription> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|e| HudError::EventSubscription {
                topic: topic.to_string(),
                reason: e.to_string(),
            })?;

        let mut receiver = self
            .channels
            .lock()
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe();

        let name = topic.to_string();
        let task = runtime.spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(payload) => handler(payload),
                    Err(RecvError::Lagged(skipped)) => {
                        log::warn!("[BUS] Subscriber on '{}' skipped {} message(s)", name, skipped)
                    },
                    Err(RecvError::Closed) => break,
                }
            }
        });

        log::debug!("[BUS] Subscribed to '{}'", topic);
        let abort = task.abort_handle();
        Ok(Subscription::new(topic, move || abort.abort()))
    }
}

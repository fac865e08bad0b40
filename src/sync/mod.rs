//! Cross-window configuration sync.
//!
//! ## Architecture
//!
//! ```text
//! store.rs    - PersistentStore trait + JsonFileStore (explicit flush)
//! topic.rs    - Typed topic names (TEAM_CONFIG_UPDATED)
//! bus.rs      - EventBus trait, typed helpers, LocalBus (tokio broadcast)
//! cache.rs    - ConfigCache, one per window
//! service.rs  - ConfigService: load / save / toggle
//! session.rs  - WindowSession: subscribe, then load
//! ```
//!
//! Tauri-backed store and bus adapters live in `plugin_store.rs` and
//! `tauri_bus.rs` behind the `app` feature.
//!
//! Data flow on save from window A:
//!
//! ```text
//! A.save(C) -> store.set + store.flush -> A.cache = C -> bus.publish(C)
//!                                                         |
//!                                      B.cache = C  <-----+
//! ```

pub mod bus;
pub mod cache;
pub mod service;
pub mod session;
pub mod store;
pub mod topic;

#[cfg(feature = "app")]
pub mod plugin_store;
#[cfg(feature = "app")]
pub mod tauri_bus;


pub use bus::{EventBus, EventBusExt, LocalBus, Subscription};
pub use cache::ConfigCache;
pub use service::ConfigService;
pub use session::WindowSession;
pub use store::{JsonFileStore, PersistentStore};
pub use topic::{Topic, TEAM_CONFIG_UPDATED};

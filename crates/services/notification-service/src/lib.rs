//! Notification Service Library
//!
//! Fans notifications out into per-account inboxes held in a key-value
//! store, and keeps a (type, target) index so every inbox reference to a
//! notification can be purged in one call.

pub mod codec;
pub mod keys;
pub mod store;
pub mod transport;

pub use store::{KvNotificationStore, NotificationStore};
pub use transport::{Batch, Command, KvTransport, MemoryTransport, RedisTransport};

#[cfg(any(test, feature = "test-utils"))]
pub use store::MockNotificationStore;
#[cfg(any(test, feature = "test-utils"))]
pub use transport::MockKvTransport;

//! Key-value transport capability.
//!
//! The notification store only needs strings, hashes, lists and an atomic
//! multi-command batch. [`RedisTransport`] provides them over a Redis
//! server; [`MemoryTransport`] provides the same semantics in process.

mod memory;
mod redis_transport;

use std::collections::HashMap;

use async_trait::async_trait;

use common::AppResult;

pub use self::memory::MemoryTransport;
pub use self::redis_transport::RedisTransport;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// One write inside a [`Batch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// HSET of every field
    HashSetAll {
        key: String,
        fields: Vec<(String, String)>,
    },
    /// SET, replacing any previous value
    Set { key: String, value: String },
    /// LPUSH of one value
    ListPushFront { key: String, value: String },
    /// LREM: `count > 0` from the head, `count < 0` from the tail, `0` all
    ListRemove {
        key: String,
        count: isize,
        value: String,
    },
}

impl Command {
    pub fn key(&self) -> &str {
        match self {
            Command::HashSetAll { key, .. }
            | Command::Set { key, .. }
            | Command::ListPushFront { key, .. }
            | Command::ListRemove { key, .. } => key,
        }
    }
}

/// Ordered writes committed all at once or not at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    commands: Vec<Command>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hash_set_all(&mut self, key: impl Into<String>, fields: Vec<(String, String)>) -> &mut Self {
        self.commands.push(Command::HashSetAll {
            key: key.into(),
            fields,
        });
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.commands.push(Command::Set {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn list_push_front(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.commands.push(Command::ListPushFront {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn list_remove(
        &mut self,
        key: impl Into<String>,
        count: isize,
        value: impl Into<String>,
    ) -> &mut Self {
        self.commands.push(Command::ListRemove {
            key: key.into(),
            count,
            value: value.into(),
        });
        self
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Key-value store operations used by the notification store.
///
/// Every call holds one pooled connection for its own duration only.
/// Connectivity failures and timeouts surface as `AppError::Transport`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait KvTransport: Send + Sync {
    /// GET of a string key
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// HGETALL of one hash; empty when the key does not exist
    async fn hash_get_all(&self, key: &str) -> AppResult<HashMap<String, String>>;

    /// HGETALL of many hashes in one round trip, in key order
    async fn hash_get_all_batch(&self, keys: &[String]) -> AppResult<Vec<HashMap<String, String>>>;

    /// LRANGE with Redis index semantics (negative indexes count from the tail)
    async fn list_range(&self, key: &str, start: isize, stop: isize) -> AppResult<Vec<String>>;

    /// LREM, returning how many elements were removed
    async fn list_remove(&self, key: &str, count: isize, value: &str) -> AppResult<usize>;

    /// Commit a batch atomically
    async fn execute(&self, batch: Batch) -> AppResult<()>;
}

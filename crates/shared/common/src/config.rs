//! Shared configuration structures.

use serde::{Deserialize, Serialize};

/// Default Redis URL
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Default per-call Redis response timeout in milliseconds
pub const DEFAULT_REDIS_RESPONSE_TIMEOUT_MS: u64 = 5000;

/// Redis connection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    /// Time allowed for one store call before it fails as a transport error
    pub response_timeout_ms: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REDIS_URL.to_string(),
            response_timeout_ms: DEFAULT_REDIS_RESPONSE_TIMEOUT_MS,
        }
    }
}

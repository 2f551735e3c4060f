//! Facade configuration.

use std::env;
use std::path::PathBuf;

use common::{RedisConfig, DEFAULT_REDIS_RESPONSE_TIMEOUT_MS, DEFAULT_REDIS_URL};

/// Facade configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacadeConfig {
    /// Redis holding notifications
    pub redis: RedisConfig,
    /// File to serve when an account has no photo; the packaged one if unset
    pub default_photo_path: Option<PathBuf>,
}

impl FacadeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            redis: RedisConfig {
                url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
                response_timeout_ms: env::var("REDIS_RESPONSE_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_REDIS_RESPONSE_TIMEOUT_MS),
            },
            default_photo_path: env::var("DEFAULT_PHOTO_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Load a `.env` file if present, then read the environment.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 3] = ["REDIS_URL", "REDIS_RESPONSE_TIMEOUT_MS", "DEFAULT_PHOTO_PATH"];

    // One test so no other test in this crate races on these variables
    #[test]
    fn test_from_env() {
        for var in VARS {
            env::remove_var(var);
        }
        assert_eq!(FacadeConfig::from_env(), FacadeConfig::default());
        assert_eq!(FacadeConfig::from_env().redis.url, DEFAULT_REDIS_URL);

        env::set_var("REDIS_URL", "redis://cache:6380");
        env::set_var("REDIS_RESPONSE_TIMEOUT_MS", "250");
        env::set_var("DEFAULT_PHOTO_PATH", "/srv/photos/default.jpg");
        let config = FacadeConfig::from_env();
        assert_eq!(config.redis.url, "redis://cache:6380");
        assert_eq!(config.redis.response_timeout_ms, 250);
        assert_eq!(
            config.default_photo_path,
            Some(PathBuf::from("/srv/photos/default.jpg"))
        );

        env::set_var("REDIS_RESPONSE_TIMEOUT_MS", "soon");
        env::set_var("DEFAULT_PHOTO_PATH", "   ");
        let config = FacadeConfig::from_env();
        assert_eq!(config.redis.response_timeout_ms, DEFAULT_REDIS_RESPONSE_TIMEOUT_MS);
        assert_eq!(config.default_photo_path, None);

        for var in VARS {
            env::remove_var(var);
        }
        // No .env in the workspace, so loading falls back to the defaults
        assert_eq!(FacadeConfig::load(), FacadeConfig::default());
    }
}

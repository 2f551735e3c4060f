//! Redis transport with connection pooling.

use std::collections::HashMap;
use std::future::Future;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisResult};
use tokio::time::{timeout, Duration};
use tracing::{debug, info};

use common::{AppError, AppResult, RedisConfig};

use super::{Batch, Command, KvTransport};

/// Redis transport.
///
/// Each operation takes its own handle on the managed connection and drops
/// it when the operation ends, whatever the outcome. Batches run as
/// `MULTI`/`EXEC` pipelines.
#[derive(Clone)]
pub struct RedisTransport {
    connection: ConnectionManager,
    response_timeout: Duration,
}

impl RedisTransport {
    /// Connect to Redis.
    pub async fn connect(config: &RedisConfig) -> AppResult<Self> {
        debug!("Connecting to Redis at {}", config.url);
        let response_timeout = Duration::from_millis(config.response_timeout_ms);
        let client = Client::open(config.url.as_str())?;
        let connection = timeout(response_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| AppError::transport(format!("connecting to {} timed out", config.url)))??;

        info!("Redis transport connected");
        Ok(Self {
            connection,
            response_timeout,
        })
    }

    /// Run one Redis call under the response timeout.
    async fn timed<T, F>(&self, operation: &str, call: F) -> AppResult<T>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match timeout(self.response_timeout, call).await {
            Ok(result) => result.map_err(AppError::from),
            Err(_) => Err(AppError::transport(format!(
                "{} timed out after {}ms",
                operation,
                self.response_timeout.as_millis()
            ))),
        }
    }
}

#[async_trait]
impl KvTransport for RedisTransport {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.connection.clone();
        self.timed("GET", conn.get(key)).await
    }

    async fn hash_get_all(&self, key: &str) -> AppResult<HashMap<String, String>> {
        let mut conn = self.connection.clone();
        self.timed("HGETALL", conn.hgetall(key)).await
    }

    async fn hash_get_all_batch(&self, keys: &[String]) -> AppResult<Vec<HashMap<String, String>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut pipe = redis::pipe();
        pipe.atomic();
        for key in keys {
            pipe.hgetall(key);
        }

        let mut conn = self.connection.clone();
        self.timed("HGETALL", pipe.query_async(&mut conn)).await
    }

    async fn list_range(&self, key: &str, start: isize, stop: isize) -> AppResult<Vec<String>> {
        let mut conn = self.connection.clone();
        self.timed("LRANGE", conn.lrange(key, start, stop)).await
    }

    async fn list_remove(&self, key: &str, count: isize, value: &str) -> AppResult<usize> {
        let mut conn = self.connection.clone();
        self.timed("LREM", conn.lrem(key, count, value)).await
    }

    async fn execute(&self, batch: Batch) -> AppResult<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut pipe = redis::pipe();
        pipe.atomic();
        for command in batch.commands() {
            match command {
                Command::HashSetAll { key, fields } => {
                    pipe.hset_multiple(key, fields.as_slice()).ignore();
                }
                Command::Set { key, value } => {
                    pipe.set(key, value).ignore();
                }
                Command::ListPushFront { key, value } => {
                    pipe.lpush(key, value).ignore();
                }
                Command::ListRemove { key, count, value } => {
                    pipe.lrem(key, *count, value).ignore();
                }
            }
        }

        let mut conn = self.connection.clone();
        let _: () = self.timed("EXEC", pipe.query_async(&mut conn)).await?;
        debug!(commands = batch.len(), "Batch committed");
        Ok(())
    }
}

//! In-process transport with Redis semantics.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use common::{AppError, AppResult};

use super::{Batch, Command, KvTransport};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Text(String),
    Hash(HashMap<String, String>),
    List(VecDeque<String>),
}

fn wrong_type(key: &str) -> AppError {
    AppError::decode(format!(
        "WRONGTYPE operation against key {} holding the wrong kind of value",
        key
    ))
}

/// Key-value data kept in process memory.
///
/// One lock covers the whole keyspace. A batch is staged against a copy of
/// the keys it touches and only written back when every command applied, so
/// a rejected batch leaves no trace.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    data: Mutex<HashMap<String, Value>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub async fn key_count(&self) -> usize {
        self.data.lock().await.len()
    }
}

/// Redis LREM on an in-memory list.
fn remove_from_list(list: &mut VecDeque<String>, count: isize, value: &str) -> usize {
    let limit = if count == 0 {
        usize::MAX
    } else {
        count.unsigned_abs()
    };
    let mut removed = 0;

    if count >= 0 {
        let mut index = 0;
        while index < list.len() && removed < limit {
            if list[index] == value {
                list.remove(index);
                removed += 1;
            } else {
                index += 1;
            }
        }
    } else {
        let mut index = list.len();
        while index > 0 && removed < limit {
            index -= 1;
            if list[index] == value {
                list.remove(index);
                removed += 1;
            }
        }
    }
    removed
}

/// Redis LRANGE index resolution, `None` when the range is empty.
fn resolve_range(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if len == 0 || start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize))
}

fn apply(slot: &mut Option<Value>, command: Command) -> AppResult<()> {
    match command {
        Command::HashSetAll { key, fields } => {
            match slot.get_or_insert_with(|| Value::Hash(HashMap::new())) {
                Value::Hash(hash) => hash.extend(fields),
                _ => return Err(wrong_type(&key)),
            }
        }
        Command::Set { value, .. } => {
            *slot = Some(Value::Text(value));
        }
        Command::ListPushFront { key, value } => {
            match slot.get_or_insert_with(|| Value::List(VecDeque::new())) {
                Value::List(list) => list.push_front(value),
                _ => return Err(wrong_type(&key)),
            }
        }
        Command::ListRemove { key, count, value } => {
            let now_empty = match slot.as_mut() {
                None => false,
                Some(Value::List(list)) => {
                    remove_from_list(list, count, &value);
                    list.is_empty()
                }
                Some(_) => return Err(wrong_type(&key)),
            };
            // Redis drops lists that become empty
            if now_empty {
                *slot = None;
            }
        }
    }
    Ok(())
}

#[async_trait]
impl KvTransport for MemoryTransport {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        match self.data.lock().await.get(key) {
            None => Ok(None),
            Some(Value::Text(text)) => Ok(Some(text.clone())),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn hash_get_all(&self, key: &str) -> AppResult<HashMap<String, String>> {
        match self.data.lock().await.get(key) {
            None => Ok(HashMap::new()),
            Some(Value::Hash(hash)) => Ok(hash.clone()),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn hash_get_all_batch(&self, keys: &[String]) -> AppResult<Vec<HashMap<String, String>>> {
        let data = self.data.lock().await;
        keys.iter()
            .map(|key| match data.get(key) {
                None => Ok(HashMap::new()),
                Some(Value::Hash(hash)) => Ok(hash.clone()),
                Some(_) => Err(wrong_type(key)),
            })
            .collect()
    }

    async fn list_range(&self, key: &str, start: isize, stop: isize) -> AppResult<Vec<String>> {
        match self.data.lock().await.get(key) {
            None => Ok(Vec::new()),
            Some(Value::List(list)) => Ok(match resolve_range(list.len(), start, stop) {
                Some((from, to)) => list.range(from..=to).cloned().collect(),
                None => Vec::new(),
            }),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn list_remove(&self, key: &str, count: isize, value: &str) -> AppResult<usize> {
        let mut data = self.data.lock().await;
        let removed = match data.get_mut(key) {
            None => return Ok(0),
            Some(Value::List(list)) => remove_from_list(list, count, value),
            Some(_) => return Err(wrong_type(key)),
        };
        if matches!(data.get(key), Some(Value::List(list)) if list.is_empty()) {
            data.remove(key);
        }
        Ok(removed)
    }

    async fn execute(&self, batch: Batch) -> AppResult<()> {
        let commands = batch.len();
        let mut data = self.data.lock().await;
        let mut staged: HashMap<String, Option<Value>> = HashMap::new();

        for command in batch.into_commands() {
            let key = command.key().to_string();
            let slot = staged
                .entry(key)
                .or_insert_with_key(|key| data.get(key).cloned());
            apply(slot, command)?;
        }

        for (key, value) in staged {
            match value {
                Some(value) => {
                    data.insert(key, value);
                }
                None => {
                    data.remove(&key);
                }
            }
        }
        debug!(commands, "Batch committed");
        Ok(())
    }
}

//! Notification store over a key-value transport.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use common::AppResult;
use domain::{AccountKey, Notification, NotificationEvent, TypeTarget};

use crate::codec;
use crate::keys;
use crate::transport::{Batch, KvTransport};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Notification store trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Store the notification and push it to every recipient inbox, atomically
    async fn send(&self, event: NotificationEvent) -> AppResult<()>;

    /// Inbox of an account, newest first
    async fn get_current_notifications(&self, account: &AccountKey) -> AppResult<Vec<Notification>>;

    /// Stored record of a notification, whatever inbox still references it
    async fn get_notification(&self, uuid: Uuid) -> AppResult<Option<Notification>>;

    /// Drop a notification from one inbox; the record stays
    async fn remove(&self, account: &AccountKey, uuid: Uuid) -> AppResult<()>;

    /// Drop the latest (type, target) notification from every inbox it reached
    async fn remove_all(&self, type_target: &TypeTarget) -> AppResult<()>;
}

/// Concrete implementation of NotificationStore on a [`KvTransport`].
pub struct KvNotificationStore {
    transport: Arc<dyn KvTransport>,
}

impl KvNotificationStore {
    /// Create new store instance with transport
    pub fn new(transport: Arc<dyn KvTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl NotificationStore for KvNotificationStore {
    async fn send(&self, event: NotificationEvent) -> AppResult<()> {
        let notification = &event.notification;
        let uuid = notification.uuid().to_string();
        let type_target = notification.type_target();
        let index_key = keys::type_target_key(&type_target);

        let mut batch = Batch::new();
        batch
            .hash_set_all(
                keys::notification_key(notification.uuid()),
                codec::to_fields(notification),
            )
            .set(keys::type_target_uuid_key(&type_target), uuid.as_str());
        for account in &event.to_accounts {
            let inbox = keys::inbox_key(account);
            batch
                .list_push_front(inbox.as_str(), uuid.as_str())
                .list_push_front(index_key.as_str(), inbox);
        }

        self.transport.execute(batch).await?;
        debug!(
            uuid = %uuid,
            recipients = event.to_accounts.len(),
            "Notification sent"
        );
        Ok(())
    }

    async fn get_current_notifications(&self, account: &AccountKey) -> AppResult<Vec<Notification>> {
        let uuids = self
            .transport
            .list_range(&keys::inbox_key(account), 0, -1)
            .await?;
        if uuids.is_empty() {
            return Ok(Vec::new());
        }

        let record_keys: Vec<String> = uuids
            .iter()
            .map(keys::notification_key)
            .collect();
        let records = self.transport.hash_get_all_batch(&record_keys).await?;

        let mut notifications = Vec::with_capacity(records.len());
        for (uuid, record) in uuids.iter().zip(records) {
            if record.is_empty() {
                warn!(account = %account, uuid = %uuid, "Inbox references a missing notification record");
                continue;
            }
            notifications.push(codec::from_fields(&record)?);
        }
        Ok(notifications)
    }

    async fn get_notification(&self, uuid: Uuid) -> AppResult<Option<Notification>> {
        let record = self
            .transport
            .hash_get_all(&keys::notification_key(uuid))
            .await?;
        if record.is_empty() {
            return Ok(None);
        }
        codec::from_fields(&record).map(Some)
    }

    async fn remove(&self, account: &AccountKey, uuid: Uuid) -> AppResult<()> {
        let removed = self
            .transport
            .list_remove(&keys::inbox_key(account), 1, &uuid.to_string())
            .await?;
        debug!(account = %account, uuid = %uuid, removed, "Notification removed from inbox");
        Ok(())
    }

    async fn remove_all(&self, type_target: &TypeTarget) -> AppResult<()> {
        let Some(uuid) = self
            .transport
            .get(&keys::type_target_uuid_key(type_target))
            .await?
        else {
            return Ok(());
        };

        let inboxes = self
            .transport
            .list_range(&keys::type_target_key(type_target), 0, -1)
            .await?;
        if inboxes.is_empty() {
            return Ok(());
        }

        let mut batch = Batch::new();
        for inbox in &inboxes {
            batch.list_remove(inbox.as_str(), 1, uuid.as_str());
        }
        self.transport.execute(batch).await?;
        debug!(uuid = %uuid, inboxes = inboxes.len(), "Notification removed from all inboxes");
        Ok(())
    }
}

//! Notification entity and delivery event.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::account::AccountKey;
use crate::error::{DomainError, DomainResult};

/// Immutable notification record.
///
/// Only [`NotificationBuilder`] creates one, so the creation date is always
/// at millisecond precision, the precision of the stored record, and a
/// fetched notification compares equal to the sent one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NotificationFields")]
pub struct Notification {
    uuid: Uuid,
    sender: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    title: String,
    content: String,
    creation_date: DateTime<Utc>,
    target_url: String,
}

impl Notification {
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Notification type, if any
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    /// The (type, target) pair this notification is indexed under
    pub fn type_target(&self) -> TypeTarget {
        TypeTarget::new(self.kind.clone(), self.target_url.clone())
    }
}

/// Wire shape of a notification, validated through the builder
#[derive(Deserialize)]
struct NotificationFields {
    uuid: Uuid,
    sender: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    title: String,
    content: String,
    creation_date: DateTime<Utc>,
    target_url: String,
}

impl TryFrom<NotificationFields> for Notification {
    type Error = DomainError;

    fn try_from(fields: NotificationFields) -> DomainResult<Self> {
        let mut builder = NotificationBuilder::with_uuid(fields.uuid)
            .with_sender(fields.sender)
            .with_title(fields.title)
            .with_content(fields.content)
            .with_creation_date(fields.creation_date)
            .with_target_url(fields.target_url);
        if let Some(kind) = fields.kind {
            builder = builder.with_type(kind);
        }
        builder.build()
    }
}

/// Builder for [`Notification`].
#[derive(Debug, Clone)]
pub struct NotificationBuilder {
    uuid: Uuid,
    sender: Option<String>,
    kind: Option<String>,
    title: Option<String>,
    content: Option<String>,
    creation_date: Option<DateTime<Utc>>,
    target_url: Option<String>,
}

impl NotificationBuilder {
    /// Start a notification with a freshly generated id
    pub fn new() -> Self {
        Self::with_uuid(Uuid::new_v4())
    }

    /// Start a notification with an already assigned id
    pub fn with_uuid(uuid: Uuid) -> Self {
        Self {
            uuid,
            sender: None,
            kind: None,
            title: None,
            content: None,
            creation_date: None,
            target_url: None,
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_creation_date(mut self, creation_date: DateTime<Utc>) -> Self {
        self.creation_date = Some(creation_date);
        self
    }

    pub fn with_target_url(mut self, target_url: impl Into<String>) -> Self {
        self.target_url = Some(target_url.into());
        self
    }

    /// Build the notification, defaulting the creation date to now.
    pub fn build(self) -> DomainResult<Notification> {
        let sender = self.sender.ok_or(DomainError::MissingField("sender"))?;
        let title = self.title.ok_or(DomainError::MissingField("title"))?;
        let content = self.content.ok_or(DomainError::MissingField("content"))?;
        let target_url = self
            .target_url
            .ok_or(DomainError::MissingField("targetUrl"))?;
        let creation_date = self.creation_date.unwrap_or_else(Utc::now).trunc_subsecs(3);

        Ok(Notification {
            uuid: self.uuid,
            sender,
            kind: self.kind,
            title,
            content,
            creation_date,
            target_url,
        })
    }
}

impl Default for NotificationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A notification together with the accounts it must be delivered to
#[derive(Debug, Clone)]
pub struct NotificationEvent {
    pub notification: Notification,
    pub to_accounts: BTreeSet<AccountKey>,
}

impl NotificationEvent {
    pub fn new(notification: Notification, to_accounts: BTreeSet<AccountKey>) -> Self {
        Self {
            notification,
            to_accounts,
        }
    }
}

/// Structured (type, target URL) pair used by the bulk-removal index.
///
/// Kept as a tuple up to the storage edge so that separator characters in
/// either half never make two pairs indistinguishable in the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeTarget {
    pub kind: Option<String>,
    pub target_url: String,
}

impl TypeTarget {
    pub fn new(kind: Option<String>, target_url: impl Into<String>) -> Self {
        Self {
            kind,
            target_url: target_url.into(),
        }
    }
}

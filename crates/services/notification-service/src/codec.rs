//! Notification record codec.
//!
//! Records are flat string hashes. An absent type is simply not written;
//! every other field is required when reading back.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Notification, NotificationBuilder, NOTIFICATION_DATE_FORMAT};

pub const FIELD_UUID: &str = "uuid";
pub const FIELD_SENDER: &str = "sender";
pub const FIELD_TYPE: &str = "type";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_CONTENT: &str = "content";
pub const FIELD_CREATION_DATE: &str = "creationDate";
pub const FIELD_TARGET_URL: &str = "targetUrl";

/// Render a creation date the way records store it
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format(NOTIFICATION_DATE_FORMAT).to_string()
}

/// Parse a stored creation date
pub fn parse_date(value: &str) -> AppResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, NOTIFICATION_DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| AppError::decode(format!("invalid creationDate {:?}: {}", value, e)))
}

/// Flatten a notification into record fields
pub fn to_fields(notification: &Notification) -> Vec<(String, String)> {
    let mut fields = vec![
        (FIELD_UUID.to_string(), notification.uuid().to_string()),
        (FIELD_SENDER.to_string(), notification.sender().to_string()),
    ];
    if let Some(kind) = notification.kind() {
        fields.push((FIELD_TYPE.to_string(), kind.to_string()));
    }
    fields.extend([
        (FIELD_TITLE.to_string(), notification.title().to_string()),
        (FIELD_CONTENT.to_string(), notification.content().to_string()),
        (
            FIELD_CREATION_DATE.to_string(),
            format_date(&notification.creation_date()),
        ),
        (FIELD_TARGET_URL.to_string(), notification.target_url().to_string()),
    ]);
    fields
}

fn required<'a>(data: &'a HashMap<String, String>, field: &str) -> AppResult<&'a str> {
    data.get(field)
        .map(String::as_str)
        .ok_or_else(|| AppError::decode(format!("notification record lacks {}", field)))
}

/// Rebuild a notification from record fields
pub fn from_fields(data: &HashMap<String, String>) -> AppResult<Notification> {
    let raw_uuid = required(data, FIELD_UUID)?;
    let uuid = Uuid::parse_str(raw_uuid)
        .map_err(|e| AppError::decode(format!("invalid uuid {:?}: {}", raw_uuid, e)))?;
    let creation_date = parse_date(required(data, FIELD_CREATION_DATE)?)?;

    let mut builder = NotificationBuilder::with_uuid(uuid)
        .with_sender(required(data, FIELD_SENDER)?)
        .with_title(required(data, FIELD_TITLE)?)
        .with_content(required(data, FIELD_CONTENT)?)
        .with_creation_date(creation_date)
        .with_target_url(required(data, FIELD_TARGET_URL)?);
    if let Some(kind) = data.get(FIELD_TYPE) {
        builder = builder.with_type(kind.clone());
    }

    builder
        .build()
        .map_err(|e| AppError::decode(format!("invalid notification record: {}", e)))
}

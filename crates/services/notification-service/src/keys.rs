//! On-wire key scheme.
//!
//! Structured keys are only turned into strings here, at the storage edge.
//! The layout matches data written by earlier deployments:
//!
//! - `notif:<uuid>`: hash holding the notification record
//! - `notifs:<account>`: list of notification uuids, newest first
//! - `type:<type>;target:<target>;uuid`: uuid of the latest matching notification
//! - `type:<type>;target:<target>`: list of inbox keys that received a match

use std::fmt::Display;

use domain::{AccountKey, TypeTarget};

/// Key prefix of notification records
pub const NOTIFICATION_PREFIX: &str = "notif:";

/// Key prefix of account inboxes
pub const INBOX_PREFIX: &str = "notifs:";

/// Rendering of an absent notification type inside index keys.
///
/// A notification typed literally `"null"` shares its index keys with
/// untyped ones. This keeps keys written by earlier deployments readable.
pub const ABSENT_TYPE: &str = "null";

/// Key of the record hash of a notification
pub fn notification_key(uuid: impl Display) -> String {
    format!("{}{}", NOTIFICATION_PREFIX, uuid)
}

/// Key of the inbox list of an account
pub fn inbox_key(account: &AccountKey) -> String {
    format!("{}{}", INBOX_PREFIX, account)
}

/// Key of the list of inbox keys touched by a (type, target) pair
pub fn type_target_key(type_target: &TypeTarget) -> String {
    format!(
        "type:{};target:{}",
        type_target.kind.as_deref().unwrap_or(ABSENT_TYPE),
        type_target.target_url
    )
}

/// Key holding the latest notification uuid of a (type, target) pair
pub fn type_target_uuid_key(type_target: &TypeTarget) -> String {
    format!("{};uuid", type_target_key(type_target))
}

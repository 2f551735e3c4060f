//! Domain layer - Core entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Account and group keys defined here are shared by convention between the
//! directory and the notification store.

pub mod account;
pub mod constants;
pub mod error;
pub mod notification;
pub mod photo;

pub use account::{Account, AccountGroup, AccountKey, GroupKey};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use notification::{Notification, NotificationBuilder, NotificationEvent, TypeTarget};
pub use photo::Photo;

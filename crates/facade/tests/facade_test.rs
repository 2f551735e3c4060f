//! Facade integration tests.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use account_service::{MemoryAccountStore, MemoryPhotoStore, MockPhotoStore};
use chrono::{TimeZone, Utc};
use common::{AppError, AppResult};
use domain::{
    Account, AccountGroup, AccountKey, GroupKey, Notification, NotificationBuilder, Photo,
    TypeTarget,
};
use facade::{init_tracing, EmbeddedPhotoProvider, Facade, MemorySession, PhotoProvider};
use notification_service::{KvNotificationStore, MemoryTransport, MockNotificationStore};

fn key(id: &str) -> AccountKey {
    AccountKey::new(id).unwrap()
}

fn gkey(id: &str) -> GroupKey {
    GroupKey::new(id).unwrap()
}

fn setup() -> Facade {
    init_tracing("debug");
    Facade::new(
        Arc::new(MemoryAccountStore::new()),
        Arc::new(MemoryPhotoStore::new()),
        Arc::new(KvNotificationStore::new(Arc::new(MemoryTransport::new()))),
        Arc::new(MemorySession::new()),
        &EmbeddedPhotoProvider,
    )
    .unwrap()
}

fn seeded() -> Facade {
    let facade = setup();
    facade
        .save_accounts(vec![
            Account::new(key("0"), "John Doe").with_email("john.doe@yopmail.com"),
            Account::new(key("1"), "Palmer Luckey"),
            Account::new(key("2"), "Bill Clinton"),
        ])
        .unwrap();
    facade
        .save_group(AccountGroup::new(gkey("100"), "Hometown"))
        .unwrap();
    facade.attach(&key("1"), &gkey("100")).unwrap();
    facade.attach(&key("2"), &gkey("100")).unwrap();
    facade
}

fn notification(target: &str) -> Notification {
    NotificationBuilder::new()
        .with_sender("ts")
        .with_type("info")
        .with_title("Hello")
        .with_content("World")
        .with_target_url(target)
        .build()
        .unwrap()
}

fn avatar() -> Photo {
    Photo::new(
        "avatar.png",
        "image/png",
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        vec![9u8, 8, 7],
    )
}

struct Unreadable;

impl PhotoProvider for Unreadable {
    fn load_default_photo(&self) -> AppResult<Photo> {
        Err(AppError::internal("no default photo"))
    }
}

// =============================================================================
// Session
// =============================================================================

#[test]
fn test_logged_account_requires_login() {
    let facade = setup();
    assert_eq!(facade.logged_account(), Err(AppError::Unauthorized));

    facade.login(key("1"));
    assert_eq!(facade.logged_account().unwrap(), key("1"));
}

#[tokio::test]
async fn test_logged_notifications_requires_login() {
    let facade = setup();
    let err = facade.logged_notifications().await.unwrap_err();
    assert_eq!(err, AppError::Unauthorized);
}

// =============================================================================
// Photos
// =============================================================================

#[test]
fn test_photo_falls_back_to_default() {
    let facade = setup();
    let photo = facade.get_photo(&key("nobody")).unwrap();

    assert_eq!(&photo, facade.default_photo());
    assert_eq!(photo.name, "defaultPhoto.png");
    assert_eq!(photo.mime_type, "image/png");
}

#[test]
fn test_set_photo_is_returned_as_is() {
    let facade = setup();
    facade.set_photo(&key("1"), avatar()).unwrap();

    assert_eq!(facade.get_photo(&key("1")).unwrap(), avatar());
    assert_eq!(&facade.get_photo(&key("2")).unwrap(), facade.default_photo());
}

#[test]
fn test_photo_store_error_is_not_masked() {
    let mut photos = MockPhotoStore::new();
    photos
        .expect_get_photo()
        .returning(|_| Err(AppError::internal("lock poisoned")));

    let facade = Facade::new(
        Arc::new(MemoryAccountStore::new()),
        Arc::new(photos),
        Arc::new(MockNotificationStore::new()),
        Arc::new(MemorySession::new()),
        &EmbeddedPhotoProvider,
    )
    .unwrap();

    assert!(matches!(facade.get_photo(&key("1")), Err(AppError::Internal(_))));
}

#[test]
fn test_unreadable_default_photo_aborts_construction() {
    let result = Facade::new(
        Arc::new(MemoryAccountStore::new()),
        Arc::new(MemoryPhotoStore::new()),
        Arc::new(MockNotificationStore::new()),
        Arc::new(MemorySession::new()),
        &Unreadable,
    );
    assert!(matches!(result, Err(AppError::Internal(_))));
}

// =============================================================================
// Directory
// =============================================================================

#[test]
fn test_directory_is_forwarded() {
    let facade = seeded();

    assert_eq!(facade.accounts_count().unwrap(), 3);
    assert_eq!(facade.groups_count().unwrap(), 1);
    assert!(facade.exists(&key("0")).unwrap());
    assert!(!facade.exists(&key("9")).unwrap());
    assert_eq!(
        facade.get_account(&key("0")).unwrap().email.as_deref(),
        Some("john.doe@yopmail.com")
    );
    assert_eq!(facade.get_group(&gkey("100")).unwrap().display_name, "Hometown");
    assert_eq!(facade.get_all_groups().unwrap().len(), 1);

    let members: HashSet<AccountKey> = [key("1"), key("2")].into_iter().collect();
    assert_eq!(facade.get_account_keys(&gkey("100")).unwrap(), members);

    facade.detach(&key("1"), &gkey("100")).unwrap();
    assert!(facade.get_group_keys(&key("1")).unwrap().is_empty());
    assert_eq!(facade.get_account_keys(&gkey("100")).unwrap().len(), 1);
}

#[test]
fn test_unknown_keys_are_not_found() {
    let facade = seeded();

    assert!(matches!(facade.get_account(&key("9")), Err(AppError::NotFound(_))));
    assert!(matches!(
        facade.attach(&key("9"), &gkey("100")),
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        facade.get_account_keys(&gkey("nope")),
        Err(AppError::NotFound(_))
    ));
}

// =============================================================================
// Notifications
// =============================================================================

#[tokio::test]
async fn test_send_to_group_members() {
    let facade = seeded();
    let sent = notification("/x");
    let to: BTreeSet<AccountKey> = facade
        .get_account_keys(&gkey("100"))
        .unwrap()
        .into_iter()
        .collect();

    facade.send(sent.clone(), to).await.unwrap();

    facade.login(key("1"));
    assert_eq!(facade.logged_notifications().await.unwrap(), vec![sent.clone()]);
    assert_eq!(
        facade.get_current_notifications(&key("2")).await.unwrap(),
        vec![sent.clone()]
    );
    assert!(facade
        .get_current_notifications(&key("0"))
        .await
        .unwrap()
        .is_empty());

    facade.remove(&key("1"), sent.uuid()).await.unwrap();
    assert!(facade.logged_notifications().await.unwrap().is_empty());

    facade
        .remove_all(&TypeTarget::new(Some("info".to_string()), "/x"))
        .await
        .unwrap();
    assert!(facade
        .get_current_notifications(&key("2"))
        .await
        .unwrap()
        .is_empty());
    assert_eq!(facade.get_notification(sent.uuid()).await.unwrap(), Some(sent));
}

#[tokio::test]
async fn test_notification_store_error_is_surfaced() {
    let mut notifications = MockNotificationStore::new();
    notifications
        .expect_send()
        .returning(|_| Err(AppError::transport("connection refused")));

    let facade = Facade::new(
        Arc::new(MemoryAccountStore::new()),
        Arc::new(MemoryPhotoStore::new()),
        Arc::new(notifications),
        Arc::new(MemorySession::new()),
        &EmbeddedPhotoProvider,
    )
    .unwrap();

    let to: BTreeSet<AccountKey> = [key("1")].into_iter().collect();
    let err = facade.send(notification("/x"), to).await.unwrap_err();
    assert!(err.is_retryable());
}

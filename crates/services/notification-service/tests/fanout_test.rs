//! Notification fan-out tests against the in-process transport.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use common::AppError;
use domain::{AccountKey, Notification, NotificationBuilder, NotificationEvent, TypeTarget};
use notification_service::{
    Batch, KvNotificationStore, KvTransport, MemoryTransport, NotificationStore,
};

fn key(id: &str) -> AccountKey {
    AccountKey::new(id).unwrap()
}

fn to(ids: &[&str]) -> BTreeSet<AccountKey> {
    ids.iter().map(|id| key(id)).collect()
}

fn info(target: &str, title: &str) -> Notification {
    NotificationBuilder::new()
        .with_sender("ts")
        .with_type("info")
        .with_title(title)
        .with_content("Something happened")
        .with_target_url(target)
        .build()
        .unwrap()
}

fn setup() -> (Arc<MemoryTransport>, KvNotificationStore) {
    let transport = Arc::new(MemoryTransport::new());
    let store = KvNotificationStore::new(transport.clone());
    (transport, store)
}

#[tokio::test]
async fn test_send_reaches_every_recipient() {
    let (_, store) = setup();
    let notification = info("/x", "Hello");

    store
        .send(NotificationEvent::new(notification.clone(), to(&["A", "B"])))
        .await
        .unwrap();

    assert_eq!(
        store.get_current_notifications(&key("A")).await.unwrap(),
        vec![notification.clone()]
    );
    assert_eq!(
        store.get_current_notifications(&key("B")).await.unwrap(),
        vec![notification]
    );
    assert!(store.get_current_notifications(&key("C")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_all_clears_inboxes_but_keeps_record() {
    let (transport, store) = setup();
    let notification = info("/x", "Hello");
    let uuid = notification.uuid();

    store
        .send(NotificationEvent::new(notification.clone(), to(&["A", "B"])))
        .await
        .unwrap();
    store
        .remove_all(&TypeTarget::new(Some("info".to_string()), "/x"))
        .await
        .unwrap();

    assert!(store.get_current_notifications(&key("A")).await.unwrap().is_empty());
    assert!(store.get_current_notifications(&key("B")).await.unwrap().is_empty());

    let record = transport
        .hash_get_all(&format!("notif:{}", uuid))
        .await
        .unwrap();
    assert_eq!(record.get("title").map(String::as_str), Some("Hello"));
    assert_eq!(store.get_notification(uuid).await.unwrap(), Some(notification));

    // Nothing left to remove
    store
        .remove_all(&TypeTarget::new(Some("info".to_string()), "/x"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_remove_all_only_touches_matching_pair() {
    let (_, store) = setup();
    let on_x = info("/x", "On x");
    let on_y = info("/y", "On y");

    store
        .send(NotificationEvent::new(on_x, to(&["A"])))
        .await
        .unwrap();
    store
        .send(NotificationEvent::new(on_y.clone(), to(&["A"])))
        .await
        .unwrap();
    store
        .remove_all(&TypeTarget::new(Some("info".to_string()), "/x"))
        .await
        .unwrap();

    assert_eq!(
        store.get_current_notifications(&key("A")).await.unwrap(),
        vec![on_y]
    );
}

#[tokio::test]
async fn test_remove_only_affects_one_inbox() {
    let (_, store) = setup();
    let notification = info("/x", "Hello");

    store
        .send(NotificationEvent::new(notification.clone(), to(&["A", "B"])))
        .await
        .unwrap();
    store.remove(&key("A"), notification.uuid()).await.unwrap();

    assert!(store.get_current_notifications(&key("A")).await.unwrap().is_empty());
    assert_eq!(
        store.get_current_notifications(&key("B")).await.unwrap(),
        vec![notification]
    );
}

#[tokio::test]
async fn test_inbox_is_newest_first() {
    let (_, store) = setup();
    let first = info("/1", "first");
    let second = info("/2", "second");

    store
        .send(NotificationEvent::new(first.clone(), to(&["A"])))
        .await
        .unwrap();
    store
        .send(NotificationEvent::new(second.clone(), to(&["A"])))
        .await
        .unwrap();

    assert_eq!(
        store.get_current_notifications(&key("A")).await.unwrap(),
        vec![second, first]
    );
}

#[tokio::test]
async fn test_untyped_notification_round_trips() {
    let (_, store) = setup();
    let notification = NotificationBuilder::new()
        .with_sender("ts")
        .with_title("No type")
        .with_content("c")
        .with_target_url("/z")
        .build()
        .unwrap();

    store
        .send(NotificationEvent::new(notification.clone(), to(&["A"])))
        .await
        .unwrap();
    assert_eq!(
        store.get_current_notifications(&key("A")).await.unwrap(),
        vec![notification]
    );

    store.remove_all(&TypeTarget::new(None, "/z")).await.unwrap();
    assert!(store.get_current_notifications(&key("A")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sub_millisecond_date_round_trips() {
    let (_, store) = setup();
    let date = Utc
        .with_ymd_and_hms(2024, 3, 1, 10, 20, 30)
        .unwrap()
        .checked_add_signed(chrono::Duration::nanoseconds(123_456_789))
        .unwrap();
    let notification = NotificationBuilder::new()
        .with_sender("ts")
        .with_title("Precise")
        .with_content("c")
        .with_creation_date(date)
        .with_target_url("/p")
        .build()
        .unwrap();

    store
        .send(NotificationEvent::new(notification.clone(), to(&["A"])))
        .await
        .unwrap();

    let fetched = store.get_notification(notification.uuid()).await.unwrap();
    assert_eq!(fetched, Some(notification));
}

#[tokio::test]
async fn test_failed_send_leaves_nothing_behind() {
    let (transport, store) = setup();

    // B's inbox key holds a string, so the batch is rejected as a whole
    let mut seed = Batch::new();
    seed.set("notifs:B", "not a list");
    transport.execute(seed).await.unwrap();

    let notification = info("/x", "Hello");
    let err = store
        .send(NotificationEvent::new(notification.clone(), to(&["A", "B"])))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Decode(_)));
    assert!(store.get_current_notifications(&key("A")).await.unwrap().is_empty());
    assert_eq!(store.get_notification(notification.uuid()).await.unwrap(), None);
    assert_eq!(
        transport.get("type:info;target:/x;uuid").await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_dangling_inbox_entry_is_skipped() {
    let (transport, store) = setup();
    let notification = info("/x", "Hello");

    store
        .send(NotificationEvent::new(notification.clone(), to(&["A"])))
        .await
        .unwrap();
    let mut dangling = Batch::new();
    dangling.list_push_front("notifs:A", "00000000-0000-0000-0000-000000000000");
    transport.execute(dangling).await.unwrap();

    assert_eq!(
        store.get_current_notifications(&key("A")).await.unwrap(),
        vec![notification]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sends_are_all_delivered() {
    let (transport, store) = setup();
    let store = Arc::new(store);

    let sends = (0..32).map(|i| {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            store
                .send(NotificationEvent::new(
                    info("/x", &format!("n{}", i)),
                    to(&["A", "B"]),
                ))
                .await
        })
    });
    for result in futures::future::join_all(sends).await {
        result.unwrap().unwrap();
    }

    assert_eq!(store.get_current_notifications(&key("A")).await.unwrap().len(), 32);
    assert_eq!(store.get_current_notifications(&key("B")).await.unwrap().len(), 32);
    assert_eq!(
        transport
            .list_range("type:info;target:/x", 0, -1)
            .await
            .unwrap()
            .len(),
        64
    );
}

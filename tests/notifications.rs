mod common;

use common::{create_group, register, store};
use study_hub_core::api::{notifications, requests};

#[tokio::test]
async fn mark_all_read_zeroes_the_unread_count_idempotently() {
    let store = store();
    let creator = register(&store, "Ana", "ana@example.com").await;
    let riley = register(&store, "Riley", "riley@example.com").await;
    let sam = register(&store, "Sam", "sam@example.com").await;
    let group = create_group(&store, "Algebra Crew", "Math", creator).await;

    requests::create_join_request(&store, group, riley)
        .await
        .unwrap();
    requests::create_join_request(&store, group, sam)
        .await
        .unwrap();
    assert_eq!(
        notifications::unread_count(&store, creator).await.unwrap(),
        2
    );

    notifications::mark_all_read(&store, creator).await.unwrap();
    assert_eq!(
        notifications::unread_count(&store, creator).await.unwrap(),
        0
    );

    // a second pass has nothing left to flip
    notifications::mark_all_read(&store, creator).await.unwrap();
    assert_eq!(
        notifications::unread_count(&store, creator).await.unwrap(),
        0
    );

    // history is kept, only the status changed
    let inbox = notifications::list_notifications(&store, creator)
        .await
        .unwrap();
    assert_eq!(inbox.len(), 2);
    assert!(inbox.iter().all(|n| n.status == "read"));
}

#[tokio::test]
async fn notifications_are_listed_newest_first() {
    let store = store();
    let creator = register(&store, "Ana", "ana@example.com").await;
    let riley = register(&store, "Riley", "riley@example.com").await;
    let sam = register(&store, "Sam", "sam@example.com").await;
    let group = create_group(&store, "Algebra Crew", "Math", creator).await;

    let first = requests::create_join_request(&store, group, riley)
        .await
        .unwrap();
    let second = requests::create_join_request(&store, group, sam)
        .await
        .unwrap();

    let inbox = notifications::list_notifications(&store, creator)
        .await
        .unwrap();
    assert_eq!(inbox.len(), 2);
    assert_eq!(inbox[0].id, second.notification_id);
    assert_eq!(inbox[1].id, first.notification_id);
}

#[tokio::test]
async fn listing_is_repeatable_and_scoped_to_the_recipient() {
    let store = store();
    let creator = register(&store, "Ana", "ana@example.com").await;
    let riley = register(&store, "Riley", "riley@example.com").await;
    let group = create_group(&store, "Algebra Crew", "Math", creator).await;

    requests::create_join_request(&store, group, riley)
        .await
        .unwrap();

    let once = notifications::list_notifications(&store, creator)
        .await
        .unwrap();
    let twice = notifications::list_notifications(&store, creator)
        .await
        .unwrap();
    assert_eq!(
        once.iter().map(|n| n.id).collect::<Vec<_>>(),
        twice.iter().map(|n| n.id).collect::<Vec<_>>()
    );

    // the requester has nothing yet
    assert!(notifications::list_notifications(&store, riley)
        .await
        .unwrap()
        .is_empty());
}

mod common;

use common::{create_group, register, store};
use study_hub_core::api::{membership, notifications, requests};
use study_hub_core::models::RequestStatus;
use study_hub_core::AppError;

#[tokio::test]
async fn new_request_creates_pending_request_and_creator_notification() {
    let store = store();
    let creator = register(&store, "Ana", "ana@example.com").await;
    let requester = register(&store, "Riley", "riley@example.com").await;
    let group = create_group(&store, "Algebra Crew", "Math", creator).await;

    let receipt = requests::create_join_request(&store, group, requester)
        .await
        .unwrap();

    let pending = requests::group_join_requests(&store, group).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, receipt.request_id);
    assert_eq!(pending[0].status, RequestStatus::Pending.as_str());

    let inbox = notifications::list_notifications(&store, creator)
        .await
        .unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].id, receipt.notification_id);
    assert_eq!(inbox[0].kind, "join_request");
    assert_eq!(inbox[0].request_id, Some(receipt.request_id));
    assert_eq!(inbox[0].sender_name.as_deref(), Some("Riley"));
    assert_eq!(inbox[0].group_name.as_deref(), Some("Algebra Crew"));
    assert_eq!(inbox[0].content, "Riley wants to join Algebra Crew");
    assert_eq!(
        notifications::unread_count(&store, creator).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn duplicate_pending_request_is_rejected_without_writes() {
    let store = store();
    let creator = register(&store, "Ana", "ana@example.com").await;
    let requester = register(&store, "Riley", "riley@example.com").await;
    let group = create_group(&store, "Algebra Crew", "Math", creator).await;

    requests::create_join_request(&store, group, requester)
        .await
        .unwrap();
    let err = requests::create_join_request(&store, group, requester)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateRequest));

    let all = requests::group_join_requests(&store, group).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(
        notifications::unread_count(&store, creator).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn members_cannot_request_to_join() {
    let store = store();
    let creator = register(&store, "Ana", "ana@example.com").await;
    let group = create_group(&store, "Algebra Crew", "Math", creator).await;

    // the creator is enrolled at group creation
    let err = requests::create_join_request(&store, group, creator)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyMember));
    assert!(requests::group_join_requests(&store, group)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(
        notifications::unread_count(&store, creator).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn unknown_group_and_requester_fail_fast() {
    let store = store();
    let creator = register(&store, "Ana", "ana@example.com").await;
    let group = create_group(&store, "Algebra Crew", "Math", creator).await;

    let err = requests::create_join_request(&store, 999, creator)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound("group")));

    let err = requests::create_join_request(&store, group, 999)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound("user")));
}

#[tokio::test]
async fn accepting_adds_membership_and_notifies_requester() {
    let store = store();
    let creator = register(&store, "Ana", "ana@example.com").await;
    let requester = register(&store, "Riley", "riley@example.com").await;
    let group = create_group(&store, "Algebra Crew", "Math", creator).await;

    let receipt = requests::create_join_request(&store, group, requester)
        .await
        .unwrap();
    requests::resolve_join_request(&store, receipt.request_id, true, "welcome aboard")
        .await
        .unwrap();

    assert!(membership::is_member(&store, group, requester)
        .await
        .unwrap());

    let all = requests::group_join_requests(&store, group).await.unwrap();
    assert_eq!(all[0].status, RequestStatus::Accepted.as_str());

    let inbox = notifications::list_notifications(&store, requester)
        .await
        .unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, "join_request_response");
    assert_eq!(inbox[0].content, "welcome aboard");
    assert_eq!(inbox[0].sender_name.as_deref(), Some("Ana"));
    assert_eq!(inbox[0].request_id, Some(receipt.request_id));
}

#[tokio::test]
async fn rejecting_notifies_without_membership() {
    let store = store();
    let creator = register(&store, "Ana", "ana@example.com").await;
    let requester = register(&store, "Riley", "riley@example.com").await;
    let group = create_group(&store, "Algebra Crew", "Math", creator).await;

    let receipt = requests::create_join_request(&store, group, requester)
        .await
        .unwrap();
    requests::resolve_join_request(&store, receipt.request_id, false, "group is full")
        .await
        .unwrap();

    assert!(!membership::is_member(&store, group, requester)
        .await
        .unwrap());

    let all = requests::group_join_requests(&store, group).await.unwrap();
    assert_eq!(all[0].status, RequestStatus::Rejected.as_str());

    let inbox = notifications::list_notifications(&store, requester)
        .await
        .unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].content, "group is full");
}

#[tokio::test]
async fn terminal_requests_cannot_be_resolved_again() {
    let store = store();
    let creator = register(&store, "Ana", "ana@example.com").await;
    let requester = register(&store, "Riley", "riley@example.com").await;
    let group = create_group(&store, "Algebra Crew", "Math", creator).await;

    let receipt = requests::create_join_request(&store, group, requester)
        .await
        .unwrap();
    requests::resolve_join_request(&store, receipt.request_id, false, "group is full")
        .await
        .unwrap();

    let err = requests::resolve_join_request(&store, receipt.request_id, true, "changed my mind")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyResolved));

    // the failed resolve must not have written anything
    assert!(!membership::is_member(&store, group, requester)
        .await
        .unwrap());
    let inbox = notifications::list_notifications(&store, requester)
        .await
        .unwrap();
    assert_eq!(inbox.len(), 1);
}

#[tokio::test]
async fn resolving_an_unknown_request_fails() {
    let store = store();
    register(&store, "Ana", "ana@example.com").await;

    let err = requests::resolve_join_request(&store, 42, true, "hello")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound("join request")));
}

#[tokio::test]
async fn rejected_users_may_request_again() {
    let store = store();
    let creator = register(&store, "Ana", "ana@example.com").await;
    let requester = register(&store, "Riley", "riley@example.com").await;
    let group = create_group(&store, "Algebra Crew", "Math", creator).await;

    let first = requests::create_join_request(&store, group, requester)
        .await
        .unwrap();
    requests::resolve_join_request(&store, first.request_id, false, "not yet")
        .await
        .unwrap();

    // only *pending* requests are unique per (group, user)
    let second = requests::create_join_request(&store, group, requester)
        .await
        .unwrap();
    assert_ne!(first.request_id, second.request_id);

    let all = requests::group_join_requests(&store, group).await.unwrap();
    assert_eq!(all.len(), 2);
}

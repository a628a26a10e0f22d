use crate::{
    api::membership,
    error::{AppError, AppResult},
    models::{
        JoinRequest, NewGroupMember, NewJoinRequest, NewNotification, Notification,
        NotificationKind, RequestStatus, StudyGroup, User,
    },
    schema::*,
    store::Datastore,
};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequestReceipt {
    pub request_id: i32,
    pub notification_id: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequestView {
    pub id: i32,
    pub group_id: i32,
    pub user_id: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
}

/// Files a request to join a group and notifies the group creator, as one
/// transaction. Guards run in order so each failure is distinct: unknown
/// group, requester already a member, request already pending, unknown
/// requester.
pub async fn create_join_request(
    store: &Datastore,
    group_id: i32,
    user_id: i32,
) -> AppResult<JoinRequestReceipt> {
    store
        .with_conn(|conn| {
            conn.transaction(|conn| {
                let group = study_groups::table
                    .find(group_id)
                    .first::<StudyGroup>(conn)
                    .optional()?
                    .ok_or(AppError::NotFound("group"))?;
                if membership::member_exists(conn, group_id, user_id)? {
                    return Err(AppError::AlreadyMember);
                }
                let pending: i64 = join_requests::table
                    .filter(join_requests::group_id.eq(group_id))
                    .filter(join_requests::user_id.eq(user_id))
                    .filter(join_requests::status.eq(RequestStatus::Pending.as_str()))
                    .count()
                    .get_result(conn)?;
                if pending > 0 {
                    return Err(AppError::DuplicateRequest);
                }
                let requester = users::table
                    .find(user_id)
                    .first::<User>(conn)
                    .optional()?
                    .ok_or(AppError::NotFound("user"))?;

                // the partial unique index is the authoritative duplicate
                // check; the count above only buys the fail-fast error
                let request = diesel::insert_into(join_requests::table)
                    .values(NewJoinRequest { group_id, user_id })
                    .get_result::<JoinRequest>(conn)
                    .map_err(|e| match e {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            AppError::DuplicateRequest
                        }
                        other => other.into(),
                    })?;

                let notification = diesel::insert_into(notifications::table)
                    .values(NewNotification {
                        recipient_id: group.creator_id,
                        sender_id: Some(user_id),
                        kind: NotificationKind::JoinRequest.as_str(),
                        content: format!("{} wants to join {}", requester.name, group.name),
                        group_id: Some(group_id),
                        request_id: Some(request.id),
                    })
                    .get_result::<Notification>(conn)?;

                Ok(JoinRequestReceipt {
                    request_id: request.id,
                    notification_id: notification.id,
                })
            })
        })
        .await
}

/// Accepts or rejects a pending request and notifies the requester with the
/// supplied content. Pending is the only state this transitions from; a
/// second resolve fails with `AlreadyResolved`. Returns the id of the new
/// notification.
pub async fn resolve_join_request(
    store: &Datastore,
    request_id: i32,
    accepted: bool,
    content: &str,
) -> AppResult<i32> {
    store
        .with_conn(|conn| {
            conn.transaction(|conn| {
                let request = join_requests::table
                    .find(request_id)
                    .first::<JoinRequest>(conn)
                    .optional()?
                    .ok_or(AppError::NotFound("join request"))?;
                if request.status != RequestStatus::Pending.as_str() {
                    return Err(AppError::AlreadyResolved);
                }

                let new_status = if accepted {
                    RequestStatus::Accepted
                } else {
                    RequestStatus::Rejected
                };
                diesel::update(join_requests::table.find(request_id))
                    .set(join_requests::status.eq(new_status.as_str()))
                    .execute(conn)?;

                if accepted {
                    // a racing direct insert loses silently; accepting twice
                    // is impossible past the status guard
                    diesel::insert_into(group_members::table)
                        .values(NewGroupMember {
                            group_id: request.group_id,
                            user_id: request.user_id,
                        })
                        .on_conflict((group_members::group_id, group_members::user_id))
                        .do_nothing()
                        .execute(conn)?;
                }

                let creator_id = study_groups::table
                    .find(request.group_id)
                    .select(study_groups::creator_id)
                    .first::<i32>(conn)
                    .optional()?;

                let notification = diesel::insert_into(notifications::table)
                    .values(NewNotification {
                        recipient_id: request.user_id,
                        sender_id: creator_id,
                        kind: NotificationKind::JoinRequestResponse.as_str(),
                        content: content.to_string(),
                        group_id: Some(request.group_id),
                        request_id: Some(request.id),
                    })
                    .get_result::<Notification>(conn)?;

                Ok(notification.id)
            })
        })
        .await
}

pub async fn group_join_requests(
    store: &Datastore,
    group_id: i32,
) -> AppResult<Vec<JoinRequestView>> {
    store
        .with_conn(|conn| {
            let rows = join_requests::table
                .filter(join_requests::group_id.eq(group_id))
                .order((join_requests::created_at.desc(), join_requests::id.desc()))
                .load::<JoinRequest>(conn)?;
            Ok(rows
                .into_iter()
                .map(|r| JoinRequestView {
                    id: r.id,
                    group_id: r.group_id,
                    user_id: r.user_id,
                    status: r.status,
                    created_at: r.created_at,
                })
                .collect())
        })
        .await
}

use crate::{
    error::AppResult,
    models::{Notification, NotificationStatus},
    schema::*,
    store::Datastore,
};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: i32,
    pub kind: String,
    pub content: String,
    pub sender_name: Option<String>,
    pub group_name: Option<String>,
    pub group_id: Option<i32>,
    pub request_id: Option<i32>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

/// Everything addressed to this user, newest first, with the sender and
/// group display names resolved for rendering.
pub async fn list_notifications(
    store: &Datastore,
    user_id: i32,
) -> AppResult<Vec<NotificationView>> {
    store
        .with_conn(|conn| {
            let rows = notifications::table
                .left_join(users::table.on(notifications::sender_id.eq(users::id.nullable())))
                .left_join(
                    study_groups::table
                        .on(notifications::group_id.eq(study_groups::id.nullable())),
                )
                .filter(notifications::recipient_id.eq(user_id))
                .order((notifications::created_at.desc(), notifications::id.desc()))
                .select((
                    notifications::all_columns,
                    users::name.nullable(),
                    study_groups::name.nullable(),
                ))
                .load::<(Notification, Option<String>, Option<String>)>(conn)?;

            Ok(rows
                .into_iter()
                .map(|(n, sender_name, group_name)| NotificationView {
                    id: n.id,
                    kind: n.kind,
                    content: n.content,
                    sender_name,
                    group_name,
                    group_id: n.group_id,
                    request_id: n.request_id,
                    status: n.status,
                    created_at: n.created_at,
                })
                .collect())
        })
        .await
}

pub async fn unread_count(store: &Datastore, user_id: i32) -> AppResult<i64> {
    store
        .with_conn(|conn| {
            Ok(notifications::table
                .filter(notifications::recipient_id.eq(user_id))
                .filter(notifications::status.eq(NotificationStatus::Unread.as_str()))
                .count()
                .get_result(conn)?)
        })
        .await
}

pub async fn mark_all_read(store: &Datastore, user_id: i32) -> AppResult<()> {
    store
        .with_conn(|conn| {
            diesel::update(
                notifications::table
                    .filter(notifications::recipient_id.eq(user_id))
                    .filter(notifications::status.eq(NotificationStatus::Unread.as_str())),
            )
            .set(notifications::status.eq(NotificationStatus::Read.as_str()))
            .execute(conn)?;
            Ok(())
        })
        .await
}

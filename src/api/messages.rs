use crate::{
    error::{AppError, AppResult},
    models::{Message, MessageKind, NewMessage},
    schema::*,
    store::Datastore,
};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: i32,
    pub user_id: i32,
    pub sender_name: String,
    pub content: String,
    pub message_type: String,
    pub image_url: Option<String>,
    pub created_at: NaiveDateTime,
}

pub async fn send_message(
    store: &Datastore,
    group_id: i32,
    user_id: i32,
    content: &str,
    kind: MessageKind,
    image_url: Option<&str>,
) -> AppResult<i32> {
    store
        .with_conn(|conn| {
            let group_exists: i64 = study_groups::table
                .filter(study_groups::id.eq(group_id))
                .count()
                .get_result(conn)?;
            if group_exists == 0 {
                return Err(AppError::NotFound("group"));
            }
            let sender_exists: i64 = users::table
                .filter(users::id.eq(user_id))
                .count()
                .get_result(conn)?;
            if sender_exists == 0 {
                return Err(AppError::NotFound("user"));
            }
            let message = diesel::insert_into(messages::table)
                .values(NewMessage {
                    group_id,
                    user_id,
                    content,
                    message_type: kind.as_str(),
                    image_url,
                })
                .get_result::<Message>(conn)?;
            Ok(message.id)
        })
        .await
}

/// Group chat history, newest first, with sender display names joined in.
/// Safe to poll: a pure re-query.
pub async fn group_messages(store: &Datastore, group_id: i32) -> AppResult<Vec<MessageView>> {
    store
        .with_conn(|conn| {
            let rows = messages::table
                .inner_join(users::table)
                .filter(messages::group_id.eq(group_id))
                .order((messages::created_at.desc(), messages::id.desc()))
                .select((messages::all_columns, users::name))
                .load::<(Message, String)>(conn)?;
            Ok(rows
                .into_iter()
                .map(|(m, sender_name)| MessageView {
                    id: m.id,
                    user_id: m.user_id,
                    sender_name,
                    content: m.content,
                    message_type: m.message_type,
                    image_url: m.image_url,
                    created_at: m.created_at,
                })
                .collect())
        })
        .await
}

use crate::schema::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Queryable, Identifiable)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
    pub description: Option<String>,
    pub subjects_of_interest: Option<String>,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
pub struct StudyGroup {
    pub id: i32,
    pub name: String,
    pub subject: String,
    pub creator_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = study_groups)]
pub struct NewStudyGroup<'a> {
    pub name: &'a str,
    pub subject: &'a str,
    pub creator_id: i32,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = group_members)]
pub struct GroupMember {
    pub id: i32,
    pub group_id: i32,
    pub user_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = group_members)]
pub struct NewGroupMember {
    pub group_id: i32,
    pub user_id: i32,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = availability)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    pub id: i32,
    pub group_id: i32,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Insertable)]
#[diesel(table_name = availability)]
pub struct NewAvailabilitySlot<'a> {
    pub group_id: i32,
    pub day: &'a str,
    pub start_time: &'a str,
    pub end_time: &'a str,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
pub struct JoinRequest {
    pub id: i32,
    pub group_id: i32,
    pub user_id: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
}

// status and created_at come from column defaults
#[derive(Insertable)]
#[diesel(table_name = join_requests)]
pub struct NewJoinRequest {
    pub group_id: i32,
    pub user_id: i32,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
pub struct Notification {
    pub id: i32,
    pub recipient_id: i32,
    pub sender_id: Option<i32>,
    pub kind: String,
    pub content: String,
    pub group_id: Option<i32>,
    pub request_id: Option<i32>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotification<'a> {
    pub recipient_id: i32,
    pub sender_id: Option<i32>,
    pub kind: &'a str,
    pub content: String,
    pub group_id: Option<i32>,
    pub request_id: Option<i32>,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
pub struct Message {
    pub id: i32,
    pub group_id: i32,
    pub user_id: i32,
    pub content: String,
    pub message_type: String,
    pub image_url: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessage<'a> {
    pub group_id: i32,
    pub user_id: i32,
    pub content: &'a str,
    pub message_type: &'a str,
    pub image_url: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    JoinRequest,
    JoinRequestResponse,
}

impl NotificationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            NotificationKind::JoinRequest => "join_request",
            NotificationKind::JoinRequestResponse => "join_request_response",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStatus {
    Unread,
    Read,
}

impl NotificationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            NotificationStatus::Unread => "unread",
            NotificationStatus::Read => "read",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Image,
}

impl MessageKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Image => "image",
        }
    }
}

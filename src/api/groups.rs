use crate::{
    error::{AppError, AppResult},
    models::{NewGroupMember, NewStudyGroup, StudyGroup, User},
    schema::*,
    store::Datastore,
};
use diesel::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyGroupView {
    pub id: i32,
    pub name: String,
    pub subject: String,
    pub creator_id: i32,
    pub creator_name: String,
}

impl StudyGroupView {
    fn from_row(group: StudyGroup, creator_name: String) -> Self {
        Self {
            id: group.id,
            name: group.name,
            subject: group.subject,
            creator_id: group.creator_id,
            creator_name,
        }
    }
}

/// Creates a group and enrolls its creator as the first member, in one
/// transaction.
pub async fn create_study_group(
    store: &Datastore,
    name: &str,
    subject: &str,
    creator_id: i32,
) -> AppResult<i32> {
    store
        .with_conn(|conn| {
            conn.transaction(|conn| {
                let creator_exists: i64 = users::table
                    .filter(users::id.eq(creator_id))
                    .count()
                    .get_result(conn)?;
                if creator_exists == 0 {
                    return Err(AppError::NotFound("user"));
                }
                let group = diesel::insert_into(study_groups::table)
                    .values(NewStudyGroup {
                        name,
                        subject,
                        creator_id,
                    })
                    .get_result::<StudyGroup>(conn)?;
                diesel::insert_into(group_members::table)
                    .values(NewGroupMember {
                        group_id: group.id,
                        user_id: creator_id,
                    })
                    .execute(conn)?;
                Ok(group.id)
            })
        })
        .await
}

pub async fn study_group(store: &Datastore, group_id: i32) -> AppResult<StudyGroupView> {
    store
        .with_conn(|conn| {
            let (group, creator_name) = study_groups::table
                .inner_join(users::table)
                .filter(study_groups::id.eq(group_id))
                .select((study_groups::all_columns, users::name))
                .first::<(StudyGroup, String)>(conn)
                .optional()?
                .ok_or(AppError::NotFound("group"))?;
            Ok(StudyGroupView::from_row(group, creator_name))
        })
        .await
}

/// All groups, optionally narrowed to a set of subjects, with the creator's
/// display name joined in.
pub async fn list_study_groups(
    store: &Datastore,
    subjects: Option<&[String]>,
) -> AppResult<Vec<StudyGroupView>> {
    store
        .with_conn(|conn| {
            let mut query = study_groups::table
                .inner_join(users::table)
                .select((study_groups::all_columns, users::name))
                .into_boxed();
            if let Some(subjects) = subjects.filter(|s| !s.is_empty()) {
                query = query.filter(study_groups::subject.eq_any(subjects));
            }
            let rows = query.load::<(StudyGroup, String)>(conn)?;
            Ok(rows
                .into_iter()
                .map(|(group, creator_name)| StudyGroupView::from_row(group, creator_name))
                .collect())
        })
        .await
}

pub async fn unique_subjects(store: &Datastore) -> AppResult<Vec<String>> {
    store
        .with_conn(|conn| {
            Ok(study_groups::table
                .select(study_groups::subject)
                .distinct()
                .load::<String>(conn)?)
        })
        .await
}

/// Creator or admin only. Takes the group's members, availability, chat,
/// requests, and notifications with it, in one transaction.
pub async fn delete_study_group(
    store: &Datastore,
    caller_id: i32,
    group_id: i32,
) -> AppResult<()> {
    store
        .with_conn(|conn| {
            conn.transaction(|conn| {
                let group = study_groups::table
                    .find(group_id)
                    .first::<StudyGroup>(conn)
                    .optional()?
                    .ok_or(AppError::NotFound("group"))?;
                let caller = users::table
                    .find(caller_id)
                    .first::<User>(conn)
                    .optional()?
                    .ok_or(AppError::NotFound("user"))?;
                if group.creator_id != caller.id && !caller.is_admin {
                    return Err(AppError::Forbidden(
                        "only the group creator or an administrator may delete a group",
                    ));
                }
                delete_group_rows(conn, group_id)?;
                Ok(())
            })
        })
        .await
}

/// Deletes one group and every row that references it. Caller provides the
/// transaction.
pub(crate) fn delete_group_rows(conn: &mut SqliteConnection, group_id: i32) -> QueryResult<()> {
    // notifications referencing this group's requests may not name the
    // group themselves, so collect the request ids first
    let request_ids: Vec<i32> = join_requests::table
        .filter(join_requests::group_id.eq(group_id))
        .select(join_requests::id)
        .load(conn)?;
    diesel::delete(notifications::table.filter(notifications::request_id.eq_any(request_ids)))
        .execute(conn)?;
    diesel::delete(notifications::table.filter(notifications::group_id.eq(group_id)))
        .execute(conn)?;
    diesel::delete(join_requests::table.filter(join_requests::group_id.eq(group_id)))
        .execute(conn)?;
    diesel::delete(messages::table.filter(messages::group_id.eq(group_id))).execute(conn)?;
    diesel::delete(availability::table.filter(availability::group_id.eq(group_id)))
        .execute(conn)?;
    diesel::delete(group_members::table.filter(group_members::group_id.eq(group_id)))
        .execute(conn)?;
    diesel::delete(study_groups::table.find(group_id)).execute(conn)?;
    Ok(())
}

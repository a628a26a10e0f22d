use crate::{
    api::users::UserView,
    error::{AppError, AppResult},
    models::User,
    schema::*,
    store::Datastore,
};
use diesel::prelude::*;

pub(crate) fn member_exists(
    conn: &mut SqliteConnection,
    group_id: i32,
    user_id: i32,
) -> QueryResult<bool> {
    let count: i64 = group_members::table
        .filter(group_members::group_id.eq(group_id))
        .filter(group_members::user_id.eq(user_id))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

pub async fn is_member(store: &Datastore, group_id: i32, user_id: i32) -> AppResult<bool> {
    store
        .with_conn(|conn| Ok(member_exists(conn, group_id, user_id)?))
        .await
}

pub async fn is_creator(store: &Datastore, group_id: i32, user_id: i32) -> AppResult<bool> {
    store
        .with_conn(|conn| {
            let creator_id = study_groups::table
                .find(group_id)
                .select(study_groups::creator_id)
                .first::<i32>(conn)
                .optional()?
                .ok_or(AppError::NotFound("group"))?;
            Ok(creator_id == user_id)
        })
        .await
}

pub async fn group_members(store: &Datastore, group_id: i32) -> AppResult<Vec<UserView>> {
    store
        .with_conn(|conn| {
            let members = group_members::table
                .inner_join(users::table)
                .filter(group_members::group_id.eq(group_id))
                .select(users::all_columns)
                .load::<User>(conn)?;
            Ok(members.into_iter().map(UserView::from).collect())
        })
        .await
}

/// Only the group creator may remove members, and never themselves.
pub async fn remove_member(
    store: &Datastore,
    caller_id: i32,
    group_id: i32,
    member_id: i32,
) -> AppResult<()> {
    store
        .with_conn(|conn| {
            let creator_id = study_groups::table
                .find(group_id)
                .select(study_groups::creator_id)
                .first::<i32>(conn)
                .optional()?
                .ok_or(AppError::NotFound("group"))?;
            if creator_id != caller_id {
                return Err(AppError::Forbidden(
                    "only the group creator may remove members",
                ));
            }
            if member_id == creator_id {
                return Err(AppError::Forbidden("the group creator cannot be removed"));
            }
            let removed = diesel::delete(
                group_members::table
                    .filter(group_members::group_id.eq(group_id))
                    .filter(group_members::user_id.eq(member_id)),
            )
            .execute(conn)?;
            if removed == 0 {
                return Err(AppError::NotFound("membership"));
            }
            Ok(())
        })
        .await
}

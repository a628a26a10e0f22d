use crate::{
    api::groups,
    error::{AppError, AppResult},
    models::User,
    schema::*,
    store::Datastore,
};
use diesel::prelude::*;
use serde::Serialize;

/// What the UI sees of a user. The stored password never crosses the
/// boundary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub description: Option<String>,
    pub subjects_of_interest: Option<String>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
            description: user.description,
            subjects_of_interest: user.subjects_of_interest,
        }
    }
}

pub async fn get_user(store: &Datastore, user_id: i32) -> AppResult<UserView> {
    store
        .with_conn(|conn| {
            let user = users::table
                .find(user_id)
                .first::<User>(conn)
                .optional()?
                .ok_or(AppError::NotFound("user"))?;
            Ok(UserView::from(user))
        })
        .await
}

pub async fn update_profile(
    store: &Datastore,
    user_id: i32,
    description: &str,
    subjects_of_interest: &str,
) -> AppResult<()> {
    #[derive(AsChangeset)]
    #[diesel(table_name = users)]
    struct ProfileEdit<'a> {
        description: &'a str,
        subjects_of_interest: &'a str,
    }

    store
        .with_conn(|conn| {
            let updated = diesel::update(users::table.find(user_id))
                .set(ProfileEdit {
                    description,
                    subjects_of_interest,
                })
                .execute(conn)?;
            if updated == 0 {
                return Err(AppError::NotFound("user"));
            }
            Ok(())
        })
        .await
}

/// Admin-only. Removes the account along with every group it created,
/// its memberships, messages, requests, and notifications, in one
/// transaction.
pub async fn delete_user(store: &Datastore, caller_id: i32, user_id: i32) -> AppResult<()> {
    store
        .with_conn(|conn| {
            conn.transaction(|conn| {
                let caller = users::table
                    .find(caller_id)
                    .first::<User>(conn)
                    .optional()?
                    .ok_or(AppError::NotFound("user"))?;
                if !caller.is_admin {
                    return Err(AppError::Forbidden(
                        "only an administrator may delete accounts",
                    ));
                }
                let target_exists: i64 = users::table
                    .filter(users::id.eq(user_id))
                    .count()
                    .get_result(conn)?;
                if target_exists == 0 {
                    return Err(AppError::NotFound("user"));
                }

                let owned_groups: Vec<i32> = study_groups::table
                    .filter(study_groups::creator_id.eq(user_id))
                    .select(study_groups::id)
                    .load(conn)?;
                for group_id in owned_groups {
                    groups::delete_group_rows(conn, group_id)?;
                }

                diesel::delete(group_members::table.filter(group_members::user_id.eq(user_id)))
                    .execute(conn)?;
                diesel::delete(messages::table.filter(messages::user_id.eq(user_id)))
                    .execute(conn)?;

                // requests made by this user, and the creator-side
                // notifications pointing at them
                let request_ids: Vec<i32> = join_requests::table
                    .filter(join_requests::user_id.eq(user_id))
                    .select(join_requests::id)
                    .load(conn)?;
                diesel::delete(
                    notifications::table.filter(notifications::request_id.eq_any(request_ids)),
                )
                .execute(conn)?;
                diesel::delete(join_requests::table.filter(join_requests::user_id.eq(user_id)))
                    .execute(conn)?;

                diesel::delete(
                    notifications::table.filter(notifications::recipient_id.eq(user_id)),
                )
                .execute(conn)?;
                diesel::update(notifications::table.filter(notifications::sender_id.eq(user_id)))
                    .set(notifications::sender_id.eq(None::<i32>))
                    .execute(conn)?;

                diesel::delete(users::table.find(user_id)).execute(conn)?;
                Ok(())
            })
        })
        .await
}

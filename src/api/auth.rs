use crate::{
    api::users::UserView,
    error::{AppError, AppResult},
    models::User,
    schema::*,
    store::Datastore,
};
use diesel::prelude::*;

/// Creates an account. Email uniqueness is enforced by the schema; the
/// first account ever registered becomes the administrator.
pub async fn register(
    store: &Datastore,
    name: &str,
    email: &str,
    password: &str,
) -> AppResult<UserView> {
    #[derive(Insertable)]
    #[diesel(table_name = users)]
    struct NewUser<'a> {
        name: &'a str,
        email: &'a str,
        password: &'a str,
        is_admin: bool,
    }

    store
        .with_conn(|conn| {
            conn.transaction(|conn| {
                let existing: i64 = users::table.count().get_result(conn)?;

                let new_user = diesel::insert_into(users::table)
                    .values(NewUser {
                        name,
                        email,
                        password,
                        is_admin: existing == 0,
                    })
                    .on_conflict(users::email)
                    .do_nothing()
                    .get_result::<User>(conn)
                    .optional()?;

                let Some(new_user) = new_user else {
                    return Err(AppError::EmailTaken);
                };

                Ok(UserView::from(new_user))
            })
        })
        .await
}

pub async fn login(store: &Datastore, email: &str, password: &str) -> AppResult<UserView> {
    store
        .with_conn(|conn| {
            // credentials are stored and compared in the clear
            let user = users::table
                .filter(users::email.eq(email))
                .filter(users::password.eq(password))
                .first::<User>(conn)
                .optional()?;
            user.map(UserView::from).ok_or(AppError::InvalidCredentials)
        })
        .await
}

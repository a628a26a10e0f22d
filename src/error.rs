use thiserror::Error;

/// Every failure a caller can receive from a core operation. Each variant
/// renders a distinct, user-presentable message; only `Persistence` is
/// opaque to the user.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("the {0} does not exist")]
    NotFound(&'static str),
    #[error("you are already a member of this group")]
    AlreadyMember,
    #[error("a join request for this group is already pending")]
    DuplicateRequest,
    #[error("this join request has already been resolved")]
    AlreadyResolved,
    #[error("the end time must be after the start time")]
    InvalidRange,
    #[error("not a valid HH:MM time: {0}")]
    InvalidTime(String),
    #[error("not a weekday name: {0}")]
    InvalidDay(String),
    #[error("this time slot overlaps an existing one")]
    Conflict,
    #[error("that email is already registered")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("the datastore failed")]
    Persistence(#[source] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<diesel::result::Error> for AppError {
    fn from(e: diesel::result::Error) -> AppError {
        AppError::Persistence(e.into())
    }
}

impl From<diesel::ConnectionError> for AppError {
    fn from(e: diesel::ConnectionError) -> AppError {
        AppError::Persistence(e.into())
    }
}

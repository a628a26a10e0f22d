pub mod auth;
pub mod availability;
pub mod groups;
pub mod membership;
pub mod messages;
pub mod notifications;
pub mod requests;
pub mod users;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod schema;
pub mod store;

pub use config::StoreConfig;
pub use error::{AppError, AppResult};
pub use store::Datastore;

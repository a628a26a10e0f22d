#![allow(dead_code)]

use study_hub_core::{api, Datastore};

pub fn store() -> Datastore {
    Datastore::in_memory()
}

pub async fn register(store: &Datastore, name: &str, email: &str) -> i32 {
    api::auth::register(store, name, email, "hunter2")
        .await
        .expect("register failed")
        .id
}

pub async fn create_group(store: &Datastore, name: &str, subject: &str, creator_id: i32) -> i32 {
    api::groups::create_study_group(store, name, subject, creator_id)
        .await
        .expect("create_study_group failed")
}

//! Wires the users domain to MongoDB.

use axum::Router;
use domain_users::{Argon2Hasher, MongoNoteRepository, MongoUserRepository, UserService, handlers};

use crate::state::AppState;

pub fn router(state: &AppState, hasher: Argon2Hasher) -> Router {
    let users = MongoUserRepository::new(state.db.clone());
    let notes = MongoNoteRepository::new(state.db.clone());

    let service = UserService::new(users, notes).with_password_hasher(hasher);

    handlers::router(service)
}

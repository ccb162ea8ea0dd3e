//! API routes. Everything here is nested under `/api` by `axum_helpers::create_router`.

pub mod health;
pub mod users;

use axum::Router;
use domain_users::Argon2Hasher;

use crate::state::AppState;

pub fn routes(state: &AppState, hasher: Argon2Hasher) -> Router {
    Router::new()
        .nest("/users", users::router(state, hasher))
        .merge(health::router(state.clone()))
}

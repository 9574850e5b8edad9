pub mod admin;
pub mod auth;
pub mod users;

use axum::routing::{get, patch, post};
use axum::Router;

use crate::state::SharedState;

pub fn admin_routes() -> Router<SharedState> {
    Router::new()
        .route(
            "/admin/v1/users",
            get(admin::list_users).post(admin::create_user),
        )
        .route(
            "/admin/v1/users/{id}",
            patch(admin::update_user).delete(admin::delete_user),
        )
}

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/users", post(users::register))
}

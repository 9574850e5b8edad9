pub mod home;
pub mod register;

use axum::routing::get;
use axum::Router;

use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(home::index))
        .route("/register", get(register::page).post(register::submit))
}

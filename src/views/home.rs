use askama::Template;
use axum::extract::State;
use axum::response::Html;

use crate::config::RegistrationMode;
use crate::error::AppError;
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    registration_open: bool,
}

pub async fn index(State(state): State<SharedState>) -> Result<Html<String>, AppError> {
    let template = IndexTemplate {
        registration_open: state.config.registration == RegistrationMode::Open,
    };
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("Template render failed: {e}")))
}

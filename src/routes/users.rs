use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::config::RegistrationMode;
use crate::error::AppError;
use crate::models::User;
use crate::state::SharedState;
use crate::users;
use crate::users::params::{NewUserParams, UserEnvelope};

/// Self-service sign-up. Never grants admin.
pub async fn register(
    State(state): State<SharedState>,
    payload: Result<Json<UserEnvelope<NewUserParams>>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    if state.config.registration == RegistrationMode::Closed {
        return Err(AppError::Forbidden("Registration is disabled".to_string()));
    }
    let Json(req) = payload?;

    let new_user = req.user.validate_registration()?;
    let user = users::create(&state.pool, new_user).await?;
    Ok(Json(user))
}

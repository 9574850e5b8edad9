use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{encode_token, Claims};
use crate::auth::password;
use crate::db;
use crate::error::AppError;
use crate::rate_limit::WINDOW;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if let Err(retry_after) = state.login_limiter.check(&req.email) {
        return Err(AppError::RateLimited(format!(
            "Too many login attempts. Retry after {retry_after}s"
        )));
    }

    let user = db::users::find_by_email(&state.pool, &req.email).await?;

    // Unknown emails are not tracked by the limiter but still pay for one argon2 run
    let Some(user) = user else {
        password::verify_dummy(req.password).await;
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    };

    let valid = password::verify_off_thread(req.password, user.password_hash.clone())
        .await
        .map_err(AppError::Internal)?;
    if !valid {
        state.login_limiter.cleanup(WINDOW);
        state.login_limiter.record_failure(&req.email);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }
    state.login_limiter.clear(&req.email);

    let claims = Claims::new(user.id, user.admin);
    let access_token =
        encode_token(&claims, &state.config.jwt_secret).map_err(AppError::Internal)?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(LoginResponse { access_token }))
}

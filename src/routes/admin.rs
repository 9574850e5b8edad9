use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::User;
use crate::state::SharedState;
use crate::users;
use crate::users::params::{NewUserParams, UserChanges, UserEnvelope};

/// The calling admin is left out of the listing.
pub async fn list_users(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<User>>, AppError> {
    auth.require_admin()?;
    let users = db::users::list_others(&state.pool, auth.user_id).await?;
    Ok(Json(users))
}

/// Responds 200 rather than 201; clients match on the status.
pub async fn create_user(
    auth: AuthUser,
    State(state): State<SharedState>,
    payload: Result<Json<UserEnvelope<NewUserParams>>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    auth.require_admin()?;
    let Json(req) = payload?;

    let new_user = req.user.validate()?;
    let user = users::create(&state.pool, new_user).await?;

    tracing::info!(admin_id = %auth.user_id, user_id = %user.id, "Admin created user");
    Ok(Json(user))
}

pub async fn update_user(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UserEnvelope<UserChanges>>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    auth.require_admin()?;
    let Json(req) = payload?;

    let changes = req.user.validate()?;
    let user = users::update(&state.pool, id, changes).await?;
    Ok(Json(user))
}

pub async fn delete_user(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    auth.require_admin()?;

    users::delete(&state.pool, id).await?;

    tracing::info!(admin_id = %auth.user_id, user_id = %id, "Admin deleted user");
    Ok(StatusCode::NO_CONTENT)
}

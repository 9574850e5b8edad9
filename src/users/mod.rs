//! User writes shared by the admin API, the public sign-up endpoint and the
//! server-rendered registration page.

pub mod params;
pub mod validation;

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password;
use crate::db;
use crate::db::users::UserUpdate;
use crate::error::AppError;
use crate::models::User;

use params::{ValidChanges, ValidNewUser};

pub async fn create(pool: &PgPool, new_user: ValidNewUser) -> Result<User, AppError> {
    let pw_hash = password::hash_off_thread(new_user.password)
        .await
        .map_err(AppError::Internal)?;

    let user = db::users::create(
        pool,
        &new_user.first_name,
        &new_user.last_name,
        &new_user.email,
        &pw_hash,
        new_user.admin,
    )
    .await
    .map_err(AppError::from_user_write)?;

    tracing::info!(user_id = %user.id, "User created");
    Ok(user)
}

pub async fn update(pool: &PgPool, id: Uuid, changes: ValidChanges) -> Result<User, AppError> {
    if changes.is_empty() {
        return db::users::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()));
    }

    let pw_hash = match changes.password {
        Some(pw) => Some(password::hash_off_thread(pw).await.map_err(AppError::Internal)?),
        None => None,
    };

    let update = UserUpdate {
        first_name: changes.first_name.as_deref(),
        last_name: changes.last_name.as_deref(),
        email: changes.email.as_deref(),
        password_hash: pw_hash.as_deref(),
        admin: changes.admin,
    };

    let user = db::users::update(pool, id, &update)
        .await
        .map_err(AppError::from_user_write)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %user.id, "User updated");
    Ok(user)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    if !db::users::delete(pool, id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    tracing::info!(user_id = %id, "User deleted");
    Ok(())
}

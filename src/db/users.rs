use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::User;

/// Columns to overwrite on an update. `None` leaves the column as is.
#[derive(Debug, Default)]
pub struct UserUpdate<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password_hash: Option<&'a str>,
    pub admin: Option<bool>,
}

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    first_name: &str,
    last_name: &str,
    email: &str,
    password_hash: &str,
    admin: bool,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (id, first_name, last_name, email, password_hash, admin)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(password_hash)
    .bind(admin)
    .fetch_one(executor)
    .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn count_all<'e, E: sqlx::PgExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(executor)
        .await?;
    Ok(row.0)
}

/// Every user except `caller_id`, oldest first.
pub async fn list_others(pool: &PgPool, caller_id: Uuid) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id <> $1 ORDER BY created_at, id")
        .bind(caller_id)
        .fetch_all(pool)
        .await
}

/// Applies only the columns set in `changes`. Returns `None` when no row has `id`.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: &UserUpdate<'_>,
) -> Result<Option<User>, sqlx::Error> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE users SET updated_at = NOW()");

    if let Some(first_name) = changes.first_name {
        query.push(", first_name = ").push_bind(first_name);
    }
    if let Some(last_name) = changes.last_name {
        query.push(", last_name = ").push_bind(last_name);
    }
    if let Some(email) = changes.email {
        query.push(", email = ").push_bind(email);
    }
    if let Some(password_hash) = changes.password_hash {
        query.push(", password_hash = ").push_bind(password_hash);
    }
    if let Some(admin) = changes.admin {
        query.push(", admin = ").push_bind(admin);
    }

    query.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

    query
        .build_query_as::<User>()
        .fetch_optional(pool)
        .await
}

/// Returns `false` when no row had `id`.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

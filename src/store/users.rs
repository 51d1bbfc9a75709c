use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewUser, User};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at";

/// Inserts a new user.
///
/// Fails with `Conflict` when the email is already registered, whether the pre-check
/// catches it or a concurrent signup trips the UNIQUE constraint.
pub async fn create(pool: &SqlitePool, input: NewUser) -> Result<User, AppError> {
    if find_by_email(pool, &input.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let user = User::new(input);
    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.created_at)
    .execute(pool)
    .await
    .map_err(|e| match AppError::from(e) {
        AppError::Conflict(_) => AppError::Conflict("Email already registered".into()),
        other => other,
    })?;

    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE email = ?",
        USER_COLUMNS
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

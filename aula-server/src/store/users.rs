use aula_core::User;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::error::ApiError;

fn user_from_row(row: &SqliteRow) -> Result<User, ApiError> {
    Ok(User {
        user_id: row.try_get("user_id")?,
        full_name: row.try_get("full_name")?,
        profile_pic: row.try_get("profile_pic")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Inserisce un nuovo utente; 409 se il nome è già registrato.
pub async fn insert_user(
    pool: &SqlitePool,
    user: &User,
    password_hash: &str,
    token: &str,
) -> Result<(), ApiError> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE full_name = ?")
        .bind(&user.full_name)
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Err(ApiError::Conflict("name already registered".to_string()));
    }

    sqlx::query(
        "INSERT INTO users (user_id, full_name, password_hash, token, profile_pic, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&user.user_id)
    .bind(&user.full_name)
    .bind(password_hash)
    .bind(token)
    .bind(user.profile_pic.as_deref())
    .bind(&user.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Lookup per login: ritorna l'utente e il password_hash salvato.
pub async fn find_by_full_name(
    pool: &SqlitePool,
    full_name: &str,
) -> Result<Option<(User, String)>, ApiError> {
    let row = sqlx::query(
        "SELECT user_id, full_name, profile_pic, created_at, password_hash \
         FROM users WHERE full_name = ?",
    )
    .bind(full_name)
    .fetch_optional(pool)
    .await?;
    match row {
        Some(row) => {
            let hash: String = row.try_get("password_hash")?;
            Ok(Some((user_from_row(&row)?, hash)))
        }
        None => Ok(None),
    }
}

/// Risolve un bearer token nell'identità autenticata.
pub async fn find_by_token(pool: &SqlitePool, token: &str) -> Result<Option<User>, ApiError> {
    let row = sqlx::query(
        "SELECT user_id, full_name, profile_pic, created_at FROM users WHERE token = ?",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;
    row.as_ref().map(user_from_row).transpose()
}

pub async fn update_token(pool: &SqlitePool, user_id: &str, token: &str) -> Result<(), ApiError> {
    sqlx::query("UPDATE users SET token = ? WHERE user_id = ?")
        .bind(token)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Tutti gli utenti tranne il chiamante (listing della sidebar).
pub async fn list_users_except(pool: &SqlitePool, user_id: &str) -> Result<Vec<User>, ApiError> {
    let rows = sqlx::query(
        "SELECT user_id, full_name, profile_pic, created_at FROM users \
         WHERE user_id != ? ORDER BY full_name ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    rows.iter().map(user_from_row).collect()
}

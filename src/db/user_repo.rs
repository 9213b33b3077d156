use sqlx::PgPool;
use uuid::Uuid;

use crate::models::User;

pub async fn create_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
    password_salt: &str,
) -> anyhow::Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password_hash, password_salt)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(password_salt)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn get_user(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

/// Look a user up by username or email (case-insensitive).
pub async fn find_by_login(pool: &PgPool, login: &str) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE LOWER(username) = LOWER($1) OR LOWER(email) = LOWER($1) LIMIT 1",
    )
    .bind(login)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// True if the username or email is already registered.
pub async fn is_taken(pool: &PgPool, username: &str, email: &str) -> anyhow::Result<bool> {
    let row: (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM users WHERE LOWER(username) = LOWER($1) OR LOWER(email) = LOWER($2))",
    )
    .bind(username)
    .bind(email)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

pub async fn search_users(pool: &PgPool, query: &str, limit: i64) -> anyhow::Result<Vec<User>> {
    let pattern = format!("%{}%", query.replace('%', "\\%").replace('_', "\\_"));
    let users = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE username ILIKE $1 ORDER BY username LIMIT $2",
    )
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

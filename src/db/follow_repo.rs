use sqlx::PgPool;
use uuid::Uuid;

use crate::models::User;

/// Idempotent follow.
pub async fn follow(pool: &PgPool, follower_id: Uuid, followee_id: Uuid) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO follows (follower_id, followee_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(follower_id)
    .bind(followee_id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn unfollow(pool: &PgPool, follower_id: Uuid, followee_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2")
        .bind(follower_id)
        .bind(followee_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Users that `user_id` follows.
pub async fn get_following(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT u.* FROM users u
        INNER JOIN follows f ON f.followee_id = u.id
        WHERE f.follower_id = $1
        ORDER BY u.username
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Users following `user_id`.
pub async fn get_followers(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT u.* FROM users u
        INNER JOIN follows f ON f.follower_id = u.id
        WHERE f.followee_id = $1
        ORDER BY u.username
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

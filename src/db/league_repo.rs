use sqlx::PgPool;
use uuid::Uuid;

use crate::db::is_unique_violation;
use crate::models::{League, LeagueMember};

/// Invite codes tried before a collision is reported to the caller.
pub const INVITE_CODE_ATTEMPTS: usize = 5;

/// Create a league and enrol its owner as the first member.
///
/// `next_code` supplies invite codes; on a code collision a fresh one is
/// drawn, up to [`INVITE_CODE_ATTEMPTS`] times.
pub async fn create_league(
    pool: &PgPool,
    owner_id: Uuid,
    name: &str,
    mut next_code: impl FnMut() -> String,
) -> anyhow::Result<League> {
    let mut attempt = 1;
    loop {
        let code = next_code();
        match insert_league(pool, owner_id, name, &code).await {
            Err(e) if attempt < INVITE_CODE_ATTEMPTS && is_unique_violation(&e) => {
                tracing::debug!(attempt, "Invite code collision, retrying");
                attempt += 1;
            }
            result => return result,
        }
    }
}

async fn insert_league(
    pool: &PgPool,
    owner_id: Uuid,
    name: &str,
    invite_code: &str,
) -> anyhow::Result<League> {
    let mut tx = pool.begin().await?;

    let league = sqlx::query_as::<_, League>(
        r#"
        INSERT INTO leagues (name, invite_code, owner_id)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(invite_code)
    .bind(owner_id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO league_members (league_id, user_id) VALUES ($1, $2)")
        .bind(league.id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(league)
}

pub async fn get_league(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<League>> {
    let league = sqlx::query_as::<_, League>("SELECT * FROM leagues WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(league)
}

pub async fn get_league_by_invite_code(pool: &PgPool, code: &str) -> anyhow::Result<Option<League>> {
    let league = sqlx::query_as::<_, League>(
        "SELECT * FROM leagues WHERE invite_code = UPPER($1)",
    )
    .bind(code.trim())
    .fetch_optional(pool)
    .await?;

    Ok(league)
}

/// Idempotent: joining twice keeps the original membership.
pub async fn add_member(pool: &PgPool, league_id: Uuid, user_id: Uuid) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO league_members (league_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(league_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Returns false if the user was not a member.
pub async fn remove_member(pool: &PgPool, league_id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM league_members WHERE league_id = $1 AND user_id = $2")
        .bind(league_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get_members(pool: &PgPool, league_id: Uuid) -> anyhow::Result<Vec<LeagueMember>> {
    let members = sqlx::query_as::<_, LeagueMember>(
        r#"
        SELECT lm.league_id, lm.user_id, u.username, lm.joined_at
        FROM league_members lm
        INNER JOIN users u ON u.id = lm.user_id
        WHERE lm.league_id = $1
        ORDER BY lm.joined_at
        "#,
    )
    .bind(league_id)
    .fetch_all(pool)
    .await?;

    Ok(members)
}

pub async fn get_user_leagues(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<League>> {
    let leagues = sqlx::query_as::<_, League>(
        r#"
        SELECT l.* FROM leagues l
        INNER JOIN league_members lm ON lm.league_id = l.id
        WHERE lm.user_id = $1
        ORDER BY l.name
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(leagues)
}

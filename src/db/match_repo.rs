use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::{Match, MatchStatus};
use crate::scoring::Score;

pub async fn create_match(
    pool: &PgPool,
    home_team: &str,
    away_team: &str,
    round: i32,
    kickoff_at: Option<DateTime<Utc>>,
) -> anyhow::Result<Match> {
    let m = sqlx::query_as::<_, Match>(
        r#"
        INSERT INTO matches (home_team, away_team, round, kickoff_at)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(home_team)
    .bind(away_team)
    .bind(round)
    .bind(kickoff_at)
    .fetch_one(pool)
    .await?;

    Ok(m)
}

pub async fn get_match(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Match>> {
    let m = sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(m)
}

/// List matches, optionally filtered by round and/or status.
pub async fn list_matches(
    pool: &PgPool,
    round: Option<i32>,
    status: Option<MatchStatus>,
) -> anyhow::Result<Vec<Match>> {
    let matches = sqlx::query_as::<_, Match>(
        r#"
        SELECT * FROM matches
        WHERE ($1::INT IS NULL OR round = $1)
          AND ($2::TEXT IS NULL OR status = $2)
        ORDER BY round, kickoff_at NULLS LAST, created_at
        "#,
    )
    .bind(round)
    .bind(status.map(|s| s.as_str()))
    .fetch_all(pool)
    .await?;

    Ok(matches)
}

/// Fetch a match and hold a row lock until the surrounding transaction ends.
pub async fn lock_match(conn: &mut PgConnection, id: Uuid) -> anyhow::Result<Option<Match>> {
    let m = sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(m)
}

/// Record the real score and mark the match finalized.
pub async fn finalize_match(
    conn: &mut PgConnection,
    id: Uuid,
    score: Score,
) -> anyhow::Result<Match> {
    let m = sqlx::query_as::<_, Match>(
        r#"
        UPDATE matches
        SET status = 'finalized', home_goals = $2, away_goals = $3, finalized_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(score.home)
    .bind(score.away)
    .fetch_one(&mut *conn)
    .await?;

    Ok(m)
}

/// Return a finalized match to in-progress, clearing its real score.
pub async fn reopen_match(conn: &mut PgConnection, id: Uuid) -> anyhow::Result<Match> {
    let m = sqlx::query_as::<_, Match>(
        r#"
        UPDATE matches
        SET status = 'in_progress', home_goals = NULL, away_goals = NULL, finalized_at = NULL
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(m)
}

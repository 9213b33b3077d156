use sqlx::{PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::Prediction;
use crate::scoring::Score;

/// Insert or replace a user's prediction for a match. Last write wins.
///
/// The write only happens while the match is still in progress; returns
/// `None` if the match was finalized in the meantime. The share lock makes
/// this wait for a concurrent settlement of the same match.
pub async fn upsert_prediction(
    pool: &PgPool,
    user_id: Uuid,
    match_id: Uuid,
    score: Score,
) -> anyhow::Result<Option<Prediction>> {
    let prediction = sqlx::query_as::<_, Prediction>(
        r#"
        INSERT INTO predictions (user_id, match_id, home_goals, away_goals)
        SELECT $1, $2, $3, $4
        WHERE EXISTS (
            SELECT 1 FROM matches WHERE id = $2 AND status = 'in_progress' FOR SHARE
        )
        ON CONFLICT (user_id, match_id) DO UPDATE
            SET home_goals = EXCLUDED.home_goals,
                away_goals = EXCLUDED.away_goals,
                updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(match_id)
    .bind(score.home)
    .bind(score.away)
    .fetch_optional(pool)
    .await?;

    Ok(prediction)
}

pub async fn list_predictions_for_match<'e>(
    executor: impl PgExecutor<'e>,
    match_id: Uuid,
) -> anyhow::Result<Vec<Prediction>> {
    let predictions = sqlx::query_as::<_, Prediction>(
        "SELECT * FROM predictions WHERE match_id = $1 ORDER BY created_at",
    )
    .bind(match_id)
    .fetch_all(executor)
    .await?;

    Ok(predictions)
}

pub async fn set_prediction_points(
    conn: &mut PgConnection,
    user_id: Uuid,
    match_id: Uuid,
    points: i32,
) -> anyhow::Result<()> {
    let result = sqlx::query(
        "UPDATE predictions SET points = $3 WHERE user_id = $1 AND match_id = $2",
    )
    .bind(user_id)
    .bind(match_id)
    .bind(points)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() != 1 {
        anyhow::bail!("prediction ({user_id}, {match_id}) disappeared during settlement");
    }

    Ok(())
}

/// Clear awarded points for every prediction on a match.
pub async fn clear_points_for_match(conn: &mut PgConnection, match_id: Uuid) -> anyhow::Result<u64> {
    let result = sqlx::query("UPDATE predictions SET points = NULL WHERE match_id = $1")
        .bind(match_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

pub async fn get_user_predictions(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Prediction>> {
    let predictions = sqlx::query_as::<_, Prediction>(
        "SELECT * FROM predictions WHERE user_id = $1 ORDER BY updated_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(predictions)
}

use std::time::Instant;

use metrics::{counter, histogram};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{match_repo, prediction_repo};
use crate::errors::SettlementError;
use crate::models::{Match, Prediction};
use crate::scoring::{judge, Score, Tally, Verdict};

/// Summary of a completed settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementResult {
    pub match_id: Uuid,
    pub home_goals: i32,
    pub away_goals: i32,
    pub predictions_settled: u32,
    pub exact_hits: u32,
    pub outcome_hits: u32,
    pub misses: u32,
}

/// Points to write back for one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Award {
    pub user_id: Uuid,
    pub verdict: Verdict,
}

impl Award {
    pub fn points(&self) -> i32 {
        self.verdict.points()
    }
}

/// Judge every prediction against the real score. Pure.
pub fn plan_awards(predictions: &[Prediction], real: Score) -> (Vec<Award>, Tally) {
    let mut tally = Tally::default();
    let awards = predictions
        .iter()
        .map(|p| {
            let verdict = judge(p.score(), real);
            tally.record(verdict);
            Award {
                user_id: p.user_id,
                verdict,
            }
        })
        .collect();

    (awards, tally)
}

/// Record a match's final score and award points to every prediction on it.
///
/// Runs as one transaction: the match row is locked, finalized, and every
/// prediction is scored before commit. Any failure rolls the whole thing back.
/// Settling an already-finalized match is rejected; use [`reopen`] first.
pub async fn settle(
    pool: &PgPool,
    match_id: Uuid,
    home_goals: i32,
    away_goals: i32,
) -> Result<SettlementResult, SettlementError> {
    let real = Score::new(home_goals, away_goals)?;
    let start = Instant::now();

    let result = settle_in_tx(pool, match_id, real).await;

    match &result {
        Ok(r) => {
            counter!("matches_settled_total").increment(1);
            counter!("predictions_scored_total", "result" => Verdict::Exact.as_str())
                .increment(r.exact_hits.into());
            counter!("predictions_scored_total", "result" => Verdict::CorrectOutcome.as_str())
                .increment(r.outcome_hits.into());
            counter!("predictions_scored_total", "result" => Verdict::Miss.as_str())
                .increment(r.misses.into());
            histogram!("settlement_duration_seconds").record(start.elapsed().as_secs_f64());
        }
        Err(SettlementError::Storage(e)) => {
            counter!("settlement_failures_total").increment(1);
            tracing::error!(match_id = %match_id, error = %e, "Settlement rolled back");
        }
        Err(_) => {}
    }

    result
}

async fn settle_in_tx(
    pool: &PgPool,
    match_id: Uuid,
    real: Score,
) -> Result<SettlementResult, SettlementError> {
    // Dropping the transaction without commit rolls it back.
    let mut tx = pool.begin().await?;

    let current = match_repo::lock_match(&mut tx, match_id)
        .await?
        .ok_or(SettlementError::NotFound(match_id))?;
    if current.is_finalized() {
        return Err(SettlementError::AlreadyFinalized(match_id));
    }

    match_repo::finalize_match(&mut tx, match_id, real).await?;

    let predictions = prediction_repo::list_predictions_for_match(&mut *tx, match_id).await?;
    let (awards, tally) = plan_awards(&predictions, real);

    for award in &awards {
        prediction_repo::set_prediction_points(&mut tx, award.user_id, match_id, award.points())
            .await?;
    }

    tx.commit().await?;

    tracing::info!(
        match_id = %match_id,
        score = %real,
        settled = tally.total(),
        exact = tally.exact_hits,
        outcome = tally.outcome_hits,
        "Match settled"
    );

    Ok(SettlementResult {
        match_id,
        home_goals: real.home,
        away_goals: real.away,
        predictions_settled: tally.total(),
        exact_hits: tally.exact_hits,
        outcome_hits: tally.outcome_hits,
        misses: tally.misses,
    })
}

/// Return a finalized match to in-progress and clear every awarded point.
pub async fn reopen(pool: &PgPool, match_id: Uuid) -> Result<Match, SettlementError> {
    let mut tx = pool.begin().await?;

    let current = match_repo::lock_match(&mut tx, match_id)
        .await?
        .ok_or(SettlementError::NotFound(match_id))?;
    if !current.is_finalized() {
        return Err(SettlementError::NotFinalized(match_id));
    }

    let cleared = prediction_repo::clear_points_for_match(&mut tx, match_id).await?;
    let reopened = match_repo::reopen_match(&mut tx, match_id).await?;

    tx.commit().await?;

    tracing::warn!(match_id = %match_id, cleared, "Match reopened");

    Ok(reopened)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn prediction(home: i32, away: i32) -> Prediction {
        Prediction {
            user_id: Uuid::new_v4(),
            match_id: Uuid::nil(),
            home_goals: home,
            away_goals: away,
            points: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_plan_awards_home_win() {
        let preds = vec![prediction(2, 1), prediction(3, 0), prediction(1, 1), prediction(0, 2)];
        let (awards, tally) = plan_awards(&preds, Score { home: 2, away: 1 });

        let points: Vec<i32> = awards.iter().map(Award::points).collect();
        assert_eq!(points, vec![3, 1, 0, 0]);
        assert_eq!(tally, Tally { exact_hits: 1, outcome_hits: 1, misses: 2 });

        // Awards stay attached to the prediction they were computed for.
        for (award, pred) in awards.iter().zip(&preds) {
            assert_eq!(award.user_id, pred.user_id);
        }
    }

    #[test]
    fn test_plan_awards_goalless_draw() {
        let preds = vec![prediction(1, 1), prediction(1, 0)];
        let (awards, _) = plan_awards(&preds, Score { home: 0, away: 0 });
        assert_eq!(awards[0].points(), 1);
        assert_eq!(awards[1].points(), 0);
    }

    #[test]
    fn test_plan_awards_no_predictions() {
        let (awards, tally) = plan_awards(&[], Score { home: 1, away: 0 });
        assert!(awards.is_empty());
        assert_eq!(tally.total(), 0);
    }

    #[test]
    fn test_plan_awards_repeatable() {
        let preds = vec![prediction(0, 1), prediction(2, 2), prediction(1, 3)];
        let real = Score { home: 1, away: 3 };
        assert_eq!(plan_awards(&preds, real), plan_awards(&preds, real));
    }
}

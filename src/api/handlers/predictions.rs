use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use metrics::counter;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::prediction_repo;
use crate::errors::AppError;
use crate::models::Prediction;
use crate::scoring::Score;
use crate::AppState;

use super::matches::require_match;
use super::users::require_user;
use super::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct SubmitPredictionRequest {
    pub user_id: Uuid,
    pub match_id: Uuid,
    pub home_goals: i32,
    pub away_goals: i32,
}

/// PUT /api/predictions — create or replace a user's prediction for a match.
pub async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<SubmitPredictionRequest>, JsonRejection>,
) -> ApiResult<Prediction> {
    let Json(body) = payload?;
    let score = Score::new(body.home_goals, body.away_goals)?;

    require_user(&state, body.user_id).await?;
    let m = require_match(&state, body.match_id).await?;
    if m.is_finalized() {
        return Err(AppError::Conflict("match is already finalized".into()));
    }

    // None means the match was settled between the check above and the write.
    let prediction = prediction_repo::upsert_prediction(&state.db, body.user_id, body.match_id, score)
        .await?
        .ok_or_else(|| AppError::Conflict("match is already finalized".into()))?;

    counter!("predictions_submitted_total").increment(1);
    tracing::debug!(
        user_id = %body.user_id,
        match_id = %body.match_id,
        score = %score,
        "Prediction recorded"
    );

    Ok(ApiResponse::ok(prediction))
}

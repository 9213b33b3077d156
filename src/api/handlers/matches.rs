use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::ws_types::WsMessage;
use crate::db::{match_repo, prediction_repo};
use crate::errors::AppError;
use crate::models::{Match, MatchStatus, Prediction};
use crate::services::settlement::{self, SettlementResult};
use crate::AppState;

use super::{ApiResponse, ApiResult};

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateMatchRequest {
    pub home_team: String,
    pub away_team: String,
    pub round: i32,
    pub kickoff_at: Option<DateTime<Utc>>,
}

impl CreateMatchRequest {
    fn validate(&self) -> Result<(), AppError> {
        let home = self.home_team.trim();
        let away = self.away_team.trim();
        if home.is_empty() || away.is_empty() {
            return Err(AppError::BadRequest("team names are required".into()));
        }
        if home.eq_ignore_ascii_case(away) {
            return Err(AppError::BadRequest("a team cannot play itself".into()));
        }
        if self.round < 1 {
            return Err(AppError::BadRequest("round must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct MatchFilter {
    pub round: Option<i32>,
    pub status: Option<String>,
}

/// Real final score. Goals must be whole numbers; negatives are rejected by the engine.
#[derive(Debug, Deserialize)]
pub struct SettleRequest {
    pub home_goals: i32,
    pub away_goals: i32,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/matches?round=&status=
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<MatchFilter>,
) -> ApiResult<Vec<Match>> {
    let status = match filter.status.as_deref() {
        Some(raw) => Some(
            MatchStatus::from_str(raw)
                .ok_or_else(|| AppError::BadRequest(format!("unknown status: {raw}")))?,
        ),
        None => None,
    };

    let matches = match_repo::list_matches(&state.db, filter.round, status).await?;
    Ok(ApiResponse::ok(matches))
}

/// GET /api/matches/{id}
pub async fn detail(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Match> {
    let m = require_match(&state, id).await?;
    Ok(ApiResponse::ok(m))
}

/// GET /api/matches/{id}/predictions
pub async fn predictions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<Prediction>> {
    require_match(&state, id).await?;
    let predictions = prediction_repo::list_predictions_for_match(&state.db, id).await?;
    Ok(ApiResponse::ok(predictions))
}

/// POST /api/admin/matches
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateMatchRequest>, JsonRejection>,
) -> ApiResult<Match> {
    let Json(body) = payload?;
    body.validate()?;

    let m = match_repo::create_match(
        &state.db,
        body.home_team.trim(),
        body.away_team.trim(),
        body.round,
        body.kickoff_at,
    )
    .await?;

    tracing::info!(
        match_id = %m.id,
        home = %m.home_team,
        away = %m.away_team,
        round = m.round,
        "Match created"
    );

    Ok(ApiResponse::ok(m))
}

/// POST /api/admin/matches/{id}/settle
pub async fn settle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<SettleRequest>, JsonRejection>,
) -> ApiResult<SettlementResult> {
    let Json(body) = payload?;

    let result = settlement::settle(&state.db, id, body.home_goals, body.away_goals).await?;

    // No subscribers is not an error.
    let _ = state.ws_tx.send(WsMessage::MatchSettled(result.clone()));

    Ok(ApiResponse::ok(result))
}

/// POST /api/admin/matches/{id}/reopen
pub async fn reopen(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Match> {
    let m = settlement::reopen(&state.db, id).await?;
    let _ = state.ws_tx.send(WsMessage::MatchReopened(m.clone()));
    Ok(ApiResponse::ok(m))
}

pub(crate) async fn require_match(state: &AppState, id: Uuid) -> Result<Match, AppError> {
    match_repo::get_match(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("match not found".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(home: &str, away: &str, round: i32) -> CreateMatchRequest {
        CreateMatchRequest {
            home_team: home.into(),
            away_team: away.into(),
            round,
            kickoff_at: None,
        }
    }

    #[test]
    fn test_create_match_validation() {
        assert!(req("Santos", "Corinthians", 1).validate().is_ok());
        assert!(req("  ", "Corinthians", 1).validate().is_err());
        assert!(req("Santos", "santos", 1).validate().is_err());
        assert!(req("Santos", "Corinthians", 0).validate().is_err());
    }

    #[test]
    fn test_settle_request_rejects_fractional_goals() {
        let ok: Result<SettleRequest, _> =
            serde_json::from_str(r#"{"home_goals": 2, "away_goals": 1}"#);
        assert!(ok.is_ok());

        let fractional: Result<SettleRequest, _> =
            serde_json::from_str(r#"{"home_goals": 1.5, "away_goals": 1}"#);
        assert!(fractional.is_err());
    }
}

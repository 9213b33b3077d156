use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::league_repo;
use crate::db::ranking_repo::{self, RankingScope};
use crate::errors::AppError;
use crate::models::{League, LeagueMember, RankingEntry};
use crate::AppState;

use super::users::require_user;
use super::{ApiResponse, ApiResult};

const INVITE_CODE_LEN: usize = 8;
const MAX_NAME_LEN: usize = 64;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateLeagueRequest {
    pub owner_id: Uuid,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinLeagueRequest {
    pub user_id: Uuid,
    pub invite_code: String,
}

/// Short uppercase code shared with friends to join a league.
fn new_invite_code() -> String {
    Uuid::new_v4().simple().to_string()[..INVITE_CODE_LEN].to_uppercase()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/leagues
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateLeagueRequest>, JsonRejection>,
) -> ApiResult<League> {
    let Json(body) = payload?;
    let name = body.name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "league name must be 1-{MAX_NAME_LEN} characters"
        )));
    }
    require_user(&state, body.owner_id).await?;

    let league = league_repo::create_league(&state.db, body.owner_id, name, new_invite_code).await?;
    tracing::info!(league_id = %league.id, owner = %body.owner_id, "League created");

    Ok(ApiResponse::ok(league))
}

/// POST /api/leagues/join
pub async fn join(
    State(state): State<AppState>,
    payload: Result<Json<JoinLeagueRequest>, JsonRejection>,
) -> ApiResult<League> {
    let Json(body) = payload?;
    require_user(&state, body.user_id).await?;

    let league = league_repo::get_league_by_invite_code(&state.db, &body.invite_code)
        .await?
        .ok_or_else(|| AppError::NotFound("invalid invite code".into()))?;

    league_repo::add_member(&state.db, league.id, body.user_id).await?;

    Ok(ApiResponse::ok(league))
}

/// DELETE /api/leagues/{id}/members/{user_id}
pub async fn leave(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<()> {
    let league = require_league(&state, id).await?;
    if league.owner_id == user_id {
        return Err(AppError::Conflict("the league owner cannot leave".into()));
    }

    if !league_repo::remove_member(&state.db, id, user_id).await? {
        return Err(AppError::NotFound("user is not a member of this league".into()));
    }

    Ok(ApiResponse::ok(()))
}

/// GET /api/leagues/{id}/members
pub async fn members(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<LeagueMember>> {
    require_league(&state, id).await?;
    let members = league_repo::get_members(&state.db, id).await?;
    Ok(ApiResponse::ok(members))
}

/// GET /api/leagues/{id}/ranking
pub async fn ranking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<RankingEntry>> {
    require_league(&state, id).await?;
    let ranking = ranking_repo::get_ranking(&state.db, RankingScope::League(id)).await?;
    Ok(ApiResponse::ok(ranking))
}

async fn require_league(state: &AppState, id: Uuid) -> Result<League, AppError> {
    league_repo::get_league(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("league not found".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_code_format() {
        let code = new_invite_code();
        assert_eq!(code.len(), INVITE_CODE_LEN);
        assert!(code.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }
}

use axum::extract::{Path, State};

use crate::db::ranking_repo::{self, RankingScope};
use crate::errors::AppError;
use crate::models::RankingEntry;
use crate::AppState;

use super::{ApiResponse, ApiResult};

/// GET /api/rankings
pub async fn global(State(state): State<AppState>) -> ApiResult<Vec<RankingEntry>> {
    let ranking = ranking_repo::get_ranking(&state.db, RankingScope::Global).await?;
    Ok(ApiResponse::ok(ranking))
}

/// GET /api/rankings/rounds/{round}
pub async fn round(
    State(state): State<AppState>,
    Path(round): Path<i32>,
) -> ApiResult<Vec<RankingEntry>> {
    if round < 1 {
        return Err(AppError::BadRequest("round must be at least 1".into()));
    }
    let ranking = ranking_repo::get_ranking(&state.db, RankingScope::Round(round)).await?;
    Ok(ApiResponse::ok(ranking))
}

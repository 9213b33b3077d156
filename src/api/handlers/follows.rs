use axum::extract::{Path, State};
use uuid::Uuid;

use crate::db::{follow_repo, ranking_repo};
use crate::db::ranking_repo::RankingScope;
use crate::errors::AppError;
use crate::models::{RankingEntry, User};
use crate::AppState;

use super::users::require_user;
use super::{ApiResponse, ApiResult};

/// POST /api/users/{id}/follow/{target}
pub async fn follow(
    State(state): State<AppState>,
    Path((id, target)): Path<(Uuid, Uuid)>,
) -> ApiResult<()> {
    if id == target {
        return Err(AppError::BadRequest("users cannot follow themselves".into()));
    }
    require_user(&state, id).await?;
    require_user(&state, target).await?;

    follow_repo::follow(&state.db, id, target).await?;
    tracing::debug!(follower = %id, followee = %target, "Follow recorded");

    Ok(ApiResponse::ok(()))
}

/// DELETE /api/users/{id}/follow/{target}
pub async fn unfollow(
    State(state): State<AppState>,
    Path((id, target)): Path<(Uuid, Uuid)>,
) -> ApiResult<()> {
    if !follow_repo::unfollow(&state.db, id, target).await? {
        return Err(AppError::NotFound("not following this user".into()));
    }
    Ok(ApiResponse::ok(()))
}

/// GET /api/users/{id}/following
pub async fn following(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Vec<User>> {
    require_user(&state, id).await?;
    let users = follow_repo::get_following(&state.db, id).await?;
    Ok(ApiResponse::ok(users))
}

/// GET /api/users/{id}/followers
pub async fn followers(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Vec<User>> {
    require_user(&state, id).await?;
    let users = follow_repo::get_followers(&state.db, id).await?;
    Ok(ApiResponse::ok(users))
}

/// GET /api/users/{id}/ranking — the user and everyone they follow.
pub async fn friends_ranking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<RankingEntry>> {
    require_user(&state, id).await?;
    let ranking = ranking_repo::get_ranking(&state.db, RankingScope::Friends(id)).await?;
    Ok(ApiResponse::ok(ranking))
}

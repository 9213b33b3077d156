use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use metrics::counter;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::{league_repo, prediction_repo, user_repo};
use crate::errors::AppError;
use crate::models::{League, Prediction, User};
use crate::services::credentials;
use crate::AppState;

use super::{ApiResponse, ApiResult};

const SEARCH_LIMIT: i64 = 20;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), AppError> {
        let username = self.username.trim();
        if !(3..=32).contains(&username.chars().count()) {
            return Err(AppError::BadRequest("username must be 3-32 characters".into()));
        }
        if username.chars().any(char::is_whitespace) {
            return Err(AppError::BadRequest("username cannot contain spaces".into()));
        }
        if !self.email.contains('@') {
            return Err(AppError::BadRequest("invalid email".into()));
        }
        if self.password.chars().count() < 6 {
            return Err(AppError::BadRequest("password must be at least 6 characters".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email.
    pub login: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/users/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<User> {
    let Json(body) = payload?;
    body.validate()?;

    let username = body.username.trim();
    let email = body.email.trim().to_lowercase();

    if user_repo::is_taken(&state.db, username, &email).await? {
        return Err(AppError::Conflict("username or email already registered".into()));
    }

    let digest = credentials::hash_password(&body.password);
    let user = user_repo::create_user(&state.db, username, &email, &digest.hash, &digest.salt).await?;

    counter!("users_registered_total").increment(1);
    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok(ApiResponse::ok(user))
}

/// POST /api/users/login — checks credentials and returns the profile.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<User> {
    let Json(body) = payload?;

    let user = user_repo::find_by_login(&state.db, body.login.trim())
        .await?
        .filter(|u| credentials::verify_password(&body.password, &u.password_hash, &u.password_salt))
        .ok_or(AppError::Unauthorized)?;

    Ok(ApiResponse::ok(user))
}

/// GET /api/users/{id}
pub async fn detail(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<User> {
    let user = require_user(&state, id).await?;
    Ok(ApiResponse::ok(user))
}

/// GET /api/users?search=
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<User>> {
    let term = query.search.unwrap_or_default();
    let users = user_repo::search_users(&state.db, term.trim(), SEARCH_LIMIT).await?;
    Ok(ApiResponse::ok(users))
}

/// GET /api/users/{id}/predictions
pub async fn predictions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<Prediction>> {
    require_user(&state, id).await?;
    let predictions = prediction_repo::get_user_predictions(&state.db, id).await?;
    Ok(ApiResponse::ok(predictions))
}

/// GET /api/users/{id}/leagues
pub async fn leagues(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Vec<League>> {
    require_user(&state, id).await?;
    let leagues = league_repo::get_user_leagues(&state.db, id).await?;
    Ok(ApiResponse::ok(leagues))
}

pub(crate) async fn require_user(state: &AppState, id: Uuid) -> Result<User, AppError> {
    user_repo::get_user(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(req("joao", "joao@example.com", "123456").validate().is_ok());
        assert!(req("jo", "joao@example.com", "123456").validate().is_err());
        assert!(req("jo ao", "joao@example.com", "123456").validate().is_err());
        assert!(req("joao", "joao.example.com", "123456").validate().is_err());
        assert!(req("joao", "joao@example.com", "12345").validate().is_err());
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::scoring::InvalidScore;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Internal(anyhow::Error),
}

/// Failures of the settlement engine. Surfaced to the caller unmodified.
#[derive(Debug, thiserror::Error)]
pub enum SettlementError {
    #[error("match {0} not found")]
    NotFound(Uuid),

    #[error("invalid score: {0}")]
    Validation(String),

    #[error("match {0} is already finalized")]
    AlreadyFinalized(Uuid),

    #[error("match {0} is not finalized")]
    NotFinalized(Uuid),

    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

impl From<InvalidScore> for SettlementError {
    fn from(e: InvalidScore) -> Self {
        SettlementError::Validation(e.to_string())
    }
}

impl From<sqlx::Error> for SettlementError {
    fn from(e: sqlx::Error) -> Self {
        SettlementError::Storage(e.into())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".into()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        // Unique-key violations are caller mistakes, not server faults.
        if crate::db::is_unique_violation(&e) {
            return AppError::Conflict("resource already exists".into());
        }
        AppError::Internal(e)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::from(anyhow::Error::from(e))
    }
}

impl From<InvalidScore> for AppError {
    fn from(e: InvalidScore) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl From<SettlementError> for AppError {
    fn from(e: SettlementError) -> Self {
        match e {
            SettlementError::NotFound(_) => AppError::NotFound(e.to_string()),
            SettlementError::Validation(msg) => AppError::BadRequest(msg),
            SettlementError::AlreadyFinalized(_) | SettlementError::NotFinalized(_) => {
                AppError::Conflict(e.to_string())
            }
            SettlementError::Storage(inner) => AppError::Internal(inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settlement_error_status_mapping() {
        let id = Uuid::new_v4();
        let cases = [
            (SettlementError::NotFound(id), StatusCode::NOT_FOUND),
            (SettlementError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (SettlementError::AlreadyFinalized(id), StatusCode::CONFLICT),
            (SettlementError::NotFinalized(id), StatusCode::CONFLICT),
            (
                SettlementError::Storage(anyhow::anyhow!("connection reset")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let resp = AppError::from(err).into_response();
            assert_eq!(resp.status(), expected);
        }
    }

    #[test]
    fn test_plain_anyhow_is_internal() {
        let err = AppError::from(anyhow::anyhow!("boom"));
        assert!(matches!(err, AppError::Internal(_)));
    }
}

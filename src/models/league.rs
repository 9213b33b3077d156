use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A private league ("liga") with its own ranking.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct League {
    pub id: Uuid,
    pub name: String,
    pub invite_code: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// League membership joined with the member's username.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeagueMember {
    pub league_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub joined_at: DateTime<Utc>,
}

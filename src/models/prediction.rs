use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::scoring::Score;

/// Database row for the predictions table. Keyed by (user_id, match_id).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Prediction {
    pub user_id: Uuid,
    pub match_id: Uuid,
    pub home_goals: i32,
    pub away_goals: i32,
    pub points: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Prediction {
    pub fn score(&self) -> Score {
        Score {
            home: self.home_goals,
            away: self.away_goals,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use crate::scoring::Score;

/// Database row for the matches table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Match {
    pub id: Uuid,
    pub home_team: String,
    pub away_team: String,
    pub round: i32,
    pub status: String,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
    pub kickoff_at: Option<DateTime<Utc>>,
    pub finalized_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Match {
    /// Unknown status strings are treated as in progress.
    pub fn status(&self) -> MatchStatus {
        MatchStatus::from_str(&self.status).unwrap_or(MatchStatus::InProgress)
    }

    pub fn is_finalized(&self) -> bool {
        self.status() == MatchStatus::Finalized
    }

    /// The real score, once the match has been settled.
    pub fn final_score(&self) -> Option<Score> {
        match (self.home_goals, self.away_goals) {
            (Some(home), Some(away)) => Score::new(home, away).ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    InProgress,
    Finalized,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::InProgress => "in_progress",
            MatchStatus::Finalized => "finalized",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "in_progress" => Some(MatchStatus::InProgress),
            "finalized" => Some(MatchStatus::Finalized),
            _ => None,
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(status: &str, home: Option<i32>, away: Option<i32>) -> Match {
        Match {
            id: Uuid::new_v4(),
            home_team: "Flamengo".into(),
            away_team: "Palmeiras".into(),
            round: 1,
            status: status.into(),
            home_goals: home,
            away_goals: away,
            kickoff_at: None,
            finalized_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(MatchStatus::from_str("finalized"), Some(MatchStatus::Finalized));
        assert_eq!(MatchStatus::from_str("IN_PROGRESS"), Some(MatchStatus::InProgress));
        assert_eq!(MatchStatus::from_str("cancelled"), None);
    }

    #[test]
    fn test_final_score_requires_both_sides() {
        assert!(sample("in_progress", None, None).final_score().is_none());
        assert!(sample("finalized", Some(2), None).final_score().is_none());

        let m = sample("finalized", Some(2), Some(1));
        assert!(m.is_finalized());
        assert_eq!(m.final_score(), Some(Score { home: 2, away: 1 }));
    }
}

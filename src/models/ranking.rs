use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Aggregated scoring totals for one user, as returned by the ranking queries.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RankingRow {
    pub user_id: Uuid,
    pub username: String,
    pub total_points: i64,
    pub exact_hits: i64,
    pub outcome_hits: i64,
    pub predictions_scored: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingEntry {
    pub position: usize,
    pub user_id: Uuid,
    pub username: String,
    pub total_points: i64,
    pub exact_hits: i64,
    pub outcome_hits: i64,
    pub predictions_scored: i64,
}

impl RankingEntry {
    /// Order rows by points, then exact hits, then username, and number them from 1.
    pub fn rank(mut rows: Vec<RankingRow>) -> Vec<RankingEntry> {
        rows.sort_by(|a, b| {
            b.total_points
                .cmp(&a.total_points)
                .then(b.exact_hits.cmp(&a.exact_hits))
                .then_with(|| a.username.cmp(&b.username))
        });

        rows.into_iter()
            .enumerate()
            .map(|(i, row)| RankingEntry {
                position: i + 1,
                user_id: row.user_id,
                username: row.username,
                total_points: row.total_points,
                exact_hits: row.exact_hits,
                outcome_hits: row.outcome_hits,
                predictions_scored: row.predictions_scored,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(username: &str, total_points: i64, exact_hits: i64) -> RankingRow {
        RankingRow {
            user_id: Uuid::new_v4(),
            username: username.into(),
            total_points,
            exact_hits,
            outcome_hits: 0,
            predictions_scored: 0,
        }
    }

    #[test]
    fn test_rank_orders_by_points_then_exact_hits_then_name() {
        let ranked = RankingEntry::rank(vec![
            row("carla", 4, 1),
            row("bruno", 7, 1),
            row("ana", 4, 1),
            row("davi", 4, 0),
        ]);

        let names: Vec<&str> = ranked.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, vec!["bruno", "ana", "carla", "davi"]);
        assert_eq!(ranked[0].position, 1);
        assert_eq!(ranked[3].position, 4);
    }

    #[test]
    fn test_rank_empty() {
        assert!(RankingEntry::rank(vec![]).is_empty());
    }
}

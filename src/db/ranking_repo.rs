use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{RankingEntry, RankingRow};

/// Which users (and which matches) a ranking covers.
#[derive(Debug, Clone, Copy)]
pub enum RankingScope {
    Global,
    Round(i32),
    League(Uuid),
    /// The user plus everyone they follow.
    Friends(Uuid),
}

// Only scored predictions count; $1 is the scope parameter where one is used.
const RANKING_SELECT: &str = r#"
    SELECT u.id AS user_id,
           u.username,
           COALESCE(SUM(p.points), 0)::BIGINT AS total_points,
           COUNT(*) FILTER (WHERE p.points = 3) AS exact_hits,
           COUNT(*) FILTER (WHERE p.points = 1) AS outcome_hits,
           COUNT(p.points) AS predictions_scored
    FROM users u
"#;

const RANKING_GROUP: &str = "GROUP BY u.id, u.username";

fn ranking_sql(scope: &RankingScope) -> String {
    let (join, filter, having) = match scope {
        RankingScope::Global => (
            "LEFT JOIN predictions p ON p.user_id = u.id AND p.points IS NOT NULL",
            "",
            "",
        ),
        RankingScope::Round(_) => (
            "LEFT JOIN predictions p ON p.user_id = u.id AND p.points IS NOT NULL \
             AND p.match_id IN (SELECT id FROM matches WHERE round = $1)",
            "",
            "HAVING COUNT(p.points) > 0",
        ),
        RankingScope::League(_) => (
            "LEFT JOIN predictions p ON p.user_id = u.id AND p.points IS NOT NULL",
            "WHERE u.id IN (SELECT user_id FROM league_members WHERE league_id = $1)",
            "",
        ),
        RankingScope::Friends(_) => (
            "LEFT JOIN predictions p ON p.user_id = u.id AND p.points IS NOT NULL",
            "WHERE u.id = $1 OR u.id IN (SELECT followee_id FROM follows WHERE follower_id = $1)",
            "",
        ),
    };

    format!("{RANKING_SELECT} {join} {filter} {RANKING_GROUP} {having}")
}

pub async fn get_ranking(pool: &PgPool, scope: RankingScope) -> anyhow::Result<Vec<RankingEntry>> {
    let sql = ranking_sql(&scope);
    let query = sqlx::query_as::<sqlx::Postgres, RankingRow>(&sql);

    let rows = match scope {
        RankingScope::Global => query.fetch_all(pool).await?,
        RankingScope::Round(round) => query.bind(round).fetch_all(pool).await?,
        RankingScope::League(id) | RankingScope::Friends(id) => {
            query.bind(id).fetch_all(pool).await?
        }
    };

    Ok(RankingEntry::rank(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_sql_has_no_parameters() {
        let sql = ranking_sql(&RankingScope::Global);
        assert!(!sql.contains("$1"));
        assert!(sql.contains("GROUP BY u.id, u.username"));
    }

    #[test]
    fn test_round_sql_only_keeps_participants() {
        let sql = ranking_sql(&RankingScope::Round(3));
        assert!(sql.contains("round = $1"));
        assert!(sql.trim_end().ends_with("HAVING COUNT(p.points) > 0"));
    }

    #[test]
    fn test_scoped_sql_filters_users() {
        let league = ranking_sql(&RankingScope::League(Uuid::new_v4()));
        assert!(league.contains("league_members"));

        let friends = ranking_sql(&RankingScope::Friends(Uuid::new_v4()));
        assert!(friends.contains("follows"));
        assert!(friends.contains("u.id = $1"));
    }
}

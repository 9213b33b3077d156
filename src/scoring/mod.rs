use serde::{Deserialize, Serialize};
use std::fmt;

/// Points for predicting the exact final score.
pub const EXACT_SCORE_POINTS: i32 = 3;
/// Points for predicting the right winner (or a draw) with the wrong score.
pub const OUTCOME_POINTS: i32 = 1;
pub const MISS_POINTS: i32 = 0;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("goals must be non-negative, got {home}-{away}")]
pub struct InvalidScore {
    pub home: i64,
    pub away: i64,
}

/// A scoreline, either real or predicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: i32,
    pub away: i32,
}

impl Score {
    pub fn new(home: i32, away: i32) -> Result<Self, InvalidScore> {
        if home < 0 || away < 0 {
            return Err(InvalidScore {
                home: home.into(),
                away: away.into(),
            });
        }
        Ok(Self { home, away })
    }

    pub fn outcome(&self) -> Outcome {
        match self.home.cmp(&self.away) {
            std::cmp::Ordering::Greater => Outcome::HomeWin,
            std::cmp::Ordering::Equal => Outcome::Draw,
            std::cmp::Ordering::Less => Outcome::AwayWin,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// Outcome direction of a match, independent of the exact score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    HomeWin,
    Draw,
    AwayWin,
}

/// How a single prediction fared against the real result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Exact,
    CorrectOutcome,
    Miss,
}

impl Verdict {
    pub fn points(&self) -> i32 {
        match self {
            Verdict::Exact => EXACT_SCORE_POINTS,
            Verdict::CorrectOutcome => OUTCOME_POINTS,
            Verdict::Miss => MISS_POINTS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Exact => "exact",
            Verdict::CorrectOutcome => "outcome",
            Verdict::Miss => "miss",
        }
    }
}

/// Judge a prediction against the real score.
///
/// Precedence:
/// - **Exact**: both sides match.
/// - **CorrectOutcome**: same home win / draw / away win direction.
/// - **Miss**: everything else.
pub fn judge(predicted: Score, real: Score) -> Verdict {
    if predicted == real {
        Verdict::Exact
    } else if predicted.outcome() == real.outcome() {
        Verdict::CorrectOutcome
    } else {
        Verdict::Miss
    }
}

/// Per-verdict counts for one settlement run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub exact_hits: u32,
    pub outcome_hits: u32,
    pub misses: u32,
}

impl Tally {
    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Exact => self.exact_hits += 1,
            Verdict::CorrectOutcome => self.outcome_hits += 1,
            Verdict::Miss => self.misses += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.exact_hits + self.outcome_hits + self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(home: i32, away: i32) -> Score {
        Score::new(home, away).unwrap()
    }

    #[test]
    fn test_negative_goals_rejected() {
        assert_eq!(Score::new(-1, 0), Err(InvalidScore { home: -1, away: 0 }));
        assert!(Score::new(0, -3).is_err());
        assert!(Score::new(0, 0).is_ok());
    }

    #[test]
    fn test_outcome_classification() {
        assert_eq!(s(3, 0).outcome(), Outcome::HomeWin);
        assert_eq!(s(0, 0).outcome(), Outcome::Draw);
        assert_eq!(s(2, 2).outcome(), Outcome::Draw);
        assert_eq!(s(0, 1).outcome(), Outcome::AwayWin);
    }

    #[test]
    fn test_home_win_examples() {
        let real = s(2, 1);
        assert_eq!(judge(s(2, 1), real).points(), 3);
        assert_eq!(judge(s(3, 0), real).points(), 1);
        assert_eq!(judge(s(1, 1), real).points(), 0);
        assert_eq!(judge(s(0, 2), real).points(), 0);
    }

    #[test]
    fn test_draw_examples() {
        let real = s(0, 0);
        assert_eq!(judge(s(0, 0), real), Verdict::Exact);
        assert_eq!(judge(s(1, 1), real), Verdict::CorrectOutcome);
        assert_eq!(judge(s(1, 0), real), Verdict::Miss);
    }

    #[test]
    fn test_away_win_with_different_margin() {
        assert_eq!(judge(s(0, 3), s(1, 2)), Verdict::CorrectOutcome);
        assert_eq!(judge(s(2, 1), s(1, 2)), Verdict::Miss);
    }

    #[test]
    fn test_exact_only_when_scores_equal() {
        let real = s(4, 2);
        for home in 0..6 {
            for away in 0..6 {
                let p = s(home, away);
                assert_eq!(judge(p, real) == Verdict::Exact, p == real, "prediction {p}");
            }
        }
    }

    #[test]
    fn test_tally() {
        let mut tally = Tally::default();
        for v in [Verdict::Exact, Verdict::Miss, Verdict::CorrectOutcome, Verdict::Miss] {
            tally.record(v);
        }
        assert_eq!(tally.exact_hits, 1);
        assert_eq!(tally.outcome_hits, 1);
        assert_eq!(tally.misses, 2);
        assert_eq!(tally.total(), 4);
    }
}

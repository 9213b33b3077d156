pub mod football_match;
pub mod league;
pub mod prediction;
pub mod ranking;
pub mod user;

pub use football_match::{Match, MatchStatus};
pub use league::{League, LeagueMember};
pub use prediction::Prediction;
pub use ranking::{RankingEntry, RankingRow};
pub use user::User;

use serde::Serialize;

use crate::models::Match;
use crate::services::settlement::SettlementResult;

/// Messages broadcast to all connected WebSocket clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum WsMessage {
    #[serde(rename = "match_settled")]
    MatchSettled(SettlementResult),

    #[serde(rename = "match_reopened")]
    MatchReopened(Match),
}

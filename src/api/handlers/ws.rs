use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::api::ws_types::WsMessage;
use crate::AppState;

/// Optional subscription filter: `/ws?match_id=<uuid>` only receives events for that match.
#[derive(Debug, Default, Deserialize)]
pub struct FeedFilter {
    pub match_id: Option<Uuid>,
}

impl FeedFilter {
    fn wants(&self, msg: &WsMessage) -> bool {
        let Some(wanted) = self.match_id else {
            return true;
        };
        match msg {
            WsMessage::MatchSettled(result) => result.match_id == wanted,
            WsMessage::MatchReopened(m) => m.id == wanted,
        }
    }
}

pub async fn handler(
    ws: WebSocketUpgrade,
    Query(filter): Query<FeedFilter>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| live_feed(socket, state, filter))
}

async fn live_feed(mut socket: WebSocket, state: AppState, filter: FeedFilter) {
    tracing::info!(match_id = ?filter.match_id, "Live feed client connected");

    let mut rx = state.ws_tx.subscribe();

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(msg) if filter.wants(&msg) => {
                    let text = match serde_json::to_string(&msg) {
                        Ok(text) => text,
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to encode live feed message");
                            continue;
                        }
                    };
                    if socket.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Live feed client lagged");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Ping(payload))) => {
                    if socket.send(Message::Pong(payload)).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // The feed is one-way; client text/binary is ignored.
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::info!("Live feed client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::settlement::SettlementResult;

    fn settled(match_id: Uuid) -> WsMessage {
        WsMessage::MatchSettled(SettlementResult {
            match_id,
            home_goals: 1,
            away_goals: 0,
            predictions_settled: 0,
            exact_hits: 0,
            outcome_hits: 0,
            misses: 0,
        })
    }

    #[test]
    fn test_unfiltered_feed_wants_everything() {
        assert!(FeedFilter::default().wants(&settled(Uuid::new_v4())));
    }

    #[test]
    fn test_match_filter() {
        let id = Uuid::new_v4();
        let filter = FeedFilter { match_id: Some(id) };
        assert!(filter.wants(&settled(id)));
        assert!(!filter.wants(&settled(Uuid::new_v4())));
    }
}

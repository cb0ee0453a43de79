//! Live price feed.
//!
//! `GET /ws/prices` sends the current `prices` snapshot on connect and then follows the
//! hub. A client may narrow the feed with `{"event":"subscribe","data":{"codes":[...]}}`;
//! an empty list restores the full feed.

use std::time::Duration;

use anyhow::Result;
use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use crates::{
    domain::value_objects::cached_prices::{PriceSocketCommand, PriceSocketMessage},
    infra::realtime::price_hub::PriceHub,
};
use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct PriceSocketState {
    pub hub: PriceHub,
    pub ping_interval: Duration,
}

pub fn routes(hub: PriceHub, ping_interval: Duration) -> Router {
    Router::new()
        .route("/prices", get(price_socket))
        .with_state(PriceSocketState { hub, ping_interval })
}

pub async fn price_socket(
    State(state): State<PriceSocketState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| price_session(socket, state))
}

async fn price_session(socket: WebSocket, state: PriceSocketState) {
    let (mut sink, mut stream) = socket.split();

    // Subscribe before reading the snapshot so no update falls in between.
    let mut hub_rx = state.hub.subscribe();
    let mut codes: Vec<String> = Vec::new();

    info!(
        clients = state.hub.subscriber_count(),
        "price_socket: client connected"
    );

    if send_message(&mut sink, &state.hub.snapshot_message())
        .await
        .is_err()
    {
        return;
    }

    let mut ping_interval = tokio::time::interval(state.ping_interval);
    ping_interval.tick().await;

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
            }

            event = hub_rx.recv() => {
                match event {
                    Ok(message) => {
                        if let Some(message) = message.filtered(&codes)
                            && send_message(&mut sink, &message).await.is_err()
                        {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "price_socket: client lagged, resending snapshot");
                        hub_rx = state.hub.subscribe();
                        if let Some(snapshot) = state.hub.snapshot_message().filtered(&codes)
                            && send_message(&mut sink, &snapshot).await.is_err()
                        {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(snapshot) = apply_command(&text, &mut codes, &state.hub)
                            && send_message(&mut sink, &snapshot).await.is_err()
                        {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        debug!(error = %e, "price_socket: receive failed");
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    info!("price_socket: client disconnected");
}

/// Applies a client command and returns the snapshot to resend, if any.
fn apply_command(
    text: &str,
    codes: &mut Vec<String>,
    hub: &PriceHub,
) -> Option<PriceSocketMessage> {
    let command = match serde_json::from_str::<PriceSocketCommand>(text) {
        Ok(command) => command,
        Err(e) => {
            debug!(error = %e, "price_socket: ignoring unknown frame");
            return None;
        }
    };

    match command {
        PriceSocketCommand::Subscribe(payload) => {
            *codes = normalize_codes(payload.codes);
            debug!(codes = ?codes, "price_socket: subscription changed");
            hub.snapshot_message().filtered(codes)
        }
    }
}

fn normalize_codes(codes: Vec<String>) -> Vec<String> {
    let mut codes: Vec<String> = codes
        .into_iter()
        .map(|code| code.trim().to_uppercase())
        .filter(|code| !code.is_empty())
        .collect();
    codes.sort();
    codes.dedup();
    codes
}

async fn send_message(
    sink: &mut SplitSink<WebSocket, Message>,
    message: &PriceSocketMessage,
) -> Result<()> {
    let text = serde_json::to_string(message)?;
    sink.send(Message::Text(text)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crates::domain::{
        repositories::price_publisher::PricePublisher,
        value_objects::{cached_prices::PriceTickDto, enums::price_directions::PriceDirection},
    };

    fn tick(code: &str, sell: f64) -> PriceTickDto {
        PriceTickDto {
            code: code.to_string(),
            name: code.to_string(),
            group_key: None,
            decimals: 2,
            sort_order: 0,
            buy: sell - 5.0,
            sell,
            change: 0.0,
            change_percent: 0.0,
            direction: PriceDirection::Same,
            buy_high: sell - 5.0,
            buy_low: sell - 5.0,
            sell_high: sell,
            sell_low: sell,
            computed_at: Utc::now(),
        }
    }

    fn seeded_hub() -> PriceHub {
        let hub = PriceHub::new();
        hub.seed(vec![tick("GRAM", 3000.0), tick("ONS", 2400.0)]);
        hub
    }

    #[test]
    fn subscribe_narrows_the_snapshot() {
        let hub = seeded_hub();
        let mut codes = Vec::new();

        let snapshot = apply_command(
            r#"{"event":"subscribe","data":{"codes":[" ONS ","ONS",""]}}"#,
            &mut codes,
            &hub,
        );

        assert_eq!(codes, vec!["ONS".to_string()]);
        match snapshot {
            Some(PriceSocketMessage::Prices(ticks)) => {
                assert_eq!(ticks.len(), 1);
                assert_eq!(ticks[0].code, "ONS");
            }
            other => panic!("expected a snapshot, got {:?}", other),
        }
    }

    #[test]
    fn subscription_codes_are_case_insensitive() {
        let hub = seeded_hub();
        let mut codes = Vec::new();

        let snapshot = apply_command(
            r#"{"event":"subscribe","data":{"codes":["gram"]}}"#,
            &mut codes,
            &hub,
        );

        assert_eq!(codes, vec!["GRAM".to_string()]);
        match snapshot {
            Some(PriceSocketMessage::Prices(ticks)) => {
                assert_eq!(ticks.len(), 1);
                assert_eq!(ticks[0].code, "GRAM");
            }
            other => panic!("expected a snapshot, got {:?}", other),
        }
    }

    #[test]
    fn empty_subscription_restores_everything() {
        let hub = seeded_hub();
        let mut codes = vec!["ONS".to_string()];

        let snapshot = apply_command(r#"{"event":"subscribe","data":{}}"#, &mut codes, &hub);

        assert!(codes.is_empty());
        match snapshot {
            Some(PriceSocketMessage::Prices(ticks)) => assert_eq!(ticks.len(), 2),
            other => panic!("expected a snapshot, got {:?}", other),
        }
    }

    #[test]
    fn unknown_frames_leave_the_subscription_alone() {
        let hub = seeded_hub();
        let mut codes = vec!["GRAM".to_string()];

        assert!(apply_command("ping", &mut codes, &hub).is_none());
        assert!(apply_command(r#"{"event":"unsubscribe"}"#, &mut codes, &hub).is_none());
        assert_eq!(codes, vec!["GRAM".to_string()]);
    }

    #[tokio::test]
    async fn published_updates_reach_subscribers() {
        let hub = seeded_hub();
        let mut rx = hub.subscribe();

        hub.publish(PriceSocketMessage::PriceUpdate(tick("GRAM", 3010.0)));

        let received = rx.recv().await.unwrap();
        assert!(matches!(
            &received,
            PriceSocketMessage::PriceUpdate(tick) if tick.sell == 3010.0
        ));
        assert!(received.filtered(&["GRAM".to_string()]).is_some());
        assert!(received.filtered(&["ONS".to_string()]).is_none());
        assert_eq!(hub.snapshot().len(), 2);
    }
}

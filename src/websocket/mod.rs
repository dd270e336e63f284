//! WebSocket change feed for order events
//!
//! Pushes order inserts/updates and chat activity to connected clients.
//! Best-effort only: events may be dropped when a client lags, so
//! consumers reconcile by re-fetching over plain HTTP.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use tokio::sync::broadcast;

use crate::orders::OrderEvent;

/// Change feed state shared across connections
#[derive(Clone)]
pub struct FeedState {
    tx: broadcast::Sender<OrderEvent>,
}

/// Client message types
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ClientMessage {
    Subscribe { order_ids: Vec<Uuid> },
    SubscribeAll,
    Unsubscribe { order_ids: Vec<Uuid> },
    Ping,
}

/// Server message types
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ServerMessage {
    Event { event: OrderEvent },
    Subscribed { order_ids: Vec<Uuid> },
    Pong,
    Error { message: String },
}

impl FeedState {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(256);
        Self { tx }
    }

    /// Broadcast an order event to all connected clients.
    pub fn broadcast(&self, event: OrderEvent) {
        // Send fails only when nobody is listening; that is fine.
        let _ = self.tx.send(event);
    }
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new()
    }
}

/// GET /ws - upgrade to the change feed
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<FeedState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: FeedState) {
    let (mut sender, mut receiver) = socket.split();
    let mut events = state.tx.subscribe();

    // Per-connection subscription filter. Empty set + all_orders=false
    // means the client sees nothing until it subscribes.
    let mut subscribed: HashSet<Uuid> = HashSet::new();
    let mut all_orders = false;

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if !all_orders && !subscribed.contains(&event.order_id()) {
                            continue;
                        }
                        let msg = ServerMessage::Event { event };
                        if send_json(&mut sender, &msg).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Change feed client lagged, events dropped");
                        let msg = ServerMessage::Error {
                            message: "Events dropped, please re-fetch".to_string(),
                        };
                        if send_json(&mut sender, &msg).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            incoming = receiver.next() => {
                let Some(Ok(msg)) = incoming else { break };

                match msg {
                    Message::Text(text) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(ClientMessage::Subscribe { order_ids }) => {
                                subscribed.extend(order_ids.iter().copied());
                                let msg = ServerMessage::Subscribed { order_ids };
                                if send_json(&mut sender, &msg).await.is_err() {
                                    break;
                                }
                            }
                            Ok(ClientMessage::SubscribeAll) => {
                                all_orders = true;
                                let msg = ServerMessage::Subscribed { order_ids: vec![] };
                                if send_json(&mut sender, &msg).await.is_err() {
                                    break;
                                }
                            }
                            Ok(ClientMessage::Unsubscribe { order_ids }) => {
                                for id in &order_ids {
                                    subscribed.remove(id);
                                }
                            }
                            Ok(ClientMessage::Ping) => {
                                if send_json(&mut sender, &ServerMessage::Pong).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                let msg = ServerMessage::Error {
                                    message: format!("Invalid message: {}", e),
                                };
                                if send_json(&mut sender, &msg).await.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    }
}

async fn send_json(
    sender: &mut futures_util::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let text = serde_json::to_string(msg).unwrap_or_default();
    sender.send(Message::Text(text)).await
}

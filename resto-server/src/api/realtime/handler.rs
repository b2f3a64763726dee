//! Realtime WebSocket Handler

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use shared::message::{ChangeEvent, ChangeFilter};
use tokio::time::Duration;

use super::REALTIME_TABLES;
use crate::core::ServerState;
use crate::realtime::Subscription;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct SubscribeQuery {
    pub table: String,
    pub column: Option<String>,
    pub value: Option<String>,
}

impl SubscribeQuery {
    fn filter(&self) -> AppResult<ChangeFilter> {
        match (&self.column, &self.value) {
            (None, None) => Ok(ChangeFilter::All),
            (Some(column), Some(value)) => Ok(ChangeFilter::eq(column.clone(), value)),
            _ => Err(AppError::validation("column and value must be given together")),
        }
    }
}

/// GET /api/realtime?table=menu&column=establishment_id&value=1
pub async fn subscribe(
    State(state): State<ServerState>,
    Query(query): Query<SubscribeQuery>,
    ws: WebSocketUpgrade,
) -> AppResult<impl IntoResponse> {
    if !REALTIME_TABLES.contains(&query.table.as_str()) {
        return Err(AppError::validation(format!("Unknown table: {}", query.table))
            .with_detail("table", query.table.clone()));
    }
    let filter = query.filter()?;
    // 升级前订阅，握手期间的变更不会丢失
    let subscription = state.realtime.subscribe(&query.table, filter);

    Ok(ws.on_upgrade(move |socket| realtime_session(socket, state, subscription)))
}

async fn realtime_session(socket: WebSocket, state: ServerState, mut subscription: Subscription) {
    let (mut sink, mut stream) = socket.split();
    let table = subscription.key().table.clone();
    tracing::info!(table = %table, filter = ?subscription.key().filter, "Realtime WS connected");

    let mut ping_interval = tokio::time::interval(Duration::from_secs(30));
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = state.shutdown.cancelled() => {
                let _ = sink.send(Message::Close(None)).await;
                break;
            }

            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(vec![].into())).await.is_err() {
                    break;
                }
            }

            event = subscription.recv() => {
                match event {
                    Some(event) => {
                        if send_event(&mut sink, &event).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
        }
    }

    subscription.unsubscribe();
    tracing::info!(table = %table, "Realtime WS disconnected");
}

async fn send_event(
    sink: &mut SplitSink<WebSocket, Message>,
    event: &ChangeEvent,
) -> Result<(), ()> {
    let json = serde_json::to_string(event).map_err(|e| {
        tracing::error!("Failed to serialize change event: {e}");
    })?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}

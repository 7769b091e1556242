//! WebSocket endpoint for live course events
//!
//! Each socket gets a writer task that merges direct replies with hub events
//! for the courses it subscribed to. Client `ProgressUpdate`s are relayed to
//! the other sockets following the same course.

use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::{RwLock, broadcast, mpsc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    constants::REALTIME_SOCKET_BUFFER,
    error::{AppError, AppResult},
    middleware::auth::{AuthenticatedUser, OptionalAuth, authenticate_token},
    realtime::{ClientMessage, ServerMessage},
    services::EnrollmentService,
    state::AppState,
};

/// Query parameters of the upgrade request
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Access token, for clients that cannot set headers on upgrade
    pub token: Option<String>,
}

/// Upgrade to a WebSocket once the caller is authenticated
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    auth: OptionalAuth,
    Query(query): Query<WsQuery>,
) -> AppResult<Response> {
    let user = match (auth.0, query.token) {
        (Some(user), _) => user,
        (None, Some(token)) => authenticate_token(&token, &state.config().jwt.secret)?,
        (None, None) => return Err(AppError::Unauthorized),
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user)))
}

async fn handle_socket(socket: WebSocket, state: AppState, user: AuthenticatedUser) {
    let connection_id = Uuid::new_v4();
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(REALTIME_SOCKET_BUFFER);
    let subscriptions = Arc::new(RwLock::new(HashSet::<Uuid>::new()));

    info!(user_id = %user.id, connection_id = %connection_id, "WebSocket connected");

    let writer = tokio::spawn({
        let subscriptions = subscriptions.clone();
        let mut events = state.realtime().subscribe();
        async move {
            loop {
                let message = tokio::select! {
                    direct = rx.recv() => match direct {
                        Some(message) => message,
                        None => break,
                    },
                    event = events.recv() => match event {
                        Ok(envelope) => {
                            if !envelope.is_for(&connection_id, &*subscriptions.read().await) {
                                continue;
                            }
                            envelope.message
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(connection_id = %connection_id, skipped, "WebSocket receiver lagged");
                            continue;
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                };

                let Ok(json) = serde_json::to_string(&message) else {
                    continue;
                };
                if sink.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    while let Some(Ok(message)) = stream.next().await {
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        let reply = match serde_json::from_str::<ClientMessage>(&text) {
            Ok(message) => handle_message(&state, &user, connection_id, &subscriptions, message).await,
            Err(e) => Some(ServerMessage::Error {
                message: format!("Invalid message: {}", e),
            }),
        };

        if let Some(reply) = reply {
            if tx.send(reply).await.is_err() {
                break;
            }
        }
    }

    writer.abort();
    info!(user_id = %user.id, connection_id = %connection_id, "WebSocket disconnected");
}

/// Apply one client message; returns the direct reply, if any
async fn handle_message(
    state: &AppState,
    user: &AuthenticatedUser,
    connection_id: Uuid,
    subscriptions: &RwLock<HashSet<Uuid>>,
    message: ClientMessage,
) -> Option<ServerMessage> {
    match message {
        ClientMessage::Subscribe { course_id } => {
            match EnrollmentService::can_follow(state.db(), &user.id, &user.role, &course_id).await {
                Ok(true) => {
                    subscriptions.write().await.insert(course_id);
                    debug!(connection_id = %connection_id, course_id = %course_id, "Subscribed");
                    Some(ServerMessage::Subscribed { course_id })
                }
                Ok(false) => Some(ServerMessage::Error {
                    message: "Not allowed to follow this course".to_string(),
                }),
                Err(e) => {
                    warn!(error = %e, "Subscription check failed");
                    Some(ServerMessage::Error {
                        message: "Subscription failed".to_string(),
                    })
                }
            }
        }
        ClientMessage::Unsubscribe { course_id } => {
            subscriptions.write().await.remove(&course_id);
            Some(ServerMessage::Unsubscribed { course_id })
        }
        ClientMessage::ProgressUpdate {
            course_id,
            lesson_id,
            progress,
        } => {
            if !subscriptions.read().await.contains(&course_id) {
                return Some(ServerMessage::Error {
                    message: "Subscribe to the course before sending updates".to_string(),
                });
            }
            if !(0..=100).contains(&progress) {
                return Some(ServerMessage::Error {
                    message: "Progress must be between 0 and 100".to_string(),
                });
            }

            state.realtime().relay(
                connection_id,
                course_id,
                ServerMessage::ProgressUpdate {
                    course_id,
                    user_id: user.id,
                    lesson_id,
                    progress,
                },
            );
            None
        }
        ClientMessage::Ping => Some(ServerMessage::Pong),
    }
}

//! Real-time progress relay
//!
//! A single broadcast channel carries every event. Each socket filters by the
//! courses it subscribed to and skips events it sent itself. Delivery is best
//! effort: lagged receivers skip ahead and nothing is retried.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Messages from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "PascalCase")]
pub enum ClientMessage {
    Subscribe { course_id: Uuid },
    Unsubscribe { course_id: Uuid },
    /// Rebroadcast to the other sockets following the course
    ProgressUpdate {
        course_id: Uuid,
        lesson_id: Option<Uuid>,
        progress: i32,
    },
    Ping,
}

/// Messages from server to client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "PascalCase")]
pub enum ServerMessage {
    ProgressUpdate {
        course_id: Uuid,
        user_id: Uuid,
        lesson_id: Option<Uuid>,
        progress: i32,
    },
    LessonCompleted {
        course_id: Uuid,
        user_id: Uuid,
        lesson_id: Uuid,
        progress: i32,
    },
    QuizSubmitted {
        course_id: Uuid,
        user_id: Uuid,
        lesson_id: Uuid,
        percentage: i32,
        passed: bool,
    },
    CourseCompleted {
        course_id: Uuid,
        user_id: Uuid,
    },
    CertificateIssued {
        course_id: Uuid,
        user_id: Uuid,
        certificate_id: Uuid,
    },
    Subscribed { course_id: Uuid },
    Unsubscribed { course_id: Uuid },
    Error { message: String },
    Pong,
}

/// An event in flight on the hub
#[derive(Debug, Clone)]
pub struct Envelope {
    pub course_id: Uuid,
    /// Connection that produced the event; `None` for server-side events
    pub origin: Option<Uuid>,
    pub message: ServerMessage,
}

impl Envelope {
    /// Whether the connection should receive this event
    pub fn is_for(&self, connection_id: &Uuid, subscriptions: &HashSet<Uuid>) -> bool {
        self.origin.as_ref() != Some(connection_id) && subscriptions.contains(&self.course_id)
    }
}

/// Fan-out point for course events
#[derive(Debug, Clone)]
pub struct RealtimeHub {
    tx: broadcast::Sender<Envelope>,
}

impl RealtimeHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish a server-side event. Returns the number of live receivers.
    pub fn publish(&self, course_id: Uuid, message: ServerMessage) -> usize {
        self.send(Envelope {
            course_id,
            origin: None,
            message,
        })
    }

    /// Relay an event received from a client connection
    pub fn relay(&self, origin: Uuid, course_id: Uuid, message: ServerMessage) -> usize {
        self.send(Envelope {
            course_id,
            origin: Some(origin),
            message,
        })
    }

    fn send(&self, envelope: Envelope) -> usize {
        // No receivers is not an error for a fire-and-forget relay
        self.tx.send(envelope).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Envelope> {
        self.tx.subscribe()
    }

    pub fn connection_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(course_id: Uuid, user_id: Uuid) -> ServerMessage {
        ServerMessage::ProgressUpdate {
            course_id,
            user_id,
            lesson_id: None,
            progress: 40,
        }
    }

    #[test]
    fn test_publish_without_receivers_is_noop() {
        let hub = RealtimeHub::new(8);
        assert_eq!(hub.publish(Uuid::new_v4(), ServerMessage::Pong), 0);
    }

    #[tokio::test]
    async fn test_relay_reaches_other_subscribers_only() {
        let hub = RealtimeHub::new(8);
        let course = Uuid::new_v4();
        let sender_conn = Uuid::new_v4();
        let other_conn = Uuid::new_v4();
        let subscriptions: HashSet<Uuid> = [course].into_iter().collect();

        let mut rx = hub.subscribe();
        assert_eq!(hub.connection_count(), 1);
        hub.relay(sender_conn, course, progress(course, Uuid::new_v4()));

        let envelope = rx.recv().await.unwrap();
        assert!(envelope.is_for(&other_conn, &subscriptions));
        assert!(!envelope.is_for(&sender_conn, &subscriptions));
    }

    #[tokio::test]
    async fn test_events_filtered_by_course() {
        let hub = RealtimeHub::new(8);
        let course = Uuid::new_v4();
        let conn = Uuid::new_v4();
        let subscriptions: HashSet<Uuid> = [course].into_iter().collect();

        let mut rx = hub.subscribe();
        hub.publish(
            Uuid::new_v4(),
            ServerMessage::CourseCompleted {
                course_id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
            },
        );
        hub.publish(course, progress(course, Uuid::new_v4()));

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert!(!first.is_for(&conn, &subscriptions));
        assert!(second.is_for(&conn, &subscriptions));
    }

    #[tokio::test]
    async fn test_lagged_receiver_skips_ahead() {
        let hub = RealtimeHub::new(2);
        let course = Uuid::new_v4();
        let mut rx = hub.subscribe();

        for _ in 0..5 {
            hub.publish(course, ServerMessage::Pong);
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(3))
        ));
        assert!(rx.recv().await.is_ok());
    }

    #[test]
    fn test_client_message_wire_format() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"Subscribe","course_id":"67e55044-10b1-426f-9247-bb680e5fe0c8"}"#,
        )
        .unwrap();
        assert!(matches!(msg, ClientMessage::Subscribe { .. }));

        let pong = serde_json::to_string(&ServerMessage::Pong).unwrap();
        assert_eq!(pong, r#"{"type":"Pong"}"#);
    }
}

//! Security audit log model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Security log entry
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SecurityLog {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub event_type: String,
    pub ip_address: Option<String>,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A not-yet-persisted security event
#[derive(Debug, Clone, Default)]
pub struct SecurityEvent {
    pub user_id: Option<Uuid>,
    pub event_type: &'static str,
    pub ip_address: Option<String>,
    pub detail: Option<String>,
}

impl SecurityEvent {
    pub fn new(event_type: &'static str) -> Self {
        Self {
            event_type,
            ..Default::default()
        }
    }

    pub fn user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn ip(mut self, ip_address: Option<String>) -> Self {
        self.ip_address = ip_address;
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

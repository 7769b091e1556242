//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use redis::aio::ConnectionManager;
use sqlx::PgPool;
use tokio::sync::OnceCell;

use crate::{config::Config, error::AppResult, realtime::RealtimeHub};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Database connection pool
    pub db: PgPool,

    /// Redis client the connection manager is built from
    pub redis_client: redis::Client,

    /// Redis connection manager, created on first use and shared afterwards
    pub redis: OnceCell<ConnectionManager>,

    /// Application configuration
    pub config: Config,

    /// Real-time event relay
    pub realtime: RealtimeHub,
}

impl AppState {
    /// Create a new application state
    pub fn new(db: PgPool, redis: redis::Client, config: Config, realtime: RealtimeHub) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                db,
                redis_client: redis,
                redis: OnceCell::new(),
                config,
                realtime,
            }),
        }
    }

    /// Get a reference to the database pool
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    /// Get a clone of the Redis connection manager
    pub async fn redis(&self) -> AppResult<ConnectionManager> {
        let manager = self
            .inner
            .redis
            .get_or_try_init(|| ConnectionManager::new(self.inner.redis_client.clone()))
            .await?;

        Ok(manager.clone())
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get a reference to the realtime hub
    pub fn realtime(&self) -> &RealtimeHub {
        &self.inner.realtime
    }
}

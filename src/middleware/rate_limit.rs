//! Rate limiting middleware
//!
//! Fixed-window counters in Redis, keyed by peer address and endpoint bucket.
//! When Redis is unreachable requests are let through.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::{
    constants::{API_BASE_PATH, rate_limits},
    error::{AppError, AppResult},
    state::AppState,
};

/// Endpoint group sharing one counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Auth,
    Quiz,
    General,
}

impl Bucket {
    fn for_path(path: &str) -> Self {
        let path = path.strip_prefix(API_BASE_PATH).unwrap_or(path);

        if path.starts_with("/auth") {
            Self::Auth
        } else if path.starts_with("/lessons/") && path.ends_with("/quiz/submit") {
            Self::Quiz
        } else {
            Self::General
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Quiz => "quiz",
            Self::General => "general",
        }
    }

    /// `(max requests, window seconds)`
    fn limit(self) -> (i64, i64) {
        match self {
            Self::Auth => (rate_limits::AUTH_MAX_REQUESTS, rate_limits::AUTH_WINDOW_SECS),
            Self::Quiz => (rate_limits::QUIZ_MAX_REQUESTS, rate_limits::QUIZ_WINDOW_SECS),
            Self::General => (
                rate_limits::GENERAL_MAX_REQUESTS,
                rate_limits::GENERAL_WINDOW_SECS,
            ),
        }
    }
}

/// Rate limit middleware
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let ip = addr.ip().to_string();
    let bucket = Bucket::for_path(request.uri().path());
    let (limit, window) = bucket.limit();
    let key = format!("rate_limit:{}:{}", bucket.name(), ip);

    match hit(&state, &key, window).await {
        Ok(count) if count > limit => {
            warn!(ip = %ip, bucket = bucket.name(), count, "Rate limit exceeded");
            return Err(AppError::TooManyRequests);
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Rate limiter unavailable, allowing request"),
    }

    Ok(next.run(request).await)
}

/// Count one request in the current window
async fn hit(state: &AppState, key: &str, window: i64) -> AppResult<i64> {
    let mut redis = state.redis().await?;

    // Expire only sets a TTL when none exists, so the window stays fixed
    let (count,): (i64,) = redis::pipe()
        .atomic()
        .incr(key, 1)
        .cmd("EXPIRE")
        .arg(key)
        .arg(window)
        .arg("NX")
        .ignore()
        .query_async(&mut redis)
        .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_for_path() {
        assert_eq!(Bucket::for_path("/api/v1/auth/login"), Bucket::Auth);
        assert_eq!(
            Bucket::for_path("/api/v1/lessons/2b1c/quiz/submit"),
            Bucket::Quiz
        );
        assert_eq!(Bucket::for_path("/api/v1/lessons/2b1c/quiz"), Bucket::General);
        assert_eq!(Bucket::for_path("/api/v1/courses"), Bucket::General);
    }

    #[test]
    fn test_auth_bucket_is_strictest() {
        assert!(Bucket::Auth.limit().0 < Bucket::General.limit().0);
    }
}

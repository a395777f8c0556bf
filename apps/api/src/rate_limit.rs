//! Per-user sliding-window rate limiting backed by a Redis sorted set.
//!
//! Each allowed request adds one member scored with its timestamp (ms). Members
//! older than the window are trimmed before counting. Checked by the HTTP
//! handlers before the orchestrator or evaluator is invoked.

use std::time::Duration;

use chrono::Utc;
use redis::Client as RedisClient;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allow,
    Deny { retry_after_secs: u64 },
}

/// Decides from the in-window count, including the request being checked.
/// `oldest_ms` is the score of the oldest member still inside the window.
pub fn decide(
    count: u64,
    max: u32,
    oldest_ms: Option<f64>,
    now_ms: i64,
    window_ms: i64,
) -> RateDecision {
    if count <= u64::from(max) {
        return RateDecision::Allow;
    }
    let frees_at = oldest_ms.map(|oldest| oldest as i64 + window_ms).unwrap_or(now_ms + window_ms);
    let wait_ms = (frees_at - now_ms).max(0);
    let retry_after_secs = ((wait_ms + 999) / 1000).max(1) as u64;
    RateDecision::Deny { retry_after_secs }
}

#[derive(Clone)]
pub struct RateLimiter {
    client: RedisClient,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(client: RedisClient, max_requests: u32, window: Duration) -> Self {
        Self {
            client,
            max_requests,
            window,
        }
    }

    /// Records one request by `user_id` under `scope`, or fails with `RateLimited`.
    pub async fn check(&self, scope: &str, user_id: Uuid) -> Result<(), AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let key = format!("ratelimit:{scope}:{user_id}");
        let now_ms = Utc::now().timestamp_millis();
        let window_ms = self.window.as_millis() as i64;
        let member = format!("{now_ms}:{}", Uuid::new_v4());

        let (count, oldest): (u64, Vec<(String, f64)>) = redis::pipe()
            .atomic()
            .cmd("ZREMRANGEBYSCORE")
            .arg(&key)
            .arg("-inf")
            .arg(now_ms - window_ms)
            .ignore()
            .cmd("ZADD")
            .arg(&key)
            .arg(now_ms)
            .arg(&member)
            .ignore()
            .cmd("ZCARD")
            .arg(&key)
            .cmd("ZRANGE")
            .arg(&key)
            .arg(0)
            .arg(0)
            .arg("WITHSCORES")
            .cmd("EXPIRE")
            .arg(&key)
            .arg(self.window.as_secs().max(1))
            .ignore()
            .query_async(&mut conn)
            .await?;

        let oldest_ms = oldest.first().map(|(_, score)| *score);
        match decide(count, self.max_requests, oldest_ms, now_ms, window_ms) {
            RateDecision::Allow => {
                debug!("Rate limit {scope} for {user_id}: {count}/{}", self.max_requests);
                Ok(())
            }
            RateDecision::Deny { retry_after_secs } => {
                // Rejected requests do not occupy the window.
                redis::cmd("ZREM")
                    .arg(&key)
                    .arg(&member)
                    .query_async::<_, ()>(&mut conn)
                    .await?;
                warn!("Rate limit exceeded: {scope} for user {user_id}");
                Err(AppError::RateLimited { retry_after_secs })
            }
        }
    }
}

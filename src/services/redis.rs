//! Redis service holding per-session visit counters

use redis::{AsyncCommands, Client};

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct RedisService {
    client: Client,
}

fn visits_key(session_id: &str) -> String {
    format!("session:{}:num_visits", session_id)
}

impl RedisService {
    /// Create the client; no connection is made until first use
    pub fn open(url: &str) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;
        Ok(Self { client })
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get Redis connection: {}", e)))
    }

    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection().await?;
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection test failed: {}", e)))?;
        Ok(())
    }

    /// Count one visit for the session and return the count before it.
    /// The session expires `ttl_seconds` after its latest visit.
    pub async fn record_visit(&self, session_id: &str, ttl_seconds: u64) -> AppResult<i64> {
        let mut conn = self.connection().await?;
        let key = visits_key(session_id);

        let visits: i64 = conn
            .incr(&key, 1)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to count visit in Redis: {}", e)))?;
        redis::cmd("EXPIRE")
            .arg(&key)
            .arg(ttl_seconds)
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to refresh session in Redis: {}", e)))?;

        Ok(visits - 1)
    }
}

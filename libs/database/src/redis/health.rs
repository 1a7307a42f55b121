use redis::aio::ConnectionManager;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::common::DatabaseError;

/// `PING` the server and report how long the round trip took
pub async fn check_health(manager: &ConnectionManager) -> Result<Duration, DatabaseError> {
    let start = Instant::now();
    let mut conn = manager.clone();

    let reply: String = redis::cmd("PING").query_async(&mut conn).await?;
    if reply != "PONG" {
        return Err(DatabaseError::HealthCheckFailed(format!(
            "unexpected PING reply: {reply}"
        )));
    }

    let elapsed = start.elapsed();
    debug!(elapsed_ms = elapsed.as_millis() as u64, "Redis health check passed");
    Ok(elapsed)
}

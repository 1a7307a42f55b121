use redis::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use crate::common::{RetryConfig, retry_with_backoff};

/// Open a reconnecting `ConnectionManager` and verify it with `PING`
pub async fn connect(url: &str) -> redis::RedisResult<ConnectionManager> {
    let client = Client::open(url)?;
    let mut manager = ConnectionManager::new(client).await?;

    let _: String = redis::cmd("PING").query_async(&mut manager).await?;

    info!("Successfully connected to Redis");
    Ok(manager)
}

/// [`connect`] with backoff; `None` uses [`RetryConfig::startup`]
///
/// # Example
/// ```ignore
/// use database::redis::connect_with_retry;
///
/// let manager = connect_with_retry("redis://127.0.0.1:6379", None).await?;
/// ```
pub async fn connect_with_retry(
    url: &str,
    retry_config: Option<RetryConfig>,
) -> redis::RedisResult<ConnectionManager> {
    retry_with_backoff(
        || connect(url),
        retry_config.unwrap_or_else(RetryConfig::startup),
    )
    .await
}

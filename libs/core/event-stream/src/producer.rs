//! Stream producer for event publishing

use crate::error::StreamError;
use crate::registry::MessageKey;
use chrono::Utc;
use redis::aio::ConnectionManager;
use serde::Serialize;
use tracing::debug;

const DEFAULT_MAX_LENGTH: i64 = 100_000;

/// Appends serialized events to Redis streams.
///
/// Cloning is cheap; clones share the underlying `ConnectionManager`.
#[derive(Clone)]
pub struct StreamProducer {
    redis: ConnectionManager,
    max_length: i64,
}

impl StreamProducer {
    pub fn new(redis: ConnectionManager) -> Self {
        Self {
            redis,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    /// Set the approximate stream cap (MAXLEN ~).
    pub fn with_max_length(mut self, max_length: i64) -> Self {
        self.max_length = max_length;
        self
    }

    /// Append `payload` to `stream`, returning the new entry id.
    pub async fn send<E: Serialize>(
        &self,
        stream: &str,
        event_type: &str,
        payload: &E,
    ) -> Result<String, StreamError> {
        let mut conn = self.redis.clone();
        let payload_json = serde_json::to_string(payload)?;

        let entry_id: String = redis::cmd("XADD")
            .arg(stream)
            .arg("MAXLEN")
            .arg("~")
            .arg(self.max_length)
            .arg("*")
            .arg(MessageKey::Event.as_ref())
            .arg(&payload_json)
            .arg(MessageKey::EventType.as_ref())
            .arg(event_type)
            .arg(MessageKey::PublishedAt.as_ref())
            .arg(Utc::now().to_rfc3339())
            .query_async(&mut conn)
            .await?;

        debug!(stream = %stream, entry_id = %entry_id, event_type, "Appended event");

        Ok(entry_id)
    }
}

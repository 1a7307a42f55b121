//! Domain events emitted after a successful mutation, and the publisher seam.

use async_trait::async_trait;
use event_stream::{StreamDef, StreamError, StreamProducer};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::debug;

use crate::models::{FieldMask, User};

/// Topic for [`UserEvent::Created`].
pub struct UserCreatedTopic;

impl StreamDef for UserCreatedTopic {
    const STREAM_NAME: &'static str = "user-created_v1";
}

/// Topic for [`UserEvent::Updated`].
pub struct UserUpdatedTopic;

impl StreamDef for UserUpdatedTopic {
    const STREAM_NAME: &'static str = "user-updated_v1";
}

/// Topic for [`UserEvent::Deleted`].
pub struct UserDeletedTopic;

impl StreamDef for UserDeletedTopic {
    const STREAM_NAME: &'static str = "user-deleted_v1";
}

/// Every event carries the full user as it stood after the change, or right
/// before removal for `Deleted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserEvent {
    Created { user: User },
    Updated { user: User, update_fields: FieldMask },
    Deleted { user: User },
}

impl UserEvent {
    pub fn topic(&self) -> &'static str {
        match self {
            UserEvent::Created { .. } => UserCreatedTopic::STREAM_NAME,
            UserEvent::Updated { .. } => UserUpdatedTopic::STREAM_NAME,
            UserEvent::Deleted { .. } => UserDeletedTopic::STREAM_NAME,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            UserEvent::Created { .. } => "user_created",
            UserEvent::Updated { .. } => "user_updated",
            UserEvent::Deleted { .. } => "user_deleted",
        }
    }

    pub fn user(&self) -> &User {
        match self {
            UserEvent::Created { user }
            | UserEvent::Updated { user, .. }
            | UserEvent::Deleted { user } => user,
        }
    }
}

/// Where a published event landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub topic: String,
    /// Broker-assigned position within the topic
    pub entry_id: String,
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("unable to encode event: {0}")]
    Encode(String),

    #[error("unable to reach broker: {0}")]
    Broker(String),
}

impl From<StreamError> for PublishError {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::Serialization(msg) => PublishError::Encode(msg),
            other => PublishError::Broker(other.to_string()),
        }
    }
}

/// Outbound event transport.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, topic: &str, event: &UserEvent) -> Result<PublishReceipt, PublishError>;
}

/// Publishes to Redis Streams, one stream per topic.
#[derive(Clone)]
pub struct StreamEventPublisher {
    producer: StreamProducer,
}

impl StreamEventPublisher {
    pub fn new(producer: StreamProducer) -> Self {
        Self { producer }
    }
}

#[async_trait]
impl EventPublisher for StreamEventPublisher {
    async fn publish(&self, topic: &str, event: &UserEvent) -> Result<PublishReceipt, PublishError> {
        let entry_id = self.producer.send(topic, event.event_type(), event).await?;
        debug!(topic_name = %topic, entry_id = %entry_id, "Published user event");
        Ok(PublishReceipt {
            topic: topic.to_string(),
            entry_id,
        })
    }
}

/// Keeps published events in memory (for development/testing).
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventPublisher {
    events: Arc<Mutex<Vec<(String, UserEvent)>>>,
    failing: bool,
}

impl InMemoryEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A publisher whose every call fails with a broker error.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Snapshot of `(topic, event)` pairs in publish order.
    pub fn published(&self) -> Vec<(String, UserEvent)> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, topic: &str, event: &UserEvent) -> Result<PublishReceipt, PublishError> {
        if self.failing {
            return Err(PublishError::Broker("broker unavailable".into()));
        }

        let mut events = self
            .events
            .lock()
            .map_err(|e| PublishError::Broker(e.to_string()))?;
        events.push((topic.to_string(), event.clone()));

        Ok(PublishReceipt {
            topic: topic.to_string(),
            entry_id: format!("0-{}", events.len()),
        })
    }
}
